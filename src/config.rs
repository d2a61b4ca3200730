//! Centralized runtime constants for Net Switch.
//!
//! Rule naming, UI labels, and event names live here so the backend, the
//! controller, and the frontend bridge agree on them.

/// Display name of the single firewall rule this app owns.
pub const RULE_NAME: &str = "NetSwitch_GameOutbound";

/// Product name shown in the tray tooltip and notifications.
pub const APP_NAME: &str = "Net Switch";

/// File name of the persisted settings, resolved inside the app config dir.
pub const SETTINGS_FILE_NAME: &str = "net-switch.config.json";

/// Settings key holding the target executable path.
pub const SETTINGS_KEY_GAME_EXE: &str = "game_exe";

/// Settings key holding the global hotkey chord ("" = unset).
pub const SETTINGS_KEY_HOTKEY: &str = "hotkey";

/// Required (case-insensitive) suffix of a target executable.
pub const EXECUTABLE_SUFFIX: &str = ".exe";

/// Chord the capture dialog sends to cancel without changing the binding.
pub const HOTKEY_CANCEL_CHORD: &str = "esc";

/// Maximum characters of the target path label before middle-ellipsis kicks in.
pub const MAX_PATH_CHARS: usize = 56;

/// Event carrying a full [`crate::view::ViewState`] to the window.
pub const STATE_EVENT: &str = "net-state";

/// Event carrying a [`crate::view::Notification`] to the window.
pub const NOTIFICATION_EVENT: &str = "net-notification";

/// Tray icon id.
pub const TRAY_ID: &str = "main";

/// Loading text while a toggle or rule recreation is in flight.
pub const WORKING_MESSAGE: &str = "Working… please wait a few seconds";

/// Loading text while the startup state query is in flight.
pub const CHECKING_MESSAGE: &str = "Reading firewall state…";

/// Status suffix when the displayed state could not be confirmed by a query.
pub const UNCONFIRMED_NOTE: &str = "state not confirmed";

/// Hotkey label when no chord is bound.
pub const HOTKEY_UNSET_LABEL: &str = "Not set";

/// Default log filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "net_switch_lib=info";
