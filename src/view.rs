//! Presentation state pushed to the window.
//!
//! [`ViewState`] is a pure function of the controller's fields; the window
//! renders it verbatim and never keeps switch state of its own.

use serde::Serialize;
use tauri::Emitter;

use crate::config;
use crate::error::AppError;

/// Color of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTone {
    /// Green: traffic allowed.
    Online,
    /// Red: traffic blocked.
    Offline,
}

/// Everything the window needs to draw itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    /// Switch position: `true` = allowed (green), `false` = blocked (red).
    pub allowed: bool,
    /// `false` while an operation is in flight.
    pub switch_enabled: bool,
    /// Loading indicator text, present only while busy.
    pub loading: Option<String>,
    pub status_text: String,
    pub status_tone: StatusTone,
    /// Target path shortened for the label.
    pub target_label: String,
    /// Full target path for the tooltip.
    pub target_path: String,
    pub hotkey_label: String,
}

impl ViewState {
    pub fn build(
        allowed: bool,
        loading: Option<&str>,
        note: Option<&str>,
        target: &str,
        hotkey: Option<&str>,
    ) -> Self {
        Self {
            allowed,
            switch_enabled: loading.is_none(),
            loading: loading.map(str::to_string),
            status_text: status_text(allowed, note),
            status_tone: if allowed {
                StatusTone::Online
            } else {
                StatusTone::Offline
            },
            target_label: ellipsize_middle(target, config::MAX_PATH_CHARS),
            target_path: target.to_string(),
            hotkey_label: hotkey.unwrap_or(config::HOTKEY_UNSET_LABEL).to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Warning,
    Error,
}

/// A dialog-worthy message for the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    /// `AppError` kind that caused it.
    pub kind: &'static str,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn error(title: &str, err: &AppError) -> Self {
        Self::new(NotificationLevel::Error, title, err)
    }

    pub fn warning(title: &str, err: &AppError) -> Self {
        Self::new(NotificationLevel::Warning, title, err)
    }

    fn new(level: NotificationLevel, title: &str, err: &AppError) -> Self {
        Self {
            level,
            kind: err.kind(),
            title: title.to_string(),
            message: err.to_string(),
        }
    }
}

/// Sink for controller output.
pub trait View: Send {
    fn render(&mut self, state: &ViewState);
    fn notify(&mut self, notification: &Notification);
}

/// Status line text, with an optional note appended.
pub fn status_text(allowed: bool, note: Option<&str>) -> String {
    let base = if allowed {
        "Network: allowed (online)"
    } else {
        "Network: blocked (offline)"
    };
    match note {
        Some(note) if !note.is_empty() => format!("{base} / {note}"),
        _ => base.to_string(),
    }
}

/// Shorten `text` to `max_chars` by replacing its middle with `...`.
pub fn ellipsize_middle(text: &str, max_chars: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let left = keep / 2;
    let right = keep - left;
    let head: String = chars[..left].iter().collect();
    let tail: String = chars[chars.len() - right..].iter().collect();
    format!("{head}...{tail}")
}

/// Emits view updates as Tauri events and mirrors state into the tray tooltip.
pub struct TauriView {
    app: tauri::AppHandle,
}

impl TauriView {
    pub fn new(app: tauri::AppHandle) -> Self {
        Self { app }
    }
}

impl View for TauriView {
    fn render(&mut self, state: &ViewState) {
        if let Err(e) = self.app.emit(config::STATE_EVENT, state) {
            tracing::warn!("Failed to emit {}: {e}", config::STATE_EVENT);
        }
        if let Some(tray) = self.app.tray_by_id(config::TRAY_ID) {
            let tooltip = format!("{}\n{}", config::APP_NAME, state.status_text);
            let _ = tray.set_tooltip(Some(&tooltip));
        }
    }

    fn notify(&mut self, notification: &Notification) {
        match notification.level {
            NotificationLevel::Error => {
                tracing::error!("{}: {}", notification.title, notification.message)
            }
            NotificationLevel::Warning => {
                tracing::warn!("{}: {}", notification.title, notification.message)
            }
        }
        if let Err(e) = self.app.emit(config::NOTIFICATION_EVENT, notification) {
            tracing::warn!("Failed to emit {}: {e}", config::NOTIFICATION_EVENT);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ellipsize_short_text_unchanged() {
        assert_eq!(ellipsize_middle(r"C:\g.exe", 56), r"C:\g.exe");
        assert_eq!(ellipsize_middle("", 56), "");
    }

    #[test]
    fn test_ellipsize_keeps_both_ends() {
        let out = ellipsize_middle("abcdefghijklmnopqrstuvwxyz", 10);
        assert_eq!(out, "abc...wxyz");
        assert_eq!(out.chars().count(), 10);
    }

    #[test]
    fn test_ellipsize_counts_chars_not_bytes() {
        let path = "C:\\ゲーム\\モンスターハンター\\ワイルズ\\MonsterHunterWilds.exe";
        let out = ellipsize_middle(path, 20);
        assert_eq!(out.chars().count(), 20);
        assert!(out.ends_with("Wilds.exe"));
    }

    #[test]
    fn test_status_text_with_and_without_note() {
        assert_eq!(status_text(true, None), "Network: allowed (online)");
        assert_eq!(
            status_text(false, Some("state not confirmed")),
            "Network: blocked (offline) / state not confirmed"
        );
        assert_eq!(status_text(true, Some("")), "Network: allowed (online)");
    }

    #[test]
    fn test_view_state_disables_switch_while_loading() {
        let busy = ViewState::build(true, Some("Working"), None, r"C:\g.exe", None);
        assert!(!busy.switch_enabled);
        assert_eq!(busy.loading.as_deref(), Some("Working"));

        let idle = ViewState::build(false, None, None, r"C:\g.exe", Some("F8"));
        assert!(idle.switch_enabled);
        assert_eq!(idle.status_tone, StatusTone::Offline);
        assert_eq!(idle.hotkey_label, "F8");
    }

    #[test]
    fn test_view_state_serializes_camel_case() {
        let state = ViewState::build(true, None, None, "", None);
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["switchEnabled"], true);
        assert_eq!(json["statusTone"], "online");
        assert_eq!(json["hotkeyLabel"], config::HOTKEY_UNSET_LABEL);
    }

    #[test]
    fn test_notification_carries_error_kind() {
        let n = Notification::error("Toggle failed", &AppError::OperationFailed("exit 1".into()));
        assert_eq!(n.kind, "OperationFailed");
        assert_eq!(n.message, "exit 1");
        assert_eq!(n.level, NotificationLevel::Error);
    }
}
