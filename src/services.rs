//! Background service lifecycle management.
//!
//! `BackgroundServices` wires the controller to its Tauri-backed collaborators
//! and starts the dispatcher task that owns it. The tray menu lives here too,
//! since its items feed the same command queue.

use std::sync::Arc;

use tauri::menu::{Menu, MenuItem, PredefinedMenuItem};
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::config;
use crate::controller::{Command, ToggleController};
use crate::firewall::PowerShellBackend;
use crate::hotkey::GlobalShortcutRegistry;
use crate::settings::SettingsStore;
use crate::view::TauriView;

/// Tray menu item ids.
pub const MENU_TOGGLE: &str = "toggle";
pub const MENU_SHOW: &str = "show";
pub const MENU_QUIT: &str = "quit";

pub struct BackgroundServices;

impl BackgroundServices {
    /// Load settings, build the controller, and spawn its dispatcher.
    ///
    /// Returns the queue sender that every input source shares.
    pub fn start(settings: SettingsStore, app_handle: tauri::AppHandle) -> UnboundedSender<Command> {
        let (tx, rx) = mpsc::unbounded_channel();
        let initial = settings.load();
        tracing::info!(
            "Loaded settings from {} (target: '{}')",
            settings.path().display(),
            initial.game_exe
        );

        let controller = ToggleController::new(
            Arc::new(PowerShellBackend::new(config::RULE_NAME)),
            Box::new(TauriView::new(app_handle.clone())),
            Box::new(GlobalShortcutRegistry::new(app_handle)),
            settings,
            initial,
            tx.clone(),
        );
        tauri::async_runtime::spawn(controller.run(rx));
        tx
    }
}

/// Build the tray right-click menu.
pub fn build_tray_menu(app: &tauri::AppHandle) -> anyhow::Result<Menu<tauri::Wry>> {
    let menu = Menu::new(app)?;
    menu.append(&MenuItem::with_id(app, MENU_TOGGLE, "Toggle network", true, None::<&str>)?)?;
    menu.append(&PredefinedMenuItem::separator(app)?)?;
    menu.append(&MenuItem::with_id(
        app,
        MENU_SHOW,
        format!("Show {}", config::APP_NAME),
        true,
        None::<&str>,
    )?)?;
    menu.append(&MenuItem::with_id(app, MENU_QUIT, "Quit", true, None::<&str>)?)?;
    Ok(menu)
}

/// Bring the main window to the front.
pub fn show_main_window(app: &tauri::AppHandle) {
    use tauri::Manager;

    if let Some(window) = app.get_webview_window("main") {
        let _ = window.show();
        let _ = window.unminimize();
        let _ = window.set_focus();
    }
}
