mod commands;
mod config;
mod controller;
mod error;
mod firewall;
mod hotkey;
mod services;
mod settings;
mod view;

use tauri::{
    tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
    Manager, RunEvent,
};
use tauri_plugin_global_shortcut::{GlobalShortcutExt, ShortcutState};

use commands::AppState;
use controller::Command;
use settings::SettingsStore;

/// Forward a command from an event source outside the dispatcher.
fn enqueue(app: &tauri::AppHandle, command: Command) {
    if let Some(state) = app.try_state::<AppState>() {
        if let Err(e) = state.send(command) {
            tracing::warn!("Dropped input: {e}");
        }
    }
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!("PANIC in Net Switch: {info}");
        default_hook(info);
    }));

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config::DEFAULT_LOG_FILTER.into()),
        )
        .init();

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(
            tauri_plugin_global_shortcut::Builder::new()
                .with_handler(|app, shortcut, event| {
                    // Runs on the OS hook thread: hand off, never touch state here.
                    if event.state() == ShortcutState::Pressed {
                        tracing::debug!("Hotkey {shortcut:?} pressed");
                        enqueue(app, Command::ToggleCurrent);
                    }
                })
                .build(),
        )
        .invoke_handler(tauri::generate_handler![
            commands::network::get_view_state,
            commands::network::request_toggle,
            commands::network::toggle_network,
            commands::network::refresh_state,
            commands::settings::set_target_path,
            commands::settings::set_hotkey,
            commands::settings::reveal_target,
            commands::settings::get_settings_path,
        ])
        .setup(|app| {
            let app_handle = app.handle().clone();

            let config_dir = app.path().app_config_dir()?;
            std::fs::create_dir_all(&config_dir)?;
            let settings = SettingsStore::in_dir(&config_dir);

            let commands = services::BackgroundServices::start(settings.clone(), app_handle.clone());
            app.manage(AppState { commands, settings });

            let menu = services::build_tray_menu(&app_handle)?;
            let mut tray = TrayIconBuilder::with_id(config::TRAY_ID)
                .tooltip(config::APP_NAME)
                .menu(&menu)
                .show_menu_on_left_click(false)
                .on_menu_event(|app, event| match event.id().as_ref() {
                    services::MENU_TOGGLE => enqueue(app, Command::ToggleCurrent),
                    services::MENU_SHOW => services::show_main_window(app),
                    services::MENU_QUIT => app.exit(0),
                    _ => {}
                })
                .on_tray_icon_event(|tray, event| {
                    if let TrayIconEvent::Click {
                        button: MouseButton::Left,
                        button_state: MouseButtonState::Up,
                        ..
                    } = event
                    {
                        services::show_main_window(tray.app_handle());
                    }
                });
            if let Some(icon) = app.default_window_icon() {
                tray = tray.icon(icon.clone());
            }
            tray.build(app)?;

            tracing::info!("{} started", config::APP_NAME);
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(|app, event| {
        if let RunEvent::Exit = event {
            enqueue(app, Command::Shutdown);
            // The dispatcher may not get scheduled again before the process ends.
            if let Err(e) = app.global_shortcut().unregister_all() {
                tracing::warn!("Hotkey teardown failed: {e}");
            }
        }
    });
}
