//! Global hotkey registration.
//!
//! The OS hook fires on its own thread, so the plugin handler only enqueues
//! a command; registration itself is driven by the controller.

use anyhow::{Context, Result};
use tauri_plugin_global_shortcut::{GlobalShortcutExt, Shortcut};

/// One-chord hotkey source.
pub trait HotkeyRegistry: Send {
    fn register(&mut self, chord: &str) -> Result<()>;
    fn unregister_all(&mut self) -> Result<()>;
}

/// [`HotkeyRegistry`] backed by `tauri-plugin-global-shortcut`.
pub struct GlobalShortcutRegistry {
    app: tauri::AppHandle,
}

impl GlobalShortcutRegistry {
    pub fn new(app: tauri::AppHandle) -> Self {
        Self { app }
    }
}

impl HotkeyRegistry for GlobalShortcutRegistry {
    fn register(&mut self, chord: &str) -> Result<()> {
        let shortcut: Shortcut = chord
            .parse()
            .with_context(|| format!("'{chord}' is not a valid key chord"))?;
        self.app
            .global_shortcut()
            .register(shortcut)
            .with_context(|| format!("registering hotkey '{chord}'"))?;
        tracing::info!("Registered hotkey '{chord}'");
        Ok(())
    }

    fn unregister_all(&mut self) -> Result<()> {
        self.app
            .global_shortcut()
            .unregister_all()
            .context("unregistering hotkeys")
    }
}
