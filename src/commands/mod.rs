//! Tauri IPC command handlers, organized by functional domain.
//!
//! - `network`: switch state, toggle requests
//! - `settings`: target path, hotkey, reveal in file manager
//! - `state`: shared `AppState` definition
//!
//! Handlers never touch switch state; they enqueue a controller command.

pub(crate) mod network;
pub(crate) mod settings;
mod state;

pub use state::AppState;
