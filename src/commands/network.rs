//! Switch state and toggle commands.

use tauri::State;

use crate::controller::Command;
use crate::error::AppError;
use crate::view::ViewState;

use super::state::AppState;

/// Current view state, for a window that just loaded.
#[tauri::command]
pub async fn get_view_state(state: State<'_, AppState>) -> Result<ViewState, AppError> {
    state.request(|reply| Command::Snapshot { reply }).await
}

/// Ask for a specific state. Dropped while another operation is in flight.
#[tauri::command]
pub fn request_toggle(state: State<'_, AppState>, want_allowed: bool) -> Result<(), AppError> {
    state.send(Command::Toggle { want_allowed })
}

/// Flip the displayed state (click, space key).
#[tauri::command]
pub fn toggle_network(state: State<'_, AppState>) -> Result<(), AppError> {
    state.send(Command::ToggleCurrent)
}

/// Re-read the firewall state.
#[tauri::command]
pub fn refresh_state(state: State<'_, AppState>) -> Result<(), AppError> {
    state.send(Command::Refresh)
}
