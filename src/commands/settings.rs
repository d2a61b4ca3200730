//! Target path and hotkey commands.

use tauri::State;
use tauri_plugin_opener::OpenerExt;

use crate::controller::Command;
use crate::error::AppError;
use crate::view::ViewState;

use super::state::AppState;

/// Point the block rule at a new executable.
#[tauri::command]
pub async fn set_target_path(
    state: State<'_, AppState>,
    path: String,
) -> Result<ViewState, AppError> {
    state
        .request(|reply| Command::ChangeTarget { path, reply })
        .await?
}

/// Bind (`"ctrl+shift+F9"`), clear (`""` / null), or keep (`"esc"`) the hotkey.
#[tauri::command]
pub async fn set_hotkey(
    state: State<'_, AppState>,
    chord: Option<String>,
) -> Result<ViewState, AppError> {
    state
        .request(|reply| Command::ChangeHotkey { chord, reply })
        .await?
}

/// Show the target executable in the file manager.
#[tauri::command]
pub async fn reveal_target(app: tauri::AppHandle, state: State<'_, AppState>) -> Result<(), AppError> {
    let view = state.request(|reply| Command::Snapshot { reply }).await?;
    if view.target_path.is_empty() {
        return Err(AppError::Validation("No target executable set.".into()));
    }
    app.opener()
        .reveal_item_in_dir(&view.target_path)
        .map_err(|e| AppError::Io(e.to_string()))
}

/// Location of the settings file, shown in the window footer.
#[tauri::command]
pub fn get_settings_path(state: State<'_, AppState>) -> Result<String, AppError> {
    Ok(state.settings.path().display().to_string())
}
