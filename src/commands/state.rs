//! Shared application state managed by Tauri.

use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;

use crate::controller::Command;
use crate::error::AppError;
use crate::settings::SettingsStore;
use crate::view::ViewState;

/// Shared application state managed by Tauri.
///
/// Holds only the sending half of the controller queue; all switch state
/// lives inside the dispatcher task.
pub struct AppState {
    pub commands: UnboundedSender<Command>,
    pub settings: SettingsStore,
}

impl AppState {
    /// Enqueue a fire-and-forget command.
    pub fn send(&self, command: Command) -> Result<(), AppError> {
        self.commands
            .send(command)
            .map_err(|_| AppError::Io("switch dispatcher is not running".into()))
    }

    /// Enqueue a command built around a reply channel and wait for the answer.
    pub async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, AppError> {
        let (reply, rx) = oneshot::channel();
        self.send(build(reply))?;
        Ok(rx.await?)
    }
}
