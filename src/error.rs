//! Unified error type for IPC command handlers and user notifications.
//!
//! `AppError` is returned by every `#[tauri::command]` function and is the
//! payload behind every error notification. It serializes as
//! `{ "kind": "...", "message": "..." }` so the frontend can tell categories apart.

use serde::ser::SerializeStruct;

use crate::firewall::BackendError;

/// Application-level error surfaced to the window.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AppError {
    /// Target path is not an executable; no state change was attempted.
    #[error("{0}")]
    Validation(String),

    /// The firewall mechanism could not be invoked at all.
    #[error("{0}")]
    BackendUnavailable(String),

    /// The firewall mechanism ran but reported failure.
    #[error("{0}")]
    OperationFailed(String),

    /// The post-operation state query failed; the displayed state is a best guess.
    #[error("{0}")]
    QueryFailed(String),

    /// Another firewall operation is still in flight.
    #[error("{0}")]
    Busy(String),

    /// Global hotkey registration failed.
    #[error("{0}")]
    Hotkey(String),

    /// Settings file could not be read or written.
    #[error("{0}")]
    Settings(String),

    /// I/O and OS-level errors (opener, dispatcher channel).
    #[error("{0}")]
    Io(String),
}

impl AppError {
    /// Returns the error kind as a string matching the variant name.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "Validation",
            AppError::BackendUnavailable(_) => "BackendUnavailable",
            AppError::OperationFailed(_) => "OperationFailed",
            AppError::QueryFailed(_) => "QueryFailed",
            AppError::Busy(_) => "Busy",
            AppError::Hotkey(_) => "Hotkey",
            AppError::Settings(_) => "Settings",
            AppError::Io(_) => "Io",
        }
    }
}

/// Custom Serialize: produces `{ "kind": "Variant", "message": "..." }` for the frontend.
impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut s = serializer.serialize_struct("AppError", 2)?;
        s.serialize_field("kind", self.kind())?;
        s.serialize_field("message", &self.to_string())?;
        s.end()
    }
}

// ---- From implementations for ergonomic error conversion ----

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Unavailable(_) => AppError::BackendUnavailable(err.to_string()),
            BackendError::CommandFailed(_) | BackendError::Aborted(_) => {
                AppError::OperationFailed(err.to_string())
            }
            BackendError::UnexpectedOutput(_) => AppError::QueryFailed(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Io(format!("{err:#}"))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<tokio::sync::oneshot::error::RecvError> for AppError {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        AppError::Io("switch dispatcher stopped before replying".into())
    }
}
