//! The toggle controller: single owner of the switch state.
//!
//! Every input (window click, space key, tray menu, global hotkey, IPC call)
//! arrives as a [`Command`] on one unbounded queue. Only
//! [`ToggleController::handle`] touches the busy flag, the displayed state,
//! the target path, or the hotkey binding. Backend calls run on blocking
//! workers that report back through the same queue.
//!
//! States: `Allowed` and `Blocked` are stable, `Toggling` (busy) is transient.
//! Toggle requests arriving while busy are dropped, not queued.

mod logic;
mod worker;

use std::ops::ControlFlow;
use std::sync::Arc;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;

use crate::config;
use crate::error::AppError;
use crate::firewall::RuleBackend;
use crate::hotkey::HotkeyRegistry;
use crate::settings::{Settings, SettingsStore};
use crate::view::{Notification, View, ViewState};

pub use logic::{parse_hotkey_input, validate_target, HotkeyInput};
pub use worker::{Job, JobReport};

/// Reply channel for commands the caller waits on.
pub type Reply<T> = oneshot::Sender<Result<T, AppError>>;

/// Everything the dispatcher can be asked to do.
#[derive(Debug)]
pub enum Command {
    /// Switch to the given state.
    Toggle { want_allowed: bool },
    /// Flip whatever is currently displayed (click, space, tray, hotkey).
    ToggleCurrent,
    /// Point the rule at a new executable.
    ChangeTarget { path: String, reply: Reply<ViewState> },
    /// Rebind, clear, or keep the global hotkey.
    ChangeHotkey {
        chord: Option<String>,
        reply: Reply<ViewState>,
    },
    /// Re-read the firewall state.
    Refresh,
    /// Current view state for a newly loaded window.
    Snapshot { reply: oneshot::Sender<ViewState> },
    /// A worker finished.
    Finished(JobReport),
    /// Tear down hotkeys and stop the dispatcher.
    Shutdown,
}

/// Single-consumer state machine behind the switch.
pub struct ToggleController {
    backend: Arc<dyn RuleBackend>,
    view: Box<dyn View>,
    hotkeys: Box<dyn HotkeyRegistry>,
    settings: SettingsStore,
    commands: UnboundedSender<Command>,
    target: String,
    hotkey: Option<String>,
    allowed: bool,
    /// Loading text of the job in flight; `Some` exactly while busy.
    busy: Option<&'static str>,
    /// Appended to the status line when the state is not confirmed.
    note: Option<String>,
}

impl ToggleController {
    pub fn new(
        backend: Arc<dyn RuleBackend>,
        view: Box<dyn View>,
        hotkeys: Box<dyn HotkeyRegistry>,
        settings: SettingsStore,
        initial: Settings,
        commands: UnboundedSender<Command>,
    ) -> Self {
        Self {
            backend,
            view,
            hotkeys,
            settings,
            commands,
            hotkey: initial.hotkey().map(str::to_string),
            target: initial.game_exe,
            allowed: true,
            busy: None,
            note: None,
        }
    }

    /// Consume commands until [`Command::Shutdown`] or every sender is gone.
    pub async fn run(mut self, mut commands: UnboundedReceiver<Command>) {
        self.start();
        while let Some(command) = commands.recv().await {
            if self.handle(command).is_break() {
                break;
            }
        }
        tracing::info!("Switch dispatcher stopped");
    }

    /// Register the persisted hotkey and read the initial firewall state.
    pub fn start(&mut self) {
        if let Some(chord) = self.hotkey.clone() {
            if let Err(e) = self.hotkeys.register(&chord) {
                let err = AppError::Hotkey(format!("{e:#}"));
                self.view.notify(&Notification::warning("Hotkey not registered", &err));
            }
        }
        self.dispatch(Job::Refresh);
    }

    pub fn handle(&mut self, command: Command) -> ControlFlow<()> {
        match command {
            Command::Toggle { want_allowed } => self.request_toggle(want_allowed),
            Command::ToggleCurrent => self.toggle_current(),
            Command::ChangeTarget { path, reply } => {
                let _ = reply.send(self.change_target(path));
            }
            Command::ChangeHotkey { chord, reply } => {
                let _ = reply.send(self.change_hotkey(chord));
            }
            Command::Refresh => {
                if self.busy.is_none() {
                    self.dispatch(Job::Refresh);
                }
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.view_state());
            }
            Command::Finished(report) => self.finish(report),
            Command::Shutdown => {
                self.shutdown();
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    #[cfg(test)]
    pub fn is_busy(&self) -> bool {
        self.busy.is_some()
    }

    #[cfg(test)]
    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    pub fn view_state(&self) -> ViewState {
        ViewState::build(
            self.allowed,
            self.busy,
            self.note.as_deref(),
            &self.target,
            self.hotkey.as_deref(),
        )
    }

    /// Accept a toggle unless busy (silently dropped) or the target is invalid.
    pub fn request_toggle(&mut self, want_allowed: bool) {
        if self.busy.is_some() {
            tracing::debug!("Toggle request dropped: operation in flight");
            return;
        }
        if let Err(err) = validate_target(&self.target) {
            self.view.notify(&Notification::error("Invalid target", &err));
            return;
        }
        tracing::info!(want_allowed, "Toggle accepted");
        self.dispatch(Job::Toggle {
            want_allowed,
            target: self.target.clone(),
        });
    }

    pub fn toggle_current(&mut self) {
        self.request_toggle(!self.allowed);
    }

    /// Store a new target; an active rule is recreated for it on a worker.
    pub fn change_target(&mut self, path: String) -> Result<ViewState, AppError> {
        if self.busy.is_some() {
            return Err(AppError::Busy(
                "A firewall operation is in progress. Try again when it finishes.".into(),
            ));
        }
        let path = path.trim().to_string();
        if path.is_empty() {
            return Err(AppError::Validation("No target path given.".into()));
        }

        self.target = path;
        tracing::info!("Target changed to {}", self.target);
        if let Err(e) = self.settings.save_game_exe(&self.target) {
            self.persist_failed(e);
        }

        // The worker checks whether a rule is active; an active rule follows
        // the new path whatever its suffix.
        self.dispatch(Job::Retarget {
            target: self.target.clone(),
        });
        Ok(self.view_state())
    }

    /// Apply a chord from the key-capture dialog with atomic replace.
    pub fn change_hotkey(&mut self, chord: Option<String>) -> Result<ViewState, AppError> {
        match parse_hotkey_input(chord.as_deref()) {
            HotkeyInput::Cancel => return Ok(self.view_state()),
            HotkeyInput::Clear => {
                self.hotkeys
                    .unregister_all()
                    .map_err(|e| AppError::Hotkey(format!("{e:#}")))?;
                self.hotkey = None;
                tracing::info!("Hotkey cleared");
            }
            HotkeyInput::Bind(chord) => {
                self.rebind(&chord)?;
                self.hotkey = Some(chord);
            }
        }
        if let Err(e) = self.settings.save_hotkey(self.hotkey.as_deref()) {
            self.persist_failed(e);
        }
        self.render();
        Ok(self.view_state())
    }

    fn rebind(&mut self, chord: &str) -> Result<(), AppError> {
        self.hotkeys
            .unregister_all()
            .map_err(|e| AppError::Hotkey(format!("{e:#}")))?;
        if let Err(e) = self.hotkeys.register(chord) {
            if let Some(previous) = &self.hotkey {
                if let Err(restore) = self.hotkeys.register(previous) {
                    tracing::warn!("Could not restore hotkey '{previous}': {restore:#}");
                }
            }
            return Err(AppError::Hotkey(format!("{e:#}")));
        }
        Ok(())
    }

    fn shutdown(&mut self) {
        if let Err(e) = self.hotkeys.unregister_all() {
            tracing::warn!("Hotkey teardown failed: {e:#}");
        }
    }

    fn dispatch(&mut self, job: Job) {
        self.busy = Some(job.loading_message());
        self.render();
        worker::spawn(Arc::clone(&self.backend), job, self.commands.clone());
    }

    /// Reconcile from the worker's query; release the busy flag on every path.
    fn finish(&mut self, report: JobReport) {
        let JobReport {
            job,
            outcome,
            observed_blocked,
        } = report;
        self.busy = None;

        match observed_blocked {
            Ok(blocked) => {
                self.allowed = !blocked;
                self.note = None;
            }
            Err(e) => {
                if let Job::Toggle { want_allowed, .. } = job {
                    self.allowed = want_allowed;
                }
                self.note = Some(config::UNCONFIRMED_NOTE.to_string());
                let err = AppError::QueryFailed(format!("Could not read the firewall state: {e}"));
                self.view
                    .notify(&Notification::warning("State not confirmed", &err));
            }
        }

        if let Some(err) = outcome.as_ref().and_then(logic::mutation_error) {
            let notification = match job {
                Job::Toggle { .. } => Notification::error("Toggle failed", &err),
                Job::Retarget { .. } => {
                    Notification::warning("Block rule not recreated for the new path", &err)
                }
                Job::Refresh => Notification::error("Firewall unavailable", &err),
            };
            self.view.notify(&notification);
        }

        tracing::info!(allowed = self.allowed, "Switch state reconciled");
        self.render();
    }

    fn persist_failed(&mut self, e: anyhow::Error) {
        let err = AppError::Settings(format!("{e:#}"));
        self.view
            .notify(&Notification::warning("Settings not saved", &err));
    }

    fn render(&mut self) {
        let state = self.view_state();
        self.view.render(&state);
    }
}
