//! Blocking firewall jobs and their reports.
//!
//! A job runs on the blocking pool, then posts exactly one
//! [`Command::Finished`] back to the dispatcher, even if the job panicked.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::config;
use crate::firewall::{BackendError, RuleBackend};

use super::Command;

/// Unit of backend work dispatched by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Job {
    /// Startup: probe the mechanism and read the current state.
    Refresh,
    /// Remove (`want_allowed`) or create the block rule.
    Toggle { want_allowed: bool, target: String },
    /// Recreate an active rule scoped to a new target.
    Retarget { target: String },
}

impl Job {
    pub fn loading_message(&self) -> &'static str {
        match self {
            Job::Refresh => config::CHECKING_MESSAGE,
            Job::Toggle { .. } | Job::Retarget { .. } => config::WORKING_MESSAGE,
        }
    }
}

/// What a job did and what the firewall looked like afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct JobReport {
    pub job: Job,
    /// Mutation result; `None` when the job had nothing to mutate.
    pub outcome: Option<Result<bool, BackendError>>,
    /// Reconciliation query: `Ok(true)` = rule present and enabled.
    pub observed_blocked: Result<bool, BackendError>,
}

impl JobReport {
    /// Report for a job whose worker died before finishing, carrying the
    /// state queried afterwards.
    pub fn aborted(job: Job, reason: String, observed_blocked: Result<bool, BackendError>) -> Self {
        Self {
            job,
            outcome: Some(Err(BackendError::Aborted(reason))),
            observed_blocked,
        }
    }
}

/// Run `job` on the blocking pool and report back on `commands`.
pub(super) fn spawn(backend: Arc<dyn RuleBackend>, job: Job, commands: UnboundedSender<Command>) {
    tokio::spawn(async move {
        let work = job.clone();
        let worker_backend = Arc::clone(&backend);
        let report =
            match tokio::task::spawn_blocking(move || run(worker_backend.as_ref(), work)).await {
                Ok(report) => report,
                Err(e) => {
                    tracing::error!("Firewall worker for {job:?} died: {e}");
                    let observed = observe(backend).await;
                    JobReport::aborted(job, e.to_string(), observed)
                }
            };
        if commands.send(Command::Finished(report)).is_err() {
            tracing::warn!("Dispatcher stopped before a job report was delivered");
        }
    });
}

/// Query ground truth on a fresh blocking task after a worker died.
async fn observe(backend: Arc<dyn RuleBackend>) -> Result<bool, BackendError> {
    match tokio::task::spawn_blocking(move || backend.is_blocked()).await {
        Ok(observed) => observed,
        Err(e) => Err(BackendError::Aborted(e.to_string())),
    }
}

/// Perform `job` synchronously, then query ground truth regardless of outcome.
pub fn run(backend: &dyn RuleBackend, job: Job) -> JobReport {
    let outcome = match &job {
        Job::Refresh => backend.probe().err().map(Err),
        Job::Toggle {
            want_allowed: true, ..
        } => Some(backend.unblock()),
        Job::Toggle {
            want_allowed: false,
            target,
        } => Some(backend.block(Path::new(target))),
        Job::Retarget { target } => match backend.is_blocked() {
            Ok(true) => Some(backend.block(Path::new(target))),
            Ok(false) => None,
            Err(e) => Some(Err(e)),
        },
    };
    let observed_blocked = backend.is_blocked();
    JobReport {
        job,
        outcome,
        observed_blocked,
    }
}
