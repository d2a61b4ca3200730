//! Firewall rule backend.
//!
//! The app owns exactly one rule, identified by [`crate::config::RULE_NAME`].
//! Backends expose four primitives (exists, enabled, create, delete); the
//! block/unblock semantics are built on top of them here so every backend
//! gets the same replace-not-merge behavior.
//!
//! - Windows: PowerShell `*-NetFirewallRule` cmdlets (`powershell`)

pub mod powershell;

#[cfg(test)]
pub(crate) mod fake;

use std::path::Path;

pub use powershell::PowerShellBackend;

/// Failure to obtain an answer from the firewall mechanism.
///
/// A mechanism that ran and reported a failed mutation is not an error: the
/// mutation methods return `Ok(false)` for that.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The mechanism could not be invoked at all (tool missing, spawn denied).
    #[error("firewall backend unavailable: {0}")]
    Unavailable(String),

    /// A query ran but exited unsuccessfully.
    #[error("firewall command failed: {0}")]
    CommandFailed(String),

    /// A query ran but its output could not be understood.
    #[error("unexpected firewall output: {0}")]
    UnexpectedOutput(String),

    /// The worker running the operation died before reporting.
    #[error("firewall operation aborted: {0}")]
    Aborted(String),
}

/// Synchronous access to the single owned firewall rule.
///
/// Every call may take hundreds of milliseconds (process spawn + system call),
/// so callers must keep these off the command dispatcher.
pub trait RuleBackend: Send + Sync {
    /// `true` if a rule with the owned name is present, enabled or not.
    fn rule_exists(&self) -> Result<bool, BackendError>;

    /// `false` if no rule exists, otherwise the rule's enabled flag.
    fn rule_enabled(&self) -> Result<bool, BackendError>;

    /// Create an outbound block rule scoped to `target`. `Ok(false)` if creation failed.
    fn create_block_rule(&self, target: &Path) -> Result<bool, BackendError>;

    /// Delete every rule with the owned name. Absence of a rule is success.
    fn delete_rule(&self) -> Result<bool, BackendError>;

    /// Check that the mechanism can be invoked at all.
    fn probe(&self) -> Result<(), BackendError> {
        Ok(())
    }

    /// Replace any existing rule with a fresh block rule scoped to `target`.
    ///
    /// A failed delete is logged but not fatal; only creation decides the result.
    /// Between the delete and the create no rule is in place.
    fn block(&self, target: &Path) -> Result<bool, BackendError> {
        match self.delete_rule() {
            Ok(true) => {}
            Ok(false) => tracing::warn!("Deleting previous rule failed; creating anyway"),
            Err(e) => tracing::warn!("Deleting previous rule failed: {e}; creating anyway"),
        }
        let created = self.create_block_rule(target)?;
        if created {
            tracing::info!("Blocked outbound traffic for {}", target.display());
        } else {
            tracing::warn!("Creating block rule for {} failed", target.display());
        }
        Ok(created)
    }

    /// Remove the rule so traffic flows again. Idempotent.
    fn unblock(&self) -> Result<bool, BackendError> {
        let deleted = self.delete_rule()?;
        if deleted {
            tracing::info!("Outbound traffic allowed (rule removed)");
        }
        Ok(deleted)
    }

    /// Ground truth used for reconciliation: rule present and enabled.
    fn is_blocked(&self) -> Result<bool, BackendError> {
        Ok(self.rule_exists()? && self.rule_enabled()?)
    }
}
