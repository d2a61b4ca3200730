//! In-memory [`RuleBackend`] with scriptable failures, for tests.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{BackendError, RuleBackend};

#[derive(Debug, Clone, PartialEq)]
pub struct FakeRule {
    pub program: String,
    pub enabled: bool,
}

/// Failure switches flipped by tests.
#[derive(Debug, Default)]
pub struct Script {
    /// Every call fails as if PowerShell were missing.
    pub unavailable: bool,
    /// `create_block_rule` returns `Ok(false)`.
    pub fail_create: bool,
    /// `delete_rule` returns `Ok(false)`.
    pub fail_delete: bool,
    /// `rule_exists` / `rule_enabled` fail.
    pub fail_queries: bool,
    /// Mutations panic, simulating a crashed worker.
    pub panic_on_mutation: bool,
}

#[derive(Default)]
pub struct FakeBackend {
    rules: Mutex<Vec<FakeRule>>,
    script: Mutex<Script>,
    mutations: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(program: &str, enabled: bool) -> Self {
        let backend = Self::new();
        backend.rules.lock().unwrap().push(FakeRule {
            program: program.to_string(),
            enabled,
        });
        backend
    }

    pub fn script(&self, edit: impl FnOnce(&mut Script)) {
        edit(&mut self.script.lock().unwrap());
    }

    pub fn rules(&self) -> Vec<FakeRule> {
        self.rules.lock().unwrap().clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), BackendError> {
        if self.script.lock().unwrap().unavailable {
            return Err(BackendError::Unavailable("powershell not found".into()));
        }
        Ok(())
    }

    fn check_query(&self) -> Result<(), BackendError> {
        self.check_available()?;
        if self.script.lock().unwrap().fail_queries {
            return Err(BackendError::CommandFailed("Get-NetFirewallRule exited 1".into()));
        }
        Ok(())
    }

    fn begin_mutation(&self) -> Result<(), BackendError> {
        self.check_available()?;
        self.mutations.fetch_add(1, Ordering::SeqCst);
        if self.script.lock().unwrap().panic_on_mutation {
            panic!("simulated worker crash");
        }
        Ok(())
    }
}

impl RuleBackend for FakeBackend {
    fn rule_exists(&self) -> Result<bool, BackendError> {
        self.check_query()?;
        Ok(!self.rules.lock().unwrap().is_empty())
    }

    fn rule_enabled(&self) -> Result<bool, BackendError> {
        self.check_query()?;
        Ok(self
            .rules
            .lock()
            .unwrap()
            .first()
            .map(|r| r.enabled)
            .unwrap_or(false))
    }

    fn create_block_rule(&self, target: &Path) -> Result<bool, BackendError> {
        self.begin_mutation()?;
        if self.script.lock().unwrap().fail_create {
            return Ok(false);
        }
        self.rules.lock().unwrap().push(FakeRule {
            program: target.to_string_lossy().into_owned(),
            enabled: true,
        });
        Ok(true)
    }

    fn delete_rule(&self) -> Result<bool, BackendError> {
        self.begin_mutation()?;
        if self.script.lock().unwrap().fail_delete {
            return Ok(false);
        }
        self.rules.lock().unwrap().clear();
        Ok(true)
    }

    fn probe(&self) -> Result<(), BackendError> {
        self.check_available()
    }
}
