//! Windows Firewall access through PowerShell `*-NetFirewallRule` cmdlets.
//!
//! Each operation spawns `powershell -NoProfile -Command ...` with console
//! output forced to UTF-8, then matches a marker word in stdout. The script
//! builders and parsers are plain functions so they can be tested anywhere.

use std::path::Path;
use std::process::Command;

#[cfg(windows)]
use std::os::windows::process::CommandExt;

use super::{BackendError, RuleBackend};

/// Keeps child processes from flashing a console window.
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

const UTF8_PREFIX: &str =
    "[Console]::OutputEncoding=[Text.Encoding]::UTF8; $OutputEncoding=[Text.Encoding]::UTF8; ";

/// Result of one PowerShell invocation.
#[derive(Debug)]
struct ScriptOutput {
    success: bool,
    stdout: String,
    stderr: String,
}

/// [`RuleBackend`] driving the Windows Firewall through PowerShell.
pub struct PowerShellBackend {
    program: String,
    rule_name: String,
}

impl PowerShellBackend {
    pub fn new(rule_name: &str) -> Self {
        Self::with_program("powershell", rule_name)
    }

    /// Use a specific shell binary (e.g. `pwsh`).
    pub fn with_program(program: &str, rule_name: &str) -> Self {
        Self {
            program: program.to_string(),
            rule_name: rule_name.to_string(),
        }
    }

    fn run(&self, script: &str) -> Result<ScriptOutput, BackendError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(["-NoProfile", "-ExecutionPolicy", "Bypass", "-Command"])
            .arg(format!("{UTF8_PREFIX}{script}"));
        #[cfg(windows)]
        {
            cmd.creation_flags(CREATE_NO_WINDOW);
        }

        let output = cmd.output().map_err(|e| {
            BackendError::Unavailable(format!("failed to spawn {}: {e}", self.program))
        })?;

        let result = ScriptOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        tracing::debug!(
            success = result.success,
            stdout = %result.stdout.trim(),
            "powershell finished"
        );
        Ok(result)
    }

    fn run_query(&self, script: &str) -> Result<String, BackendError> {
        let output = self.run(script)?;
        if !output.success {
            return Err(BackendError::CommandFailed(summarize_stderr(&output.stderr)));
        }
        Ok(output.stdout)
    }

    fn run_mutation(&self, script: &str) -> Result<bool, BackendError> {
        let output = self.run(script)?;
        if !output.success {
            tracing::warn!("Firewall command failed: {}", summarize_stderr(&output.stderr));
        }
        Ok(output.success)
    }
}

impl RuleBackend for PowerShellBackend {
    fn rule_exists(&self) -> Result<bool, BackendError> {
        let stdout = self.run_query(&exists_script(&self.rule_name))?;
        Ok(parse_exists(&stdout))
    }

    fn rule_enabled(&self) -> Result<bool, BackendError> {
        let stdout = self.run_query(&enabled_script(&self.rule_name))?;
        parse_enabled(&stdout)
    }

    fn create_block_rule(&self, target: &Path) -> Result<bool, BackendError> {
        let program = target.to_string_lossy();
        self.run_mutation(&create_block_script(&self.rule_name, &program))
    }

    fn delete_rule(&self) -> Result<bool, BackendError> {
        self.run_mutation(&delete_script(&self.rule_name))
    }

    fn probe(&self) -> Result<(), BackendError> {
        let stdout = self.run_query("$PSVersionTable.PSVersion.Major")?;
        tracing::info!("PowerShell {} available", stdout.trim());
        Ok(())
    }
}

/// Wrap `value` in a single-quoted PowerShell literal, doubling embedded quotes.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

pub fn exists_script(rule_name: &str) -> String {
    format!(
        "Get-NetFirewallRule -DisplayName {} -ErrorAction SilentlyContinue | \
         Select-Object -First 1 | ForEach-Object {{ 'YES' }}",
        quote(rule_name)
    )
}

pub fn enabled_script(rule_name: &str) -> String {
    format!(
        "$r = Get-NetFirewallRule -DisplayName {} -ErrorAction SilentlyContinue | Select-Object -First 1; \
         if ($r) {{ if ($r.Enabled -eq 'True') {{ 'ENABLED' }} else {{ 'DISABLED' }} }} else {{ 'NO_RULE' }}",
        quote(rule_name)
    )
}

pub fn create_block_script(rule_name: &str, program: &str) -> String {
    format!(
        "New-NetFirewallRule -DisplayName {} -Direction Outbound -Program {} -Action Block -Enabled True",
        quote(rule_name),
        quote(program)
    )
}

pub fn delete_script(rule_name: &str) -> String {
    format!(
        "Get-NetFirewallRule -DisplayName {} -ErrorAction SilentlyContinue | Remove-NetFirewallRule",
        quote(rule_name)
    )
}

pub fn parse_exists(stdout: &str) -> bool {
    stdout.lines().any(|line| line.trim() == "YES")
}

pub fn parse_enabled(stdout: &str) -> Result<bool, BackendError> {
    match stdout.trim().to_ascii_uppercase().as_str() {
        "ENABLED" => Ok(true),
        "DISABLED" | "NO_RULE" => Ok(false),
        other => Err(BackendError::UnexpectedOutput(other.to_string())),
    }
}

/// First non-empty stderr line, which carries the cmdlet's error message.
fn summarize_stderr(stderr: &str) -> String {
    stderr
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("exited with non-zero status")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_doubles_single_quotes() {
        assert_eq!(quote("plain"), "'plain'");
        assert_eq!(quote(r"C:\Bob's Games\g.exe"), r"'C:\Bob''s Games\g.exe'");
    }

    #[test]
    fn test_create_script_scopes_outbound_block_to_program() {
        let script = create_block_script("Rule", r"C:\Games\game.exe");
        assert!(script.starts_with("New-NetFirewallRule -DisplayName 'Rule'"));
        assert!(script.contains("-Direction Outbound"));
        assert!(script.contains(r"-Program 'C:\Games\game.exe'"));
        assert!(script.contains("-Action Block"));
        assert!(script.contains("-Enabled True"));
    }

    #[test]
    fn test_delete_script_ignores_missing_rule() {
        let script = delete_script("Rule");
        assert!(script.contains("-ErrorAction SilentlyContinue"));
        assert!(script.ends_with("| Remove-NetFirewallRule"));
    }

    #[test]
    fn test_query_scripts_target_rule_name() {
        assert!(exists_script("My Rule").contains("-DisplayName 'My Rule'"));
        assert!(enabled_script("My Rule").contains("-DisplayName 'My Rule'"));
    }

    #[test]
    fn test_parse_exists() {
        assert!(parse_exists("YES\r\n"));
        assert!(!parse_exists(""));
        assert!(!parse_exists("   \r\n"));
        assert!(!parse_exists("NOPE"));
    }

    #[test]
    fn test_parse_enabled_markers() {
        assert_eq!(parse_enabled("ENABLED\r\n"), Ok(true));
        assert_eq!(parse_enabled("disabled"), Ok(false));
        assert_eq!(parse_enabled("NO_RULE"), Ok(false));
    }

    #[test]
    fn test_parse_enabled_rejects_garbage() {
        assert!(matches!(
            parse_enabled("Get-NetFirewallRule : Access is denied"),
            Err(BackendError::UnexpectedOutput(_))
        ));
    }

    #[test]
    fn test_summarize_stderr_picks_first_message_line() {
        assert_eq!(summarize_stderr("\n  Access is denied.\nat line:1"), "Access is denied.");
        assert_eq!(summarize_stderr(""), "exited with non-zero status");
    }

    #[test]
    fn test_missing_shell_is_reported_unavailable() {
        let backend = PowerShellBackend::with_program("net-switch-no-such-shell", "Rule");
        assert!(matches!(backend.rule_exists(), Err(BackendError::Unavailable(_))));
        assert!(matches!(backend.delete_rule(), Err(BackendError::Unavailable(_))));
        assert!(matches!(backend.probe(), Err(BackendError::Unavailable(_))));
    }
}
