//! Pure decision functions used by the controller.
//!
//! These take plain parameters and can be unit-tested without a runtime.

use crate::config;
use crate::error::AppError;
use crate::firewall::BackendError;

/// What a hotkey-change request asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HotkeyInput {
    /// Leave the current binding untouched.
    Cancel,
    /// Remove the binding.
    Clear,
    /// Replace the binding with this chord.
    Bind(String),
}

/// `true` if `path` looks like an executable. Only the suffix is checked.
pub fn is_executable_path(path: &str) -> bool {
    path.trim()
        .to_ascii_lowercase()
        .ends_with(config::EXECUTABLE_SUFFIX)
}

/// Reject targets the firewall rule cannot be scoped to.
pub fn validate_target(path: &str) -> Result<(), AppError> {
    if is_executable_path(path) {
        return Ok(());
    }
    Err(AppError::Validation(format!(
        "The target '{}' is not an {} file. Choose the game executable first.",
        path.trim(),
        config::EXECUTABLE_SUFFIX
    )))
}

/// Interpret the chord string sent by the key-capture dialog.
pub fn parse_hotkey_input(chord: Option<&str>) -> HotkeyInput {
    match chord.map(str::trim) {
        None | Some("") => HotkeyInput::Clear,
        Some(c) if c.eq_ignore_ascii_case(config::HOTKEY_CANCEL_CHORD) => HotkeyInput::Cancel,
        Some(c) => HotkeyInput::Bind(c.to_string()),
    }
}

/// Map a mutation outcome to the error to surface, if any.
pub fn mutation_error(outcome: &Result<bool, BackendError>) -> Option<AppError> {
    match outcome {
        Ok(true) => None,
        Ok(false) => Some(AppError::OperationFailed(
            "The firewall command reported a failure.".into(),
        )),
        Err(e) => Some(e.clone().into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_executable_suffix_is_case_insensitive() {
        assert!(is_executable_path(r"C:\Games\MonsterHunterWilds.exe"));
        assert!(is_executable_path(r"C:\Games\GAME.EXE"));
        assert!(is_executable_path("  game.Exe  "));
    }

    #[test]
    fn test_non_executables_rejected() {
        assert!(!is_executable_path(""));
        assert!(!is_executable_path(r"C:\Games\readme.txt"));
        assert!(!is_executable_path(r"C:\Games\game.exe.bak"));
        assert!(!is_executable_path(r"C:\Games\exe"));
    }

    #[test]
    fn test_validate_target_reports_validation_kind() {
        assert!(validate_target(r"C:\g.exe").is_ok());
        assert_eq!(validate_target("game.lnk").unwrap_err().kind(), "Validation");
    }

    #[test]
    fn test_parse_hotkey_input() {
        assert_eq!(parse_hotkey_input(None), HotkeyInput::Clear);
        assert_eq!(parse_hotkey_input(Some("   ")), HotkeyInput::Clear);
        assert_eq!(parse_hotkey_input(Some("Esc")), HotkeyInput::Cancel);
        assert_eq!(
            parse_hotkey_input(Some(" ctrl+shift+F9 ")),
            HotkeyInput::Bind("ctrl+shift+F9".into())
        );
    }

    #[test]
    fn test_mutation_error_taxonomy() {
        assert!(mutation_error(&Ok(true)).is_none());
        assert_eq!(mutation_error(&Ok(false)).unwrap().kind(), "OperationFailed");
        assert_eq!(
            mutation_error(&Err(BackendError::Unavailable("spawn".into())))
                .unwrap()
                .kind(),
            "BackendUnavailable"
        );
    }
}
