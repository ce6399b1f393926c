use std::process::ExitCode;

/// Exit status for CLI commands.
///
/// - `Success` (0): Command completed, at most warnings were reported
/// - `Failure` (1): Command completed but reported error-level issues
/// - `Error` (2): Command failed (invalid config, unreadable source root)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Command completed, at most warnings were reported.
    Success,
    /// Command completed but reported error-level issues.
    Failure,
    /// Command failed before a pass could finish.
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
