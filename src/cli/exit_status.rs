use std::process::ExitCode;

/// Exit status for CLI commands.
///
/// - `Success` (0): Nothing left to convert, no problems found
/// - `Failure` (1): Pending changes in dry-run mode, or markers that could not be resolved
/// - `Error` (2): A file could not be parsed, read or written, or the configuration is invalid
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Nothing left to convert, no problems found.
    Success,
    /// Pending changes or unresolved markers.
    Failure,
    /// Parse, I/O or configuration error.
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
