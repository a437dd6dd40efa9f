use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

/// Minsh utility extensions for `ExitStatus`.
///
/// The shell keeps the last foreground termination around as a plain
/// `ExitStatus` so that both exit codes and terminating signals survive
/// until the `status` builtin asks for them.
pub trait MinshExitStatusExt {
    /// Create an ExitStatus to indicate *successful* program execution.
    fn from_success() -> Self;

    /// Create an ExitStatus to indicate *unsuccessful* program execution.
    fn from_failure() -> Self;

    /// Create an ExitStatus from a normal exit code.
    fn from_status(code: i32) -> Self;

    /// Create an ExitStatus from a terminating signal number.
    fn from_signal(signal: i32) -> Self;
}

impl MinshExitStatusExt for ExitStatus {
    fn from_success() -> Self {
        ExitStatus::from_status(0)
    }

    fn from_failure() -> Self {
        ExitStatus::from_status(1)
    }

    fn from_status(code: i32) -> Self {
        ExitStatus::from_raw(code << 8)
    }

    fn from_signal(signal: i32) -> Self {
        ExitStatus::from_raw(signal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_preserves_exit_code() {
        assert!(ExitStatus::from_success().success());
        assert!(!ExitStatus::from_failure().success());
        assert_eq!(ExitStatus::from_status(3).code(), Some(3));
        assert_eq!(ExitStatus::from_status(3).signal(), None);
    }

    #[test]
    fn test_from_signal_preserves_signal() {
        let status = ExitStatus::from_signal(15);
        assert_eq!(status.code(), None);
        assert_eq!(status.signal(), Some(15));
    }
}
