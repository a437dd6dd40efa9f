use std::os::unix::process::ExitStatusExt;

use crate::shell::builtins::{self, prelude::*};

pub struct Status;

impl BuiltinCommand for Status {
    const NAME: &'static str = builtins::STATUS_NAME;

    /// Reports how the most recent foreground command ended. Has no other
    /// side effect; builtins themselves never change the reported status.
    fn run<T: AsRef<str>>(shell: &mut Shell, _args: &[T], stdout: &mut dyn Write) -> Result<()> {
        let status = shell.last_exit_status();
        match status.signal() {
            Some(signal) => writeln!(stdout, "terminated by signal {}", signal),
            None => writeln!(stdout, "exit value {}", status.code().unwrap_or(0)),
        }
        .context(ErrorKind::Io)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::process::ExitStatus;

    use super::*;
    use crate::shell::shell::ShellConfig;
    use crate::util::MinshExitStatusExt;

    fn run_status(shell: &mut Shell) -> Vec<u8> {
        let mut output = Vec::new();
        Status::run(shell, &[] as &[&str], &mut output).expect("status failed");
        output
    }

    #[test]
    fn test_reports_exit_value() {
        let mut shell = Shell::new(ShellConfig::default()).expect("failed to create shell");
        assert_eq!(&run_status(&mut shell)[..], &b"exit value 0\n"[..]);

        shell.set_last_exit_status(ExitStatus::from_status(3));
        assert_eq!(&run_status(&mut shell)[..], &b"exit value 3\n"[..]);
    }

    #[test]
    fn test_reports_terminating_signal() {
        let mut shell = Shell::new(ShellConfig::default()).expect("failed to create shell");
        shell.set_last_exit_status(ExitStatus::from_signal(15));
        assert_eq!(&run_status(&mut shell)[..], &b"terminated by signal 15\n"[..]);
    }
}
