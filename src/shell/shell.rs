//! Minsh - Shell Module
//!
//! The Shell itself is responsible for routing parsed commands to builtins
//! or the process launcher and for tracking background jobs between input
//! cycles.

use std::io::{self, Write};
use std::process::{self, ExitStatus};

use failure::ResultExt;
use nix::sys::signal::Signal;
use nix::unistd::Pid;

use crate::core::command::CommandSpec;
use crate::errors::{ErrorKind, Result};
use crate::shell::{builtins, execute_command, job_control::JobTable, signals};
use crate::util::MinshExitStatusExt;

const PROMPT: &str = ": ";
const BACKGROUND_JOB_CAPACITY: usize = 200;

/// Minsh Shell
pub struct Shell {
    jobs: JobTable,
    /// Exit status of the last foreground command executed.
    last_exit_status: ExitStatus,
}

impl Shell {
    /// Constructs a new Shell and installs its signal dispositions.
    pub fn new(config: ShellConfig) -> Result<Shell> {
        signals::initialize_shell_signals()?;
        info!("minsh started up");
        Ok(Shell {
            jobs: JobTable::with_capacity(config.background_job_capacity),
            last_exit_status: ExitStatus::from_success(),
        })
    }

    /// Runs commands from stdin until EOF is received.
    pub fn execute_from_stdin(&mut self) {
        loop {
            // Report background jobs that finished since the last cycle.
            self.jobs.notify_completed();

            let input = match self.prompt() {
                Ok(Some(line)) => line,
                Ok(None) => break,
                e => {
                    log_if_err!(e, "prompt");
                    continue;
                }
            };

            if let Err(e) = self.execute_command_string(&input) {
                // Everything recoverable is handled closer to the failure;
                // what reaches here means no new process can be created.
                eprintln!("minsh: {}", e);
                error!("fatal: {}", e);
                process::exit(1);
            }
        }
    }

    /// Custom prompt to output to the user.
    /// Returns `None` when end of file is reached.
    fn prompt(&mut self) -> Result<Option<String>> {
        print!("{}", PROMPT);
        io::stdout().flush().context(ErrorKind::Io)?;

        let mut line = String::new();
        let bytes_read = io::stdin().read_line(&mut line).context(ErrorKind::Io)?;
        if bytes_read == 0 {
            return Ok(None);
        }

        Ok(Some(line))
    }

    /// Runs a command from a command string.
    pub fn execute_command_string(&mut self, input: &str) -> Result<()> {
        let spec = match CommandSpec::parse(input) {
            Ok(Some(spec)) => spec,
            Ok(None) => return Ok(()),
            Err(e) => {
                if let ErrorKind::Syntax(ref line) = *e.kind() {
                    eprintln!("minsh: syntax error near: {}", line);
                    return Ok(());
                }

                return Err(e);
            }
        };

        self.dispatch(&spec)
    }

    /// Routes a command to a builtin or to the process launcher. Builtins
    /// never create a child process.
    fn dispatch(&mut self, spec: &CommandSpec) -> Result<()> {
        if builtins::is_builtin(spec.program()) {
            builtins::run(self, spec.program(), spec.args(), &mut io::stdout())
        } else {
            let background = effective_background(spec.background(), signals::foreground_only());
            execute_command::launch(self, spec, background)
        }
    }

    pub fn last_exit_status(&self) -> ExitStatus {
        self.last_exit_status
    }

    pub(crate) fn set_last_exit_status(&mut self, status: ExitStatus) {
        self.last_exit_status = status;
    }

    /// Tracks a background pid. Returns `false` when the job table is full
    /// and the job will run untracked.
    pub(crate) fn register_background_job(&mut self, pid: Pid) -> bool {
        self.jobs.register(pid)
    }

    /// Exit the shell.
    ///
    /// Tracked background jobs are sent SIGTERM on the way out; the shell
    /// does not wait for them to die.
    pub fn exit(&mut self) -> ! {
        self.jobs.signal_all(Signal::SIGTERM);
        info!("minsh has shut down");
        process::exit(0);
    }
}

/// Background placement policy, computed once per dispatch: a background
/// request is honored only while foreground-only mode is off.
fn effective_background(requested_background: bool, foreground_only: bool) -> bool {
    requested_background && !foreground_only
}

/// Policy object to control a Shell's behavior
#[derive(Debug, Copy, Clone)]
pub struct ShellConfig {
    /// Maximum number of background jobs tracked at once. Jobs started
    /// beyond this bound still run, but untracked.
    pub background_job_capacity: usize,
}

impl Default for ShellConfig {
    fn default() -> ShellConfig {
        ShellConfig {
            background_job_capacity: BACKGROUND_JOB_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_background() {
        assert!(effective_background(true, false));
        assert!(!effective_background(true, true));
        assert!(!effective_background(false, false));
        assert!(!effective_background(false, true));
    }
}
