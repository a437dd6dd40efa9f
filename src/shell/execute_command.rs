//! Spawning and supervising external commands.
//!
//! The child is configured between fork and exec: signal dispositions
//! first, then redirections via raw `dup2`. Anything that goes wrong in
//! that window is fatal to the child alone; the shell only dies when the
//! operating system refuses to create a process at all.

use std::io;
use std::os::unix::io::RawFd;
use std::os::unix::process::{CommandExt, ExitStatusExt};
use std::process::{Child, Command, ExitStatus};

use failure::{Fail, ResultExt};
use nix::fcntl::{self, OFlag};
use nix::libc;
use nix::sys::signal::{self, SigHandler, Signal};
use nix::sys::stat::Mode;
use nix::sys::wait::{self, WaitStatus};
use nix::unistd::{self, Pid};

use crate::core::command::CommandSpec;
use crate::errors::{Error, ErrorKind, Result};
use crate::shell::shell::Shell;
use crate::util::MinshExitStatusExt;

const DEV_NULL: &str = "/dev/null";
const DEV_NULL_INPUT_ERROR: &[u8] = b"cannot open /dev/null for input\n";
const DEV_NULL_OUTPUT_ERROR: &[u8] = b"cannot open /dev/null for output\n";

/// Launches `spec` as an external command.
///
/// A background launch registers the child in the shell's job table and
/// returns immediately; a foreground launch blocks until the child
/// terminates and records the result as the shell's last exit status.
pub fn launch(shell: &mut Shell, spec: &CommandSpec, background: bool) -> Result<()> {
    let child = match spawn_child(spec, background) {
        Ok(child) => child,
        Err(e) => {
            if let ErrorKind::CommandNotFound(ref program) = *e.kind() {
                // Same message-and-status contract as the child's own
                // redirection failures.
                eprintln!("{}: no such file or directory", program);
                shell.set_last_exit_status(ExitStatus::from_failure());
                return Ok(());
            }

            // No process could be created at all; the caller terminates
            // the shell.
            return Err(e);
        }
    };

    let pid = Pid::from_raw(child.id() as libc::pid_t);
    if background {
        println!("background pid is {}", pid);
        if !shell.register_background_job(pid) {
            debug!("job table is full; background pid {} runs untracked", pid);
        }
    } else {
        let status = wait_for_process(pid)?;
        if let Some(signal) = status.signal() {
            println!("terminated by signal {}", signal);
        }
        shell.set_last_exit_status(status);
    }

    Ok(())
}

fn spawn_child(spec: &CommandSpec, background: bool) -> Result<Child> {
    let mut command = Command::new(spec.program());
    command.args(spec.args());

    // Foreground children take the default interrupt disposition back;
    // background children stay immune to the terminal's SIGINT. No child
    // toggles the shell's foreground-only mode.
    let interrupt_disposition = if background {
        SigHandler::SigIgn
    } else {
        SigHandler::SigDfl
    };

    // Error text is preformatted here so the post-fork path performs no
    // allocation.
    let input = spec.input_file().map(|path| {
        let message = format!("cannot open {} for input\n", path).into_bytes();
        (path.to_owned(), message)
    });
    let output = spec.output_file().map(|path| {
        let message = format!("cannot open {} for output\n", path).into_bytes();
        (path.to_owned(), message)
    });

    let child_setup = move || {
        // signal(3) failing here represents programmer error, e.g. an
        // invalid signal argument
        unsafe {
            signal::signal(Signal::SIGINT, interrupt_disposition)
                .expect("failed to set SIGINT disposition");
            signal::signal(Signal::SIGTSTP, SigHandler::SigIgn)
                .expect("failed to set SIGTSTP disposition");
        }

        match input {
            Some((ref path, ref message)) => {
                let fd = open_or_fail(path, OFlag::O_RDONLY, Mode::empty(), message);
                redirect(fd, libc::STDIN_FILENO);
            }
            // Background jobs must not consume terminal input.
            None if background => {
                let fd = open_or_fail(
                    DEV_NULL,
                    OFlag::O_RDONLY,
                    Mode::empty(),
                    DEV_NULL_INPUT_ERROR,
                );
                redirect(fd, libc::STDIN_FILENO);
            }
            None => {}
        }

        match output {
            Some((ref path, ref message)) => {
                let flags = OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC;
                let mode = Mode::S_IRUSR | Mode::S_IWUSR | Mode::S_IRGRP;
                let fd = open_or_fail(path, flags, mode, message);
                redirect(fd, libc::STDOUT_FILENO);
            }
            None if background => {
                let fd = open_or_fail(
                    DEV_NULL,
                    OFlag::O_WRONLY,
                    Mode::empty(),
                    DEV_NULL_OUTPUT_ERROR,
                );
                redirect(fd, libc::STDOUT_FILENO);
            }
            None => {}
        }

        Ok(())
    };

    unsafe {
        command.pre_exec(child_setup);
    }

    match command.spawn() {
        Ok(child) => Ok(child),
        Err(e) => {
            if is_exec_failure(&e) {
                Err(Error::command_not_found(spec.program()))
            } else {
                Err(e.context(ErrorKind::Io).into())
            }
        }
    }
}

/// `Command::spawn` reports a failed exec through the spawn result;
/// anything else means the process could not be created at all.
fn is_exec_failure(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
    )
}

fn wait_for_process(pid: Pid) -> Result<ExitStatus> {
    let wait_status = wait::waitpid(pid, None).context(ErrorKind::Nix)?;
    match wait_status {
        WaitStatus::Exited(_, code) => Ok(ExitStatus::from_status(code)),
        WaitStatus::Signaled(_, signal, _) => Ok(ExitStatus::from_signal(signal as i32)),
        status => {
            warn!("unexpected wait status for foreground pid {}: {:?}", pid, status);
            Ok(ExitStatus::from_failure())
        }
    }
}

// Child-side helpers. These run after the fork and before the exec, so they
// stick to raw fd operations and preformatted messages.

fn open_or_fail(path: &str, flags: OFlag, mode: Mode, error_message: &[u8]) -> RawFd {
    match fcntl::open(path, flags, mode) {
        Ok(fd) => fd,
        Err(_) => fail_child(error_message),
    }
}

fn redirect(fd: RawFd, target: RawFd) {
    // dup2(2) failing here represents programmer error
    unistd::dup2(fd, target).expect("failed to redirect file descriptor");
    unistd::close(fd).expect("failed to close file descriptor");
}

/// Fatal to the child only: report and exit without touching parent state.
fn fail_child(message: &[u8]) -> ! {
    let _ = unistd::write(libc::STDERR_FILENO, message);
    unsafe { libc::_exit(1) }
}
