//! Shell-level signal configuration and the foreground-only mode flag.
//!
//! SIGTSTP can interrupt the shell at an arbitrary point, so its handler is
//! limited to one atomic toggle and one raw `write(2)` of a preformatted
//! message; every other launch-policy decision happens in the main loop by
//! reading a snapshot of the flag.

use std::sync::atomic::{AtomicBool, Ordering};

use failure::ResultExt;
use nix::libc;
use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};
use nix::unistd;

use crate::errors::{ErrorKind, Result};

static FOREGROUND_ONLY: AtomicBool = AtomicBool::new(false);

const ENTER_FOREGROUND_ONLY_MESSAGE: &[u8] =
    b"\nEntering foreground-only mode (& is now ignored)\n";
const EXIT_FOREGROUND_ONLY_MESSAGE: &[u8] = b"\nExiting foreground-only mode\n";

/// Installs the shell's own signal dispositions: SIGINT is ignored at the
/// top level and SIGTSTP toggles foreground-only mode. `SA_RESTART` keeps
/// the blocking prompt read alive across a toggle.
pub fn initialize_shell_signals() -> Result<()> {
    unsafe {
        signal::signal(Signal::SIGINT, SigHandler::SigIgn).context(ErrorKind::Nix)?;

        let action = SigAction::new(
            SigHandler::Handler(handle_sigtstp),
            SaFlags::SA_RESTART,
            SigSet::all(),
        );
        signal::sigaction(Signal::SIGTSTP, &action).context(ErrorKind::Nix)?;
    }

    Ok(())
}

/// Snapshot of foreground-only mode, read once per launch decision.
pub fn foreground_only() -> bool {
    FOREGROUND_ONLY.load(Ordering::SeqCst)
}

/// Flips the mode and returns the announcement for the new state.
fn toggle_foreground_only() -> &'static [u8] {
    let was_foreground_only = FOREGROUND_ONLY.fetch_xor(true, Ordering::SeqCst);
    if was_foreground_only {
        EXIT_FOREGROUND_ONLY_MESSAGE
    } else {
        ENTER_FOREGROUND_ONLY_MESSAGE
    }
}

extern "C" fn handle_sigtstp(_signal: libc::c_int) {
    let message = toggle_foreground_only();
    let _ = unistd::write(libc::STDOUT_FILENO, message);
}

#[cfg(test)]
mod tests {
    use super::*;

    // The flag is process-global, so this is the only test that touches it.
    #[test]
    fn test_toggle_round_trips() {
        assert!(!foreground_only());
        let entering = toggle_foreground_only();
        assert!(foreground_only());
        let exiting = toggle_foreground_only();
        assert!(!foreground_only());
        assert_ne!(entering, exiting);
    }
}
