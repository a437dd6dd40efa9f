//! Minsh - a minimal job-control shell.
//!
//! Minsh reads one line of input at a time, runs the `cd`, `exit` and
//! `status` builtins itself, and launches everything else as an external
//! program with optional redirection and background placement. Background
//! jobs are tracked in a bounded table and reaped once per input cycle.

#[macro_use]
extern crate log;

macro_rules! log_if_err {
    ($result:expr, $($arg:tt)*) => {
        if let Err(ref err) = $result {
            error!("{}: {}", format_args!($($arg)*), err);
        }
    };
}

pub mod core;
pub mod errors;
pub mod shell;
pub mod util;

pub use crate::shell::shell::{Shell, ShellConfig};
pub use crate::util::MinshExitStatusExt;
