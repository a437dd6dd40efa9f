//! Bounded tracking of background jobs and their non-blocking reaping.

use nix::sys::signal::{self, Signal};
use nix::sys::wait::{self, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;

/// Fixed-capacity table of background process ids.
///
/// A refused insertion leaves the job running untracked: the shell can no
/// longer report its completion or signal it at exit. That limitation is
/// intentional and matches the table's documented contract.
#[derive(Debug)]
pub struct JobTable {
    slots: Vec<Option<Pid>>,
}

impl JobTable {
    pub fn with_capacity(capacity: usize) -> JobTable {
        JobTable {
            slots: vec![None; capacity],
        }
    }

    /// Records `pid` in the first empty slot. Returns `false` when every
    /// slot is occupied and the pid was not recorded.
    pub fn register(&mut self, pid: Pid) -> bool {
        match self.slots.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => {
                *slot = Some(pid);
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_none())
    }

    /// Polls every tracked job without blocking, reporting and clearing the
    /// ones that have terminated. Runs once per input cycle, so a completion
    /// is reported within one cycle of the child's death, in table order.
    pub fn notify_completed(&mut self) {
        for slot in &mut self.slots {
            let pid = match *slot {
                Some(pid) => pid,
                None => continue,
            };

            match wait::waitpid(pid, Some(WaitPidFlag::WNOHANG)) {
                Ok(WaitStatus::StillAlive) => {}
                Ok(WaitStatus::Exited(pid, code)) => {
                    println!("background pid {} is done: exit value {}", pid, code);
                    *slot = None;
                }
                Ok(WaitStatus::Signaled(pid, signal, _)) => {
                    println!(
                        "background pid {} is done: terminated by signal {}",
                        pid, signal as i32
                    );
                    *slot = None;
                }
                Ok(status) => {
                    debug!("background pid {} reported {:?}", pid, status);
                }
                Err(err) => {
                    // The child is gone; stop tracking it.
                    warn!("waitpid({}) failed: {}", pid, err);
                    *slot = None;
                }
            }
        }
    }

    /// Best-effort delivery of `signal` to every tracked job. Does not wait
    /// for the jobs to die and does not clear the table.
    pub fn signal_all(&self, signal: Signal) {
        for pid in self.slots.iter().flatten() {
            let temp_result = signal::kill(*pid, signal);
            log_if_err!(temp_result, "failed to signal background pid {}", pid);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::process::Command;
    use std::thread;
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_register_until_full() {
        let mut table = JobTable::with_capacity(2);
        assert!(table.register(Pid::from_raw(100)));
        assert!(table.register(Pid::from_raw(101)));
        assert!(!table.register(Pid::from_raw(102)));
    }

    #[test]
    fn test_signal_all_on_empty_table_is_a_no_op() {
        let table = JobTable::with_capacity(4);
        table.signal_all(Signal::SIGTERM);
        assert!(table.is_empty());
    }

    #[test]
    fn test_completed_job_frees_its_slot() {
        let mut table = JobTable::with_capacity(1);
        let child = Command::new("true").spawn().expect("failed to spawn true");
        assert!(table.register(Pid::from_raw(child.id() as i32)));
        assert!(!table.register(Pid::from_raw(999)));

        for _ in 0..100 {
            table.notify_completed();
            if table.is_empty() {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }

        assert!(table.is_empty());
        assert!(table.register(Pid::from_raw(999)));
    }
}
