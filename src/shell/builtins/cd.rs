use std::env;
use std::path::PathBuf;

use crate::shell::builtins::{self, prelude::*};

pub struct Cd;

impl BuiltinCommand for Cd {
    const NAME: &'static str = builtins::CD_NAME;

    /// With no argument, changes to the directory named by `HOME`. Failure
    /// is reported to stderr and is never fatal to the shell.
    fn run<T: AsRef<str>>(_shell: &mut Shell, args: &[T], _stdout: &mut dyn Write) -> Result<()> {
        let target = match args.first() {
            Some(path) => PathBuf::from(path.as_ref()),
            None => match env::var_os("HOME") {
                Some(home) => PathBuf::from(home),
                None => {
                    eprintln!("cd: HOME not set");
                    return Ok(());
                }
            },
        };

        if let Err(err) = env::set_current_dir(&target) {
            debug!("cd to {} failed: {}", target.display(), err);
            eprintln!("{}: no such file or directory", target.display());
        }

        Ok(())
    }
}
