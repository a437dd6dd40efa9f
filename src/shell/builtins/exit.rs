use crate::shell::builtins::{self, prelude::*};

pub struct Exit;

impl BuiltinCommand for Exit {
    const NAME: &'static str = builtins::EXIT_NAME;

    /// Arguments are accepted and ignored; the shell always exits with a
    /// success status after signaling its tracked background jobs.
    fn run<T: AsRef<str>>(shell: &mut Shell, _args: &[T], _stdout: &mut dyn Write) -> Result<()> {
        shell.exit()
    }
}
