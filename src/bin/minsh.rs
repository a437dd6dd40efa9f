#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

use std::path::PathBuf;
use std::process;

use docopt::Docopt;
use nix::unistd::Pid;

use minsh::errors::{Error, Result};
use minsh::{Shell, ShellConfig};

const LOG_FILE_NAME: &str = ".minsh_log";

const USAGE: &str = "
minsh.

Usage:
    minsh [options]
    minsh [options] -c <command>
    minsh (-h | --help)
    minsh --version

Options:
    -h --help       Show this screen.
    --version       Show version.
    -c              If the -c option is present, then commands are read from the first non-option
                        argument command_string.
    --log=<path>    File to write log to, defaults to ~/.minsh_log
";

/// Docopts input arguments.
#[derive(Debug, Deserialize)]
struct Args {
    arg_command: Option<String>,
    flag_version: bool,
    flag_c: bool,
    flag_log: Option<String>,
}

fn main() {
    let args: Args = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    init_logger(&args.flag_log);
    debug!("{:?}", args);

    if args.flag_version {
        println!("minsh version {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let mut shell =
        Shell::new(ShellConfig::default()).unwrap_or_else(|e| display_error_and_exit(&e));

    if args.flag_c {
        let result = match args.arg_command {
            Some(ref command) => shell.execute_command_string(command),
            None => unreachable!(),
        };
        exit(result, &mut shell);
    }

    shell.execute_from_stdin();
    shell.exit()
}

fn init_logger(path: &Option<String>) {
    let log_path = match path.clone().map(PathBuf::from).or_else(default_log_path) {
        Some(path) => path,
        None => return,
    };

    let log_file = match fern::log_file(log_path) {
        Ok(file) => file,
        // The shell stays usable without its log file.
        Err(_) => return,
    };

    let pid = Pid::this();
    let temp_result = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}: {}",
                pid,
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Debug)
        .chain(log_file)
        .apply();

    if let Err(err) = temp_result {
        debug!("logger already initialized: {}", err);
    }
}

fn default_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(LOG_FILE_NAME))
}

fn display_error_and_exit(error: &Error) -> ! {
    eprintln!("minsh: {}", error);
    process::exit(1);
}

fn exit(result: Result<()>, shell: &mut Shell) -> ! {
    if let Err(e) = result {
        eprintln!("minsh: {}", e);
        process::exit(1);
    }

    shell.exit()
}
