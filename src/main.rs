use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use session_sync::{lock, logging, EnvConfig, SessionFiles};

/// Lock, terminal and naming helpers for shared session directories
#[derive(Parser, Debug)]
#[command(name = "session-sync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the well-known paths of a session directory
    Paths {
        /// Session directory (defaults to <TMPDIR>/<session>)
        dir: Option<PathBuf>,

        /// Session name resolved under TMPDIR when no directory is given
        #[arg(long, conflicts_with = "dir")]
        session: Option<String>,

        /// Print only the output pipe of this reader
        #[arg(long)]
        reader: Option<String>,
    },

    /// Report whether a lock file is held (exit status 1 when locked)
    Probe { path: PathBuf },

    /// Block until a lock file is free
    Wait {
        path: PathBuf,

        /// Give up after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Hold a lock file until stdin reaches EOF
    Hold { path: PathBuf },

    /// Switch the line discipline of stdin
    Mode {
        #[arg(value_enum)]
        mode: TerminalMode,

        /// Leave echo off in standard mode
        #[arg(long)]
        no_echo: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TerminalMode {
    Raw,
    Standard,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = EnvConfig::from_env();
    logging::init(&config);

    match run(cli.command, &config) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("session-sync: {err}");
            ExitCode::from(2)
        }
    }
}

fn run(command: Command, config: &EnvConfig) -> io::Result<ExitCode> {
    let mut stdout = io::stdout().lock();
    match command {
        Command::Paths {
            dir,
            session,
            reader,
        } => {
            let base_dir = match (dir, session) {
                (Some(dir), _) => dir,
                (None, Some(session)) => config.session_dir(&session),
                (None, None) => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "either a session directory or --session is required",
                    ))
                }
            };
            let files = SessionFiles::new(base_dir);
            match reader {
                Some(reader) => writeln!(stdout, "{}", files.reader_pipe(&reader).display())?,
                None => {
                    for path in files.all() {
                        writeln!(stdout, "{}", path.display())?;
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Probe { path } => {
            if lock::probe(&path)? {
                writeln!(stdout, "locked")?;
                Ok(ExitCode::from(1))
            } else {
                writeln!(stdout, "unlocked")?;
                Ok(ExitCode::SUCCESS)
            }
        }
        Command::Wait { path, timeout_ms } => {
            match timeout_ms {
                Some(ms) => lock::wait_until_unlocked_timeout(&path, Duration::from_millis(ms))?,
                None => lock::wait_until_unlocked(&path)?,
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Hold { path } => {
            let held = lock::acquire(&path)?;
            writeln!(stdout, "locked")?;
            stdout.flush()?;

            let mut sink = Vec::new();
            io::stdin().lock().read_to_end(&mut sink)?;

            held.release()?;
            writeln!(stdout, "released")?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Mode { mode, no_echo } => {
            set_stdin_mode(mode, !no_echo)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(unix)]
fn set_stdin_mode(mode: TerminalMode, echo: bool) -> io::Result<()> {
    let fd = libc::STDIN_FILENO;
    match mode {
        TerminalMode::Raw => session_sync::set_raw(fd)?,
        TerminalMode::Standard => session_sync::set_standard(fd, echo)?,
    }
    Ok(())
}

#[cfg(not(unix))]
fn set_stdin_mode(_mode: TerminalMode, _echo: bool) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "terminal modes are only supported on unix",
    ))
}
