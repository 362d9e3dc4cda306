mod app;
mod audio;
mod backdrop;
mod clock;
mod command;
mod config;
mod console;
mod consts;
mod effects;
mod game;
mod instructions;
mod menu;
mod screen;
mod settings;
mod settings_menu;
mod transition;
mod util;
use crate::app::App;
use crate::config::Config;
use anyhow::Context as _;
use crossterm::event::{
    DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
};
use lexopt::{Arg, Parser};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// What the command line asked for
#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        config: Option<PathBuf>,
        log_file: Option<PathBuf>,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut config = None;
        let mut log_file = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('c') | Arg::Long("config") => {
                    config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("log-file") => log_file = Some(PathBuf::from(parser.value()?)),
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run { config, log_file })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run { config, log_file } => {
                let config = match config {
                    Some(path) => Config::load(&path, false),
                    None => Config::load(&Config::default_path()?, true),
                }
                .context("failed to load configuration")?;
                if let Some(path) = log_file.as_deref().or(config.files.log_file.as_deref()) {
                    init_logging(path)?;
                }
                let settings = config.open_settings();
                let app = App::new(settings, config.frame_period(), rand::rng());
                let terminal = ratatui::init();
                let r = crossterm::execute!(io::stdout(), EnableMouseCapture, EnableFocusChange)
                    .and_then(|()| app.run(terminal));
                let _ = crossterm::execute!(io::stdout(), DisableFocusChange, DisableMouseCapture);
                ratatui::restore();
                r?;
            }
            Command::Help => {
                println!("Usage: snakeshell [--config FILE] [--log-file FILE]");
                println!();
                println!("Snake game in the terminal");
                println!();
                println!("Options:");
                println!("  -c, --config FILE    Read configuration from FILE");
                println!("      --log-file FILE  Write log messages to FILE");
                println!("  -h, --help           Display this help message and exit");
                println!("  -V, --version        Show the program version and exit");
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            }
        }
        Ok(())
    }
}

/// Send `tracing` output to the file at `path`.  The level is taken from
/// `RUST_LOG`, defaulting to `info`.
fn init_logging(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs_err::create_dir_all(parent)?;
    }
    let file = fs_err::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .context("failed to open log file")?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> ExitCode {
    let r = Command::from_parser(Parser::from_env())
        .map_err(anyhow::Error::from)
        .and_then(Command::run);
    match r {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if is_broken_pipe(&e) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("snakeshell: {e:?}");
            ExitCode::from(2)
        }
    }
}

fn is_broken_pipe(e: &anyhow::Error) -> bool {
    e.downcast_ref::<io::Error>()
        .is_some_and(|e| e.kind() == ErrorKind::BrokenPipe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Result<Command, lexopt::Error> {
        Command::from_parser(Parser::from_iter(
            std::iter::once("snakeshell").chain(args.iter().copied()),
        ))
    }

    #[test]
    fn no_args() {
        assert_eq!(
            parse(&[]).unwrap(),
            Command::Run {
                config: None,
                log_file: None
            }
        );
    }

    #[test]
    fn all_options() {
        assert_eq!(
            parse(&["--config", "snake.toml", "--log-file=snake.log"]).unwrap(),
            Command::Run {
                config: Some(PathBuf::from("snake.toml")),
                log_file: Some(PathBuf::from("snake.log")),
            }
        );
    }

    #[rstest]
    #[case(&["-h"], Command::Help)]
    #[case(&["--config", "x.toml", "--help"], Command::Help)]
    #[case(&["-V"], Command::Version)]
    fn info_flags(#[case] args: &[&str], #[case] cmd: Command) {
        assert_eq!(parse(args).unwrap(), cmd);
    }

    #[rstest]
    #[case(&["extra"])]
    #[case(&["--frobnicate"])]
    #[case(&["--config"])]
    fn bad_args(#[case] args: &[&str]) {
        assert!(parse(args).is_err());
    }
}
