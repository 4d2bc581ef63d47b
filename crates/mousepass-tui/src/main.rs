//! Mousepass - terminal lock screen unlocked by a mouse gesture
//!
//! Takes over the terminal, captures the mouse and only lets go once the
//! enrolled gesture (or the keyboard fallback secret) is entered.
//!
//! # Keys
//! - `F2` switch between keyboard and gesture input
//! - `F3` record a new reference gesture
//! - `Enter` finish the gesture or submit the typed secret
//! - `Esc` cancel the current gesture

use std::io::{self, BufRead, Stdout};
use std::panic;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::{error, info};

use mousepass_core::{
    Authenticator, FileCredentialStore, KeyboardSecret, LockConfig, LockLoop, LoopExit,
    SystemClock,
};

mod input;
mod logging;
mod ui;

use input::TerminalInput;
use ui::TerminalPresenter;

/// Mousepass - gesture lock screen
#[derive(Parser)]
#[command(name = "mousepass")]
#[command(about = "Full-screen terminal lock unlocked by a mouse gesture")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Credential file holding the enrolled gesture
    #[arg(long)]
    credential: Option<PathBuf>,

    /// Log file (the terminal is taken over by the lock screen)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a keyboard secret from stdin and print its Argon2 hash
    /// for the `keyboard_secret_hash` config field
    HashSecret,

    /// Write the default configuration to `--config` or the user config directory
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

type Tui = Terminal<CrosstermBackend<Stdout>>;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::HashSecret) => return hash_secret(),
        Some(Commands::InitConfig { force }) => return init_config(cli.config.as_deref(), force),
        None => {}
    }

    let log_path = cli.log_file.clone().unwrap_or_else(logging::default_log_path);
    logging::init(&log_path)?;

    let mut config = match &cli.config {
        Some(path) => LockConfig::load_from(path),
        None => LockConfig::load(),
    };
    if let Some(path) = cli.credential {
        config.credential_path = Some(path);
    }

    // Set up panic hook to restore terminal on crash
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let result = run_lock_screen(&config);
    if let Err(e) = &result {
        error!("Lock screen error: {:#}", e);
    }

    result
}

/// Take over the terminal until the screen is unlocked
fn run_lock_screen(config: &LockConfig) -> Result<()> {
    let store = FileCredentialStore::new(config.resolved_credential_path());
    info!(path = %store.path().display(), "Using credential file");

    let mut auth =
        Authenticator::new(config, store).context("Invalid keyboard secret configuration")?;

    let mut terminal = or_restore(setup_terminal(), restore_terminal)?;

    let result = {
        let mut input = TerminalInput::new();
        let mut presenter = TerminalPresenter::new(&mut terminal);
        LockLoop::new(SystemClock, config.idle_poll()).run(&mut auth, &mut input, &mut presenter)
    };

    drop(terminal);
    let restored = restore_terminal();

    let exit = result?;
    restored?;
    released(exit)?;
    info!(failed_attempts = auth.failed_attempts(), "Lock screen released");
    Ok(())
}

/// Raw mode, alternate screen and mouse capture
fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.hide_cursor()?;
    Ok(terminal)
}

/// Undo everything `setup_terminal` may have changed
fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture, Show)?;
    Ok(())
}

/// Pass `result` through, running `restore` first if it failed
fn or_restore<T>(result: Result<T>, restore: impl FnOnce() -> Result<()>) -> Result<T> {
    result.map_err(|e| {
        if let Err(restore_error) = restore() {
            error!("Failed to restore terminal: {:#}", restore_error);
        }
        e
    })
}

/// Only an unlock releases the screen
fn released(exit: LoopExit) -> Result<()> {
    match exit {
        LoopExit::Unlocked => Ok(()),
        LoopExit::InputClosed => bail!("Input closed while the screen was still locked"),
    }
}

/// Write the default configuration, refusing to clobber an existing file
fn init_config(path: Option<&Path>, force: bool) -> Result<()> {
    let target = match path {
        Some(path) => path.to_path_buf(),
        None => LockConfig::config_file_path().context("Could not determine config directory")?,
    };
    if target.exists() && !force {
        bail!("{} already exists, pass --force to overwrite", target.display());
    }

    let config = LockConfig::default();
    match path {
        Some(path) => config.save_to(path)?,
        None => config.save()?,
    }

    println!("Wrote {}", target.display());
    Ok(())
}

/// Print the Argon2 hash of a secret read from stdin
fn hash_secret() -> Result<()> {
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read secret from stdin")?;

    let secret = line.trim_end_matches(&['\r', '\n'][..]);
    if secret.is_empty() {
        bail!("Secret must not be empty");
    }

    println!("{}", KeyboardSecret::hash(secret)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "mousepass",
            "--credential",
            "/tmp/gesture.dat",
            "--log-file",
            "/tmp/mousepass.log",
        ])
        .unwrap();
        assert_eq!(cli.credential, Some(PathBuf::from("/tmp/gesture.dat")));
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/mousepass.log")));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_hash_secret_subcommand() {
        let cli = Cli::try_parse_from(["mousepass", "hash-secret"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::HashSecret)));
    }

    #[test]
    fn test_closed_input_is_not_a_release() {
        assert!(released(LoopExit::Unlocked).is_ok());
        assert!(released(LoopExit::InputClosed).is_err());
    }

    #[test]
    fn test_failed_setup_restores_terminal() {
        let mut restored = false;
        let result: Result<()> = or_restore(Err(anyhow::anyhow!("no tty")), || {
            restored = true;
            Ok(())
        });
        assert!(result.is_err());
        assert!(restored);

        let mut restored = false;
        let value = or_restore(Ok(7), || {
            restored = true;
            Ok(())
        })
        .unwrap();
        assert_eq!(value, 7);
        assert!(!restored);
    }

    #[test]
    fn test_init_config_writes_defaults_once() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("mousepass").join("config.json");

        init_config(Some(&path), false).unwrap();
        assert_eq!(LockConfig::load_from(&path), LockConfig::default());

        assert!(init_config(Some(&path), false).is_err());
        init_config(Some(&path), true).unwrap();

        let cli = Cli::try_parse_from(["mousepass", "init-config", "--force"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::InitConfig { force: true })));
    }
}
