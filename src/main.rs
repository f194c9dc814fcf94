//! slashcomp - tab completion for slash-command chat clients
//!
//! Starts an interactive shell whose line editor completes commands,
//! arguments, roster entries, rooms and paths, or runs one of the
//! one-shot subcommands.
//!
//! # Usage
//!
//! ```bash
//! # Interactive shell
//! slashcomp --connect
//!
//! # Scripted completion
//! slashcomp complete "/log " -n 3
//! ```

use tracing::Level;

use slashcomp::cli::CliInterface;
use slashcomp::error::Result;
use slashcomp::repl::{ReplEngine, ShellState};
use slashcomp::session::DemoSession;

/// Application entry point
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments and load configuration
/// 2. Initialize logging
/// 3. Handle subcommands or start the shell
fn run() -> Result<()> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli);

    if cli.handle_subcommand()? {
        return Ok(());
    }

    cli.print_banner();
    run_interactive_mode(&cli)
}

/// Run the interactive shell
fn run_interactive_mode(cli: &CliInterface) -> Result<()> {
    let config = cli.config();
    let shell = ShellState::new(DemoSession::from_config(&config.session)).shared();
    let mut repl = ReplEngine::new(shell, &config.history, &config.display)?;

    repl.run()?;

    println!("Goodbye!");
    Ok(())
}

/// Initialize logging system based on verbosity level
///
/// # Arguments
/// * `cli` - CLI interface with the effective configuration
fn initialize_logging(cli: &CliInterface) {
    let level: Level = cli.config().logging.level.to_tracing_level();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_ansi(cli.config().display.color_output)
        .with_writer(std::io::stderr);

    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
