//! Command-line interface for slashcomp
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading, environment and argument overrides
//! - The one-shot subcommands (version, completion scripts, config,
//!   command table, scripted completion)

pub mod completion;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::io;
use std::path::PathBuf;

use crate::completion::{Direction, WindowKind};
use crate::config::{Config, LogLevel};
use crate::error::Result;
use crate::formatter::{CompletionRun, format_commands};
use crate::repl::ShellState;
use crate::session::DemoSession;

/// Tab completion for slash-command chat clients
#[derive(Parser, Debug)]
#[command(
    name = "slashcomp",
    version,
    about = "Tab completion engine for slash-command chat clients",
    long_about = "An interactive shell demonstrating context-aware tab completion of
slash commands, their arguments, roster entries, rooms and file paths."
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Start the session connected
    #[arg(long)]
    pub connect: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Quiet mode (errors only)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv")]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands for slashcomp
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version,

    /// Generate shell completion script
    Completion {
        /// Shell type
        #[arg(value_name = "SHELL", value_enum)]
        shell: Shell,
    },

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },

    /// List the built-in commands
    Commands,

    /// Press Tab on a line and print what it completes to
    Complete {
        /// Input line
        #[arg(value_name = "LINE", allow_hyphen_values = true)]
        line: String,

        /// Cycle backwards (Shift-Tab)
        #[arg(long)]
        backward: bool,

        /// Number of presses
        #[arg(long, short = 'n', value_name = "N", default_value_t = 1)]
        times: usize,

        /// Active window kind (console, chat, muc, private, config)
        #[arg(long, value_name = "KIND", default_value = "console")]
        window: WindowKind,

        /// JID the window is bound to
        #[arg(long, value_name = "JID")]
        target: Option<String>,

        /// Complete as if disconnected
        #[arg(long)]
        disconnected: bool,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Parse the process arguments and load configuration
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Build from already parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file, then apply environment and arguments
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = Config::load_from_file(args.config_file.as_deref())?;

        if let Err(e) = config.validate() {
            eprintln!("Warning: Configuration validation failed: {}", e);
            eprintln!("Using default configuration instead.");
            config = Config::default();
        }

        config.apply_env();
        Self::apply_args_to_config(&mut config, args);

        Ok(config)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the CLI arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Apply CLI arguments to configuration
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        if args.no_color {
            config.display.color_output = false;
        }
        if args.connect {
            config.session.connected = true;
        }
        Self::apply_logging_args(config, args);
    }

    /// Apply logging-related CLI arguments to configuration
    fn apply_logging_args(config: &mut Config, args: &CliArgs) {
        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else if args.quiet {
            LogLevel::Error
        } else {
            config.logging.level
        };
    }

    /// Handle subcommands
    ///
    /// # Returns
    /// * `Result<bool>` - True if a subcommand was handled, false to start the shell
    pub fn handle_subcommand(&self) -> Result<bool> {
        match &self.args.command {
            Some(Commands::Version) => self.show_version(),
            Some(Commands::Completion { shell }) => {
                completion::generate_completion(*shell, &mut io::stdout());
            }
            Some(Commands::Config { show, validate }) => {
                self.handle_config_command(*show, *validate)?;
            }
            Some(Commands::Commands) => self.list_commands(),
            Some(Commands::Complete {
                line,
                backward,
                times,
                window,
                target,
                disconnected,
                json,
            }) => {
                let request = CompleteRequest {
                    line,
                    direction: Direction::from_previous(*backward),
                    times: *times,
                    window: *window,
                    target: target.as_deref(),
                    connected: !*disconnected,
                };
                let run = self.run_complete(&request);
                if *json {
                    println!("{}", run.to_json()?);
                } else {
                    println!("{}", run.to_text());
                }
            }
            None => return Ok(false),
        }
        Ok(true)
    }

    /// Show version information
    fn show_version(&self) {
        println!("slashcomp version {}", env!("CARGO_PKG_VERSION"));
    }

    /// Print the command table
    fn list_commands(&self) {
        let state = ShellState::new(DemoSession::from_config(&self.config.session));
        println!(
            "{}",
            format_commands(state.engine().commands(), self.config.display.color_output)
        );
    }

    /// Press Tab `times` times on a line in a throwaway session
    pub fn run_complete(&self, request: &CompleteRequest<'_>) -> CompletionRun {
        let mut session = DemoSession::from_config(&self.config.session);
        if request.connected {
            session.connect(None).ok();
        } else {
            session.disconnect();
        }
        if request.window != WindowKind::Console {
            session.open_window(request.window, request.target.unwrap_or_default());
        }

        let mut state = ShellState::new(session);
        let mut line = request.line.to_string();
        let mut results = Vec::with_capacity(request.times);
        for _ in 0..request.times {
            let found = state.tab(&line, request.direction);
            if let Some(next) = &found {
                line = next.clone();
            }
            results.push(found);
        }

        CompletionRun {
            input: request.line.to_string(),
            window: request.window.to_string(),
            direction: match request.direction {
                Direction::Forward => "forward".to_string(),
                Direction::Backward => "backward".to_string(),
            },
            results,
        }
    }

    /// Handle config subcommand
    ///
    /// # Arguments
    /// * `show` - Whether to show configuration
    /// * `validate` - Whether to validate configuration
    fn handle_config_command(&self, show: bool, validate: bool) -> Result<()> {
        if validate {
            self.validate_config_file();
        }

        if show || !validate {
            self.show_config()?;
        }

        Ok(())
    }

    /// Validate configuration file
    fn validate_config_file(&self) {
        let path = self.get_config_path();
        println!("Validating configuration file: {}", path.display());

        if !path.exists() {
            println!("Configuration file does not exist, defaults apply");
            return;
        }

        match Config::load_from_file(Some(&path)) {
            Ok(config) => match config.validate() {
                Ok(()) => println!("Configuration is valid"),
                Err(e) => println!("Configuration validation failed: {}", e),
            },
            Err(e) => println!("Failed to load configuration: {}", e),
        }
    }

    /// Show effective configuration
    fn show_config(&self) -> Result<()> {
        let path = self.get_config_path();
        println!("# Configuration file: {}", path.display());
        println!();
        println!("{}", self.config.to_toml_with_comments()?);
        Ok(())
    }

    /// Get configuration file path (from args or default)
    fn get_config_path(&self) -> PathBuf {
        self.args
            .config_file
            .clone()
            .unwrap_or_else(Config::default_config_path)
    }

    /// Print banner unless quiet
    pub fn print_banner(&self) {
        if !self.args.quiet {
            println!("slashcomp {}", env!("CARGO_PKG_VERSION"));
            println!("Tab completes, Shift-Tab cycles back, /quit or Ctrl-D leaves.");
        }
    }
}

/// Parameters of a scripted completion run
#[derive(Debug, Clone)]
pub struct CompleteRequest<'a> {
    /// Line the first press is made on
    pub line: &'a str,
    /// Cycle direction
    pub direction: Direction,
    /// Number of presses
    pub times: usize,
    /// Active window kind
    pub window: WindowKind,
    /// JID the window is bound to
    pub target: Option<&'a str>,
    /// Session connected
    pub connected: bool,
}
