//! slashcomp library
//!
//! Context-aware tab completion for the input line of a slash-command chat
//! client, plus the pieces of a small interactive shell built around it.
//!
//! # Modules
//!
//! - `cli`: Command-line interface and argument parsing
//! - `completion`: The completion engine
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `formatter`: Output formatting for the one-shot subcommands
//! - `repl`: Interactive shell on reedline
//! - `session`: In-memory session the shell completes against
//!
//! # Example
//!
//! ```
//! use slashcomp::completion::{
//!     CompletionContext, CompletionEngine, ConnectionStatus, Direction, EmptySession, Window,
//! };
//!
//! let mut engine = CompletionEngine::new();
//! let window = Window::console();
//! let ctx = CompletionContext::new("/qu", Direction::Forward, &window, ConnectionStatus::Disconnected);
//! assert_eq!(engine.complete(&ctx, &EmptySession).as_deref(), Some("/quit"));
//! ```

pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod formatter;
pub mod repl;
pub mod session;

// Re-export commonly used types
pub use completion::CompletionEngine;
pub use config::Config;
pub use error::{Result, SlashcompError};
pub use repl::ReplEngine;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
pub fn version() -> &'static str {
    VERSION
}
