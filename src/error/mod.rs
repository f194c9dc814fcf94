//! Error handling for slashcomp.
//!
//! The completion engine is infallible by contract: an unknown command, an
//! unmatched argument branch or an unreadable directory all surface as
//! "no completion". The types here cover the outer layers:
//! - Configuration loading and validation
//! - The interactive shell and its session commands
//! - Terminal and file I/O
//!
//! # Example
//!
//! ```rust,no_run
//! use slashcomp::error::{ConfigError, Result};
//!
//! fn require_account(name: &str) -> Result<()> {
//!     if name.is_empty() {
//!         return Err(ConfigError::MissingField("session.account".to_string()).into());
//!     }
//!     Ok(())
//! }
//! ```

pub mod kinds;

pub use kinds::{ConfigError, ReplError, Result, SlashcompError};
