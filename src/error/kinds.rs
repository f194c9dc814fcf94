use std::{fmt, io};

/// Crate-wide `Result` type using [`SlashcompError`] as the error.
///
/// This alias is re-exported by the parent `error` module. The completion
/// core never produces errors; only configuration loading, the CLI and the
/// interactive shell are fallible.
pub type Result<T> = std::result::Result<T, SlashcompError>;

/// Top-level error type for slashcomp.
#[derive(Debug)]
pub enum SlashcompError {
    /// Configuration errors.
    Config(ConfigError),

    /// Interactive shell errors.
    Repl(ReplError),

    /// I/O errors.
    Io(io::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Missing required field.
    MissingField(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/// Interactive shell errors.
#[derive(Debug)]
pub enum ReplError {
    /// The line editor failed to read input.
    ReadFailed(String),

    /// History could not be opened or written.
    History(String),

    /// Unknown window reference in a session command.
    UnknownWindow(String),

    /// Session command used with missing or bad arguments.
    BadArguments { command: String, usage: String },
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for SlashcompError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlashcompError::Config(e) => write!(f, "Configuration error: {e}"),
            SlashcompError::Repl(e) => write!(f, "{e}"),
            SlashcompError::Io(e) => write!(f, "I/O error: {e}"),
            SlashcompError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::MissingField(field) => write!(f, "Missing required field: {field}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl fmt::Display for ReplError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplError::ReadFailed(msg) => write!(f, "Read error: {msg}"),
            ReplError::History(msg) => write!(f, "History error: {msg}"),
            ReplError::UnknownWindow(win) => write!(f, "No such window: {win}"),
            ReplError::BadArguments { command, usage } => {
                write!(f, "Invalid usage of {command}, expected: {usage}")
            }
        }
    }
}

impl std::error::Error for SlashcompError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SlashcompError::Config(e) => Some(e),
            SlashcompError::Repl(e) => Some(e),
            SlashcompError::Io(e) => Some(e),
            SlashcompError::Generic(_) => None,
        }
    }
}
impl std::error::Error for ConfigError {}
impl std::error::Error for ReplError {}

/* ========================= Conversions to SlashcompError ========================= */

impl From<io::Error> for SlashcompError {
    fn from(err: io::Error) -> Self {
        SlashcompError::Io(err)
    }
}

impl From<ConfigError> for SlashcompError {
    fn from(err: ConfigError) -> Self {
        SlashcompError::Config(err)
    }
}

impl From<ReplError> for SlashcompError {
    fn from(err: ReplError) -> Self {
        SlashcompError::Repl(err)
    }
}

impl From<toml::de::Error> for SlashcompError {
    fn from(err: toml::de::Error) -> Self {
        SlashcompError::Config(ConfigError::InvalidFormat(err.message().to_string()))
    }
}

impl From<toml::ser::Error> for SlashcompError {
    fn from(err: toml::ser::Error) -> Self {
        SlashcompError::Generic(format!("Failed to serialize configuration: {err}"))
    }
}

impl From<toml_edit::TomlError> for SlashcompError {
    fn from(err: toml_edit::TomlError) -> Self {
        SlashcompError::Config(ConfigError::InvalidFormat(err.to_string()))
    }
}

impl From<serde_json::Error> for SlashcompError {
    fn from(err: serde_json::Error) -> Self {
        SlashcompError::Generic(format!("JSON error: {err}"))
    }
}

impl From<String> for SlashcompError {
    fn from(msg: String) -> Self {
        SlashcompError::Generic(msg)
    }
}

impl From<&str> for SlashcompError {
    fn from(msg: &str) -> Self {
        SlashcompError::Generic(msg.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = SlashcompError::from(ConfigError::InvalidValue {
            field: "logging.level".to_string(),
            value: "loud".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid value 'loud' for field 'logging.level'"
        );
    }

    #[test]
    fn test_repl_error_display() {
        let err = SlashcompError::from(ReplError::BadArguments {
            command: "/join".to_string(),
            usage: "/join <room>".to_string(),
        });
        assert_eq!(err.to_string(), "Invalid usage of /join, expected: /join <room>");
    }

    #[test]
    fn test_from_str_is_generic() {
        let err: SlashcompError = "boom".into();
        assert!(matches!(err, SlashcompError::Generic(ref m) if m == "boom"));
    }

    #[test]
    fn test_toml_error_becomes_invalid_format() {
        let parsed: std::result::Result<toml::Value, _> = toml::from_str("[history\nmax_size = 1");
        let err = SlashcompError::from(parsed.unwrap_err());
        assert!(matches!(
            err,
            SlashcompError::Config(ConfigError::InvalidFormat(_))
        ));
    }
}
