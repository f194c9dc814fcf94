//! Configuration management for slashcomp
//!
//! This module handles loading, parsing, and managing configuration from various sources:
//! - Configuration files (TOML format)
//! - Environment variables
//! - Command-line arguments
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values
//!
//! The `[session]` section seeds the demo session the interactive shell
//! completes against: accounts, roster, rooms and the rest.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::completion::WindowKind;
use crate::error::{ConfigError, Result};

/// Environment variable overriding `logging.level`
pub const ENV_LOG_LEVEL: &str = "SLASHCOMP_LOG_LEVEL";

/// Environment variable disabling colored output when set
pub const ENV_NO_COLOR: &str = "SLASHCOMP_NO_COLOR";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// History configuration
    #[serde(default)]
    pub history: HistoryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Display configuration
    #[serde(default)]
    pub display: DisplayConfig,

    /// Demo session data
    #[serde(default)]
    pub session: SessionConfig,
}

/// Command history configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryConfig {
    /// Maximum number of history entries
    #[serde(default = "default_max_history_size")]
    pub max_size: usize,

    /// Path to history file
    #[serde(default = "default_history_file")]
    pub file_path: PathBuf,

    /// Enable history persistence
    #[serde(default = "default_persist_history")]
    pub persist: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default)]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayConfig {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color_output: bool,

    /// Colour the command token in the input line
    #[serde(default = "default_true")]
    pub syntax_highlighting: bool,

    /// Show history hints while typing
    #[serde(default = "default_true")]
    pub hints: bool,
}

/// A roster contact
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContactConfig {
    /// Bare JID
    pub jid: String,

    /// Roster name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Roster groups
    #[serde(default)]
    pub groups: Vec<String>,

    /// Online resources
    #[serde(default)]
    pub resources: Vec<String>,
}

/// A chat room
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RoomConfig {
    /// Room JID
    pub jid: String,

    /// Occupants, nick to real JID (empty when anonymous)
    #[serde(default)]
    pub occupants: BTreeMap<String, String>,

    /// Current subject
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

/// What a plugin registers with the completion engine when it is loaded
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PluginConfig {
    /// Plugin file name, as listed in the plugins directory
    pub name: String,

    /// Commands the plugin adds
    #[serde(default)]
    pub commands: Vec<String>,

    /// Candidate lists keyed by command and optional argument words
    #[serde(default)]
    pub completions: BTreeMap<String, Vec<String>>,

    /// Keys whose argument is a file path
    #[serde(default)]
    pub filepath: Vec<String>,
}

/// A window open at startup
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WindowConfig {
    /// Window kind (console, chat, muc, private, config)
    pub kind: String,

    /// JID the window is bound to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// Demo session data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    /// Start connected
    #[serde(default)]
    pub connected: bool,

    /// Account used by `/connect` without arguments
    #[serde(default = "default_account")]
    pub account: String,

    /// Configured accounts
    #[serde(default = "default_accounts")]
    pub accounts: Vec<String>,

    /// Enabled accounts
    #[serde(default = "default_accounts")]
    pub enabled_accounts: Vec<String>,

    /// Roster
    #[serde(default = "default_contacts")]
    pub contacts: Vec<ContactConfig>,

    /// Rooms that can be joined
    #[serde(default = "default_rooms")]
    pub rooms: Vec<RoomConfig>,

    /// Windows open at startup besides the console
    #[serde(default)]
    pub windows: Vec<WindowConfig>,

    #[serde(default)]
    pub bookmarks: Vec<String>,

    #[serde(default)]
    pub invites: Vec<String>,

    #[serde(default)]
    pub sub_requests: Vec<String>,

    #[serde(default)]
    pub blocked: Vec<String>,

    #[serde(default)]
    pub tls_certs: Vec<String>,

    #[serde(default)]
    pub pgp_keys: Vec<String>,

    #[serde(default)]
    pub room_triggers: Vec<String>,

    /// Aliases registered at startup
    #[serde(default)]
    pub aliases: Vec<String>,

    /// Directory listed for `/theme load`
    #[serde(default = "default_themes_dir")]
    pub themes_dir: PathBuf,

    /// Directory listed for `/script run`
    #[serde(default = "default_scripts_dir")]
    pub scripts_dir: PathBuf,

    /// Directory listed for `/plugins load`
    #[serde(default = "default_plugins_dir")]
    pub plugins_dir: PathBuf,

    /// Plugins loaded at startup
    #[serde(default)]
    pub loaded_plugins: Vec<String>,

    /// Commands and completions declared by installed plugins
    #[serde(default)]
    pub plugins: Vec<PluginConfig>,
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_max_history_size() -> usize {
    1000
}

fn default_history_file() -> PathBuf {
    data_dir().join("history")
}

fn default_persist_history() -> bool {
    true
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_account() -> String {
    "me@example.org".to_string()
}

fn default_accounts() -> Vec<String> {
    vec![default_account(), "work@corp.example.com".to_string()]
}

fn default_contacts() -> Vec<ContactConfig> {
    vec![
        ContactConfig {
            jid: "alice@example.org".to_string(),
            name: Some("Alice Liddell".to_string()),
            groups: vec!["friends".to_string()],
            resources: vec!["laptop".to_string(), "phone".to_string()],
        },
        ContactConfig {
            jid: "bob@example.org".to_string(),
            name: None,
            groups: vec!["friends".to_string(), "work".to_string()],
            resources: vec!["desktop".to_string()],
        },
    ]
}

fn default_rooms() -> Vec<RoomConfig> {
    vec![RoomConfig {
        jid: "lounge@conference.example.org".to_string(),
        occupants: BTreeMap::from([
            ("alice".to_string(), "alice@example.org".to_string()),
            ("bob".to_string(), "bob@example.org".to_string()),
            ("carol".to_string(), String::new()),
        ]),
        subject: Some("Welcome to the lounge".to_string()),
    }]
}

fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("slashcomp")
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("slashcomp")
}

fn default_themes_dir() -> PathBuf {
    config_dir().join("themes")
}

fn default_scripts_dir() -> PathBuf {
    data_dir().join("scripts")
}

fn default_plugins_dir() -> PathBuf {
    data_dir().join("plugins")
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_size: default_max_history_size(),
            file_path: default_history_file(),
            persist: default_persist_history(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: false,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color_output: true,
            syntax_highlighting: true,
            hints: true,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            connected: false,
            account: default_account(),
            accounts: default_accounts(),
            enabled_accounts: default_accounts(),
            contacts: default_contacts(),
            rooms: default_rooms(),
            windows: Vec::new(),
            bookmarks: vec!["lounge@conference.example.org".to_string()],
            invites: Vec::new(),
            sub_requests: Vec::new(),
            blocked: Vec::new(),
            tls_certs: Vec::new(),
            pgp_keys: Vec::new(),
            room_triggers: Vec::new(),
            aliases: Vec::new(),
            themes_dir: default_themes_dir(),
            scripts_dir: default_scripts_dir(),
            plugins_dir: default_plugins_dir(),
            loaded_plugins: Vec::new(),
            plugins: Vec::new(),
        }
    }
}

/// Comment placed above each top-level table by `to_toml_with_comments`
const SECTION_COMMENTS: &[(&str, &str)] = &[
    ("history", "Input history"),
    ("logging", "Diagnostics written to stderr"),
    ("display", "Terminal output"),
    ("session", "Demo session the shell completes against"),
];

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - `<config dir>/slashcomp/config.toml`
    pub fn default_config_path() -> PathBuf {
        config_dir().join("config.toml")
    }

    /// Load configuration from a file
    ///
    /// An explicit path must exist. Without a path the default location is
    /// used, and a missing default file yields the default configuration.
    ///
    /// # Arguments
    /// * `path` - Explicit configuration file, if any
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::default_config_path(), false),
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigError::FileNotFound(path.display().to_string()).into());
            }
            tracing::debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Apply environment overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply environment overrides read through `lookup`
    ///
    /// Unknown log levels are ignored with a warning.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            match level.parse::<LogLevel>() {
                Ok(level) => self.logging.level = level,
                Err(e) => tracing::warn!("{ENV_LOG_LEVEL}: {e}"),
            }
        }
        if lookup(ENV_NO_COLOR).is_some_and(|v| !v.is_empty()) {
            self.display.color_output = false;
        }
    }

    /// Save configuration to a file
    ///
    /// # Arguments
    /// * `path` - Path where to save the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Success or error
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml_with_comments()?)?;
        Ok(())
    }

    /// Render the configuration as TOML with a comment above each section
    ///
    /// # Returns
    /// * `Result<String>` - Commented TOML document
    pub fn to_toml_with_comments(&self) -> Result<String> {
        let plain = toml::to_string(self)?;
        let mut doc = plain.parse::<toml_edit::DocumentMut>()?;
        for (section, comment) in SECTION_COMMENTS {
            if let Some(table) = doc.get_mut(section).and_then(|item| item.as_table_mut()) {
                table.decor_mut().set_prefix(format!("\n# {comment}\n"));
            }
        }
        Ok(doc.to_string().trim_start().to_string())
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        if self.history.max_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "history.max_size".to_string(),
                value: "0".to_string(),
            }
            .into());
        }

        let session = &self.session;
        if session.account.trim().is_empty() {
            return Err(ConfigError::MissingField("session.account".to_string()).into());
        }
        for account in session.accounts.iter().chain(&session.enabled_accounts) {
            if account.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "session.accounts".to_string(),
                    value: account.clone(),
                }
                .into());
            }
        }
        for contact in &session.contacts {
            if contact.jid.trim().is_empty() {
                return Err(ConfigError::MissingField("session.contacts.jid".to_string()).into());
            }
        }
        for room in &session.rooms {
            if room.jid.trim().is_empty() {
                return Err(ConfigError::MissingField("session.rooms.jid".to_string()).into());
            }
        }
        for plugin in &session.plugins {
            if plugin.name.trim().is_empty() {
                return Err(ConfigError::MissingField("session.plugins.name".to_string()).into());
            }
            if let Some(command) = plugin.commands.iter().find(|c| !c.starts_with('/')) {
                return Err(ConfigError::InvalidValue {
                    field: "session.plugins.commands".to_string(),
                    value: command.clone(),
                }
                .into());
            }
        }
        for window in &session.windows {
            if WindowKind::from_str(&window.kind).is_err() {
                return Err(ConfigError::InvalidValue {
                    field: "session.windows.kind".to_string(),
                    value: window.kind.clone(),
                }
                .into());
            }
        }
        Ok(())
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}
