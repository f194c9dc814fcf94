//! Per-call completion context
//!
//! Everything the engine needs to know about the caller for one keypress:
//! the raw input line, the cycle direction, the active window and the
//! connection status. Nothing here outlives the call.

use std::fmt;
use std::str::FromStr;

/// Cycle direction requested by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Next match (TAB)
    #[default]
    Forward,
    /// Previous match (Shift-TAB)
    Backward,
}

impl Direction {
    /// Map the "previous" flag used by line editors to a direction
    pub fn from_previous(previous: bool) -> Self {
        if previous {
            Direction::Backward
        } else {
            Direction::Forward
        }
    }
}

/// Kind of the active window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WindowKind {
    /// The console window
    #[default]
    Console,
    /// One-to-one chat
    Chat,
    /// Multi-user chat room
    Muc,
    /// Private chat with a room occupant
    Private,
    /// Room configuration form
    Config,
}

impl WindowKind {
    /// Lowercase name used on the command line and in configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            WindowKind::Console => "console",
            WindowKind::Chat => "chat",
            WindowKind::Muc => "muc",
            WindowKind::Private => "private",
            WindowKind::Config => "config",
        }
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WindowKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" => Ok(WindowKind::Console),
            "chat" => Ok(WindowKind::Chat),
            "muc" | "room" => Ok(WindowKind::Muc),
            "private" => Ok(WindowKind::Private),
            "config" | "mucconfig" => Ok(WindowKind::Config),
            other => Err(format!("unknown window kind '{other}'")),
        }
    }
}

/// Stable identity of a window for the lifetime of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u32);

/// The active window as seen by the completion engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    /// Window identity
    pub id: WindowId,
    /// Window kind
    pub kind: WindowKind,
    /// Contact JID (chat), room JID (muc, config) or occupant JID (private)
    pub target: Option<String>,
}

impl Window {
    /// The console window, id 1
    pub fn console() -> Self {
        Self {
            id: WindowId(1),
            kind: WindowKind::Console,
            target: None,
        }
    }

    /// Create a window
    ///
    /// # Arguments
    /// * `id` - Window number
    /// * `kind` - Window kind
    /// * `target` - JID the window is bound to
    pub fn new(id: u32, kind: WindowKind, target: impl Into<String>) -> Self {
        Self {
            id: WindowId(id),
            kind,
            target: Some(target.into()),
        }
    }

    /// Target JID, if any
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::console()
    }
}

/// Connection status of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    /// Logged in
    Connected,
    /// Not logged in
    #[default]
    Disconnected,
}

impl ConnectionStatus {
    /// True when connected
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }
}

/// Transient context for one completion call
#[derive(Debug, Clone, Copy)]
pub struct CompletionContext<'a> {
    /// Raw input line up to the cursor
    pub input: &'a str,
    /// Requested direction
    pub direction: Direction,
    /// Active window
    pub window: &'a Window,
    /// Connection status
    pub connection: ConnectionStatus,
}

impl<'a> CompletionContext<'a> {
    /// Create a context
    pub fn new(
        input: &'a str,
        direction: Direction,
        window: &'a Window,
        connection: ConnectionStatus,
    ) -> Self {
        Self {
            input,
            direction,
            window,
            connection,
        }
    }

    /// Same context with a different input line
    pub fn with_input(&self, input: &'a str) -> Self {
        Self { input, ..*self }
    }

    /// True when connected
    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_kind_round_trip_names() {
        for kind in [
            WindowKind::Console,
            WindowKind::Chat,
            WindowKind::Muc,
            WindowKind::Private,
            WindowKind::Config,
        ] {
            assert_eq!(kind.as_str().parse::<WindowKind>(), Ok(kind));
        }
        assert_eq!("room".parse::<WindowKind>(), Ok(WindowKind::Muc));
        assert!("desktop".parse::<WindowKind>().is_err());
    }

    #[test]
    fn test_direction_from_previous() {
        assert_eq!(Direction::from_previous(false), Direction::Forward);
        assert_eq!(Direction::from_previous(true), Direction::Backward);
    }

    #[test]
    fn test_with_input_keeps_window() {
        let window = Window::new(3, WindowKind::Muc, "room@conf.example.org");
        let ctx = CompletionContext::new("/kick ", Direction::Forward, &window, ConnectionStatus::Connected);
        let other = ctx.with_input("/ban ");
        assert_eq!(other.input, "/ban ");
        assert_eq!(other.window.target(), Some("room@conf.example.org"));
        assert!(other.is_connected());
    }
}
