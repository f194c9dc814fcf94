//! In-memory chat session for the interactive shell
//!
//! [`DemoSession`] stands in for a real client: it is seeded from the
//! `[session]` configuration section, lists theme, script and plugin
//! directories on demand, and keeps track of open windows and the
//! connection state. It is what the completion engine sees through
//! [`SessionSource`].
//!
//! # Example
//!
//! ```rust
//! use slashcomp::completion::{SessionSource, Source, WindowKind};
//! use slashcomp::config::SessionConfig;
//! use slashcomp::session::DemoSession;
//!
//! let mut session = DemoSession::from_config(&SessionConfig::default());
//! session.connect(None).unwrap();
//! session.open_window(WindowKind::Chat, "alice@example.org");
//! assert_eq!(session.active_window().kind, WindowKind::Chat);
//! assert!(session.entries(&Source::Barejids).contains(&"alice@example.org".to_string()));
//! ```

pub mod commands;

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::completion::{
    CompletionContext, ConnectionStatus, DataForm, Direction, FieldKind, FormField, SessionSource,
    Source, Window, WindowId, WindowKind,
};
use crate::config::{ContactConfig, PluginConfig, RoomConfig, SessionConfig};
use crate::error::{ReplError, Result};

pub use commands::{Outcome, apply};

/// Demo session state
#[derive(Debug, Clone)]
pub struct DemoSession {
    config: SessionConfig,
    connection: ConnectionStatus,
    account: String,
    windows: Vec<Window>,
    active: usize,
    next_id: u32,
    loaded_plugins: BTreeSet<String>,
    aliases: BTreeSet<String>,
}

impl DemoSession {
    /// Build the session from configuration
    ///
    /// Windows listed in the configuration are opened after the console;
    /// entries with an unknown kind are skipped.
    pub fn from_config(config: &SessionConfig) -> Self {
        let mut session = Self {
            config: config.clone(),
            connection: ConnectionStatus::Disconnected,
            account: config.account.clone(),
            windows: vec![Window::console()],
            active: 0,
            next_id: 2,
            loaded_plugins: config.loaded_plugins.iter().cloned().collect(),
            aliases: config.aliases.iter().cloned().collect(),
        };
        if config.connected {
            session.connection = ConnectionStatus::Connected;
        }
        for window in &config.windows {
            match window.kind.parse::<WindowKind>() {
                Ok(kind) => {
                    session.open_window(kind, window.target.as_deref().unwrap_or_default());
                }
                Err(e) => tracing::warn!("skipping window: {e}"),
            }
        }
        session.active = 0;
        session
    }

    /// Completion context for `input` in the active window
    pub fn context<'a>(&'a self, input: &'a str, direction: Direction) -> CompletionContext<'a> {
        CompletionContext::new(input, direction, self.active_window(), self.connection)
    }

    pub fn connection(&self) -> ConnectionStatus {
        self.connection
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    /// Account in use (or used last)
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Log in, optionally switching account
    pub fn connect(&mut self, account: Option<&str>) -> Result<()> {
        if let Some(account) = account {
            if !self.config.accounts.iter().any(|a| a == account) {
                return Err(ReplError::BadArguments {
                    command: "/connect".to_string(),
                    usage: format!("/connect [{}]", self.config.accounts.join("|")),
                }
                .into());
            }
            self.account = account.to_string();
        }
        self.connection = ConnectionStatus::Connected;
        tracing::info!(account = %self.account, "connected");
        Ok(())
    }

    pub fn disconnect(&mut self) {
        self.connection = ConnectionStatus::Disconnected;
        tracing::info!(account = %self.account, "disconnected");
    }

    /// Open windows, console first
    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    pub fn active_window(&self) -> &Window {
        // The console is never closed, so the list is never empty
        &self.windows[self.active.min(self.windows.len() - 1)]
    }

    /// Window number (1-based position) of the active window
    pub fn active_number(&self) -> usize {
        self.active + 1
    }

    /// Focus the window of `kind` bound to `target`, opening it if needed
    ///
    /// # Returns
    /// * `(WindowId, bool)` - The window and whether it was newly opened
    pub fn open_window(&mut self, kind: WindowKind, target: &str) -> (WindowId, bool) {
        if let Some(index) = self
            .windows
            .iter()
            .position(|w| w.kind == kind && w.target() == Some(target))
        {
            self.active = index;
            return (self.windows[index].id, false);
        }

        let window = Window::new(self.next_id, kind, target);
        self.next_id += 1;
        let id = window.id;
        self.windows.push(window);
        self.active = self.windows.len() - 1;
        tracing::debug!(window = id.0, kind = %kind, target, "window opened");
        (id, true)
    }

    /// Focus a window by number or target
    pub fn focus(&mut self, selector: &str) -> Result<()> {
        let index = match selector.parse::<usize>() {
            Ok(number) if (1..=self.windows.len()).contains(&number) => Some(number - 1),
            Ok(_) => None,
            Err(_) if selector == "console" => Some(0),
            Err(_) => self.windows.iter().position(|w| w.target() == Some(selector)),
        };
        let index = index.ok_or_else(|| ReplError::UnknownWindow(selector.to_string()))?;
        self.active = index;
        Ok(())
    }

    /// Close a window by number, or the active one
    ///
    /// # Returns
    /// * `Result<WindowId>` - The closed window
    pub fn close(&mut self, selector: Option<&str>) -> Result<WindowId> {
        let index = match selector {
            None => self.active,
            Some(s) => s
                .parse::<usize>()
                .ok()
                .filter(|n| (1..=self.windows.len()).contains(n))
                .map(|n| n - 1)
                .ok_or_else(|| ReplError::UnknownWindow(s.to_string()))?,
        };
        if index == 0 {
            return Err("The console window cannot be closed.".into());
        }
        let window = self.windows.remove(index);
        if self.active >= index {
            self.active = self.active.saturating_sub(1);
        }
        tracing::debug!(window = window.id.0, "window closed");
        Ok(window.id)
    }

    /// Contact matching a bare JID or roster name
    pub fn find_contact(&self, who: &str) -> Option<&ContactConfig> {
        self.config
            .contacts
            .iter()
            .find(|c| c.jid == who || c.name.as_deref() == Some(who))
    }

    /// Room by JID
    pub fn find_room(&self, jid: &str) -> Option<&RoomConfig> {
        self.config.rooms.iter().find(|r| r.jid == jid)
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.aliases.iter().map(String::as_str)
    }

    pub fn add_alias(&mut self, name: &str) -> bool {
        self.aliases.insert(name.to_string())
    }

    pub fn remove_alias(&mut self, name: &str) -> bool {
        self.aliases.remove(name)
    }

    pub fn is_plugin_loaded(&self, name: &str) -> bool {
        self.loaded_plugins.contains(name)
    }

    /// Mark a plugin loaded; it must be installed
    pub fn load_plugin(&mut self, name: &str) -> Result<()> {
        if !self.installed_plugins().iter().any(|p| p == name) {
            return Err(format!(
                "No plugin {name} in {}",
                self.config.plugins_dir.display()
            )
            .into());
        }
        self.loaded_plugins.insert(name.to_string());
        Ok(())
    }

    pub fn unload_plugin(&mut self, name: &str) -> bool {
        self.loaded_plugins.remove(name)
    }

    /// Commands and completions `name` declares, if configured
    pub fn plugin_declaration(&self, name: &str) -> Option<&PluginConfig> {
        self.config.plugins.iter().find(|p| p.name == name)
    }

    /// Declarations of every loaded plugin
    pub fn loaded_plugin_declarations(&self) -> impl Iterator<Item = &PluginConfig> {
        self.config
            .plugins
            .iter()
            .filter(|p| self.loaded_plugins.contains(&p.name))
    }

    fn installed_plugins(&self) -> Vec<String> {
        list_dir(&self.config.plugins_dir)
    }

    fn window_names(&self, closable_only: bool) -> Vec<String> {
        let skip = usize::from(closable_only);
        let mut names: Vec<String> = (1 + skip..=self.windows.len())
            .map(|n| n.to_string())
            .collect();
        names.extend(
            self.windows
                .iter()
                .skip(skip)
                .filter_map(|w| w.target().map(str::to_string)),
        );
        if !closable_only {
            names.push("console".to_string());
        }
        names
    }
}

impl SessionSource for DemoSession {
    fn entries(&self, source: &Source) -> Vec<String> {
        let config = &self.config;
        match source {
            Source::Contacts => config
                .contacts
                .iter()
                .flat_map(|c| c.name.iter().chain(std::iter::once(&c.jid)))
                .cloned()
                .collect(),
            Source::Barejids => config.contacts.iter().map(|c| c.jid.clone()).collect(),
            Source::Groups => config
                .contacts
                .iter()
                .flat_map(|c| c.groups.iter().cloned())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
            Source::Fulljids => config
                .contacts
                .iter()
                .flat_map(|c| c.resources.iter().map(move |r| format!("{}/{r}", c.jid)))
                .collect(),
            Source::Accounts => config.accounts.clone(),
            Source::EnabledAccounts => config.enabled_accounts.clone(),
            Source::Bookmarks => config.bookmarks.clone(),
            Source::Invites => config.invites.clone(),
            Source::SubRequests => config.sub_requests.clone(),
            Source::TlsCerts => config.tls_certs.clone(),
            Source::Blocked => config.blocked.clone(),
            Source::RoomTriggers => config.room_triggers.clone(),
            Source::PgpKeys => config.pgp_keys.clone(),
            Source::Windows => self.window_names(false),
            Source::ClosableWindows => self.window_names(true),
            Source::Themes => list_dir(&config.themes_dir)
                .into_iter()
                .map(|name| name.trim_end_matches(".theme").to_string())
                .collect(),
            Source::Scripts => list_dir(&config.scripts_dir),
            Source::PluginsLoaded => self.loaded_plugins.iter().cloned().collect(),
            Source::PluginsUnloaded => self
                .installed_plugins()
                .into_iter()
                .filter(|p| !self.loaded_plugins.contains(p))
                .collect(),
            Source::Occupants(room) => self
                .find_room(room)
                .map(|r| r.occupants.keys().cloned().collect())
                .unwrap_or_default(),
            Source::OccupantJids(room) => self
                .find_room(room)
                .map(|r| {
                    r.occupants
                        .values()
                        .filter(|jid| !jid.is_empty())
                        .cloned()
                        .collect()
                })
                .unwrap_or_default(),
            Source::Resources(jid) => self
                .find_contact(jid)
                .map(|c| c.resources.clone())
                .unwrap_or_default(),
        }
    }

    fn room_subject(&self, room: &str) -> Option<String> {
        self.find_room(room).and_then(|r| r.subject.clone())
    }
}

/// Regular file names in `dir`, sorted; unreadable directories are empty
fn list_dir(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        tracing::trace!(dir = %dir.display(), "directory not readable");
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .flatten()
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| !name.starts_with('.'))
        .collect();
    names.sort();
    names
}

/// Room configuration form offered by `/room config`
pub fn room_config_form() -> DataForm {
    DataForm::new(vec![
        FormField::new("field1", FieldKind::TextSingle).with_values(["Lounge"]),
        FormField::new("field2", FieldKind::Boolean).with_values(["1"]),
        FormField::new("field3", FieldKind::ListSingle).with_options(["moderators", "anyone"]),
        FormField::new("field4", FieldKind::JidMulti)
            .with_values(["alice@example.org", "bob@example.org"]),
        FormField::new("field5", FieldKind::ListMulti)
            .with_options(["moderator", "participant", "visitor"])
            .with_values(["moderator", "participant"]),
        FormField::new("field6", FieldKind::TextPrivate),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WindowConfig;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn session() -> DemoSession {
        DemoSession::from_config(&SessionConfig::default())
    }

    #[test]
    fn test_starts_on_console() {
        let s = session();
        assert_eq!(s.windows().len(), 1);
        assert_eq!(s.active_window().kind, WindowKind::Console);
        assert!(!s.is_connected());
    }

    #[test]
    fn test_configured_windows_open_behind_console() {
        let mut config = SessionConfig::default();
        config.windows = vec![
            WindowConfig {
                kind: "muc".to_string(),
                target: Some("lounge@conference.example.org".to_string()),
            },
            WindowConfig {
                kind: "sidebar".to_string(),
                target: None,
            },
        ];
        let s = DemoSession::from_config(&config);
        assert_eq!(s.windows().len(), 2);
        assert_eq!(s.active_number(), 1);
    }

    #[test]
    fn test_connect_checks_account() {
        let mut s = session();
        assert!(s.connect(Some("nobody@example.org")).is_err());
        s.connect(Some("work@corp.example.com")).unwrap();
        assert!(s.is_connected());
        assert_eq!(s.account(), "work@corp.example.com");
        s.disconnect();
        assert!(!s.is_connected());
    }

    #[test]
    fn test_open_focus_close() {
        let mut s = session();
        let (chat, new) = s.open_window(WindowKind::Chat, "alice@example.org");
        assert!(new);
        let (again, new) = s.open_window(WindowKind::Chat, "alice@example.org");
        assert_eq!(chat, again);
        assert!(!new);

        s.focus("1").unwrap();
        assert_eq!(s.active_window().kind, WindowKind::Console);
        s.focus("alice@example.org").unwrap();
        assert_eq!(s.active_window().id, chat);
        assert!(s.focus("9").is_err());

        assert_eq!(s.close(None).unwrap(), chat);
        assert_eq!(s.active_window().kind, WindowKind::Console);
        assert!(s.close(None).is_err());
    }

    #[test]
    fn test_roster_entries() {
        let s = session();
        let contacts = s.entries(&Source::Contacts);
        assert!(contacts.contains(&"Alice Liddell".to_string()));
        assert!(contacts.contains(&"bob@example.org".to_string()));
        assert_eq!(s.entries(&Source::Groups), vec!["friends", "work"]);
        assert!(
            s.entries(&Source::Fulljids)
                .contains(&"alice@example.org/phone".to_string())
        );
        assert_eq!(
            s.entries(&Source::Resources("alice@example.org".to_string())),
            vec!["laptop", "phone"]
        );
    }

    #[test]
    fn test_room_entries() {
        let s = session();
        let room = "lounge@conference.example.org".to_string();
        assert_eq!(
            s.entries(&Source::Occupants(room.clone())),
            vec!["alice", "bob", "carol"]
        );
        assert_eq!(s.entries(&Source::OccupantJids(room.clone())).len(), 2);
        assert_eq!(s.room_subject(&room).as_deref(), Some("Welcome to the lounge"));
        assert!(s.entries(&Source::Occupants("nowhere@x".to_string())).is_empty());
    }

    #[test]
    fn test_window_entries() {
        let mut s = session();
        s.open_window(WindowKind::Muc, "lounge@conference.example.org");
        let all = s.entries(&Source::Windows);
        assert!(all.contains(&"1".to_string()));
        assert!(all.contains(&"console".to_string()));
        let closable = s.entries(&Source::ClosableWindows);
        assert!(!closable.contains(&"1".to_string()));
        assert!(closable.contains(&"2".to_string()));
        assert!(closable.contains(&"lounge@conference.example.org".to_string()));
    }

    #[test]
    fn test_directory_sources() {
        let dir = TempDir::new().unwrap();
        let plugins = dir.path().join("plugins");
        let themes = dir.path().join("themes");
        fs::create_dir(&plugins).unwrap();
        fs::create_dir(&themes).unwrap();
        fs::write(plugins.join("weather.py"), "").unwrap();
        fs::write(plugins.join("ascii.py"), "").unwrap();
        fs::write(themes.join("spawn.theme"), "").unwrap();
        fs::write(themes.join(".swap"), "").unwrap();

        let mut config = SessionConfig::default();
        config.plugins_dir = plugins;
        config.themes_dir = themes;
        let mut s = DemoSession::from_config(&config);

        assert_eq!(s.entries(&Source::Themes), vec!["spawn"]);
        assert_eq!(s.entries(&Source::PluginsUnloaded), vec!["ascii.py", "weather.py"]);
        s.load_plugin("weather.py").unwrap();
        assert_eq!(s.entries(&Source::PluginsLoaded), vec!["weather.py"]);
        assert_eq!(s.entries(&Source::PluginsUnloaded), vec!["ascii.py"]);
        assert!(s.load_plugin("missing.py").is_err());
    }

    #[test]
    fn test_missing_directories_are_empty() {
        let mut config = SessionConfig::default();
        config.scripts_dir = PathBuf::from("/definitely/not/here");
        let s = DemoSession::from_config(&config);
        assert!(s.entries(&Source::Scripts).is_empty());
    }
}
