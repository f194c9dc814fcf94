//! Live data the engine completes against
//!
//! The session layer owns rosters, rooms, accounts and the rest. The engine
//! only ever sees them through [`SessionSource`], as plain string sequences,
//! and copies what it needs into its own sets.

use std::fmt;
use std::str::FromStr;

/// A live collection the engine can ask the session layer for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    /// Roster contact names and bare JIDs
    Contacts,
    /// Roster bare JIDs only
    Barejids,
    /// Roster groups
    Groups,
    /// Full JIDs of every online resource
    Fulljids,
    /// Configured accounts
    Accounts,
    /// Enabled accounts
    EnabledAccounts,
    /// Bookmarked rooms
    Bookmarks,
    /// Pending room invites
    Invites,
    /// Pending subscription requests
    SubRequests,
    /// Trusted TLS certificate fingerprints
    TlsCerts,
    /// Blocked JIDs
    Blocked,
    /// Room notification triggers
    RoomTriggers,
    /// PGP key ids
    PgpKeys,
    /// Window numbers and names
    Windows,
    /// Windows that may be closed
    ClosableWindows,
    /// Installed themes
    Themes,
    /// Installed scripts
    Scripts,
    /// Loaded plugins
    PluginsLoaded,
    /// Installed plugins that are not loaded
    PluginsUnloaded,
    /// Nicknames present in a room
    Occupants(String),
    /// Real JIDs of a room's occupants
    OccupantJids(String),
    /// Online resources of a contact
    Resources(String),
}

/// How long a materialised dynamic set stays cached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// Until explicitly invalidated or the session ends
    Session,
    /// Until the next reset
    Completion,
    /// Until the owning window closes
    Window,
}

impl Source {
    /// Cache lifetime for this source
    pub fn lifetime(&self) -> Lifetime {
        match self {
            Source::Contacts
            | Source::Barejids
            | Source::Groups
            | Source::Fulljids
            | Source::Accounts
            | Source::EnabledAccounts
            | Source::Bookmarks
            | Source::Invites
            | Source::SubRequests
            | Source::TlsCerts
            | Source::Blocked
            | Source::RoomTriggers
            | Source::PgpKeys => Lifetime::Session,
            Source::Windows
            | Source::ClosableWindows
            | Source::Themes
            | Source::Scripts
            | Source::PluginsLoaded
            | Source::PluginsUnloaded => Lifetime::Completion,
            Source::Occupants(_) | Source::OccupantJids(_) | Source::Resources(_) => {
                Lifetime::Window
            }
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Occupants(room) => write!(f, "occupants({room})"),
            Source::OccupantJids(room) => write!(f, "occupant_jids({room})"),
            Source::Resources(jid) => write!(f, "resources({jid})"),
            other => f.write_str(&format!("{other:?}").to_lowercase()),
        }
    }
}

/// Producer of live entity lists
///
/// Implementations return a point-in-time snapshot; the engine never holds
/// on to anything borrowed from the session.
pub trait SessionSource {
    /// Current entries for `source`, in the session's own order
    fn entries(&self, source: &Source) -> Vec<String>;

    /// Current subject of a room
    fn room_subject(&self, _room: &str) -> Option<String> {
        None
    }
}

/// A session with nothing in it
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptySession;

impl SessionSource for EmptySession {
    fn entries(&self, _source: &Source) -> Vec<String> {
        Vec::new()
    }
}

/// Data form field type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldKind {
    Boolean,
    Fixed,
    Hidden,
    JidMulti,
    JidSingle,
    ListMulti,
    ListSingle,
    TextMulti,
    TextPrivate,
    #[default]
    TextSingle,
}

impl FieldKind {
    /// Multi-valued fields take `add`/`remove` subcommands
    pub fn is_multi(&self) -> bool {
        matches!(
            self,
            FieldKind::ListMulti | FieldKind::JidMulti | FieldKind::TextMulti
        )
    }
}

impl FromStr for FieldKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "boolean" => Ok(FieldKind::Boolean),
            "fixed" => Ok(FieldKind::Fixed),
            "hidden" => Ok(FieldKind::Hidden),
            "jid-multi" => Ok(FieldKind::JidMulti),
            "jid-single" => Ok(FieldKind::JidSingle),
            "list-multi" => Ok(FieldKind::ListMulti),
            "list-single" => Ok(FieldKind::ListSingle),
            "text-multi" => Ok(FieldKind::TextMulti),
            "text-private" => Ok(FieldKind::TextPrivate),
            "text-single" => Ok(FieldKind::TextSingle),
            other => Err(format!("unknown field type '{other}'")),
        }
    }
}

/// One field of a configuration form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormField {
    /// Short tag, completed as the command `/tag`
    pub tag: String,
    /// Field type
    pub kind: FieldKind,
    /// Selectable options (list fields)
    pub options: Vec<String>,
    /// Current values
    pub values: Vec<String>,
}

impl FormField {
    /// Create a field with no options or values
    pub fn new(tag: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            tag: tag.into(),
            kind,
            ..Self::default()
        }
    }

    /// Builder: set the options
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: set the current values
    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Candidates offered after `add`/`remove` or for a list-single field
    pub fn value_candidates(&self) -> &[String] {
        match self.kind {
            FieldKind::ListSingle | FieldKind::ListMulti => &self.options,
            _ => &self.values,
        }
    }
}

/// A room configuration form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DataForm {
    pub fields: Vec<FormField>,
}

impl DataForm {
    /// Create a form from its fields
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields }
    }

    /// Field tags in form order
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.tag.as_str())
    }

    /// Field by tag
    pub fn field(&self, tag: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.tag == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifetimes() {
        assert_eq!(Source::Contacts.lifetime(), Lifetime::Session);
        assert_eq!(Source::Themes.lifetime(), Lifetime::Completion);
        assert_eq!(Source::Windows.lifetime(), Lifetime::Completion);
        assert_eq!(
            Source::Occupants("room@conf".into()).lifetime(),
            Lifetime::Window
        );
    }

    #[test]
    fn test_source_display() {
        assert_eq!(Source::EnabledAccounts.to_string(), "enabledaccounts");
        assert_eq!(
            Source::Resources("bob@example.org".into()).to_string(),
            "resources(bob@example.org)"
        );
    }

    #[test]
    fn test_field_kind_parse() {
        assert_eq!("list-multi".parse::<FieldKind>(), Ok(FieldKind::ListMulti));
        assert!("list-many".parse::<FieldKind>().is_err());
        assert!(FieldKind::JidMulti.is_multi());
        assert!(!FieldKind::ListSingle.is_multi());
    }

    #[test]
    fn test_value_candidates_by_kind() {
        let list = FormField::new("whois", FieldKind::ListSingle)
            .with_options(["moderators", "anyone"])
            .with_values(["anyone"]);
        assert_eq!(list.value_candidates(), ["moderators", "anyone"]);

        let jids = FormField::new("admins", FieldKind::JidMulti).with_values(["a@x", "b@x"]);
        assert_eq!(jids.value_candidates(), ["a@x", "b@x"]);
    }

    #[test]
    fn test_form_lookup() {
        let form = DataForm::new(vec![
            FormField::new("public", FieldKind::Boolean),
            FormField::new("name", FieldKind::TextSingle),
        ]);
        assert_eq!(form.tags().collect::<Vec<_>>(), vec!["public", "name"]);
        assert!(form.field("name").is_some());
        assert!(form.field("missing").is_none());
    }
}
