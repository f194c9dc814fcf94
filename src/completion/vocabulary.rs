//! Static vocabulary
//!
//! Fixed argument values of every built-in command, and the command
//! definition table. Tables are plain data; [`Vocabulary`] turns them into
//! named [`PrefixSet`]s owned by the engine.

use std::collections::HashMap;

use super::prefix_set::PrefixSet;

/// A named list of literal argument values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Table {
    pub name: &'static str,
    pub items: &'static [&'static str],
}

impl Table {
    pub const fn new(name: &'static str, items: &'static [&'static str]) -> Self {
        Self { name, items }
    }
}

/// A built-in command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDef {
    /// Command name including the leading slash
    pub name: &'static str,
    /// Fewest arguments accepted
    pub min_args: usize,
    /// Most arguments accepted
    pub max_args: usize,
    /// One-line usage
    pub synopsis: &'static str,
}

impl CommandDef {
    pub const fn new(
        name: &'static str,
        min_args: usize,
        max_args: usize,
        synopsis: &'static str,
    ) -> Self {
        Self {
            name,
            min_args,
            max_args,
            synopsis,
        }
    }

    /// Help topic for the command: its name without the slash
    pub fn topic(&self) -> &'static str {
        self.name.trim_start_matches('/')
    }
}

/// Named static sets
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    sets: HashMap<&'static str, PrefixSet>,
}

impl Vocabulary {
    /// Every built-in table, with the command and help sets seeded from
    /// [`COMMAND_DEFS`]
    pub fn builtin() -> Self {
        let mut vocab = Self::from_tables(TABLES);
        for def in COMMAND_DEFS {
            vocab.add(COMMANDS.name, def.name);
            vocab.add(HELP.name, def.topic());
        }
        vocab
    }

    /// Sets for the given tables only
    pub fn from_tables(tables: &[Table]) -> Self {
        let sets = tables
            .iter()
            .map(|t| (t.name, PrefixSet::with_items(t.name, t.items.iter().copied())))
            .collect();
        Self { sets }
    }

    /// Set by name
    pub fn get(&self, name: &str) -> Option<&PrefixSet> {
        self.sets.get(name)
    }

    /// Mutable set by name
    pub fn get_mut(&mut self, name: &str) -> Option<&mut PrefixSet> {
        self.sets.get_mut(name)
    }

    /// Add `item` to the set `name`; no-op for an unknown set
    pub fn add(&mut self, name: &str, item: impl Into<String>) -> bool {
        self.sets.get_mut(name).is_some_and(|set| set.add(item))
    }

    /// Remove `item` from the set `name`; no-op for an unknown set
    pub fn remove(&mut self, name: &str, item: &str) -> bool {
        self.sets.get_mut(name).is_some_and(|set| set.remove(item))
    }

    /// Whether the set `name` contains `item`
    pub fn contains(&self, name: &str, item: &str) -> bool {
        self.sets.get(name).is_some_and(|set| set.contains(item))
    }

    /// Clear the cursor of every set
    pub fn reset(&mut self) {
        self.sets.values_mut().for_each(PrefixSet::reset);
    }

    /// Number of sets
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// True when no set is registered
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

/// Definition of a built-in command
pub fn command_def(name: &str) -> Option<&'static CommandDef> {
    COMMAND_DEFS.iter().find(|def| def.name == name)
}

pub const COMMANDS: Table = Table::new("commands", &[]);
pub const ALIASES: Table = Table::new("aliases", &[]);
pub const HELP: Table = Table::new("help", &["commands", "navigation", "search_all", "search_any"]);
pub const HELP_COMMANDS: Table = Table::new(
    "help_commands",
    &[
        "chat", "groupchat", "roster", "presence", "discovery", "connection", "ui", "plugins",
    ],
);
pub const PREFS: Table = Table::new(
    "prefs",
    &[
        "ui", "desktop", "chat", "log", "conn", "presence", "otr", "pgp",
    ],
);
pub const NOTIFY: Table = Table::new(
    "notify",
    &[
        "chat", "room", "typing", "remind", "invite", "sub", "on", "off", "mention", "trigger",
        "reset",
    ],
);
pub const NOTIFY_CHAT: Table = Table::new("notify_chat", &["on", "off", "current", "text"]);
pub const NOTIFY_ROOM: Table = Table::new(
    "notify_room",
    &[
        "on", "off", "mention", "current", "text", "trigger",
    ],
);
pub const NOTIFY_TYPING: Table = Table::new("notify_typing", &["on", "off", "current"]);
pub const NOTIFY_MENTION: Table = Table::new(
    "notify_mention",
    &[
        "on", "off", "case_sensitive", "case_insensitive", "word_whole", "word_part",
    ],
);
pub const NOTIFY_TRIGGER: Table = Table::new(
    "notify_trigger",
    &[
        "add", "remove", "list", "on", "off",
    ],
);
pub const SUB: Table = Table::new("sub", &["request", "allow", "deny", "show", "sent", "received"]);
pub const WINTITLE: Table = Table::new("wintitle", &["show", "goodbye"]);
pub const LOG: Table = Table::new("log", &["maxsize", "rotate", "shared", "where"]);
pub const AUTOAWAY: Table = Table::new("autoaway", &["mode", "time", "message", "check"]);
pub const AUTOAWAY_MODE: Table = Table::new("autoaway_mode", &["away", "idle", "off"]);
pub const AUTOAWAY_PRESENCE: Table = Table::new("autoaway_presence", &["away", "xa"]);
pub const AUTOCONNECT: Table = Table::new("autoconnect", &["set", "off"]);
pub const THEME: Table = Table::new("theme", &["load", "list", "colours", "properties"]);
pub const DISCO: Table = Table::new("disco", &["info", "items"]);
pub const ACCOUNT: Table = Table::new(
    "account",
    &[
        "list", "show", "add", "remove", "enable", "disable", "default", "rename", "set",
        "clear",
    ],
);
pub const ACCOUNT_SET: Table = Table::new(
    "account_set",
    &[
        "jid", "server", "port", "status", "online", "chat", "away", "xa", "dnd", "resource",
        "password", "eval_password", "muc", "nick", "otr", "pgpkeyid", "startscript", "tls",
        "theme",
    ],
);
pub const ACCOUNT_CLEAR: Table = Table::new(
    "account_clear",
    &[
        "password", "eval_password", "server", "port", "otr", "pgpkeyid", "startscript",
        "theme", "muc", "resource",
    ],
);
pub const ACCOUNT_DEFAULT: Table = Table::new("account_default", &["set", "off"]);
pub const ACCOUNT_STATUS: Table = Table::new(
    "account_status",
    &[
        "online", "chat", "away", "xa", "dnd", "last",
    ],
);
pub const WINS: Table = Table::new("wins", &["unread", "prune", "tidy", "autotidy", "swap"]);
pub const ROSTER: Table = Table::new(
    "roster",
    &[
        "add", "online", "nick", "clearnick", "remove", "remove_all", "show", "hide", "by",
        "count", "order", "unread", "room", "size", "wrap", "header", "contact", "resource",
        "presence", "private",
    ],
);
pub const ROSTER_PRIVATE: Table = Table::new("roster_private", &["room", "group", "off", "char"]);
pub const ROSTER_HEADER: Table = Table::new("roster_header", &["char"]);
pub const ROSTER_CONTACT: Table = Table::new("roster_contact", &["char", "indent"]);
pub const ROSTER_RESOURCE: Table = Table::new("roster_resource", &["char", "indent", "join"]);
pub const ROSTER_PRESENCE: Table = Table::new("roster_presence", &["indent"]);
pub const ROSTER_CHAR: Table = Table::new("roster_char", &["none"]);
pub const ROSTER_SHOW: Table = Table::new(
    "roster_show",
    &[
        "offline", "resource", "presence", "status", "empty", "priority", "contacts",
        "unsubscribed", "rooms",
    ],
);
pub const ROSTER_BY: Table = Table::new("roster_by", &["group", "presence", "none"]);
pub const ROSTER_COUNT: Table = Table::new("roster_count", &["unread", "items", "off", "zero"]);
pub const ROSTER_ORDER: Table = Table::new("roster_order", &["name", "presence"]);
pub const ROSTER_UNREAD: Table = Table::new("roster_unread", &["before", "after", "off"]);
pub const ROSTER_ROOM: Table = Table::new(
    "roster_room",
    &[
        "char", "position", "by", "order", "unread", "private",
    ],
);
pub const ROSTER_ROOM_BY: Table = Table::new("roster_room_by", &["service", "none"]);
pub const ROSTER_ROOM_ORDER: Table = Table::new("roster_room_order", &["name", "unread"]);
pub const ROSTER_ROOM_POSITION: Table = Table::new("roster_room_position", &["first", "last"]);
pub const ROSTER_REMOVE_ALL: Table = Table::new("roster_remove_all", &["contacts"]);
pub const GROUP: Table = Table::new("group", &["show", "add", "remove"]);
pub const WHO_ROSTER: Table = Table::new(
    "who_roster",
    &[
        "chat", "online", "away", "xa", "dnd", "offline", "available", "unavailable", "any",
    ],
);
pub const WHO_ROOM: Table = Table::new(
    "who_room",
    &[
        "chat", "online", "away", "xa", "dnd", "available", "unavailable", "moderator",
        "participant", "visitor", "owner", "admin", "member",
    ],
);
pub const BOOKMARK: Table = Table::new(
    "bookmark",
    &[
        "list", "add", "update", "remove", "join", "invites",
    ],
);
pub const BOOKMARK_PROPERTY: Table = Table::new(
    "bookmark_property",
    &[
        "nick", "password", "autojoin",
    ],
);
pub const OTR: Table = Table::new(
    "otr",
    &[
        "gen", "start", "end", "myfp", "theirfp", "trust", "untrust", "secret", "log", "libver",
        "policy", "question", "answer", "char",
    ],
);
pub const OTR_LOG: Table = Table::new("otr_log", &["on", "off", "redact"]);
pub const OTR_POLICY: Table = Table::new("otr_policy", &["manual", "opportunistic", "always"]);
pub const CONNECT_PROPERTY: Table = Table::new("connect_property", &["server", "port", "tls"]);
pub const TLS_PROPERTY: Table = Table::new(
    "tls_property",
    &[
        "force", "allow", "legacy", "disable",
    ],
);
pub const JOIN_PROPERTY: Table = Table::new("join_property", &["nick", "password"]);
pub const ALIAS: Table = Table::new("alias", &["add", "remove", "list"]);
pub const ROOM: Table = Table::new("room", &["accept", "destroy", "config"]);
pub const AFFILIATION: Table = Table::new(
    "affiliation",
    &[
        "owner", "admin", "member", "none", "outcast",
    ],
);
pub const ROLE: Table = Table::new("role", &["moderator", "participant", "visitor", "none"]);
pub const PRIVILEGE_CMD: Table = Table::new("privilege_cmd", &["list", "set"]);
pub const SUBJECT: Table = Table::new("subject", &["set", "edit", "prepend", "append", "clear"]);
pub const FORM: Table = Table::new("form", &["submit", "cancel", "show", "help"]);
pub const FORM_FIELD_MULTI: Table = Table::new("form_field_multi", &["add", "remove"]);
pub const OCCUPANTS: Table = Table::new("occupants", &["show", "hide", "default", "size"]);
pub const OCCUPANTS_DEFAULT: Table = Table::new("occupants_default", &["show", "hide"]);
pub const OCCUPANTS_SHOW: Table = Table::new("occupants_show", &["jid"]);
pub const TIME: Table = Table::new(
    "time",
    &[
        "console", "chat", "muc", "mucconfig", "private", "xml", "statusbar", "lastactivity",
    ],
);
pub const TIME_FORMAT: Table = Table::new("time_format", &["set", "off"]);
pub const RESOURCE: Table = Table::new("resource", &["set", "off", "title", "message"]);
pub const INPBLOCK: Table = Table::new("inpblock", &["timeout", "dynamic"]);
pub const RECEIPTS: Table = Table::new("receipts", &["send", "request"]);
pub const PGP: Table = Table::new(
    "pgp",
    &[
        "keys", "contacts", "setkey", "libver", "start", "end", "log", "char",
    ],
);
pub const PGP_LOG: Table = Table::new("pgp_log", &["on", "off", "redact"]);
pub const TLS: Table = Table::new(
    "tls",
    &[
        "allow", "always", "deny", "cert", "trust", "trusted", "revoke", "certpath", "show",
    ],
);
pub const TLS_CERTPATH: Table = Table::new("tls_certpath", &["set", "clear", "default"]);
pub const SCRIPT: Table = Table::new("script", &["run", "list", "show"]);
pub const CONSOLE: Table = Table::new("console", &["chat", "muc", "private"]);
pub const CONSOLE_MSG: Table = Table::new("console_msg", &["all", "first", "none"]);
pub const AUTOPING: Table = Table::new("autoping", &["set", "timeout"]);
pub const PLUGINS: Table = Table::new(
    "plugins",
    &[
        "install", "load", "unload", "reload", "python_version", "sourcepath",
    ],
);
pub const PLUGINS_SOURCEPATH: Table = Table::new("plugins_sourcepath", &["set", "clear"]);
pub const BLOCKED: Table = Table::new("blocked", &["add", "remove"]);
pub const TRAY: Table = Table::new("tray", &["on", "off", "read", "timer"]);
pub const PRESENCE: Table = Table::new("presence", &["titlebar", "console", "chat", "room"]);
pub const PRESENCE_SETTING: Table = Table::new("presence_setting", &["all", "online", "none"]);
pub const WINPOS: Table = Table::new("winpos", &["up", "down"]);
pub const BOOLEAN: Table = Table::new("boolean", &["on", "off"]);
pub const VCARD: Table = Table::new(
    "vcard",
    &[
        "add", "apply", "get", "photo", "refresh", "remove", "set",
    ],
);
pub const VCARD_SET: Table = Table::new("vcard_set", &["fullname", "name"]);
pub const VCARD_NAME: Table = Table::new(
    "vcard_name",
    &[
        "family", "given", "middle", "prefix", "suffix",
    ],
);
pub const VCARD_SET_PARAM: Table = Table::new(
    "vcard_set_param",
    &[
        "pobox", "extaddr", "street", "locality", "region", "pocode", "country", "type", "home",
        "work", "voice", "fax", "pager", "msg", "cell", "video", "bbs", "modem", "isdn", "pcs",
        "preferred", "parcel", "postal",
    ],
);
pub const VCARD_TOGGLE: Table = Table::new("vcard_toggle", &["on", "off"]);
pub const VCARD_ADDRESS_TYPE: Table = Table::new(
    "vcard_address_type",
    &[
        "domestic", "international",
    ],
);
pub const VCARD_ELEMENT: Table = Table::new(
    "vcard_element",
    &[
        "nickname", "birthday", "address", "tel", "email", "jid", "title", "role", "note",
        "url",
    ],
);
pub const VCARD_PHOTO: Table = Table::new("vcard_photo", &["open", "save"]);

/// Every static table, seeded into the vocabulary at init
pub const TABLES: &[Table] = &[
    COMMANDS,
    ALIASES,
    HELP,
    HELP_COMMANDS,
    PREFS,
    NOTIFY,
    NOTIFY_CHAT,
    NOTIFY_ROOM,
    NOTIFY_TYPING,
    NOTIFY_MENTION,
    NOTIFY_TRIGGER,
    SUB,
    WINTITLE,
    LOG,
    AUTOAWAY,
    AUTOAWAY_MODE,
    AUTOAWAY_PRESENCE,
    AUTOCONNECT,
    THEME,
    DISCO,
    ACCOUNT,
    ACCOUNT_SET,
    ACCOUNT_CLEAR,
    ACCOUNT_DEFAULT,
    ACCOUNT_STATUS,
    WINS,
    ROSTER,
    ROSTER_PRIVATE,
    ROSTER_HEADER,
    ROSTER_CONTACT,
    ROSTER_RESOURCE,
    ROSTER_PRESENCE,
    ROSTER_CHAR,
    ROSTER_SHOW,
    ROSTER_BY,
    ROSTER_COUNT,
    ROSTER_ORDER,
    ROSTER_UNREAD,
    ROSTER_ROOM,
    ROSTER_ROOM_BY,
    ROSTER_ROOM_ORDER,
    ROSTER_ROOM_POSITION,
    ROSTER_REMOVE_ALL,
    GROUP,
    WHO_ROSTER,
    WHO_ROOM,
    BOOKMARK,
    BOOKMARK_PROPERTY,
    OTR,
    OTR_LOG,
    OTR_POLICY,
    CONNECT_PROPERTY,
    TLS_PROPERTY,
    JOIN_PROPERTY,
    ALIAS,
    ROOM,
    AFFILIATION,
    ROLE,
    PRIVILEGE_CMD,
    SUBJECT,
    FORM,
    FORM_FIELD_MULTI,
    OCCUPANTS,
    OCCUPANTS_DEFAULT,
    OCCUPANTS_SHOW,
    TIME,
    TIME_FORMAT,
    RESOURCE,
    INPBLOCK,
    RECEIPTS,
    PGP,
    PGP_LOG,
    TLS,
    TLS_CERTPATH,
    SCRIPT,
    CONSOLE,
    CONSOLE_MSG,
    AUTOPING,
    PLUGINS,
    PLUGINS_SOURCEPATH,
    BLOCKED,
    TRAY,
    PRESENCE,
    PRESENCE_SETTING,
    WINPOS,
    BOOLEAN,
    VCARD,
    VCARD_SET,
    VCARD_NAME,
    VCARD_SET_PARAM,
    VCARD_TOGGLE,
    VCARD_ADDRESS_TYPE,
    VCARD_ELEMENT,
    VCARD_PHOTO,
];

/// Built-in commands
pub const COMMAND_DEFS: &[CommandDef] = &[
    CommandDef::new("/help", 0, 2, "/help [<area>|<command>|search_all|search_any] [<search_terms>]"),
    CommandDef::new("/about", 0, 0, "/about"),
    CommandDef::new("/connect", 0, 7, "/connect [<account>]"),
    CommandDef::new("/tls", 1, 3, "/tls allow"),
    CommandDef::new("/disconnect", 0, 0, "/disconnect"),
    CommandDef::new("/msg", 1, 2, "/msg <contact> [<message>]"),
    CommandDef::new("/roster", 0, 4, "/roster"),
    CommandDef::new("/blocked", 0, 2, "/blocked"),
    CommandDef::new("/group", 0, 3, "/group"),
    CommandDef::new("/info", 0, 1, "/info"),
    CommandDef::new("/caps", 0, 1, "/caps"),
    CommandDef::new("/software", 0, 1, "/software"),
    CommandDef::new("/status", 0, 1, "/status"),
    CommandDef::new("/resource", 1, 2, "/resource set <resource>"),
    CommandDef::new("/join", 0, 5, "/join"),
    CommandDef::new("/leave", 0, 0, "/leave"),
    CommandDef::new("/invite", 1, 2, "/invite <contact> [<message>]"),
    CommandDef::new("/invites", 0, 0, "/invites"),
    CommandDef::new("/decline", 1, 1, "/decline <room>"),
    CommandDef::new("/room", 1, 1, "/room accept|destroy|config"),
    CommandDef::new("/kick", 1, 2, "/kick <nick> [<reason>]"),
    CommandDef::new("/ban", 1, 2, "/ban <jid> [<reason>]"),
    CommandDef::new("/subject", 0, 2, "/subject set <subject>"),
    CommandDef::new("/affiliation", 1, 4, "/affiliation set <affiliation> <jid> [<reason>]"),
    CommandDef::new("/role", 1, 4, "/role set <role> <nick> [<reason>]"),
    CommandDef::new("/occupants", 1, 3, "/occupants show|hide [jid]"),
    CommandDef::new("/form", 1, 2, "/form show"),
    CommandDef::new("/rooms", 0, 1, "/rooms [<service>]"),
    CommandDef::new("/bookmark", 0, 8, "/bookmark"),
    CommandDef::new("/disco", 1, 2, "/disco info [<jid>]"),
    CommandDef::new("/sendfile", 1, 1, "/sendfile <file>"),
    CommandDef::new("/lastactivity", 0, 1, "/lastactivity on|off"),
    CommandDef::new("/nick", 1, 1, "/nick <nickname>"),
    CommandDef::new("/win", 1, 1, "/win console"),
    CommandDef::new("/wins", 0, 3, "/wins"),
    CommandDef::new("/sub", 1, 2, "/sub request [<jid>]"),
    CommandDef::new("/tiny", 1, 1, "/tiny <url>"),
    CommandDef::new("/who", 0, 2, "/who"),
    CommandDef::new("/close", 0, 1, "/close"),
    CommandDef::new("/clear", 0, 0, "/clear"),
    CommandDef::new("/quit", 0, 0, "/quit"),
    CommandDef::new("/privileges", 1, 1, "/privileges on|off"),
    CommandDef::new("/charset", 0, 0, "/charset"),
    CommandDef::new("/beep", 1, 1, "/beep on|off"),
    CommandDef::new("/console", 2, 2, "/console chat all|first|none"),
    CommandDef::new("/encwarn", 1, 1, "/encwarn on|off"),
    CommandDef::new("/presence", 2, 2, "/presence titlebar on|off"),
    CommandDef::new("/wrap", 1, 1, "/wrap on|off"),
    CommandDef::new("/time", 1, 3, "/time console|chat|muc|mucconfig|private|xml set <format>"),
    CommandDef::new("/inpblock", 2, 2, "/inpblock timeout <millis>"),
    CommandDef::new("/titlebar", 1, 1, "/titlebar up"),
    CommandDef::new("/mainwin", 1, 1, "/mainwin up"),
    CommandDef::new("/statusbar", 1, 1, "/statusbar up"),
    CommandDef::new("/inputwin", 1, 1, "/inputwin up"),
    CommandDef::new("/notify", 0, 4, "/notify chat on|off"),
    CommandDef::new("/flash", 1, 1, "/flash on|off"),
    CommandDef::new("/tray", 1, 2, "/tray on|off"),
    CommandDef::new("/intype", 1, 1, "/intype on|off"),
    CommandDef::new("/splash", 1, 1, "/splash on|off"),
    CommandDef::new("/autoconnect", 1, 2, "/autoconnect set <account>"),
    CommandDef::new("/vercheck", 0, 1, "/vercheck on|off"),
    CommandDef::new("/wintitle", 2, 2, "/wintitle show on|off"),
    CommandDef::new("/alias", 1, 3, "/alias list"),
    CommandDef::new("/chlog", 1, 1, "/chlog on|off"),
    CommandDef::new("/grlog", 1, 1, "/grlog on|off"),
    CommandDef::new("/states", 1, 1, "/states on|off"),
    CommandDef::new("/pgp", 1, 3, "/pgp libver"),
    CommandDef::new("/otr", 1, 3, "/otr libver"),
    CommandDef::new("/outtype", 1, 1, "/outtype on|off"),
    CommandDef::new("/gone", 1, 1, "/gone <minutes>"),
    CommandDef::new("/history", 1, 1, "/history on|off"),
    CommandDef::new("/log", 1, 2, "/log where"),
    CommandDef::new("/carbons", 1, 1, "/carbons on|off"),
    CommandDef::new("/receipts", 2, 2, "/receipts request on|off"),
    CommandDef::new("/reconnect", 1, 1, "/reconnect <seconds>"),
    CommandDef::new("/autoping", 2, 2, "/autoping set <seconds>"),
    CommandDef::new("/ping", 0, 1, "/ping [<jid>]"),
    CommandDef::new("/autoaway", 2, 3, "/autoaway mode idle|away|off"),
    CommandDef::new("/priority", 1, 1, "/priority <priority>"),
    CommandDef::new("/account", 0, 4, "/account"),
    CommandDef::new("/plugins", 0, 3, "/plugins"),
    CommandDef::new("/prefs", 0, 1, "/prefs [ui|desktop|chat|log|conn|presence|otr|pgp]"),
    CommandDef::new("/theme", 1, 2, "/theme list"),
    CommandDef::new("/xmlconsole", 0, 0, "/xmlconsole"),
    CommandDef::new("/away", 0, 1, "/away [<message>]"),
    CommandDef::new("/chat", 0, 1, "/chat [<message>]"),
    CommandDef::new("/dnd", 0, 1, "/dnd [<message>]"),
    CommandDef::new("/online", 0, 1, "/online [<message>]"),
    CommandDef::new("/xa", 0, 1, "/xa [<message>]"),
    CommandDef::new("/script", 1, 2, "/script run <script>"),
    CommandDef::new("/export", 1, 1, "/export <filepath>"),
    CommandDef::new("/vcard", 0, 7, "/vcard get [<nick|contact>]"),
];
