//! Argument grammar of the built-in commands
//!
//! Every command that completes arguments gets a [`Chain`]. Entries are
//! declared in try-order; where two entries overlap, the order below is the
//! behaviour. Shared sections (boolean settings, nick and contact arguments,
//! invites and the single-set commands) are declared before the per-command
//! sections and are therefore tried first.

use std::collections::HashMap;

use super::completer::{Chain, Completer, Guard, LookupFn};
use super::context::WindowKind;
use super::lookups;
use super::vocabulary::*;

/// Commands whose only argument is on/off
const BOOLEAN_COMMANDS: &[&str] = &[
    "/beep", "/intype", "/states", "/outtype", "/flash", "/splash", "/chlog", "/grlog",
    "/history", "/vercheck", "/privileges", "/wrap", "/winstidy", "/carbons", "/encwarn",
    "/lastactivity",
];

/// Commands taking a room nick in a room window
const NICK_COMMANDS: &[&str] = &["/msg", "/info", "/caps", "/status", "/software"];

/// Commands taking a roster contact outside room windows
const CONTACT_COMMANDS: &[&str] = &["/msg", "/info", "/status"];

/// Commands taking a full JID outside room windows
const RESOURCE_COMMANDS: &[&str] = &["/caps", "/software", "/ping"];

/// Commands taking a pending invite
const INVITE_COMMANDS: &[&str] = &["/decline", "/join"];

/// Commands with a single fixed argument set
const SINGLE_SET_COMMANDS: &[(&str, Table)] = &[
    ("/prefs", PREFS),
    ("/disco", DISCO),
    ("/room", ROOM),
    ("/autoping", AUTOPING),
    ("/titlebar", WINPOS),
    ("/mainwin", WINPOS),
    ("/statusbar", WINPOS),
    ("/inputwin", WINPOS),
];

/// States accepted by `/who` that take a roster group
const WHO_STATES: &[&str] = &[
    "any", "online", "offline", "chat", "away", "xa", "dnd", "available", "unavailable",
];

/// Time settings taking a format
const TIME_SETTINGS: &[&str] = &[
    "statusbar", "lastactivity", "console", "chat", "muc", "mucconfig", "private", "xml",
];

/// vCard parameters that toggle on/off
const VCARD_TOGGLABLE: &[&str] = &[
    "home", "work", "voice", "fax", "pager", "msg", "cell", "video", "bbs", "modem", "isdn",
    "pcs", "preferred", "parcel", "postal",
];

const MUC: Guard = Guard::only(WindowKind::Muc);
const CONFIG: Guard = Guard::only(WindowKind::Config);
const CONNECTED: Guard = Guard::CONNECTED;
const CONNECTED_NOT_MUC: Guard = Guard::except(WindowKind::Muc).and_connected();
const CONNECTED_CHAT: Guard = Guard::only(WindowKind::Chat).and_connected();

fn lit(table: Table) -> Completer {
    Completer::literal(table)
}

fn raw(table: Table) -> Completer {
    Completer::literal_unquoted(table)
}

fn func(f: LookupFn) -> Completer {
    Completer::lookup(f)
}

/// Chains under construction, keyed by command
#[derive(Default)]
struct Chains(HashMap<&'static str, Chain>);

impl Chains {
    fn add(&mut self, command: &'static str, chain: Chain) {
        let merged = self.0.remove(command).unwrap_or_default().then(chain);
        self.0.insert(command, merged);
    }
}

/// Build the chain of every built-in command
pub fn build() -> HashMap<&'static str, Chain> {
    let mut chains = Chains::default();
    shared(&mut chains);

    chains.add("/help", help());
    chains.add("/who", who());
    chains.add("/sub", sub());
    chains.add("/notify", notify());
    chains.add("/autoaway", autoaway());
    chains.add("/theme", theme());
    chains.add("/log", log());
    chains.add("/account", account());
    chains.add("/roster", roster());
    chains.add("/group", group());
    chains.add("/bookmark", bookmark());
    chains.add("/autoconnect", autoconnect());
    chains.add("/otr", otr());
    chains.add("/pgp", pgp());
    chains.add("/connect", connect());
    chains.add("/alias", alias());
    chains.add("/join", join());
    chains.add("/form", form());
    chains.add("/occupants", occupants());
    chains.add("/kick", Chain::new().root_when(MUC, func(lookups::nicks)));
    chains.add("/ban", Chain::new().root_when(MUC, func(lookups::occupant_jids)));
    chains.add("/affiliation", affiliation());
    chains.add("/role", role());
    chains.add("/resource", resource());
    chains.add("/wintitle", wintitle());
    chains.add("/inpblock", inpblock());
    chains.add("/time", time());
    chains.add("/receipts", receipts());
    chains.add("/wins", wins());
    chains.add("/tls", tls());
    chains.add("/script", script());
    chains.add("/subject", subject());
    chains.add("/console", console());
    chains.add("/win", Chain::new().root(func(lookups::windows)));
    chains.add("/close", Chain::new().root(func(lookups::closable_windows)));
    chains.add("/plugins", plugins());
    chains.add("/sendfile", Chain::new().root(Completer::FilePath));
    chains.add("/blocked", blocked());
    chains.add("/tray", tray());
    chains.add("/presence", presence());
    chains.add("/vcard", vcard());

    chains.0
}

/// Chain shared by every form field command (`/<tag>`)
pub fn form_field() -> Chain {
    Chain::new()
        .when(CONFIG, &["add"], func(lookups::form_field_add))
        .when(CONFIG, &["remove"], func(lookups::form_field_remove))
        .root_when(CONFIG, func(lookups::form_field))
}

fn shared(chains: &mut Chains) {
    for &command in BOOLEAN_COMMANDS {
        chains.add(command, Chain::new().root(lit(BOOLEAN)));
    }
    for &command in NICK_COMMANDS {
        chains.add(command, Chain::new().root_when(MUC, func(lookups::nicks)));
    }
    for &command in CONTACT_COMMANDS {
        chains.add(
            command,
            Chain::new().root_when(CONNECTED_NOT_MUC, func(lookups::contacts)),
        );
    }
    for &command in RESOURCE_COMMANDS {
        chains.add(
            command,
            Chain::new().root_when(CONNECTED_NOT_MUC, func(lookups::fulljids)),
        );
    }
    chains.add(
        "/invite",
        Chain::new().root_when(CONNECTED, func(lookups::contacts)),
    );
    for &command in INVITE_COMMANDS {
        chains.add(command, Chain::new().root(func(lookups::invites)));
    }
    for &(command, table) in SINGLE_SET_COMMANDS {
        chains.add(command, Chain::new().root(lit(table)));
    }
}

fn help() -> Chain {
    Chain::new()
        .at(&["commands"], lit(HELP_COMMANDS))
        .root(lit(HELP))
}

fn who() -> Chain {
    let mut chain = Chain::new().root_when(MUC, lit(WHO_ROOM));
    for &state in WHO_STATES {
        chain = chain.when(CONNECTED_NOT_MUC, &[state], func(lookups::groups));
    }
    chain.root_when(Guard::except(WindowKind::Muc), lit(WHO_ROSTER))
}

fn sub() -> Chain {
    Chain::new()
        .at(&["allow"], func(lookups::sub_requests))
        .at(&["deny"], func(lookups::sub_requests))
        .root(lit(SUB))
}

fn notify() -> Chain {
    Chain::new()
        .at(&["room", "trigger", "remove"], func(lookups::room_triggers))
        .at(&["room", "current"], lit(BOOLEAN))
        .at(&["chat", "current"], lit(BOOLEAN))
        .at(&["typing", "current"], lit(BOOLEAN))
        .at(&["room", "text"], lit(BOOLEAN))
        .at(&["chat", "text"], lit(BOOLEAN))
        .at(&["room", "mention"], lit(NOTIFY_MENTION))
        .at(&["room", "trigger"], lit(NOTIFY_TRIGGER))
        .at(&["room"], lit(NOTIFY_ROOM))
        .at(&["chat"], lit(NOTIFY_CHAT))
        .at(&["typing"], lit(NOTIFY_TYPING))
        .at(&["invite"], lit(BOOLEAN))
        .at(&["sub"], lit(BOOLEAN))
        .at(&["mention"], lit(BOOLEAN))
        .at(&["trigger"], lit(BOOLEAN))
        .root(lit(NOTIFY))
}

fn autoaway() -> Chain {
    Chain::new()
        .at(&["mode"], lit(AUTOAWAY_MODE))
        .at(&["time"], lit(AUTOAWAY_PRESENCE))
        .at(&["message"], lit(AUTOAWAY_PRESENCE))
        .at(&["check"], lit(BOOLEAN))
        .root(lit(AUTOAWAY))
}

fn theme() -> Chain {
    Chain::new()
        .at(&["load"], func(lookups::themes))
        .root(lit(THEME))
}

fn log() -> Chain {
    Chain::new()
        .at(&["rotate"], lit(BOOLEAN))
        .at(&["shared"], lit(BOOLEAN))
        .root(lit(LOG))
}

fn account() -> Chain {
    let mut chain = Chain::new()
        .at(&["set", "*"], lit(ACCOUNT_SET))
        .at(&["set", "*", "otr"], lit(OTR_POLICY))
        .at(&["set", "*", "status"], lit(ACCOUNT_STATUS))
        .at(&["set", "*", "tls"], lit(TLS_PROPERTY))
        .at(&["set", "*", "startscript"], func(lookups::scripts))
        .at(&["set", "*", "theme"], func(lookups::themes))
        .at(&["set", "*", "pgpkeyid"], func(lookups::pgp_keys))
        .at(&["clear", "*"], lit(ACCOUNT_CLEAR))
        .at(&["default"], lit(ACCOUNT_DEFAULT));
    for subcommand in ["set", "show", "enable", "disable", "rename", "clear", "remove"] {
        chain = chain.at(&[subcommand], func(lookups::accounts));
    }
    chain
        .at(&["default", "set"], func(lookups::accounts))
        .root(lit(ACCOUNT))
}

fn roster() -> Chain {
    Chain::new()
        .at(&["room", "private", "char"], lit(ROSTER_CHAR))
        .at(&["room", "private"], lit(ROSTER_HEADER))
        .at(&["header", "char"], lit(ROSTER_CHAR))
        .at(&["contact", "char"], lit(ROSTER_CHAR))
        .at(&["room", "char"], lit(ROSTER_CHAR))
        .at(&["private", "char"], lit(ROSTER_CHAR))
        .at(&["resource", "char"], lit(ROSTER_CHAR))
        .at(&["resource", "join"], lit(BOOLEAN))
        .at(&["room", "position"], lit(ROSTER_ROOM_POSITION))
        .at(&["room", "by"], lit(ROSTER_ROOM_BY))
        .at(&["room", "order"], lit(ROSTER_ROOM_ORDER))
        .at(&["room", "unread"], lit(ROSTER_UNREAD))
        .at(&["count", "zero"], lit(BOOLEAN))
        .when(CONNECTED, &["nick"], func(lookups::barejids))
        .when(CONNECTED, &["clearnick"], func(lookups::barejids))
        .when(CONNECTED, &["remove"], func(lookups::barejids))
        .at(&["remove_all"], lit(ROSTER_REMOVE_ALL))
        .at(&["show"], lit(ROSTER_SHOW))
        .at(&["hide"], lit(ROSTER_SHOW))
        .at(&["by"], lit(ROSTER_BY))
        .at(&["count"], lit(ROSTER_COUNT))
        .at(&["order"], lit(ROSTER_ORDER))
        .at(&["unread"], lit(ROSTER_UNREAD))
        .at(&["room"], lit(ROSTER_ROOM))
        .at(&["wrap"], lit(BOOLEAN))
        .at(&["header"], lit(ROSTER_HEADER))
        .at(&["contact"], lit(ROSTER_CONTACT))
        .at(&["resource"], lit(ROSTER_RESOURCE))
        .at(&["presence"], lit(ROSTER_PRESENCE))
        .at(&["private"], lit(ROSTER_PRIVATE))
        .root(lit(ROSTER))
}

fn group() -> Chain {
    Chain::new()
        .when(CONNECTED, &["show"], func(lookups::groups))
        .when(CONNECTED, &["add", "*"], func(lookups::contacts))
        .when(CONNECTED, &["remove", "*"], func(lookups::contacts))
        .when(CONNECTED, &["add"], func(lookups::groups))
        .when(CONNECTED, &["remove"], func(lookups::groups))
        .root(lit(GROUP))
}

fn bookmark() -> Chain {
    let mut chain = Chain::new();
    for subcommand in ["add", "update"] {
        chain = chain
            .at(&[subcommand, "*"], lit(BOOKMARK_PROPERTY))
            .at(&[subcommand, "*", "autojoin"], lit(BOOLEAN))
            .at(&[subcommand, "*", "*", "*"], lit(BOOKMARK_PROPERTY))
            .at(&[subcommand, "*", "*", "*", "autojoin"], lit(BOOLEAN))
            .at(&[subcommand, "*", "*", "*", "*", "*"], lit(BOOKMARK_PROPERTY))
            .at(&[subcommand, "*", "*", "*", "*", "*", "autojoin"], lit(BOOLEAN));
    }
    chain
        .at(&["remove"], func(lookups::bookmarks))
        .at(&["join"], func(lookups::bookmarks))
        .at(&["update"], func(lookups::bookmarks))
        .at(&["invites"], lit(BOOLEAN))
        .root(lit(BOOKMARK))
}

fn autoconnect() -> Chain {
    Chain::new()
        .at(&["set"], func(lookups::enabled_accounts))
        .root(lit(AUTOCONNECT))
}

fn otr() -> Chain {
    Chain::new()
        .when(CONNECTED, &["start"], func(lookups::contacts))
        .at(&["log"], lit(OTR_LOG))
        .when(CONNECTED, &["policy", "*"], func(lookups::contacts))
        .at(&["policy"], lit(OTR_POLICY))
        .root(lit(OTR))
}

fn pgp() -> Chain {
    Chain::new()
        .when(CONNECTED, &["start"], func(lookups::contacts))
        .at(&["log"], lit(PGP_LOG))
        .at(&["*", "*"], func(lookups::pgp_keys))
        .when(CONNECTED, &["setkey"], func(lookups::barejids))
        .root(lit(PGP))
}

fn connect() -> Chain {
    Chain::new()
        .at(&["*"], lit(CONNECT_PROPERTY))
        .at(&["*", "tls"], lit(TLS_PROPERTY))
        .at(&["*", "*", "*"], lit(CONNECT_PROPERTY))
        .at(&["*", "*", "*", "tls"], lit(TLS_PROPERTY))
        .at(&["*", "*", "*", "*", "*"], lit(CONNECT_PROPERTY))
        .at(&["*", "*", "*", "*", "*", "tls"], lit(TLS_PROPERTY))
        .root(func(lookups::enabled_accounts))
}

fn alias() -> Chain {
    Chain::new()
        .at(&["remove"], lit(ALIASES))
        .root(lit(ALIAS))
}

fn join() -> Chain {
    Chain::new()
        .at(&["*"], lit(JOIN_PROPERTY))
        .at(&["*", "*", "*"], lit(JOIN_PROPERTY))
        .root(func(lookups::bookmarks))
}

fn form() -> Chain {
    Chain::new()
        .when(CONFIG, &["help"], func(lookups::form_tags))
        .root_when(CONFIG, lit(FORM))
}

fn occupants() -> Chain {
    Chain::new()
        .at(&["default", "show"], lit(OCCUPANTS_SHOW))
        .at(&["default", "hide"], lit(OCCUPANTS_SHOW))
        .at(&["default"], lit(OCCUPANTS_DEFAULT))
        .at(&["show"], lit(OCCUPANTS_SHOW))
        .at(&["hide"], lit(OCCUPANTS_SHOW))
        .root(lit(OCCUPANTS))
}

fn affiliation() -> Chain {
    Chain::new()
        .when(MUC, &["*", "*"], func(lookups::occupant_jids))
        .at(&["set"], lit(AFFILIATION))
        .at(&["list"], lit(AFFILIATION))
        .root(lit(PRIVILEGE_CMD))
}

fn role() -> Chain {
    Chain::new()
        .when(MUC, &["*", "*"], func(lookups::nicks))
        .at(&["set"], lit(ROLE))
        .at(&["list"], lit(ROLE))
        .root(lit(PRIVILEGE_CMD))
}

fn resource() -> Chain {
    Chain::new()
        .when(CONNECTED_CHAT, &["set"], func(lookups::resources))
        .at(&["title"], lit(BOOLEAN))
        .at(&["message"], lit(BOOLEAN))
        .root(raw(RESOURCE))
}

fn wintitle() -> Chain {
    Chain::new()
        .at(&["show"], lit(BOOLEAN))
        .at(&["goodbye"], lit(BOOLEAN))
        .root(raw(WINTITLE))
}

fn inpblock() -> Chain {
    Chain::new()
        .at(&["dynamic"], lit(BOOLEAN))
        .root(raw(INPBLOCK))
}

fn time() -> Chain {
    let mut chain = Chain::new();
    for &setting in TIME_SETTINGS {
        chain = chain.at(&[setting], lit(TIME_FORMAT));
    }
    chain.root(lit(TIME))
}

fn receipts() -> Chain {
    Chain::new()
        .at(&["send"], lit(BOOLEAN))
        .at(&["request"], lit(BOOLEAN))
        .root(lit(RECEIPTS))
}

fn wins() -> Chain {
    Chain::new()
        .at(&["autotidy"], lit(BOOLEAN))
        .root(lit(WINS))
}

fn tls() -> Chain {
    Chain::new()
        .at(&["revoke"], func(lookups::tls_certs))
        .at(&["cert"], func(lookups::tls_certs))
        .at(&["certpath"], lit(TLS_CERTPATH))
        .at(&["show"], lit(BOOLEAN))
        .root(lit(TLS))
}

fn script() -> Chain {
    Chain::new()
        .at(&["show"], func(lookups::scripts))
        .at(&["run"], func(lookups::scripts))
        .root(lit(SCRIPT))
}

fn subject() -> Chain {
    Chain::new()
        .root_when(MUC, func(lookups::subject_edit))
        .root(lit(SUBJECT))
}

fn console() -> Chain {
    Chain::new()
        .at(&["chat"], lit(CONSOLE_MSG))
        .at(&["muc"], lit(CONSOLE_MSG))
        .at(&["private"], lit(CONSOLE_MSG))
        .root(lit(CONSOLE))
}

fn plugins() -> Chain {
    Chain::new()
        .at(&["sourcepath", "set"], Completer::FilePath)
        .at(&["install"], Completer::FilePath)
        .at(&["sourcepath"], lit(PLUGINS_SOURCEPATH))
        .at(&["load"], func(lookups::plugins_unloaded))
        .at(&["reload"], func(lookups::plugins_loaded))
        .at(&["unload"], func(lookups::plugins_loaded))
        .root(lit(PLUGINS))
}

fn blocked() -> Chain {
    Chain::new()
        .at(&["remove"], func(lookups::blocked))
        .root(raw(BLOCKED))
}

fn tray() -> Chain {
    Chain::new()
        .at(&["read"], lit(BOOLEAN))
        .root(raw(TRAY))
}

fn presence() -> Chain {
    Chain::new()
        .at(&["titlebar"], lit(BOOLEAN))
        .at(&["console"], lit(PRESENCE_SETTING))
        .at(&["chat"], lit(PRESENCE_SETTING))
        .at(&["room"], lit(PRESENCE_SETTING))
        .root(lit(PRESENCE))
}

fn vcard() -> Chain {
    let mut chain = Chain::new();
    for &param in VCARD_TOGGLABLE {
        chain = chain.at(&["set", "#", param], lit(VCARD_TOGGLE));
    }
    chain
        .at(&["set", "#", "type"], lit(VCARD_ADDRESS_TYPE))
        .at(&["set", "#"], lit(VCARD_SET_PARAM))
        .at(&["set", "name"], lit(VCARD_NAME))
        .at(&["set"], lit(VCARD_SET))
        .at(&["add"], lit(VCARD_ELEMENT))
        .at(&["photo", "open"], func(lookups::nicks_or_barejids))
        .at(&["photo", "save"], func(lookups::nicks_or_barejids))
        .at(&["get"], func(lookups::nicks_or_barejids))
        .at(&["photo"], lit(VCARD_PHOTO))
        .root(lit(VCARD))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_every_chain_belongs_to_a_builtin_command() {
        for name in build().keys() {
            assert!(command_def(name).is_some(), "{name} has no definition");
        }
    }

    #[test]
    fn test_every_literal_set_exists() {
        let tables: HashSet<&str> = TABLES.iter().map(|t| t.name).collect();
        for (name, chain) in build() {
            for set in Completer::Chain(chain).literal_sets() {
                assert!(tables.contains(set), "{name} reads unknown set {set}");
            }
        }
        for set in Completer::Chain(form_field()).literal_sets() {
            assert!(tables.contains(set), "form fields read unknown set {set}");
        }
    }

    #[test]
    fn test_shared_sections_come_first() {
        let chains = build();
        let join = chains["/join"].entries();
        assert!(join[0].path.is_empty());
        assert_eq!(join.last().map(|e| e.path.is_empty()), Some(true));
        assert_eq!(chains["/msg"].len(), 2);
        assert_eq!(chains["/ping"].len(), 1);
    }
}
