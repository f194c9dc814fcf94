use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;

use tempfile::TempDir;

use super::*;

/// Session with editable data
#[derive(Default)]
struct FakeSession {
    entries: RefCell<HashMap<Source, Vec<String>>>,
    subjects: HashMap<String, String>,
}

impl FakeSession {
    fn new() -> Self {
        let session = Self::default();
        session.set(
            Source::Contacts,
            &["Alice Smith", "alice@example.org", "bob@example.org"],
        );
        session.set(Source::Barejids, &["alice@example.org", "bob@example.org"]);
        session.set(
            Source::Fulljids,
            &["alice@example.org/laptop", "alice@example.org/phone"],
        );
        session.set(Source::Occupants("room@conf.example.org".into()), &["bob", "carol"]);
        session.set(Source::Resources("alice@example.org".into()), &["laptop", "phone"]);
        session.set(Source::Themes, &["boothj5"]);
        session
    }

    fn set(&self, source: Source, items: &[&str]) {
        self.entries
            .borrow_mut()
            .insert(source, items.iter().map(|s| s.to_string()).collect());
    }

    fn with_subject(mut self, room: &str, subject: &str) -> Self {
        self.subjects.insert(room.to_string(), subject.to_string());
        self
    }
}

impl SessionSource for FakeSession {
    fn entries(&self, source: &Source) -> Vec<String> {
        self.entries.borrow().get(source).cloned().unwrap_or_default()
    }

    fn room_subject(&self, room: &str) -> Option<String> {
        self.subjects.get(room).cloned()
    }
}

const ROOM: &str = "room@conf.example.org";

/// Engine plus the state a front end would keep around it
struct Shell {
    engine: CompletionEngine,
    session: FakeSession,
    window: Window,
    connection: ConnectionStatus,
}

impl Shell {
    fn new() -> Self {
        Self {
            engine: CompletionEngine::new(),
            session: FakeSession::new(),
            window: Window::console(),
            connection: ConnectionStatus::Connected,
        }
    }

    fn in_window(mut self, window: Window) -> Self {
        self.window = window;
        self
    }

    fn disconnected(mut self) -> Self {
        self.connection = ConnectionStatus::Disconnected;
        self
    }

    fn tab_dir(&mut self, input: &str, direction: Direction) -> Option<String> {
        let ctx = CompletionContext::new(input, direction, &self.window, self.connection);
        self.engine.complete(&ctx, &self.session)
    }

    fn tab(&mut self, input: &str) -> Option<String> {
        self.tab_dir(input, Direction::Forward)
    }

    /// Press TAB `times` times, feeding each result back
    fn presses(&mut self, input: &str, times: usize, direction: Direction) -> Vec<String> {
        let mut line = input.to_string();
        let mut seen = Vec::new();
        for _ in 0..times {
            match self.tab_dir(&line, direction) {
                Some(next) => {
                    seen.push(next.clone());
                    line = next;
                }
                None => break,
            }
        }
        seen
    }

    fn reset(&mut self) {
        let ctx = CompletionContext::new("", Direction::Forward, &self.window, self.connection);
        self.engine.reset(&ctx);
    }
}

fn muc() -> Window {
    Window::new(3, WindowKind::Muc, ROOM)
}

fn file_fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    File::create(dir.path().join("a.txt")).unwrap();
    File::create(dir.path().join(".hidden")).unwrap();
    dir
}

#[test]
fn test_single_match_repeats() {
    let mut set = PrefixSet::with_items("s", ["add", "list", "remove"]);
    assert_eq!(set.complete("a", Direction::Forward).as_deref(), Some("add"));
    assert_eq!(set.complete("add", Direction::Forward).as_deref(), Some("add"));
}

#[test]
fn test_two_matches_cycle() {
    let mut set = PrefixSet::with_items("s", ["on", "off"]);
    assert_eq!(set.complete("o", Direction::Forward).as_deref(), Some("off"));
    assert_eq!(set.complete("off", Direction::Forward).as_deref(), Some("on"));
    assert_eq!(set.complete("on", Direction::Forward).as_deref(), Some("off"));
}

#[test]
fn test_roster_room_private_descends() {
    let mut shell = Shell::new();
    assert_eq!(
        shell.tab("/roster room priv").as_deref(),
        Some("/roster room private ")
    );
    assert_eq!(
        shell.tab("/roster room private ").as_deref(),
        Some("/roster room private char")
    );
}

#[test]
fn test_sendfile_hides_dotfiles() {
    let dir = file_fixture();
    let mut shell = Shell::new();
    shell.engine = CompletionEngine::new()
        .with_filepath(FilePathCompleter::new().with_base_dir(dir.path()));

    assert_eq!(shell.tab("/sendfile ").as_deref(), Some("/sendfile a.txt"));
    assert_eq!(shell.tab("/sendfile a.txt").as_deref(), Some("/sendfile a.txt"));
    shell.reset();
    assert_eq!(shell.tab("/sendfile .").as_deref(), Some("/sendfile .hidden"));
}

#[test]
fn test_add_and_remove_command() {
    let mut shell = Shell::new();
    assert!(shell.engine.add_command("/foo"));
    assert!(shell.engine.contains_command("/foo"));
    assert_eq!(shell.tab("/fo").as_deref(), Some("/foo"));
    assert!(shell.engine.remove_command("/foo"));
    assert!(!shell.engine.contains_command("/foo"));
}

#[test]
fn test_fresh_results_extend_the_input() {
    let inputs = [
        "/rost",
        "/log ",
        "/roster room ",
        "/roster room priv",
        "/msg ali",
        "/account set ",
        "/vcard set 1 ",
        "/theme load ",
        "/console m",
        "  /log r",
    ];
    for input in inputs {
        let mut shell = Shell::new();
        if let Some(found) = shell.tab(input) {
            assert!(found.starts_with(input), "{input:?} -> {found:?}");
        }
    }
}

#[test]
fn test_deeper_property_level_cycles() {
    let mut shell = Shell::new();
    assert_eq!(
        shell.presses("/join room@x nick bob ", 3, Direction::Forward),
        vec![
            "/join room@x nick bob nick",
            "/join room@x nick bob password",
            "/join room@x nick bob nick",
        ]
    );

    let mut shell = Shell::new();
    assert_eq!(
        shell.presses("/connect acc server host ", 4, Direction::Forward),
        vec![
            "/connect acc server host port",
            "/connect acc server host server",
            "/connect acc server host tls",
            "/connect acc server host port",
        ]
    );
}

#[test]
fn test_wraps_after_n_plus_one_presses() {
    let mut shell = Shell::new();
    let forward = shell.presses("/log ", 5, Direction::Forward);
    assert_eq!(
        forward,
        vec!["/log maxsize", "/log rotate", "/log shared", "/log where", "/log maxsize"]
    );

    shell.reset();
    let backward = shell.presses("/log ", 5, Direction::Backward);
    assert_eq!(backward.first(), Some(&"/log where".to_string()));
    assert_eq!(backward.last(), Some(&"/log where".to_string()));
}

#[test]
fn test_direction_can_change_mid_cycle() {
    let mut shell = Shell::new();
    assert_eq!(shell.tab("/log ").as_deref(), Some("/log maxsize"));
    assert_eq!(shell.tab("/log maxsize").as_deref(), Some("/log rotate"));
    assert_eq!(
        shell.tab_dir("/log rotate", Direction::Backward).as_deref(),
        Some("/log maxsize")
    );
}

#[test]
fn test_reset_starts_a_new_cycle() {
    let mut shell = Shell::new();
    shell.presses("/log ", 3, Direction::Forward);
    shell.reset();
    shell.reset();
    assert_eq!(shell.tab("/log ").as_deref(), Some("/log maxsize"));
    assert!(shell.engine.contains_command("/log"));
}

#[test]
fn test_longer_path_uses_its_own_vocabulary() {
    let mut shell = Shell::new();
    assert_eq!(
        shell.tab("/roster room private o").as_deref(),
        Some("/roster room private off")
    );
    assert_eq!(shell.tab("/roster room o").as_deref(), Some("/roster room order "));
    assert_eq!(
        shell.tab("/account set work ot").as_deref(),
        Some("/account set work otr ")
    );
    assert_eq!(
        shell.tab("/account set work otr m").as_deref(),
        Some("/account set work otr manual")
    );
}

#[test]
fn test_filepath_never_offers_dot_entries() {
    let dir = file_fixture();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    let mut fp = FilePathCompleter::new().with_base_dir(dir.path());
    for input in ["/sendfile ", "/sendfile .", "/sendfile sub/"] {
        fp.reset();
        let mut line = input.to_string();
        for _ in 0..6 {
            let Some(next) = fp.complete(&line, "/sendfile", Direction::Forward) else {
                break;
            };
            let name = next.trim_start_matches("/sendfile ");
            let base = name.rsplit('/').next().unwrap_or(name);
            assert!(base != "." && base != "..", "{input:?} offered {next:?}");
            line = next;
        }
    }
}

#[test]
fn test_unknown_input_leaves_line_unchanged() {
    let mut shell = Shell::new();
    assert_eq!(shell.tab("/definitelynot "), None);
    assert_eq!(shell.tab("plain text"), None);
    assert_eq!(shell.tab("/roster zzz"), None);
    assert_eq!(shell.tab(""), None);
}

#[test]
fn test_contacts_need_connection() {
    let mut shell = Shell::new();
    assert_eq!(shell.tab("/msg ali").as_deref(), Some("/msg alice@example.org"));
    assert_eq!(shell.tab("/msg Ali").as_deref(), Some("/msg \"Alice Smith\""));

    let mut offline = Shell::new().disconnected();
    assert_eq!(offline.tab("/msg ali"), None);
}

#[test]
fn test_quoted_contact_key_is_unquoted() {
    let mut shell = Shell::new();
    assert_eq!(
        shell.tab("/msg \"Alice Smith\"").as_deref(),
        Some("/msg \"Alice Smith\"")
    );
}

#[test]
fn test_unclosed_quote_key_still_completes() {
    let mut shell = Shell::new();
    assert_eq!(
        shell.tab("/msg \"Alice").as_deref(),
        Some("/msg \"Alice Smith\"")
    );
    assert_eq!(shell.tab("/msg \"ali").as_deref(), Some("/msg alice@example.org"));
}

#[test]
fn test_room_window_completes_nicks() {
    let mut shell = Shell::new().in_window(muc());
    assert_eq!(shell.tab("/msg c").as_deref(), Some("/msg carol"));
    assert_eq!(shell.tab("/kick b").as_deref(), Some("/kick bob"));

    let mut console = Shell::new();
    assert_eq!(console.tab("/kick b"), None);
}

#[test]
fn test_full_jids_outside_rooms() {
    let mut shell = Shell::new();
    assert_eq!(
        shell.tab("/caps alice@example.org/").as_deref(),
        Some("/caps alice@example.org/laptop")
    );
}

#[test]
fn test_resources_in_chat_window() {
    let mut shell = Shell::new().in_window(Window::new(2, WindowKind::Chat, "alice@example.org"));
    assert_eq!(shell.tab("/resource set p").as_deref(), Some("/resource set phone"));

    let mut console = Shell::new();
    assert_eq!(console.tab("/resource set p"), None);
}

#[test]
fn test_subject_edit_expands_current_subject() {
    let mut shell = Shell::new().in_window(muc());
    shell.session = FakeSession::new().with_subject(ROOM, "Weekly sync");
    assert_eq!(
        shell.tab("/subject e").as_deref(),
        Some("/subject edit \"Weekly sync\"")
    );

    let mut console = Shell::new();
    assert_eq!(console.tab("/subject e").as_deref(), Some("/subject edit"));
}

#[test]
fn test_themes_include_default() {
    let mut shell = Shell::new();
    assert_eq!(shell.tab("/theme load ").as_deref(), Some("/theme load boothj5"));
    assert_eq!(
        shell.tab("/theme load boothj5").as_deref(),
        Some("/theme load default")
    );
}

#[test]
fn test_session_sets_refresh_on_invalidate() {
    let mut shell = Shell::new();
    assert_eq!(shell.tab("/msg bob").as_deref(), Some("/msg bob@example.org"));

    shell
        .session
        .set(Source::Contacts, &["bob@example.org", "bobby@example.org"]);
    shell.reset();
    assert_eq!(shell.tab("/msg bobby"), None);

    shell.engine.invalidate(&Source::Contacts);
    assert_eq!(
        shell.tab("/msg bobby").as_deref(),
        Some("/msg bobby@example.org")
    );
}

#[test]
fn test_disconnect_drops_session_sets() {
    let mut shell = Shell::new();
    shell.tab("/msg a");
    shell.session.set(Source::Contacts, &["zed@example.org"]);
    shell.engine.invalidate_session();
    shell.reset();
    assert_eq!(shell.tab("/msg z").as_deref(), Some("/msg zed@example.org"));
}

#[test]
fn test_closed_window_sets_are_dropped() {
    let mut shell = Shell::new().in_window(muc());
    assert_eq!(shell.tab("/kick b").as_deref(), Some("/kick bob"));

    shell
        .session
        .set(Source::Occupants(ROOM.into()), &["bob", "dave"]);
    shell.reset();
    assert_eq!(shell.tab("/kick d"), None);

    shell.engine.window_closed(WindowId(3));
    assert_eq!(shell.tab("/kick d").as_deref(), Some("/kick dave"));
}

#[test]
fn test_vcard_index_selects_sub_chain() {
    let mut shell = Shell::new();
    assert_eq!(shell.tab("/vcard set 2 h").as_deref(), Some("/vcard set 2 home "));
    assert_eq!(
        shell.tab("/vcard set 2 home ").as_deref(),
        Some("/vcard set 2 home off")
    );
    assert_eq!(
        shell.tab("/vcard set 2 type d").as_deref(),
        Some("/vcard set 2 type domestic")
    );
    assert_eq!(shell.tab("/vcard set x h"), None);
    assert_eq!(shell.tab("/vcard set n").as_deref(), Some("/vcard set name "));
    assert_eq!(
        shell.tab("/vcard set name g").as_deref(),
        Some("/vcard set name given")
    );
}

fn room_form() -> DataForm {
    DataForm::new(vec![
        FormField::new("public", FieldKind::Boolean),
        FormField::new("whois", FieldKind::ListSingle).with_options(["moderators", "anyone"]),
        FormField::new("admins", FieldKind::JidMulti).with_values(["a@example.org", "b@example.org"]),
        FormField::new("types", FieldKind::ListMulti)
            .with_options(["x", "y"])
            .with_values(["x"]),
        FormField::new("name", FieldKind::TextSingle),
    ])
}

#[test]
fn test_form_field_commands() {
    let config = Window::new(7, WindowKind::Config, ROOM);
    let mut shell = Shell::new().in_window(config);
    shell.engine.add_form(WindowId(7), room_form());

    assert_eq!(shell.tab("/pub").as_deref(), Some("/public"));
    assert_eq!(shell.tab("/public o").as_deref(), Some("/public off"));
    assert_eq!(shell.tab("/whois a").as_deref(), Some("/whois anyone"));
    assert_eq!(shell.tab("/admins ").as_deref(), Some("/admins add"));
    assert_eq!(
        shell.tab("/admins remove ").as_deref(),
        Some("/admins remove a@example.org")
    );
    assert_eq!(shell.tab("/admins add "), None);
    assert_eq!(shell.tab("/types add y").as_deref(), Some("/types add y"));
    assert_eq!(shell.tab("/name x"), None);
    assert_eq!(shell.tab("/form help p").as_deref(), Some("/form help public"));
}

#[test]
fn test_form_fields_only_in_their_window() {
    let mut shell = Shell::new();
    shell.engine.add_form(WindowId(7), room_form());
    assert_eq!(shell.tab("/public o"), None);
    assert_eq!(shell.tab("/form help p"), None);
}

#[test]
fn test_form_commands_go_with_the_window() {
    let config = Window::new(7, WindowKind::Config, ROOM);
    let mut shell = Shell::new().in_window(config);
    shell.engine.add_form(WindowId(7), room_form());
    shell.engine.window_closed(WindowId(7));
    assert!(!shell.engine.contains_command("/public"));
    assert_eq!(shell.tab("/public o"), None);
}

#[test]
fn test_guarded_root_falls_back() {
    let mut shell = Shell::new().in_window(muc());
    assert_eq!(shell.tab("/who mod").as_deref(), Some("/who moderator"));

    let mut console = Shell::new();
    assert_eq!(console.tab("/who o").as_deref(), Some("/who offline"));
}

#[test]
fn test_help_topics_cover_commands() {
    let mut shell = Shell::new();
    assert_eq!(shell.tab("/help rost").as_deref(), Some("/help roster"));
    assert_eq!(shell.tab("/help commands g").as_deref(), Some("/help commands groupchat"));
}
