//! Function-backed completers
//!
//! Each function receives the unquoted search key and answers from live
//! session data, the active window's form, or a room subject.

use super::context::{Direction, WindowKind};
use super::completer::Resolver;
use super::source::{FieldKind, Source};
use super::tokenizer::quote_if_spaced;
use super::vocabulary::{BOOLEAN, FORM_FIELD_MULTI};

/// Subject-edit abbreviations that expand to the current room subject
const SUBJECT_EDIT_KEYS: &[&str] = &["e", "ed", "edi", "edit", "edit ", "edit \""];

fn from_source(source: Source, key: &str, direction: Direction, r: &mut Resolver<'_>) -> Option<String> {
    r.source_set(&source)
        .complete(key, direction)
        .map(|found| quote_if_spaced(&found))
}

/// Target JID of the active window when it is of `kind`
fn window_target(r: &Resolver<'_>, kind: WindowKind) -> Option<String> {
    (r.ctx.window.kind == kind)
        .then(|| r.ctx.window.target().map(str::to_string))
        .flatten()
}

pub fn contacts(key: &str, direction: Direction, r: &mut Resolver<'_>) -> Option<String> {
    from_source(Source::Contacts, key, direction, r)
}

pub fn barejids(key: &str, direction: Direction, r: &mut Resolver<'_>) -> Option<String> {
    from_source(Source::Barejids, key, direction, r)
}

pub fn fulljids(key: &str, direction: Direction, r: &mut Resolver<'_>) -> Option<String> {
    from_source(Source::Fulljids, key, direction, r)
}

pub fn groups(key: &str, direction: Direction, r: &mut Resolver<'_>) -> Option<String> {
    from_source(Source::Groups, key, direction, r)
}

pub fn accounts(key: &str, direction: Direction, r: &mut Resolver<'_>) -> Option<String> {
    from_source(Source::Accounts, key, direction, r)
}

pub fn enabled_accounts(key: &str, direction: Direction, r: &mut Resolver<'_>) -> Option<String> {
    from_source(Source::EnabledAccounts, key, direction, r)
}

pub fn bookmarks(key: &str, direction: Direction, r: &mut Resolver<'_>) -> Option<String> {
    from_source(Source::Bookmarks, key, direction, r)
}

pub fn invites(key: &str, direction: Direction, r: &mut Resolver<'_>) -> Option<String> {
    from_source(Source::Invites, key, direction, r)
}

pub fn sub_requests(key: &str, direction: Direction, r: &mut Resolver<'_>) -> Option<String> {
    from_source(Source::SubRequests, key, direction, r)
}

pub fn tls_certs(key: &str, direction: Direction, r: &mut Resolver<'_>) -> Option<String> {
    from_source(Source::TlsCerts, key, direction, r)
}

pub fn blocked(key: &str, direction: Direction, r: &mut Resolver<'_>) -> Option<String> {
    from_source(Source::Blocked, key, direction, r)
}

pub fn room_triggers(key: &str, direction: Direction, r: &mut Resolver<'_>) -> Option<String> {
    from_source(Source::RoomTriggers, key, direction, r)
}

pub fn pgp_keys(key: &str, direction: Direction, r: &mut Resolver<'_>) -> Option<String> {
    from_source(Source::PgpKeys, key, direction, r)
}

pub fn windows(key: &str, direction: Direction, r: &mut Resolver<'_>) -> Option<String> {
    from_source(Source::Windows, key, direction, r)
}

pub fn closable_windows(key: &str, direction: Direction, r: &mut Resolver<'_>) -> Option<String> {
    from_source(Source::ClosableWindows, key, direction, r)
}

pub fn themes(key: &str, direction: Direction, r: &mut Resolver<'_>) -> Option<String> {
    from_source(Source::Themes, key, direction, r)
}

pub fn scripts(key: &str, direction: Direction, r: &mut Resolver<'_>) -> Option<String> {
    from_source(Source::Scripts, key, direction, r)
}

pub fn plugins_loaded(key: &str, direction: Direction, r: &mut Resolver<'_>) -> Option<String> {
    from_source(Source::PluginsLoaded, key, direction, r)
}

pub fn plugins_unloaded(key: &str, direction: Direction, r: &mut Resolver<'_>) -> Option<String> {
    from_source(Source::PluginsUnloaded, key, direction, r)
}

/// Nicknames in the active room
pub fn nicks(key: &str, direction: Direction, r: &mut Resolver<'_>) -> Option<String> {
    let room = window_target(r, WindowKind::Muc)?;
    from_source(Source::Occupants(room), key, direction, r)
}

/// Real JIDs of the active room's occupants
pub fn occupant_jids(key: &str, direction: Direction, r: &mut Resolver<'_>) -> Option<String> {
    let room = window_target(r, WindowKind::Muc)?;
    from_source(Source::OccupantJids(room), key, direction, r)
}

/// Resources of the chat partner, never quoted
pub fn resources(key: &str, direction: Direction, r: &mut Resolver<'_>) -> Option<String> {
    let jid = window_target(r, WindowKind::Chat)?;
    r.source_set(&Source::Resources(jid)).complete(key, direction)
}

/// Room nicks in a room window, roster bare JIDs elsewhere when connected
pub fn nicks_or_barejids(key: &str, direction: Direction, r: &mut Resolver<'_>) -> Option<String> {
    if r.ctx.window.kind == WindowKind::Muc {
        nicks(key, direction, r)
    } else if r.ctx.is_connected() {
        barejids(key, direction, r)
    } else {
        None
    }
}

/// Expands an abbreviation of `edit` to the room's current subject
pub fn subject_edit(key: &str, _direction: Direction, r: &mut Resolver<'_>) -> Option<String> {
    if !SUBJECT_EDIT_KEYS.contains(&key) {
        return None;
    }
    let room = window_target(r, WindowKind::Muc)?;
    let subject = r.room_subject(&room)?;
    Some(format!("edit \"{subject}\""))
}

/// Field tags of the active window's form
pub fn form_tags(key: &str, direction: Direction, r: &mut Resolver<'_>) -> Option<String> {
    let found = r.form()?.tags_mut().complete(key, direction)?;
    Some(quote_if_spaced(&found))
}

/// First argument of a form field command
///
/// Booleans take on/off, list-single fields one of their options and
/// multi-valued fields an add/remove subcommand.
pub fn form_field(key: &str, direction: Direction, r: &mut Resolver<'_>) -> Option<String> {
    let tag = r.command().trim_start_matches('/');
    let kind = r.form()?.kind(tag)?;
    let found = match kind {
        FieldKind::Boolean => r.vocab_set(BOOLEAN.name)?.complete(key, direction),
        FieldKind::ListSingle => r.form()?.values_mut(tag)?.complete(key, direction),
        k if k.is_multi() => r.vocab_set(FORM_FIELD_MULTI.name)?.complete(key, direction),
        _ => None,
    }?;
    Some(quote_if_spaced(&found))
}

/// Value after `/<tag> add`: list-multi options
pub fn form_field_add(key: &str, direction: Direction, r: &mut Resolver<'_>) -> Option<String> {
    form_values(key, direction, r, |kind| kind == FieldKind::ListMulti)
}

/// Value after `/<tag> remove`: options or current values of multi fields
pub fn form_field_remove(key: &str, direction: Direction, r: &mut Resolver<'_>) -> Option<String> {
    form_values(key, direction, r, |kind| kind.is_multi())
}

fn form_values(
    key: &str,
    direction: Direction,
    r: &mut Resolver<'_>,
    accepts: fn(FieldKind) -> bool,
) -> Option<String> {
    let tag = r.command().trim_start_matches('/');
    let form = r.form()?;
    if !accepts(form.kind(tag)?) {
        return None;
    }
    let found = form.values_mut(tag)?.complete(key, direction)?;
    Some(quote_if_spaced(&found))
}
