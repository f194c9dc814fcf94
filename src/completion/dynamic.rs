//! Lazily materialised completion sets
//!
//! Sets are built from [`SessionSource`] on first use and cached according
//! to [`Source::lifetime`]. Window-owned state (room occupants, resources and
//! the configuration form) lives under the window's id and is dropped in one
//! go when the window closes.

use std::collections::HashMap;

use super::context::WindowId;
use super::prefix_set::PrefixSet;
use super::source::{DataForm, FieldKind, Lifetime, SessionSource, Source};

/// Theme that is always available even when no theme directory exists
const DEFAULT_THEME: &str = "default";

/// Completion sets derived from a configuration form
#[derive(Debug, Clone)]
pub struct FormSets {
    form: DataForm,
    tags: PrefixSet,
    values: HashMap<String, PrefixSet>,
}

impl FormSets {
    /// Build the tag set and one value set per field
    pub fn new(form: DataForm) -> Self {
        let tags = PrefixSet::with_items("form_tags", form.tags());
        let values = form
            .fields
            .iter()
            .map(|field| {
                let set = PrefixSet::with_items(
                    format!("form_values({})", field.tag),
                    field.value_candidates().iter().cloned(),
                );
                (field.tag.clone(), set)
            })
            .collect();
        Self { form, tags, values }
    }

    /// The form these sets were built from
    pub fn form(&self) -> &DataForm {
        &self.form
    }

    /// Field tags
    pub fn tags_mut(&mut self) -> &mut PrefixSet {
        &mut self.tags
    }

    /// Kind of the field tagged `tag`
    pub fn kind(&self, tag: &str) -> Option<FieldKind> {
        self.form.field(tag).map(|f| f.kind)
    }

    /// Value set of the field tagged `tag`
    pub fn values_mut(&mut self, tag: &str) -> Option<&mut PrefixSet> {
        self.values.get_mut(tag)
    }

    fn reset(&mut self) {
        self.tags.reset();
        self.values.values_mut().for_each(PrefixSet::reset);
    }
}

/// Everything a single window owns
#[derive(Debug, Clone, Default)]
struct WindowSets {
    sets: HashMap<Source, PrefixSet>,
    form: Option<FormSets>,
}

/// Storage for every dynamic set, split by lifetime
#[derive(Debug, Clone, Default)]
pub struct DynamicSets {
    session: HashMap<Source, PrefixSet>,
    completion: HashMap<Source, PrefixSet>,
    windows: HashMap<WindowId, WindowSets>,
}

impl DynamicSets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached set for `source`, materialised from `session` on first use
    ///
    /// # Arguments
    /// * `source` - Collection to complete against
    /// * `window` - Active window, owner of window-lifetime sets
    /// * `session` - Live data producer
    pub fn get_or_load(
        &mut self,
        source: &Source,
        window: WindowId,
        session: &dyn SessionSource,
    ) -> &mut PrefixSet {
        let map = match source.lifetime() {
            Lifetime::Session => &mut self.session,
            Lifetime::Completion => &mut self.completion,
            Lifetime::Window => &mut self.windows.entry(window).or_default().sets,
        };
        map.entry(source.clone()).or_insert_with(|| load(source, session))
    }

    /// Whether `source` is currently materialised for `window`
    pub fn is_loaded(&self, source: &Source, window: WindowId) -> bool {
        match source.lifetime() {
            Lifetime::Session => self.session.contains_key(source),
            Lifetime::Completion => self.completion.contains_key(source),
            Lifetime::Window => self
                .windows
                .get(&window)
                .is_some_and(|w| w.sets.contains_key(source)),
        }
    }

    /// Drop the cached set for `source` everywhere it is held
    pub fn invalidate(&mut self, source: &Source) {
        match source.lifetime() {
            Lifetime::Session => {
                self.session.remove(source);
            }
            Lifetime::Completion => {
                self.completion.remove(source);
            }
            Lifetime::Window => {
                for window in self.windows.values_mut() {
                    window.sets.remove(source);
                }
            }
        }
        tracing::debug!(source = %source, "dynamic set invalidated");
    }

    /// Drop every session-lifetime set
    pub fn invalidate_session(&mut self) {
        self.session.clear();
        tracing::debug!("session sets invalidated");
    }

    /// Attach a configuration form to a window, replacing any previous one
    pub fn set_form(&mut self, window: WindowId, form: DataForm) {
        self.windows.entry(window).or_default().form = Some(FormSets::new(form));
    }

    /// Form sets owned by `window`
    pub fn form_mut(&mut self, window: WindowId) -> Option<&mut FormSets> {
        self.windows.get_mut(&window).and_then(|w| w.form.as_mut())
    }

    /// Form attached to `window`
    pub fn form(&self, window: WindowId) -> Option<&DataForm> {
        self.windows
            .get(&window)
            .and_then(|w| w.form.as_ref())
            .map(FormSets::form)
    }

    /// Drop everything `window` owns
    ///
    /// # Returns
    /// * `Option<DataForm>` - The form the window carried, if any
    pub fn window_closed(&mut self, window: WindowId) -> Option<DataForm> {
        let owned = self.windows.remove(&window)?;
        tracing::debug!(window = window.0, sets = owned.sets.len(), "window sets dropped");
        owned.form.map(|f| f.form)
    }

    /// Clear cursors and drop completion-lifetime sets
    pub fn reset(&mut self) {
        self.completion.clear();
        self.session.values_mut().for_each(PrefixSet::reset);
        for window in self.windows.values_mut() {
            window.sets.values_mut().for_each(PrefixSet::reset);
            if let Some(form) = window.form.as_mut() {
                form.reset();
            }
        }
    }

    /// Drop everything
    pub fn clear(&mut self) {
        self.session.clear();
        self.completion.clear();
        self.windows.clear();
    }
}

fn load(source: &Source, session: &dyn SessionSource) -> PrefixSet {
    let mut set = PrefixSet::with_items(source.to_string(), session.entries(source));
    if *source == Source::Themes {
        set.add(DEFAULT_THEME);
    }
    tracing::trace!(source = %source, size = set.len(), "dynamic set loaded");
    set
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::completion::context::Direction;
    use crate::completion::source::FormField;

    struct CountingSession {
        calls: Cell<usize>,
    }

    impl SessionSource for CountingSession {
        fn entries(&self, source: &Source) -> Vec<String> {
            self.calls.set(self.calls.get() + 1);
            match source {
                Source::Contacts => vec!["alice".into(), "bob".into()],
                Source::Themes => vec!["boothj5".into()],
                Source::Occupants(_) => vec!["nick1".into()],
                _ => Vec::new(),
            }
        }
    }

    fn session() -> CountingSession {
        CountingSession { calls: Cell::new(0) }
    }

    #[test]
    fn test_session_sets_are_cached_until_invalidated() {
        let s = session();
        let mut sets = DynamicSets::new();
        let win = WindowId(1);
        assert_eq!(sets.get_or_load(&Source::Contacts, win, &s).len(), 2);
        sets.get_or_load(&Source::Contacts, win, &s);
        assert_eq!(s.calls.get(), 1);

        sets.reset();
        sets.get_or_load(&Source::Contacts, win, &s);
        assert_eq!(s.calls.get(), 1);

        sets.invalidate(&Source::Contacts);
        sets.get_or_load(&Source::Contacts, win, &s);
        assert_eq!(s.calls.get(), 2);

        sets.invalidate_session();
        assert!(!sets.is_loaded(&Source::Contacts, win));
    }

    #[test]
    fn test_completion_sets_are_dropped_on_reset() {
        let s = session();
        let mut sets = DynamicSets::new();
        let themes = sets.get_or_load(&Source::Themes, WindowId(1), &s);
        assert!(themes.contains("default"));
        assert!(themes.contains("boothj5"));
        sets.reset();
        assert!(!sets.is_loaded(&Source::Themes, WindowId(1)));
    }

    #[test]
    fn test_reset_clears_session_cursors() {
        let s = session();
        let mut sets = DynamicSets::new();
        let win = WindowId(1);
        let contacts = sets.get_or_load(&Source::Contacts, win, &s);
        assert_eq!(contacts.complete("", Direction::Forward).as_deref(), Some("alice"));
        sets.reset();
        let contacts = sets.get_or_load(&Source::Contacts, win, &s);
        assert_eq!(contacts.complete("", Direction::Forward).as_deref(), Some("alice"));
    }

    #[test]
    fn test_window_sets_are_owned_by_window() {
        let s = session();
        let mut sets = DynamicSets::new();
        let room = Source::Occupants("room@conf".into());
        sets.get_or_load(&room, WindowId(2), &s);
        assert!(sets.is_loaded(&room, WindowId(2)));
        assert!(!sets.is_loaded(&room, WindowId(3)));

        sets.set_form(WindowId(2), DataForm::new(vec![FormField::new("public", FieldKind::Boolean)]));
        let form = sets.window_closed(WindowId(2));
        assert_eq!(form.map(|f| f.fields.len()), Some(1));
        assert!(!sets.is_loaded(&room, WindowId(2)));
        assert!(sets.form(WindowId(2)).is_none());
        assert!(sets.window_closed(WindowId(2)).is_none());
    }

    #[test]
    fn test_form_sets() {
        let mut sets = FormSets::new(DataForm::new(vec![
            FormField::new("whois", FieldKind::ListSingle).with_options(["moderators", "anyone"]),
            FormField::new("admins", FieldKind::JidMulti).with_values(["a@x"]),
        ]));
        assert_eq!(sets.kind("whois"), Some(FieldKind::ListSingle));
        assert_eq!(sets.tags_mut().snapshot(), vec!["whois", "admins"]);
        let values = sets.values_mut("whois").unwrap();
        assert_eq!(values.complete("m", Direction::Forward).as_deref(), Some("moderators"));
        assert!(sets.values_mut("missing").is_none());
    }
}
