//! Prefix-matching candidate set with bidirectional cycling
//!
//! A [`PrefixSet`] keeps its candidates in insertion order and answers
//! `complete(prefix, direction)` queries over the alphabetically ordered
//! candidates that start with `prefix`. Consecutive calls cycle through the
//! matches, wrapping at either end.

use std::collections::HashSet;

use super::context::Direction;

/// Cycle state remembered between two `complete` calls.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Cursor {
    /// Prefix the cycle was started with
    prefix: String,
    /// Candidate returned by the previous call
    last: String,
}

/// Named, ordered, duplicate-free candidate set with cycling state
#[derive(Debug, Clone, Default)]
pub struct PrefixSet {
    /// Set name, used in logs
    name: String,
    /// Candidates in insertion order
    items: Vec<String>,
    /// Membership index over `items`
    index: HashSet<String>,
    /// Active cycle, if any
    cursor: Option<Cursor>,
}

impl PrefixSet {
    /// Create an empty set
    ///
    /// # Arguments
    /// * `name` - Set name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create a set seeded with candidates (duplicates are skipped)
    ///
    /// # Arguments
    /// * `name` - Set name
    /// * `items` - Initial candidates
    pub fn with_items<I, S>(name: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new(name);
        for item in items {
            set.add(item);
        }
        set
    }

    /// Set name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert a candidate; no-op when already present
    ///
    /// # Returns
    /// * `bool` - True if the candidate was inserted
    pub fn add(&mut self, candidate: impl Into<String>) -> bool {
        let candidate = candidate.into();
        if self.index.contains(&candidate) {
            return false;
        }
        self.index.insert(candidate.clone());
        self.items.push(candidate);
        true
    }

    /// Remove a candidate; no-op when absent
    ///
    /// Removing the candidate the cursor last returned invalidates the cursor.
    ///
    /// # Returns
    /// * `bool` - True if the candidate was removed
    pub fn remove(&mut self, candidate: &str) -> bool {
        if !self.index.remove(candidate) {
            return false;
        }
        self.items.retain(|item| item != candidate);
        if self.cursor.as_ref().is_some_and(|c| c.last == candidate) {
            self.cursor = None;
        }
        true
    }

    /// Membership test
    pub fn contains(&self, candidate: &str) -> bool {
        self.index.contains(candidate)
    }

    /// Number of candidates
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the set holds no candidates
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop every candidate and the cursor
    pub fn clear(&mut self) {
        self.items.clear();
        self.index.clear();
        self.cursor = None;
    }

    /// Forget the active cycle; candidates are untouched
    pub fn reset(&mut self) {
        self.cursor = None;
    }

    /// Candidates in insertion order
    pub fn snapshot(&self) -> Vec<String> {
        self.items.clone()
    }

    /// Prefix the active cycle was started with
    pub fn cycle_prefix(&self) -> Option<&str> {
        self.cursor.as_ref().map(|c| c.prefix.as_str())
    }

    /// The candidate matching `prefix` when it is the only one
    pub fn sole_match(&self, prefix: &str) -> Option<&str> {
        let mut matches = self.items.iter().filter(|item| item.starts_with(prefix));
        match (matches.next(), matches.next()) {
            (Some(only), None) => Some(only.as_str()),
            _ => None,
        }
    }

    /// Next candidate for `prefix` in the requested direction
    ///
    /// A query equal to the tracked prefix, or to the candidate returned by
    /// the previous call, continues the current cycle. Anything else starts a
    /// fresh one: forward returns the first match, backward the last. A fresh
    /// query with no match leaves the current cycle alone; a continuation that
    /// no longer matches anything ends it.
    ///
    /// # Arguments
    /// * `prefix` - Byte prefix every match must start with
    /// * `direction` - Cycle direction
    ///
    /// # Returns
    /// * `Option<String>` - Next candidate, or None when nothing matches
    pub fn complete(&mut self, prefix: &str, direction: Direction) -> Option<String> {
        let continuing = self
            .cursor
            .as_ref()
            .filter(|c| c.prefix == prefix || c.last == prefix)
            .cloned();

        let search = continuing
            .as_ref()
            .map(|c| c.prefix.clone())
            .unwrap_or_else(|| prefix.to_string());

        let mut matches: Vec<&String> = self
            .items
            .iter()
            .filter(|item| item.starts_with(search.as_str()))
            .collect();
        if matches.is_empty() {
            if continuing.is_some() {
                self.cursor = None;
            }
            return None;
        }
        matches.sort();

        let last_pos = continuing
            .as_ref()
            .and_then(|c| matches.iter().position(|m| **m == c.last));

        let pos = match (last_pos, direction) {
            (Some(pos), Direction::Forward) => (pos + 1) % matches.len(),
            (Some(pos), Direction::Backward) => (pos + matches.len() - 1) % matches.len(),
            (None, Direction::Forward) => 0,
            (None, Direction::Backward) => matches.len() - 1,
        };

        let found = matches[pos].clone();
        tracing::trace!(set = %self.name, prefix = %search, found = %found, "prefix match");
        self.cursor = Some(Cursor {
            prefix: search,
            last: found.clone(),
        });
        Some(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Direction::{Backward, Forward};

    fn set(items: &[&str]) -> PrefixSet {
        PrefixSet::with_items("test", items.iter().copied())
    }

    #[test]
    fn test_empty_set_completes_nothing() {
        let mut ac = PrefixSet::new("empty");
        assert_eq!(ac.complete("", Forward), None);
        assert_eq!(ac.complete("a", Backward), None);
    }

    #[test]
    fn test_add_ignores_duplicates() {
        let mut ac = PrefixSet::new("dup");
        assert!(ac.add("hello"));
        assert!(!ac.add("hello"));
        assert_eq!(ac.len(), 1);
        assert_eq!(ac.snapshot(), vec!["hello".to_string()]);
    }

    #[test]
    fn test_snapshot_keeps_insertion_order() {
        let ac = set(&["remove", "add", "list"]);
        assert_eq!(ac.snapshot(), vec!["remove", "add", "list"]);
    }

    #[test]
    fn test_single_match_wraps_to_itself() {
        let mut ac = set(&["add", "list", "remove"]);
        assert_eq!(ac.complete("a", Forward).as_deref(), Some("add"));
        assert_eq!(ac.complete("a", Forward).as_deref(), Some("add"));
        assert_eq!(ac.complete("add", Forward).as_deref(), Some("add"));
    }

    #[test]
    fn test_forward_cycle_wraps() {
        let mut ac = set(&["on", "off"]);
        assert_eq!(ac.complete("o", Forward).as_deref(), Some("off"));
        assert_eq!(ac.complete("o", Forward).as_deref(), Some("on"));
        assert_eq!(ac.complete("o", Forward).as_deref(), Some("off"));
    }

    #[test]
    fn test_cycle_continues_from_previous_output() {
        let mut ac = set(&["on", "off"]);
        let first = ac.complete("o", Forward).unwrap();
        let second = ac.complete(&first, Forward).unwrap();
        let third = ac.complete(&second, Forward).unwrap();
        assert_eq!((first.as_str(), second.as_str(), third.as_str()), ("off", "on", "off"));
    }

    #[test]
    fn test_fresh_backward_returns_last_match() {
        let mut ac = set(&["chat", "away", "xa", "dnd"]);
        assert_eq!(ac.complete("", Backward).as_deref(), Some("xa"));
        assert_eq!(ac.complete("", Backward).as_deref(), Some("dnd"));
        assert_eq!(ac.complete("", Backward).as_deref(), Some("chat"));
    }

    #[test]
    fn test_direction_change_steps_back() {
        let mut ac = set(&["a1", "a2", "a3"]);
        assert_eq!(ac.complete("a", Forward).as_deref(), Some("a1"));
        assert_eq!(ac.complete("a", Forward).as_deref(), Some("a2"));
        assert_eq!(ac.complete("a2", Backward).as_deref(), Some("a1"));
        assert_eq!(ac.complete("a1", Backward).as_deref(), Some("a3"));
    }

    #[test]
    fn test_n_plus_one_calls_wrap_in_both_directions() {
        let words = ["delta", "alpha", "charlie", "bravo"];
        let mut ac = set(&words);
        let forward: Vec<String> = (0..=words.len())
            .map(|_| ac.complete("", Forward).unwrap())
            .collect();
        assert_eq!(forward.first(), forward.last());
        assert_eq!(forward[0], "alpha");

        ac.reset();
        let backward: Vec<String> = (0..=words.len())
            .map(|_| ac.complete("", Backward).unwrap())
            .collect();
        assert_eq!(backward.first(), backward.last());
        assert_eq!(backward[0], "delta");
    }

    #[test]
    fn test_new_prefix_starts_fresh_cycle() {
        let mut ac = set(&["show", "set", "sent"]);
        assert_eq!(ac.complete("s", Forward).as_deref(), Some("sent"));
        assert_eq!(ac.complete("sh", Forward).as_deref(), Some("show"));
        assert_eq!(ac.complete("s", Forward).as_deref(), Some("sent"));
    }

    #[test]
    fn test_matches_start_with_prefix() {
        let mut ac = set(&["room", "roster", "rooms", "reconnect", "quit"]);
        for prefix in ["", "r", "ro", "roo", "room", "q", "x"] {
            ac.reset();
            for _ in 0..6 {
                match ac.complete(prefix, Forward) {
                    Some(found) => assert!(found.starts_with(prefix), "{found} vs {prefix}"),
                    None => break,
                }
            }
        }
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let mut ac = set(&["Alice", "alice"]);
        assert_eq!(ac.complete("a", Forward).as_deref(), Some("alice"));
        ac.reset();
        assert_eq!(ac.complete("A", Forward).as_deref(), Some("Alice"));
    }

    #[test]
    fn test_remove_of_current_candidate_resets_cycle() {
        let mut ac = set(&["b1", "b2", "b3"]);
        assert_eq!(ac.complete("b", Forward).as_deref(), Some("b1"));
        assert!(ac.remove("b1"));
        assert_eq!(ac.complete("b", Forward).as_deref(), Some("b2"));
        assert!(!ac.contains("b1"));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut ac = set(&["one"]);
        assert!(!ac.remove("two"));
        assert_eq!(ac.len(), 1);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut ac = set(&["x1", "x2"]);
        ac.complete("x", Forward);
        ac.reset();
        ac.reset();
        assert_eq!(ac.complete("x", Forward).as_deref(), Some("x1"));
        assert_eq!(ac.snapshot(), vec!["x1", "x2"]);
    }

    #[test]
    fn test_sole_match() {
        let ac = set(&["position", "private", "by"]);
        assert_eq!(ac.sole_match("priv"), Some("private"));
        assert_eq!(ac.sole_match("p"), None);
        assert_eq!(ac.sole_match("z"), None);
    }

    #[test]
    fn test_unrelated_miss_keeps_cycle() {
        let mut ac = set(&["nick", "password"]);
        assert_eq!(ac.complete("", Forward).as_deref(), Some("nick"));
        assert_eq!(ac.complete("nick bob ", Forward), None);
        assert_eq!(ac.cycle_prefix(), Some(""));
        assert_eq!(ac.complete("nick", Forward).as_deref(), Some("password"));
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut ac = set(&["a", "b"]);
        ac.complete("", Forward);
        ac.clear();
        assert!(ac.is_empty());
        assert_eq!(ac.complete("", Forward), None);
    }
}
