//! Completers declared by plugins
//!
//! A plugin registers candidate lists under a key, which is a command
//! optionally followed by argument words (`/weather city`). When the input
//! starts with the key and a space, the rest of the line is completed
//! against that list. Keys may also be marked as file path arguments.
//! Longer keys are tried first so a plugin can refine its own commands;
//! keys of equal length are tried in key order, then plugin name order.

use std::collections::{BTreeMap, BTreeSet};

use super::context::Direction;
use super::filepath::FilePathCompleter;
use super::prefix_set::PrefixSet;
use super::tokenizer::{quote_if_spaced, unquote};

#[derive(Debug, Clone, Default)]
struct PluginSets {
    keys: BTreeMap<String, PrefixSet>,
    filepath_keys: BTreeSet<String>,
}

/// How a key is completed
enum KeyKind {
    Items,
    FilePath,
}

/// Per-plugin completion lists
#[derive(Debug, Clone, Default)]
pub struct PluginCompleters {
    plugins: BTreeMap<String, PluginSets>,
}

impl PluginCompleters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add candidates under `key`, creating the list on first use
    ///
    /// # Arguments
    /// * `plugin` - Owning plugin name
    /// * `key` - Command and optional argument words
    /// * `items` - Candidates to add
    pub fn add<I, S>(&mut self, plugin: &str, key: &str, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sets = self.plugins.entry(plugin.to_string()).or_default();
        let set = sets
            .keys
            .entry(key.to_string())
            .or_insert_with(|| PrefixSet::new(format!("{plugin}:{key}")));
        for item in items {
            set.add(item);
        }
        tracing::debug!(plugin, key, size = set.len(), "plugin completer updated");
    }

    /// Remove candidates from `key`; unknown plugins or keys are ignored
    pub fn remove<'i, I>(&mut self, plugin: &str, key: &str, items: I)
    where
        I: IntoIterator<Item = &'i str>,
    {
        if let Some(set) = self
            .plugins
            .get_mut(plugin)
            .and_then(|sets| sets.keys.get_mut(key))
        {
            for item in items {
                set.remove(item);
            }
        }
    }

    /// Drop every candidate under `key`
    pub fn clear(&mut self, plugin: &str, key: &str) {
        if let Some(set) = self
            .plugins
            .get_mut(plugin)
            .and_then(|sets| sets.keys.get_mut(key))
        {
            set.clear();
        }
    }

    /// Complete the argument after `key` as a file path
    pub fn add_filepath(&mut self, plugin: &str, key: &str) {
        self.plugins
            .entry(plugin.to_string())
            .or_default()
            .filepath_keys
            .insert(key.to_string());
    }

    /// Forget everything `plugin` registered
    ///
    /// # Returns
    /// * `bool` - True if the plugin had registered anything
    pub fn remove_plugin(&mut self, plugin: &str) -> bool {
        let removed = self.plugins.remove(plugin).is_some();
        if removed {
            tracing::debug!(plugin, "plugin completers removed");
        }
        removed
    }

    /// Whether `plugin` has registered anything
    pub fn has_plugin(&self, plugin: &str) -> bool {
        self.plugins.contains_key(plugin)
    }

    /// Clear every cycle
    pub fn reset(&mut self) {
        for sets in self.plugins.values_mut() {
            sets.keys.values_mut().for_each(PrefixSet::reset);
        }
    }

    /// Drop everything
    pub fn clear_all(&mut self) {
        self.plugins.clear();
    }

    /// Complete `line` against the longest matching key
    ///
    /// # Arguments
    /// * `head` - Text kept in front of the line
    /// * `line` - The input line without leading whitespace
    /// * `direction` - Cycle direction
    /// * `filepath` - Completer for file path keys
    pub fn complete(
        &mut self,
        head: &str,
        line: &str,
        direction: Direction,
        filepath: &mut FilePathCompleter,
    ) -> Option<String> {
        let mut candidates: Vec<(String, String, KeyKind)> = Vec::new();
        for (plugin, sets) in &self.plugins {
            for key in sets.keys.keys() {
                candidates.push((plugin.clone(), key.clone(), KeyKind::Items));
            }
            for key in &sets.filepath_keys {
                candidates.push((plugin.clone(), key.clone(), KeyKind::FilePath));
            }
        }
        candidates.sort_by(|a, b| {
            b.1.len()
                .cmp(&a.1.len())
                .then_with(|| a.1.cmp(&b.1))
                .then_with(|| a.0.cmp(&b.0))
        });

        for (plugin, key, kind) in candidates {
            let Some(rest) = line
                .strip_prefix(key.as_str())
                .and_then(|rest| rest.strip_prefix(' '))
            else {
                continue;
            };
            let found = match kind {
                KeyKind::FilePath => {
                    filepath.complete(&format!("{head}{line}"), &format!("{head}{key}"), direction)
                }
                KeyKind::Items => self
                    .plugins
                    .get_mut(&plugin)
                    .and_then(|sets| sets.keys.get_mut(&key))
                    .and_then(|set| set.complete(unquote(rest), direction))
                    .map(|found| format!("{head}{key} {}", quote_if_spaced(&found))),
            };
            if found.is_some() {
                tracing::trace!(plugin = %plugin, key = %key, "plugin completer matched");
                return found;
            }
        }
        None
    }
}
