//! The completion engine
//!
//! [`CompletionEngine`] owns every set the completer reads: the static
//! vocabulary, the per-command chains, dynamic session and window sets,
//! plugin completers and the file path scanner. It is created initialised,
//! can be rebuilt with [`CompletionEngine::init`] and torn down with
//! [`CompletionEngine::shutdown`].
//!
//! # Example
//!
//! ```rust
//! use slashcomp::completion::{
//!     CompletionContext, CompletionEngine, ConnectionStatus, Direction, EmptySession, Window,
//! };
//!
//! let mut engine = CompletionEngine::new();
//! let window = Window::console();
//! let ctx = CompletionContext::new(
//!     "/roster room priv",
//!     Direction::Forward,
//!     &window,
//!     ConnectionStatus::Disconnected,
//! );
//! assert_eq!(
//!     engine.complete(&ctx, &EmptySession).as_deref(),
//!     Some("/roster room private ")
//! );
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};

use super::commands;
use super::completer::{Completer, Resolver};
use super::context::{CompletionContext, WindowId};
use super::dynamic::DynamicSets;
use super::filepath::FilePathCompleter;
use super::plugins::PluginCompleters;
use super::source::{DataForm, SessionSource, Source};
use super::vocabulary::{ALIASES, COMMAND_DEFS, COMMANDS, HELP, Vocabulary};

/// A built-in command and how its arguments complete
#[derive(Debug, Clone)]
pub struct CommandEntry {
    /// Command name including the leading slash
    pub name: String,
    /// Accepted argument count
    pub arity: (usize, usize),
    /// One-line usage
    pub synopsis: String,
    /// Argument completer, if the command has one
    pub completer: Option<Completer>,
}

/// What `add_command` inserted, so `remove_command` can undo exactly that
#[derive(Debug, Clone, Copy)]
struct Added {
    help_topic: bool,
}

/// Tab-completion engine
#[derive(Debug)]
pub struct CompletionEngine {
    initialised: bool,
    vocab: Vocabulary,
    entries: BTreeMap<String, CommandEntry>,
    added: HashMap<String, Added>,
    dynamic: DynamicSets,
    filepath: FilePathCompleter,
    plugins: PluginCompleters,
    form_field: Completer,
    form_commands: HashMap<WindowId, Vec<String>>,
}

impl Default for CompletionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionEngine {
    /// Create an initialised engine
    pub fn new() -> Self {
        let mut engine = Self {
            initialised: false,
            vocab: Vocabulary::default(),
            entries: BTreeMap::new(),
            added: HashMap::new(),
            dynamic: DynamicSets::new(),
            filepath: FilePathCompleter::new(),
            plugins: PluginCompleters::new(),
            form_field: Completer::Chain(commands::form_field()),
            form_commands: HashMap::new(),
        };
        engine.init();
        engine
    }

    /// Builder: use `filepath` for file path arguments
    pub fn with_filepath(mut self, filepath: FilePathCompleter) -> Self {
        self.filepath = filepath;
        self
    }

    /// Build the static vocabulary and every command chain
    ///
    /// Safe to call again: the static state is replaced, not patched. Commands
    /// added with [`add_command`](Self::add_command) or
    /// [`add_alias`](Self::add_alias) are dropped and must be added again.
    /// Form commands of windows that are still open are kept.
    pub fn init(&mut self) {
        self.vocab = Vocabulary::builtin();

        let mut chains = commands::build();
        self.entries = COMMAND_DEFS
            .iter()
            .map(|def| {
                let entry = CommandEntry {
                    name: def.name.to_string(),
                    arity: (def.min_args, def.max_args),
                    synopsis: def.synopsis.to_string(),
                    completer: chains.remove(def.name).map(Completer::Chain),
                };
                (def.name.to_string(), entry)
            })
            .collect();
        self.added.clear();
        self.dynamic.invalidate_session();
        self.dynamic.reset();
        self.filepath.reset();
        self.initialised = true;

        let form_commands = std::mem::take(&mut self.form_commands);
        for (window, names) in form_commands {
            for name in &names {
                self.add_command(name);
            }
            self.form_commands.insert(window, names);
        }

        tracing::debug!(
            commands = self.entries.len(),
            sets = self.vocab.len(),
            "completion engine initialised"
        );
    }

    /// Release every owned set; later calls are no-ops until `init`
    pub fn shutdown(&mut self) {
        self.vocab = Vocabulary::default();
        self.entries.clear();
        self.added.clear();
        self.dynamic.clear();
        self.filepath.reset();
        self.plugins.clear_all();
        self.form_commands.clear();
        self.initialised = false;
        tracing::debug!("completion engine shut down");
    }

    /// Whether the engine is usable
    pub fn is_initialised(&self) -> bool {
        self.initialised
    }

    /// Next completion of the context's input line
    ///
    /// # Arguments
    /// * `ctx` - Input line, direction, active window and connection status
    /// * `session` - Live data for dynamic sets
    ///
    /// # Returns
    /// * `Option<String>` - The whole new input line, or None to leave it unchanged
    pub fn complete(
        &mut self,
        ctx: &CompletionContext<'_>,
        session: &dyn SessionSource,
    ) -> Option<String> {
        if !self.initialised {
            return None;
        }

        let input = ctx.input;
        let line = input.trim_start();
        let head = &input[..input.len() - line.len()];
        tracing::trace!(input = %input, direction = ?ctx.direction, window = %ctx.window.kind, "complete");

        if line.starts_with('/') && !line.contains(' ') {
            let found = self.vocab.get_mut(COMMANDS.name)?.complete(line, ctx.direction)?;
            return Some(format!("{head}{found}"));
        }

        let command = line.split(' ').next().unwrap_or(line);

        let found = {
            let mut r = Resolver::new(
                *ctx,
                session,
                &mut self.vocab,
                &mut self.dynamic,
                &mut self.filepath,
            );
            self.entries
                .get(command)
                .and_then(|entry| entry.completer.as_ref())
                .and_then(|completer| completer.complete(head, line, &mut r))
        };
        if found.is_some() {
            return found;
        }

        if let Some(found) = self
            .plugins
            .complete(head, line, ctx.direction, &mut self.filepath)
        {
            return Some(found);
        }

        let is_field = self
            .dynamic
            .form(ctx.window.id)
            .and_then(|form| form.field(command.trim_start_matches('/')))
            .is_some();
        if is_field {
            let mut r = Resolver::new(
                *ctx,
                session,
                &mut self.vocab,
                &mut self.dynamic,
                &mut self.filepath,
            );
            return self.form_field.complete(head, line, &mut r);
        }

        None
    }

    /// Register a command name and its help topic
    ///
    /// # Returns
    /// * `bool` - True if the command was not known before
    pub fn add_command(&mut self, name: &str) -> bool {
        if !self.initialised || !self.vocab.add(COMMANDS.name, name) {
            return false;
        }
        let help_topic = self.vocab.add(HELP.name, name.trim_start_matches('/'));
        self.added.insert(name.to_string(), Added { help_topic });
        tracing::debug!(command = name, "command added");
        true
    }

    /// Unregister a command added with [`add_command`](Self::add_command)
    ///
    /// Built-in commands and unknown names are left alone.
    pub fn remove_command(&mut self, name: &str) -> bool {
        let Some(added) = self.added.remove(name) else {
            return false;
        };
        self.vocab.remove(COMMANDS.name, name);
        if added.help_topic {
            self.vocab.remove(HELP.name, name.trim_start_matches('/'));
        }
        tracing::debug!(command = name, "command removed");
        true
    }

    /// Whether `name` is a known command
    pub fn contains_command(&self, name: &str) -> bool {
        self.vocab.contains(COMMANDS.name, name)
    }

    /// Argument completer of `name`
    pub fn lookup(&self, name: &str) -> Option<&Completer> {
        if let Some(entry) = self.entries.get(name) {
            return entry.completer.as_ref();
        }
        self.form_commands
            .values()
            .any(|names| names.iter().any(|n| n == name))
            .then_some(&self.form_field)
    }

    /// Built-in command entry
    pub fn entry(&self, name: &str) -> Option<&CommandEntry> {
        self.entries.get(name)
    }

    /// Built-in commands in name order
    pub fn commands(&self) -> impl Iterator<Item = &CommandEntry> {
        self.entries.values()
    }

    /// Register an alias, completed as `/name` and by `/alias remove`
    pub fn add_alias(&mut self, name: &str) -> bool {
        if !self.initialised || !self.vocab.add(ALIASES.name, name) {
            return false;
        }
        self.add_command(&format!("/{name}"));
        true
    }

    /// Unregister an alias
    pub fn remove_alias(&mut self, name: &str) -> bool {
        if !self.vocab.remove(ALIASES.name, name) {
            return false;
        }
        self.remove_command(&format!("/{name}"));
        true
    }

    /// Attach a configuration form to a window
    ///
    /// Each field tag becomes a command. A form already attached to the
    /// window is replaced.
    pub fn add_form(&mut self, window: WindowId, form: DataForm) {
        if !self.initialised {
            return;
        }
        self.unregister_form_commands(window);
        let names: Vec<String> = form.tags().map(|tag| format!("/{tag}")).collect();
        let registered = names
            .into_iter()
            .filter(|name| self.add_command(name))
            .collect();
        self.form_commands.insert(window, registered);
        self.dynamic.set_form(window, form);
    }

    /// Drop everything the window owned
    pub fn window_closed(&mut self, window: WindowId) {
        self.unregister_form_commands(window);
        self.dynamic.window_closed(window);
    }

    fn unregister_form_commands(&mut self, window: WindowId) {
        for name in self.form_commands.remove(&window).unwrap_or_default() {
            self.remove_command(&name);
        }
    }

    /// Drop the cached set for `source`
    pub fn invalidate(&mut self, source: &Source) {
        self.dynamic.invalidate(source);
    }

    /// Drop every session-lifetime set (disconnect)
    pub fn invalidate_session(&mut self) {
        self.dynamic.invalidate_session();
    }

    /// Plugin completers, while initialised
    pub fn plugins_mut(&mut self) -> Option<&mut PluginCompleters> {
        self.initialised.then_some(&mut self.plugins)
    }

    /// Clear every cycle and drop per-completion sets
    pub fn reset(&mut self, ctx: &CompletionContext<'_>) {
        if !self.initialised {
            return;
        }
        self.vocab.reset();
        self.dynamic.reset();
        self.filepath.reset();
        self.plugins.reset();
        tracing::trace!(window = %ctx.window.kind, "completion reset");
    }

    /// Names of the commands currently completing as form fields
    pub fn form_commands(&self) -> HashSet<&str> {
        self.form_commands
            .values()
            .flatten()
            .map(String::as_str)
            .collect()
    }
}
