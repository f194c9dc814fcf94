//! Completer variants and chain dispatch
//!
//! A [`Completer`] turns the tail of an input line into the next candidate.
//! Commands are described by a [`Chain`]: an ordered list of argument paths,
//! each paired with the completer for the argument that follows it. Entries
//! are tried in the order they were declared and the first hit wins, so more
//! specific paths must be declared before the paths they extend.
//!
//! # Example
//!
//! ```rust
//! use slashcomp::completion::completer::{Chain, Completer, Guard};
//! use slashcomp::completion::vocabulary::{BOOLEAN, LOG};
//!
//! let chain = Chain::new()
//!     .at(&["rotate"], Completer::literal(BOOLEAN))
//!     .at(&["shared"], Completer::literal(BOOLEAN))
//!     .root(Completer::literal(LOG));
//! assert_eq!(chain.len(), 3);
//! # let _ = Guard::ANY;
//! ```

use std::fmt;

use super::context::{CompletionContext, Direction, WindowKind};
use super::dynamic::{DynamicSets, FormSets};
use super::filepath::FilePathCompleter;
use super::prefix_set::PrefixSet;
use super::source::{SessionSource, Source};
use super::tokenizer::{Tokens, is_index, quote_if_spaced, tokenize, unquote};
use super::vocabulary::{Table, Vocabulary};

/// Function consulted for live data
///
/// Receives the unquoted search key and returns the bare candidate; quoting
/// is up to the function.
pub type LookupFn = fn(&str, Direction, &mut Resolver<'_>) -> Option<String>;

/// Uniform "tail of a line + direction -> next line" capability
#[derive(Clone)]
pub enum Completer {
    /// Candidates from a named static set
    Literal {
        /// Vocabulary set name
        set: &'static str,
        /// Quote candidates that contain a space
        quote: bool,
    },
    /// Candidates computed from live data
    FunctionBacked(LookupFn),
    /// Paths on the local filesystem
    FilePath,
    /// Ordered argument paths
    Chain(Chain),
}

impl fmt::Debug for Completer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Completer::Literal { set, quote } => f
                .debug_struct("Literal")
                .field("set", set)
                .field("quote", quote)
                .finish(),
            Completer::FunctionBacked(_) => f.write_str("FunctionBacked"),
            Completer::FilePath => f.write_str("FilePath"),
            Completer::Chain(chain) => f.debug_tuple("Chain").field(&chain.len()).finish(),
        }
    }
}

impl Completer {
    /// Literal over `table`, quoting spaced candidates
    pub fn literal(table: Table) -> Self {
        Completer::Literal {
            set: table.name,
            quote: true,
        }
    }

    /// Literal over `table`, candidates emitted as they are
    pub fn literal_unquoted(table: Table) -> Self {
        Completer::Literal {
            set: table.name,
            quote: false,
        }
    }

    /// Function-backed completer
    pub fn lookup(f: LookupFn) -> Self {
        Completer::FunctionBacked(f)
    }

    /// Complete `key`, keeping `head` in front of the result
    ///
    /// # Arguments
    /// * `head` - Part of the line that stays untouched
    /// * `key` - Part of the line being completed
    /// * `r` - Per-call resolver
    ///
    /// # Returns
    /// * `Option<String>` - The whole new line, or None when nothing matches
    pub fn complete(&self, head: &str, key: &str, r: &mut Resolver<'_>) -> Option<String> {
        match self {
            Completer::Literal { set, quote } => {
                let direction = r.direction();
                let found = r.vocab_set(set)?.complete(unquote(key), direction)?;
                Some(format!("{head}{}", render(&found, *quote)))
            }
            Completer::FunctionBacked(f) => {
                let direction = r.direction();
                f(unquote(key), direction, r).map(|found| format!("{head}{found}"))
            }
            Completer::FilePath => r.complete_path(&format!("{head}{key}"), head.trim_end()),
            Completer::Chain(chain) => chain.complete(head, key, r),
        }
    }

    /// Names of every static set this completer reads
    pub fn literal_sets(&self) -> Vec<&'static str> {
        match self {
            Completer::Literal { set, .. } => vec![*set],
            Completer::Chain(chain) => chain
                .entries
                .iter()
                .flat_map(|e| e.completer.literal_sets())
                .collect(),
            _ => Vec::new(),
        }
    }
}

fn render(candidate: &str, quote: bool) -> String {
    if quote {
        quote_if_spaced(candidate)
    } else {
        candidate.to_string()
    }
}

/// One position of an argument path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Exactly this word
    Word(&'static str),
    /// Any argument
    Any,
    /// A numeric index
    Index,
}

impl Segment {
    /// Whether `token` fits this position
    pub fn matches(&self, token: &str) -> bool {
        match self {
            Segment::Word(word) => *word == token,
            Segment::Any => true,
            Segment::Index => is_index(token),
        }
    }
}

impl From<&'static str> for Segment {
    /// `*` is any argument, `#` a numeric index, anything else a word
    fn from(text: &'static str) -> Self {
        match text {
            "*" => Segment::Any,
            "#" => Segment::Index,
            word => Segment::Word(word),
        }
    }
}

/// Window condition of a guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowRule {
    Only(WindowKind),
    Except(WindowKind),
}

/// Conditions under which a chain entry is eligible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Guard {
    /// Requires an established connection
    pub connected: bool,
    /// Restricts the active window
    pub window: Option<WindowRule>,
}

impl Guard {
    /// Always eligible
    pub const ANY: Guard = Guard {
        connected: false,
        window: None,
    };

    /// Eligible while connected
    pub const CONNECTED: Guard = Guard {
        connected: true,
        window: None,
    };

    /// Eligible in windows of `kind` only
    pub const fn only(kind: WindowKind) -> Self {
        Guard {
            connected: false,
            window: Some(WindowRule::Only(kind)),
        }
    }

    /// Eligible everywhere but windows of `kind`
    pub const fn except(kind: WindowKind) -> Self {
        Guard {
            connected: false,
            window: Some(WindowRule::Except(kind)),
        }
    }

    /// Same guard, additionally requiring a connection
    pub const fn and_connected(self) -> Self {
        Guard {
            connected: true,
            window: self.window,
        }
    }

    /// Whether the guard holds in `ctx`
    pub fn allows(&self, ctx: &CompletionContext<'_>) -> bool {
        if self.connected && !ctx.is_connected() {
            return false;
        }
        match self.window {
            Some(WindowRule::Only(kind)) => ctx.window.kind == kind,
            Some(WindowRule::Except(kind)) => ctx.window.kind != kind,
            None => true,
        }
    }
}

/// Argument path, guard and the completer for the argument after the path
#[derive(Debug, Clone)]
pub struct ChainEntry {
    pub path: Vec<Segment>,
    pub guard: Guard,
    pub completer: Completer,
}

impl ChainEntry {
    /// Byte offset where the search key starts, when the path matches
    ///
    /// Arguments 1..=n must fit the path and the n-th token (the command
    /// token for the root) must be followed by a space.
    fn key_start(&self, line: &str, tokens: &Tokens<'_>) -> Option<usize> {
        let last = tokens.get(self.path.len())?;
        let fits = self
            .path
            .iter()
            .zip(&tokens.tokens[1..])
            .all(|(segment, token)| segment.matches(token.value));
        if !fits {
            return None;
        }
        (line.as_bytes().get(last.span.end) == Some(&b' ')).then_some(last.span.end + 1)
    }
}

/// Ordered argument paths of one command
#[derive(Debug, Clone, Default)]
pub struct Chain {
    entries: Vec<ChainEntry>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an unguarded entry
    pub fn at(self, path: &[&'static str], completer: Completer) -> Self {
        self.when(Guard::ANY, path, completer)
    }

    /// Append a guarded entry
    pub fn when(mut self, guard: Guard, path: &[&'static str], completer: Completer) -> Self {
        self.entries.push(ChainEntry {
            path: path.iter().copied().map(Segment::from).collect(),
            guard,
            completer,
        });
        self
    }

    /// Append an entry for the first argument
    pub fn root(self, completer: Completer) -> Self {
        self.at(&[], completer)
    }

    /// Append a guarded entry for the first argument
    pub fn root_when(self, guard: Guard, completer: Completer) -> Self {
        self.when(guard, &[], completer)
    }

    /// Append every entry of `other`
    pub fn then(mut self, other: Chain) -> Self {
        self.entries.extend(other.entries);
        self
    }

    /// Entries in try-order
    pub fn entries(&self) -> &[ChainEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the chain has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Complete `line` against the first eligible, matching entry that yields
    ///
    /// # Arguments
    /// * `head` - Text kept in front of the line (leading whitespace)
    /// * `line` - The line, starting with the command token
    /// * `r` - Per-call resolver
    pub fn complete(&self, head: &str, line: &str, r: &mut Resolver<'_>) -> Option<String> {
        let tokens = tokenize(line);
        for entry in &self.entries {
            if !entry.guard.allows(&r.ctx) {
                continue;
            }
            let Some(start) = entry.key_start(line, &tokens) else {
                continue;
            };
            let (fixed, key) = line.split_at(start);
            let prefix = format!("{head}{fixed}");
            let found = match &entry.completer {
                Completer::Literal { set, quote } => {
                    self.complete_literal(entry, *set, *quote, &prefix, key, r)
                }
                other => other.complete(&prefix, key, r),
            };
            if found.is_some() {
                tracing::trace!(path = ?entry.path, key = %key, "chain entry matched");
                return found;
            }
        }
        None
    }

    /// Literal completion that steps into the next level on a sole match
    ///
    /// When a fresh search has exactly one candidate and the chain has an
    /// eligible entry one level below that candidate, a space is appended so
    /// the next press completes the deeper argument.
    fn complete_literal(
        &self,
        entry: &ChainEntry,
        set: &'static str,
        quote: bool,
        prefix: &str,
        key: &str,
        r: &mut Resolver<'_>,
    ) -> Option<String> {
        let key = unquote(key);
        let direction = r.direction();
        let ac = r.vocab_set(set)?;
        let found = ac.complete(key, direction)?;
        let fresh_sole = ac.cycle_prefix() == Some(key) && ac.sole_match(key) == Some(found.as_str());

        let mut line = format!("{prefix}{}", render(&found, quote));
        if fresh_sole && self.descends(&entry.path, &found, &r.ctx) {
            line.push(' ');
        }
        Some(line)
    }

    fn descends(&self, path: &[Segment], candidate: &str, ctx: &CompletionContext<'_>) -> bool {
        self.entries.iter().any(|e| {
            e.path.len() == path.len() + 1
                && e.path.starts_with(path)
                && e.path[path.len()].matches(candidate)
                && e.guard.allows(ctx)
        })
    }
}

/// Everything a completer may touch during one call
pub struct Resolver<'a> {
    /// Call context
    pub ctx: CompletionContext<'a>,
    session: &'a dyn SessionSource,
    vocab: &'a mut Vocabulary,
    dynamic: &'a mut DynamicSets,
    filepath: &'a mut FilePathCompleter,
}

impl<'a> Resolver<'a> {
    pub fn new(
        ctx: CompletionContext<'a>,
        session: &'a dyn SessionSource,
        vocab: &'a mut Vocabulary,
        dynamic: &'a mut DynamicSets,
        filepath: &'a mut FilePathCompleter,
    ) -> Self {
        Self {
            ctx,
            session,
            vocab,
            dynamic,
            filepath,
        }
    }

    /// Requested direction
    pub fn direction(&self) -> Direction {
        self.ctx.direction
    }

    /// Command token of the line being completed
    pub fn command(&self) -> &'a str {
        let line = self.ctx.input.trim_start();
        line.split(' ').next().unwrap_or(line)
    }

    /// Static set by name
    pub fn vocab_set(&mut self, name: &str) -> Option<&mut PrefixSet> {
        let set = self.vocab.get_mut(name);
        if set.is_none() {
            tracing::trace!(set = name, "unknown vocabulary set");
        }
        set
    }

    /// Dynamic set for `source`, loaded on first use
    pub fn source_set(&mut self, source: &Source) -> &mut PrefixSet {
        self.dynamic
            .get_or_load(source, self.ctx.window.id, self.session)
    }

    /// Next candidate of `source` for `key`
    pub fn complete_source(&mut self, source: &Source, key: &str) -> Option<String> {
        let direction = self.direction();
        self.source_set(source).complete(key, direction)
    }

    /// Form sets of the active window
    pub fn form(&mut self) -> Option<&mut FormSets> {
        self.dynamic.form_mut(self.ctx.window.id)
    }

    /// Current subject of a room
    pub fn room_subject(&self, room: &str) -> Option<String> {
        self.session.room_subject(room)
    }

    /// File path completion of `input` after `command_prefix`
    pub fn complete_path(&mut self, input: &str, command_prefix: &str) -> Option<String> {
        let direction = self.direction();
        self.filepath.complete(input, command_prefix, direction)
    }
}
