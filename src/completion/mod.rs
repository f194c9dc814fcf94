//! Tab completion for slash commands
//!
//! The engine completes the whole input line: command names, then each
//! argument according to the command's [`Chain`]. Repeated requests on the
//! line the engine produced cycle through the candidates; any edit by the
//! user starts a new cycle once [`CompletionEngine::reset`] is called.
//!
//! # Modules
//!
//! - `prefix_set`: Ordered candidate sets with cycling
//! - `tokenizer`: Quote-aware splitting of the input line
//! - `context`: Window, direction and connection of a request
//! - `source`: Live data sources and configuration forms
//! - `dynamic`: Cached sets loaded from live data
//! - `filepath`: Local file path completion
//! - `completer`: Completer variants, chains and guards
//! - `vocabulary`: Built-in command table and fixed argument sets
//! - `lookups`: Function-backed completers
//! - `commands`: Argument grammar of the built-in commands
//! - `plugins`: Completers registered by plugins
//! - `registry`: The engine tying it together

pub mod commands;
pub mod completer;
pub mod context;
pub mod dynamic;
pub mod filepath;
pub mod lookups;
pub mod plugins;
pub mod prefix_set;
pub mod registry;
pub mod source;
pub mod tokenizer;
pub mod vocabulary;

#[cfg(test)]
mod tests;

pub use completer::{Chain, Completer, Guard, Segment};
pub use context::{CompletionContext, ConnectionStatus, Direction, Window, WindowId, WindowKind};
pub use filepath::FilePathCompleter;
pub use plugins::PluginCompleters;
pub use prefix_set::PrefixSet;
pub use registry::{CommandEntry, CompletionEngine};
pub use source::{DataForm, EmptySession, FieldKind, FormField, SessionSource, Source};
