//! Completer for reedline - one Tab press, one replacement line

use reedline::{Completer, Span, Suggestion};

use super::state::{SharedShell, lock};
use crate::completion::Direction;

/// Reedline completer bound to one cycling direction
///
/// Reedline asks for a list of suggestions; the engine produces a single
/// new line per press, so the list always holds exactly one entry spanning
/// the text before the cursor. With quick completions enabled reedline
/// applies it at once.
pub struct TabCompleter {
    shell: SharedShell,
    direction: Direction,
}

impl TabCompleter {
    /// Create a completer
    ///
    /// # Arguments
    /// * `shell` - Shared shell state
    /// * `direction` - Forward for Tab, backward for Shift-Tab
    ///
    /// # Returns
    /// * `Self` - New completer
    pub fn new(shell: SharedShell, direction: Direction) -> Self {
        Self { shell, direction }
    }
}

impl Completer for TabCompleter {
    /// Complete the text before the cursor
    ///
    /// # Arguments
    /// * `line` - The input line
    /// * `pos` - Cursor position (byte index)
    ///
    /// # Returns
    /// * `Vec<Suggestion>` - The replacement, or the unchanged text when nothing completes
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let before = &line[..pos.min(line.len())];
        let value = lock(&self.shell)
            .tab(before, self.direction)
            .unwrap_or_else(|| before.to_string());

        vec![Suggestion {
            value,
            description: None,
            style: None,
            extra: None,
            span: Span::new(0, before.len()),
            append_whitespace: false,
            match_indices: None,
        }]
    }
}
