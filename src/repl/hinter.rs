//! Hinter for reedline - usage after a bare command, history otherwise

use nu_ansi_term::{Color, Style};
use reedline::{Hinter, History, SearchQuery};

use super::state::{SharedShell, lock};

/// Inline hints for the shell
pub struct CommandHinter {
    shell: SharedShell,
    /// Style for hints
    style: Style,
    /// Current hint text
    current_hint: String,
}

impl CommandHinter {
    /// Create a hinter with the default style
    pub fn new(shell: SharedShell) -> Self {
        Self {
            shell,
            style: Style::new().italic().fg(Color::DarkGray),
            current_hint: String::new(),
        }
    }

    /// Usage text for `line` when it is a known command followed by one space
    fn usage_hint(&self, line: &str) -> Option<String> {
        let command = line.strip_suffix(' ')?;
        if command.contains(' ') {
            return None;
        }
        let state = lock(&self.shell);
        let synopsis = state.synopsis(command)?;
        synopsis
            .strip_prefix(command)
            .map(str::trim_start)
            .filter(|rest| !rest.is_empty())
            .map(str::to_string)
    }

    fn history_hint(line: &str, history: &dyn History) -> Option<String> {
        let item = history
            .search(SearchQuery::last_with_prefix(line.to_string(), None))
            .ok()?
            .into_iter()
            .next()?;
        let entry = item.command_line;
        (entry.len() > line.len() && entry.starts_with(line)).then(|| entry[line.len()..].to_string())
    }
}

impl Hinter for CommandHinter {
    fn handle(
        &mut self,
        line: &str,
        pos: usize,
        history: &dyn History,
        use_ansi_coloring: bool,
        _cwd: &str,
    ) -> String {
        self.current_hint.clear();

        if pos != line.len() || line.trim().is_empty() {
            return String::new();
        }

        // A usage hint is only shown, never accepted as input
        if let Some(usage) = self.usage_hint(line) {
            return if use_ansi_coloring {
                self.style.paint(usage).to_string()
            } else {
                usage
            };
        }

        match Self::history_hint(line, history) {
            Some(hint) => {
                self.current_hint = hint.clone();
                if use_ansi_coloring {
                    self.style.paint(hint).to_string()
                } else {
                    hint
                }
            }
            None => String::new(),
        }
    }

    fn complete_hint(&self) -> String {
        self.current_hint.clone()
    }

    fn next_hint_token(&self) -> String {
        self.current_hint
            .split_inclusive(' ')
            .next()
            .unwrap_or_default()
            .to_string()
    }
}
