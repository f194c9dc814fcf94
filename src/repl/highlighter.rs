//! Highlighter for slash command lines
//!
//! The command token is green when the engine knows it and red otherwise;
//! quoted arguments are yellow. Plain chat lines are left alone.

use nu_ansi_term::{Color, Style};
use reedline::{Highlighter, StyledText};

use super::state::{SharedShell, lock};
use crate::completion::tokenizer::tokenize;

/// Command line highlighter
pub struct CommandHighlighter {
    shell: SharedShell,
    enabled: bool,
}

impl CommandHighlighter {
    /// Create a highlighter
    ///
    /// # Arguments
    /// * `shell` - Shared shell state, for the command table
    /// * `enabled` - Highlight at all
    pub fn new(shell: SharedShell, enabled: bool) -> Self {
        Self { shell, enabled }
    }

    fn command_style(&self, command: &str) -> Style {
        if lock(&self.shell).engine().contains_command(command) {
            Color::Green.bold()
        } else {
            Color::Red.normal()
        }
    }
}

impl Highlighter for CommandHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled = StyledText::new();
        let body = line.trim_start();
        if !self.enabled || !body.starts_with('/') {
            styled.push((Style::default(), line.to_string()));
            return styled;
        }

        let offset = line.len() - body.len();
        let tokens = tokenize(body);
        let mut pos = 0;
        styled.push((Style::default(), line[..offset].to_string()));

        for (index, token) in tokens.tokens.iter().enumerate() {
            if token.span.start > pos {
                styled.push((Style::default(), body[pos..token.span.start].to_string()));
            }
            let style = if index == 0 {
                self.command_style(token.value)
            } else if token.quoted {
                Color::Yellow.normal()
            } else {
                Style::default()
            };
            styled.push((style, body[token.span.clone()].to_string()));
            pos = token.span.end;
        }
        if pos < body.len() {
            styled.push((Style::default(), body[pos..].to_string()));
        }

        styled
    }
}
