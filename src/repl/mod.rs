//! Interactive shell
//!
//! This module wires the completion engine into a reedline line editor:
//! - Tab and Shift-Tab cycle completions through two single-entry menus
//! - Command history, optionally persisted to a file
//! - Usage and history hints
//! - Command highlighting
//! - A prompt showing the active window and connection

pub mod completer;
pub mod highlighter;
pub mod hinter;
pub mod prompt;
pub mod state;

#[cfg(test)]
mod tests;

use std::fs;

use nu_ansi_term::Color;
use reedline::{
    ColumnarMenu, Emacs, FileBackedHistory, KeyCode, KeyModifiers, Keybindings, MenuBuilder,
    Reedline, ReedlineEvent, ReedlineMenu, Signal, default_emacs_keybindings,
};

use crate::completion::Direction;
use crate::config::{DisplayConfig, HistoryConfig};
use crate::error::{ReplError, Result};
use crate::session::Outcome;

pub use completer::TabCompleter;
pub use highlighter::CommandHighlighter;
pub use hinter::CommandHinter;
pub use prompt::SlashPrompt;
pub use state::{SharedShell, ShellState, lock};

/// Menu opened by Tab
pub const FORWARD_MENU: &str = "tab_forward";
/// Menu opened by Shift-Tab
pub const BACKWARD_MENU: &str = "tab_backward";

/// REPL engine for the interactive shell
pub struct ReplEngine {
    /// Line editor
    editor: Reedline,

    /// Engine and session, shared with the editor callbacks
    shell: SharedShell,

    /// Enable colored output
    color_enabled: bool,
}

impl ReplEngine {
    /// Create a REPL engine
    ///
    /// # Arguments
    /// * `shell` - Shared shell state
    /// * `history` - History configuration
    /// * `display` - Display configuration
    ///
    /// # Returns
    /// * `Result<Self>` - New REPL engine or error
    pub fn new(shell: SharedShell, history: &HistoryConfig, display: &DisplayConfig) -> Result<Self> {
        let mut keybindings = default_emacs_keybindings();
        add_tab_bindings(&mut keybindings);

        let mut editor = Reedline::create()
            .with_history(create_history(history)?)
            .with_menu(tab_menu(&shell, FORWARD_MENU, Direction::Forward))
            .with_menu(tab_menu(&shell, BACKWARD_MENU, Direction::Backward))
            .with_quick_completions(true)
            .with_partial_completions(false)
            .with_edit_mode(Box::new(Emacs::new(keybindings)))
            .with_ansi_colors(display.color_output);

        if display.syntax_highlighting {
            editor = editor.with_highlighter(Box::new(CommandHighlighter::new(
                shell.clone(),
                display.color_output,
            )));
        }
        if display.hints {
            editor = editor.with_hinter(Box::new(CommandHinter::new(shell.clone())));
        }

        Ok(Self {
            editor,
            shell,
            color_enabled: display.color_output,
        })
    }

    /// Read a single line of input
    ///
    /// # Returns
    /// * `Result<Option<String>>` - Input line, empty on Ctrl-C, None on Ctrl-D
    pub fn read_line(&mut self) -> Result<Option<String>> {
        let prompt = SlashPrompt::from_session(lock(&self.shell).session(), self.color_enabled);
        match self.editor.read_line(&prompt) {
            Ok(Signal::Success(line)) => Ok(Some(line)),
            Ok(Signal::CtrlC) => Ok(Some(String::new())),
            Ok(Signal::CtrlD) => Ok(None),
            #[allow(unreachable_patterns)]
            Ok(_) => Ok(Some(String::new())),
            Err(e) => Err(ReplError::ReadFailed(e.to_string()).into()),
        }
    }

    /// Run until `/quit` or Ctrl-D
    pub fn run(&mut self) -> Result<()> {
        loop {
            let Some(line) = self.read_line()? else {
                break;
            };
            if line.trim().is_empty() {
                lock(&self.shell).end_of_line();
                continue;
            }

            let outcome = lock(&self.shell).apply(&line);
            match outcome {
                Ok(Outcome::Quit) => break,
                Ok(Outcome::Continue(Some(message))) => println!("{message}"),
                Ok(Outcome::Continue(None)) => {}
                Err(e) => self.print_error(&e.to_string()),
            }
        }
        Ok(())
    }

    fn print_error(&self, message: &str) {
        if self.color_enabled {
            eprintln!("{}", Color::Red.paint(message));
        } else {
            eprintln!("{message}");
        }
    }
}

/// Bind Tab and Shift-Tab to the completion menus
pub fn add_tab_bindings(keybindings: &mut Keybindings) {
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::UntilFound(vec![
            ReedlineEvent::Menu(FORWARD_MENU.to_string()),
            ReedlineEvent::MenuNext,
        ]),
    );
    keybindings.add_binding(
        KeyModifiers::SHIFT,
        KeyCode::BackTab,
        ReedlineEvent::UntilFound(vec![
            ReedlineEvent::Menu(BACKWARD_MENU.to_string()),
            ReedlineEvent::MenuPrevious,
        ]),
    );
}

fn tab_menu(shell: &SharedShell, name: &str, direction: Direction) -> ReedlineMenu {
    ReedlineMenu::WithCompleter {
        menu: Box::new(ColumnarMenu::default().with_name(name)),
        completer: Box::new(TabCompleter::new(shell.clone(), direction)),
    }
}

fn create_history(config: &HistoryConfig) -> Result<Box<FileBackedHistory>> {
    let history = if config.persist {
        if let Some(parent) = config.file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        FileBackedHistory::with_file(config.max_size, config.file_path.clone())
    } else {
        FileBackedHistory::new(config.max_size)
    };
    history
        .map(Box::new)
        .map_err(|e| ReplError::History(e.to_string()).into())
}
