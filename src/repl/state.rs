//! State shared between the line editor callbacks and the read loop

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::completion::{CompletionEngine, Direction};
use crate::error::Result;
use crate::session::{DemoSession, Outcome, apply, commands::reload};

/// Completion engine, session and the line the last completion produced
#[derive(Debug)]
pub struct ShellState {
    engine: CompletionEngine,
    session: DemoSession,
    /// Output of the previous Tab press; any other line starts a new cycle
    last_output: Option<String>,
}

/// Handle passed to the completer, hinter and highlighter
pub type SharedShell = Arc<Mutex<ShellState>>;

impl ShellState {
    /// Create the state and register the session's aliases
    pub fn new(session: DemoSession) -> Self {
        let mut engine = CompletionEngine::new();
        reload(&session, &mut engine);
        Self {
            engine,
            session,
            last_output: None,
        }
    }

    /// Wrap into a shared handle
    pub fn shared(self) -> SharedShell {
        Arc::new(Mutex::new(self))
    }

    /// One Tab press on `line`
    ///
    /// # Arguments
    /// * `line` - Text before the cursor
    /// * `direction` - Tab or Shift-Tab
    ///
    /// # Returns
    /// * `Option<String>` - Replacement line, or None when nothing completes
    pub fn tab(&mut self, line: &str, direction: Direction) -> Option<String> {
        let ctx = self.session.context(line, direction);
        if self.last_output.as_deref() != Some(line) {
            self.engine.reset(&ctx);
        }
        let found = self.engine.complete(&ctx, &self.session);
        self.last_output = found.clone();
        found
    }

    /// Forget the cycle; called once a line has been entered
    pub fn end_of_line(&mut self) {
        self.last_output = None;
        let ctx = self.session.context("", Direction::Forward);
        self.engine.reset(&ctx);
    }

    /// Apply an entered line to the session
    pub fn apply(&mut self, line: &str) -> Result<Outcome> {
        self.end_of_line();
        apply(line, &mut self.session, &mut self.engine)
    }

    pub fn session(&self) -> &DemoSession {
        &self.session
    }

    pub fn engine(&self) -> &CompletionEngine {
        &self.engine
    }

    /// Synopsis of a registered built-in command
    pub fn synopsis(&self, command: &str) -> Option<&str> {
        self.engine.entry(command).map(|e| e.synopsis.as_str())
    }
}

/// Lock the shared state, recovering from a poisoned lock
pub fn lock(shell: &SharedShell) -> MutexGuard<'_, ShellState> {
    shell.lock().unwrap_or_else(PoisonError::into_inner)
}
