//! Prompt showing the active window and connection

use std::borrow::Cow;

use nu_ansi_term::Color;
use reedline::{Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus};

use crate::session::DemoSession;

/// Prompt for the shell: `[2:muc lounge@conference.example.org] me@example.org> `
pub struct SlashPrompt {
    /// Window number and description
    window: String,
    /// Account in use
    account: String,
    /// Whether connected
    connected: bool,
    /// Paint the connection state
    color: bool,
}

impl SlashPrompt {
    /// Create a prompt
    ///
    /// # Arguments
    /// * `window` - Window label
    /// * `account` - Account JID
    /// * `connected` - Whether connected
    /// * `color` - Use ANSI colors
    pub fn new(window: String, account: String, connected: bool, color: bool) -> Self {
        Self {
            window,
            account,
            connected,
            color,
        }
    }

    /// Snapshot the session
    pub fn from_session(session: &DemoSession, color: bool) -> Self {
        let window = session.active_window();
        let label = match window.target() {
            Some(target) => format!("{}:{} {target}", session.active_number(), window.kind),
            None => format!("{}:{}", session.active_number(), window.kind),
        };
        Self::new(
            label,
            session.account().to_string(),
            session.is_connected(),
            color,
        )
    }
}

impl Prompt for SlashPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        let account = if self.connected {
            self.account.clone()
        } else {
            format!("{} (offline)", self.account)
        };
        let account = match (self.color, self.connected) {
            (false, _) => account,
            (true, true) => Color::Green.paint(account).to_string(),
            (true, false) => Color::DarkGray.paint(account).to_string(),
        };
        format!("[{}] {account}> ", self.window).into()
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        "".into()
    }

    fn render_prompt_indicator(&self, _prompt_mode: PromptEditMode) -> Cow<'_, str> {
        "".into()
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        "... ".into()
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };

        format!("({}reverse-search: {}) ", prefix, history_search.term).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::WindowKind;
    use crate::config::SessionConfig;

    #[test]
    fn test_offline_console_prompt() {
        let session = DemoSession::from_config(&SessionConfig::default());
        let prompt = SlashPrompt::from_session(&session, false);
        assert_eq!(prompt.render_prompt_left(), "[1:console] me@example.org (offline)> ");
    }

    #[test]
    fn test_window_target_in_prompt() {
        let mut session = DemoSession::from_config(&SessionConfig::default());
        session.connect(None).unwrap();
        session.open_window(WindowKind::Muc, "lounge@conference.example.org");
        let prompt = SlashPrompt::from_session(&session, false);
        assert_eq!(
            prompt.render_prompt_left(),
            "[2:muc lounge@conference.example.org] me@example.org> "
        );
    }

    #[test]
    fn test_right_prompt_empty() {
        let prompt = SlashPrompt::new("1:console".to_string(), "a@b".to_string(), true, true);
        assert_eq!(prompt.render_prompt_right(), "");
        assert_eq!(prompt.render_prompt_indicator(PromptEditMode::Default), "");
    }
}
