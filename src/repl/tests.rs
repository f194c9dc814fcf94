use super::*;
use crate::config::{Config, SessionConfig};
use crate::session::DemoSession;
use tempfile::TempDir;

fn shell() -> SharedShell {
    ShellState::new(DemoSession::from_config(&SessionConfig::default())).shared()
}

#[test]
fn test_engine_with_memory_history() {
    let mut config = Config::default();
    config.history.persist = false;
    assert!(ReplEngine::new(shell(), &config.history, &config.display).is_ok());
}

#[test]
fn test_engine_creates_history_directory() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.history.file_path = dir.path().join("nested").join("history");
    ReplEngine::new(shell(), &config.history, &config.display).unwrap();
    assert!(dir.path().join("nested").is_dir());
}

#[test]
fn test_engine_without_decorations() {
    let mut config = Config::default();
    config.history.persist = false;
    config.display.syntax_highlighting = false;
    config.display.hints = false;
    config.display.color_output = false;
    assert!(ReplEngine::new(shell(), &config.history, &config.display).is_ok());
}

#[test]
fn test_tab_bindings_registered() {
    let mut keybindings = default_emacs_keybindings();
    add_tab_bindings(&mut keybindings);
    assert!(matches!(
        keybindings.find_binding(KeyModifiers::NONE, KeyCode::Tab),
        Some(ReedlineEvent::UntilFound(_))
    ));
    assert!(matches!(
        keybindings.find_binding(KeyModifiers::SHIFT, KeyCode::BackTab),
        Some(ReedlineEvent::UntilFound(_))
    ));
}

#[test]
fn test_shell_session_flow() {
    let shell = shell();
    {
        let mut state = lock(&shell);
        assert_eq!(state.apply("/connect").unwrap(), Outcome::Continue(Some("Connected as me@example.org".to_string())));
        state.apply("/join lounge@conference.example.org").unwrap();
        assert_eq!(
            state.tab("/kick c", Direction::Forward).as_deref(),
            Some("/kick carol")
        );
    }
    let prompt = SlashPrompt::from_session(lock(&shell).session(), false);
    assert!(reedline::Prompt::render_prompt_left(&prompt).starts_with("[2:muc"));
}
