//! Session commands understood by the shell
//!
//! Only the commands that change what completion sees are acted on:
//! connecting, opening and closing windows, aliases and plugins. Every
//! other line is echoed back.

use super::{DemoSession, room_config_form};
use crate::completion::tokenizer::tokenize;
use crate::completion::{CompletionEngine, Source, WindowKind};
use crate::config::PluginConfig;
use crate::error::{ReplError, Result};

/// What the shell should do after a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Keep reading, optionally printing a message
    Continue(Option<String>),
    /// Leave the shell
    Quit,
}

impl Outcome {
    fn say(message: impl Into<String>) -> Self {
        Outcome::Continue(Some(message.into()))
    }
}

fn usage(command: &str, usage: &str) -> crate::error::SlashcompError {
    ReplError::BadArguments {
        command: command.to_string(),
        usage: usage.to_string(),
    }
    .into()
}

/// Apply one input line to the session
///
/// # Arguments
/// * `line` - Line as entered
/// * `session` - Session to update
/// * `engine` - Completion engine to keep in step with the session
///
/// # Returns
/// * `Result<Outcome>` - What to do next, or a usage error
pub fn apply(
    line: &str,
    session: &mut DemoSession,
    engine: &mut CompletionEngine,
) -> Result<Outcome> {
    let tokens = tokenize(line.trim());
    let args: Vec<&str> = tokens.tokens.iter().map(|t| t.value).collect();
    let Some((&command, args)) = args.split_first() else {
        return Ok(Outcome::Continue(None));
    };
    tracing::debug!(command, ?args, "apply");

    match (command, args) {
        ("/quit", []) => Ok(Outcome::Quit),

        ("/connect", [] | [_]) => {
            session.connect(args.first().copied())?;
            engine.invalidate_session();
            Ok(Outcome::say(format!("Connected as {}", session.account())))
        }
        ("/connect", _) => Err(usage("/connect", "/connect [account]")),

        ("/disconnect", []) => {
            session.disconnect();
            engine.invalidate_session();
            Ok(Outcome::say("Disconnected"))
        }

        ("/msg", [who, ..]) => {
            if !session.is_connected() {
                return Err("You are not currently connected.".into());
            }
            let jid = session
                .find_contact(who)
                .map(|c| c.jid.clone())
                .unwrap_or_else(|| who.to_string());
            let (id, _) = session.open_window(WindowKind::Chat, &jid);
            Ok(Outcome::say(format!("Window {} with {jid}", id.0)))
        }
        ("/msg", []) => Err(usage("/msg", "/msg <contact> [message]")),

        ("/join", [room, ..]) => {
            let (_, opened) = session.open_window(WindowKind::Muc, room);
            if opened {
                engine.invalidate(&Source::Occupants(room.to_string()));
            }
            Ok(Outcome::say(format!("Joined {room}")))
        }
        ("/join", []) => Err(usage("/join", "/join <room>")),

        ("/room", ["config", ..]) => {
            let window = session.active_window();
            let room = match (window.kind, window.target()) {
                (WindowKind::Muc, Some(room)) => room.to_string(),
                _ => return Err("/room config is only available in a room window.".into()),
            };
            let (id, _) = session.open_window(WindowKind::Config, &room);
            engine.add_form(id, room_config_form());
            Ok(Outcome::say(format!("Configuring {room}")))
        }

        ("/win", [selector]) => {
            session.focus(selector)?;
            Ok(Outcome::Continue(None))
        }
        ("/win", _) => Err(usage("/win", "/win <number|console|jid>")),

        ("/close", [] | [_]) => {
            let id = session.close(args.first().copied())?;
            engine.window_closed(id);
            Ok(Outcome::say(format!("Closed window {}", id.0)))
        }

        ("/alias", ["add", name, ..]) => {
            let name = name.trim_start_matches('/');
            session.add_alias(name);
            engine.add_alias(name);
            Ok(Outcome::say(format!("Alias /{name} added")))
        }
        ("/alias", ["remove", name]) => {
            let name = name.trim_start_matches('/');
            if !session.remove_alias(name) {
                return Err(format!("No such alias /{name}").into());
            }
            engine.remove_alias(name);
            Ok(Outcome::say(format!("Alias /{name} removed")))
        }
        ("/alias", _) => Err(usage("/alias", "/alias add|remove <name> [value]")),

        ("/plugins", ["load", name]) => {
            session.load_plugin(name)?;
            if let Some(plugin) = session.plugin_declaration(name) {
                register_plugin(plugin, engine);
            }
            invalidate_plugins(engine);
            Ok(Outcome::say(format!("Loaded {name}")))
        }
        ("/plugins", ["unload", name]) => {
            if !session.unload_plugin(name) {
                return Err(format!("Plugin {name} is not loaded").into());
            }
            if let Some(plugin) = session.plugin_declaration(name) {
                for command in &plugin.commands {
                    engine.remove_command(command);
                }
            }
            if let Some(plugins) = engine.plugins_mut() {
                plugins.remove_plugin(name);
            }
            invalidate_plugins(engine);
            Ok(Outcome::say(format!("Unloaded {name}")))
        }
        ("/plugins", [_, _]) => Err(usage("/plugins", "/plugins load|unload <plugin>")),

        ("/reload", []) => {
            reload(session, engine);
            Ok(Outcome::say("Completion reloaded"))
        }

        _ => Ok(Outcome::say(line.trim().to_string())),
    }
}

/// Rebuild the engine and re-register aliases and loaded plugins
pub fn reload(session: &DemoSession, engine: &mut CompletionEngine) {
    engine.init();
    for alias in session.aliases() {
        engine.add_alias(alias);
    }
    for plugin in session.loaded_plugin_declarations() {
        register_plugin(plugin, engine);
    }
}

/// Add a plugin's commands and completion lists to the engine
fn register_plugin(plugin: &PluginConfig, engine: &mut CompletionEngine) {
    for command in &plugin.commands {
        engine.add_command(command);
    }
    let Some(completers) = engine.plugins_mut() else {
        return;
    };
    for (key, items) in &plugin.completions {
        completers.add(&plugin.name, key, items.iter().cloned());
    }
    for key in &plugin.filepath {
        completers.add_filepath(&plugin.name, key);
    }
    tracing::debug!(plugin = %plugin.name, commands = plugin.commands.len(), "plugin registered");
}

fn invalidate_plugins(engine: &mut CompletionEngine) {
    engine.invalidate(&Source::PluginsLoaded);
    engine.invalidate(&Source::PluginsUnloaded);
}
