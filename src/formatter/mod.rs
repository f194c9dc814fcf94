//! Output formatting for the non-interactive subcommands
//!
//! - Command tables rendered with tabled
//! - Completion runs as plain lines or JSON

use serde::Serialize;
use tabled::{
    Table,
    builder::Builder,
    settings::{Alignment, Color, Modify, Style, object::Columns, object::Rows, width::Width},
};

use crate::completion::CommandEntry;
use crate::error::Result;

/// Maximum width of the synopsis column (characters)
const MAX_SYNOPSIS_WIDTH: usize = 60;

/// Render the command table
///
/// # Arguments
/// * `entries` - Commands in display order
/// * `use_colors` - Color the header row
///
/// # Returns
/// * `String` - The rendered table
pub fn format_commands<'a>(
    entries: impl IntoIterator<Item = &'a CommandEntry>,
    use_colors: bool,
) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Command", "Args", "Completes", "Synopsis"]);

    for entry in entries {
        let (min, max) = entry.arity;
        let args = if min == max {
            min.to_string()
        } else {
            format!("{min}-{max}")
        };
        let completes = if entry.completer.is_some() { "yes" } else { "-" };
        builder.push_record([
            entry.name.clone(),
            args,
            completes.to_string(),
            entry.synopsis.clone(),
        ]);
    }

    let mut table = builder.build();
    style_table(&mut table, use_colors);
    table.to_string()
}

fn style_table(table: &mut Table, use_colors: bool) {
    table.with(Style::modern());
    table.with(Modify::new(Columns::new(3..=3)).with(Width::wrap(MAX_SYNOPSIS_WIDTH)));
    table.with(Modify::new(Rows::first()).with(Alignment::center()));
    if use_colors {
        table.modify(Rows::first(), Color::FG_CYAN | Color::BOLD);
    }
}

/// Lines produced by repeated Tab presses on one input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionRun {
    /// Line the first press was made on
    pub input: String,
    /// Window kind the presses were made in
    pub window: String,
    /// Cycle direction
    pub direction: String,
    /// One entry per press; null when nothing completed
    pub results: Vec<Option<String>>,
}

impl CompletionRun {
    /// Render as one line per press
    pub fn to_text(&self) -> String {
        self.results
            .iter()
            .enumerate()
            .map(|(i, result)| match result {
                Some(line) => format!("{}: {line}", i + 1),
                None => format!("{}: (no completion)", i + 1),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
