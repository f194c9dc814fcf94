//! Shell completion scripts for the slashcomp binary itself

use clap::CommandFactory;
use clap_complete::{Shell, generate};
use std::io::Write;

use crate::cli::CliArgs;

/// Binary name the scripts complete
const BIN_NAME: &str = "slashcomp";

/// Write the completion script for `shell`
///
/// # Arguments
/// * `shell` - Target shell
/// * `out` - Destination, usually stdout
pub fn generate_completion(shell: Shell, out: &mut dyn Write) {
    let mut cmd = CliArgs::command();
    generate(shell, &mut cmd, BIN_NAME, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(shell: Shell) -> String {
        let mut buffer = Vec::new();
        generate_completion(shell, &mut buffer);
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_bash_script_names_subcommands() {
        let bash = script(Shell::Bash);
        assert!(bash.contains("slashcomp"));
        assert!(bash.contains("complete"));
        assert!(bash.contains("commands"));
    }

    #[test]
    fn test_fish_and_zsh_scripts() {
        assert!(script(Shell::Fish).contains("slashcomp"));
        assert!(script(Shell::Zsh).contains("#compdef slashcomp"));
    }
}
