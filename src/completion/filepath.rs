//! File path completion
//!
//! The directory part of the typed path is listed once per fresh prefix and
//! the entries are fed into a dedicated [`PrefixSet`], which then does the
//! cycling. Candidates keep the directory exactly as the user typed it, so a
//! `~/` prefix or a relative path comes back unchanged.

use std::fs;
use std::path::{Path, PathBuf};

use super::context::Direction;
use super::prefix_set::PrefixSet;
use super::tokenizer::quote_if_spaced;

/// Directory listing that produced the current candidates
#[derive(Debug, Clone, PartialEq, Eq)]
struct Scan {
    directory: PathBuf,
    hidden: bool,
}

/// Completes the argument of file-taking commands against the filesystem
#[derive(Debug, Clone)]
pub struct FilePathCompleter {
    entries: PrefixSet,
    last_scan: Option<Scan>,
    home: Option<PathBuf>,
    base: Option<PathBuf>,
}

impl Default for FilePathCompleter {
    fn default() -> Self {
        Self {
            entries: PrefixSet::new("filepath"),
            last_scan: None,
            home: dirs::home_dir(),
            base: None,
        }
    }
}

impl FilePathCompleter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: directory `~/` expands to
    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    /// Builder: directory relative paths are resolved against
    ///
    /// Defaults to the process working directory.
    pub fn with_base_dir(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Complete the path argument of `input`
    ///
    /// # Arguments
    /// * `input` - Full input line
    /// * `command_prefix` - Leading part of the line that is not the path
    /// * `direction` - Cycle direction
    ///
    /// # Returns
    /// * `Option<String>` - `command_prefix`, a space and the next path
    pub fn complete(
        &mut self,
        input: &str,
        command_prefix: &str,
        direction: Direction,
    ) -> Option<String> {
        let rest = input.strip_prefix(command_prefix)?;
        let partial = strip_path_quotes(rest.trim_start_matches(' '));

        let (dir_part, basename) = match partial.rfind('/') {
            Some(slash) => partial.split_at(slash + 1),
            None => ("", partial),
        };

        let scan = Scan {
            directory: self.resolve(dir_part),
            hidden: basename.starts_with('.'),
        };
        if self.last_scan.as_ref() != Some(&scan) {
            self.rescan(&scan, dir_part);
            self.last_scan = Some(scan);
        }

        let found = self.entries.complete(partial, direction)?;
        Some(format!("{command_prefix} {}", quote_if_spaced(&found)))
    }

    /// Forget the cached listing and the cycle
    pub fn reset(&mut self) {
        self.entries.clear();
        self.last_scan = None;
    }

    /// Directory on disk for the typed directory part
    fn resolve(&self, dir_part: &str) -> PathBuf {
        if let Some(rest) = dir_part.strip_prefix("~/")
            && let Some(home) = &self.home
        {
            return home.join(rest);
        }
        if dir_part.is_empty() {
            return self.base.clone().unwrap_or_else(|| PathBuf::from("."));
        }
        let path = Path::new(dir_part);
        match &self.base {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    fn rescan(&mut self, scan: &Scan, dir_part: &str) {
        self.entries.clear();
        let listing = match fs::read_dir(&scan.directory) {
            Ok(listing) => listing,
            Err(e) => {
                tracing::trace!(directory = %scan.directory.display(), error = %e, "directory not listable");
                return;
            }
        };

        for entry in listing.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name == "." || name == ".." || (name.starts_with('.') && !scan.hidden) {
                continue;
            }
            self.entries.add(format!("{dir_part}{name}"));
        }
        tracing::trace!(
            directory = %scan.directory.display(),
            entries = self.entries.len(),
            "directory scanned"
        );
    }
}

/// Drop an opening quote and everything from the closing one on
fn strip_path_quotes(text: &str) -> &str {
    match text.strip_prefix('"') {
        Some(inner) => inner.split('"').next().unwrap_or(inner),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};

    use tempfile::TempDir;

    use super::*;
    use Direction::{Backward, Forward};

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("a.txt")).unwrap();
        File::create(dir.path().join(".hidden")).unwrap();
        fs::create_dir(dir.path().join("test_dir")).unwrap();
        File::create(dir.path().join("test_dir").join("file1.txt")).unwrap();
        File::create(dir.path().join("test_dir").join("file2.txt")).unwrap();
        File::create(dir.path().join("test_dir").join("my notes.txt")).unwrap();
        dir
    }

    fn completer(dir: &TempDir) -> FilePathCompleter {
        FilePathCompleter::new()
            .with_base_dir(dir.path())
            .with_home(dir.path())
    }

    #[test]
    fn test_lists_visible_entries_only() {
        let dir = fixture();
        let mut fp = completer(&dir);
        assert_eq!(
            fp.complete("/sendfile ", "/sendfile", Forward).as_deref(),
            Some("/sendfile a.txt")
        );
        assert_eq!(
            fp.complete("/sendfile a.txt", "/sendfile", Forward).as_deref(),
            Some("/sendfile test_dir")
        );
        assert_eq!(
            fp.complete("/sendfile test_dir", "/sendfile", Forward).as_deref(),
            Some("/sendfile a.txt")
        );
    }

    #[test]
    fn test_dotfiles_on_explicit_request() {
        let dir = fixture();
        let mut fp = completer(&dir);
        assert_eq!(
            fp.complete("/sendfile .", "/sendfile", Forward).as_deref(),
            Some("/sendfile .hidden")
        );
    }

    #[test]
    fn test_never_yields_dot_entries() {
        let dir = fixture();
        let mut fp = completer(&dir);
        for _ in 0..4 {
            let found = fp.complete("/sendfile .", "/sendfile", Forward).unwrap();
            assert_ne!(found, "/sendfile .");
            assert_ne!(found, "/sendfile ..");
        }
    }

    #[test]
    fn test_subdirectory_keeps_typed_prefix() {
        let dir = fixture();
        let mut fp = completer(&dir);
        assert_eq!(
            fp.complete("/sendfile test_dir/f", "/sendfile", Forward).as_deref(),
            Some("/sendfile test_dir/file1.txt")
        );
        assert_eq!(
            fp.complete("/sendfile test_dir/file1.txt", "/sendfile", Forward).as_deref(),
            Some("/sendfile test_dir/file2.txt")
        );
        assert_eq!(
            fp.complete("/sendfile test_dir/file2.txt", "/sendfile", Backward).as_deref(),
            Some("/sendfile test_dir/file1.txt")
        );
    }

    #[test]
    fn test_spaced_names_are_quoted_and_unquoted() {
        let dir = fixture();
        let mut fp = completer(&dir);
        let found = fp.complete("/sendfile test_dir/m", "/sendfile", Forward);
        assert_eq!(found.as_deref(), Some("/sendfile \"test_dir/my notes.txt\""));
        let again = fp.complete(&found.unwrap(), "/sendfile", Forward);
        assert_eq!(again.as_deref(), Some("/sendfile \"test_dir/my notes.txt\""));
    }

    #[test]
    fn test_home_is_recontracted() {
        let dir = fixture();
        let mut fp = completer(&dir);
        assert_eq!(
            fp.complete("/plugins install ~/test_dir/file1", "/plugins install", Forward)
                .as_deref(),
            Some("/plugins install ~/test_dir/file1.txt")
        );
    }

    #[test]
    fn test_absolute_paths() {
        let dir = fixture();
        let mut fp = FilePathCompleter::new();
        let typed = format!("/sendfile {}/a", dir.path().display());
        let expected = format!("/sendfile {}/a.txt", dir.path().display());
        assert_eq!(fp.complete(&typed, "/sendfile", Forward), Some(expected));
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = fixture();
        let mut fp = completer(&dir);
        assert_eq!(fp.complete("/sendfile nowhere/x", "/sendfile", Forward), None);
        assert_eq!(fp.complete("/sendfile a.txt/x", "/sendfile", Forward), None);
    }

    #[test]
    fn test_wrong_command_prefix() {
        let dir = fixture();
        let mut fp = completer(&dir);
        assert_eq!(fp.complete("/msg ", "/sendfile", Forward), None);
    }

    #[test]
    fn test_reset_rescans() {
        let dir = fixture();
        let mut fp = completer(&dir);
        assert!(fp.complete("/sendfile b", "/sendfile", Forward).is_none());
        File::create(dir.path().join("b.txt")).unwrap();
        assert!(fp.complete("/sendfile b", "/sendfile", Forward).is_none());
        fp.reset();
        assert_eq!(
            fp.complete("/sendfile b", "/sendfile", Forward).as_deref(),
            Some("/sendfile b.txt")
        );
    }

    #[test]
    fn test_strip_path_quotes() {
        assert_eq!(strip_path_quotes("\"my file\""), "my file");
        assert_eq!(strip_path_quotes("\"my fi"), "my fi");
        assert_eq!(strip_path_quotes("plain"), "plain");
    }
}
