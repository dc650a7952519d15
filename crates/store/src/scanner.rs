use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

/// A path the walk could not read
#[derive(Debug)]
pub struct ScanError {
    pub path: PathBuf,
    pub error: walkdir::Error,
}

/// Files found by one walk, plus the paths it failed on
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub files: Vec<PathBuf>,
    pub errors: Vec<ScanError>,
}

/// Scanner for finding result files below a directory
pub struct FileScanner {
    root: PathBuf,
    extension: String,
    include_hidden: bool,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>, extension: impl Into<String>) -> Self {
        let extension: String = extension.into();
        Self {
            root: root.as_ref().to_path_buf(),
            extension: extension.trim_start_matches('.').to_string(),
            include_hidden: true,
        }
    }

    /// Whether dot-files and dot-directories are walked (on by default).
    #[must_use]
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Recursively collect files with the configured extension, sorted by
    /// path so discovery order is reproducible.
    ///
    /// Unreadable directories and broken links named like result files end up
    /// in `errors`. A broken link with another extension is only logged.
    pub fn scan(&self) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();

        let walker = WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| self.include_hidden || entry.depth() == 0 || !is_hidden(entry));

        for result in walker {
            match result {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }
                    if !self.has_extension(entry.path()) {
                        continue;
                    }
                    outcome.files.push(entry.into_path());
                }
                Err(error) => {
                    let path = error.path().unwrap_or(self.root.as_path()).to_path_buf();
                    if is_missing(&error) && !self.has_extension(&path) {
                        log::debug!("Ignoring broken link {}", path.display());
                        continue;
                    }
                    log::warn!("Failed to read entry: {error}");
                    outcome.errors.push(ScanError { path, error });
                }
            }
        }

        log::info!(
            "Found {} result files under {} ({} unreadable)",
            outcome.files.len(),
            self.root.display(),
            outcome.errors.len()
        );
        outcome
    }

    fn has_extension(&self, path: &Path) -> bool {
        if self.extension.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn is_missing(error: &walkdir::Error) -> bool {
    error
        .io_error()
        .is_some_and(|io| io.kind() == ErrorKind::NotFound)
}
