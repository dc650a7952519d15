use std::path::Path;
use std::time::Instant;

use crate::config::SimtabConfig;
use crate::entry::Entry;
use crate::error::{Result, StoreError};
use crate::report::LoadReport;
use crate::scanner::FileScanner;

/// Ordered collection of entries, in discovery order
#[derive(Debug, Default)]
pub struct Registry {
    config: SimtabConfig,
    entries: Vec<Entry>,
}

impl Registry {
    pub fn new(config: SimtabConfig) -> Self {
        Self {
            config,
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SimtabConfig {
        &self.config
    }

    /// Discover every result file below `root` and append one entry per file.
    ///
    /// Files that cannot be decoded or read are skipped and listed in the
    /// report; only a bad root fails the whole load.
    pub fn load_from_folder(&mut self, root: &Path) -> Result<LoadReport> {
        if !root.is_dir() {
            return Err(StoreError::InvalidPath(root.display().to_string()));
        }

        let start = Instant::now();
        log::info!("Loading results from {}", root.display());

        let scan = FileScanner::new(root, self.config.extension.as_str())
            .include_hidden(self.config.include_hidden)
            .scan();

        let mut report = LoadReport::new();
        report.files_found = scan.files.len() + scan.errors.len();
        for unreadable in scan.errors {
            report.add_failure(unreadable.path, unreadable.error);
        }
        for path in scan.files {
            match Entry::open(&path, &self.config) {
                Ok(entry) => {
                    self.entries.push(entry);
                    report.add_entry();
                }
                Err(e) => {
                    log::warn!("Skipping {}: {e}", path.display());
                    report.add_failure(path, e);
                }
            }
        }

        report.time_ms = start.elapsed().as_millis() as u64;
        log::info!(
            "Loaded {} of {} files ({} skipped) in {} ms",
            report.entries_loaded,
            report.files_found,
            report.failures.len(),
            report.time_ms
        );
        Ok(report)
    }

    pub fn add(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    pub fn extend<I: IntoIterator<Item = Entry>>(&mut self, entries: I) {
        self.entries.extend(entries);
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Entry> {
        self.entries.get_mut(index)
    }

    #[must_use]
    pub fn position(&self, path: &Path) -> Option<usize> {
        self.entries.iter().position(|entry| entry.filepath() == path)
    }

    #[must_use]
    pub fn find(&self, path: &Path) -> Option<&Entry> {
        self.position(path).map(|idx| &self.entries[idx])
    }

    pub fn remove(&mut self, index: usize) -> Option<Entry> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    pub fn remove_path(&mut self, path: &Path) -> Option<Entry> {
        let idx = self.position(path)?;
        Some(self.entries.remove(idx))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Entry> {
        self.entries.iter_mut()
    }

    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [Entry] {
        &mut self.entries
    }

    /// Write every modified entry; returns how many were written.
    pub fn save_dirty(&mut self) -> Result<usize> {
        let mut saved = 0;
        for entry in self.entries.iter_mut().filter(|entry| entry.is_dirty()) {
            entry.save()?;
            saved += 1;
        }
        if saved > 0 {
            log::info!("Saved {saved} modified entries");
        }
        Ok(saved)
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a mut Registry {
    type Item = &'a mut Entry;
    type IntoIter = std::slice::IterMut<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter_mut()
    }
}

impl IntoIterator for Registry {
    type Item = Entry;
    type IntoIter = std::vec::IntoIter<Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
