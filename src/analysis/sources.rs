use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::error::Result;

/// Selects the source files counted in a working copy.
#[derive(Debug, Clone)]
pub struct SourceFilter {
    extensions: Vec<String>,
    loc_skips_hidden: bool,
}

impl SourceFilter {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| format!(".{}", ext.as_ref().trim_start_matches('.').to_lowercase()))
                .collect(),
            loc_skips_hidden: false,
        }
    }

    pub fn java() -> Self {
        Self::new(["java"])
    }

    /// Apply the hidden-path exclusion to line counting as well. Off by
    /// default: only the file count skips hidden paths.
    pub fn skip_hidden_for_loc(mut self, skip: bool) -> Self {
        self.loc_skips_hidden = skip;
        self
    }

    /// Case-insensitive suffix match on the file name.
    pub fn matches(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        let name = name.to_string_lossy().to_lowercase();
        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }

    /// Number of matching files, skipping any path with a dot-prefixed segment.
    pub fn count_files(&self, root: &Path) -> Result<u64> {
        Ok(self.source_files(root, true)?.len() as u64)
    }

    /// Newlines across all matching files, i.e. `wc -l` of their
    /// concatenation.
    pub fn count_lines(&self, root: &Path) -> Result<u64> {
        let mut total = 0;
        for path in self.source_files(root, self.loc_skips_hidden)? {
            match fs::read(&path) {
                Ok(bytes) => total += bytes.iter().filter(|b| **b == b'\n').count() as u64,
                Err(e) => tracing::warn!("Skipping unreadable {}: {}", path.display(), e),
            }
        }
        Ok(total)
    }

    fn source_files(&self, root: &Path, skip_hidden: bool) -> Result<Vec<PathBuf>> {
        // Surface a missing root as an error instead of an empty walk.
        fs::metadata(root)?;

        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !skip_hidden || entry.depth() == 0 || !is_hidden(entry));

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                    continue;
                }
            };
            if entry.file_type().is_file() && self.matches(entry.path()) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}
