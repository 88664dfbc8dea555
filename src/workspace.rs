//! Data directory layout
//!
//! The data directory holds the input book and one directory per phase.
//! Listings are snapshotted once at the start of a phase and sorted into
//! natural order.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PipelineError;
use crate::panels::natural;

pub const EXTRACTED_PAGES: &str = "extracted_pages";
pub const PANELS: &str = "panels";
pub const STITCHED_COLOR: &str = "stitched_color";
pub const STITCHED_BW: &str = "stitched_bw";
pub const ASSETS: &str = "assets";

#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn extracted_pages(&self) -> PathBuf {
        self.root.join(EXTRACTED_PAGES)
    }

    pub fn panels(&self) -> PathBuf {
        self.root.join(PANELS)
    }

    pub fn stitched_color(&self) -> PathBuf {
        self.root.join(STITCHED_COLOR)
    }

    pub fn stitched_bw(&self) -> PathBuf {
        self.root.join(STITCHED_BW)
    }

    pub fn assets(&self) -> PathBuf {
        self.root.join(ASSETS)
    }

    fn phase_dirs(&self) -> [PathBuf; 5] {
        [
            self.assets(),
            self.extracted_pages(),
            self.panels(),
            self.stitched_bw(),
            self.stitched_color(),
        ]
    }

    /// Create missing phase directories and empty existing ones
    ///
    /// Only regular files are removed; the book archive in the root is never
    /// touched.
    pub fn reset(&self) -> Result<(), PipelineError> {
        if !self.root.is_dir() {
            return Err(PipelineError::config(format!(
                "data directory {} does not exist",
                self.root.display()
            )));
        }

        for dir in self.phase_dirs() {
            if dir.is_dir() {
                clear_files(&dir)?;
            } else {
                fs::create_dir_all(&dir).map_err(|e| PipelineError::io(&dir, e))?;
            }
        }

        tracing::info!("workspace ready at {}", self.root.display());
        Ok(())
    }

    /// Make sure the phase directories exist without clearing them
    pub fn ensure(&self) -> Result<(), PipelineError> {
        for dir in self.phase_dirs() {
            fs::create_dir_all(&dir).map_err(|e| PipelineError::io(&dir, e))?;
        }
        Ok(())
    }

    /// First book archive with `extension` in the data directory
    ///
    /// Returns the book name (file stem) and its path.
    pub fn find_book(&self, extension: &str) -> Result<(String, PathBuf), PipelineError> {
        let names = list_with_extension(&self.root, extension)?;
        let first = names.into_iter().next().ok_or_else(|| {
            PipelineError::config(format!(
                "no .{extension} book found in {}",
                self.root.display()
            ))
        })?;

        let path = self.root.join(&first);
        let stem = Path::new(&first)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| first.clone());
        Ok((stem, path))
    }
}

/// Snapshot the files with `extension` in `dir`, in natural order
///
/// A missing directory or one without matching files is a configuration
/// error: a phase never starts on nothing.
pub fn snapshot(dir: &Path, extension: &str) -> Result<Vec<String>, PipelineError> {
    if !dir.is_dir() {
        return Err(PipelineError::config(format!(
            "source directory {} does not exist",
            dir.display()
        )));
    }

    let names = list_with_extension(dir, extension)?;
    if names.is_empty() {
        return Err(PipelineError::config(format!(
            "no .{extension} files in {}",
            dir.display()
        )));
    }

    tracing::debug!("{} .{extension} files in {}", names.len(), dir.display());
    Ok(names)
}

/// Names of the regular files in `dir` with `extension`, natural-sorted
pub fn list_with_extension(dir: &Path, extension: &str) -> Result<Vec<String>, PipelineError> {
    let entries = fs::read_dir(dir).map_err(|e| PipelineError::io(dir, e))?;
    let mut names = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| PipelineError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if matches {
            let name = entry.file_name().into_string().map_err(|raw| {
                PipelineError::config(format!(
                    "file name {raw:?} in {} is not valid UTF-8",
                    dir.display()
                ))
            })?;
            names.push(name);
        }
    }

    natural::sort_names(&mut names);
    Ok(names)
}

fn clear_files(dir: &Path) -> Result<(), PipelineError> {
    let entries = fs::read_dir(dir).map_err(|e| PipelineError::io(dir, e))?;
    for entry in entries {
        let path = entry.map_err(|e| PipelineError::io(dir, e))?.path();
        if path.is_file() {
            fs::remove_file(&path).map_err(|e| PipelineError::io(&path, e))?;
        }
    }
    Ok(())
}
