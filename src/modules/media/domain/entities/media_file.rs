use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::modules::media::domain::value_objects::MediaClass;

/// A local file being organized
///
/// Immutable once matching begins; the matcher only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaFile {
    pub path: PathBuf,
    pub size: u64,
}

impl MediaFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            size: 0,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full file name including extension
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }

    /// File name without its last extension
    pub fn base_name(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
    }

    /// Lowercased extension without the dot
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
    }

    pub fn has_extension(&self, extensions: &[&str]) -> bool {
        self.extension()
            .map(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)))
            .unwrap_or(false)
    }

    pub fn media_class(&self) -> MediaClass {
        self.extension()
            .map(|ext| MediaClass::from_extension(&ext))
            .unwrap_or(MediaClass::Other)
    }

    pub fn parent_folder(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }

    /// Name of the containing folder, if any
    pub fn folder_name(&self) -> Option<&str> {
        self.parent_folder()
            .and_then(|p| p.file_name())
            .and_then(|name| name.to_str())
    }

    pub fn same_folder(&self, other: &MediaFile) -> bool {
        self.parent_folder() == other.parent_folder()
    }
}

impl std::fmt::Display for MediaFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}
