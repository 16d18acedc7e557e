use regex::Regex;

use crate::modules::media::MediaFile;
use crate::shared::errors::AppResult;

/// Recognizes samples, trailers and extras that should never be matched
pub struct ClutterFilter {
    pattern: Regex,
}

impl ClutterFilter {
    pub fn new(pattern: &str) -> AppResult<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// Looks at the file name and the containing folder name
    pub fn is_clutter(&self, file: &MediaFile) -> bool {
        self.pattern.is_match(file.file_name())
            || file.folder_name().map_or(false, |name| self.pattern.is_match(name))
    }
}
