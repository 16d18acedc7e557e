use serde::Serialize;
use std::path::PathBuf;

use crate::modules::media::MediaFile;

/// What the members of a batch have in common
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "key", rename_all = "snake_case")]
pub enum BatchKey {
    /// Normalized detected name
    Name(String),
    Folder(PathBuf),
}

/// Files fetched and matched together against one candidate set
#[derive(Debug, Clone, Serialize)]
pub struct Batch {
    pub key: BatchKey,
    /// Query used for the candidate fetch, empty when nothing was detected
    pub query: String,
    /// Members with their position in the caller's input
    pub members: Vec<(usize, MediaFile)>,
}

impl Batch {
    pub fn new(key: BatchKey, query: impl Into<String>) -> Self {
        Self {
            key,
            query: query.into(),
            members: Vec::new(),
        }
    }

    pub fn push(&mut self, index: usize, file: MediaFile) {
        self.members.push((index, file));
    }

    pub fn first_index(&self) -> Option<usize> {
        self.members.first().map(|(index, _)| *index)
    }

    pub fn has_query(&self) -> bool {
        !self.query.trim().is_empty()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
