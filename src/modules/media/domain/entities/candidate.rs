use serde::Serialize;
use std::sync::Arc;

use super::{Episode, Movie, Track};

/// A remote metadata record eligible for assignment to a file
///
/// Records are shared, never copied: every match that refers to the same
/// record holds a clone of the same `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
pub enum Candidate {
    Episode(Arc<Episode>),
    Movie(Arc<Movie>),
    Track(Arc<Track>),
}

impl Candidate {
    pub fn episode(episode: Episode) -> Self {
        Candidate::Episode(Arc::new(episode))
    }

    pub fn movie(movie: Movie) -> Self {
        Candidate::Movie(Arc::new(movie))
    }

    pub fn track(track: Track) -> Self {
        Candidate::Track(Arc::new(track))
    }

    pub fn as_episode(&self) -> Option<&Episode> {
        match self {
            Candidate::Episode(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_movie(&self) -> Option<&Movie> {
        match self {
            Candidate::Movie(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_track(&self) -> Option<&Track> {
        match self {
            Candidate::Track(t) => Some(t),
            _ => None,
        }
    }

    /// True when both handles point at the very same record
    pub fn same_record(&self, other: &Candidate) -> bool {
        match (self, other) {
            (Candidate::Episode(a), Candidate::Episode(b)) => Arc::ptr_eq(a, b),
            (Candidate::Movie(a), Candidate::Movie(b)) => Arc::ptr_eq(a, b),
            (Candidate::Track(a), Candidate::Track(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Address of the shared record, stable for as long as any handle lives
    pub fn record_id(&self) -> usize {
        match self {
            Candidate::Episode(e) => Arc::as_ptr(e) as usize,
            Candidate::Movie(m) => Arc::as_ptr(m) as usize,
            Candidate::Track(t) => Arc::as_ptr(t) as usize,
        }
    }
}

impl std::fmt::Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Candidate::Episode(e) => e.fmt(f),
            Candidate::Movie(m) => m.fmt(f),
            Candidate::Track(t) => t.fmt(f),
        }
    }
}
