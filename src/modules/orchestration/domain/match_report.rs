use serde::Serialize;
use std::collections::HashSet;

use crate::modules::matching::Match;
use crate::modules::media::{Candidate, MediaFile};
use crate::shared::errors::AppResult;

pub type FileMatch = Match<MediaFile, Candidate>;

/// Partial result of a matching stage, keyed by input position
#[derive(Debug, Default)]
pub struct MatchOutcome {
    pub matches: Vec<(usize, FileMatch)>,
    pub remaining: Vec<(usize, MediaFile)>,
    /// Every candidate fetched by the stage, matched or not
    pub candidates: Vec<Candidate>,
}

impl MatchOutcome {
    /// Every member left as "no match"
    pub fn unmatched(members: Vec<(usize, MediaFile)>) -> Self {
        Self {
            remaining: members,
            ..Self::default()
        }
    }

    pub fn merge(&mut self, other: MatchOutcome) {
        self.matches.extend(other.matches);
        self.remaining.extend(other.remaining);
        self.candidates.extend(other.candidates);
    }

    pub fn into_report(mut self) -> MatchReport {
        self.matches.sort_by_key(|(index, _)| *index);
        self.remaining.sort_by_key(|(index, _)| *index);

        let used: HashSet<usize> = self
            .matches
            .iter()
            .map(|(_, m)| m.candidate.record_id())
            .collect();
        let mut seen = HashSet::new();
        let remaining_candidates = self
            .candidates
            .into_iter()
            .filter(|c| !used.contains(&c.record_id()) && seen.insert(c.record_id()))
            .collect();

        MatchReport {
            matches: self.matches.into_iter().map(|(_, m)| m).collect(),
            remaining_values: self.remaining.into_iter().map(|(_, f)| f).collect(),
            remaining_candidates,
        }
    }
}

/// Result of a top-level matching call
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchReport {
    /// Committed matches in input order
    pub matches: Vec<FileMatch>,
    /// Files left without a match, in input order
    pub remaining_values: Vec<MediaFile>,
    /// Fetched candidates no file was assigned to
    pub remaining_candidates: Vec<Candidate>,
}

impl MatchReport {
    pub fn remaining_values(&self) -> &[MediaFile] {
        &self.remaining_values
    }

    pub fn remaining_candidates(&self) -> &[Candidate] {
        &self.remaining_candidates
    }

    pub fn candidate_for(&self, file: &MediaFile) -> Option<&Candidate> {
        self.matches
            .iter()
            .find(|m| m.value.path() == file.path())
            .map(|m| &m.candidate)
    }

    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
