use crate::log_debug;
use crate::modules::matching::Match;
use crate::modules::media::{Candidate, MediaFile};

/// True when `companion` is a sidecar of `anchor`: same folder, and its file
/// name starts with the anchor's base name followed by a separator
pub fn is_derived(companion: &MediaFile, anchor: &MediaFile, min_prefix_len: usize) -> bool {
    if companion.path() == anchor.path() || !companion.same_folder(anchor) {
        return false;
    }

    let prefix = anchor.base_name().trim().to_lowercase();
    if prefix.chars().count() < min_prefix_len {
        return false;
    }

    let name = companion.file_name().trim().to_lowercase();
    match name.strip_prefix(&prefix) {
        Some(rest) => rest.chars().next().map_or(false, |c| !c.is_alphanumeric()),
        None => false,
    }
}

/// Hands unmatched companion files the candidate of their anchor
pub struct DerivedFilePropagator {
    min_prefix_len: usize,
}

impl DerivedFilePropagator {
    pub fn new(min_prefix_len: usize) -> Self {
        Self { min_prefix_len }
    }

    /// Returns the derived matches and the files that are still unmatched
    ///
    /// The longest anchor base name wins when several anchors qualify.
    /// Derived matches share the anchor's candidate handle.
    pub fn propagate(
        &self,
        anchors: &[Match<MediaFile, Candidate>],
        unmatched: Vec<MediaFile>,
    ) -> (Vec<Match<MediaFile, Candidate>>, Vec<MediaFile>) {
        let mut derived = Vec::new();
        let mut remaining = Vec::new();

        for file in unmatched {
            let anchor = anchors
                .iter()
                .filter(|m| is_derived(&file, &m.value, self.min_prefix_len))
                .fold(None::<&Match<MediaFile, Candidate>>, |best, m| match best {
                    Some(b) if b.value.base_name().len() >= m.value.base_name().len() => Some(b),
                    _ => Some(m),
                });

            match anchor {
                Some(anchor) => {
                    log_debug!("{} derived from {}", file, anchor.value);
                    derived.push(Match::new(file, anchor.candidate.clone()));
                }
                None => remaining.push(file),
            }
        }

        (derived, remaining)
    }
}
