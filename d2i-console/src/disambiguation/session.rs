//! Disambiguation session: the candidate snapshot plus the current pick

use crate::client::{ReleaseCandidate, ReleasesPayload};
use thiserror::Error;

pub const DEFAULT_MODAL_MESSAGE: &str =
    "Mehrere Alben gefunden. Bitte wählen Sie das richtige Album aus:";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("release index {index} out of range ({len} candidates)")]
pub struct IndexOutOfRange {
    pub index: usize,
    pub len: usize,
}

/// Candidates of one pending choice, identified only by position
///
/// `selected_index` always points into `candidates` while the list is
/// non-empty; an out-of-range server suggestion is clamped to 0.
#[derive(Debug, Clone, PartialEq)]
pub struct DisambiguationSession {
    candidates: Vec<ReleaseCandidate>,
    selected_index: usize,
    message: String,
}

impl DisambiguationSession {
    pub fn from_payload(payload: ReleasesPayload) -> Self {
        let suggested = payload.selected_index.unwrap_or(0);
        let selected_index = if suggested < payload.releases.len() {
            suggested
        } else {
            0
        };
        let message = payload
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODAL_MESSAGE.to_string());

        Self {
            candidates: payload.releases,
            selected_index,
            message,
        }
    }

    pub fn candidates(&self) -> &[ReleaseCandidate] {
        &self.candidates
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn selected(&self) -> Option<&ReleaseCandidate> {
        self.candidates.get(self.selected_index)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Move the pick to `index`; out-of-range leaves the session untouched
    pub fn select(&mut self, index: usize) -> Result<(), IndexOutOfRange> {
        if index >= self.candidates.len() {
            return Err(IndexOutOfRange {
                index,
                len: self.candidates.len(),
            });
        }
        self.selected_index = index;
        Ok(())
    }
}
