use crate::numbers::{digit_in_phrase, word_to_digit};
use crate::RoomIndex;
use serde::{Deserialize, Serialize};

/// Tuning for approximate label matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Minimum similarity ratio a fuzzy candidate must clear.
    pub cutoff: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { cutoff: 0.6 }
    }
}

/// A successfully resolved destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoom {
    /// Matched room label, original casing.
    pub label: String,
    pub node_id: String,
}

pub struct Resolver {
    index: RoomIndex,
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(index: RoomIndex, config: ResolverConfig) -> Self {
        Self { index, config }
    }

    pub fn index(&self) -> &RoomIndex {
        &self.index
    }

    /// Map a free-form phrase to a room.
    ///
    /// Normalizes, tries the digit form of a whole spelled-out number, then
    /// an exact label hit on the phrase itself, then fuzzy matching over
    /// all labels, and finally retries with a spelled-out number embedded
    /// in the phrase. `None` means nothing cleared the cutoff; the caller
    /// re-prompts.
    pub fn resolve(&self, phrase: &str) -> Option<ResolvedRoom> {
        let normalized = normalize(phrase);
        if normalized.is_empty() {
            return None;
        }

        if let Some(digits) = word_to_digit(&normalized) {
            if let Some((label, node_id)) = self.index.get(digits) {
                return Some(resolved(label, node_id));
            }
        }

        if let Some((label, node_id)) = self.index.get(&normalized) {
            return Some(resolved(label, node_id));
        }

        if let Some(found) = self.closest_label(&normalized) {
            return Some(found);
        }

        if let Some(digits) = digit_in_phrase(&normalized) {
            if let Some((label, node_id)) = self.index.get(digits) {
                return Some(resolved(label, node_id));
            }
        }

        tracing::debug!(phrase, "no room cleared the match cutoff");
        None
    }

    /// Best label by similarity ratio, above the cutoff. Labels iterate in
    /// sorted order and only a strictly better ratio replaces the current
    /// best, so equal-ratio ties resolve to the smaller label.
    fn closest_label(&self, phrase: &str) -> Option<ResolvedRoom> {
        let mut best: Option<(f64, &str)> = None;
        for label in self.index.labels() {
            let score = similarity(phrase, label);
            if score < self.config.cutoff {
                continue;
            }
            if best.map_or(true, |(top, _)| score > top) {
                best = Some((score, label));
            }
        }
        let (score, label) = best?;
        let (label, node_id) = self.index.get(label)?;
        tracing::debug!(phrase, label, score, "fuzzy room match");
        Some(resolved(label, node_id))
    }
}

fn resolved(label: &str, node_id: &str) -> ResolvedRoom {
    ResolvedRoom {
        label: label.to_string(),
        node_id: node_id.to_string(),
    }
}

/// Canonical phrase form: trimmed and lowercased.
pub fn normalize(phrase: &str) -> String {
    phrase.trim().to_lowercase()
}

/// Similarity ratio in [0, 1]: twice the longest common subsequence over
/// the combined length. 1.0 for identical strings, 0.0 for disjoint ones.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    // Single-row LCS table.
    let mut row = vec![0usize; b.len() + 1];
    for ca in &a {
        let mut diagonal = 0;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }
    let lcs = row[b.len()];
    2.0 * lcs as f64 / (a.len() + b.len()) as f64
}
