use crate::resolver::normalize;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Static mapping of human room labels to waypoint node ids, keyed by the
/// normalized label. Iteration order is the sorted label order, which keeps
/// fuzzy-match tie-breaking deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomIndex {
    rooms: BTreeMap<String, RoomEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RoomEntry {
    /// Label with its original casing, for announcements.
    label: String,
    node_id: String,
}

impl RoomIndex {
    pub fn insert(&mut self, label: impl Into<String>, node_id: impl Into<String>) {
        let label = label.into();
        self.rooms.insert(
            normalize(&label),
            RoomEntry {
                label,
                node_id: node_id.into(),
            },
        );
    }

    pub fn from_pairs<I, L, N>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (L, N)>,
        L: Into<String>,
        N: Into<String>,
    {
        let mut index = Self::default();
        for (label, node_id) in pairs {
            index.insert(label, node_id);
        }
        index
    }

    /// Node id for an already-normalized label.
    pub fn get(&self, normalized_label: &str) -> Option<(&str, &str)> {
        self.rooms
            .get(normalized_label)
            .map(|entry| (entry.label.as_str(), entry.node_id.as_str()))
    }

    /// Normalized labels in sorted order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rooms.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

/// Load a room index from a JSON object of room label -> node id.
pub fn load_room_index(path: impl AsRef<Path>) -> anyhow::Result<RoomIndex> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading room index: {}", path.display()))?;
    let pairs: BTreeMap<String, String> =
        serde_json::from_str(&raw).with_context(|| format!("parsing rooms: {}", path.display()))?;
    let index = RoomIndex::from_pairs(pairs);
    tracing::info!(path = %path.display(), rooms = index.len(), "room index loaded");
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive_and_keeps_original_label() {
        let index = RoomIndex::from_pairs([("Staircase 2", "L"), ("Washroom", "F")]);
        assert_eq!(index.get("washroom"), Some(("Washroom", "F")));
        assert_eq!(index.get("staircase 2"), Some(("Staircase 2", "L")));
        assert_eq!(index.get("Washroom"), None);
    }
}
