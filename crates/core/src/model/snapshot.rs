use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::score::{board_keys, grade_keys};

/// The complete progress state at one instant: completion counts per graded
/// problem, on/off flags per board challenge, and the time the snapshot was
/// last written to durable storage (absent for purely in-memory snapshots).
///
/// Snapshots are replaced wholesale by the reducer; nothing mutates one in
/// place. This is also the persisted wire shape (`savedAt` as integer
/// milliseconds since epoch).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub counts: BTreeMap<String, u32>,
    pub boards: BTreeMap<String, bool>,
    #[serde(
        rename = "savedAt",
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// The canonical starting state: every graded count at zero, every board
    /// off, no save timestamp. Also the target of a reset.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            counts: grade_keys().map(|key| (key.to_string(), 0)).collect(),
            boards: board_keys().map(|key| (key.to_string(), false)).collect(),
            saved_at: None,
        }
    }

    /// Completion count for a graded identifier (zero if absent).
    #[must_use]
    pub fn count(&self, key: &str) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// On/off flag for a board identifier (off if absent).
    #[must_use]
    pub fn board_on(&self, key: &str) -> bool {
        self.boards.get(key).copied().unwrap_or(false)
    }

    /// True when every board flag is on. An empty board map counts as not
    /// all-on, which makes toggle-all turn everything on.
    #[must_use]
    pub fn all_boards_on(&self) -> bool {
        !self.boards.is_empty() && self.boards.values().all(|on| *on)
    }

    /// Copy of this snapshot stamped with the given save time.
    #[must_use]
    pub fn stamped(&self, saved_at: DateTime<Utc>) -> Self {
        Self {
            saved_at: Some(saved_at),
            ..self.clone()
        }
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{BOARD_ENTRIES, GRADE_ENTRIES};
    use crate::time::fixed_now;

    #[test]
    fn initial_covers_exactly_the_known_identifiers() {
        let snapshot = Snapshot::initial();
        assert_eq!(snapshot.counts.len(), GRADE_ENTRIES.len());
        assert_eq!(snapshot.boards.len(), BOARD_ENTRIES.len());
        assert!(snapshot.counts.values().all(|count| *count == 0));
        assert!(snapshot.boards.values().all(|on| !on));
        assert!(snapshot.saved_at.is_none());
    }

    #[test]
    fn all_boards_on_requires_unanimity() {
        let mut snapshot = Snapshot::initial();
        assert!(!snapshot.all_boards_on());

        for flag in snapshot.boards.values_mut() {
            *flag = true;
        }
        assert!(snapshot.all_boards_on());

        snapshot.boards.insert("8Q(91)".to_string(), false);
        assert!(!snapshot.all_boards_on());
    }

    #[test]
    fn serializes_saved_at_as_epoch_milliseconds() {
        let snapshot = Snapshot::initial().stamped(fixed_now());
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(
            json["savedAt"].as_i64(),
            Some(fixed_now().timestamp_millis())
        );
    }

    #[test]
    fn omits_saved_at_when_unset() {
        let json = serde_json::to_value(Snapshot::initial()).unwrap();
        assert!(json.get("savedAt").is_none());
    }

    #[test]
    fn deserializes_wire_payload() {
        let raw = r#"{"counts":{"8Q":3},"boards":{"2Q(98)":true},"savedAt":1700000000000}"#;
        let snapshot: Snapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(snapshot.count("8Q"), 3);
        assert!(snapshot.board_on("2Q(98)"));
        assert_eq!(snapshot.saved_at, Some(fixed_now()));
    }
}
