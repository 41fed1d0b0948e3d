use thiserror::Error;

use crate::model::Snapshot;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScoreError {
    #[error("unknown identifier: {0}")]
    UnknownIdentifier(String),
}

//
// ─── TABLES ────────────────────────────────────────────────────────────────────
//

/// Graded problems: each completion is worth the fixed point value.
pub const GRADE_ENTRIES: [(&str, u32); 10] = [
    ("8Q", 100),
    ("7Q", 200),
    ("6Q", 300),
    ("5Q", 400),
    ("4Q", 500),
    ("3Q", 650),
    ("2Q", 1050),
    ("1Q", 1400),
    ("1D", 2500),
    ("2D", 4000),
];

/// Board challenges: on/off, contributing the fixed point value while on.
pub const BOARD_ENTRIES: [(&str, u32); 8] = [
    ("8Q(91)", 100),
    ("7Q(92)", 200),
    ("6Q(93)", 300),
    ("5Q(94)", 400),
    ("4Q(95)", 500),
    ("3Q(96)", 650),
    ("3Q(97)", 650),
    ("2Q(98)", 1050),
];

/// One band of the rank ladder. `max` of `None` means unbounded above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankBand {
    pub label: &'static str,
    pub min: u64,
    pub max: Option<u64>,
}

/// Ordered rank ladder covering every non-negative total exactly once.
pub const RANK_BANDS: [RankBand; 6] = [
    RankBand {
        label: "ノービス",
        min: 0,
        max: Some(2_999),
    },
    RankBand {
        label: "D",
        min: 3_000,
        max: Some(8_999),
    },
    RankBand {
        label: "C",
        min: 9_000,
        max: Some(10_999),
    },
    RankBand {
        label: "B",
        min: 11_000,
        max: Some(12_999),
    },
    RankBand {
        label: "A",
        min: 13_000,
        max: Some(14_999),
    },
    RankBand {
        label: "S",
        min: 15_000,
        max: None,
    },
];

/// Fallback label when no band matches. The ladder is gapless, so this only
/// surfaces under misconfiguration.
pub const UNRANKED_LABEL: &str = "ランク外";

//
// ─── LOOKUPS ───────────────────────────────────────────────────────────────────
//

/// Iterate the graded identifiers in table order.
pub fn grade_keys() -> impl Iterator<Item = &'static str> {
    GRADE_ENTRIES.iter().map(|(key, _)| *key)
}

/// Iterate the board identifiers in table order.
pub fn board_keys() -> impl Iterator<Item = &'static str> {
    BOARD_ENTRIES.iter().map(|(key, _)| *key)
}

/// Point value for a graded or board identifier.
///
/// # Errors
///
/// Returns `ScoreError::UnknownIdentifier` if the key is in neither table.
pub fn points_for(key: &str) -> Result<u32, ScoreError> {
    GRADE_ENTRIES
        .iter()
        .chain(BOARD_ENTRIES.iter())
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, points)| *points)
        .ok_or_else(|| ScoreError::UnknownIdentifier(key.to_string()))
}

/// Total score for a snapshot: completion counts times grade points, plus the
/// points of every board that is switched on.
///
/// Only identifiers present in the tables contribute. Foreign keys carried in
/// by a restored snapshot are ignored.
#[must_use]
pub fn total_score(snapshot: &Snapshot) -> u64 {
    let grade_total: u64 = GRADE_ENTRIES
        .iter()
        .map(|(key, points)| {
            let count = snapshot.counts.get(*key).copied().unwrap_or(0);
            u64::from(count) * u64::from(*points)
        })
        .sum();

    let board_total: u64 = BOARD_ENTRIES
        .iter()
        .filter(|(key, _)| snapshot.boards.get(*key).copied().unwrap_or(false))
        .map(|(_, points)| u64::from(*points))
        .sum();

    grade_total + board_total
}

/// Rank label for a total: the first band whose range contains it, or the
/// unranked sentinel if none does.
#[must_use]
pub fn rank_for(total: u64) -> &'static str {
    RANK_BANDS
        .iter()
        .find(|band| total >= band.min && band.max.is_none_or(|max| total <= max))
        .map_or(UNRANKED_LABEL, |band| band.label)
}

/// Thousands-grouped decimal rendering, matching the ja-JP grouping of the
/// point displays (`10350` → `"10,350"`).
#[must_use]
pub fn format_points(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Snapshot;

    #[test]
    fn points_for_finds_both_tables() {
        assert_eq!(points_for("6Q").unwrap(), 300);
        assert_eq!(points_for("2Q(98)").unwrap(), 1050);
    }

    #[test]
    fn points_for_rejects_unknown_key() {
        assert_eq!(
            points_for("9Q"),
            Err(ScoreError::UnknownIdentifier("9Q".to_string()))
        );
    }

    #[test]
    fn empty_snapshot_scores_zero_and_novice() {
        let snapshot = Snapshot::initial();
        assert_eq!(total_score(&snapshot), 0);
        assert_eq!(rank_for(0), "ノービス");
    }

    #[test]
    fn partial_progress_stays_in_novice_band() {
        let mut snapshot = Snapshot::initial();
        snapshot.counts.insert("6Q".to_string(), 2);
        snapshot.boards.insert("8Q(91)".to_string(), true);

        let total = total_score(&snapshot);
        assert_eq!(total, 700);
        assert_eq!(rank_for(total), "ノービス");
    }

    #[test]
    fn dan_grades_and_full_board_reach_rank_c() {
        let mut snapshot = Snapshot::initial();
        snapshot.counts.insert("1D".to_string(), 1);
        snapshot.counts.insert("2D".to_string(), 1);
        for (key, _) in BOARD_ENTRIES {
            snapshot.boards.insert(key.to_string(), true);
        }

        let total = total_score(&snapshot);
        assert_eq!(total, 10_350);
        assert_eq!(rank_for(total), "C");
    }

    #[test]
    fn foreign_keys_never_score() {
        let mut snapshot = Snapshot::initial();
        snapshot.counts.insert("99X".to_string(), 50);
        snapshot.boards.insert("mystery".to_string(), true);

        assert_eq!(total_score(&snapshot), 0);
    }

    #[test]
    fn rank_band_edges() {
        assert_eq!(rank_for(2_999), "ノービス");
        assert_eq!(rank_for(3_000), "D");
        assert_eq!(rank_for(8_999), "D");
        assert_eq!(rank_for(9_000), "C");
        assert_eq!(rank_for(10_999), "C");
        assert_eq!(rank_for(11_000), "B");
        assert_eq!(rank_for(15_000), "S");
        assert_eq!(rank_for(u64::MAX), "S");
    }

    #[test]
    fn rank_ladder_is_gapless() {
        let mut expected_min = 0;
        for band in &RANK_BANDS {
            assert_eq!(band.min, expected_min, "gap before {}", band.label);
            match band.max {
                Some(max) => {
                    assert!(max >= band.min);
                    expected_min = max + 1;
                }
                None => return,
            }
        }
        panic!("ladder must end with an unbounded band");
    }

    #[test]
    fn format_points_groups_thousands() {
        assert_eq!(format_points(0), "0");
        assert_eq!(format_points(999), "999");
        assert_eq!(format_points(1_000), "1,000");
        assert_eq!(format_points(10_350), "10,350");
        assert_eq!(format_points(1_234_567), "1,234,567");
    }
}
