//! Unlockable character skins
//!
//! The catalog is static configuration. Cosmetic fields are only read by the
//! renderer; the simulation cares about unlock thresholds, start bonuses and
//! special abilities.

use crate::sim::AbilityKind;

/// Id of the skin every player starts with
pub const DEFAULT_SKIN_ID: &str = "default";

/// Special ability granted by a skin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbilitySpec {
    pub kind: AbilityKind,
    /// Minimum time between activations
    pub cooldown_ms: f32,
    /// How long the ability stays active (`None` = instantaneous)
    pub duration_ms: Option<f32>,
}

/// A character skin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Skin {
    pub id: &'static str,
    pub name: &'static str,
    pub main_color: &'static str,
    pub secondary_color: &'static str,
    pub eye_color: Option<&'static str>,
    /// Lifetime total score required to unlock
    pub unlock_score: u64,
    /// Score a session starts with when playing this skin
    pub start_bonus: u64,
    pub ability: Option<AbilitySpec>,
}

/// Every skin, ordered by unlock score
pub static SKINS: [Skin; 8] = [
    Skin {
        id: DEFAULT_SKIN_ID,
        name: "Fire Spirit",
        main_color: "#FF5722",
        secondary_color: "#D84315",
        eye_color: None,
        unlock_score: 0,
        start_bonus: 0,
        ability: None,
    },
    Skin {
        id: "blue",
        name: "Ocean Guardian",
        main_color: "#2196F3",
        secondary_color: "#1565C0",
        eye_color: Some("#E1F5FE"),
        unlock_score: 200,
        start_bonus: 0,
        ability: Some(AbilitySpec {
            kind: AbilityKind::SizeChange,
            cooldown_ms: 12_000.0,
            duration_ms: Some(4_000.0),
        }),
    },
    Skin {
        id: "ninja",
        name: "Shadow Ninja",
        main_color: "#212121",
        secondary_color: "#000000",
        eye_color: Some("#F44336"),
        unlock_score: 500,
        start_bonus: 0,
        ability: Some(AbilitySpec {
            kind: AbilityKind::Dash,
            cooldown_ms: 5_000.0,
            duration_ms: Some(500.0),
        }),
    },
    Skin {
        id: "robot",
        name: "Kron-X 5000",
        main_color: "#607D8B",
        secondary_color: "#455A64",
        eye_color: Some("#4CAF50"),
        unlock_score: 1000,
        start_bonus: 0,
        ability: Some(AbilitySpec {
            kind: AbilityKind::Shield,
            cooldown_ms: 15_000.0,
            duration_ms: Some(3_000.0),
        }),
    },
    Skin {
        id: "golden",
        name: "Golden Legend",
        main_color: "#FFC107",
        secondary_color: "#FFA000",
        eye_color: Some("#FFECB3"),
        unlock_score: 2000,
        start_bonus: 0,
        ability: Some(AbilitySpec {
            kind: AbilityKind::Magnet,
            cooldown_ms: 12_000.0,
            duration_ms: Some(5_000.0),
        }),
    },
    Skin {
        id: "cosmic",
        name: "Lord of the Stars",
        main_color: "#673AB7",
        secondary_color: "#4527A0",
        eye_color: Some("#CE93D8"),
        unlock_score: 3000,
        start_bonus: 0,
        ability: Some(AbilitySpec {
            kind: AbilityKind::TimeWarp,
            cooldown_ms: 20_000.0,
            duration_ms: Some(4_000.0),
        }),
    },
    Skin {
        id: "phoenix",
        name: "Flame Wing Phoenix",
        main_color: "#FF7043",
        secondary_color: "#BF360C",
        eye_color: Some("#FFCCBC"),
        unlock_score: 5000,
        start_bonus: 0,
        ability: Some(AbilitySpec {
            kind: AbilityKind::TripleJump,
            cooldown_ms: 10_000.0,
            duration_ms: Some(6_000.0),
        }),
    },
    Skin {
        id: "legendary",
        name: "Chronos the Ancient",
        main_color: "#9C27B0",
        secondary_color: "#6A1B9A",
        eye_color: Some("#F3E5F5"),
        unlock_score: 10_000,
        start_bonus: 100,
        ability: Some(AbilitySpec {
            kind: AbilityKind::Teleport,
            cooldown_ms: 8_000.0,
            duration_ms: None,
        }),
    },
];

/// The skin every player owns
pub fn default_skin() -> &'static Skin {
    &SKINS[0]
}

/// Exact lookup
pub fn find_skin(id: &str) -> Option<&'static Skin> {
    SKINS.iter().find(|skin| skin.id == id)
}

/// Lookup that falls back to the default skin for unknown ids
pub fn skin_by_id(id: &str) -> &'static Skin {
    find_skin(id).unwrap_or_else(default_skin)
}

/// All skins unlocked by a lifetime total score
pub fn unlocked_by(total_score: u64) -> impl Iterator<Item = &'static Skin> {
    SKINS
        .iter()
        .filter(move |skin| total_score >= skin.unlock_score)
}

/// The next skin still locked at this total score, if any
pub fn next_unlock(total_score: u64) -> Option<&'static Skin> {
    SKINS.iter().find(|skin| skin.unlock_score > total_score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_sorted_and_unique() {
        for pair in SKINS.windows(2) {
            assert!(pair[0].unlock_score < pair[1].unlock_score);
        }
        let mut ids: Vec<_> = SKINS.iter().map(|s| s.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), SKINS.len());
        assert_eq!(default_skin().unlock_score, 0);
    }

    #[test]
    fn test_unknown_id_falls_back_to_default() {
        assert_eq!(skin_by_id("nope").id, DEFAULT_SKIN_ID);
        assert!(find_skin("nope").is_none());
        assert_eq!(skin_by_id("ninja").id, "ninja");
    }

    #[test]
    fn test_unlocked_by_threshold() {
        let ids = |score| unlocked_by(score).map(|s| s.id).collect::<Vec<_>>();
        assert_eq!(ids(0), vec!["default"]);
        assert_eq!(ids(199), vec!["default"]);
        assert_eq!(ids(200), vec!["default", "blue"]);
        assert_eq!(ids(10_000).len(), SKINS.len());
    }

    #[test]
    fn test_next_unlock() {
        assert_eq!(next_unlock(0).map(|s| s.id), Some("blue"));
        assert_eq!(next_unlock(650).map(|s| s.id), Some("robot"));
        assert!(next_unlock(10_000).is_none());
    }

    #[test]
    fn test_only_legendary_has_start_bonus() {
        let bonus: Vec<_> = SKINS.iter().filter(|s| s.start_bonus > 0).collect();
        assert_eq!(bonus.len(), 1);
        assert_eq!(bonus[0].id, "legendary");
        assert_eq!(bonus[0].start_bonus, 100);
    }
}
