//! Player profile: everything that survives between sessions
//!
//! Persisted to LocalStorage as a versioned JSON envelope. The legacy
//! standalone `highScore` key is still read and written so older saves keep
//! their best score.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::persistence::{self, Storage};
use crate::skins::{self, DEFAULT_SKIN_ID, Skin};

/// Current save format version
pub const PROFILE_VERSION: u32 = 0;

/// High score, lifetime score and skin ownership
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    high_score: u64,
    total_score: u64,
    unlocked_skins: BTreeSet<String>,
    #[serde(rename = "currentSkinId")]
    current_skin: String,
    /// Unsaved changes since the last load/save
    #[serde(skip)]
    dirty: bool,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            high_score: 0,
            total_score: 0,
            unlocked_skins: BTreeSet::from([DEFAULT_SKIN_ID.to_string()]),
            current_skin: DEFAULT_SKIN_ID.to_string(),
            dirty: false,
        }
    }
}

/// On-disk envelope
#[derive(Deserialize)]
struct SavedProfile {
    state: Profile,
    #[serde(default)]
    #[allow(dead_code)]
    version: u32,
}

#[derive(Serialize)]
struct SavedProfileRef<'a> {
    state: &'a Profile,
    version: u32,
}

impl Profile {
    /// LocalStorage key of the profile envelope
    pub const STORAGE_KEY: &'static str = "obstacle-jumping-game";
    /// Older builds stored the best score on its own
    pub const LEGACY_HIGH_SCORE_KEY: &'static str = "highScore";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn total_score(&self) -> u64 {
        self.total_score
    }

    pub fn current_skin_id(&self) -> &str {
        &self.current_skin
    }

    /// Catalog entry of the selected skin
    pub fn current_skin(&self) -> &'static Skin {
        skins::skin_by_id(&self.current_skin)
    }

    pub fn unlocked_skins(&self) -> impl Iterator<Item = &str> {
        self.unlocked_skins.iter().map(String::as_str)
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked_skins.contains(id)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Select a skin. Returns false (and changes nothing) if it is locked.
    pub fn set_skin(&mut self, id: &str) -> bool {
        if !self.is_unlocked(id) {
            return false;
        }
        if self.current_skin != id {
            self.current_skin = id.to_string();
            self.dirty = true;
        }
        true
    }

    /// Add points to the lifetime total and return newly unlocked skins
    pub fn add_points(&mut self, points: u64) -> Vec<&'static Skin> {
        if points == 0 {
            return Vec::new();
        }
        self.total_score = self.total_score.saturating_add(points);
        self.dirty = true;
        self.refresh_unlocks()
    }

    /// Unlock every skin the total score qualifies for. Idempotent; never
    /// removes a skin.
    pub fn refresh_unlocks(&mut self) -> Vec<&'static Skin> {
        let mut newly_unlocked = Vec::new();
        for skin in skins::unlocked_by(self.total_score) {
            if self.unlocked_skins.insert(skin.id.to_string()) {
                newly_unlocked.push(skin);
            }
        }
        if !newly_unlocked.is_empty() {
            self.dirty = true;
        }
        newly_unlocked
    }

    /// Commit a finished session's score. Returns true on a new high score.
    pub fn record_score(&mut self, score: u64) -> bool {
        if score > self.high_score {
            self.high_score = score;
            self.dirty = true;
            true
        } else {
            false
        }
    }

    /// Repair whatever a stale or hand-edited save got wrong
    fn sanitize(&mut self) {
        self.unlocked_skins
            .retain(|id| skins::find_skin(id).is_some());
        self.unlocked_skins.insert(DEFAULT_SKIN_ID.to_string());
        self.refresh_unlocks();
        if !self.unlocked_skins.contains(&self.current_skin) {
            log::warn!(
                "Saved skin '{}' is not unlocked, reverting to default",
                self.current_skin
            );
            self.current_skin = DEFAULT_SKIN_ID.to_string();
        }
    }

    /// Load the profile. Missing or corrupted data yields a fresh profile.
    pub fn load(storage: &impl Storage) -> Self {
        let mut profile = match persistence::load_json::<SavedProfile>(storage, Self::STORAGE_KEY) {
            Ok(Some(saved)) => {
                log::info!(
                    "Loaded profile (high score {}, {} skins)",
                    saved.state.high_score,
                    saved.state.unlocked_skins.len()
                );
                saved.state
            }
            Ok(None) => {
                log::info!("No profile found, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("Profile unreadable ({}), starting fresh", e);
                Self::default()
            }
        };

        match persistence::load_json::<u64>(storage, Self::LEGACY_HIGH_SCORE_KEY) {
            Ok(Some(legacy)) if legacy > profile.high_score => profile.high_score = legacy,
            Ok(_) => {}
            Err(e) => log::warn!("Ignoring legacy high score ({})", e),
        }

        profile.sanitize();
        profile.dirty = false;
        profile
    }

    /// Write the profile and clear the dirty flag
    pub fn save(&mut self, storage: &mut impl Storage) -> Result<()> {
        let envelope = SavedProfileRef {
            state: self,
            version: PROFILE_VERSION,
        };
        persistence::save_json(storage, Self::STORAGE_KEY, &envelope)?;
        storage.set_item(Self::LEGACY_HIGH_SCORE_KEY, &self.high_score.to_string())?;
        self.dirty = false;
        log::info!("Profile saved (total score {})", self.total_score);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_fresh_profile() {
        let profile = Profile::new();
        assert_eq!(profile.high_score(), 0);
        assert_eq!(profile.total_score(), 0);
        assert_eq!(profile.unlocked_skins().collect::<Vec<_>>(), vec!["default"]);
        assert_eq!(profile.current_skin_id(), "default");
        assert!(!profile.is_dirty());
    }

    #[test]
    fn test_set_skin_requires_unlock() {
        let mut profile = Profile::new();
        assert!(!profile.set_skin("blue"));
        assert_eq!(profile.current_skin_id(), "default");

        let unlocked = profile.add_points(200);
        assert_eq!(unlocked.len(), 1);
        assert_eq!(unlocked[0].id, "blue");
        assert!(profile.set_skin("blue"));
        assert_eq!(profile.current_skin_id(), "blue");
        assert_eq!(profile.current_skin().id, "blue");
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let mut profile = Profile::new();
        profile.add_points(600);
        assert!(profile.refresh_unlocks().is_empty());
        assert!(profile.is_unlocked("ninja"));
    }

    #[test]
    fn test_record_score_keeps_max() {
        let mut profile = Profile::new();
        assert!(profile.record_score(50));
        assert!(!profile.record_score(30));
        assert!(!profile.record_score(50));
        assert_eq!(profile.high_score(), 50);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let mut storage = MemoryStorage::new();
        let mut profile = Profile::new();
        profile.add_points(1200);
        profile.record_score(340);
        assert!(profile.set_skin("robot"));
        assert!(profile.is_dirty());

        profile.save(&mut storage).unwrap();
        assert!(!profile.is_dirty());

        let loaded = Profile::load(&storage);
        assert_eq!(loaded, profile);
        assert_eq!(
            storage
                .get_item(Profile::LEGACY_HIGH_SCORE_KEY)
                .unwrap()
                .as_deref(),
            Some("340")
        );
    }

    #[test]
    fn test_reads_web_save_format() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(
                Profile::STORAGE_KEY,
                r#"{"state":{"highScore":90,"unlockedSkins":["default","blue"],"currentSkinId":"blue","totalScore":250},"version":0}"#,
            )
            .unwrap();
        storage.set_item(Profile::LEGACY_HIGH_SCORE_KEY, "120").unwrap();

        let profile = Profile::load(&storage);
        assert_eq!(profile.high_score(), 120);
        assert_eq!(profile.total_score(), 250);
        assert_eq!(profile.current_skin_id(), "blue");
    }

    #[test]
    fn test_corrupted_save_falls_back_to_defaults() {
        let mut storage = MemoryStorage::new();
        storage.set_item(Profile::STORAGE_KEY, "{\"state\":").unwrap();
        storage.set_item(Profile::LEGACY_HIGH_SCORE_KEY, "garbage").unwrap();
        assert_eq!(Profile::load(&storage), Profile::default());
    }

    #[test]
    fn test_sanitize_repairs_inconsistent_save() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(
                Profile::STORAGE_KEY,
                r#"{"state":{"unlockedSkins":["ghost"],"currentSkinId":"golden","totalScore":600}}"#,
            )
            .unwrap();

        let profile = Profile::load(&storage);
        let unlocked: Vec<_> = profile.unlocked_skins().collect();
        assert_eq!(unlocked, vec!["blue", "default", "ninja"]);
        assert_eq!(profile.current_skin_id(), "default");
        assert!(!profile.is_dirty());
    }
}
