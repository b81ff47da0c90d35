//! High score tracking
//!
//! Read once at run start, written through immediately whenever a run ends
//! above the stored value. Storage problems never reach the player: an
//! unreadable value counts as no prior high score.

use crate::persistence::KeyValueStore;

/// Best score seen so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighScore {
    best: u64,
}

impl HighScore {
    /// Storage key, value is a decimal integer
    pub const STORAGE_KEY: &'static str = "panda_high_score";

    pub fn new(best: u64) -> Self {
        Self { best }
    }

    pub fn get(&self) -> u64 {
        self.best
    }

    /// Load from storage; missing, malformed or unreadable values read as 0
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(raw)) => match raw.trim().parse::<u64>() {
                Ok(best) => {
                    log::info!("Loaded high score {}", best);
                    Self { best }
                }
                Err(_) => {
                    log::warn!("Malformed stored high score {:?}, starting at 0", raw);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("High score unavailable ({}), starting at 0", e);
                Self::default()
            }
        }
    }

    /// Record a finished score. Returns true if it set a new record.
    ///
    /// The in-memory value is raised even when the write fails.
    pub fn record(&mut self, score: u64, store: &mut dyn KeyValueStore) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        match store.set(Self::STORAGE_KEY, &score.to_string()) {
            Ok(()) => log::info!("New high score {} saved", score),
            Err(e) => log::warn!("Failed to save high score {}: {}", score, e),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, StoreError};

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable)
        }
    }

    #[test]
    fn test_missing_reads_zero() {
        let store = MemoryStore::new();
        assert_eq!(HighScore::load(&store).get(), 0);
    }

    #[test]
    fn test_malformed_reads_zero() {
        let mut store = MemoryStore::new();
        store.set(HighScore::STORAGE_KEY, "lots").unwrap();
        assert_eq!(HighScore::load(&store).get(), 0);
        store.set(HighScore::STORAGE_KEY, "-5").unwrap();
        assert_eq!(HighScore::load(&store).get(), 0);
    }

    #[test]
    fn test_unavailable_reads_zero() {
        assert_eq!(HighScore::load(&BrokenStore).get(), 0);
    }

    #[test]
    fn test_record_writes_through() {
        let mut store = MemoryStore::new();
        store.set(HighScore::STORAGE_KEY, "200").unwrap();
        let mut high = HighScore::load(&store);
        assert_eq!(high.get(), 200);

        assert!(high.record(500, &mut store));
        assert_eq!(store.get(HighScore::STORAGE_KEY).unwrap().as_deref(), Some("500"));
    }

    #[test]
    fn test_record_never_lowers() {
        let mut store = MemoryStore::new();
        let mut high = HighScore::new(300);
        assert!(!high.record(300, &mut store));
        assert!(!high.record(10, &mut store));
        assert_eq!(high.get(), 300);
        assert!(store.get(HighScore::STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_record_survives_write_failure() {
        let mut high = HighScore::new(1);
        assert!(high.record(7, &mut BrokenStore));
        assert_eq!(high.get(), 7);
    }
}
