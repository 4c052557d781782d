use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub const KEY_SOUND: &str = "sound";
pub const KEY_TANKS_COMFORT: &str = "tanks_comfort";
pub const KEY_TANKS_BEST: &str = "tanks_best";
pub const KEY_TETRIS_BEST: &str = "tetris_best";

/// String-keyed preference store backed by a JSON file next to the
/// executable. All I/O is best-effort: a missing or corrupt file yields
/// defaults, and write failures are logged and ignored so the games stay
/// playable without persistence.
pub struct Prefs {
    values: BTreeMap<String, Value>,
    path: Option<PathBuf>,
}

impl Prefs {
    pub fn load() -> Self {
        let mut prefs = Prefs {
            values: BTreeMap::new(),
            path: Some(Self::prefs_path()),
        };
        prefs.read_file();
        prefs
    }

    /// Store with no backing file; used by tests.
    pub fn in_memory() -> Self {
        Prefs {
            values: BTreeMap::new(),
            path: None,
        }
    }

    fn prefs_path() -> PathBuf {
        // Store next to the executable.
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                return dir.join("minicade.prefs.json");
            }
        }
        PathBuf::from("minicade.prefs.json")
    }

    fn read_file(&mut self) {
        let Some(path) = &self.path else { return };
        let Ok(data) = fs::read_to_string(path) else {
            return;
        };
        match serde_json::from_str::<BTreeMap<String, Value>>(&data) {
            Ok(values) => self.values = values,
            Err(err) => log::warn!("ignoring unreadable preference file: {err}"),
        }
    }

    fn write_file(&self) {
        let Some(path) = &self.path else { return };
        let Ok(data) = serde_json::to_string_pretty(&self.values) else {
            return;
        };
        if let Err(err) = fs::write(path, data) {
            log::warn!("could not persist preferences: {err}");
        }
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.values.get(key)?;
        serde_json::from_value(value.clone()).ok()
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) {
        let Ok(value) = serde_json::to_value(value) else {
            return;
        };
        self.values.insert(key.to_string(), value);
        self.write_file();
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key).unwrap_or(default)
    }

    pub fn get_u32(&self, key: &str, default: u32) -> u32 {
        self.get(key).unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let prefs = Prefs::in_memory();
        assert!(prefs.get_bool(KEY_SOUND, true));
        assert!(!prefs.get_bool(KEY_TANKS_COMFORT, false));
        assert_eq!(prefs.get_u32(KEY_TETRIS_BEST, 0), 0);
        assert_eq!(prefs.get::<u64>("anything"), None);
    }

    #[test]
    fn typed_values_round_trip() {
        let mut prefs = Prefs::in_memory();
        prefs.set(KEY_SOUND, &false);
        prefs.set(KEY_TANKS_BEST, &1200u32);
        prefs.set("snake_best_brisk", &80u32);

        assert!(!prefs.get_bool(KEY_SOUND, true));
        assert_eq!(prefs.get_u32(KEY_TANKS_BEST, 0), 1200);
        assert_eq!(prefs.get_u32("snake_best_brisk", 0), 80);
    }

    #[test]
    fn mismatched_types_yield_defaults() {
        let mut prefs = Prefs::in_memory();
        prefs.set(KEY_TETRIS_BEST, &"not a number");
        assert_eq!(prefs.get_u32(KEY_TETRIS_BEST, 7), 7);
    }
}
