//! Durable key-value storage and the session record kept in it.
//!
//! The whole session lives under [`SESSION_KEY`] as one JSON record. Three
//! standalone preference flags live under their own keys. A missing key is
//! the default state; an unreadable record is logged and treated as absent.

use crate::amount::Amount;
use crate::error::Result;
use crate::preferences::{BalanceType, PanelSide, Preferences};
use crate::profile::Profile;
use crate::session::Session;
use log::{debug, warn};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key of the session record.
pub const SESSION_KEY: &str = "balanceTrackerData";

/// `"true"` or `"false"`.
pub const AUTO_COPY_KEY: &str = "autoCopyEnabled";

/// `"left"` or `"right"`.
pub const PANEL_SIDE_KEY: &str = "profilesPosition";

/// `"First"` or `"Last"`.
pub const BALANCE_TYPE_KEY: &str = "balanceType";

/// String-keyed, string-valued durable storage. Single writer, last write wins.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Store kept in memory for the life of the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Store backed by one JSON object on disk.
///
/// Every `set` rewrites the file through a temporary sibling and a rename,
/// so a crash mid-write leaves the previous contents intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Opens the store at `path`. A missing file is an empty store; a file
    /// that is not a JSON object of strings is logged and replaced on the
    /// next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Ignoring unreadable store {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(JsonFileStore { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_owned(), value.to_owned());
        self.write()
    }
}

/// The persisted form of a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionRecord {
    pub profiles: Vec<Profile>,

    /// Anything that is not a non-negative integer reads as no active profile.
    #[serde(deserialize_with = "lenient_index")]
    pub current_profile_index: Option<usize>,
    pub dark_mode: bool,
    pub timer_input: String,
    pub last_top_up_amount: Amount,
}

fn lenient_index<'de, D>(deserializer: D) -> std::result::Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let index = value.as_u64().and_then(|i| usize::try_from(i).ok());
    if index.is_none() && !value.is_null() {
        warn!("Ignoring stored active index {}", value);
    }
    Ok(index)
}

/// Flushes the active profile and writes the session and preference flags.
pub fn save_session<S: KeyValueStore + ?Sized>(session: &mut Session, store: &mut S) -> Result<()> {
    session.flush();
    let preferences = session.preferences();
    let record = SessionRecord {
        profiles: session.profiles().to_vec(),
        current_profile_index: session.active_index(),
        dark_mode: preferences.dark_mode,
        timer_input: preferences.timer_input.clone(),
        last_top_up_amount: session.last_top_up(),
    };

    store.set(SESSION_KEY, &serde_json::to_string(&record)?)?;
    store.set(
        AUTO_COPY_KEY,
        if preferences.auto_copy_enabled {
            "true"
        } else {
            "false"
        },
    )?;
    store.set(PANEL_SIDE_KEY, preferences.panel_side.as_str())?;
    store.set(BALANCE_TYPE_KEY, preferences.balance_type.as_str())?;

    debug!(
        "Saved {} profile(s), active {:?}",
        record.profiles.len(),
        record.current_profile_index
    );
    Ok(())
}

/// Reads the session back. Absence or corruption yields an empty session.
pub fn load_session<S: KeyValueStore + ?Sized>(store: &S) -> Result<Session> {
    let record = match store.get(SESSION_KEY)? {
        Some(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
            warn!("Ignoring unreadable session record: {}", e);
            SessionRecord::default()
        }),
        None => SessionRecord::default(),
    };

    let preferences = Preferences {
        dark_mode: record.dark_mode,
        timer_input: record.timer_input,
        auto_copy_enabled: store.get(AUTO_COPY_KEY)?.as_deref() == Some("true"),
        panel_side: PanelSide::from_stored(store.get(PANEL_SIDE_KEY)?.as_deref()),
        balance_type: BalanceType::from_stored(store.get(BALANCE_TYPE_KEY)?.as_deref()),
    };

    if let Some(index) = record.current_profile_index {
        if index >= record.profiles.len() {
            warn!(
                "Stored active index {} is out of range for {} profile(s); starting without one",
                index,
                record.profiles.len()
            );
        }
    }

    Ok(Session::from_parts(
        record.profiles,
        record.current_profile_index,
        record.last_top_up_amount,
        preferences,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use tempfile::tempdir;

    fn at() -> NaiveTime {
        NaiveTime::from_hms_opt(8, 0, 0).unwrap()
    }

    #[test]
    fn test_load_from_empty_store() {
        let session = load_session(&MemoryStore::new()).unwrap();
        assert!(session.profiles().is_empty());
        assert_eq!(session.active_index(), None);
        assert_eq!(session.preferences(), &Preferences::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let mut store = MemoryStore::new();
        let mut session = Session::new();
        session.create_profile("Alice").unwrap();
        session.apply_top_up("3,000", at());
        session.create_profile("Bob").unwrap();
        session.set_fee("15");
        session.apply_debit("100", at());
        session.preferences_mut().auto_copy_enabled = true;
        session.preferences_mut().balance_type = BalanceType::Last;
        session.preferences_mut().timer_input = "5".to_string();

        save_session(&mut session, &mut store).unwrap();
        let loaded = load_session(&store).unwrap();

        assert_eq!(loaded.profiles(), session.profiles());
        assert_eq!(loaded.active_index(), Some(1));
        assert_eq!(loaded.balance(), session.balance());
        assert_eq!(loaded.fee(), session.fee());
        assert_eq!(loaded.log(), session.log());
        assert_eq!(loaded.history(), session.history());
        assert!(loaded.result().is_empty());
        assert_eq!(loaded.preferences(), session.preferences());
    }

    #[test]
    fn test_flags_stored_under_own_keys() {
        let mut store = MemoryStore::new();
        let mut session = Session::new();
        session.preferences_mut().panel_side = PanelSide::Left;

        save_session(&mut session, &mut store).unwrap();

        assert_eq!(store.get(AUTO_COPY_KEY).unwrap().as_deref(), Some("false"));
        assert_eq!(store.get(PANEL_SIDE_KEY).unwrap().as_deref(), Some("left"));
        assert_eq!(store.get(BALANCE_TYPE_KEY).unwrap().as_deref(), Some("First"));
    }

    #[test]
    fn test_out_of_range_index_loads_without_active() {
        let mut store = MemoryStore::new();
        store
            .set(
                SESSION_KEY,
                r#"{"profiles":[{"name":"Alice","balance":10}],"currentProfileIndex":3}"#,
            )
            .unwrap();

        let session = load_session(&store).unwrap();

        assert_eq!(session.profiles().len(), 1);
        assert_eq!(session.active_index(), None);
        assert!(session.balance().is_zero());
    }

    #[test]
    fn test_malformed_index_keeps_profiles() {
        for index in ["-1", "1.5", "\"0\"", "null"] {
            let mut store = MemoryStore::new();
            let record = format!(
                r#"{{"profiles":[{{"name":"Alice","balance":10}}],"currentProfileIndex":{}}}"#,
                index
            );
            store.set(SESSION_KEY, &record).unwrap();

            let session = load_session(&store).unwrap();

            assert_eq!(session.profiles().len(), 1, "index {}", index);
            assert_eq!(session.profiles()[0].balance, Amount::from(10));
            assert_eq!(session.active_index(), None, "index {}", index);
        }
    }

    #[test]
    fn test_corrupt_record_is_empty_session() {
        let mut store = MemoryStore::new();
        store.set(SESSION_KEY, "{not json").unwrap();

        let session = load_session(&store).unwrap();
        assert!(session.profiles().is_empty());
    }

    #[test]
    fn test_record_uses_external_field_names() {
        let mut store = MemoryStore::new();
        let mut session = Session::new();
        session.create_profile("Alice").unwrap();
        save_session(&mut session, &mut store).unwrap();

        let raw = store.get(SESSION_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["currentProfileIndex"], 0);
        assert_eq!(value["darkMode"], false);
        assert_eq!(value["timerInput"], "");
        assert_eq!(value["lastTopUpAmount"], "0");
        assert_eq!(value["profiles"][0]["name"], "Alice");
    }

    #[test]
    fn test_json_file_store_persists_across_opens() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_json_file_store_ignores_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "garbage").unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get(SESSION_KEY).unwrap(), None);
    }
}
