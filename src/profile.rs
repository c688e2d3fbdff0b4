//! Profile records and the snapshots used for undo/redo.

use crate::amount::Amount;
use crate::history::History;
use serde::{Deserialize, Serialize};

/// Style of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    /// Balance-reducing transaction.
    Debit,

    /// Balance-increasing transaction, shown in the positive style.
    TopUp,
}

/// One rendered line of a profile's transaction log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub text: String,
    pub kind: LogKind,
}

impl LogEntry {
    pub fn debit(text: impl Into<String>) -> Self {
        LogEntry {
            text: text.into(),
            kind: LogKind::Debit,
        }
    }

    pub fn top_up(text: impl Into<String>) -> Self {
        LogEntry {
            text: text.into(),
            kind: LogKind::TopUp,
        }
    }

    /// Returns `true` for lines drawn in the positive style.
    pub fn is_positive(&self) -> bool {
        self.kind == LogKind::TopUp
    }
}

/// A point-in-time capture of the working set, used as an undo or redo entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub balance: Amount,
    pub fee: Amount,
    pub transaction_amount: Amount,
    pub result: String,
    /// Most recent first.
    pub log_entries: Vec<LogEntry>,
}

/// A named, independently tracked balance.
///
/// While a profile is active its fields are stale; the session's working
/// set is authoritative until it is flushed back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub name: String,
    pub balance: Amount,
    pub fee: Amount,
    pub transaction_amount: Amount,

    /// Most recent first.
    pub log_entries: Vec<LogEntry>,

    #[serde(flatten)]
    pub history: History,

    pub last_top_up_amount: Amount,
}

impl Profile {
    /// Creates a zero-valued profile.
    pub fn new(name: impl Into<String>) -> Self {
        Profile {
            name: name.into(),
            ..Profile::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_profile_is_zeroed() {
        let profile = Profile::new("BO12 - Alice");
        assert_eq!(profile.name, "BO12 - Alice");
        assert!(profile.balance.is_zero());
        assert!(profile.fee.is_zero());
        assert!(profile.transaction_amount.is_zero());
        assert!(profile.log_entries.is_empty());
        assert!(!profile.history.can_undo());
        assert!(profile.last_top_up_amount.is_zero());
    }

    #[test]
    fn test_profile_record_shape() {
        let mut profile = Profile::new("Alice");
        profile.balance = Amount::from(2_000);
        profile.log_entries.push(LogEntry::top_up("0 + 2,000 = 2,000 [10:00:00]"));

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["name"], "Alice");
        assert_eq!(json["balance"], "2000");
        assert_eq!(json["transactionAmount"], "0");
        assert_eq!(json["logEntries"][0]["kind"], "topup");
        assert!(json["history"].is_array());
        assert!(json["redoHistory"].is_array());
        assert_eq!(json["lastTopUpAmount"], "0");
    }

    #[test]
    fn test_profile_tolerates_missing_and_numeric_fields() {
        let json = r#"{"name":"Bob","balance":1500,"fee":0}"#;
        let profile: Profile = serde_json::from_str(json).unwrap();

        assert_eq!(profile.name, "Bob");
        assert_eq!(profile.balance, Amount::from(1500));
        assert!(profile.log_entries.is_empty());
        assert!(!profile.history.can_undo());
    }
}
