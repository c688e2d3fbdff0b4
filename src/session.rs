//! The multi-profile session and its state transitions.
//!
//! Exactly one profile is active at a time. Its live values sit in the
//! session's working set and are copied back ("flushed") into the profile
//! record whenever another component needs to read it.
//!
//! Nothing in this module performs I/O. Clipboard access and persistence are
//! layered on top by [`crate::tracker::Tracker`].

use crate::amount::Amount;
use crate::error::{Result, TrackerError};
use crate::history::History;
use crate::preferences::Preferences;
use crate::profile::{LogEntry, Profile, Snapshot};
use chrono::NaiveTime;
use log::debug;

/// Format of the time suffix on log lines.
pub const LOG_TIME_FORMAT: &str = "%H:%M:%S";

/// The live values of whichever profile is active.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkingSet {
    pub balance: Amount,
    pub fee: Amount,
    pub transaction_amount: Amount,
    pub result: String,

    /// Most recent first.
    pub log: Vec<LogEntry>,

    pub history: History,
    pub last_top_up: Amount,
}

impl WorkingSet {
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            balance: self.balance,
            fee: self.fee,
            transaction_amount: self.transaction_amount,
            result: self.result.clone(),
            log_entries: self.log.clone(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.balance = snapshot.balance;
        self.fee = snapshot.fee;
        self.transaction_amount = snapshot.transaction_amount;
        self.result = snapshot.result;
        self.log = snapshot.log_entries;
    }

    fn load(profile: &Profile) -> Self {
        WorkingSet {
            balance: profile.balance,
            fee: profile.fee,
            transaction_amount: profile.transaction_amount,
            result: String::new(),
            log: profile.log_entries.clone(),
            history: profile.history.clone(),
            last_top_up: profile.last_top_up_amount,
        }
    }

    fn store_into(&self, profile: &mut Profile) {
        profile.balance = self.balance;
        profile.fee = self.fee;
        profile.transaction_amount = self.transaction_amount;
        profile.log_entries = self.log.clone();
        profile.history = self.history.clone();
        profile.last_top_up_amount = self.last_top_up;
    }
}

/// Everything `clear` removes, kept until the matching `restore`.
#[derive(Debug, Clone, PartialEq)]
struct ClearedBackup {
    working: WorkingSet,
    profiles: Vec<Profile>,
    active_index: Option<usize>,
}

/// Whether the clear/restore toggle is holding a backup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearState {
    Normal,
    Cleared,
}

/// Outcome of a debit: the new balance and the text published to the clipboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DebitOutcome {
    pub balance: Amount,
    pub published: String,
}

/// The single live session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    profiles: Vec<Profile>,
    active_index: Option<usize>,
    working: WorkingSet,
    preferences: Preferences,
    cleared_backup: Option<Box<ClearedBackup>>,
}

impl Session {
    /// Creates an empty session with no profiles.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a session from persisted parts.
    ///
    /// An `active_index` that does not address a stored profile is dropped
    /// and the session starts with no active profile.
    pub fn from_parts(
        profiles: Vec<Profile>,
        active_index: Option<usize>,
        last_top_up: Amount,
        preferences: Preferences,
    ) -> Self {
        let active_index = active_index.filter(|&i| i < profiles.len());
        let mut working = active_index
            .map(|i| WorkingSet::load(&profiles[i]))
            .unwrap_or_default();
        working.last_top_up = last_top_up;

        Session {
            profiles,
            active_index,
            working,
            preferences,
            cleared_backup: None,
        }
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    /// The active profile record. Its fields are only current after a flush.
    pub fn active_profile(&self) -> Option<&Profile> {
        self.active_index.and_then(|i| self.profiles.get(i))
    }

    pub fn working(&self) -> &WorkingSet {
        &self.working
    }

    pub fn balance(&self) -> Amount {
        self.working.balance
    }

    pub fn fee(&self) -> Amount {
        self.working.fee
    }

    pub fn transaction_amount(&self) -> Amount {
        self.working.transaction_amount
    }

    pub fn result(&self) -> &str {
        &self.working.result
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.working.log
    }

    pub fn history(&self) -> &History {
        &self.working.history
    }

    pub fn last_top_up(&self) -> Amount {
        self.working.last_top_up
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn preferences_mut(&mut self) -> &mut Preferences {
        &mut self.preferences
    }

    pub fn clear_state(&self) -> ClearState {
        if self.cleared_backup.is_some() {
            ClearState::Cleared
        } else {
            ClearState::Normal
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.profiles.len() {
            Ok(())
        } else {
            Err(TrackerError::InvalidIndex {
                index,
                len: self.profiles.len(),
            })
        }
    }

    /// Copies the working set into the active profile, if there is one.
    pub fn flush(&mut self) {
        if let Some(profile) = self.active_index.and_then(|i| self.profiles.get_mut(i)) {
            self.working.store_into(profile);
        }
    }

    /// Makes `index` the active profile.
    ///
    /// The outgoing profile is flushed first, then the working set is loaded
    /// from the incoming one. The result text never survives a switch.
    pub fn switch_to(&mut self, index: usize) -> Result<&Profile> {
        self.check_index(index)?;
        self.flush();
        self.active_index = Some(index);
        self.working = WorkingSet::load(&self.profiles[index]);
        debug!("Switched to profile {} ({})", index, self.profiles[index].name);
        Ok(&self.profiles[index])
    }

    /// Switches to `index`; `None` (nothing chosen in the selector) is a no-op.
    ///
    /// Returns whether a switch happened.
    pub fn select(&mut self, index: Option<usize>) -> Result<bool> {
        match index {
            Some(index) => self.switch_to(index).map(|_| true),
            None => Ok(false),
        }
    }

    /// Appends a zero-valued profile and switches into it.
    ///
    /// The name is trimmed; an empty name is rejected without touching state.
    pub fn create_profile(&mut self, name: &str) -> Result<usize> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TrackerError::EmptyName);
        }
        self.profiles.push(Profile::new(name));
        let index = self.profiles.len() - 1;
        self.switch_to(index)?;
        Ok(index)
    }

    /// Removes the profile at `index`.
    ///
    /// Afterwards the first remaining profile is active, or no profile at all
    /// with an emptied working set.
    pub fn delete_profile(&mut self, index: usize) -> Result<Profile> {
        self.check_index(index)?;
        self.flush();
        let removed = self.profiles.remove(index);
        self.active_index = None;

        if self.profiles.is_empty() {
            self.working = WorkingSet::default();
        } else {
            self.switch_to(0)?;
        }
        debug!("Deleted profile {} ({})", index, removed.name);
        Ok(removed)
    }

    /// Moves the profile at `from` to position `to`, shifting the others.
    ///
    /// The active index follows the active profile, not its old position.
    /// The working set is untouched.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from == to {
            return Ok(());
        }

        let moved = self.profiles.remove(from);
        self.profiles.insert(to, moved);

        if let Some(active) = self.active_index {
            self.active_index = Some(if active == from {
                to
            } else if from < active && active <= to {
                active - 1
            } else if to <= active && active < from {
                active + 1
            } else {
                active
            });
        }
        Ok(())
    }

    /// Steps the working set back one mutation. Returns `false` if there was
    /// nothing to undo.
    pub fn undo(&mut self) -> bool {
        let current = self.working.snapshot();
        match self.working.history.undo(current) {
            Some(previous) => {
                self.working.restore(previous);
                self.flush();
                true
            }
            None => false,
        }
    }

    /// Re-applies the last undone step. Returns `false` if there was nothing
    /// to redo.
    pub fn redo(&mut self) -> bool {
        let current = self.working.snapshot();
        match self.working.history.redo(current) {
            Some(next) => {
                self.working.restore(next);
                self.flush();
                true
            }
            None => false,
        }
    }

    /// Subtracts the fee and the clipboard amount from the balance.
    ///
    /// `clipboard_text` is parsed leniently; unparsable text counts as zero.
    /// `at` is stamped on the log line.
    pub fn apply_debit(&mut self, clipboard_text: &str, at: NaiveTime) -> DebitOutcome {
        let amount = Amount::parse_lenient(clipboard_text);
        let balance = self.working.balance;
        let fee = self.working.fee;
        let result = balance - fee - amount;

        let expression = if fee.is_zero() {
            format!("{} - {}", balance, amount)
        } else {
            format!("{} - {} - {}", balance, fee, amount)
        };
        let line = format!("{} = {}", expression, result);

        self.working.history.record(self.working.snapshot());
        self.working.log.insert(
            0,
            LogEntry::debit(format!("{} [{}]", line, at.format(LOG_TIME_FORMAT))),
        );
        self.working.balance = result;
        self.working.transaction_amount = Amount::ZERO;
        self.working.result = line;
        self.flush();

        debug!("Debit {} from {} leaves {}", amount, balance, result);
        DebitOutcome {
            balance: result,
            published: result.to_string(),
        }
    }

    /// Adds the clipboard amount to the balance and remembers it as the last
    /// top-up.
    pub fn apply_top_up(&mut self, clipboard_text: &str, at: NaiveTime) -> Amount {
        let amount = Amount::parse_lenient(clipboard_text);
        let balance = self.working.balance;
        let new_balance = balance + amount;
        let line = format!("{} + {} = {}", balance, amount, new_balance);

        self.working.history.record(self.working.snapshot());
        self.working.last_top_up = amount;
        self.working.log.insert(
            0,
            LogEntry::top_up(format!("{} [{}]", line, at.format(LOG_TIME_FORMAT))),
        );
        self.working.balance = new_balance;
        self.working.result = line;
        self.flush();

        debug!("Top-up {} onto {} gives {}", amount, balance, new_balance);
        new_balance
    }

    /// Sets the balance field from operator text. Not recorded in history.
    pub fn set_balance(&mut self, text: &str) {
        self.working.balance = Amount::parse_lenient(text);
        self.flush();
    }

    /// Sets the fee field from operator text. Not recorded in history.
    pub fn set_fee(&mut self, text: &str) {
        self.working.fee = Amount::parse_lenient(text);
        self.flush();
    }

    /// Sets the transaction amount field from operator text. Not recorded in
    /// history.
    pub fn set_transaction_amount(&mut self, text: &str) {
        self.working.transaction_amount = Amount::parse_lenient(text);
        self.flush();
    }

    /// Sets the balance of every listed profile to the working balance.
    ///
    /// All indices are validated before anything changes. Returns how many
    /// profiles were updated.
    pub fn update_checked(&mut self, indices: &[usize]) -> Result<usize> {
        if indices.is_empty() {
            return Err(TrackerError::EmptySelection);
        }
        for &index in indices {
            self.check_index(index)?;
        }

        self.flush();
        let balance = self.working.balance;
        for &index in indices {
            self.profiles[index].balance = balance;
        }
        Ok(indices.len())
    }

    /// Backs up the whole session and empties it.
    ///
    /// Returns `false` without doing anything if a backup is already held.
    pub fn clear(&mut self) -> bool {
        if self.cleared_backup.is_some() {
            return false;
        }
        self.cleared_backup = Some(Box::new(ClearedBackup {
            working: std::mem::take(&mut self.working),
            profiles: std::mem::take(&mut self.profiles),
            active_index: self.active_index.take(),
        }));
        true
    }

    /// Puts back what the last `clear` removed and discards the backup.
    ///
    /// Returns `false` if there was no backup.
    pub fn restore(&mut self) -> bool {
        match self.cleared_backup.take() {
            Some(backup) => {
                let ClearedBackup {
                    working,
                    profiles,
                    active_index,
                } = *backup;
                self.working = working;
                self.profiles = profiles;
                self.active_index = active_index;
                true
            }
            None => false,
        }
    }

    /// Clears when normal, restores when cleared. Returns the new state.
    pub fn toggle_clear(&mut self) -> ClearState {
        match self.clear_state() {
            ClearState::Normal => {
                self.clear();
            }
            ClearState::Cleared => {
                self.restore();
            }
        }
        self.clear_state()
    }
}
