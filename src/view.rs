//! Read-only projection of a session for display.
//!
//! The view is derived after every mutation and never read back into the
//! session.

use crate::profile::LogEntry;
use crate::session::{ClearState, Session};

/// Selector label shown when no profile exists.
pub const NO_PROFILE_LABEL: &str = "Current Balance";

/// One entry of the profiles panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRow {
    pub index: usize,
    pub name: String,
    pub balance: String,
    pub selected: bool,
}

/// Everything a renderer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub profiles: Vec<ProfileRow>,
    pub selector_label: String,
    pub balance: String,
    pub fee: String,
    pub transaction_amount: String,
    pub result: String,
    pub log: Vec<LogEntry>,

    /// Only present when the last top-up was positive.
    pub last_top_up: Option<String>,

    /// "Clear" or "Restore", depending on the toggle state.
    pub clear_label: &'static str,

    pub can_undo: bool,
    pub can_redo: bool,
}

impl Session {
    /// Derives the display model.
    pub fn view(&self) -> SessionView {
        let active = self.active_index();
        let profiles = self
            .profiles()
            .iter()
            .enumerate()
            .map(|(index, profile)| {
                let selected = active == Some(index);
                // The active record may lag the working set until the next flush.
                let balance = if selected {
                    self.balance()
                } else {
                    profile.balance
                };
                ProfileRow {
                    index,
                    name: profile.name.clone(),
                    balance: balance.to_string(),
                    selected,
                }
            })
            .collect();

        let selector_label = self
            .active_profile()
            .map(|p| p.name.clone())
            .unwrap_or_else(|| NO_PROFILE_LABEL.to_string());

        let last_top_up = self.last_top_up();

        SessionView {
            profiles,
            selector_label,
            balance: self.balance().display_field(),
            fee: self.fee().display_field(),
            transaction_amount: self.transaction_amount().display_field(),
            result: self.result().to_string(),
            log: self.log().to_vec(),
            last_top_up: last_top_up.is_positive().then(|| last_top_up.to_string()),
            clear_label: match self.clear_state() {
                ClearState::Normal => "Clear",
                ClearState::Cleared => "Restore",
            },
            can_undo: self.history().can_undo(),
            can_redo: self.history().can_redo(),
        }
    }
}
