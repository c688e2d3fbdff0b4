//! Operator actions: session transitions wired to the clipboard and the store.
//!
//! Every action that changes state saves the session before returning.
//! Actions rejected by a precondition return an error and save nothing.

use crate::amount::Amount;
use crate::clipboard::Clipboard;
use crate::error::{Result, TrackerError};
use crate::export::{auto_copy_segment, render_export};
use crate::profile::Profile;
use crate::session::{ClearState, DebitOutcome, Session};
use crate::store::{load_session, save_session, KeyValueStore};
use crate::view::SessionView;
use chrono::{Local, NaiveTime};
use log::{info, warn};

/// Yes/no gate consulted before destructive actions.
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, message: &str) -> bool {
        (self)(message)
    }
}

/// Owns the session together with its store and clipboard.
pub struct Tracker<S: KeyValueStore, C: Clipboard> {
    session: Session,
    store: S,
    clipboard: C,
    clock: fn() -> NaiveTime,
}

fn local_time() -> NaiveTime {
    Local::now().time()
}

impl<S: KeyValueStore, C: Clipboard> Tracker<S, C> {
    /// Loads the session from `store`. An empty store gives an empty session.
    pub fn open(store: S, clipboard: C) -> Result<Self> {
        let session = load_session(&store)?;
        info!(
            "Loaded {} profile(s), active {:?}",
            session.profiles().len(),
            session.active_index()
        );
        Ok(Tracker {
            session,
            store,
            clipboard,
            clock: local_time,
        })
    }

    /// Replaces the wall clock used for log timestamps.
    pub fn with_clock(mut self, clock: fn() -> NaiveTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub fn clipboard_mut(&mut self) -> &mut C {
        &mut self.clipboard
    }

    pub fn view(&self) -> SessionView {
        self.session.view()
    }

    /// Flushes the active profile and writes everything to the store.
    pub fn save(&mut self) -> Result<()> {
        save_session(&mut self.session, &mut self.store)
    }

    /// Copies part of the newly active profile's name, if enabled.
    /// Failures are logged and swallowed.
    fn auto_copy(&mut self) {
        if !self.session.preferences().auto_copy_enabled {
            return;
        }
        let Some(segment) = self
            .session
            .active_profile()
            .and_then(|p| auto_copy_segment(&p.name))
        else {
            return;
        };
        match self.clipboard.write_text(&segment) {
            Ok(()) => info!("Copied: {}", segment),
            Err(e) => warn!("Failed to copy {}: {}", segment, e),
        }
    }

    /// Creates a profile and makes it active.
    pub fn create_profile(&mut self, name: &str) -> Result<usize> {
        let index = self.session.create_profile(name)?;
        self.auto_copy();
        self.save()?;
        Ok(index)
    }

    /// Switches to `index`. `None` is a no-op.
    pub fn select(&mut self, index: Option<usize>) -> Result<bool> {
        if !self.session.select(index)? {
            return Ok(false);
        }
        self.auto_copy();
        self.save()?;
        Ok(true)
    }

    /// Deletes the profile at `index` once `confirm` agrees.
    ///
    /// Returns `Ok(false)` if the confirmation was declined; nothing changes.
    pub fn delete_profile(&mut self, index: usize, confirm: &mut impl Confirm) -> Result<bool> {
        let Some(name) = self.session.profiles().get(index).map(|p| p.name.clone()) else {
            return Err(TrackerError::InvalidIndex {
                index,
                len: self.session.profiles().len(),
            });
        };
        if !confirm.confirm(&format!("Delete profile \"{}\"?", name)) {
            return Ok(false);
        }

        self.session.delete_profile(index)?;
        if self.session.active_index().is_some() {
            self.auto_copy();
        }
        self.save()?;
        Ok(true)
    }

    /// Deletes the active profile once `confirm` agrees.
    pub fn delete_active(&mut self, confirm: &mut impl Confirm) -> Result<bool> {
        let index = self
            .session
            .active_index()
            .ok_or(TrackerError::NoActiveProfile)?;
        self.delete_profile(index, confirm)
    }

    /// Moves a profile within the list, keeping the active one active.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<()> {
        if from == to {
            return Ok(());
        }
        self.session.reorder(from, to)?;
        self.save()
    }

    pub fn undo(&mut self) -> Result<bool> {
        if !self.session.undo() {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    pub fn redo(&mut self) -> Result<bool> {
        if !self.session.redo() {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Reads the amount from the clipboard, debits it and publishes the new
    /// balance back to the clipboard.
    ///
    /// The debit is applied and saved before the write; a failed write is
    /// returned but does not undo it.
    pub fn debit(&mut self) -> Result<DebitOutcome> {
        let text = self.clipboard.read_text()?;
        let outcome = self.session.apply_debit(&text, (self.clock)());
        self.save()?;
        self.clipboard.write_text(&outcome.published)?;
        info!("Result copied to clipboard: {}", outcome.published);
        Ok(outcome)
    }

    /// Reads the amount from the clipboard and adds it to the balance.
    pub fn top_up(&mut self) -> Result<Amount> {
        let text = self.clipboard.read_text()?;
        let balance = self.session.apply_top_up(&text, (self.clock)());
        self.save()?;
        info!("Balance updated: {}", balance);
        Ok(balance)
    }

    /// Clears or restores the whole session.
    pub fn toggle_clear(&mut self) -> Result<ClearState> {
        let state = self.session.toggle_clear();
        self.save()?;
        match state {
            ClearState::Cleared => info!("All data cleared - toggle again to restore"),
            ClearState::Normal => info!("All data restored"),
        }
        Ok(state)
    }

    /// Empties the session, keeping a backup. No-op when already cleared.
    pub fn clear(&mut self) -> Result<bool> {
        if !self.session.clear() {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Brings back what `clear` removed. No-op without a backup.
    pub fn restore(&mut self) -> Result<bool> {
        if !self.session.restore() {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    pub fn set_balance(&mut self, text: &str) -> Result<()> {
        self.session.set_balance(text);
        self.save()
    }

    pub fn set_fee(&mut self, text: &str) -> Result<()> {
        self.session.set_fee(text);
        self.save()
    }

    pub fn set_transaction_amount(&mut self, text: &str) -> Result<()> {
        self.session.set_transaction_amount(text);
        self.save()
    }

    /// Copies the working balance onto every listed profile.
    pub fn update_checked(&mut self, indices: &[usize]) -> Result<usize> {
        let updated = self.session.update_checked(indices)?;
        self.save()?;
        info!("Updated {} profile(s)", updated);
        Ok(updated)
    }

    /// Writes a report line per listed profile to the clipboard and returns
    /// the text.
    pub fn export_profiles(&mut self, indices: &[usize], filter: &str) -> Result<String> {
        if indices.is_empty() {
            return Err(TrackerError::EmptySelection);
        }
        let len = self.session.profiles().len();
        if let Some(&index) = indices.iter().find(|&&i| i >= len) {
            return Err(TrackerError::InvalidIndex { index, len });
        }

        self.session.flush();
        let profiles = self.session.profiles();
        let selected: Vec<&Profile> = indices.iter().map(|&i| &profiles[i]).collect();
        let text = render_export(&selected, filter, self.session.preferences().balance_type);

        self.clipboard.write_text(&text)?;
        info!("Copied {} profile(s)", selected.len());
        Ok(text)
    }

    pub fn toggle_dark_mode(&mut self) -> Result<bool> {
        let prefs = self.session.preferences_mut();
        prefs.dark_mode = !prefs.dark_mode;
        let enabled = prefs.dark_mode;
        self.save()?;
        Ok(enabled)
    }

    pub fn toggle_auto_copy(&mut self) -> Result<bool> {
        let prefs = self.session.preferences_mut();
        prefs.auto_copy_enabled = !prefs.auto_copy_enabled;
        let enabled = prefs.auto_copy_enabled;
        self.save()?;
        Ok(enabled)
    }

    pub fn toggle_panel_side(&mut self) -> Result<()> {
        let prefs = self.session.preferences_mut();
        prefs.panel_side = prefs.panel_side.toggled();
        self.save()
    }

    pub fn toggle_balance_type(&mut self) -> Result<()> {
        let prefs = self.session.preferences_mut();
        prefs.balance_type = prefs.balance_type.toggled();
        self.save()
    }

    /// Stores the countdown text as typed.
    pub fn set_timer_input(&mut self, text: &str) -> Result<()> {
        self.session.preferences_mut().timer_input = text.to_owned();
        self.save()
    }
}
