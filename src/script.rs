//! Command scripts: operator actions read from CSV and replayed on a tracker.
//!
//! A script has the header `action,value`. Amounts containing grouping
//! commas must be quoted (`debit,"50,000"`).

use crate::clipboard::Clipboard;
use crate::error::Result;
use crate::store::KeyValueStore;
use crate::tracker::Tracker;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use serde::Deserialize;
use std::io::{Read, Write};

/// Raw command row as read from CSV.
#[derive(Debug, Deserialize)]
pub struct CommandRecord {
    /// Action name, case-insensitive
    pub action: String,

    /// Argument; meaning depends on the action
    pub value: Option<String>,
}

impl CommandRecord {
    /// Parses the raw row into a typed command.
    ///
    /// Returns `None` for unknown actions and missing or malformed arguments.
    pub fn parse(&self) -> Option<Command> {
        let action = self.action.trim().to_lowercase();
        let value = self
            .value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty());

        let command = match action.as_str() {
            "create" => Command::Create(value?.to_string()),
            "select" => Command::Select(value?.parse().ok()?),
            "delete" => Command::Delete(value.map(str::parse::<usize>).transpose().ok()?),
            "move" => {
                let (from, to) = value?.split_once(':')?;
                Command::Move {
                    from: from.trim().parse().ok()?,
                    to: to.trim().parse().ok()?,
                }
            }
            "paste" => Command::Paste(value?.to_string()),
            "debit" => Command::Debit(value.map(str::to_string)),
            "topup" => Command::TopUp(value.map(str::to_string)),
            "undo" => Command::Undo,
            "redo" => Command::Redo,
            "clear" => Command::Clear,
            "restore" => Command::Restore,
            "balance" => Command::SetBalance(value.unwrap_or_default().to_string()),
            "fee" => Command::SetFee(value.unwrap_or_default().to_string()),
            "amount" => Command::SetAmount(value.unwrap_or_default().to_string()),
            "update" => Command::UpdateChecked(parse_indices(value?)?),
            "export" => {
                let (indices, filter) = match value?.split_once('|') {
                    Some((indices, filter)) => (indices, filter.trim()),
                    None => (value?, ""),
                };
                Command::Export {
                    indices: parse_indices(indices)?,
                    filter: filter.to_string(),
                }
            }
            "autocopy" => Command::ToggleAutoCopy,
            "darkmode" => Command::ToggleDarkMode,
            "panel" => Command::TogglePanelSide,
            "balancetype" => Command::ToggleBalanceType,
            "timer" => Command::SetTimer(value.unwrap_or_default().to_string()),
            _ => return None,
        };
        Some(command)
    }
}

fn parse_indices(text: &str) -> Option<Vec<usize>> {
    text.split_whitespace()
        .map(|i| i.parse().ok())
        .collect::<Option<Vec<_>>>()
        .filter(|indices| !indices.is_empty())
}

/// One operator action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a profile with this name and switch to it.
    Create(String),

    /// Switch to the profile at this index.
    Select(usize),

    /// Delete the profile at this index, or the active one. Pre-confirmed.
    Delete(Option<usize>),

    /// Move a profile within the list.
    Move { from: usize, to: usize },

    /// Put text on the clipboard.
    Paste(String),

    /// Debit the clipboard amount, pasting the given text first if present.
    Debit(Option<String>),

    /// Top up by the clipboard amount, pasting the given text first if present.
    TopUp(Option<String>),

    Undo,
    Redo,
    Clear,
    Restore,
    SetBalance(String),
    SetFee(String),
    SetAmount(String),

    /// Copy the working balance onto these profiles.
    UpdateChecked(Vec<usize>),

    /// Copy a report of these profiles to the clipboard.
    Export { indices: Vec<usize>, filter: String },

    ToggleAutoCopy,
    ToggleDarkMode,
    TogglePanelSide,
    ToggleBalanceType,
    SetTimer(String),
}

impl<S: KeyValueStore, C: Clipboard> Tracker<S, C> {
    /// Replays a command script row by row.
    ///
    /// Malformed rows and rejected actions are logged at warn level and
    /// skipped. Store and I/O failures stop the replay. Returns the number
    /// of commands applied.
    pub fn process_script<R: Read>(&mut self, reader: R) -> Result<usize> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut applied = 0;
        for (row_idx, result) in csv_reader.deserialize::<CommandRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            match result {
                Ok(record) => match record.parse() {
                    Some(command) => match self.execute(command) {
                        Ok(()) => applied += 1,
                        Err(e) if e.is_fatal() => return Err(e),
                        Err(e) => warn!("Row {}: {}", row_num, e),
                    },
                    None => warn!("Row {}: Failed to parse command {:?}", row_num, record.action),
                },
                Err(e) => {
                    warn!("Row {}: CSV parse error: {}", row_num, e);
                }
            }
        }

        debug!("Applied {} command(s)", applied);
        Ok(applied)
    }

    /// Runs one command.
    pub fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Create(name) => {
                self.create_profile(&name)?;
            }
            Command::Select(index) => {
                self.select(Some(index))?;
            }
            Command::Delete(Some(index)) => {
                self.delete_profile(index, &mut |_: &str| true)?;
            }
            Command::Delete(None) => {
                self.delete_active(&mut |_: &str| true)?;
            }
            Command::Move { from, to } => self.reorder(from, to)?,
            Command::Paste(text) => self.clipboard_mut().write_text(&text)?,
            Command::Debit(text) => {
                if let Some(text) = text {
                    self.clipboard_mut().write_text(&text)?;
                }
                self.debit()?;
            }
            Command::TopUp(text) => {
                if let Some(text) = text {
                    self.clipboard_mut().write_text(&text)?;
                }
                self.top_up()?;
            }
            Command::Undo => {
                self.undo()?;
            }
            Command::Redo => {
                self.redo()?;
            }
            Command::Clear => {
                self.clear()?;
            }
            Command::Restore => {
                self.restore()?;
            }
            Command::SetBalance(text) => self.set_balance(&text)?,
            Command::SetFee(text) => self.set_fee(&text)?,
            Command::SetAmount(text) => self.set_transaction_amount(&text)?,
            Command::UpdateChecked(indices) => {
                self.update_checked(&indices)?;
            }
            Command::Export { indices, filter } => {
                self.export_profiles(&indices, &filter)?;
            }
            Command::ToggleAutoCopy => {
                self.toggle_auto_copy()?;
            }
            Command::ToggleDarkMode => {
                self.toggle_dark_mode()?;
            }
            Command::TogglePanelSide => self.toggle_panel_side()?,
            Command::ToggleBalanceType => self.toggle_balance_type()?,
            Command::SetTimer(text) => self.set_timer_input(&text)?,
        }
        Ok(())
    }

    /// Writes the profile table as CSV.
    ///
    /// The active row shows the live working values.
    pub fn write_profiles<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["index", "name", "balance", "fee", "active"])?;

        let session = self.session();
        for (index, profile) in session.profiles().iter().enumerate() {
            let active = session.active_index() == Some(index);
            let (balance, fee) = if active {
                (session.balance(), session.fee())
            } else {
                (profile.balance, profile.fee)
            };
            csv_writer.write_record([
                index.to_string(),
                profile.name.clone(),
                balance.to_string(),
                fee.to_string(),
                active.to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}
