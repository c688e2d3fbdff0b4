//! # Balance Tracker
//!
//! A single-operator balance tracker. Each named profile holds a running
//! balance, a fee, a pending amount and a log of debits and top-ups. Amounts
//! are read from and written to the clipboard.
//!
//! ## Design Principles
//!
//! - **One active profile**: its live values sit in the session's working
//!   set and are flushed into the profile record before anything reads it
//! - **Per-profile undo/redo**: history travels with the profile across
//!   switches, reorders and saves
//! - **Lenient input**: unparsable clipboard text is zero, never an error
//! - **Save after every mutation**: the whole session is one JSON record
//!
//! ## Example
//!
//! ```
//! use balance_tracker::{Clipboard, MemoryClipboard, MemoryStore, Tracker};
//!
//! let mut tracker = Tracker::open(MemoryStore::new(), MemoryClipboard::new()).unwrap();
//! tracker.create_profile("Alice").unwrap();
//! tracker.set_balance("1,000,000").unwrap();
//!
//! tracker.clipboard_mut().write_text("50,000").unwrap();
//! let outcome = tracker.debit().unwrap();
//! assert_eq!(outcome.published, "950,000");
//!
//! tracker.undo().unwrap();
//! assert_eq!(tracker.view().balance, "1,000,000");
//! ```

pub mod amount;
pub mod clipboard;
pub mod error;
pub mod export;
pub mod history;
pub mod preferences;
pub mod profile;
pub mod script;
pub mod session;
pub mod store;
pub mod tracker;
pub mod view;

pub use amount::Amount;
pub use clipboard::{Clipboard, MemoryClipboard, SystemClipboard};
pub use error::{Result, TrackerError};
pub use history::History;
pub use preferences::{BalanceType, PanelSide, Preferences};
pub use profile::{LogEntry, LogKind, Profile, Snapshot};
pub use script::{Command, CommandRecord};
pub use session::{ClearState, DebitOutcome, Session, WorkingSet};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, SessionRecord};
pub use tracker::{Confirm, Tracker};
pub use view::{ProfileRow, SessionView};
