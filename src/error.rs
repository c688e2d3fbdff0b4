//! Error types for the balance tracker.

use thiserror::Error;

/// Result type alias for tracker operations
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Errors that can occur while operating on a session.
///
/// Precondition variants (`EmptyName`, `InvalidIndex`, `NoActiveProfile`,
/// `EmptySelection`) are always returned before any state is touched.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Failed to read or write the store file or the command script
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Store record could not be encoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Command script parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// The clipboard capability rejected a read or write
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// Profile name was empty after trimming
    #[error("Profile name must not be empty")]
    EmptyName,

    /// Index does not address an existing profile
    #[error("No profile at index {index} (have {len})")]
    InvalidIndex { index: usize, len: usize },

    /// Operation needs a selected profile
    #[error("Select a profile first")]
    NoActiveProfile,

    /// Bulk operation was given no profiles
    #[error("Select at least one profile")]
    EmptySelection,

    /// Missing command script argument
    #[error("Missing command script argument. Usage: balance-tracker [--system-clipboard] <commands.csv> [store.json]")]
    MissingArgument,
}

impl TrackerError {
    /// Returns `true` for failures of the store or script input, after which
    /// continuing would lose data. Everything else leaves the session usable.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            TrackerError::Io(_) | TrackerError::Json(_) | TrackerError::Csv(_)
        )
    }
}
