//! Clipboard capability consumed by debits and top-ups.

use crate::error::{Result, TrackerError};

/// Source of transaction amounts and sink for published results.
///
/// Both calls are fallible and never retried by the caller.
pub trait Clipboard {
    fn read_text(&mut self) -> Result<String>;
    fn write_text(&mut self, text: &str) -> Result<()>;
}

impl Clipboard for Box<dyn Clipboard> {
    fn read_text(&mut self) -> Result<String> {
        (**self).read_text()
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        (**self).write_text(text)
    }
}

/// A clipboard that lives in memory; used by scripts and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryClipboard {
    text: String,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clipboard already holding `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        MemoryClipboard { text: text.into() }
    }

    pub fn contents(&self) -> &str {
        &self.text
    }
}

impl Clipboard for MemoryClipboard {
    fn read_text(&mut self) -> Result<String> {
        Ok(self.text.clone())
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        self.text = text.to_owned();
        Ok(())
    }
}

/// The operating system clipboard.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self> {
        let inner = arboard::Clipboard::new().map_err(|e| TrackerError::Clipboard(e.to_string()))?;
        Ok(SystemClipboard { inner })
    }
}

impl Clipboard for SystemClipboard {
    fn read_text(&mut self) -> Result<String> {
        self.inner
            .get_text()
            .map_err(|e| TrackerError::Clipboard(e.to_string()))
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        self.inner
            .set_text(text.to_owned())
            .map_err(|e| TrackerError::Clipboard(e.to_string()))
    }
}
