//! Operator preferences that ride along with the session.
//!
//! None of these affect balances; they are persisted so the tool reopens
//! the way the operator left it.

use std::fmt;

/// Which side of the main view the profiles panel sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelSide {
    Left,
    #[default]
    Right,
}

impl PanelSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            PanelSide::Left => "left",
            PanelSide::Right => "right",
        }
    }

    /// Anything other than `"left"` (including absence) means right.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("left") => PanelSide::Left,
            _ => PanelSide::Right,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            PanelSide::Left => PanelSide::Right,
            PanelSide::Right => PanelSide::Left,
        }
    }
}

/// Label attached to exported balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BalanceType {
    #[default]
    First,
    Last,
}

impl BalanceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BalanceType::First => "First",
            BalanceType::Last => "Last",
        }
    }

    /// Anything other than `"Last"` (including absence) means first.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("Last") => BalanceType::Last,
            _ => BalanceType::First,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            BalanceType::First => BalanceType::Last,
            BalanceType::Last => BalanceType::First,
        }
    }
}

impl fmt::Display for BalanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display and behavior flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    pub dark_mode: bool,

    /// Countdown minutes as typed; kept verbatim, never interpreted here.
    pub timer_input: String,

    /// Copy a segment of the profile name to the clipboard on every switch.
    pub auto_copy_enabled: bool,

    pub panel_side: PanelSide,
    pub balance_type: BalanceType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_values_default_when_unknown() {
        assert_eq!(PanelSide::from_stored(None), PanelSide::Right);
        assert_eq!(PanelSide::from_stored(Some("middle")), PanelSide::Right);
        assert_eq!(PanelSide::from_stored(Some("left")), PanelSide::Left);
        assert_eq!(BalanceType::from_stored(None), BalanceType::First);
        assert_eq!(BalanceType::from_stored(Some("last")), BalanceType::First);
        assert_eq!(BalanceType::from_stored(Some("Last")), BalanceType::Last);
    }

    #[test]
    fn test_toggles_alternate() {
        assert_eq!(PanelSide::Right.toggled().toggled(), PanelSide::Right);
        assert_eq!(BalanceType::First.toggled(), BalanceType::Last);
        assert_eq!(BalanceType::Last.to_string(), "Last");
    }
}
