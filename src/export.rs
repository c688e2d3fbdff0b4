//! Text published to the clipboard besides transaction results.

use crate::preferences::BalanceType;
use crate::profile::Profile;
use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum (and copied) length of an auto-copy segment.
pub const AUTO_COPY_SEGMENT_LEN: usize = 15;

/// Currency suffix on exported balances.
pub const EXPORT_CURRENCY: &str = "VND";

static ID_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)BO\d+\s*-?\s*").expect("constant pattern"));

static ID_AND_REST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(BO\d+)(?:\s*-\s*)?(.+)?").expect("constant pattern"));

/// Picks the part of a profile name copied on switch.
///
/// The name is split on whitespace, `-` and `_`; the first segment of at
/// least [`AUTO_COPY_SEGMENT_LEN`] characters is truncated to that length.
///
/// ```
/// use balance_tracker::export::auto_copy_segment;
///
/// assert_eq!(
///     auto_copy_segment("BO7 - 1234567890123456789 Alice").as_deref(),
///     Some("123456789012345")
/// );
/// assert_eq!(auto_copy_segment("short name"), None);
/// ```
pub fn auto_copy_segment(name: &str) -> Option<String> {
    name.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .find(|segment| segment.chars().count() >= AUTO_COPY_SEGMENT_LEN)
        .map(|segment| segment.chars().take(AUTO_COPY_SEGMENT_LEN).collect())
}

/// Renders one line per profile for pasting into a report.
///
/// A `BO<digits>` identifier is pulled out of each name. A non-empty
/// `filter` replaces that identifier on every line.
pub fn render_export(profiles: &[&Profile], filter: &str, balance_type: BalanceType) -> String {
    let filter = filter.trim();

    profiles
        .iter()
        .map(|profile| {
            let balance = profile.balance;
            if !filter.is_empty() {
                let name = ID_PREFIX.replace(&profile.name, "");
                return format!(
                    "{} - {} - {} : {} {}",
                    filter,
                    name.trim(),
                    balance_type,
                    balance,
                    EXPORT_CURRENCY
                );
            }
            match ID_AND_REST.captures(&profile.name) {
                Some(caps) => {
                    let id = &caps[1];
                    let name = match caps.get(2) {
                        Some(rest) => rest.as_str().trim().to_string(),
                        None => profile
                            .name
                            .replacen(id, "", 1)
                            .trim_start_matches(|c: char| c.is_whitespace() || c == '-')
                            .trim()
                            .to_string(),
                    };
                    format!(
                        "{} - {} - {} : {} {}",
                        id, name, balance_type, balance, EXPORT_CURRENCY
                    )
                }
                None => format!(
                    "{} - {} : {} {}",
                    profile.name, balance_type, balance, EXPORT_CURRENCY
                ),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
