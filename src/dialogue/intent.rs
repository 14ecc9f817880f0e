//! Intent extraction
//!
//! Pure functions turning raw utterance text into typed fragments. Each
//! extractor is an ordered rule list evaluated top to bottom, first match
//! wins. Callers must not assume non-empty results.

use super::session::{Preference, Transport};
use regex::Regex;
use std::sync::OnceLock;

/// Origin sentinel when the user only names a destination.
pub const CURRENT_LOCATION: &str = "my current location";

enum LocationRule {
    /// Captures (origin, destination)
    Pair(Regex),
    /// Captures destination only; origin defaults to [`CURRENT_LOCATION`]
    DestinationOnly(Regex),
}

fn location_rules() -> &'static [LocationRule] {
    static RULES: OnceLock<Vec<LocationRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        // Lazily quantified so "from a to b to c" splits at the first "to";
        // the trailing group stops each span at sentence punctuation.
        vec![
            LocationRule::Pair(
                Regex::new(r"from\s+(.+?)\s+to\s+(.+?)(?:[.?!]|$)").expect("location rule"),
            ),
            LocationRule::Pair(
                Regex::new(r"go from\s+(.+?)\s+to\s+(.+?)(?:[.?!]|$)").expect("location rule"),
            ),
            LocationRule::DestinationOnly(
                Regex::new(r"(?:start journey to|navigate to|go to)\s+(.+?)(?:[.?!]|$)")
                    .expect("location rule"),
            ),
            LocationRule::Pair(
                Regex::new(r"^(.+?)\s+to\s+(.+?)(?:[.?!]|$)").expect("location rule"),
            ),
        ]
    })
}

/// Normalize a matched place span: trimmed, lower-cased, trailing
/// punctuation stripped.
fn normalize_place(raw: &str) -> String {
    raw.trim()
        .trim_end_matches(['.', ',', '!', '?'])
        .trim()
        .to_lowercase()
}

/// Extract an (origin, destination) pair from free text.
///
/// Returns `(None, None)` when no rule matches.
pub fn extract_locations(text: &str) -> (Option<String>, Option<String>) {
    let text = text.to_lowercase();
    for rule in location_rules() {
        match rule {
            LocationRule::Pair(re) => {
                if let Some(caps) = re.captures(&text) {
                    let origin = normalize_place(&caps[1]);
                    let destination = normalize_place(&caps[2]);
                    if !origin.is_empty() && !destination.is_empty() {
                        return (Some(origin), Some(destination));
                    }
                }
            }
            LocationRule::DestinationOnly(re) => {
                if let Some(caps) = re.captures(&text) {
                    let destination = normalize_place(&caps[1]);
                    if !destination.is_empty() {
                        return (Some(CURRENT_LOCATION.to_string()), Some(destination));
                    }
                }
            }
        }
    }
    (None, None)
}

/// Extract a transport category. First match wins; never multi-label.
pub fn extract_transport(text: &str) -> Option<Transport> {
    let text = text.to_lowercase();
    if text.contains("bus") {
        Some(Transport::Bus)
    } else if text.contains("train") {
        Some(Transport::Train)
    } else if text.contains("mrt") || text.contains("lrt") {
        Some(Transport::RailTransit)
    } else {
        None
    }
}

/// Classify a route preference. Eco keywords outrank cost keywords;
/// anything else is Balanced.
pub fn classify_preference(text: &str) -> Preference {
    let text = text.to_lowercase();
    if text.contains("eco") || text.contains("co2") || text.contains("environment") {
        Preference::Eco
    } else if text.contains("cheap") || text.contains("cost") {
        Preference::Economical
    } else {
        Preference::Balanced
    }
}
