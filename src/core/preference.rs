//! Ranked preference parsing.
//!
//! A preference cell is a comma separated list, most preferred first. Tokens
//! are trimmed and lowercased but never dropped: unknown activities and
//! duplicates still occupy a position in the list.

use crate::domain::model::{normalize_name, ActivityCatalog, Participant, UnknownToken};

pub const PREFERENCE_DELIMITER: char = ',';

pub fn parse_preferences(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => {
            raw.split(PREFERENCE_DELIMITER).map(normalize_name).collect()
        }
        _ => Vec::new(),
    }
}

/// 1-based position of the first occurrence of `key`, if any.
pub fn first_position(preferences: &[String], key: &str) -> Option<usize> {
    preferences.iter().position(|token| token == key).map(|i| i + 1)
}

/// Lists every non-empty token that does not resolve to a configured activity.
///
/// Empty tokens from doubled or trailing commas keep their position but are not
/// reported.
pub fn find_unknown_tokens(
    participants: &[Participant],
    catalog: &ActivityCatalog,
) -> Vec<UnknownToken> {
    participants
        .iter()
        .flat_map(|participant| {
            participant
                .preferences
                .iter()
                .enumerate()
                .filter(|(_, token)| !token.is_empty() && catalog.position(token).is_none())
                .map(|(i, token)| UnknownToken {
                    participant: participant.id.clone(),
                    position: i + 1,
                    token: token.clone(),
                })
        })
        .collect()
}
