//! Instructor name preparation for rating lookups.
//!
//! Schedule names and the names the rating index is keyed under don't
//! always agree. Two fixes are applied before searching:
//!
//! - [`reduce_name`] drops the middle token of a three-token name.
//! - [`AliasTable::normalize`] swaps a formal first name for the form the
//!   index uses (e.g. "Barton" -> "Bart").

use std::collections::HashMap;

/// Collapse "First Middle Last" into "First Last".
///
/// Only names with exactly three whitespace-separated tokens are touched.
/// Two-token names and names with four or more tokens pass through as-is,
/// so a compound surname like "Ana de la Cruz" is left alone and may miss.
pub fn reduce_name(name: &str) -> String {
    let tokens: Vec<&str> = name.split_whitespace().collect();
    match tokens.as_slice() {
        [first, _middle, last] => format!("{first} {last}"),
        _ => name.to_string(),
    }
}

/// Immutable first-name alias table.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    aliases: HashMap<String, String>,
}

impl AliasTable {
    pub fn new<I, K, V>(aliases: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            aliases: aliases
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Replace an aliased first token and rejoin tokens with single spaces.
    ///
    /// An empty or all-whitespace name comes back as an empty string.
    pub fn normalize(&self, name: &str) -> String {
        let mut tokens = name.split_whitespace();
        let Some(first) = tokens.next() else {
            return String::new();
        };

        let first = self.aliases.get(first).map(String::as_str).unwrap_or(first);
        std::iter::once(first)
            .chain(tokens)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
