/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Ordered token table for literal substitution

use log::debug;

/// Ordered `(token, replacement)` pairs applied one after the other.
///
/// Substitution is plain substring replacement, so a token that occurs
/// inside a longer token must be replaced after it. [`TokenTable::insert`]
/// keeps that invariant: a new token is placed in front of every token
/// already in the table that it contains. Otherwise insertion order is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenTable {
    entries: Vec<(String, String)>,
}

impl TokenTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding. The first binding of a token wins; later ones are
    /// ignored.
    pub fn insert(&mut self, token: impl Into<String>, replacement: impl Into<String>) {
        let token = token.into();
        if self.get(&token).is_some() {
            debug!("Token {} is already bound", token);
            return;
        }
        let position = self
            .entries
            .iter()
            .position(|(existing, _)| token.contains(existing.as_str()))
            .unwrap_or(self.entries.len());
        self.entries.insert(position, (token, replacement.into()));
    }

    /// Replacement bound to `token`
    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == token)
            .map(|(_, replacement)| replacement.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, r)| (t.as_str(), r.as_str()))
    }

    /// First pair `(earlier, later)` where the earlier token occurs inside
    /// the later one and would corrupt it during substitution.
    pub fn find_collision(&self) -> Option<(&str, &str)> {
        self.entries.iter().enumerate().find_map(|(i, (earlier, _))| {
            self.entries[i + 1..]
                .iter()
                .find(|(later, _)| later.contains(earlier.as_str()))
                .map(|(later, _)| (earlier.as_str(), later.as_str()))
        })
    }

    /// Replace every token in order, left to right. Unbound tokens stay in
    /// the text untouched.
    pub fn apply(&self, template: &str) -> String {
        self.entries
            .iter()
            .fold(template.to_string(), |text, (token, replacement)| {
                text.replace(token.as_str(), replacement)
            })
    }
}
