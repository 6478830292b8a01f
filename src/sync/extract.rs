//! Finds ticket references in commit messages and pull request titles.
//!
//! Commit messages only count when they *start* with a reference, which is
//! the team convention for linking work. Titles are searched everywhere, but
//! a reference glued to a preceding letter belongs to another project (with
//! project `SC`, `WWWSC-125` is not a match).

use std::collections::HashSet;

use regex::Regex;

use crate::error::SyncError;

/// Tracker project key used as the ticket prefix, e.g. `SC`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectKey(String);

impl ProjectKey {
    /// Validates that the key is non-empty and made of ASCII letters, digits,
    /// or underscores.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidProjectKey`] for blank keys, keys ending in
    /// a hyphen, or keys containing other characters.
    pub fn new(value: &str) -> Result<Self, SyncError> {
        let trimmed = value.trim();
        let is_valid = !trimmed.is_empty()
            && trimmed
                .chars()
                .all(|character| character.is_ascii_alphanumeric() || character == '_');
        if !is_valid {
            return Err(SyncError::InvalidProjectKey {
                key: value.to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the key.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Compiled matchers for one project key.
#[derive(Debug, Clone)]
pub struct TicketExtractor {
    anchored: Regex,
    unanchored: Regex,
}

impl TicketExtractor {
    /// Compiles the matchers for `project`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidProjectKey`] if the pattern cannot be built.
    pub fn new(project: &ProjectKey) -> Result<Self, SyncError> {
        let reference = format!("{}-[0-9]+", regex::escape(project.as_str()));
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|_| SyncError::InvalidProjectKey {
                key: project.as_str().to_owned(),
            })
        };
        Ok(Self {
            anchored: compile(&format!("^{reference}"))?,
            unanchored: compile(&reference)?,
        })
    }

    /// Reference a commit message starts with, if any.
    #[must_use]
    pub fn from_commit_message<'message>(&self, message: &'message str) -> Option<&'message str> {
        self.anchored.find(message).map(|found| found.as_str())
    }

    /// Every reference in a title not directly preceded by an ASCII letter.
    #[must_use]
    pub fn from_title<'title>(&self, title: &'title str) -> Vec<&'title str> {
        let mut references = Vec::new();
        let mut position = 0;
        while let Some(found) = self.unanchored.find_at(title, position) {
            if preceded_by_letter(title, found.start()) {
                position = next_char_boundary(title, found.start());
            } else {
                references.push(found.as_str());
                position = found.end();
            }
        }
        references
    }

    /// Unique references from commit messages then the title, in first-seen order.
    #[must_use]
    pub fn extract<'text, I>(&self, commit_messages: I, title: &'text str) -> Vec<String>
    where
        I: IntoIterator<Item = &'text str>,
    {
        let from_commits = commit_messages
            .into_iter()
            .filter_map(|message| self.from_commit_message(message));
        let mut seen = HashSet::new();
        from_commits
            .chain(self.from_title(title))
            .filter(|reference| seen.insert(*reference))
            .map(ToOwned::to_owned)
            .collect()
    }
}

fn preceded_by_letter(text: &str, index: usize) -> bool {
    text.get(..index)
        .and_then(|before| before.chars().next_back())
        .is_some_and(|character| character.is_ascii_alphabetic())
}

fn next_char_boundary(text: &str, index: usize) -> usize {
    text.get(index..)
        .and_then(|rest| rest.chars().next())
        .map_or(text.len(), |character| index + character.len_utf8())
}
