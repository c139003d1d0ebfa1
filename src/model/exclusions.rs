use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::common::collections::HashSet;

/// Window classes that are never auto-placed and never count as occupants.
///
/// Entries are trimmed, non-empty and unique; insertion order is kept so the
/// settings file round-trips the way the user wrote it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ExclusionList {
    entries: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("window class must not be empty")]
    Empty,
    #[error("window class {0:?} is already in the list")]
    Duplicate(String),
}

impl ExclusionList {
    pub fn new() -> Self { Self::default() }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::default();
        let entries = entries
            .into_iter()
            .map(|e| e.as_ref().trim().to_string())
            .filter(|e| !e.is_empty())
            .filter(|e| seen.insert(e.clone()))
            .collect();
        Self { entries }
    }

    pub fn contains(&self, class: &str) -> bool { self.entries.iter().any(|e| e == class) }

    /// True when the window has a class and that class is listed.
    pub fn excludes(&self, class: Option<&str>) -> bool { class.is_some_and(|c| self.contains(c)) }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &str> { self.entries.iter().map(String::as_str) }

    pub fn add(&mut self, class: &str) -> Result<(), EditError> {
        let class = class.trim();
        if class.is_empty() {
            return Err(EditError::Empty);
        }
        if self.contains(class) {
            return Err(EditError::Duplicate(class.to_string()));
        }
        self.entries.push(class.to_string());
        Ok(())
    }

    /// Returns whether anything was removed.
    pub fn remove(&mut self, class: &str) -> bool {
        let class = class.trim();
        let before = self.entries.len();
        self.entries.retain(|e| e != class);
        before != self.entries.len()
    }

    /// Replaces `old` with `new` in place.
    ///
    /// An empty `new` removes `old`. Renaming onto another existing entry is
    /// refused and leaves the list untouched. When `old` is not listed, `new`
    /// is appended instead. Returns whether the list changed.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<bool, EditError> {
        let old = old.trim();
        let new = new.trim();
        let Some(index) = self.entries.iter().position(|e| e == old) else {
            if new.is_empty() {
                return Ok(false);
            }
            self.add(new)?;
            return Ok(true);
        };
        if new.is_empty() {
            self.entries.remove(index);
            return Ok(true);
        }
        if new == old {
            return Ok(false);
        }
        if self.contains(new) {
            return Err(EditError::Duplicate(new.to_string()));
        }
        self.entries[index] = new.to_string();
        Ok(true)
    }
}

impl From<Vec<String>> for ExclusionList {
    fn from(value: Vec<String>) -> Self { Self::from_entries(value) }
}

impl From<ExclusionList> for Vec<String> {
    fn from(value: ExclusionList) -> Self { value.entries }
}

impl<'a> FromIterator<&'a str> for ExclusionList {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self { Self::from_entries(iter) }
}
