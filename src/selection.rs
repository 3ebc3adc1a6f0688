use crate::catalogue::Catalogue;
use crate::models::{MoveDirection, SelectionEntry};
use std::collections::HashSet;

/// Receives the identifier sequence after every change of the selection.
pub trait SelectionListener {
    fn selection_changed(&mut self, identifiers: &[usize]);
}

/// Why an identifier from a saved list was not restored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreIssue {
    OutOfRange(usize),
    Duplicate(usize),
}

impl std::fmt::Display for RestoreIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RestoreIssue::OutOfRange(id) => write!(f, "question {} inexistante", id),
            RestoreIssue::Duplicate(id) => write!(f, "question {} en double", id),
        }
    }
}

/// Ordered quiz composition. Identifiers are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionList {
    entries: Vec<SelectionEntry>,
}

impl SelectionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[SelectionEntry] {
        &self.entries
    }

    pub fn identifiers(&self) -> Vec<usize> {
        self.entries.iter().map(|e| e.identifier).collect()
    }

    pub fn identifier_set(&self) -> HashSet<usize> {
        self.entries.iter().map(|e| e.identifier).collect()
    }

    pub fn position(&self, identifier: usize) -> Option<usize> {
        self.entries.iter().position(|e| e.identifier == identifier)
    }

    pub fn contains(&self, identifier: usize) -> bool {
        self.position(identifier).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends `entry` unless its identifier is already selected.
    pub fn add(&mut self, entry: SelectionEntry) -> bool {
        if self.contains(entry.identifier) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn remove(&mut self, identifier: usize) -> bool {
        match self.position(identifier) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Exchanges the entry with its neighbour. Nothing happens at the ends.
    pub fn swap(&mut self, identifier: usize, direction: MoveDirection) -> bool {
        let Some(index) = self.position(identifier) else {
            return false;
        };
        let neighbour = match direction {
            MoveDirection::Up => index.checked_sub(1),
            MoveDirection::Down => Some(index + 1).filter(|&n| n < self.entries.len()),
        };
        match neighbour {
            Some(other) => {
                self.entries.swap(index, other);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.entries.is_empty();
        self.entries.clear();
        changed
    }

    /// Rebuilds the list from saved identifiers, texts taken from `catalogue`.
    ///
    /// Unknown and repeated identifiers are skipped and reported.
    pub fn restore(&mut self, identifiers: &[usize], catalogue: &Catalogue) -> Vec<RestoreIssue> {
        self.entries.clear();
        let mut issues = Vec::new();

        for &identifier in identifiers {
            match catalogue.get(identifier) {
                None => issues.push(RestoreIssue::OutOfRange(identifier)),
                Some(record) => {
                    if !self.add(SelectionEntry::from(record)) {
                        issues.push(RestoreIssue::Duplicate(identifier));
                    }
                }
            }
        }

        issues
    }
}
