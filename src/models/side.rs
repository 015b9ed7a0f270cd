//! Side: the atomic unit that wins or loses a match.

use crate::models::entrant::EntrantId;
use serde::{Deserialize, Serialize};

/// An ordered group of 1..K entrants competing together. Sides are never
/// persisted; they are rebuilt from a match's participant list by position
/// (first K ids = side A, next K = side B). The first entrant is the side's
/// representative: the single id stored as a match winner or tournament
/// champion stands for the whole side.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Side {
    /// Member entrant ids, in draft order. Always non-empty.
    pub entrants: Vec<EntrantId>,
}

impl Side {
    /// Build a side from entrant ids. Callers guarantee `entrants` is non-empty.
    pub fn new(entrants: Vec<EntrantId>) -> Self {
        Self { entrants }
    }

    /// The id that stands for this side at the storage boundary.
    pub fn representative(&self) -> EntrantId {
        self.entrants[0]
    }

    pub fn contains(&self, id: EntrantId) -> bool {
        self.entrants.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.entrants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entrants.is_empty()
    }
}
