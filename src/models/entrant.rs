//! Entrant identity. The bracket engine only ever sees opaque ids.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an entrant (used in participant lists and lookups).
pub type EntrantId = Uuid;

/// A registered entrant as the web layer displays it. The engine itself never
/// reads names; it works on `EntrantId` values alone.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Entrant {
    pub id: EntrantId,
    pub name: String,
}

impl Entrant {
    /// Create a new entrant with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}
