//! Persistence gateway for regulations, links and actions.
//!
//! The tracker core only talks to storage through [`Gateway`]. Entities are
//! kept in flat tables keyed by id; children point at their regulation via
//! `regulation_id` and are traversed with lookups, never back-pointers.

mod memory_store;
mod seed;
mod sqlite_store;

pub use memory_store::MemoryStore;
pub use seed::seed_if_empty;
pub use sqlite_store::SqliteStore;

use serde::{Deserialize, Serialize};

use crate::entity::{Action, NewAction, NewLink, NewRegulation, Regulation, RegulationLink};
use crate::error::Result;

/// Regulation fields with a distinct-value listing for filter choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
    Source,
    Category,
}

impl Facet {
    pub fn column(&self) -> &'static str {
        match self {
            Facet::Source => "source",
            Facet::Category => "category",
        }
    }

    pub fn value_of<'a>(&self, regulation: &'a Regulation) -> Option<&'a str> {
        match self {
            Facet::Source => regulation.source.as_deref(),
            Facet::Category => regulation.category.as_deref(),
        }
    }
}

impl std::fmt::Display for Facet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

/// Durable storage of the three entity types.
///
/// Every write commits on return. Lookups of unknown ids fail with
/// `RegTrackerError::NotFound`; storage faults surface as
/// `RegTrackerError::Persistence`.
pub trait Gateway {
    /// All regulations in insertion (id) order.
    fn load_all_regulations(&self) -> Result<Vec<Regulation>>;

    fn load_regulation(&self, id: i64) -> Result<Regulation>;

    fn load_action(&self, id: i64) -> Result<Action>;

    /// Links of one regulation in id order.
    fn links_for(&self, regulation_id: i64) -> Result<Vec<RegulationLink>>;

    /// Actions of one regulation in id order.
    fn actions_for(&self, regulation_id: i64) -> Result<Vec<Action>>;

    fn insert_regulation(&mut self, new: NewRegulation) -> Result<Regulation>;

    /// Overwrite every field of an existing regulation.
    fn save_regulation(&mut self, regulation: &Regulation) -> Result<Regulation>;

    fn insert_link(&mut self, new: NewLink) -> Result<RegulationLink>;

    fn insert_action(&mut self, new: NewAction) -> Result<Action>;

    /// Overwrite every field of an existing action.
    fn save_action(&mut self, action: &Action) -> Result<Action>;

    fn delete_action(&mut self, id: i64) -> Result<()>;

    /// Remove a regulation together with its links and actions.
    fn delete_regulation(&mut self, id: i64) -> Result<()>;

    /// Sorted, de-duplicated, non-empty values of `facet`.
    fn distinct_values(&self, facet: Facet) -> Result<Vec<String>>;
}
