// src/entity/link.rs
use serde::{Deserialize, Serialize};

use super::Regulation;
use crate::error::Result;
use crate::storage::Gateway;

/// Link types the tracker knows how to label. Other values are stored as-is.
pub const KNOWN_LINK_TYPES: [&str; 4] = ["official", "guidance", "news", "pdf"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulationLink {
    pub id: i64,
    pub regulation_id: i64,
    /// The URL this link points to
    pub url: String,
    /// Type of link (e.g., "official", "guidance", "news", "pdf")
    pub link_type: Option<String>,
    /// Optional display label
    pub title: Option<String>,
}

impl RegulationLink {
    pub fn has_known_type(&self) -> bool {
        self.link_type
            .as_deref()
            .is_some_and(|t| KNOWN_LINK_TYPES.contains(&t))
    }

    /// Look up the owning regulation.
    pub fn regulation<G: Gateway + ?Sized>(&self, gateway: &G) -> Result<Regulation> {
        gateway.load_regulation(self.regulation_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewLink {
    pub regulation_id: i64,
    pub url: String,
    pub link_type: Option<String>,
    pub title: Option<String>,
}

impl NewLink {
    pub fn new(regulation_id: i64, url: impl Into<String>) -> Self {
        Self {
            regulation_id,
            url: url.into(),
            link_type: None,
            title: None,
        }
    }

    pub fn into_link(self, id: i64) -> RegulationLink {
        RegulationLink {
            id,
            regulation_id: self.regulation_id,
            url: self.url,
            link_type: self.link_type,
            title: self.title,
        }
    }
}
