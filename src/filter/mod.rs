//! Regulation list filtering.
//!
//! A [`FilterSpec`] combines a free-text query with exact-match facets.
//! [`filter_regulations`] keeps the candidates that satisfy every active
//! predicate, preserving their load order.

use serde::{Deserialize, Serialize};

use crate::entity::Regulation;

/// Label of the wildcard choice in facet selectors.
pub const WILDCARD: &str = "All";

/// Exact-match constraint on one regulation field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetFilter {
    #[default]
    Any,
    Exactly(String),
}

impl FacetFilter {
    /// `"All"` (any case) and the empty string mean no restriction.
    pub fn parse(value: &str) -> Self {
        if value.is_empty() || value.eq_ignore_ascii_case(WILDCARD) {
            FacetFilter::Any
        } else {
            FacetFilter::Exactly(value.to_string())
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, FacetFilter::Any)
    }

    /// Case-sensitive equality; a missing field never matches a concrete value.
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            FacetFilter::Any => true,
            FacetFilter::Exactly(expected) => value == Some(expected.as_str()),
        }
    }
}

impl From<Option<String>> for FacetFilter {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map(FacetFilter::parse).unwrap_or_default()
    }
}

/// Criteria for narrowing the regulation list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Case-insensitive substring of title, summary or jurisdiction
    pub query: Option<String>,
    pub source: FacetFilter,
    pub status: FacetFilter,
    pub category: FacetFilter,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the spec imposes any restriction.
    pub fn is_empty(&self) -> bool {
        self.folded_query().is_none()
            && self.source.is_any()
            && self.status.is_any()
            && self.category.is_any()
    }

    fn folded_query(&self) -> Option<String> {
        self.query
            .as_deref()
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }

    fn matches_folded(&self, regulation: &Regulation, query: Option<&str>) -> bool {
        if let Some(q) = query {
            let hit = [
                Some(regulation.title.as_str()),
                regulation.summary.as_deref(),
                regulation.jurisdiction.as_deref(),
            ]
            .into_iter()
            .any(|field| field.unwrap_or_default().to_lowercase().contains(q));
            if !hit {
                return false;
            }
        }

        self.source.matches(regulation.source.as_deref())
            && self.status.matches(Some(regulation.status.as_str()))
            && self.category.matches(regulation.category.as_deref())
    }
}

/// Keep the regulations matching `spec`, in their original order.
pub fn filter_regulations(candidates: Vec<Regulation>, spec: &FilterSpec) -> Vec<Regulation> {
    let query = spec.folded_query();
    candidates
        .into_iter()
        .filter(|r| spec.matches_folded(r, query.as_deref()))
        .collect()
}
