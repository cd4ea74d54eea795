// src/entity/regulation.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::normalize_status;
use crate::error::RegTrackerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RegulationStatus {
    #[default]
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Closed,
}

impl RegulationStatus {
    pub const ALL: [RegulationStatus; 3] = [
        RegulationStatus::Open,
        RegulationStatus::InProgress,
        RegulationStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RegulationStatus::Open => "Open",
            RegulationStatus::InProgress => "In Progress",
            RegulationStatus::Closed => "Closed",
        }
    }

    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|s| s.as_str()).collect()
    }
}

impl std::fmt::Display for RegulationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RegulationStatus {
    type Err = RegTrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_status(s).as_str() {
            "open" => Ok(RegulationStatus::Open),
            "in progress" | "inprogress" => Ok(RegulationStatus::InProgress),
            "closed" => Ok(RegulationStatus::Closed),
            _ => Err(RegTrackerError::InvalidStatus {
                value: s.to_string(),
                valid: Self::labels(),
            }),
        }
    }
}

/// A tracked regulatory item. Links and actions reference it by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Regulation {
    pub id: i64,
    pub title: String,
    pub source: Option<String>,
    pub jurisdiction: Option<String>,
    pub category: Option<String>,
    pub effective_date: Option<NaiveDate>,
    pub received_at: DateTime<Utc>,
    pub summary: Option<String>,
    pub status: RegulationStatus,
}

/// A regulation that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRegulation {
    pub title: String,
    pub source: Option<String>,
    pub jurisdiction: Option<String>,
    pub category: Option<String>,
    pub effective_date: Option<NaiveDate>,
    /// Defaults to the insertion time when `None`
    pub received_at: Option<DateTime<Utc>>,
    pub summary: Option<String>,
    pub status: RegulationStatus,
}

impl NewRegulation {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source: None,
            jurisdiction: None,
            category: None,
            effective_date: None,
            received_at: None,
            summary: None,
            status: RegulationStatus::default(),
        }
    }

    /// Materialize with the id assigned by the store.
    pub fn into_regulation(self, id: i64, now: DateTime<Utc>) -> Regulation {
        Regulation {
            id,
            title: self.title,
            source: self.source,
            jurisdiction: self.jurisdiction,
            category: self.category,
            effective_date: self.effective_date,
            received_at: self.received_at.unwrap_or(now),
            summary: self.summary,
            status: self.status,
        }
    }
}
