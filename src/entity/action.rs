// src/entity/action.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{normalize_status, Regulation};
use crate::error::{RegTrackerError, Result};
use crate::storage::Gateway;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ActionStatus {
    #[default]
    Planned,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
    Blocked,
}

impl ActionStatus {
    pub const ALL: [ActionStatus; 4] = [
        ActionStatus::Planned,
        ActionStatus::InProgress,
        ActionStatus::Done,
        ActionStatus::Blocked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionStatus::Planned => "Planned",
            ActionStatus::InProgress => "In Progress",
            ActionStatus::Done => "Done",
            ActionStatus::Blocked => "Blocked",
        }
    }

    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|s| s.as_str()).collect()
    }
}

impl std::fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActionStatus {
    type Err = RegTrackerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match normalize_status(s).as_str() {
            "planned" => Ok(ActionStatus::Planned),
            "in progress" | "inprogress" => Ok(ActionStatus::InProgress),
            "done" => Ok(ActionStatus::Done),
            "blocked" => Ok(ActionStatus::Blocked),
            _ => Err(RegTrackerError::InvalidStatus {
                value: s.to_string(),
                valid: Self::labels(),
            }),
        }
    }
}

/// A remediation task owned by a regulation.
///
/// `completed_at` is set exactly when `status` is `Done`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: i64,
    pub regulation_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: ActionStatus,
    pub assignee: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Action {
    pub fn is_done(&self) -> bool {
        self.status == ActionStatus::Done
    }

    /// Fails when `completed_at` disagrees with the status.
    pub fn check_completion(&self) -> Result<()> {
        check_completion(self.status, self.completed_at)
    }

    /// Look up the owning regulation.
    pub fn regulation<G: Gateway + ?Sized>(&self, gateway: &G) -> Result<Regulation> {
        gateway.load_regulation(self.regulation_id)
    }
}

/// An action that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAction {
    pub regulation_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: ActionStatus,
    pub assignee: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl NewAction {
    pub fn new(regulation_id: i64, title: impl Into<String>) -> Self {
        Self {
            regulation_id,
            title: title.into(),
            description: None,
            status: ActionStatus::default(),
            assignee: None,
            due_date: None,
            completed_at: None,
        }
    }

    /// Fails when `completed_at` disagrees with the status.
    pub fn check_completion(&self) -> Result<()> {
        check_completion(self.status, self.completed_at)
    }

    pub fn into_action(self, id: i64) -> Action {
        Action {
            id,
            regulation_id: self.regulation_id,
            title: self.title,
            description: self.description,
            status: self.status,
            assignee: self.assignee,
            due_date: self.due_date,
            completed_at: self.completed_at,
        }
    }
}

fn check_completion(status: ActionStatus, completed_at: Option<DateTime<Utc>>) -> Result<()> {
    match (status == ActionStatus::Done, completed_at.is_some()) {
        (true, false) => Err(RegTrackerError::Persistence(
            "action is Done but has no completion time".to_string(),
        )),
        (false, true) => Err(RegTrackerError::Persistence(format!(
            "action is {} but has a completion time",
            status
        ))),
        _ => Ok(()),
    }
}
