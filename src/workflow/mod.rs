//! Status changes and action edits.
//!
//! Both status sets are flat: any legal value may follow any other. The only
//! derived field is `Action::completed_at`, which tracks whether the action
//! is `Done`. Regulation status is never recomputed from its actions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{validate_title, Action, ActionStatus, NewAction, Regulation, RegulationStatus};
use crate::error::Result;
use crate::storage::Gateway;

/// Full replacement of an action's mutable fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditActionFields {
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub assignee: Option<String>,
    pub due_date: Option<NaiveDate>,
    /// Forces the resulting status to Done
    #[serde(default)]
    pub mark_done: bool,
}

impl EditActionFields {
    /// Seed an edit with the action's current values.
    pub fn from_action(action: &Action) -> Self {
        Self {
            title: action.title.clone(),
            description: action.description.clone(),
            status: action.status.to_string(),
            assignee: action.assignee.clone(),
            due_date: action.due_date,
            mark_done: false,
        }
    }
}

/// Fields for a new action. Status defaults to Planned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewActionFields {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub assignee: Option<String>,
    pub due_date: Option<NaiveDate>,
}

impl NewActionFields {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Replace a regulation's status.
///
/// Returns whether the value changed. On error the regulation is untouched.
pub fn set_regulation_status(regulation: &mut Regulation, new_status: &str) -> Result<bool> {
    let status: RegulationStatus = new_status.parse()?;
    let changed = regulation.status != status;
    regulation.status = status;
    Ok(changed)
}

/// Apply a full edit to an action, stamping or clearing `completed_at`.
///
/// Every field is validated before anything is written, so a rejected edit
/// leaves the action as it was.
pub fn apply_action_edit(
    action: &mut Action,
    fields: EditActionFields,
    now: DateTime<Utc>,
) -> Result<()> {
    validate_title(&fields.title)?;
    let parsed: ActionStatus = fields.status.parse()?;
    let status = if fields.mark_done {
        ActionStatus::Done
    } else {
        parsed
    };

    action.title = fields.title;
    action.description = non_empty(fields.description);
    action.status = status;
    action.assignee = non_empty(fields.assignee);
    action.due_date = fields.due_date;
    action.completed_at = completion_stamp(status, now);
    Ok(())
}

/// Build a validated action owned by `regulation`.
pub fn add_action(
    regulation: &Regulation,
    fields: NewActionFields,
    now: DateTime<Utc>,
) -> Result<NewAction> {
    validate_title(&fields.title)?;
    let status = match fields.status.as_deref() {
        Some(s) => s.parse()?,
        None => ActionStatus::default(),
    };

    Ok(NewAction {
        regulation_id: regulation.id,
        title: fields.title,
        description: non_empty(fields.description),
        status,
        assignee: non_empty(fields.assignee),
        due_date: fields.due_date,
        completed_at: completion_stamp(status, now),
    })
}

/// Permanently remove an action.
pub fn delete_action<G: Gateway + ?Sized>(gateway: &mut G, action: Action) -> Result<()> {
    gateway.delete_action(action.id)
}

fn completion_stamp(status: ActionStatus, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    (status == ActionStatus::Done).then_some(now)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
