mod action;
mod link;
mod regulation;

pub use action::{Action, ActionStatus, NewAction};
pub use link::{NewLink, RegulationLink, KNOWN_LINK_TYPES};
pub use regulation::{NewRegulation, Regulation, RegulationStatus};

use crate::error::{RegTrackerError, Result};

/// Reject titles that are empty once surrounding whitespace is removed.
pub fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(RegTrackerError::InvalidTitle);
    }
    Ok(())
}

/// Lowercase and fold `_`/`-` to spaces so "in_progress" matches "In Progress".
fn normalize_status(s: &str) -> String {
    s.trim().to_lowercase().replace(['_', '-'], " ")
}
