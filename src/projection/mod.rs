//! Display ordering and labels.

use chrono::NaiveDate;
use serde::Serialize;

use crate::entity::{Action, Regulation, RegulationLink};

pub const LABEL_TITLE_CHARS: usize = 80;

/// Sort actions by due date, undated ones last. The sort is stable.
pub fn sort_actions(actions: &mut [Action]) {
    actions.sort_by_key(|a| a.due_date.unwrap_or(NaiveDate::MAX));
}

/// `#<id> — <title>` with the title cut to 80 characters.
pub fn selection_label(regulation: &Regulation) -> String {
    let title: String = regulation.title.chars().take(LABEL_TITLE_CHARS).collect();
    format!("#{} — {}", regulation.id, title)
}

pub fn action_headline(action: &Action) -> String {
    format!("{} — {}", action.title, action.status)
}

/// Link title, or the URL when untitled.
pub fn link_label(link: &RegulationLink) -> &str {
    link.title
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(&link.url)
}

/// A regulation with its links and display-ordered actions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegulationDetail {
    pub regulation: Regulation,
    pub links: Vec<RegulationLink>,
    pub actions: Vec<Action>,
}

impl RegulationDetail {
    pub fn new(
        regulation: Regulation,
        links: Vec<RegulationLink>,
        mut actions: Vec<Action>,
    ) -> Self {
        sort_actions(&mut actions);
        Self {
            regulation,
            links,
            actions,
        }
    }

    /// `source · jurisdiction · Effective <date>`, `-` for blanks.
    pub fn caption(&self) -> String {
        let r = &self.regulation;
        let effective = r
            .effective_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{} · {} · Effective {}",
            r.source.as_deref().unwrap_or("-"),
            r.jurisdiction.as_deref().unwrap_or("-"),
            effective
        )
    }
}
