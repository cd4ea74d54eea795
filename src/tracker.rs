//! Command surface used by the presentation layer.
//!
//! Each command is a single read-modify-write against the gateway and
//! commits on success. A rejected command leaves stored state untouched.

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::entity::{Action, Regulation, RegulationStatus};
use crate::error::{RegTrackerError, Result};
use crate::filter::{filter_regulations, FilterSpec};
use crate::projection::RegulationDetail;
use crate::storage::{Facet, Gateway};
use crate::workflow::{self, EditActionFields, NewActionFields};

/// Values offered by the filter selectors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterChoices {
    pub sources: Vec<String>,
    pub statuses: Vec<&'static str>,
    pub categories: Vec<String>,
}

pub struct Tracker<G: Gateway> {
    gateway: G,
}

impl<G: Gateway> Tracker<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Regulations matching `spec`, in load order.
    pub fn list_regulations(&self, spec: &FilterSpec) -> Result<Vec<Regulation>> {
        let candidates = self.gateway.load_all_regulations()?;
        let total = candidates.len();
        let matched = filter_regulations(candidates, spec);
        debug!(total, matched = matched.len(), "filtered regulations");
        Ok(matched)
    }

    pub fn get_regulation_detail(&self, id: i64) -> Result<RegulationDetail> {
        let regulation = self.gateway.load_regulation(id)?;
        let links = self.gateway.links_for(id)?;
        let actions = self.gateway.actions_for(id)?;
        Ok(RegulationDetail::new(regulation, links, actions))
    }

    /// Replace a regulation's status. Persists only when the value changes.
    pub fn set_regulation_status(&mut self, id: i64, status: &str) -> Result<Regulation> {
        let mut regulation = self.gateway.load_regulation(id)?;
        let changed = workflow::set_regulation_status(&mut regulation, status)
            .map_err(|e| rejected("set_regulation_status", e))?;

        if !changed {
            debug!(id, status = %regulation.status, "regulation status unchanged");
            return Ok(regulation);
        }

        let saved = self.gateway.save_regulation(&regulation)?;
        info!(id, status = %saved.status, "regulation status updated");
        Ok(saved)
    }

    pub fn edit_action(&mut self, id: i64, fields: EditActionFields) -> Result<Action> {
        let mut action = self.gateway.load_action(id)?;
        workflow::apply_action_edit(&mut action, fields, Utc::now())
            .map_err(|e| rejected("edit_action", e))?;

        let saved = self.gateway.save_action(&action)?;
        info!(id, status = %saved.status, "action saved");
        Ok(saved)
    }

    pub fn add_action(&mut self, regulation_id: i64, fields: NewActionFields) -> Result<Action> {
        let regulation = self.gateway.load_regulation(regulation_id)?;
        let new = workflow::add_action(&regulation, fields, Utc::now())
            .map_err(|e| rejected("add_action", e))?;

        let created = self.gateway.insert_action(new)?;
        info!(id = created.id, regulation_id, "action added");
        Ok(created)
    }

    pub fn delete_action(&mut self, id: i64) -> Result<()> {
        let action = self.gateway.load_action(id)?;
        workflow::delete_action(&mut self.gateway, action)?;
        info!(id, "action deleted");
        Ok(())
    }

    pub fn filter_choices(&self) -> Result<FilterChoices> {
        Ok(FilterChoices {
            sources: self.gateway.distinct_values(Facet::Source)?,
            statuses: RegulationStatus::labels(),
            categories: self.gateway.distinct_values(Facet::Category)?,
        })
    }
}

fn rejected(command: &'static str, err: RegTrackerError) -> RegTrackerError {
    warn!(command, error = %err, "command rejected");
    err
}
