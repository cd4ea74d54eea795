use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;

use super::{Facet, Gateway};
use crate::entity::{Action, NewAction, NewLink, NewRegulation, Regulation, RegulationLink};
use crate::error::{RegTrackerError, Result};

/// Volatile gateway backed by id-keyed tables.
#[derive(Debug, Default)]
pub struct MemoryStore {
    regulations: BTreeMap<i64, Regulation>,
    links: BTreeMap<i64, RegulationLink>,
    actions: BTreeMap<i64, Action>,
    next_regulation_id: i64,
    next_link_id: i64,
    next_action_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_regulation(&self, id: i64) -> Result<()> {
        if self.regulations.contains_key(&id) {
            Ok(())
        } else {
            Err(RegTrackerError::not_found("Regulation", id))
        }
    }
}

impl Gateway for MemoryStore {
    fn load_all_regulations(&self) -> Result<Vec<Regulation>> {
        Ok(self.regulations.values().cloned().collect())
    }

    fn load_regulation(&self, id: i64) -> Result<Regulation> {
        self.regulations
            .get(&id)
            .cloned()
            .ok_or_else(|| RegTrackerError::not_found("Regulation", id))
    }

    fn load_action(&self, id: i64) -> Result<Action> {
        self.actions
            .get(&id)
            .cloned()
            .ok_or_else(|| RegTrackerError::not_found("Action", id))
    }

    fn links_for(&self, regulation_id: i64) -> Result<Vec<RegulationLink>> {
        Ok(self
            .links
            .values()
            .filter(|l| l.regulation_id == regulation_id)
            .cloned()
            .collect())
    }

    fn actions_for(&self, regulation_id: i64) -> Result<Vec<Action>> {
        Ok(self
            .actions
            .values()
            .filter(|a| a.regulation_id == regulation_id)
            .cloned()
            .collect())
    }

    fn insert_regulation(&mut self, new: NewRegulation) -> Result<Regulation> {
        let id = next_id(&mut self.next_regulation_id);
        let regulation = new.into_regulation(id, Utc::now());
        self.regulations.insert(id, regulation.clone());
        Ok(regulation)
    }

    fn save_regulation(&mut self, regulation: &Regulation) -> Result<Regulation> {
        let slot = self
            .regulations
            .get_mut(&regulation.id)
            .ok_or_else(|| RegTrackerError::not_found("Regulation", regulation.id))?;
        *slot = regulation.clone();
        Ok(regulation.clone())
    }

    fn insert_link(&mut self, new: NewLink) -> Result<RegulationLink> {
        self.ensure_regulation(new.regulation_id)?;
        let id = next_id(&mut self.next_link_id);
        let link = new.into_link(id);
        self.links.insert(id, link.clone());
        Ok(link)
    }

    fn insert_action(&mut self, new: NewAction) -> Result<Action> {
        new.check_completion()?;
        self.ensure_regulation(new.regulation_id)?;
        let id = next_id(&mut self.next_action_id);
        let action = new.into_action(id);
        self.actions.insert(id, action.clone());
        Ok(action)
    }

    fn save_action(&mut self, action: &Action) -> Result<Action> {
        action.check_completion()?;
        self.ensure_regulation(action.regulation_id)?;
        let slot = self
            .actions
            .get_mut(&action.id)
            .ok_or_else(|| RegTrackerError::not_found("Action", action.id))?;
        *slot = action.clone();
        Ok(action.clone())
    }

    fn delete_action(&mut self, id: i64) -> Result<()> {
        self.actions
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RegTrackerError::not_found("Action", id))
    }

    fn delete_regulation(&mut self, id: i64) -> Result<()> {
        self.regulations
            .remove(&id)
            .ok_or_else(|| RegTrackerError::not_found("Regulation", id))?;
        self.links.retain(|_, l| l.regulation_id != id);
        self.actions.retain(|_, a| a.regulation_id != id);
        Ok(())
    }

    fn distinct_values(&self, facet: Facet) -> Result<Vec<String>> {
        let values: BTreeSet<String> = self
            .regulations
            .values()
            .filter_map(|r| facet.value_of(r))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect();
        Ok(values.into_iter().collect())
    }
}
