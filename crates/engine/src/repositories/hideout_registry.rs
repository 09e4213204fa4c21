//! Registry of every hideout record loaded this session.

use std::collections::HashMap;

use hideout_domain::{Hideout, HideoutError, HideoutId};

/// Durable id -> record mapping. Filled once per session from the save (or
/// from world generation); a second registration of the same id means the
/// persisted data is corrupt.
#[derive(Debug, Default)]
pub struct HideoutRegistry {
    hideouts: HashMap<HideoutId, Hideout>,
}

impl HideoutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, hideout: Hideout) -> Result<(), HideoutError> {
        if self.contains(hideout.id()) {
            return Err(HideoutError::DuplicateRegistration(hideout.id().clone()));
        }
        self.hideouts.insert(hideout.id().clone(), hideout);
        Ok(())
    }

    pub fn lookup(&self, id: &HideoutId) -> Result<&Hideout, HideoutError> {
        self.hideouts
            .get(id)
            .ok_or_else(|| HideoutError::NotFound(id.clone()))
    }

    pub fn lookup_mut(&mut self, id: &HideoutId) -> Result<&mut Hideout, HideoutError> {
        self.hideouts
            .get_mut(id)
            .ok_or_else(|| HideoutError::NotFound(id.clone()))
    }

    pub fn contains(&self, id: &HideoutId) -> bool {
        self.hideouts.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.hideouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hideouts.is_empty()
    }

    /// All records, ordered by id.
    pub fn to_sorted_vec(&self) -> Vec<Hideout> {
        let mut hideouts: Vec<Hideout> = self.hideouts.values().cloned().collect();
        hideouts.sort_by(|a, b| a.id().cmp(b.id()));
        hideouts
    }
}
