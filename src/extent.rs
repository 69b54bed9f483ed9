//! Per-type registries of live entities.

use std::fmt::{Debug, Display};
use std::hash::Hash;

use indexmap::{IndexMap, IndexSet};

use crate::validation::{Validate, Violations};

/// Anything that can be stored in an [`Extent`].
pub trait Entity: Clone + Validate {
    type Id: Copy + Eq + Hash + Display + Debug;
    const KIND: &'static str;

    fn id(&self) -> Self::Id;
}

/// The live objects of one entity type, and which of them are admitted.
///
/// An object that failed validation still exists (it can be looked up and
/// linked) but is not admitted, so it does not appear in [`Extent::snapshot`].
/// Admission order is preserved.
#[derive(Debug, Clone)]
pub struct Extent<T: Entity> {
    live: IndexMap<T::Id, T>,
    admitted: IndexSet<T::Id>,
}

impl<T: Entity> Default for Extent<T> {
    fn default() -> Self {
        Self {
            live: IndexMap::new(),
            admitted: IndexSet::new(),
        }
    }
}

impl<T: Entity> Extent<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `entity` and store it, admitting it only if valid.
    ///
    /// `Salon` runs the validator itself so it can apply its admission policy
    /// before any write, then hands the result to [`Extent::store`].
    pub fn admit(&mut self, entity: T) -> bool {
        let violations = entity.validate();
        self.store(entity, &violations)
    }

    /// Store an entity whose validation already ran, replacing any previous
    /// version with the same id.
    pub(crate) fn store(&mut self, entity: T, violations: &Violations) -> bool {
        let id = entity.id();
        self.live.insert(id, entity);
        if violations.is_empty() {
            self.admitted.insert(id);
            tracing::debug!("Admitted {} {}", T::KIND, id);
            true
        } else {
            self.admitted.shift_remove(&id);
            tracing::warn!("{} {} not admitted: {}", T::KIND, id, violations);
            false
        }
    }

    /// Re-run validation after a field change and update admission.
    pub fn refresh(&mut self, id: T::Id) -> bool {
        let Some(entity) = self.live.get(&id) else {
            return false;
        };
        let violations = entity.validate();
        if violations.is_empty() {
            self.admitted.insert(id);
            true
        } else {
            if self.admitted.shift_remove(&id) {
                tracing::warn!("{} {} no longer admitted: {}", T::KIND, id, violations);
            }
            false
        }
    }

    /// Remove an entity entirely, admitted or not.
    pub fn evict(&mut self, id: T::Id) -> Option<T> {
        self.admitted.shift_remove(&id);
        let removed = self.live.shift_remove(&id);
        if removed.is_some() {
            tracing::debug!("Evicted {} {}", T::KIND, id);
        }
        removed
    }

    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.live.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: T::Id) -> Option<&mut T> {
        self.live.get_mut(&id)
    }

    pub fn is_live(&self, id: T::Id) -> bool {
        self.live.contains_key(&id)
    }

    pub fn is_admitted(&self, id: T::Id) -> bool {
        self.admitted.contains(&id)
    }

    /// Copies of the admitted entities, in admission order.
    pub fn snapshot(&self) -> Vec<T> {
        self.admitted
            .iter()
            .filter_map(|id| self.live.get(id).cloned())
            .collect()
    }

    pub fn admitted_ids(&self) -> Vec<T::Id> {
        self.admitted.iter().copied().collect()
    }

    pub fn live_ids(&self) -> Vec<T::Id> {
        self.live.keys().copied().collect()
    }

    /// Number of admitted entities.
    pub fn len(&self) -> usize {
        self.admitted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.admitted.is_empty()
    }

    pub fn clear(&mut self) {
        self.live.clear();
        self.admitted.clear();
    }
}
