use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

use indexmap::IndexSet;

use crate::error::{GraphError, Result};

/// A reflexive association: every member has at most one manager and any
/// number of subordinates.
///
/// A member can never manage itself, directly or through its own
/// subordinates. Who may manage at all is decided by the caller through an
/// eligibility check passed to [`Hierarchy::set_manager`].
#[derive(Debug, Clone)]
pub struct Hierarchy<T> {
    name: &'static str,
    managers: HashMap<T, T>,
    subordinates: HashMap<T, IndexSet<T>>,
}

impl<T> Hierarchy<T>
where
    T: Copy + Eq + Hash + Display,
{
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            managers: HashMap::new(),
            subordinates: HashMap::new(),
        }
    }

    pub fn manager_of(&self, member: T) -> Option<T> {
        self.managers.get(&member).copied()
    }

    pub fn subordinates_of(&self, manager: T) -> Vec<T> {
        self.subordinates
            .get(&manager)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn has_subordinates(&self, manager: T) -> bool {
        self.subordinates.contains_key(&manager)
    }

    /// Whether `member` sits somewhere below `ancestor`.
    pub fn is_below(&self, member: T, ancestor: T) -> bool {
        let mut current = self.manager_of(member);
        while let Some(manager) = current {
            if manager == ancestor {
                return true;
            }
            current = self.manager_of(manager);
        }
        false
    }

    /// Returns `Ok(false)` when `manager` already manages `member`.
    pub fn check_set_manager(
        &self,
        member: T,
        manager: T,
        eligibility: impl FnOnce(T) -> Result<()>,
    ) -> Result<bool> {
        if member == manager || self.is_below(manager, member) {
            return Err(GraphError::SelfReference {
                association: self.name,
                id: member.to_string(),
            });
        }
        if self.manager_of(member) == Some(manager) {
            return Ok(false);
        }
        eligibility(manager)?;
        Ok(true)
    }

    /// Put `member` under `manager`, replacing any previous manager.
    pub fn set_manager(
        &mut self,
        member: T,
        manager: T,
        eligibility: impl FnOnce(T) -> Result<()>,
    ) -> Result<bool> {
        if !self.check_set_manager(member, manager, eligibility)? {
            return Ok(false);
        }
        self.clear_manager(member);
        self.managers.insert(member, manager);
        self.subordinates.entry(manager).or_default().insert(member);
        Ok(true)
    }

    /// Symmetric entry point of [`Hierarchy::set_manager`].
    pub fn add_subordinate(
        &mut self,
        manager: T,
        member: T,
        eligibility: impl FnOnce(T) -> Result<()>,
    ) -> Result<bool> {
        self.set_manager(member, manager, eligibility)
    }

    /// Detach `member` from its manager. The manager end is optional, so this
    /// never violates a minimum.
    pub fn clear_manager(&mut self, member: T) -> Option<T> {
        let manager = self.managers.remove(&member)?;
        if let Some(members) = self.subordinates.get_mut(&manager) {
            members.shift_remove(&member);
            if members.is_empty() {
                self.subordinates.remove(&manager);
            }
        }
        Some(manager)
    }

    pub fn remove_subordinate(&mut self, manager: T, member: T) -> bool {
        if self.manager_of(member) != Some(manager) {
            return false;
        }
        self.clear_manager(member);
        true
    }

    /// Remove `member` from both ends. Returns its former subordinates, which
    /// are left without a manager.
    pub fn sever(&mut self, member: T) -> Vec<T> {
        self.clear_manager(member);
        let released = self
            .subordinates
            .remove(&member)
            .map(|members| members.into_iter().collect::<Vec<_>>())
            .unwrap_or_default();
        for subordinate in &released {
            self.managers.remove(subordinate);
        }
        released
    }

    pub fn pairs(&self) -> impl Iterator<Item = (T, T)> + '_ {
        self.managers.iter().map(|(member, manager)| (*member, *manager))
    }

    /// Describes every disagreement between the manager and subordinate maps.
    pub fn inconsistencies(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for (member, manager) in &self.managers {
            if member == manager {
                problems.push(format!("{}: {} manages itself", self.name, member));
            }
            let listed = self
                .subordinates
                .get(manager)
                .is_some_and(|members| members.contains(member));
            if !listed {
                problems.push(format!(
                    "{}: {} is not listed under {}",
                    self.name, member, manager
                ));
            }
        }
        for (manager, members) in &self.subordinates {
            for member in members {
                if self.manager_of(*member) != Some(*manager) {
                    problems.push(format!(
                        "{}: {} lists {} which has another manager",
                        self.name, manager, member
                    ));
                }
            }
        }
        problems
    }

    pub fn clear(&mut self) {
        self.managers.clear();
        self.subordinates.clear();
    }
}
