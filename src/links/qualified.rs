use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::hash::Hash;

use crate::error::{GraphError, Result};

/// An association where each owner indexes its items by a key unique within
/// that owner. Every item belongs to at most one owner at a time.
#[derive(Debug, Clone)]
pub struct QualifiedLink<O, T> {
    name: &'static str,
    index: HashMap<O, BTreeMap<String, T>>,
    placement: HashMap<T, (O, String)>,
}

impl<O, T> QualifiedLink<O, T>
where
    O: Copy + Eq + Hash + Display,
    T: Copy + Eq + Hash + Display,
{
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            index: HashMap::new(),
            placement: HashMap::new(),
        }
    }

    pub fn get(&self, owner: O, key: &str) -> Option<T> {
        self.index.get(&owner).and_then(|items| items.get(key).copied())
    }

    pub fn owner_of(&self, item: T) -> Option<O> {
        self.placement.get(&item).map(|(owner, _)| *owner)
    }

    pub fn key_of(&self, item: T) -> Option<&str> {
        self.placement.get(&item).map(|(_, key)| key.as_str())
    }

    /// Items of `owner`, ordered by key.
    pub fn items(&self, owner: O) -> Vec<T> {
        self.index
            .get(&owner)
            .map(|items| items.values().copied().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.placement.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placement.is_empty()
    }

    /// Returns `Ok(false)` when `item` is already filed under `key` for `owner`.
    pub fn check_attach(&self, owner: O, key: &str, item: T) -> Result<bool> {
        match self.get(owner, key) {
            Some(existing) if existing == item => return Ok(false),
            Some(_) => {
                return Err(GraphError::DuplicateKey {
                    association: self.name,
                    owner: owner.to_string(),
                    key: key.to_string(),
                })
            }
            None => {}
        }
        if let Some((current, _)) = self.placement.get(&item) {
            return Err(GraphError::DuplicateAssociation {
                association: self.name,
                left: current.to_string(),
                right: item.to_string(),
            });
        }
        Ok(true)
    }

    pub fn attach(&mut self, owner: O, key: impl Into<String>, item: T) -> Result<bool> {
        let key = key.into();
        if !self.check_attach(owner, &key, item)? {
            return Ok(false);
        }
        self.index
            .entry(owner)
            .or_default()
            .insert(key.clone(), item);
        self.placement.insert(item, (owner, key));
        Ok(true)
    }

    /// Returns `Ok(false)` when `item` already belongs to `owner`.
    pub fn check_rekey(&self, item: T, owner: O) -> Result<bool> {
        let Some((current, key)) = self.placement.get(&item) else {
            return Err(GraphError::missing(self.name, item));
        };
        if *current == owner {
            return Ok(false);
        }
        if self.get(owner, key).is_some() {
            return Err(GraphError::DuplicateKey {
                association: self.name,
                owner: owner.to_string(),
                key: key.clone(),
            });
        }
        Ok(true)
    }

    /// Move `item` under `owner`, keeping its key. Returns the previous owner.
    pub fn rekey(&mut self, item: T, owner: O) -> Result<O> {
        let changed = self.check_rekey(item, owner)?;
        let (previous, key) = self
            .detach(item)
            .ok_or_else(|| GraphError::missing(self.name, item))?;
        if changed {
            tracing::debug!("{}: {} moved from {} to {}", self.name, item, previous, owner);
        }
        self.index
            .entry(owner)
            .or_default()
            .insert(key.clone(), item);
        self.placement.insert(item, (owner, key));
        Ok(previous)
    }

    pub fn detach(&mut self, item: T) -> Option<(O, String)> {
        let (owner, key) = self.placement.remove(&item)?;
        if let Some(items) = self.index.get_mut(&owner) {
            items.remove(&key);
            if items.is_empty() {
                self.index.remove(&owner);
            }
        }
        Some((owner, key))
    }

    /// Drop every item of `owner`, which is being deleted.
    pub fn sever_owner(&mut self, owner: O) -> Vec<T> {
        let Some(items) = self.index.remove(&owner) else {
            return Vec::new();
        };
        let items: Vec<T> = items.into_values().collect();
        for item in &items {
            self.placement.remove(item);
        }
        items
    }

    /// Describes every mismatch between the key index and item placement.
    pub fn inconsistencies(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for (owner, items) in &self.index {
            for (key, item) in items {
                match self.placement.get(item) {
                    Some((placed, placed_key)) if placed == owner && placed_key == key => {}
                    _ => problems.push(format!(
                        "{}: {} under {} as '{}' is not placed there",
                        self.name, item, owner, key
                    )),
                }
            }
        }
        for (item, (owner, key)) in &self.placement {
            if self.get(*owner, key) != Some(*item) {
                problems.push(format!(
                    "{}: {} claims {} as '{}' but the index disagrees",
                    self.name, item, owner, key
                ));
            }
        }
        problems
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.placement.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_unique_per_owner() {
        let mut link: QualifiedLink<u32, u32> = QualifiedLink::new("certified by");
        assert_eq!(link.attach(1, "C1", 100), Ok(true));
        assert_eq!(link.attach(1, "C1", 100), Ok(false));

        let err = link.attach(1, "C1", 101).unwrap_err();
        assert!(matches!(err, GraphError::DuplicateKey { .. }));

        // The same key is free under another owner.
        assert_eq!(link.attach(2, "C1", 101), Ok(true));
        assert_eq!(link.len(), 2);
    }

    #[test]
    fn an_item_has_one_owner() {
        let mut link: QualifiedLink<u32, u32> = QualifiedLink::new("certified by");
        link.attach(1, "C1", 100).unwrap();
        let err = link.attach(2, "C2", 100).unwrap_err();
        assert!(matches!(err, GraphError::DuplicateAssociation { .. }));
    }

    #[test]
    fn rekey_moves_the_entry_once() {
        let mut link: QualifiedLink<u32, u32> = QualifiedLink::new("certified by");
        link.attach(1, "C1", 100).unwrap();

        assert_eq!(link.rekey(100, 2), Ok(1));
        assert_eq!(link.get(1, "C1"), None);
        assert_eq!(link.get(2, "C1"), Some(100));
        assert_eq!(link.owner_of(100), Some(2));
        assert_eq!(link.len(), 1);
        assert!(link.inconsistencies().is_empty());
    }

    #[test]
    fn rekey_rejects_a_taken_key() {
        let mut link: QualifiedLink<u32, u32> = QualifiedLink::new("certified by");
        link.attach(1, "C1", 100).unwrap();
        link.attach(2, "C1", 200).unwrap();

        let err = link.rekey(100, 2).unwrap_err();
        assert!(matches!(err, GraphError::DuplicateKey { .. }));
        assert_eq!(link.owner_of(100), Some(1));
    }

    #[test]
    fn sever_owner_releases_items() {
        let mut link: QualifiedLink<u32, u32> = QualifiedLink::new("certified by");
        link.attach(1, "C1", 100).unwrap();
        link.attach(1, "C2", 101).unwrap();

        assert_eq!(link.sever_owner(1), vec![100, 101]);
        assert!(link.is_empty());
    }
}
