use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

use indexmap::IndexSet;

use super::Multiplicity;
use crate::error::{GraphError, Result};

/// A bidirectional association between sources of type `S` and targets of
/// type `T`.
///
/// `per_source` bounds how many targets one source may hold and `per_target`
/// bounds how many sources one target may hold. Individual sources can carry
/// their own `per_source` bounds (see [`Link::set_bounds`]).
///
/// Minimums are guarded on removal: [`Link::attach`] never lowers a count, so
/// an end that starts empty may be filled incrementally, but once populated it
/// cannot be detached below its minimum. Deletions use the `sever_*` family,
/// which skips the minimum check because the entity itself is going away.
#[derive(Debug, Clone)]
pub struct Link<S, T> {
    name: &'static str,
    per_source: Multiplicity,
    per_target: Multiplicity,
    overrides: HashMap<S, Multiplicity>,
    forward: HashMap<S, IndexSet<T>>,
    backward: HashMap<T, IndexSet<S>>,
}

impl<S, T> Link<S, T>
where
    S: Copy + Eq + Hash + Display,
    T: Copy + Eq + Hash + Display,
{
    pub fn new(name: &'static str, per_source: Multiplicity, per_target: Multiplicity) -> Self {
        Self {
            name,
            per_source,
            per_target,
            overrides: HashMap::new(),
            forward: HashMap::new(),
            backward: HashMap::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn per_target(&self) -> Multiplicity {
        self.per_target
    }

    /// Bounds applying to the targets of `source`.
    pub fn bounds_for(&self, source: S) -> Multiplicity {
        self.overrides
            .get(&source)
            .copied()
            .unwrap_or(self.per_source)
    }

    pub fn set_bounds(&mut self, source: S, bounds: Multiplicity) {
        self.overrides.insert(source, bounds);
    }

    pub fn contains(&self, source: S, target: T) -> bool {
        self.forward
            .get(&source)
            .is_some_and(|targets| targets.contains(&target))
    }

    pub fn targets(&self, source: S) -> Vec<T> {
        self.forward
            .get(&source)
            .map(|targets| targets.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn sources(&self, target: T) -> Vec<S> {
        self.backward
            .get(&target)
            .map(|sources| sources.iter().copied().collect())
            .unwrap_or_default()
    }

    /// The single target of a source on a `0..1` or `1` end.
    pub fn target(&self, source: S) -> Option<T> {
        self.forward
            .get(&source)
            .and_then(|targets| targets.first().copied())
    }

    pub fn target_count(&self, source: S) -> usize {
        self.forward.get(&source).map_or(0, IndexSet::len)
    }

    pub fn source_count(&self, target: T) -> usize {
        self.backward.get(&target).map_or(0, IndexSet::len)
    }

    /// Every linked pair, in source insertion order.
    pub fn pairs(&self) -> impl Iterator<Item = (S, T)> + '_ {
        self.forward
            .iter()
            .flat_map(|(source, targets)| targets.iter().map(move |target| (*source, *target)))
    }

    pub fn check_attach(&self, source: S, target: T) -> Result<()> {
        if self.contains(source, target) {
            return Err(GraphError::DuplicateAssociation {
                association: self.name,
                left: source.to_string(),
                right: target.to_string(),
            });
        }
        self.check_room(source, target)
    }

    fn check_room(&self, source: S, target: T) -> Result<()> {
        let bounds = self.bounds_for(source);
        if !bounds.has_room(self.target_count(source)) {
            return Err(GraphError::CapacityExceeded {
                association: self.name,
                end: source.to_string(),
                bound: bounds,
            });
        }
        if !self.per_target.has_room(self.source_count(target)) {
            return Err(GraphError::CapacityExceeded {
                association: self.name,
                end: target.to_string(),
                bound: self.per_target,
            });
        }
        Ok(())
    }

    /// Link `source` and `target`, rejecting an existing pair.
    pub fn attach(&mut self, source: S, target: T) -> Result<()> {
        self.check_attach(source, target)?;
        self.insert(source, target);
        Ok(())
    }

    /// Link `source` and `target` unless they already are. Returns whether a
    /// new edge was created.
    pub fn ensure(&mut self, source: S, target: T) -> Result<bool> {
        if self.contains(source, target) {
            return Ok(false);
        }
        self.check_room(source, target)?;
        self.insert(source, target);
        Ok(true)
    }

    /// Returns `Ok(false)` when the pair is not linked.
    pub fn check_detach(&self, source: S, target: T) -> Result<bool> {
        if !self.contains(source, target) {
            return Ok(false);
        }
        let bounds = self.bounds_for(source);
        if !bounds.can_release(self.target_count(source)) {
            return Err(GraphError::MultiplicityViolation {
                association: self.name,
                end: source.to_string(),
                bound: bounds,
            });
        }
        if !self.per_target.can_release(self.source_count(target)) {
            return Err(GraphError::MultiplicityViolation {
                association: self.name,
                end: target.to_string(),
                bound: self.per_target,
            });
        }
        Ok(true)
    }

    pub fn detach(&mut self, source: S, target: T) -> Result<bool> {
        if !self.check_detach(source, target)? {
            return Ok(false);
        }
        self.sever(source, target);
        Ok(true)
    }

    /// Check that a single-valued source can move from its current target to
    /// `target`. Returns `Ok(false)` when it is already there.
    pub fn check_relink(&self, source: S, target: T) -> Result<bool> {
        let Some(current) = self.target(source) else {
            self.check_room(source, target)?;
            return Ok(true);
        };
        if current == target {
            return Ok(false);
        }
        if !self.per_target.can_release(self.source_count(current)) {
            return Err(GraphError::MultiplicityViolation {
                association: self.name,
                end: current.to_string(),
                bound: self.per_target,
            });
        }
        if !self.per_target.has_room(self.source_count(target)) {
            return Err(GraphError::CapacityExceeded {
                association: self.name,
                end: target.to_string(),
                bound: self.per_target,
            });
        }
        Ok(true)
    }

    /// Move a single-valued source to a new target in one step. Returns the
    /// previous target.
    pub fn relink(&mut self, source: S, target: T) -> Result<Option<T>> {
        let previous = self.target(source);
        if !self.check_relink(source, target)? {
            return Ok(previous);
        }
        if let Some(previous) = previous {
            self.sever(source, previous);
        }
        self.insert(source, target);
        Ok(previous)
    }

    /// Remove an edge without checking minimums. Returns whether it existed.
    pub fn sever(&mut self, source: S, target: T) -> bool {
        let removed = self
            .forward
            .get_mut(&source)
            .is_some_and(|targets| targets.shift_remove(&target));
        if !removed {
            return false;
        }
        if self.forward.get(&source).is_some_and(IndexSet::is_empty) {
            self.forward.remove(&source);
        }
        if let Some(sources) = self.backward.get_mut(&target) {
            sources.shift_remove(&source);
            if sources.is_empty() {
                self.backward.remove(&target);
            }
        }
        true
    }

    /// Drop every edge of `source`, which is being deleted.
    pub fn sever_source(&mut self, source: S) -> Vec<T> {
        let targets = self.targets(source);
        for target in &targets {
            self.sever(source, *target);
        }
        self.overrides.remove(&source);
        targets
    }

    /// Drop every edge of `target`, which is being deleted.
    pub fn sever_target(&mut self, target: T) -> Vec<S> {
        let sources = self.sources(target);
        for source in &sources {
            self.sever(*source, target);
        }
        sources
    }

    /// Describes every place where the two directions disagree or a
    /// populated end is out of bounds. Empty when the link is healthy.
    pub fn inconsistencies(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for (source, target) in self.pairs() {
            let mirrored = self
                .backward
                .get(&target)
                .is_some_and(|sources| sources.contains(&source));
            if !mirrored {
                problems.push(format!(
                    "{}: {} -> {} has no reverse edge",
                    self.name, source, target
                ));
            }
        }
        for (target, sources) in &self.backward {
            for source in sources {
                if !self.contains(*source, *target) {
                    problems.push(format!(
                        "{}: {} <- {} has no forward edge",
                        self.name, target, source
                    ));
                }
            }
            if !self.per_target.admits(sources.len()) {
                problems.push(format!(
                    "{}: {} holds {} partners outside {}",
                    self.name,
                    target,
                    sources.len(),
                    self.per_target
                ));
            }
        }
        for (source, targets) in &self.forward {
            let bounds = self.bounds_for(*source);
            if !bounds.admits(targets.len()) {
                problems.push(format!(
                    "{}: {} holds {} partners outside {}",
                    self.name,
                    source,
                    targets.len(),
                    bounds
                ));
            }
        }
        problems
    }

    pub fn clear(&mut self) {
        self.overrides.clear();
        self.forward.clear();
        self.backward.clear();
    }

    fn insert(&mut self, source: S, target: T) {
        self.forward.entry(source).or_default().insert(target);
        self.backward.entry(target).or_default().insert(source);
    }
}
