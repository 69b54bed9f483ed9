//! Association primitives.
//!
//! - [`Link`]: a bidirectional edge store with multiplicity bounds on both ends.
//! - [`QualifiedLink`]: an owner-scoped keyed index (one owner per item).
//! - [`Hierarchy`]: a reflexive manager/subordinate association.
//!
//! Each primitive keeps both directions of its relationship in one place, so
//! the two sides cannot disagree. Callers refer to entities only by their
//! identifiers.

mod hierarchy;
mod link;
mod qualified;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use hierarchy::*;
pub use link::*;
pub use qualified::*;

/// Inclusive bounds on how many partners one end of an association may have.
///
/// `max: None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Multiplicity {
    pub min: usize,
    pub max: Option<usize>,
}

impl Multiplicity {
    /// Exactly one.
    pub const ONE: Self = Self::range(1, 1);
    /// `0..1`
    pub const OPTIONAL: Self = Self::range(0, 1);
    /// `0..*`
    pub const MANY: Self = Self {
        min: 0,
        max: None,
    };
    /// `1..*`
    pub const AT_LEAST_ONE: Self = Self {
        min: 1,
        max: None,
    };

    pub const fn range(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    pub fn admits(&self, count: usize) -> bool {
        count >= self.min && self.max.is_none_or(|max| count <= max)
    }

    /// Whether one more partner fits on an end currently holding `count`.
    pub fn has_room(&self, count: usize) -> bool {
        self.max.is_none_or(|max| count < max)
    }

    /// Whether one partner may be removed from an end currently holding `count`.
    pub fn can_release(&self, count: usize) -> bool {
        count > self.min
    }
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "{}", max),
            Some(max) => write!(f, "{}..{}", self.min, max),
            None => write!(f, "{}..*", self.min),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_uml_notation() {
        assert_eq!(Multiplicity::ONE.to_string(), "1");
        assert_eq!(Multiplicity::OPTIONAL.to_string(), "0..1");
        assert_eq!(Multiplicity::MANY.to_string(), "0..*");
        assert_eq!(Multiplicity::range(1, 2).to_string(), "1..2");
    }

    #[test]
    fn bounds_checks() {
        let pair = Multiplicity::range(1, 2);
        assert!(!pair.admits(0));
        assert!(pair.admits(2));
        assert!(pair.has_room(1));
        assert!(!pair.has_room(2));
        assert!(pair.can_release(2));
        assert!(!pair.can_release(1));
        assert!(Multiplicity::MANY.has_room(10_000));
    }
}
