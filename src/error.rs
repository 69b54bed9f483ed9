use thiserror::Error;

use crate::links::Multiplicity;
use crate::validation::Violations;

/// Every way a graph operation can be refused.
///
/// A returned error always means the graph was left exactly as it was before
/// the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("invalid reference: {kind} {id} is not a live entity")]
    InvalidReference { kind: &'static str, id: String },

    #[error("{association}: {left} is already linked to {right}")]
    DuplicateAssociation {
        association: &'static str,
        left: String,
        right: String,
    },

    #[error("{association}: key '{key}' is already taken under {owner}")]
    DuplicateKey {
        association: &'static str,
        owner: String,
        key: String,
    },

    #[error("{association}: {end} already holds the maximum allowed by {bound}")]
    CapacityExceeded {
        association: &'static str,
        end: String,
        bound: Multiplicity,
    },

    #[error("{association}: {end} would fall below the minimum of {bound}")]
    MultiplicityViolation {
        association: &'static str,
        end: String,
        bound: Multiplicity,
    },

    #[error("{association}: {id} cannot be related to itself")]
    SelfReference { association: &'static str, id: String },

    #[error("{manager} cannot manage other masters: {reason}")]
    IneligibleManager { manager: String, reason: String },

    #[error("{id} already carries a {role} role")]
    RoleConflict { id: String, role: &'static str },

    #[error("role of worker {worker} cannot be torn down: {reason}")]
    UnsafeRoleChange { worker: String, reason: String },

    #[error("{kind} failed validation: {violations}")]
    ValidationFailed {
        kind: &'static str,
        violations: Violations,
    },

    #[error("master {master} does not specialize in service {service}")]
    SpecializationRequired { master: String, service: String },
}

impl GraphError {
    pub(crate) fn missing(kind: &'static str, id: impl ToString) -> Self {
        Self::InvalidReference {
            kind,
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;
