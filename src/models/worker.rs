use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{MasterId, PersonId, ReceptionistId, ServiceId, WorkerId};

/// The worker role of a person.
///
/// A worker carries at most one specialization at a time. The tag can only be
/// changed through the role operations on [`crate::salon::Salon`], which tear
/// down the old role object before the new one exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    pub id: WorkerId,
    pub person: PersonId,
    /// Monthly salary in cents.
    pub salary: u32,
    pub hired_on: NaiveDate,
    pub specialization: Specialization,
}

/// Which specialized role a worker currently holds.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Specialization {
    #[default]
    Unassigned,
    Master(MasterId),
    Receptionist(ReceptionistId),
}

impl Specialization {
    pub fn kind(&self) -> Option<RoleKind> {
        match self {
            Self::Unassigned => None,
            Self::Master(_) => Some(RoleKind::Master),
            Self::Receptionist(_) => Some(RoleKind::Receptionist),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    Master,
    Receptionist,
}

impl RoleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Master => "master",
            Self::Receptionist => "receptionist",
        }
    }
}

/// A worker who performs services.
///
/// Masters specialize in at least one service, may hold certifications
/// (deleted with the master), and take part in the mentorship hierarchy:
/// experienced ("top") masters may train others.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Master {
    pub id: MasterId,
    pub worker: WorkerId,
    pub experience_years: u32,
}

/// A worker who handles appointments at the front desk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receptionist {
    pub id: ReceptionistId,
    pub worker: WorkerId,
    pub languages: Vec<String>,
}

/// Input for attaching the worker role to a person.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWorkerInput {
    /// Monthly salary in cents.
    pub salary: u32,
    pub hired_on: NaiveDate,
}

/// Input for giving a worker a specialized role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoleInput {
    Master {
        experience_years: u32,
        /// Services the master specializes in. Must not be empty.
        services: Vec<ServiceId>,
    },
    Receptionist {
        languages: Vec<String>,
    },
}

impl RoleInput {
    pub fn kind(&self) -> RoleKind {
        match self {
            Self::Master { .. } => RoleKind::Master,
            Self::Receptionist { .. } => RoleKind::Receptionist,
        }
    }
}

/// Handle to the role object created by a role operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleHandle {
    Master(MasterId),
    Receptionist(ReceptionistId),
}

impl From<RoleHandle> for Specialization {
    fn from(handle: RoleHandle) -> Self {
        match handle {
            RoleHandle::Master(id) => Self::Master(id),
            RoleHandle::Receptionist(id) => Self::Receptionist(id),
        }
    }
}
