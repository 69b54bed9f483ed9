use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{CustomerId, PersonId, WorkerId};

/// The identity behind every customer and worker.
///
/// A person can be a customer, a worker, both, or neither. The two roles are
/// independent objects with their own extents; the person only holds a handle
/// to each. Deleting a person deletes both roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub birth_date: NaiveDate,
    /// Set while the person carries the customer role.
    pub customer: Option<CustomerId>,
    /// Set while the person carries the worker role.
    pub worker: Option<WorkerId>,
    pub created_at: DateTime<Utc>,
}

impl Person {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Input for creating a new person.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePersonInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub birth_date: NaiveDate,
}
