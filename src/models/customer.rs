use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CustomerId, PersonId};

/// The customer role of a person.
///
/// Owns the status history recorded against the customer's appointments;
/// removing the role removes that history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub person: PersonId,
    pub phone: String,
    pub registered_at: DateTime<Utc>,
}

/// Input for attaching the customer role to a person.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCustomerInput {
    pub phone: String,
}
