use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AppointmentId, AppointmentStatus, CustomerId, HistoryOfStatusId};

/// An append-only record of an appointment status, kept for a customer.
///
/// Every record belongs to exactly one customer (which owns it) and refers to
/// exactly one appointment. Either end may be moved explicitly, but a record
/// is never left without one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryOfStatus {
    pub id: HistoryOfStatusId,
    pub status: AppointmentStatus,
    pub recorded_at: DateTime<Utc>,
}

/// Input for recording a status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordStatusInput {
    pub customer: CustomerId,
    pub appointment: AppointmentId,
    pub status: AppointmentStatus,
}
