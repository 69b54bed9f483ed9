use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AppointmentId, MasterId, ProvidedServiceId, ReceptionistId, ServiceId};

/// A visit booked at the salon.
///
/// An appointment owns the services provided during it: each provided service
/// belongs to exactly one appointment and is deleted with it. A receptionist
/// may be assigned to handle the booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub scheduled_for: DateTime<Utc>,
    /// The most recently recorded status.
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

/// The lifecycle state of an appointment.
///
/// - `Booked`: Created, not yet confirmed by the customer
/// - `Confirmed`: The customer confirmed they will come
/// - `Completed`: All services were provided
/// - `Cancelled`: Called off before the visit
/// - `NoShow`: The customer did not come
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Booked,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Booked => "booked",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no_show",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "booked" => Some(Self::Booked),
            "confirmed" => Some(Self::Confirmed),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            "no_show" => Some(Self::NoShow),
            _ => None,
        }
    }
}

/// One service performed during an appointment.
///
/// Linked to exactly one appointment, exactly one service, and to the masters
/// performing it. The number of masters is bounded by the service variant and
/// every master must specialize in the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidedService {
    pub id: ProvidedServiceId,
    /// Price charged in cents, copied from the service when booked.
    pub price: u32,
    pub notes: Option<String>,
}

/// Input for creating a new appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentInput {
    pub scheduled_for: DateTime<Utc>,
    /// Receptionist handling the booking, if any.
    pub receptionist: Option<ReceptionistId>,
}

/// Input for booking a service into an appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProvidedServiceInput {
    pub appointment: AppointmentId,
    pub service: ServiceId,
    pub masters: Vec<MasterId>,
    pub notes: Option<String>,
}
