//! Domain models for the salon.
//!
//! # Core Concepts
//!
//! ## Identity and roles
//!
//! - [`Person`]: The shared identity. Carries a [`Customer`] role, a [`Worker`]
//!   role, both, or neither.
//! - [`Worker`]: Holds at most one [`Specialization`] at a time, either a
//!   [`Master`] or a [`Receptionist`].
//! - [`Certification`]: Owned by a master, keyed by its number.
//!
//! ## Menu
//!
//! - [`Service`]: Optionally specialized by a [`TwoHandsService`] or a
//!   [`FourHandsService`], which changes how many masters a booking needs.
//! - [`Material`], [`Promotion`]: Linked to one or more services.
//!
//! ## Bookings
//!
//! - [`Appointment`]: Owns its [`ProvidedService`]s.
//! - [`HistoryOfStatus`]: Status records owned by a customer, each pointing at
//!   one appointment.
//!
//! Models hold data and immutable back-references only. Every association
//! between them is stored by [`crate::salon::Salon`].

mod appointment;
mod catalog;
mod certification;
mod customer;
mod history;
mod ids;
mod person;
mod service;
mod worker;

pub use appointment::*;
pub use catalog::*;
pub use certification::*;
pub use customer::*;
pub use history::*;
pub use ids::*;
pub use person::*;
pub use service::*;
pub use worker::*;

use crate::extent::Entity;

macro_rules! entity {
    ($model:ty, $id:ty, $kind:literal) => {
        impl Entity for $model {
            type Id = $id;
            const KIND: &'static str = $kind;

            fn id(&self) -> $id {
                self.id
            }
        }
    };
}

entity!(Person, PersonId, "person");
entity!(Customer, CustomerId, "customer");
entity!(Worker, WorkerId, "worker");
entity!(Master, MasterId, "master");
entity!(Receptionist, ReceptionistId, "receptionist");
entity!(Certification, CertificationId, "certification");
entity!(Service, ServiceId, "service");
entity!(TwoHandsService, TwoHandsServiceId, "two-hands service");
entity!(FourHandsService, FourHandsServiceId, "four-hands service");
entity!(Material, MaterialId, "material");
entity!(Promotion, PromotionId, "promotion");
entity!(ProvidedService, ProvidedServiceId, "provided service");
entity!(Appointment, AppointmentId, "appointment");
entity!(HistoryOfStatus, HistoryOfStatusId, "status history");
