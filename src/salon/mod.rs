//! The salon object graph.
//!
//! [`Salon`] owns every extent and every association. It is the only place
//! where the graph is mutated, and each public operation either completes or
//! returns an error with the graph untouched: all checks run before the first
//! write.
//!
//! Operations are grouped by area:
//!
//! - `people`: persons and their independent customer/worker roles
//! - `workers`: exclusive worker roles, mentorship, certifications
//! - `services`: services, variants, specializations, materials, promotions
//! - `appointments`: appointments, provided services, status history

mod appointments;
mod people;
mod services;
mod workers;

pub use people::UpdatePersonInput;

use serde::Serialize;

use crate::config::{AdmissionPolicy, SalonConfig};
use crate::error::{GraphError, Result};
use crate::extent::{Entity, Extent};
use crate::links::{Hierarchy, Link, Multiplicity, QualifiedLink};
use crate::models::*;
use crate::validation::Violations;

/// Number of admitted entities per extent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtentSummary {
    pub persons: usize,
    pub customers: usize,
    pub workers: usize,
    pub masters: usize,
    pub receptionists: usize,
    pub certifications: usize,
    pub services: usize,
    pub two_hands_services: usize,
    pub four_hands_services: usize,
    pub materials: usize,
    pub promotions: usize,
    pub provided_services: usize,
    pub appointments: usize,
    pub histories: usize,
}

/// A master with its trainees, used for mentorship tree output.
#[derive(Debug, Clone, Serialize)]
pub struct MentorNode {
    pub master: MasterId,
    pub name: String,
    pub experience_years: u32,
    pub trainees: Vec<MentorNode>,
}

#[derive(Debug, Clone)]
pub struct Salon {
    config: SalonConfig,

    persons: Extent<Person>,
    customers: Extent<Customer>,
    workers: Extent<Worker>,
    masters: Extent<Master>,
    receptionists: Extent<Receptionist>,
    certifications: Extent<Certification>,
    services: Extent<Service>,
    two_hands_services: Extent<TwoHandsService>,
    four_hands_services: Extent<FourHandsService>,
    materials: Extent<Material>,
    promotions: Extent<Promotion>,
    provided_services: Extent<ProvidedService>,
    appointments: Extent<Appointment>,
    histories: Extent<HistoryOfStatus>,

    certified: QualifiedLink<MasterId, CertificationId>,
    mentorship: Hierarchy<MasterId>,
    specializations: Link<MasterId, ServiceId>,
    service_materials: Link<MaterialId, ServiceId>,
    service_promotions: Link<PromotionId, ServiceId>,
    bookings: Link<ProvidedServiceId, AppointmentId>,
    rendered: Link<ProvidedServiceId, ServiceId>,
    performers: Link<ProvidedServiceId, MasterId>,
    reception: Link<AppointmentId, ReceptionistId>,
    customer_history: Link<HistoryOfStatusId, CustomerId>,
    appointment_history: Link<HistoryOfStatusId, AppointmentId>,
}

impl Default for Salon {
    fn default() -> Self {
        Self::new(SalonConfig::default())
    }
}

impl Salon {
    pub fn new(config: SalonConfig) -> Self {
        Self {
            config,
            persons: Extent::new(),
            customers: Extent::new(),
            workers: Extent::new(),
            masters: Extent::new(),
            receptionists: Extent::new(),
            certifications: Extent::new(),
            services: Extent::new(),
            two_hands_services: Extent::new(),
            four_hands_services: Extent::new(),
            materials: Extent::new(),
            promotions: Extent::new(),
            provided_services: Extent::new(),
            appointments: Extent::new(),
            histories: Extent::new(),
            certified: QualifiedLink::new("certification"),
            mentorship: Hierarchy::new("mentorship"),
            specializations: Link::new(
                "specialization",
                Multiplicity::AT_LEAST_ONE,
                Multiplicity::AT_LEAST_ONE,
            ),
            service_materials: Link::new(
                "material usage",
                Multiplicity::AT_LEAST_ONE,
                Multiplicity::MANY,
            ),
            service_promotions: Link::new(
                "promotion coverage",
                Multiplicity::AT_LEAST_ONE,
                Multiplicity::MANY,
            ),
            bookings: Link::new("booking", Multiplicity::ONE, Multiplicity::MANY),
            rendered: Link::new("rendered service", Multiplicity::ONE, Multiplicity::MANY),
            performers: Link::new("performer", Multiplicity::ONE, Multiplicity::MANY),
            reception: Link::new("reception", Multiplicity::OPTIONAL, Multiplicity::MANY),
            customer_history: Link::new("customer history", Multiplicity::ONE, Multiplicity::MANY),
            appointment_history: Link::new(
                "appointment history",
                Multiplicity::ONE,
                Multiplicity::MANY,
            ),
        }
    }

    pub fn config(&self) -> &SalonConfig {
        &self.config
    }

    /// Drop every entity and association, keeping the configuration.
    pub fn clear(&mut self) {
        *self = Self::new(self.config.clone());
        tracing::debug!("Salon graph cleared");
    }

    pub fn summary(&self) -> ExtentSummary {
        ExtentSummary {
            persons: self.persons.len(),
            customers: self.customers.len(),
            workers: self.workers.len(),
            masters: self.masters.len(),
            receptionists: self.receptionists.len(),
            certifications: self.certifications.len(),
            services: self.services.len(),
            two_hands_services: self.two_hands_services.len(),
            four_hands_services: self.four_hands_services.len(),
            materials: self.materials.len(),
            promotions: self.promotions.len(),
            provided_services: self.provided_services.len(),
            appointments: self.appointments.len(),
            histories: self.histories.len(),
        }
    }

    // ============================================================
    // Admission
    // ============================================================

    /// Run the validator once. Under [`AdmissionPolicy::Reject`] a dirty
    /// result fails the operation before anything has been written.
    fn vet<T: Entity>(&self, entity: &T) -> Result<Violations> {
        let violations = entity.validate();
        if !violations.is_empty() && self.config.admission == AdmissionPolicy::Reject {
            tracing::warn!("Rejected {} {}: {}", T::KIND, entity.id(), violations);
            return Err(GraphError::ValidationFailed {
                kind: T::KIND,
                violations,
            });
        }
        Ok(violations)
    }

    // ============================================================
    // Extent listings (admitted entities only, copied)
    // ============================================================

    pub fn persons(&self) -> Vec<Person> {
        self.persons.snapshot()
    }

    pub fn customers(&self) -> Vec<Customer> {
        self.customers.snapshot()
    }

    pub fn workers(&self) -> Vec<Worker> {
        self.workers.snapshot()
    }

    pub fn masters(&self) -> Vec<Master> {
        self.masters.snapshot()
    }

    pub fn receptionists(&self) -> Vec<Receptionist> {
        self.receptionists.snapshot()
    }

    pub fn certifications(&self) -> Vec<Certification> {
        self.certifications.snapshot()
    }

    pub fn services(&self) -> Vec<Service> {
        self.services.snapshot()
    }

    pub fn two_hands_services(&self) -> Vec<TwoHandsService> {
        self.two_hands_services.snapshot()
    }

    pub fn four_hands_services(&self) -> Vec<FourHandsService> {
        self.four_hands_services.snapshot()
    }

    pub fn materials(&self) -> Vec<Material> {
        self.materials.snapshot()
    }

    pub fn promotions(&self) -> Vec<Promotion> {
        self.promotions.snapshot()
    }

    pub fn provided_services(&self) -> Vec<ProvidedService> {
        self.provided_services.snapshot()
    }

    pub fn appointments(&self) -> Vec<Appointment> {
        self.appointments.snapshot()
    }

    pub fn histories(&self) -> Vec<HistoryOfStatus> {
        self.histories.snapshot()
    }

    // ============================================================
    // Lookups (any live entity, admitted or not)
    // ============================================================

    pub fn person(&self, id: PersonId) -> Option<Person> {
        self.persons.get(id).cloned()
    }

    pub fn customer(&self, id: CustomerId) -> Option<Customer> {
        self.customers.get(id).cloned()
    }

    pub fn worker(&self, id: WorkerId) -> Option<Worker> {
        self.workers.get(id).cloned()
    }

    pub fn master(&self, id: MasterId) -> Option<Master> {
        self.masters.get(id).cloned()
    }

    pub fn receptionist(&self, id: ReceptionistId) -> Option<Receptionist> {
        self.receptionists.get(id).cloned()
    }

    pub fn certification(&self, id: CertificationId) -> Option<Certification> {
        self.certifications.get(id).cloned()
    }

    pub fn service(&self, id: ServiceId) -> Option<Service> {
        self.services.get(id).cloned()
    }

    pub fn material(&self, id: MaterialId) -> Option<Material> {
        self.materials.get(id).cloned()
    }

    pub fn promotion(&self, id: PromotionId) -> Option<Promotion> {
        self.promotions.get(id).cloned()
    }

    pub fn provided_service(&self, id: ProvidedServiceId) -> Option<ProvidedService> {
        self.provided_services.get(id).cloned()
    }

    pub fn appointment(&self, id: AppointmentId) -> Option<Appointment> {
        self.appointments.get(id).cloned()
    }

    pub fn history(&self, id: HistoryOfStatusId) -> Option<HistoryOfStatus> {
        self.histories.get(id).cloned()
    }

    pub fn is_admitted_person(&self, id: PersonId) -> bool {
        self.persons.is_admitted(id)
    }

    // ============================================================
    // Integrity
    // ============================================================

    /// Every invariant violation found in the graph. Empty when healthy.
    pub fn integrity_report(&self) -> Vec<String> {
        let mut problems = Vec::new();

        problems.extend(self.certified.inconsistencies());
        problems.extend(self.mentorship.inconsistencies());
        problems.extend(self.specializations.inconsistencies());
        problems.extend(self.service_materials.inconsistencies());
        problems.extend(self.service_promotions.inconsistencies());
        problems.extend(self.bookings.inconsistencies());
        problems.extend(self.rendered.inconsistencies());
        problems.extend(self.performers.inconsistencies());
        problems.extend(self.reception.inconsistencies());
        problems.extend(self.customer_history.inconsistencies());
        problems.extend(self.appointment_history.inconsistencies());

        dangling(&mut problems, &self.specializations, &self.masters, &self.services);
        dangling(&mut problems, &self.service_materials, &self.materials, &self.services);
        dangling(&mut problems, &self.service_promotions, &self.promotions, &self.services);
        dangling(&mut problems, &self.bookings, &self.provided_services, &self.appointments);
        dangling(&mut problems, &self.rendered, &self.provided_services, &self.services);
        dangling(&mut problems, &self.performers, &self.provided_services, &self.masters);
        dangling(&mut problems, &self.reception, &self.appointments, &self.receptionists);
        dangling(&mut problems, &self.customer_history, &self.histories, &self.customers);
        dangling(&mut problems, &self.appointment_history, &self.histories, &self.appointments);

        for (member, manager) in self.mentorship.pairs() {
            if !self.masters.is_live(member) || !self.masters.is_live(manager) {
                problems.push(format!("mentorship: {} -> {} is dangling", member, manager));
            }
        }

        for id in self.persons.live_ids() {
            let Some(person) = self.persons.get(id) else {
                continue;
            };
            if let Some(customer) = person.customer {
                if self.customers.get(customer).map(|c| c.person) != Some(id) {
                    problems.push(format!("{} holds {} which does not point back", id, customer));
                }
            }
            if let Some(worker) = person.worker {
                if self.workers.get(worker).map(|w| w.person) != Some(id) {
                    problems.push(format!("{} holds {} which does not point back", id, worker));
                }
            }
        }
        for customer in self.customers.live_ids() {
            let person = self.customers.get(customer).map(|c| c.person);
            let held = person.and_then(|p| self.persons.get(p)).and_then(|p| p.customer);
            if held != Some(customer) {
                problems.push(format!("{} is not held by its person", customer));
            }
        }
        for worker in self.workers.live_ids() {
            let person = self.workers.get(worker).map(|w| w.person);
            let held = person.and_then(|p| self.persons.get(p)).and_then(|p| p.worker);
            if held != Some(worker) {
                problems.push(format!("{} is not held by its person", worker));
            }
        }

        for master in self.masters.live_ids() {
            let worker = self.masters.get(master).map(|m| m.worker);
            let tag = worker.and_then(|w| self.workers.get(w)).map(|w| w.specialization);
            if tag != Some(Specialization::Master(master)) {
                problems.push(format!("{} is not the specialization of its worker", master));
            }
            if self.specializations.target_count(master) == 0 {
                problems.push(format!("{} specializes in no service", master));
            }
        }
        for receptionist in self.receptionists.live_ids() {
            let worker = self.receptionists.get(receptionist).map(|r| r.worker);
            let tag = worker.and_then(|w| self.workers.get(w)).map(|w| w.specialization);
            if tag != Some(Specialization::Receptionist(receptionist)) {
                problems.push(format!("{} is not the specialization of its worker", receptionist));
            }
        }

        for certification in self.certifications.live_ids() {
            match self.certified.owner_of(certification) {
                Some(owner) if self.masters.is_live(owner) => {}
                _ => problems.push(format!("{} has no live master", certification)),
            }
        }

        for ps in self.provided_services.live_ids() {
            if self.bookings.target(ps).is_none() {
                problems.push(format!("{} belongs to no appointment", ps));
            }
            let Some(service) = self.rendered.target(ps) else {
                problems.push(format!("{} renders no service", ps));
                continue;
            };
            let bounds = self.masters_required(service);
            let masters = self.performers.targets(ps);
            if !bounds.admits(masters.len()) {
                problems.push(format!(
                    "{} has {} masters outside {}",
                    ps,
                    masters.len(),
                    bounds
                ));
            }
            for master in masters {
                if !self.specializations.contains(master, service) {
                    problems.push(format!(
                        "{} on {} does not specialize in {}",
                        master, ps, service
                    ));
                }
            }
        }

        for history in self.histories.live_ids() {
            if self.customer_history.target(history).is_none() {
                problems.push(format!("{} has no customer", history));
            }
            if self.appointment_history.target(history).is_none() {
                problems.push(format!("{} has no appointment", history));
            }
        }

        problems
    }
}

/// Report link endpoints that are no longer live entities.
fn dangling<S, T>(
    problems: &mut Vec<String>,
    link: &Link<S::Id, T::Id>,
    sources: &Extent<S>,
    targets: &Extent<T>,
)
where
    S: Entity,
    T: Entity,
{
    for (source, target) in link.pairs() {
        if !sources.is_live(source) || !targets.is_live(target) {
            problems.push(format!("{}: {} -> {} is dangling", link.name(), source, target));
        }
    }
}

/// Look up a live entity or fail with `InvalidReference`.
fn require<T: Entity>(extent: &Extent<T>, id: T::Id) -> Result<&T> {
    extent.get(id).ok_or_else(|| GraphError::missing(T::KIND, id))
}
