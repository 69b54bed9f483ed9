use std::collections::HashSet;

use chrono::Utc;

use super::{require, Salon};
use crate::error::{GraphError, Result};
use crate::models::*;

impl Salon {
    // ============================================================
    // Appointment operations
    // ============================================================

    pub fn create_appointment(&mut self, input: CreateAppointmentInput) -> Result<AppointmentId> {
        if let Some(receptionist) = input.receptionist {
            require(&self.receptionists, receptionist)?;
        }

        let appointment = Appointment {
            id: AppointmentId::new(),
            scheduled_for: input.scheduled_for,
            status: AppointmentStatus::Booked,
            created_at: Utc::now(),
        };
        let violations = self.vet(&appointment)?;
        let id = appointment.id;
        self.appointments.store(appointment, &violations);
        if let Some(receptionist) = input.receptionist {
            self.reception.attach(id, receptionist)?;
        }
        Ok(id)
    }

    /// Hand the appointment to another receptionist, or to none. Returns the
    /// previous receptionist.
    pub fn assign_receptionist(
        &mut self,
        appointment: AppointmentId,
        receptionist: Option<ReceptionistId>,
    ) -> Result<Option<ReceptionistId>> {
        require(&self.appointments, appointment)?;
        match receptionist {
            Some(receptionist) => {
                require(&self.receptionists, receptionist)?;
                self.reception.relink(appointment, receptionist)
            }
            None => {
                let previous = self.reception.target(appointment);
                if let Some(previous) = previous {
                    self.reception.detach(appointment, previous)?;
                }
                Ok(previous)
            }
        }
    }

    pub fn receptionist_of(&self, appointment: AppointmentId) -> Option<ReceptionistId> {
        self.reception.target(appointment)
    }

    pub fn appointments_of_receptionist(&self, receptionist: ReceptionistId) -> Vec<AppointmentId> {
        self.reception.sources(receptionist)
    }

    /// Delete an appointment with its provided services.
    ///
    /// Status records belong to their customers, so the appointment cannot
    /// go while one still points at it. Move them with
    /// [`Salon::move_history_to_appointment`] or drop them with
    /// [`Salon::delete_history`] first.
    pub fn delete_appointment(&mut self, appointment: AppointmentId) -> Result<()> {
        require(&self.appointments, appointment)?;
        if let Some(history) = self.appointment_history.sources(appointment).first() {
            return Err(GraphError::MultiplicityViolation {
                association: self.appointment_history.name(),
                end: history.to_string(),
                bound: self.appointment_history.bounds_for(*history),
            });
        }

        let provided = self.bookings.sources(appointment);
        for id in &provided {
            self.remove_provided_service(*id);
        }
        self.reception.sever_source(appointment);
        self.appointments.evict(appointment);
        tracing::info!(
            "Deleted {} with {} provided services",
            appointment,
            provided.len()
        );
        Ok(())
    }

    // ============================================================
    // Provided services
    // ============================================================

    /// Book a service into an appointment, performed by `input.masters`.
    ///
    /// The number of masters must fit the service variant and each of them
    /// must specialize in the service.
    pub fn create_provided_service(
        &mut self,
        input: CreateProvidedServiceInput,
    ) -> Result<ProvidedServiceId> {
        require(&self.appointments, input.appointment)?;
        let price = require(&self.services, input.service)?.price;
        for &master in &input.masters {
            require(&self.masters, master)?;
        }

        let provided = ProvidedService {
            id: ProvidedServiceId::new(),
            price,
            notes: input.notes,
        };

        let mut seen = HashSet::new();
        for &master in &input.masters {
            if !seen.insert(master) {
                return Err(GraphError::DuplicateAssociation {
                    association: self.performers.name(),
                    left: provided.id.to_string(),
                    right: master.to_string(),
                });
            }
            self.check_specialized(master, input.service)?;
        }

        let bounds = self.masters_required(input.service);
        if input.masters.len() < bounds.min {
            return Err(GraphError::MultiplicityViolation {
                association: self.performers.name(),
                end: provided.id.to_string(),
                bound: bounds,
            });
        }
        if !bounds.admits(input.masters.len()) {
            return Err(GraphError::CapacityExceeded {
                association: self.performers.name(),
                end: provided.id.to_string(),
                bound: bounds,
            });
        }
        let violations = self.vet(&provided)?;

        let id = provided.id;
        self.provided_services.store(provided, &violations);
        self.performers.set_bounds(id, bounds);
        self.bookings.attach(id, input.appointment)?;
        self.rendered.attach(id, input.service)?;
        for master in input.masters {
            self.performers.attach(id, master)?;
        }
        tracing::debug!("Booked {} into {}", id, input.appointment);
        Ok(id)
    }

    pub fn add_master_to_provided_service(
        &mut self,
        provided: ProvidedServiceId,
        master: MasterId,
    ) -> Result<()> {
        require(&self.provided_services, provided)?;
        require(&self.masters, master)?;
        if let Some(service) = self.rendered.target(provided) {
            self.check_specialized(master, service)?;
        }
        self.performers.attach(provided, master)
    }

    /// Take a master off a provided service. Refused when the service variant
    /// needs the master to stay.
    pub fn remove_master_from_provided_service(
        &mut self,
        provided: ProvidedServiceId,
        master: MasterId,
    ) -> Result<bool> {
        require(&self.provided_services, provided)?;
        require(&self.masters, master)?;
        self.performers.detach(provided, master)
    }

    /// Move a provided service to another appointment. Returns the previous
    /// appointment.
    pub fn move_provided_service(
        &mut self,
        provided: ProvidedServiceId,
        appointment: AppointmentId,
    ) -> Result<Option<AppointmentId>> {
        require(&self.provided_services, provided)?;
        require(&self.appointments, appointment)?;
        self.bookings.relink(provided, appointment)
    }

    pub fn delete_provided_service(&mut self, provided: ProvidedServiceId) -> Result<()> {
        require(&self.provided_services, provided)?;
        self.remove_provided_service(provided);
        Ok(())
    }

    pub fn provided_services_of(&self, appointment: AppointmentId) -> Vec<ProvidedServiceId> {
        self.bookings.sources(appointment)
    }

    pub fn provided_services_of_master(&self, master: MasterId) -> Vec<ProvidedServiceId> {
        self.performers.sources(master)
    }

    pub fn masters_of_provided_service(&self, provided: ProvidedServiceId) -> Vec<MasterId> {
        self.performers.targets(provided)
    }

    pub fn service_of(&self, provided: ProvidedServiceId) -> Option<ServiceId> {
        self.rendered.target(provided)
    }

    pub fn appointment_of(&self, provided: ProvidedServiceId) -> Option<AppointmentId> {
        self.bookings.target(provided)
    }

    fn check_specialized(&self, master: MasterId, service: ServiceId) -> Result<()> {
        if !self.specializations.contains(master, service) {
            return Err(GraphError::SpecializationRequired {
                master: master.to_string(),
                service: service.to_string(),
            });
        }
        Ok(())
    }

    fn remove_provided_service(&mut self, provided: ProvidedServiceId) {
        self.bookings.sever_source(provided);
        self.rendered.sever_source(provided);
        self.performers.sever_source(provided);
        self.provided_services.evict(provided);
    }

    // ============================================================
    // Status history
    // ============================================================

    /// Record a status change of an appointment for a customer. The
    /// appointment takes the recorded status.
    pub fn record_status(&mut self, input: RecordStatusInput) -> Result<HistoryOfStatusId> {
        require(&self.customers, input.customer)?;
        require(&self.appointments, input.appointment)?;

        let history = HistoryOfStatus {
            id: HistoryOfStatusId::new(),
            status: input.status,
            recorded_at: Utc::now(),
        };
        let violations = self.vet(&history)?;

        let id = history.id;
        self.histories.store(history, &violations);
        self.customer_history.attach(id, input.customer)?;
        self.appointment_history.attach(id, input.appointment)?;
        if let Some(appointment) = self.appointments.get_mut(input.appointment) {
            appointment.status = input.status;
        }
        self.appointments.refresh(input.appointment);
        tracing::debug!(
            "{} is now {}",
            input.appointment,
            input.status.as_str()
        );
        Ok(id)
    }

    /// Hand a status record to another customer. Returns the previous one.
    pub fn move_history_to_customer(
        &mut self,
        history: HistoryOfStatusId,
        customer: CustomerId,
    ) -> Result<Option<CustomerId>> {
        require(&self.histories, history)?;
        require(&self.customers, customer)?;
        self.customer_history.relink(history, customer)
    }

    /// Point a status record at another appointment. Returns the previous one.
    pub fn move_history_to_appointment(
        &mut self,
        history: HistoryOfStatusId,
        appointment: AppointmentId,
    ) -> Result<Option<AppointmentId>> {
        require(&self.histories, history)?;
        require(&self.appointments, appointment)?;
        self.appointment_history.relink(history, appointment)
    }

    pub fn delete_history(&mut self, history: HistoryOfStatusId) -> Result<()> {
        require(&self.histories, history)?;
        self.remove_history(history);
        Ok(())
    }

    /// Status records of a customer, oldest first.
    pub fn history_of_customer(&self, customer: CustomerId) -> Vec<HistoryOfStatus> {
        self.customer_history
            .sources(customer)
            .into_iter()
            .filter_map(|id| self.history(id))
            .collect()
    }

    /// Status records of an appointment, oldest first.
    pub fn history_of_appointment(&self, appointment: AppointmentId) -> Vec<HistoryOfStatus> {
        self.appointment_history
            .sources(appointment)
            .into_iter()
            .filter_map(|id| self.history(id))
            .collect()
    }

    pub(super) fn remove_history(&mut self, history: HistoryOfStatusId) {
        self.customer_history.sever_source(history);
        self.appointment_history.sever_source(history);
        self.histories.evict(history);
    }
}
