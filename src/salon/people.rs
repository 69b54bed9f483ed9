use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{require, Salon};
use crate::error::{GraphError, Result};
use crate::extent::Entity;
use crate::models::*;

/// Input for updating a person. All fields are optional for partial updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePersonInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl Salon {
    // ============================================================
    // Person operations
    // ============================================================

    pub fn create_person(&mut self, input: CreatePersonInput) -> Result<PersonId> {
        let person = Person {
            id: PersonId::new(),
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            birth_date: input.birth_date,
            customer: None,
            worker: None,
            created_at: Utc::now(),
        };
        let violations = self.vet(&person)?;
        let id = person.id;
        self.persons.store(person, &violations);
        Ok(id)
    }

    /// Apply a partial update and re-run admission. Returns whether the person
    /// is admitted afterwards.
    pub fn update_person(&mut self, id: PersonId, input: UpdatePersonInput) -> Result<bool> {
        let mut updated = require(&self.persons, id)?.clone();
        if let Some(first_name) = input.first_name {
            updated.first_name = first_name;
        }
        if let Some(last_name) = input.last_name {
            updated.last_name = last_name;
        }
        if let Some(email) = input.email {
            updated.email = email;
        }
        let violations = self.vet(&updated)?;
        Ok(self.persons.store(updated, &violations))
    }

    /// Delete a person together with both of its roles.
    ///
    /// Fails with `UnsafeRoleChange` when the worker role cannot be torn down;
    /// nothing is deleted in that case.
    pub fn delete_person(&mut self, id: PersonId) -> Result<()> {
        let person = require(&self.persons, id)?;
        let (customer, worker) = (person.customer, person.worker);

        if let Some(worker) = worker {
            self.check_role_teardown(worker)?;
        }

        if let Some(customer) = customer {
            self.remove_customer(customer);
        }
        if let Some(worker) = worker {
            self.remove_worker(worker);
        }
        self.persons.evict(id);
        tracing::info!("Deleted {} with its roles", id);
        Ok(())
    }

    // ============================================================
    // Independent roles
    // ============================================================

    pub fn attach_customer_role(
        &mut self,
        person: PersonId,
        input: CreateCustomerInput,
    ) -> Result<CustomerId> {
        if require(&self.persons, person)?.customer.is_some() {
            return Err(GraphError::RoleConflict {
                id: person.to_string(),
                role: Customer::KIND,
            });
        }

        let customer = Customer {
            id: CustomerId::new(),
            person,
            phone: input.phone,
            registered_at: Utc::now(),
        };
        let violations = self.vet(&customer)?;
        let id = customer.id;
        self.customers.store(customer, &violations);
        if let Some(owner) = self.persons.get_mut(person) {
            owner.customer = Some(id);
        }
        tracing::debug!("{} became customer {}", person, id);
        Ok(id)
    }

    pub fn attach_worker_role(
        &mut self,
        person: PersonId,
        input: CreateWorkerInput,
    ) -> Result<WorkerId> {
        if require(&self.persons, person)?.worker.is_some() {
            return Err(GraphError::RoleConflict {
                id: person.to_string(),
                role: Worker::KIND,
            });
        }

        let worker = Worker {
            id: WorkerId::new(),
            person,
            salary: input.salary,
            hired_on: input.hired_on,
            specialization: Specialization::Unassigned,
        };
        let violations = self.vet(&worker)?;
        let id = worker.id;
        self.workers.store(worker, &violations);
        if let Some(owner) = self.persons.get_mut(person) {
            owner.worker = Some(id);
        }
        tracing::debug!("{} became worker {}", person, id);
        Ok(id)
    }

    /// Remove the customer role and the status history it owns.
    pub fn detach_customer_role(&mut self, person: PersonId) -> Result<CustomerId> {
        let customer = require(&self.persons, person)?
            .customer
            .ok_or_else(|| GraphError::missing("customer role of", person))?;

        self.remove_customer(customer);
        if let Some(owner) = self.persons.get_mut(person) {
            owner.customer = None;
        }
        Ok(customer)
    }

    /// Remove the worker role, tearing down its specialization first.
    pub fn detach_worker_role(&mut self, person: PersonId) -> Result<WorkerId> {
        let worker = require(&self.persons, person)?
            .worker
            .ok_or_else(|| GraphError::missing("worker role of", person))?;

        self.check_role_teardown(worker)?;
        self.remove_worker(worker);
        if let Some(owner) = self.persons.get_mut(person) {
            owner.worker = None;
        }
        Ok(worker)
    }

    pub fn customer_of(&self, person: PersonId) -> Option<Customer> {
        self.persons
            .get(person)
            .and_then(|p| p.customer)
            .and_then(|id| self.customer(id))
    }

    pub fn worker_of(&self, person: PersonId) -> Option<Worker> {
        self.persons
            .get(person)
            .and_then(|p| p.worker)
            .and_then(|id| self.worker(id))
    }

    /// Display name of the person behind a worker.
    pub fn worker_name(&self, worker: WorkerId) -> Option<String> {
        self.workers
            .get(worker)
            .and_then(|w| self.persons.get(w.person))
            .map(Person::full_name)
    }

    fn remove_customer(&mut self, customer: CustomerId) {
        for history in self.customer_history.sources(customer) {
            self.remove_history(history);
        }
        self.customers.evict(customer);
    }

    fn remove_worker(&mut self, worker: WorkerId) {
        self.teardown_role(worker);
        self.workers.evict(worker);
    }
}
