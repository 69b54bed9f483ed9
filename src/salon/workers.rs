use super::{require, MentorNode, Salon};
use crate::error::{GraphError, Result};
use crate::extent::Extent;
use crate::models::*;
use crate::validation::Violations;

/// A role object that passed every check and is ready to be installed.
enum PreparedRole {
    Master {
        master: Master,
        services: Vec<ServiceId>,
        violations: Violations,
    },
    Receptionist {
        receptionist: Receptionist,
        violations: Violations,
    },
}

impl Salon {
    // ============================================================
    // Role switchboard
    // ============================================================

    pub fn role_of(&self, worker: WorkerId) -> Option<Specialization> {
        self.workers.get(worker).map(|w| w.specialization)
    }

    /// Give an unassigned worker its specialized role.
    pub fn assign_role(&mut self, worker: WorkerId, input: RoleInput) -> Result<RoleHandle> {
        if let Some(kind) = require(&self.workers, worker)?.specialization.kind() {
            return Err(GraphError::RoleConflict {
                id: worker.to_string(),
                role: kind.as_str(),
            });
        }

        let prepared = self.prepare_role(worker, input)?;
        let handle = self.install_role(worker, prepared)?;
        tracing::info!("{} assigned {:?}", worker, handle);
        Ok(handle)
    }

    /// Replace the worker's role with one of the other kind.
    ///
    /// The old role is only torn down once the new one has passed its checks,
    /// so a failure leaves the worker exactly as it was.
    pub fn change_role(&mut self, worker: WorkerId, input: RoleInput) -> Result<RoleHandle> {
        let current = require(&self.workers, worker)?.specialization;
        if current.kind() == Some(input.kind()) {
            return Err(GraphError::RoleConflict {
                id: worker.to_string(),
                role: input.kind().as_str(),
            });
        }

        self.check_role_teardown(worker)?;
        let prepared = self.prepare_role(worker, input)?;
        self.teardown_role(worker);
        let handle = self.install_role(worker, prepared)?;
        tracing::info!("{} changed role from {:?} to {:?}", worker, current, handle);
        Ok(handle)
    }

    /// Tear the current role down and leave the worker unassigned.
    pub fn clear_role(&mut self, worker: WorkerId) -> Result<Specialization> {
        let current = require(&self.workers, worker)?.specialization;
        self.check_role_teardown(worker)?;
        self.teardown_role(worker);
        if current != Specialization::Unassigned {
            tracing::info!("{} no longer holds {:?}", worker, current);
        }
        Ok(current)
    }

    /// Fails when removing the worker's role would leave a service without
    /// masters or a provided service below its minimum.
    pub(super) fn check_role_teardown(&self, worker: WorkerId) -> Result<()> {
        let Some(Specialization::Master(master)) = self.role_of(worker) else {
            return Ok(());
        };

        for service in self.specializations.targets(master) {
            if self.specializations.source_count(service) == 1 {
                return Err(GraphError::UnsafeRoleChange {
                    worker: worker.to_string(),
                    reason: format!("{} is the only master of {}", master, service),
                });
            }
        }
        for provided in self.performers.sources(master) {
            let bounds = self.performers.bounds_for(provided);
            if !bounds.can_release(self.performers.target_count(provided)) {
                return Err(GraphError::UnsafeRoleChange {
                    worker: worker.to_string(),
                    reason: format!("{} needs {} to keep {} masters", provided, master, bounds),
                });
            }
        }
        Ok(())
    }

    /// Remove the role object and everything it owns. Callers run
    /// [`Salon::check_role_teardown`] first.
    pub(super) fn teardown_role(&mut self, worker: WorkerId) {
        let Some(entry) = self.workers.get_mut(worker) else {
            return;
        };
        match std::mem::take(&mut entry.specialization) {
            Specialization::Unassigned => {}
            Specialization::Master(master) => self.remove_master(master),
            Specialization::Receptionist(receptionist) => {
                let unassigned = self.reception.sever_target(receptionist);
                self.receptionists.evict(receptionist);
                tracing::debug!(
                    "Removed {}, {} appointments left without receptionist",
                    receptionist,
                    unassigned.len()
                );
            }
        }
    }

    fn prepare_role(&self, worker: WorkerId, input: RoleInput) -> Result<PreparedRole> {
        match input {
            RoleInput::Master {
                experience_years,
                services,
            } => {
                let master = Master {
                    id: MasterId::new(),
                    worker,
                    experience_years,
                };
                self.check_service_list(&self.specializations, master.id, &services)?;
                let violations = self.vet(&master)?;
                Ok(PreparedRole::Master {
                    master,
                    services,
                    violations,
                })
            }
            RoleInput::Receptionist { languages } => {
                let receptionist = Receptionist {
                    id: ReceptionistId::new(),
                    worker,
                    languages,
                };
                let violations = self.vet(&receptionist)?;
                Ok(PreparedRole::Receptionist {
                    receptionist,
                    violations,
                })
            }
        }
    }

    fn install_role(&mut self, worker: WorkerId, role: PreparedRole) -> Result<RoleHandle> {
        let handle = match role {
            PreparedRole::Master {
                master,
                services,
                violations,
            } => {
                let id = master.id;
                self.masters.store(master, &violations);
                for service in services {
                    self.specializations.attach(id, service)?;
                }
                RoleHandle::Master(id)
            }
            PreparedRole::Receptionist {
                receptionist,
                violations,
            } => {
                let id = receptionist.id;
                self.receptionists.store(receptionist, &violations);
                RoleHandle::Receptionist(id)
            }
        };
        if let Some(entry) = self.workers.get_mut(worker) {
            entry.specialization = handle.into();
        }
        Ok(handle)
    }

    fn remove_master(&mut self, master: MasterId) {
        self.specializations.sever_source(master);
        self.performers.sever_target(master);
        let released = self.mentorship.sever(master);
        let certifications = self.certified.sever_owner(master);
        for certification in &certifications {
            self.certifications.evict(*certification);
        }
        self.masters.evict(master);
        tracing::info!(
            "Removed {} with {} certifications, released {} trainees",
            master,
            certifications.len(),
            released.len()
        );
    }

    // ============================================================
    // Mentorship
    // ============================================================

    /// Put `master` under `manager`, or clear its manager with `None`.
    /// Setting the current manager again is a no-op.
    pub fn set_manager(&mut self, master: MasterId, manager: Option<MasterId>) -> Result<bool> {
        require(&self.masters, master)?;
        let Some(manager) = manager else {
            return Ok(self.mentorship.clear_manager(master).is_some());
        };
        require(&self.masters, manager)?;

        let masters = &self.masters;
        let threshold = self.config.top_master_min_experience;
        let changed = self.mentorship.set_manager(master, manager, |candidate| {
            eligible_manager(masters, candidate, threshold)
        })?;
        if changed {
            tracing::debug!("{} now trains {}", manager, master);
        }
        Ok(changed)
    }

    pub fn add_trainee(&mut self, manager: MasterId, trainee: MasterId) -> Result<bool> {
        require(&self.masters, manager)?;
        require(&self.masters, trainee)?;

        let masters = &self.masters;
        let threshold = self.config.top_master_min_experience;
        self.mentorship.add_subordinate(manager, trainee, |candidate| {
            eligible_manager(masters, candidate, threshold)
        })
    }

    pub fn remove_trainee(&mut self, manager: MasterId, trainee: MasterId) -> Result<bool> {
        require(&self.masters, manager)?;
        require(&self.masters, trainee)?;
        Ok(self.mentorship.remove_subordinate(manager, trainee))
    }

    pub fn manager_of(&self, master: MasterId) -> Option<MasterId> {
        self.mentorship.manager_of(master)
    }

    pub fn trainees_of(&self, master: MasterId) -> Vec<MasterId> {
        self.mentorship.subordinates_of(master)
    }

    /// Whether the master has enough experience to train others.
    pub fn is_top_master(&self, master: MasterId) -> bool {
        eligible_manager(&self.masters, master, self.config.top_master_min_experience).is_ok()
    }

    /// Update a master's experience. A master with trainees must stay a top
    /// master. Returns whether the master is admitted afterwards.
    pub fn set_master_experience(&mut self, master: MasterId, years: u32) -> Result<bool> {
        let mut updated = require(&self.masters, master)?.clone();
        let threshold = self.config.top_master_min_experience;
        if years < threshold && self.mentorship.has_subordinates(master) {
            return Err(GraphError::IneligibleManager {
                manager: master.to_string(),
                reason: format!(
                    "still trains {} masters, {} years of experience required",
                    self.mentorship.subordinates_of(master).len(),
                    threshold
                ),
            });
        }

        updated.experience_years = years;
        let violations = self.vet(&updated)?;
        Ok(self.masters.store(updated, &violations))
    }

    /// Every master without a manager, with its trainees nested below it.
    pub fn mentorship_tree(&self) -> Vec<MentorNode> {
        self.masters
            .live_ids()
            .into_iter()
            .filter(|master| self.mentorship.manager_of(*master).is_none())
            .map(|master| self.mentor_node(master))
            .collect()
    }

    fn mentor_node(&self, master: MasterId) -> MentorNode {
        let record = self.masters.get(master);
        MentorNode {
            master,
            name: record
                .and_then(|m| self.worker_name(m.worker))
                .unwrap_or_default(),
            experience_years: record.map(|m| m.experience_years).unwrap_or_default(),
            trainees: self
                .mentorship
                .subordinates_of(master)
                .into_iter()
                .map(|trainee| self.mentor_node(trainee))
                .collect(),
        }
    }

    // ============================================================
    // Certifications
    // ============================================================

    /// File a new certification under `master`, keyed by its number.
    pub fn add_certification(
        &mut self,
        master: MasterId,
        input: CreateCertificationInput,
    ) -> Result<CertificationId> {
        require(&self.masters, master)?;

        let certification = Certification {
            id: CertificationId::new(),
            number: input.number,
            title: input.title,
            issued_on: input.issued_on,
        };
        self.certified
            .check_attach(master, &certification.number, certification.id)?;
        let violations = self.vet(&certification)?;

        let id = certification.id;
        let number = certification.number.clone();
        self.certifications.store(certification, &violations);
        self.certified.attach(master, number, id)?;
        Ok(id)
    }

    /// Move a certification to another master, keeping its number. Returns
    /// the previous owner.
    pub fn rekey_certification(
        &mut self,
        certification: CertificationId,
        master: MasterId,
    ) -> Result<MasterId> {
        require(&self.certifications, certification)?;
        require(&self.masters, master)?;
        self.certified.rekey(certification, master)
    }

    pub fn remove_certification(&mut self, certification: CertificationId) -> Result<()> {
        require(&self.certifications, certification)?;
        self.certified.detach(certification);
        self.certifications.evict(certification);
        Ok(())
    }

    pub fn certification_by_number(&self, master: MasterId, number: &str) -> Option<Certification> {
        self.certified
            .get(master, number)
            .and_then(|id| self.certification(id))
    }

    pub fn certifications_of(&self, master: MasterId) -> Vec<Certification> {
        self.certified
            .items(master)
            .into_iter()
            .filter_map(|id| self.certification(id))
            .collect()
    }

    pub fn owner_of_certification(&self, certification: CertificationId) -> Option<MasterId> {
        self.certified.owner_of(certification)
    }
}

fn eligible_manager(masters: &Extent<Master>, candidate: MasterId, threshold: u32) -> Result<()> {
    let experience = masters
        .get(candidate)
        .map(|m| m.experience_years)
        .ok_or_else(|| GraphError::missing("master", candidate))?;
    if experience < threshold {
        return Err(GraphError::IneligibleManager {
            manager: candidate.to_string(),
            reason: format!(
                "{} years of experience, {} required",
                experience, threshold
            ),
        });
    }
    Ok(())
}
