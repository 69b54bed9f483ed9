use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;

use super::{require, Salon};
use crate::error::{GraphError, Result};
use crate::links::{Link, Multiplicity};
use crate::models::*;
use crate::persist::ExtentSnapshot;

impl Salon {
    // ============================================================
    // Service operations
    // ============================================================

    pub fn create_service(&mut self, input: CreateServiceInput) -> Result<ServiceId> {
        let service = Service {
            id: ServiceId::new(),
            name: input.name,
            price: input.price,
            duration_minutes: input.duration_minutes,
            variant: ServiceVariant::Standard,
        };
        let violations = self.vet(&service)?;
        let id = service.id;
        self.services.store(service, &violations);
        Ok(id)
    }

    /// Attach a two-hands or four-hands object to a standard service.
    ///
    /// Existing bookings of the service must already fit the new master
    /// bounds, which then apply to every booking of it.
    pub fn specialize_service(
        &mut self,
        service: ServiceId,
        input: ServiceVariantInput,
    ) -> Result<ServiceVariant> {
        let current = require(&self.services, service)?.variant;
        if current != ServiceVariant::Standard {
            return Err(GraphError::RoleConflict {
                id: service.to_string(),
                role: current.as_str(),
            });
        }

        let variant = match input {
            ServiceVariantInput::TwoHands { extra_fee } => {
                let object = TwoHandsService {
                    id: TwoHandsServiceId::new(),
                    service,
                    extra_fee,
                };
                let variant = ServiceVariant::TwoHands(object.id);
                self.check_bookings_fit(service, variant.masters_required())?;
                let violations = self.vet(&object)?;
                self.two_hands_services.store(object, &violations);
                variant
            }
            ServiceVariantInput::FourHands {
                coordination_minutes,
            } => {
                let object = FourHandsService {
                    id: FourHandsServiceId::new(),
                    service,
                    coordination_minutes,
                };
                let variant = ServiceVariant::FourHands(object.id);
                self.check_bookings_fit(service, variant.masters_required())?;
                let violations = self.vet(&object)?;
                self.four_hands_services.store(object, &violations);
                variant
            }
        };

        if let Some(entry) = self.services.get_mut(service) {
            entry.variant = variant;
        }
        for provided in self.rendered.sources(service) {
            self.performers
                .set_bounds(provided, variant.masters_required());
        }
        tracing::debug!("{} is now {}", service, variant.as_str());
        Ok(variant)
    }

    /// Delete a service together with its variant object.
    ///
    /// Refused while a provided service renders it, or while it is the only
    /// service of some master, material or promotion.
    pub fn delete_service(&mut self, service: ServiceId) -> Result<()> {
        let variant = require(&self.services, service)?.variant;

        if let Some(provided) = self.rendered.sources(service).first() {
            return Err(GraphError::MultiplicityViolation {
                association: self.rendered.name(),
                end: provided.to_string(),
                bound: self.rendered.bounds_for(*provided),
            });
        }
        check_not_sole_target(&self.specializations, service)?;
        check_not_sole_target(&self.service_materials, service)?;
        check_not_sole_target(&self.service_promotions, service)?;

        self.specializations.sever_target(service);
        self.service_materials.sever_target(service);
        self.service_promotions.sever_target(service);
        match variant {
            ServiceVariant::Standard => {}
            ServiceVariant::TwoHands(id) => {
                self.two_hands_services.evict(id);
            }
            ServiceVariant::FourHands(id) => {
                self.four_hands_services.evict(id);
            }
        }
        self.services.evict(service);
        tracing::info!("Deleted {} ({})", service, variant.as_str());
        Ok(())
    }

    /// Delete a two-hands object. Its service goes with it.
    pub fn delete_two_hands_service(&mut self, id: TwoHandsServiceId) -> Result<()> {
        let service = require(&self.two_hands_services, id)?.service;
        self.delete_service(service)
    }

    /// Delete a four-hands object. Its service goes with it.
    pub fn delete_four_hands_service(&mut self, id: FourHandsServiceId) -> Result<()> {
        let service = require(&self.four_hands_services, id)?.service;
        self.delete_service(service)
    }

    pub fn two_hands_service(&self, id: TwoHandsServiceId) -> Option<TwoHandsService> {
        self.two_hands_services.get(id).cloned()
    }

    pub fn four_hands_service(&self, id: FourHandsServiceId) -> Option<FourHandsService> {
        self.four_hands_services.get(id).cloned()
    }

    /// How many masters each booking of `service` must have.
    pub fn masters_required(&self, service: ServiceId) -> Multiplicity {
        self.services
            .get(service)
            .map(|s| s.variant.masters_required())
            .unwrap_or(Multiplicity::ONE)
    }

    fn check_bookings_fit(&self, service: ServiceId, bounds: Multiplicity) -> Result<()> {
        for provided in self.rendered.sources(service) {
            let count = self.performers.target_count(provided);
            if count < bounds.min {
                return Err(GraphError::MultiplicityViolation {
                    association: self.performers.name(),
                    end: provided.to_string(),
                    bound: bounds,
                });
            }
            if !bounds.admits(count) {
                return Err(GraphError::CapacityExceeded {
                    association: self.performers.name(),
                    end: provided.to_string(),
                    bound: bounds,
                });
            }
        }
        Ok(())
    }

    /// Checks a list of services about to be linked to a new `owner`: at
    /// least one, all live, no repeats.
    pub(super) fn check_service_list<S>(
        &self,
        link: &Link<S, ServiceId>,
        owner: S,
        services: &[ServiceId],
    ) -> Result<()>
    where
        S: Copy + Eq + Hash + Display,
    {
        if services.is_empty() {
            return Err(GraphError::MultiplicityViolation {
                association: link.name(),
                end: owner.to_string(),
                bound: link.bounds_for(owner),
            });
        }
        let mut seen = HashSet::new();
        for &service in services {
            require(&self.services, service)?;
            if !seen.insert(service) {
                return Err(GraphError::DuplicateAssociation {
                    association: link.name(),
                    left: owner.to_string(),
                    right: service.to_string(),
                });
            }
        }
        Ok(())
    }

    // ============================================================
    // Specializations
    // ============================================================

    pub fn add_specialization(&mut self, master: MasterId, service: ServiceId) -> Result<()> {
        require(&self.masters, master)?;
        require(&self.services, service)?;
        self.specializations.attach(master, service)?;
        tracing::debug!("{} specializes in {}", master, service);
        Ok(())
    }

    /// Drop a specialization. Refused while the master still performs that
    /// service, or when either end would be left with none.
    pub fn remove_specialization(&mut self, master: MasterId, service: ServiceId) -> Result<bool> {
        require(&self.masters, master)?;
        require(&self.services, service)?;

        let still_performing = self
            .performers
            .sources(master)
            .into_iter()
            .any(|provided| self.rendered.target(provided) == Some(service));
        if still_performing {
            return Err(GraphError::SpecializationRequired {
                master: master.to_string(),
                service: service.to_string(),
            });
        }
        self.specializations.detach(master, service)
    }

    pub fn masters_of_service(&self, service: ServiceId) -> Vec<MasterId> {
        self.specializations.sources(service)
    }

    pub fn services_of_master(&self, master: MasterId) -> Vec<ServiceId> {
        self.specializations.targets(master)
    }

    // ============================================================
    // Materials
    // ============================================================

    pub fn create_material(&mut self, input: CreateMaterialInput) -> Result<MaterialId> {
        let material = Material {
            id: MaterialId::new(),
            name: input.name,
            unit_cost: input.unit_cost,
        };
        self.check_service_list(&self.service_materials, material.id, &input.services)?;
        let violations = self.vet(&material)?;

        let id = material.id;
        self.materials.store(material, &violations);
        for service in input.services {
            self.service_materials.attach(id, service)?;
        }
        Ok(id)
    }

    /// Link a material to one more service. Linking it twice is a no-op.
    pub fn add_material_to_service(
        &mut self,
        material: MaterialId,
        service: ServiceId,
    ) -> Result<bool> {
        require(&self.materials, material)?;
        require(&self.services, service)?;
        self.service_materials.ensure(material, service)
    }

    pub fn remove_material_from_service(
        &mut self,
        material: MaterialId,
        service: ServiceId,
    ) -> Result<bool> {
        require(&self.materials, material)?;
        require(&self.services, service)?;
        self.service_materials.detach(material, service)
    }

    pub fn delete_material(&mut self, material: MaterialId) -> Result<()> {
        require(&self.materials, material)?;
        self.service_materials.sever_source(material);
        self.materials.evict(material);
        Ok(())
    }

    pub fn services_of_material(&self, material: MaterialId) -> Vec<ServiceId> {
        self.service_materials.targets(material)
    }

    pub fn materials_of_service(&self, service: ServiceId) -> Vec<MaterialId> {
        self.service_materials.sources(service)
    }

    // ============================================================
    // Promotions
    // ============================================================

    pub fn create_promotion(&mut self, input: CreatePromotionInput) -> Result<PromotionId> {
        let promotion = Promotion {
            id: PromotionId::new(),
            name: input.name,
            discount_percent: input.discount_percent,
            valid_until: input.valid_until,
        };
        self.check_service_list(&self.service_promotions, promotion.id, &input.services)?;
        let violations = self.vet(&promotion)?;

        let id = promotion.id;
        self.promotions.store(promotion, &violations);
        for service in input.services {
            self.service_promotions.attach(id, service)?;
        }
        Ok(id)
    }

    /// Extend a promotion to one more service. Extending it twice is a no-op.
    pub fn add_promotion_to_service(
        &mut self,
        promotion: PromotionId,
        service: ServiceId,
    ) -> Result<bool> {
        require(&self.promotions, promotion)?;
        require(&self.services, service)?;
        self.service_promotions.ensure(promotion, service)
    }

    pub fn remove_promotion_from_service(
        &mut self,
        promotion: PromotionId,
        service: ServiceId,
    ) -> Result<bool> {
        require(&self.promotions, promotion)?;
        require(&self.services, service)?;
        self.service_promotions.detach(promotion, service)
    }

    pub fn delete_promotion(&mut self, promotion: PromotionId) -> Result<()> {
        require(&self.promotions, promotion)?;
        self.service_promotions.sever_source(promotion);
        self.promotions.evict(promotion);
        Ok(())
    }

    pub fn services_of_promotion(&self, promotion: PromotionId) -> Vec<ServiceId> {
        self.service_promotions.targets(promotion)
    }

    pub fn promotions_of_service(&self, service: ServiceId) -> Vec<PromotionId> {
        self.service_promotions.sources(service)
    }

    // ============================================================
    // Service extent snapshots
    // ============================================================

    /// Copy the admitted services into a snapshot for saving.
    pub fn export_services(&self) -> ExtentSnapshot<Service> {
        ExtentSnapshot::new(self.services.snapshot())
    }

    /// Add the services of a snapshot to the graph. Services whose id is
    /// already live are skipped. Returns how many were added.
    ///
    /// Imported services are standard services without links. Every record
    /// is vetted before the first one is stored.
    pub fn import_services(&mut self, snapshot: ExtentSnapshot<Service>) -> Result<usize> {
        let mut seen = HashSet::new();
        let mut vetted = Vec::new();
        for mut service in snapshot.records {
            if self.services.is_live(service.id) || !seen.insert(service.id) {
                tracing::debug!("Skipping {}, already present", service.id);
                continue;
            }
            service.variant = ServiceVariant::Standard;
            let violations = self.vet(&service)?;
            vetted.push((service, violations));
        }

        let count = vetted.len();
        for (service, violations) in vetted {
            self.services.store(service, &violations);
        }
        tracing::info!("Imported {} services", count);
        Ok(count)
    }
}

/// Fails when some source of `link` holds `service` as its last allowed target.
fn check_not_sole_target<S>(link: &Link<S, ServiceId>, service: ServiceId) -> Result<()>
where
    S: Copy + Eq + Hash + Display,
{
    for source in link.sources(service) {
        let bounds = link.bounds_for(source);
        if !bounds.can_release(link.target_count(source)) {
            return Err(GraphError::MultiplicityViolation {
                association: link.name(),
                end: source.to_string(),
                bound: bounds,
            });
        }
    }
    Ok(())
}
