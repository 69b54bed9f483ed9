use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{MaterialId, PromotionId, ServiceId};

/// A consumable used by one or more services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    pub id: MaterialId,
    pub name: String,
    /// Cost per unit in cents.
    pub unit_cost: u32,
}

/// A discount that applies to one or more services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Promotion {
    pub id: PromotionId,
    pub name: String,
    pub discount_percent: u8,
    pub valid_until: NaiveDate,
}

/// Input for creating a material. `services` must not be empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMaterialInput {
    pub name: String,
    pub unit_cost: u32,
    pub services: Vec<ServiceId>,
}

/// Input for creating a promotion. `services` must not be empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePromotionInput {
    pub name: String,
    pub discount_percent: u8,
    pub valid_until: NaiveDate,
    pub services: Vec<ServiceId>,
}
