use serde::{Deserialize, Serialize};

use super::{FourHandsServiceId, ServiceId, TwoHandsServiceId};
use crate::links::Multiplicity;

/// A service on the salon's menu.
///
/// The `variant` decides how many masters a booking of this service needs:
/// one for a standard service, one or two for a two-hands service, exactly
/// two for a four-hands service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    /// Price in cents.
    pub price: u32,
    pub duration_minutes: u32,
    /// Variant objects are not part of a service snapshot.
    #[serde(skip)]
    pub variant: ServiceVariant,
}

/// The specialized object attached to a service, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ServiceVariant {
    #[default]
    Standard,
    TwoHands(TwoHandsServiceId),
    FourHands(FourHandsServiceId),
}

impl ServiceVariant {
    /// How many masters each booking of the service must have.
    pub fn masters_required(&self) -> Multiplicity {
        match self {
            Self::Standard => Multiplicity::ONE,
            Self::TwoHands(_) => Multiplicity::range(1, 2),
            Self::FourHands(_) => Multiplicity::range(2, 2),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::TwoHands(_) => "two_hands",
            Self::FourHands(_) => "four_hands",
        }
    }
}

/// Variant object of a service that may be performed by one or two masters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwoHandsService {
    pub id: TwoHandsServiceId,
    pub service: ServiceId,
    /// Surcharge in cents when a second master joins.
    pub extra_fee: u32,
}

/// Variant object of a service always performed by two masters at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FourHandsService {
    pub id: FourHandsServiceId,
    pub service: ServiceId,
    pub coordination_minutes: u32,
}

/// Input for creating a new service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateServiceInput {
    pub name: String,
    /// Price in cents.
    pub price: u32,
    pub duration_minutes: u32,
}

/// Input for attaching a variant object to a service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ServiceVariantInput {
    TwoHands { extra_fee: u32 },
    FourHands { coordination_minutes: u32 },
}
