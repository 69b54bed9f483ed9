use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}:{}", $prefix, self.0)
            }
        }
    };
}

entity_id!(
    /// Identity shared by a customer role and a worker role.
    PersonId,
    "person"
);
entity_id!(CustomerId, "customer");
entity_id!(WorkerId, "worker");
entity_id!(MasterId, "master");
entity_id!(ReceptionistId, "receptionist");
entity_id!(CertificationId, "certification");
entity_id!(ServiceId, "service");
entity_id!(TwoHandsServiceId, "two-hands");
entity_id!(FourHandsServiceId, "four-hands");
entity_id!(MaterialId, "material");
entity_id!(PromotionId, "promotion");
entity_id!(ProvidedServiceId, "provided-service");
entity_id!(AppointmentId, "appointment");
entity_id!(HistoryOfStatusId, "history");
