use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::CertificationId;

/// A qualification held by a master.
///
/// Certifications are filed under their master by `number`, which is unique
/// within that master. A certification can move to another master and keeps
/// its number when it does.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certification {
    pub id: CertificationId,
    pub number: String,
    pub title: String,
    pub issued_on: NaiveDate,
}

/// Input for adding a certification to a master.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCertificationInput {
    pub number: String,
    pub title: String,
    pub issued_on: NaiveDate,
}
