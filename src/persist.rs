//! Saving one extent to a file and reading it back.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::extent::Entity;

/// The admitted records of one extent at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtentSnapshot<T> {
    /// Entity kind the records belong to, checked on load.
    pub entity: String,
    pub saved_at: DateTime<Utc>,
    pub records: Vec<T>,
}

impl<T: Entity> ExtentSnapshot<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self {
            entity: T::KIND.to_string(),
            saved_at: Utc::now(),
            records,
        }
    }
}

pub fn save<T>(snapshot: &ExtentSnapshot<T>) -> Result<Vec<u8>>
where
    T: Entity + Serialize,
{
    serde_json::to_vec_pretty(snapshot).context("Failed to serialize extent")
}

#[derive(Deserialize)]
struct SnapshotHeader {
    entity: String,
}

/// Parse a snapshot, refusing one written for another entity kind.
///
/// The kind is read before the records, so a foreign snapshot is reported as
/// such rather than as a record that fails to parse.
pub fn load<T>(blob: &[u8]) -> Result<ExtentSnapshot<T>>
where
    T: Entity + DeserializeOwned,
{
    let header: SnapshotHeader =
        serde_json::from_slice(blob).context("Failed to parse extent snapshot header")?;
    if header.entity != T::KIND {
        bail!(
            "Snapshot holds {} records, expected {}",
            header.entity,
            T::KIND
        );
    }
    serde_json::from_slice(blob).context("Failed to parse extent snapshot")
}

pub fn save_to_file<T>(snapshot: &ExtentSnapshot<T>, path: &Path) -> Result<()>
where
    T: Entity + Serialize,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create snapshot directory")?;
    }
    let blob = save(snapshot)?;
    fs::write(path, blob).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(
        "Saved {} {} records to {}",
        snapshot.records.len(),
        snapshot.entity,
        path.display()
    );
    Ok(())
}

pub fn load_from_file<T>(path: &Path) -> Result<ExtentSnapshot<T>>
where
    T: Entity + DeserializeOwned,
{
    let blob = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    load(&blob)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Material, MaterialId, Service, ServiceId, ServiceVariant};

    fn service(name: &str) -> Service {
        Service {
            id: ServiceId::new(),
            name: name.to_string(),
            price: 9000,
            duration_minutes: 60,
            variant: ServiceVariant::Standard,
        }
    }

    #[test]
    fn test_load_restores_records() {
        let snapshot = ExtentSnapshot::new(vec![service("Haircut"), service("Manicure")]);
        let blob = save(&snapshot).unwrap();

        let loaded: ExtentSnapshot<Service> = load(&blob).unwrap();
        assert_eq!(loaded.entity, "service");
        let names: Vec<&str> = loaded.records.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Haircut", "Manicure"]);
        assert_eq!(loaded.records[0].id, snapshot.records[0].id);
    }

    #[test]
    fn test_load_rejects_other_kind() {
        let snapshot = ExtentSnapshot::new(vec![Material {
            id: MaterialId::new(),
            name: "Foil".to_string(),
            unit_cost: 50,
        }]);
        let blob = save(&snapshot).unwrap();

        let err = load::<Service>(&blob).unwrap_err();
        assert_eq!(err.to_string(), "Snapshot holds material records, expected service");
    }

    #[test]
    fn test_load_reports_bad_records_of_the_right_kind() {
        let blob = br#"{"entity":"service","saved_at":"2026-01-01T00:00:00Z","records":[{}]}"#;

        let err = load::<Service>(blob).unwrap_err();
        assert_eq!(err.to_string(), "Failed to parse extent snapshot");
    }

    #[test]
    fn test_load_rejects_garbage() {
        assert!(load::<Service>(b"not json").is_err());
    }
}
