//! A small, fully linked sample salon used by the CLI.

use anyhow::{bail, Context, Result};
use chrono::{Duration, NaiveDate, Utc};

use crate::config::SalonConfig;
use crate::models::*;
use crate::salon::Salon;

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .with_context(|| format!("Invalid sample date {}-{}-{}", year, month, day))
}

fn person(
    salon: &mut Salon,
    first_name: &str,
    last_name: &str,
    born: NaiveDate,
) -> Result<PersonId> {
    let id = salon.create_person(CreatePersonInput {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: format!(
            "{}.{}@salon.example",
            first_name.to_lowercase(),
            last_name.to_lowercase()
        ),
        birth_date: born,
    })?;
    Ok(id)
}

fn master(
    salon: &mut Salon,
    person: PersonId,
    experience_years: u32,
    services: Vec<ServiceId>,
) -> Result<MasterId> {
    let worker = salon.attach_worker_role(
        person,
        CreateWorkerInput {
            salary: 520_000,
            hired_on: date(2020, 3, 1)?,
        },
    )?;
    let handle = salon.assign_role(
        worker,
        RoleInput::Master {
            experience_years,
            services,
        },
    )?;
    let RoleHandle::Master(id) = handle else {
        bail!("Expected a master role for {}, got {:?}", worker, handle);
    };
    Ok(id)
}

/// Build the sample salon: three services, three masters in one mentorship
/// line, a receptionist, a customer and one booked appointment.
///
/// Experience years follow the configured top master threshold so the
/// mentorship line holds for any threshold the validator accepts.
pub fn sample_salon(config: SalonConfig) -> Result<Salon> {
    let threshold = config.top_master_min_experience;
    let mut salon = Salon::new(config);

    let haircut = salon.create_service(CreateServiceInput {
        name: "Haircut".to_string(),
        price: 9_000,
        duration_minutes: 45,
    })?;
    let coloring = salon.create_service(CreateServiceInput {
        name: "Coloring".to_string(),
        price: 24_000,
        duration_minutes: 120,
    })?;
    let bridal = salon.create_service(CreateServiceInput {
        name: "Bridal makeup".to_string(),
        price: 40_000,
        duration_minutes: 90,
    })?;
    salon.specialize_service(coloring, ServiceVariantInput::TwoHands { extra_fee: 6_000 })?;
    salon.specialize_service(
        bridal,
        ServiceVariantInput::FourHands {
            coordination_minutes: 15,
        },
    )?;

    salon.create_material(CreateMaterialInput {
        name: "Hair dye".to_string(),
        unit_cost: 1_800,
        services: vec![coloring],
    })?;
    salon.create_promotion(CreatePromotionInput {
        name: "Spring refresh".to_string(),
        discount_percent: 15,
        valid_until: date(2027, 5, 31)?,
        services: vec![haircut, coloring],
    })?;

    let anna = person(&mut salon, "Anna", "Nowak", date(1984, 6, 2)?)?;
    let marta = person(&mut salon, "Marta", "Kos", date(1991, 9, 14)?)?;
    let ewa = person(&mut salon, "Ewa", "Lis", date(1999, 1, 30)?)?;
    let anna = master(&mut salon, anna, threshold + 7, vec![haircut, coloring, bridal])?;
    let marta = master(&mut salon, marta, threshold + 1, vec![coloring, bridal])?;
    let ewa = master(&mut salon, ewa, threshold.saturating_sub(3), vec![haircut])?;
    salon.set_manager(marta, Some(anna))?;
    salon.set_manager(ewa, Some(marta))?;

    salon.add_certification(
        anna,
        CreateCertificationInput {
            number: "HC-2011-042".to_string(),
            title: "Master hairdresser".to_string(),
            issued_on: date(2011, 6, 20)?,
        },
    )?;
    salon.add_certification(
        marta,
        CreateCertificationInput {
            number: "MU-2019-007".to_string(),
            title: "Bridal makeup artist".to_string(),
            issued_on: date(2019, 4, 3)?,
        },
    )?;

    let kasia = person(&mut salon, "Kasia", "Wrona", date(1995, 11, 8)?)?;
    let desk = salon.attach_worker_role(
        kasia,
        CreateWorkerInput {
            salary: 410_000,
            hired_on: date(2022, 9, 1)?,
        },
    )?;
    let handle = salon.assign_role(
        desk,
        RoleInput::Receptionist {
            languages: vec!["Polish".to_string(), "English".to_string()],
        },
    )?;
    let RoleHandle::Receptionist(receptionist) = handle else {
        bail!("Expected a receptionist role for {}, got {:?}", desk, handle);
    };

    let olga = person(&mut salon, "Olga", "Mazur", date(1993, 2, 17)?)?;
    let customer = salon.attach_customer_role(
        olga,
        CreateCustomerInput {
            phone: "+48 600 100 200".to_string(),
        },
    )?;

    let appointment = salon.create_appointment(CreateAppointmentInput {
        scheduled_for: Utc::now() + Duration::days(2),
        receptionist: Some(receptionist),
    })?;
    salon.create_provided_service(CreateProvidedServiceInput {
        appointment,
        service: bridal,
        masters: vec![anna, marta],
        notes: Some("Trial run before the wedding".to_string()),
    })?;
    salon.create_provided_service(CreateProvidedServiceInput {
        appointment,
        service: haircut,
        masters: vec![ewa],
        notes: None,
    })?;
    salon.record_status(RecordStatusInput {
        customer,
        appointment,
        status: AppointmentStatus::Booked,
    })?;
    salon.record_status(RecordStatusInput {
        customer,
        appointment,
        status: AppointmentStatus::Confirmed,
    })?;

    tracing::debug!("Sample salon ready: {:?}", salon.summary());
    Ok(salon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_salon_is_consistent() {
        let salon = sample_salon(SalonConfig::default()).unwrap();
        assert!(salon.integrity_report().is_empty());

        let summary = salon.summary();
        assert_eq!(summary.persons, 5);
        assert_eq!(summary.masters, 3);
        assert_eq!(summary.receptionists, 1);
        assert_eq!(summary.services, 3);
        assert_eq!(summary.provided_services, 2);
        assert_eq!(summary.histories, 2);
    }

    #[test]
    fn test_sample_mentorship_is_one_line() {
        let salon = sample_salon(SalonConfig::default()).unwrap();
        let tree = salon.mentorship_tree();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].name, "Anna Nowak");
        assert_eq!(tree[0].trainees[0].trainees[0].name, "Ewa Lis");
    }

    #[test]
    fn test_sample_salon_follows_the_threshold() {
        let config = SalonConfig {
            top_master_min_experience: 20,
            ..SalonConfig::default()
        };
        let salon = sample_salon(config).unwrap();
        let tree = salon.mentorship_tree();
        assert_eq!(tree[0].experience_years, 27);
        assert_eq!(tree[0].trainees[0].experience_years, 21);
        assert!(salon.integrity_report().is_empty());
    }
}
