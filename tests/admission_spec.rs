use chrono::{NaiveDate, Utc};
use salon::config::{AdmissionPolicy, SalonConfig};
use salon::models::*;
use salon::persist::{self, ExtentSnapshot};
use salon::salon::{ExtentSummary, UpdatePersonInput};
use salon::seed::sample_salon;
use salon::{GraphError, Salon};
use speculate2::speculate;
use tempfile::tempdir;

fn strict_salon() -> Salon {
    Salon::new(SalonConfig {
        admission: AdmissionPolicy::Reject,
        ..SalonConfig::default()
    })
}

fn service(salon: &mut Salon, name: &str) -> ServiceId {
    salon
        .create_service(CreateServiceInput {
            name: name.to_string(),
            price: 8_000,
            duration_minutes: 30,
        })
        .expect("Failed to create service")
}

fn worker(salon: &mut Salon) -> WorkerId {
    let person = salon
        .create_person(CreatePersonInput {
            first_name: "Marta".to_string(),
            last_name: "Kos".to_string(),
            email: "marta@example.com".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1991, 9, 14).unwrap(),
        })
        .expect("Failed to create person");
    salon
        .attach_worker_role(person, CreateWorkerInput {
            salary: 500_000,
            hired_on: NaiveDate::from_ymd_opt(2018, 4, 1).unwrap(),
        })
        .expect("Failed to attach worker role")
}

fn invalid_person() -> CreatePersonInput {
    CreatePersonInput {
        first_name: "  ".to_string(),
        last_name: "Kos".to_string(),
        email: "not-an-email".to_string(),
        birth_date: NaiveDate::from_ymd_opt(1991, 9, 14).unwrap(),
    }
}

speculate! {
    describe "keeping unadmitted entities" {
        before {
            let mut salon = Salon::default();
        }

        it "stores an invalid entity without listing it" {
            let id = salon.create_person(invalid_person()).expect("Create should succeed");

            assert!(salon.person(id).is_some());
            assert!(!salon.is_admitted_person(id));
            assert!(salon.persons().is_empty());
        }

        it "keeps the links of an invalid master" {
            let svc = service(&mut salon, "Haircut");
            let worker = worker(&mut salon);

            let handle = salon
                .assign_role(worker, RoleInput::Master { experience_years: 99, services: vec![svc] })
                .expect("Assign should succeed");

            let RoleHandle::Master(master) = handle else {
                panic!("expected a master, got {:?}", handle);
            };
            assert!(salon.masters().is_empty());
            assert!(salon.master(master).is_some());
            assert_eq!(salon.services_of_master(master), vec![svc]);
            assert_eq!(salon.masters_of_service(svc), vec![master]);
            assert_eq!(salon.role_of(worker), Some(Specialization::Master(master)));
            assert!(salon.integrity_report().is_empty());
        }

        it "admits an entity once it is fixed" {
            let svc = service(&mut salon, "Haircut");
            let worker = worker(&mut salon);
            let RoleHandle::Master(master) = salon
                .assign_role(worker, RoleInput::Master { experience_years: 99, services: vec![svc] })
                .expect("Assign should succeed")
            else {
                panic!("expected a master");
            };

            assert!(salon.set_master_experience(master, 30).expect("Update failed"));
            assert_eq!(salon.masters().len(), 1);
        }
    }

    describe "rejecting invalid entities" {
        before {
            let mut salon = strict_salon();
        }

        it "fails before storing an invalid person" {
            let result = salon.create_person(invalid_person());

            let Err(GraphError::ValidationFailed { kind, violations }) = result else {
                panic!("expected ValidationFailed");
            };
            assert_eq!(kind, "person");
            assert_eq!(violations.fields(), vec!["email", "first_name"]);
            assert!(salon.persons().is_empty());
        }

        it "attaches no link for an invalid master" {
            let svc = service(&mut salon, "Haircut");
            let worker = worker(&mut salon);

            let result = salon.assign_role(worker, RoleInput::Master { experience_years: 99, services: vec![svc] });

            assert!(matches!(result, Err(GraphError::ValidationFailed { .. })));
            assert_eq!(salon.role_of(worker), Some(Specialization::Unassigned));
            assert!(salon.masters_of_service(svc).is_empty());
        }

        it "books nothing for an invalid provided service" {
            let svc = service(&mut salon, "Haircut");
            let worker = worker(&mut salon);
            let RoleHandle::Master(master) = salon
                .assign_role(worker, RoleInput::Master { experience_years: 3, services: vec![svc] })
                .expect("Assign failed")
            else {
                panic!("expected a master");
            };
            let appointment = salon
                .create_appointment(CreateAppointmentInput { scheduled_for: Utc::now(), receptionist: None })
                .expect("Failed to create appointment");

            let result = salon.create_provided_service(CreateProvidedServiceInput {
                appointment,
                service: svc,
                masters: vec![master],
                notes: Some("x".repeat(501)),
            });

            assert!(matches!(result, Err(GraphError::ValidationFailed { .. })));
            assert!(salon.provided_services_of(appointment).is_empty());
            assert!(salon.provided_services_of_master(master).is_empty());
        }

        it "rejects a person update that breaks validation" {
            let id = salon.create_person(CreatePersonInput {
                first_name: "Ewa".to_string(),
                last_name: "Lis".to_string(),
                email: "ewa@example.com".to_string(),
                birth_date: NaiveDate::from_ymd_opt(1999, 1, 30).unwrap(),
            }).expect("Failed to create person");

            let result = salon.update_person(id, UpdatePersonInput {
                last_name: Some(String::new()),
                ..Default::default()
            });

            assert!(matches!(result, Err(GraphError::ValidationFailed { .. })));
            assert_eq!(salon.person(id).unwrap().last_name, "Lis");
            assert!(salon.is_admitted_person(id));
        }
    }

    describe "service snapshots" {
        before {
            let mut salon = Salon::default();
            service(&mut salon, "Haircut");
            let coloring = service(&mut salon, "Coloring");
            salon
                .specialize_service(coloring, ServiceVariantInput::TwoHands { extra_fee: 2_000 })
                .expect("Failed to specialize");
        }

        it "restores the services in a fresh salon" {
            let dir = tempdir().expect("Failed to create temp dir");
            let path = dir.path().join("nested").join("services.json");
            persist::save_to_file(&salon.export_services(), &path).expect("Save failed");

            let snapshot = persist::load_from_file::<Service>(&path).expect("Load failed");
            let mut fresh = Salon::default();
            let imported = fresh.import_services(snapshot).expect("Import failed");

            assert_eq!(imported, 2);
            let names: Vec<String> = fresh.services().into_iter().map(|s| s.name).collect();
            assert_eq!(names, vec!["Haircut", "Coloring"]);
            assert!(fresh.services().iter().all(|s| s.variant == ServiceVariant::Standard));
            assert_eq!(fresh.service(coloring).unwrap().name, "Coloring");
        }

        it "skips services that are already present" {
            let imported = salon.import_services(salon.export_services()).expect("Import failed");

            assert_eq!(imported, 0);
            assert_eq!(salon.services().len(), 2);
        }

        it "imports nothing when one record is invalid under the reject policy" {
            let mut records = salon.export_services().records;
            records[1].price = 0;
            let mut strict = strict_salon();

            let result = strict.import_services(ExtentSnapshot::new(records));

            assert!(matches!(result, Err(GraphError::ValidationFailed { .. })));
            assert!(strict.services().is_empty());
        }

        it "refuses a snapshot of another extent" {
            let dir = tempdir().expect("Failed to create temp dir");
            let path = dir.path().join("materials.json");
            persist::save_to_file(&ExtentSnapshot::new(salon.materials()), &path).expect("Save failed");

            let err = persist::load_from_file::<Service>(&path).unwrap_err();
            assert!(err.to_string().contains("expected service"));
        }
    }

    describe "resetting the graph" {
        it "empties every extent and keeps the configuration" {
            let mut salon = sample_salon(SalonConfig {
                top_master_min_experience: 6,
                ..SalonConfig::default()
            }).expect("Failed to build sample salon");
            assert!(salon.summary().masters > 0);

            salon.clear();

            assert_eq!(salon.summary(), ExtentSummary::default());
            assert!(salon.integrity_report().is_empty());
            assert!(salon.mentorship_tree().is_empty());
            assert_eq!(salon.config().top_master_min_experience, 6);
        }

        it "accepts new entities after a reset" {
            let mut salon = sample_salon(SalonConfig::default()).expect("Failed to build sample salon");
            salon.clear();

            service(&mut salon, "Haircut");

            assert_eq!(salon.services().len(), 1);
            assert!(salon.integrity_report().is_empty());
        }
    }
}
