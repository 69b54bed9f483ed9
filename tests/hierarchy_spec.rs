use chrono::NaiveDate;
use salon::config::SalonConfig;
use salon::models::*;
use salon::{GraphError, Salon};
use speculate2::speculate;

fn service(salon: &mut Salon, name: &str) -> ServiceId {
    salon
        .create_service(CreateServiceInput {
            name: name.to_string(),
            price: 10_000,
            duration_minutes: 60,
        })
        .expect("Failed to create service")
}

fn master(
    salon: &mut Salon,
    name: &str,
    experience_years: u32,
    services: Vec<ServiceId>,
) -> MasterId {
    let person = salon
        .create_person(CreatePersonInput {
            first_name: name.to_string(),
            last_name: "Test".to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            birth_date: NaiveDate::from_ymd_opt(1988, 3, 3).unwrap(),
        })
        .expect("Failed to create person");
    let worker = salon
        .attach_worker_role(person, CreateWorkerInput {
            salary: 450_000,
            hired_on: NaiveDate::from_ymd_opt(2019, 9, 1).unwrap(),
        })
        .expect("Failed to attach worker role");
    match salon
        .assign_role(worker, RoleInput::Master { experience_years, services })
        .expect("Failed to assign master role")
    {
        RoleHandle::Master(id) => id,
        other => panic!("expected a master, got {:?}", other),
    }
}

fn certification(number: &str) -> CreateCertificationInput {
    CreateCertificationInput {
        number: number.to_string(),
        title: "Colorist".to_string(),
        issued_on: NaiveDate::from_ymd_opt(2018, 10, 5).unwrap(),
    }
}

fn person_of(salon: &Salon, master: MasterId) -> PersonId {
    let worker = salon.master(master).expect("master should be live").worker;
    salon.worker(worker).expect("worker should be live").person
}

speculate! {
    before {
        let mut salon = Salon::default();
        let svc = service(&mut salon, "Haircut");
    }

    describe "mentorship" {
        it "lets a top master train a junior one" {
            let a = master(&mut salon, "A", 5, vec![svc]);
            let b = master(&mut salon, "B", 1, vec![svc]);

            assert!(salon.set_manager(b, Some(a)).expect("Failed to set manager"));

            assert_eq!(salon.trainees_of(a), vec![b]);
            assert_eq!(salon.manager_of(b), Some(a));
            assert!(matches!(
                salon.set_manager(a, Some(a)),
                Err(GraphError::SelfReference { .. })
            ));
            assert!(salon.integrity_report().is_empty());
        }

        it "treats setting the same manager again as a no-op" {
            let a = master(&mut salon, "A", 5, vec![svc]);
            let b = master(&mut salon, "B", 1, vec![svc]);
            salon.set_manager(b, Some(a)).expect("Failed to set manager");

            assert!(!salon.set_manager(b, Some(a)).expect("Repeat failed"));
            assert_eq!(salon.trainees_of(a), vec![b]);
        }

        it "rejects managers below the experience threshold" {
            let a = master(&mut salon, "A", 5, vec![svc]);
            let b = master(&mut salon, "B", 1, vec![svc]);

            let result = salon.set_manager(a, Some(b));

            assert!(matches!(result, Err(GraphError::IneligibleManager { .. })));
            assert_eq!(salon.manager_of(a), None);
            assert!(!salon.is_top_master(b));
        }

        it "rejects indirect cycles" {
            let a = master(&mut salon, "A", 10, vec![svc]);
            let b = master(&mut salon, "B", 6, vec![svc]);
            salon.set_manager(b, Some(a)).expect("Failed to set manager");

            let result = salon.set_manager(a, Some(b));

            assert!(matches!(result, Err(GraphError::SelfReference { .. })));
            assert_eq!(salon.manager_of(a), None);
        }

        it "moves a trainee when its manager is replaced" {
            let a = master(&mut salon, "A", 10, vec![svc]);
            let c = master(&mut salon, "C", 8, vec![svc]);
            let b = master(&mut salon, "B", 1, vec![svc]);
            salon.set_manager(b, Some(a)).expect("Failed to set manager");

            salon.set_manager(b, Some(c)).expect("Failed to replace manager");

            assert!(salon.trainees_of(a).is_empty());
            assert_eq!(salon.trainees_of(c), vec![b]);
            assert!(salon.integrity_report().is_empty());
        }

        it "adds and removes trainees from the manager side" {
            let a = master(&mut salon, "A", 10, vec![svc]);
            let b = master(&mut salon, "B", 1, vec![svc]);

            assert!(salon.add_trainee(a, b).expect("Failed to add trainee"));
            assert_eq!(salon.manager_of(b), Some(a));

            assert!(salon.remove_trainee(a, b).expect("Failed to remove trainee"));
            assert_eq!(salon.manager_of(b), None);
            assert!(!salon.remove_trainee(a, b).expect("Repeat failed"));
        }

        it "clears the manager with None" {
            let a = master(&mut salon, "A", 10, vec![svc]);
            let b = master(&mut salon, "B", 1, vec![svc]);
            salon.set_manager(b, Some(a)).expect("Failed to set manager");

            assert!(salon.set_manager(b, None).expect("Failed to clear"));
            assert!(salon.trainees_of(a).is_empty());
        }

        it "keeps a master with trainees above the threshold" {
            let a = master(&mut salon, "A", 10, vec![svc]);
            let b = master(&mut salon, "B", 1, vec![svc]);
            salon.set_manager(b, Some(a)).expect("Failed to set manager");

            let result = salon.set_master_experience(a, 2);

            assert!(matches!(result, Err(GraphError::IneligibleManager { .. })));
            assert_eq!(salon.master(a).unwrap().experience_years, 10);
            assert!(salon.set_master_experience(b, 4).expect("Update failed"));
            assert_eq!(salon.master(b).unwrap().experience_years, 4);
        }

        it "releases trainees when their manager is deleted" {
            let a = master(&mut salon, "A", 10, vec![svc]);
            let b = master(&mut salon, "B", 1, vec![svc]);
            salon.set_manager(b, Some(a)).expect("Failed to set manager");

            salon.delete_person(person_of(&salon, a)).expect("Delete failed");

            assert_eq!(salon.manager_of(b), None);
            assert!(salon.master(a).is_none());
            assert!(salon.integrity_report().is_empty());
        }

        it "builds the tree from masters without a manager" {
            let a = master(&mut salon, "A", 10, vec![svc]);
            let b = master(&mut salon, "B", 6, vec![svc]);
            let c = master(&mut salon, "C", 1, vec![svc]);
            salon.set_manager(b, Some(a)).expect("Failed to set manager");
            salon.set_manager(c, Some(b)).expect("Failed to set manager");

            let tree = salon.mentorship_tree();

            assert_eq!(tree.len(), 1);
            assert_eq!(tree[0].master, a);
            assert_eq!(tree[0].name, "A Test");
            assert_eq!(tree[0].trainees[0].master, b);
            assert_eq!(tree[0].trainees[0].trainees[0].master, c);
        }

        it "reads the threshold from the configuration" {
            let mut strict = Salon::new(SalonConfig {
                top_master_min_experience: 10,
                ..SalonConfig::default()
            });
            let svc = service(&mut strict, "Coloring");
            let a = master(&mut strict, "A", 7, vec![svc]);
            let b = master(&mut strict, "B", 1, vec![svc]);

            assert!(!strict.is_top_master(a));
            assert!(matches!(
                strict.set_manager(b, Some(a)),
                Err(GraphError::IneligibleManager { .. })
            ));
        }
    }

    describe "certifications" {
        it "moves a certification to another master under the same number" {
            let first = master(&mut salon, "A", 3, vec![svc]);
            let second = master(&mut salon, "B", 3, vec![svc]);
            let c1 = salon.add_certification(first, certification("C1")).expect("Failed to add");

            let previous = salon.rekey_certification(c1, second).expect("Rekey failed");

            assert_eq!(previous, first);
            assert!(salon.certification_by_number(first, "C1").is_none());
            assert_eq!(salon.certification_by_number(second, "C1").unwrap().id, c1);
            assert_eq!(salon.owner_of_certification(c1), Some(second));
            let with_key = salon.certifications().into_iter().filter(|c| c.number == "C1").count();
            assert_eq!(with_key, 1);
            assert!(salon.integrity_report().is_empty());
        }

        it "keeps numbers unique per master" {
            let first = master(&mut salon, "A", 3, vec![svc]);
            salon.add_certification(first, certification("C1")).expect("Failed to add");

            let result = salon.add_certification(first, certification("C1"));

            assert!(matches!(result, Err(GraphError::DuplicateKey { .. })));
            assert_eq!(salon.certifications().len(), 1);
        }

        it "allows the same number under different masters" {
            let first = master(&mut salon, "A", 3, vec![svc]);
            let second = master(&mut salon, "B", 3, vec![svc]);

            salon.add_certification(first, certification("C1")).expect("Failed to add");
            salon.add_certification(second, certification("C1")).expect("Failed to add");

            assert_eq!(salon.certifications().len(), 2);
            assert_eq!(salon.certifications_of(second).len(), 1);
        }

        it "refuses to rekey onto a master already using the number" {
            let first = master(&mut salon, "A", 3, vec![svc]);
            let second = master(&mut salon, "B", 3, vec![svc]);
            let moving = salon.add_certification(first, certification("C1")).expect("Failed to add");
            salon.add_certification(second, certification("C1")).expect("Failed to add");

            let result = salon.rekey_certification(moving, second);

            assert!(matches!(result, Err(GraphError::DuplicateKey { .. })));
            assert_eq!(salon.owner_of_certification(moving), Some(first));
        }

        it "refuses to rekey onto a missing master" {
            let first = master(&mut salon, "A", 3, vec![svc]);
            let c1 = salon.add_certification(first, certification("C1")).expect("Failed to add");

            let result = salon.rekey_certification(c1, MasterId::new());

            assert!(matches!(result, Err(GraphError::InvalidReference { .. })));
            assert_eq!(salon.owner_of_certification(c1), Some(first));
        }

        it "deletes certifications with their master" {
            let first = master(&mut salon, "A", 3, vec![svc]);
            master(&mut salon, "B", 3, vec![svc]);
            salon.add_certification(first, certification("C1")).expect("Failed to add");
            salon.add_certification(first, certification("C2")).expect("Failed to add");

            salon.delete_person(person_of(&salon, first)).expect("Delete failed");

            assert!(salon.certifications().is_empty());
            assert!(salon.integrity_report().is_empty());
        }

        it "removes a single certification" {
            let first = master(&mut salon, "A", 3, vec![svc]);
            let c1 = salon.add_certification(first, certification("C1")).expect("Failed to add");

            salon.remove_certification(c1).expect("Remove failed");

            assert!(salon.certification(c1).is_none());
            assert!(salon.certifications_of(first).is_empty());
        }
    }
}
