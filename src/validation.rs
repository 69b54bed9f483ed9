//! Field-level validation of entities.
//!
//! Validation only reports; it never changes the entity it inspects. An
//! extent admits an entity when [`Validate::validate`] returns no violations.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::*;

/// One failed rule on one field.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

/// The ordered set of violations found on an entity. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violations(BTreeSet<Violation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(Violation {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|v| v.field.as_str()).collect()
    }

    fn non_blank(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, "must not be blank");
        }
    }

    fn range<T: PartialOrd + fmt::Display>(&mut self, field: &str, value: T, min: T, max: T) {
        if value < min || value > max {
            self.push(field, format!("must be between {} and {}", min, max));
        }
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|v| format!("{} {}", v.field, v.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Implemented by every entity that can enter an extent.
pub trait Validate {
    fn validate(&self) -> Violations;
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.starts_with('.')
        && domain
            .rsplit_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && tld.len() >= 2)
        && !value.chars().any(char::is_whitespace)
}

impl Validate for Person {
    fn validate(&self) -> Violations {
        let mut v = Violations::new();
        v.non_blank("first_name", &self.first_name);
        v.non_blank("last_name", &self.last_name);
        if !looks_like_email(&self.email) {
            v.push("email", "must be a valid email address");
        }
        if self.birth_date > self.created_at.date_naive() {
            v.push("birth_date", "must not be in the future");
        }
        v
    }
}

impl Validate for Customer {
    fn validate(&self) -> Violations {
        let mut v = Violations::new();
        let digits = self.phone.chars().filter(char::is_ascii_digit).count();
        let allowed = self
            .phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-'));
        if !allowed || !(9..=15).contains(&digits) {
            v.push("phone", "must contain 9 to 15 digits");
        }
        v
    }
}

impl Validate for Worker {
    fn validate(&self) -> Violations {
        let mut v = Violations::new();
        if self.salary == 0 {
            v.push("salary", "must be positive");
        }
        v
    }
}

impl Validate for Master {
    fn validate(&self) -> Violations {
        let mut v = Violations::new();
        v.range("experience_years", self.experience_years, 0, 60);
        v
    }
}

impl Validate for Receptionist {
    fn validate(&self) -> Violations {
        let mut v = Violations::new();
        if self.languages.is_empty() {
            v.push("languages", "must list at least one language");
        }
        for language in &self.languages {
            v.non_blank("languages", language);
        }
        v
    }
}

impl Validate for Certification {
    fn validate(&self) -> Violations {
        let mut v = Violations::new();
        v.non_blank("number", &self.number);
        v.non_blank("title", &self.title);
        v
    }
}

impl Validate for Service {
    fn validate(&self) -> Violations {
        let mut v = Violations::new();
        v.non_blank("name", &self.name);
        if self.price == 0 {
            v.push("price", "must be positive");
        }
        v.range("duration_minutes", self.duration_minutes, 5, 600);
        v
    }
}

impl Validate for TwoHandsService {
    fn validate(&self) -> Violations {
        Violations::new()
    }
}

impl Validate for FourHandsService {
    fn validate(&self) -> Violations {
        let mut v = Violations::new();
        v.range("coordination_minutes", self.coordination_minutes, 1, 120);
        v
    }
}

impl Validate for Material {
    fn validate(&self) -> Violations {
        let mut v = Violations::new();
        v.non_blank("name", &self.name);
        v
    }
}

impl Validate for Promotion {
    fn validate(&self) -> Violations {
        let mut v = Violations::new();
        v.non_blank("name", &self.name);
        v.range("discount_percent", self.discount_percent, 1, 90);
        v
    }
}

impl Validate for ProvidedService {
    fn validate(&self) -> Violations {
        let mut v = Violations::new();
        if let Some(notes) = &self.notes {
            if notes.len() > 500 {
                v.push("notes", "must be at most 500 characters");
            }
        }
        v
    }
}

impl Validate for Appointment {
    fn validate(&self) -> Violations {
        Violations::new()
    }
}

impl Validate for HistoryOfStatus {
    fn validate(&self) -> Violations {
        Violations::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn person(first_name: &str, email: &str) -> Person {
        Person {
            id: PersonId::new(),
            first_name: first_name.to_string(),
            last_name: "Kowalska".to_string(),
            email: email.to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
            customer: None,
            worker: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_valid_person_has_no_violations() {
        assert!(person("Anna", "anna@example.com").validate().is_empty());
    }

    #[test]
    fn test_violations_are_ordered_by_field() {
        let violations = person(" ", "not-an-email").validate();
        assert_eq!(violations.fields(), vec!["email", "first_name"]);
    }

    #[test]
    fn test_email_shapes() {
        assert!(looks_like_email("a@b.co"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("@b.com"));
        assert!(!looks_like_email("a b@c.com"));
    }

    #[test]
    fn test_customer_phone() {
        let mut customer = Customer {
            id: CustomerId::new(),
            person: PersonId::new(),
            phone: "+48 600 100 200".to_string(),
            registered_at: Utc::now(),
        };
        assert!(customer.validate().is_empty());

        customer.phone = "12ab".to_string();
        assert_eq!(customer.validate().fields(), vec!["phone"]);
    }
}
