//! Person model
//!
//! One contact entry. A `Person` can hold invalid values while it is being
//! edited; the service layer refuses to store it until [`Person::validate`]
//! passes.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::PersonId;
use crate::validation::{self, Field, FieldError, ValidationResult};

/// A contact record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    id: PersonId,
    name: String,
    birth_date: String,
    phone: String,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Serialized form of a person, as stored and exported
///
/// Every field is optional on the way in so that partial or legacy entries
/// can still be read; missing identity and timestamps are regenerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PersonId>,

    #[serde(default, alias = "nome")]
    pub name: String,

    #[serde(default, alias = "dataNascimento")]
    pub birth_date: String,

    #[serde(default, alias = "telefone")]
    pub phone: String,

    #[serde(default)]
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A partial edit; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonUpdate {
    pub name: Option<String>,
    pub birth_date: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl PersonUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.birth_date.is_none()
            && self.phone.is_none()
            && self.email.is_none()
    }
}

impl Person {
    /// Create a new person. The name is stored upper-cased; nothing is validated.
    pub fn new(
        name: impl Into<String>,
        birth_date: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: PersonId::new(),
            name: normalize_name(&name.into()),
            birth_date: birth_date.into(),
            phone: phone.into(),
            email: email.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &PersonId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn birth_date(&self) -> &str {
        &self.birth_date
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Current value of a field
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::BirthDate => &self.birth_date,
            Field::Phone => &self.phone,
            Field::Email => &self.email,
        }
    }

    /// Run every field validator against the current values
    pub fn validate(&self) -> ValidationResult {
        let errors = Field::all()
            .iter()
            .filter(|field| !field.validate(self.field(**field)))
            .map(|field| FieldError::new(*field))
            .collect();
        ValidationResult::from_errors(errors)
    }

    /// Apply a partial edit in place
    pub fn update(&mut self, changes: PersonUpdate) {
        if let Some(name) = changes.name {
            self.name = normalize_name(&name);
        }
        if let Some(birth_date) = changes.birth_date {
            self.birth_date = birth_date;
        }
        if let Some(phone) = changes.phone {
            self.phone = phone;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        self.touch();
    }

    /// Take over the identity of the record this one replaces
    pub(crate) fn adopt_identity(&mut self, original: &Person) {
        self.id = original.id.clone();
        self.created_at = original.created_at;
        self.updated_at = original.updated_at;
        self.touch();
    }

    /// Refresh `updated_at`, keeping it strictly increasing
    fn touch(&mut self) {
        let now = Utc::now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        };
    }

    /// Digits-only phone, used for uniqueness and phone search
    pub fn normalized_phone(&self) -> String {
        validation::normalize_phone(&self.phone)
    }

    /// Age in whole years on `today`, if the birth date parses
    pub fn age_on(&self, today: NaiveDate) -> Option<i32> {
        validation::rules::parse_birth_date(&self.birth_date)
            .map(|birth| validation::rules::age_in_years(birth, today))
    }

    /// Case-insensitive substring match on name, email or phone
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        if self.name.to_lowercase().contains(&needle)
            || self.email.to_lowercase().contains(&needle)
            || self.phone.to_lowercase().contains(&needle)
        {
            return true;
        }

        is_phone_query(&needle)
            && self
                .normalized_phone()
                .contains(&validation::normalize_phone(&needle))
    }

    /// Serialize to the stored form
    pub fn to_record(&self) -> PersonRecord {
        PersonRecord {
            id: Some(self.id.clone()),
            name: self.name.clone(),
            birth_date: self.birth_date.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        }
    }

    /// Rebuild from the stored form, generating whatever identity is missing
    pub fn from_record(record: PersonRecord) -> Self {
        let now = Utc::now();
        let created_at = record.created_at.unwrap_or(now);
        Self {
            id: record.id.unwrap_or_default(),
            name: normalize_name(&record.name),
            birth_date: record.birth_date,
            phone: record.phone,
            email: record.email,
            created_at,
            updated_at: record.updated_at.unwrap_or(created_at),
        }
    }
}

impl From<PersonRecord> for Person {
    fn from(record: PersonRecord) -> Self {
        Self::from_record(record)
    }
}

impl From<&Person> for PersonRecord {
    fn from(person: &Person) -> Self {
        person.to_record()
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

fn normalize_name(name: &str) -> String {
    name.to_uppercase()
}

/// Queries made only of digits and phone punctuation
fn is_phone_query(query: &str) -> bool {
    query.chars().any(|c| c.is_ascii_digit())
        && query
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '(' | ')' | '-' | '+' | '.'))
}
