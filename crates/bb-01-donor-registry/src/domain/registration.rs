//! # Registration
//!
//! Validation of a new donor. Every failing field is reported at once.

use super::entities::{age_on, MAX_DONOR_AGE, MIN_DONOR_AGE};
use super::errors::DonorError;
use chrono::NaiveDate;
use shared_types::{BloodType, FieldErrors, Timestamp};

const MAX_NAME_LEN: usize = 100;

/// A donor as submitted at the boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub first_name: String,
    pub last_name: String,
    pub blood_type: String,
    pub date_of_birth: Option<NaiveDate>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// A registration that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRegistration {
    pub first_name: String,
    pub last_name: String,
    pub blood_type: BloodType,
    pub date_of_birth: NaiveDate,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl RegistrationRequest {
    pub fn validate(self, now: Timestamp) -> Result<ValidatedRegistration, DonorError> {
        let mut errors = FieldErrors::new();

        let first_name = name(&mut errors, "firstName", self.first_name);
        let last_name = name(&mut errors, "lastName", self.last_name);

        let blood_type = match self.blood_type.parse::<BloodType>() {
            Ok(bt) => Some(bt),
            Err(e) => {
                errors.add("bloodType", e.to_string());
                None
            }
        };

        match self.date_of_birth {
            None => errors.add("dateOfBirth", "is required"),
            Some(dob) => {
                let age = age_on(dob, now.date_naive());
                if dob > now.date_naive() {
                    errors.add("dateOfBirth", "cannot be in the future");
                } else if !(MIN_DONOR_AGE..=MAX_DONOR_AGE).contains(&age) {
                    errors.add(
                        "dateOfBirth",
                        format!("donor must be between {} and {} years old", MIN_DONOR_AGE, MAX_DONOR_AGE),
                    );
                }
            }
        }

        let phone = blank_to_none(self.phone);
        let email = blank_to_none(self.email);
        if let Some(p) = &phone {
            if !is_plausible_phone(p) {
                errors.add("phone", "must contain 7 to 15 digits");
            }
        }
        if let Some(e) = &email {
            if !is_plausible_email(e) {
                errors.add("email", "is not a valid email address");
            }
        }
        if phone.is_none() && email.is_none() {
            errors.add("contact", "a phone number or email address is required");
        }

        match (blood_type, self.date_of_birth) {
            (Some(blood_type), Some(date_of_birth)) if errors.is_empty() => Ok(ValidatedRegistration {
                first_name,
                last_name,
                blood_type,
                date_of_birth,
                phone,
                email,
            }),
            _ => Err(DonorError::Validation(errors)),
        }
    }
}

fn name(errors: &mut FieldErrors, field: &str, value: String) -> String {
    let value = value.trim().to_string();
    if value.is_empty() {
        errors.add(field, "is required");
    } else if value.chars().count() > MAX_NAME_LEN {
        errors.add(field, format!("must be at most {} characters", MAX_NAME_LEN));
    }
    value
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn is_plausible_phone(phone: &str) -> bool {
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'));
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    allowed && (7..=15).contains(&digits)
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}
