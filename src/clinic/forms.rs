//! Form validation
//!
//! Required-field checks applied by the API and CLI before calling into the
//! store. The store itself only rejects duplicate usernames.

use serde::Deserialize;
use thiserror::Error;

/// A form failed its required-field checks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("All fields are required")]
    MissingRegistrationField(&'static str),

    #[error("{0} is required")]
    MissingField(&'static str),
}

impl ValidationError {
    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingRegistrationField(f) | ValidationError::MissingField(f) => f,
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Account registration form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub name: String,
    pub specialty: String,
    pub username: String,
    pub password: String,
}

impl RegistrationForm {
    /// Every field is required
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("name", &self.name),
            ("specialty", &self.specialty),
            ("username", &self.username),
            ("password", &self.password),
        ];

        for (field, value) in fields {
            if is_blank(value) {
                return Err(ValidationError::MissingRegistrationField(field));
            }
        }
        Ok(())
    }
}

/// Walk-in patient form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewAppointmentForm {
    pub patient_name: String,
    pub phone: String,
    pub reason: String,
}

impl NewAppointmentForm {
    /// Name and phone are required, reason is optional
    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.patient_name) {
            return Err(ValidationError::MissingField("patient_name"));
        }
        if is_blank(&self.phone) {
            return Err(ValidationError::MissingField("phone"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> RegistrationForm {
        RegistrationForm {
            name: "Alice Smith".to_string(),
            specialty: "Cardiology".to_string(),
            username: "alice".to_string(),
            password: "pw".to_string(),
        }
    }

    #[test]
    fn test_registration_complete() {
        assert!(registration().validate().is_ok());
    }

    #[test]
    fn test_registration_missing_field() {
        let mut form = registration();
        form.specialty = "  ".to_string();

        let err = form.validate().unwrap_err();
        assert_eq!(err.field(), "specialty");
        assert_eq!(err.to_string(), "All fields are required");
    }

    #[test]
    fn test_appointment_reason_optional() {
        let form = NewAppointmentForm {
            patient_name: "John Doe".to_string(),
            phone: "555-0100".to_string(),
            reason: String::new(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_appointment_requires_phone() {
        let form = NewAppointmentForm {
            patient_name: "John Doe".to_string(),
            phone: String::new(),
            reason: "Cough".to_string(),
        };
        assert_eq!(
            form.validate(),
            Err(ValidationError::MissingField("phone"))
        );
    }
}
