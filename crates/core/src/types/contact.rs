//! Customer contact details collected at checkout.
//!
//! [`ContactForm`] is the raw, possibly incomplete input. [`ContactForm::validate`]
//! checks every field and either returns a [`CustomerContact`] or the complete
//! list of problems, so a form can show all errors at once.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::email::{Email, EmailError};

/// The fields of a contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Name,
    Email,
    Phone,
    Address,
}

impl ContactField {
    /// All fields, in form order.
    pub const ALL: [Self; 4] = [Self::Name, Self::Email, Self::Phone, Self::Address];

    /// Field name as used in forms and JSON payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
        }
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single invalid field with a human-readable reason.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: ContactField,
    pub message: String,
}

impl FieldError {
    fn required(field: ContactField) -> Self {
        Self {
            field,
            message: format!("{field} is required"),
        }
    }

    fn invalid_email(err: &EmailError) -> Self {
        Self {
            field: ContactField::Email,
            message: err.to_string(),
        }
    }
}

/// Unvalidated contact input, as typed by the customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

impl ContactForm {
    /// Validate every field.
    ///
    /// # Errors
    ///
    /// Returns one [`FieldError`] per invalid field, in form order.
    pub fn validate(&self) -> Result<CustomerContact, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = required(&self.name, ContactField::Name, &mut errors);
        let email = if self.email.trim().is_empty() {
            errors.push(FieldError::required(ContactField::Email));
            None
        } else {
            Email::parse(&self.email)
                .map_err(|e| errors.push(FieldError::invalid_email(&e)))
                .ok()
        };
        let phone = required(&self.phone, ContactField::Phone, &mut errors);
        let address = required(&self.address, ContactField::Address, &mut errors);

        match (name, email, phone, address) {
            (Some(name), Some(email), Some(phone), Some(address)) => Ok(CustomerContact {
                name,
                email,
                phone,
                address,
            }),
            _ => Err(errors),
        }
    }
}

fn required(value: &str, field: ContactField, errors: &mut Vec<FieldError>) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(FieldError::required(field));
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Validated contact details attached to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerContact {
    pub name: String,
    pub email: Email,
    pub phone: String,
    /// Delivery address.
    pub address: String,
}
