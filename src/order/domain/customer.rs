//! Customer contact and delivery address snapshots captured at checkout.

use super::OrderDomainError;
use serde::{Deserialize, Serialize};

/// Contact details of the ordering customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
}

impl CustomerDetails {
    /// Creates validated contact details.
    ///
    /// # Errors
    ///
    /// Returns [`OrderDomainError::EmptyCustomerField`] when the first name,
    /// last name, or email is blank.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, OrderDomainError> {
        Ok(Self {
            first_name: required(first_name.into(), "first name")?,
            last_name: required(last_name.into(), "last name")?,
            email: required(email.into(), "email")?,
            phone: None,
        })
    }

    /// Sets the phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Returns the first name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Returns the last name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Returns `"<first> <last>"`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the phone number, if any.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }
}

/// Address an order is delivered to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    /// Street and number.
    pub street: String,
    /// City.
    pub city: String,
    /// State or region.
    pub state: String,
    /// Country.
    pub country: String,
    /// Postal code.
    pub zip_code: String,
}

fn required(value: String, field: &'static str) -> Result<String, OrderDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(OrderDomainError::EmptyCustomerField(field));
    }
    Ok(trimmed.to_owned())
}
