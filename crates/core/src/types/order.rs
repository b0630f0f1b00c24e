//! Checkout contact form and order payloads.

use serde::{Deserialize, Serialize};

use super::cart::CartItem;
use super::email::{Email, EmailError};
use super::id::ProductId;
use super::phone::{Phone, PhoneError};

/// Errors raised by [`ContactForm::validated`].
///
/// Messages are shown to the shopper, so they are in Vietnamese.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactFormError {
    #[error("Vui lòng nhập họ tên.")]
    MissingName,
    #[error("Số điện thoại không hợp lệ.")]
    InvalidPhone(#[source] PhoneError),
    #[error("Email không hợp lệ.")]
    InvalidEmail(#[source] EmailError),
    #[error("Vui lòng nhập địa chỉ giao hàng.")]
    MissingAddress,
    #[error("{field} quá dài (tối đa {max} ký tự).")]
    TooLong { field: &'static str, max: usize },
}

/// The contact details submitted with an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    pub address: String,
    #[serde(default)]
    pub note: Option<String>,
}

impl ContactForm {
    const MAX_FIELD_LENGTH: usize = 200;
    const MAX_NOTE_LENGTH: usize = 2000;

    /// Validate the form and return a normalized copy.
    ///
    /// Text fields are trimmed, the phone is normalized to national form and
    /// blank optional fields become `None`.
    ///
    /// # Errors
    ///
    /// Returns the first failing field.
    pub fn validated(&self) -> Result<Self, ContactFormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ContactFormError::MissingName);
        }
        check_length("Họ tên", name, Self::MAX_FIELD_LENGTH)?;

        let phone = Phone::parse(&self.phone).map_err(ContactFormError::InvalidPhone)?;

        let email = match self.email.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                Email::parse(raw)
                    .map_err(ContactFormError::InvalidEmail)?
                    .to_string(),
            ),
        };

        let address = self.address.trim();
        if address.is_empty() {
            return Err(ContactFormError::MissingAddress);
        }
        check_length("Địa chỉ", address, Self::MAX_FIELD_LENGTH)?;

        let note = self
            .note
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());
        if let Some(note) = note {
            check_length("Ghi chú", note, Self::MAX_NOTE_LENGTH)?;
        }

        Ok(Self {
            name: name.to_string(),
            phone: phone.to_string(),
            email,
            address: address.to_string(),
            note: note.map(str::to_string),
        })
    }
}

fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), ContactFormError> {
    if value.chars().count() > max {
        return Err(ContactFormError::TooLong { field, max });
    }
    Ok(())
}

/// One line of an order as sent to the CMS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl From<&CartItem> for OrderLine {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.id(),
            quantity: item.quantity,
        }
    }
}

/// The order created by the CMS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_number: String,
    /// Order total as formatted by the CMS.
    pub total: String,
}

/// Result of the order-creation boundary call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderConfirmation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl OrderResponse {
    #[must_use]
    pub const fn created(order: OrderConfirmation) -> Self {
        Self {
            success: true,
            order: Some(order),
            message: None,
        }
    }

    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            order: None,
            message: Some(message.into()),
        }
    }
}
