//! Order submission from the cart.

use std::future::Future;

use dainam_core::{CartItem, ContactForm, ContactFormError, OrderConfirmation, OrderResponse};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::cart::{CartStorage, CartStore};

/// Creates orders in the CMS.
pub trait OrderService: Send + Sync {
    /// Submit an order. Failures are reported in the response, never raised.
    fn create_order(
        &self,
        form: &ContactForm,
        items: &[CartItem],
    ) -> impl Future<Output = OrderResponse> + Send;
}

/// Why an order was not placed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    InvalidForm(#[from] ContactFormError),

    #[error("Giỏ hàng đang trống.")]
    EmptyCart,

    /// The CMS refused the order; `message` is shown as-is.
    #[error("{message}")]
    Rejected { message: String },
}

/// Fallback when the CMS rejects an order without saying why.
const MSG_REJECTED: &str = "Không thể tạo đơn hàng. Vui lòng thử lại.";

/// Validate `form` and submit the cart contents as an order.
///
/// The form and cart are checked locally first; the service is not called
/// if either is invalid. On success the cart is cleared once. On rejection
/// the cart is left as it was so the shopper can retry.
///
/// # Errors
///
/// Returns [`CheckoutError`] if the form is invalid, the cart is empty, or
/// the service rejects the order.
#[instrument(skip_all, fields(lines = cart.items().len()))]
pub async fn submit_order<S, O>(
    cart: &mut CartStore<S>,
    form: &ContactForm,
    service: &O,
) -> Result<OrderConfirmation, CheckoutError>
where
    S: CartStorage,
    O: OrderService,
{
    let form = form.validated()?;
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let total = cart.formatted_total();
    let response = service.create_order(&form, cart.items()).await;

    if !response.success {
        let message = response
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| MSG_REJECTED.to_string());
        warn!(message = %message, "Order rejected");
        return Err(CheckoutError::Rejected { message });
    }

    cart.clear_cart();

    let confirmation = response.order.unwrap_or(OrderConfirmation {
        order_number: String::new(),
        total,
    });
    info!(order_number = %confirmation.order_number, "Order placed");
    Ok(confirmation)
}
