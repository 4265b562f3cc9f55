//! Checkout collaborator interface.
//!
//! The payment popup itself is external; views only build a
//! [`CheckoutRequest`] and hand it to whatever handler the app installed.
//! The web app's handler redirects to the gateway's hosted checkout page.

use dioxus::prelude::*;

/// Everything the checkout collaborator needs for one purchase.
#[derive(Clone, PartialEq)]
pub struct CheckoutRequest {
    pub order_ref: String,
    pub amount_cents: i64,
    pub currency: String,
    /// Hosted checkout page; absent in local (gateway-less) mode.
    pub checkout_url: Option<String>,
    /// Called with a user-facing message once the purchase is confirmed.
    pub on_success: EventHandler<String>,
    /// Called with a user-facing message when the purchase fails.
    pub on_failure: EventHandler<String>,
}

/// The app-installed checkout handler.
#[derive(Clone, Copy)]
pub struct CheckoutHandler(pub Callback<CheckoutRequest>);

/// Install a checkout handler for the subtree. Call once near the app root.
pub fn provide_checkout(handler: Callback<CheckoutRequest>) {
    use_context_provider(|| CheckoutHandler(handler));
}

/// Get the installed checkout handler.
pub fn use_checkout() -> CheckoutHandler {
    use_context::<CheckoutHandler>()
}
