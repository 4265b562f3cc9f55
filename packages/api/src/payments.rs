//! Payment gateway client, server-only.
//!
//! The gateway is an external collaborator: CourseHub creates an order,
//! hands the hosted checkout URL to the client, and later asks the gateway
//! whether the order was paid. With no gateway configured (local
//! development) orders are created with a local reference and treated as
//! payable immediately.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment gateway request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("payment gateway rejected the order: {0}")]
    Rejected(String),
}

/// An order as the gateway reports it back.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayOrder {
    pub order_ref: String,
    pub checkout_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateOrderResponse {
    id: String,
    checkout_url: String,
}

#[derive(Debug, Deserialize)]
struct OrderStatusResponse {
    status: String,
}

/// Thin client over the hosted-checkout HTTP API.
pub struct PaymentGateway {
    base_url: Option<String>,
    api_key: Option<String>,
    client: Client,
}

impl PaymentGateway {
    /// Read `PAYMENT_GATEWAY_URL` / `PAYMENT_GATEWAY_KEY` from the
    /// environment. Both absent means local mode.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self {
            base_url: std::env::var("PAYMENT_GATEWAY_URL").ok(),
            api_key: std::env::var("PAYMENT_GATEWAY_KEY").ok(),
            client: Client::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    /// Create an order for the given amount. `receipt` ties the gateway
    /// order back to our own orders table.
    pub async fn create_order(
        &self,
        amount_cents: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<GatewayOrder, PaymentError> {
        let Some(base_url) = &self.base_url else {
            return Ok(GatewayOrder {
                order_ref: local_order_ref(),
                checkout_url: None,
            });
        };

        let response = self
            .client
            .post(format!("{base_url}/v1/orders"))
            .bearer_auth(self.api_key.as_deref().unwrap_or_default())
            .json(&serde_json::json!({
                "amount": amount_cents,
                "currency": currency,
                "receipt": receipt,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Rejected(body));
        }

        let order: CreateOrderResponse = response.json().await?;
        Ok(GatewayOrder {
            order_ref: order.id,
            checkout_url: Some(order.checkout_url),
        })
    }

    /// Whether the gateway reports the order as paid. Local orders are
    /// always considered paid so the purchase flow works without a gateway.
    pub async fn is_paid(&self, order_ref: &str) -> Result<bool, PaymentError> {
        let Some(base_url) = &self.base_url else {
            return Ok(order_ref.starts_with(LOCAL_ORDER_PREFIX));
        };

        let response = self
            .client
            .get(format!("{base_url}/v1/orders/{order_ref}"))
            .bearer_auth(self.api_key.as_deref().unwrap_or_default())
            .send()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Rejected(body));
        }

        let status: OrderStatusResponse = response.json().await?;
        Ok(status.status == "paid")
    }
}

const LOCAL_ORDER_PREFIX: &str = "local-";

fn local_order_ref() -> String {
    format!("{LOCAL_ORDER_PREFIX}{}", Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_refs_are_unique_and_prefixed() {
        let a = local_order_ref();
        let b = local_order_ref();
        assert!(a.starts_with(LOCAL_ORDER_PREFIX));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn unconfigured_gateway_creates_local_orders() {
        let gateway = PaymentGateway {
            base_url: None,
            api_key: None,
            client: Client::new(),
        };
        assert!(!gateway.is_configured());

        let order = gateway.create_order(4900, "USD", "order-1").await.unwrap();
        assert!(order.order_ref.starts_with(LOCAL_ORDER_PREFIX));
        assert_eq!(order.checkout_url, None);
        assert!(gateway.is_paid(&order.order_ref).await.unwrap());
    }
}
