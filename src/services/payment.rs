// Hosted-checkout client for the payment provider. The provider's API is
// form-encoded over HTTPS with secret-key bearer auth; we only need enough
// of it to open a session and hand the redirect URL back to the storefront.

use serde::Deserialize;
use uuid::Uuid;

use crate::config;

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("payment provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("payment provider rejected the request: {0}")]
    Provider(String),
}

/// One hosted-checkout line item; amounts are in minor currency units
#[derive(Debug, Clone)]
pub struct LineItem {
    pub name: String,
    pub unit_amount: i64,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
}

pub struct PaymentClient {
    http: reqwest::Client,
    secret_key: String,
    api_base: String,
    currency: String,
    frontend_store_url: String,
}

impl PaymentClient {
    pub fn from_config() -> Result<Self, PaymentError> {
        let cfg = config::config();

        if cfg.payment.secret_key.is_empty() {
            return Err(PaymentError::ConfigMissing("STRIPE_SECRET_KEY"));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            secret_key: cfg.payment.secret_key.clone(),
            api_base: cfg.payment.api_base.clone(),
            currency: cfg.checkout.currency.clone(),
            frontend_store_url: cfg.checkout.frontend_store_url.clone(),
        })
    }

    /// Open a hosted checkout session and return its redirect URL. The
    /// order id rides along in session metadata so the payment webhook can
    /// reconcile later.
    pub async fn create_checkout_session(
        &self,
        line_items: &[LineItem],
        order_id: Uuid,
    ) -> Result<CheckoutSession, PaymentError> {
        let params = self.session_form(line_items, order_id);

        let response = self
            .http
            .post(format!("{}/v1/checkout/sessions", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Provider(body));
        }

        Ok(response.json::<CheckoutSession>().await?)
    }

    /// Flatten the session request into the provider's bracketed form keys
    fn session_form(&self, line_items: &[LineItem], order_id: Uuid) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = vec![
            ("mode".to_string(), "payment".to_string()),
            ("billing_address_collection".to_string(), "required".to_string()),
            ("phone_number_collection[enabled]".to_string(), "true".to_string()),
            (
                "success_url".to_string(),
                format!("{}/cart?success=1", self.frontend_store_url),
            ),
            (
                "cancel_url".to_string(),
                format!("{}/cart?canceled=1", self.frontend_store_url),
            ),
            ("metadata[orderId]".to_string(), order_id.to_string()),
        ];

        for (i, item) in line_items.iter().enumerate() {
            params.push((format!("line_items[{}][quantity]", i), item.quantity.to_string()));
            params.push((
                format!("line_items[{}][price_data][currency]", i),
                self.currency.clone(),
            ));
            params.push((
                format!("line_items[{}][price_data][product_data][name]", i),
                item.name.clone(),
            ));
            params.push((
                format!("line_items[{}][price_data][unit_amount]", i),
                item.unit_amount.to_string(),
            ));
        }

        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> PaymentClient {
        PaymentClient {
            http: reqwest::Client::new(),
            secret_key: "sk_test_123".to_string(),
            api_base: "https://api.stripe.com".to_string(),
            currency: "cop".to_string(),
            frontend_store_url: "http://localhost:3001".to_string(),
        }
    }

    #[test]
    fn test_session_form_shape() {
        let client = test_client();
        let order_id = Uuid::new_v4();
        let items = vec![
            LineItem { name: "Shirt".to_string(), unit_amount: 4_999_00, quantity: 1 },
            LineItem { name: "Hat".to_string(), unit_amount: 1_500_00, quantity: 1 },
        ];

        let params = client.session_form(&items, order_id);
        let get = |key: &str| {
            params
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(get("mode"), Some("payment"));
        assert_eq!(get("billing_address_collection"), Some("required"));
        assert_eq!(get("phone_number_collection[enabled]"), Some("true"));
        assert_eq!(get("success_url"), Some("http://localhost:3001/cart?success=1"));
        assert_eq!(get("cancel_url"), Some("http://localhost:3001/cart?canceled=1"));
        assert_eq!(get("metadata[orderId]"), Some(order_id.to_string().as_str()));
        assert_eq!(get("line_items[0][price_data][product_data][name]"), Some("Shirt"));
        assert_eq!(get("line_items[0][price_data][unit_amount]"), Some("499900"));
        assert_eq!(get("line_items[1][price_data][currency]"), Some("cop"));
        assert_eq!(get("line_items[1][quantity]"), Some("1"));
    }
}
