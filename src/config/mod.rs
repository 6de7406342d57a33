use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub checkout: CheckoutConfig,
    pub payment: PaymentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Storefront origin allowed by CORS on the public checkout route
    pub storefront_origin: String,
    /// Base URL the payment provider redirects back to after checkout
    pub frontend_store_url: String,
    /// ISO currency code used for payment line items
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    pub secret_key: String,
    pub api_base: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_ACQUIRE_TIMEOUT_SECS") {
            self.database.acquire_timeout_secs = v.parse().unwrap_or(self.database.acquire_timeout_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }

        // Checkout overrides
        if let Ok(v) = env::var("STOREFRONT_ORIGIN") {
            self.checkout.storefront_origin = v;
        }
        if let Ok(v) = env::var("FRONTEND_STORE_URL") {
            self.checkout.frontend_store_url = v;
        }
        if let Ok(v) = env::var("CHECKOUT_CURRENCY") {
            self.checkout.currency = v;
        }

        // Payment provider overrides
        if let Ok(v) = env::var("STRIPE_SECRET_KEY") {
            self.payment.secret_key = v;
        }
        if let Ok(v) = env::var("STRIPE_API_BASE") {
            self.payment.api_base = v;
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 10,
                acquire_timeout_secs: 30,
            },
            security: SecurityConfig {
                // Development fallback only; real deployments set JWT_SECRET
                jwt_secret: "dev-secret-change-me".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
            },
            checkout: CheckoutConfig {
                storefront_origin: "http://localhost:3001".to_string(),
                frontend_store_url: "http://localhost:3001".to_string(),
                currency: "cop".to_string(),
            },
            payment: PaymentConfig {
                secret_key: String::new(),
                api_base: "https://api.stripe.com".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                max_connections: 20,
                acquire_timeout_secs: 10,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
            },
            checkout: CheckoutConfig {
                storefront_origin: "https://staging-store.example.com".to_string(),
                frontend_store_url: "https://staging-store.example.com".to_string(),
                currency: "cop".to_string(),
            },
            payment: PaymentConfig {
                secret_key: String::new(),
                api_base: "https://api.stripe.com".to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 50,
                acquire_timeout_secs: 5,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
            },
            checkout: CheckoutConfig {
                storefront_origin: "https://store.example.com".to_string(),
                frontend_store_url: "https://store.example.com".to_string(),
                currency: "cop".to_string(),
            },
            payment: PaymentConfig {
                secret_key: String::new(),
                api_base: "https://api.stripe.com".to_string(),
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
