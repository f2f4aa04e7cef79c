//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (session storage)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `STOREFRONT_SESSION_SECRET` - Session signing secret (min 32 chars)
//! - `CMS_GRAPHQL_URL` - Headless CMS GraphQL endpoint
//! - `CMS_API_TOKEN` - CMS API token
//! - `ORDER_INTAKE_URL` - Order-intake service endpoint
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `ORDER_NUMBER_PREFIX` - Order number prefix (default: TEA)
//! - `FREE_SHIPPING_THRESHOLD` - Subtotal for free shipping (default: 100.00)
//! - `BASE_SHIPPING_COST` - Flat shipping cost (default: 10.00)
//! - `CHAT_BOT_URL` - Messaging-bot webhook for feedback chat
//! - `CHAT_BOT_TOKEN` - Messaging-bot API token (required when URL is set)
//! - `GA4_MEASUREMENT_ID` - Google Analytics 4 measurement ID
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use tealeaf_core::{Price, ShippingPolicy};

const MIN_SESSION_SECRET_LENGTH: usize = 32;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` connection URL for session storage (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Headless CMS configuration
    pub cms: CmsConfig,
    /// Order-intake service configuration
    pub orders: OrderIntakeConfig,
    /// Shipping policy knobs
    pub shipping: ShippingConfig,
    /// Feedback chat bot configuration (chat forwarding disabled when unset)
    pub chat_bot: Option<ChatBotConfig>,
    /// Analytics configuration
    pub analytics: AnalyticsConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Headless CMS API configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct CmsConfig {
    /// GraphQL endpoint, e.g. `https://cms.tealeaf.shop/graphql`
    pub graphql_url: String,
    /// API token sent as a bearer header
    pub api_token: SecretString,
}

impl std::fmt::Debug for CmsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CmsConfig")
            .field("graphql_url", &self.graphql_url)
            .field("api_token", &"[REDACTED]")
            .finish()
    }
}

/// Order-intake service configuration.
#[derive(Debug, Clone)]
pub struct OrderIntakeConfig {
    /// HTTP endpoint accepting order payloads
    pub url: String,
    /// Prefix for generated order numbers
    pub order_number_prefix: String,
}

/// Shipping policy configuration.
#[derive(Debug, Clone, Copy)]
pub struct ShippingConfig {
    /// Subtotal at or above which shipping is free
    pub free_shipping_threshold: Decimal,
    /// Flat shipping cost below the threshold
    pub base_shipping_cost: Decimal,
}

impl ShippingConfig {
    /// Build the core pricing policy from the configured amounts.
    #[must_use]
    pub fn policy(&self) -> ShippingPolicy {
        ShippingPolicy {
            free_shipping_threshold: Price::new(self.free_shipping_threshold),
            base_shipping_cost: Price::new(self.base_shipping_cost),
        }
    }
}

/// Messaging-bot integration for the feedback chat widget.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct ChatBotConfig {
    /// Webhook URL the bot listens on
    pub webhook_url: String,
    /// Bot API token
    pub token: SecretString,
}

impl std::fmt::Debug for ChatBotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatBotConfig")
            .field("webhook_url", &self.webhook_url)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Analytics configuration.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsConfig {
    /// Google Analytics 4 measurement ID
    pub ga4_measurement_id: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (length, placeholder detection).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("STOREFRONT_DATABASE_URL")?;
        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?;
        let session_secret = get_validated_secret("STOREFRONT_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "STOREFRONT_SESSION_SECRET")?;

        let cms = CmsConfig::from_env()?;
        let orders = OrderIntakeConfig::from_env()?;
        let shipping = ShippingConfig::from_env()?;
        let chat_bot = ChatBotConfig::from_env()?;
        let analytics = AnalyticsConfig::from_env();
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret,
            cms,
            orders,
            shipping,
            chat_bot,
            analytics,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CmsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let graphql_url = get_required_env("CMS_GRAPHQL_URL")?;
        url::Url::parse(&graphql_url)
            .map_err(|e| ConfigError::InvalidEnvVar("CMS_GRAPHQL_URL".to_string(), e.to_string()))?;

        Ok(Self {
            graphql_url,
            api_token: get_validated_secret("CMS_API_TOKEN")?,
        })
    }
}

impl OrderIntakeConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let intake_url = get_required_env("ORDER_INTAKE_URL")?;
        url::Url::parse(&intake_url).map_err(|e| {
            ConfigError::InvalidEnvVar("ORDER_INTAKE_URL".to_string(), e.to_string())
        })?;

        Ok(Self {
            url: intake_url,
            order_number_prefix: get_env_or_default("ORDER_NUMBER_PREFIX", "TEA"),
        })
    }
}

impl ShippingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            free_shipping_threshold: get_decimal_or_default("FREE_SHIPPING_THRESHOLD", "100.00")?,
            base_shipping_cost: get_decimal_or_default("BASE_SHIPPING_COST", "10.00")?,
        })
    }
}

impl ChatBotConfig {
    /// Both variables must be present for the chat forwarder to be enabled.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(webhook_url) = get_optional_env("CHAT_BOT_URL") else {
            return Ok(None);
        };
        url::Url::parse(&webhook_url)
            .map_err(|e| ConfigError::InvalidEnvVar("CHAT_BOT_URL".to_string(), e.to_string()))?;

        Ok(Some(Self {
            webhook_url,
            token: get_validated_secret("CHAT_BOT_TOKEN")?,
        }))
    }
}

impl AnalyticsConfig {
    fn from_env() -> Self {
        Self {
            ga4_measurement_id: get_optional_env("GA4_MEASUREMENT_ID"),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a decimal environment variable with a default value.
fn get_decimal_or_default(key: &str, default: &str) -> Result<Decimal, ConfigError> {
    get_env_or_default(key, default)
        .parse::<Decimal>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Validate that a secret is not an obvious placeholder.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-key-here", "TEST_VAR");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn test_validate_secret_strength_changeme() {
        assert!(validate_secret_strength("changeme123", "TEST_VAR").is_err());
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_session_secret_too_short() {
        let secret = SecretString::from("short");
        assert!(validate_session_secret(&secret, "TEST_SESSION").is_err());
    }

    #[test]
    fn test_validate_session_secret_valid_length() {
        let secret = SecretString::from("a".repeat(32));
        assert!(validate_session_secret(&secret, "TEST_SESSION").is_ok());
    }

    #[test]
    fn test_shipping_config_policy() {
        let config = ShippingConfig {
            free_shipping_threshold: "100.00".parse().unwrap(),
            base_shipping_cost: "10.00".parse().unwrap(),
        };
        assert_eq!(config.policy(), ShippingPolicy::default());
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            cms: CmsConfig {
                graphql_url: "https://cms.test/graphql".to_string(),
                api_token: SecretString::from("token"),
            },
            orders: OrderIntakeConfig {
                url: "https://orders.test/intake".to_string(),
                order_number_prefix: "TEA".to_string(),
            },
            shipping: ShippingConfig {
                free_shipping_threshold: "100.00".parse().unwrap(),
                base_shipping_cost: "10.00".parse().unwrap(),
            },
            chat_bot: None,
            analytics: AnalyticsConfig::default(),
            sentry_dsn: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_cms_config_debug_redacts_token() {
        let config = CmsConfig {
            graphql_url: "https://cms.test/graphql".to_string(),
            api_token: SecretString::from("super_secret_token"),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("https://cms.test/graphql"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_token"));
    }
}
