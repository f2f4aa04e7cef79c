//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use tealeaf_core::ShippingPolicy;

use crate::chat::ChatRegistry;
use crate::cms::CmsClient;
use crate::config::StorefrontConfig;
use crate::services::bot::FeedbackBotClient;
use crate::services::orders::HttpOrderIntake;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    cms: CmsClient,
    orders: HttpOrderIntake,
    chat: ChatRegistry,
    bot: Option<FeedbackBotClient>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let cms = CmsClient::new(&config.cms);
        let orders = HttpOrderIntake::new(&config.orders);
        let bot = config.chat_bot.as_ref().map(FeedbackBotClient::new);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                cms,
                orders,
                chat: ChatRegistry::new(),
                bot,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the CMS API client.
    #[must_use]
    pub fn cms(&self) -> &CmsClient {
        &self.inner.cms
    }

    /// Get a reference to the order intake client.
    #[must_use]
    pub fn orders(&self) -> &HttpOrderIntake {
        &self.inner.orders
    }

    /// Get a reference to the live chat connection registry.
    #[must_use]
    pub fn chat(&self) -> &ChatRegistry {
        &self.inner.chat
    }

    /// Get the support bot client, when configured.
    #[must_use]
    pub fn bot(&self) -> Option<&FeedbackBotClient> {
        self.inner.bot.as_ref()
    }

    /// Shipping policy derived from configuration.
    #[must_use]
    pub fn shipping_policy(&self) -> ShippingPolicy {
        self.inner.config.shipping.policy()
    }
}
