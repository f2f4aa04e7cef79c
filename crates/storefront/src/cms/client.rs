//! CMS GraphQL client implementation.
//!
//! Plain `{query, variables}` POSTs with `reqwest`; catalog reads are
//! cached with `moka` (5-minute TTL). Mutations invalidate the whole
//! catalog cache - they are rare (admin actions) and correctness beats
//! cleverness here.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::CmsConfig;

use super::cache::{CacheKey, CacheValue};
use super::conversions::{
    CategoriesData, CategoryData, CreatedIdData, ProductData, ProductsData,
};
use super::types::{Category, NewReview, Product, ProductInput};
use super::{CmsError, queries};

/// Catalog cache TTL.
const CACHE_TTL: Duration = Duration::from_secs(300);

/// Raw GraphQL response envelope.
#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    errors: Option<Vec<GraphQlResponseError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponseError {
    message: String,
}

/// Client for the headless CMS API.
///
/// Cheaply cloneable; all state lives behind an `Arc`.
#[derive(Clone)]
pub struct CmsClient {
    inner: Arc<CmsClientInner>,
}

struct CmsClientInner {
    client: reqwest::Client,
    endpoint: String,
    upload_endpoint: String,
    api_token: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl CmsClient {
    /// Create a new CMS client.
    #[must_use]
    pub fn new(config: &CmsConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(CACHE_TTL)
            .build();

        // Image uploads use the CMS REST endpoint next to the GraphQL one.
        let upload_endpoint = format!(
            "{}/api/upload",
            config.graphql_url.trim_end_matches("/graphql")
        );

        Self {
            inner: Arc::new(CmsClientInner {
                client: reqwest::Client::new(),
                endpoint: config.graphql_url.clone(),
                upload_endpoint,
                api_token: config.api_token.expose_secret().to_string(),
                cache,
            }),
        }
    }

    /// Execute a GraphQL document and return the `data` value.
    async fn execute(
        &self,
        query: &'static str,
        variables: serde_json::Value,
    ) -> Result<serde_json::Value, CmsError> {
        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .bearer_auth(&self.inner.api_token)
            .json(&serde_json::json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CmsError::RateLimited(retry_after));
        }

        // Body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "CMS returned non-success status"
            );
            return Err(CmsError::GraphQL(vec![format!(
                "HTTP {status}: {}",
                response_text.chars().take(200).collect::<String>()
            )]));
        }

        let envelope: GraphQlResponse = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse CMS GraphQL response"
            );
            CmsError::Parse(e)
        })?;

        if let Some(errors) = envelope.errors
            && !errors.is_empty()
        {
            debug!(?errors, "GraphQL errors in CMS response");
            return Err(CmsError::GraphQL(
                errors.into_iter().map(|e| e.message).collect(),
            ));
        }

        envelope
            .data
            .ok_or_else(|| CmsError::GraphQL(vec!["response had no data".to_string()]))
    }

    // =========================================================================
    // Catalog reads (cached)
    // =========================================================================

    /// List products, optionally filtered by category slug.
    #[instrument(skip(self))]
    pub async fn get_products(&self, category: Option<&str>) -> Result<Vec<Product>, CmsError> {
        let key = CacheKey::Products {
            category: category.map(str::to_owned),
        };
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&key).await {
            debug!("cache hit for product list");
            return Ok(products);
        }

        let data = self
            .execute(
                queries::GET_PRODUCTS,
                serde_json::json!({ "category": category }),
            )
            .await?;
        let data: ProductsData = serde_json::from_value(data)?;
        let products: Vec<Product> = data.products.into_iter().map(Product::from).collect();

        self.inner
            .cache
            .insert(key, CacheValue::Products(products.clone()))
            .await;
        Ok(products)
    }

    /// Fetch a single product by slug, with its approved reviews.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError::NotFound`] when the slug does not exist.
    #[instrument(skip(self))]
    pub async fn get_product_by_slug(&self, slug: &str) -> Result<Product, CmsError> {
        let key = CacheKey::Product(slug.to_owned());
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("cache hit for product");
            return Ok(*product);
        }

        let data = self
            .execute(
                queries::GET_PRODUCT_BY_SLUG,
                serde_json::json!({ "slug": slug }),
            )
            .await?;
        let data: ProductData = serde_json::from_value(data)?;
        let product = data
            .product
            .map(Product::from)
            .ok_or_else(|| CmsError::NotFound(format!("product {slug}")))?;

        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(product)
    }

    /// List all categories.
    #[instrument(skip(self))]
    pub async fn get_categories(&self) -> Result<Vec<Category>, CmsError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("cache hit for category list");
            return Ok(categories);
        }

        let data = self
            .execute(queries::GET_CATEGORIES, serde_json::json!({}))
            .await?;
        let data: CategoriesData = serde_json::from_value(data)?;
        let categories: Vec<Category> = data.categories.into_iter().map(Category::from).collect();

        self.inner
            .cache
            .insert(CacheKey::Categories, CacheValue::Categories(categories.clone()))
            .await;
        Ok(categories)
    }

    /// Fetch a single category by slug.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError::NotFound`] when the slug does not exist.
    #[instrument(skip(self))]
    pub async fn get_category_by_slug(&self, slug: &str) -> Result<Category, CmsError> {
        let key = CacheKey::Category(slug.to_owned());
        if let Some(CacheValue::Category(category)) = self.inner.cache.get(&key).await {
            return Ok(*category);
        }

        let data = self
            .execute(
                queries::GET_CATEGORY_BY_SLUG,
                serde_json::json!({ "slug": slug }),
            )
            .await?;
        let data: CategoryData = serde_json::from_value(data)?;
        let category = data
            .category
            .map(Category::from)
            .ok_or_else(|| CmsError::NotFound(format!("category {slug}")))?;

        self.inner
            .cache
            .insert(key, CacheValue::Category(Box::new(category.clone())))
            .await;
        Ok(category)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Submit a review for moderation. Returns the new review id.
    ///
    /// The review is created unapproved and will not appear in product
    /// aggregates until a moderator approves it in the CMS.
    #[instrument(skip(self, review), fields(product_id = %review.product_id))]
    pub async fn create_review(&self, review: &NewReview) -> Result<String, CmsError> {
        let data = self
            .execute(
                queries::CREATE_REVIEW,
                serde_json::json!({ "input": review }),
            )
            .await?;
        let data: CreatedIdData = serde_json::from_value(data)?;
        Ok(data.payload.id)
    }

    /// Create a product (admin). Returns the new product id.
    #[instrument(skip(self, input), fields(slug = %input.slug))]
    pub async fn create_product(&self, input: &ProductInput) -> Result<String, CmsError> {
        let data = self
            .execute(
                queries::CREATE_PRODUCT,
                serde_json::json!({ "input": input }),
            )
            .await?;
        let data: CreatedIdData = serde_json::from_value(data)?;

        self.inner.cache.invalidate_all();
        Ok(data.payload.id)
    }

    /// Update a product (admin).
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: &str, input: &ProductInput) -> Result<(), CmsError> {
        let data = self
            .execute(
                queries::UPDATE_PRODUCT,
                serde_json::json!({ "id": id, "input": input }),
            )
            .await?;
        let _: CreatedIdData = serde_json::from_value(data)?;

        self.inner.cache.invalidate_all();
        Ok(())
    }

    /// Delete a product (admin).
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &str) -> Result<(), CmsError> {
        let data = self
            .execute(queries::DELETE_PRODUCT, serde_json::json!({ "id": id }))
            .await?;
        let _: CreatedIdData = serde_json::from_value(data)?;

        self.inner.cache.invalidate_all();
        Ok(())
    }

    /// Upload one already-validated image to the CMS asset endpoint.
    /// Returns the asset id to reference from [`ProductInput::image_ids`].
    #[instrument(skip(self, bytes), fields(filename = %filename, size = bytes.len()))]
    pub async fn upload_image(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, CmsError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_owned())
            .mime_str(content_type)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .inner
            .client
            .post(&self.inner.upload_endpoint)
            .bearer_auth(&self.inner.api_token)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        #[derive(Deserialize)]
        struct UploadResponse {
            id: String,
        }

        let uploaded: UploadResponse = response.json().await?;
        Ok(uploaded.id)
    }
}
