//! Headless CMS client.
//!
//! # Architecture
//!
//! - GraphQL over HTTP via `reqwest` (plain `{query, variables}` POST)
//! - The CMS is the source of truth - no local sync, direct API calls
//! - In-memory caching via `moka` for catalog reads (5 minute TTL)
//!
//! The storefront consumes read-only product/category/review data for
//! display, forwards moderated review submissions, and proxies admin
//! product CRUD (including image upload). It does not own the CMS schema.

mod cache;
mod client;
mod conversions;
pub mod queries;
pub mod types;

pub use client::CmsClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the CMS.
#[derive(Debug, Error)]
pub enum CmsError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<String>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the CMS.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

fn format_graphql_errors(errors: &[String]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }
    errors.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cms_error_display() {
        let err = CmsError::NotFound("product sencha".to_string());
        assert_eq!(err.to_string(), "Not found: product sencha");
    }

    #[test]
    fn test_graphql_error_formatting() {
        let err = CmsError::GraphQL(vec![
            "Field not found".to_string(),
            "Invalid ID".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Field not found; Invalid ID"
        );
    }

    #[test]
    fn test_graphql_error_empty_vec() {
        let err = CmsError::GraphQL(vec![]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: (no error details provided)"
        );
    }

    #[test]
    fn test_rate_limited_error() {
        let err = CmsError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }
}
