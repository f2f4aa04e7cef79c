//! Domain types for the headless CMS.
//!
//! These types provide a clean, ergonomic API separate from the raw
//! GraphQL response shapes (see `conversions`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tealeaf_core::{CategoryId, Price, ProductId, ReviewId};

// =============================================================================
// Catalog Types
// =============================================================================

/// Product or category image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
}

/// A product category as referenced from a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

/// A full product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

/// An approved customer review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    /// Star rating, 1-5.
    pub rating: u8,
    pub comment: Option<String>,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
}

/// Aggregate rating over a product's approved reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
    /// Mean rating, e.g. 4.5.
    pub average: f64,
    /// Number of approved reviews.
    pub count: u32,
}

impl RatingSummary {
    /// Aggregate a list of approved reviews. `None` when there are none -
    /// a product with no reviews shows no rating rather than a zero.
    #[must_use]
    pub fn from_reviews(reviews: &[Review]) -> Option<Self> {
        if reviews.is_empty() {
            return None;
        }

        let sum: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
        #[allow(clippy::cast_precision_loss)] // review counts are tiny
        let average = f64::from(sum) / reviews.len() as f64;

        Some(Self {
            average,
            count: u32::try_from(reviews.len()).unwrap_or(u32::MAX),
        })
    }
}

/// A product as displayed in the storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub slug: String,
    pub price: Price,
    pub description: String,
    pub images: Vec<Image>,
    pub category: Option<CategorySummary>,
    /// Aggregate over `reviews`; `None` when unreviewed.
    pub rating: Option<RatingSummary>,
    pub reviews: Vec<Review>,
}

// =============================================================================
// Mutation Inputs
// =============================================================================

/// A review submission. Created unapproved; the CMS moderation queue
/// decides whether it ever appears in aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub product_id: ProductId,
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub author_name: String,
    pub author_email: String,
}

/// Admin input for creating or updating a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub title: String,
    pub slug: String,
    pub price: Price,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    /// Asset ids returned by the upload endpoint, display order.
    #[serde(default)]
    pub image_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn review(id: &str, rating: u8) -> Review {
        Review {
            id: ReviewId::new(id),
            rating,
            comment: None,
            author_name: "A".to_string(),
            created_at: Utc.timestamp_opt(1_700_000_000, 0).single().unwrap_or_default(),
        }
    }

    #[test]
    fn test_rating_summary_empty() {
        assert_eq!(RatingSummary::from_reviews(&[]), None);
    }

    #[test]
    fn test_rating_summary_average() {
        let reviews = vec![review("1", 5), review("2", 4), review("3", 3)];
        let summary = RatingSummary::from_reviews(&reviews).expect("non-empty");
        assert!((summary.average - 4.0).abs() < f64::EPSILON);
        assert_eq!(summary.count, 3);
    }

    #[test]
    fn test_rating_summary_single() {
        let summary = RatingSummary::from_reviews(&[review("1", 5)]).expect("non-empty");
        assert!((summary.average - 5.0).abs() < f64::EPSILON);
        assert_eq!(summary.count, 1);
    }
}
