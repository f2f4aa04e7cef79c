//! Raw GraphQL response shapes and their conversions to domain types.
//!
//! The CMS returns camelCase JSON; these structs deserialize it and the
//! `From` impls compute anything derived (currently the rating aggregate).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use tealeaf_core::{CategoryId, Price, ProductId, ReviewId};

use super::types::{Category, CategorySummary, Image, Product, RatingSummary, Review};

#[derive(Debug, Deserialize)]
pub(super) struct ProductsData {
    pub products: Vec<RawProduct>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ProductData {
    pub product: Option<RawProduct>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CategoriesData {
    pub categories: Vec<RawCategory>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CategoryData {
    pub category: Option<RawCategory>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreatedIdData {
    #[serde(
        alias = "createReview",
        alias = "createProduct",
        alias = "updateProduct",
        alias = "deleteProduct"
    )]
    pub payload: CreatedId,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreatedId {
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawProduct {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<RawImage>,
    #[serde(default)]
    pub category: Option<RawCategory>,
    #[serde(default)]
    pub reviews: Vec<RawReview>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawImage {
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawCategory {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawReview {
    pub id: String,
    pub rating: i64,
    #[serde(default)]
    pub comment: Option<String>,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<RawReview> for Review {
    fn from(raw: RawReview) -> Self {
        Self {
            id: ReviewId::new(raw.id),
            // the CMS enforces 1-5; clamp instead of trusting it
            rating: u8::try_from(raw.rating.clamp(1, 5)).unwrap_or(5),
            comment: raw.comment,
            author_name: raw.author_name,
            created_at: raw.created_at,
        }
    }
}

impl From<RawCategory> for CategorySummary {
    fn from(raw: RawCategory) -> Self {
        Self {
            id: CategoryId::new(raw.id),
            name: raw.name,
            slug: raw.slug,
        }
    }
}

impl From<RawCategory> for Category {
    fn from(raw: RawCategory) -> Self {
        Self {
            id: CategoryId::new(raw.id),
            name: raw.name,
            slug: raw.slug,
            description: raw.description,
        }
    }
}

impl From<RawProduct> for Product {
    fn from(raw: RawProduct) -> Self {
        let reviews: Vec<Review> = raw.reviews.into_iter().map(Review::from).collect();
        let rating = RatingSummary::from_reviews(&reviews);

        Self {
            id: ProductId::new(raw.id),
            title: raw.title,
            slug: raw.slug,
            price: Price::new(raw.price),
            description: raw.description.unwrap_or_default(),
            images: raw
                .images
                .into_iter()
                .map(|img| Image {
                    url: img.url,
                    alt_text: img.alt_text,
                })
                .collect(),
            category: raw.category.map(CategorySummary::from),
            rating,
            reviews,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_conversion_computes_rating() {
        let raw: RawProduct = serde_json::from_str(
            r#"{
                "id": "p1",
                "title": "Sencha",
                "slug": "sencha",
                "price": "12.50",
                "description": "Steamed green tea",
                "images": [{"url": "https://cdn.test/sencha.webp", "altText": "Sencha"}],
                "category": {"id": "c1", "name": "Green", "slug": "green"},
                "reviews": [
                    {"id": "r1", "rating": 5, "authorName": "A", "createdAt": "2026-01-05T10:00:00Z"},
                    {"id": "r2", "rating": 4, "comment": "good", "authorName": "B", "createdAt": "2026-02-01T09:30:00Z"}
                ]
            }"#,
        )
        .unwrap();

        let product = Product::from(raw);
        assert_eq!(product.price, Price::from_cents(1250));
        let rating = product.rating.unwrap();
        assert!((rating.average - 4.5).abs() < f64::EPSILON);
        assert_eq!(rating.count, 2);
        assert_eq!(product.category.unwrap().slug, "green");
    }

    #[test]
    fn test_product_without_reviews_has_no_rating() {
        let raw: RawProduct = serde_json::from_str(
            r#"{"id": "p1", "title": "Assam", "slug": "assam", "price": "9.00"}"#,
        )
        .unwrap();

        let product = Product::from(raw);
        assert_eq!(product.rating, None);
        assert!(product.reviews.is_empty());
        assert_eq!(product.description, "");
    }

    #[test]
    fn test_out_of_range_rating_clamped() {
        let raw: RawReview = serde_json::from_str(
            r#"{"id": "r1", "rating": 11, "authorName": "A", "createdAt": "2026-01-05T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(Review::from(raw).rating, 5);
    }

    #[test]
    fn test_created_id_aliases() {
        let data: CreatedIdData =
            serde_json::from_str(r#"{"createReview": {"id": "rev_9"}}"#).unwrap();
        assert_eq!(data.payload.id, "rev_9");

        let data: CreatedIdData =
            serde_json::from_str(r#"{"createProduct": {"id": "p_3"}}"#).unwrap();
        assert_eq!(data.payload.id, "p_3");
    }
}
