//! GraphQL documents sent to the CMS.
//!
//! Queries are plain strings posted as `{query, variables}`; responses are
//! deserialized by the raw structs in `conversions`. Reviews are always
//! requested with `approved: true` - unmoderated reviews never reach the
//! storefront.

/// List products, optionally filtered by category slug.
pub const GET_PRODUCTS: &str = r"
query GetProducts($category: String) {
  products(category: $category) {
    id
    title
    slug
    price
    description
    images { url altText }
    category { id name slug }
    reviews(approved: true) { id rating comment authorName createdAt }
  }
}";

/// Fetch a single product by slug, with its approved reviews.
pub const GET_PRODUCT_BY_SLUG: &str = r"
query GetProductBySlug($slug: String!) {
  product(slug: $slug) {
    id
    title
    slug
    price
    description
    images { url altText }
    category { id name slug }
    reviews(approved: true) { id rating comment authorName createdAt }
  }
}";

/// List all categories.
pub const GET_CATEGORIES: &str = r"
query GetCategories {
  categories {
    id
    name
    slug
    description
  }
}";

/// Fetch a single category by slug.
pub const GET_CATEGORY_BY_SLUG: &str = r"
query GetCategoryBySlug($slug: String!) {
  category(slug: $slug) {
    id
    name
    slug
    description
  }
}";

/// Create an unapproved review (moderation happens in the CMS).
pub const CREATE_REVIEW: &str = r"
mutation CreateReview($input: ReviewInput!) {
  createReview(input: $input) {
    id
  }
}";

/// Create a product (admin).
pub const CREATE_PRODUCT: &str = r"
mutation CreateProduct($input: ProductInput!) {
  createProduct(input: $input) {
    id
  }
}";

/// Update a product (admin).
pub const UPDATE_PRODUCT: &str = r"
mutation UpdateProduct($id: ID!, $input: ProductInput!) {
  updateProduct(id: $id, input: $input) {
    id
  }
}";

/// Delete a product (admin).
pub const DELETE_PRODUCT: &str = r"
mutation DeleteProduct($id: ID!) {
  deleteProduct(id: $id) {
    id
  }
}";
