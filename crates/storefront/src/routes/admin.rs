//! Admin catalog management handlers.
//!
//! Products are created and edited through the CMS; these handlers
//! validate the input, forward it, and invalidate the catalog cache via
//! the client. Image uploads are validated file by file so the admin UI
//! can show which file was rejected and why.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{instrument, warn};

use crate::cms::ProductInput;
use crate::error::{AppError, Result};
use crate::services::uploads::{validate_image, validate_image_count};
use crate::state::AppState;

/// Create a product.
#[instrument(skip(state, input), fields(slug = %input.slug))]
pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<Value>)> {
    validate_product_input(&input)?;
    let id = state.cms().create_product(&input).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// Update a product.
#[instrument(skip(state, input))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ProductInput>,
) -> Result<Json<Value>> {
    validate_product_input(&input)?;
    state.cms().update_product(&id, &input).await?;
    Ok(Json(json!({ "id": id })))
}

/// Delete a product.
#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.cms().delete_product(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn validate_product_input(input: &ProductInput) -> Result<()> {
    if input.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required".to_string()));
    }
    if input.slug.trim().is_empty() {
        return Err(AppError::BadRequest("Slug is required".to_string()));
    }
    if input.price.amount().is_sign_negative() {
        return Err(AppError::BadRequest(
            "Price must not be negative".to_string(),
        ));
    }
    Ok(())
}

// =============================================================================
// Image Uploads
// =============================================================================

/// One successfully uploaded image.
#[derive(Debug, Serialize)]
pub struct UploadedImage {
    pub filename: String,
    /// Asset id to reference from product image lists.
    pub id: String,
}

/// One rejected or failed image.
#[derive(Debug, Serialize)]
pub struct FailedImage {
    pub filename: String,
    pub error: String,
}

/// Result of a multi-image upload; partial success is normal.
#[derive(Debug, Serialize)]
pub struct UploadOutcome {
    pub uploaded: Vec<UploadedImage>,
    pub errors: Vec<FailedImage>,
}

struct PendingImage {
    filename: String,
    content_type: String,
    bytes: Vec<u8>,
}

/// Upload product images.
///
/// Every file in the request is validated before any byte is forwarded,
/// so a request over the count limit transfers nothing to the CMS.
#[instrument(skip(state, multipart))]
pub async fn upload_images(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadOutcome>> {
    let mut pending = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::BadRequest(format!("Malformed multipart body: {err}")))?
    {
        let filename = field
            .file_name()
            .map_or_else(|| "unnamed".to_string(), ToString::to_string);
        let content_type = field
            .content_type()
            .map_or_else(|| "application/octet-stream".to_string(), ToString::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|err| AppError::BadRequest(format!("Failed reading {filename}: {err}")))?;

        pending.push(PendingImage {
            filename,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    if pending.is_empty() {
        return Err(AppError::BadRequest("No images in request".to_string()));
    }
    validate_image_count(pending.len())?;

    let mut outcome = UploadOutcome {
        uploaded: Vec::new(),
        errors: Vec::new(),
    };

    for image in pending {
        if let Err(rejection) =
            validate_image(&image.filename, &image.content_type, image.bytes.len())
        {
            outcome.errors.push(FailedImage {
                filename: image.filename,
                error: rejection.to_string(),
            });
            continue;
        }

        match state
            .cms()
            .upload_image(&image.filename, &image.content_type, image.bytes)
            .await
        {
            Ok(id) => outcome.uploaded.push(UploadedImage {
                filename: image.filename,
                id,
            }),
            Err(err) => {
                warn!(filename = %image.filename, error = %err, "image upload failed");
                outcome.errors.push(FailedImage {
                    filename: image.filename,
                    error: "Upload to the catalog service failed".to_string(),
                });
            }
        }
    }

    Ok(Json(outcome))
}
