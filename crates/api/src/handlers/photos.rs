//! Photo upload handlers.

use axum::extract::multipart::Field;
use axum::extract::{Multipart, Path, State};
use axum::Json;
use skudesk_core::types::ItemId;

use crate::catalog::{self, PhotoUpload};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{CatalogSnapshot, DataResponse};
use crate::state::AppState;

/// Form field holding the item id in the combined upload form.
const ID_FIELD: &str = "id";

/// Field names accepted for photo files.
const PHOTO_FIELDS: &[&str] = &["photos[]", "photos"];

/// POST /api/v1/items/{id}/photos
///
/// Multipart upload of one or more `photos[]` files. Photos are appended in
/// the order the files appear in the form.
pub async fn upload_item_photos(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<CatalogSnapshot>>> {
    let mut uploads = Vec::new();
    while let Some(field) = next_field(&mut multipart).await? {
        if is_photo_field(&field) {
            uploads.push(read_upload(field).await?);
        }
    }

    let items = catalog::add_photos(&state, id, uploads).await?;
    Ok(Json(DataResponse {
        data: CatalogSnapshot::new(items),
    }))
}

/// POST /api/v1/photos
///
/// The browser form variant: the item id travels as an `id` text field next
/// to the `photos[]` files, in any order.
pub async fn upload_photos_form(
    _user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<CatalogSnapshot>>> {
    let mut id: Option<ItemId> = None;
    let mut uploads = Vec::new();

    while let Some(field) = next_field(&mut multipart).await? {
        if field.name() == Some(ID_FIELD) {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            id = Some(parse_id(&text)?);
        } else if is_photo_field(&field) {
            uploads.push(read_upload(field).await?);
        }
    }

    let id = id.ok_or_else(|| AppError::BadRequest("Missing item id".to_string()))?;
    let items = catalog::add_photos(&state, id, uploads).await?;
    Ok(Json(DataResponse {
        data: CatalogSnapshot::new(items),
    }))
}

async fn next_field(multipart: &mut Multipart) -> AppResult<Option<Field<'_>>> {
    multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

fn is_photo_field(field: &Field<'_>) -> bool {
    field.name().is_some_and(|name| PHOTO_FIELDS.contains(&name))
}

async fn read_upload(field: Field<'_>) -> AppResult<PhotoUpload> {
    let file_name = field.file_name().unwrap_or("upload").to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(PhotoUpload {
        file_name,
        bytes: bytes.to_vec(),
    })
}

/// Item ids are positive; zero and garbage are rejected like a missing id.
fn parse_id(text: &str) -> AppResult<ItemId> {
    text.trim()
        .parse::<ItemId>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::BadRequest("Missing item id".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_positive_integers() {
        assert_eq!(parse_id(" 12 ").unwrap(), 12);
    }

    #[test]
    fn parse_id_rejects_zero_and_garbage() {
        assert!(parse_id("0").is_err());
        assert!(parse_id("-3").is_err());
        assert!(parse_id("abc").is_err());
        assert!(parse_id("").is_err());
    }
}
