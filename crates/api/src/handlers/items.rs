//! Handlers for the `/items` resource.
//!
//! Every mutation answers with the new catalog and also broadcasts it to all
//! WebSocket clients.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde::Deserialize;
use skudesk_core::import::parse_csv;
use skudesk_core::item::Item;
use skudesk_core::types::ItemId;

use crate::catalog;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{CatalogSnapshot, DataResponse};
use crate::sheets::SheetRef;
use crate::state::AppState;

/// Multipart field carrying the CSV file for `POST /items/import`.
const CSV_FIELD: &str = "file";

type SnapshotResponse = Json<DataResponse<CatalogSnapshot>>;

fn respond(items: Vec<Item>) -> SnapshotResponse {
    Json(DataResponse {
        data: CatalogSnapshot::new(items),
    })
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ImportRowsRequest {
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ImportSheetRequest {
    /// Share URL or bare spreadsheet id.
    pub sheet: String,
    /// Tab id; defaults to the one in the URL, else the first tab.
    pub gid: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDescriptionRequest {
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ReorderPhotosRequest {
    pub new_order: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RemovePhotoRequest {
    pub file_full: String,
    pub file_thumb: String,
}

#[derive(Debug, Deserialize)]
pub struct ClearRequest {
    pub pin: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/items
pub async fn list_items(_user: AuthUser, State(state): State<AppState>) -> AppResult<SnapshotResponse> {
    Ok(respond(catalog::snapshot(&state).await?))
}

/// POST /api/v1/items/import
///
/// Replace the catalog from an uploaded CSV file (multipart field `file`).
pub async fn import_csv(
    _user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<SnapshotResponse> {
    let mut csv = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some(CSV_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            csv = Some(bytes);
        }
    }

    let csv = csv.ok_or_else(|| {
        AppError::BadRequest(format!("Missing multipart field '{CSV_FIELD}'"))
    })?;
    let rows = parse_csv(&csv)?;

    Ok(respond(catalog::import_rows(&state, &rows).await?))
}

/// POST /api/v1/items/import/rows
///
/// Replace the catalog from rows already parsed by the client.
pub async fn import_rows(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ImportRowsRequest>,
) -> AppResult<SnapshotResponse> {
    Ok(respond(catalog::import_rows(&state, &input.rows).await?))
}

/// POST /api/v1/items/import/sheet
///
/// Replace the catalog from an online spreadsheet tab.
pub async fn import_sheet(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ImportSheetRequest>,
) -> AppResult<SnapshotResponse> {
    let sheet = SheetRef::parse(&input.sheet, input.gid.as_deref())?;
    let rows = state.sheets.fetch_rows(&sheet).await?;

    Ok(respond(catalog::import_rows(&state, &rows).await?))
}

/// PUT /api/v1/items/{id}/description
pub async fn update_description(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
    Json(input): Json<UpdateDescriptionRequest>,
) -> AppResult<SnapshotResponse> {
    Ok(respond(
        catalog::update_description(&state, id, input.description).await?,
    ))
}

/// PUT /api/v1/items/{id}/photos/order
pub async fn reorder_photos(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
    Json(input): Json<ReorderPhotosRequest>,
) -> AppResult<SnapshotResponse> {
    Ok(respond(
        catalog::reorder_photos(&state, id, &input.new_order).await?,
    ))
}

/// DELETE /api/v1/items/{id}/photos
pub async fn remove_photo(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
    Json(input): Json<RemovePhotoRequest>,
) -> AppResult<SnapshotResponse> {
    Ok(respond(
        catalog::remove_photo(&state, id, &input.file_full, &input.file_thumb).await?,
    ))
}

/// POST /api/v1/items/clear
///
/// Delete the catalog and all uploads. Requires the clear PIN.
pub async fn clear(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ClearRequest>,
) -> AppResult<SnapshotResponse> {
    tracing::info!(username = %user.username, "Catalog clear requested");
    Ok(respond(catalog::clear(&state, &input.pin).await?))
}
