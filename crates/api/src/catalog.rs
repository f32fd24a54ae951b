//! Catalog operations shared by the HTTP routes and the WebSocket channel.
//!
//! Every mutation runs through [`CatalogStore::update`] (one writer at a
//! time), performs its file side effects, and then publishes exactly one
//! [`CatalogEvent`] carrying the new catalog. The broadcaster turns that
//! event into a `data_update` message for every connected client.
//!
//! [`CatalogStore::update`]: skudesk_store::CatalogStore::update

use rand::Rng;
use skudesk_core::catalog as ops;
use skudesk_core::error::CoreError;
use skudesk_core::import::items_from_rows;
use skudesk_core::item::{Item, Photo};
use skudesk_core::naming::{thumb_file_name, upload_file_name, validate_stored_name};
use skudesk_core::thumbnail::render_thumbnail;
use skudesk_core::types::ItemId;
use skudesk_events::bus::{
    CatalogEvent, EVENT_CATALOG_CLEARED, EVENT_CATALOG_IMPORTED, EVENT_DESCRIPTION_UPDATED,
    EVENT_PHOTOS_ADDED, EVENT_PHOTOS_REORDERED, EVENT_PHOTO_REMOVED,
};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// One received photo file, before it is stored.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    /// File name as sent by the client; only its extension is kept.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// The current catalog.
pub async fn snapshot(state: &AppState) -> AppResult<Vec<Item>> {
    Ok(state.catalog.load().await?)
}

/// Replace the catalog with items built from imported rows.
pub async fn import_rows(state: &AppState, rows: &[Vec<String>]) -> AppResult<Vec<Item>> {
    let items = state.catalog.replace(items_from_rows(rows)).await?;
    tracing::info!(rows = rows.len(), imported = items.len(), "Catalog imported");

    publish(state, CatalogEvent::new(EVENT_CATALOG_IMPORTED, items.clone()));
    Ok(items)
}

pub async fn update_description(
    state: &AppState,
    id: ItemId,
    description: String,
) -> AppResult<Vec<Item>> {
    let (items, ()) = state
        .catalog
        .update(|items| ops::set_description(items, id, description))
        .await?;
    tracing::debug!(item_id = id, "Description updated");

    publish(
        state,
        CatalogEvent::new(EVENT_DESCRIPTION_UPDATED, items.clone()).with_item(id),
    );
    Ok(items)
}

/// Store uploaded photos with thumbnails and append them to an item.
///
/// Photos are appended in the order received. If anything fails, files
/// written by this call are removed again and the catalog is untouched.
pub async fn add_photos(
    state: &AppState,
    id: ItemId,
    uploads: Vec<PhotoUpload>,
) -> AppResult<Vec<Item>> {
    if uploads.is_empty() {
        return Err(AppError::BadRequest("No photos received".to_string()));
    }
    ops::find_item(&state.catalog.load().await?, id)?;

    let mut stored: Vec<Photo> = Vec::with_capacity(uploads.len());
    for upload in uploads {
        match store_photo(state, upload).await {
            Ok(photo) => stored.push(photo),
            Err(e) => {
                discard_files(state, &stored).await;
                return Err(e);
            }
        }
    }

    let count = stored.len();
    let result = state
        .catalog
        .update(|items| ops::append_photos(items, id, stored.clone()))
        .await;
    let items = match result {
        Ok((items, ())) => items,
        Err(e) => {
            discard_files(state, &stored).await;
            return Err(e.into());
        }
    };
    tracing::info!(item_id = id, count, "Photos added");

    publish(
        state,
        CatalogEvent::new(EVENT_PHOTOS_ADDED, items.clone()).with_item(id),
    );
    Ok(items)
}

/// Write one upload and its thumbnail to the uploads directory.
async fn store_photo(state: &AppState, upload: PhotoUpload) -> AppResult<Photo> {
    let PhotoUpload { file_name, bytes } = upload;

    let nonce = rand::rng().random_range(0..1_000_000_000u64);
    let full = upload_file_name(&file_name, chrono::Utc::now().timestamp_millis(), nonce);
    let thumb = thumb_file_name(&full);

    let spec = state.config.thumbnail;
    let (bytes, rendered) = tokio::task::spawn_blocking(move || {
        let rendered = render_thumbnail(&bytes, spec);
        (bytes, rendered)
    })
    .await
    .map_err(|e| AppError::InternalError(format!("Thumbnail task failed: {e}")))?;
    let thumb_bytes = rendered.map_err(|e| match e {
        CoreError::Validation(msg) => CoreError::Validation(format!("{file_name}: {msg}")),
        other => other,
    })?;

    state.uploads.write(&full, &bytes).await?;
    if let Err(e) = state.uploads.write(&thumb, &thumb_bytes).await {
        if let Err(cleanup) = state.uploads.remove_if_exists(&full).await {
            tracing::warn!(file = %full, error = %cleanup, "Failed to delete upload");
        }
        return Err(e.into());
    }

    Ok(Photo::new(full, thumb))
}

/// Remove a photo from an item and delete its files.
pub async fn remove_photo(
    state: &AppState,
    id: ItemId,
    full: &str,
    thumb: &str,
) -> AppResult<Vec<Item>> {
    validate_stored_name(full)?;
    validate_stored_name(thumb)?;

    let (items, removed) = state
        .catalog
        .update(|items| ops::remove_photo(items, id, full, thumb))
        .await?;
    tracing::info!(item_id = id, full, removed = removed.len(), "Photo removed");

    // Publish before file cleanup; nothing may await between save and publish.
    publish(
        state,
        CatalogEvent::new(EVENT_PHOTO_REMOVED, items.clone()).with_item(id),
    );
    discard_files(state, &removed).await;
    Ok(items)
}

pub async fn reorder_photos(
    state: &AppState,
    id: ItemId,
    new_order: &[String],
) -> AppResult<Vec<Item>> {
    let (items, ()) = state
        .catalog
        .update(|items| ops::reorder_photos(items, id, new_order))
        .await?;
    tracing::debug!(item_id = id, "Photos reordered");

    publish(
        state,
        CatalogEvent::new(EVENT_PHOTOS_REORDERED, items.clone()).with_item(id),
    );
    Ok(items)
}

/// Wipe the catalog and every uploaded file. Requires the clear PIN.
pub async fn clear(state: &AppState, pin: &str) -> AppResult<Vec<Item>> {
    if pin != state.config.clear_pin {
        tracing::warn!("Catalog clear rejected: wrong PIN");
        return Err(CoreError::Unauthorized("Invalid PIN".to_string()).into());
    }

    let removed = state.uploads.clear().await?;
    state.catalog.reset().await?;
    tracing::info!(removed_files = removed, "Catalog cleared");

    publish(state, CatalogEvent::new(EVENT_CATALOG_CLEARED, Vec::new()));
    Ok(Vec::new())
}

async fn discard_files(state: &AppState, photos: &[Photo]) {
    for photo in photos {
        for name in [&photo.full, &photo.thumb] {
            if let Err(e) = state.uploads.remove_if_exists(name).await {
                tracing::warn!(file = %name, error = %e, "Failed to delete upload");
            }
        }
    }
}

/// Send one event for a saved catalog.
///
/// Call this straight after the store write returns, before any other await,
/// so events leave in the same order their snapshots were saved.
fn publish(state: &AppState, event: CatalogEvent) {
    tracing::debug!(
        event_type = event.event_type,
        subscribers = state.event_bus.subscriber_count(),
        "Publishing catalog event"
    );
    state.event_bus.publish(event);
}
