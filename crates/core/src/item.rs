//! Catalog records and their completion state.
//!
//! An item is "complete" once it has both a description and at least one
//! photo. Only complete items are exported.

use serde::{Deserialize, Serialize};

use crate::types::ItemId;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One photo attached to an item.
///
/// Both names are bare file names inside the uploads directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    /// The original upload as received.
    pub full: String,
    /// JPEG thumbnail rendered from `full`.
    pub thumb: String,
}

impl Photo {
    pub fn new(full: impl Into<String>, thumb: impl Into<String>) -> Self {
        Self {
            full: full.into(),
            thumb: thumb.into(),
        }
    }
}

/// A product record as stored in the catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub sku: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Ordered; the first photo is the item's cover.
    #[serde(default)]
    pub photos: Vec<Photo>,
}

impl Item {
    /// A freshly imported item: no description, no photos.
    pub fn new(id: ItemId, sku: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            sku: sku.into(),
            title: title.into(),
            description: String::new(),
            photos: Vec::new(),
        }
    }

    pub fn state(&self) -> ItemState {
        ItemState::classify(&self.description, self.photos.len())
    }

    pub fn is_complete(&self) -> bool {
        self.state() == ItemState::Complete
    }
}

// ---------------------------------------------------------------------------
// Completion state
// ---------------------------------------------------------------------------

/// How far along an item is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemState {
    /// Neither a description nor photos.
    Empty,
    /// Exactly one of description / photos.
    Incomplete,
    /// Both a description and at least one photo.
    Complete,
}

impl ItemState {
    /// Classify from the description text and number of photos.
    ///
    /// A description consisting only of whitespace counts as missing.
    pub fn classify(description: &str, photo_count: usize) -> Self {
        let has_description = !description.trim().is_empty();
        let has_photos = photo_count > 0;

        match (has_description, has_photos) {
            (true, true) => Self::Complete,
            (true, false) | (false, true) => Self::Incomplete,
            (false, false) => Self::Empty,
        }
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Per-state counters shown alongside the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub total: usize,
    pub complete: usize,
    pub incomplete: usize,
    pub empty: usize,
}

impl CatalogSummary {
    pub fn from_items(items: &[Item]) -> Self {
        items
            .iter()
            .fold(Self::default(), |mut summary, item| {
                summary.total += 1;
                match item.state() {
                    ItemState::Complete => summary.complete += 1,
                    ItemState::Incomplete => summary.incomplete += 1,
                    ItemState::Empty => summary.empty += 1,
                }
                summary
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
