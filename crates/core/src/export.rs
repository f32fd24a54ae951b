//! Export of complete items as a photo archive or a description sheet.
//!
//! Archive layout, for the k-th complete item (k starting at 1):
//!
//! ```text
//! Z (k)/1.jpg, Z (k)/2.jpg, ...     every photo, in item order
//! miniaturki/0 (k).jpg              the item's first photo again
//! ```
//!
//! The folder numbering is positional over complete items, so the marketplace
//! uploader consuming the archive can match folders to description rows.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::CoreError;
use crate::item::Item;

/// Download name of the photo archive.
pub const PHOTO_ARCHIVE_NAME: &str = "zdjecia.zip";

/// Download name of the description sheet.
pub const DESCRIPTION_CSV_NAME: &str = "opisy.csv";

/// Archive folder holding the first photo of every item.
pub const COVER_FOLDER: &str = "miniaturki";

const NOTHING_TO_EXPORT: &str = "No complete items to export";

/// Items that have both a description and at least one photo, in order.
pub fn complete_items(items: &[Item]) -> Vec<&Item> {
    items.iter().filter(|item| item.is_complete()).collect()
}

/// Archive path of photo `photo_index` (1-based) of complete item `item_index`.
pub fn photo_entry_name(item_index: usize, photo_index: usize) -> String {
    format!("Z ({item_index})/{photo_index}.jpg")
}

/// Archive path of the cover copy for complete item `item_index`.
pub fn cover_entry_name(item_index: usize) -> String {
    format!("{COVER_FOLDER}/0 ({item_index}).jpg")
}

/// Build the photo archive for all complete items.
///
/// `read_photo` returns the bytes of a stored upload by its `full` name, or
/// `None` when the file is gone; missing files are skipped. Fails with
/// [`CoreError::Validation`] when there are no complete items.
pub fn build_photo_archive<F>(items: &[Item], mut read_photo: F) -> Result<Vec<u8>, CoreError>
where
    F: FnMut(&str) -> Option<Vec<u8>>,
{
    let complete = complete_items(items);
    if complete.is_empty() {
        return Err(CoreError::Validation(NOTHING_TO_EXPORT.to_string()));
    }

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9));
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    for (k, item) in complete.iter().enumerate() {
        let item_index = k + 1;
        for (i, photo) in item.photos.iter().enumerate() {
            let Some(bytes) = read_photo(&photo.full) else {
                continue;
            };

            add_entry(&mut zip, photo_entry_name(item_index, i + 1), &bytes, options)?;
            if i == 0 {
                add_entry(&mut zip, cover_entry_name(item_index), &bytes, options)?;
            }
        }
    }

    let cursor = zip
        .finish()
        .map_err(|e| CoreError::Internal(format!("Failed to finish archive: {e}")))?;
    Ok(cursor.into_inner())
}

fn add_entry(
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    name: String,
    bytes: &[u8],
    options: SimpleFileOptions,
) -> Result<(), CoreError> {
    zip.start_file(name, options)
        .map_err(|e| CoreError::Internal(format!("Failed to add archive entry: {e}")))?;
    zip.write_all(bytes)
        .map_err(|e| CoreError::Internal(format!("Failed to write archive entry: {e}")))
}

/// Build a `sku,title,description` sheet of all complete items.
///
/// Rows follow the same order as the archive folders.
pub fn build_description_csv(items: &[Item]) -> Result<Vec<u8>, CoreError> {
    let complete = complete_items(items);
    if complete.is_empty() {
        return Err(CoreError::Validation(NOTHING_TO_EXPORT.to_string()));
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    let csv_err = |e: csv::Error| CoreError::Internal(format!("Failed to write CSV: {e}"));

    writer
        .write_record(["sku", "title", "description"])
        .map_err(csv_err)?;
    for item in complete {
        writer
            .write_record([item.sku.as_str(), item.title.as_str(), item.description.as_str()])
            .map_err(csv_err)?;
    }

    writer
        .into_inner()
        .map_err(|e| CoreError::Internal(format!("Failed to flush CSV: {e}")))
}
