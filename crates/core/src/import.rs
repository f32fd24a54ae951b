//! Bulk import of catalog rows from CSV.
//!
//! The first two cells of each row are the SKU and the title. Everything
//! else in the row is ignored. An import replaces the whole catalog.

use crate::error::CoreError;
use crate::item::Item;
use crate::types::ItemId;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parse raw CSV bytes into rows of cells.
///
/// There is no header handling: a header row is just another row, and is
/// imported as an item if its first two cells are non-empty. Rows may have
/// different lengths.
pub fn parse_csv(bytes: &[u8]) -> Result<Vec<Vec<String>>, CoreError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .map_err(|e| CoreError::Validation(format!("Invalid CSV: {e}")))
        })
        .collect()
}

/// Build a fresh catalog from imported rows.
///
/// Rows with fewer than two cells, or with an empty SKU or title after
/// trimming, are skipped. Ids are assigned 1, 2, 3 ... over the accepted rows.
pub fn items_from_rows(rows: &[Vec<String>]) -> Vec<Item> {
    let mut next_id: ItemId = 1;
    let mut items = Vec::new();

    for row in rows {
        if row.len() < 2 {
            continue;
        }

        let sku = row[0].trim();
        let title = row[1].trim();
        if sku.is_empty() || title.is_empty() {
            continue;
        }

        items.push(Item::new(next_id, sku, title));
        next_id += 1;
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_rows(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn parses_quoted_and_ragged_rows() {
        let rows = parse_csv(b"A-1,\"Lamp, brass\"\nB-2\nC-3,Chair,extra,cells\n").unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["A-1", "Lamp, brass"]);
        assert_eq!(rows[1], vec!["B-2"]);
        assert_eq!(rows[2].len(), 4);
    }

    #[test]
    fn strips_byte_order_mark() {
        let rows = parse_csv(b"\xEF\xBB\xBFA-1,Lamp\n").unwrap();
        assert_eq!(rows[0][0], "A-1");
    }

    #[test]
    fn invalid_utf8_is_a_validation_error() {
        let result = parse_csv(b"A-1,\xFF\xFE\n");
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }

    #[test]
    fn assigns_sequential_ids_to_accepted_rows() {
        let rows = to_rows(&[
            &["  A-1 ", " Lamp "],
            &["only-one-cell"],
            &["", "No SKU"],
            &["B-2", "   "],
            &["C-3", "Chair", "ignored"],
        ]);

        let items = items_from_rows(&rows);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, 1);
        assert_eq!(items[0].sku, "A-1");
        assert_eq!(items[0].title, "Lamp");
        assert_eq!(items[1].id, 2);
        assert_eq!(items[1].sku, "C-3");
        assert!(items.iter().all(|i| i.description.is_empty() && i.photos.is_empty()));
    }

    #[test]
    fn header_row_is_imported_like_any_other() {
        let rows = parse_csv(b"sku,title\nA-1,Lamp\n").unwrap();
        let items = items_from_rows(&rows);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].sku, "sku");
    }

    #[test]
    fn empty_input_yields_empty_catalog() {
        assert!(items_from_rows(&[]).is_empty());
    }
}
