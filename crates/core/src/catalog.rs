//! Single-record mutations applied to an in-memory catalog.
//!
//! These run inside the store's writer lock, so each one sees the latest
//! persisted list and its result is saved before anyone else can write.

use crate::error::CoreError;
use crate::item::{Item, Photo};
use crate::ordering;
use crate::types::ItemId;

/// Entity name used in `NotFound` errors.
pub const ENTITY_ITEM: &str = "item";

pub fn find_item(items: &[Item], id: ItemId) -> Result<&Item, CoreError> {
    items.iter().find(|item| item.id == id).ok_or(CoreError::NotFound {
        entity: ENTITY_ITEM,
        id,
    })
}

pub fn find_item_mut(items: &mut [Item], id: ItemId) -> Result<&mut Item, CoreError> {
    items
        .iter_mut()
        .find(|item| item.id == id)
        .ok_or(CoreError::NotFound {
            entity: ENTITY_ITEM,
            id,
        })
}

/// Replace an item's description. The text is stored as given.
pub fn set_description(
    items: &mut [Item],
    id: ItemId,
    description: impl Into<String>,
) -> Result<(), CoreError> {
    find_item_mut(items, id)?.description = description.into();
    Ok(())
}

/// Append photos to an item, keeping the given order.
pub fn append_photos(items: &mut [Item], id: ItemId, photos: Vec<Photo>) -> Result<(), CoreError> {
    find_item_mut(items, id)?.photos.extend(photos);
    Ok(())
}

/// Drop every photo matching both `full` and `thumb`.
///
/// Returns the removed entries so the caller can delete their files. A photo
/// that is already gone yields an empty list, not an error.
pub fn remove_photo(
    items: &mut [Item],
    id: ItemId,
    full: &str,
    thumb: &str,
) -> Result<Vec<Photo>, CoreError> {
    let item = find_item_mut(items, id)?;
    let (removed, kept): (Vec<Photo>, Vec<Photo>) = std::mem::take(&mut item.photos)
        .into_iter()
        .partition(|p| p.full == full && p.thumb == thumb);
    item.photos = kept;
    Ok(removed)
}

/// Reorder an item's photos by `full` name. See [`ordering::reorder`].
pub fn reorder_photos(items: &mut [Item], id: ItemId, new_order: &[String]) -> Result<(), CoreError> {
    let item = find_item_mut(items, id)?;
    let photos = std::mem::take(&mut item.photos);
    item.photos = ordering::reorder(photos, new_order);
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn catalog() -> Vec<Item> {
        let mut first = Item::new(1, "A-1", "Lamp");
        first.photos = vec![Photo::new("1.png", "thumb_1.jpg"), Photo::new("2.png", "thumb_2.jpg")];
        vec![first, Item::new(2, "B-2", "Chair")]
    }

    #[test]
    fn missing_item_is_not_found() {
        let mut items = catalog();
        let result = set_description(&mut items, 99, "x");
        assert_matches!(result, Err(CoreError::NotFound { entity: ENTITY_ITEM, id: 99 }));
    }

    #[test]
    fn description_is_stored_verbatim() {
        let mut items = catalog();
        set_description(&mut items, 2, "  padded \n").unwrap();
        assert_eq!(items[1].description, "  padded \n");
        assert_eq!(items[0].description, "");
    }

    #[test]
    fn append_keeps_existing_photos_first() {
        let mut items = catalog();
        append_photos(&mut items, 1, vec![Photo::new("3.png", "thumb_3.jpg")]).unwrap();
        let names: Vec<_> = items[0].photos.iter().map(|p| p.full.as_str()).collect();
        assert_eq!(names, ["1.png", "2.png", "3.png"]);
    }

    #[test]
    fn remove_requires_both_names_to_match() {
        let mut items = catalog();
        let removed = remove_photo(&mut items, 1, "1.png", "thumb_2.jpg").unwrap();
        assert!(removed.is_empty());
        assert_eq!(items[0].photos.len(), 2);

        let removed = remove_photo(&mut items, 1, "1.png", "thumb_1.jpg").unwrap();
        assert_eq!(removed, vec![Photo::new("1.png", "thumb_1.jpg")]);
        assert_eq!(items[0].photos, vec![Photo::new("2.png", "thumb_2.jpg")]);
    }

    #[test]
    fn reorder_only_touches_the_target_item() {
        let mut items = catalog();
        reorder_photos(&mut items, 1, &["2.png".to_string(), "1.png".to_string()]).unwrap();
        assert_eq!(items[0].photos[0].full, "2.png");
        assert!(items[1].photos.is_empty());
    }

    #[test]
    fn find_item_returns_reference() {
        let items = catalog();
        assert_eq!(find_item(&items, 2).unwrap().sku, "B-2");
    }
}
