//! Photo reordering driven by client drag-and-drop.
//!
//! Clients send the full list of `full` names in the order they now display
//! them. The list can be stale (another client added or removed a photo in
//! the meantime), so the result is always a permutation of the stored photos:
//! nothing is duplicated and nothing is dropped.

use crate::item::Photo;

/// Reorder `photos` according to `new_order`.
///
/// Photos named in `new_order` come first, in that order. Unknown and
/// repeated names are ignored. Photos that `new_order` does not mention keep
/// their previous relative order and follow the named ones, so a stale list
/// never drops a photo added by someone else; this is intentional.
pub fn reorder(photos: Vec<Photo>, new_order: &[String]) -> Vec<Photo> {
    let mut remaining: Vec<Option<Photo>> = photos.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(remaining.len());

    for name in new_order {
        let slot = remaining
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|p| &p.full == name));
        if let Some(photo) = slot.and_then(Option::take) {
            ordered.push(photo);
        }
    }

    ordered.extend(remaining.into_iter().flatten());
    ordered
}
