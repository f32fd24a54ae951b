/// Catalog item ids are assigned sequentially from 1 on every import.
pub type ItemId = i64;
