//! Domain logic for the SKUdesk catalog editor.
//!
//! This crate has no knowledge of HTTP, WebSockets or the filesystem layout.
//! Callers load the catalog, hand it to these functions, and persist the
//! result.

pub mod catalog;
pub mod error;
pub mod export;
pub mod import;
pub mod item;
pub mod naming;
pub mod ordering;
pub mod thumbnail;
pub mod types;
