pub mod auth;
pub mod export;
pub mod items;
pub mod photos;
