//! Background jobs for bulk updates, news refresh and retention

pub mod context;
pub mod handlers;
pub mod types;
