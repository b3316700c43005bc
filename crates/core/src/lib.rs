//! Marquee core library.
//!
//! Domain types, field normalization, the batch loader, the storage trait
//! and the read-only query facade. No database or HTTP dependencies; those
//! live in `marquee-db` and `marquee-api`.

pub mod catalog;
pub mod csv_source;
pub mod error;
pub mod loader;
pub mod memory;
pub mod movie;
pub mod normalize;
pub mod queries;
pub mod types;
