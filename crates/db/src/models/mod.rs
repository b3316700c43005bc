//! Row structs decoded from the database.
//!
//! Each `FromRow` struct converts into the matching `marquee_core` type.

pub mod movie;
