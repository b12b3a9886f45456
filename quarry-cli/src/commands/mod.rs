//! CLI command implementations.

pub mod filter;
pub mod schema;
pub mod version;
