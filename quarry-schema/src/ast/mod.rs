//! Descriptor types for parsed schemas.
//!
//! These are plain data: the parser builds them, consumers read them.

mod attribute;
mod document;
mod field;
mod model;
mod types;

pub use attribute::*;
pub use document::*;
pub use field::*;
pub use model::*;
pub use types::*;
