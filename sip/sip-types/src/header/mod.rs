//! Contains everything header related

mod error;
pub(crate) mod headers;
pub(crate) mod name;
pub mod typed;

pub use error::HeaderError;
pub use headers::Headers;
pub use name::Name;
