#![forbid(unsafe_code)]
//! SIP message types needed to answer authentication challenges
//!
//! Provides header names, a header multimap, status codes, methods and the
//! parsing & printing of `WWW-Authenticate` / `Proxy-Authenticate` values.

mod code;
pub mod header;
mod method;
pub mod msg;
mod parse;
pub mod print;

pub use code::{CodeKind, StatusCode};
pub use header::{Headers, Name};
pub use method::{InvalidMethod, Method};
