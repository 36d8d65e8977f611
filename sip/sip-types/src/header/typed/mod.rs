//! Typed representations of header values

mod auth;

pub use auth::{Auth, AuthChallenge, AuthParam, DigestChallenge, QopOption};
