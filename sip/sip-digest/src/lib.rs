//! Client side of HTTP Digest access authentication ([RFC 2617], [RFC 2069]) as used by SIP.
//!
//! [`DigestCredential`] answers a single `401`/`407` challenge and keeps the nonce-count
//! running across retries, [`DigestAuthenticator`] drives it for a request that is resent
//! until the server accepts it.
//!
//! [RFC 2617]: https://datatracker.ietf.org/doc/html/rfc2617
//! [RFC 2069]: https://datatracker.ietf.org/doc/html/rfc2069

use sip_types::Headers;
use sip_types::msg::{RequestLine, StatusLine};
use std::error::Error;
use std::fmt::Debug;

mod authenticator;
mod config;
mod digest;
mod error;
mod nonce;

pub use authenticator::DigestAuthenticator;
pub use config::{DigestConfig, DigestUser, UnsupportedQop};
pub use digest::{DigestCredential, HashFn, Qop, challenge_header, hash_md5};
pub use error::DigestError;
pub use nonce::{NonceSource, UuidNonceSource};

/// SIP request authenticator
pub trait ClientAuthenticator {
    type Error: Error + Debug;

    /// Modify a request's header to add the required authorization
    ///
    /// Implementations like Digest will do nothing here before receiving a rejection response
    fn authorize_request(&mut self, request: &mut Headers) -> Result<(), Self::Error>;

    /// Handle a rejection request
    ///
    /// Must return an error when no more requests should be sent
    fn handle_rejection(
        &mut self,
        rejected_request: RequestParts<'_>,
        reject_response: ResponseParts<'_>,
    ) -> Result<(), Self::Error>;
}

/// Information about the request that has to be authenticated
#[derive(Debug, Clone, Copy)]
pub struct RequestParts<'s> {
    pub line: &'s RequestLine,
    pub headers: &'s Headers,
    pub body: &'s [u8],
}

/// Information about the response that rejected the request
#[derive(Debug, Clone, Copy)]
pub struct ResponseParts<'s> {
    pub line: &'s StatusLine,
    pub headers: &'s Headers,
    pub body: &'s [u8],
}
