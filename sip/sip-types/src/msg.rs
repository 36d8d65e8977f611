//! Start lines of SIP messages

use crate::{Method, StatusCode};
use bytesstr::BytesStr;
use std::fmt;

/// First line of a request, e.g. `REGISTER sip:example.com SIP/2.0`
///
/// The request target is kept as printed, it is hashed verbatim into
/// the digest response.
#[derive(Debug, Clone)]
pub struct RequestLine {
    pub method: Method,
    pub uri: BytesStr,
}

impl fmt::Display for RequestLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} SIP/2.0", self.method, self.uri)
    }
}

/// First line of a response, e.g. `SIP/2.0 401 Unauthorized`
#[derive(Debug, Clone)]
pub struct StatusLine {
    pub code: StatusCode,
    pub reason: Option<BytesStr>,
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SIP/2.0 {}", self.code)?;

        if let Some(reason) = self.reason.as_deref().or(self.code.text()) {
            write!(f, " {reason}")?;
        }

        Ok(())
    }
}
