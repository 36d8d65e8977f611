use std::fmt;
use std::str::FromStr;

type Repr = u16;

/// Status code of a SIP response
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct StatusCode(Repr);

impl fmt::Debug for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tuple = f.debug_tuple("StatusCode");
        tuple.field(&self.0);
        if let Some(text) = self.text() {
            tuple.field(&text);
        }
        tuple.finish()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Broad class of a [`StatusCode`]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CodeKind {
    /// 100..=199
    Provisional,
    /// 200..=299
    Success,
    /// 300..=399
    Redirection,
    /// 400..=499
    RequestFailure,
    /// 500..=599
    ServerFailure,
    /// 600..=699
    GlobalFailure,
    Custom,
}

impl StatusCode {
    /// Returns the [`CodeKind`] of the code
    ///
    /// # Example
    ///
    /// ```
    /// use sip_digest_types::{CodeKind, StatusCode};
    ///
    /// assert_eq!(StatusCode::UNAUTHORIZED.kind(), CodeKind::RequestFailure);
    /// ```
    pub fn kind(self) -> CodeKind {
        match self.0 {
            100..=199 => CodeKind::Provisional,
            200..=299 => CodeKind::Success,
            300..=399 => CodeKind::Redirection,
            400..=499 => CodeKind::RequestFailure,
            500..=599 => CodeKind::ServerFailure,
            600..=699 => CodeKind::GlobalFailure,
            _ => CodeKind::Custom,
        }
    }

    pub fn into_u16(self) -> u16 {
        self.0
    }

    /// Returns true for the codes that carry an authentication challenge
    pub fn is_auth_challenge(self) -> bool {
        self == Self::UNAUTHORIZED || self == Self::PROXY_AUTHENTICATION_REQUIRED
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

impl FromStr for StatusCode {
    type Err = <Repr as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

macro_rules! codes {
    ($($(#[$comments:meta])* [$code:literal => $name:ident, $text:literal];)*) => {
        impl StatusCode {
            /// Returns the default reason phrase for a known code
            pub fn text(self) -> Option<&'static str> {
                match self.0 {
                    $($code => Some($text),)*
                    _ => None
                }
            }

            $(
            $(#[$comments])*
            pub const $name: StatusCode = StatusCode($code);
            )*
        }
    };
}

codes! {
    [100 => TRYING, "Trying"];
    [180 => RINGING, "Ringing"];
    [200 => OK, "OK"];
    [202 => ACCEPTED, "Accepted"];
    [400 => BAD_REQUEST, "Bad Request"];

    /// [[RFC3261, Section 21.4.2](https://tools.ietf.org/html/rfc3261#section-21.4.2)]
    /// carries one or more `WWW-Authenticate` challenges
    [401 => UNAUTHORIZED, "Unauthorized"];

    [403 => FORBIDDEN, "Forbidden"];
    [404 => NOT_FOUND, "Not Found"];

    /// [[RFC3261, Section 21.4.8](https://tools.ietf.org/html/rfc3261#section-21.4.8)]
    /// carries one or more `Proxy-Authenticate` challenges
    [407 => PROXY_AUTHENTICATION_REQUIRED, "Proxy Authentication Required"];

    [408 => REQUEST_TIMEOUT, "Request Timeout"];
    [500 => SERVER_INTERNAL_ERROR, "Server Internal Error"];
    [503 => SERVICE_UNAVAILABLE, "Service Unavailable"];
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn known_code() {
        let code: StatusCode = "407".parse().unwrap();

        assert_eq!(code, StatusCode::PROXY_AUTHENTICATION_REQUIRED);
        assert_eq!(code.text(), Some("Proxy Authentication Required"));
        assert!(code.is_auth_challenge());
        assert!(!StatusCode::FORBIDDEN.is_auth_challenge());
    }

    #[test]
    fn custom_code() {
        let code = StatusCode::from(799);

        assert_eq!(code.kind(), CodeKind::Custom);
        assert_eq!(code.text(), None);
        assert_eq!(code.to_string(), "799");
    }
}
