use bytesstr::BytesStr;
use std::fmt;

/// Represents a SIP-Header's name. It is used as key inside [Headers].
///
/// Comparison is ASCII case-insensitive and honors compact forms.
///
/// [Headers]: crate::Headers
#[derive(Debug, Clone)]
pub struct Name(Repr);

#[derive(Debug, Clone)]
enum Repr {
    Known(&'static str, &'static [&'static str]),
    Unknown(BytesStr),
}

impl Name {
    /// Returns a Name for a header not known to this library
    pub const fn unknown(name: BytesStr) -> Self {
        Self(Repr::Unknown(name))
    }

    pub fn as_print_str(&self) -> &str {
        match &self.0 {
            Repr::Known(print, _) => print,
            Repr::Unknown(name) => name.as_str(),
        }
    }

    const fn as_parse_strs(&self) -> Option<&'static [&'static str]> {
        match &self.0 {
            Repr::Known(_, parse) => Some(parse),
            Repr::Unknown(_) => None,
        }
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        if self == other.as_print_str() {
            return true;
        }

        other
            .as_parse_strs()
            .is_some_and(|strs| strs.iter().any(|s| self == *s))
    }
}

impl Eq for Name {}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        if self.as_print_str().eq_ignore_ascii_case(other) {
            return true;
        }

        self.as_parse_strs()
            .is_some_and(|strs| strs.iter().any(|s| s.eq_ignore_ascii_case(other)))
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_print_str())
    }
}

impl From<&str> for Name {
    fn from(name: &str) -> Self {
        Self::from(BytesStr::from(name))
    }
}

impl From<BytesStr> for Name {
    fn from(name: BytesStr) -> Self {
        KNOWN
            .iter()
            .find(|known| **known == *name.as_str())
            .cloned()
            .unwrap_or(Name::unknown(name))
    }
}

macro_rules! header_names {
    ($($(#[$comments:meta])* $print:literal, [$($parse:literal),+], $konst:ident;)+) => {
        impl Name {
            $(
            $(#[$comments])*
            pub const $konst: Name = Name(Repr::Known($print, &[$($parse),+]));
            )+
        }

        static KNOWN: &[Name] = &[$(Name::$konst,)+];
    };
}

header_names! {
    /// [[RFC3261, Section 20.6](https://tools.ietf.org/html/rfc3261#section-20.6)]
    "Authentication-Info",          ["authentication-info"],          AUTHENTICATION_INFO;

    /// [[RFC3261, Section 20.7](https://tools.ietf.org/html/rfc3261#section-20.7)]
    "Authorization",                ["authorization"],                AUTHORIZATION;

    /// [[RFC3261, Section 20.27](https://tools.ietf.org/html/rfc3261#section-20.27)]
    "Proxy-Authenticate",           ["proxy-authenticate"],           PROXY_AUTHENTICATE;

    /// [[RFC7616, Section 3.6](https://datatracker.ietf.org/doc/html/rfc7616#section-3.6)]
    "Proxy-Authentication-Info",    ["proxy-authentication-info"],    PROXY_AUTHENTICATION_INFO;

    /// [[RFC3261, Section 20.28](https://tools.ietf.org/html/rfc3261#section-20.28)]
    "Proxy-Authorization",          ["proxy-authorization"],          PROXY_AUTHORIZATION;

    /// [[RFC3261, Section 20.44](https://tools.ietf.org/html/rfc3261#section-20.44)]
    "WWW-Authenticate",             ["www-authenticate"],             WWW_AUTHENTICATE;
}
