use crate::parse::token;
use bytesstr::BytesStr;
use std::fmt;
use std::str::FromStr;

/// Request method, the first element of the A2 digest input.
///
/// # Example
///
/// ```
/// use sip_digest_types::Method;
///
/// assert_eq!(Method::from("register"), Method::REGISTER);
/// assert_eq!(Method::from("HELLO").to_string(), "HELLO");
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Method(Repr);

macro_rules! methods {
    ($($print:literal, $ident:ident;)+) => {
        #[derive(Debug, Clone, Eq, PartialEq, Hash)]
        #[allow(clippy::upper_case_acronyms)]
        enum Repr {
            $($ident,)+
            Other(BytesStr),
        }

        impl Method {
            $(pub const $ident: Self = Self(Repr::$ident);)+

            fn known(s: &str) -> Option<Self> {
                $(
                if s.eq_ignore_ascii_case($print) {
                    return Some(Self::$ident);
                }
                )+

                None
            }

            pub fn as_str(&self) -> &str {
                match &self.0 {
                    $(Repr::$ident => $print,)+
                    Repr::Other(other) => other.as_str(),
                }
            }
        }
    };
}

methods! {
    "INVITE",      INVITE;
    "ACK",         ACK;
    "CANCEL",      CANCEL;
    "BYE",         BYE;
    "REGISTER",    REGISTER;
    "MESSAGE",     MESSAGE;
    "UPDATE",      UPDATE;
    "PRACK",       PRACK;
    "OPTIONS",     OPTIONS;
    "SUBSCRIBE",   SUBSCRIBE;
    "NOTIFY",      NOTIFY;
    "PUBLISH",     PUBLISH;
    "INFO",        INFO;
    "REFER",       REFER;
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<BytesStr> for Method {
    fn from(s: BytesStr) -> Self {
        Self::known(&s).unwrap_or(Self(Repr::Other(s)))
    }
}

impl From<&str> for Method {
    fn from(s: &str) -> Self {
        Self::known(s).unwrap_or_else(|| Self(Repr::Other(BytesStr::from(s))))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid method {0:?}")]
pub struct InvalidMethod(String);

impl FromStr for Method {
    type Err = InvalidMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.chars().all(token) {
            return Err(InvalidMethod(s.into()));
        }

        Ok(Self::from(s))
    }
}
