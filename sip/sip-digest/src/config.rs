use std::fmt;

/// Username and password used to answer digest challenges
#[derive(Clone)]
pub struct DigestUser {
    pub(crate) user: String,
    pub(crate) password: Vec<u8>,
}

impl DigestUser {
    pub fn new<U, P>(user: U, password: P) -> Self
    where
        U: Into<String>,
        P: Into<Vec<u8>>,
    {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }
}

impl fmt::Debug for DigestUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestUser")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

/// Behavior when a challenge offers qop, but neither `auth` nor `auth-int`
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedQop {
    /// Fail with [`DigestError::UnsupportedQop`](crate::DigestError::UnsupportedQop)
    #[default]
    Reject,
    /// Answer as if the challenge carried no qop at all (RFC 2069 response)
    FallbackToNone,
}

/// Policy applied when answering challenges
#[derive(Debug, Default, Clone)]
pub struct DigestConfig {
    /// Is [`UnsupportedQop::Reject`] by default
    pub unsupported_qop: UnsupportedQop,
    /// Reject challenges naming an algorithm other than MD5. Is false by default, in which case
    /// every challenge is answered with MD5 regardless of its algorithm param
    pub enforce_md5: bool,
    /// Reject challenges without realm or nonce. Is false by default, missing values are then
    /// hashed as empty strings and left out of the credentials
    pub reject_incomplete_challenge: bool,
}
