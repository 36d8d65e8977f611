use bytesstr::BytesStr;
use sip_types::Name;
use sip_types::header::HeaderError;

/// Errors raised while setting up digest credentials, always before a request is sent
#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    #[error("response contains no digest challenge in {0}")]
    MissingChallenge(Name),
    #[error("challenge is missing its {0} param")]
    IncompleteChallenge(&'static str),
    #[error("challenge offers no supported qop")]
    UnsupportedQop,
    #[error("encountered unsupported algorithm {0}")]
    UnsupportedAlgorithm(BytesStr),
    #[error("credentials were rejected for realm {}", .0.as_deref().unwrap_or("<none>"))]
    Rejected(Option<BytesStr>),
    #[error(transparent)]
    Header(#[from] HeaderError),
}
