use crate::Headers;
use crate::header::{HeaderError, Name};
use crate::parse::{IResult, parse_quoted, token, whitespace};
use crate::print::Quoted;
use anyhow::{anyhow, bail};
use bytes::Bytes;
use bytesstr::BytesStr;
use nom::Finish;
use nom::branch::alt;
use nom::bytes::complete::{take_while, take_while1};
use nom::character::complete::char;
use nom::combinator::{map, opt};
use nom::multi::many0;
use nom::sequence::{preceded, tuple};
use std::fmt;

/// Param contained inside [Auth].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthParam {
    pub name: BytesStr,
    pub value: BytesStr,
}

impl fmt::Display for AuthParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, Quoted(&self.value))
    }
}

impl AuthParam {
    fn parse(src: &Bytes) -> impl Fn(&str) -> IResult<&str, Self> + '_ {
        move |i| {
            map(
                tuple((
                    preceded(take_while(whitespace), take_while1(token)),
                    preceded(take_while(whitespace), char('=')),
                    preceded(
                        take_while(whitespace),
                        alt((
                            map(parse_quoted, BytesStr::from),
                            map(take_while(|c: char| c != ',' && !whitespace(c)), |value| {
                                BytesStr::from_parse(src, value)
                            }),
                        )),
                    ),
                )),
                |(name, _, value)| AuthParam {
                    name: BytesStr::from_parse(src, name),
                    value,
                },
            )(i)
        }
    }
}

/// Generic representation of any `<scheme> <param>=<value>, ...` header value.
#[derive(Debug, Clone)]
pub struct Auth {
    pub scheme: BytesStr,
    pub params: Vec<AuthParam>,
}

impl Auth {
    /// Parse a single credentials or challenge value, e.g. an `Authorization` header value
    pub fn parse(value: &BytesStr) -> anyhow::Result<Self> {
        let (rem, auth) = Self::parse_one(value.as_ref(), value.as_str())?;

        if !rem.trim().is_empty() {
            bail!("unexpected trailing input {rem:?}");
        }

        Ok(auth)
    }

    /// Returns the value of the first param named `name` (case-insensitive)
    pub fn param(&self, name: &str) -> Option<&BytesStr> {
        self.params
            .iter()
            .find(|param| param.name.eq_ignore_ascii_case(name))
            .map(|param| &param.value)
    }

    fn parse_one<'i>(src: &Bytes, i: &'i str) -> anyhow::Result<(&'i str, Self)> {
        Self::parser(src)(i)
            .finish()
            .map_err(|e| anyhow!("invalid auth value at {:?}", e.errors.first().map(|(i, _)| i)))
    }

    fn parser(src: &Bytes) -> impl Fn(&str) -> IResult<&str, Self> + '_ {
        move |i| {
            map(
                tuple((
                    preceded(take_while(whitespace), take_while1(token)),
                    opt(tuple((
                        AuthParam::parse(src),
                        many0(preceded(
                            preceded(take_while(whitespace), char(',')),
                            AuthParam::parse(src),
                        )),
                    ))),
                )),
                |(scheme, params)| {
                    let params = match params {
                        Some((first, mut rest)) => {
                            rest.insert(0, first);
                            rest
                        }
                        None => vec![],
                    };

                    Auth {
                        scheme: BytesStr::from_parse(src, scheme),
                        params,
                    }
                },
            )(i)
        }
    }
}

impl fmt::Display for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.scheme)?;

        let mut params = self.params.iter();

        if let Some(param) = params.next() {
            write!(f, " {}", param)?;

            for param in params {
                write!(f, ", {}", param)?;
            }
        }

        Ok(())
    }
}

/// A challenge found in a `WWW-Authenticate` or `Proxy-Authenticate` header
#[derive(Debug, Clone)]
#[allow(clippy::large_enum_variant)]
pub enum AuthChallenge {
    Digest(DigestChallenge),
    Other(Auth),
}

impl From<Auth> for AuthChallenge {
    fn from(auth: Auth) -> Self {
        if auth.scheme.eq_ignore_ascii_case("Digest") {
            Self::Digest(DigestChallenge::from_auth_params(auth.params))
        } else {
            Self::Other(auth)
        }
    }
}

impl AuthChallenge {
    /// Parse all comma separated challenges inside a single header value
    pub fn parse_all(value: &BytesStr) -> anyhow::Result<Vec<Self>> {
        let src: &Bytes = value.as_ref();
        let mut i = value.as_str();
        let mut challenges = vec![];

        loop {
            let (rem, auth) = Auth::parse_one(src, i)?;

            challenges.push(Self::from(auth));

            let rem = rem.trim_start_matches(whitespace);

            if rem.is_empty() {
                return Ok(challenges);
            }

            match rem.strip_prefix(',') {
                Some(next) => i = next,
                None => bail!("unexpected trailing input {rem:?}"),
            }
        }
    }

    /// Decode all challenges stored under `name`, in order of appearance
    pub fn decode(headers: &Headers, name: &Name) -> Result<Vec<Self>, HeaderError> {
        let mut challenges = vec![];

        for value in headers.get_all(name) {
            let parsed =
                Self::parse_all(value).map_err(|e| HeaderError::malformed(name.clone(), e))?;

            challenges.extend(parsed);
        }

        if challenges.is_empty() {
            return Err(HeaderError::missing(name.clone()));
        }

        Ok(challenges)
    }
}

impl fmt::Display for AuthChallenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthChallenge::Digest(digest) => fmt::Display::fmt(digest, f),
            AuthChallenge::Other(other) => fmt::Display::fmt(other, f),
        }
    }
}

/// Parameters of a `Digest` challenge.
///
/// Parsing is lenient: a challenge lacking `realm` or `nonce` is still
/// returned, leaving it to the caller to decide whether to answer it.
#[derive(Debug, Clone, Default)]
pub struct DigestChallenge {
    pub realm: Option<BytesStr>,
    pub domain: Option<BytesStr>,
    pub nonce: Option<BytesStr>,
    pub opaque: Option<BytesStr>,
    pub stale: bool,
    pub algorithm: Option<BytesStr>,
    /// `None` when the challenge has no qop param, otherwise the offered options
    pub qop: Option<Vec<QopOption>>,
    /// Remaining fields
    pub other: Vec<AuthParam>,
}

impl DigestChallenge {
    pub(crate) fn from_auth_params(params: Vec<AuthParam>) -> Self {
        let mut challenge = Self::default();

        for param in params {
            match param.name.to_ascii_lowercase().as_str() {
                "realm" => challenge.realm = Some(param.value),
                "domain" => challenge.domain = Some(param.value),
                "nonce" => challenge.nonce = Some(param.value),
                "opaque" => challenge.opaque = Some(param.value),
                "stale" => challenge.stale = param.value.eq_ignore_ascii_case("true"),
                "algorithm" => challenge.algorithm = Some(param.value),
                "qop" => challenge.qop.get_or_insert_with(Vec::new).extend(
                    param
                        .value
                        .split(',')
                        .map(str::trim)
                        .filter(|v| !v.is_empty())
                        .map(|v| QopOption::from(param.value.slice_ref(v))),
                ),
                _ => challenge.other.push(param),
            }
        }

        challenge
    }
}

impl fmt::Display for DigestChallenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Digest")?;

        let mut sep = " ";

        let quoted = [
            ("realm", &self.realm),
            ("nonce", &self.nonce),
            ("domain", &self.domain),
            ("opaque", &self.opaque),
        ];

        for (name, value) in quoted {
            if let Some(value) = value {
                write!(f, "{sep}{name}={}", Quoted(value))?;
                sep = ", ";
            }
        }

        if self.stale {
            write!(f, "{sep}stale=true")?;
            sep = ", ";
        }

        if let Some(algorithm) = &self.algorithm {
            write!(f, "{sep}algorithm={algorithm}")?;
            sep = ", ";
        }

        if let Some(qop) = &self.qop {
            write!(f, r#"{sep}qop=""#)?;

            for (idx, option) in qop.iter().enumerate() {
                if idx > 0 {
                    f.write_str(",")?;
                }

                write!(f, "{option}")?;
            }

            f.write_str("\"")?;
            sep = ", ";
        }

        for param in &self.other {
            write!(f, "{sep}{param}")?;
            sep = ", ";
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QopOption {
    Auth,
    AuthInt,
    Other(BytesStr),
}

impl From<BytesStr> for QopOption {
    fn from(value: BytesStr) -> Self {
        if value.eq_ignore_ascii_case("auth") {
            Self::Auth
        } else if value.eq_ignore_ascii_case("auth-int") {
            Self::AuthInt
        } else {
            Self::Other(value)
        }
    }
}

impl fmt::Display for QopOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QopOption::Auth => f.write_str("auth"),
            QopOption::AuthInt => f.write_str("auth-int"),
            QopOption::Other(token) => f.write_str(token),
        }
    }
}
