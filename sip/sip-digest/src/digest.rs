use crate::config::{DigestConfig, DigestUser, UnsupportedQop};
use crate::nonce::{CNONCE_LENGTH, NonceSource, UuidNonceSource};
use crate::{DigestError, RequestParts, ResponseParts};
use bytesstr::BytesStr;
use sip_types::header::typed::{AuthChallenge, DigestChallenge, QopOption};
use sip_types::msg::RequestLine;
use sip_types::print::Quoted;
use sip_types::{Method, Name, StatusCode};
use std::fmt;

/// Hash function used to compute digests, must return lowercase hex
pub type HashFn = fn(&[u8]) -> String;

pub fn hash_md5(i: &[u8]) -> String {
    format!("{:x}", md5::compute(i))
}

/// Quality of protection selected from the options a challenge offered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qop {
    /// The challenge has no qop param (RFC 2069 compatible response)
    NoQop,
    Auth,
    AuthInt,
    /// The challenge offers qop, but neither `auth` nor `auth-int`
    Unsupported,
}

impl Qop {
    /// Picks `auth` over `auth-int`, regardless of the order they were offered in
    pub fn select(offered: Option<&[QopOption]>) -> Self {
        match offered {
            None => Qop::NoQop,
            Some(options) if options.contains(&QopOption::Auth) => Qop::Auth,
            Some(options) if options.contains(&QopOption::AuthInt) => Qop::AuthInt,
            Some(_) => Qop::Unsupported,
        }
    }

    /// Returns the value of the qop param sent back to the server
    pub fn as_str(self) -> Option<&'static str> {
        match self {
            Qop::Auth => Some("auth"),
            Qop::AuthInt => Some("auth-int"),
            Qop::NoQop | Qop::Unsupported => None,
        }
    }
}

/// Returns the name of the header carrying the challenge of a response with the given `code`
pub fn challenge_header(code: StatusCode) -> Name {
    if code == StatusCode::UNAUTHORIZED {
        Name::WWW_AUTHENTICATE
    } else {
        Name::PROXY_AUTHENTICATE
    }
}

/// Returns the first digest challenge of the response and whether it came from a proxy
pub(crate) fn read_challenge(
    response: &ResponseParts<'_>,
) -> Result<(DigestChallenge, bool), DigestError> {
    let name = challenge_header(response.line.code);
    let is_proxy = name == Name::PROXY_AUTHENTICATE;

    let challenges = AuthChallenge::decode(response.headers, &name).map_err(|e| {
        if e.is_missing() {
            DigestError::MissingChallenge(name.clone())
        } else {
            DigestError::Header(e)
        }
    })?;

    challenges
        .into_iter()
        .find_map(|challenge| match challenge {
            AuthChallenge::Digest(digest) => Some((digest, is_proxy)),
            AuthChallenge::Other(_) => None,
        })
        .ok_or(DigestError::MissingChallenge(name))
}

/// Digest credentials of a single request that is retried under authentication.
///
/// Created from the first `401`/`407` response, then [`authenticate`](Self::authenticate)
/// is called before every retransmission. Later challenges in the same retry sequence
/// are absorbed with [`update`](Self::update), which keeps the nonce-count running as
/// long as the server keeps its nonce.
pub struct DigestCredential<N = UuidNonceSource> {
    username: String,
    password: Vec<u8>,
    method: Method,
    uri: BytesStr,

    realm: Option<BytesStr>,
    nonce: Option<BytesStr>,
    opaque: Option<BytesStr>,
    algorithm: Option<BytesStr>,
    qop: Qop,

    cnonce: Option<BytesStr>,
    nc: u32,
    response: Option<BytesStr>,

    entity_body: Option<Vec<u8>>,
    is_proxy: bool,

    config: DigestConfig,
    nonce_source: N,
    hash: HashFn,
}

impl DigestCredential {
    /// Create credentials for `request` answering an already parsed `challenge`
    pub fn from_challenge(
        user: &DigestUser,
        request: &RequestLine,
        challenge: &DigestChallenge,
        is_proxy: bool,
    ) -> Self {
        Self {
            username: user.user.clone(),
            password: user.password.clone(),
            method: request.method.clone(),
            uri: request.uri.clone(),
            realm: challenge.realm.clone(),
            nonce: challenge.nonce.clone(),
            opaque: challenge.opaque.clone(),
            // Only MD5 is implemented, other algorithms are answered with MD5 too
            // unless `DigestConfig::enforce_md5` is set
            algorithm: challenge.algorithm.clone(),
            qop: Qop::select(challenge.qop.as_deref()),
            cnonce: None,
            nc: 0,
            response: None,
            entity_body: None,
            is_proxy,
            config: DigestConfig::default(),
            nonce_source: UuidNonceSource,
            hash: hash_md5,
        }
    }

    /// Create credentials for the `request` that was rejected with `response`.
    ///
    /// The challenge is read from `WWW-Authenticate` for `401` responses, from
    /// `Proxy-Authenticate` for any other.
    pub fn from_response(
        user: &DigestUser,
        request: RequestParts<'_>,
        response: ResponseParts<'_>,
    ) -> Result<Self, DigestError> {
        let (challenge, is_proxy) = read_challenge(&response)?;

        Ok(Self::from_challenge(
            user,
            request.line,
            &challenge,
            is_proxy,
        ))
    }
}

impl<N: NonceSource> DigestCredential<N> {
    pub fn with_config(mut self, config: DigestConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the policy checked by the next [`authenticate`](Self::authenticate) call
    pub fn set_config(&mut self, config: DigestConfig) {
        self.config = config;
    }

    pub fn with_hash(mut self, hash: HashFn) -> Self {
        self.hash = hash;
        self
    }

    /// Replace the generator used for cnonce values
    pub fn with_nonce_source<M: NonceSource>(self, nonce_source: M) -> DigestCredential<M> {
        DigestCredential {
            username: self.username,
            password: self.password,
            method: self.method,
            uri: self.uri,
            realm: self.realm,
            nonce: self.nonce,
            opaque: self.opaque,
            algorithm: self.algorithm,
            qop: self.qop,
            cnonce: self.cnonce,
            nc: self.nc,
            response: self.response,
            entity_body: self.entity_body,
            is_proxy: self.is_proxy,
            config: self.config,
            nonce_source,
            hash: self.hash,
        }
    }

    /// Set the body hashed into `auth-int` responses. Without it the empty body is hashed.
    pub fn set_entity_body<B: Into<Vec<u8>>>(&mut self, body: B) {
        self.entity_body = Some(body.into());
    }

    /// Compute a new response and return the credentials as header value.
    ///
    /// Every call generates a new cnonce and increments the nonce-count, so the
    /// returned value must be used for exactly one request. `password` overrides
    /// the stored password for this call only.
    pub fn authenticate(&mut self, password: Option<&[u8]>) -> Result<String, DigestError> {
        self.check_challenge()?;
        let qop = self.effective_qop()?;

        self.cnonce = Some(self.nonce_source.random_token(CNONCE_LENGTH));
        self.increment_nc();

        let hash = self.hash;
        let password = password.unwrap_or(self.password.as_slice());
        let realm = self.realm.as_deref().unwrap_or_default();
        let nonce = self.nonce.as_deref().unwrap_or_default();
        let cnonce = self.cnonce.as_deref().unwrap_or_default();
        let nc = self.nc_hex();

        let ha1 = hash(&[format!("{}:{}:", self.username, realm).as_bytes(), password].concat());

        let response = match qop {
            Qop::Auth => {
                let ha2 = hash(format!("{}:{}", self.method, self.uri).as_bytes());

                hash(format!("{ha1}:{nonce}:{nc}:{cnonce}:auth:{ha2}").as_bytes())
            }
            Qop::AuthInt => {
                let body = self.entity_body.as_deref().unwrap_or_default();
                let ha2 = hash(format!("{}:{}:{}", self.method, self.uri, hash(body)).as_bytes());

                hash(format!("{ha1}:{nonce}:{nc}:{cnonce}:auth-int:{ha2}").as_bytes())
            }
            Qop::NoQop | Qop::Unsupported => {
                let ha2 = hash(format!("{}:{}", self.method, self.uri).as_bytes());

                hash(format!("{ha1}:{nonce}:{ha2}").as_bytes())
            }
        };

        log::trace!("computed digest response for realm {realm:?} with nc={nc}");

        self.response = Some(response.into());

        Ok(self.to_string())
    }

    /// Absorb the challenge of a later response in the same retry sequence.
    ///
    /// Does not compute a new response, [`authenticate`](Self::authenticate) must be called afterwards.
    pub fn update(&mut self, response: ResponseParts<'_>) -> Result<(), DigestError> {
        let (challenge, is_proxy) = read_challenge(&response)?;

        self.update_from_challenge(&challenge, is_proxy);

        Ok(())
    }

    /// Like [`update`](Self::update) but with an already parsed challenge
    pub fn update_from_challenge(&mut self, challenge: &DigestChallenge, is_proxy: bool) {
        if challenge.nonce != self.nonce {
            log::debug!("challenge carries a new nonce, resetting nonce-count");

            self.nc = 0;
            self.nonce = challenge.nonce.clone();
        }

        self.realm = challenge.realm.clone();
        self.opaque = challenge.opaque.clone();
        self.qop = Qop::select(challenge.qop.as_deref());
        self.is_proxy = is_proxy;
    }

    fn check_challenge(&self) -> Result<(), DigestError> {
        if self.config.reject_incomplete_challenge {
            if self.realm.is_none() {
                return Err(DigestError::IncompleteChallenge("realm"));
            }

            if self.nonce.is_none() {
                return Err(DigestError::IncompleteChallenge("nonce"));
            }
        }

        if self.config.enforce_md5 {
            if let Some(algorithm) = &self.algorithm {
                if !algorithm.eq_ignore_ascii_case("MD5") {
                    return Err(DigestError::UnsupportedAlgorithm(algorithm.clone()));
                }
            }
        }

        Ok(())
    }

    fn effective_qop(&self) -> Result<Qop, DigestError> {
        match (self.qop, self.config.unsupported_qop) {
            (Qop::Unsupported, UnsupportedQop::Reject) => Err(DigestError::UnsupportedQop),
            (Qop::Unsupported, UnsupportedQop::FallbackToNone) => {
                log::warn!("challenge offers no supported qop, falling back to a response without qop");

                Ok(Qop::NoQop)
            }
            (qop, _) => Ok(qop),
        }
    }

    // nc-value = 8LHEX, after 'ffffffff' it restarts at 1
    fn increment_nc(&mut self) {
        self.nc = match self.nc.checked_add(1) {
            Some(nc) => nc,
            None => {
                log::warn!("maximum nonce-count reached, resetting it to 1");
                1
            }
        };
    }
}

impl<N> DigestCredential<N> {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn realm(&self) -> Option<&str> {
        self.realm.as_deref()
    }

    pub fn nonce(&self) -> Option<&str> {
        self.nonce.as_deref()
    }

    pub fn opaque(&self) -> Option<&str> {
        self.opaque.as_deref()
    }

    pub fn algorithm(&self) -> Option<&str> {
        self.algorithm.as_deref()
    }

    pub fn qop(&self) -> Qop {
        self.qop
    }

    pub fn cnonce(&self) -> Option<&str> {
        self.cnonce.as_deref()
    }

    /// Number of responses computed under the current nonce
    pub fn nc(&self) -> u32 {
        self.nc
    }

    /// The nonce-count as sent in the `nc` param, 8 lowercase hex digits
    pub fn nc_hex(&self) -> String {
        format!("{:08x}", self.nc)
    }

    /// The last computed response digest
    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    pub fn is_proxy(&self) -> bool {
        self.is_proxy
    }

    /// Name of the header the credentials must be sent in
    pub fn header_name(&self) -> Name {
        if self.is_proxy {
            Name::PROXY_AUTHORIZATION
        } else {
            Name::AUTHORIZATION
        }
    }
}

impl<N> fmt::Display for DigestCredential<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Digest")?;

        let mut sep = " ";
        let mut param = |f: &mut fmt::Formatter<'_>, args: fmt::Arguments<'_>| {
            f.write_str(sep)?;
            sep = ", ";
            f.write_fmt(args)
        };

        if let Some(algorithm) = self.algorithm.as_deref().filter(|a| !a.is_empty()) {
            param(f, format_args!("algorithm={algorithm}"))?;
        }

        let quoted = [
            ("username", Some(self.username.as_str())),
            ("realm", self.realm.as_deref()),
            ("nonce", self.nonce.as_deref()),
            ("uri", Some(self.uri.as_str())),
            ("response", self.response.as_deref()),
            ("opaque", self.opaque.as_deref()),
        ];

        for (name, value) in quoted {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                param(f, format_args!("{name}={}", Quoted(value)))?;
            }
        }

        if let Some(qop) = self.qop.as_str() {
            let cnonce = self.cnonce.as_deref().unwrap_or_default();

            param(f, format_args!("qop={qop}"))?;
            param(f, format_args!("cnonce={}", Quoted(cnonce)))?;
            param(f, format_args!("nc={}", self.nc_hex()))?;
        }

        Ok(())
    }
}

impl<N> fmt::Debug for DigestCredential<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestCredential")
            .field("username", &self.username)
            .field("method", &self.method)
            .field("uri", &self.uri)
            .field("realm", &self.realm)
            .field("nonce", &self.nonce)
            .field("opaque", &self.opaque)
            .field("algorithm", &self.algorithm)
            .field("qop", &self.qop)
            .field("cnonce", &self.cnonce)
            .field("nc", &self.nc)
            .field("response", &self.response)
            .field("is_proxy", &self.is_proxy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use sip_types::header::typed::Auth;
    use sip_types::msg::StatusLine;
    use sip_types::Headers;

    fn request(method: &str, uri: &'static str) -> RequestLine {
        RequestLine {
            method: Method::from(method),
            uri: BytesStr::from_static(uri),
        }
    }

    fn challenge(realm: &'static str, nonce: &'static str, qop: Option<Vec<QopOption>>) -> DigestChallenge {
        DigestChallenge {
            realm: Some(BytesStr::from_static(realm)),
            nonce: Some(BytesStr::from_static(nonce)),
            qop,
            ..Default::default()
        }
    }

    fn alice(qop: Option<Vec<QopOption>>) -> DigestCredential<impl NonceSource> {
        let mut count = 0;

        DigestCredential::from_challenge(
            &DigestUser::new("alice", "secret"),
            &request("REGISTER", "sip:example.com"),
            &challenge("example.com", "abc123", qop),
            false,
        )
        .with_nonce_source(move |_: usize| {
            count += 1;
            BytesStr::from(format!("cnonce{count}"))
        })
    }

    fn param_names(value: &str) -> Vec<String> {
        let auth = Auth::parse(&BytesStr::from(value)).unwrap();

        assert_eq!(auth.scheme, "Digest");

        auth.params.iter().map(|p| p.name.to_string()).collect()
    }

    #[test]
    fn no_qop_response() {
        let mut credential = alice(None);

        assert_eq!(credential.response(), None);
        assert_eq!(credential.nc_hex(), "00000000");

        let value = credential.authenticate(None).unwrap();

        let expected = hash_md5(
            format!(
                "{}:abc123:{}",
                hash_md5(b"alice:example.com:secret"),
                hash_md5(b"REGISTER:sip:example.com")
            )
            .as_bytes(),
        );

        assert_eq!(credential.response().unwrap(), expected.as_str());
        assert_eq!(
            value,
            format!(
                r#"Digest username="alice", realm="example.com", nonce="abc123", uri="sip:example.com", response="{expected}""#
            )
        );
        assert_eq!(credential.nc(), 1);
        assert_eq!(credential.cnonce().unwrap(), "cnonce1");
    }

    #[test]
    fn rfc2069_example() {
        let mut challenge = challenge(
            "testrealm@host.com",
            "dcd98b7102dd2f0e8b11d0f600bfb0c093",
            None,
        );
        challenge.opaque = Some(BytesStr::from_static("5ccc069c403ebaf9f0171e9517f40e41"));

        let mut credential = DigestCredential::from_challenge(
            &DigestUser::new("Mufasa", "CircleOfLife"),
            &request("GET", "/dir/index.html"),
            &challenge,
            false,
        );

        assert_eq!(
            credential.authenticate(None).unwrap(),
            r#"Digest username="Mufasa", realm="testrealm@host.com", nonce="dcd98b7102dd2f0e8b11d0f600bfb0c093", uri="/dir/index.html", response="1949323746fe6a43ef61f9606e7febea", opaque="5ccc069c403ebaf9f0171e9517f40e41""#
        );
    }

    #[test]
    fn rfc2617_example() {
        let mut challenge = challenge(
            "testrealm@host.com",
            "dcd98b7102dd2f0e8b11d0f600bfb0c093",
            Some(vec![QopOption::Auth, QopOption::AuthInt]),
        );
        challenge.opaque = Some(BytesStr::from_static("5ccc069c403ebaf9f0171e9517f40e41"));

        let mut credential = DigestCredential::from_challenge(
            &DigestUser::new("Mufasa", "Circle Of Life"),
            &request("GET", "/dir/index.html"),
            &challenge,
            false,
        )
        .with_nonce_source(|_: usize| BytesStr::from_static("0a4f113b"));

        assert_eq!(
            credential.authenticate(None).unwrap(),
            r#"Digest username="Mufasa", realm="testrealm@host.com", nonce="dcd98b7102dd2f0e8b11d0f600bfb0c093", uri="/dir/index.html", response="6629fae49393a05397450978507c4ef1", opaque="5ccc069c403ebaf9f0171e9517f40e41", qop=auth, cnonce="0a4f113b", nc=00000001"#
        );
    }

    #[test]
    fn register_example() {
        let mut credential = DigestCredential::from_challenge(
            &DigestUser::new("user123", "password123"),
            &request("REGISTER", "sip:example.org"),
            &DigestChallenge {
                algorithm: Some(BytesStr::from_static("MD5")),
                ..challenge("example.org", "YWmh5GFpoLjiTDCA1hTSSygkgdj99aHE", None)
            },
            false,
        );

        let value = credential.authenticate(None).unwrap();

        assert_eq!(
            credential.response().unwrap(),
            "bc185e4893f17f12dc53153d2a62e6a6"
        );
        assert!(value.starts_with("Digest algorithm=MD5, username=\"user123\""));
    }

    #[test]
    fn qop_selection() {
        use QopOption::*;

        let other = || Other(BytesStr::from_static("auth-conf"));

        assert_eq!(Qop::select(None), Qop::NoQop);
        assert_eq!(Qop::select(Some(&[AuthInt, Auth][..])), Qop::Auth);
        assert_eq!(Qop::select(Some(&[other(), Auth][..])), Qop::Auth);
        assert_eq!(Qop::select(Some(&[AuthInt][..])), Qop::AuthInt);
        assert_eq!(Qop::select(Some(&[other()][..])), Qop::Unsupported);
        assert_eq!(Qop::select(Some(&[][..])), Qop::Unsupported);
    }

    #[test]
    fn auth_int_hashes_empty_body() {
        let mut credential = alice(Some(vec![QopOption::AuthInt]));

        let value = credential.authenticate(None).unwrap();

        let ha1 = hash_md5(b"alice:example.com:secret");
        let ha2 = hash_md5(format!("REGISTER:sip:example.com:{}", hash_md5(b"")).as_bytes());
        let expected = hash_md5(format!("{ha1}:abc123:00000001:cnonce1:auth-int:{ha2}").as_bytes());

        assert_eq!(credential.qop(), Qop::AuthInt);
        assert_eq!(credential.response().unwrap(), expected.as_str());
        assert!(value.ends_with(r#", qop=auth-int, cnonce="cnonce1", nc=00000001"#));
    }

    #[test]
    fn auth_int_hashes_entity_body() {
        let mut credential = alice(Some(vec![QopOption::AuthInt]));
        credential.set_entity_body("v=0\r\n");

        credential.authenticate(None).unwrap();

        let ha1 = hash_md5(b"alice:example.com:secret");
        let ha2 = hash_md5(format!("REGISTER:sip:example.com:{}", hash_md5(b"v=0\r\n")).as_bytes());
        let expected = hash_md5(format!("{ha1}:abc123:00000001:cnonce1:auth-int:{ha2}").as_bytes());

        assert_eq!(credential.response().unwrap(), expected.as_str());
    }

    #[test]
    fn auth_counts_and_refreshes_cnonce() {
        let mut credential = alice(Some(vec![QopOption::Auth]));

        let first = credential.authenticate(None).unwrap();
        let first_cnonce = credential.cnonce().unwrap().to_owned();
        let second = credential.authenticate(None).unwrap();

        assert_ne!(first_cnonce, credential.cnonce().unwrap());
        assert_ne!(first, second);
        assert_eq!(credential.nc(), 2);
        assert!(second.ends_with(r#", qop=auth, cnonce="cnonce2", nc=00000002"#));
        assert_eq!(credential.nonce().unwrap(), "abc123");
        assert_eq!(credential.realm().unwrap(), "example.com");

        let ha1 = hash_md5(b"alice:example.com:secret");
        let ha2 = hash_md5(b"REGISTER:sip:example.com");
        let expected = hash_md5(format!("{ha1}:abc123:00000002:cnonce2:auth:{ha2}").as_bytes());

        assert_eq!(credential.response().unwrap(), expected.as_str());
    }

    #[test]
    fn nc_hex_format() {
        let mut credential = alice(None);

        for (nc, hex) in [
            (0, "00000000"),
            (1, "00000001"),
            (0xa, "0000000a"),
            (0x00ab_cdef, "00abcdef"),
            (u32::MAX, "ffffffff"),
        ] {
            credential.nc = nc;

            assert_eq!(credential.nc_hex(), hex);
        }
    }

    #[test]
    fn nc_wraps_to_one() {
        let mut credential = alice(Some(vec![QopOption::Auth]));
        credential.nc = u32::MAX - 1;

        let value = credential.authenticate(None).unwrap();
        assert!(value.ends_with("nc=ffffffff"));

        let value = credential.authenticate(None).unwrap();
        assert_eq!(credential.nc(), 1);
        assert_eq!(credential.nc_hex(), "00000001");
        assert!(value.ends_with("nc=00000001"));
    }

    #[test]
    fn update_with_same_nonce_keeps_count() {
        let mut credential = alice(Some(vec![QopOption::Auth]));

        credential.authenticate(None).unwrap();
        credential.authenticate(None).unwrap();

        let mut next = challenge("example.com", "abc123", Some(vec![QopOption::Auth]));
        next.opaque = Some(BytesStr::from_static("op"));
        credential.update_from_challenge(&next, false);

        assert_eq!(credential.nc(), 2);
        assert_eq!(credential.opaque().unwrap(), "op");

        credential.authenticate(None).unwrap();
        assert_eq!(credential.nc(), 3);
    }

    #[test]
    fn update_with_new_nonce_resets_count() {
        let mut credential = alice(Some(vec![QopOption::Auth]));

        credential.authenticate(None).unwrap();
        credential.authenticate(None).unwrap();

        credential.update_from_challenge(
            &challenge("other.example.com", "def456", Some(vec![QopOption::AuthInt])),
            true,
        );

        assert_eq!(credential.nc(), 0);
        assert_eq!(credential.nc_hex(), "00000000");
        assert_eq!(credential.nonce().unwrap(), "def456");
        assert_eq!(credential.realm().unwrap(), "other.example.com");
        assert_eq!(credential.qop(), Qop::AuthInt);
        assert_eq!(credential.opaque(), None);
        assert_eq!(credential.header_name(), Name::PROXY_AUTHORIZATION);

        let value = credential.authenticate(None).unwrap();
        assert_eq!(credential.nc(), 1);
        assert!(value.contains(r#"nonce="def456""#));
        assert!(value.ends_with("nc=00000001"));
    }

    #[test]
    fn update_from_response() {
        let mut credential = alice(None);

        let mut headers = Headers::new();
        headers.insert(
            Name::WWW_AUTHENTICATE,
            r#"Digest realm="example.com", nonce="fresh", stale=true, qop="auth""#,
        );

        credential
            .update(ResponseParts {
                line: &StatusLine {
                    code: StatusCode::UNAUTHORIZED,
                    reason: None,
                },
                headers: &headers,
                body: &[],
            })
            .unwrap();

        assert_eq!(credential.nonce().unwrap(), "fresh");
        assert_eq!(credential.qop(), Qop::Auth);
        assert_eq!(credential.header_name(), Name::AUTHORIZATION);
    }

    #[test]
    fn unsupported_qop_is_rejected_by_default() {
        let mut credential = alice(Some(vec![QopOption::Other(BytesStr::from_static("auth-conf"))]));

        assert_eq!(credential.qop(), Qop::Unsupported);
        assert!(matches!(
            credential.authenticate(None),
            Err(DigestError::UnsupportedQop)
        ));

        assert_eq!(credential.nc(), 0);
        assert_eq!(credential.cnonce(), None);
        assert_eq!(credential.response(), None);
    }

    #[test]
    fn unsupported_qop_fallback() {
        let mut credential = alice(Some(vec![]))
            .with_config(DigestConfig {
                unsupported_qop: UnsupportedQop::FallbackToNone,
                ..Default::default()
            });

        let value = credential.authenticate(None).unwrap();

        let mut plain = alice(None);
        plain.authenticate(None).unwrap();

        assert_eq!(credential.response(), plain.response());
        assert!(!value.contains("qop="));
        assert!(!value.contains("cnonce="));
    }

    #[test]
    fn algorithm_is_not_enforced_by_default() {
        let sha256 = DigestChallenge {
            algorithm: Some(BytesStr::from_static("SHA-256")),
            ..challenge("example.com", "abc123", None)
        };

        let mut credential = DigestCredential::from_challenge(
            &DigestUser::new("alice", "secret"),
            &request("REGISTER", "sip:example.com"),
            &sha256,
            false,
        );

        let value = credential.authenticate(None).unwrap();
        assert!(value.starts_with("Digest algorithm=SHA-256, "));

        let mut credential = credential.with_config(DigestConfig {
            enforce_md5: true,
            ..Default::default()
        });

        match credential.authenticate(None) {
            Err(DigestError::UnsupportedAlgorithm(algorithm)) => assert_eq!(algorithm, "SHA-256"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn incomplete_challenge() {
        let incomplete = DigestChallenge {
            realm: Some(BytesStr::from_static("example.com")),
            ..Default::default()
        };

        let mut credential = DigestCredential::from_challenge(
            &DigestUser::new("alice", "secret"),
            &request("REGISTER", "sip:example.com"),
            &incomplete,
            false,
        );

        let value = credential.authenticate(None).unwrap();
        assert!(!value.contains("nonce="));

        let expected = hash_md5(
            format!(
                "{}::{}",
                hash_md5(b"alice:example.com:secret"),
                hash_md5(b"REGISTER:sip:example.com")
            )
            .as_bytes(),
        );
        assert_eq!(credential.response().unwrap(), expected.as_str());

        let mut credential = credential.with_config(DigestConfig {
            reject_incomplete_challenge: true,
            ..Default::default()
        });

        assert!(matches!(
            credential.authenticate(None),
            Err(DigestError::IncompleteChallenge("nonce"))
        ));
    }

    #[test]
    fn password_override_is_not_stored() {
        let mut credential = alice(None);
        credential.authenticate(Some(b"other")).unwrap();

        let overridden = hash_md5(
            format!(
                "{}:abc123:{}",
                hash_md5(b"alice:example.com:other"),
                hash_md5(b"REGISTER:sip:example.com")
            )
            .as_bytes(),
        );
        assert_eq!(credential.response().unwrap(), overridden.as_str());

        credential.authenticate(None).unwrap();
        assert_ne!(credential.response().unwrap(), overridden.as_str());
    }

    #[test]
    fn quoted_pairs_are_hashed_unescaped() {
        let user = DigestUser::new("alice", "secret");
        let line = request("REGISTER", "sip:example.com");
        let status = StatusLine {
            code: StatusCode::UNAUTHORIZED,
            reason: None,
        };

        let mut headers = Headers::new();
        headers.insert(
            Name::WWW_AUTHENTICATE,
            r#"Digest realm="a\"b", nonce="n\\1""#,
        );

        let mut credential = DigestCredential::from_response(
            &user,
            RequestParts {
                line: &line,
                headers: &Headers::new(),
                body: &[],
            },
            ResponseParts {
                line: &status,
                headers: &headers,
                body: &[],
            },
        )
        .unwrap();

        assert_eq!(credential.realm(), Some(r#"a"b"#));
        assert_eq!(credential.nonce(), Some(r"n\1"));

        let value = credential.authenticate(None).unwrap();

        let expected = hash_md5(
            format!(
                r"{}:n\1:{}",
                hash_md5(br#"alice:a"b:secret"#),
                hash_md5(b"REGISTER:sip:example.com")
            )
            .as_bytes(),
        );
        assert_eq!(credential.response(), Some(expected.as_str()));
        assert!(value.contains(r#"realm="a\"b", nonce="n\\1""#));

        let auth = Auth::parse(&BytesStr::from(value)).unwrap();
        assert_eq!(auth.param("realm").unwrap().as_str(), r#"a"b"#);
        assert_eq!(auth.param("nonce").unwrap().as_str(), r"n\1");
    }

    #[test]
    fn field_order() {
        let mut credential = DigestCredential::from_challenge(
            &DigestUser::new("alice", "secret"),
            &request("INVITE", "sip:bob@example.com"),
            &DigestChallenge {
                opaque: Some(BytesStr::from_static("xyz")),
                algorithm: Some(BytesStr::from_static("MD5")),
                ..challenge("example.com", "abc123", Some(vec![QopOption::AuthInt, QopOption::Auth]))
            },
            false,
        );

        let value = credential.authenticate(None).unwrap();

        assert_eq!(
            param_names(&value),
            [
                "algorithm", "username", "realm", "nonce", "uri", "response", "opaque", "qop",
                "cnonce", "nc"
            ]
        );
    }

    #[test]
    fn unset_fields_are_omitted() {
        let credential = alice(Some(vec![QopOption::Auth]));

        assert_eq!(
            credential.to_string(),
            r#"Digest username="alice", realm="example.com", nonce="abc123", uri="sip:example.com", qop=auth, cnonce="", nc=00000000"#
        );
    }

    #[test]
    fn from_response_selects_header_by_status() {
        let user = DigestUser::new("alice", "secret");
        let line = request("REGISTER", "sip:example.com");

        let mut headers = Headers::new();
        headers.insert(
            Name::PROXY_AUTHENTICATE,
            r#"Digest realm="proxy.example.com", nonce="p1""#,
        );
        headers.insert(
            Name::WWW_AUTHENTICATE,
            r#"Digest realm="example.com", nonce="w1""#,
        );

        let request_parts = RequestParts {
            line: &line,
            headers: &Headers::new(),
            body: &[],
        };

        let respond = |code| StatusLine { code, reason: None };

        let www_line = respond(StatusCode::UNAUTHORIZED);
        let credential = DigestCredential::from_response(
            &user,
            request_parts,
            ResponseParts {
                line: &www_line,
                headers: &headers,
                body: &[],
            },
        )
        .unwrap();

        assert_eq!(credential.nonce().unwrap(), "w1");
        assert!(!credential.is_proxy());
        assert_eq!(credential.header_name(), Name::AUTHORIZATION);

        let proxy_line = respond(StatusCode::PROXY_AUTHENTICATION_REQUIRED);
        let credential = DigestCredential::from_response(
            &user,
            request_parts,
            ResponseParts {
                line: &proxy_line,
                headers: &headers,
                body: &[],
            },
        )
        .unwrap();

        assert_eq!(credential.realm().unwrap(), "proxy.example.com");
        assert!(credential.is_proxy());
        assert_eq!(credential.header_name(), Name::PROXY_AUTHORIZATION);
    }

    #[test]
    fn from_response_without_digest_challenge() {
        let user = DigestUser::new("alice", "secret");
        let line = request("REGISTER", "sip:example.com");
        let status = StatusLine {
            code: StatusCode::UNAUTHORIZED,
            reason: None,
        };

        let mut headers = Headers::new();
        headers.insert(Name::PROXY_AUTHENTICATE, r#"Digest realm="a", nonce="b""#);
        headers.insert(Name::WWW_AUTHENTICATE, r#"Bearer realm="a""#);

        let result = DigestCredential::from_response(
            &user,
            RequestParts {
                line: &line,
                headers: &Headers::new(),
                body: &[],
            },
            ResponseParts {
                line: &status,
                headers: &headers,
                body: &[],
            },
        );

        match result {
            Err(DigestError::MissingChallenge(name)) => assert_eq!(name, Name::WWW_AUTHENTICATE),
            other => panic!("unexpected {other:?}"),
        }
    }
}
