use crate::digest::{DigestCredential, read_challenge};
use crate::{ClientAuthenticator, DigestConfig, DigestError, DigestUser, RequestParts, ResponseParts};
use sip_types::{Headers, Name};

/// Used to solve the Digest challenges of 401 / 407 SIP responses for a single request
pub struct DigestAuthenticator {
    user: DigestUser,
    /// Applied to every authorized request, changes take effect on the next one
    pub config: DigestConfig,
    credential: Option<DigestCredential>,

    /// Set once a `stale=true` challenge repeated the current nonce
    stale_retried: bool,
}

impl DigestAuthenticator {
    pub fn new(user: DigestUser) -> Self {
        Self {
            user,
            config: DigestConfig::default(),
            credential: None,
            stale_retried: false,
        }
    }

    /// The credentials created from the last challenge, if any was received yet
    pub fn credential(&self) -> Option<&DigestCredential> {
        self.credential.as_ref()
    }
}

impl ClientAuthenticator for DigestAuthenticator {
    type Error = DigestError;

    fn authorize_request(&mut self, request_headers: &mut Headers) -> Result<(), DigestError> {
        let Some(credential) = &mut self.credential else {
            return Ok(());
        };

        credential.set_config(self.config.clone());

        let value = credential.authenticate(None)?;

        // the challenge may have moved between WWW- and Proxy-Authenticate
        request_headers.remove(&Name::AUTHORIZATION);
        request_headers.remove(&Name::PROXY_AUTHORIZATION);
        request_headers.insert(credential.header_name(), value);

        Ok(())
    }

    fn handle_rejection(
        &mut self,
        rejected_request: RequestParts<'_>,
        reject_response: ResponseParts<'_>,
    ) -> Result<(), DigestError> {
        let (challenge, is_proxy) = read_challenge(&reject_response)?;

        if let Some(credential) = &mut self.credential {
            // Same nonce again means the credentials itself were wrong,
            // a stale marker grants a single retry under that nonce
            if credential.nonce() == challenge.nonce.as_deref() {
                if !challenge.stale || self.stale_retried {
                    return Err(DigestError::Rejected(challenge.realm));
                }

                self.stale_retried = true;
            } else {
                self.stale_retried = false;
            }

            log::debug!(
                "absorbing new challenge for realm {:?}, stale={}",
                challenge.realm,
                challenge.stale
            );

            credential.update_from_challenge(&challenge, is_proxy);
            credential.set_entity_body(rejected_request.body);

            return Ok(());
        }

        let mut credential =
            DigestCredential::from_challenge(&self.user, rejected_request.line, &challenge, is_proxy)
                .with_config(self.config.clone());

        credential.set_entity_body(rejected_request.body);

        self.credential = Some(credential);

        Ok(())
    }
}
