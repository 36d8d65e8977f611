use bytesstr::BytesStr;

/// Length of the cnonce generated for every response
pub(crate) const CNONCE_LENGTH: usize = 12;

/// Generator of client nonces
///
/// Implemented for closures `FnMut(usize) -> BytesStr`, which is mostly useful in tests.
pub trait NonceSource {
    /// Returns a token of `len` characters which is safe to be put inside a quoted-string
    fn random_token(&mut self, len: usize) -> BytesStr;
}

/// Creates lowercase hex tokens from random v4 UUIDs
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidNonceSource;

impl NonceSource for UuidNonceSource {
    fn random_token(&mut self, len: usize) -> BytesStr {
        let mut token = String::with_capacity(len + 32);

        while token.len() < len {
            token.push_str(&uuid::Uuid::new_v4().simple().to_string());
        }

        token.truncate(len);
        token.into()
    }
}

impl<F> NonceSource for F
where
    F: FnMut(usize) -> BytesStr,
{
    fn random_token(&mut self, len: usize) -> BytesStr {
        self(len)
    }
}
