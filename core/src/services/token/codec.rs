//! Signing and verification of token strings.
//!
//! Tokens are compact JWS strings signed with HMAC-SHA256. The codec only
//! answers "was this minted by us and is it well formed"; expiry is left to
//! the caller so that expired tokens can still be decoded where allowed.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use crate::domain::entities::token::Claims;
use crate::errors::{CodecError, TokenError};

pub struct TokenCodec {
    header: Header,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        Self {
            header: Header::new(Algorithm::HS256),
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&self.header, claims, &self.encoding_key).map_err(|e| {
            debug!(error = %e, "failed to encode token");
            TokenError::GenerationFailed
        })
    }

    /// Verify the signature and decode the claims. Does not check expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, CodecError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidAlgorithmName
                | ErrorKind::InvalidKeyFormat => CodecError::BadSignature,
                _ => CodecError::Malformed,
            }
        })?;

        let claims = data.claims;
        if claims.exp <= claims.iat {
            return Err(CodecError::Malformed);
        }
        Ok(claims)
    }
}
