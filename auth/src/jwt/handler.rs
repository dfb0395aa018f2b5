use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// JWT token handler for encoding and decoding tokens.
///
/// Generic over the claims type. Signs and accepts HS256 only; a token whose
/// header names any other algorithm is rejected before its signature is
/// looked at.
///
/// An empty secret leaves the handler without keys: every `encode` and
/// `decode` call fails with [`JwtError::MissingSecret`] instead of signing
/// with a guessable key.
pub struct JwtHandler {
    keys: Option<(EncodingKey, DecodingKey)>,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Symmetric signing secret (should be at least 32 bytes for HS256)
    pub fn new(secret: &[u8]) -> Self {
        let keys = (!secret.is_empty())
            .then(|| (EncodingKey::from_secret(secret), DecodingKey::from_secret(secret)));

        Self {
            keys,
            algorithm: Algorithm::HS256,
        }
    }

    /// Whether a signing secret was supplied.
    pub fn is_configured(&self) -> bool {
        self.keys.is_some()
    }

    /// Encode claims into a signed JWT.
    ///
    /// # Errors
    /// * `MissingSecret` - Handler was built with an empty secret
    /// * `EncodingFailed` - Claims could not be serialized or signed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let (encoding_key, _) = self.keys.as_ref().ok_or(JwtError::MissingSecret)?;
        let header = Header::new(self.algorithm);

        encode(&header, claims, encoding_key).map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify signature and algorithm, then decode the claims.
    ///
    /// The `exp` claim must be present but is not compared with the clock
    /// here; callers check expiry against their own notion of "now".
    ///
    /// # Errors
    /// * `MissingSecret` - Handler was built with an empty secret
    /// * `InvalidAlgorithm` - Header declares an algorithm other than HS256
    /// * `MissingClaim` - Token has no `exp` claim
    /// * `DecodingFailed` - Bad signature, malformed token or claims
    pub fn decode<T: for<'de> Deserialize<'de>>(&self, token: &str) -> Result<T, JwtError> {
        let (_, decoding_key) = self.keys.as_ref().ok_or(JwtError::MissingSecret)?;

        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        decode::<T>(token, decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidAlgorithm => JwtError::InvalidAlgorithm,
                ErrorKind::MissingRequiredClaim(claim) => JwtError::MissingClaim(claim.clone()),
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::DecodingFailed(e.to_string()),
            })
    }
}
