use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::TokenError;

/// A freshly signed token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// Encodes and verifies signed access tokens.
///
/// Compact `header.payload.signature` form, HS256 over the encoded header and
/// payload with a single process-wide secret. The codec holds no mutable
/// state and is safe to share between tasks.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl TokenCodec {
    /// Minimum secret length for HS256.
    pub const MIN_SECRET_LEN: usize = 32;

    /// Create a codec with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens, at least 32 bytes
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Issue a token for `subject_id` valid from `now` for `ttl`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(
        &self,
        subject_id: &str,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<IssuedToken, TokenError> {
        let claims = Claims::issue(subject_id, now, ttl);
        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))?;

        Ok(IssuedToken { token, claims })
    }

    /// Verify a token at time `now`.
    ///
    /// Checks run in a fixed order: structure, then signature, then expiry.
    /// A forged token is therefore rejected before its expiry is looked at.
    ///
    /// # Errors
    /// * `Malformed` - Wrong number of segments, bad encoding or unparsable claims
    /// * `SignatureInvalid` - Signature does not match the encoded header and claims
    /// * `Expired` - `now >= exp`
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        self.parse_unverified(token)?;

        let claims = decode::<Claims>(token, &self.decoding_key, &self.signed_validation())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidAlgorithmName => TokenError::SignatureInvalid,
                _ => TokenError::Malformed,
            })?;

        if claims.is_expired(now) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// Parse the claims without checking the signature.
    ///
    /// The signature segment must still be non-empty URL-safe base64.
    /// Never trust the result for authorization decisions.
    fn parse_unverified(&self, token: &str) -> Result<Claims, TokenError> {
        let signature = match token.split('.').collect::<Vec<_>>()[..] {
            [_, _, signature] => signature,
            _ => return Err(TokenError::Malformed),
        };
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenError::Malformed)?;
        if signature.is_empty() {
            return Err(TokenError::Malformed);
        }

        let mut validation = Validation::new(self.algorithm);
        validation.insecure_disable_signature_validation();
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Malformed)
    }

    fn signed_validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked against the caller's clock, not the system clock.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        validation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let codec = TokenCodec::new(SECRET);
        let issued = codec
            .issue("42", at(1_000), Duration::minutes(30))
            .expect("Failed to issue token");

        assert_eq!(issued.token.split('.').count(), 3);

        let claims = codec
            .verify(&issued.token, at(1_000 + 10 * 60))
            .expect("Failed to verify token");
        assert_eq!(claims, issued.claims);
        assert_eq!(claims.sub, "42");
    }

    #[test]
    fn test_valid_for_whole_lifetime() {
        let codec = TokenCodec::new(SECRET);
        let ttl = Duration::seconds(120);
        let issued = codec.issue("7", at(5_000), ttl).unwrap();

        for d in [0, 1, 60, 119] {
            let claims = codec.verify(&issued.token, at(5_000 + d)).unwrap();
            assert_eq!(claims.sub, "7");
        }
    }

    #[test]
    fn test_expired_at_exact_boundary_and_after() {
        let codec = TokenCodec::new(SECRET);
        let issued = codec.issue("7", at(5_000), Duration::seconds(120)).unwrap();

        assert_eq!(
            codec.verify(&issued.token, at(5_120)),
            Err(TokenError::Expired)
        );
        assert_eq!(
            codec.verify(&issued.token, at(9_999)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_malformed_tokens() {
        let codec = TokenCodec::new(SECRET);

        for token in ["", "abc", "a.b", "a.b.c.d", "invalid.token.here", "..."] {
            assert_eq!(
                codec.verify(token, at(0)),
                Err(TokenError::Malformed),
                "token {token:?}"
            );
        }
    }

    #[test]
    fn test_broken_signature_segment_is_malformed() {
        let codec = TokenCodec::new(SECRET);
        let issued = codec.issue("42", at(0), Duration::seconds(60)).unwrap();
        let parts: Vec<&str> = issued.token.split('.').collect();

        for signature in ["!!not*base64!!", "", "abc=", "a"] {
            let token = format!("{}.{}.{}", parts[0], parts[1], signature);
            assert_eq!(
                codec.verify(&token, at(1)),
                Err(TokenError::Malformed),
                "signature {signature:?}"
            );
        }
    }

    #[test]
    fn test_unparsable_claims_are_malformed() {
        #[derive(serde::Serialize)]
        struct Partial {
            sub: &'static str,
        }

        let token = encode(
            &Header::new(Algorithm::HS256),
            &Partial { sub: "42" },
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(
            TokenCodec::new(SECRET).verify(&token, at(0)),
            Err(TokenError::Malformed)
        );
    }

    #[test]
    fn test_wrong_secret_is_signature_invalid() {
        let issuer = TokenCodec::new(b"secret1_at_least_32_bytes_long_key!");
        let verifier = TokenCodec::new(b"secret2_at_least_32_bytes_long_key!");

        let issued = issuer.issue("42", at(0), Duration::seconds(60)).unwrap();

        assert_eq!(
            verifier.verify(&issued.token, at(1)),
            Err(TokenError::SignatureInvalid)
        );
    }

    #[test]
    fn test_forged_expired_token_reports_signature_not_expiry() {
        let forger = TokenCodec::new(b"attacker_secret_at_least_32_bytes!!");
        let issued = forger.issue("42", at(0), Duration::seconds(60)).unwrap();

        assert_eq!(
            TokenCodec::new(SECRET).verify(&issued.token, at(10_000)),
            Err(TokenError::SignatureInvalid)
        );
    }

    #[test]
    fn test_tampered_payload_is_signature_invalid() {
        let codec = TokenCodec::new(SECRET);
        let issued = codec.issue("42", at(0), Duration::seconds(60)).unwrap();
        let other = codec.issue("43", at(0), Duration::seconds(60)).unwrap();

        let parts: Vec<&str> = issued.token.split('.').collect();
        let other_parts: Vec<&str> = other.token.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        assert_eq!(
            codec.verify(&spliced, at(1)),
            Err(TokenError::SignatureInvalid)
        );
    }

    #[test]
    fn test_other_algorithm_is_rejected() {
        let claims = Claims::issue("42", at(0), Duration::seconds(60));
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(
            TokenCodec::new(SECRET).verify(&token, at(1)),
            Err(TokenError::SignatureInvalid)
        );
    }
}
