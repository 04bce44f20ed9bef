//! Bearer token validation and the authenticated-user extractor.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::JwtSettings;

/// Claims carried by tokens issued to platform users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iss: String,
    pub aud: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Token validation failure.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,
    #[error("Malformed authorization header")]
    MalformedHeader,
    #[error("Token expired")]
    Expired,
    #[error("Token issuer not accepted")]
    InvalidIssuer,
    #[error("Token audience not accepted")]
    InvalidAudience,
    #[error("Token signature invalid")]
    InvalidSignature,
    #[error("Invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidIssuer => Self::InvalidIssuer,
            ErrorKind::InvalidAudience => Self::InvalidAudience,
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            _ => Self::Invalid(err),
        }
    }
}

// Bare status; the global exception middleware writes the body.
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

/// HS256 bearer token validator.
#[derive(Clone)]
pub struct JwtAuthenticator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtAuthenticator {
    /// Build a validator for the configured key, issuer and audience.
    pub fn new(settings: &JwtSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[settings.issuer.as_str()]);
        validation.set_audience(&[settings.audience.as_str()]);
        if settings.validate_lifetime {
            validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        } else {
            warn!("Token lifetime validation is disabled; expired tokens will be accepted");
            validation.validate_exp = false;
            validation.set_required_spec_claims(&["iss", "aud"]);
        }

        Self {
            decoding_key: DecodingKey::from_secret(settings.key.expose_secret().as_bytes()),
            validation,
        }
    }

    /// Validate `token` and return its claims.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }

    /// Validate the value of an `Authorization` header.
    pub fn validate_header(&self, value: &str) -> Result<Claims, AuthError> {
        let token = parse_bearer(value)?;
        self.validate(token)
    }
}

impl std::fmt::Debug for JwtAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtAuthenticator")
            .field("decoding_key", &"[REDACTED]")
            .field("validate_exp", &self.validation.validate_exp)
            .finish()
    }
}

fn parse_bearer(value: &str) -> Result<&str, AuthError> {
    let (scheme, token) = value
        .trim()
        .split_once(' ')
        .ok_or(AuthError::MalformedHeader)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedHeader);
    }
    Ok(token.trim())
}

/// Extractor that requires a valid bearer token.
///
/// ```rust,ignore
/// async fn profile(AuthenticatedUser(claims): AuthenticatedUser) -> String {
///     claims.sub
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    Arc<JwtAuthenticator>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let authenticator = Arc::<JwtAuthenticator>::from_ref(state);
        let value = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingToken)?
            .to_str()
            .map_err(|_| AuthError::MalformedHeader)?;

        authenticator
            .validate_header(value)
            .map(Self)
            .inspect_err(|err| debug!(error = %err, path = %parts.uri.path(), "Bearer token rejected"))
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header, get_current_timestamp};
    use secrecy::SecretString;

    use super::*;

    const C_KEY: &str = "k8Qz1vN3pX7rT2wY5bL9mC4dF6gH0jS2";

    fn settings(validate_lifetime: bool) -> JwtSettings {
        JwtSettings {
            key: SecretString::from(C_KEY.to_string()),
            issuer: "shop-auth".to_string(),
            audience: "shop-services".to_string(),
            validate_lifetime,
        }
    }

    fn claims(exp: Option<u64>) -> Claims {
        Claims {
            sub: "42".to_string(),
            iss: "shop-auth".to_string(),
            aud: "shop-services".to_string(),
            exp,
            role: Some("Admin".to_string()),
            email: None,
        }
    }

    fn mint(claims: &Claims, key: &str) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(key.as_bytes()),
        )
        .expect("encode token")
    }

    #[test]
    fn test_validate_accepts_well_formed_token() {
        let authenticator = JwtAuthenticator::new(&settings(true));
        let claims_in = claims(Some(get_current_timestamp() + 600));
        let claims_out = authenticator
            .validate(&mint(&claims_in, C_KEY))
            .expect("valid token");
        assert_eq!(claims_out, claims_in);
    }

    #[test]
    fn test_validate_rejects_wrong_issuer_audience_and_signature() {
        let authenticator = JwtAuthenticator::new(&settings(true));
        let n_exp = Some(get_current_timestamp() + 600);

        let mut claims_bad = claims(n_exp);
        claims_bad.iss = "someone-else".to_string();
        assert!(matches!(
            authenticator.validate(&mint(&claims_bad, C_KEY)),
            Err(AuthError::InvalidIssuer)
        ));

        let mut claims_bad = claims(n_exp);
        claims_bad.aud = "other-audience".to_string();
        assert!(matches!(
            authenticator.validate(&mint(&claims_bad, C_KEY)),
            Err(AuthError::InvalidAudience)
        ));

        let token = mint(&claims(n_exp), "another-key-that-is-32-bytes-long!!");
        assert!(matches!(
            authenticator.validate(&token),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn test_validate_rejects_expired_token_by_default() {
        let authenticator = JwtAuthenticator::new(&settings(true));
        let token = mint(&claims(Some(get_current_timestamp() - 3600)), C_KEY);
        assert!(matches!(authenticator.validate(&token), Err(AuthError::Expired)));

        let token = mint(&claims(None), C_KEY);
        assert!(matches!(authenticator.validate(&token), Err(AuthError::Invalid(_))));
    }

    #[test]
    fn test_validate_skips_lifetime_when_disabled() {
        let authenticator = JwtAuthenticator::new(&settings(false));
        let token = mint(&claims(Some(get_current_timestamp() - 3600)), C_KEY);
        assert!(authenticator.validate(&token).is_ok());

        let token = mint(&claims(None), C_KEY);
        assert!(authenticator.validate(&token).is_ok());
    }

    #[test]
    fn test_parse_bearer() {
        assert_eq!(parse_bearer("Bearer abc").expect("token"), "abc");
        assert_eq!(parse_bearer("bearer   abc ").expect("token"), "abc");
        assert!(matches!(parse_bearer("Basic abc"), Err(AuthError::MalformedHeader)));
        assert!(matches!(parse_bearer("abc"), Err(AuthError::MalformedHeader)));
        assert!(matches!(parse_bearer("Bearer  "), Err(AuthError::MalformedHeader)));
    }
}
