use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::http::HeaderName;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use thiserror::Error;
use tracing::Instrument;

use crate::domain::context::RequestContext;
use crate::domain::user::models::Role;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Middleware that gives every request a `RequestContext` with a fresh
/// correlation id and echoes the id in `x-request-id`.
pub async fn correlate(mut req: Request, next: Next) -> Response {
    let ctx = RequestContext::new();
    let correlation_id = ctx.correlation_id.unwrap_or_default();
    req.extensions_mut().insert(ctx);

    let span = tracing::info_span!("request", correlation_id = %correlation_id);
    let mut response = next.run(req).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&correlation_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Why a bearer token was refused. Logged only; clients see a plain 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenRejection {
    #[error("missing token")]
    MissingToken,

    #[error("invalid token")]
    InvalidToken,

    #[error("token expired")]
    TokenExpired,

    #[error("role missing")]
    RoleMissing,
}

impl From<auth::JwtError> for TokenRejection {
    fn from(err: auth::JwtError) -> Self {
        match err {
            auth::JwtError::TokenExpired => TokenRejection::TokenExpired,
            auth::JwtError::MissingClaim(claim) if claim == auth::Claims::ROLE => {
                TokenRejection::RoleMissing
            }
            _ => TokenRejection::InvalidToken,
        }
    }
}

/// Middleware that validates the bearer token and records its role in the
/// request's `RequestContext`.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let mut ctx = req
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_default();

    let role = authorize(&state, req.headers()).map_err(|rejection| {
        tracing::warn!(
            correlation_id = ?ctx.correlation_id,
            reason = %rejection,
            "Token rejected"
        );
        ApiError::Unauthorized(rejection.to_string())
    })?;

    ctx = ctx.with_role(role);
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<Role, TokenRejection> {
    let token = bearer_token(headers).ok_or(TokenRejection::MissingToken)?;

    let session = state.authenticator.validate_session(token).map_err(|e| {
        tracing::debug!(error = %e, "Session validation failed");
        TokenRejection::from(e)
    })?;

    let role = session
        .role
        .parse::<Role>()
        .map_err(|_| TokenRejection::RoleMissing)?;

    tracing::debug!(
        email = ?session.email,
        role = %role,
        expires_at = session.expires_at,
        "Session accepted"
    );
    Ok(role)
}

/// Token from `Authorization: Bearer <token>`, if present and non-empty.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(authorization: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(authorization));
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("bearer abc")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_jwt_errors_classified() {
        assert_eq!(
            TokenRejection::from(auth::JwtError::TokenExpired),
            TokenRejection::TokenExpired
        );
        assert_eq!(
            TokenRejection::from(auth::JwtError::MissingClaim("role".to_string())),
            TokenRejection::RoleMissing
        );
        assert_eq!(
            TokenRejection::from(auth::JwtError::MissingClaim("exp".to_string())),
            TokenRejection::InvalidToken
        );
        assert_eq!(
            TokenRejection::from(auth::JwtError::InvalidAlgorithm),
            TokenRejection::InvalidToken
        );
        assert_eq!(
            TokenRejection::from(auth::JwtError::MissingSecret),
            TokenRejection::InvalidToken
        );
    }

    #[test]
    fn test_rejection_messages() {
        assert_eq!(TokenRejection::MissingToken.to_string(), "missing token");
        assert_eq!(TokenRejection::InvalidToken.to_string(), "invalid token");
        assert_eq!(TokenRejection::TokenExpired.to_string(), "token expired");
        assert_eq!(TokenRejection::RoleMissing.to_string(), "role missing");
    }
}
