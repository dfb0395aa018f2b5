use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::context::RequestContext;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Role;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Exchange admin credentials for a session token.
///
/// Unknown email and wrong password produce the same response.
pub async fn login(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    body: Result<Json<LoginRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let Json(body) = body?;

    let email = EmailAddress::new(body.email).map_err(|_| {
        tracing::warn!(correlation_id = ?ctx.correlation_id, "Login with malformed email");
        unknown_identity(&state, &body.password)
    })?;

    let user = state
        .user_service
        .get_user_by_email(&ctx, &email)
        .await
        .map_err(|e| match e {
            UserError::NotFoundByEmail(_) => {
                tracing::warn!(correlation_id = ?ctx.correlation_id, "Login for unknown email");
                unknown_identity(&state, &body.password)
            }
            _ => ApiError::from(e),
        })?;

    state
        .authenticator
        .verify_credentials(&body.password, &user.password_hash)
        .map_err(|e| match e {
            auth::AuthenticationError::InvalidCredentials => {
                tracing::warn!(
                    correlation_id = ?ctx.correlation_id,
                    user_id = %user.id,
                    "Login with wrong password"
                );
                ApiError::Unauthorized(INVALID_CREDENTIALS.to_string())
            }
            other => {
                ApiError::InternalServerError(format!("Password verification failed: {}", other))
            }
        })?;

    if user.role != Role::Admin {
        return Err(ApiError::Forbidden(format!(
            "User {} with role {} may not log in",
            user.id, user.role
        )));
    }

    let token = state
        .authenticator
        .issue_token(user.email.as_str(), user.role.as_str())
        .map_err(|e| ApiError::InternalServerError(format!("Token generation failed: {}", e)))?;

    tracing::info!(correlation_id = ?ctx.correlation_id, user_id = %user.id, "Admin logged in");

    Ok(ApiSuccess::new(StatusCode::OK, LoginResponseData { token }))
}

/// 401 for a login with no matching account, after the same password work
/// as a real one.
fn unknown_identity(state: &AppState, password: &str) -> ApiError {
    let err = state.authenticator.reject_unknown(password);
    ApiError::Unauthorized(format!("{}: {}", INVALID_CREDENTIALS, err))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
}
