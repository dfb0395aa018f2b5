use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::parse_password;
use super::parse_user_fields;
use super::ApiError;
use super::ApiSuccess;
use super::ParseUserRequestError;
use super::UserData;
use crate::domain::context::RequestContext;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

pub async fn create_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let Json(body) = body?;

    state
        .user_service
        .create_user(&ctx, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

/// HTTP request body for creating a user (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateUserRequest {
    name: String,
    email: String,
    phone: String,
    age: i64,
    role: String,
    password: String,
}

impl CreateUserRequest {
    fn try_into_command(self) -> Result<CreateUserCommand, ParseUserRequestError> {
        let fields = parse_user_fields(self.name, self.email, self.phone, self.age, &self.role)?;
        Ok(CreateUserCommand {
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
            age: fields.age,
            role: fields.role,
            password: parse_password(self.password)?,
        })
    }
}
