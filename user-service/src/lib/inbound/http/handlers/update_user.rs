use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
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
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::ports::UserServicePort;

/// HTTP request body for replacing a user (raw JSON).
///
/// Unknown fields such as `id` are ignored; the path decides the target.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    name: String,
    email: String,
    phone: String,
    age: i64,
    role: String,
    password: Option<String>,
}

impl UpdateUserRequest {
    fn try_into_command(self) -> Result<UpdateUserCommand, ParseUserRequestError> {
        let fields = parse_user_fields(self.name, self.email, self.phone, self.age, &self.role)?;
        Ok(UpdateUserCommand {
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
            age: fields.age,
            role: fields.role,
            password: self.password.map(parse_password).transpose()?,
        })
    }
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let user_id = UserId::from_string(&id).map_err(UserError::from)?;
    let Json(req) = body?;
    let command = req.try_into_command()?;

    state
        .user_service
        .update_user(&ctx, &user_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}
