use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::domain::user::models::Age;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::PhoneNumber;
use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::domain::user::models::UserName;
use crate::user::errors::AgeError;
use crate::user::errors::EmailError;
use crate::user::errors::PhoneError;
use crate::user::errors::RoleError;
use crate::user::errors::UserError;
use crate::user::errors::UserNameError;

pub mod create_user;
pub mod delete_user;
pub mod get_user;
pub mod list_users;
pub mod login;
pub mod update_user;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Error returned from handlers.
///
/// The detail string is logged only; clients see the status reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    fn detail(&self) -> &str {
        match self {
            ApiError::InternalServerError(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg) => msg,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), detail = %self.detail(), "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), detail = %self.detail(), "Request rejected");
        }

        (status, Json(ApiErrorBody::new(status))).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) | UserError::NotFoundByEmail(_) => {
                ApiError::NotFound(err.to_string())
            }
            UserError::EmailAlreadyExists(_) | UserError::PhoneAlreadyExists(_) => {
                ApiError::Conflict(err.to_string())
            }
            UserError::InvalidUserId(_)
            | UserError::InvalidName(_)
            | UserError::InvalidEmail(_)
            | UserError::InvalidPhone(_)
            | UserError::InvalidAge(_)
            | UserError::InvalidRole(_) => ApiError::BadRequest(err.to_string()),
            UserError::Password(_) | UserError::DatabaseError(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub code: u16,
    pub message: String,
}

impl ApiErrorBody {
    pub fn new(status: StatusCode) -> Self {
        Self {
            code: status.as_u16(),
            message: status.canonical_reason().unwrap_or("Error").to_string(),
        }
    }
}

/// Public representation of a user; the password hash is never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: i32,
    pub role: String,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0,
            name: user.name.as_str().to_string(),
            email: user.email.as_str().to_string(),
            phone: user.phone.as_str().to_string(),
            age: user.age.value(),
            role: user.role.as_str().to_string(),
        }
    }
}

/// Field validation failures shared by the create and update bodies.
#[derive(Debug, Clone, Error)]
enum ParseUserRequestError {
    #[error("Invalid name: {0}")]
    Name(#[from] UserNameError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid phone: {0}")]
    Phone(#[from] PhoneError),

    #[error("Invalid age: {0}")]
    Age(#[from] AgeError),

    #[error("Invalid role: {0}")]
    Role(#[from] RoleError),

    #[error("Password must not be empty")]
    EmptyPassword,
}

impl From<ParseUserRequestError> for ApiError {
    fn from(err: ParseUserRequestError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

/// Validated profile fields common to create and update.
struct UserFields {
    name: UserName,
    email: EmailAddress,
    phone: PhoneNumber,
    age: Age,
    role: Role,
}

fn parse_user_fields(
    name: String,
    email: String,
    phone: String,
    age: i64,
    role: &str,
) -> Result<UserFields, ParseUserRequestError> {
    Ok(UserFields {
        name: UserName::new(name)?,
        email: EmailAddress::new(email)?,
        phone: PhoneNumber::new(phone)?,
        age: Age::new(age)?,
        role: role.parse()?,
    })
}

fn parse_password(password: String) -> Result<String, ParseUserRequestError> {
    if password.is_empty() {
        return Err(ParseUserRequestError::EmptyPassword);
    }
    Ok(password)
}
