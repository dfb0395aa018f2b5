use std::fmt;
use std::str::FromStr;

use crate::user::errors::AgeError;
use crate::user::errors::EmailError;
use crate::user::errors::PhoneError;
use crate::user::errors::RoleError;
use crate::user::errors::UserIdError;
use crate::user::errors::UserNameError;

/// User aggregate entity.
///
/// `password_hash` is an Argon2 PHC string and never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: UserName,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
    pub age: Age,
    pub role: Role,
    pub password_hash: String,
}

/// User fields before the store has assigned an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: UserName,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
    pub age: Age,
    pub role: Role,
    pub password_hash: String,
}

impl NewUser {
    /// Attach the id the store assigned.
    pub fn with_id(self, id: UserId) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            age: self.age,
            role: self.role,
            password_hash: self.password_hash,
        }
    }
}

/// Store-assigned user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

impl UserId {
    /// Parse a user ID from a path segment.
    ///
    /// # Errors
    /// * `InvalidFormat` - Not a positive integer
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        match s.parse::<i64>() {
            Ok(id) if id > 0 => Ok(UserId(id)),
            Ok(id) => Err(UserIdError::InvalidFormat(format!(
                "{id} is not a positive integer"
            ))),
            Err(e) => Err(UserIdError::InvalidFormat(e.to_string())),
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name, 3-50 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 50;

    /// Create a new valid display name.
    ///
    /// Length is counted in characters, not bytes.
    ///
    /// # Errors
    /// * `TooShort` - Fewer than 3 characters
    /// * `TooLong` - More than 50 characters
    pub fn new(name: String) -> Result<Self, UserNameError> {
        let length = name.chars().count();
        if length < Self::MIN_LENGTH {
            Err(UserNameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(UserNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser. Stored as
/// submitted; comparisons for uniqueness and lookup ignore case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lower-cased form used as the uniqueness key.
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }

    /// Case-insensitive equality, matching the store's unique index.
    pub fn matches(&self, other: &EmailAddress) -> bool {
        self.normalized() == other.normalized()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Phone number in E.164 form: `+`, then 2-15 digits, the first non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    const MAX_DIGITS: usize = 15;

    /// # Errors
    /// * `NotE164` - Missing `+`, non-digit characters, leading zero or wrong length
    pub fn new(phone: String) -> Result<Self, PhoneError> {
        let valid = match phone.strip_prefix('+') {
            Some(digits) => {
                (2..=Self::MAX_DIGITS).contains(&digits.len())
                    && digits.chars().all(|c| c.is_ascii_digit())
                    && !digits.starts_with('0')
            }
            None => false,
        };

        if valid {
            Ok(Self(phone))
        } else {
            Err(PhoneError::NotE164(phone))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Age in whole years, 0-130 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Age(i32);

impl Age {
    const MIN: i64 = 0;
    const MAX: i64 = 130;

    /// # Errors
    /// * `OutOfRange` - Negative or above 130
    pub fn new(age: i64) -> Result<Self, AgeError> {
        if (Self::MIN..=Self::MAX).contains(&age) {
            Ok(Self(age as i32))
        } else {
            Err(AgeError::OutOfRange {
                min: Self::MIN,
                max: Self::MAX,
                actual: age,
            })
        }
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

/// Authorization role. Only `Admin` may log in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    User,
    Viewer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Viewer => "viewer",
        }
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            "viewer" => Ok(Role::Viewer),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Command to create a new user with domain types
#[derive(Debug)]
pub struct CreateUserCommand {
    pub name: UserName,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
    pub age: Age,
    pub role: Role,
    pub password: String,
}

/// Command to replace an existing user's fields.
///
/// The target id comes from the request path. `password` is optional; when
/// absent the stored hash is kept.
#[derive(Debug)]
pub struct UpdateUserCommand {
    pub name: UserName,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
    pub age: Age,
    pub role: Role,
    pub password: Option<String>,
}
