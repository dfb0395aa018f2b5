use async_trait::async_trait;

use crate::domain::context::RequestContext;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered (checked before any write)
    /// * `PhoneAlreadyExists` - Phone is already registered
    /// * `Password` - Hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn create_user(
        &self,
        ctx: &RequestContext,
        command: CreateUserCommand,
    ) -> Result<User, UserError>;

    /// Retrieve every user, ordered by id.
    async fn list_users(&self, ctx: &RequestContext) -> Result<Vec<User>, UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_user(&self, ctx: &RequestContext, id: &UserId) -> Result<User, UserError>;

    /// Retrieve user by email, ignoring case.
    ///
    /// # Errors
    /// * `NotFoundByEmail` - No user with this email
    /// * `DatabaseError` - Database operation failed
    async fn get_user_by_email(
        &self,
        ctx: &RequestContext,
        email: &EmailAddress,
    ) -> Result<User, UserError>;

    /// Replace an existing user's fields; the id is always `id`.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `EmailAlreadyExists` - Email belongs to another user
    /// * `PhoneAlreadyExists` - Phone belongs to another user
    /// * `DatabaseError` - Database operation failed
    async fn update_user(
        &self,
        ctx: &RequestContext,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError>;

    /// Permanently delete a user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete_user(&self, ctx: &RequestContext, id: &UserId) -> Result<(), UserError>;

    /// Create the bootstrap admin unless a user with its email exists.
    ///
    /// # Returns
    /// `true` when a user was created
    async fn seed_admin(&self, command: CreateUserCommand) -> Result<bool, UserError>;
}

/// Persistence operations for user aggregate.
///
/// Implementations enforce email (case-insensitive) and phone uniqueness
/// themselves; the service pre-check is only an early reject.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user and assign its id.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `PhoneAlreadyExists` - Phone is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: NewUser) -> Result<User, UserError>;

    /// Retrieve user by identifier; `None` if absent.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by email, ignoring case; `None` if absent.
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;

    /// Retrieve all users ordered by id.
    async fn list_all(&self) -> Result<Vec<User>, UserError>;

    /// Overwrite the stored user with the same id.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `EmailAlreadyExists` - Email belongs to another user
    /// * `PhoneAlreadyExists` - Phone belongs to another user
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, user: User) -> Result<User, UserError>;

    /// Remove user from storage.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &UserId) -> Result<(), UserError>;
}
