use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::context::RequestContext;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: auth::PasswordHasher,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service over the given store.
    pub fn new(repository: Arc<UR>) -> Self {
        Self {
            repository,
            password_hasher: auth::PasswordHasher::new(),
        }
    }

    /// Fail with `EmailAlreadyExists` if `email` belongs to a user other than `owner`.
    async fn ensure_email_available(
        &self,
        ctx: &RequestContext,
        email: &EmailAddress,
        owner: Option<&UserId>,
    ) -> Result<(), UserError> {
        match self.repository.find_by_email(email).await? {
            Some(existing) if Some(&existing.id) != owner => {
                tracing::warn!(
                    correlation_id = ?ctx.correlation_id,
                    existing_user_id = %existing.id,
                    "Email already in use"
                );
                Err(UserError::EmailAlreadyExists(email.to_string()))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn create_user(
        &self,
        ctx: &RequestContext,
        command: CreateUserCommand,
    ) -> Result<User, UserError> {
        self.ensure_email_available(ctx, &command.email, None).await?;

        let password_hash = self.password_hasher.hash(&command.password)?;

        let user = NewUser {
            name: command.name,
            email: command.email,
            phone: command.phone,
            age: command.age,
            role: command.role,
            password_hash,
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(
            correlation_id = ?ctx.correlation_id,
            user_id = %created_user.id,
            role = %created_user.role,
            "User created"
        );

        Ok(created_user)
    }

    async fn list_users(&self, ctx: &RequestContext) -> Result<Vec<User>, UserError> {
        let users = self.repository.list_all().await?;
        tracing::debug!(correlation_id = ?ctx.correlation_id, count = users.len(), "Users listed");
        Ok(users)
    }

    async fn get_user(&self, _ctx: &RequestContext, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn get_user_by_email(
        &self,
        _ctx: &RequestContext,
        email: &EmailAddress,
    ) -> Result<User, UserError> {
        self.repository
            .find_by_email(email)
            .await?
            .ok_or(UserError::NotFoundByEmail(email.to_string()))
    }

    async fn update_user(
        &self,
        ctx: &RequestContext,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let existing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        self.ensure_email_available(ctx, &command.email, Some(id)).await?;

        let password_hash = match command.password {
            Some(new_password) => self.password_hasher.hash(&new_password)?,
            None => existing.password_hash,
        };

        let user = User {
            id: *id,
            name: command.name,
            email: command.email,
            phone: command.phone,
            age: command.age,
            role: command.role,
            password_hash,
        };

        let updated_user = self.repository.update(user).await?;
        tracing::info!(
            correlation_id = ?ctx.correlation_id,
            user_id = %updated_user.id,
            "User updated"
        );

        Ok(updated_user)
    }

    async fn delete_user(&self, ctx: &RequestContext, id: &UserId) -> Result<(), UserError> {
        if self.repository.find_by_id(id).await?.is_none() {
            return Err(UserError::NotFound(id.to_string()));
        }

        self.repository.delete(id).await?;
        tracing::info!(correlation_id = ?ctx.correlation_id, user_id = %id, "User deleted");

        Ok(())
    }

    async fn seed_admin(&self, command: CreateUserCommand) -> Result<bool, UserError> {
        let ctx = RequestContext::background();

        if self.repository.find_by_email(&command.email).await?.is_some() {
            return Ok(false);
        }

        match self.create_user(&ctx, command).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "Bootstrap admin created");
                Ok(true)
            }
            // Another instance seeded it between the lookup and the insert
            Err(UserError::EmailAlreadyExists(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
