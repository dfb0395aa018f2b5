use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Process-local user store with the same uniqueness rules as the database.
///
/// Ids start at 1 and are never reused.
#[derive(Default)]
pub struct InMemoryUserRepository {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    last_id: i64,
    users: BTreeMap<UserId, User>,
}

impl State {
    /// Reject `email`/`phone` held by any user except `except`.
    fn check_unique(
        &self,
        email: &EmailAddress,
        phone: &str,
        except: Option<UserId>,
    ) -> Result<(), UserError> {
        for user in self.users.values().filter(|u| Some(u.id) != except) {
            if user.email.matches(email) {
                return Err(UserError::EmailAlreadyExists(email.to_string()));
            }
            if user.phone.as_str() == phone {
                return Err(UserError::PhoneAlreadyExists(phone.to_string()));
            }
        }
        Ok(())
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut state = self.state.write().await;
        state.check_unique(&user.email, user.phone.as_str(), None)?;

        state.last_id += 1;
        let user = user.with_id(UserId(state.last_id));
        state.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.state.read().await.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        Ok(self
            .state
            .read()
            .await
            .users
            .values()
            .find(|u| u.email.matches(email))
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        Ok(self.state.read().await.users.values().cloned().collect())
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id.to_string()));
        }
        state.check_unique(&user.email, user.phone.as_str(), Some(user.id))?;

        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        self.state
            .write()
            .await
            .users
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::models::Age;
    use crate::domain::user::models::PhoneNumber;
    use crate::domain::user::models::Role;
    use crate::domain::user::models::UserName;

    fn new_user(email: &str, phone: &str) -> NewUser {
        NewUser {
            name: UserName::new("Test User".to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            phone: PhoneNumber::new(phone.to_string()).unwrap(),
            age: Age::new(40).unwrap(),
            role: Role::User,
            password_hash: "$argon2id$hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repository = InMemoryUserRepository::new();

        let first = repository.create(new_user("a@x.com", "+15550000001")).await.unwrap();
        let second = repository.create(new_user("b@x.com", "+15550000002")).await.unwrap();

        assert_eq!(first.id, UserId(1));
        assert_eq!(second.id, UserId(2));
        assert_eq!(repository.len().await, 2);
    }

    #[tokio::test]
    async fn test_email_unique_ignoring_case() {
        let repository = InMemoryUserRepository::new();
        repository.create(new_user("a@x.com", "+15550000001")).await.unwrap();

        let result = repository.create(new_user("A@X.COM", "+15550000002")).await;
        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
        assert_eq!(repository.len().await, 1);

        let lookup = EmailAddress::new("A@x.Com".to_string()).unwrap();
        let found = repository.find_by_email(&lookup).await.unwrap().unwrap();
        assert_eq!(found.email.as_str(), "a@x.com");
    }

    #[tokio::test]
    async fn test_phone_unique() {
        let repository = InMemoryUserRepository::new();
        repository.create(new_user("a@x.com", "+15550000001")).await.unwrap();

        let result = repository.create(new_user("b@x.com", "+15550000001")).await;
        assert!(matches!(result, Err(UserError::PhoneAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_update_checks_other_users_only() {
        let repository = InMemoryUserRepository::new();
        let a = repository.create(new_user("a@x.com", "+15550000001")).await.unwrap();
        repository.create(new_user("b@x.com", "+15550000002")).await.unwrap();

        let mut renamed = a.clone();
        renamed.name = UserName::new("Renamed".to_string()).unwrap();
        assert!(repository.update(renamed).await.is_ok());

        let mut stolen = a.clone();
        stolen.email = EmailAddress::new("b@x.com".to_string()).unwrap();
        assert!(matches!(
            repository.update(stolen).await,
            Err(UserError::EmailAlreadyExists(_))
        ));

        let mut ghost = a;
        ghost.id = UserId(99);
        assert!(matches!(
            repository.update(ghost).await,
            Err(UserError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_is_permanent() {
        let repository = InMemoryUserRepository::new();
        let user = repository.create(new_user("a@x.com", "+15550000001")).await.unwrap();

        repository.delete(&user.id).await.unwrap();
        assert!(repository.is_empty().await);
        assert!(repository.find_by_id(&user.id).await.unwrap().is_none());
        assert!(matches!(
            repository.delete(&user.id).await,
            Err(UserError::NotFound(_))
        ));

        // Ids are not reused after deletion
        let next = repository.create(new_user("a@x.com", "+15550000001")).await.unwrap();
        assert_eq!(next.id, UserId(2));
    }
}
