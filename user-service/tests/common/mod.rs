use std::sync::Arc;

use auth::Authenticator;
use auth::JwtHandler;
use serde_json::json;
use serde_json::Value;
use user_service::context::RequestContext;
use user_service::domain::user::models::Age;
use user_service::domain::user::models::CreateUserCommand;
use user_service::domain::user::models::EmailAddress;
use user_service::domain::user::models::PhoneNumber;
use user_service::domain::user::models::Role;
use user_service::domain::user::models::UserName;
use user_service::domain::user::ports::UserServicePort;
use user_service::domain::user::service::UserService;
use user_service::inbound::http::router::create_router;
use user_service::repositories::InMemoryUserRepository;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin_pass_word!";
pub const MEMBER_EMAIL: &str = "member@example.com";
pub const MEMBER_PASSWORD: &str = "member_pass_word!";

/// Test application that spawns a real server over an in-memory store
pub struct TestApp {
    pub address: String,
    pub repository: Arc<InMemoryUserRepository>,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with_secret(TEST_SECRET).await
    }

    /// Spawn with a specific signing secret (empty disables token issuance)
    pub async fn spawn_with_secret(secret: &[u8]) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryUserRepository::new());
        let user_service = Arc::new(UserService::new(Arc::clone(&repository)));

        user_service
            .seed_admin(command("Admin User", ADMIN_EMAIL, "+10000000000", Role::Admin, ADMIN_PASSWORD))
            .await
            .expect("Failed to seed admin");
        user_service
            .create_user(
                &RequestContext::background(),
                command("Member User", MEMBER_EMAIL, "+10000000001", Role::User, MEMBER_PASSWORD),
            )
            .await
            .expect("Failed to seed member");

        let authenticator = Arc::new(Authenticator::new(secret));
        let router = create_router(user_service, authenticator);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            repository,
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::new(secret),
        }
    }

    /// Log in as the seeded admin and return the token
    pub async fn admin_token(&self) -> String {
        let response = self
            .post("/login")
            .json(&json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["token"].as_str().expect("token missing").to_string()
    }

    /// Create a user through the API
    pub async fn create_user(&self, token: &str, body: &Value) -> reqwest::Response {
        self.post_authenticated("/users", token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make PUT request
    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.put(format!("{}{}", self.address, path))
    }

    /// Helper to make DELETE request
    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.put(path).bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.delete(path).bearer_auth(token)
    }
}

/// A valid create/update body with the given email and phone
pub fn user_body(email: &str, phone: &str) -> Value {
    json!({
        "name": "Ada Lovelace",
        "email": email,
        "phone": phone,
        "age": 36,
        "role": "user",
        "password": "pass_word!"
    })
}

fn command(name: &str, email: &str, phone: &str, role: Role, password: &str) -> CreateUserCommand {
    CreateUserCommand {
        name: UserName::new(name.to_string()).unwrap(),
        email: EmailAddress::new(email.to_string()).unwrap(),
        phone: PhoneNumber::new(phone.to_string()).unwrap(),
        age: Age::new(30).unwrap(),
        role,
        password: password.to_string(),
    }
}
