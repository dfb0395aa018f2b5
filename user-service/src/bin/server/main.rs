use std::path::Path;
use std::sync::Arc;

use auth::Authenticator;
use user_service::config::BootstrapConfig;
use user_service::config::Config;
use user_service::config::DEFAULT_ADMIN_PASSWORD;
use user_service::domain::user::models::Age;
use user_service::domain::user::models::CreateUserCommand;
use user_service::domain::user::models::EmailAddress;
use user_service::domain::user::models::PhoneNumber;
use user_service::domain::user::models::Role;
use user_service::domain::user::models::UserName;
use user_service::domain::user::ports::UserServicePort;
use user_service::domain::user::service::UserService;
use user_service::inbound::http::router::create_router;
use user_service::outbound::database;
use user_service::outbound::repositories::PostgresUserRepository;
use user_service::telemetry;

const BOOTSTRAP_ADMIN_AGE: i64 = 30;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::load()?;

    let _log_guard = telemetry::init(config.is_dev(), Path::new(telemetry::LOG_DIRECTORY))?;

    tracing::info!(
        service = "user-service",
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        "Service starting"
    );
    tracing::info!(
        database_host = %config.database.host,
        database_port = config.database.port,
        database_name = %config.database.name,
        http_port = config.server.port,
        "Configuration loaded"
    );

    let pg_pool = database::bootstrap(&config.database).await?;

    let authenticator = Arc::new(Authenticator::new(config.jwt.secret.as_bytes()));
    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool));
    let user_service = Arc::new(UserService::new(user_repository));

    seed_admin(user_service.as_ref(), &config.bootstrap).await?;

    let http_address = format!("0.0.0.0:{}", config.server.port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user_service, authenticator);
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited");
    Ok(())
}

async fn seed_admin(
    user_service: &dyn UserServicePort,
    bootstrap: &BootstrapConfig,
) -> Result<(), anyhow::Error> {
    if bootstrap.admin_password == DEFAULT_ADMIN_PASSWORD {
        tracing::warn!(
            email = %bootstrap.admin_email,
            "Bootstrap admin uses the default password; set BOOTSTRAP__ADMIN_PASSWORD"
        );
    }

    let command = CreateUserCommand {
        name: UserName::new(bootstrap.admin_name.clone())?,
        email: EmailAddress::new(bootstrap.admin_email.clone())?,
        phone: PhoneNumber::new(bootstrap.admin_phone.clone())?,
        age: Age::new(BOOTSTRAP_ADMIN_AGE)?,
        role: Role::Admin,
        password: bootstrap.admin_password.clone(),
    };

    if !user_service.seed_admin(command).await? {
        tracing::info!(email = %bootstrap.admin_email, "Bootstrap admin already present");
    }

    Ok(())
}
