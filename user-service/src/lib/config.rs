use std::env;
use std::path::Path;

use config::builder::DefaultState;
use config::Config as ConfigBuilder;
use config::ConfigBuilder as Builder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

pub const DEFAULT_ENVIRONMENT: &str = "dev";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
pub const DOTENV_FILE: &str = ".env";

const SUPPORTED_DRIVER: &str = "postgres";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub environment: String,
    pub bootstrap: BootstrapConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub driver: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
}

/// Account created at startup when no user holds `admin_email`.
#[derive(Debug, Deserialize, Clone)]
pub struct BootstrapConfig {
    pub admin_name: String,
    pub admin_email: String,
    pub admin_phone: String,
    pub admin_password: String,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__HOST, JWT__SECRET, etc.), including
    ///    those read from `.env` in the working directory
    /// 2. Environment-specific config file (config/{ENVIRONMENT}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        load_dotenv(Path::new(DOTENV_FILE));

        let environment =
            env::var("ENVIRONMENT").unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string());

        let builder = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Example: DATABASE__HOST=db overrides database.host
            .add_source(Environment::default().separator("__"));

        Self::from_builder(builder)
    }

    /// Apply defaults, deserialize and validate.
    pub fn from_builder(builder: Builder<DefaultState>) -> Result<Self, ConfigError> {
        let config: Config = builder
            .set_default("environment", DEFAULT_ENVIRONMENT)?
            .set_default("bootstrap.admin_name", "Admin User")?
            .set_default("bootstrap.admin_email", "admin@example.com")?
            .set_default("bootstrap.admin_phone", "+10000000000")?
            .set_default("bootstrap.admin_password", DEFAULT_ADMIN_PASSWORD)?
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::Message(
                "jwt.secret must not be empty".to_string(),
            ));
        }
        if self.database.driver != SUPPORTED_DRIVER {
            return Err(ConfigError::Message(format!(
                "unsupported database.driver '{}' (expected '{}')",
                self.database.driver, SUPPORTED_DRIVER
            )));
        }
        Ok(())
    }

    pub fn is_dev(&self) -> bool {
        self.environment == DEFAULT_ENVIRONMENT
    }
}

/// Export variables from a dotenv file; variables already set are kept.
///
/// Returns whether the file was read. A missing file is not an error.
fn load_dotenv(path: &Path) -> bool {
    dotenvy::from_path(path).is_ok()
}

impl DatabaseConfig {
    /// Connection options for the configured database.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> Builder<DefaultState> {
        ConfigBuilder::builder()
            .set_override("database.driver", "postgres")
            .unwrap()
            .set_override("database.host", "localhost")
            .unwrap()
            .set_override("database.port", 5432)
            .unwrap()
            .set_override("database.user", "postgres")
            .unwrap()
            .set_override("database.password", "postgres")
            .unwrap()
            .set_override("database.name", "users")
            .unwrap()
            .set_override("server.port", 8080)
            .unwrap()
            .set_override("jwt.secret", "test_secret")
            .unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_builder(complete()).unwrap();

        assert_eq!(config.environment, "dev");
        assert!(config.is_dev());
        assert_eq!(config.bootstrap.admin_email, "admin@example.com");
        assert_eq!(config.bootstrap.admin_password, DEFAULT_ADMIN_PASSWORD);
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_overrides_win_over_defaults() {
        let builder = complete()
            .set_override("environment", "production")
            .unwrap()
            .set_override("bootstrap.admin_email", "root@corp.example")
            .unwrap();

        let config = Config::from_builder(builder).unwrap();
        assert!(!config.is_dev());
        assert_eq!(config.bootstrap.admin_email, "root@corp.example");
    }

    #[test]
    fn test_empty_secret_rejected() {
        let builder = complete().set_override("jwt.secret", "").unwrap();

        let err = Config::from_builder(builder).unwrap_err();
        assert!(err.to_string().contains("jwt.secret"));
    }

    #[test]
    fn test_missing_secret_rejected() {
        let builder = ConfigBuilder::builder()
            .set_override("database.driver", "postgres")
            .unwrap()
            .set_override("database.host", "localhost")
            .unwrap()
            .set_override("database.port", 5432)
            .unwrap()
            .set_override("database.user", "postgres")
            .unwrap()
            .set_override("database.password", "postgres")
            .unwrap()
            .set_override("database.name", "users")
            .unwrap()
            .set_override("server.port", 8080)
            .unwrap();

        assert!(Config::from_builder(builder).is_err());
    }

    #[test]
    fn test_dotenv_file_exported_without_overriding() {
        let directory = env::temp_dir().join(format!("user-service-env-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&directory).unwrap();
        let path = directory.join(DOTENV_FILE);
        std::fs::write(
            &path,
            "USER_SERVICE_TEST_DOTENV_NEW=from_file\nUSER_SERVICE_TEST_DOTENV_SET=from_file\n",
        )
        .unwrap();
        env::set_var("USER_SERVICE_TEST_DOTENV_SET", "from_process");

        assert!(load_dotenv(&path));
        assert_eq!(env::var("USER_SERVICE_TEST_DOTENV_NEW").unwrap(), "from_file");
        assert_eq!(env::var("USER_SERVICE_TEST_DOTENV_SET").unwrap(), "from_process");

        assert!(!load_dotenv(&directory.join("missing.env")));
        std::fs::remove_dir_all(directory).unwrap();
    }

    #[test]
    fn test_unsupported_driver_rejected() {
        let builder = complete().set_override("database.driver", "mysql").unwrap();

        let err = Config::from_builder(builder).unwrap_err();
        assert!(err.to_string().contains("mysql"));
    }
}
