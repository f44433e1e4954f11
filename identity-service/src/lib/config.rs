use std::env;
use std::fmt;

use auth::Authenticator;
use auth::HashCost;
use auth::PasswordHasher;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::account::models::RegistrationPolicy;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordConfig,
    #[serde(default)]
    pub accounts: AccountsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { http_port: 8080 }
    }
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "JwtConfig::default_expiration_hours")]
    pub expiration_hours: i64,
}

impl JwtConfig {
    const MIN_SECRET_BYTES: usize = 32;
    const MAX_EXPIRATION_HOURS: i64 = 24 * 365;

    fn default_expiration_hours() -> i64 {
        Authenticator::DEFAULT_TOKEN_TTL_HOURS
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

/// Argon2id work factor
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_cost_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        let cost = HashCost::default();
        Self {
            memory_cost_kib: cost.memory_kib,
            iterations: cost.iterations,
            parallelism: cost.parallelism,
        }
    }
}

impl From<&PasswordConfig> for HashCost {
    fn from(config: &PasswordConfig) -> Self {
        HashCost {
            memory_kib: config.memory_cost_kib,
            iterations: config.iterations,
            parallelism: config.parallelism,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AccountsConfig {
    pub require_email: bool,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            require_email: true,
        }
    }
}

impl From<&AccountsConfig> for RegistrationPolicy {
    fn from(config: &AccountsConfig) -> Self {
        RegistrationPolicy {
            require_email: config.require_email,
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, DATABASE__URL, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// # Errors
    /// Fails when the signing secret is missing or too short, the token
    /// lifetime is out of range, or any source cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::from_source(configuration)
    }

    /// Deserialize and validate an already assembled configuration.
    pub fn from_source(configuration: ConfigBuilder) -> Result<Self, ConfigError> {
        let config: Config = configuration.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.len() < JwtConfig::MIN_SECRET_BYTES {
            return Err(ConfigError::Message(format!(
                "jwt.secret must be at least {} bytes",
                JwtConfig::MIN_SECRET_BYTES
            )));
        }

        if !(1..=JwtConfig::MAX_EXPIRATION_HOURS).contains(&self.jwt.expiration_hours) {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_hours must be between 1 and {}",
                JwtConfig::MAX_EXPIRATION_HOURS
            )));
        }

        Ok(())
    }

    /// Build the process-wide authenticator from the jwt and password sections.
    ///
    /// # Errors
    /// Fails when the password cost is outside the range Argon2 accepts.
    pub fn authenticator(&self) -> Result<Authenticator, ConfigError> {
        let password_hasher = PasswordHasher::with_cost(HashCost::from(&self.password))
            .map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(Authenticator::new(self.jwt.secret.as_bytes())
            .with_password_hasher(password_hasher)
            .with_token_ttl(chrono::Duration::hours(self.jwt.expiration_hours)))
    }

    /// Registration rules for this deployment.
    pub fn registration_policy(&self) -> RegistrationPolicy {
        RegistrationPolicy::from(&self.accounts)
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    const SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";

    fn from_toml(toml: &str) -> Result<Config, ConfigError> {
        let configuration = ConfigBuilder::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Config::from_source(configuration)
    }

    #[test]
    fn test_minimal_configuration_uses_defaults() {
        let config = from_toml(&format!("[jwt]\nsecret = \"{}\"\n", SECRET)).unwrap();

        assert!(config.database.is_none());
        assert_eq!(config.server.http_port, 8080);
        assert_eq!(config.jwt.expiration_hours, 12);
        assert_eq!(HashCost::from(&config.password), HashCost::default());
        assert!(config.accounts.require_email);
    }

    #[test]
    fn test_full_configuration() {
        let config = from_toml(&format!(
            r#"
            [database]
            url = "postgres://localhost/identity"

            [server]
            http_port = 3000

            [jwt]
            secret = "{}"
            expiration_hours = 1

            [password]
            memory_cost_kib = 1024
            iterations = 1
            parallelism = 1

            [accounts]
            require_email = false
            "#,
            SECRET
        ))
        .unwrap();

        assert_eq!(
            config.database.as_ref().map(|d| d.url.as_str()),
            Some("postgres://localhost/identity")
        );
        assert_eq!(config.server.http_port, 3000);
        assert!(!config.registration_policy().require_email);

        let authenticator = config.authenticator().unwrap();
        assert_eq!(authenticator.token_ttl(), chrono::Duration::hours(1));
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        assert!(from_toml("[server]\nhttp_port = 3000\n").is_err());
    }

    #[test]
    fn test_short_secret_is_fatal() {
        let err = from_toml("[jwt]\nsecret = \"too-short\"\n").unwrap_err();
        assert!(err.to_string().contains("at least 32 bytes"));
        assert!(!err.to_string().contains("too-short"));
    }

    #[test]
    fn test_non_positive_ttl_is_fatal() {
        let err = from_toml(&format!(
            "[jwt]\nsecret = \"{}\"\nexpiration_hours = 0\n",
            SECRET
        ))
        .unwrap_err();
        assert!(err.to_string().contains("expiration_hours"));
    }

    #[test]
    fn test_invalid_password_cost_is_fatal() {
        let config = from_toml(&format!(
            "[jwt]\nsecret = \"{}\"\n[password]\nmemory_cost_kib = 1024\niterations = 0\nparallelism = 1\n",
            SECRET
        ))
        .unwrap();

        assert!(config.authenticator().is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = from_toml(&format!("[jwt]\nsecret = \"{}\"\n", SECRET)).unwrap();
        assert!(!format!("{:?}", config).contains(SECRET));
    }
}
