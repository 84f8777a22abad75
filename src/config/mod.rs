use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub recommendations: RecommendationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// The caller's identity arrives from an upstream authenticating proxy as
/// a user id in this header.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub identity_header: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { identity_header: "x-user-id".to_string() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RecommendationConfig {
    pub limit: i64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self { limit: 5 }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.base_url", "http://localhost:8080")?
            .set_default("database.url", "sqlite://collegehub.db")?
            .set_default("database.max_connections", 10)?
            .set_default("auth.identity_header", "x-user-id")?
            .set_default("recommendations.limit", 5)?

            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))

            // COLLEGEHUB__SERVER__PORT=9000 and so on
            .add_source(Environment::with_prefix("COLLEGEHUB").separator("__"))

            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                base_url: "http://localhost:8080".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite://collegehub.db".to_string(),
                max_connections: 10,
            },
            auth: AuthConfig::default(),
            recommendations: RecommendationConfig::default(),
        }
    }
}
