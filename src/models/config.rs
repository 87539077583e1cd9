use serde::Deserialize;

use crate::auth::AuthConfig;

/// Configuration options for the Vitrine service, loaded from an optional
/// `vitrine.yaml` next to the binary and `VITRINE_*` environment variables
/// (the environment wins).
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub database_url: String,
    /// Secret used to sign JWTs; the only setting without a default.
    pub jwt_secret: String,
    pub access_token_ttl_minutes: i64,
    pub refresh_token_ttl_days: i64,
    /// Serve uploaded images from `media_root` under `media_url`.
    /// Development convenience only.
    pub serve_media: bool,
    pub media_root: String,
    pub media_url: String,
}

impl ServerConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("bind_address", "127.0.0.1:8080")?
            .set_default("database_url", "vitrine.db")?
            .set_default("access_token_ttl_minutes", 15)?
            .set_default("refresh_token_ttl_days", 7)?
            .set_default("serve_media", false)?
            .set_default("media_root", "media")?
            .set_default("media_url", "/media")?
            .add_source(config::File::with_name("vitrine").required(false))
            .add_source(config::Environment::with_prefix("VITRINE"))
            .build()?
            .try_deserialize()
    }

    /// The slice of the configuration the token layer needs.
    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            jwt_secret: self.jwt_secret.clone(),
            access_token_ttl_minutes: self.access_token_ttl_minutes,
            refresh_token_ttl_days: self.refresh_token_ttl_days,
        }
    }
}
