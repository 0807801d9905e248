use async_trait::async_trait;

use crate::config::Config;
use crate::error::{Result, RuntimeError};

/// Boundary to the external credential provider: "get the current access
/// token". Managed clients call this before every request; implementations
/// must return a token that is valid right now, not a cached one.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}

/// Resolves the token from a configuration key on every call, so a rotated
/// value is picked up without restarting long-lived callers.
#[derive(Debug, Clone)]
pub struct ConfigTokenProvider {
    config: Config,
    key: String,
}

impl ConfigTokenProvider {
    pub fn new(config: Config, key: impl Into<String>) -> Self {
        Self {
            config,
            key: key.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for ConfigTokenProvider {
    async fn access_token(&self) -> Result<String> {
        self.config
            .require(&self.key)
            .map(str::to_owned)
            .map_err(|_| RuntimeError::MissingConfig(self.key.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn config_provider_resolves_its_key() {
        let config = Config::from_pairs([("GOOGLE_TOKEN", "tok-123")]);
        let provider = ConfigTokenProvider::new(config, "GOOGLE_TOKEN");
        assert_eq!(provider.access_token().await.expect("token"), "tok-123");
    }

    #[tokio::test]
    async fn missing_key_is_a_config_error() {
        let provider = ConfigTokenProvider::new(Config::default(), "ABSENT");
        let err = provider.access_token().await.expect_err("missing");
        assert!(matches!(err, RuntimeError::MissingConfig(_)));
    }
}
