//! Environment-driven configuration
//!
//! Every knob has a default so the service starts with no environment at
//! all; only `OPENAI_API_KEY` is genuinely deployment-specific.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use fulfillment::OpenAiConfig;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub listen_addr: SocketAddr,
    pub provider: OpenAiConfig,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let listen_addr = env_or("GATEWAY_LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .context("Invalid GATEWAY_LISTEN_ADDR")?;

        let defaults = OpenAiConfig::default();
        let timeout_secs: u64 = env_or(
            "FULFILLMENT_TIMEOUT_SECS",
            &defaults.request_timeout.as_secs().to_string(),
        )
        .parse()
        .context("Invalid FULFILLMENT_TIMEOUT_SECS")?;

        let provider = OpenAiConfig {
            base_url: env_or("OPENAI_BASE_URL", &defaults.base_url),
            api_key: env_or("OPENAI_API_KEY", ""),
            model: env_or("OPENAI_MODEL", &defaults.model),
            request_timeout: Duration::from_secs(timeout_secs),
        };

        Ok(Self { listen_addr, provider })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_without_environment() {
        let config = GatewayConfig::from_env().unwrap();
        assert_eq!(config.listen_addr.port(), 8080);
        assert_eq!(config.provider.model, OpenAiConfig::default().model);
    }
}
