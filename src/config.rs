use anyhow::{Context, Result};
use std::env;

use crate::translator::Environment;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub environment: Environment,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Ok(Config {
            server: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("API_PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .context("API_PORT must be a valid port number")?,
            },
            environment: env::var("APP_ENV")
                .unwrap_or_else(|_| "development".to_string())
                .parse()
                .context("APP_ENV must be production, development or testing")?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_address() {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            environment: Environment::Testing,
        };

        assert_eq!(config.server_address(), "127.0.0.1:3000");
    }
}
