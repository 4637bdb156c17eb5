use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub wallet: WalletConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Smallest allowed peer-to-peer transfer, in NAD cents.
    #[serde(default = "default_min_transfer_cents")]
    pub min_transfer_cents: i64,
    /// Platform share of every transfer, as a whole percentage.
    #[serde(default = "default_transfer_fee_percent")]
    pub transfer_fee_percent: i64,
}

fn default_min_transfer_cents() -> i64 {
    500
}

fn default_transfer_fee_percent() -> i64 {
    5
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            min_transfer_cents: default_min_transfer_cents(),
            transfer_fee_percent: default_transfer_fee_percent(),
        }
    }
}

impl Config {
    pub fn from_toml() -> anyhow::Result<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                // Config file present: parse it, then let environment variables override.
                toml::from_str(&config_str)
                    .with_context(|| format!("failed to parse config file {config_path}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // No config file: build entirely from environment variables and defaults.
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                let database_url = get_env("DATABASE_URL").context(
                    "DATABASE_URL is not set and no config.toml config file was found",
                )?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    wallet: WalletConfig {
                        min_transfer_cents: get_env_parse(
                            "MIN_TRANSFER_CENTS",
                            default_min_transfer_cents(),
                        ),
                        transfer_fee_percent: get_env_parse(
                            "TRANSFER_FEE_PERCENT",
                            default_transfer_fee_percent(),
                        ),
                    },
                }
            }
            Err(e) => {
                return Err(anyhow::Error::from(e))
                    .with_context(|| format!("failed to read config file {config_path}"));
            }
        };

        // Environment variables win even when the file exists.
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            config.database.max_connections = mc;
        }
        if let Ok(v) = env::var("MIN_TRANSFER_CENTS")
            && let Ok(n) = v.parse()
        {
            config.wallet.min_transfer_cents = n;
        }
        if let Ok(v) = env::var("TRANSFER_FEE_PERCENT")
            && let Ok(n) = v.parse()
        {
            config.wallet.transfer_fee_percent = n;
        }

        Ok(config)
    }
}
