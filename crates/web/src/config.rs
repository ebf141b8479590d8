use anyhow::{Context, Result};

/// Default number of events buffered per WebSocket session
const DEFAULT_WS_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub api_keys: String,
    pub jwt_secret: String,
    pub ws_channel_capacity: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("PORT must be a number")?
                .parse()?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            api_keys: std::env::var("API_KEYS").unwrap_or_default(),
            jwt_secret: std::env::var("JWT_SECRET")
                .context("Cannot load JWT_SECRET env variable")?,
            ws_channel_capacity: match std::env::var("WS_CHANNEL_CAPACITY") {
                Ok(value) => value
                    .parse()
                    .context("WS_CHANNEL_CAPACITY must be a positive number")?,
                Err(_) => DEFAULT_WS_CHANNEL_CAPACITY,
            },
        })
    }
}
