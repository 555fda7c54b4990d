use std::env;
use std::path::PathBuf;

use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub cors_extra_origins: Vec<String>,

    // Published lunar productivity feed
    pub feed_path: Option<PathBuf>,
    pub feed_start: NaiveDate,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()
                .map_err(|e| anyhow::anyhow!("PORT must be a number: {e}"))?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            cors_extra_origins: env::var("CORS_EXTRA_ORIGINS")
                .map(|extra| {
                    extra
                        .split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),

            feed_path: env::var("LUNAR_FEED_PATH")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            feed_start: match env::var("LUNAR_FEED_START") {
                Ok(raw) => raw
                    .parse()
                    .map_err(|e| anyhow::anyhow!("LUNAR_FEED_START must be YYYY-MM-DD: {e}"))?,
                Err(_) => default_feed_start(),
            },
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            frontend_url: "http://localhost:3000".into(),
            cors_extra_origins: Vec::new(),
            feed_path: None,
            feed_start: default_feed_start(),
        }
    }
}

/// New moon of 2024-03-10, where the bundled feed begins.
fn default_feed_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 10).unwrap_or_default()
}
