use anyhow::{Error, Result, anyhow};
use dotenvy::dotenv;
use serde::Deserialize;

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    pub docstore_url: String,
    pub docstore_username: String,
    pub docstore_password: String,

    #[serde(default = "default_language")]
    pub default_language: String,

    #[serde(default = "default_batch_size")]
    pub default_batch_size: u32,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        dotenv().ok();

        let config = envy::from_env::<Self>()
            .map_err(|_| anyhow!("Invalid or missing environmental variable"))?;
        Ok(config)
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_batch_size() -> u32 {
    30
}

fn default_request_timeout() -> u64 {
    10
}
