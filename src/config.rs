// src/config.rs
use std::net::{IpAddr, SocketAddr};

pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub supabase_url: Option<String>,
    pub supabase_service_key: String,
    pub jwt_secret: Option<String>,
    pub bind_addr: SocketAddr,
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Box<dyn std::error::Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host: IpAddr = var("HOST")
            .unwrap_or_else(|| DEFAULT_HOST.to_string())
            .parse()
            .map_err(|e| format!("invalid HOST: {}", e))?;
        let port: u16 = match var("PORT") {
            Some(p) => p.parse().map_err(|e| format!("invalid PORT: {}", e))?,
            None => DEFAULT_PORT,
        };

        Ok(Config {
            openai_api_key: var("OPENAI_API_KEY"),
            openai_model: var("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            openai_base_url: var("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            supabase_url: var("SUPABASE_URL"),
            supabase_service_key: var("SUPABASE_SERVICE_KEY").unwrap_or_default(),
            jwt_secret: var("JWT_SECRET"),
            bind_addr: SocketAddr::new(host, port),
        })
    }
}
