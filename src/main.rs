// src/main.rs
mod analysis;
mod api;
mod auth;
mod completion;
mod config;
mod error;
mod investments;
mod models;
mod prompt;
mod store;

use crate::completion::{CompletionProvider, OpenAiClient};
use crate::config::Config;
use env_logger::{Builder, Env};
use log::{error, info};
use std::sync::Arc;
use warp::Filter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return;
        }
    };

    info!("Starting the stock insight service...");

    // Built once and shared by every request.
    let provider: Arc<dyn CompletionProvider> = Arc::new(OpenAiClient::new(&config));
    let store = store::connect(&config);
    let jwt_secret = config.jwt_secret.clone().map(Arc::new);

    // In production, replace the wildcard origin with the known frontends.
    let cors = warp::cors()
        .allow_any_origin()
        .allow_credentials(true)
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allow_headers(vec![
            "accept",
            "authorization",
            "content-type",
            "origin",
            "x-requested-with",
        ]);

    let api = api::routes(provider, store, jwt_secret)
        .with(cors)
        .with(warp::log("stock_insight"));

    info!("Server running on http://{}", config.bind_addr);
    warp::serve(api).run(config.bind_addr).await;
}
