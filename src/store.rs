// src/store.rs
use crate::config::Config;
use crate::error::ServiceError;
use crate::models::Investment;
use async_trait::async_trait;
use log::{info, warn};
use reqwest::{Client, Method, RequestBuilder, Response};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[async_trait]
pub trait InvestmentStore: Send + Sync {
    async fn insert(&self, investment: Investment) -> Result<Investment, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<Investment>, ServiceError>;
    /// Oldest first.
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Investment>, ServiceError>;
    async fn replace(&self, investment: Investment) -> Result<Investment, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<(), ServiceError>;
}

/// Builds the store once at startup. The hosted data store is used when
/// `SUPABASE_URL` is configured.
pub fn connect(config: &Config) -> Arc<dyn InvestmentStore> {
    match &config.supabase_url {
        Some(url) => {
            info!("Using Supabase investment store at {}", url);
            Arc::new(SupabaseStore::new(url, &config.supabase_service_key))
        }
        None => {
            warn!("SUPABASE_URL is not set; investments are kept in memory.");
            Arc::new(InMemoryStore::new())
        }
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    investments: RwLock<HashMap<Uuid, Investment>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InvestmentStore for InMemoryStore {
    async fn insert(&self, investment: Investment) -> Result<Investment, ServiceError> {
        self.investments
            .write()
            .await
            .insert(investment.id, investment.clone());
        Ok(investment)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Investment>, ServiceError> {
        Ok(self.investments.read().await.get(&id).cloned())
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Investment>, ServiceError> {
        let mut owned: Vec<Investment> = self
            .investments
            .read()
            .await
            .values()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by_key(|i| i.created_at);
        Ok(owned)
    }

    async fn replace(&self, investment: Investment) -> Result<Investment, ServiceError> {
        let mut investments = self.investments.write().await;
        match investments.get_mut(&investment.id) {
            Some(existing) => {
                *existing = investment.clone();
                Ok(investment)
            }
            None => Err(ServiceError::NotFound("Investment not found".to_string())),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        self.investments.write().await.remove(&id);
        Ok(())
    }
}

/// Investments table behind Supabase's PostgREST API.
pub struct SupabaseStore {
    client: Client,
    table_url: String,
    service_key: String,
}

impl SupabaseStore {
    pub fn new(url: &str, service_key: &str) -> Self {
        SupabaseStore {
            client: Client::new(),
            table_url: format!("{}/rest/v1/investments", url.trim_end_matches('/')),
            service_key: service_key.to_string(),
        }
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.client
            .request(method, &self.table_url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    fn insert_request(&self, investment: &Investment) -> RequestBuilder {
        self.request(Method::POST)
            .header("Prefer", "return=representation")
            .json(investment)
    }

    fn get_request(&self, id: Uuid) -> RequestBuilder {
        self.request(Method::GET)
            .query(&[("id", format!("eq.{}", id)), ("select", "*".to_string())])
    }

    fn list_request(&self, user_id: &str) -> RequestBuilder {
        self.request(Method::GET).query(&[
            ("userId", format!("eq.{}", user_id)),
            ("select", "*".to_string()),
            ("order", "createdAt.asc".to_string()),
        ])
    }

    fn replace_request(&self, investment: &Investment) -> RequestBuilder {
        self.request(Method::PATCH)
            .query(&[("id", format!("eq.{}", investment.id))])
            .header("Prefer", "return=representation")
            .json(investment)
    }

    fn delete_request(&self, id: Uuid) -> RequestBuilder {
        self.request(Method::DELETE)
            .query(&[("id", format!("eq.{}", id))])
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ServiceError> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(ServiceError::Internal(format!(
                "Data store request failed: HTTP {}: {}",
                status, body
            )));
        }
        Ok(response)
    }

    async fn rows(&self, builder: RequestBuilder) -> Result<Vec<Investment>, ServiceError> {
        let response = self.send(builder).await?;
        Ok(response.json::<Vec<Investment>>().await?)
    }
}

fn first_row(rows: Vec<Investment>) -> Result<Investment, ServiceError> {
    rows.into_iter()
        .next()
        .ok_or_else(|| ServiceError::Internal("Data store returned no rows".to_string()))
}

#[async_trait]
impl InvestmentStore for SupabaseStore {
    async fn insert(&self, investment: Investment) -> Result<Investment, ServiceError> {
        first_row(self.rows(self.insert_request(&investment)).await?)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Investment>, ServiceError> {
        Ok(self.rows(self.get_request(id)).await?.into_iter().next())
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Investment>, ServiceError> {
        self.rows(self.list_request(user_id)).await
    }

    async fn replace(&self, investment: Investment) -> Result<Investment, ServiceError> {
        self.rows(self.replace_request(&investment))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::NotFound("Investment not found".to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        self.send(self.delete_request(id)).await?;
        Ok(())
    }
}
