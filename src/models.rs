// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct InvestmentRequest {
    pub symbol: String,
    pub quantity: f64,
    pub purchase_price: f64,
    pub purchase_date: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HistoricalPerformance {
    pub daily_change: String,
    pub weekly_change: String,
    pub monthly_change: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InvestmentAnalysis {
    pub symbol: String,
    pub current_price: f64,
    pub historical_performance: HistoricalPerformance,
    pub ai_insights: String,
    pub risk_assessment: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Holding {
    pub symbol: String,
    pub quantity: u32,
    pub current_value: f64,
    pub gain_loss: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PortfolioSnapshot {
    pub total_value: f64,
    pub total_gain_loss: f64,
    pub holdings: Vec<Holding>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PortfolioAnalysis {
    pub portfolio: PortfolioSnapshot,
    pub ai_insights: String,
}

/// Payload for creating or updating a ledger entry.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentInput {
    pub symbol: String,
    pub quantity: f64,
    pub purchase_price: f64,
    pub purchase_date: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A stored ledger entry, owned by `user_id`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: Uuid,
    pub user_id: String,
    pub symbol: String,
    pub quantity: f64,
    pub purchase_price: f64,
    pub purchase_date: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
