// src/analysis.rs
use crate::completion::CompletionProvider;
use crate::error::ServiceError;
use crate::models::{
    HistoricalPerformance, Holding, InvestmentAnalysis, InvestmentRequest, PortfolioAnalysis,
    PortfolioSnapshot,
};
use crate::prompt::{investment_prompt, portfolio_prompt, ANALYST_ROLE, PORTFOLIO_MANAGER_ROLE};
use chrono::{DateTime, NaiveDate};
use log::info;

// Placeholders until a market-data integration exists.
pub const PLACEHOLDER_CURRENT_PRICE: f64 = 150.0;
pub const PLACEHOLDER_RISK_ASSESSMENT: &str = "Moderate risk based on market conditions";

fn placeholder_performance() -> HistoricalPerformance {
    HistoricalPerformance {
        daily_change: "+2.5%".to_string(),
        weekly_change: "+5.2%".to_string(),
        monthly_change: "+8.7%".to_string(),
    }
}

// Placeholder until portfolios are read from the data store.
fn placeholder_portfolio() -> PortfolioSnapshot {
    PortfolioSnapshot {
        total_value: 100000.0,
        total_gain_loss: 5000.0,
        holdings: vec![Holding {
            symbol: "AAPL".to_string(),
            quantity: 10,
            current_value: 15000.0,
            gain_loss: 1500.0,
        }],
    }
}

/// Checks the position fields shared by analysis requests and ledger entries.
pub fn validate_position(
    symbol: &str,
    quantity: f64,
    purchase_price: f64,
    purchase_date: &str,
) -> Result<(), String> {
    if symbol.is_empty() {
        return Err("symbol must not be empty".to_string());
    }
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err("quantity must be a positive number".to_string());
    }
    if !purchase_price.is_finite() || purchase_price <= 0.0 {
        return Err("purchase_price must be a positive number".to_string());
    }
    let is_date = NaiveDate::parse_from_str(purchase_date, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(purchase_date).is_ok();
    if !is_date {
        return Err(format!(
            "purchase_date must be a date, got '{}'",
            purchase_date
        ));
    }
    Ok(())
}

pub async fn analyze_investment(
    provider: &dyn CompletionProvider,
    investment: &InvestmentRequest,
) -> Result<InvestmentAnalysis, ServiceError> {
    validate_position(
        &investment.symbol,
        investment.quantity,
        investment.purchase_price,
        &investment.purchase_date,
    )
    .map_err(ServiceError::Internal)?;

    let current_price = PLACEHOLDER_CURRENT_PRICE;
    let prompt = investment_prompt(investment, current_price);
    let ai_insights = provider.complete(ANALYST_ROLE, &prompt).await?;
    info!("Generated insights for {}", investment.symbol);

    Ok(InvestmentAnalysis {
        symbol: investment.symbol.clone(),
        current_price,
        historical_performance: placeholder_performance(),
        ai_insights,
        risk_assessment: PLACEHOLDER_RISK_ASSESSMENT.to_string(),
    })
}

pub async fn analyze_portfolio(
    provider: &dyn CompletionProvider,
    user_id: &str,
) -> Result<PortfolioAnalysis, ServiceError> {
    if user_id.is_empty() {
        return Err(ServiceError::Internal(
            "user_id must not be empty".to_string(),
        ));
    }

    let portfolio = placeholder_portfolio();
    let prompt = portfolio_prompt(&portfolio);
    let ai_insights = provider.complete(PORTFOLIO_MANAGER_ROLE, &prompt).await?;
    info!("Generated portfolio insights for user {}", user_id);

    Ok(PortfolioAnalysis {
        portfolio,
        ai_insights,
    })
}
