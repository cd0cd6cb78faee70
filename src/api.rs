// src/api.rs
use crate::analysis::{analyze_investment, analyze_portfolio};
use crate::auth::with_user;
use crate::completion::CompletionProvider;
use crate::error::{handle_rejection, ServiceError};
use crate::investments::{
    create_investment, delete_investment, get_investment, list_investments, update_investment,
};
use crate::models::{InvestmentInput, InvestmentRequest};
use crate::store::InvestmentStore;
use log::{error, info};
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use uuid::Uuid;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

pub fn routes(
    provider: Arc<dyn CompletionProvider>,
    store: Arc<dyn InvestmentStore>,
    jwt_secret: Option<Arc<String>>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    let root = warp::path::end()
        .and(warp::get())
        .map(|| warp::reply::json(&json!({"message": "Stock Investment AI Service is running"})));

    let analyze = warp::path!("analyze-investment")
        .and(warp::post())
        .and(with_provider(provider.clone()))
        .and(warp::body::json::<InvestmentRequest>())
        .and_then(analyze_investment_handler);

    let portfolio = warp::path!("portfolio-analysis" / String)
        .and(warp::get())
        .and(with_provider(provider))
        .and_then(portfolio_analysis_handler);

    let create = warp::path!("investments")
        .and(warp::post())
        .and(with_user(jwt_secret.clone()))
        .and(with_store(store.clone()))
        .and(warp::body::json::<InvestmentInput>())
        .and_then(create_investment_handler);

    let list = warp::path!("investments")
        .and(warp::get())
        .and(with_user(jwt_secret.clone()))
        .and(with_store(store.clone()))
        .and_then(list_investments_handler);

    let get = warp::path!("investments" / String)
        .and(warp::get())
        .and(with_user(jwt_secret.clone()))
        .and(with_store(store.clone()))
        .and_then(get_investment_handler);

    let update = warp::path!("investments" / String)
        .and(warp::put())
        .and(with_user(jwt_secret.clone()))
        .and(with_store(store.clone()))
        .and(warp::body::json::<InvestmentInput>())
        .and_then(update_investment_handler);

    let delete = warp::path!("investments" / String)
        .and(warp::delete())
        .and(with_user(jwt_secret))
        .and(with_store(store))
        .and_then(delete_investment_handler);

    root.or(analyze)
        .or(portfolio)
        .or(create)
        .or(list)
        .or(get)
        .or(update)
        .or(delete)
        .recover(handle_rejection)
}

fn with_provider(
    provider: Arc<dyn CompletionProvider>,
) -> impl Filter<Extract = (Arc<dyn CompletionProvider>,), Error = Infallible> + Clone {
    warp::any().map(move || provider.clone())
}

fn with_store(
    store: Arc<dyn InvestmentStore>,
) -> impl Filter<Extract = (Arc<dyn InvestmentStore>,), Error = Infallible> + Clone {
    warp::any().map(move || store.clone())
}

fn parse_id(id: &str) -> Result<Uuid, Rejection> {
    Uuid::parse_str(id).map_err(|_| {
        warp::reject::custom(ServiceError::NotFound(
            "Investment not found".to_string(),
        ))
    })
}

async fn analyze_investment_handler(
    provider: Arc<dyn CompletionProvider>,
    investment: InvestmentRequest,
) -> Result<impl Reply, Rejection> {
    match analyze_investment(provider.as_ref(), &investment).await {
        Ok(analysis) => {
            info!("Investment analysis for {} completed.", analysis.symbol);
            Ok(warp::reply::json(&analysis))
        }
        Err(e) => {
            error!("Failed to analyze investment {}: {}", investment.symbol, e);
            Err(warp::reject::custom(e))
        }
    }
}

async fn portfolio_analysis_handler(
    user_id: String,
    provider: Arc<dyn CompletionProvider>,
) -> Result<impl Reply, Rejection> {
    match analyze_portfolio(provider.as_ref(), &user_id).await {
        Ok(analysis) => {
            info!("Portfolio analysis for {} completed.", user_id);
            Ok(warp::reply::json(&analysis))
        }
        Err(e) => {
            error!("Failed to analyze portfolio for {}: {}", user_id, e);
            Err(warp::reject::custom(e))
        }
    }
}

async fn create_investment_handler(
    user_id: String,
    store: Arc<dyn InvestmentStore>,
    input: InvestmentInput,
) -> Result<impl Reply, Rejection> {
    match create_investment(store.as_ref(), &user_id, input).await {
        Ok(investment) => {
            info!("Investment {} created for {}.", investment.id, user_id);
            Ok(warp::reply::with_status(
                warp::reply::json(&investment),
                StatusCode::CREATED,
            ))
        }
        Err(e) => {
            error!("Failed to create investment: {}", e);
            Err(warp::reject::custom(e))
        }
    }
}

async fn list_investments_handler(
    user_id: String,
    store: Arc<dyn InvestmentStore>,
) -> Result<impl Reply, Rejection> {
    match list_investments(store.as_ref(), &user_id).await {
        Ok(investments) => {
            info!("Listed {} investments for {}.", investments.len(), user_id);
            Ok(warp::reply::json(&investments))
        }
        Err(e) => {
            error!("Failed to list investments: {}", e);
            Err(warp::reject::custom(e))
        }
    }
}

async fn get_investment_handler(
    id: String,
    user_id: String,
    store: Arc<dyn InvestmentStore>,
) -> Result<impl Reply, Rejection> {
    let id = parse_id(&id)?;
    match get_investment(store.as_ref(), &user_id, id).await {
        Ok(investment) => Ok(warp::reply::json(&investment)),
        Err(e) => {
            error!("Failed to get investment {}: {}", id, e);
            Err(warp::reject::custom(e))
        }
    }
}

async fn update_investment_handler(
    id: String,
    user_id: String,
    store: Arc<dyn InvestmentStore>,
    input: InvestmentInput,
) -> Result<impl Reply, Rejection> {
    let id = parse_id(&id)?;
    match update_investment(store.as_ref(), &user_id, id, input).await {
        Ok(investment) => {
            info!("Investment {} updated.", id);
            Ok(warp::reply::json(&investment))
        }
        Err(e) => {
            error!("Failed to update investment {}: {}", id, e);
            Err(warp::reject::custom(e))
        }
    }
}

async fn delete_investment_handler(
    id: String,
    user_id: String,
    store: Arc<dyn InvestmentStore>,
) -> Result<impl Reply, Rejection> {
    let id = parse_id(&id)?;
    match delete_investment(store.as_ref(), &user_id, id).await {
        Ok(()) => {
            info!("Investment {} deleted.", id);
            Ok(warp::reply::with_status(
                warp::reply(),
                StatusCode::NO_CONTENT,
            ))
        }
        Err(e) => {
            error!("Failed to delete investment {}: {}", id, e);
            Err(warp::reject::custom(e))
        }
    }
}
