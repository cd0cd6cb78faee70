// src/investments.rs
use crate::analysis::validate_position;
use crate::error::ServiceError;
use crate::models::{Investment, InvestmentInput};
use crate::store::InvestmentStore;
use chrono::Utc;
use uuid::Uuid;

fn validate(input: &InvestmentInput) -> Result<(), ServiceError> {
    validate_position(
        &input.symbol,
        input.quantity,
        input.purchase_price,
        &input.purchase_date,
    )
    .map_err(ServiceError::BadRequest)
}

/// Fetches an investment and checks that `user_id` owns it.
async fn owned(
    store: &dyn InvestmentStore,
    user_id: &str,
    id: Uuid,
    action: &str,
) -> Result<Investment, ServiceError> {
    let investment = store
        .get(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Investment not found".to_string()))?;
    if investment.user_id != user_id {
        return Err(ServiceError::Forbidden(format!(
            "Not authorized to {} this investment",
            action
        )));
    }
    Ok(investment)
}

pub async fn create_investment(
    store: &dyn InvestmentStore,
    user_id: &str,
    input: InvestmentInput,
) -> Result<Investment, ServiceError> {
    validate(&input)?;
    let now = Utc::now();
    let investment = Investment {
        id: Uuid::new_v4(),
        user_id: user_id.to_string(),
        symbol: input.symbol,
        quantity: input.quantity,
        purchase_price: input.purchase_price,
        purchase_date: input.purchase_date,
        notes: input.notes.unwrap_or_default(),
        created_at: now,
        updated_at: now,
    };
    store.insert(investment).await
}

pub async fn list_investments(
    store: &dyn InvestmentStore,
    user_id: &str,
) -> Result<Vec<Investment>, ServiceError> {
    store.list_by_user(user_id).await
}

pub async fn get_investment(
    store: &dyn InvestmentStore,
    user_id: &str,
    id: Uuid,
) -> Result<Investment, ServiceError> {
    owned(store, user_id, id, "access").await
}

pub async fn update_investment(
    store: &dyn InvestmentStore,
    user_id: &str,
    id: Uuid,
    input: InvestmentInput,
) -> Result<Investment, ServiceError> {
    let existing = owned(store, user_id, id, "update").await?;
    validate(&input)?;
    let updated = Investment {
        symbol: input.symbol,
        quantity: input.quantity,
        purchase_price: input.purchase_price,
        purchase_date: input.purchase_date,
        notes: input.notes.unwrap_or_default(),
        updated_at: Utc::now(),
        ..existing
    };
    store.replace(updated).await
}

pub async fn delete_investment(
    store: &dyn InvestmentStore,
    user_id: &str,
    id: Uuid,
) -> Result<(), ServiceError> {
    owned(store, user_id, id, "delete").await?;
    store.delete(id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn input(symbol: &str) -> InvestmentInput {
        InvestmentInput {
            symbol: symbol.to_string(),
            quantity: 5.0,
            purchase_price: 210.5,
            purchase_date: "2024-03-15".to_string(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn create_assigns_owner_and_timestamps() {
        let store = InMemoryStore::new();
        let created = create_investment(&store, "alice", input("NVDA")).await.unwrap();
        assert_eq!(created.user_id, "alice");
        assert_eq!(created.notes, "");
        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(
            get_investment(&store, "alice", created.id).await.unwrap(),
            created
        );
    }

    #[tokio::test]
    async fn invalid_input_is_a_bad_request() {
        let store = InMemoryStore::new();
        let mut bad = input("NVDA");
        bad.quantity = -2.0;
        let err = create_investment(&store, "alice", bad).await.unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));
        assert!(list_investments(&store, "alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn other_users_are_forbidden() {
        let store = InMemoryStore::new();
        let created = create_investment(&store, "alice", input("NVDA")).await.unwrap();

        let err = get_investment(&store, "bob", created.id).await.unwrap_err();
        assert_eq!(
            err,
            ServiceError::Forbidden("Not authorized to access this investment".to_string())
        );
        assert!(update_investment(&store, "bob", created.id, input("AMD"))
            .await
            .is_err());
        assert!(delete_investment(&store, "bob", created.id).await.is_err());
        assert!(get_investment(&store, "alice", created.id).await.is_ok());
    }

    #[tokio::test]
    async fn missing_investment_is_not_found() {
        let store = InMemoryStore::new();
        let err = get_investment(&store, "alice", Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_keeps_identity_and_creation_time() {
        let store = InMemoryStore::new();
        let created = create_investment(&store, "alice", input("NVDA")).await.unwrap();
        let mut change = input("NVDA");
        change.quantity = 8.0;
        change.notes = Some("added more".to_string());

        let updated = update_investment(&store, "alice", created.id, change)
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.user_id, "alice");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.quantity, 8.0);
        assert_eq!(updated.notes, "added more");
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let store = InMemoryStore::new();
        let created = create_investment(&store, "alice", input("NVDA")).await.unwrap();
        delete_investment(&store, "alice", created.id).await.unwrap();
        assert!(matches!(
            get_investment(&store, "alice", created.id).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
