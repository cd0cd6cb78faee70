// src/auth.rs
use crate::error::ServiceError;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::{Filter, Rejection};

#[derive(Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Resolves the caller's user id from an `Authorization: Bearer <jwt>` header.
pub fn authenticate(secret: Option<&str>, header: Option<&str>) -> Result<String, ServiceError> {
    let secret = secret.ok_or_else(|| {
        ServiceError::Unauthorized("Authentication is not configured".to_string())
    })?;
    let header = header
        .ok_or_else(|| ServiceError::Unauthorized("Missing authorization header".to_string()))?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ServiceError::Unauthorized("Expected a bearer token".to_string()))?;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| ServiceError::Unauthorized(format!("Invalid token: {}", e)))?;

    if data.claims.sub.is_empty() {
        return Err(ServiceError::Unauthorized(
            "Token has no subject".to_string(),
        ));
    }
    Ok(data.claims.sub)
}

pub fn with_user(
    secret: Option<Arc<String>>,
) -> impl Filter<Extract = (String,), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization").and_then(move |header: Option<String>| {
        let secret = secret.clone();
        async move {
            authenticate(secret.as_ref().map(|s| s.as_str()), header.as_deref())
                .map_err(warp::reject::custom)
        }
    })
}

#[cfg(test)]
pub fn create_token(user_id: &str, secret: &str) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let claims = Claims {
        sub: user_id.to_string(),
        exp: 10000000000,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_token_yields_subject() {
        let token = create_token("user-1", "secret");
        let header = format!("Bearer {}", token);
        assert_eq!(
            authenticate(Some("secret"), Some(&header)).unwrap(),
            "user-1"
        );
    }

    #[test]
    fn wrong_secret_is_unauthorized() {
        let header = format!("Bearer {}", create_token("user-1", "secret"));
        let err = authenticate(Some("other"), Some(&header)).unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[test]
    fn missing_header_or_scheme_is_unauthorized() {
        assert!(authenticate(Some("secret"), None).is_err());
        let token = create_token("user-1", "secret");
        assert!(authenticate(Some("secret"), Some(&token)).is_err());
    }

    #[test]
    fn unconfigured_secret_rejects_everyone() {
        let header = format!("Bearer {}", create_token("user-1", "secret"));
        let err = authenticate(None, Some(&header)).unwrap_err();
        assert_eq!(err.to_string(), "Authentication is not configured");
    }

    #[test]
    fn expired_token_is_unauthorized() {
        use jsonwebtoken::{encode, EncodingKey, Header};
        let claims = Claims {
            sub: "user-1".to_string(),
            exp: 1,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();
        let header = format!("Bearer {}", token);
        assert!(authenticate(Some("secret"), Some(&header)).is_err());
    }
}
