// src/completion.rs
use crate::config::Config;
use crate::error::ServiceError;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Sends a system message and a user message to a hosted model and returns
/// the generated text.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, ServiceError>;
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize, Debug)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Deserialize, Debug)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize, Debug)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Deserialize, Debug)]
struct ApiErrorDetail {
    message: String,
}

/// OpenAI-compatible chat completions client.
pub struct OpenAiClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(config: &Config) -> Self {
        if config.openai_api_key.is_none() {
            warn!("OPENAI_API_KEY is not set; analysis requests will fail.");
        }
        OpenAiClient {
            client: Client::new(),
            api_key: config.openai_api_key.clone(),
            model: config.openai_model.clone(),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, ServiceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ServiceError::Internal("OPENAI_API_KEY is not set".to_string()))?;

        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!("Requesting completion from {} with model {}", url, self.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(provider_error(status, &body));
        }
        first_choice_text(&body)
    }
}

fn provider_error(status: reqwest::StatusCode, body: &str) -> ServiceError {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(parsed) => ServiceError::Internal(parsed.error.message),
        Err(_) => ServiceError::Internal(format!("Completion request failed: HTTP {}", status)),
    }
}

fn first_choice_text(body: &str) -> Result<String, ServiceError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body)?;
    parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ServiceError::Internal("Completion returned no choices".to_string()))?
        .message
        .content
        .ok_or_else(|| ServiceError::Internal("Completion returned no content".to_string()))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn takes_the_first_choice_verbatim() {
        let body = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "  Insight text\n"}},
                {"index": 1, "message": {"role": "assistant", "content": "other"}}
            ]
        }"#;
        assert_eq!(first_choice_text(body).unwrap(), "  Insight text\n");
    }

    #[test]
    fn empty_choices_is_an_error() {
        let err = first_choice_text(r#"{"choices": []}"#).unwrap_err();
        assert_eq!(
            err,
            ServiceError::Internal("Completion returned no choices".to_string())
        );
    }

    #[test]
    fn null_content_is_an_error() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        assert!(first_choice_text(body).is_err());
    }

    #[test]
    fn provider_error_message_is_surfaced() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        let err = provider_error(reqwest::StatusCode::UNAUTHORIZED, body);
        assert_eq!(err.to_string(), "Incorrect API key provided");
    }

    #[test]
    fn unparsable_provider_error_falls_back_to_status() {
        let err = provider_error(reqwest::StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(
            err.to_string(),
            "Completion request failed: HTTP 502 Bad Gateway"
        );
    }

    #[test]
    fn request_serializes_system_then_user() {
        let request = ChatCompletionRequest {
            model: "gpt-4",
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: "sys".to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: "usr".to_string(),
                },
            ],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "model": "gpt-4",
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "usr"}
                ]
            })
        );
    }

    #[tokio::test]
    async fn missing_api_key_fails_without_a_request() {
        let config = Config::from_lookup(|_| None).unwrap();
        let client = OpenAiClient::new(&config);
        let err = client.complete("sys", "usr").await.unwrap_err();
        assert_eq!(err.to_string(), "OPENAI_API_KEY is not set");
    }
}
