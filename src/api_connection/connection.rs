use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;

use super::endpoints::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, GenerateContentRequest,
    GenerateContentResponse, Provider,
};
use crate::error::{RecipeError, Result};
use crate::recipe::RecipeResponse;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Something that can turn a prompt into recipe text. One call, no retries:
/// every failure goes straight back to the caller.
#[async_trait]
pub trait RecipeClient: Send + Sync {
    async fn generate(&self, prompt: &str, api_key: &str) -> Result<RecipeResponse>;
}

/// Connection details for [`HttpRecipeClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub provider: Provider,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    /// Sent as `HTTP-Referer` / `X-Title` to OpenRouter.
    pub site_url: String,
    pub app_name: String,
}

impl ClientSettings {
    pub fn for_provider(provider: Provider) -> Self {
        Self {
            provider,
            model: provider.default_model().to_string(),
            base_url: provider.default_base_url().to_string(),
            timeout: DEFAULT_TIMEOUT,
            site_url: "http://localhost:3000".to_string(),
            app_name: "RecipeCookbook".to_string(),
        }
    }
}

pub struct HttpRecipeClient {
    http: Client,
    settings: ClientSettings,
}

impl HttpRecipeClient {
    pub fn new(settings: ClientSettings) -> Result<Self> {
        let http = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self { http, settings })
    }

    async fn call_gemini(&self, url: &str, prompt: &str, api_key: &str) -> Result<RecipeResponse> {
        let request = GenerateContentRequest::from_prompt(prompt);

        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;
        let body = read_success_body(response).await?;

        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
        match parsed.text() {
            Some(text) => {
                let metadata = json!({
                    "model_version": parsed.model_version,
                    "usage": parsed.usage_metadata,
                    "finish_reason": parsed.candidates.first().and_then(|c| c.finish_reason.clone()),
                });
                Ok(RecipeResponse {
                    text,
                    raw_metadata: Some(metadata),
                })
            }
            None => {
                let reason = parsed
                    .prompt_feedback
                    .and_then(|feedback| feedback.block_reason)
                    .or_else(|| parsed.candidates.first().and_then(|c| c.finish_reason.clone()))
                    .unwrap_or_else(|| "no candidates returned".to_string());
                Err(RecipeError::EmptyResponse(reason))
            }
        }
    }

    async fn call_openrouter(&self, url: &str, prompt: &str, api_key: &str) -> Result<RecipeResponse> {
        let request = ChatCompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: Some(0.7),
            max_tokens: Some(2048),
        };

        let response = self
            .http
            .post(url)
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.settings.site_url)
            .header("X-Title", &self.settings.app_name)
            .json(&request)
            .send()
            .await?;
        let body = read_success_body(response).await?;

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)?;
        let choice = parsed
            .choices
            .first()
            .ok_or_else(|| RecipeError::EmptyResponse("no choices returned".to_string()))?;
        match choice.message.content.as_deref() {
            Some(text) if !text.trim().is_empty() => Ok(RecipeResponse {
                text: text.to_string(),
                raw_metadata: Some(json!({
                    "id": parsed.id,
                    "model": parsed.model,
                    "usage": parsed.usage,
                    "finish_reason": choice.finish_reason,
                })),
            }),
            _ => Err(RecipeError::EmptyResponse(
                choice
                    .finish_reason
                    .clone()
                    .unwrap_or_else(|| "empty message".to_string()),
            )),
        }
    }
}

#[async_trait]
impl RecipeClient for HttpRecipeClient {
    async fn generate(&self, prompt: &str, api_key: &str) -> Result<RecipeResponse> {
        if api_key.trim().is_empty() {
            return Err(RecipeError::AuthError("no API key supplied".to_string()));
        }

        let url = self
            .settings
            .provider
            .endpoint_url(&self.settings.base_url, &self.settings.model);
        tracing::info!(provider = ?self.settings.provider, model = %self.settings.model, "requesting recipe");
        tracing::debug!(%url, prompt_chars = prompt.len(), "sending generation request");

        let result = match self.settings.provider {
            Provider::Gemini => self.call_gemini(&url, prompt, api_key).await,
            Provider::OpenRouter => self.call_openrouter(&url, prompt, api_key).await,
        };

        match &result {
            Ok(response) => tracing::info!(chars = response.text.len(), "recipe received"),
            Err(e) => tracing::warn!(error = %e, "recipe request failed"),
        }
        result
    }
}

/// Returns the body of a 2xx response, or maps the status to an error.
async fn read_success_body(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.text().await?);
    }

    let error_body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read error body".to_string());
    Err(classify_status(status, error_body))
}

pub(crate) fn classify_status(status: StatusCode, body: String) -> RecipeError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RecipeError::AuthError(body),
        StatusCode::TOO_MANY_REQUESTS => RecipeError::RateLimitError(body),
        StatusCode::BAD_REQUEST if body.contains("API_KEY_INVALID") || body.contains("API key not valid") => {
            RecipeError::AuthError(body)
        }
        _ => RecipeError::ApiError { status, body },
    }
}
