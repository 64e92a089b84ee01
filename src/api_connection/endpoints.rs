use serde::{Deserialize, Serialize};

/// Remote text-generation services the cookbook knows how to talk to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Provider {
    Gemini,
    #[value(name = "openrouter")]
    OpenRouter,
}

impl Provider {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::Gemini => "https://generativelanguage.googleapis.com",
            Provider::OpenRouter => "https://openrouter.ai/api/v1",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini-1.5-flash",
            Provider::OpenRouter => "qwen/qwen3-32b",
        }
    }

    pub fn default_api_key_env_var(&self) -> &'static str {
        match self {
            Provider::Gemini => "GEMINI_API_KEY",
            Provider::OpenRouter => "OPENROUTER_API_KEY",
        }
    }

    /// Full URL of the generation endpoint for `model` under `base_url`.
    pub fn endpoint_url(&self, base_url: &str, model: &str) -> String {
        let base_url = base_url.trim_end_matches('/');
        match self {
            Provider::Gemini => format!("{}/v1beta/models/{}:generateContent", base_url, model),
            Provider::OpenRouter => format!("{}/chat/completions", base_url),
        }
    }
}

// Gemini generateContent

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Clone)]
pub struct GenerateContentRequest {
    pub contents: Vec<GeminiContent>,
}

impl GenerateContentRequest {
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: Some(prompt.to_string()),
                }],
            }],
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    pub content: Option<GeminiContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    pub prompt_feedback: Option<GeminiPromptFeedback>,
    pub usage_metadata: Option<serde_json::Value>,
    pub model_version: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if it produced any.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

// OpenRouter chat completions

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatCompletionResponseMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatCompletionChoice {
    pub message: ChatCompletionResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatCompletionResponse {
    pub id: Option<String>,
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatCompletionChoice>,
    pub usage: Option<serde_json::Value>,
}
