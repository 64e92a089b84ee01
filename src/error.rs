use thiserror::Error;

/// Everything that can go wrong between reading the user's ingredients and
/// writing the recipe back out.
#[derive(Debug, Error)]
pub enum RecipeError {
    /// The request was rejected locally, before any network call.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("authentication failed: {0}")]
    AuthError(String),

    #[error("network error: {0}")]
    TransportError(#[source] reqwest::Error),

    #[error("rate limit exceeded: {0}")]
    RateLimitError(String),

    #[error("API error {status}: {body}")]
    ApiError {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("the API returned no recipe text: {0}")]
    EmptyResponse(String),

    #[error("could not decode API response: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    #[error("could not save recipe to {path}: {source}")]
    Storage {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for RecipeError {
    fn from(err: reqwest::Error) -> Self {
        RecipeError::TransportError(err)
    }
}

impl From<serde_json::Error> for RecipeError {
    fn from(err: serde_json::Error) -> Self {
        RecipeError::MalformedResponse(err)
    }
}

impl RecipeError {
    /// Text shown to the person at the console.
    pub fn user_message(&self) -> String {
        match self {
            RecipeError::InvalidRequest(reason) => format!("❌ {}", reason),
            RecipeError::AuthError(_) => {
                "❌ The API rejected your key. Check that it is set and valid.".to_string()
            }
            RecipeError::TransportError(err) => {
                format!("❌ Could not reach the recipe service: {}", err)
            }
            RecipeError::RateLimitError(_) => {
                "❌ API quota exceeded. Wait a moment before trying again.".to_string()
            }
            other => format!("❌ Error generating recipe: {}", other),
        }
    }
}

pub type Result<T, E = RecipeError> = std::result::Result<T, E>;
