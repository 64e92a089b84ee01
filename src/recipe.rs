use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{RecipeError, Result};

/// What the user asked for. Fields are normalised on construction and never
/// change afterwards. Deserializing goes through [`RecipeRequest::new`] and
/// [`RecipeRequest::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRecipeRequest")]
pub struct RecipeRequest {
    ingredients: Vec<String>,
    cuisine: Option<String>,
    dietary_restrictions: BTreeSet<String>,
}

impl RecipeRequest {
    /// Trims every field, drops blank ingredients and restriction tags, and
    /// treats a blank cuisine as "no preference". Does not validate; see
    /// [`RecipeRequest::validate`].
    pub fn new<I, S, R, T>(ingredients: I, cuisine: Option<&str>, dietary_restrictions: R) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        R: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let ingredients = ingredients
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let cuisine = cuisine
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        let dietary_restrictions = dietary_restrictions
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            ingredients,
            cuisine,
            dietary_restrictions,
        }
    }

    pub fn ingredients(&self) -> &[String] {
        &self.ingredients
    }

    pub fn cuisine(&self) -> Option<&str> {
        self.cuisine.as_deref()
    }

    pub fn dietary_restrictions(&self) -> &BTreeSet<String> {
        &self.dietary_restrictions
    }

    /// A request must name at least one ingredient before it may leave the
    /// process.
    pub fn validate(&self) -> Result<()> {
        if self.ingredients.iter().all(|ingredient| ingredient.trim().is_empty()) {
            return Err(RecipeError::InvalidRequest(
                "Please enter at least one ingredient.".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct RawRecipeRequest {
    ingredients: Vec<String>,
    #[serde(default)]
    cuisine: Option<String>,
    #[serde(default)]
    dietary_restrictions: Vec<String>,
}

impl TryFrom<RawRecipeRequest> for RecipeRequest {
    type Error = RecipeError;

    fn try_from(raw: RawRecipeRequest) -> Result<Self> {
        let request = RecipeRequest::new(raw.ingredients, raw.cuisine.as_deref(), raw.dietary_restrictions);
        request.validate()?;
        Ok(request)
    }
}

/// Splits a comma-separated line into trimmed, non-empty items.
pub fn split_list(line: &str) -> Vec<String> {
    line.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Text generated by the API, plus whatever usage/model block came with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeResponse {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_metadata: Option<serde_json::Value>,
}

impl RecipeResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            raw_metadata: None,
        }
    }
}
