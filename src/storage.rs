use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tokio::fs;

use crate::error::{RecipeError, Result};

pub const DEFAULT_RECIPES_DIR: &str = "generated_recipes";

/// `recipe_20240131_184502.txt` style name for the given moment.
pub fn default_file_name(timestamp: DateTime<Local>) -> String {
    format!("recipe_{}.txt", timestamp.format("%Y%m%d_%H%M%S"))
}

/// Reduces a user-supplied name to its final component so saves always land
/// in the recipes folder. Returns `None` when nothing usable is left.
fn sanitize_file_name(file_name: &str) -> Option<String> {
    Path::new(file_name.trim())
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .filter(|name| !name.is_empty())
}

/// Writes `text` verbatim to `recipes_dir/file_name`, creating the folder when
/// needed. A blank name falls back to [`default_file_name`].
pub async fn save_recipe_text(recipes_dir: &Path, file_name: &str, text: &str) -> Result<PathBuf> {
    let file_name = sanitize_file_name(file_name).unwrap_or_else(|| default_file_name(Local::now()));
    let path = recipes_dir.join(file_name);

    fs::create_dir_all(recipes_dir)
        .await
        .map_err(|source| RecipeError::Storage {
            path: recipes_dir.to_path_buf(),
            source,
        })?;
    fs::write(&path, text)
        .await
        .map_err(|source| RecipeError::Storage {
            path: path.clone(),
            source,
        })?;

    tracing::info!(path = %path.display(), bytes = text.len(), "recipe saved");
    Ok(path)
}
