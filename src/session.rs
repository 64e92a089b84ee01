use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::api_connection::RecipeClient;
use crate::console::ConsoleIo;
use crate::error::RecipeError;
use crate::prompt_builder;
use crate::recipe::{split_list, RecipeRequest, RecipeResponse};
use crate::storage;

const RULE_WIDTH: usize = 60;

/// Where a session currently is. The only loop is back to `AwaitingInput`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingInput,
    Building,
    Requesting,
    Presenting,
    Terminal,
}

/// What happened over a whole interactive session.
#[derive(Debug, Default)]
pub struct SessionSummary {
    pub generated: usize,
    pub failed: usize,
    pub last_recipe: Option<RecipeResponse>,
}

/// Drives ingredient input → prompt → API call → display/save, and turns
/// every API failure into a message for the user.
pub struct SessionController<C> {
    client: C,
    api_key: String,
    recipes_dir: PathBuf,
    state: SessionState,
    history: Vec<SessionState>,
}

impl<C: RecipeClient> SessionController<C> {
    pub fn new(client: C, api_key: impl Into<String>, recipes_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            recipes_dir: recipes_dir.into(),
            state: SessionState::AwaitingInput,
            history: vec![SessionState::AwaitingInput],
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Every state entered, in order, without immediate repeats.
    pub fn history(&self) -> &[SessionState] {
        &self.history
    }

    pub fn recipes_dir(&self) -> &Path {
        &self.recipes_dir
    }

    fn enter(&mut self, state: SessionState) {
        if self.state != state {
            tracing::debug!(from = ?self.state, to = ?state, "session state change");
            self.state = state;
            self.history.push(state);
        }
    }

    /// Interactive loop. Returns once the user declines another recipe or
    /// input runs out. Only console I/O failures escape as errors.
    pub async fn run<IO: ConsoleIo>(&mut self, io: &mut IO) -> Result<SessionSummary> {
        let mut summary = SessionSummary::default();

        io.write_line("🍳 Welcome to AI Recipe Cookbook!").await?;
        io.write_line("Generate recipes from your ingredients using AI").await?;

        loop {
            self.enter(SessionState::AwaitingInput);

            let Some(ingredients) = read_ingredients(io).await? else {
                break;
            };
            let Some((dietary, cuisine)) = read_preferences(io).await? else {
                break;
            };
            let request = RecipeRequest::new(ingredients, Some(cuisine.as_str()), split_list(&dietary));

            match self.generate(io, &request).await? {
                Ok(response) => {
                    summary.generated += 1;
                    self.present(io, &response).await?;

                    let save = read_yes_no(io, "\n💾 Save this recipe? (y/n): ").await?;
                    match save {
                        None => {
                            summary.last_recipe = Some(response);
                            break;
                        }
                        Some(true) => {
                            let Some(name) = io.read_line("File name (leave blank for a timestamped name): ").await? else {
                                summary.last_recipe = Some(response);
                                break;
                            };
                            self.save(io, &name, &response).await?;
                        }
                        Some(false) => {}
                    }
                    summary.last_recipe = Some(response);
                }
                Err(e) => {
                    summary.failed += 1;
                    self.enter(SessionState::AwaitingInput);
                    io.write_line(&e.user_message()).await?;
                }
            }

            io.write_line(&format!("\n{}", "-".repeat(40))).await?;
            if read_yes_no(io, "🔄 Generate another recipe? (y/n): ").await? != Some(true) {
                break;
            }
        }

        self.enter(SessionState::Terminal);
        io.write_line("Happy cooking! 🍳✨").await?;
        tracing::info!(generated = summary.generated, failed = summary.failed, "session finished");
        Ok(summary)
    }

    /// Single non-interactive pass: the error is handed back rather than
    /// looping.
    pub async fn run_once<IO: ConsoleIo>(
        &mut self,
        io: &mut IO,
        request: &RecipeRequest,
        save_as: Option<&str>,
    ) -> Result<RecipeResponse> {
        let response = match self.generate(io, request).await? {
            Ok(response) => response,
            Err(e) => {
                self.enter(SessionState::Terminal);
                return Err(e.into());
            }
        };
        self.present(io, &response).await?;

        if let Some(name) = save_as {
            let path = storage::save_recipe_text(&self.recipes_dir, name, &response.text).await?;
            io.write_line(&format!("📁 Recipe saved to: {}", path.display())).await?;
        }

        self.enter(SessionState::Terminal);
        Ok(response)
    }

    /// Building → Requesting. The outer error is console I/O; the inner one
    /// is the recoverable request failure.
    async fn generate<IO: ConsoleIo>(
        &mut self,
        io: &mut IO,
        request: &RecipeRequest,
    ) -> Result<Result<RecipeResponse, RecipeError>> {
        self.enter(SessionState::Building);
        let prompt = match prompt_builder::build(request) {
            Ok(prompt) => prompt,
            Err(e) => {
                tracing::warn!(error = %e, "rejected recipe request");
                return Ok(Err(e));
            }
        };

        self.enter(SessionState::Requesting);
        io.write_line("\n🍳 Generating recipe with AI...").await?;
        let result = self.client.generate(&prompt, &self.api_key).await;
        if let Err(e) = &result {
            tracing::error!(error = %e, "recipe generation failed");
        }
        Ok(result)
    }

    async fn present<IO: ConsoleIo>(&mut self, io: &mut IO, response: &RecipeResponse) -> Result<()> {
        self.enter(SessionState::Presenting);
        let rule = "=".repeat(RULE_WIDTH);
        io.write_line(&format!("\n{}", rule)).await?;
        io.write_line("🍽️  YOUR GENERATED RECIPE").await?;
        io.write_line(&rule).await?;
        io.write_line(&response.text).await?;
        io.write_line(&rule).await?;
        Ok(())
    }

    async fn save<IO: ConsoleIo>(&self, io: &mut IO, name: &str, response: &RecipeResponse) -> Result<()> {
        match storage::save_recipe_text(&self.recipes_dir, name, &response.text).await {
            Ok(path) => io.write_line(&format!("📁 Recipe saved to: {}", path.display())).await?,
            Err(e) => {
                tracing::error!(error = %e, "saving recipe failed");
                io.write_line(&format!("❌ Error saving recipe: {}", e)).await?;
            }
        }
        Ok(())
    }
}

/// One ingredient per line, taken as typed apart from surrounding
/// whitespace, until a blank line. Keeps asking while the list is empty.
/// `None` on end of input.
async fn read_ingredients<IO: ConsoleIo>(io: &mut IO) -> Result<Option<Vec<String>>> {
    io.write_line("\n=== AI Recipe Cookbook ===").await?;
    io.write_line("Enter your ingredients (one per line, press Enter twice when done):").await?;

    let mut ingredients = Vec::new();
    loop {
        let Some(line) = io.read_line("Ingredient: ").await? else {
            return Ok(None);
        };
        let ingredient = line.trim();
        if ingredient.is_empty() {
            if !ingredients.is_empty() {
                return Ok(Some(ingredients));
            }
            io.write_line("Please enter at least one ingredient.").await?;
        } else {
            ingredients.push(ingredient.to_string());
        }
    }
}

async fn read_preferences<IO: ConsoleIo>(io: &mut IO) -> Result<Option<(String, String)>> {
    io.write_line("\n--- Additional Preferences (optional) ---").await?;
    let Some(dietary) = io.read_line("Any dietary restrictions? (vegetarian, vegan, gluten-free, etc.): ").await? else {
        return Ok(None);
    };
    let Some(cuisine) = io.read_line("Preferred cuisine type? (Italian, Indian, Mexican, etc.): ").await? else {
        return Ok(None);
    };
    Ok(Some((dietary, cuisine)))
}

async fn read_yes_no<IO: ConsoleIo>(io: &mut IO, prompt: &str) -> Result<Option<bool>> {
    Ok(io
        .read_line(prompt)
        .await?
        .map(|answer| matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")))
}
