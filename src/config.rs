use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::api_connection::connection::ClientSettings;
use crate::cli::Cli;
use crate::error::{RecipeError, Result};

/// Overrides the provider's base URL when `--base-url` is not given.
pub const BASE_URL_ENV_VAR: &str = "RECIPE_API_BASE_URL";

/// Everything the binary needs after reading flags, the environment and `.env`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub client: ClientSettings,
    pub api_key_env_var: String,
    pub api_key: String,
    pub recipes_dir: PathBuf,
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_cli_with(cli, |name| env::var(name).ok())
    }

    /// Same as [`AppConfig::from_cli`] with an explicit variable lookup.
    pub fn from_cli_with(cli: &Cli, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let provider = cli.provider;
        let api_key_env_var = cli
            .api_key_env
            .clone()
            .unwrap_or_else(|| provider.default_api_key_env_var().to_string());

        let api_key = lookup(api_key_env_var.as_str())
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                RecipeError::Config(format!(
                    "Please provide an API key by setting the {} environment variable",
                    api_key_env_var
                ))
            })?;

        let mut client = ClientSettings::for_provider(provider);
        if let Some(model) = &cli.model {
            client.model = model.clone();
        }
        if let Some(base_url) = cli.base_url.clone().or_else(|| lookup(BASE_URL_ENV_VAR)) {
            client.base_url = base_url;
        }
        client.timeout = Duration::from_secs(cli.timeout_secs);
        if let Some(site_url) = lookup("SITE_URL") {
            client.site_url = site_url;
        }
        if let Some(app_name) = lookup("APP_NAME") {
            client.app_name = app_name;
        }

        Ok(Self {
            client,
            api_key_env_var,
            api_key,
            recipes_dir: cli.recipes_dir.clone(),
        })
    }
}
