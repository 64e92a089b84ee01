use anyhow::{Context, Result};
use recipe_cookbook::api_connection::HttpRecipeClient;
use recipe_cookbook::cli::{parse_args, Cli};
use recipe_cookbook::config::AppConfig;
use recipe_cookbook::console::StdConsole;
use recipe_cookbook::recipe::{split_list, RecipeRequest};
use recipe_cookbook::session::SessionController;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_config_help(config_error: &recipe_cookbook::RecipeError, cli: &Cli) {
    let env_var = cli
        .api_key_env
        .clone()
        .unwrap_or_else(|| cli.provider.default_api_key_env_var().to_string());
    eprintln!("❌ {}", config_error);
    eprintln!("\nTo fix this:");
    eprintln!("1. Get an API key from your provider (Gemini: https://aistudio.google.com/app/apikey)");
    eprintln!("2. Set it as environment variable: export {}='your_api_key_here'", env_var);
    eprintln!("3. Or add {}=your_api_key_here to a .env file in this folder", env_var);
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = parse_args();
    init_tracing(cli.verbose);

    let config = match AppConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            print_config_help(&e, &cli);
            std::process::exit(1);
        }
    };
    tracing::debug!(provider = ?config.client.provider, model = %config.client.model, "configuration loaded");

    let client = HttpRecipeClient::new(config.client.clone()).context("Failed to build HTTP client")?;
    let mut session = SessionController::new(client, config.api_key.clone(), config.recipes_dir.clone());
    let mut console = StdConsole::new();

    match &cli.ingredients {
        Some(ingredients) => {
            let request = RecipeRequest::new(
                split_list(ingredients),
                cli.cuisine.as_deref(),
                cli.diet.as_deref().map(split_list).unwrap_or_default(),
            );
            session
                .run_once(&mut console, &request, cli.save.as_deref())
                .await
                .context("Recipe generation failed")?;
        }
        None => {
            session.run(&mut console).await.context("Console session failed")?;
        }
    }

    Ok(())
}
