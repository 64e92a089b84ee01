use std::path::PathBuf;

use clap::Parser;

use crate::api_connection::Provider;
use crate::storage::DEFAULT_RECIPES_DIR;

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate recipes from the ingredients you have", long_about = None)]
pub struct Cli {
    /// Text-generation service to use
    #[arg(long, value_enum, default_value_t = Provider::Gemini)]
    pub provider: Provider,

    /// Model name (defaults to the provider's free-tier model)
    #[arg(long)]
    pub model: Option<String>,

    /// Environment variable holding the API key
    #[arg(long)]
    pub api_key_env: Option<String>,

    /// Override the provider's API base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 120, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// Folder that saved recipes are written to
    #[arg(long, default_value = DEFAULT_RECIPES_DIR)]
    pub recipes_dir: PathBuf,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Comma-separated ingredients; skips the interactive prompts
    #[arg(short, long)]
    pub ingredients: Option<String>,

    /// Preferred cuisine (one-shot mode)
    #[arg(short, long, requires = "ingredients")]
    pub cuisine: Option<String>,

    /// Comma-separated dietary restrictions (one-shot mode)
    #[arg(short, long, requires = "ingredients")]
    pub diet: Option<String>,

    /// Save the recipe under this file name (one-shot mode)
    #[arg(short, long, requires = "ingredients")]
    pub save: Option<String>,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
