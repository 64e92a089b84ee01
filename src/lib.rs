pub mod api_connection;
pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod prompt_builder;
pub mod recipe;
pub mod session;
pub mod storage;

pub use error::RecipeError;
pub use recipe::{RecipeRequest, RecipeResponse};
