pub mod connection;
pub mod endpoints;

pub use connection::{HttpRecipeClient, RecipeClient};
pub use endpoints::Provider;
