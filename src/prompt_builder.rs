use crate::error::Result;
use crate::recipe::RecipeRequest;

/// Turns a [`RecipeRequest`] into the single-turn instruction sent to the
/// generation API. Fields appear in a fixed order: ingredients, cuisine,
/// dietary restrictions.
pub fn build(request: &RecipeRequest) -> Result<String> {
    request.validate()?;

    let ingredients_str = request.ingredients().join(", ");
    let cuisine_str = request.cuisine().unwrap_or("Any");
    let restrictions_str = if request.dietary_restrictions().is_empty() {
        "None".to_string()
    } else {
        request
            .dietary_restrictions()
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };

    let prompt = format!(
        "Create a detailed recipe using the following ingredients: {ingredients_str}

Additional preferences:
- Cuisine type: {cuisine_str}
- Dietary restrictions: {restrictions_str}

Please provide:
1. Recipe name
2. Cooking time (prep + cook)
3. Servings
4. Complete ingredients list (including quantities and any additional ingredients needed)
5. Step-by-step cooking instructions
6. Difficulty level (Easy/Medium/Hard)
7. Nutritional highlights
8. Tips for best results

Make the recipe practical and delicious. If some common pantry staples (salt, pepper, oil, etc.) are needed but not listed, include them in the ingredients with quantities.

Format the response in a clear, organized manner.
"
    );

    tracing::debug!(chars = prompt.len(), "built recipe prompt");
    Ok(prompt)
}
