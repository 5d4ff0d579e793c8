//! Post categories.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A content category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: String,
    pub name: String,
}

impl Category {
    /// Build a category, deriving the id from the name when none is given.
    pub fn new(id: Option<String>, name: String) -> Self {
        let id = id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Self::slugify(&name));
        Self { id, name }
    }

    /// Generate a URL-friendly slug from a category name.
    pub fn slugify(name: &str) -> String {
        name.to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '-' })
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }
}

/// Request body for creating a category.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewCategory {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

/// Request body for renaming a category.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CategoryUpdate {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(Category::slugify("Rust & Systems"), "rust-systems");
        assert_eq!(Category::slugify("  Life, Notes!  "), "life-notes");
    }

    #[test]
    fn test_explicit_id_wins() {
        let category = Category::new(Some("tech".into()), "Technology".into());
        assert_eq!(category.id, "tech");

        let category = Category::new(Some("  ".into()), "Technology".into());
        assert_eq!(category.id, "technology");
    }
}
