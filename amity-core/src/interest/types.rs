//! Interest catalog types.

use serde::{Deserialize, Serialize};

/// Lowest allowed rating.
pub const MIN_RATING: u8 = 1;

/// Highest allowed rating.
pub const MAX_RATING: u8 = 10;

/// A rated item within an interest category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestItem {
    /// Item name, e.g. "Rust".
    pub name: String,
    /// Score in `MIN_RATING..=MAX_RATING`.
    pub rating: u8,
}

/// A category of interests with its ordered items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interest {
    /// Category name, e.g. "Programming".
    pub category: String,
    /// Items in display order.
    #[serde(default)]
    pub items: Vec<InterestItem>,
}

impl Interest {
    /// Creates an empty category.
    #[must_use]
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            items: Vec::new(),
        }
    }

    /// Adds a rated item.
    #[must_use]
    pub fn with_item(mut self, name: impl Into<String>, rating: u8) -> Self {
        self.items.push(InterestItem {
            name: name.into(),
            rating,
        });
        self
    }
}

/// Checks a whole catalog before it replaces the stored one.
///
/// Returns a human-readable reason on the first problem found.
pub(crate) fn validate_catalog(interests: &[Interest]) -> Result<(), String> {
    let mut seen = std::collections::HashSet::new();

    for interest in interests {
        let category = interest.category.trim();
        if category.is_empty() {
            return Err("Interest category must not be empty".to_string());
        }
        if !seen.insert(category.to_lowercase()) {
            return Err(format!("Duplicate interest category: {category}"));
        }

        for item in &interest.items {
            if item.name.trim().is_empty() {
                return Err(format!("Empty item name in category {category}"));
            }
            if !(MIN_RATING..=MAX_RATING).contains(&item.rating) {
                return Err(format!(
                    "Rating for {} must be between {MIN_RATING} and {MAX_RATING}, got {}",
                    item.name, item.rating
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_item_order() {
        let interest = Interest::new("Music")
            .with_item("Jazz", 9)
            .with_item("Metal", 4);

        assert_eq!(interest.category, "Music");
        assert_eq!(interest.items[0].name, "Jazz");
        assert_eq!(interest.items[1].rating, 4);
    }

    #[test]
    fn valid_catalog_passes() {
        let catalog = vec![
            Interest::new("Music").with_item("Jazz", MIN_RATING),
            Interest::new("Sports").with_item("Climbing", MAX_RATING),
            Interest::new("Empty"),
        ];
        assert!(validate_catalog(&catalog).is_ok());
    }

    #[test]
    fn rating_out_of_range_fails() {
        for rating in [0, MAX_RATING + 1] {
            let catalog = vec![Interest::new("Music").with_item("Jazz", rating)];
            assert!(validate_catalog(&catalog).is_err());
        }
    }

    #[test]
    fn duplicate_category_fails_case_insensitively() {
        let catalog = vec![Interest::new("Music"), Interest::new("music ")];
        let err = validate_catalog(&catalog).unwrap_err();
        assert!(err.contains("Duplicate"));
    }

    #[test]
    fn blank_names_fail() {
        assert!(validate_catalog(&[Interest::new("  ")]).is_err());
        assert!(validate_catalog(&[Interest::new("Music").with_item(" ", 5)]).is_err());
    }

    #[test]
    fn deserializes_without_items() {
        let interest: Interest = serde_json::from_str(r#"{"category":"Books"}"#).unwrap();
        assert!(interest.items.is_empty());
    }
}
