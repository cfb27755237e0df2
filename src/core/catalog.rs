use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading a catalog file
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Named group of prompts, in display order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub prompts: Vec<String>,
}

/// Read-only question catalog
///
/// The engine only uses it to suggest prompts. Submitted cards are never
/// checked against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: Vec<Category>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Parse a catalog from TOML (`[[categories]]` tables with `name` and `prompts`)
    pub fn from_toml_str(source: &str) -> Result<Self, CatalogError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn total_prompts(&self) -> usize {
        self.categories.iter().map(|c| c.prompts.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_prompts() == 0
    }

    /// Prompt at a cursor position, if that position holds one
    pub fn prompt_at(&self, cursor: &CatalogCursor) -> Option<&str> {
        self.categories
            .get(cursor.category)
            .and_then(|c| c.prompts.get(cursor.index))
            .map(String::as_str)
    }

    /// Cursor positioned on the first prompt of the first non-empty category
    pub fn cursor(&self) -> CatalogCursor {
        let mut cursor = CatalogCursor::default();
        cursor.settle(self);
        cursor
    }
}

impl Default for Catalog {
    fn default() -> Self {
        fn category(name: &str, prompts: &[&str]) -> Category {
            Category {
                name: name.to_string(),
                prompts: prompts.iter().map(|p| p.to_string()).collect(),
            }
        }

        Self::new(vec![
            category(
                "values",
                &[
                    "What do you value most in a relationship?",
                    "How do you handle conflicts?",
                    "What's your ideal way of spending quality time together?",
                    "How important is family to you?",
                    "What are your deal-breakers in a relationship?",
                ],
            ),
            category(
                "hobbies",
                &[
                    "What's your favorite weekend activity?",
                    "Do you enjoy traveling? Where would you like to go?",
                    "What kind of music do you listen to?",
                    "Are you into sports or fitness?",
                    "What's your favorite way to relax?",
                ],
            ),
            category(
                "goals",
                &[
                    "Where do you see yourself in 5 years?",
                    "What are your career aspirations?",
                    "Do you want to have children?",
                    "What's your ideal living situation?",
                    "What are your financial goals?",
                ],
            ),
            category(
                "fun",
                &[
                    "What's the weirdest food you've ever tried?",
                    "If you could have any superpower, what would it be?",
                    "What's your guilty pleasure?",
                    "What's the most embarrassing thing that's happened to you?",
                    "What's your favorite dad joke?",
                ],
            ),
        ])
    }
}

/// Round-robin position in a [`Catalog`]
///
/// Walks each category in order, then moves to the next category, wrapping
/// around forever. Empty categories are skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogCursor {
    category: usize,
    index: usize,
}

impl CatalogCursor {
    pub fn category(&self) -> usize {
        self.category
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Move to the next prompt
    pub fn advance(&mut self, catalog: &Catalog) {
        if catalog.is_empty() {
            return;
        }
        self.index += 1;
        self.settle(catalog);
    }

    // Roll over exhausted or empty categories until the cursor points at a prompt
    fn settle(&mut self, catalog: &Catalog) {
        if catalog.is_empty() {
            *self = Self::default();
            return;
        }
        let count = catalog.categories.len();
        self.category %= count;
        while self.index >= catalog.categories[self.category].prompts.len() {
            self.index = 0;
            self.category = (self.category + 1) % count;
        }
    }
}
