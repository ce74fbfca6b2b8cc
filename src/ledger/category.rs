use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::{Field, ValidationError};

/// Spending categories offered to the user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Transport,
    Entertainment,
    Shopping,
    Bills,
    Health,
    Education,
    #[serde(other)]
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Food,
        Category::Transport,
        Category::Entertainment,
        Category::Shopping,
        Category::Bills,
        Category::Health,
        Category::Education,
        Category::Other,
    ];

    /// Storage key, e.g. `food`.
    pub fn key(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Transport => "transport",
            Category::Entertainment => "entertainment",
            Category::Shopping => "shopping",
            Category::Bills => "bills",
            Category::Health => "health",
            Category::Education => "education",
            Category::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Food => "Food & Dining",
            Category::Transport => "Transportation",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills & Utilities",
            Category::Health => "Healthcare",
            Category::Education => "Education",
            Category::Other => "Other",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Category::Food => "🍕",
            Category::Transport => "🚗",
            Category::Entertainment => "🎬",
            Category::Shopping => "🛍️",
            Category::Bills => "💡",
            Category::Health => "🏥",
            Category::Education => "📚",
            Category::Other => "📦",
        }
    }

    /// Label shown in lists and matched by free-text search.
    pub fn display_label(&self) -> String {
        format!("{} {}", self.icon(), self.label())
    }

    /// Parses optional form input: blank text means "no category selected".
    pub fn parse_optional(raw: &str) -> Result<Option<Category>, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed.parse().map(Some)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|category| category.key() == needle)
            .ok_or_else(|| {
                ValidationError::new(Field::Category, format!("Unknown category `{}`", s.trim()))
            })
    }
}
