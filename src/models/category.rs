use chrono::{DateTime, Utc};

use crate::domain::{CategoryId, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: Option<CategoryId>,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Category {
    /// Builds an unsaved category. The name is trimmed before validation.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the name is not 2-100 characters or the
    /// description exceeds 500 characters.
    pub fn create(
        name: &str,
        description: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let category = Self {
            id: None,
            name: name.trim().to_string(),
            description: normalize_description(description),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        category.validate()?;
        Ok(category)
    }

    /// # Errors
    ///
    /// Returns [`ValidationError`] if the patched category is invalid.
    pub fn apply(self, patch: CategoryPatch, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let updated = Self {
            name: patch.name.map_or(self.name, |n| n.trim().to_string()),
            description: match patch.description {
                Some(d) => normalize_description(Some(d)),
                None => self.description,
            },
            updated_at: now,
            ..self
        };
        updated.validate()?;
        Ok(updated)
    }

    /// Name with its first letter upper-cased, e.g. `"drama"` -> `"Drama"`.
    #[must_use]
    pub fn display_name(&self) -> String {
        let mut chars = self.name.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().chain(chars).collect()
        })
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let len = self.name.chars().count();
        if !(2..=100).contains(&len) {
            return Err(ValidationError::new(
                "name",
                format!("must be between 2 and 100 characters, got {len}"),
            ));
        }

        if let Some(description) = &self.description
            && description.chars().count() > 500
        {
            return Err(ValidationError::new(
                "description",
                "must be 500 characters or less",
            ));
        }

        Ok(())
    }
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description.filter(|d| !d.trim().is_empty())
}
