use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::constants::catalog::DEFAULT_CATEGORIES;
use crate::domain::repositories::{CategoryRepository, RepositoryError};
use crate::domain::{CategoryId, Clock, Page, PageRequest};
use crate::models::{Category, CategoryPatch};
use crate::services::category_service::{CategoryError, CategoryService, CategoryStats};

pub struct DefaultCategoryService {
    categories: Arc<dyn CategoryRepository>,
    clock: Arc<dyn Clock>,
}

impl DefaultCategoryService {
    #[must_use]
    pub fn new(categories: Arc<dyn CategoryRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { categories, clock }
    }

    async fn ensure_name_free(
        &self,
        name: &str,
        owner: Option<CategoryId>,
    ) -> Result<(), CategoryError> {
        if let Some(existing) = self.categories.find_by_name(name).await?
            && existing.id != owner
        {
            return Err(name_taken(name));
        }
        Ok(())
    }
}

fn name_taken(name: &str) -> CategoryError {
    CategoryError::Conflict(format!("Category with name '{name}' already exists"))
}

/// Maps a unique-index rejection to the same conflict the pre-check reports.
fn on_unique(name: &str) -> impl FnOnce(RepositoryError) -> CategoryError + '_ {
    move |err| match err {
        RepositoryError::UniqueViolation(_) => name_taken(name),
        other => other.into(),
    }
}

#[async_trait]
impl CategoryService for DefaultCategoryService {
    async fn create(
        &self,
        name: &str,
        description: Option<String>,
    ) -> Result<Category, CategoryError> {
        let category = Category::create(name, description, self.clock.now())?;
        self.ensure_name_free(&category.name, None).await?;

        let saved = self
            .categories
            .insert(&category)
            .await
            .map_err(on_unique(&category.name))?;

        if let Some(id) = saved.id {
            info!(category_id = %id, name = %saved.name, "Category created");
        }
        Ok(saved)
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Category>, CategoryError> {
        Ok(self.categories.list(page).await?)
    }

    async fn get(&self, id: CategoryId) -> Result<Category, CategoryError> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or(CategoryError::NotFound(id))
    }

    async fn update(
        &self,
        id: CategoryId,
        patch: CategoryPatch,
    ) -> Result<Category, CategoryError> {
        let current = self.get(id).await?;
        let updated = current.apply(patch, self.clock.now())?;
        self.ensure_name_free(&updated.name, Some(id)).await?;

        let saved = self
            .categories
            .update(&updated)
            .await
            .map_err(on_unique(&updated.name))?;

        info!(category_id = %id, "Category updated");
        Ok(saved)
    }

    async fn delete(&self, id: CategoryId) -> Result<(), CategoryError> {
        self.get(id).await?;

        let deleted = self.categories.delete(id, self.clock.now()).await?;
        if deleted == 0 {
            return Err(CategoryError::Conflict(
                "Unable to delete category".to_string(),
            ));
        }

        info!(category_id = %id, "Category deleted");
        Ok(())
    }

    async fn stats(&self) -> Result<CategoryStats, CategoryError> {
        let total = self.categories.count_active().await?;
        Ok(CategoryStats { total })
    }

    async fn list_all(&self) -> Result<Vec<Category>, CategoryError> {
        Ok(self.categories.list_all().await?)
    }

    async fn seed_defaults(&self) -> Result<usize, CategoryError> {
        let mut inserted = 0;

        for (name, description) in DEFAULT_CATEGORIES {
            if self.categories.find_by_name(name).await?.is_some() {
                continue;
            }

            let category =
                Category::create(name, Some((*description).to_string()), self.clock.now())?;
            match self.categories.insert(&category).await {
                Ok(_) => inserted += 1,
                // Another process seeded it between the lookup and the insert
                Err(RepositoryError::UniqueViolation(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }

        if inserted > 0 {
            info!(count = inserted, "Seeded default categories");
        }
        Ok(inserted)
    }
}
