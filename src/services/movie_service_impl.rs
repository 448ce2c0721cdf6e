use std::sync::Arc;

use async_trait::async_trait;
use chrono::TimeDelta;
use tracing::info;

use crate::constants::catalog::NEW_RELEASE_WINDOW_DAYS;
use crate::domain::repositories::{CategoryRepository, MovieRepository};
use crate::domain::{CategoryId, Clock, MovieFilters, MovieId, Page};
use crate::models::{Category, Movie, MoviePatch, NewMovie};
use crate::services::movie_service::{MovieError, MovieService};

pub struct DefaultMovieService {
    movies: Arc<dyn MovieRepository>,
    categories: Arc<dyn CategoryRepository>,
    clock: Arc<dyn Clock>,
}

impl DefaultMovieService {
    #[must_use]
    pub fn new(
        movies: Arc<dyn MovieRepository>,
        categories: Arc<dyn CategoryRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            movies,
            categories,
            clock,
        }
    }

    async fn require_category(&self, id: CategoryId) -> Result<(), MovieError> {
        match self.categories.find_by_id(id).await? {
            Some(category) if category.is_active => Ok(()),
            _ => Err(MovieError::CategoryNotFound(id)),
        }
    }
}

#[async_trait]
impl MovieService for DefaultMovieService {
    async fn create(&self, input: NewMovie) -> Result<Movie, MovieError> {
        let movie = Movie::create(input, self.clock.now())?;
        self.require_category(movie.category_id).await?;

        let saved = self.movies.insert(&movie).await?;
        if let Some(id) = saved.id {
            info!(movie_id = %id, title = %saved.title, "Movie created");
        }
        Ok(saved)
    }

    async fn list(&self, filters: MovieFilters) -> Result<Page<Movie>, MovieError> {
        let query = filters.into_query()?;
        Ok(self.movies.search(&query).await?)
    }

    async fn get(&self, id: MovieId) -> Result<Movie, MovieError> {
        self.movies
            .find_active_by_id(id)
            .await?
            .ok_or(MovieError::NotFound(id))
    }

    async fn update(&self, id: MovieId, patch: MoviePatch) -> Result<Movie, MovieError> {
        let current = self.get(id).await?;

        if let Some(category_id) = patch.category_id
            && category_id != current.category_id
        {
            self.require_category(category_id).await?;
        }

        let updated = current.apply(patch, self.clock.now())?;
        let saved = self.movies.update(&updated).await?;

        info!(movie_id = %id, "Movie updated");
        Ok(saved)
    }

    async fn delete(&self, id: MovieId) -> Result<Movie, MovieError> {
        let current = self
            .movies
            .find_by_id(id)
            .await?
            .ok_or(MovieError::NotFound(id))?;

        if current.is_active {
            self.movies.deactivate(id, self.clock.now()).await?;
            info!(movie_id = %id, "Movie deactivated");
        }

        self.movies
            .find_by_id(id)
            .await?
            .ok_or(MovieError::NotFound(id))
    }

    async fn new_releases(&self) -> Result<Vec<Movie>, MovieError> {
        let today = self.clock.today();
        let Some(cutoff) = today.checked_sub_signed(TimeDelta::days(NEW_RELEASE_WINDOW_DAYS))
        else {
            return Ok(Vec::new());
        };
        Ok(self.movies.released_after(cutoff).await?)
    }

    async fn categories(&self) -> Result<Vec<Category>, MovieError> {
        Ok(self.categories.list_all().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::movie::tests::sample_new_movie;
    use crate::services::testing::{InMemoryCatalog, test_clock, test_now};
    use chrono::NaiveDate;

    async fn setup() -> (InMemoryCatalog, DefaultMovieService, CategoryId) {
        let catalog = InMemoryCatalog::default();
        let category = Category::create("Drama", None, test_now()).unwrap();
        let id = catalog
            .categories()
            .insert(&category)
            .await
            .unwrap()
            .id
            .unwrap();
        let svc = DefaultMovieService::new(catalog.movies(), catalog.categories(), test_clock());
        (catalog, svc, id)
    }

    fn movie_in(category: CategoryId, title: &str, released: NaiveDate) -> NewMovie {
        let mut input = sample_new_movie();
        input.title = title.to_string();
        input.category_id = category;
        input.release_date = released;
        input
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn create_requires_existing_category() {
        let (_, svc, _) = setup().await;
        let err = svc
            .create(movie_in(CategoryId::new(404), "Orphan", ymd(2020, 1, 1)))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Category with ID 404 not found");
    }

    #[tokio::test]
    async fn invalid_movie_is_rejected_before_lookup() {
        let (_, svc, category) = setup().await;
        let mut input = movie_in(category, "Too long", ymd(2020, 1, 1));
        input.duration = 601;
        assert!(matches!(
            svc.create(input).await,
            Err(MovieError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn list_is_newest_first_and_paginated() {
        let (_, svc, category) = setup().await;
        for (title, year) in [("Old", 1990), ("Mid", 2005), ("New", 2020)] {
            svc.create(movie_in(category, title, ymd(year, 1, 1)))
                .await
                .unwrap();
        }

        let page = svc
            .list(MovieFilters {
                limit: Some(2),
                ..MovieFilters::default()
            })
            .await
            .unwrap();
        let titles: Vec<&str> = page.data.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, ["New", "Mid"]);
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages, 2);
        assert!(page.has_next_page);

        let beyond = svc
            .list(MovieFilters {
                page: Some(5),
                limit: Some(2),
                ..MovieFilters::default()
            })
            .await
            .unwrap();
        assert!(beyond.data.is_empty());
        assert_eq!(beyond.total, 3);
        assert!(!beyond.has_next_page);
    }

    #[tokio::test]
    async fn invalid_filters_are_validation_errors() {
        let (_, svc, _) = setup().await;
        let err = svc
            .list(MovieFilters {
                limit: Some(101),
                ..MovieFilters::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, MovieError::Validation(ref m) if m.contains("limit")));
    }

    #[tokio::test]
    async fn delete_is_soft_and_idempotent() {
        let (_, svc, category) = setup().await;
        let id = svc
            .create(movie_in(category, "Gone", ymd(2001, 1, 1)))
            .await
            .unwrap()
            .id
            .unwrap();

        let deleted = svc.delete(id).await.unwrap();
        assert!(!deleted.is_active);
        assert!(matches!(svc.get(id).await, Err(MovieError::NotFound(_))));
        assert!(svc.delete(id).await.is_ok());
        assert!(matches!(
            svc.delete(MovieId::new(999)).await,
            Err(MovieError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn update_checks_new_category() {
        let (_, svc, category) = setup().await;
        let id = svc
            .create(movie_in(category, "Heat", ymd(1995, 12, 15)))
            .await
            .unwrap()
            .id
            .unwrap();

        let err = svc
            .update(
                id,
                MoviePatch {
                    category_id: Some(CategoryId::new(77)),
                    ..MoviePatch::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, MovieError::CategoryNotFound(_)));

        let updated = svc
            .update(
                id,
                MoviePatch {
                    duration: Some(170),
                    ..MoviePatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.duration, 170);
        assert_eq!(updated.title, "Heat");
        assert_eq!(updated.updated_at, test_now());
    }

    #[tokio::test]
    async fn new_releases_use_the_window() {
        let (_, svc, category) = setup().await;
        // clock is pinned to 2025-06-15
        svc.create(movie_in(category, "Fresh", ymd(2025, 6, 1)))
            .await
            .unwrap();
        svc.create(movie_in(category, "Stale", ymd(2025, 5, 1)))
            .await
            .unwrap();

        let titles: Vec<String> = svc
            .new_releases()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.title)
            .collect();
        assert_eq!(titles, ["Fresh"]);
    }

    #[tokio::test]
    async fn deleting_category_hides_its_movies() {
        let (catalog, svc, category) = setup().await;
        let id = svc
            .create(movie_in(category, "Filed", ymd(2010, 1, 1)))
            .await
            .unwrap()
            .id
            .unwrap();

        catalog
            .categories()
            .delete(category, test_now())
            .await
            .unwrap();
        assert!(matches!(svc.get(id).await, Err(MovieError::NotFound(_))));
    }
}
