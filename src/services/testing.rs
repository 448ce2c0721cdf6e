//! In-memory repositories for service unit tests.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::repositories::{
    CategoryRepository, MovieRepository, RepoResult, RepositoryError, UserMovieRepository,
    UserRepository,
};
use crate::domain::{
    CategoryId, Clock, FixedClock, MovieId, MovieQuery, Page, PageRequest, UserId, UserMovieId,
};
use crate::models::{Category, Movie, User, UserMovie, ViewedMovie};

pub fn test_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-06-15T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

pub fn test_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(test_now()))
}

#[derive(Default)]
struct State {
    next_id: i32,
    categories: Vec<Category>,
    movies: Vec<Movie>,
    users: Vec<User>,
    user_movies: Vec<UserMovie>,
    /// Lookups pretend the row is not there, as if a concurrent insert won
    /// the race after the service's pre-check.
    stale_lookups: bool,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Shared state behind all four repository traits; clones see the same rows.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    state: Arc<Mutex<State>>,
}

impl InMemoryCatalog {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn categories(&self) -> Arc<dyn CategoryRepository> {
        Arc::new(self.clone())
    }

    pub fn movies(&self) -> Arc<dyn MovieRepository> {
        Arc::new(self.clone())
    }

    pub fn users(&self) -> Arc<dyn UserRepository> {
        Arc::new(self.clone())
    }

    pub fn user_movies(&self) -> Arc<dyn UserMovieRepository> {
        Arc::new(self.clone())
    }

    /// Makes name, email and pair lookups miss so only the unique checks on
    /// insert catch duplicates.
    pub fn hide_names_from_lookup(&self) {
        self.lock().stale_lookups = true;
    }

    pub fn user_movie_count(&self) -> usize {
        self.lock().user_movies.len()
    }
}

fn duplicate(what: &str) -> RepositoryError {
    RepositoryError::UniqueViolation(format!("UNIQUE constraint failed: {what}"))
}

#[async_trait]
impl CategoryRepository for InMemoryCatalog {
    async fn insert(&self, category: &Category) -> RepoResult<Category> {
        let mut state = self.lock();
        if state.categories.iter().any(|c| c.name == category.name) {
            return Err(duplicate("categories.name"));
        }
        let saved = Category {
            id: Some(CategoryId::new(state.next_id())),
            ..category.clone()
        };
        state.categories.push(saved.clone());
        Ok(saved)
    }

    async fn update(&self, category: &Category) -> RepoResult<Category> {
        let mut state = self.lock();
        if state
            .categories
            .iter()
            .any(|c| c.name == category.name && c.id != category.id)
        {
            return Err(duplicate("categories.name"));
        }
        let slot = state
            .categories
            .iter_mut()
            .find(|c| c.id.is_some() && c.id == category.id)
            .ok_or(RepositoryError::Unsaved)?;
        *slot = category.clone();
        Ok(category.clone())
    }

    async fn find_by_id(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        Ok(self
            .lock()
            .categories
            .iter()
            .find(|c| c.id == Some(id))
            .cloned())
    }

    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        let state = self.lock();
        if state.stale_lookups {
            return Ok(None);
        }
        Ok(state.categories.iter().find(|c| c.name == name).cloned())
    }

    async fn list(&self, page: PageRequest) -> RepoResult<Page<Category>> {
        let mut items: Vec<Category> = self
            .lock()
            .categories
            .iter()
            .filter(|c| c.is_active)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Page::from_items(items, page))
    }

    async fn list_all(&self) -> RepoResult<Vec<Category>> {
        let mut items = self.lock().categories.clone();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    async fn count_active(&self) -> RepoResult<u64> {
        Ok(self.lock().categories.iter().filter(|c| c.is_active).count() as u64)
    }

    async fn delete(&self, id: CategoryId, now: DateTime<Utc>) -> RepoResult<u64> {
        let mut state = self.lock();
        let before = state.categories.len();
        state.categories.retain(|c| c.id != Some(id));
        if state.categories.len() == before {
            return Ok(0);
        }
        for movie in state
            .movies
            .iter_mut()
            .filter(|m| m.category_id == id && m.is_active)
        {
            *movie = movie.clone().deactivate(now);
        }
        Ok(1)
    }
}

#[async_trait]
impl MovieRepository for InMemoryCatalog {
    async fn insert(&self, movie: &Movie) -> RepoResult<Movie> {
        let mut state = self.lock();
        let saved = Movie {
            id: Some(MovieId::new(state.next_id())),
            ..movie.clone()
        };
        state.movies.push(saved.clone());
        Ok(saved)
    }

    async fn update(&self, movie: &Movie) -> RepoResult<Movie> {
        let mut state = self.lock();
        let slot = state
            .movies
            .iter_mut()
            .find(|m| m.id.is_some() && m.id == movie.id)
            .ok_or(RepositoryError::Unsaved)?;
        *slot = Movie {
            is_active: slot.is_active,
            ..movie.clone()
        };
        Ok(slot.clone())
    }

    async fn deactivate(&self, id: MovieId, now: DateTime<Utc>) -> RepoResult<u64> {
        let mut state = self.lock();
        let Some(slot) = state
            .movies
            .iter_mut()
            .find(|m| m.id == Some(id) && m.is_active)
        else {
            return Ok(0);
        };
        *slot = slot.clone().deactivate(now);
        Ok(1)
    }

    async fn find_by_id(&self, id: MovieId) -> RepoResult<Option<Movie>> {
        Ok(self.lock().movies.iter().find(|m| m.id == Some(id)).cloned())
    }

    async fn find_active_by_id(&self, id: MovieId) -> RepoResult<Option<Movie>> {
        Ok(self
            .lock()
            .movies
            .iter()
            .find(|m| m.id == Some(id) && m.is_active)
            .cloned())
    }

    async fn search(&self, query: &MovieQuery) -> RepoResult<Page<Movie>> {
        let mut items: Vec<Movie> = self
            .lock()
            .movies
            .iter()
            .filter(|m| query.matches(m))
            .cloned()
            .collect();
        items.sort_by(|a, b| (b.release_date, b.id).cmp(&(a.release_date, a.id)));
        Ok(Page::from_items(items, query.page))
    }

    async fn released_after(&self, after: NaiveDate) -> RepoResult<Vec<Movie>> {
        let mut items: Vec<Movie> = self
            .lock()
            .movies
            .iter()
            .filter(|m| m.is_active && m.release_date.is_some_and(|d| d > after))
            .cloned()
            .collect();
        items.sort_by(|a, b| (b.release_date, b.id).cmp(&(a.release_date, a.id)));
        Ok(items)
    }
}

#[async_trait]
impl UserRepository for InMemoryCatalog {
    async fn insert(&self, user: &User) -> RepoResult<User> {
        let mut state = self.lock();
        if state.users.iter().any(|u| u.email == user.email) {
            return Err(duplicate("users.email"));
        }
        let saved = User {
            id: Some(UserId::new(state.next_id())),
            ..user.clone()
        };
        state.users.push(saved.clone());
        Ok(saved)
    }

    async fn update(&self, user: &User) -> RepoResult<User> {
        let mut state = self.lock();
        if state
            .users
            .iter()
            .any(|u| u.email == user.email && u.id != user.id)
        {
            return Err(duplicate("users.email"));
        }
        let slot = state
            .users
            .iter_mut()
            .find(|u| u.id.is_some() && u.id == user.id)
            .ok_or(RepositoryError::Unsaved)?;
        *slot = User {
            is_active: slot.is_active,
            ..user.clone()
        };
        Ok(slot.clone())
    }

    async fn deactivate(&self, id: UserId, now: DateTime<Utc>) -> RepoResult<u64> {
        let mut state = self.lock();
        let Some(slot) = state
            .users
            .iter_mut()
            .find(|u| u.id == Some(id) && u.is_active)
        else {
            return Ok(0);
        };
        *slot = slot.clone().deactivate(now);
        Ok(1)
    }

    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.id == Some(id)).cloned())
    }

    async fn find_active_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.id == Some(id) && u.is_active)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let state = self.lock();
        if state.stale_lookups {
            return Ok(None);
        }
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_active(&self, page: PageRequest) -> RepoResult<Page<User>> {
        let mut items: Vec<User> = self
            .lock()
            .users
            .iter()
            .filter(|u| u.is_active)
            .cloned()
            .collect();
        items.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(Page::from_items(items, page))
    }

    async fn find_active_by_ids(&self, ids: &[UserId]) -> RepoResult<Vec<User>> {
        let mut items: Vec<User> = self
            .lock()
            .users
            .iter()
            .filter(|u| u.is_active && u.id.is_some_and(|id| ids.contains(&id)))
            .cloned()
            .collect();
        items.sort_by(|a, b| (&a.first_name, a.id).cmp(&(&b.first_name, b.id)));
        Ok(items)
    }
}

#[async_trait]
impl UserMovieRepository for InMemoryCatalog {
    async fn insert(&self, record: &UserMovie) -> RepoResult<UserMovie> {
        let mut state = self.lock();
        if state
            .user_movies
            .iter()
            .any(|r| r.user_id == record.user_id && r.movie_id == record.movie_id)
        {
            return Err(duplicate("user_movies.user_id, user_movies.movie_id"));
        }
        let saved = UserMovie {
            id: Some(UserMovieId::new(state.next_id())),
            ..record.clone()
        };
        state.user_movies.push(saved.clone());
        Ok(saved)
    }

    async fn find_by_pair(
        &self,
        user_id: UserId,
        movie_id: MovieId,
    ) -> RepoResult<Option<UserMovie>> {
        let state = self.lock();
        if state.stale_lookups {
            return Ok(None);
        }
        Ok(state
            .user_movies
            .iter()
            .find(|r| r.user_id == user_id && r.movie_id == movie_id)
            .cloned())
    }

    async fn list_by_user(&self, user_id: UserId) -> RepoResult<Vec<UserMovie>> {
        let mut items: Vec<UserMovie> = self
            .lock()
            .user_movies
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| (b.viewed_at, b.id).cmp(&(a.viewed_at, a.id)));
        Ok(items)
    }

    async fn list_with_movies(&self) -> RepoResult<Vec<ViewedMovie>> {
        let state = self.lock();
        let mut items: Vec<ViewedMovie> = state
            .user_movies
            .iter()
            .filter_map(|record| {
                state
                    .movies
                    .iter()
                    .find(|m| m.id == Some(record.movie_id))
                    .map(|movie| ViewedMovie {
                        record: record.clone(),
                        movie: movie.clone(),
                    })
            })
            .collect();
        items.sort_by(|a, b| {
            (b.record.viewed_at, b.record.id).cmp(&(a.record.viewed_at, a.record.id))
        });
        Ok(items)
    }
}
