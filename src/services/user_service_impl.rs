use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::repositories::{
    MovieRepository, RepositoryError, UserMovieRepository, UserRepository,
};
use crate::domain::{Clock, MovieId, Page, PageRequest, UserId};
use crate::models::user::{normalize_email, validate_password};
use crate::models::{
    NewUser, User, UserMovie, UserPatch, UserWithMovies, ViewedMovie, ViewingDetails,
};
use crate::services::password::PasswordHasher;
use crate::services::user_service::{RegisterUser, UserChanges, UserError, UserService};

const ALREADY_VIEWED: &str = "Movie already marked as viewed by this user";

pub struct DefaultUserService {
    users: Arc<dyn UserRepository>,
    movies: Arc<dyn MovieRepository>,
    user_movies: Arc<dyn UserMovieRepository>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
}

impl DefaultUserService {
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        movies: Arc<dyn MovieRepository>,
        user_movies: Arc<dyn UserMovieRepository>,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            movies,
            user_movies,
            hasher,
            clock,
        }
    }

    async fn ensure_email_free(
        &self,
        email: &str,
        owner: Option<UserId>,
    ) -> Result<(), UserError> {
        if let Some(existing) = self.users.find_by_email(email).await?
            && existing.id != owner
        {
            return Err(email_taken(email));
        }
        Ok(())
    }
}

fn email_taken(email: &str) -> UserError {
    UserError::Conflict(format!("User with email {email} already exists"))
}

fn on_unique(email: &str) -> impl FnOnce(RepositoryError) -> UserError + '_ {
    move |err| match err {
        RepositoryError::UniqueViolation(_) => email_taken(email),
        other => other.into(),
    }
}

#[async_trait]
impl UserService for DefaultUserService {
    async fn create(&self, input: RegisterUser) -> Result<User, UserError> {
        validate_password(&input.password)?;

        let email = normalize_email(&input.email);
        self.ensure_email_free(&email, None).await?;

        let password_hash = self.hasher.hash(&input.password).await?;
        let user = User::create(
            NewUser {
                first_name: input.first_name,
                last_name: input.last_name,
                email,
                password_hash,
                phone_number: input.phone_number,
                date_of_birth: input.date_of_birth,
                avatar: input.avatar,
            },
            self.clock.now(),
        )?;

        let saved = self
            .users
            .insert(&user)
            .await
            .map_err(on_unique(&user.email))?;

        if let Some(id) = saved.id {
            info!(user_id = %id, "User created");
        }
        Ok(saved)
    }

    async fn list(&self, page: PageRequest) -> Result<Page<User>, UserError> {
        Ok(self.users.list_active(page).await?)
    }

    async fn get(&self, id: UserId) -> Result<User, UserError> {
        self.users
            .find_active_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> Result<User, UserError> {
        let current = self.get(id).await?;

        let email = changes.email.as_deref().map(normalize_email);
        if let Some(email) = &email
            && *email != current.email
        {
            self.ensure_email_free(email, Some(id)).await?;
        }

        let password_hash = match &changes.password {
            Some(password) => {
                validate_password(password)?;
                Some(self.hasher.hash(password).await?)
            }
            None => None,
        };

        let updated = current.apply(
            UserPatch {
                first_name: changes.first_name,
                last_name: changes.last_name,
                email,
                password_hash,
                phone_number: changes.phone_number,
                date_of_birth: changes.date_of_birth,
                avatar: changes.avatar,
            },
            self.clock.now(),
        )?;

        let saved = self
            .users
            .update(&updated)
            .await
            .map_err(on_unique(&updated.email))?;

        info!(user_id = %id, "User updated");
        Ok(saved)
    }

    async fn delete(&self, id: UserId) -> Result<User, UserError> {
        let current = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        if current.is_active {
            self.users.deactivate(id, self.clock.now()).await?;
            info!(user_id = %id, "User deactivated");
        }

        self.users
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    async fn mark_viewed(
        &self,
        user_id: UserId,
        movie_id: MovieId,
        details: ViewingDetails,
    ) -> Result<UserMovie, UserError> {
        self.get(user_id).await?;

        if self.movies.find_active_by_id(movie_id).await?.is_none() {
            return Err(UserError::MovieNotFound(movie_id));
        }

        if self
            .user_movies
            .find_by_pair(user_id, movie_id)
            .await?
            .is_some()
        {
            return Err(UserError::Conflict(ALREADY_VIEWED.to_string()));
        }

        let record = UserMovie::create(user_id, movie_id, details, self.clock.now())?;
        let saved = self
            .user_movies
            .insert(&record)
            .await
            .map_err(|err| match err {
                RepositoryError::UniqueViolation(_) => {
                    warn!(
                        user_id = %user_id,
                        movie_id = %movie_id,
                        "Concurrent mark-viewed rejected by unique index"
                    );
                    UserError::Conflict(ALREADY_VIEWED.to_string())
                }
                other => other.into(),
            })?;

        info!(user_id = %user_id, movie_id = %movie_id, "Movie marked as viewed");
        Ok(saved)
    }

    async fn viewed_movies(
        &self,
        user_id: UserId,
        only_favorites: bool,
    ) -> Result<Vec<UserMovie>, UserError> {
        self.get(user_id).await?;

        let records = self.user_movies.list_by_user(user_id).await?;
        Ok(records
            .into_iter()
            .filter(|r| !only_favorites || r.is_favorite)
            .collect())
    }

    async fn users_with_movies(&self) -> Result<Vec<UserWithMovies>, UserError> {
        let viewed = self.user_movies.list_with_movies().await?;

        let mut by_user: HashMap<UserId, Vec<ViewedMovie>> = HashMap::new();
        for entry in viewed {
            by_user.entry(entry.record.user_id).or_default().push(entry);
        }

        let ids: Vec<UserId> = by_user.keys().copied().collect();
        let users = self.users.find_active_by_ids(&ids).await?;

        Ok(users
            .into_iter()
            .filter_map(|user| {
                let movies = by_user.remove(&user.id?)?;
                Some(UserWithMovies { user, movies })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CategoryId;
    use crate::models::movie::tests::sample_new_movie;
    use crate::models::{Category, Movie};
    use crate::services::testing::{InMemoryCatalog, test_clock, test_now};

    struct PlainHasher;

    #[async_trait]
    impl PasswordHasher for PlainHasher {
        async fn hash(&self, password: &str) -> anyhow::Result<String> {
            Ok(format!("hashed:{password}"))
        }
    }

    fn service(catalog: &InMemoryCatalog) -> DefaultUserService {
        DefaultUserService::new(
            catalog.users(),
            catalog.movies(),
            catalog.user_movies(),
            Arc::new(PlainHasher),
            test_clock(),
        )
    }

    fn registration(first_name: &str, email: &str) -> RegisterUser {
        RegisterUser {
            first_name: first_name.to_string(),
            last_name: "Gómez".to_string(),
            email: email.to_string(),
            password: "supersecret".to_string(),
            phone_number: None,
            date_of_birth: None,
            avatar: None,
        }
    }

    async fn stored_movie(catalog: &InMemoryCatalog, title: &str) -> MovieId {
        let category = catalog
            .categories()
            .insert(&Category::create(&format!("Cat {title}"), None, test_now()).unwrap())
            .await
            .unwrap();
        let mut input = sample_new_movie();
        input.title = title.to_string();
        input.category_id = category.id.unwrap_or(CategoryId::new(1));
        catalog
            .movies()
            .insert(&Movie::create(input, test_now()).unwrap())
            .await
            .unwrap()
            .id
            .unwrap()
    }

    #[tokio::test]
    async fn create_hashes_and_normalizes() {
        let catalog = InMemoryCatalog::default();
        let svc = service(&catalog);

        let user = svc
            .create(registration("Ana", " Ana@Example.COM "))
            .await
            .unwrap();
        assert_eq!(user.email, "ana@example.com");
        assert_eq!(user.password_hash, "hashed:supersecret");
    }

    #[tokio::test]
    async fn duplicate_email_conflicts_case_insensitively() {
        let catalog = InMemoryCatalog::default();
        let svc = service(&catalog);

        svc.create(registration("Ana", "ana@example.com"))
            .await
            .unwrap();
        let err = svc
            .create(registration("Otra", "ANA@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::Conflict(ref m) if m.contains("ana@example.com")));
    }

    #[tokio::test]
    async fn lost_email_race_reports_conflict() {
        let catalog = InMemoryCatalog::default();
        catalog.hide_names_from_lookup();
        let svc = service(&catalog);

        svc.create(registration("Ana", "ana@example.com"))
            .await
            .unwrap();
        let err = svc
            .create(registration("Ana", "ana@example.com"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, UserError::Conflict(ref m) if m == "User with email ana@example.com already exists")
        );
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let catalog = InMemoryCatalog::default();
        let svc = service(&catalog);

        let mut input = registration("Ana", "ana@example.com");
        input.password = "short".to_string();
        assert!(matches!(
            svc.create(input).await,
            Err(UserError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn update_rehashes_and_guards_email() {
        let catalog = InMemoryCatalog::default();
        let svc = service(&catalog);

        let ana = svc
            .create(registration("Ana", "ana@example.com"))
            .await
            .unwrap();
        svc.create(registration("Luis", "luis@example.com"))
            .await
            .unwrap();
        let id = ana.id.unwrap();

        let err = svc
            .update(
                id,
                UserChanges {
                    email: Some("luis@example.com".to_string()),
                    ..UserChanges::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::Conflict(_)));

        let updated = svc
            .update(
                id,
                UserChanges {
                    email: Some("ANA@example.com".to_string()),
                    password: Some("another-secret".to_string()),
                    ..UserChanges::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.email, "ana@example.com");
        assert_eq!(updated.password_hash, "hashed:another-secret");
    }

    #[tokio::test]
    async fn delete_is_soft_and_idempotent() {
        let catalog = InMemoryCatalog::default();
        let svc = service(&catalog);

        let id = svc
            .create(registration("Ana", "ana@example.com"))
            .await
            .unwrap()
            .id
            .unwrap();
        assert!(!svc.delete(id).await.unwrap().is_active);
        assert!(matches!(svc.get(id).await, Err(UserError::NotFound(_))));
        assert!(svc.delete(id).await.is_ok());
    }

    #[tokio::test]
    async fn marking_twice_conflicts_and_keeps_first_record() {
        let catalog = InMemoryCatalog::default();
        let svc = service(&catalog);
        let user = svc
            .create(registration("Ana", "ana@example.com"))
            .await
            .unwrap()
            .id
            .unwrap();
        let movie = stored_movie(&catalog, "Alien").await;

        let first = svc
            .mark_viewed(
                user,
                movie,
                ViewingDetails {
                    rating: Some(5),
                    ..ViewingDetails::default()
                },
            )
            .await
            .unwrap();

        let err = svc
            .mark_viewed(
                user,
                movie,
                ViewingDetails {
                    rating: Some(1),
                    ..ViewingDetails::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::Conflict(ref m) if m == ALREADY_VIEWED));

        let records = svc.viewed_movies(user, false).await.unwrap();
        assert_eq!(records, vec![first]);
        assert_eq!(records[0].rating, Some(5));
    }

    #[tokio::test]
    async fn lost_pair_race_reports_conflict() {
        let catalog = InMemoryCatalog::default();
        let svc = service(&catalog);
        let user = svc
            .create(registration("Ana", "ana@example.com"))
            .await
            .unwrap()
            .id
            .unwrap();
        let movie = stored_movie(&catalog, "Alien").await;

        svc.mark_viewed(user, movie, ViewingDetails::default())
            .await
            .unwrap();
        catalog.hide_names_from_lookup();

        let err = svc
            .mark_viewed(user, movie, ViewingDetails::default())
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::Conflict(_)));
        assert_eq!(catalog.user_movie_count(), 1);
    }

    #[tokio::test]
    async fn mark_viewed_checks_both_ids() {
        let catalog = InMemoryCatalog::default();
        let svc = service(&catalog);
        let user = svc
            .create(registration("Ana", "ana@example.com"))
            .await
            .unwrap()
            .id
            .unwrap();
        let movie = stored_movie(&catalog, "Alien").await;

        assert!(matches!(
            svc.mark_viewed(UserId::new(999), movie, ViewingDetails::default())
                .await,
            Err(UserError::NotFound(_))
        ));
        assert!(matches!(
            svc.mark_viewed(user, MovieId::new(999), ViewingDetails::default())
                .await,
            Err(UserError::MovieNotFound(_))
        ));
        assert!(matches!(
            svc.mark_viewed(
                user,
                movie,
                ViewingDetails {
                    rating: Some(6),
                    ..ViewingDetails::default()
                }
            )
            .await,
            Err(UserError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn favorites_filter() {
        let catalog = InMemoryCatalog::default();
        let svc = service(&catalog);
        let user = svc
            .create(registration("Ana", "ana@example.com"))
            .await
            .unwrap()
            .id
            .unwrap();
        let alien = stored_movie(&catalog, "Alien").await;
        let heat = stored_movie(&catalog, "Heat").await;

        svc.mark_viewed(
            user,
            alien,
            ViewingDetails {
                is_favorite: Some(true),
                ..ViewingDetails::default()
            },
        )
        .await
        .unwrap();
        svc.mark_viewed(user, heat, ViewingDetails::default())
            .await
            .unwrap();

        assert_eq!(svc.viewed_movies(user, false).await.unwrap().len(), 2);
        let favorites = svc.viewed_movies(user, true).await.unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].movie_id, alien);
    }

    #[tokio::test]
    async fn users_with_movies_groups_by_user() {
        let catalog = InMemoryCatalog::default();
        let svc = service(&catalog);
        let zoe = svc
            .create(registration("Zoe", "zoe@example.com"))
            .await
            .unwrap()
            .id
            .unwrap();
        let ana = svc
            .create(registration("Ana", "ana@example.com"))
            .await
            .unwrap()
            .id
            .unwrap();
        svc.create(registration("Idle", "idle@example.com"))
            .await
            .unwrap();
        let alien = stored_movie(&catalog, "Alien").await;
        let heat = stored_movie(&catalog, "Heat").await;

        for (user, movie) in [(zoe, alien), (ana, alien), (ana, heat)] {
            svc.mark_viewed(user, movie, ViewingDetails::default())
                .await
                .unwrap();
        }

        let report = svc.users_with_movies().await.unwrap();
        let names: Vec<&str> = report.iter().map(|u| u.user.first_name.as_str()).collect();
        assert_eq!(names, ["Ana", "Zoe"]);
        assert_eq!(report[0].movies.len(), 2);
        assert_eq!(report[1].movies[0].movie.title, "Alien");
    }
}
