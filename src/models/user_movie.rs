use chrono::{DateTime, Utc};

use crate::domain::{MovieId, UserId, UserMovieId, ValidationError};
use crate::models::movie::Movie;
use crate::models::user::User;

/// A "viewed" record linking one user to one movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMovie {
    pub id: Option<UserMovieId>,
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub viewed_at: DateTime<Utc>,
    pub rating: Option<i32>,
    pub review: Option<String>,
    pub is_favorite: bool,
    pub watch_time: Option<i32>,
    pub completed_movie: bool,
}

/// What the viewer reports when marking a movie as seen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewingDetails {
    pub rating: Option<i32>,
    pub review: Option<String>,
    pub is_favorite: Option<bool>,
    pub watch_time: Option<i32>,
    pub completed_movie: Option<bool>,
}

impl UserMovie {
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the rating is outside 1-5 or the watch time
    /// is not positive.
    pub fn create(
        user_id: UserId,
        movie_id: MovieId,
        details: ViewingDetails,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if let Some(rating) = details.rating {
            validate_rating(rating)?;
        }

        if let Some(minutes) = details.watch_time
            && minutes <= 0
        {
            return Err(ValidationError::new(
                "watchTime",
                format!("must be a positive number of minutes, got {minutes}"),
            ));
        }

        Ok(Self {
            id: None,
            user_id,
            movie_id,
            viewed_at: now,
            rating: details.rating,
            review: details.review.filter(|r| !r.trim().is_empty()),
            is_favorite: details.is_favorite.unwrap_or(false),
            watch_time: details.watch_time,
            completed_movie: details.completed_movie.unwrap_or(true),
        })
    }

    #[must_use]
    pub fn mark_as_favorite(self) -> Self {
        Self {
            is_favorite: true,
            ..self
        }
    }

    /// Rates the movie; a missing review keeps the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `rating` is outside 1-5.
    pub fn add_rating(self, rating: i32, review: Option<String>) -> Result<Self, ValidationError> {
        validate_rating(rating)?;
        Ok(Self {
            rating: Some(rating),
            review: review.or(self.review),
            ..self
        })
    }
}

fn validate_rating(rating: i32) -> Result<(), ValidationError> {
    if !(1..=5).contains(&rating) {
        return Err(ValidationError::new(
            "rating",
            format!("must be between 1 and 5, got {rating}"),
        ));
    }
    Ok(())
}

/// A viewed record joined with the movie it points at.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewedMovie {
    pub record: UserMovie,
    pub movie: Movie,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserWithMovies {
    pub user: User,
    pub movies: Vec<ViewedMovie>,
}
