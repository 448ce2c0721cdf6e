use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc};

use crate::constants::catalog::{ALLOWED_RATINGS, CLASSIC_AGE_YEARS, NEW_RELEASE_WINDOW_DAYS};
use crate::constants::limits::MAX_MOVIE_DURATION_MINUTES;
use crate::domain::{CategoryId, MovieId, ValidationError};

/// A catalog movie. `id` is `None` until the repository has stored it.
///
/// `release_date` is `None` only when a stored row carried an unreadable date;
/// every movie created through [`Movie::create`] has one.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub id: Option<MovieId>,
    pub title: String,
    pub description: String,
    pub synopsis: String,
    pub release_date: Option<NaiveDate>,
    pub duration: i32,
    pub rating: String,
    pub director: String,
    pub cast: Vec<String>,
    pub genres: Vec<String>,
    pub country: String,
    pub language: String,
    pub category_id: CategoryId,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub imdb_rating: Option<f64>,
    pub poster: Option<String>,
    pub trailer: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub description: String,
    pub synopsis: String,
    pub release_date: NaiveDate,
    pub duration: i32,
    pub rating: String,
    pub director: String,
    pub cast: Vec<String>,
    pub genres: Vec<String>,
    pub country: String,
    pub language: String,
    pub category_id: CategoryId,
    pub imdb_rating: Option<f64>,
    pub poster: Option<String>,
    pub trailer: Option<String>,
}

/// Partial update. `None` keeps the current value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MoviePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub synopsis: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub duration: Option<i32>,
    pub rating: Option<String>,
    pub director: Option<String>,
    pub cast: Option<Vec<String>>,
    pub genres: Option<Vec<String>>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub category_id: Option<CategoryId>,
    pub imdb_rating: Option<f64>,
    pub poster: Option<String>,
    pub trailer: Option<String>,
}

impl Movie {
    /// Builds an unsaved, active movie.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for the first field that breaks a catalog rule.
    pub fn create(input: NewMovie, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let movie = Self {
            id: None,
            title: input.title.trim().to_string(),
            description: input.description,
            synopsis: input.synopsis,
            release_date: Some(input.release_date),
            duration: input.duration,
            rating: input.rating.trim().to_string(),
            director: input.director.trim().to_string(),
            cast: input.cast,
            genres: input.genres,
            country: input.country.trim().to_string(),
            language: input.language.trim().to_string(),
            category_id: input.category_id,
            is_active: true,
            created_at: now,
            updated_at: now,
            imdb_rating: input.imdb_rating,
            poster: input.poster,
            trailer: input.trailer,
        };
        movie.validate()?;
        Ok(movie)
    }

    /// Returns a new value with the patch applied and `updated_at` moved to `now`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the patched movie breaks a catalog rule.
    pub fn apply(self, patch: MoviePatch, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let updated = Self {
            id: self.id,
            title: patch.title.map_or(self.title, |t| t.trim().to_string()),
            description: patch.description.unwrap_or(self.description),
            synopsis: patch.synopsis.unwrap_or(self.synopsis),
            release_date: patch.release_date.or(self.release_date),
            duration: patch.duration.unwrap_or(self.duration),
            rating: patch.rating.map_or(self.rating, |r| r.trim().to_string()),
            director: patch.director.map_or(self.director, |d| d.trim().to_string()),
            cast: patch.cast.unwrap_or(self.cast),
            genres: patch.genres.unwrap_or(self.genres),
            country: patch.country.map_or(self.country, |c| c.trim().to_string()),
            language: patch.language.map_or(self.language, |l| l.trim().to_string()),
            category_id: patch.category_id.unwrap_or(self.category_id),
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: now,
            imdb_rating: patch.imdb_rating.or(self.imdb_rating),
            poster: patch.poster.or(self.poster),
            trailer: patch.trailer.or(self.trailer),
        };
        updated.validate()?;
        Ok(updated)
    }

    #[must_use]
    pub fn deactivate(self, now: DateTime<Utc>) -> Self {
        Self {
            is_active: false,
            updated_at: now,
            ..self
        }
    }

    /// `"{hours}h {minutes}m"`, e.g. 175 minutes is `"2h 55m"`.
    #[must_use]
    pub fn duration_formatted(&self) -> String {
        format!("{}h {}m", self.duration / 60, self.duration % 60)
    }

    /// Released less than 21 days before `today` (future releases count too).
    #[must_use]
    pub fn is_new_release(&self, today: NaiveDate) -> bool {
        let Some(cutoff) = today.checked_sub_signed(TimeDelta::days(NEW_RELEASE_WINDOW_DAYS))
        else {
            return false;
        };
        self.release_date.is_some_and(|date| date > cutoff)
    }

    #[must_use]
    pub fn is_classic(&self, today: NaiveDate) -> bool {
        self.release_date
            .is_some_and(|date| today.year() - date.year() >= CLASSIC_AGE_YEARS)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title, 200)?;
        require_text("description", &self.description, usize::MAX)?;
        require_text("synopsis", &self.synopsis, usize::MAX)?;
        require_text("director", &self.director, 200)?;
        require_text("country", &self.country, 100)?;
        require_text("language", &self.language, 50)?;

        if !(1..=MAX_MOVIE_DURATION_MINUTES).contains(&self.duration) {
            return Err(ValidationError::new(
                "duration",
                format!(
                    "must be between 1 and {MAX_MOVIE_DURATION_MINUTES} minutes, got {}",
                    self.duration
                ),
            ));
        }

        if !ALLOWED_RATINGS.contains(&self.rating.as_str()) {
            return Err(ValidationError::new(
                "rating",
                format!(
                    "must be one of {}, got '{}'",
                    ALLOWED_RATINGS.join(", "),
                    self.rating
                ),
            ));
        }

        require_list("cast", &self.cast)?;
        require_list("genres", &self.genres)?;

        if self.category_id.value() <= 0 {
            return Err(ValidationError::new("categoryId", "must be a positive integer"));
        }

        if let Some(score) = self.imdb_rating
            && !(score.is_finite() && (1.0..=10.0).contains(&score))
        {
            return Err(ValidationError::new(
                "imdbRating",
                format!("must be between 1 and 10, got {score}"),
            ));
        }

        require_url("poster", self.poster.as_deref())?;
        require_url("trailer", self.trailer.as_deref())?;

        Ok(())
    }
}

fn require_text(field: &'static str, value: &str, max_chars: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    if value.chars().count() > max_chars {
        return Err(ValidationError::new(
            field,
            format!("must be {max_chars} characters or less"),
        ));
    }
    Ok(())
}

fn require_list(field: &'static str, values: &[String]) -> Result<(), ValidationError> {
    if values.is_empty() {
        return Err(ValidationError::new(field, "must contain at least one entry"));
    }
    if values.iter().any(|v| v.trim().is_empty()) {
        return Err(ValidationError::new(field, "entries cannot be blank"));
    }
    Ok(())
}

pub(crate) fn require_url(field: &'static str, value: Option<&str>) -> Result<(), ValidationError> {
    let Some(raw) = value else {
        return Ok(());
    };

    if raw.chars().count() > 500 {
        return Err(ValidationError::new(field, "must be 500 characters or less"));
    }

    match url::Url::parse(raw) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(ValidationError::new(field, "must be a valid http(s) URL")),
    }
}
