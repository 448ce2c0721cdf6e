//! Movie listing filters.
//!
//! [`MovieFilters`] is what arrives from the query string: everything optional and
//! loosely typed. [`MovieFilters::into_query`] turns it into a [`MovieQuery`] whose
//! fields are validated and normalized, so the storage translation and the
//! in-memory predicate below can trust them.
//!
//! All supplied criteria must hold at once (logical AND).

use serde::Deserialize;

use super::{CategoryId, PageRequest, ValidationError};
use crate::models::Movie;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieFilters {
    pub search: Option<String>,
    pub category_id: Option<i64>,
    pub genre: Option<String>,
    pub year: Option<i64>,
    pub rating: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MovieQuery {
    /// Trimmed free text, matched case-insensitively against title, description
    /// and director.
    pub search: Option<String>,
    pub category_id: Option<CategoryId>,
    /// Exact element of the movie's genre list.
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<String>,
    pub page: PageRequest,
}

impl MovieFilters {
    /// # Errors
    ///
    /// Returns [`ValidationError`] for a non-positive category, a year outside
    /// 1..=9999, or an invalid page/limit.
    pub fn into_query(self) -> Result<MovieQuery, ValidationError> {
        let page = PageRequest::new(self.page, self.limit)?;

        let category_id = match self.category_id {
            None => None,
            Some(id) if id >= 1 => {
                let id = i32::try_from(id)
                    .map_err(|_| ValidationError::new("categoryId", "is out of range"))?;
                Some(CategoryId::new(id))
            }
            Some(id) => {
                return Err(ValidationError::new(
                    "categoryId",
                    format!("must be a positive integer, got {id}"),
                ));
            }
        };

        let year = match self.year {
            None => None,
            Some(y) if (1..=9999).contains(&y) => i32::try_from(y).ok(),
            Some(y) => {
                return Err(ValidationError::new(
                    "year",
                    format!("must be between 1 and 9999, got {y}"),
                ));
            }
        };

        Ok(MovieQuery {
            search: non_blank(self.search),
            category_id,
            genre: non_blank(self.genre),
            year,
            rating: non_blank(self.rating),
            page,
        })
    }
}

impl MovieQuery {
    /// Lower-cased search needle, ready for a `LIKE` pattern.
    #[must_use]
    pub fn search_needle(&self) -> Option<String> {
        self.search.as_deref().map(fold_case)
    }

    /// Inclusive ISO date bounds of the requested release year.
    #[must_use]
    pub fn year_bounds(&self) -> Option<(String, String)> {
        self.year
            .map(|y| (format!("{y:04}-01-01"), format!("{y:04}-12-31")))
    }

    /// In-memory form of the filter, same semantics as the storage query.
    /// Inactive movies never match.
    #[must_use]
    pub fn matches(&self, movie: &Movie) -> bool {
        use chrono::Datelike;

        if !movie.is_active {
            return false;
        }

        if let Some(needle) = self.search_needle() {
            let hit = [&movie.title, &movie.description, &movie.director]
                .iter()
                .any(|field| fold_case(field).contains(&needle));
            if !hit {
                return false;
            }
        }

        if let Some(category_id) = self.category_id
            && movie.category_id != category_id
        {
            return false;
        }

        if let Some(genre) = &self.genre
            && !movie.genres.iter().any(|g| g == genre)
        {
            return false;
        }

        if let Some(year) = self.year
            && movie.release_date.is_none_or(|d| d.year() != year)
        {
            return false;
        }

        if let Some(rating) = &self.rating
            && &movie.rating != rating
        {
            return false;
        }

        true
    }
}

/// Unicode lower-casing used on both sides of a search. The stored search
/// columns hold the same folding, so `É` and `é` match in SQLite too.
#[must_use]
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
