use chrono::NaiveDate;

use super::ApiError;
use crate::domain::{CategoryId, MovieId, UserId};

fn validate_id(kind: &str, id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid {} ID: {}. ID must be a positive integer",
            kind, id
        )));
    }
    Ok(id)
}

pub fn validate_category_id(id: i32) -> Result<CategoryId, ApiError> {
    validate_id("category", id).map(CategoryId::new)
}

pub fn validate_movie_id(id: i32) -> Result<MovieId, ApiError> {
    validate_id("movie", id).map(MovieId::new)
}

pub fn validate_user_id(id: i32) -> Result<UserId, ApiError> {
    validate_id("user", id).map(UserId::new)
}

/// Parses a strict `YYYY-MM-DD` date.
pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        ApiError::validation(format!(
            "{}: '{}' is not a valid date (expected YYYY-MM-DD)",
            field, raw
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ids() {
        assert_eq!(validate_movie_id(1).unwrap(), MovieId::new(1));
        assert_eq!(validate_user_id(12345).unwrap(), UserId::new(12345));
        assert!(validate_category_id(0).is_err());
        assert!(validate_movie_id(-1).is_err());
    }

    #[test]
    fn test_invalid_id_message() {
        let err = validate_user_id(0).unwrap_err();
        assert!(err.to_string().contains("Invalid user ID: 0"));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("releaseDate", "2010-07-16").unwrap(),
            NaiveDate::from_ymd_opt(2010, 7, 16).unwrap()
        );
        assert!(parse_date("releaseDate", "16/07/2010").is_err());
        assert!(parse_date("releaseDate", "2010-02-30").is_err());
        assert!(parse_date("dateOfBirth", "").is_err());
    }
}
