//! Domain primitives for the movie catalog.
//!
//! Typed identifiers follow the Newtype pattern so a `MovieId` can never be passed
//! where a `UserId` is expected. The filter/pagination engine and the repository
//! contracts live in the submodules.

pub mod filters;
pub mod pagination;
pub mod repositories;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub use filters::{MovieFilters, MovieQuery, fold_case};
pub use pagination::{Page, PageRequest};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Returns the underlying i32 value.
            #[must_use]
            pub const fn value(&self) -> i32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self::new(id)
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_i32(self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let id = i32::deserialize(deserializer)?;
                Ok(Self::new(id))
            }
        }
    };
}

entity_id!(
    /// Identifier of a persisted category.
    CategoryId
);
entity_id!(
    /// Identifier of a persisted movie.
    MovieId
);
entity_id!(
    /// Identifier of a persisted user.
    UserId
);
entity_id!(
    /// Identifier of a persisted "viewed" record.
    UserMovieId
);

/// Input rejected before it could reach storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Source of the current instant. Derived fields take `now` explicitly so they
/// stay pure; services and DTO mapping read it from here.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Parses a stored `YYYY-MM-DD` value (tolerating a trailing time part).
#[must_use]
pub fn parse_stored_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Parses a stored RFC 3339 timestamp; unreadable values fall back to the epoch.
#[must_use]
pub fn parse_stored_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_id_conversions() {
        let id = MovieId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(i32::from(id), 42);
        assert_eq!(MovieId::from(42), id);
    }

    #[test]
    fn id_serialization() {
        let id = CategoryId::new(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "7");
        let back: CategoryId = serde_json::from_str("7").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn validation_error_display() {
        let err = ValidationError::new("duration", "must be positive");
        assert_eq!(err.to_string(), "duration: must be positive");
    }

    #[test]
    fn parse_stored_date_accepts_date_and_datetime() {
        let expected = NaiveDate::from_ymd_opt(2010, 7, 16);
        assert_eq!(parse_stored_date("2010-07-16"), expected);
        assert_eq!(parse_stored_date("2010-07-16T00:00:00Z"), expected);
        assert_eq!(parse_stored_date("not-a-date"), None);
        assert_eq!(parse_stored_date(""), None);
        assert_eq!(parse_stored_date("2010-02-30"), None);
    }

    #[test]
    fn parse_stored_timestamp_falls_back_to_epoch() {
        assert_eq!(parse_stored_timestamp("garbage"), DateTime::<Utc>::default());
        let parsed = parse_stored_timestamp("2024-03-01T10:00:00+00:00");
        assert_eq!(parsed.to_rfc3339(), "2024-03-01T10:00:00+00:00");
    }

    #[test]
    fn fixed_clock_today() {
        let instant = DateTime::parse_from_rfc3339("2025-06-15T23:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let clock = FixedClock(instant);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
    }
}
