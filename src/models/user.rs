use chrono::{DateTime, Datelike, NaiveDate, Utc};
use regex::Regex;
use std::sync::OnceLock;

use crate::domain::{UserId, ValidationError};
use crate::models::movie::require_url;

fn get_regex(re: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    re.get_or_init(|| Regex::new(pattern).expect("Invalid regex pattern defined in code"))
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    get_regex(
        &RE,
        r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$",
    )
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    get_regex(&RE, r"^\+?[1-9]\d{1,14}$")
}

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A registered user. `password_hash` is an Argon2 PHC string and never leaves
/// the service layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Option<UserId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub avatar: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub avatar: Option<String>,
}

impl User {
    /// # Errors
    ///
    /// Returns [`ValidationError`] for malformed names, email, phone or avatar.
    pub fn create(input: NewUser, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let user = Self {
            id: None,
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            email: normalize_email(&input.email),
            password_hash: input.password_hash,
            phone_number: input.phone_number.map(|p| normalize_phone(&p)),
            date_of_birth: input.date_of_birth,
            avatar: input.avatar,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        user.validate()?;
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns [`ValidationError`] if the patched user is invalid.
    pub fn apply(self, patch: UserPatch, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let updated = Self {
            first_name: patch
                .first_name
                .map_or(self.first_name, |n| n.trim().to_string()),
            last_name: patch
                .last_name
                .map_or(self.last_name, |n| n.trim().to_string()),
            email: patch
                .email
                .map_or(self.email, |e| normalize_email(&e)),
            password_hash: patch.password_hash.unwrap_or(self.password_hash),
            phone_number: patch
                .phone_number
                .map(|p| normalize_phone(&p))
                .or(self.phone_number),
            date_of_birth: patch.date_of_birth.or(self.date_of_birth),
            avatar: patch.avatar.or(self.avatar),
            updated_at: now,
            ..self
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

    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whole years between birth and `today`; `None` without a (past) birth date.
    #[must_use]
    pub fn age(&self, today: NaiveDate) -> Option<u32> {
        let born = self.date_of_birth?;
        let mut years = today.year() - born.year();
        if (today.month(), today.day()) < (born.month(), born.day()) {
            years -= 1;
        }
        u32::try_from(years).ok()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_name("firstName", &self.first_name)?;
        validate_name("lastName", &self.last_name)?;
        validate_email(&self.email)?;

        if self.password_hash.is_empty() {
            return Err(ValidationError::new("password", "is required"));
        }

        if let Some(phone) = &self.phone_number
            && !phone_regex().is_match(phone)
        {
            return Err(ValidationError::new(
                "phoneNumber",
                "must be a valid international phone number",
            ));
        }

        require_url("avatar", self.avatar.as_deref())
    }
}

/// # Errors
///
/// Returns [`ValidationError`] if the plain-text password is too short.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::new(
            "password",
            format!("must be at least {MIN_PASSWORD_LENGTH} characters"),
        ));
    }
    Ok(())
}

#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

fn validate_name(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if !(2..=100).contains(&len) {
        return Err(ValidationError::new(
            field,
            format!("must be between 2 and 100 characters, got {len}"),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.chars().count() > 100 || !email_regex().is_match(email) {
        return Err(ValidationError::new("email", "must be a valid email address"));
    }
    Ok(())
}
