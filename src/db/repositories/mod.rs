pub mod category;
pub mod movie;
pub mod user;
pub mod user_movie;

pub use category::SeaOrmCategoryRepository;
pub use movie::SeaOrmMovieRepository;
pub use user::SeaOrmUserRepository;
pub use user_movie::SeaOrmUserMovieRepository;

use crate::domain::repositories::{RepoResult, RepositoryError};

/// Encodes a string list as the JSON text stored in `cast`/`genres`.
fn encode_list(values: &[String]) -> RepoResult<String> {
    serde_json::to_string(values).map_err(|e| RepositoryError::Database(e.to_string()))
}

fn decode_list(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}
