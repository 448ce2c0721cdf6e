pub mod prelude;

pub mod categories;
pub mod movies;
pub mod user_movies;
pub mod users;
