pub mod category;
pub mod movie;
pub mod user;
pub mod user_movie;

pub use category::{Category, CategoryPatch};
pub use movie::{Movie, MoviePatch, NewMovie};
pub use user::{NewUser, User, UserPatch};
pub use user_movie::{UserMovie, UserWithMovies, ViewedMovie, ViewingDetails};
