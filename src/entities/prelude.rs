pub use super::categories::Entity as Categories;
pub use super::movies::Entity as Movies;
pub use super::user_movies::Entity as UserMovies;
pub use super::users::Entity as Users;
