pub mod password;
pub use password::{Argon2PasswordHasher, PasswordHasher};

pub mod category_service;
pub mod category_service_impl;
pub use category_service::{CategoryError, CategoryService, CategoryStats};
pub use category_service_impl::DefaultCategoryService;

pub mod movie_service;
pub mod movie_service_impl;
pub use movie_service::{MovieError, MovieService};
pub use movie_service_impl::DefaultMovieService;

pub mod user_service;
pub mod user_service_impl;
pub use user_service::{RegisterUser, UserChanges, UserError, UserService};
pub use user_service_impl::DefaultUserService;

#[cfg(test)]
pub(crate) mod testing;
