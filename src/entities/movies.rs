use sea_orm::entity::prelude::*;

/// `category_id` carries no FK constraint. Deleting a category deactivates its
/// movies and leaves the id in place.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Text")]
    pub synopsis: String,
    /// ISO `YYYY-MM-DD`
    pub release_date: String,
    pub duration: i32,
    pub rating: String,
    pub director: String,
    /// JSON array of actor names
    #[sea_orm(column_type = "Text")]
    pub cast: String,
    /// JSON array of genre names
    #[sea_orm(column_type = "Text")]
    pub genres: String,
    pub country: String,
    pub language: String,
    pub category_id: i32,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
    pub imdb_rating: Option<f64>,
    pub poster: Option<String>,
    pub trailer: Option<String>,
    /// Unicode lower-cased copies of title, description and director. SQLite's
    /// `LOWER()` only folds ASCII, so the search filter matches against these.
    pub search_title: String,
    #[sea_orm(column_type = "Text")]
    pub search_description: String,
    pub search_director: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_movies::Entity")]
    UserMovies,
}

impl Related<super::user_movies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserMovies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
