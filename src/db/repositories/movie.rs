//! Movie persistence, including the storage side of the movie filter.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::sea_query::{Expr, LikeExpr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use super::{decode_list, encode_list};
use crate::domain::repositories::{MovieRepository, RepoResult, RepositoryError};
use crate::domain::{
    CategoryId, MovieId, MovieQuery, Page, fold_case, parse_stored_date, parse_stored_timestamp,
};
use crate::entities::{movies, prelude::*};
use crate::models::Movie;

/// Translates a validated [`MovieQuery`] into a `WHERE` condition over `movies`.
///
/// Mirrors [`MovieQuery::matches`]: only active rows, every supplied criterion
/// must hold.
#[must_use]
pub fn movie_condition(query: &MovieQuery) -> Condition {
    let mut condition = Condition::all().add(movies::Column::IsActive.eq(true));

    if let Some(needle) = query.search_needle() {
        let pattern = format!("%{}%", escape_like(&needle));
        condition = condition.add(
            Condition::any()
                .add(folded_like(movies::Column::SearchTitle, &pattern))
                .add(folded_like(movies::Column::SearchDescription, &pattern))
                .add(folded_like(movies::Column::SearchDirector, &pattern)),
        );
    }

    if let Some(category_id) = query.category_id {
        condition = condition.add(movies::Column::CategoryId.eq(category_id.value()));
    }

    if let Some(genre) = &query.genre {
        // Genres are stored as a JSON array; membership means one element equals the genre.
        condition = condition.add(Expr::cust_with_values(
            r#"EXISTS (SELECT 1 FROM json_each("movies"."genres") WHERE json_each.value = ?)"#,
            [genre.clone()],
        ));
    }

    if let Some((start, end)) = query.year_bounds() {
        condition = condition.add(movies::Column::ReleaseDate.between(start, end));
    }

    if let Some(rating) = &query.rating {
        condition = condition.add(movies::Column::Rating.eq(rating.as_str()));
    }

    condition
}

/// `column` already holds [`fold_case`] text, the pattern is folded the same way.
fn folded_like(column: movies::Column, pattern: &str) -> SimpleExpr {
    Expr::col((Movies, column)).like(LikeExpr::new(pattern).escape('\\'))
}

/// Escapes `LIKE` wildcards so user input only ever matches literally.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub struct SeaOrmMovieRepository {
    conn: DatabaseConnection,
}

impl SeaOrmMovieRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub(crate) fn map_model(model: movies::Model) -> Movie {
        Movie {
            id: Some(MovieId::new(model.id)),
            title: model.title,
            description: model.description,
            synopsis: model.synopsis,
            release_date: parse_stored_date(&model.release_date),
            duration: model.duration,
            rating: model.rating,
            director: model.director,
            cast: decode_list(&model.cast),
            genres: decode_list(&model.genres),
            country: model.country,
            language: model.language,
            category_id: CategoryId::new(model.category_id),
            is_active: model.is_active,
            created_at: parse_stored_timestamp(&model.created_at),
            updated_at: parse_stored_timestamp(&model.updated_at),
            imdb_rating: model.imdb_rating,
            poster: model.poster,
            trailer: model.trailer,
        }
    }

    fn active_model(movie: &Movie) -> RepoResult<movies::ActiveModel> {
        Ok(movies::ActiveModel {
            id: movie.id.map_or(NotSet, |id| Set(id.value())),
            title: Set(movie.title.clone()),
            description: Set(movie.description.clone()),
            synopsis: Set(movie.synopsis.clone()),
            release_date: Set(movie
                .release_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()),
            duration: Set(movie.duration),
            rating: Set(movie.rating.clone()),
            director: Set(movie.director.clone()),
            cast: Set(encode_list(&movie.cast)?),
            genres: Set(encode_list(&movie.genres)?),
            country: Set(movie.country.clone()),
            language: Set(movie.language.clone()),
            category_id: Set(movie.category_id.value()),
            is_active: Set(movie.is_active),
            created_at: Set(movie.created_at.to_rfc3339()),
            updated_at: Set(movie.updated_at.to_rfc3339()),
            imdb_rating: Set(movie.imdb_rating),
            poster: Set(movie.poster.clone()),
            trailer: Set(movie.trailer.clone()),
            search_title: Set(fold_case(&movie.title)),
            search_description: Set(fold_case(&movie.description)),
            search_director: Set(fold_case(&movie.director)),
        })
    }
}

#[async_trait]
impl MovieRepository for SeaOrmMovieRepository {
    async fn insert(&self, movie: &Movie) -> RepoResult<Movie> {
        let mut active = Self::active_model(movie)?;
        active.id = NotSet;
        let model = active.insert(&self.conn).await?;
        Ok(Self::map_model(model))
    }

    async fn update(&self, movie: &Movie) -> RepoResult<Movie> {
        if movie.id.is_none() {
            return Err(RepositoryError::Unsaved);
        }
        let mut active = Self::active_model(movie)?;
        active.is_active = NotSet;
        let model = active.update(&self.conn).await?;
        Ok(Self::map_model(model))
    }

    async fn deactivate(&self, id: MovieId, now: DateTime<Utc>) -> RepoResult<u64> {
        let result = Movies::update_many()
            .col_expr(movies::Column::IsActive, Expr::value(false))
            .col_expr(movies::Column::UpdatedAt, Expr::value(now.to_rfc3339()))
            .filter(movies::Column::Id.eq(id.value()))
            .filter(movies::Column::IsActive.eq(true))
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected)
    }

    async fn find_by_id(&self, id: MovieId) -> RepoResult<Option<Movie>> {
        let model = Movies::find_by_id(id.value()).one(&self.conn).await?;
        Ok(model.map(Self::map_model))
    }

    async fn find_active_by_id(&self, id: MovieId) -> RepoResult<Option<Movie>> {
        let model = Movies::find_by_id(id.value())
            .filter(movies::Column::IsActive.eq(true))
            .one(&self.conn)
            .await?;
        Ok(model.map(Self::map_model))
    }

    async fn search(&self, query: &MovieQuery) -> RepoResult<Page<Movie>> {
        let paginator = Movies::find()
            .filter(movie_condition(query))
            .order_by_desc(movies::Column::ReleaseDate)
            .order_by_desc(movies::Column::Id)
            .paginate(&self.conn, query.page.limit());

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(query.page.page() - 1).await?;

        Ok(Page::new(
            models.into_iter().map(Self::map_model).collect(),
            total,
            query.page,
        ))
    }

    async fn released_after(&self, after: NaiveDate) -> RepoResult<Vec<Movie>> {
        let models = Movies::find()
            .filter(movies::Column::IsActive.eq(true))
            .filter(movies::Column::ReleaseDate.gt(after.format("%Y-%m-%d").to_string()))
            .order_by_desc(movies::Column::ReleaseDate)
            .order_by_desc(movies::Column::Id)
            .all(&self.conn)
            .await?;
        Ok(models.into_iter().map(Self::map_model).collect())
    }
}
