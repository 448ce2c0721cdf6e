use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};

use super::movie::SeaOrmMovieRepository;
use crate::domain::repositories::{RepoResult, UserMovieRepository};
use crate::domain::{MovieId, UserId, UserMovieId, parse_stored_timestamp};
use crate::entities::{prelude::*, user_movies};
use crate::models::{UserMovie, ViewedMovie};

pub struct SeaOrmUserMovieRepository {
    conn: DatabaseConnection,
}

impl SeaOrmUserMovieRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: user_movies::Model) -> UserMovie {
        UserMovie {
            id: Some(UserMovieId::new(model.id)),
            user_id: UserId::new(model.user_id),
            movie_id: MovieId::new(model.movie_id),
            viewed_at: parse_stored_timestamp(&model.viewed_at),
            rating: model.rating,
            review: model.review,
            is_favorite: model.is_favorite,
            watch_time: model.watch_time,
            completed_movie: model.completed_movie,
        }
    }
}

#[async_trait]
impl UserMovieRepository for SeaOrmUserMovieRepository {
    async fn insert(&self, record: &UserMovie) -> RepoResult<UserMovie> {
        let active = user_movies::ActiveModel {
            id: NotSet,
            user_id: Set(record.user_id.value()),
            movie_id: Set(record.movie_id.value()),
            viewed_at: Set(record.viewed_at.to_rfc3339()),
            rating: Set(record.rating),
            review: Set(record.review.clone()),
            is_favorite: Set(record.is_favorite),
            watch_time: Set(record.watch_time),
            completed_movie: Set(record.completed_movie),
        };
        let model = active.insert(&self.conn).await?;
        Ok(Self::map_model(model))
    }

    async fn find_by_pair(
        &self,
        user_id: UserId,
        movie_id: MovieId,
    ) -> RepoResult<Option<UserMovie>> {
        let model = UserMovies::find()
            .filter(user_movies::Column::UserId.eq(user_id.value()))
            .filter(user_movies::Column::MovieId.eq(movie_id.value()))
            .one(&self.conn)
            .await?;
        Ok(model.map(Self::map_model))
    }

    async fn list_by_user(&self, user_id: UserId) -> RepoResult<Vec<UserMovie>> {
        let models = UserMovies::find()
            .filter(user_movies::Column::UserId.eq(user_id.value()))
            .order_by_desc(user_movies::Column::ViewedAt)
            .order_by_desc(user_movies::Column::Id)
            .all(&self.conn)
            .await?;
        Ok(models.into_iter().map(Self::map_model).collect())
    }

    async fn list_with_movies(&self) -> RepoResult<Vec<ViewedMovie>> {
        let rows = UserMovies::find()
            .find_also_related(Movies)
            .order_by_desc(user_movies::Column::ViewedAt)
            .order_by_desc(user_movies::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(record, movie)| {
                movie.map(|m| ViewedMovie {
                    record: Self::map_model(record),
                    movie: SeaOrmMovieRepository::map_model(m),
                })
            })
            .collect())
    }
}
