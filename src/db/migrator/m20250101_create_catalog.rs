use crate::entities::prelude::*;
use crate::entities::{movies, user_movies};
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Categories)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Movies)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Users)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // References users and movies, so it goes last
        manager
            .create_table(
                schema
                    .create_table_from_entity(UserMovies)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movies_title")
                    .table(Movies)
                    .col(movies::Column::Title)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movies_release_date")
                    .table(Movies)
                    .col(movies::Column::ReleaseDate)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movies_category_id")
                    .table(Movies)
                    .col(movies::Column::CategoryId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // One viewed record per (user, movie)
        manager
            .create_index(
                Index::create()
                    .name("idx_user_movies_user_movie")
                    .table(UserMovies)
                    .col(user_movies::Column::UserId)
                    .col(user_movies::Column::MovieId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserMovies).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Movies).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories).to_owned())
            .await
    }
}
