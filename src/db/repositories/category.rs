use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use crate::domain::repositories::{CategoryRepository, RepoResult, RepositoryError};
use crate::domain::{CategoryId, Page, PageRequest, parse_stored_timestamp};
use crate::entities::{categories, movies, prelude::*};
use crate::models::Category;

pub struct SeaOrmCategoryRepository {
    conn: DatabaseConnection,
}

impl SeaOrmCategoryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: categories::Model) -> Category {
        Category {
            id: Some(CategoryId::new(model.id)),
            name: model.name,
            description: model.description,
            is_active: model.is_active,
            created_at: parse_stored_timestamp(&model.created_at),
            updated_at: parse_stored_timestamp(&model.updated_at),
        }
    }

    fn active_model(category: &Category) -> categories::ActiveModel {
        categories::ActiveModel {
            id: category.id.map_or(NotSet, |id| Set(id.value())),
            name: Set(category.name.clone()),
            description: Set(category.description.clone()),
            is_active: Set(category.is_active),
            created_at: Set(category.created_at.to_rfc3339()),
            updated_at: Set(category.updated_at.to_rfc3339()),
        }
    }
}

#[async_trait]
impl CategoryRepository for SeaOrmCategoryRepository {
    async fn insert(&self, category: &Category) -> RepoResult<Category> {
        let mut active = Self::active_model(category);
        active.id = NotSet;
        let model = active.insert(&self.conn).await?;
        Ok(Self::map_model(model))
    }

    async fn update(&self, category: &Category) -> RepoResult<Category> {
        if category.id.is_none() {
            return Err(RepositoryError::Unsaved);
        }
        let model = Self::active_model(category).update(&self.conn).await?;
        Ok(Self::map_model(model))
    }

    async fn find_by_id(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        let model = Categories::find_by_id(id.value()).one(&self.conn).await?;
        Ok(model.map(Self::map_model))
    }

    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        let model = Categories::find()
            .filter(categories::Column::Name.eq(name))
            .one(&self.conn)
            .await?;
        Ok(model.map(Self::map_model))
    }

    async fn list(&self, page: PageRequest) -> RepoResult<Page<Category>> {
        let paginator = Categories::find()
            .filter(categories::Column::IsActive.eq(true))
            .order_by_asc(categories::Column::Name)
            .order_by_asc(categories::Column::Id)
            .paginate(&self.conn, page.limit());

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.page() - 1).await?;

        Ok(Page::new(
            models.into_iter().map(Self::map_model).collect(),
            total,
            page,
        ))
    }

    async fn list_all(&self) -> RepoResult<Vec<Category>> {
        let models = Categories::find()
            .order_by_asc(categories::Column::Name)
            .all(&self.conn)
            .await?;
        Ok(models.into_iter().map(Self::map_model).collect())
    }

    async fn count_active(&self) -> RepoResult<u64> {
        let total = Categories::find()
            .filter(categories::Column::IsActive.eq(true))
            .count(&self.conn)
            .await?;
        Ok(total)
    }

    async fn delete(&self, id: CategoryId, now: DateTime<Utc>) -> RepoResult<u64> {
        let txn = self.conn.begin().await?;

        let deleted = Categories::delete_by_id(id.value()).exec(&txn).await?;
        if deleted.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(0);
        }

        let orphaned = Movies::update_many()
            .col_expr(movies::Column::IsActive, Expr::value(false))
            .col_expr(movies::Column::UpdatedAt, Expr::value(now.to_rfc3339()))
            .filter(movies::Column::CategoryId.eq(id.value()))
            .filter(movies::Column::IsActive.eq(true))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        if orphaned.rows_affected > 0 {
            info!(
                category_id = %id,
                movies = orphaned.rows_affected,
                "Deactivated movies of deleted category"
            );
        }

        Ok(deleted.rows_affected)
    }
}
