use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::domain::repositories::{RepoResult, RepositoryError, UserRepository};
use crate::domain::{Page, PageRequest, UserId, parse_stored_date, parse_stored_timestamp};
use crate::entities::{prelude::*, users};
use crate::models::User;

pub struct SeaOrmUserRepository {
    conn: DatabaseConnection,
}

impl SeaOrmUserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: users::Model) -> User {
        User {
            id: Some(UserId::new(model.id)),
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            password_hash: model.password_hash,
            phone_number: model.phone_number,
            date_of_birth: model.date_of_birth.as_deref().and_then(parse_stored_date),
            avatar: model.avatar,
            is_active: model.is_active,
            created_at: parse_stored_timestamp(&model.created_at),
            updated_at: parse_stored_timestamp(&model.updated_at),
        }
    }

    fn active_model(user: &User) -> users::ActiveModel {
        users::ActiveModel {
            id: user.id.map_or(NotSet, |id| Set(id.value())),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            phone_number: Set(user.phone_number.clone()),
            date_of_birth: Set(user
                .date_of_birth
                .map(|d| d.format("%Y-%m-%d").to_string())),
            avatar: Set(user.avatar.clone()),
            is_active: Set(user.is_active),
            created_at: Set(user.created_at.to_rfc3339()),
            updated_at: Set(user.updated_at.to_rfc3339()),
        }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn insert(&self, user: &User) -> RepoResult<User> {
        let mut active = Self::active_model(user);
        active.id = NotSet;
        let model = active.insert(&self.conn).await?;
        Ok(Self::map_model(model))
    }

    async fn update(&self, user: &User) -> RepoResult<User> {
        if user.id.is_none() {
            return Err(RepositoryError::Unsaved);
        }
        let mut active = Self::active_model(user);
        active.is_active = NotSet;
        let model = active.update(&self.conn).await?;
        Ok(Self::map_model(model))
    }

    async fn deactivate(&self, id: UserId, now: DateTime<Utc>) -> RepoResult<u64> {
        let result = Users::update_many()
            .col_expr(users::Column::IsActive, Expr::value(false))
            .col_expr(users::Column::UpdatedAt, Expr::value(now.to_rfc3339()))
            .filter(users::Column::Id.eq(id.value()))
            .filter(users::Column::IsActive.eq(true))
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected)
    }

    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        let model = Users::find_by_id(id.value()).one(&self.conn).await?;
        Ok(model.map(Self::map_model))
    }

    async fn find_active_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        let model = Users::find_by_id(id.value())
            .filter(users::Column::IsActive.eq(true))
            .one(&self.conn)
            .await?;
        Ok(model.map(Self::map_model))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let model = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await?;
        Ok(model.map(Self::map_model))
    }

    async fn list_active(&self, page: PageRequest) -> RepoResult<Page<User>> {
        let paginator = Users::find()
            .filter(users::Column::IsActive.eq(true))
            .order_by_desc(users::Column::CreatedAt)
            .order_by_desc(users::Column::Id)
            .paginate(&self.conn, page.limit());

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.page() - 1).await?;

        Ok(Page::new(
            models.into_iter().map(Self::map_model).collect(),
            total,
            page,
        ))
    }

    async fn find_active_by_ids(&self, ids: &[UserId]) -> RepoResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = Users::find()
            .filter(users::Column::Id.is_in(ids.iter().map(UserId::value)))
            .filter(users::Column::IsActive.eq(true))
            .order_by_asc(users::Column::FirstName)
            .order_by_asc(users::Column::Id)
            .all(&self.conn)
            .await?;
        Ok(models.into_iter().map(Self::map_model).collect())
    }
}
