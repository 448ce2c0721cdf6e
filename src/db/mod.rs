use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::domain::repositories::{
    CategoryRepository, MovieRepository, UserMovieRepository, UserRepository,
};

pub mod migrator;
pub mod repositories;

pub use repositories::movie::movie_condition;
use repositories::{
    SeaOrmCategoryRepository, SeaOrmMovieRepository, SeaOrmUserMovieRepository,
    SeaOrmUserRepository,
};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let path_str = db_url.trim_start_matches("sqlite:");
        if !path_str.starts_with(":memory:") {
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    #[must_use]
    pub fn categories(&self) -> Arc<dyn CategoryRepository> {
        Arc::new(SeaOrmCategoryRepository::new(self.conn.clone()))
    }

    #[must_use]
    pub fn movies(&self) -> Arc<dyn MovieRepository> {
        Arc::new(SeaOrmMovieRepository::new(self.conn.clone()))
    }

    #[must_use]
    pub fn users(&self) -> Arc<dyn UserRepository> {
        Arc::new(SeaOrmUserRepository::new(self.conn.clone()))
    }

    #[must_use]
    pub fn user_movies(&self) -> Arc<dyn UserMovieRepository> {
        Arc::new(SeaOrmUserMovieRepository::new(self.conn.clone()))
    }
}
