use super::connection_pool::ConnectionPool;
use super::repository::Repository;
use crate::shared::error::AppError;
use async_trait::async_trait;

mod interactions;
mod items;
mod mapper;
mod offers;
mod queries;
mod users;

/// SQLite-backed implementation of every repository port. One handle, all
/// tables; the pool inside is the only shared mutable state.
pub struct SqliteRepository {
    pool: ConnectionPool,
}

impl SqliteRepository {
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn initialize(&self) -> Result<(), AppError> {
        self.pool.migrate().await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        let result = sqlx::query("SELECT 1")
            .fetch_one(self.pool.get_pool())
            .await;
        Ok(result.is_ok())
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::*;
    use crate::application::ports::repositories::{ItemRepository, UserRepository};
    use crate::domain::entities::item::{Item, ItemDraft};
    use crate::domain::entities::user::{User, UserDraft};

    pub async fn repository() -> SqliteRepository {
        let pool = ConnectionPool::from_memory()
            .await
            .expect("failed to create in-memory pool");
        pool.migrate().await.expect("migrations failed");
        SqliteRepository::new(pool)
    }

    pub async fn seed_user(repo: &SqliteRepository, user_id: &str, lat: f64, long: f64) -> User {
        let user = User::new(
            user_id,
            UserDraft {
                name: format!("user {user_id}"),
                email: format!("{user_id}@example.com"),
                country: "canada".to_string(),
                region: "ontario".to_string(),
                latitude: lat,
                longitude: long,
                ..Default::default()
            },
        );
        repo.create_user(&user).await.expect("user seeded");
        user
    }

    pub async fn seed_item(
        repo: &SqliteRepository,
        owner: &User,
        name: &str,
        min_price: i64,
    ) -> Item {
        let item = Item::new(
            owner,
            ItemDraft {
                name: name.to_string(),
                description: String::new(),
                category: crate::domain::entities::ItemCategory::Top,
                gender: crate::domain::entities::ItemGender::Unisex,
                size: "M".to_string(),
                fit: crate::domain::entities::ItemFit::Proper,
                condition: crate::domain::entities::ItemCondition::Good,
                min_price,
                images: vec!["img://0".to_string()],
                styles: vec![],
                delivery_methods: vec![crate::domain::entities::DeliveryMethod::Meetup],
                is_visible: true,
            },
        );
        repo.create_item(&item).await.expect("item seeded");
        item
    }
}
