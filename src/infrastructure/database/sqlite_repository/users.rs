use super::mapper::map_user_row;
use super::queries::{INSERT_USER, SELECT_USER_BY_ID, SET_PUSH_TOKEN, UPDATE_USER};
use super::SqliteRepository;
use crate::application::ports::repositories::UserRepository;
use crate::domain::entities::user::User;
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Utc;

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn create_user(&self, user: &User) -> Result<(), AppError> {
        let now = Utc::now().timestamp_millis();
        sqlx::query(INSERT_USER)
            .bind(&user.user_id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(user.gender.as_str())
            .bind(&user.birth_day)
            .bind(&user.birth_month)
            .bind(&user.birth_year)
            .bind(&user.country)
            .bind(&user.region)
            .bind(user.latitude)
            .bind(user.longitude)
            .bind(user.push_token.as_deref())
            .bind(now)
            .bind(now)
            .execute(self.pool.get_pool())
            .await?;
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(SELECT_USER_BY_ID)
            .bind(user_id)
            .fetch_optional(self.pool.get_pool())
            .await?;
        match row {
            Some(row) => Ok(Some(map_user_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn update_user(&self, user: &User) -> Result<(), AppError> {
        let result = sqlx::query(UPDATE_USER)
            .bind(&user.user_id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(user.gender.as_str())
            .bind(&user.birth_day)
            .bind(&user.birth_month)
            .bind(&user.birth_year)
            .bind(&user.country)
            .bind(&user.region)
            .bind(user.latitude)
            .bind(user.longitude)
            .bind(user.push_token.as_deref())
            .bind(Utc::now().timestamp_millis())
            .execute(self.pool.get_pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("user", &user.user_id));
        }
        Ok(())
    }

    async fn set_push_token(&self, user_id: &str, token: Option<&str>) -> Result<(), AppError> {
        let result = sqlx::query(SET_PUSH_TOKEN)
            .bind(user_id)
            .bind(token)
            .bind(Utc::now().timestamp_millis())
            .execute(self.pool.get_pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("user", user_id));
        }
        Ok(())
    }
}
