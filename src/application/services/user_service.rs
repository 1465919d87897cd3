use crate::application::ports::repositories::UserRepository;
use crate::domain::entities::user::{User, UserDraft};
use crate::shared::error::AppError;
use std::sync::Arc;
use tracing::info;

pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Registers a profile under an externally issued id.
    pub async fn create_user(&self, user_id: &str, draft: UserDraft) -> Result<User, AppError> {
        if user_id.is_empty() {
            return Err(AppError::invalid_input("User ID cannot be empty"));
        }
        let user = User::new(user_id, draft);
        if !user.is_valid() {
            return Err(AppError::invalid_input(format!(
                "Invalid user data for ID: {user_id}"
            )));
        }
        self.users.create_user(&user).await?;
        info!(user_id = %user.user_id, "user created");
        Ok(user)
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User, AppError> {
        self.users
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("user", user_id))
    }

    /// Replaces the caller's profile fields. An absent push token in the
    /// draft keeps the stored one; clearing goes through
    /// `subscribe_notifications`.
    pub async fn update_user(&self, caller_id: &str, draft: UserDraft) -> Result<User, AppError> {
        let mut user = self.get_user(caller_id).await?;
        let kept_token = user.push_token.take();
        let draft_token = draft.push_token.clone();
        user.apply_draft(draft);
        user.push_token = draft_token.or(kept_token);
        if !user.is_valid() {
            return Err(AppError::invalid_input(format!(
                "Invalid user data for ID: {caller_id}"
            )));
        }
        self.users.update_user(&user).await?;
        Ok(user)
    }

    /// Sets or clears the caller's push token.
    pub async fn subscribe_notifications(
        &self,
        caller_id: &str,
        token: Option<String>,
    ) -> Result<(), AppError> {
        // Existence check so an unknown caller is NotFound, not a silent no-op.
        self.get_user(caller_id).await?;
        self.users.set_push_token(caller_id, token.as_deref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::user::UserGender;
    use crate::tests_support::mock_users;
    use mockall::predicate::eq;

    fn valid_draft() -> UserDraft {
        UserDraft {
            name: "Avery".to_string(),
            email: "avery@example.com".to_string(),
            gender: UserGender::Female,
            birth_day: "3".to_string(),
            birth_month: "7".to_string(),
            birth_year: "1992".to_string(),
            country: "canada".to_string(),
            region: "ontario".to_string(),
            latitude: 43.65,
            longitude: -79.38,
            push_token: None,
        }
    }

    #[tokio::test]
    async fn create_user_persists_valid_profiles() {
        let mut users = mock_users();
        users.expect_create_user().times(1).returning(|_| Ok(()));
        let service = UserService::new(Arc::new(users));

        let user = service.create_user("u1", valid_draft()).await.unwrap();
        assert_eq!(user.user_id, "u1");
    }

    #[tokio::test]
    async fn create_user_rejects_invalid_profiles_before_any_write() {
        let mut users = mock_users();
        users.expect_create_user().times(0);
        let service = UserService::new(Arc::new(users));

        let mut draft = valid_draft();
        draft.email = "nope".to_string();
        let err = service.create_user("u1", draft).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn update_keeps_existing_push_token_when_draft_has_none() {
        let mut users = mock_users();
        users.expect_get_user().with(eq("u1")).returning(|_| {
            let mut user = User::new("u1", valid_draft());
            user.push_token = Some("tok-old".to_string());
            Ok(Some(user))
        });
        users
            .expect_update_user()
            .withf(|user| user.push_token.as_deref() == Some("tok-old"))
            .times(1)
            .returning(|_| Ok(()));
        let service = UserService::new(Arc::new(users));

        let updated = service.update_user("u1", valid_draft()).await.unwrap();
        assert_eq!(updated.push_token.as_deref(), Some("tok-old"));
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let mut users = mock_users();
        users.expect_get_user().returning(|_| Ok(None));
        let service = UserService::new(Arc::new(users));

        let err = service.get_user("ghost").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = service
            .subscribe_notifications("ghost", Some("tok".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
