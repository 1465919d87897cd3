use crate::application::ports::notifications::{PushMessage, PushSender};
use crate::application::ports::repositories::UserRepository;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Resolves a target user to their push token and hands the message to the
/// sender. Delivery is best-effort: `notify_later` enqueues a task after the
/// caller's transaction has committed and never feeds back into it.
pub struct NotificationService {
    users: Arc<dyn UserRepository>,
    sender: Arc<dyn PushSender>,
    timeout: Duration,
}

impl NotificationService {
    pub fn new(users: Arc<dyn UserRepository>, sender: Arc<dyn PushSender>, timeout: Duration) -> Self {
        Self {
            users,
            sender,
            timeout,
        }
    }

    /// Fire-and-forget dispatch, bounded by the configured timeout.
    pub fn notify_later(&self, target_user_id: &str, message: String, image_url: Option<String>) {
        let users = Arc::clone(&self.users);
        let sender = Arc::clone(&self.sender);
        let timeout = self.timeout;
        let target = target_user_id.to_string();

        tokio::spawn(async move {
            let service = NotificationService {
                users,
                sender,
                timeout,
            };
            service.notify_now(&target, message, image_url).await;
        });
    }

    /// The delivery itself. Failures are logged and swallowed; a missing
    /// user or absent token is a silent skip.
    pub async fn notify_now(&self, target_user_id: &str, message: String, image_url: Option<String>) {
        let user = match self.users.get_user(target_user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                debug!(user_id = %target_user_id, "push skipped: unknown user");
                return;
            }
            Err(err) => {
                warn!(user_id = %target_user_id, error = %err, "push skipped: user lookup failed");
                return;
            }
        };
        let Some(token) = user.push_token else {
            debug!(user_id = %target_user_id, "push skipped: no token");
            return;
        };

        let push = PushMessage {
            token,
            message,
            image_url,
        };
        match tokio::time::timeout(self.timeout, self.sender.send(&push)).await {
            Ok(Ok(())) => debug!(user_id = %target_user_id, "push delivered"),
            Ok(Err(err)) => warn!(user_id = %target_user_id, error = %err, "push delivery failed"),
            Err(_) => warn!(user_id = %target_user_id, "push delivery timed out"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::user::{User, UserDraft};
    use crate::shared::error::AppError;
    use crate::tests_support::mock_users;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingSender {
        sent: Mutex<Vec<PushMessage>>,
    }

    #[async_trait]
    impl PushSender for RecordingSender {
        async fn send(&self, message: &PushMessage) -> Result<(), AppError> {
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    fn user_with_token(token: Option<&str>) -> User {
        let mut user = User::new("target", UserDraft::default());
        user.push_token = token.map(str::to_string);
        user
    }

    #[tokio::test]
    async fn delivers_when_token_present() {
        let mut users = mock_users();
        users
            .expect_get_user()
            .returning(|_| Ok(Some(user_with_token(Some("tok-1")))));
        let sender = Arc::new(RecordingSender {
            sent: Mutex::new(Vec::new()),
        });
        let service = NotificationService::new(
            Arc::new(users),
            sender.clone(),
            Duration::from_secs(1),
        );

        service
            .notify_now("target", "hello".to_string(), None)
            .await;

        let sent = sender.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].token, "tok-1");
        assert_eq!(sent[0].message, "hello");
    }

    #[tokio::test]
    async fn skips_without_token_or_user() {
        let mut users = mock_users();
        users
            .expect_get_user()
            .returning(|id| match id {
                "target" => Ok(Some(user_with_token(None))),
                _ => Ok(None),
            });
        let sender = Arc::new(RecordingSender {
            sent: Mutex::new(Vec::new()),
        });
        let service = NotificationService::new(
            Arc::new(users),
            sender.clone(),
            Duration::from_secs(1),
        );

        service.notify_now("target", "a".to_string(), None).await;
        service.notify_now("ghost", "b".to_string(), None).await;

        assert!(sender.sent.lock().unwrap().is_empty());
    }
}
