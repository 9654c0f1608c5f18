//! In-memory user repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::messaging::{Destination, User};
use crate::ports::{PersistenceError, UserRepository};

/// Users keyed by phone number.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Destination, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_phone(&self, phone: &Destination) -> Result<Option<User>, PersistenceError> {
        Ok(self.users.read().await.get(phone).cloned())
    }

    async fn create(&self, user: User) -> Result<User, PersistenceError> {
        let mut users = self.users.write().await;
        Ok(users.entry(user.phone.clone()).or_insert(user).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::messaging::ConversationContext;

    #[tokio::test]
    async fn create_keeps_first_registration() {
        let repo = InMemoryUserRepository::new();
        let phone = Destination::parse("+15551234567").unwrap();

        let first = repo
            .create(User::register(phone.clone(), ConversationContext::new("c1").unwrap()))
            .await
            .unwrap();
        let second = repo
            .create(User::register(phone.clone(), ConversationContext::new("c2").unwrap()))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.conversation.as_str(), "c1");
        assert_eq!(repo.count().await, 1);
        assert_eq!(repo.find_by_phone(&phone).await.unwrap(), Some(first));
    }
}
