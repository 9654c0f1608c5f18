//! User Repository Port - resolves phone numbers to relay users.

use async_trait::async_trait;

use super::PersistenceError;
use crate::domain::messaging::{Destination, User};

/// Port for user lookup and registration.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds the user registered for `phone`.
    async fn find_by_phone(&self, phone: &Destination) -> Result<Option<User>, PersistenceError>;

    /// Registers `user`.
    ///
    /// If a user already exists for the same phone number the existing record
    /// is returned unchanged, so concurrent first contacts resolve to one user.
    async fn create(&self, user: User) -> Result<User, PersistenceError>;
}
