//! PostgreSQL implementation of UserRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::foundation::UserId;
use crate::domain::messaging::{ConversationContext, Destination, User};
use crate::ports::{PersistenceError, UserRepository};

/// Users in the `users` table, unique by `phone_number`.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_phone(&self, phone: &Destination) -> Result<Option<User>, PersistenceError> {
        let row = sqlx::query(
            r#"
            SELECT id, phone_number, conversation_id, created_at
            FROM users
            WHERE phone_number = $1
            "#,
        )
        .bind(phone.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PersistenceError::database(format!("Failed to fetch user: {}", e)))?;

        row.map(row_to_user).transpose()
    }

    async fn create(&self, user: User) -> Result<User, PersistenceError> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let row = sqlx::query(
            r#"
            INSERT INTO users (id, phone_number, conversation_id, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (phone_number) DO UPDATE SET phone_number = EXCLUDED.phone_number
            RETURNING id, phone_number, conversation_id, created_at
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(user.phone.as_str())
        .bind(user.conversation.as_str())
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PersistenceError::database(format!("Failed to insert user: {}", e)))?;

        row_to_user(row)
    }
}

fn row_to_user(row: PgRow) -> Result<User, PersistenceError> {
    let id: Uuid = row
        .try_get("id")
        .map_err(|e| PersistenceError::database(format!("Failed to get id: {}", e)))?;
    let phone: String = row
        .try_get("phone_number")
        .map_err(|e| PersistenceError::database(format!("Failed to get phone_number: {}", e)))?;
    let conversation: String = row
        .try_get("conversation_id")
        .map_err(|e| PersistenceError::database(format!("Failed to get conversation_id: {}", e)))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| PersistenceError::database(format!("Failed to get created_at: {}", e)))?;

    Ok(User {
        id: UserId::from_uuid(id),
        phone: Destination::parse(&phone)
            .map_err(|e| PersistenceError::corrupt(format!("phone_number: {}", e)))?,
        conversation: ConversationContext::new(conversation)
            .map_err(|e| PersistenceError::corrupt(format!("conversation_id: {}", e)))?,
        created_at,
    })
}
