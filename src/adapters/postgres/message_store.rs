//! PostgreSQL implementation of MessageStore.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::foundation::{MessageId, UserId};
use crate::domain::messaging::{Destination, MessageDirection, NewMessage, StoredMessage};
use crate::ports::{MessageStore, PersistenceError};

/// Messages in the `messages` table.
#[derive(Clone)]
pub struct PostgresMessageStore {
    pool: PgPool,
}

impl PostgresMessageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for PostgresMessageStore {
    async fn record(&self, message: NewMessage) -> Result<StoredMessage, PersistenceError> {
        let stored = message.into_stored(MessageId::new(), Utc::now());

        sqlx::query(
            r#"
            INSERT INTO messages (
                id, recipient, sender, message_text, direction, user_id, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(stored.id.as_uuid())
        .bind(stored.recipient.as_str())
        .bind(stored.sender.as_str())
        .bind(&stored.text)
        .bind(stored.direction.as_str())
        .bind(stored.user_id.map(|id| *id.as_uuid()))
        .bind(stored.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| PersistenceError::database(format!("Failed to insert message: {}", e)))?;

        Ok(stored)
    }

    async fn history(
        &self,
        participant: &Destination,
        limit: u32,
    ) -> Result<Vec<StoredMessage>, PersistenceError> {
        let rows = sqlx::query(
            r#"
            SELECT id, recipient, sender, message_text, direction, user_id, created_at
            FROM messages
            WHERE recipient = $1 OR sender = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(participant.as_str())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PersistenceError::database(format!("Failed to fetch history: {}", e)))?;

        rows.into_iter().map(row_to_message).collect()
    }
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, PersistenceError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| PersistenceError::database(format!("Failed to get {}: {}", name, e)))
}

fn row_to_message(row: PgRow) -> Result<StoredMessage, PersistenceError> {
    let id: Uuid = column(&row, "id")?;
    let recipient: String = column(&row, "recipient")?;
    let sender: String = column(&row, "sender")?;
    let text: String = column(&row, "message_text")?;
    let direction: String = column(&row, "direction")?;
    let user_id: Option<Uuid> = column(&row, "user_id")?;
    let created_at: DateTime<Utc> = column(&row, "created_at")?;

    Ok(StoredMessage {
        id: MessageId::from_uuid(id),
        recipient: Destination::parse(&recipient)
            .map_err(|e| PersistenceError::corrupt(format!("recipient: {}", e)))?,
        sender: Destination::parse(&sender)
            .map_err(|e| PersistenceError::corrupt(format!("sender: {}", e)))?,
        text,
        direction: direction
            .parse::<MessageDirection>()
            .map_err(|e| PersistenceError::corrupt(format!("direction: {}", e)))?,
        user_id: user_id.map(UserId::from_uuid),
        created_at,
    })
}
