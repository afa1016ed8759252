use super::TurnStore;
use crate::cli::Args;
use crate::models::chat::{ConversationTurn, Sender};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::MySqlPool;
use std::error::Error;

/// MySQL-backed [`TurnStore`] over a bounded connection pool.
///
/// Every query checks a connection out of the pool for its own duration, so
/// a failed request never strands a connection.
pub struct MySqlTurnStore {
    pool: MySqlPool,
}

impl MySqlTurnStore {
    pub async fn connect(args: &Args) -> Result<Self, sqlx::Error> {
        let options = MySqlConnectOptions::new()
            .host(&args.db_host)
            .port(args.db_port)
            .username(&args.db_user)
            .password(&args.db_password)
            .database(&args.db_name);

        let pool = MySqlPoolOptions::new()
            .max_connections(args.db_max_connections)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl TurnStore for MySqlTurnStore {
    async fn append_turn(
        &self,
        session_id: &str,
        sender: Sender,
        message: &str,
        image_path: Option<&str>,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        sqlx::query(
            "INSERT INTO conversations (session_id, sender, message, image_path, timestamp) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(session_id)
        .bind(sender.as_str())
        .bind(message)
        .bind(image_path)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_turns(
        &self,
        session_id: &str,
    ) -> Result<Vec<ConversationTurn>, Box<dyn Error + Send + Sync>> {
        let rows: Vec<(String, Option<String>, Option<String>, DateTime<Utc>)> = sqlx::query_as(
            "SELECT sender, message, image_path, timestamp \
             FROM conversations WHERE session_id = ? ORDER BY timestamp ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(sender, message, image_path, timestamp)| {
                let sender = sender
                    .parse::<Sender>()
                    .map_err(Box::<dyn Error + Send + Sync>::from)?;
                Ok(ConversationTurn {
                    session_id: session_id.to_string(),
                    sender,
                    message: message.unwrap_or_default(),
                    image_path,
                    timestamp,
                })
            })
            .collect()
    }
}
