mod mysql;

use crate::cli::Args;
use crate::models::chat::{ConversationTurn, Sender};
use async_trait::async_trait;
use log::info;
use std::error::Error;
use std::sync::Arc;

/// Insert-only store of conversation turns, keyed by session.
#[async_trait]
pub trait TurnStore: Send + Sync {
    /// Append one turn and commit it immediately.
    async fn append_turn(
        &self,
        session_id: &str,
        sender: Sender,
        message: &str,
        image_path: Option<&str>,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Full transcript for a session, ordered by timestamp ascending.
    async fn list_turns(
        &self,
        session_id: &str,
    ) -> Result<Vec<ConversationTurn>, Box<dyn Error + Send + Sync>>;
}

pub async fn initialize_turn_store(
    args: &Args,
) -> Result<Arc<dyn TurnStore>, Box<dyn Error + Send + Sync>> {
    info!(
        "Conversation turns will be stored in MySQL database '{}' on {}:{}",
        args.db_name, args.db_host, args.db_port
    );
    let store = mysql::MySqlTurnStore::connect(args).await?;
    Ok(Arc::new(store))
}
