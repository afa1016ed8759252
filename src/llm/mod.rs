pub mod gemini;

use crate::cli::Args;
use async_trait::async_trait;
use std::error::Error as StdError;
use std::sync::Arc;

/// Role of a turn as seen by the generative-language API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelRole {
    User,
    Model,
}

impl ModelRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelRole::User => "user",
            ModelRole::Model => "model",
        }
    }
}

/// One piece of a turn's content.
#[derive(Clone, Debug)]
pub enum ModelPart {
    Text(String),
    InlineImage { mime_type: String, data: Vec<u8> },
}

/// One turn of a model conversation.
#[derive(Clone, Debug)]
pub struct ModelTurn {
    pub role: ModelRole,
    pub parts: Vec<ModelPart>,
}

impl ModelTurn {
    pub fn text(role: ModelRole, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![ModelPart::Text(text.into())],
        }
    }
}

#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send `parts` as the next user turn of a conversation seeded with
    /// `context`, returning the model's text reply. The live parts are sent
    /// exactly once and never folded back into the seeded context.
    async fn reply(
        &self,
        context: &[ModelTurn],
        parts: Vec<ModelPart>,
    ) -> Result<String, Box<dyn StdError + Send + Sync>>;
}

pub fn new_model_client(
    args: &Args,
) -> Result<Arc<dyn ModelClient>, Box<dyn StdError + Send + Sync>> {
    let client = gemini::GeminiClient::from_args(args)?;
    Ok(Arc::new(client))
}
