use crate::cli::Args;
use crate::config::persona::ConversationPolicy;
use crate::error::ApiError;
use crate::history::TurnStore;
use crate::llm::{ModelClient, ModelPart, ModelRole, ModelTurn};
use crate::models::chat::{ChatReply, ConversationTurn, HistoryEntry, Sender};
use crate::uploads;
use axum::extract::{Multipart, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::info;
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

/// Collaborators for the request handlers, injected explicitly instead of
/// living in process-global state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TurnStore>,
    pub model: Arc<dyn ModelClient>,
    pub policy: ConversationPolicy,
    pub upload_dir: String,
    pub public_base_url: String,
}

impl AppState {
    pub fn new(
        store: Arc<dyn TurnStore>,
        model: Arc<dyn ModelClient>,
        policy: ConversationPolicy,
        args: &Args,
    ) -> Self {
        Self {
            store,
            model,
            policy,
            upload_dir: args.upload_dir.clone(),
            public_base_url: args.public_base_url(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/history", get(history_handler))
        .route("/chat", post(chat_handler))
        .nest_service("/uploads", ServeDir::new(&state.upload_dir))
        .layer(cors)
        .with_state(state)
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

async fn history_handler(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    let session_id = query
        .session_id
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("Session ID is required"))?;
    info!("GET /history for session '{}'", session_id);

    let turns = state
        .store
        .list_turns(&session_id)
        .await
        .map_err(ApiError::storage)?;
    info!("Found {} turns for this session.", turns.len());

    let entries = turns
        .into_iter()
        .map(|turn| history_entry(&state.public_base_url, turn))
        .collect();
    Ok(Json(entries))
}

fn history_entry(public_base: &str, turn: ConversationTurn) -> HistoryEntry {
    HistoryEntry {
        sender: turn.sender,
        text: turn.message,
        image: turn
            .image_path
            .as_deref()
            .map(|path| uploads::image_url(public_base, path)),
    }
}

struct ChatForm {
    session_id: Option<String>,
    message: String,
    file: Option<(String, Vec<u8>)>,
}

async fn read_chat_form(mut multipart: Multipart) -> Result<ChatForm, ApiError> {
    let mut form = ChatForm {
        session_id: None,
        message: String::new(),
        file: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed to read multipart field: {}", e)))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "sessionId" => {
                form.session_id = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::bad_request(e.to_string()))?,
                );
            }
            "message" => {
                form.message = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(e.to_string()))?;
            }
            "file" => {
                let name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(e.to_string()))?;
                if !bytes.is_empty() {
                    form.file = Some((name, bytes.to_vec()));
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn chat_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ChatReply>, ApiError> {
    let form = read_chat_form(multipart).await?;
    let session_id = form
        .session_id
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("Session ID is missing"))?;
    info!("POST /chat for session '{}'", session_id);

    if form.message.is_empty() && form.file.is_none() {
        return Err(ApiError::bad_request("No message or file provided"));
    }

    let image_path = match &form.file {
        Some((original, bytes)) => {
            let name = uploads::unique_upload_name(&session_id, original);
            let path = uploads::save_upload(&state.upload_dir, &name, bytes)
                .await
                .map_err(ApiError::upstream)?;
            let path = path.to_string_lossy().into_owned();
            info!("Image saved to: {}", path);
            Some(path)
        }
        None => None,
    };

    // The user turn is committed before any model work; when this fails the
    // request fails and no model call is attempted.
    state
        .store
        .append_turn(&session_id, Sender::User, &form.message, image_path.as_deref())
        .await
        .map_err(ApiError::storage)?;

    // Re-fetch the transcript, now including the turn just written. The last
    // entry is sent as the live input instead of being seeded.
    let transcript = state
        .store
        .list_turns(&session_id)
        .await
        .map_err(ApiError::storage)?;

    let mut context = state.policy.seed_turns();
    context.extend(transcript.iter().map(model_turn));
    context.pop();

    let parts = live_parts(image_path.as_deref(), &form.message).await?;
    let reply = state
        .model
        .reply(&context, parts)
        .await
        .map_err(ApiError::upstream)?;
    info!("Received reply from the model.");

    // The user turn stays persisted even when the model call above failed;
    // there is no compensating rollback.
    state
        .store
        .append_turn(&session_id, Sender::Bot, &reply, None)
        .await
        .map_err(ApiError::storage)?;

    Ok(Json(ChatReply { reply }))
}

/// Empty stored messages become empty text parts, never omitted, so the turn
/// count and role alternation stay stable under the seeded policy turns.
fn model_turn(turn: &ConversationTurn) -> ModelTurn {
    let role = match turn.sender {
        Sender::User => ModelRole::User,
        Sender::Bot => ModelRole::Model,
    };
    ModelTurn::text(role, turn.message.clone())
}

/// Live input parts: the image decoded from the stored file first, then the
/// text, each present only when the request carried it.
async fn live_parts(image_path: Option<&str>, message: &str) -> Result<Vec<ModelPart>, ApiError> {
    let mut parts = Vec::new();
    if let Some(path) = image_path {
        let data = tokio::fs::read(path).await.map_err(ApiError::upstream)?;
        parts.push(ModelPart::InlineImage {
            mime_type: uploads::mime_for_name(path).to_string(),
            data,
        });
    }
    if !message.is_empty() {
        parts.push(ModelPart::Text(message.to_string()));
    }
    Ok(parts)
}
