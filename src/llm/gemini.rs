use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use log::info;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;

use super::{ModelClient, ModelPart, ModelTurn};
use crate::cli::Args;

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Serialize)]
struct GeminiContent {
    role: &'static str,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum GeminiPart {
    Text { text: String },
    Inline { inline_data: GeminiInlineData },
}

#[derive(Serialize)]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiReplyContent,
}

#[derive(Deserialize)]
struct GeminiReplyContent {
    #[serde(default)]
    parts: Vec<GeminiReplyPart>,
}

#[derive(Deserialize)]
struct GeminiReplyPart {
    #[serde(default)]
    text: Option<String>,
}

fn encode_part(part: &ModelPart) -> GeminiPart {
    match part {
        ModelPart::Text(text) => GeminiPart::Text { text: text.clone() },
        ModelPart::InlineImage { mime_type, data } => GeminiPart::Inline {
            inline_data: GeminiInlineData {
                mime_type: mime_type.clone(),
                data: BASE64.encode(data),
            },
        },
    }
}

fn encode_turn(turn: &ModelTurn) -> GeminiContent {
    GeminiContent {
        role: turn.role.as_str(),
        parts: turn.parts.iter().map(encode_part).collect(),
    }
}

/// Blocking (per request) client for `models/{model}:generateContent`.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(
        api_key: String,
        model: String,
        base_url: String,
    ) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        if api_key.trim().is_empty() {
            return Err("Google API key is required for GeminiClient".into());
        }
        Ok(Self {
            http: reqwest::Client::new(),
            api_key,
            model,
            base_url,
        })
    }

    pub fn from_args(args: &Args) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        Self::new(
            args.chat_api_key.clone(),
            args.chat_model.clone(),
            args.chat_base_url.clone(),
        )
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn reply(
        &self,
        context: &[ModelTurn],
        parts: Vec<ModelPart>,
    ) -> Result<String, Box<dyn StdError + Send + Sync>> {
        let mut contents: Vec<GeminiContent> = context.iter().map(encode_turn).collect();
        contents.push(GeminiContent {
            role: "user",
            parts: parts.iter().map(encode_part).collect(),
        });

        info!(
            "GeminiClient::reply() → model={} context_turns={}",
            self.model,
            context.len()
        );

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.model,
            self.api_key
        );

        let response = self
            .http
            .post(&url)
            .json(&GenerateRequest { contents })
            .send()
            .await?
            .error_for_status()?;

        let body: GenerateResponse = response.json().await?;
        let candidate = body
            .candidates
            .into_iter()
            .next()
            .ok_or("Gemini response contained no candidates")?;

        let text: String = candidate
            .content
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ModelRole;

    #[test]
    fn request_serializes_text_and_inline_image_parts() {
        let context = vec![ModelTurn::text(ModelRole::Model, "ack")];
        let mut contents: Vec<GeminiContent> = context.iter().map(encode_turn).collect();
        contents.push(GeminiContent {
            role: "user",
            parts: vec![
                encode_part(&ModelPart::InlineImage {
                    mime_type: "image/png".to_string(),
                    data: vec![1, 2, 3],
                }),
                encode_part(&ModelPart::Text("what is this?".to_string())),
            ],
        });

        let json = serde_json::to_value(GenerateRequest { contents }).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "contents": [
                    { "role": "model", "parts": [{ "text": "ack" }] },
                    {
                        "role": "user",
                        "parts": [
                            { "inline_data": { "mime_type": "image/png", "data": "AQID" } },
                            { "text": "what is this?" }
                        ]
                    }
                ]
            })
        );
    }

    #[test]
    fn response_parsing_concatenates_candidate_text() {
        let body: GenerateResponse = serde_json::from_str(
            r#"{ "candidates": [ { "content": { "parts": [
                { "text": "Hello, " }, { "text": "I am ThatBot." }
            ] } } ] }"#,
        )
        .unwrap();
        let text: String = body.candidates[0]
            .content
            .parts
            .iter()
            .filter_map(|p| p.text.clone())
            .collect();
        assert_eq!(text, "Hello, I am ThatBot.");
    }

    #[test]
    fn empty_candidate_list_deserializes_cleanly() {
        let body: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(body.candidates.is_empty());
    }
}
