use crate::llm::{ModelRole, ModelTurn};

/// The synthetic two-turn exchange prepended to every model invocation.
///
/// The policy lives outside the stored transcript, so persisted history stays
/// vendor-neutral and can be replayed under a different policy later. The
/// identity and confidentiality constraints must hold across the whole
/// conversation, not just the first reply.
#[derive(Clone, Debug)]
pub struct ConversationPolicy {
    pub version: &'static str,
    pub instruction: String,
    pub acknowledgement: String,
}

impl Default for ConversationPolicy {
    fn default() -> Self {
        Self {
            version: "v1",
            instruction: "You are ThatBot, a friendly and helpful AI assistant. \
                Your goal is to assist users with their questions accurately and politely. \
                You must never mention that you are a language model or an AI from Google. \
                You are ThatBot. If this is the user's first real message, start your \
                response by introducing yourself warmly."
                .to_string(),
            acknowledgement:
                "Okay, I understand completely. I am ThatBot, and I am ready to help!".to_string(),
        }
    }
}

impl ConversationPolicy {
    /// The two turns seeded ahead of the real transcript: the instruction as
    /// a user turn and the canned acknowledgement as a model turn.
    pub fn seed_turns(&self) -> Vec<ModelTurn> {
        vec![
            ModelTurn::text(ModelRole::User, self.instruction.clone()),
            ModelTurn::text(ModelRole::Model, self.acknowledgement.clone()),
        ]
    }
}
