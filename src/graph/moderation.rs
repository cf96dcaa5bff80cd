// src/graph/moderation.rs
// Moderation step: inspect the latest turn, halt the run on unsafe user
// input, otherwise hand off to the responder. An assistant turn at the tail
// means the answer is final and the run ends here.

use tracing::{info, warn};

use crate::backend::SafetyBackend;
use crate::error::{Result, TriadError};
use crate::graph::types::{ConversationState, Message, Role, Route};

pub async fn moderate(
    safety: &dyn SafetyBackend,
    state: &mut ConversationState,
) -> Result<Route> {
    let last = state
        .last_message()
        .ok_or(TriadError::EmptyConversation)?;
    let role = last.role;
    let content = last.content.clone();

    match role {
        Role::User => {
            let classification = safety.classify(&content).await?;

            if classification.is_unsafe() {
                warn!(
                    categories = ?classification.categories,
                    "user input flagged as unsafe, halting run"
                );
                let refusal = format!(
                    "The content is not allowed based on our safety policy: {}",
                    classification.categories.join(", ")
                );
                state.messages.push(Message::assistant(refusal));
                state.allowed = false;
                state.response_generated = true;
                return Ok(Route::End);
            }

            info!("user input passed moderation");
            Ok(Route::Responder)
        }
        // Assistant turn at the tail: answer already finalized.
        Role::Assistant => Ok(Route::End),
        Role::System => Ok(Route::Responder),
    }
}
