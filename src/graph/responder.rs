// src/graph/responder.rs
// Responder step: generate an answer, judge whether to trust it, and request
// a retrieval round on low confidence. First matching branch wins:
//   1. snippets present      -> grounded synthesis, back to moderation
//   2. answer already final  -> no-op pass-through to moderation
//   3. first attempt         -> tentative answer + uncertainty check,
//                               possibly routing to search
//   4. otherwise             -> finalize what we have

use tracing::{debug, info};

use crate::backend::CompletionBackend;
use crate::error::Result;
use crate::graph::types::{ConversationState, Message, Route};

pub async fn respond(
    llm: &dyn CompletionBackend,
    state: &mut ConversationState,
) -> Result<Route> {
    let query = state
        .first_user_query()
        .unwrap_or_default()
        .to_string();

    // Branch 1: synthesize a grounded answer from retrieved snippets.
    if !state.web_snippets.is_empty() {
        info!(
            snippets = state.web_snippets.len(),
            "generating grounded answer from web snippets"
        );
        let answer = llm
            .complete(&grounded_prompt(&query, &state.web_snippets))
            .await?;
        state.messages.push(Message::assistant(answer));
        state.web_snippets.clear();
        state.response_generated = true;
        state.search_needed = false;
        // Canonical grounded-path behavior: re-arm the retrieval guard after
        // synthesis. response_generated short-circuits this step before it
        // could ever request a second round, so retrieval stays single-shot
        // per run. See DESIGN.md.
        state.search_attempted = false;
        return Ok(Route::Moderation);
    }

    // Branch 2: answer already finalized, nothing to do.
    if state.response_generated {
        debug!("response already generated, passing through to moderation");
        return Ok(Route::Moderation);
    }

    // Branch 3: first attempt - answer, then judge our own confidence.
    if !state.search_attempted {
        let answer = llm
            .complete(&format!("Answer the user: {query}"))
            .await?;
        state.messages.push(Message::assistant(answer.clone()));

        let uncertainty_reply = llm.complete(&uncertainty_prompt(&query, &answer)).await?;
        let uncertain = uncertainty_reply.trim().eq_ignore_ascii_case("true");
        debug!(uncertain, "uncertainty check complete");

        if uncertain && state.web_snippets.is_empty() && !state.search_attempted {
            info!("low-confidence answer, requesting web search");
            state.response_generated = false;
            state.search_needed = true;
            return Ok(Route::Search);
        }
    }

    // Branch 4: search already attempted or the answer held up.
    state.response_generated = true;
    state.search_needed = false;
    Ok(Route::Moderation)
}

fn grounded_prompt(query: &str, snippets: &[String]) -> String {
    let sources = snippets
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {}", i + 1, s))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Using the provided web snippets, attempt to answer the user's question.

Web snippets:
{sources}

User question: {query}

If the snippets contain relevant information, craft a well-structured response using them and explicitly list them as sources.

If the snippets are not relevant or do not sufficiently answer the question, state that you were unable to provide a complete answer despite reviewing them, but still mention them as sources."#
    )
}

fn uncertainty_prompt(query: &str, answer: &str) -> String {
    format!(
        r#"You are an evaluator that determines if a given response from a large language model (LLM) failed to answer the user's query.

User Query: {query}
LLM Response: {answer}

- If the response does not provide a meaningful, informative, or relevant answer to the user's query, return "true".
- If the response is a refusal due to moderation policies, return "true".
- If the response explicitly states the model's limitations without offering a useful alternative or explanation, return "true".
- If the response correctly answers the user's query or provides a reasonable alternative (such as directing the user to another source), return "false".

Output Format:
true or false"#
    )
}
