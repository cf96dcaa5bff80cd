// src/llm/guard.rs
// Prompt-driven safety classification over the completion endpoint, plus an
// unconditional restricted-topic veto. The veto runs alongside the taxonomy
// check on every classification; a positive veto forces the verdict to
// Unsafe even when the taxonomy check came back safe.

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::backend::{Classification, CompletionBackend, SafetyBackend, Verdict};
use crate::error::Result;

/// Moderation taxonomy: category code -> human-readable name
const CATEGORIES: &[(&str, &str)] = &[
    ("S1", "Violent Crimes"),
    ("S2", "Non-Violent Crimes"),
    ("S3", "Sex-Related Crimes"),
    ("S4", "Child Sexual Exploitation"),
    ("S5", "Defamation"),
    ("S6", "Specialized Advice"),
    ("S7", "Privacy"),
    ("S8", "Intellectual Property"),
    ("S9", "Indiscriminate Weapons"),
    ("S10", "Hate"),
    ("S11", "Suicide & Self-Harm"),
    ("S12", "Sexual Content"),
    ("S13", "Elections"),
];

static RE_CATEGORY_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bs\d+\b").expect("valid regex"));

/// Safety classifier backed by a moderation-tuned completion model.
pub struct GuardClient {
    llm: Arc<dyn CompletionBackend>,
    restricted_topic: String,
}

impl GuardClient {
    pub fn new(llm: Arc<dyn CompletionBackend>, restricted_topic: String) -> Self {
        Self {
            llm,
            restricted_topic,
        }
    }

    fn taxonomy_prompt(input_text: &str) -> String {
        let category_list = CATEGORIES
            .iter()
            .map(|(code, desc)| format!("{code}: {desc}"))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"You are a zero-tolerance content moderation AI. Your task is to strictly enforce the following content restrictions. Any content that falls into these categories must be flagged as unsafe. Do not allow loopholes.

{category_list}

User Input: "{input_text}"

If the input matches any category, return "unsafe" followed by the category code (e.g., "unsafe S1"). If it does not match any restricted category, return "safe"."#
        )
    }

    fn topic_veto_prompt(&self, input_text: &str) -> String {
        format!(
            r#"You are an AI that determines whether the given input is related to {topic}, including any of its subfields or practical applications.

Evaluate the following input:
"{input_text}"

If the input is related to {topic} in any way, respond strictly with "True".
If it is not related, respond strictly with "False".
Provide no explanations, additional text, or variations in formatting."#,
            topic = self.restricted_topic
        )
    }

    fn veto_category(&self) -> String {
        format!("Restricted Topic: {}", self.restricted_topic)
    }
}

/// Extract flagged categories from the classifier's reply.
///
/// The model answers "safe" or "unsafe S<n> ...". Known codes are expanded
/// to "S9: Indiscriminate Weapons" form; unknown codes pass through as-is.
pub(crate) fn parse_guard_reply(reply: &str) -> Vec<String> {
    let reply = reply.trim().to_lowercase();
    if !reply.contains("unsafe") {
        return Vec::new();
    }

    RE_CATEGORY_CODE
        .find_iter(&reply)
        .map(|m| {
            let code = m.as_str().to_uppercase();
            match CATEGORIES.iter().find(|(c, _)| *c == code) {
                Some((c, desc)) => format!("{c}: {desc}"),
                None => code,
            }
        })
        .collect()
}

#[async_trait]
impl SafetyBackend for GuardClient {
    fn name(&self) -> &'static str {
        "llm-guard"
    }

    async fn classify(&self, text: &str) -> Result<Classification> {
        let reply = self.llm.complete(&Self::taxonomy_prompt(text)).await?;
        let categories = parse_guard_reply(&reply);

        // Topic veto runs unconditionally and takes precedence over a safe
        // taxonomy verdict.
        let veto_reply = self.llm.complete(&self.topic_veto_prompt(text)).await?;
        if veto_reply.trim().eq_ignore_ascii_case("true") {
            tracing::warn!(topic = %self.restricted_topic, "restricted-topic veto triggered");
            return Ok(Classification::unsafe_with(vec![self.veto_category()]));
        }

        if categories.is_empty() {
            Ok(Classification::safe())
        } else {
            tracing::warn!(?categories, "content flagged by taxonomy check");
            Ok(Classification {
                verdict: Verdict::Unsafe,
                categories,
            })
        }
    }
}
