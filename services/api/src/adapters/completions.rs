//! services/api/src/adapters/completions.rs
//!
//! Helpers shared by the LLM adapters: mapping a chat completion into the
//! core payload model, and parsing the extracted text as JSON.

use async_openai::types::chat::CreateChatCompletionResponse;
use moodbite_core::payload::{extract_text, ModelPayload};
use moodbite_core::ports::{PortError, PortResult};
use serde::de::DeserializeOwned;

/// Converts a chat completion into the core payload model. A choice without
/// text content becomes an empty segment list, so extraction reports it as
/// the usual missing-text failure.
pub(crate) fn payload_from_completion(
    response: CreateChatCompletionResponse,
) -> PortResult<ModelPayload> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| PortError::MalformedResponse("model returned no choices".to_string()))?;
    Ok(match choice.message.content {
        Some(text) => ModelPayload::Text(text),
        None => ModelPayload::Segments(Vec::new()),
    })
}

/// Extracts the text from a provider payload and parses it as JSON into `T`.
///
/// No validation happens beyond the parse itself: field values, score
/// ranges, and the recommendation count are taken at face value.
pub(crate) fn parse_json_payload<T: DeserializeOwned>(payload: &ModelPayload) -> PortResult<T> {
    let text =
        extract_text(payload).map_err(|e| PortError::MalformedResponse(e.to_string()))?;
    let cleaned = strip_code_fences(text);
    serde_json::from_str(cleaned)
        .map_err(|e| PortError::MalformedResponse(format!("model output is not valid JSON: {e}")))
}

/// Builds the formatting-instructions suffix appended to every prompt,
/// reiterating the field names the model must emit.
pub(crate) fn format_instructions(top_level: &[&str], item_fields: &[&str]) -> String {
    format!(
        "Respond with a single JSON object containing the keys {} and nothing else. \
         Each entry in \"recommendations\" must contain the keys {}.",
        quote_join(top_level),
        quote_join(item_fields),
    )
}

fn quote_join(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|field| format!("\"{field}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Some models wrap their JSON in a markdown fence despite instructions.
/// Strip a leading ```/```json fence and its closing fence; anything else
/// passes through untouched and fails at the parse instead.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    match rest.trim_start().strip_suffix("```") {
        Some(body) => body.trim(),
        None => trimmed,
    }
}
