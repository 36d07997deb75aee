//! crates/moodbite_core/src/payload.rs
//!
//! Models the polymorphic payload an LLM provider may return: either a plain
//! string or a list of typed content segments. Extraction of the usable text
//! is a pure function so the rule can be tested without a provider.

/// One typed segment of a segmented provider payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentSegment {
    pub kind: String,
    pub text: Option<String>,
}

/// The textual payload of a provider response envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelPayload {
    Text(String),
    Segments(Vec<ContentSegment>),
}

/// Error returned when no usable text can be extracted from a payload.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PayloadError {
    #[error("no text content found in model response")]
    NoTextSegment,
}

/// Extracts the textual content from a provider payload.
///
/// A plain string is used as-is. A segment list is scanned for the first
/// segment tagged `text`; if that segment carries no body, or no such
/// segment exists, extraction fails.
pub fn extract_text(payload: &ModelPayload) -> Result<&str, PayloadError> {
    match payload {
        ModelPayload::Text(text) => Ok(text),
        ModelPayload::Segments(segments) => segments
            .iter()
            .find(|segment| segment.kind == "text")
            .and_then(|segment| segment.text.as_deref())
            .ok_or(PayloadError::NoTextSegment),
    }
}
