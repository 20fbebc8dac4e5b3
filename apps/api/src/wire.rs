//! The inline text protocol shared by the streaming endpoints and their
//! consumers.
//!
//! An evaluation stream is plain generated text followed by exactly one
//! metadata trailer: `<text>\n---METADATA---\n<json>`. The trailer is the
//! final segment; nothing follows the JSON document. Roadmap and
//! assessment streams carry no trailer at all; consumers accumulate the
//! whole body and parse it as possibly-fenced JSON.

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::assessment::PerformanceMetrics;

/// Separates generated text from the JSON metrics trailer. Treated as a
/// hard sentinel: generated prose is assumed never to contain it, and
/// consumers split on the first occurrence.
pub const METADATA_DELIMITER: &str = "\n---METADATA---\n";

#[derive(Debug, Error)]
pub enum WireError {
    #[error("metadata trailer missing from stream")]
    MissingTrailer,

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Encodes the metrics trailer: the delimiter followed by the JSON
/// document, with no trailing delimiter after it.
pub fn encode_trailer(metrics: &PerformanceMetrics) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(metrics)?;
    Ok(format!("{METADATA_DELIMITER}{json}"))
}

/// Splits a fully accumulated evaluation stream into its displayable text
/// and the parsed metrics. The first delimiter occurrence wins.
pub fn decode_stream(raw: &str) -> Result<(&str, PerformanceMetrics), WireError> {
    let (text, trailer) = raw
        .split_once(METADATA_DELIMITER)
        .ok_or(WireError::MissingTrailer)?;
    let metrics = serde_json::from_str(trailer)?;
    Ok((text, metrics))
}

/// Strips one optional leading ``` fence (with an optional language tag,
/// matched case-insensitively) and one optional trailing fence.
pub fn strip_code_fences(text: &str) -> &str {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```") {
        let rest = match rest.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
            _ => rest,
        };
        text = rest.trim_start();
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim_end();
    }
    text
}

/// Parses model output that may arrive wrapped in markdown code fences,
/// despite the prompts forbidding them.
pub fn parse_fenced_json<T: DeserializeOwned>(raw: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(strip_code_fences(raw))
}
