//! Line framing for the tray protocol.
//!
//! Every message is a single JSON object terminated by exactly one `\n`.
//! Encoded icons are plain base64 and never contain newlines, so a
//! serialized message always fits on one line.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::constants::{ICON_PLACEHOLDER, LOG_LINE_LIMIT};
use crate::messages::{Action, Event};

/// Errors produced while framing or parsing protocol lines.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("empty line")]
    EmptyLine,
}

/// Serializes `value` into one trimmed, newline-terminated line.
pub fn encode_line<T: Serialize>(value: &T) -> Result<String, CodecError> {
    let json = serde_json::to_string(value)?;
    let trimmed = json.trim();
    if trimmed.is_empty() {
        return Err(CodecError::EmptyLine);
    }
    Ok(format!("{trimmed}\n"))
}

/// Parses one line (without its terminator) into `T`.
pub fn decode_line<T: DeserializeOwned>(line: &str) -> Result<T, CodecError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(CodecError::EmptyLine);
    }
    Ok(serde_json::from_str(trimmed)?)
}

/// Encodes an outbound action.
pub fn encode_action(action: &Action) -> Result<String, CodecError> {
    encode_line(action)
}

/// Decodes an inbound event.
pub fn decode_event(line: &str) -> Result<Event, CodecError> {
    decode_line(line)
}

/// Shortens a protocol line for logging.
///
/// Icon payloads are replaced by [`ICON_PLACEHOLDER`] and anything longer
/// than [`LOG_LINE_LIMIT`] characters keeps only its head and tail.
pub fn redact(line: &str) -> String {
    const KEY: &str = "\"icon\":\"";

    let mut out = String::with_capacity(line.len().min(LOG_LINE_LIMIT + 3));
    let mut rest = line.trim_end();
    while let Some(start) = rest.find(KEY) {
        let value_start = start + KEY.len();
        out.push_str(&rest[..value_start]);
        match rest[value_start..].find('"') {
            Some(len) => {
                out.push_str(ICON_PLACEHOLDER);
                rest = &rest[value_start + len..];
            }
            None => {
                rest = &rest[value_start..];
                break;
            }
        }
    }
    out.push_str(rest);

    let count = out.chars().count();
    if count <= LOG_LINE_LIMIT {
        return out;
    }
    let half = LOG_LINE_LIMIT / 2;
    let head: String = out.chars().take(half).collect();
    let tail: String = out.chars().skip(count - half).collect();
    format!("{head}...{tail}")
}
