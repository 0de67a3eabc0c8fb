//! Inbound frame validation.

use teamcollab_core::error::AppError;

use super::inbound::InboundFrame;

/// Checks size and JSON shape of a raw text frame.
pub fn parse_frame(raw: &str, max_bytes: usize) -> Result<InboundFrame, AppError> {
    if raw.len() > max_bytes {
        return Err(AppError::validation(format!(
            "Frame exceeds maximum size of {max_bytes} bytes"
        )));
    }

    if raw.trim().is_empty() {
        return Err(AppError::validation("Empty frame"));
    }

    Ok(serde_json::from_str(raw)?)
}

/// Content rule shared by every message kind: at least one character.
pub fn validate_content(content: &str) -> Result<(), AppError> {
    if content.is_empty() {
        return Err(AppError::validation("Message content is empty"));
    }
    Ok(())
}
