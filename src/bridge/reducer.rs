//! Reduce a runner event to the reply text it carries.

use crate::events::Event;

/// Trimmed text of the first content part of a final-response event.
///
/// Returns `None` for non-final events and for final events whose first part
/// has no text or only whitespace.
pub fn extract_text(event: &Event) -> Option<String> {
    if !event.is_final_response() {
        return None;
    }
    let text = event.content.as_ref()?.parts.first()?.text.as_deref()?.trim();
    (!text.is_empty()).then(|| text.to_string())
}
