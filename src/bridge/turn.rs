//! Run one agent turn and collapse its events into a single reply.

use futures::StreamExt;
use tracing::{debug, warn};

use super::reducer::extract_text;
use crate::runner::Runner;
use crate::types::Content;
use crate::util::block_on;

/// Reply returned whenever a turn fails or produces no usable text.
pub const FALLBACK_RESPONSE: &str =
    "Sorry, an error occurred while processing your request. Please try again later.";

/// Run one turn and return the reply text.
///
/// The event stream is consumed to the end. Each event either supplies the
/// candidate reply (when [`extract_text`] yields text) or resets it to
/// [`FALLBACK_RESPONSE`], so the last event decides the result. An error item
/// ends the turn with the fallback; it is logged and never returned.
pub async fn run_turn(
    user_id: &str,
    runner: &dyn Runner,
    session_id: &str,
    message_text: &str,
) -> String {
    let mut events = runner.run_async(user_id, session_id, Content::user(message_text));
    let mut reply = FALLBACK_RESPONSE.to_string();
    let mut seen = 0usize;

    while let Some(item) = events.next().await {
        match item {
            Ok(event) => {
                seen += 1;
                // Any event without text resets the reply, even after a good answer.
                reply = extract_text(&event).unwrap_or_else(|| FALLBACK_RESPONSE.to_string());
            }
            Err(e) => {
                warn!(user_id, session_id, error = %e, "turn failed");
                reply = FALLBACK_RESPONSE.to_string();
                break;
            }
        }
    }

    debug!(user_id, session_id, events = seen, "turn complete");
    reply
}

/// Blocking form of [`run_turn`] for callers without an async runtime.
pub fn run_turn_blocking(
    user_id: &str,
    runner: &dyn Runner,
    session_id: &str,
    message_text: &str,
) -> String {
    match block_on(run_turn(user_id, runner, session_id, message_text)) {
        Ok(reply) => reply,
        Err(e) => {
            warn!(user_id, session_id, error = %e, "could not start a runtime for the turn");
            FALLBACK_RESPONSE.to_string()
        }
    }
}
