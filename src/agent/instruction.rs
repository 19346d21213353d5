//! `{key}` placeholder substitution in agent instructions.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::error::{LogiqError, Result};
use crate::session::SessionState;

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{+([A-Za-z_][A-Za-z0-9_]*)(\?)?\}+").expect("placeholder pattern is valid")
    })
}

/// Replace `{key}` with the session value for `key`.
///
/// `{key?}` renders as empty when the key is missing; a missing `{key}` is an
/// error. Strings render bare, other JSON values in compact JSON. Braces that
/// do not wrap an identifier are left alone.
pub fn inject_session_state(template: &str, state: &SessionState) -> Result<String> {
    let mut missing = None;
    let rendered = placeholder().replace_all(template, |caps: &Captures<'_>| {
        let key = &caps[1];
        let optional = caps.get(2).is_some();
        match state.get(key) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(value) => value.to_string(),
            None if optional => String::new(),
            None => {
                missing.get_or_insert_with(|| key.to_string());
                caps[0].to_string()
            }
        }
    });

    match missing {
        Some(key) => Err(LogiqError::InvalidState(format!(
            "instruction references '{key}' which is not in session state"
        ))),
        None => Ok(rendered.into_owned()),
    }
}
