//! Session id generation.

use chrono::Utc;

pub const SESSION_ID_PREFIX: &str = "adk_session_";

/// Generate `adk_session_<unix_seconds>_<8 hex chars>`.
///
/// Four random bytes are enough for one interactive user per process; this is
/// not meant for high-rate id generation.
pub fn generate_session_id() -> String {
    let entropy: [u8; 4] = rand::random();
    format_session_id(Utc::now().timestamp(), entropy)
}

pub(crate) fn format_session_id(unix_seconds: i64, entropy: [u8; 4]) -> String {
    let hex: String = entropy.iter().map(|b| format!("{b:02x}")).collect();
    format!("{SESSION_ID_PREFIX}{unix_seconds}_{hex}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_seconds_and_padded_hex() {
        assert_eq!(
            format_session_id(1_700_000_000, [0x00, 0x0f, 0xab, 0xff]),
            "adk_session_1700000000_000fabff"
        );
    }

    #[test]
    fn generated_ids_match_expected_shape() {
        let re = regex::Regex::new(r"^adk_session_\d+_[0-9a-f]{8}$").unwrap();
        let id = generate_session_id();
        assert!(re.is_match(&id), "unexpected session id {id}");
    }
}
