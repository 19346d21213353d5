//! Bridge between a synchronous front end and the async runner.

pub mod reducer;
pub mod turn;

pub use reducer::extract_text;
pub use turn::{run_turn, run_turn_blocking, FALLBACK_RESPONSE};
