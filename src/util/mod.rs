//! Utility modules.

pub mod blocking;

pub use blocking::block_on;
