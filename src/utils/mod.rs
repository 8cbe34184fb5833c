pub mod filter;
pub mod types;

pub use filter::{color_choice, is_skipped};
pub use types::Frame;
