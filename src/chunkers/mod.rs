//! Token-windowed chunking.

mod base;
mod token_window;

pub use base::{TiktokenCounter, TokenCounter};
pub use token_window::TokenWindowChunker;
