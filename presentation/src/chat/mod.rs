//! Interactive chat module
//!
//! Provides a reedline-based interactive command session.

mod repl;

pub use repl::ChatRepl;
