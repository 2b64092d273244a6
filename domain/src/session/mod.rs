//! Conversation primitives for model invocation

pub mod entities;

pub use entities::{Message, Role};
