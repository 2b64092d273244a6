//! Structured-payload recovery from model output
//!
//! Language models wrap JSON in prose, code fences, or emit raw control
//! characters inside strings. [`TolerantParser`] recovers the payload through
//! a fixed sequence of tiers (see [`ParseTier`]).

pub mod tolerant;

pub use tolerant::{ParseTier, Parsed, TolerantParser};
