//! Core shared types for message processing
//!
//! Provides the data structures used by all correlation components:
//! - `RasMessage`: decoded message record handed over by the codec layer
//! - `classify`: message tag to (category, role) mapping

pub mod classify;
pub mod message;

pub use classify::{
    classify, tag_name, Classification, MessageCategory, MessageRole, CORRELATED_TAG_MAX, TAG_MAX,
};
pub use message::{RasMessage, TransportProtocol};
