//! Conversation tracking
//!
//! Resolves the bidirectional flow identity for a message's transport
//! endpoints. A conversation is created the first time a message is seen
//! between two endpoints and persists for the analysis session.
//!
//! # Example
//!
//! ```ignore
//! use rastrack::config::ConversationConfig;
//! use rastrack::conversation::ConversationTracker;
//!
//! let mut tracker = ConversationTracker::new(&ConversationConfig::default());
//! let (conv, is_new) = tracker.resolve(src_ip, 1719, dst_ip, 1719, transport, frame);
//! ```
//!
//! The key is directional: endpoint order is preserved, and normalizing
//! client/server roles across port swaps is the caller's responsibility.

pub mod tracker;

pub use tracker::{Conversation, ConversationKey, ConversationTracker};

use serde::{Deserialize, Serialize};

/// Registry statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationStats {
    /// Total lookups
    pub lookups: u64,
    /// Lookups that found an existing conversation
    pub hits: u64,
    /// Conversations created
    pub created: u64,
}
