//! Conversation registry
//!
//! Hash table of known endpoint pairs with get-or-create resolution.

use std::collections::HashMap;
use std::net::IpAddr;

use tracing::debug;

use crate::config::ConversationConfig;
use crate::core::TransportProtocol;
use super::ConversationStats;

/// Key identifying a conversation (endpoint order preserved)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConversationKey {
    pub src_ip: IpAddr,
    pub src_port: u16,
    pub dst_ip: IpAddr,
    pub dst_port: u16,
    pub transport: TransportProtocol,
}

/// A tracked bidirectional transport flow
#[derive(Debug, Clone)]
pub struct Conversation {
    /// Registry-unique id
    pub id: u64,
    /// Endpoint key
    pub key: ConversationKey,
    /// Frame the conversation was first seen in; valid from here forward
    pub setup_frame: u32,
}

/// Registry of conversations for one analysis session
pub struct ConversationTracker {
    conversations: HashMap<ConversationKey, Conversation>,
    next_id: u64,
    /// Registry statistics
    pub stats: ConversationStats,
}

impl ConversationTracker {
    /// Create a new registry
    pub fn new(config: &ConversationConfig) -> Self {
        Self {
            conversations: HashMap::with_capacity(config.initial_capacity),
            next_id: 1,
            stats: ConversationStats::default(),
        }
    }

    /// Resolve the conversation for an endpoint pair, creating one if
    /// this is the first message seen between them
    ///
    /// Returns the conversation and a bool indicating if it was newly
    /// created.
    pub fn resolve(
        &mut self,
        src_ip: IpAddr,
        src_port: u16,
        dst_ip: IpAddr,
        dst_port: u16,
        transport: TransportProtocol,
        frame: u32,
    ) -> (&Conversation, bool) {
        let key = ConversationKey {
            src_ip,
            src_port,
            dst_ip,
            dst_port,
            transport,
        };
        self.stats.lookups += 1;

        if self.conversations.contains_key(&key) {
            self.stats.hits += 1;
            (self.conversations.get(&key).unwrap(), false)
        } else {
            let id = self.next_id;
            self.next_id += 1;
            self.stats.created += 1;
            debug!(
                "new conversation {} ({}:{} -> {}:{} {}) from frame {}",
                id, src_ip, src_port, dst_ip, dst_port, transport, frame
            );

            self.conversations.insert(
                key.clone(),
                Conversation {
                    id,
                    key: key.clone(),
                    setup_frame: frame,
                },
            );
            (self.conversations.get(&key).unwrap(), true)
        }
    }

    /// Get a conversation by key
    pub fn get(&self, key: &ConversationKey) -> Option<&Conversation> {
        self.conversations.get(key)
    }

    /// Number of tracked conversations
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    /// Clear all conversations for a new session
    pub fn reset(&mut self) {
        self.conversations.clear();
        self.next_id = 1;
        self.stats = ConversationStats::default();
    }
}
