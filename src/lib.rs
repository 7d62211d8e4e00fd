//! Transaction correlation for RAS call-signaling captures
//!
//! Sits between a codec layer that decodes captured call-signaling
//! messages and the presentation/statistics layers. Given a stream of
//! independently-arriving requests and responses over an unreliable,
//! connectionless transport, it determines which response belongs to
//! which earlier request, detects retransmitted requests, and computes
//! response latency.
//!
//! # Architecture
//!
//! - [`core`]: the decoded message record and tag classification
//! - [`conversation`]: endpoint-pair registry (bidirectional flows)
//! - [`call`]: per-category transaction chains and matching heuristics
//! - [`dispatch`]: deferred sub-dissection of nested payloads
//! - [`engine`]: the per-message pipeline tying it together
//!
//! # Example
//!
//! ```ignore
//! use rastrack::{RasConfig, RasEngine};
//!
//! let mut engine = RasEngine::new(&RasConfig::default());
//! for msg in capture {
//!     let out = engine.process(&msg);
//!     display.attach(msg.frame, &out.annotation);
//!     taps.feed(&out.summary);
//! }
//! ```

pub mod call;
pub mod config;
pub mod conversation;
pub mod core;
pub mod dispatch;
pub mod engine;
pub mod error;

pub use call::{CallKey, CallRecord, CallTable, CallTableStats, RequestOutcome, ResponseOutcome};
pub use config::{ConversationConfig, CorrelationConfig, RasConfig};
pub use conversation::{Conversation, ConversationKey, ConversationStats, ConversationTracker};
pub use crate::core::{
    classify, tag_name, Classification, MessageCategory, MessageRole, RasMessage,
    TransportProtocol,
};
pub use dispatch::{
    AttachPoint, DispatchQueue, DissectorHandle, DissectorRegistry, SubDissector,
};
pub use engine::{EngineStats, ProcessedMessage, RasAnnotation, RasEngine, RasSummary};
pub use error::{RasError, Result};
