//! Call transaction correlation
//!
//! Maintains per-category chains of in-flight and historical
//! transactions keyed by (sequence number, conversation). Requests open
//! transactions or are classified as retransmissions; responses attach
//! to the most recently opened transaction under their key.
//!
//! # Example
//!
//! ```ignore
//! use rastrack::call::{CallTable, RequestOutcome};
//! use rastrack::config::CorrelationConfig;
//!
//! let mut table = CallTable::new(&CorrelationConfig::default());
//! match table.record_request(category, seq, conv, frame, ts, guid) {
//!     RequestOutcome::New(idx) => { /* transaction opened */ }
//!     RequestOutcome::Duplicate { of } => { /* retransmission */ }
//!     RequestOutcome::Seen(idx) => { /* frame re-processed */ }
//! }
//! ```

pub mod record;
pub mod table;

pub use record::{CallRecord, NO_RESPONSE};
pub use table::{CallKey, CallTable, RequestOutcome, ResponseOutcome};

use serde::{Deserialize, Serialize};

/// Call table statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallTableStats {
    /// Transactions opened
    pub transactions_opened: u64,
    /// Requests classified as retransmissions
    pub duplicate_requests: u64,
    /// Responses matched to an open transaction
    pub matched: u64,
    /// Responses to an already-responded transaction
    pub duplicate_responses: u64,
    /// Responses with no known transaction
    pub unmatched_responses: u64,
    /// Frames recognized from an earlier pass
    pub reprocessed: u64,
}
