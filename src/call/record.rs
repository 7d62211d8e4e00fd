//! Call transaction records
//!
//! One record per logical request/response transaction. Records live in
//! the call table's arena and are linked into per-key chains by index.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::MessageCategory;

/// Response frame value meaning "no response observed yet"
pub const NO_RESPONSE: u32 = 0;

/// One logical request/response transaction
#[derive(Debug, Clone)]
pub struct CallRecord {
    /// Sequence number the transaction is keyed on
    pub seq_num: u16,
    /// Conversation the transaction belongs to
    pub conversation: u64,
    /// Transaction category
    pub category: MessageCategory,
    /// Frame of the opening request; never changes after creation
    pub request_frame: u32,
    /// Capture time of the opening request
    pub request_time: DateTime<Utc>,
    /// Frame of the matched response (`NO_RESPONSE` until matched)
    pub response_frame: u32,
    /// A response has been matched
    pub responded: bool,
    /// Call GUID carried by the request
    pub guid: Option<Uuid>,
    /// Arena index of the next record in this key's chain
    pub(crate) next: Option<usize>,
}

impl CallRecord {
    pub(crate) fn new(
        seq_num: u16,
        conversation: u64,
        category: MessageCategory,
        request_frame: u32,
        request_time: DateTime<Utc>,
        guid: Option<Uuid>,
    ) -> Self {
        Self {
            seq_num,
            conversation,
            category,
            request_frame,
            request_time,
            response_frame: NO_RESPONSE,
            responded: false,
            guid,
            next: None,
        }
    }
}
