//! Call table with per-category transaction chains
//!
//! A 16-bit sequence number is not unique over a long capture or across
//! client restarts, so each (sequence number, conversation) key maps to
//! a chain of records ordered by creation. Elapsed time plus capture
//! order is the only signal separating "the same call retried" from "an
//! unrelated later call that reused the number": a transaction that
//! already got its response goes stale sooner than one still awaiting
//! one, hence the two reuse thresholds.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::config::CorrelationConfig;
use crate::core::MessageCategory;
use super::record::CallRecord;
use super::CallTableStats;

/// Chain key; sequence numbers are only meaningful within
/// (category, conversation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallKey {
    pub seq_num: u16,
    pub conversation: u64,
}

/// Outcome of recording a request frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// A new transaction was opened for this frame
    New(usize),
    /// The frame retransmits the chain tail; nothing was mutated
    Duplicate { of: usize },
    /// The frame is already recorded (re-processing pass)
    Seen(usize),
}

/// Outcome of recording a response frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// First response observed for the tail transaction
    Matched(usize),
    /// The tail transaction already has a response; nothing was mutated
    Duplicate(usize),
    /// The frame is already matched (re-processing pass)
    Seen(usize),
    /// No transaction known under this key
    NotFound,
}

/// Per-category transaction chains over a shared record arena
///
/// A response always attaches to the most recently opened transaction in
/// its chain, never an older still-outstanding one. Consumers depend on
/// this matching order; keep it.
pub struct CallTable {
    /// Record arena; chain links are indices into it
    records: Vec<CallRecord>,
    /// Chain heads, one map per category
    chains: [HashMap<CallKey, usize>; MessageCategory::COUNT],
    /// Reuse threshold for responded transactions
    responded_reuse: Duration,
    /// Reuse threshold for unresponded transactions
    unresponded_reuse: Duration,
    /// Table statistics
    pub stats: CallTableStats,
}

impl CallTable {
    /// Create a new call table
    pub fn new(config: &CorrelationConfig) -> Self {
        Self {
            records: Vec::with_capacity(config.initial_capacity),
            chains: std::array::from_fn(|_| HashMap::new()),
            responded_reuse: Duration::seconds(config.responded_reuse_secs as i64),
            unresponded_reuse: Duration::seconds(config.unresponded_reuse_secs as i64),
            stats: CallTableStats::default(),
        }
    }

    /// Record a request frame
    ///
    /// Opens a new transaction, classifies the frame as a retransmission
    /// of the chain tail, or recognizes a frame recorded by an earlier
    /// pass. The tail record is never mutated by a duplicate.
    pub fn record_request(
        &mut self,
        category: MessageCategory,
        seq_num: u16,
        conversation: u64,
        frame: u32,
        timestamp: DateTime<Utc>,
        guid: Option<Uuid>,
    ) -> RequestOutcome {
        let key = CallKey {
            seq_num,
            conversation,
        };

        let Some(head) = self.chains[category.index()].get(&key).copied() else {
            let idx = self.push(CallRecord::new(
                seq_num,
                conversation,
                category,
                frame,
                timestamp,
                guid,
            ));
            self.chains[category.index()].insert(key, idx);
            self.stats.transactions_opened += 1;
            return RequestOutcome::New(idx);
        };

        // Walk the chain; a frame recorded by an earlier pass is
        // returned unchanged so re-processing never grows the chain
        let mut idx = head;
        loop {
            let rec = &self.records[idx];
            if rec.request_frame == frame {
                self.stats.reprocessed += 1;
                return RequestOutcome::Seen(idx);
            }
            match rec.next {
                Some(next) => idx = next,
                None => break,
            }
        }
        let tail = idx;

        // Same key, new frame: retransmission unless the gap since the
        // tail's request says the sequence number was reused
        let reused = {
            let rec = &self.records[tail];
            let elapsed = timestamp - rec.request_time;
            if rec.responded {
                frame > rec.response_frame && elapsed > self.responded_reuse
            } else {
                frame > rec.request_frame && elapsed > self.unresponded_reuse
            }
        };

        if reused {
            let idx = self.push(CallRecord::new(
                seq_num,
                conversation,
                category,
                frame,
                timestamp,
                guid,
            ));
            self.records[tail].next = Some(idx);
            self.stats.transactions_opened += 1;
            debug!(
                "frame {}: seq {} reused in conversation {}, new {} transaction",
                frame, seq_num, conversation, category
            );
            RequestOutcome::New(idx)
        } else {
            self.stats.duplicate_requests += 1;
            RequestOutcome::Duplicate { of: tail }
        }
    }

    /// Record a response frame against the most recently opened
    /// transaction under its key
    pub fn record_response(
        &mut self,
        category: MessageCategory,
        seq_num: u16,
        conversation: u64,
        frame: u32,
    ) -> ResponseOutcome {
        let key = CallKey {
            seq_num,
            conversation,
        };

        let Some(head) = self.chains[category.index()].get(&key).copied() else {
            self.stats.unmatched_responses += 1;
            return ResponseOutcome::NotFound;
        };

        let mut idx = head;
        loop {
            let rec = &self.records[idx];
            if rec.responded && rec.response_frame == frame {
                self.stats.reprocessed += 1;
                return ResponseOutcome::Seen(idx);
            }
            match rec.next {
                Some(next) => idx = next,
                None => break,
            }
        }
        let tail = idx;

        if self.records[tail].responded {
            self.stats.duplicate_responses += 1;
            ResponseOutcome::Duplicate(tail)
        } else {
            let rec = &mut self.records[tail];
            rec.response_frame = frame;
            rec.responded = true;
            self.stats.matched += 1;
            ResponseOutcome::Matched(tail)
        }
    }

    fn push(&mut self, record: CallRecord) -> usize {
        let idx = self.records.len();
        self.records.push(record);
        idx
    }

    /// Get a record by arena index
    pub fn record(&self, idx: usize) -> &CallRecord {
        &self.records[idx]
    }

    /// Number of records in the arena
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Chain length for a key
    pub fn chain_len(&self, category: MessageCategory, key: &CallKey) -> usize {
        let mut count = 0;
        let mut next = self.chains[category.index()].get(key).copied();
        while let Some(idx) = next {
            count += 1;
            next = self.records[idx].next;
        }
        count
    }

    /// Clear all chains and records for a new session
    pub fn reset(&mut self) {
        self.records.clear();
        for chain in &mut self.chains {
            chain.clear();
        }
        self.stats = CallTableStats::default();
    }
}
