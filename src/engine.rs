//! Message processing pipeline
//!
//! Coordinates classification, conversation resolution, and call
//! correlation for each decoded message, producing display annotations
//! and tap summaries. Strictly single-threaded: one frame is fully
//! processed before the next is considered.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};
use uuid::Uuid;

use crate::call::{CallTable, RequestOutcome, ResponseOutcome};
use crate::config::RasConfig;
use crate::conversation::ConversationTracker;
use crate::core::{classify, tag_name, Classification, MessageCategory, RasMessage};

/// Per-message display annotations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasAnnotation {
    /// Frame of the correlated counterpart: the response frame on a
    /// request, the request frame on a response
    pub matched_frame: Option<u32>,
    /// The frame repeats an already-recorded request or response
    pub is_duplicate: bool,
    /// Round-trip latency, set on matched responses
    pub response_latency: Option<Duration>,
}

/// Uniform per-message record for downstream statistics consumers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RasSummary {
    /// Transaction category; `None` for uncorrelated messages
    pub category: Option<MessageCategory>,
    /// Raw message type tag
    pub tag: u8,
    /// Call GUID, when carried
    pub guid: Option<Uuid>,
    /// Duplicate flag
    pub is_duplicate: bool,
    /// Round-trip latency
    pub response_latency: Option<Duration>,
}

/// Output of processing one message
#[derive(Debug, Clone)]
pub struct ProcessedMessage {
    /// Annotations attached for display
    pub annotation: RasAnnotation,
    /// Record handed to tap consumers
    pub summary: RasSummary,
}

/// Engine statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineStats {
    /// Messages processed
    pub messages: u64,
    /// Correlated requests seen
    pub requests: u64,
    /// Correlated responses seen
    pub responses: u64,
    /// Administrative messages outside the correlated triples
    pub uncorrelated: u64,
    /// Duplicate requests and responses
    pub duplicates: u64,
    /// Fresh request/response matches
    pub matched: u64,
    /// Responses with no known request
    pub unmatched_responses: u64,
}

/// RAS transaction correlation engine
///
/// Owns the single-writer session state: the conversation registry and
/// the per-category call table. `reset` clears both when a new capture
/// is loaded.
pub struct RasEngine {
    conversations: ConversationTracker,
    calls: CallTable,
    stats: EngineStats,
}

impl RasEngine {
    /// Create a new engine
    pub fn new(config: &RasConfig) -> Self {
        info!(
            "initializing RAS correlation engine (responded_reuse={}s, unresponded_reuse={}s)",
            config.correlation.responded_reuse_secs, config.correlation.unresponded_reuse_secs
        );

        Self {
            conversations: ConversationTracker::new(&config.conversations),
            calls: CallTable::new(&config.correlation),
            stats: EngineStats::default(),
        }
    }

    /// Process one decoded message
    pub fn process(&mut self, msg: &RasMessage) -> ProcessedMessage {
        self.stats.messages += 1;
        trace!(
            "frame {}: {} seq={}",
            msg.frame,
            tag_name(msg.tag),
            msg.seq_num
        );

        let Classification::Correlated { category, role } = classify(msg.tag) else {
            self.stats.uncorrelated += 1;
            return ProcessedMessage {
                annotation: RasAnnotation::default(),
                summary: RasSummary {
                    category: None,
                    tag: msg.tag,
                    guid: msg.guid,
                    is_duplicate: false,
                    response_latency: None,
                },
            };
        };

        let (conversation, _) = self.conversations.resolve(
            msg.src_ip,
            msg.src_port,
            msg.dst_ip,
            msg.dst_port,
            msg.transport,
            msg.frame,
        );
        let conversation = conversation.id;

        let annotation = if role.is_response() {
            self.stats.responses += 1;
            self.process_response(category, conversation, msg)
        } else {
            self.stats.requests += 1;
            self.process_request(category, conversation, msg)
        };

        let summary = RasSummary {
            category: Some(category),
            tag: msg.tag,
            guid: msg.guid,
            is_duplicate: annotation.is_duplicate,
            response_latency: annotation.response_latency,
        };

        ProcessedMessage {
            annotation,
            summary,
        }
    }

    fn process_request(
        &mut self,
        category: MessageCategory,
        conversation: u64,
        msg: &RasMessage,
    ) -> RasAnnotation {
        let outcome = self.calls.record_request(
            category,
            msg.seq_num,
            conversation,
            msg.frame,
            msg.timestamp,
            msg.guid,
        );

        match outcome {
            RequestOutcome::New(_) => RasAnnotation::default(),
            RequestOutcome::Seen(idx) => {
                // Revisited request: forward-reference its response
                let rec = self.calls.record(idx);
                RasAnnotation {
                    matched_frame: rec.responded.then_some(rec.response_frame),
                    is_duplicate: false,
                    response_latency: None,
                }
            }
            RequestOutcome::Duplicate { of } => {
                let rec = self.calls.record(of);
                debug!(
                    "frame {}: duplicate of {} request in frame {}",
                    msg.frame, category, rec.request_frame
                );
                self.stats.duplicates += 1;
                RasAnnotation {
                    matched_frame: rec.responded.then_some(rec.response_frame),
                    is_duplicate: true,
                    response_latency: None,
                }
            }
        }
    }

    fn process_response(
        &mut self,
        category: MessageCategory,
        conversation: u64,
        msg: &RasMessage,
    ) -> RasAnnotation {
        let outcome = self
            .calls
            .record_response(category, msg.seq_num, conversation, msg.frame);

        match outcome {
            ResponseOutcome::Matched(idx) => {
                self.stats.matched += 1;
                self.matched_annotation(idx, msg)
            }
            ResponseOutcome::Seen(idx) => self.matched_annotation(idx, msg),
            ResponseOutcome::Duplicate(idx) => {
                let rec = self.calls.record(idx);
                debug!(
                    "frame {}: duplicate {} response, transaction already answered in frame {}",
                    msg.frame, category, rec.response_frame
                );
                self.stats.duplicates += 1;
                RasAnnotation {
                    matched_frame: Some(rec.request_frame),
                    is_duplicate: true,
                    response_latency: None,
                }
            }
            ResponseOutcome::NotFound => {
                debug!(
                    "frame {}: {} response with no matching request",
                    msg.frame, category
                );
                self.stats.unmatched_responses += 1;
                RasAnnotation::default()
            }
        }
    }

    /// Annotation for a response matched to `idx`, freshly or on a
    /// re-processing pass
    fn matched_annotation(&self, idx: usize, msg: &RasMessage) -> RasAnnotation {
        let rec = self.calls.record(idx);
        // Reversed timestamps (capture clock skew) degrade to no latency
        let latency = (msg.timestamp - rec.request_time).to_std().ok();
        RasAnnotation {
            matched_frame: Some(rec.request_frame),
            is_duplicate: false,
            response_latency: latency,
        }
    }

    /// Engine statistics
    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    /// Conversation registry
    pub fn conversations(&self) -> &ConversationTracker {
        &self.conversations
    }

    /// Call table
    pub fn calls(&self) -> &CallTable {
        &self.calls
    }

    /// Clear all session state for a new capture
    pub fn reset(&mut self) {
        info!("resetting RAS correlation state");
        self.conversations.reset();
        self.calls.reset();
        self.stats = EngineStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::net::{IpAddr, Ipv4Addr};

    const GRQ: u8 = 0;
    const GCF: u8 = 1;
    const RIP: u8 = 25;

    fn make_message(tag: u8, seq_num: u16, frame: u32, millis: i64) -> RasMessage {
        let mut msg = RasMessage::new(
            tag,
            seq_num,
            IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)),
            IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2)),
        );
        msg.src_port = 1719;
        msg.dst_port = 1719;
        msg.frame = frame;
        msg.timestamp = Utc.timestamp_millis_opt(millis).unwrap();
        msg
    }

    #[test]
    fn test_request_response_latency() {
        // Scenario A: request at t=0, response 200ms later
        let mut engine = RasEngine::new(&RasConfig::default());

        let out = engine.process(&make_message(GRQ, 7, 10, 0));
        assert_eq!(out.annotation, RasAnnotation::default());

        let out = engine.process(&make_message(GCF, 7, 11, 200));
        assert_eq!(out.annotation.matched_frame, Some(10));
        assert!(!out.annotation.is_duplicate);
        assert_eq!(
            out.annotation.response_latency,
            Some(Duration::from_millis(200))
        );
        assert_eq!(out.summary.category, Some(MessageCategory::Gatekeeper));
        assert_eq!(engine.stats().matched, 1);
    }

    #[test]
    fn test_duplicate_request_annotated() {
        let mut engine = RasEngine::new(&RasConfig::default());
        engine.process(&make_message(GRQ, 7, 10, 0));
        engine.process(&make_message(GCF, 7, 11, 200));

        // Scenario B: same seq 100s later, inside the responded window
        let out = engine.process(&make_message(GRQ, 7, 500, 100_000));

        assert!(out.annotation.is_duplicate);
        assert_eq!(out.annotation.matched_frame, Some(11));
        assert!(out.summary.is_duplicate);
        assert_eq!(engine.stats().duplicates, 1);
    }

    #[test]
    fn test_unmatched_response_no_annotation() {
        let mut engine = RasEngine::new(&RasConfig::default());

        let out = engine.process(&make_message(GCF, 42, 5, 0));

        assert_eq!(out.annotation, RasAnnotation::default());
        assert_eq!(engine.stats().unmatched_responses, 1);
        assert!(engine.calls().is_empty());
    }

    #[test]
    fn test_uncorrelated_message() {
        let mut engine = RasEngine::new(&RasConfig::default());

        let out = engine.process(&make_message(RIP, 7, 3, 0));

        assert_eq!(out.summary.category, None);
        assert_eq!(out.annotation, RasAnnotation::default());
        assert_eq!(engine.stats().uncorrelated, 1);
        // No conversation or call state is created for these
        assert!(engine.conversations().is_empty());
        assert!(engine.calls().is_empty());
    }

    #[test]
    fn test_reprocessing_is_idempotent() {
        let mut engine = RasEngine::new(&RasConfig::default());
        let req = make_message(GRQ, 7, 10, 0);
        let resp = make_message(GCF, 7, 11, 200);

        engine.process(&req);
        engine.process(&resp);
        let first_len = engine.calls().len();

        // Second analysis pass over the same frames
        let out_req = engine.process(&req);
        let out_resp = engine.process(&resp);

        assert_eq!(engine.calls().len(), first_len);
        // The revisited request now forward-references its response
        assert_eq!(out_req.annotation.matched_frame, Some(11));
        assert!(!out_req.annotation.is_duplicate);
        // The revisited response reports the same latency as the first pass
        assert_eq!(
            out_resp.annotation.response_latency,
            Some(Duration::from_millis(200))
        );
        assert_eq!(engine.stats().matched, 1);
    }

    #[test]
    fn test_reset_clears_session() {
        let mut engine = RasEngine::new(&RasConfig::default());
        engine.process(&make_message(GRQ, 7, 10, 0));

        engine.reset();

        assert_eq!(engine.stats().messages, 0);
        assert!(engine.conversations().is_empty());
        assert!(engine.calls().is_empty());

        // A response right after reset has nothing to match
        let out = engine.process(&make_message(GCF, 7, 11, 200));
        assert_eq!(out.annotation, RasAnnotation::default());
    }
}
