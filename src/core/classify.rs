//! Message classification
//!
//! Maps a message's numeric type tag to a (category, role) pair. Tags
//! 0-20 partition into seven categories of request/confirm/reject; tags
//! above that are single-role administrative messages which take no part
//! in correlation.

use serde::{Deserialize, Serialize};

/// Highest tag that participates in request/response correlation
pub const CORRELATED_TAG_MAX: u8 = 20;

/// Highest tag defined by the message table
pub const TAG_MAX: u8 = 32;

/// Transaction category (one per request/confirm/reject triple)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageCategory {
    /// Gatekeeper discovery
    Gatekeeper,
    /// Endpoint registration
    Registration,
    /// Endpoint unregistration
    Unregistration,
    /// Call admission
    Admission,
    /// Bandwidth change
    Bandwidth,
    /// Call disengage
    Disengage,
    /// Address location
    Location,
}

impl MessageCategory {
    /// Number of correlated categories
    pub const COUNT: usize = 7;

    /// Table index for per-category maps
    pub fn index(self) -> usize {
        match self {
            MessageCategory::Gatekeeper => 0,
            MessageCategory::Registration => 1,
            MessageCategory::Unregistration => 2,
            MessageCategory::Admission => 3,
            MessageCategory::Bandwidth => 4,
            MessageCategory::Disengage => 5,
            MessageCategory::Location => 6,
        }
    }
}

impl std::fmt::Display for MessageCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageCategory::Gatekeeper => write!(f, "gatekeeper"),
            MessageCategory::Registration => write!(f, "registration"),
            MessageCategory::Unregistration => write!(f, "unregistration"),
            MessageCategory::Admission => write!(f, "admission"),
            MessageCategory::Bandwidth => write!(f, "bandwidth"),
            MessageCategory::Disengage => write!(f, "disengage"),
            MessageCategory::Location => write!(f, "location"),
        }
    }
}

/// Role of a message within its category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageRole {
    Request,
    Confirm,
    Reject,
}

impl MessageRole {
    /// Confirms and rejects both answer a request
    pub fn is_response(self) -> bool {
        matches!(self, MessageRole::Confirm | MessageRole::Reject)
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::Request => write!(f, "request"),
            MessageRole::Confirm => write!(f, "confirm"),
            MessageRole::Reject => write!(f, "reject"),
        }
    }
}

/// Classification outcome for a message tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Part of a request/confirm/reject triple
    Correlated {
        category: MessageCategory,
        role: MessageRole,
    },
    /// Administrative message outside the correlated triples
    Uncorrelated,
}

/// Classify a message type tag
///
/// Out-of-table tags fail open as uncorrelated; there is no error path.
pub fn classify(tag: u8) -> Classification {
    if tag > CORRELATED_TAG_MAX {
        return Classification::Uncorrelated;
    }

    let category = match tag / 3 {
        0 => MessageCategory::Gatekeeper,
        1 => MessageCategory::Registration,
        2 => MessageCategory::Unregistration,
        3 => MessageCategory::Admission,
        4 => MessageCategory::Bandwidth,
        5 => MessageCategory::Disengage,
        _ => MessageCategory::Location,
    };
    let role = match tag % 3 {
        0 => MessageRole::Request,
        1 => MessageRole::Confirm,
        _ => MessageRole::Reject,
    };

    Classification::Correlated { category, role }
}

/// Protocol message name for a tag, for summaries and log lines
pub fn tag_name(tag: u8) -> &'static str {
    match tag {
        0 => "gatekeeperRequest",
        1 => "gatekeeperConfirm",
        2 => "gatekeeperReject",
        3 => "registrationRequest",
        4 => "registrationConfirm",
        5 => "registrationReject",
        6 => "unregistrationRequest",
        7 => "unregistrationConfirm",
        8 => "unregistrationReject",
        9 => "admissionRequest",
        10 => "admissionConfirm",
        11 => "admissionReject",
        12 => "bandwidthRequest",
        13 => "bandwidthConfirm",
        14 => "bandwidthReject",
        15 => "disengageRequest",
        16 => "disengageConfirm",
        17 => "disengageReject",
        18 => "locationRequest",
        19 => "locationConfirm",
        20 => "locationReject",
        21 => "infoRequest",
        22 => "infoRequestResponse",
        23 => "nonStandardMessage",
        24 => "unknownMessageResponse",
        25 => "requestInProgress",
        26 => "resourcesAvailableIndicate",
        27 => "resourcesAvailableConfirm",
        28 => "infoRequestAck",
        29 => "infoRequestNak",
        30 => "serviceControlIndication",
        31 => "serviceControlResponse",
        32 => "admissionConfirmSequence",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlated_tags_partition() {
        for tag in 0..=CORRELATED_TAG_MAX {
            match classify(tag) {
                Classification::Correlated { category, role } => {
                    assert_eq!(category.index(), (tag / 3) as usize);
                    let expected = match tag % 3 {
                        0 => MessageRole::Request,
                        1 => MessageRole::Confirm,
                        _ => MessageRole::Reject,
                    };
                    assert_eq!(role, expected);
                }
                Classification::Uncorrelated => panic!("tag {} should be correlated", tag),
            }
        }
    }

    #[test]
    fn test_category_triples() {
        assert_eq!(
            classify(9),
            Classification::Correlated {
                category: MessageCategory::Admission,
                role: MessageRole::Request,
            }
        );
        assert_eq!(
            classify(20),
            Classification::Correlated {
                category: MessageCategory::Location,
                role: MessageRole::Reject,
            }
        );
    }

    #[test]
    fn test_administrative_tags_uncorrelated() {
        for tag in (CORRELATED_TAG_MAX + 1)..=TAG_MAX {
            assert_eq!(classify(tag), Classification::Uncorrelated);
        }
    }

    #[test]
    fn test_out_of_table_fails_open() {
        assert_eq!(classify(33), Classification::Uncorrelated);
        assert_eq!(classify(255), Classification::Uncorrelated);
        assert_eq!(tag_name(33), "unknown");
    }

    #[test]
    fn test_tag_names() {
        assert_eq!(tag_name(0), "gatekeeperRequest");
        assert_eq!(tag_name(9), "admissionRequest");
        assert_eq!(tag_name(25), "requestInProgress");
        assert_eq!(tag_name(32), "admissionConfirmSequence");
    }

    #[test]
    fn test_role_is_response() {
        assert!(!MessageRole::Request.is_response());
        assert!(MessageRole::Confirm.is_response());
        assert!(MessageRole::Reject.is_response());
    }
}
