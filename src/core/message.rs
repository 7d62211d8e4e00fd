//! Decoded message representation
//!
//! One record per captured message, handed over by the codec layer.
//! Read-only to the correlation core; fields needed beyond the current
//! frame are copied into call records or annotations.

use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Transport protocol carrying a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportProtocol {
    Udp,
    Tcp,
    Other(u8),
}

impl From<u8> for TransportProtocol {
    fn from(val: u8) -> Self {
        match val {
            17 => TransportProtocol::Udp,
            6 => TransportProtocol::Tcp,
            other => TransportProtocol::Other(other),
        }
    }
}

impl From<TransportProtocol> for u8 {
    fn from(val: TransportProtocol) -> Self {
        match val {
            TransportProtocol::Udp => 17,
            TransportProtocol::Tcp => 6,
            TransportProtocol::Other(v) => v,
        }
    }
}

impl std::fmt::Display for TransportProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportProtocol::Udp => write!(f, "UDP"),
            TransportProtocol::Tcp => write!(f, "TCP"),
            TransportProtocol::Other(n) => write!(f, "Proto({})", n),
        }
    }
}

/// A decoded RAS message
#[derive(Debug, Clone)]
pub struct RasMessage {
    /// Message type tag (choice index, 0-32)
    pub tag: u8,
    /// 16-bit request sequence number
    pub seq_num: u16,
    /// Call GUID, when the message carries one
    pub guid: Option<Uuid>,
    /// Capture frame index (monotonic)
    pub frame: u32,
    /// Capture timestamp
    pub timestamp: DateTime<Utc>,
    /// Source address
    pub src_ip: IpAddr,
    /// Source port
    pub src_port: u16,
    /// Destination address
    pub dst_ip: IpAddr,
    /// Destination port
    pub dst_port: u16,
    /// Transport protocol
    pub transport: TransportProtocol,
}

impl RasMessage {
    /// Create a message between two endpoints; remaining fields start
    /// zeroed and are filled in by the codec layer
    pub fn new(tag: u8, seq_num: u16, src_ip: IpAddr, dst_ip: IpAddr) -> Self {
        Self {
            tag,
            seq_num,
            guid: None,
            frame: 0,
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
            src_ip,
            src_port: 0,
            dst_ip,
            dst_port: 0,
            transport: TransportProtocol::Udp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_protocol_roundtrip() {
        assert_eq!(TransportProtocol::from(17), TransportProtocol::Udp);
        assert_eq!(TransportProtocol::from(6), TransportProtocol::Tcp);
        assert_eq!(TransportProtocol::from(132), TransportProtocol::Other(132));
        assert_eq!(u8::from(TransportProtocol::Udp), 17);
        assert_eq!(u8::from(TransportProtocol::Other(132)), 132);
    }

    #[test]
    fn test_transport_protocol_display() {
        assert_eq!(TransportProtocol::Udp.to_string(), "UDP");
        assert_eq!(TransportProtocol::Other(132).to_string(), "Proto(132)");
    }
}
