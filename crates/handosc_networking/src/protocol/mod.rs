//! # Wire Protocol
//!
//! OSC 1.0 packets as delivered by hand-tracking senders.
//!
//! ## Packet Structure
//!
//! ```text
//! Message:
//! ┌────────────────────────┬──────────────────┬─────────────────────────┐
//! │ Address "/hand/..."\0  │ Type tags ",fff" │ Arguments (big-endian)  │
//! │ (padded to 4)          │ (padded to 4)    │                         │
//! └────────────────────────┴──────────────────┴─────────────────────────┘
//!
//! Bundle:
//! ┌────────────┬───────────────┬──────────────────────┬─────────┐
//! │ "#bundle"\0│ Time tag (8)  │ Size (4) │ Packet ... │ ...     │
//! └────────────┴───────────────┴──────────────────────┴─────────┘
//! ```
//!
//! Bundles are flattened depth-first and their time tags are ignored:
//! everything is applied on the tick it arrives.

mod decode;
mod encode;
mod message;

pub use decode::{decode_packet, OscDecoder};
pub use encode::{encode_message, OscEncoder};
pub use message::{InboundMessage, OscArg, OscBundle, OscPacket, TimeTag};

/// First 8 bytes of every bundle.
pub const BUNDLE_TAG: &[u8; 8] = b"#bundle\0";

/// Maximum bundle nesting accepted before a datagram is rejected.
pub const MAX_BUNDLE_DEPTH: usize = 8;
