//! # HANDOSC Networking
//!
//! OSC-over-UDP ingestion for hand tracking.
//!
//! ## Architecture
//!
//! - **Protocol**: OSC 1.0 messages and bundles, decoded and encoded
//! - **Transport**: plain UDP, one datagram per OSC packet
//! - **Receiver**: polled or threaded, both exposed as a [`MessageSource`]
//! - **Router**: exact-address dispatch into a [`PoseStore`](handosc_core::PoseStore)
//! - **Pacer**: one drain-and-render frame per period for the consumer loop
//!
//! ## Data Flow
//!
//! ```text
//! sender ──UDP──► receiver ──decode──► queue ──drain──► router ──► PoseStore
//!                                                         │
//!                                                         └─► fallback log
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::collections::VecDeque;
//! use handosc_core::{Hand, PoseStore};
//! use handosc_networking::{InboundMessage, MessageRouter};
//!
//! let mut queue = VecDeque::new();
//! queue.push_back(InboundMessage::floats("/hand/left/position", &[1.0, 2.0, 3.0]));
//!
//! let mut store = PoseStore::new();
//! let report = MessageRouter::default().drain(&mut queue, &mut store);
//!
//! assert_eq!(report.positions, 1);
//! assert_eq!(store.get(Hand::Left).position.y, -2.0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod pacer;
pub mod protocol;
pub mod receiver;
pub mod router;
pub mod transport;

pub use error::{DecodeError, DecodeResult, NetworkError, NetworkResult};
pub use pacer::{FramePacer, FrameStats};
pub use protocol::{
    decode_packet, encode_message, InboundMessage, OscArg, OscBundle, OscEncoder, OscPacket,
    TimeTag,
};
pub use receiver::{OscReceiver, ReceiverStats, ReceiverThread};
pub use router::{
    format_message, DrainReport, MalformedReason, MessageRouter, MessageSource, PoseField, Route,
    RouteOutcome, RoutingTable, FALLBACK_TARGET,
};
pub use transport::{TransportStats, UdpTransport};

/// Port hand-tracking senders target by default.
pub const DEFAULT_PORT: u16 = 12345;

/// Largest UDP payload over IPv4.
pub const MAX_DATAGRAM_SIZE: usize = 65_507;

/// Default consumer tick rate (updates per second).
///
/// At 60Hz, each tick is ~16.67ms.
pub const DEFAULT_TICK_RATE: u32 = 60;

/// Default cap on datagrams read per poll, so a flood cannot stall a tick.
pub const DEFAULT_MAX_DATAGRAMS_PER_TICK: usize = 4096;

/// Default capacity of the threaded receiver's channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 8192;
