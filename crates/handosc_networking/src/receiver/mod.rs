//! # OSC Receiver
//!
//! Turns UDP datagrams into buffered [`InboundMessage`]s for the router.
//!
//! Two shapes, same contract ([`MessageSource`]):
//!
//! ```text
//! Polled (single thread):
//!   tick ─► poll_pending() ─► recv until WouldBlock (capped) ─► decode ─► VecDeque
//!
//! Threaded:
//!   I/O thread ─► recv (timeout) ─► decode ─► bounded channel ─► tick drains len()
//! ```
//!
//! Datagrams that fail to decode are logged at WARN and dropped here; the
//! router never sees them.

mod thread;

pub use thread::ReceiverThread;

use std::collections::VecDeque;
use std::net::SocketAddr;

use crate::error::NetworkResult;
use crate::protocol::{decode_packet, InboundMessage};
use crate::router::MessageSource;
use crate::transport::{TransportStats, UdpTransport};

/// Receiver statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReceiverStats {
    /// Datagrams read from the socket.
    pub datagrams: u64,
    /// Messages decoded (bundles count each contained message).
    pub messages: u64,
    /// Datagrams dropped because they failed to decode.
    pub decode_errors: u64,
    /// Messages dropped because the hand-off buffer was full.
    pub dropped: u64,
}

/// Decodes one datagram into `out`, logging and counting failures.
///
/// Returns the number of messages produced.
pub(crate) fn ingest_datagram<E: Extend<InboundMessage>>(
    datagram: &[u8],
    from: SocketAddr,
    out: &mut E,
    stats: &mut ReceiverStats,
) -> usize {
    stats.datagrams += 1;
    match decode_packet(datagram) {
        Ok(packet) => {
            let messages = packet.into_messages();
            let count = messages.len();
            stats.messages += count as u64;
            out.extend(messages);
            count
        }
        Err(e) => {
            stats.decode_errors += 1;
            tracing::warn!("dropping {} byte datagram from {}: {}", datagram.len(), from, e);
            0
        }
    }
}

/// Single-threaded, polled receiver.
///
/// Each [`MessageSource::poll_pending`] call reads whatever the socket has
/// ready, up to `max_datagrams_per_poll`, so a flood cannot stall a tick.
pub struct OscReceiver {
    transport: UdpTransport,
    queue: VecDeque<InboundMessage>,
    max_datagrams_per_poll: usize,
    stats: ReceiverStats,
}

impl OscReceiver {
    /// Binds a non-blocking receiver.
    pub fn bind(addr: SocketAddr, max_datagrams_per_poll: usize) -> NetworkResult<Self> {
        let transport = UdpTransport::bind(addr)?;
        tracing::info!("listening for osc messages on {}", transport.local_addr());
        Ok(Self {
            transport,
            queue: VecDeque::with_capacity(256),
            max_datagrams_per_poll: max_datagrams_per_poll.max(1),
            stats: ReceiverStats::default(),
        })
    }

    /// Returns the bound address (useful when binding port 0).
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.transport.local_addr()
    }

    /// Reads ready datagrams into the queue. Returns how many were read.
    pub fn poll(&mut self) -> usize {
        let mut read = 0;
        while read < self.max_datagrams_per_poll {
            let Some((datagram, from)) = self.transport.recv() else {
                break;
            };
            ingest_datagram(datagram, from, &mut self.queue, &mut self.stats);
            read += 1;
        }
        read
    }

    /// Messages buffered and not yet drained.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.queue.len()
    }

    /// Receiver statistics.
    #[must_use]
    pub const fn stats(&self) -> &ReceiverStats {
        &self.stats
    }

    /// Socket statistics.
    #[must_use]
    pub const fn transport_stats(&self) -> &TransportStats {
        self.transport.stats()
    }
}

impl MessageSource for OscReceiver {
    fn poll_pending(&mut self) -> usize {
        self.poll();
        self.queue.len()
    }

    fn next_message(&mut self) -> Option<InboundMessage> {
        self.queue.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{encode_message, OscArg};

    #[test]
    fn test_ingest_counts_bundle_members() {
        let mut out = Vec::new();
        let mut stats = ReceiverStats::default();
        let mut encoder = crate::protocol::OscEncoder::new();
        let bytes = encoder
            .encode_bundle(&[
                InboundMessage::floats("/a", &[1.0]),
                InboundMessage::floats("/b", &[2.0]),
            ])
            .to_vec();

        let from: SocketAddr = "127.0.0.1:9".parse().unwrap();
        assert_eq!(ingest_datagram(&bytes, from, &mut out, &mut stats), 2);
        assert_eq!(stats.datagrams, 1);
        assert_eq!(stats.messages, 2);
        assert_eq!(out[1].address, "/b");
    }

    #[test]
    fn test_ingest_drops_garbage() {
        let mut out: Vec<InboundMessage> = Vec::new();
        let mut stats = ReceiverStats::default();
        let from: SocketAddr = "127.0.0.1:9".parse().unwrap();

        assert_eq!(ingest_datagram(b"garbage!", from, &mut out, &mut stats), 0);
        assert_eq!(stats.decode_errors, 1);
        assert!(out.is_empty());

        let ok = encode_message(&InboundMessage::new("/x", vec![OscArg::Int32(1)]));
        assert_eq!(ingest_datagram(&ok, from, &mut out, &mut stats), 1);
        assert_eq!(stats.datagrams, 2);
    }

    #[test]
    fn test_idle_poll_is_empty() {
        let mut rx = OscReceiver::bind("127.0.0.1:0".parse().unwrap(), 16).unwrap();
        assert_eq!(rx.poll_pending(), 0);
        assert!(rx.next_message().is_none());
    }
}
