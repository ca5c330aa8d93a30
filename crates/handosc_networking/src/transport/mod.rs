//! # Transport Layer
//!
//! Low-level UDP transport for OSC datagrams.
//!
//! ## Design
//!
//! - One datagram is one OSC packet, no framing
//! - Non-blocking for the polled receiver, read-timeout for the I/O thread
//! - Receive errors are counted and skipped, never surfaced per packet

use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use crate::error::{NetworkError, NetworkResult};
use crate::MAX_DATAGRAM_SIZE;

/// UDP socket wrapper for OSC traffic.
///
/// This is a thin wrapper around std UDP with:
/// - Non-blocking or timed-blocking reads
/// - A reusable receive buffer
/// - Packet statistics
pub struct UdpTransport {
    /// The underlying socket.
    socket: UdpSocket,
    /// Local address.
    local_addr: SocketAddr,
    /// Receive buffer, sized for the largest UDP payload.
    recv_buffer: Box<[u8]>,
    /// Statistics.
    stats: TransportStats,
}

/// Transport statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransportStats {
    /// Packets sent.
    pub packets_sent: u64,
    /// Packets received.
    pub packets_received: u64,
    /// Bytes sent.
    pub bytes_sent: u64,
    /// Bytes received.
    pub bytes_received: u64,
    /// Send errors.
    pub send_errors: u64,
    /// Receive errors.
    pub recv_errors: u64,
}

impl UdpTransport {
    /// Creates a non-blocking transport bound to the specified address.
    pub fn bind(addr: SocketAddr) -> NetworkResult<Self> {
        let socket = UdpSocket::bind(addr).map_err(|source| NetworkError::Bind { addr, source })?;
        socket.set_nonblocking(true)?;
        Self::from_socket(socket)
    }

    /// Creates a blocking transport whose reads give up after `timeout`.
    ///
    /// Used by the I/O thread so it can notice shutdown requests.
    pub fn bind_with_timeout(addr: SocketAddr, timeout: Duration) -> NetworkResult<Self> {
        let socket = UdpSocket::bind(addr).map_err(|source| NetworkError::Bind { addr, source })?;
        socket.set_read_timeout(Some(timeout))?;
        Self::from_socket(socket)
    }

    fn from_socket(socket: UdpSocket) -> NetworkResult<Self> {
        let local_addr = socket.local_addr()?;

        Ok(Self {
            socket,
            local_addr,
            recv_buffer: vec![0u8; MAX_DATAGRAM_SIZE].into_boxed_slice(),
            stats: TransportStats::default(),
        })
    }

    /// Returns the local address.
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Sends a datagram to the specified address.
    pub fn send_to(&mut self, data: &[u8], addr: SocketAddr) -> io::Result<usize> {
        match self.socket.send_to(data, addr) {
            Ok(n) => {
                self.stats.packets_sent += 1;
                self.stats.bytes_sent += n as u64;
                Ok(n)
            }
            Err(e) => {
                self.stats.send_errors += 1;
                Err(e)
            }
        }
    }

    /// Receives a datagram.
    ///
    /// Returns the datagram and source address, or None if nothing arrived
    /// (would block, timed out, or a counted receive error).
    pub fn recv(&mut self) -> Option<(&[u8], SocketAddr)> {
        match self.socket.recv_from(&mut self.recv_buffer) {
            Ok((len, addr)) => {
                self.stats.packets_received += 1;
                self.stats.bytes_received += len as u64;
                Some((&self.recv_buffer[..len], addr))
            }
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => None,
            Err(e) => {
                self.stats.recv_errors += 1;
                tracing::debug!("udp receive error: {}", e);
                None
            }
        }
    }

    /// Returns statistics.
    #[must_use]
    pub const fn stats(&self) -> &TransportStats {
        &self.stats
    }

    /// Resets statistics.
    pub fn reset_stats(&mut self) {
        self.stats = TransportStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loopback() -> SocketAddr {
        "127.0.0.1:0".parse().unwrap()
    }

    #[test]
    fn test_empty_socket_returns_none() {
        let mut transport = UdpTransport::bind(loopback()).unwrap();
        assert!(transport.recv().is_none());
        assert_eq!(transport.stats().recv_errors, 0);
    }

    #[test]
    fn test_send_and_receive() {
        let mut rx = UdpTransport::bind_with_timeout(loopback(), Duration::from_secs(2)).unwrap();
        let mut tx = UdpTransport::bind(loopback()).unwrap();

        tx.send_to(b"/ping\0\0\0", rx.local_addr()).unwrap();

        let (data, from) = rx.recv().expect("datagram");
        assert_eq!(data, b"/ping\0\0\0");
        assert_eq!(from, tx.local_addr());
        assert_eq!(rx.stats().packets_received, 1);
        assert_eq!(rx.stats().bytes_received, 8);
        assert_eq!(tx.stats().packets_sent, 1);
    }

    #[test]
    fn test_bind_conflict_is_reported() {
        let first = UdpTransport::bind(loopback()).unwrap();
        let err = UdpTransport::bind(first.local_addr()).err().expect("port in use");
        assert!(matches!(err, NetworkError::Bind { .. }));
    }
}
