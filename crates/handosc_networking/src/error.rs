//! # Networking Error Types
//!
//! Everything that can go wrong between the socket and the router.
//! None of these ever reach the pose store: a datagram that fails to decode
//! is logged and dropped at the transport boundary.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Errors produced while decoding an OSC datagram.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The datagram (or a bundle element) had no bytes.
    #[error("empty packet")]
    Empty,

    /// Ran out of bytes in the middle of a field.
    #[error("truncated packet: needed {needed} bytes at offset {offset}, {remaining} remaining")]
    Truncated {
        /// Offset of the field being read.
        offset: usize,
        /// Bytes the field requires.
        needed: usize,
        /// Bytes left in the buffer.
        remaining: usize,
    },

    /// A string ran to the end of the buffer without a NUL terminator.
    #[error("unterminated string at offset {0}")]
    UnterminatedString(usize),

    /// A string or symbol was not valid UTF-8.
    #[error("invalid utf-8 in string at offset {0}")]
    InvalidUtf8(usize),

    /// The packet starts with neither `/` nor `#bundle`.
    #[error("invalid address pattern: {0:?}")]
    InvalidAddress(String),

    /// Arguments follow the address without a `,`-prefixed type tag string.
    #[error("missing type tag string after address {0:?}")]
    MissingTypeTag(String),

    /// A type tag this decoder cannot size.
    #[error("unknown argument type tag '{0}'")]
    UnknownTypeTag(char),

    /// A blob or bundle element declared a negative or oversized length.
    #[error("invalid length {length} at offset {offset}")]
    InvalidLength {
        /// Offset of the length field.
        offset: usize,
        /// The declared length.
        length: i32,
    },

    /// A `c` argument that is not a Unicode scalar value.
    #[error("invalid char argument 0x{0:08x}")]
    InvalidChar(u32),

    /// Bundles nested deeper than [`crate::protocol::MAX_BUNDLE_DEPTH`].
    #[error("bundle nesting exceeds depth {0}")]
    NestingTooDeep(usize),
}

/// Errors from the transport and receiver layers.
#[derive(Error, Debug)]
pub enum NetworkError {
    /// Could not bind the UDP socket.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// The address we tried to bind.
        addr: SocketAddr,
        /// Underlying socket error.
        #[source]
        source: io::Error,
    },

    /// Any other socket error (configuring or sending).
    #[error("socket error: {0}")]
    Io(#[from] io::Error),

    /// A datagram failed to decode.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The I/O thread could not be started.
    #[error("failed to spawn receiver thread: {0}")]
    Spawn(#[source] io::Error),
}

/// Result type for decoding.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Result type for transport operations.
pub type NetworkResult<T> = Result<T, NetworkError>;
