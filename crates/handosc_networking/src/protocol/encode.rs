//! # Packet Encoding
//!
//! Writes [`OscPacket`]s in OSC 1.0 wire format.
//!
//! The receiver never encodes. This exists for the sender tool, the
//! benchmarks and the loopback tests.

use super::decode::pad4;
use super::message::{InboundMessage, OscArg, OscBundle, OscPacket, TimeTag};
use super::BUNDLE_TAG;

/// Packet encoder - writes packets into a reusable buffer.
///
/// Reuse one encoder across packets to avoid reallocating.
#[derive(Default)]
pub struct OscEncoder {
    buffer: Vec<u8>,
}

impl OscEncoder {
    /// Creates a new encoder with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the encoder for reuse.
    #[inline]
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Returns the number of bytes written.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if no bytes have been written.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns a slice of the written data.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    fn write_str(&mut self, s: &str) {
        let start = self.buffer.len();
        self.buffer.extend_from_slice(s.as_bytes());
        self.buffer.resize(start + pad4(s.len() + 1), 0);
    }

    fn write_blob(&mut self, data: &[u8]) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let len = data.len() as i32;
        self.buffer.extend_from_slice(&len.to_be_bytes());
        let start = self.buffer.len();
        self.buffer.extend_from_slice(data);
        self.buffer.resize(start + pad4(data.len()), 0);
    }

    fn write_arg(&mut self, arg: &OscArg) {
        match arg {
            OscArg::Int32(v) => self.buffer.extend_from_slice(&v.to_be_bytes()),
            OscArg::Float32(v) => self.buffer.extend_from_slice(&v.to_be_bytes()),
            OscArg::String(s) | OscArg::Symbol(s) => self.write_str(s),
            OscArg::Blob(b) => self.write_blob(b),
            OscArg::Int64(v) => self.buffer.extend_from_slice(&v.to_be_bytes()),
            OscArg::Float64(v) => self.buffer.extend_from_slice(&v.to_be_bytes()),
            OscArg::TimeTag(t) => self.buffer.extend_from_slice(&t.to_bits().to_be_bytes()),
            OscArg::Char(c) => self.buffer.extend_from_slice(&u32::from(*c).to_be_bytes()),
            OscArg::Rgba(v) => self.buffer.extend_from_slice(&v.to_be_bytes()),
            OscArg::Midi(m) => self.buffer.extend_from_slice(m),
            OscArg::True | OscArg::False | OscArg::Nil | OscArg::Impulse => {}
        }
    }

    fn write_message(&mut self, msg: &InboundMessage) {
        self.write_str(&msg.address);
        self.write_str(&msg.type_tags());
        for arg in &msg.args {
            self.write_arg(arg);
        }
    }

    fn write_bundle(&mut self, bundle: &OscBundle) {
        self.buffer.extend_from_slice(BUNDLE_TAG);
        self.buffer.extend_from_slice(&bundle.time_tag.to_bits().to_be_bytes());
        for element in &bundle.elements {
            let size_at = self.buffer.len();
            self.buffer.extend_from_slice(&[0; 4]);
            self.write_packet(element);
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let size = (self.buffer.len() - size_at - 4) as i32;
            self.buffer[size_at..size_at + 4].copy_from_slice(&size.to_be_bytes());
        }
    }

    fn write_packet(&mut self, packet: &OscPacket) {
        match packet {
            OscPacket::Message(msg) => self.write_message(msg),
            OscPacket::Bundle(bundle) => self.write_bundle(bundle),
        }
    }

    /// Encodes a single message, replacing the buffer contents.
    pub fn encode_message(&mut self, msg: &InboundMessage) -> &[u8] {
        self.reset();
        self.write_message(msg);
        &self.buffer
    }

    /// Encodes a packet, replacing the buffer contents.
    pub fn encode_packet(&mut self, packet: &OscPacket) -> &[u8] {
        self.reset();
        self.write_packet(packet);
        &self.buffer
    }

    /// Encodes several messages as one immediate bundle.
    pub fn encode_bundle(&mut self, messages: &[InboundMessage]) -> &[u8] {
        let bundle = OscBundle {
            time_tag: TimeTag::IMMEDIATE,
            elements: messages.iter().cloned().map(OscPacket::Message).collect(),
        };
        self.reset();
        self.write_bundle(&bundle);
        &self.buffer
    }
}

/// Encodes one message into a fresh vector.
#[must_use]
pub fn encode_message(msg: &InboundMessage) -> Vec<u8> {
    let mut encoder = OscEncoder::new();
    encoder.encode_message(msg);
    encoder.buffer
}
