//! # Packet Decoding
//!
//! Reads OSC 1.0 datagrams into [`OscPacket`]s.
//!
//! ## Wire Rules
//!
//! - All numbers are big-endian
//! - Strings are NUL-terminated and padded to a multiple of 4 bytes
//! - Blobs are an `i32` length followed by bytes padded to 4
//! - Bundles are `#bundle\0`, a 64-bit time tag, then `i32`-sized elements
//!
//! Padding bytes are not checked. Senders in the wild are sloppy about
//! zeroing them and the content is unambiguous without them.

use super::message::{InboundMessage, OscArg, OscBundle, OscPacket, TimeTag};
use super::{BUNDLE_TAG, MAX_BUNDLE_DEPTH};
use crate::error::{DecodeError, DecodeResult};

/// Rounds up to the next multiple of 4.
#[inline]
pub(crate) const fn pad4(n: usize) -> usize {
    (n + 3) & !3
}

/// Packet decoder - reads one datagram from a borrowed buffer.
pub struct OscDecoder<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> OscDecoder<'a> {
    /// Creates a new decoder from a buffer.
    #[must_use]
    pub const fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, position: 0 }
    }

    /// Returns the number of bytes remaining.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    /// Returns the current read offset.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    fn take(&mut self, len: usize) -> DecodeResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(DecodeError::Truncated {
                offset: self.position,
                needed: len,
                remaining: self.remaining(),
            });
        }
        let slice = &self.buffer[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> DecodeResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Reads a big-endian `i32`.
    #[inline]
    pub fn read_i32(&mut self) -> DecodeResult<i32> {
        self.take_array().map(i32::from_be_bytes)
    }

    /// Reads a big-endian `u32`.
    #[inline]
    pub fn read_u32(&mut self) -> DecodeResult<u32> {
        self.take_array().map(u32::from_be_bytes)
    }

    /// Reads a big-endian `f32`.
    #[inline]
    pub fn read_f32(&mut self) -> DecodeResult<f32> {
        self.read_u32().map(f32::from_bits)
    }

    /// Reads a big-endian `i64`.
    #[inline]
    pub fn read_i64(&mut self) -> DecodeResult<i64> {
        self.take_array().map(i64::from_be_bytes)
    }

    /// Reads a big-endian `f64`.
    #[inline]
    pub fn read_f64(&mut self) -> DecodeResult<f64> {
        self.take_array().map(f64::from_be_bytes)
    }

    /// Reads a 64-bit time tag.
    #[inline]
    pub fn read_time_tag(&mut self) -> DecodeResult<TimeTag> {
        self.take_array().map(|b| TimeTag::from_bits(u64::from_be_bytes(b)))
    }

    /// Reads a NUL-terminated, 4-byte padded string.
    pub fn read_str(&mut self) -> DecodeResult<&'a str> {
        let start = self.position;
        let rest = &self.buffer[start.min(self.buffer.len())..];
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(DecodeError::UnterminatedString(start))?;
        let text = std::str::from_utf8(&rest[..len]).map_err(|_| DecodeError::InvalidUtf8(start))?;
        // The terminator itself is always present; padding may be cut short
        // only if the sender truncated the datagram.
        self.take(pad4(len + 1))?;
        Ok(text)
    }

    /// Reads an `i32`-prefixed, 4-byte padded blob.
    pub fn read_blob(&mut self) -> DecodeResult<&'a [u8]> {
        let offset = self.position;
        let length = self.read_i32()?;
        let len = usize::try_from(length).map_err(|_| DecodeError::InvalidLength { offset, length })?;
        if pad4(len) > self.remaining() {
            return Err(DecodeError::InvalidLength { offset, length });
        }
        let data = self.take(pad4(len))?;
        Ok(&data[..len])
    }

    /// Reads one argument for the given type tag.
    pub fn read_arg(&mut self, tag: char) -> DecodeResult<OscArg> {
        let arg = match tag {
            'i' => OscArg::Int32(self.read_i32()?),
            'f' => OscArg::Float32(self.read_f32()?),
            's' => OscArg::String(self.read_str()?.to_owned()),
            'S' => OscArg::Symbol(self.read_str()?.to_owned()),
            'b' => OscArg::Blob(self.read_blob()?.to_vec()),
            'h' => OscArg::Int64(self.read_i64()?),
            'd' => OscArg::Float64(self.read_f64()?),
            't' => OscArg::TimeTag(self.read_time_tag()?),
            'c' => {
                let raw = self.read_u32()?;
                OscArg::Char(char::from_u32(raw).ok_or(DecodeError::InvalidChar(raw))?)
            }
            'r' => OscArg::Rgba(self.read_u32()?),
            'm' => OscArg::Midi(self.take_array()?),
            'T' => OscArg::True,
            'F' => OscArg::False,
            'N' => OscArg::Nil,
            'I' => OscArg::Impulse,
            other => return Err(DecodeError::UnknownTypeTag(other)),
        };
        Ok(arg)
    }

    /// Decodes the whole buffer as one packet.
    pub fn decode(&mut self) -> DecodeResult<OscPacket> {
        self.decode_at_depth(0)
    }

    fn decode_at_depth(&mut self, depth: usize) -> DecodeResult<OscPacket> {
        match self.buffer.get(self.position) {
            None => Err(DecodeError::Empty),
            Some(b'/') => self.decode_message().map(OscPacket::Message),
            Some(b'#') => self.decode_bundle(depth).map(OscPacket::Bundle),
            Some(_) => {
                let address = self.read_str().unwrap_or("<unreadable>");
                Err(DecodeError::InvalidAddress(address.to_owned()))
            }
        }
    }

    fn decode_message(&mut self) -> DecodeResult<InboundMessage> {
        let address = self.read_str()?.to_owned();

        // Pre-1.0 senders omit the type tag string entirely.
        if self.remaining() == 0 {
            return Ok(InboundMessage::new(address, Vec::new()));
        }

        let tags = self.read_str()?;
        let Some(tags) = tags.strip_prefix(',') else {
            return Err(DecodeError::MissingTypeTag(address));
        };

        let mut args = Vec::with_capacity(tags.len());
        for tag in tags.chars() {
            args.push(self.read_arg(tag)?);
        }
        Ok(InboundMessage::new(address, args))
    }

    fn decode_bundle(&mut self, depth: usize) -> DecodeResult<OscBundle> {
        if depth >= MAX_BUNDLE_DEPTH {
            return Err(DecodeError::NestingTooDeep(MAX_BUNDLE_DEPTH));
        }

        let tag = self.read_str()?;
        if tag.as_bytes() != &BUNDLE_TAG[..BUNDLE_TAG.len() - 1] {
            return Err(DecodeError::InvalidAddress(tag.to_owned()));
        }
        let time_tag = self.read_time_tag()?;

        let mut elements = Vec::new();
        while self.remaining() > 0 {
            let offset = self.position;
            let length = self.read_i32()?;
            let len = usize::try_from(length)
                .ok()
                .filter(|&len| len <= self.remaining())
                .ok_or(DecodeError::InvalidLength { offset, length })?;
            let body = self.take(len)?;
            elements.push(OscDecoder::new(body).decode_at_depth(depth + 1)?);
        }

        Ok(OscBundle { time_tag, elements })
    }
}

/// Decodes one datagram.
pub fn decode_packet(datagram: &[u8]) -> DecodeResult<OscPacket> {
    OscDecoder::new(datagram).decode()
}
