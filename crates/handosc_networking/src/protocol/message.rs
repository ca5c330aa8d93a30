//! # Message Definitions
//!
//! Decoded OSC packets as the router sees them.

use std::fmt;

/// OSC time tag (NTP format).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimeTag {
    /// Seconds since 1900-01-01.
    pub seconds: u32,
    /// Fractional part in units of 2^-32 seconds.
    pub fraction: u32,
}

impl TimeTag {
    /// The special "immediately" tag.
    pub const IMMEDIATE: Self = Self { seconds: 0, fraction: 1 };

    /// Creates a new time tag.
    #[must_use]
    pub const fn new(seconds: u32, fraction: u32) -> Self {
        Self { seconds, fraction }
    }

    /// Packs into the 64-bit wire representation.
    #[must_use]
    pub const fn to_bits(self) -> u64 {
        ((self.seconds as u64) << 32) | self.fraction as u64
    }

    /// Unpacks from the 64-bit wire representation.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_bits(bits: u64) -> Self {
        Self::new((bits >> 32) as u32, bits as u32)
    }
}

impl Default for TimeTag {
    fn default() -> Self {
        Self::IMMEDIATE
    }
}

/// One typed argument of an inbound message.
#[derive(Clone, Debug, PartialEq)]
pub enum OscArg {
    /// `i` - 32-bit signed integer.
    Int32(i32),
    /// `f` - 32-bit float.
    Float32(f32),
    /// `s` - string.
    String(String),
    /// `b` - opaque bytes.
    Blob(Vec<u8>),
    /// `h` - 64-bit signed integer.
    Int64(i64),
    /// `d` - 64-bit float.
    Float64(f64),
    /// `t` - time tag.
    TimeTag(TimeTag),
    /// `S` - symbol (a string with different intent).
    Symbol(String),
    /// `c` - single character.
    Char(char),
    /// `r` - packed 32-bit RGBA color.
    Rgba(u32),
    /// `m` - 4-byte MIDI message (port, status, data1, data2).
    Midi([u8; 4]),
    /// `T` - true, no payload.
    True,
    /// `F` - false, no payload.
    False,
    /// `N` - nil, no payload.
    Nil,
    /// `I` - impulse ("bang"), no payload.
    Impulse,
}

impl OscArg {
    /// The wire type tag character.
    #[must_use]
    pub const fn type_tag(&self) -> char {
        match self {
            OscArg::Int32(_) => 'i',
            OscArg::Float32(_) => 'f',
            OscArg::String(_) => 's',
            OscArg::Blob(_) => 'b',
            OscArg::Int64(_) => 'h',
            OscArg::Float64(_) => 'd',
            OscArg::TimeTag(_) => 't',
            OscArg::Symbol(_) => 'S',
            OscArg::Char(_) => 'c',
            OscArg::Rgba(_) => 'r',
            OscArg::Midi(_) => 'm',
            OscArg::True => 'T',
            OscArg::False => 'F',
            OscArg::Nil => 'N',
            OscArg::Impulse => 'I',
        }
    }

    /// Human-readable type name used in diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            OscArg::Int32(_) => "i32",
            OscArg::Float32(_) => "f32",
            OscArg::String(_) => "string",
            OscArg::Blob(_) => "blob",
            OscArg::Int64(_) => "i64",
            OscArg::Float64(_) => "f64",
            OscArg::TimeTag(_) => "timetag",
            OscArg::Symbol(_) => "symbol",
            OscArg::Char(_) => "char",
            OscArg::Rgba(_) => "rgba",
            OscArg::Midi(_) => "midi",
            OscArg::True => "true",
            OscArg::False => "false",
            OscArg::Nil => "nil",
            OscArg::Impulse => "impulse",
        }
    }

    /// Numeric value as `f32`.
    ///
    /// Integers and doubles are coerced; every other kind returns `None`.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            OscArg::Float32(v) => Some(v),
            OscArg::Int32(v) => Some(v as f32),
            OscArg::Int64(v) => Some(v as f32),
            OscArg::Float64(v) => Some(v as f32),
            _ => None,
        }
    }
}

/// An address plus its ordered arguments.
///
/// Read-only to the core: the router inspects it and never changes it.
#[derive(Clone, Debug, PartialEq)]
pub struct InboundMessage {
    /// Address pattern, e.g. `/hand/right/position`.
    pub address: String,
    /// Arguments in wire order.
    pub args: Vec<OscArg>,
}

impl InboundMessage {
    /// Creates a message.
    #[must_use]
    pub fn new(address: impl Into<String>, args: Vec<OscArg>) -> Self {
        Self {
            address: address.into(),
            args,
        }
    }

    /// Convenience constructor for an all-float message.
    #[must_use]
    pub fn floats(address: impl Into<String>, values: &[f32]) -> Self {
        Self::new(address, values.iter().copied().map(OscArg::Float32).collect())
    }

    /// Address pattern.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Arguments.
    #[must_use]
    pub fn args(&self) -> &[OscArg] {
        &self.args
    }

    /// Compact type tag string, e.g. `",fff"`.
    #[must_use]
    pub fn type_tags(&self) -> String {
        std::iter::once(',')
            .chain(self.args.iter().map(OscArg::type_tag))
            .collect()
    }
}

impl fmt::Display for InboundMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.address, self.type_tags())
    }
}

/// A bundle of packets sharing a time tag.
#[derive(Clone, Debug, PartialEq)]
pub struct OscBundle {
    /// When the contents should take effect. Ignored by the receiver.
    pub time_tag: TimeTag,
    /// Contained messages and bundles, in wire order.
    pub elements: Vec<OscPacket>,
}

/// A decoded datagram.
#[derive(Clone, Debug, PartialEq)]
pub enum OscPacket {
    /// A single message.
    Message(InboundMessage),
    /// A bundle, possibly nested.
    Bundle(OscBundle),
}

impl OscPacket {
    /// Flattens into messages, depth-first in wire order.
    pub fn flatten_into<E: Extend<InboundMessage>>(self, out: &mut E) {
        match self {
            OscPacket::Message(msg) => out.extend(std::iter::once(msg)),
            OscPacket::Bundle(bundle) => {
                for element in bundle.elements {
                    element.flatten_into(out);
                }
            }
        }
    }

    /// Flattens into a new vector of messages.
    #[must_use]
    pub fn into_messages(self) -> Vec<InboundMessage> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }
}

impl From<InboundMessage> for OscPacket {
    fn from(msg: InboundMessage) -> Self {
        OscPacket::Message(msg)
    }
}
