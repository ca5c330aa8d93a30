//! # Fallback Formatter
//!
//! Renders messages the router does not act on into one diagnostic line:
//!
//! ```text
//! /foo/bar: i32:5 string:hi
//! /foo/bar: blob:unhandled argument type blob
//! ```
//!
//! Never fails and never mutates. Kinds other than `i32`, `f32` and
//! `string` get a labeled placeholder instead of their value, so new
//! argument kinds degrade instead of erroring.

use std::fmt::Write;

use crate::protocol::{InboundMessage, OscArg};

/// `tracing` target used for every fallback diagnostic.
pub const FALLBACK_TARGET: &str = "handosc::fallback";

/// Formats a message as `"<address>:"` followed by `" <type>:<value>"` per argument.
#[must_use]
pub fn format_message(message: &InboundMessage) -> String {
    let mut out = String::with_capacity(message.address.len() + 1 + message.args.len() * 12);
    out.push_str(&message.address);
    out.push(':');

    for arg in &message.args {
        out.push(' ');
        out.push_str(arg.type_name());
        out.push(':');
        // Writing into a String cannot fail.
        let _ = match arg {
            OscArg::Int32(v) => write!(out, "{v}"),
            OscArg::Float32(v) => write!(out, "{v}"),
            OscArg::String(s) => {
                out.push_str(s);
                Ok(())
            }
            other => write!(out, "unhandled argument type {}", other.type_name()),
        };
    }

    out
}
