//! # HANDOSC
//!
//! Two-hand pose receiver. Listens for OSC messages like
//! `/hand/left/position` over UDP and keeps the latest pose of each hand,
//! converted into renderer space.
//!
//! ## Crates
//!
//! - `handosc_core`: math, coordinate conversion, pose store
//! - `handosc_networking`: OSC codec, router, UDP receivers, frame pacer
//! - `handosc` (this crate): config, tracker, render adapter
//!
//! ## Example
//!
//! ```rust
//! use std::collections::VecDeque;
//! use handosc::{HandTracker, RecordingTarget, RenderAdapter};
//! use handosc_networking::InboundMessage;
//!
//! let mut tracker = HandTracker::new();
//! let mut inbox = VecDeque::from([
//!     InboundMessage::floats("/hand/right/position", &[1.0, 2.0, 3.0]),
//! ]);
//! tracker.update(&mut inbox);
//!
//! let mut target = RecordingTarget::default();
//! RenderAdapter::default().render(&tracker.snapshot(), &mut target);
//! assert_eq!(target.calls.len(), 2);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod render;
pub mod tracker;

pub use config::{ConfigError, ConfigResult, TrackerConfig};
pub use render::{
    Color, DrawCall, DrawTarget, LogTarget, RecordingTarget, RenderAdapter, WireMesh,
    LEFT_HAND_COLOR, RIGHT_HAND_COLOR,
};
pub use tracker::HandTracker;
