//! # HANDOSC Core
//!
//! Renderer-space pose state for two tracked hands.
//!
//! ## Architecture Rules
//!
//! 1. **Pure conversion** - the converter has no state and no failure path
//! 2. **Whole-field writes** - a position update never touches orientation
//! 3. **Unit orientations** - nothing non-normalized reaches the store
//!
//! ## Example
//!
//! ```rust
//! use handosc_core::{convert_position, Hand, PoseStore, Vec3};
//!
//! let mut store = PoseStore::new();
//! store.set_position(Hand::Right, convert_position(1.0, 2.0, 3.0));
//! assert_eq!(store.get(Hand::Right).position, Vec3::new(1.0, -2.0, 3.0));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod convert;
pub mod math;
pub mod pose;
pub mod sync;

pub use convert::{convert_orientation, convert_position};
pub use math::{Mat4, Quaternion, Vec3};
pub use pose::{Hand, Pose, PoseSnapshot, PoseStore};
pub use sync::SharedPoseStore;
