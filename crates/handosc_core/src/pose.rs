//! # Pose Store
//!
//! The latest renderer-space pose for each tracked hand.
//!
//! ## Lifecycle
//!
//! ```text
//! startup:  Left = Right = { origin, identity }
//! tick N:   router writes position OR orientation of one hand per message
//! frame N:  render side copies a PoseSnapshot
//! ```
//!
//! No history is kept. A position write never touches the orientation of
//! the same hand, and neither write touches the other hand.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::math::{Quaternion, Vec3};

/// One of the two tracked hands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    /// Left hand.
    Left,
    /// Right hand.
    Right,
}

impl Hand {
    /// Both hands, left first.
    pub const ALL: [Hand; 2] = [Hand::Left, Hand::Right];

    /// Lowercase name as it appears in message addresses.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Hand::Left => "left",
            Hand::Right => "right",
        }
    }

    #[inline]
    const fn index(self) -> usize {
        match self {
            Hand::Left => 0,
            Hand::Right => 1,
        }
    }
}

impl std::fmt::Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position + orientation of one hand in renderer space.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Pose {
    /// Renderer-space position.
    pub position: Vec3,
    /// Renderer-space orientation, always unit length.
    pub orientation: Quaternion,
}

impl Pose {
    /// Origin, identity rotation.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        orientation: Quaternion::IDENTITY,
    };
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Read-only copy of both hands, taken once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseSnapshot {
    /// Left hand pose.
    pub left: Pose,
    /// Right hand pose.
    pub right: Pose,
}

impl PoseSnapshot {
    /// Pose of the given hand.
    #[must_use]
    pub const fn get(&self, hand: Hand) -> Pose {
        match hand {
            Hand::Left => self.left,
            Hand::Right => self.right,
        }
    }
}

/// Owned, single-threaded store of the two hand poses.
///
/// Pass it by `&mut` into the router and by `&` to whoever renders.
/// For cross-thread use see [`crate::sync::SharedPoseStore`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PoseStore {
    poses: [Pose; 2],
}

impl PoseStore {
    /// Creates a store with both hands at the identity pose.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current pose of a hand.
    #[inline]
    #[must_use]
    pub fn get(&self, hand: Hand) -> Pose {
        self.poses[hand.index()]
    }

    /// Replaces the position of one hand.
    #[inline]
    pub fn set_position(&mut self, hand: Hand, position: Vec3) {
        self.poses[hand.index()].position = position;
    }

    /// Replaces the orientation of one hand.
    ///
    /// The value must already be normalized; the converter guarantees it.
    #[inline]
    pub fn set_orientation(&mut self, hand: Hand, orientation: Quaternion) {
        debug_assert!(
            (orientation.length() - 1.0).abs() < 1e-3,
            "orientation must be unit length"
        );
        self.poses[hand.index()].orientation = orientation;
    }

    /// Copies both poses.
    #[must_use]
    pub fn snapshot(&self) -> PoseSnapshot {
        PoseSnapshot {
            left: self.get(Hand::Left),
            right: self.get(Hand::Right),
        }
    }

    /// Puts both hands back at the identity pose.
    pub fn reset(&mut self) {
        self.poses = [Pose::IDENTITY; 2];
    }
}
