//! # Cross-thread Pose Publication
//!
//! ## The Problem
//!
//! ```text
//! Thread 1 (Ingest):  drains messages, WRITES poses
//! Thread 2 (Render):  READS poses every frame
//!
//! Field-by-field writes: reader can see position N with orientation N+1
//! ```
//!
//! ## The Solution: Whole-snapshot publication
//!
//! ```text
//! Ingest:  drain into its own PoseStore
//!          publish(store.snapshot())   <- one exclusive write
//! Render:  read()                      <- one shared read, full copy
//! ```
//!
//! The pair is always swapped as a unit, so a torn read is impossible.

mod shared_poses;

pub use shared_poses::SharedPoseStore;
