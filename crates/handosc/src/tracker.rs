//! # Hand Tracker
//!
//! Owns the pose store and the router. The host calls [`HandTracker::update`]
//! once per tick with whatever [`MessageSource`] it receives on, then reads
//! [`HandTracker::snapshot`] to draw.
//!
//! ```text
//! tick N:  update(source) ──► drain ──► PoseStore ──► snapshot() ──► render
//!                                           │
//!                                           └─► SharedPoseStore (optional)
//! ```

use std::sync::Arc;

use handosc_core::{PoseSnapshot, PoseStore, SharedPoseStore};
use handosc_networking::{
    DrainReport, InboundMessage, MessageRouter, MessageSource, RouteOutcome,
};

/// Per-process hand tracking state.
pub struct HandTracker {
    store: PoseStore,
    router: MessageRouter,
    shared: Option<Arc<SharedPoseStore>>,
    updates: u64,
}

impl HandTracker {
    /// Creates a tracker with the standard `/hand/...` routes.
    #[must_use]
    pub fn new() -> Self {
        Self::with_router(MessageRouter::default())
    }

    /// Creates a tracker over a custom router.
    #[must_use]
    pub fn with_router(router: MessageRouter) -> Self {
        Self {
            store: PoseStore::new(),
            router,
            shared: None,
            updates: 0,
        }
    }

    /// Publishes into `shared` whenever an update changes the store.
    #[must_use]
    pub fn with_shared(mut self, shared: Arc<SharedPoseStore>) -> Self {
        shared.publish_store(&self.store);
        self.shared = Some(shared);
        self
    }

    /// Routes a single message immediately.
    pub fn on_message(&mut self, message: &InboundMessage) -> RouteOutcome {
        let outcome = self.router.dispatch(message, &mut self.store);
        if outcome.is_applied() {
            self.publish();
        }
        outcome
    }

    /// Drains everything `source` has pending. Call once per tick.
    pub fn update<S: MessageSource + ?Sized>(&mut self, source: &mut S) -> DrainReport {
        let report = self.router.drain(source, &mut self.store);
        self.updates += 1;
        if report.applied() > 0 {
            self.publish();
        }
        report
    }

    /// Both poses as of the last update.
    #[must_use]
    pub fn snapshot(&self) -> PoseSnapshot {
        self.store.snapshot()
    }

    /// Read access to the store.
    #[must_use]
    pub const fn store(&self) -> &PoseStore {
        &self.store
    }

    /// Routing totals since creation.
    #[must_use]
    pub const fn totals(&self) -> &DrainReport {
        self.router.totals()
    }

    /// Number of [`update`](Self::update) calls so far.
    #[must_use]
    pub const fn updates(&self) -> u64 {
        self.updates
    }

    /// Returns both hands to the origin with identity rotation.
    pub fn reset(&mut self) {
        self.store.reset();
        self.publish();
    }

    fn publish(&self) {
        if let Some(shared) = &self.shared {
            shared.publish_store(&self.store);
        }
    }
}

impl Default for HandTracker {
    fn default() -> Self {
        Self::new()
    }
}
