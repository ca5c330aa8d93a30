//! Shared pose state for ingest/render thread communication.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::pose::{PoseSnapshot, PoseStore};

/// Published pose pair with a generation counter.
///
/// The ingest side owns a plain [`PoseStore`] and publishes it once per
/// drain. Readers always get both hands from the same publication.
///
/// ```rust,ignore
/// let shared = Arc::new(SharedPoseStore::new());
///
/// // ingest thread
/// router.drain(&mut source, &mut store);
/// shared.publish_store(&store);
///
/// // render thread
/// let (generation, poses) = shared.read_with_generation();
/// ```
pub struct SharedPoseStore {
    /// Last published pair.
    current: RwLock<PoseSnapshot>,
    /// Number of publications so far.
    generation: AtomicU64,
}

impl SharedPoseStore {
    /// Creates a shared store holding identity poses at generation 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: RwLock::new(PoseSnapshot::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// Replaces the published pair in one exclusive write.
    ///
    /// Returns the new generation.
    pub fn publish(&self, snapshot: PoseSnapshot) -> u64 {
        let mut guard = self.current.write();
        *guard = snapshot;
        // Bumped while the write lock is held so generation and data agree.
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Publishes the current contents of a store.
    pub fn publish_store(&self, store: &PoseStore) -> u64 {
        self.publish(store.snapshot())
    }

    /// Copies the last published pair.
    #[must_use]
    pub fn read(&self) -> PoseSnapshot {
        *self.current.read()
    }

    /// Copies the last published pair together with its generation.
    #[must_use]
    pub fn read_with_generation(&self) -> (u64, PoseSnapshot) {
        let guard = self.current.read();
        (self.generation.load(Ordering::Acquire), *guard)
    }

    /// Number of publications so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

impl Default for SharedPoseStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Quaternion, Vec3};
    use crate::pose::Hand;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_publish_and_read() {
        let shared = SharedPoseStore::new();
        assert_eq!(shared.generation(), 0);
        assert_eq!(shared.read(), PoseSnapshot::default());

        let mut store = PoseStore::new();
        store.set_position(Hand::Left, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(shared.publish_store(&store), 1);

        let (generation, snap) = shared.read_with_generation();
        assert_eq!(generation, 1);
        assert_eq!(snap.left.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(snap.right, store.get(Hand::Right));
    }

    #[test]
    fn test_readers_never_see_torn_pairs() {
        let shared = Arc::new(SharedPoseStore::new());

        // Writer publishes pairs where every component encodes the update index.
        let writer = {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                let mut store = PoseStore::new();
                for i in 1..=2_000u32 {
                    #[allow(clippy::cast_precision_loss)]
                    let v = i as f32;
                    for hand in Hand::ALL {
                        store.set_position(hand, Vec3::new(v, v, v));
                        store.set_orientation(hand, Quaternion::IDENTITY);
                    }
                    shared.publish_store(&store);
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    let mut last_generation = 0;
                    for _ in 0..2_000 {
                        let (generation, snap) = shared.read_with_generation();
                        assert!(generation >= last_generation);
                        last_generation = generation;
                        assert_eq!(snap.left.position, snap.right.position);
                        #[allow(clippy::cast_precision_loss)]
                        let expected = generation as f32;
                        assert_eq!(snap.left.position.x, expected);
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for r in readers {
            r.join().unwrap();
        }
        assert_eq!(shared.generation(), 2_000);
    }
}
