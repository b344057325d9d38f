use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use smallvec::SmallVec;

use crate::events::PenEvent;

/// Enough for a few frames of a fast pen without reallocating in the window procedure.
const INITIAL_CAPACITY: usize = 64;

/// A batch of events taken out of the queue in one go. Usually small enough to stay inline.
pub(crate) type Batch = SmallVec<[PenEvent; 16]>;

/// FIFO shared between the window procedure (pushes) and the polling side (drains).
///
/// The lock is only ever held for a push or for moving the whole contents out, never while calling
/// back into the host or the system.
#[derive(Clone, Debug)]
pub(crate) struct EventQueue {
    inner: Arc<Mutex<VecDeque<PenEvent>>>,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(INITIAL_CAPACITY))),
        }
    }
    fn lock(&self) -> MutexGuard<'_, VecDeque<PenEvent>> {
        // A panic mid-push can't leave a half-written event behind, the deque is still coherent.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
    pub fn push(&self, event: PenEvent) {
        self.lock().push_back(event);
    }
    /// Move out everything queued at this moment, oldest first. Events pushed afterwards wait for the next call.
    pub fn take_all(&self) -> Batch {
        self.lock().drain(..).collect()
    }
    pub fn clear(&self) {
        self.lock().clear();
    }
    pub fn len(&self) -> usize {
        self.lock().len()
    }
}
