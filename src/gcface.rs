//! Allocator interface.
//!
//! This crate does not implement a tracing or copying garbage collector
//! — that is squarely out of scope here. What it does provide is the
//! thin trait an embedder's real GC would sit behind, plus a safe,
//! non-reclaiming arena that satisfies the trait for tests and small
//! embeddings that would rather leak than link in a collector.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::CoreError;

/// An opaque handle to an allocated value. Allocators are free to make
/// this whatever representation suits them; this crate never inspects
/// a handle's internals, only passes it back to the allocator that
/// produced it.
pub trait Handle: Clone {}
impl<T: Clone> Handle for T {}

/// The operations an embedder's allocator/collector must provide.
///
/// Deliberately minimal: allocate atomic (pointer-free) data, allocate
/// pointer-containing data reachable from a set of root handles, and
/// register/unregister GC roots and finalizers. A real mark-sweep or
/// copying collector implements this trait against its own heap; this
/// crate only ever programs to the trait.
pub trait Allocator {
    /// The handle type this allocator hands back for allocated values.
    type Handle: Handle;

    /// Allocate a block holding no outgoing references (numbers,
    /// strings, byte vectors) — a collector can skip scanning it.
    fn new_atomic(&self, size: usize) -> Result<Self::Handle, CoreError>;

    /// Allocate a block that may hold references to other allocations,
    /// which a tracing collector must scan.
    fn new_pointer(&self, size: usize) -> Result<Self::Handle, CoreError>;

    /// Register a handle as a GC root, keeping it (and everything
    /// reachable from it) alive until [`Allocator::remove_root`].
    fn add_root(&self, handle: &Self::Handle);

    /// Undo a previous [`Allocator::add_root`].
    fn remove_root(&self, handle: &Self::Handle);

    /// Register a finalizer to run when `handle` is collected. A
    /// non-reclaiming allocator may simply never call it.
    fn register_finalizer(&self, handle: &Self::Handle, finalizer: Box<dyn FnOnce()>);
}

/// Handle type for [`ArenaAllocator`]: an index into its backing vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaHandle(usize);

struct Slot {
    size: usize,
    rooted: bool,
    finalizer: Option<Box<dyn FnOnce()>>,
}

/// A safe allocator that never reclaims memory: every allocation lives
/// until the arena itself is dropped, at which point any registered
/// finalizers run. Suitable for short-lived embeddings and for testing
/// the rest of this crate without wiring in a real collector.
#[derive(Default)]
pub struct ArenaAllocator {
    slots: RefCell<Vec<Slot>>,
}

impl ArenaAllocator {
    /// An empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live allocations (all of them, since nothing is ever
    /// reclaimed).
    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    /// Whether the arena holds no allocations.
    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }
}

impl Allocator for ArenaAllocator {
    type Handle = Rc<ArenaHandle>;

    fn new_atomic(&self, size: usize) -> Result<Self::Handle, CoreError> {
        self.allocate(size)
    }

    fn new_pointer(&self, size: usize) -> Result<Self::Handle, CoreError> {
        self.allocate(size)
    }

    fn add_root(&self, handle: &Self::Handle) {
        if let Some(slot) = self.slots.borrow_mut().get_mut(handle.0) {
            slot.rooted = true;
        }
    }

    fn remove_root(&self, handle: &Self::Handle) {
        if let Some(slot) = self.slots.borrow_mut().get_mut(handle.0) {
            slot.rooted = false;
        }
    }

    fn register_finalizer(&self, handle: &Self::Handle, finalizer: Box<dyn FnOnce()>) {
        if let Some(slot) = self.slots.borrow_mut().get_mut(handle.0) {
            slot.finalizer = Some(finalizer);
        }
    }
}

impl ArenaAllocator {
    fn allocate(&self, size: usize) -> Result<Rc<ArenaHandle>, CoreError> {
        let mut slots = self.slots.borrow_mut();
        let index = slots.len();
        slots.push(Slot {
            size,
            rooted: false,
            finalizer: None,
        });
        Ok(Rc::new(ArenaHandle(index)))
    }
}

impl Drop for ArenaAllocator {
    fn drop(&mut self) {
        for slot in self.slots.get_mut().iter_mut() {
            if let Some(finalizer) = slot.finalizer.take() {
                finalizer();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn allocations_get_distinct_handles() {
        let arena = ArenaAllocator::new();
        let a = arena.new_atomic(8).unwrap();
        let b = arena.new_pointer(16).unwrap();
        assert_ne!(*a, *b);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn root_tracking_round_trips() {
        let arena = ArenaAllocator::new();
        let h = arena.new_atomic(4).unwrap();
        arena.add_root(&h);
        assert!(arena.slots.borrow()[0].rooted);
        arena.remove_root(&h);
        assert!(!arena.slots.borrow()[0].rooted);
    }

    #[test]
    fn finalizer_runs_on_drop() {
        let ran = Rc::new(Cell::new(false));
        {
            let arena = ArenaAllocator::new();
            let h = arena.new_atomic(4).unwrap();
            let ran_clone = Rc::clone(&ran);
            arena.register_finalizer(&h, Box::new(move || ran_clone.set(true)));
        }
        assert!(ran.get());
    }
}
