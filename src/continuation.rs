//! Dynamic-wind node tree and first-class continuation capture/invocation.
//!
//! The core never calls a before/after thunk itself — it only knows the
//! *shape* of the tree and can compute which thunks an embedder must run,
//! in which order, to move from one node to another. This mirrors how the
//! teacher's `state.rs` describes transitions (`ExecuteState`,
//! `ProgramState`) as data for the caller to act on rather than code that
//! drives execution itself.
//!
//! `S` is an opaque, embedder-supplied representation of a thunk (or of
//! whatever control-state a continuation needs to restore); this module
//! never inspects it beyond cloning.
//!
//! Tree depth bookkeeping below is plain `usize` arithmetic bounded by
//! `Limits::max_wind_depth` well below any realistic overflow, so this
//! module opts out of the crate-wide `arithmetic_side_effects` lint
//! rather than wrapping every `+ 1` in a `checked_add`.
#![allow(clippy::arithmetic_side_effects)]

use std::rc::Rc;

struct Node<S> {
    before: S,
    after: S,
    parent: Option<WindNode<S>>,
    depth: usize,
}

/// A node in the dynamic-wind tree. Cheaply cloneable (it's a reference
/// counted handle), so continuations can capture one without copying the
/// tree itself.
pub struct WindNode<S>(Rc<Node<S>>);

impl<S> Clone for WindNode<S> {
    fn clone(&self) -> Self {
        WindNode(Rc::clone(&self.0))
    }
}

impl<S> PartialEq for WindNode<S> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
impl<S> Eq for WindNode<S> {}

impl<S> std::fmt::Debug for WindNode<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WindNode(depth={})", self.0.depth)
    }
}

impl<S> WindNode<S> {
    /// The parent node, or `None` at the root.
    pub fn parent(&self) -> Option<WindNode<S>> {
        self.0.parent.clone()
    }

    /// Depth of this node, with the root at depth zero.
    pub fn depth(&self) -> usize {
        self.0.depth
    }

    /// The thunk to run on entry to this frame (via `before`).
    pub fn before(&self) -> &S {
        &self.0.before
    }

    /// The thunk to run on exit from this frame (via `after`).
    pub fn after(&self) -> &S {
        &self.0.after
    }
}

impl<S> WindNode<S>
where
    S: Default,
{
    /// The empty root of the tree — no before/after thunks.
    pub fn root() -> Self {
        WindNode(Rc::new(Node {
            before: S::default(),
            after: S::default(),
            parent: None,
            depth: 0,
        }))
    }
}

impl<S: Clone> WindNode<S> {
    /// Push a child frame below this node with the given before/after
    /// thunks, without altering `self`. Callers that treat a `Context`'s
    /// current node as a cursor are expected to reassign it to the
    /// returned node.
    pub fn push_child(&self, before: S, after: S) -> WindNode<S> {
        WindNode(Rc::new(Node {
            before,
            after,
            parent: Some(self.clone()),
            depth: self.depth() + 1,
        }))
    }
}

/// The ordered set of thunks an embedder must run to move the dynamic
/// extent from one node to another: exit (`after`) thunks bottom-up
/// first, then enter (`before`) thunks top-down, per R5RS 6.4's
/// `dynamic-wind` semantics.
pub struct Transition<S> {
    /// Thunks to run, in order, while leaving `from` (nearest frame
    /// first).
    pub exits: Vec<S>,
    /// Thunks to run, in order, while entering `to` (outermost frame
    /// first).
    pub enters: Vec<S>,
}

/// Compute the thunks needed to move from `from` to `to`, via their
/// nearest common ancestor. Used both for tail-calling a captured
/// continuation and for unwinding to an enclosing `guard`/
/// `with-exception-handler` frame.
pub fn transition<S: Clone>(from: &WindNode<S>, to: &WindNode<S>) -> Transition<S> {
    let (nca, exit_count) = nearest_common_ancestor(from, to);

    let mut exits = Vec::with_capacity(exit_count);
    let mut cursor = from.clone();
    for _ in 0..exit_count {
        exits.push(cursor.after().clone());
        cursor = cursor.parent().expect("exit_count bounded by depth above nca");
    }
    debug_assert!(cursor == nca);

    let mut enter_chain = Vec::new();
    let mut cursor = to.clone();
    while cursor != nca {
        enter_chain.push(cursor.before().clone());
        cursor = cursor.parent().expect("to is a descendant of nca");
    }
    enter_chain.reverse();

    Transition {
        exits,
        enters: enter_chain,
    }
}

/// Find the nearest common ancestor of two nodes and how many steps
/// `from` must walk upward to reach it.
fn nearest_common_ancestor<S>(from: &WindNode<S>, to: &WindNode<S>) -> (WindNode<S>, usize) {
    let mut a = from.clone();
    let mut b = to.clone();
    let mut steps_up_a = 0usize;

    while a.depth() > b.depth() {
        a = a.parent().expect("depth() > 0 implies a parent");
        steps_up_a += 1;
    }
    while b.depth() > a.depth() {
        b = b.parent().expect("depth() > 0 implies a parent");
    }
    while a != b {
        a = a.parent().expect("distinct same-depth nodes share an ancestor");
        b = b.parent().expect("distinct same-depth nodes share an ancestor");
        steps_up_a += 1;
    }
    (a, steps_up_a)
}

/// A captured first-class continuation: the dynamic-wind node active at
/// capture time, plus whatever opaque control-state snapshot the
/// embedder needs to resume execution. Continuations are re-invocable
/// and re-entrant; invoking one computes a fresh [`Transition`] from
/// whatever node is current at invocation time, so the same continuation
/// can be called any number of times, including after its dynamic extent
/// has been exited.
#[derive(Clone)]
pub struct Continuation<S, K> {
    node: WindNode<S>,
    state: K,
}

impl<S: Clone, K: Clone> Continuation<S, K> {
    /// Capture the given control state at the given dynamic-wind node.
    pub fn capture(node: WindNode<S>, state: K) -> Self {
        Continuation { node, state }
    }

    /// The node active when this continuation was captured.
    pub fn node(&self) -> &WindNode<S> {
        &self.node
    }

    /// The captured control-state snapshot.
    pub fn state(&self) -> &K {
        &self.state
    }

    /// Compute the thunks to run, and the node to make current, when
    /// invoking this continuation from `current`.
    pub fn invoke_from(&self, current: &WindNode<S>) -> (Transition<S>, WindNode<S>) {
        (transition(current, &self.node), self.node.clone())
    }
}
