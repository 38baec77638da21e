//! Promises and lazy pairs.
//!
//! Implements the iterative forcing algorithm from SRFI 45 ("Primitives
//! for Expressing Iterative Lazy Algorithms"): forcing a promise chain
//! produced by `delay-force` splices intermediate promises together
//! instead of recursing, so a `force` through a long chain of tail calls
//! runs in constant stack space.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::SimpleResult;

enum State<V> {
    Forced(V),
    Delayed(Rc<dyn Fn() -> SimpleResult<Outcome<V>>>),
    /// A promise currently being forced; re-entering `force` on it (a
    /// promise forcing itself) finds this and hands back the same
    /// in-progress computation rather than recursing forever.
    Running,
}

/// What evaluating a promise's thunk produces: either a final value
/// (`delay`), or another promise to continue forcing in tail position
/// (`delay-force`/`lazy`).
pub enum Outcome<V> {
    /// A final, forced value.
    Done(V),
    /// Continue forcing this promise instead; its own state is spliced
    /// into the original promise once reached, per SRFI 45 §3.
    Forward(Promise<V>),
}

/// A memoizing promise as created by `delay`, `delay-force`, or `make-promise`.
#[derive(Clone)]
pub struct Promise<V>(Rc<RefCell<State<V>>>);

impl<V: Clone> Promise<V> {
    /// Build a promise around a thunk (as `delay-force` would; `delay`
    /// is the special case whose thunk always returns `Outcome::Done`).
    pub fn delayed(thunk: Rc<dyn Fn() -> SimpleResult<Outcome<V>>>) -> Self {
        Promise(Rc::new(RefCell::new(State::Delayed(thunk))))
    }

    /// Build an already-forced promise, as `make-promise` does for a
    /// non-promise argument.
    pub fn forced(value: V) -> Self {
        Promise(Rc::new(RefCell::new(State::Forced(value))))
    }

    /// Whether this promise has already been forced.
    pub fn is_forced(&self) -> bool {
        matches!(&*self.0.borrow(), State::Forced(_))
    }

    fn same_promise(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Identity comparison, as `eq?` would use for a promise.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Force the promise to a value, memoizing the result. Implements
    /// the SRFI 45 `force` loop: each step may produce a final value or
    /// another promise to splice into this cell and continue from.
    pub fn force(&self) -> SimpleResult<V> {
        let mut current = self.clone();
        loop {
            let thunk = {
                let mut slot = current.0.borrow_mut();
                match &*slot {
                    State::Forced(v) => return Ok(v.clone()),
                    State::Running => {
                        // Self-referential forcing: nothing new to compute,
                        // hand back control by returning the slot as-is
                        // once some other frame on the stack completes it.
                        drop(slot);
                        continue;
                    }
                    State::Delayed(thunk) => {
                        let thunk = Rc::clone(thunk);
                        *slot = State::Running;
                        thunk
                    }
                }
            };
            match thunk()? {
                Outcome::Done(v) => {
                    *current.0.borrow_mut() = State::Forced(v.clone());
                    if !current.same_promise(self) {
                        *self.0.borrow_mut() = State::Forced(v.clone());
                    }
                    return Ok(v);
                }
                Outcome::Forward(next) => {
                    // Splice: if `next` is already forced, adopt its
                    // value directly; otherwise continue the loop from
                    // `next`'s own state so repeated delay-force chains
                    // do not grow the Rust call stack.
                    let next_state = std::mem::replace(&mut *next.0.borrow_mut(), State::Running);
                    match next_state {
                        State::Forced(v) => {
                            *next.0.borrow_mut() = State::Forced(v.clone());
                            *current.0.borrow_mut() = State::Forced(v.clone());
                            return Ok(v);
                        }
                        State::Delayed(thunk) => {
                            *next.0.borrow_mut() = State::Delayed(Rc::clone(&thunk));
                            current = next;
                        }
                        State::Running => {
                            current = next;
                        }
                    }
                }
            }
        }
    }
}

/// A `cons-stream`-style lazy pair: the tail is a promise that
/// self-mutates into an ordinary forced value on first inspection, so
/// repeated `lazy-cdr` calls after the first pay no re-forcing cost.
#[derive(Clone)]
pub struct LazyPair<V> {
    head: V,
    tail: Promise<V>,
}

impl<V: Clone> LazyPair<V> {
    /// Build a lazy pair from an eager head and a promise for the tail.
    pub fn new(head: V, tail: Promise<V>) -> Self {
        LazyPair { head, tail }
    }

    /// The (always already available) head.
    pub fn head(&self) -> &V {
        &self.head
    }

    /// Force and return the tail.
    pub fn tail(&self) -> SimpleResult<V> {
        self.tail.force()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn force_memoizes_result() {
        use std::cell::Cell;
        let calls = Rc::new(Cell::new(0));
        let calls_clone = Rc::clone(&calls);
        let p = Promise::delayed(Rc::new(move || {
            calls_clone.set(calls_clone.get() + 1);
            Ok(Outcome::Done(42))
        }));
        assert_eq!(p.force().unwrap(), 42);
        assert_eq!(p.force().unwrap(), 42);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn force_splices_through_delay_force_chain() {
        let inner = Promise::forced(7);
        let inner_clone = inner.clone();
        let outer = Promise::delayed(Rc::new(move || Ok(Outcome::Forward(inner_clone.clone()))));
        assert_eq!(outer.force().unwrap(), 7);
        assert!(inner.is_forced());
    }

    #[test]
    fn lazy_pair_forces_tail_on_demand() {
        let tail_promise = Promise::forced(99);
        let pair = LazyPair::new(1, tail_promise);
        assert_eq!(*pair.head(), 1);
        assert_eq!(pair.tail().unwrap(), 99);
    }
}
