//! Per-VM runtime state.
//!
//! The teacher bundles everything a running interpreter needs to mutate
//! into one `Interpreter<M, S, Tx, Ecal>` struct instead of module-level
//! statics, threading it through every instruction handler by `&mut self`.
//! `Context` here plays the same role for this crate: the handler stack,
//! the current dynamic-wind node, and the implementation limits all live
//! on one struct so an embedding can run more than one Scheme VM in a
//! process without any of them sharing mutable state.

use crate::condition::HandlerStack;
use crate::config::Limits;
use crate::continuation::WindNode;
use crate::error::{Bug, BugVariant, CoreError};

/// Bundled mutable state for a single running Scheme VM.
///
/// Generic over `S`, the embedder-supplied representation of a
/// dynamic-wind thunk, and `H`, the embedder's representation of an
/// exception handler procedure. Keeping both as type parameters rather
/// than hard-coding a representation is the design chosen in
/// `SPEC_FULL.md` §9: this core is agnostic to whatever the surrounding
/// evaluator uses for its procedures.
pub struct Context<S, H> {
    handlers: HandlerStack<H>,
    current_wind: WindNode<S>,
    limits: Limits,
}

impl<S: Default, H> Context<S, H> {
    /// Build a fresh context with the given limits, rooted at an empty
    /// dynamic-wind tree and no handlers installed.
    pub fn new(limits: Limits) -> Self {
        Context {
            handlers: HandlerStack::new(),
            current_wind: WindNode::root(),
            limits,
        }
    }
}

impl<S, H> Context<S, H> {
    /// The active exception-handler stack.
    pub fn handlers(&self) -> &HandlerStack<H> {
        &self.handlers
    }

    /// Mutable access to the active exception-handler stack.
    pub fn handlers_mut(&mut self) -> &mut HandlerStack<H> {
        &mut self.handlers
    }

    /// The dynamic-wind node currently in scope.
    pub fn current_wind(&self) -> &WindNode<S> {
        &self.current_wind
    }

    /// Implementation limits in effect for this VM.
    pub const fn limits(&self) -> &Limits {
        &self.limits
    }
}

impl<S: Clone, H> Context<S, H> {
    /// Push a new dynamic-wind frame, making it current. Returns a `Bug`
    /// if doing so would exceed `Limits::max_wind_depth` — an embedding
    /// that hits this has a runaway `dynamic-wind` recursion, not a
    /// recoverable condition.
    pub fn enter_wind(&mut self, before: S, after: S) -> Result<(), CoreError> {
        if self.current_wind.depth() >= self.limits.max_wind_depth {
            tracing::warn!(depth = self.current_wind.depth(), "dynamic-wind depth limit reached");
            return Err(CoreError::from(Bug::new(BugVariant::DynamicWindTreeCorrupted)));
        }
        self.current_wind = self.current_wind.push_child(before, after);
        tracing::trace!(depth = self.current_wind.depth(), "entered dynamic-wind frame");
        Ok(())
    }

    /// Pop the current dynamic-wind frame back to its parent.
    ///
    /// Returns a [`Bug`] if called at the root, since the root never has
    /// an after-thunk to unwind and callers should not invoke this there.
    pub fn exit_wind(&mut self) -> Result<(), CoreError> {
        match self.current_wind.parent() {
            Some(parent) => {
                self.current_wind = parent;
                tracing::trace!(depth = self.current_wind.depth(), "exited dynamic-wind frame");
                Ok(())
            }
            None => {
                tracing::error!("exit_wind called at the dynamic-wind root");
                Err(CoreError::from(Bug::new(BugVariant::DynamicWindTreeCorrupted)))
            }
        }
    }

    /// Replace the current dynamic-wind node wholesale, as happens when a
    /// captured continuation is invoked and the before/after thunks along
    /// the path to its node have already been run.
    pub fn set_current_wind(&mut self, node: WindNode<S>) {
        self.current_wind = node;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> Context<u32, u32> {
        Context::new(Limits::default())
    }

    #[test]
    fn fresh_context_is_at_root() {
        let ctx = fresh();
        assert!(ctx.current_wind().parent().is_none());
    }

    #[test]
    fn enter_then_exit_returns_to_root() {
        let mut ctx = fresh();
        ctx.enter_wind(1, 2).unwrap();
        assert!(ctx.current_wind().parent().is_some());
        ctx.exit_wind().unwrap();
        assert!(ctx.current_wind().parent().is_none());
    }

    #[test]
    fn exit_at_root_is_a_bug() {
        let mut ctx = fresh();
        let err = ctx.exit_wind().unwrap_err();
        assert!(err.must_halt());
    }

    #[test]
    fn wind_depth_limit_is_enforced() {
        let mut ctx: Context<u32, u32> = Context::new(Limits::default().with_max_wind_depth(1));
        ctx.enter_wind(1, 2).unwrap();
        let err = ctx.enter_wind(3, 4).unwrap_err();
        assert!(err.must_halt());
    }
}
