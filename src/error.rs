//! Error and condition-tag taxonomy for the runtime core.
//!
//! Mirrors the split the interpreters in this lineage use elsewhere: a
//! small, `Copy` enum of stable reason codes (the counterpart of
//! `PanicReason`) plus a couple of thin wrapper enums distinguishing
//! recoverable conditions from bugs that should halt the embedding VM.

use core::fmt;

/// Stable condition-tag vocabulary (see `SPEC_FULL.md` §6).
///
/// These are the leaves the condition system (`crate::condition`) wraps into
/// `<condition>` instances; embedders match on them instead of parsing
/// display strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ConditionTag {
    /// `io/read`
    #[display(fmt = "io/read")]
    IoRead,
    /// `io/port`
    #[display(fmt = "io/port")]
    IoPort,
    /// `io/system`
    #[display(fmt = "io/system")]
    IoSystem,
    /// `arith/div-by-zero`
    #[display(fmt = "arith/div-by-zero")]
    ArithDivByZero,
    /// `arith/overflow`
    #[display(fmt = "arith/overflow")]
    ArithOverflow,
    /// `arith/domain`
    #[display(fmt = "arith/domain")]
    ArithDomain,
    /// `arith/range` — conversion to a machine integer out of range.
    #[display(fmt = "arith/range")]
    ArithRange,
    /// `number/parse`
    #[display(fmt = "number/parse")]
    NumberParse,
    /// `number/impl-limit`
    #[display(fmt = "number/impl-limit")]
    NumberImplLimit,
}

impl ConditionTag {
    /// Whether this tag denotes a parse failure (as opposed to an
    /// arithmetic or I/O fault).
    pub const fn is_parse_error(self) -> bool {
        matches!(self, Self::NumberParse | Self::NumberImplLimit)
    }
}

/// Result of an operation that cannot touch the allocator or raise a bug,
/// only a recoverable condition. Named to match the teacher's
/// `SimpleResult`.
pub type SimpleResult<T> = Result<T, ConditionTag>;

/// A defect in the runtime itself: a violated invariant, not a user-facing
/// condition. Distinct from `ConditionTag` because the embedder must not
/// try to `guard` around these — they mean the dynamic-wind tree, the
/// handler stack, or the allocator's bookkeeping is corrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BugVariant {
    /// The dynamic-wind node tree no longer forms a tree rooted at `Root`.
    DynamicWindTreeCorrupted,
    /// A continuation was invoked whose capture node is not reachable from
    /// the current node through any ancestor chain.
    ContinuationNodeUnreachable,
    /// The handler stack was popped below empty.
    HandlerStackUnderflow,
    /// The allocator reported success but returned an invalid handle.
    AllocatorInvariantViolated,
}

impl fmt::Display for BugVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::DynamicWindTreeCorrupted => "dynamic-wind node tree corrupted",
            Self::ContinuationNodeUnreachable => {
                "continuation capture node unreachable from current node"
            }
            Self::HandlerStackUnderflow => "handler stack popped below empty",
            Self::AllocatorInvariantViolated => "allocator returned an invalid handle",
        };
        write!(f, "{msg}")
    }
}

/// A fatal defect, reported with the call site that detected it.
///
/// Constructed via [`Bug::new`], which captures its caller's location the
/// way `#[track_caller]` diagnostics do throughout this codebase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bug {
    variant: BugVariant,
    location: &'static core::panic::Location<'static>,
}

impl Bug {
    /// Construct a bug report, capturing the caller's source location.
    #[track_caller]
    pub fn new(variant: BugVariant) -> Self {
        let location = core::panic::Location::caller();
        tracing::error!(%variant, %location, "runtime bug");
        Bug { variant, location }
    }

    /// The kind of invariant that was violated.
    pub const fn variant(&self) -> BugVariant {
        self.variant
    }
}

impl fmt::Display for Bug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bug at {}: {}", self.location, self.variant)
    }
}

impl std::error::Error for Bug {}

/// Top-level error type returned by fallible core operations.
///
/// Mirrors the `InterpreterError` / `RuntimeError` split: `Recoverable`
/// wraps a condition tag the embedder is expected to `raise`, `Bug` is
/// the "abort with a diagnostic" tier from `SPEC_FULL.md` §7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum CoreError {
    /// Specified error with a well-formed recovery path: the embedder
    /// raises a condition carrying this tag.
    #[display(fmt = "recoverable condition: {_0}")]
    Recoverable(ConditionTag),
    /// Defect in the runtime itself; must halt the enclosing computation.
    #[display(fmt = "{_0}")]
    Bug(Bug),
}

impl CoreError {
    /// Flag whether the error is recoverable via `raise`/`guard`.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable(_))
    }

    /// Flag whether the error must halt execution.
    pub const fn must_halt(&self) -> bool {
        !self.is_recoverable()
    }

    /// Return the condition tag, if this is a recoverable error.
    pub const fn condition_tag(&self) -> Option<ConditionTag> {
        match self {
            Self::Recoverable(tag) => Some(*tag),
            Self::Bug(_) => None,
        }
    }
}

impl std::error::Error for CoreError {}

impl From<ConditionTag> for CoreError {
    fn from(tag: ConditionTag) -> Self {
        Self::Recoverable(tag)
    }
}

impl From<Bug> for CoreError {
    fn from(bug: Bug) -> Self {
        Self::Bug(bug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverable_is_not_halting() {
        let e = CoreError::from(ConditionTag::ArithDivByZero);
        assert!(e.is_recoverable());
        assert!(!e.must_halt());
        assert_eq!(e.condition_tag(), Some(ConditionTag::ArithDivByZero));
    }

    #[test]
    fn bug_must_halt() {
        let e = CoreError::from(Bug::new(BugVariant::HandlerStackUnderflow));
        assert!(e.must_halt());
        assert_eq!(e.condition_tag(), None);
    }

    #[test]
    fn tag_display_matches_stable_names() {
        assert_eq!(ConditionTag::ArithDivByZero.to_string(), "arith/div-by-zero");
        assert_eq!(ConditionTag::NumberImplLimit.to_string(), "number/impl-limit");
    }
}
