//! Condition type lattice and the handler-stack mechanics backing
//! `raise`, `with-exception-handler`, and `guard`.
//!
//! As with `continuation`, this module is deliberately inert: it never
//! invokes a handler procedure itself. It hands the embedder the handler
//! to call and lets the embedder's evaluator do the call, the same way
//! `continuation::transition` hands back thunks instead of running them.

use std::rc::Rc;

use crate::error::{Bug, BugVariant, CoreError};

struct ConditionTypeInner {
    name: String,
    parents: Vec<ConditionType>,
}

/// A node in the condition-type lattice rooted at `<condition>`.
///
/// Two `ConditionType`s are equal only if they are the same allocation:
/// R7RS condition types are created fresh by `make-condition-type` and
/// compared by identity, not by name.
#[derive(Clone)]
pub struct ConditionType(Rc<ConditionTypeInner>);

impl ConditionType {
    /// Create a new condition type with the given (possibly multiple)
    /// immediate supertypes.
    pub fn new(name: impl Into<String>, parents: Vec<ConditionType>) -> Self {
        ConditionType(Rc::new(ConditionTypeInner {
            name: name.into(),
            parents,
        }))
    }

    /// The root of the lattice, `<condition>` itself.
    pub fn root() -> Self {
        Self::new("condition", Vec::new())
    }

    /// The type's display name.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Whether `self` is `other`, or descends from it through any
    /// ancestor path (the lattice allows multiple supertypes).
    pub fn is_a(&self, other: &ConditionType) -> bool {
        self == other || self.0.parents.iter().any(|p| p.is_a(other))
    }
}

impl PartialEq for ConditionType {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for ConditionType {}

impl std::fmt::Debug for ConditionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ConditionType({})", self.0.name)
    }
}

/// A single condition instance: its most specific type plus named
/// fields. `V` is the embedder's Scheme value representation.
#[derive(Clone)]
pub struct Condition<V> {
    kind: ConditionType,
    fields: Vec<(String, V)>,
}

impl<V: Clone> Condition<V> {
    /// Build a condition of the given type with the given fields.
    pub fn new(kind: ConditionType, fields: Vec<(String, V)>) -> Self {
        Condition { kind, fields }
    }

    /// The condition's most specific type.
    pub fn kind(&self) -> &ConditionType {
        &self.kind
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&V> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Whether this condition's type is, or descends from, `ty`.
    pub fn has_type(&self, ty: &ConditionType) -> bool {
        self.kind.is_a(ty)
    }
}

/// A compound condition: a flattened set of simple conditions produced by
/// `condition` or `make-compound-condition` combining several component
/// conditions into one raised object, per R7RS 7th ed. §8.
#[derive(Clone)]
pub struct CompoundCondition<V> {
    components: Vec<Condition<V>>,
}

impl<V: Clone> CompoundCondition<V> {
    /// Build a compound condition from simple conditions and/or other
    /// compound conditions, flattening nested compounds so
    /// `components()` always yields only simple conditions.
    pub fn new(parts: Vec<ConditionLike<V>>) -> Self {
        let mut components = Vec::new();
        for part in parts {
            match part {
                ConditionLike::Simple(c) => components.push(c),
                ConditionLike::Compound(cc) => components.extend(cc.components),
            }
        }
        CompoundCondition { components }
    }

    /// The flattened simple conditions making up this compound.
    pub fn components(&self) -> &[Condition<V>] {
        &self.components
    }

    /// Whether any component condition is, or descends from, `ty`.
    pub fn has_type(&self, ty: &ConditionType) -> bool {
        self.components.iter().any(|c| c.has_type(ty))
    }
}

/// Either a simple or a compound condition, as accepted when building a
/// new compound condition.
pub enum ConditionLike<V> {
    /// A single, non-compound condition.
    Simple(Condition<V>),
    /// An already-built compound condition, to be flattened in.
    Compound(CompoundCondition<V>),
}

/// The stack of installed exception handlers backing
/// `with-exception-handler`/`raise`/`raise-continuable`.
///
/// `H` is the embedder's representation of a one-argument handler
/// procedure. The stack only tracks *which* handler is current; invoking
/// it (and re-installing the handler beneath it per R7RS 7th ed. 6.11,
/// so a handler that itself raises reaches the next-outer handler) is
/// the evaluator's job.
pub struct HandlerStack<H> {
    stack: Vec<H>,
}

impl<H> Default for HandlerStack<H> {
    fn default() -> Self {
        HandlerStack { stack: Vec::new() }
    }
}

impl<H> HandlerStack<H> {
    /// An empty handler stack, as installed at the top level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a new handler, making it current.
    pub fn push(&mut self, handler: H) {
        self.stack.push(handler);
    }

    /// Remove the current handler, returning it.
    ///
    /// Returns a [`Bug`] if the stack is already empty: callers are
    /// expected to push exactly once per `with-exception-handler`
    /// dynamic extent and pop exactly once on the way out, so an
    /// underflow means that discipline was violated elsewhere.
    pub fn pop(&mut self) -> Result<H, CoreError> {
        self.stack
            .pop()
            .ok_or_else(|| CoreError::from(Bug::new(BugVariant::HandlerStackUnderflow)))
    }

    /// The currently installed handler, if any.
    pub fn current(&self) -> Option<&H> {
        self.stack.last()
    }

    /// Number of handlers currently installed.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Whether no handler is installed (an uncaught `raise` at this
    /// point is a top-level error).
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lattice_subtype_check_follows_multiple_parents() {
        let root = ConditionType::root();
        let io = ConditionType::new("i/o", vec![root.clone()]);
        let read = ConditionType::new("i/o/read", vec![io.clone()]);
        assert!(read.is_a(&io));
        assert!(read.is_a(&root));
        assert!(!io.is_a(&read));
    }

    #[test]
    fn distinct_types_with_same_name_are_not_equal() {
        let a = ConditionType::new("error", vec![]);
        let b = ConditionType::new("error", vec![]);
        assert_ne!(a, b);
    }

    #[test]
    fn compound_condition_flattens_nested_compounds() {
        let t = ConditionType::root();
        let c1 = Condition::new(t.clone(), vec![("message".into(), 1)]);
        let c2 = Condition::new(t.clone(), vec![("message".into(), 2)]);
        let inner = CompoundCondition::new(vec![ConditionLike::Simple(c2)]);
        let outer = CompoundCondition::new(vec![
            ConditionLike::Simple(c1),
            ConditionLike::Compound(inner),
        ]);
        assert_eq!(outer.components().len(), 2);
    }

    #[test]
    fn handler_stack_pop_underflow_is_a_bug() {
        let mut stack: HandlerStack<u8> = HandlerStack::new();
        let err = stack.pop().unwrap_err();
        assert!(err.must_halt());
    }

    #[test]
    fn handler_stack_tracks_current() {
        let mut stack = HandlerStack::new();
        stack.push("outer");
        stack.push("inner");
        assert_eq!(stack.current(), Some(&"inner"));
        assert_eq!(stack.pop().unwrap(), "inner");
        assert_eq!(stack.current(), Some(&"outer"));
    }
}
