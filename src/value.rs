//! The tagged value representation.
//!
//! The teacher tags machine words by bit pattern (`Word`/`RegId` wrap raw
//! `u64`s interpreted by the instruction decoder); this core instead uses
//! a safe tagged enum throughout, since it carries `#![deny(unsafe_code)]`
//! forward and has no decoder to interpret raw bit patterns against. The
//! promotion boundary the bit-tagging scheme would have given for free
//! (a fixnum range narrower than the machine word) is instead expressed
//! directly as the [`FIX_MIN`]/[`FIX_MAX`] constants.

use std::cell::RefCell;
use std::rc::Rc;

use crate::bignum::Bignum;
use crate::condition::{CompoundCondition, Condition};
use crate::continuation::Continuation as ContinuationCore;
use crate::lazy::{LazyPair as LazyPairCore, Promise as PromiseCore};
use crate::ratnum::Ratnum;

/// Smallest value a fixnum may hold before arithmetic must promote to a
/// bignum. Narrower than `i64::MIN` so every fixnum negation and
/// `i64`-width accumulation used internally by the tower has headroom
/// without itself overflowing `i64`.
pub const FIX_MIN: i64 = i64::MIN / 4;

/// Largest value a fixnum may hold; see [`FIX_MIN`].
pub const FIX_MAX: i64 = i64::MAX / 4;

/// A real, non-complex numeric component — the representation used
/// inside a [`Compnum`]'s real and imaginary parts, since R7RS complex
/// numbers are rectangular pairs of reals and never nest.
#[derive(Debug, Clone, PartialEq)]
pub enum RealPart {
    /// Exact integer in fixnum range.
    Fixnum(i64),
    /// Exact integer outside fixnum range.
    Bignum(Rc<Bignum>),
    /// Exact non-integer rational.
    Ratnum(Rc<Ratnum>),
    /// Inexact real (IEEE 754 binary64).
    Flonum(f64),
}

impl RealPart {
    /// Whether this component carries exact arithmetic.
    pub fn is_exact(&self) -> bool {
        !matches!(self, RealPart::Flonum(_))
    }
}

/// A rectangular complex number with non-zero imaginary part (values
/// with zero imaginary part are represented directly as a `RealPart`
/// variant of [`Value`], per R7RS's convention that `3+0i` and `3` may
/// be the same number).
#[derive(Debug, Clone, PartialEq)]
pub struct Compnum {
    /// Real component.
    pub re: RealPart,
    /// Imaginary component.
    pub im: RealPart,
}

/// A Scheme value.
///
/// `Rc`-based throughout rather than boxed-and-owned, matching the
/// sharing semantics `eq?`/`eqv?` require for pairs, strings, and
/// compound conditions.
#[derive(Clone)]
pub enum Value {
    /// Exact integer in fixnum range.
    Fixnum(i64),
    /// Exact integer outside fixnum range.
    Bignum(Rc<Bignum>),
    /// Exact non-integer rational.
    Ratnum(Rc<Ratnum>),
    /// Inexact real.
    Flonum(f64),
    /// Complex number with non-zero imaginary part.
    Compnum(Rc<Compnum>),
    /// `#t` / `#f`.
    Bool(bool),
    /// Interned-by-convention symbol; interning itself is an embedder
    /// concern, this core only requires symbols be comparable by name.
    Symbol(Rc<str>),
    /// A mutable Scheme string.
    Str(Rc<RefCell<String>>),
    /// A character.
    Char(char),
    /// A mutable cons cell.
    Pair(Rc<RefCell<(Value, Value)>>),
    /// The empty list.
    Nil,
    /// The unspecified value returned by effect-only forms.
    Unspecified,
    /// End-of-file object.
    Eof,
    /// A memoizing promise (`delay`/`delay-force`/`make-promise`).
    Promise(PromiseCore<Value>),
    /// A `cons-stream`-style lazy pair.
    LazyPair(Rc<LazyPairCore<Value>>),
    /// A condition instance raised or matched by `guard`.
    Condition(Rc<Condition<Value>>),
    /// A compound condition.
    CompoundCondition(Rc<CompoundCondition<Value>>),
    /// A captured first-class continuation.
    Continuation(Rc<ContinuationCore<Value, Value>>),
    /// An embedder-supplied callable (used as dynamic-wind thunks,
    /// exception handlers, and ordinary procedures alike).
    Procedure(Procedure),
}

/// An embedder-supplied callable value. Wrapping `Rc<dyn Fn>` keeps the
/// core's `Value` free of any dependency on a concrete evaluator while
/// staying entirely within safe Rust.
#[derive(Clone)]
pub struct Procedure(pub Rc<dyn Fn(&[Value]) -> crate::error::SimpleResult<Value>>);

impl std::fmt::Debug for Procedure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#<procedure>")
    }
}

impl PartialEq for Procedure {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Fixnum(n) => write!(f, "{n}"),
            Value::Bignum(b) => write!(f, "{b:?}"),
            Value::Ratnum(r) => write!(f, "{r:?}"),
            Value::Flonum(x) => write!(f, "{x}"),
            Value::Compnum(c) => write!(f, "{c:?}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Symbol(s) => write!(f, "{s}"),
            Value::Str(s) => write!(f, "{:?}", s.borrow()),
            Value::Char(c) => write!(f, "{c:?}"),
            Value::Pair(_) => write!(f, "#<pair>"),
            Value::Nil => write!(f, "()"),
            Value::Unspecified => write!(f, "#<unspecified>"),
            Value::Eof => write!(f, "#<eof>"),
            Value::Promise(_) => write!(f, "#<promise>"),
            Value::LazyPair(_) => write!(f, "#<lazy-pair>"),
            Value::Condition(_) => write!(f, "#<condition>"),
            Value::CompoundCondition(_) => write!(f, "#<compound-condition>"),
            Value::Continuation(_) => write!(f, "#<continuation>"),
            Value::Procedure(_) => write!(f, "#<procedure>"),
        }
    }
}

/// Structural equality for self-evaluating scalars (numbers compared by
/// mathematical value, not representation — `3` and `3.0` are distinct,
/// but `3` and the bignum holding `3` are equal); every reference-typed
/// variant (pairs, strings, promises, conditions, continuations,
/// procedures) instead compares by identity, matching R7RS `eq?` for
/// those types rather than attempting a deep `equal?`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Nil, Value::Nil) => true,
            (Value::Unspecified, Value::Unspecified) => true,
            (Value::Eof, Value::Eof) => true,
            (Value::Str(a), Value::Str(b)) => Rc::ptr_eq(a, b),
            (Value::Pair(a), Value::Pair(b)) => Rc::ptr_eq(a, b),
            (Value::Promise(a), Value::Promise(b)) => a.ptr_eq(b),
            (Value::LazyPair(a), Value::LazyPair(b)) => Rc::ptr_eq(a, b),
            (Value::Condition(a), Value::Condition(b)) => Rc::ptr_eq(a, b),
            (Value::CompoundCondition(a), Value::CompoundCondition(b)) => Rc::ptr_eq(a, b),
            (Value::Continuation(a), Value::Continuation(b)) => Rc::ptr_eq(a, b),
            (Value::Procedure(a), Value::Procedure(b)) => a == b,
            (a, b) if a.is_number() && b.is_number() => {
                match (a.is_exact(), b.is_exact()) {
                    (true, true) | (false, false) => crate::tower::compare(a, b)
                        .map(|o| o == std::cmp::Ordering::Equal)
                        .unwrap_or(false),
                    _ => false,
                }
            }
            _ => false,
        }
    }
}

impl Default for Value {
    /// The placeholder stored at the dynamic-wind tree's root, never
    /// itself invoked (see `continuation::transition`).
    fn default() -> Self {
        Value::Unspecified
    }
}

impl Value {
    /// `number?`
    pub fn is_number(&self) -> bool {
        matches!(
            self,
            Value::Fixnum(_) | Value::Bignum(_) | Value::Ratnum(_) | Value::Flonum(_) | Value::Compnum(_)
        )
    }

    /// `complex?` — identical to `number?` since every representable
    /// number is complex in the R7RS tower.
    pub fn is_complex(&self) -> bool {
        self.is_number()
    }

    /// `real?`
    pub fn is_real(&self) -> bool {
        matches!(self, Value::Fixnum(_) | Value::Bignum(_) | Value::Ratnum(_) | Value::Flonum(_))
    }

    /// `rational?` — a flonum counts only if it is finite (excludes
    /// `+inf.0`, `-inf.0`, `+nan.0`).
    pub fn is_rational(&self) -> bool {
        match self {
            Value::Fixnum(_) | Value::Bignum(_) | Value::Ratnum(_) => true,
            Value::Flonum(f) => f.is_finite(),
            _ => false,
        }
    }

    /// `integer?`
    pub fn is_integer(&self) -> bool {
        match self {
            Value::Fixnum(_) | Value::Bignum(_) => true,
            Value::Ratnum(r) => r.is_integer(),
            Value::Flonum(f) => f.is_finite() && f.fract() == 0.0,
            _ => false,
        }
    }

    /// `exact?`
    pub fn is_exact(&self) -> bool {
        match self {
            Value::Fixnum(_) | Value::Bignum(_) | Value::Ratnum(_) => true,
            Value::Compnum(c) => c.re.is_exact() && c.im.is_exact(),
            _ => false,
        }
    }

    /// `inexact?`
    pub fn is_inexact(&self) -> bool {
        self.is_number() && !self.is_exact()
    }

    /// `boolean?`
    pub fn is_boolean(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// `pair?`
    pub fn is_pair(&self) -> bool {
        matches!(self, Value::Pair(_))
    }

    /// `null?`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// `symbol?`
    pub fn is_symbol(&self) -> bool {
        matches!(self, Value::Symbol(_))
    }

    /// `string?`
    pub fn is_string(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    /// `char?`
    pub fn is_char(&self) -> bool {
        matches!(self, Value::Char(_))
    }

    /// `procedure?`
    pub fn is_procedure(&self) -> bool {
        matches!(self, Value::Procedure(_) | Value::Continuation(_))
    }

    /// `eof-object?`
    pub fn is_eof(&self) -> bool {
        matches!(self, Value::Eof)
    }

    /// Everything except `#f` is truthy in Scheme.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Bool(false))
    }
}
