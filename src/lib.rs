//! Numeric tower, first-class continuation, and condition-system core
//! for a Scheme implementation.
//!
//! This crate implements the parts of a Scheme runtime that are
//! self-contained enough to validate in isolation from a full evaluator:
//! exact/inexact arithmetic across the fixnum/bignum/rational/flonum/
//! complex tower, bit-exact textual number I/O, `dynamic-wind`-aware
//! first-class continuations, and the `raise`/`guard`/
//! `with-exception-handler` condition system. It deliberately stops
//! short of parsing or evaluating Scheme source; see each module's docs
//! for the boundary.

#![deny(unsafe_code)]
#![deny(clippy::arithmetic_side_effects)]
#![warn(clippy::all)]
#![warn(missing_docs)]

pub mod bignum;
pub mod condition;
pub mod config;
pub mod context;
pub mod continuation;
pub mod error;
pub mod gcface;
pub mod lazy;
pub mod numio;
pub mod ratnum;
pub mod sysboundary;
pub mod tower;
pub mod value;

/// Re-exports of the types most embeddings will reach for, mirroring the
/// teacher's own `prelude` module so `use scheme_rt::prelude::*;` covers
/// the common case.
pub mod prelude {
    pub use crate::bignum::Bignum;
    pub use crate::condition::{CompoundCondition, Condition, ConditionType, HandlerStack};
    pub use crate::config::Limits;
    pub use crate::context::Context;
    pub use crate::continuation::{Continuation, Transition, WindNode};
    pub use crate::error::{Bug, BugVariant, ConditionTag, CoreError, SimpleResult};
    pub use crate::gcface::{Allocator, ArenaAllocator};
    pub use crate::lazy::{LazyPair, Outcome, Promise};
    pub use crate::numio::{number_to_string, parse_number};
    pub use crate::ratnum::Ratnum;
    pub use crate::tower;
    pub use crate::value::{Compnum, Procedure, RealPart, Value, FIX_MAX, FIX_MIN};
}
