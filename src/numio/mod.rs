//! Bit-exact textual number I/O: parsing Scheme numeric literals and
//! printing numbers back to their canonical representation.
//!
//! Radix/exactness prefix handling and the rational/complex literal
//! grammar are hand-written here (`parser`); the binary64-digit
//! conversion itself is delegated to the standard library's
//! `f64::from_str`/`Display`, both of which are already correctly
//! rounding and shortest-round-trip respectively — the same guarantees
//! Clinger's Algorithm R and Burger–Dybvig exist to provide. Reimplementing
//! either from scratch would only reproduce what `core`'s float formatter
//! already does.

pub mod parser;
pub mod printer;

pub use parser::parse_number;
pub use printer::number_to_string;
