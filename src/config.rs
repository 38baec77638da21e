//! Implementation limits and tunables.
//!
//! Mirrors `consts.rs` in the teacher crate: the numbers that parameterise
//! the core's behaviour live in one place instead of being scattered as
//! magic literals through the arithmetic and I/O modules.

/// Maximum magnitude of a base-10 exponent accepted during number parsing
/// before `number/impl-limit` fires for an `#e` prefix, per `SPEC_FULL.md`
/// §4.D. Chosen to match the largest exponent representable without
/// overflowing/underflowing `f64` (`|e| >= 324` already collapses to `0.0`
/// or `±inf.0` for inexact reads).
pub const MAX_EXACT_DECIMAL_EXPONENT: i64 = 324;

/// Powers-of-ten cached for `expt`, per §4.C. `10^340` is the largest power
/// of ten whose double approximation is still finite, giving headroom
/// above `MAX_EXACT_DECIMAL_EXPONENT`.
pub const EXPT_TEN_CACHE_LIMIT: u32 = 340;

/// Default maximum recursion depth for continuation re-entry bookkeeping
/// (guards against runaway `dynamic-wind` trees in malformed embeddings).
pub const DEFAULT_MAX_WIND_DEPTH: usize = 100_000;

/// Implementation-limit and default-behavior knobs threaded through parsing
/// and arithmetic, analogous to the teacher's `Context`/`consts` pair but
/// expressed as one plain `Copy` struct rather than a family of constants,
/// since every value here is meant to be overridable per embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Largest `|exponent|` accepted for an `#e`-prefixed decimal literal.
    pub max_exact_decimal_exponent: i64,
    /// Maximum number of `u64` limbs a bignum may hold before arithmetic
    /// raises `arith/overflow` instead of growing further. `None` means
    /// unbounded (bounded only by available memory).
    pub max_bignum_limbs: Option<usize>,
    /// Maximum dynamic-wind tree depth.
    pub max_wind_depth: usize,
    /// Default exactness when a numeric literal carries neither `#e` nor
    /// `#i` and contains a decimal point or exponent marker: `false` means
    /// such literals are inexact (the R5RS/R7RS default).
    pub default_exact_decimals: bool,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_exact_decimal_exponent: MAX_EXACT_DECIMAL_EXPONENT,
            max_bignum_limbs: None,
            max_wind_depth: DEFAULT_MAX_WIND_DEPTH,
            default_exact_decimals: false,
        }
    }
}

impl Limits {
    /// Start from the defaults and cap bignum growth — useful for
    /// embedders running on a memory budget.
    pub const fn with_max_bignum_limbs(mut self, limbs: usize) -> Self {
        self.max_bignum_limbs = Some(limbs);
        self
    }

    /// Start from the defaults and cap the dynamic-wind tree depth.
    pub const fn with_max_wind_depth(mut self, depth: usize) -> Self {
        self.max_wind_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_unbounded_bignums() {
        let limits = Limits::default();
        assert_eq!(limits.max_bignum_limbs, None);
    }

    #[test]
    fn builder_sets_bignum_cap() {
        let limits = Limits::default().with_max_bignum_limbs(4096);
        assert_eq!(limits.max_bignum_limbs, Some(4096));
    }
}
