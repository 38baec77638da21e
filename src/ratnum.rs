//! Exact rational numbers.

use std::cmp::Ordering;

use crate::bignum::Bignum;
use crate::error::SimpleResult;

/// An exact rational in lowest terms with a positive denominator.
/// [`Ratnum::new`] is the only constructor and always restores both
/// invariants, so every other value of this type upholds them already.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ratnum {
    numer: Bignum,
    denom: Bignum,
}

impl Ratnum {
    /// Build a rational from a numerator and denominator, reducing by
    /// their gcd and normalizing the sign onto the numerator.
    pub fn new(numer: Bignum, denom: Bignum) -> SimpleResult<Self> {
        if denom.is_zero() {
            return Err(crate::error::ConditionTag::ArithDivByZero);
        }
        let (numer, denom) = if denom.is_negative() {
            (numer.negate(), denom.negate())
        } else {
            (numer, denom)
        };
        let g = numer.gcd(&denom);
        if g.is_zero() {
            return Ok(Ratnum {
                numer: Bignum::zero(),
                denom: Bignum::from_i64(1),
            });
        }
        let (numer, _) = numer.checked_divrem(&g).expect("gcd divides numerator exactly");
        let (denom, _) = denom.checked_divrem(&g).expect("gcd divides denominator exactly");
        Ok(Ratnum { numer, denom })
    }

    /// The normalized numerator.
    pub fn numer(&self) -> &Bignum {
        &self.numer
    }

    /// The normalized (always positive) denominator.
    pub fn denom(&self) -> &Bignum {
        &self.denom
    }

    /// Whether this rational's denominator is 1, i.e. it is integral.
    pub fn is_integer(&self) -> bool {
        self.denom == Bignum::from_i64(1)
    }

    fn add_impl(&self, other: &Self) -> SimpleResult<Self> {
        let numer = self
            .numer
            .checked_mul(&other.denom)?
            .checked_add(&other.numer.checked_mul(&self.denom)?)?;
        let denom = self.denom.checked_mul(&other.denom)?;
        Ratnum::new(numer, denom)
    }

    /// Exact addition.
    pub fn checked_add(&self, other: &Self) -> SimpleResult<Self> {
        self.add_impl(other)
    }

    /// Exact subtraction.
    pub fn checked_sub(&self, other: &Self) -> SimpleResult<Self> {
        self.add_impl(&other.negate())
    }

    /// Exact multiplication.
    pub fn checked_mul(&self, other: &Self) -> SimpleResult<Self> {
        Ratnum::new(
            self.numer.checked_mul(&other.numer)?,
            self.denom.checked_mul(&other.denom)?,
        )
    }

    /// Exact division.
    pub fn checked_div(&self, other: &Self) -> SimpleResult<Self> {
        if other.numer.is_zero() {
            return Err(crate::error::ConditionTag::ArithDivByZero);
        }
        Ratnum::new(
            self.numer.checked_mul(&other.denom)?,
            self.denom.checked_mul(&other.numer)?,
        )
    }

    /// Negation.
    pub fn negate(&self) -> Self {
        Ratnum {
            numer: self.numer.negate(),
            denom: self.denom.clone(),
        }
    }

    /// Three-way comparison via cross multiplication.
    pub fn compare(&self, other: &Self) -> Ordering {
        let lhs = self.numer.checked_mul(&other.denom).expect("cross product cannot overflow a Bignum");
        let rhs = other.numer.checked_mul(&self.denom).expect("cross product cannot overflow a Bignum");
        lhs.compare(&rhs)
    }

    /// Convert to the nearest `f64`, by repeated long division of the
    /// scaled numerator so very large numerator/denominator pairs still
    /// round correctly rather than overflowing to `inf`/`inf`.
    pub fn to_f64(&self) -> f64 {
        self.numer.to_f64() / self.denom.to_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(n: i64, d: i64) -> Ratnum {
        Ratnum::new(Bignum::from_i64(n), Bignum::from_i64(d)).unwrap()
    }

    #[test]
    fn construction_reduces_to_lowest_terms() {
        let half = r(2, 4);
        assert_eq!(half.numer().to_i64(), Some(1));
        assert_eq!(half.denom().to_i64(), Some(2));
    }

    #[test]
    fn negative_denominator_normalizes_to_numerator() {
        let v = r(1, -2);
        assert_eq!(v.numer().to_i64(), Some(-1));
        assert_eq!(v.denom().to_i64(), Some(2));
    }

    #[test]
    fn arithmetic_matches_expected() {
        let a = r(1, 2);
        let b = r(1, 3);
        let sum = a.checked_add(&b).unwrap();
        assert_eq!(sum, r(5, 6));
        let product = a.checked_mul(&b).unwrap();
        assert_eq!(product, r(1, 6));
    }

    #[test]
    fn division_by_zero_rational_is_recoverable() {
        let a = r(1, 2);
        let zero = r(0, 1);
        assert!(a.checked_div(&zero).is_err());
    }

    #[test]
    fn compare_cross_multiplies() {
        assert_eq!(r(1, 2).compare(&r(2, 4)), Ordering::Equal);
        assert_eq!(r(1, 3).compare(&r(1, 2)), Ordering::Less);
    }
}
