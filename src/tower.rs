//! The numeric tower: contagion, dispatch, and the mixed-mode arithmetic,
//! comparison, and rounding operations built on top of
//! `bignum`/`ratnum`/`value`.
//!
//! Every binary operation promotes its operands up the contagion ladder
//! `fixnum ≺ bignum ≺ rational ≺ flonum ≺ compnum` to a common
//! representation, then dispatches to the representation-specific
//! routine, the same two-step shape the teacher's instruction handlers
//! use (decode operands to a common word width, then compute).

use std::cmp::Ordering;
use std::rc::Rc;
use std::sync::OnceLock;

use crate::bignum::Bignum;
use crate::error::{ConditionTag, SimpleResult};
use crate::ratnum::Ratnum;
use crate::value::{Compnum, RealPart, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Rank {
    Fixnum,
    Bignum,
    Ratnum,
    Flonum,
    Compnum,
}

fn rank(v: &Value) -> SimpleResult<Rank> {
    Ok(match v {
        Value::Fixnum(_) => Rank::Fixnum,
        Value::Bignum(_) => Rank::Bignum,
        Value::Ratnum(_) => Rank::Ratnum,
        Value::Flonum(_) => Rank::Flonum,
        Value::Compnum(_) => Rank::Compnum,
        _ => return Err(ConditionTag::ArithDomain),
    })
}

fn as_bignum(v: &Value) -> Bignum {
    match v {
        Value::Fixnum(n) => Bignum::from_i64(*n),
        Value::Bignum(b) => (**b).clone(),
        _ => unreachable!("as_bignum called on a non-integer rank"),
    }
}

/// Whether `v` is the exact integer zero (always `Fixnum(0)`; a bignum
/// never holds zero, per `bignum.rs`'s normalization invariant).
fn is_exact_zero(v: &Value) -> bool {
    matches!(v, Value::Fixnum(0))
}

/// Whether `v` is the exact integer one.
fn is_exact_one(v: &Value) -> bool {
    matches!(v, Value::Fixnum(1))
}

/// Like [`as_bignum`], but for call sites (`quotient`/`remainder`/
/// `modulo`/`gcd`) not already guarded by a `dispatch_binop!` rank
/// check, so malformed input (a rational, flonum, or complex argument)
/// raises `arith/domain` instead of panicking.
fn require_integer(v: &Value) -> SimpleResult<Bignum> {
    match v {
        Value::Fixnum(n) => Ok(Bignum::from_i64(*n)),
        Value::Bignum(b) => Ok((**b).clone()),
        _ => Err(ConditionTag::ArithDomain),
    }
}

fn as_ratnum(v: &Value) -> Ratnum {
    match v {
        Value::Fixnum(_) | Value::Bignum(_) => {
            Ratnum::new(as_bignum(v), Bignum::from_i64(1)).expect("denominator 1 is never zero")
        }
        Value::Ratnum(r) => (**r).clone(),
        _ => unreachable!("as_ratnum called on a non-rational rank"),
    }
}

/// Convert any real value to its nearest `f64`.
pub fn as_flonum(v: &Value) -> f64 {
    match v {
        Value::Fixnum(n) => *n as f64,
        Value::Bignum(b) => b.to_f64(),
        Value::Ratnum(r) => r.to_f64(),
        Value::Flonum(f) => *f,
        _ => f64::NAN,
    }
}

fn real_part_to_value(r: &RealPart) -> Value {
    match r {
        RealPart::Fixnum(n) => Value::Fixnum(*n),
        RealPart::Bignum(b) => Value::Bignum(Rc::clone(b)),
        RealPart::Ratnum(r) => Value::Ratnum(Rc::clone(r)),
        RealPart::Flonum(f) => Value::Flonum(*f),
    }
}

fn value_to_real_part(v: &Value) -> RealPart {
    match normalize(v.clone()) {
        Value::Fixnum(n) => RealPart::Fixnum(n),
        Value::Bignum(b) => RealPart::Bignum(b),
        Value::Ratnum(r) => RealPart::Ratnum(r),
        Value::Flonum(f) => RealPart::Flonum(f),
        _ => RealPart::Flonum(f64::NAN),
    }
}

/// Demote an integer-valued `Bignum` back to a `Fixnum` `Value` when it
/// fits, and reduce a `Ratnum` whose denominator is 1 to an integer
/// `Value`. Every construction path in this module funnels its result
/// through here so two equal numbers always end up represented
/// identically, as `eqv?`/`=` require.
pub fn normalize(v: Value) -> Value {
    match v {
        Value::Bignum(b) => match b.to_i64() {
            Some(n) if (crate::value::FIX_MIN..=crate::value::FIX_MAX).contains(&n) => Value::Fixnum(n),
            _ => Value::Bignum(b),
        },
        Value::Ratnum(r) if r.is_integer() => normalize(Value::Bignum(Rc::new(r.numer().clone()))),
        Value::Compnum(c) if is_real_zero(&c.im) => real_part_to_value(&c.re),
        other => other,
    }
}

fn is_real_zero(r: &RealPart) -> bool {
    match r {
        RealPart::Fixnum(0) => true,
        RealPart::Bignum(b) => b.is_zero(),
        RealPart::Ratnum(_) => false,
        RealPart::Flonum(f) => *f == 0.0,
        _ => false,
    }
}

macro_rules! dispatch_binop {
    ($a:expr, $b:expr, $fixnum:expr, $bignum:expr, $ratnum:expr, $flonum:expr, $compnum:expr) => {{
        let ra = rank($a)?;
        let rb = rank($b)?;
        match ra.max(rb) {
            Rank::Fixnum => $fixnum,
            Rank::Bignum => $bignum,
            Rank::Ratnum => $ratnum,
            Rank::Flonum => $flonum,
            Rank::Compnum => $compnum,
        }
    }};
}

/// Exact or inexact addition, contagion-promoted to the wider operand's
/// representation.
pub fn add(a: &Value, b: &Value) -> SimpleResult<Value> {
    let result = dispatch_binop!(
        a,
        b,
        {
            let (Value::Fixnum(x), Value::Fixnum(y)) = (a, b) else { unreachable!() };
            match x.checked_add(*y) {
                Some(sum) if (crate::value::FIX_MIN..=crate::value::FIX_MAX).contains(&sum) => {
                    Value::Fixnum(sum)
                }
                _ => Value::Bignum(Rc::new(as_bignum(a).checked_add(&as_bignum(b))?)),
            }
        },
        Value::Bignum(Rc::new(as_bignum(a).checked_add(&as_bignum(b))?)),
        Value::Ratnum(Rc::new(as_ratnum(a).checked_add(&as_ratnum(b))?)),
        Value::Flonum(as_flonum(a) + as_flonum(b)),
        complex_add(a, b)?
    );
    Ok(normalize(result))
}

/// Subtraction; `a - b`.
pub fn sub(a: &Value, b: &Value) -> SimpleResult<Value> {
    add(a, &negate(b)?)
}

/// Negation.
pub fn negate(v: &Value) -> SimpleResult<Value> {
    let result = match v {
        Value::Fixnum(n) if *n != crate::value::FIX_MIN => Value::Fixnum(-n),
        Value::Fixnum(n) => Value::Bignum(Rc::new(Bignum::from_i64(*n).negate())),
        Value::Bignum(b) => Value::Bignum(Rc::new(b.negate())),
        Value::Ratnum(r) => Value::Ratnum(Rc::new(r.negate())),
        Value::Flonum(f) => Value::Flonum(-f),
        Value::Compnum(c) => Value::Compnum(Rc::new(Compnum {
            re: value_to_real_part(&negate(&real_part_to_value(&c.re))?),
            im: value_to_real_part(&negate(&real_part_to_value(&c.im))?),
        })),
        _ => return Err(ConditionTag::ArithDomain),
    };
    Ok(normalize(result))
}

/// Multiplication. Exact zero absorbs regardless of the other operand's
/// kind (`(* 0 2.0)` is the exact `0`, not `0.0`); exact one is neutral,
/// returning the other operand unchanged rather than round-tripping it
/// through the wider representation.
pub fn mul(a: &Value, b: &Value) -> SimpleResult<Value> {
    rank(a)?;
    rank(b)?;
    if is_exact_zero(a) || is_exact_zero(b) {
        return Ok(Value::Fixnum(0));
    }
    if is_exact_one(a) {
        return Ok(b.clone());
    }
    if is_exact_one(b) {
        return Ok(a.clone());
    }
    let result = dispatch_binop!(
        a,
        b,
        {
            let (Value::Fixnum(x), Value::Fixnum(y)) = (a, b) else { unreachable!() };
            match x.checked_mul(*y) {
                Some(prod) if (crate::value::FIX_MIN..=crate::value::FIX_MAX).contains(&prod) => {
                    Value::Fixnum(prod)
                }
                _ => Value::Bignum(Rc::new(as_bignum(a).checked_mul(&as_bignum(b))?)),
            }
        },
        Value::Bignum(Rc::new(as_bignum(a).checked_mul(&as_bignum(b))?)),
        Value::Ratnum(Rc::new(as_ratnum(a).checked_mul(&as_ratnum(b))?)),
        Value::Flonum(as_flonum(a) * as_flonum(b)),
        complex_mul(a, b)?
    );
    Ok(normalize(result))
}

/// Division. Exact division by exact zero raises `arith/div-by-zero`;
/// inexact division by `0.0` follows IEEE 754 and yields an infinity or
/// NaN, matching R7RS `/`'s note that only the exact case signals an
/// error.
pub fn div(a: &Value, b: &Value) -> SimpleResult<Value> {
    rank(a)?;
    rank(b)?;
    if is_exact_one(b) {
        return Ok(a.clone());
    }
    let result = dispatch_binop!(
        a,
        b,
        Value::Ratnum(Rc::new(as_ratnum(a).checked_div(&as_ratnum(b))?)),
        Value::Ratnum(Rc::new(as_ratnum(a).checked_div(&as_ratnum(b))?)),
        Value::Ratnum(Rc::new(as_ratnum(a).checked_div(&as_ratnum(b))?)),
        Value::Flonum(as_flonum(a) / as_flonum(b)),
        complex_div(a, b)?
    );
    Ok(normalize(result))
}

fn complex_add(a: &Value, b: &Value) -> SimpleResult<Value> {
    let (ca, cb) = (as_compnum(a), as_compnum(b));
    let re = add(&real_part_to_value(&ca.re), &real_part_to_value(&cb.re))?;
    let im = add(&real_part_to_value(&ca.im), &real_part_to_value(&cb.im))?;
    Ok(Value::Compnum(Rc::new(Compnum {
        re: value_to_real_part(&re),
        im: value_to_real_part(&im),
    })))
}

fn complex_mul(a: &Value, b: &Value) -> SimpleResult<Value> {
    let (ca, cb) = (as_compnum(a), as_compnum(b));
    let (are, aim) = (real_part_to_value(&ca.re), real_part_to_value(&ca.im));
    let (bre, bim) = (real_part_to_value(&cb.re), real_part_to_value(&cb.im));
    let re = sub(&mul(&are, &bre)?, &mul(&aim, &bim)?)?;
    let im = add(&mul(&are, &bim)?, &mul(&aim, &bre)?)?;
    Ok(Value::Compnum(Rc::new(Compnum {
        re: value_to_real_part(&re),
        im: value_to_real_part(&im),
    })))
}

fn complex_div(a: &Value, b: &Value) -> SimpleResult<Value> {
    let (ca, cb) = (as_compnum(a), as_compnum(b));
    let (are, aim) = (real_part_to_value(&ca.re), real_part_to_value(&ca.im));
    let (bre, bim) = (real_part_to_value(&cb.re), real_part_to_value(&cb.im));
    let denom = add(&mul(&bre, &bre)?, &mul(&bim, &bim)?)?;
    let re = div(&add(&mul(&are, &bre)?, &mul(&aim, &bim)?)?, &denom)?;
    let im = div(&sub(&mul(&aim, &bre)?, &mul(&are, &bim)?)?, &denom)?;
    Ok(Value::Compnum(Rc::new(Compnum {
        re: value_to_real_part(&re),
        im: value_to_real_part(&im),
    })))
}

fn as_compnum(v: &Value) -> Compnum {
    match v {
        Value::Compnum(c) => (**c).clone(),
        other => Compnum {
            re: value_to_real_part(other),
            im: RealPart::Fixnum(0),
        },
    }
}

/// Three-way numeric comparison. Mixed exact/inexact comparisons are
/// made precise by converting the flonum operand to its exact rational
/// value (decoding its IEEE 754 bit pattern) rather than converting the
/// exact operand to a flonum, so e.g. `(= (- (expt 2 53) 1) 9007199254740992.0)`
/// correctly reports `#f`-by-inequality instead of a rounding-induced
/// false positive.
pub fn compare(a: &Value, b: &Value) -> SimpleResult<Ordering> {
    if matches!(a, Value::Compnum(_)) || matches!(b, Value::Compnum(_)) {
        return Err(ConditionTag::ArithDomain);
    }
    match (a, b) {
        (Value::Flonum(x), Value::Flonum(y)) => x.partial_cmp(y).ok_or(ConditionTag::ArithDomain),
        (Value::Flonum(f), other) => compare_flonum_exact(*f, other).map(Ordering::reverse),
        (other, Value::Flonum(f)) => compare_flonum_exact(*f, other),
        _ => Ok(as_ratnum(a).compare(&as_ratnum(b))),
    }
}

/// Compare an exact real `other` against flonum `f`, returning
/// `other.cmp(f)`.
fn compare_flonum_exact(f: f64, other: &Value) -> SimpleResult<Ordering> {
    if f.is_nan() {
        return Err(ConditionTag::ArithDomain);
    }
    if f.is_infinite() {
        return Ok(if f > 0.0 { Ordering::Less } else { Ordering::Greater });
    }
    let exact_f = decode_flonum_exact(f);
    Ok(as_ratnum(other).compare(&exact_f))
}

/// Decode an IEEE 754 binary64 into its exact rational value via
/// `f64::to_bits`, giving `compare`/`exact` bit-exact results instead of
/// going through a decimal round trip.
pub fn decode_flonum_exact(f: f64) -> Ratnum {
    if f == 0.0 {
        return Ratnum::new(Bignum::zero(), Bignum::from_i64(1)).expect("1 is never zero");
    }
    let bits = f.to_bits();
    let sign = if bits >> 63 == 1 { -1i64 } else { 1 };
    let biased_exp = ((bits >> 52) & 0x7ff) as i64;
    let mantissa = bits & 0xf_ffff_ffff_ffff;

    let (significand, exponent) = if biased_exp == 0 {
        (mantissa, -1074i64)
    } else {
        (mantissa | (1 << 52), biased_exp - 1075)
    };

    let significand = Bignum::from_u64(significand).checked_mul(&Bignum::from_i64(sign)).expect("sign is +-1");
    if exponent >= 0 {
        let scaled = significand
            .checked_mul(&Bignum::from_i64(2).ash(exponent))
            .expect("ash by a small exponent cannot overflow a Bignum");
        Ratnum::new(scaled, Bignum::from_i64(1)).expect("1 is never zero")
    } else {
        let denom = Bignum::from_i64(1).ash(-exponent);
        Ratnum::new(significand, denom).expect("power-of-two denominator is never zero")
    }
}

/// `gcd` over exact integers; always non-negative.
pub fn gcd(a: &Value, b: &Value) -> SimpleResult<Value> {
    Ok(normalize(Value::Bignum(Rc::new(require_integer(a)?.gcd(&require_integer(b)?)))))
}

/// `quotient` — truncating integer division.
pub fn quotient(a: &Value, b: &Value) -> SimpleResult<Value> {
    let (q, _) = require_integer(a)?.checked_divrem(&require_integer(b)?)?;
    Ok(normalize(Value::Bignum(Rc::new(q))))
}

/// `remainder` — remainder taking the dividend's sign.
pub fn remainder(a: &Value, b: &Value) -> SimpleResult<Value> {
    let (_, r) = require_integer(a)?.checked_divrem(&require_integer(b)?)?;
    Ok(normalize(Value::Bignum(Rc::new(r))))
}

/// `modulo` — remainder taking the divisor's sign.
pub fn modulo(a: &Value, b: &Value) -> SimpleResult<Value> {
    let divisor = require_integer(b)?;
    let (_, r) = require_integer(a)?.checked_divrem(&divisor)?;
    let result = if !r.is_zero() && r.is_negative() != divisor.is_negative() {
        r.checked_add(&divisor)?
    } else {
        r
    };
    Ok(normalize(Value::Bignum(Rc::new(result))))
}

/// Rounding mode for [`round_real`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundMode {
    /// `floor`
    Floor,
    /// `ceiling`
    Ceiling,
    /// `truncate`
    Truncate,
    /// `round` — ties to even.
    RoundToEven,
}

/// `floor`/`ceiling`/`truncate`/`round`, preserving exactness.
pub fn round_real(v: &Value, mode: RoundMode) -> SimpleResult<Value> {
    match v {
        Value::Fixnum(_) | Value::Bignum(_) => Ok(v.clone()),
        Value::Flonum(f) => Ok(Value::Flonum(match mode {
            RoundMode::Floor => f.floor(),
            RoundMode::Ceiling => f.ceil(),
            RoundMode::Truncate => f.trunc(),
            RoundMode::RoundToEven => round_ties_even(*f),
        })),
        Value::Ratnum(r) => {
            let (q, rem) = r.numer().checked_divrem(r.denom())?;
            let result = match mode {
                RoundMode::Truncate => q,
                RoundMode::Floor => {
                    if !rem.is_zero() && rem.is_negative() {
                        q.checked_sub(&Bignum::from_i64(1))?
                    } else {
                        q
                    }
                }
                RoundMode::Ceiling => {
                    if !rem.is_zero() && !rem.is_negative() {
                        q.checked_add(&Bignum::from_i64(1))?
                    } else {
                        q
                    }
                }
                RoundMode::RoundToEven => round_ratio_ties_even(r)?,
            };
            Ok(normalize(Value::Bignum(Rc::new(result))))
        }
        _ => Err(ConditionTag::ArithDomain),
    }
}

fn round_ties_even(f: f64) -> f64 {
    let floor = f.floor();
    let diff = f - floor;
    if diff < 0.5 {
        floor
    } else if diff > 0.5 {
        floor + 1.0
    } else if (floor as i64) % 2 == 0 {
        floor
    } else {
        floor + 1.0
    }
}

fn round_ratio_ties_even(r: &Ratnum) -> SimpleResult<Bignum> {
    let two = Bignum::from_i64(2);
    let (q, rem) = r.numer().checked_divrem(r.denom())?;
    let doubled_rem_abs = rem
        .checked_mul(&Bignum::from_i64(if rem.is_negative() { -1 } else { 1 }))?
        .checked_mul(&two)?;
    let abs_cmp = doubled_rem_abs.compare(r.denom());
    Ok(match abs_cmp {
        Ordering::Less => q,
        Ordering::Greater => {
            if rem.is_negative() {
                q.checked_sub(&Bignum::from_i64(1))?
            } else {
                q.checked_add(&Bignum::from_i64(1))?
            }
        }
        Ordering::Equal => {
            let is_even = q
                .checked_divrem(&two)?
                .1
                .is_zero();
            if is_even {
                q
            } else if rem.is_negative() {
                q.checked_sub(&Bignum::from_i64(1))?
            } else {
                q.checked_add(&Bignum::from_i64(1))?
            }
        }
    })
}

/// `expt` for an exact integer exponent: repeated squaring for
/// non-negative exponents, reciprocal-of-positive-power for negative
/// ones. A negative base with a non-integer exponent produces a complex
/// result via polar form (`r^y * (cos(y*theta) + i sin(y*theta))`),
/// since no real root is defined there.
pub fn expt(base: &Value, exponent: &Value) -> SimpleResult<Value> {
    if let Value::Fixnum(e) = exponent {
        if base.is_exact() {
            return expt_exact_int(base, *e);
        }
    }
    if let Value::Bignum(_) = exponent {
        return Err(ConditionTag::NumberImplLimit);
    }

    let base_f = as_flonum(base);
    let exp_f = as_flonum(exponent);
    if base_f < 0.0 && exp_f.fract() != 0.0 {
        let r = base_f.abs().powf(exp_f);
        let theta = std::f64::consts::PI * exp_f;
        return Ok(normalize(Value::Compnum(Rc::new(Compnum {
            re: RealPart::Flonum(r * theta.cos()),
            im: RealPart::Flonum(r * theta.sin()),
        }))));
    }
    Ok(Value::Flonum(base_f.powf(exp_f)))
}

/// Powers of ten up to `EXPT_TEN_CACHE_LIMIT`, built once and shared
/// process-wide: `expt` on a base of exactly 10 is common enough
/// (decimal scaling during number parsing/printing) to skip repeated
/// squaring for it entirely.
fn pow10_cache() -> &'static [Bignum] {
    static CACHE: OnceLock<Vec<Bignum>> = OnceLock::new();
    CACHE
        .get_or_init(|| {
            let mut powers = Vec::with_capacity(crate::config::EXPT_TEN_CACHE_LIMIT as usize + 1);
            let mut cur = Bignum::from_i64(1);
            powers.push(cur.clone());
            for _ in 0..crate::config::EXPT_TEN_CACHE_LIMIT {
                cur = cur.checked_mul(&Bignum::from_i64(10)).expect("bounded by EXPT_TEN_CACHE_LIMIT");
                powers.push(cur.clone());
            }
            powers
        })
        .as_slice()
}

fn expt_exact_int(base: &Value, exponent: i64) -> SimpleResult<Value> {
    if exponent == 0 {
        return Ok(Value::Fixnum(1));
    }
    let negative = exponent < 0;
    let n = exponent.unsigned_abs();

    if !negative {
        if matches!(base, Value::Fixnum(2)) && n <= u32::MAX as u64 {
            let shifted = Bignum::from_i64(1).ash(n as i64);
            return Ok(normalize(Value::Bignum(Rc::new(shifted))));
        }
        if matches!(base, Value::Fixnum(10)) && n <= crate::config::EXPT_TEN_CACHE_LIMIT as u64 {
            let cached = pow10_cache()[n as usize].clone();
            return Ok(normalize(Value::Bignum(Rc::new(cached))));
        }
    }

    let mut n = n;
    let mut acc = Value::Fixnum(1);
    let mut cur = base.clone();
    while n > 0 {
        if n & 1 == 1 {
            acc = mul(&acc, &cur)?;
        }
        cur = mul(&cur, &cur)?;
        n >>= 1;
    }
    if negative {
        div(&Value::Fixnum(1), &acc)
    } else {
        Ok(acc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixnum_addition_promotes_on_overflow() {
        let result = add(&Value::Fixnum(crate::value::FIX_MAX), &Value::Fixnum(1)).unwrap();
        assert!(matches!(result, Value::Bignum(_)));
    }

    #[test]
    fn bignum_demotes_back_to_fixnum() {
        let big = Value::Bignum(Rc::new(Bignum::from_i64(10)));
        let result = add(&big, &Value::Fixnum(5)).unwrap();
        assert!(matches!(result, Value::Fixnum(15)));
    }

    #[test]
    fn rational_addition_reduces() {
        let half = Value::Ratnum(Rc::new(Ratnum::new(Bignum::from_i64(1), Bignum::from_i64(2)).unwrap()));
        let sum = add(&half, &half).unwrap();
        assert!(matches!(sum, Value::Fixnum(1)));
    }

    #[test]
    fn flonum_contagion_wins_over_exact() {
        let result = add(&Value::Fixnum(1), &Value::Flonum(2.5)).unwrap();
        assert!(matches!(result, Value::Flonum(f) if f == 3.5));
    }

    #[test]
    fn precise_comparison_rejects_rounding_false_positive() {
        let big = Value::Fixnum((1i64 << 53) - 1);
        let flo = Value::Flonum(((1i64 << 53) - 1) as f64);
        assert_eq!(compare(&big, &flo).unwrap(), Ordering::Equal);

        let bigger = Value::Bignum(Rc::new(Bignum::from_i64(1i64 << 53).checked_add(&Bignum::from_i64(1)).unwrap()));
        let rounded_flo = Value::Flonum((1i64 << 53) as f64 + 1.0);
        assert_eq!(compare(&bigger, &rounded_flo).unwrap(), Ordering::Equal);
    }

    #[test]
    fn quotient_remainder_modulo_signs() {
        let a = Value::Fixnum(-7);
        let b = Value::Fixnum(2);
        assert!(matches!(quotient(&a, &b).unwrap(), Value::Fixnum(-3)));
        assert!(matches!(remainder(&a, &b).unwrap(), Value::Fixnum(-1)));
        assert!(matches!(modulo(&a, &b).unwrap(), Value::Fixnum(1)));
    }

    #[test]
    fn round_to_even_ties() {
        assert!(matches!(
            round_real(&Value::Flonum(2.5), RoundMode::RoundToEven).unwrap(),
            Value::Flonum(f) if f == 2.0
        ));
        assert!(matches!(
            round_real(&Value::Flonum(3.5), RoundMode::RoundToEven).unwrap(),
            Value::Flonum(f) if f == 4.0
        ));
    }

    #[test]
    fn expt_repeated_squaring() {
        let result = expt(&Value::Fixnum(2), &Value::Fixnum(10)).unwrap();
        assert!(matches!(result, Value::Fixnum(1024)));
    }

    #[test]
    fn expt_negative_exponent_gives_reciprocal() {
        let result = expt(&Value::Fixnum(2), &Value::Fixnum(-3)).unwrap();
        let expected = Value::Ratnum(Rc::new(Ratnum::new(Bignum::from_i64(1), Bignum::from_i64(8)).unwrap()));
        assert_eq!(compare(&result, &expected).unwrap(), Ordering::Equal);
    }

    #[test]
    fn expt_base_ten_uses_the_cached_power_table() {
        let result = expt(&Value::Fixnum(10), &Value::Fixnum(30)).unwrap();
        assert_eq!(
            number_to_string_for_test(&result),
            "1000000000000000000000000000000"
        );
    }

    fn number_to_string_for_test(v: &Value) -> String {
        crate::numio::number_to_string(v, 10)
    }

    #[test]
    fn exact_zero_absorbs_an_inexact_operand() {
        let result = mul(&Value::Fixnum(0), &Value::Flonum(2.0)).unwrap();
        assert!(matches!(result, Value::Fixnum(0)));
    }

    #[test]
    fn exact_one_is_neutral_for_multiplication() {
        let result = mul(&Value::Fixnum(1), &Value::Flonum(2.5)).unwrap();
        assert!(matches!(result, Value::Flonum(f) if f == 2.5));
    }

    #[test]
    fn exact_one_is_neutral_for_division() {
        let result = div(&Value::Flonum(2.5), &Value::Fixnum(1)).unwrap();
        assert!(matches!(result, Value::Flonum(f) if f == 2.5));
    }

    #[test]
    fn expt_negative_base_noninteger_exponent_is_complex() {
        let result = expt(&Value::Fixnum(-1), &Value::Flonum(0.5)).unwrap();
        assert!(matches!(result, Value::Compnum(_)));
    }
}
