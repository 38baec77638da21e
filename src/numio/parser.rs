//! Scheme numeric literal parsing.

use std::rc::Rc;

use crate::bignum::Bignum;
use crate::error::{ConditionTag, SimpleResult};
use crate::ratnum::Ratnum;
use crate::value::{Compnum, RealPart, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exactness {
    Unspecified,
    Exact,
    Inexact,
}

/// Parse a Scheme numeric literal, honoring `#b`/`#o`/`#d`/`#x` and
/// `#e`/`#i` prefixes (in either order, each at most once) ahead of the
/// number body. `default_radix` is used when no radix prefix is given
/// (10 for `string->number`'s default, but callers reading `#x...` data
/// syntax pass it explicitly).
pub fn parse_number(input: &str, default_radix: u32) -> SimpleResult<Value> {
    let (radix, exactness, body) = parse_prefixes(input, default_radix)?;
    if body.is_empty() {
        return Err(ConditionTag::NumberParse);
    }
    let (value, was_decimal, exponent_magnitude) = parse_complex(body, radix)?;
    if exactness == Exactness::Exact && exponent_magnitude > crate::config::MAX_EXACT_DECIMAL_EXPONENT {
        return Err(ConditionTag::NumberImplLimit);
    }
    apply_exactness(value, was_decimal, exactness)
}

fn parse_prefixes(input: &str, default_radix: u32) -> SimpleResult<(u32, Exactness, &str)> {
    let mut radix = None;
    let mut exactness = Exactness::Unspecified;
    let mut rest = input;
    while let Some(tail) = rest.strip_prefix('#') {
        let mut chars = tail.chars();
        let marker = chars.next().ok_or(ConditionTag::NumberParse)?;
        let new_radix = match marker.to_ascii_lowercase() {
            'b' => Some(2),
            'o' => Some(8),
            'd' => Some(10),
            'x' => Some(16),
            'e' => {
                if exactness != Exactness::Unspecified {
                    return Err(ConditionTag::NumberParse);
                }
                exactness = Exactness::Exact;
                rest = chars.as_str();
                continue;
            }
            'i' => {
                if exactness != Exactness::Unspecified {
                    return Err(ConditionTag::NumberParse);
                }
                exactness = Exactness::Inexact;
                rest = chars.as_str();
                continue;
            }
            _ => return Err(ConditionTag::NumberParse),
        };
        if radix.is_some() {
            return Err(ConditionTag::NumberParse);
        }
        radix = new_radix;
        rest = chars.as_str();
    }
    Ok((radix.unwrap_or(default_radix), exactness, rest))
}

fn apply_exactness(value: Value, was_decimal: bool, exactness: Exactness) -> SimpleResult<Value> {
    match exactness {
        Exactness::Unspecified => {
            if was_decimal {
                Ok(to_inexact(&value))
            } else {
                Ok(value)
            }
        }
        Exactness::Exact => to_exact(&value),
        Exactness::Inexact => Ok(to_inexact(&value)),
    }
}

fn to_inexact(v: &Value) -> Value {
    match v {
        Value::Fixnum(n) => Value::Flonum(*n as f64),
        Value::Bignum(b) => Value::Flonum(b.to_f64()),
        Value::Ratnum(r) => Value::Flonum(r.to_f64()),
        Value::Compnum(c) => Value::Compnum(Rc::new(Compnum {
            re: RealPart::Flonum(real_to_f64(&c.re)),
            im: RealPart::Flonum(real_to_f64(&c.im)),
        })),
        other => other.clone(),
    }
}

fn real_to_f64(r: &RealPart) -> f64 {
    match r {
        RealPart::Fixnum(n) => *n as f64,
        RealPart::Bignum(b) => b.to_f64(),
        RealPart::Ratnum(r) => r.to_f64(),
        RealPart::Flonum(f) => *f,
    }
}

fn to_exact(v: &Value) -> SimpleResult<Value> {
    match v {
        Value::Flonum(f) => Ok(exact_from_f64(*f)),
        other => Ok(other.clone()),
    }
}

fn exact_from_f64(f: f64) -> Value {
    if !f.is_finite() {
        return Value::Flonum(f);
    }
    let ratio = crate::tower::decode_flonum_exact(f);
    crate::tower::normalize(Value::Ratnum(Rc::new(ratio)))
}

/// Parse a (possibly complex) number body, returning the value, whether
/// a decimal-point/exponent lexeme was used anywhere in it (so the
/// caller can apply the default-inexact rule), and the largest decimal
/// exponent magnitude seen (so `#e` can reject literals beyond
/// `Limits::max_exact_decimal_exponent`).
fn parse_complex(s: &str, radix: u32) -> SimpleResult<(Value, bool, i64)> {
    if let Some(i) = find_unescaped(s, '@') {
        let (mag, angle) = (&s[..i], &s[i + 1..]);
        let (mag, decimal_a, exp_a) = parse_real(mag, radix)?;
        let (angle, decimal_b, exp_b) = parse_real(angle, radix)?;
        let mag_f = crate::tower::as_flonum(&mag);
        let angle_f = crate::tower::as_flonum(&angle);
        let re = mag_f * angle_f.cos();
        let im = mag_f * angle_f.sin();
        return Ok((
            crate::tower::normalize(Value::Compnum(Rc::new(Compnum {
                re: RealPart::Flonum(re),
                im: RealPart::Flonum(im),
            }))),
            decimal_a || decimal_b,
            exp_a.max(exp_b),
        ));
    }

    if let Some(stripped) = s.strip_suffix(['i', 'I']) {
        if stripped == "+" {
            return Ok((make_complex(Value::Fixnum(0), Value::Fixnum(1)), false, 0));
        }
        if stripped == "-" {
            return Ok((make_complex(Value::Fixnum(0), Value::Fixnum(-1)), false, 0));
        }
        if let Some(split) = find_sign_split(stripped) {
            let (re_part, im_part) = stripped.split_at(split);
            let (re, decimal_re, exp_re) = parse_real(re_part, radix)?;
            let im_str = if im_part == "+" {
                "1"
            } else if im_part == "-" {
                "-1"
            } else {
                im_part
            };
            let (im, decimal_im, exp_im) = parse_real(im_str, radix)?;
            return Ok((make_complex(re, im), decimal_re || decimal_im, exp_re.max(exp_im)));
        }
        let (im, decimal, exp) = parse_real(stripped, radix)?;
        return Ok((make_complex(Value::Fixnum(0), im), decimal, exp));
    }

    parse_real(s, radix)
}

fn make_complex(re: Value, im: Value) -> Value {
    crate::tower::normalize(Value::Compnum(Rc::new(Compnum {
        re: to_real_part(&re),
        im: to_real_part(&im),
    })))
}

fn to_real_part(v: &Value) -> RealPart {
    match v {
        Value::Fixnum(n) => RealPart::Fixnum(*n),
        Value::Bignum(b) => RealPart::Bignum(Rc::clone(b)),
        Value::Ratnum(r) => RealPart::Ratnum(Rc::clone(r)),
        Value::Flonum(f) => RealPart::Flonum(*f),
        _ => RealPart::Flonum(f64::NAN),
    }
}

/// Find a `+`/`-` that splits a rectangular complex literal's real part
/// from its imaginary part: the first `+`/`-` not at index 0 and not
/// immediately following an exponent marker (`1e+10i` is one real, not
/// `1e` plus `+10i`).
fn find_sign_split(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    for i in 1..bytes.len() {
        let c = bytes[i] as char;
        if c == '+' || c == '-' {
            let prev = bytes[i - 1] as char;
            if matches!(prev.to_ascii_lowercase(), 'e' | 's' | 'f' | 'd' | 'l') {
                continue;
            }
            return Some(i);
        }
    }
    None
}

fn find_unescaped(s: &str, needle: char) -> Option<usize> {
    s.find(needle)
}

/// Parse a real number (no complex syntax) in the given radix, returning
/// the value, whether a decimal-point/exponent lexeme was used, and the
/// magnitude of its explicit exponent marker (0 if none).
fn parse_real(s: &str, radix: u32) -> SimpleResult<(Value, bool, i64)> {
    if s.is_empty() {
        return Err(ConditionTag::NumberParse);
    }
    match s.to_ascii_lowercase().as_str() {
        "+inf.0" => return Ok((Value::Flonum(f64::INFINITY), true, 0)),
        "-inf.0" => return Ok((Value::Flonum(f64::NEG_INFINITY), true, 0)),
        "+nan.0" | "-nan.0" => return Ok((Value::Flonum(f64::NAN), true, 0)),
        _ => {}
    }

    if let Some(slash) = s.find('/') {
        let (n, d) = (&s[..slash], &s[slash + 1..]);
        let numer = Bignum::from_str_radix(n, radix)?;
        let denom = Bignum::from_str_radix(d, radix)?;
        let ratio = Ratnum::new(numer, denom)?;
        return Ok((crate::tower::normalize(Value::Ratnum(Rc::new(ratio))), false, 0));
    }

    if radix == 10 && is_decimal_lexeme(s) {
        let exponent_magnitude = decimal_exponent_magnitude(s);
        let parsed: f64 = s.parse().map_err(|_| ConditionTag::NumberParse)?;
        return Ok((Value::Flonum(parsed), true, exponent_magnitude));
    }

    let n = Bignum::from_str_radix(s, radix)?;
    Ok((crate::tower::normalize(Value::Bignum(Rc::new(n))), false, 0))
}

fn is_decimal_lexeme(s: &str) -> bool {
    s.contains('.') || s.contains(['e', 'E']) && s.chars().next().map_or(false, |c| c.is_ascii_digit() || c == '+' || c == '-' || c == '.')
}

/// The magnitude of a decimal literal's explicit base-10 exponent
/// marker (`1e400` → `400`), or 0 if none is present. Used to enforce
/// `Limits::max_exact_decimal_exponent` for `#e`-prefixed literals,
/// independent of whether the parsed `f64` itself ended up finite.
fn decimal_exponent_magnitude(s: &str) -> i64 {
    let Some(pos) = s.find(|c: char| matches!(c.to_ascii_lowercase(), 'e' | 's' | 'f' | 'd' | 'l')) else {
        return 0;
    };
    s[pos + 1..].parse::<i64>().map(|e| e.abs()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_fixnum() {
        let v = parse_number("42", 10).unwrap();
        assert!(matches!(v, Value::Fixnum(42)));
    }

    #[test]
    fn parses_hex_prefix() {
        let v = parse_number("#xff", 10).unwrap();
        assert!(matches!(v, Value::Fixnum(255)));
    }

    #[test]
    fn parses_rational() {
        let v = parse_number("3/4", 10).unwrap();
        match v {
            Value::Ratnum(r) => {
                assert_eq!(r.numer().to_i64(), Some(3));
                assert_eq!(r.denom().to_i64(), Some(4));
            }
            _ => panic!("expected ratnum"),
        }
    }

    #[test]
    fn decimal_literal_defaults_to_inexact() {
        let v = parse_number("3.5", 10).unwrap();
        assert!(matches!(v, Value::Flonum(f) if f == 3.5));
    }

    #[test]
    fn exact_prefix_forces_exact_decimal() {
        let v = parse_number("#e1.5", 10).unwrap();
        match v {
            Value::Ratnum(r) => {
                assert_eq!(r.numer().to_i64(), Some(3));
                assert_eq!(r.denom().to_i64(), Some(2));
            }
            _ => panic!("expected exact ratnum, got something else"),
        }
    }

    #[test]
    fn inexact_prefix_forces_inexact_integer() {
        let v = parse_number("#i5", 10).unwrap();
        assert!(matches!(v, Value::Flonum(f) if f == 5.0));
    }

    #[test]
    fn parses_rectangular_complex() {
        let v = parse_number("1+2i", 10).unwrap();
        match v {
            Value::Compnum(c) => {
                assert_eq!(c.re, RealPart::Fixnum(1));
                assert_eq!(c.im, RealPart::Fixnum(2));
            }
            _ => panic!("expected compnum"),
        }
    }

    #[test]
    fn parses_pure_imaginary() {
        let v = parse_number("-i", 10).unwrap();
        match v {
            Value::Compnum(c) => assert_eq!(c.im, RealPart::Fixnum(-1)),
            _ => panic!("expected compnum"),
        }
    }

    #[test]
    fn rejects_malformed_literal() {
        assert!(parse_number("12x", 10).is_err());
        assert!(parse_number("", 10).is_err());
    }

    #[test]
    fn duplicate_radix_prefix_is_an_error() {
        assert!(parse_number("#x#x10", 10).is_err());
    }
}
