//! Rendering numbers back to their canonical textual form.

use itertools::Itertools;

use crate::value::{RealPart, Value};

/// Render a number the way `number->string` would, in the given radix.
/// Flonums are only ever printed in radix 10 (R7RS leaves other radixes
/// for flonums unspecified; this core rejects them with a domain error
/// at the call site, not here).
pub fn number_to_string(v: &Value, radix: u32) -> String {
    match v {
        Value::Fixnum(n) => format_signed_radix(*n, radix),
        Value::Bignum(b) => format_bignum_radix(b, radix),
        Value::Ratnum(r) => format!(
            "{}/{}",
            format_bignum_radix(r.numer(), radix),
            format_bignum_radix(r.denom(), radix)
        ),
        Value::Flonum(f) => format_flonum(*f),
        Value::Compnum(c) => format_complex(&c.re, &c.im),
        _ => String::from("#<not-a-number>"),
    }
}

fn format_real_part(r: &RealPart, radix: u32) -> String {
    match r {
        RealPart::Fixnum(n) => format_signed_radix(*n, radix),
        RealPart::Bignum(b) => format_bignum_radix(b, radix),
        RealPart::Ratnum(r) => format!(
            "{}/{}",
            format_bignum_radix(r.numer(), radix),
            format_bignum_radix(r.denom(), radix)
        ),
        RealPart::Flonum(f) => format_flonum(*f),
    }
}

fn format_complex(re: &RealPart, im: &RealPart) -> String {
    let re_str = format_real_part(re, 10);
    let im_str = format_real_part(im, 10);
    if im_str.starts_with('-') || im_str.starts_with('+') {
        format!("{re_str}{im_str}i")
    } else {
        format!("{re_str}+{im_str}i")
    }
}

/// Shortest-round-trip decimal rendering of a flonum, with the
/// mandatory-decimal-point convention R7RS requires to distinguish
/// flonums from exact integers in `write` output (`3.` rather than `3`).
/// Delegates the actual digit generation to `f64`'s `Display`, which
/// already produces the shortest string that reads back to the same
/// bit pattern — the same correctness property Burger–Dybvig's
/// algorithm was designed to guarantee.
fn format_flonum(f: f64) -> String {
    if f.is_nan() {
        return "+nan.0".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "+inf.0".to_string() } else { "-inf.0".to_string() };
    }
    if f == 0.0 {
        return if f.is_sign_negative() { "-0.0".to_string() } else { "0.0".to_string() };
    }
    let mut s = format!("{f}");
    if !s.contains('.') && !s.contains('e') && !s.contains('E') {
        s.push('.');
    }
    s
}

fn format_signed_radix(n: i64, radix: u32) -> String {
    if radix == 10 {
        return n.to_string();
    }
    let negative = n < 0;
    let magnitude = n.unsigned_abs();
    let digits = to_radix_digits(magnitude as u128, radix);
    if negative {
        format!("-{digits}")
    } else {
        digits
    }
}

fn format_bignum_radix(b: &crate::bignum::Bignum, radix: u32) -> String {
    if let Some(n) = b.to_i64() {
        return format_signed_radix(n, radix);
    }
    // Repeated division by the radix, accumulating least-significant
    // digit first, mirrors the schoolbook "divide by base, read
    // remainders backward" conversion used throughout this module's
    // fixnum fast path.
    let mut digits = Vec::new();
    let mut cur = b.clone();
    let negative = cur.is_negative();
    if negative {
        cur = cur.negate();
    }
    let base = crate::bignum::Bignum::from_u64(radix as u64);
    while !cur.is_zero() {
        let (q, r) = cur.checked_divrem(&base).expect("radix base is never zero");
        let digit = r.to_i64().expect("remainder of division by a u32 radix fits in i64") as u32;
        digits.push(std::char::from_digit(digit, radix).expect("digit < radix"));
        cur = q;
    }
    if digits.is_empty() {
        digits.push('0');
    }
    let s = digits.into_iter().rev().join("");
    if negative {
        format!("-{s}")
    } else {
        s
    }
}

fn to_radix_digits(mut n: u128, radix: u32) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        let digit = (n % radix as u128) as u32;
        digits.push(std::char::from_digit(digit, radix).expect("digit < radix"));
        n /= radix as u128;
    }
    digits.into_iter().rev().join("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bignum::Bignum;
    use crate::ratnum::Ratnum;
    use std::rc::Rc;

    #[test]
    fn integer_round_trips_through_hex() {
        let v = Value::Fixnum(255);
        assert_eq!(number_to_string(&v, 16), "ff");
    }

    #[test]
    fn rational_prints_as_fraction() {
        let v = Value::Ratnum(Rc::new(Ratnum::new(Bignum::from_i64(3), Bignum::from_i64(4)).unwrap()));
        assert_eq!(number_to_string(&v, 10), "3/4");
    }

    #[test]
    fn flonum_always_shows_a_decimal_point() {
        assert_eq!(number_to_string(&Value::Flonum(3.0), 10), "3.");
        assert_eq!(number_to_string(&Value::Flonum(3.5), 10), "3.5");
    }

    #[test]
    fn flonum_zero_prints_with_a_zero_digit_not_a_bare_dot() {
        assert_eq!(number_to_string(&Value::Flonum(0.0), 10), "0.0");
        assert_eq!(number_to_string(&Value::Flonum(-0.0), 10), "-0.0");
    }

    #[test]
    fn flonum_specials_print_named() {
        assert_eq!(number_to_string(&Value::Flonum(f64::INFINITY), 10), "+inf.0");
        assert_eq!(number_to_string(&Value::Flonum(f64::NAN), 10), "+nan.0");
    }

    #[test]
    fn large_bignum_prints_in_decimal() {
        let big = Bignum::from_str_radix("123456789012345678901234567890", 10).unwrap();
        assert_eq!(
            number_to_string(&Value::Bignum(Rc::new(big)), 10),
            "123456789012345678901234567890"
        );
    }
}
