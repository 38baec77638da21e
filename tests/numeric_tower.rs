//! Integration tests for the seed scenarios and universal laws in
//! `SPEC_FULL.md` §8.

use std::rc::Rc;

use scheme_rt::prelude::*;
use test_case::test_case;

fn fx(n: i64) -> Value {
    Value::Fixnum(n)
}

#[test]
fn division_dispatch_matches_seed_scenarios() {
    let one_third = tower::div(&fx(1), &fx(3)).unwrap();
    assert_eq!(number_to_string(&one_third, 10), "1/3");

    let inexact_third = tower::div(&Value::Flonum(1.0), &fx(3)).unwrap();
    match inexact_third {
        Value::Flonum(f) => assert!((f - 0.333_333_333_333_333_3).abs() < 1e-15),
        _ => panic!("expected flonum"),
    }

    let err = tower::div(&fx(1), &fx(0)).unwrap_err();
    assert_eq!(err, ConditionTag::ArithDivByZero);

    let inf = tower::div(&Value::Flonum(1.0), &Value::Flonum(0.0)).unwrap();
    assert!(matches!(inf, Value::Flonum(f) if f.is_infinite() && f > 0.0));

    let nan = tower::div(&Value::Flonum(0.0), &Value::Flonum(0.0)).unwrap();
    assert!(matches!(nan, Value::Flonum(f) if f.is_nan()));
}

#[test]
fn expt_two_to_the_hundred_is_exact() {
    let result = tower::expt(&fx(2), &fx(100)).unwrap();
    assert_eq!(
        number_to_string(&result, 10),
        "1267650600228229401496703205376"
    );
}

#[test]
fn number_to_string_prints_shortest_decimal() {
    let v = parse_number("0.1", 10).unwrap();
    assert_eq!(number_to_string(&v, 10), "0.1");
}

#[test]
fn impl_limit_prefix_on_huge_exponent() {
    let err = parse_number("#e1e400", 10).unwrap_err();
    assert!(err.is_parse_error() || err == ConditionTag::NumberImplLimit);
}

#[test]
fn huge_exponent_without_prefix_is_infinity() {
    let v = parse_number("1e400", 10).unwrap();
    assert!(matches!(v, Value::Flonum(f) if f.is_infinite() && f > 0.0));
}

#[test_case(6, 9, 3; "both positive")]
#[test_case(0, 9, 9; "zero left operand")]
#[test_case(-6, 9, 3; "negative left operand stays non-negative")]
fn gcd_matches_euclidean_law(a: i64, b: i64, expected: i64) {
    let result = tower::gcd(&fx(a), &fx(b)).unwrap();
    assert_eq!(result, fx(expected));
}

#[test]
fn exact_add_then_subtract_is_closed() {
    let a = Value::Ratnum(Rc::new(Ratnum::new(Bignum::from_i64(7), Bignum::from_i64(3)).unwrap()));
    let b = fx(11);
    let round_trip = tower::sub(&tower::add(&a, &b).unwrap(), &b).unwrap();
    assert_eq!(tower::compare(&round_trip, &a).unwrap(), std::cmp::Ordering::Equal);
}

#[test]
fn mixed_comparison_matches_scaled_integer_law() {
    // B = 2^60 + 1 versus F = 2.0^60, compared both ways.
    let b = Value::Bignum(Rc::new(Bignum::from_i64(1).ash(60).checked_add(&Bignum::from_i64(1)).unwrap()));
    let f = Value::Flonum((1u64 << 60) as f64);
    assert_eq!(tower::compare(&b, &f).unwrap(), std::cmp::Ordering::Greater);
}

#[test]
fn flonum_round_trips_through_print_and_parse() {
    for v in [0.1_f64, 1.0, -2.5, 123_456.789, f64::MIN_POSITIVE, 1e300] {
        let printed = number_to_string(&Value::Flonum(v), 10);
        let parsed = parse_number(&printed, 10).unwrap();
        match parsed {
            Value::Flonum(f) => assert_eq!(f.to_bits(), v.to_bits(), "round trip failed for {v}"),
            _ => panic!("expected flonum for input {v}"),
        }
    }
}
