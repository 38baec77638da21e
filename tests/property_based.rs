//! Algebraic-law and table-driven checks for the numeric tower, using the
//! same `quickcheck`/`rstest` harnesses the teacher's own arithmetic
//! suites reach for alongside hand-picked seed scenarios.

use quickcheck_macros::quickcheck;
use rstest::rstest;
use scheme_rt::prelude::*;

fn fx(n: i64) -> Value {
    Value::Fixnum(n)
}

#[quickcheck]
fn addition_is_commutative(a: i32, b: i32) -> bool {
    let lhs = tower::add(&fx(a as i64), &fx(b as i64)).unwrap();
    let rhs = tower::add(&fx(b as i64), &fx(a as i64)).unwrap();
    lhs == rhs
}

#[quickcheck]
fn gcd_is_never_negative(a: i32, b: i32) -> bool {
    match tower::gcd(&fx(a as i64), &fx(b as i64)) {
        Ok(Value::Fixnum(n)) => n >= 0,
        Ok(Value::Bignum(b)) => !b.is_negative(),
        _ => false,
    }
}

#[quickcheck]
fn double_negation_round_trips(a: i32) -> bool {
    let v = fx(a as i64);
    let back = tower::negate(&tower::negate(&v).unwrap()).unwrap();
    back == v
}

#[rstest]
#[case(65536, "10000")]
#[case(-1, "-1")]
#[case(255, "ff")]
fn bignum_hex_round_trips_through_print_and_parse(#[case] n: i64, #[case] hex: &str) {
    assert_eq!(number_to_string(&fx(n), 16), hex);
    assert_eq!(parse_number(&format!("#x{hex}"), 10).unwrap(), fx(n));
}
