//! Property-based accuracy tests for double-double arithmetic.
//!
//! Every operation is checked against an arbitrary precision oracle:
//!
//! 1. f64 -> ExtendedReal -> f64 is the identity.
//! 2. add, sub, mul and sqr agree with 512-bit results to ~1e-30 relative.
//! 3. Results stay normalized (|lo| <= ulp(hi) / 2).
//! 4. Comparison agrees with the oracle ordering.

use mandelzoom_core::{BigFloat, ExtendedReal};
use proptest::prelude::*;

const ORACLE_BITS: usize = 512;
const MAX_RELATIVE_ERROR: f64 = 1e-30;

// ── Helpers ─────────────────────────────────────────────────────────────

/// Double-double values spanning about 40 binary orders of magnitude with
/// a populated low limb.
fn extended_real() -> impl Strategy<Value = ExtendedReal> {
    (
        prop_oneof![-1.0f64..-1e-3, 1e-3f64..1.0],
        -20i32..20,
        -0.5f64..0.5,
    )
        .prop_map(|(mantissa, exp, frac)| {
            let hi = mantissa * 2f64.powi(exp);
            let lo = hi * frac * f64::EPSILON;
            ExtendedReal::from_parts(hi, lo)
        })
}

fn oracle(x: &ExtendedReal) -> BigFloat {
    x.to_bigfloat(ORACLE_BITS)
}

fn relative_error(actual: &ExtendedReal, exact: &BigFloat) -> f64 {
    let diff = oracle(actual).sub(exact).to_f64().abs();
    let magnitude = exact.to_f64().abs();
    if magnitude == 0.0 {
        diff
    } else {
        diff / magnitude
    }
}

fn is_normalized(x: &ExtendedReal) -> bool {
    x.hi() + x.lo() == x.hi()
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Round trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn f64_round_trip_is_exact(v in proptest::num::f64::NORMAL | proptest::num::f64::SUBNORMAL | proptest::num::f64::ZERO) {
        let x = ExtendedReal::from_f64(v);
        prop_assert_eq!(x.to_f64(), v);
        prop_assert_eq!(x.lo(), 0.0);
        prop_assert_eq!(ExtendedReal::from_bigfloat(&oracle(&x)).to_f64(), v);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Arithmetic against the oracle
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn add_matches_oracle(a in extended_real(), b in extended_real()) {
        let sum = a.add(&b);
        let exact = oracle(&a).add(&oracle(&b));
        let err = relative_error(&sum, &exact);
        prop_assert!(err < MAX_RELATIVE_ERROR, "add {:?} + {:?}: rel err {}", a, b, err);
        prop_assert!(is_normalized(&sum));
    }

    #[test]
    fn sub_matches_oracle(a in extended_real(), b in extended_real()) {
        let diff = a.sub(&b);
        let exact = oracle(&a).sub(&oracle(&b));
        let err = relative_error(&diff, &exact);
        prop_assert!(err < MAX_RELATIVE_ERROR, "sub {:?} - {:?}: rel err {}", a, b, err);
    }

    #[test]
    fn mul_matches_oracle(a in extended_real(), b in extended_real()) {
        let product = a.mul(&b);
        let exact = oracle(&a).mul(&oracle(&b));
        let err = relative_error(&product, &exact);
        prop_assert!(err < MAX_RELATIVE_ERROR, "mul {:?} * {:?}: rel err {}", a, b, err);
        prop_assert!(is_normalized(&product));
    }

    #[test]
    fn sqr_matches_oracle(a in extended_real()) {
        let square = a.sqr();
        let exact = oracle(&a).mul(&oracle(&a));
        let err = relative_error(&square, &exact);
        prop_assert!(err < MAX_RELATIVE_ERROR, "sqr {:?}: rel err {}", a, err);
    }

    #[test]
    fn mul_f64_matches_oracle(a in extended_real(), factor in -1e6f64..1e6) {
        prop_assume!(factor != 0.0);
        let product = a.mul_f64(factor);
        let exact = oracle(&a).mul(&BigFloat::with_precision(factor, ORACLE_BITS));
        let err = relative_error(&product, &exact);
        prop_assert!(err < MAX_RELATIVE_ERROR, "mul_f64 {:?} * {}: rel err {}", a, factor, err);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Ordering
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn ordering_matches_oracle(a in extended_real(), b in extended_real()) {
        let ours = a.partial_cmp(&b);
        let exact = oracle(&a).partial_cmp(&oracle(&b));
        prop_assert_eq!(ours, exact);
        prop_assert_eq!(Some(a.compare(&b)), exact);
    }

    #[test]
    fn values_differing_only_in_low_limb_are_ordered(hi in 0.5f64..1.0, lo in 1e-20f64..1e-18) {
        let a = ExtendedReal::from_parts(hi, lo);
        let b = ExtendedReal::from_parts(hi, -lo);
        prop_assert!(a > b);
        prop_assert!(a.sub(&b) > ExtendedReal::ZERO);
        prop_assert!(b.sub(&a).is_sign_negative());
    }
}
