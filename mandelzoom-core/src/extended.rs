//! Double-double real numbers.
//!
//! An `ExtendedReal` is the unevaluated sum `hi + lo` of two f64 values with
//! `|lo| <= ulp(hi) / 2`. Every operation is built from error-free
//! transformations (two-sum, FMA two-product) and renormalized before it
//! returns, giving ~106 mantissa bits (~31 decimal digits) without any heap
//! allocation.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::BigFloat;

/// Double-double real: value = hi + lo.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtendedReal {
    hi: f64,
    lo: f64,
}

impl ExtendedReal {
    /// Zero constant.
    pub const ZERO: Self = Self { hi: 0.0, lo: 0.0 };

    /// One constant.
    pub const ONE: Self = Self { hi: 1.0, lo: 0.0 };

    /// Exact conversion from f64.
    #[inline]
    pub const fn from_f64(val: f64) -> Self {
        Self { hi: val, lo: 0.0 }
    }

    /// Build from two limbs whose sum is the intended value.
    ///
    /// The limbs do not need to be normalized; the result is.
    #[inline]
    pub fn from_parts(hi: f64, lo: f64) -> Self {
        Self::renormalize(hi, lo)
    }

    /// Nearest f64 to the represented value.
    #[inline]
    pub fn to_f64(&self) -> f64 {
        self.hi + self.lo
    }

    /// Leading limb.
    #[inline]
    pub fn hi(&self) -> f64 {
        self.hi
    }

    /// Trailing (error) limb.
    #[inline]
    pub fn lo(&self) -> f64 {
        self.lo
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.hi.is_finite() && self.lo.is_finite()
    }

    /// Sign of the full value. Looks at `lo` when `hi` is zero.
    #[inline]
    pub fn is_sign_negative(&self) -> bool {
        self.hi < 0.0 || (self.hi == 0.0 && self.lo < 0.0)
    }

    #[inline]
    pub fn neg(&self) -> Self {
        Self {
            hi: -self.hi,
            lo: -self.lo,
        }
    }

    #[inline]
    pub fn abs(&self) -> Self {
        if self.is_sign_negative() {
            self.neg()
        } else {
            *self
        }
    }

    /// Accurate double-double addition (both limbs two-summed).
    #[inline]
    pub fn add(&self, other: &Self) -> Self {
        let (s1, s2) = two_sum(self.hi, other.hi);
        let (t1, t2) = two_sum(self.lo, other.lo);
        let (s1, s2) = quick_two_sum(s1, s2 + t1);
        Self::renormalize(s1, s2 + t2)
    }

    #[inline]
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    /// Add an f64 without first widening it.
    #[inline]
    pub fn add_f64(&self, other: f64) -> Self {
        let (s1, s2) = two_sum(self.hi, other);
        Self::renormalize(s1, s2 + self.lo)
    }

    #[inline]
    pub fn mul(&self, other: &Self) -> Self {
        let (p1, p2) = two_prod(self.hi, other.hi);
        let p2 = p2 + (self.hi * other.lo + self.lo * other.hi);
        Self::renormalize(p1, p2)
    }

    #[inline]
    pub fn mul_f64(&self, factor: f64) -> Self {
        let (p1, p2) = two_prod(self.hi, factor);
        Self::renormalize(p1, p2 + self.lo * factor)
    }

    /// Square, cheaper than `mul(self)`.
    #[inline]
    pub fn sqr(&self) -> Self {
        let (p1, p2) = two_prod(self.hi, self.hi);
        let p2 = p2 + 2.0 * self.hi * self.lo;
        Self::renormalize(p1, p2)
    }

    /// Multiply by two. Exact: only the exponents change.
    #[inline]
    pub fn double(&self) -> Self {
        Self {
            hi: self.hi * 2.0,
            lo: self.lo * 2.0,
        }
    }

    /// Three-way comparison over both limbs.
    ///
    /// NaN limbs compare as equal so the ordering stays total for callers
    /// that sort; the iteration code never produces NaN before escaping.
    pub fn compare(&self, other: &Self) -> Ordering {
        match self.hi.partial_cmp(&other.hi) {
            Some(Ordering::Equal) => self.lo.partial_cmp(&other.lo).unwrap_or(Ordering::Equal),
            Some(ord) => ord,
            None => Ordering::Equal,
        }
    }

    /// Widen to an arbitrary precision value (exact).
    pub fn to_bigfloat(&self, precision_bits: usize) -> BigFloat {
        BigFloat::with_precision(self.hi, precision_bits)
            .add(&BigFloat::with_precision(self.lo, precision_bits))
    }

    /// Round an arbitrary precision value to the nearest double-double.
    pub fn from_bigfloat(value: &BigFloat) -> Self {
        let hi = value.to_f64();
        if !hi.is_finite() || hi == 0.0 {
            return Self::from_f64(hi);
        }
        let remainder = value.sub(&BigFloat::with_precision(hi, value.precision_bits()));
        Self::renormalize(hi, remainder.to_f64())
    }

    #[inline]
    fn renormalize(hi: f64, lo: f64) -> Self {
        if !hi.is_finite() {
            return Self { hi, lo: 0.0 };
        }
        let (hi, lo) = quick_two_sum(hi, lo);
        if hi.is_finite() {
            Self { hi, lo }
        } else {
            Self { hi, lo: 0.0 }
        }
    }
}

impl PartialOrd for ExtendedReal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.hi.partial_cmp(&other.hi)? {
            Ordering::Equal => self.lo.partial_cmp(&other.lo),
            ord => Some(ord),
        }
    }
}

impl From<f64> for ExtendedReal {
    fn from(val: f64) -> Self {
        Self::from_f64(val)
    }
}

/// Knuth's two-sum: `a + b = s + err` exactly.
#[inline]
fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let bb = s - a;
    let err = (a - (s - bb)) + (b - bb);
    (s, err)
}

/// Dekker's fast two-sum. Requires `|a| >= |b|` (or `a == 0`).
#[inline]
fn quick_two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let err = b - (s - a);
    (s, err)
}

/// `a * b = p + err` exactly, using a fused multiply-add for the error term.
#[inline]
fn two_prod(a: f64, b: f64) -> (f64, f64) {
    let p = a * b;
    let err = a.mul_add(b, -p);
    (p, err)
}
