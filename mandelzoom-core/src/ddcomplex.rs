//! Complex number with double-double components.

use serde::{Deserialize, Serialize};

use crate::{ComplexDelta, ExtendedReal};

/// Complex number using ExtendedReal components.
///
/// All operations stay in double-double arithmetic; nothing here rounds an
/// intermediate to f64.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DDComplex {
    pub re: ExtendedReal,
    pub im: ExtendedReal,
}

impl DDComplex {
    /// Zero constant.
    pub const ZERO: Self = Self {
        re: ExtendedReal::ZERO,
        im: ExtendedReal::ZERO,
    };

    pub fn new(re: ExtendedReal, im: ExtendedReal) -> Self {
        Self { re, im }
    }

    /// Exact widening of an f64 pair.
    pub fn from_f64(re: f64, im: f64) -> Self {
        Self {
            re: ExtendedReal::from_f64(re),
            im: ExtendedReal::from_f64(im),
        }
    }

    #[inline]
    pub fn add(&self, other: &Self) -> Self {
        Self {
            re: self.re.add(&other.re),
            im: self.im.add(&other.im),
        }
    }

    #[inline]
    pub fn sub(&self, other: &Self) -> Self {
        Self {
            re: self.re.sub(&other.re),
            im: self.im.sub(&other.im),
        }
    }

    /// Multiply: (a + bi)(c + di) = (ac - bd) + (ad + bc)i
    #[inline]
    pub fn mul(&self, other: &Self) -> Self {
        Self {
            re: self.re.mul(&other.re).sub(&self.im.mul(&other.im)),
            im: self.re.mul(&other.im).add(&self.im.mul(&other.re)),
        }
    }

    /// Square: (a + bi)² = (a² - b²) + 2abi
    #[inline]
    pub fn square(&self) -> Self {
        Self {
            re: self.re.sqr().sub(&self.im.sqr()),
            im: self.re.mul(&self.im).double(),
        }
    }

    /// Squared magnitude |z|² = re² + im², kept in double-double.
    #[inline]
    pub fn norm_sq(&self) -> ExtendedReal {
        self.re.sqr().add(&self.im.sqr())
    }

    /// Nearest f64 pair.
    #[inline]
    pub fn to_f64_pair(&self) -> (f64, f64) {
        (self.re.to_f64(), self.im.to_f64())
    }
}

impl ComplexDelta for DDComplex {
    #[inline]
    fn zero(&self) -> Self {
        Self::ZERO
    }

    #[inline]
    fn from_f64_pair(re: f64, im: f64) -> Self {
        Self::from_f64(re, im)
    }

    #[inline]
    fn from_dd(value: &DDComplex) -> Self {
        *value
    }

    #[inline]
    fn to_f64_pair(&self) -> (f64, f64) {
        DDComplex::to_f64_pair(self)
    }

    #[inline]
    fn add(&self, other: &Self) -> Self {
        DDComplex::add(self, other)
    }

    #[inline]
    fn sub(&self, other: &Self) -> Self {
        DDComplex::sub(self, other)
    }

    #[inline]
    fn mul(&self, other: &Self) -> Self {
        DDComplex::mul(self, other)
    }

    #[inline]
    fn scale(&self, factor: f64) -> Self {
        Self {
            re: self.re.mul_f64(factor),
            im: self.im.mul_f64(factor),
        }
    }

    #[inline]
    fn square(&self) -> Self {
        DDComplex::square(self)
    }

    #[inline]
    fn norm_sq(&self) -> f64 {
        DDComplex::norm_sq(self).to_f64()
    }
}
