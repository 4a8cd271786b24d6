use dashu_base::{Abs, Approximation};
use dashu_float::{DBig, FBig};

use crate::EngineError;

/// Arbitrary precision binary float with an explicit precision.
///
/// Used where double-double is not enough: parsing long decimal coordinates
/// before rounding them into `ExtendedReal`, and as a reference when checking
/// double-double accuracy. Never used per pixel.
#[derive(Clone, Debug)]
pub struct BigFloat {
    value: FBig,
    precision_bits: usize,
}

impl BigFloat {
    /// Create BigFloat from f64 with explicit precision.
    ///
    /// Non-finite inputs have no FBig representation and become zero.
    pub fn with_precision(val: f64, precision_bits: usize) -> Self {
        let value = FBig::try_from(val).unwrap_or(FBig::ZERO);
        Self {
            value: value.with_precision(precision_bits).value(),
            precision_bits,
        }
    }

    /// Create zero with explicit precision
    pub fn zero(precision_bits: usize) -> Self {
        Self::with_precision(0.0, precision_bits)
    }

    /// Parse a decimal string (e.g. "-0.743643887037158704752191506114774").
    ///
    /// The decimal is converted to binary in one rounding step at the target
    /// precision so no digits are lost through an intermediate f64.
    pub fn from_string(val: &str, precision_bits: usize) -> Result<Self, EngineError> {
        let dbig = val
            .trim()
            .parse::<DBig>()
            .map_err(|e| EngineError::Parse(format!("{val:?}: {e}")))?;
        let binary = match dbig.with_base_and_precision::<2>(precision_bits) {
            Approximation::Exact(v) => v,
            Approximation::Inexact(v, _) => v,
        };
        Ok(Self {
            value: binary.with_rounding::<dashu_float::round::mode::Zero>(),
            precision_bits,
        })
    }

    /// Get precision in bits
    pub fn precision_bits(&self) -> usize {
        self.precision_bits
    }

    /// Nearest f64 (lossy).
    pub fn to_f64(&self) -> f64 {
        self.value.to_f64().value()
    }

    pub fn add(&self, other: &Self) -> Self {
        self.combine(other, &self.value + &other.value)
    }

    pub fn sub(&self, other: &Self) -> Self {
        self.combine(other, &self.value - &other.value)
    }

    pub fn mul(&self, other: &Self) -> Self {
        self.combine(other, &self.value * &other.value)
    }

    pub fn abs(&self) -> Self {
        Self {
            value: self.value.clone().abs(),
            precision_bits: self.precision_bits,
        }
    }

    fn combine(&self, other: &Self, value: FBig) -> Self {
        Self {
            value,
            precision_bits: self.precision_bits.max(other.precision_bits),
        }
    }
}

impl PartialEq for BigFloat {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialOrd for BigFloat {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl std::fmt::Display for BigFloat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}
