use crate::IterationParams;
use mandelzoom_core::{
    BigFloat, DDComplex, ExtendedReal, PixelResult, DEFAULT_ENGINE_CONFIG,
};

/// Precision of the arbitrary precision oracle.
pub const ORACLE_BITS: usize = 256;

pub fn params(max_iterations: u32) -> IterationParams {
    IterationParams::new(max_iterations, &DEFAULT_ENGINE_CONFIG)
}

pub fn dd(re: f64, im: f64) -> DDComplex {
    DDComplex::from_f64(re, im)
}

/// `origin + (dx, dy)` formed exactly in double-double.
pub fn offset(origin: &DDComplex, dx: f64, dy: f64) -> DDComplex {
    DDComplex::new(origin.re.add_f64(dx), origin.im.add_f64(dy))
}

/// Direct iteration in BigFloat, for comparing against the double-double
/// and perturbation paths. Same escape test (|z|² > 4) and bookkeeping.
pub fn compute_direct(c: &DDComplex, max_iter: u32) -> PixelResult {
    let cx = c.re.to_bigfloat(ORACLE_BITS);
    let cy = c.im.to_bigfloat(ORACLE_BITS);
    let mut x = BigFloat::zero(ORACLE_BITS);
    let mut y = BigFloat::zero(ORACLE_BITS);
    let escape_radius_sq = BigFloat::with_precision(4.0, ORACLE_BITS);
    let two = BigFloat::with_precision(2.0, ORACLE_BITS);
    let mut last_norm_sq = 0.0;

    for n in 0..max_iter {
        let x_sq = x.mul(&x);
        let y_sq = y.mul(&y);
        let norm_sq = x_sq.add(&y_sq);
        if norm_sq > escape_radius_sq {
            return PixelResult::escaped(n, max_iter, norm_sq.to_f64());
        }
        last_norm_sq = norm_sq.to_f64();
        let new_x = x_sq.sub(&y_sq).add(&cx);
        let new_y = two.mul(&x).mul(&y).add(&cy);
        x = new_x;
        y = new_y;
    }
    PixelResult::bounded(max_iter, last_norm_sq)
}

/// |a - b| for double-double values, as f64.
pub fn dd_distance(a: &ExtendedReal, b: &ExtendedReal) -> f64 {
    a.sub(b).abs().to_f64()
}
