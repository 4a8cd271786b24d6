//! Direct (non-perturbed) Mandelbrot iteration in f64 and double-double.

use mandelzoom_core::{DDComplex, EngineConfig, ExtendedReal, PixelResult};

use crate::IterationObserver;

/// Per-frame iteration parameters shared by every pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IterationParams {
    pub max_iterations: u32,
    pub escape_radius_sq: f64,
}

impl IterationParams {
    pub fn new(max_iterations: u32, config: &EngineConfig) -> Self {
        Self {
            max_iterations,
            escape_radius_sq: config.escape_radius_sq,
        }
    }
}

/// Iterate `z = z² + c` from `z_0 = 0` in native f64.
pub fn iterate_standard<O: IterationObserver>(
    c: (f64, f64),
    params: &IterationParams,
    observer: &mut O,
) -> PixelResult {
    let (cx, cy) = c;
    let mut x = 0.0f64;
    let mut y = 0.0f64;
    let mut last_norm_sq = 0.0;

    for n in 0..params.max_iterations {
        let x_sq = x * x;
        let y_sq = y * y;
        let norm_sq = x_sq + y_sq;
        observer.on_iteration(n, (x, y), None);

        if norm_sq > params.escape_radius_sq {
            return PixelResult::escaped(n, params.max_iterations, norm_sq);
        }
        last_norm_sq = norm_sq;

        let new_x = x_sq - y_sq + cx;
        y = 2.0 * x * y + cy;
        x = new_x;
    }

    PixelResult::bounded(params.max_iterations, last_norm_sq)
}

/// Iterate `z = z² + c` from `z_0 = 0` entirely in double-double.
pub fn iterate_double_double<O: IterationObserver>(
    c: &DDComplex,
    params: &IterationParams,
    observer: &mut O,
) -> PixelResult {
    let escape_radius_sq = ExtendedReal::from_f64(params.escape_radius_sq);
    let mut z = DDComplex::ZERO;
    let mut last_norm_sq = 0.0;

    for n in 0..params.max_iterations {
        let norm_sq = z.norm_sq();
        observer.on_iteration(n, z.to_f64_pair(), None);

        if norm_sq > escape_radius_sq {
            return PixelResult::escaped(n, params.max_iterations, norm_sq.to_f64());
        }
        last_norm_sq = norm_sq.to_f64();

        z = z.square().add(c);
    }

    PixelResult::bounded(params.max_iterations, last_norm_sq)
}
