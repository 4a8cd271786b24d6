//! Perturbation theory computation for deep Mandelbrot zoom.
//!
//! Computes one reference orbit in double-double, then iterates a small
//! delta per pixel against it. Pixels whose delta stops being trustworthy
//! fall back to exact double-double iteration of their own coordinate.

mod pixel;
mod reference_orbit;

pub use pixel::{compute_pixel_perturbation, detect_glitch, GlitchKind, PixelDelta};
pub use reference_orbit::{OrbitPoint, ReferenceOrbit, ReferenceOrbitComputer};

#[cfg(test)]
mod tests;
