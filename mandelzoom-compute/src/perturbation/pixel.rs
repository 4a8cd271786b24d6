//! Generic perturbation pixel computation.
//!
//! Provides a single generic implementation for f64 and double-double delta
//! types via the `ComplexDelta` trait.

use mandelzoom_core::{ComplexDelta, DDComplex, PixelResult};

use super::ReferenceOrbit;
use crate::{iterate_double_double, IterationObserver, IterationParams};

/// Why a pixel left the reference orbit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlitchKind {
    /// |Z + δ|² < |δ|²: the delta dominates the value it perturbs.
    DeltaDominates,
    /// |Z + δ|² < τ²·|Z|² (Pauldelbrot).
    Pauldelbrot,
    /// The reference escaped before the pixel did.
    OrbitExhausted,
}

/// Per-pixel perturbation state.
#[derive(Clone, Copy, Debug)]
pub struct PixelDelta<D> {
    pub delta: D,
    /// Orbit index the delta is measured against.
    pub ref_index: usize,
}

/// Outcome of iterating a delta against the orbit, before any fallback.
enum DeltaOutcome {
    Done(PixelResult),
    Glitch(GlitchKind),
}

/// Evaluate a pixel by perturbation against `orbit`.
///
/// `δ0 = pixel_c - origin` is formed once in double-double and then carried
/// in `D`. On any glitch the pixel is recomputed directly in double-double
/// from its own coordinate and flagged `rebased`.
pub fn compute_pixel_perturbation<D: ComplexDelta, O: IterationObserver>(
    orbit: &ReferenceOrbit,
    pixel_c: &DDComplex,
    params: &IterationParams,
    observer: &mut O,
) -> PixelResult {
    match iterate_delta::<D, O>(orbit, pixel_c, params, observer) {
        DeltaOutcome::Done(result) => result,
        DeltaOutcome::Glitch(_) => {
            observer.on_rebase();
            iterate_double_double(pixel_c, params, observer).with_rebased(true)
        }
    }
}

/// Run the delta recurrence and report the first glitch instead of
/// resolving it.
pub fn detect_glitch<D: ComplexDelta>(
    orbit: &ReferenceOrbit,
    pixel_c: &DDComplex,
    params: &IterationParams,
) -> Option<GlitchKind> {
    match iterate_delta::<D, _>(orbit, pixel_c, params, &mut crate::NoObserver) {
        DeltaOutcome::Done(_) => None,
        DeltaOutcome::Glitch(kind) => Some(kind),
    }
}

fn iterate_delta<D: ComplexDelta, O: IterationObserver>(
    orbit: &ReferenceOrbit,
    pixel_c: &DDComplex,
    params: &IterationParams,
    observer: &mut O,
) -> DeltaOutcome {
    let delta_c = D::from_dd(&pixel_c.sub(orbit.origin()));
    let mut state = PixelDelta {
        delta: delta_c.zero(),
        ref_index: 0,
    };
    let mut last_norm_sq = 0.0;

    for n in 0..params.max_iterations {
        let Some(point) = orbit.get(state.ref_index) else {
            return DeltaOutcome::Glitch(GlitchKind::OrbitExhausted);
        };

        let z_ref = D::from_f64_pair(point.z_f64.0, point.z_f64.1);
        let z = z_ref.add(&state.delta);
        let z_norm_sq = z.norm_sq();
        observer.on_iteration(n, z.to_f64_pair(), Some(state.delta.to_f64_pair()));

        if z_norm_sq > params.escape_radius_sq {
            return DeltaOutcome::Done(PixelResult::escaped(
                n,
                params.max_iterations,
                z_norm_sq,
            ));
        }

        // Pauldelbrot first: every case it catches also has |δ|² > |z|²
        if z_norm_sq < point.glitch_tolerance_sq {
            return DeltaOutcome::Glitch(GlitchKind::Pauldelbrot);
        }
        if z_norm_sq < state.delta.norm_sq() {
            return DeltaOutcome::Glitch(GlitchKind::DeltaDominates);
        }
        last_norm_sq = z_norm_sq;

        // δ' = 2·Z·δ + δ² + δc
        let two_z_delta = z_ref.mul(&state.delta).scale(2.0);
        state.delta = two_z_delta.add(&state.delta.square()).add(&delta_c);
        state.ref_index += 1;
    }

    DeltaOutcome::Done(PixelResult::bounded(params.max_iterations, last_norm_sq))
}
