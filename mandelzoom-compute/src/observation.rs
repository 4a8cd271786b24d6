//! Inspection hooks for diagnosing precision defects.
//!
//! The iteration loops report every step to an `IterationObserver`. Production
//! paths pass `NoObserver`, whose empty methods compile away, so observing a
//! pixel never changes how it is computed.

use mandelzoom_core::PixelResult;
use serde::{Deserialize, Serialize};

/// Quantity to extract from an evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObservationRequest {
    /// Offset of the pixel from the point it is iterated against: the
    /// reference orbit origin under perturbation, the view center otherwise.
    CoordinateOffset,
    /// |z_k|² of the pixel's own trajectory at iteration `k`. Under
    /// perturbation this is |Z_k + δ_k|², the value the escape and glitch
    /// tests read, so it is reported the same way in every tier.
    OrbitMagnitude { iteration: u32 },
    /// |Z_k|² of the shared reference orbit at iteration `k`. Only the
    /// perturbation tier has a reference orbit.
    ReferenceMagnitude { iteration: u32 },
    /// Perturbation delta δ_k before the escape check at iteration `k`.
    RawDelta { iteration: u32 },
}

/// Which pixels to observe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObservationScope {
    Pixel { x: u32, y: u32 },
    Frame,
}

/// Observed quantity for one pixel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ObservedValue {
    Offset { re: f64, im: f64 },
    Magnitude(f64),
    Delta { re: f64, im: f64 },
    /// The pixel (or reference orbit) never reached the requested iteration,
    /// or the tier has no such quantity (no delta or reference orbit outside
    /// perturbation).
    Unavailable,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub x: u32,
    pub y: u32,
    pub value: ObservedValue,
    /// Result of the same pixel, identical to what `evaluate` returns.
    pub result: PixelResult,
}

/// Receives per-iteration state from the iteration loops.
pub trait IterationObserver {
    /// Called once per iteration with the full value `z_n` and, under
    /// perturbation, the delta `δ_n` it was built from.
    #[inline(always)]
    fn on_iteration(&mut self, _n: u32, _z: (f64, f64), _delta: Option<(f64, f64)>) {}

    /// Called when a pixel abandons the reference orbit and restarts from
    /// iteration 0 in double-double.
    #[inline(always)]
    fn on_rebase(&mut self) {}
}

/// Observer that records nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoObserver;

impl IterationObserver for NoObserver {}

/// Records the quantity named by an `ObservationRequest`.
#[derive(Clone, Debug)]
pub struct RequestObserver {
    request: ObservationRequest,
    value: ObservedValue,
}

impl RequestObserver {
    pub fn new(request: ObservationRequest) -> Self {
        Self {
            request,
            value: ObservedValue::Unavailable,
        }
    }

    pub fn into_value(self) -> ObservedValue {
        self.value
    }
}

impl IterationObserver for RequestObserver {
    fn on_iteration(&mut self, n: u32, z: (f64, f64), delta: Option<(f64, f64)>) {
        match self.request {
            ObservationRequest::OrbitMagnitude { iteration } if iteration == n => {
                self.value = ObservedValue::Magnitude(z.0 * z.0 + z.1 * z.1);
            }
            ObservationRequest::RawDelta { iteration } if iteration == n => {
                if let Some((re, im)) = delta {
                    self.value = ObservedValue::Delta { re, im };
                }
            }
            _ => {}
        }
    }

    fn on_rebase(&mut self) {
        // Magnitudes are re-reported by the restart. Pre-glitch deltas stay.
        if matches!(self.request, ObservationRequest::OrbitMagnitude { .. }) {
            self.value = ObservedValue::Unavailable;
        }
    }
}
