//! Per-frame pixel evaluator.
//!
//! The tier is chosen once per frame; every pixel of the frame then goes
//! through the same variant.

use mandelzoom_core::{
    ComplexDelta, DDComplex, EngineConfig, PixelResult, PrecisionTier, StdComplex, Viewport,
};

use crate::{
    compute_pixel_perturbation, iterate_double_double, iterate_standard, IterationObserver,
    IterationParams, NoObserver, ReferenceOrbit,
};

/// Number type carrying perturbation deltas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeltaPrecision {
    Standard,
    DoubleDouble,
}

impl DeltaPrecision {
    /// Deltas switch to double-double once the view is too small for f64
    /// products `2·Z·δ` to keep enough bits.
    pub fn for_scale(scale: f64, config: &EngineConfig) -> Self {
        if scale <= config.dd_delta_threshold {
            DeltaPrecision::DoubleDouble
        } else {
            DeltaPrecision::Standard
        }
    }
}

/// View and canvas of the frame being evaluated.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    pub viewport: &'a Viewport,
    pub canvas: (u32, u32),
    pub params: IterationParams,
}

impl<'a> Frame<'a> {
    pub fn new(viewport: &'a Viewport, canvas: (u32, u32), config: &EngineConfig) -> Self {
        Self {
            viewport,
            canvas,
            params: IterationParams::new(viewport.max_iterations(), config),
        }
    }

    fn pixel_center(&self, x: u32, y: u32) -> DDComplex {
        self.viewport.pixel_center_dd(x, y, self.canvas)
    }
}

/// Pixel evaluator for one frame.
#[derive(Clone, Copy, Debug)]
pub enum Evaluator<'a> {
    Standard(Frame<'a>),
    DoubleDouble(Frame<'a>),
    Perturbation {
        frame: Frame<'a>,
        orbit: &'a ReferenceOrbit,
        delta: DeltaPrecision,
    },
}

impl<'a> Evaluator<'a> {
    pub fn tier(&self) -> PrecisionTier {
        match self {
            Evaluator::Standard(_) => PrecisionTier::Standard,
            Evaluator::DoubleDouble(_) => PrecisionTier::DoubleDouble,
            Evaluator::Perturbation { .. } => PrecisionTier::Perturbation,
        }
    }

    pub fn frame(&self) -> &Frame<'a> {
        match self {
            Evaluator::Standard(frame) | Evaluator::DoubleDouble(frame) => frame,
            Evaluator::Perturbation { frame, .. } => frame,
        }
    }

    #[inline]
    pub fn evaluate_pixel(&self, x: u32, y: u32) -> PixelResult {
        self.evaluate_pixel_observed(x, y, &mut NoObserver)
    }

    pub fn evaluate_pixel_observed<O: IterationObserver>(
        &self,
        x: u32,
        y: u32,
        observer: &mut O,
    ) -> PixelResult {
        match self {
            Evaluator::Standard(frame) => {
                let c = frame.pixel_center(x, y).to_f64_pair();
                iterate_standard(c, &frame.params, observer)
            }
            Evaluator::DoubleDouble(frame) => {
                iterate_double_double(&frame.pixel_center(x, y), &frame.params, observer)
            }
            Evaluator::Perturbation {
                frame,
                orbit,
                delta,
            } => {
                let c = frame.pixel_center(x, y);
                match delta {
                    DeltaPrecision::Standard => compute_pixel_perturbation::<StdComplex, O>(
                        orbit,
                        &c,
                        &frame.params,
                        observer,
                    ),
                    DeltaPrecision::DoubleDouble => compute_pixel_perturbation::<DDComplex, O>(
                        orbit,
                        &c,
                        &frame.params,
                        observer,
                    ),
                }
            }
        }
    }

    /// |Z_k|² of the reference orbit, when this frame iterates against one.
    pub fn reference_magnitude(&self, iteration: u32) -> Option<f64> {
        match self {
            Evaluator::Perturbation { orbit, .. } => orbit
                .get(iteration as usize)
                .map(|point| point.z_norm_sq.to_f64()),
            Evaluator::Standard(_) | Evaluator::DoubleDouble(_) => None,
        }
    }

    /// Offset of the pixel from the point it is iterated against.
    pub fn coordinate_offset(&self, x: u32, y: u32) -> (f64, f64) {
        match self {
            Evaluator::Standard(frame) | Evaluator::DoubleDouble(frame) => frame
                .pixel_center(x, y)
                .sub(&frame.viewport.center_dd())
                .to_f64_pair(),
            Evaluator::Perturbation { frame, orbit, .. } => {
                StdComplex::from_dd(&frame.pixel_center(x, y).sub(orbit.origin())).to_f64_pair()
            }
        }
    }
}
