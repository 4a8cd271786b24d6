//! Frame orchestration: tier selection, reference orbit caching and parallel
//! pixel evaluation.

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Instant;

use mandelzoom_core::{
    precision_info, EngineConfig, EngineError, PixelRect, PixelResult, PrecisionInfo,
    PrecisionTier, Viewport,
};
use rayon::prelude::*;

use crate::{
    CancellationChecker, DeltaPrecision, Evaluator, Frame, GenerationChecker, Observation,
    ObservationRequest, ObservationScope, ObservedValue, ReferenceOrbit, RequestObserver,
};

/// What the dispatcher is doing right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum DispatcherState {
    Idle = 0,
    OrbitComputing = 1,
    Evaluating = 2,
}

impl DispatcherState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => DispatcherState::OrbitComputing,
            2 => DispatcherState::Evaluating,
            _ => DispatcherState::Idle,
        }
    }
}

#[derive(Debug, Default)]
struct Shared {
    generation: Arc<AtomicU64>,
    state: AtomicU8,
}

impl Shared {
    fn set_state(&self, state: DispatcherState) {
        self.state.store(state as u8, Ordering::Release);
    }
}

/// Cross-thread handle to a dispatcher.
#[derive(Clone, Debug)]
pub struct DispatcherHandle {
    shared: Arc<Shared>,
}

impl DispatcherHandle {
    /// Abandon whatever frame is in flight. The interrupted call returns
    /// `EngineError::Superseded`.
    pub fn supersede(&self) {
        let generation = self.shared.generation.fetch_add(1, Ordering::AcqRel) + 1;
        log::debug!("Supersede requested, generation now {}", generation);
    }

    pub fn state(&self) -> DispatcherState {
        DispatcherState::from_u8(self.shared.state.load(Ordering::Acquire))
    }

    pub fn generation(&self) -> u64 {
        self.shared.generation.load(Ordering::Acquire)
    }
}

/// Returns the dispatcher to `Idle` however the frame ends.
struct IdleOnDrop<'a>(&'a Shared);

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        self.0.set_state(DispatcherState::Idle);
    }
}

/// Evaluates frames, choosing the precision tier per view and owning the
/// reference orbit of the current view.
#[derive(Debug)]
pub struct EvaluationDispatcher {
    config: EngineConfig,
    orbit: Option<Arc<ReferenceOrbit>>,
    info: Option<PrecisionInfo>,
    shared: Arc<Shared>,
}

impl Default for EvaluationDispatcher {
    fn default() -> Self {
        Self::with_valid_config(EngineConfig::default())
    }
}

impl EvaluationDispatcher {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: EngineConfig) -> Self {
        Self {
            config,
            orbit: None,
            info: None,
            shared: Arc::new(Shared::default()),
        }
    }

    pub fn handle(&self) -> DispatcherHandle {
        DispatcherHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Precision snapshot of the last completed frame.
    pub fn precision_info(&self) -> Option<PrecisionInfo> {
        self.info
    }

    /// Reference orbit of the current view. `None` unless the last frame was
    /// evaluated by perturbation.
    pub fn current_orbit(&self) -> Option<&ReferenceOrbit> {
        self.orbit.as_deref()
    }

    /// Evaluate every pixel of the canvas, row-major.
    pub fn evaluate(
        &mut self,
        viewport: &Viewport,
        canvas: (u32, u32),
    ) -> Result<Vec<PixelResult>, EngineError> {
        self.evaluate_tile(viewport, canvas, PixelRect::full(canvas))
    }

    /// Evaluate a sub-rectangle of the canvas, row-major within the rect.
    pub fn evaluate_tile(
        &mut self,
        viewport: &Viewport,
        canvas: (u32, u32),
        rect: PixelRect,
    ) -> Result<Vec<PixelResult>, EngineError> {
        let checker = GenerationChecker::new(Arc::clone(&self.shared.generation));
        self.evaluate_tile_with(viewport, canvas, rect, &checker)
    }

    pub(crate) fn evaluate_tile_with<C: CancellationChecker>(
        &mut self,
        viewport: &Viewport,
        canvas: (u32, u32),
        rect: PixelRect,
        checker: &C,
    ) -> Result<Vec<PixelResult>, EngineError> {
        check_canvas(canvas, rect)?;
        let shared = Arc::clone(&self.shared);
        let _idle = IdleOnDrop(&shared);

        let info = self.prepare(viewport, checker)?;
        let evaluator = self.evaluator(viewport, canvas, info.current_precision);

        shared.set_state(DispatcherState::Evaluating);
        let start = Instant::now();
        let rows: Option<Vec<Vec<PixelResult>>> = (rect.y..rect.y + rect.height)
            .into_par_iter()
            .map(|y| {
                if checker.is_cancelled() {
                    return None;
                }
                Some(
                    (rect.x..rect.x + rect.width)
                        .map(|x| evaluator.evaluate_pixel(x, y))
                        .collect(),
                )
            })
            .collect();

        let Some(rows) = rows else {
            return Err(self.superseded("evaluation"));
        };
        let mut results = Vec::with_capacity(rect.area());
        results.extend(rows.into_iter().flatten());

        let rebased = results.iter().filter(|r| r.rebased).count();
        log::debug!(
            "Evaluated {}x{} tile at ({}, {}) as {:?}: {} rebased, {:.1}ms",
            rect.width,
            rect.height,
            rect.x,
            rect.y,
            info.current_precision,
            rebased,
            start.elapsed().as_secs_f64() * 1000.0
        );

        self.info = Some(info);
        Ok(results)
    }

    /// Evaluate pixels while recording an intermediate quantity.
    ///
    /// Results in the returned observations are identical to what
    /// `evaluate` produces for the same pixels.
    pub fn observe(
        &mut self,
        viewport: &Viewport,
        canvas: (u32, u32),
        request: ObservationRequest,
        scope: ObservationScope,
    ) -> Result<Vec<Observation>, EngineError> {
        let rect = match scope {
            ObservationScope::Pixel { x, y } => PixelRect::new(x, y, 1, 1),
            ObservationScope::Frame => PixelRect::full(canvas),
        };
        check_canvas(canvas, rect)?;

        let checker = GenerationChecker::new(Arc::clone(&self.shared.generation));
        let shared = Arc::clone(&self.shared);
        let _idle = IdleOnDrop(&shared);

        let info = self.prepare(viewport, &checker)?;
        let evaluator = self.evaluator(viewport, canvas, info.current_precision);

        shared.set_state(DispatcherState::Evaluating);
        let rows: Option<Vec<Vec<Observation>>> = (rect.y..rect.y + rect.height)
            .into_par_iter()
            .map(|y| {
                if checker.is_cancelled() {
                    return None;
                }
                Some(
                    (rect.x..rect.x + rect.width)
                        .map(|x| observe_pixel(&evaluator, x, y, request))
                        .collect(),
                )
            })
            .collect();

        let Some(rows) = rows else {
            return Err(self.superseded("observation"));
        };

        self.info = Some(info);
        Ok(rows.into_iter().flatten().collect())
    }

    /// Select the tier and make sure a matching orbit is cached.
    fn prepare<C: CancellationChecker>(
        &mut self,
        viewport: &Viewport,
        checker: &C,
    ) -> Result<PrecisionInfo, EngineError> {
        let info = precision_info(viewport, &self.config);
        log::debug!(
            "Tier {:?} for scale {:e} ({} digits)",
            info.current_precision,
            info.scale,
            info.effective_digits
        );

        if info.current_precision != PrecisionTier::Perturbation {
            self.orbit = None;
            return Ok(info);
        }

        if self.can_reuse_orbit(viewport) {
            log::debug!("Reusing reference orbit");
            return Ok(info);
        }

        self.orbit = None;
        self.shared.set_state(DispatcherState::OrbitComputing);
        match ReferenceOrbit::compute_cancellable(
            viewport.center_dd(),
            viewport.max_iterations(),
            &self.config,
            checker,
        ) {
            Some(orbit) => {
                self.orbit = Some(Arc::new(orbit));
                Ok(info)
            }
            None => Err(self.superseded("reference orbit")),
        }
    }

    /// A cached orbit serves a view whose center is within
    /// `orbit_reuse_tolerance * scale` of its origin and whose iteration
    /// cap it already covers.
    fn can_reuse_orbit(&self, viewport: &Viewport) -> bool {
        let Some(orbit) = &self.orbit else {
            return false;
        };
        if viewport.max_iterations() > orbit.max_iterations() {
            return false;
        }
        let shift = viewport.center_dd().sub(orbit.origin());
        let tolerance = self.config.orbit_reuse_tolerance * viewport.scale();
        shift.re.abs().to_f64() <= tolerance && shift.im.abs().to_f64() <= tolerance
    }

    fn evaluator<'a>(
        &'a self,
        viewport: &'a Viewport,
        canvas: (u32, u32),
        tier: PrecisionTier,
    ) -> Evaluator<'a> {
        let frame = Frame::new(viewport, canvas, &self.config);
        match (tier, self.orbit.as_deref()) {
            (PrecisionTier::Standard, _) => Evaluator::Standard(frame),
            (PrecisionTier::Perturbation, Some(orbit)) => Evaluator::Perturbation {
                frame,
                orbit,
                delta: DeltaPrecision::for_scale(viewport.scale(), &self.config),
            },
            // prepare() always caches an orbit before a perturbation frame
            (PrecisionTier::DoubleDouble, _) | (PrecisionTier::Perturbation, None) => {
                Evaluator::DoubleDouble(frame)
            }
        }
    }

    fn superseded(&mut self, stage: &str) -> EngineError {
        log::warn!("Frame superseded during {}", stage);
        self.orbit = None;
        EngineError::Superseded
    }
}

fn check_canvas(canvas: (u32, u32), rect: PixelRect) -> Result<(), EngineError> {
    if canvas.0 == 0 || canvas.1 == 0 {
        return Err(EngineError::EmptyCanvas);
    }
    if !rect.fits_within(canvas) {
        return Err(EngineError::TileOutOfBounds {
            rect,
            width: canvas.0,
            height: canvas.1,
        });
    }
    Ok(())
}

fn observe_pixel(
    evaluator: &Evaluator<'_>,
    x: u32,
    y: u32,
    request: ObservationRequest,
) -> Observation {
    let mut observer = RequestObserver::new(request);
    let result = evaluator.evaluate_pixel_observed(x, y, &mut observer);
    let value = match request {
        ObservationRequest::CoordinateOffset => {
            let (re, im) = evaluator.coordinate_offset(x, y);
            ObservedValue::Offset { re, im }
        }
        ObservationRequest::ReferenceMagnitude { iteration } => evaluator
            .reference_magnitude(iteration)
            .map_or(ObservedValue::Unavailable, ObservedValue::Magnitude),
        _ => observer.into_value(),
    };
    Observation {
        x,
        y,
        value,
        result,
    }
}
