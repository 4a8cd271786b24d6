//! Reference orbit computation for perturbation rendering.
//!
//! Iterates a single origin in double-double precision and keeps every
//! point, both exactly and as the f64 cast the delta loop reads.

use std::time::Instant;

use mandelzoom_core::{DDComplex, EngineConfig, ExtendedReal};

use crate::{CancellationChecker, NeverCancel};

/// Iterations between cancellation checks.
const CANCEL_CHECK_INTERVAL: u32 = 1024;

/// Below this |Z_n|² the Pauldelbrot criterion is not applied; the ratio
/// |z|²/|Z|² is meaningless when Z sits on the origin.
const PAULDELBROT_MIN_NORM_SQ: f64 = 1e-20;

/// One step `Z_n` of a reference orbit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitPoint {
    pub z: DDComplex,
    pub z_norm_sq: ExtendedReal,
    /// `z` rounded to f64 for the delta iteration.
    pub z_f64: (f64, f64),
    /// `τ² · |Z_n|²`, or 0 where the criterion does not apply.
    pub glitch_tolerance_sq: f64,
}

impl OrbitPoint {
    fn new(z: DDComplex, tau_sq: f64) -> Self {
        let z_norm_sq = z.norm_sq();
        let norm_f64 = z_norm_sq.to_f64();
        let glitch_tolerance_sq = if norm_f64 > PAULDELBROT_MIN_NORM_SQ {
            tau_sq * norm_f64
        } else {
            0.0
        };
        Self {
            z,
            z_norm_sq,
            z_f64: z.to_f64_pair(),
            glitch_tolerance_sq,
        }
    }
}

/// A pre-computed reference orbit for perturbation rendering.
///
/// Immutable once built. A new origin means a new orbit.
#[derive(Clone, Debug)]
pub struct ReferenceOrbit {
    origin: DDComplex,
    points: Vec<OrbitPoint>,
    max_iterations: u32,
    escaped_at: Option<u32>,
}

impl ReferenceOrbit {
    /// Compute an orbit to completion.
    pub fn compute(origin: DDComplex, max_iterations: u32, config: &EngineConfig) -> Self {
        let mut computer = ReferenceOrbitComputer::new(origin, max_iterations, config);
        computer.run(&NeverCancel);
        computer.into_orbit()
    }

    /// Compute an orbit, giving up when `checker` reports cancellation.
    pub fn compute_cancellable<C: CancellationChecker>(
        origin: DDComplex,
        max_iterations: u32,
        config: &EngineConfig,
        checker: &C,
    ) -> Option<Self> {
        let mut computer = ReferenceOrbitComputer::new(origin, max_iterations, config);
        computer.run(checker);
        computer.finish()
    }

    /// Point the orbit was computed for.
    pub fn origin(&self) -> &DDComplex {
        &self.origin
    }

    pub fn points(&self) -> &[OrbitPoint] {
        &self.points
    }

    pub fn get(&self, n: usize) -> Option<&OrbitPoint> {
        self.points.get(n)
    }

    /// Number of stored points: the escape iteration plus one, or
    /// `max_iterations` when the origin stayed bounded.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Iteration at which the origin escaped (None if never escaped)
    pub fn escaped_at(&self) -> Option<u32> {
        self.escaped_at
    }
}

/// Incremental builder for a `ReferenceOrbit`.
///
/// `run` may return early on cancellation; only a completed computer can be
/// turned into an orbit, so a partial orbit is never observable.
#[derive(Debug)]
pub struct ReferenceOrbitComputer {
    origin: DDComplex,
    max_iterations: u32,
    escape_radius_sq: ExtendedReal,
    tau_sq: f64,
    z: DDComplex,
    next: u32,
    points: Vec<OrbitPoint>,
    escaped_at: Option<u32>,
}

impl ReferenceOrbitComputer {
    pub fn new(origin: DDComplex, max_iterations: u32, config: &EngineConfig) -> Self {
        Self {
            origin,
            max_iterations,
            escape_radius_sq: ExtendedReal::from_f64(config.escape_radius_sq),
            tau_sq: config.tau_sq,
            z: DDComplex::ZERO,
            next: 0,
            points: Vec::with_capacity(max_iterations as usize),
            escaped_at: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.escaped_at.is_some() || self.next >= self.max_iterations
    }

    /// Iterate until the orbit is complete or `checker` cancels.
    ///
    /// Returns `true` when complete. A cancelled computer can be resumed by
    /// calling `run` again.
    pub fn run<C: CancellationChecker>(&mut self, checker: &C) -> bool {
        let start = Instant::now();

        while !self.is_complete() {
            let n = self.next;
            if n % CANCEL_CHECK_INTERVAL == 0 && checker.is_cancelled() {
                log::debug!("Reference orbit cancelled at iteration {}", n);
                return false;
            }

            let point = OrbitPoint::new(self.z, self.tau_sq);
            let escaped = point.z_norm_sq > self.escape_radius_sq;
            self.points.push(point);
            self.next += 1;

            if escaped {
                self.escaped_at = Some(n);
                break;
            }

            self.z = self.z.square().add(&self.origin);
        }

        log::info!(
            "Reference orbit: {} points, escaped_at={:?}, {:.1}ms",
            self.points.len(),
            self.escaped_at,
            start.elapsed().as_secs_f64() * 1000.0
        );
        true
    }

    /// Finish into an orbit. `None` if `run` has not completed.
    pub fn finish(self) -> Option<ReferenceOrbit> {
        self.is_complete().then(|| self.into_orbit())
    }

    fn into_orbit(self) -> ReferenceOrbit {
        ReferenceOrbit {
            origin: self.origin,
            points: self.points,
            max_iterations: self.max_iterations,
            escaped_at: self.escaped_at,
        }
    }
}
