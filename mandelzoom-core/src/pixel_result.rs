use serde::{Deserialize, Serialize};

/// Outcome of iterating one point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Iterations {
    /// |z|² exceeded the escape radius at this iteration index.
    Escaped(u32),
    /// Still bounded after `max_iterations`.
    BoundedToMax,
}

/// Data computed for a single pixel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PixelResult {
    pub iterations: Iterations,
    /// Iteration cap used for this pixel (for colorizer normalization).
    pub max_iterations: u32,
    /// |z|² at escape, or at the last iteration for bounded points.
    pub final_magnitude_sq: f64,
    /// Fractional escape count `n + 1 - log2(log2|z|)`. `None` when bounded.
    pub smooth_iteration: Option<f64>,
    /// Whether a glitch forced the pixel off the shared reference orbit.
    #[serde(default)]
    pub rebased: bool,
}

impl PixelResult {
    /// Result for a point that escaped at iteration `n` with |z_n|² = `norm_sq`.
    pub fn escaped(n: u32, max_iterations: u32, norm_sq: f64) -> Self {
        let norm_sq = Self::sanitize(norm_sq);
        Self {
            iterations: Iterations::Escaped(n),
            max_iterations,
            final_magnitude_sq: norm_sq,
            smooth_iteration: Self::smooth(n, norm_sq),
            rebased: false,
        }
    }

    /// Result for a point still bounded after `max_iterations`.
    pub fn bounded(max_iterations: u32, norm_sq: f64) -> Self {
        Self {
            iterations: Iterations::BoundedToMax,
            max_iterations,
            final_magnitude_sq: Self::sanitize(norm_sq),
            smooth_iteration: None,
            rebased: false,
        }
    }

    pub fn with_rebased(mut self, rebased: bool) -> Self {
        self.rebased = rebased;
        self
    }

    pub fn is_escaped(&self) -> bool {
        matches!(self.iterations, Iterations::Escaped(_))
    }

    /// Escape iteration, or `max_iterations` for bounded points.
    pub fn iteration_count(&self) -> u32 {
        match self.iterations {
            Iterations::Escaped(n) => n,
            Iterations::BoundedToMax => self.max_iterations,
        }
    }

    fn smooth(n: u32, norm_sq: f64) -> Option<f64> {
        // log2|z| = log2(|z|²) / 2
        let log2_mag = 0.5 * norm_sq.log2();
        if log2_mag <= 0.0 {
            return None;
        }
        let mu = n as f64 + 1.0 - log2_mag.log2();
        mu.is_finite().then_some(mu)
    }

    /// Replace NaN or Infinity so JSON serialization never fails.
    #[inline]
    fn sanitize(value: f64) -> f64 {
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }
}
