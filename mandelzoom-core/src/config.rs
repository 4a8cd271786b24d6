//! Engine configuration.
//!
//! Thresholds and tolerances shared by the tier selector, the reference orbit
//! computer and the perturbation iterator.

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Tunable parameters of the iteration engine.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Views with `scale` at or below this never use native f64.
    pub dd_threshold: f64,
    /// f64 rounding error compounds every iteration, so the scale below
    /// which f64 is abandoned grows by this much per allowed iteration.
    pub dd_threshold_per_iteration: f64,
    /// Iteration budgets above this always use at least double-double.
    pub standard_max_iterations: u32,
    /// Views with `scale` at or below this use perturbation.
    pub perturbation_threshold: f64,
    /// Escape radius squared.
    pub escape_radius_sq: f64,
    /// Glitch detection threshold squared (τ²).
    /// Default 1e-6 corresponds to τ = 10⁻³ (standard).
    pub tau_sq: f64,
    /// A cached reference orbit is reused while the view center stays within
    /// `orbit_reuse_tolerance * scale` of its origin.
    pub orbit_reuse_tolerance: f64,
    /// At or below this scale perturbation deltas are carried in
    /// double-double instead of f64.
    pub dd_delta_threshold: f64,
    /// Added to the decimal zoom depth when reporting effective digits.
    pub digits_offset: u32,
}

/// Canonical defaults.
pub static DEFAULT_ENGINE_CONFIG: EngineConfig = EngineConfig {
    dd_threshold: 1e-5,
    dd_threshold_per_iteration: 5e-7,
    standard_max_iterations: 2000,
    perturbation_threshold: 1e-9,
    escape_radius_sq: 4.0,
    tau_sq: 1e-6,
    orbit_reuse_tolerance: 1e-6,
    dd_delta_threshold: 1e-24,
    digits_offset: 3,
};

impl Default for EngineConfig {
    fn default() -> Self {
        DEFAULT_ENGINE_CONFIG
    }
}

impl EngineConfig {
    /// Scale at or below which a view with this iteration budget leaves the
    /// Standard tier.
    pub fn standard_threshold(&self, max_iterations: u32) -> f64 {
        let budget = max_iterations as f64 * self.dd_threshold_per_iteration;
        self.dd_threshold.max(budget)
    }

    /// Check invariants between fields.
    pub fn validate(&self) -> Result<(), EngineError> {
        let thresholds_ok = self.perturbation_threshold.is_finite()
            && self.dd_threshold.is_finite()
            && self.perturbation_threshold > 0.0
            && self.perturbation_threshold < self.dd_threshold;
        if !thresholds_ok {
            return Err(EngineError::InvalidThresholds {
                double_double: self.dd_threshold,
                perturbation: self.perturbation_threshold,
            });
        }
        if !(self.dd_threshold_per_iteration.is_finite()
            && self.dd_threshold_per_iteration >= 0.0)
        {
            return Err(EngineError::InvalidConfig(format!(
                "dd_threshold_per_iteration must be non-negative, got {}",
                self.dd_threshold_per_iteration
            )));
        }
        if !(self.escape_radius_sq.is_finite() && self.escape_radius_sq >= 4.0) {
            return Err(EngineError::InvalidConfig(format!(
                "escape_radius_sq must be finite and at least 4, got {}",
                self.escape_radius_sq
            )));
        }
        if !(self.tau_sq.is_finite() && self.tau_sq > 0.0 && self.tau_sq < 1.0) {
            return Err(EngineError::InvalidConfig(format!(
                "tau_sq must lie in (0, 1), got {}",
                self.tau_sq
            )));
        }
        if !(self.orbit_reuse_tolerance.is_finite() && self.orbit_reuse_tolerance >= 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "orbit_reuse_tolerance must be non-negative, got {}",
                self.orbit_reuse_tolerance
            )));
        }
        if !(self.dd_delta_threshold.is_finite() && self.dd_delta_threshold >= 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "dd_delta_threshold must be non-negative, got {}",
                self.dd_delta_threshold
            )));
        }
        Ok(())
    }

    /// Load overrides from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
