//! Precision tier selection.
//!
//! Maps a view scale and iteration budget to the cheapest arithmetic that
//! still resolves adjacent pixels, and reports how many decimal digits the
//! view needs.

use serde::{Deserialize, Serialize};

use crate::{EngineConfig, Viewport};

/// Arithmetic used to iterate a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrecisionTier {
    /// Native f64 per pixel.
    Standard,
    /// Double-double per pixel.
    DoubleDouble,
    /// One double-double reference orbit plus per-pixel deltas.
    Perturbation,
}

/// Read-only precision snapshot for the last evaluated frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrecisionInfo {
    pub current_precision: PrecisionTier,
    pub effective_digits: u32,
    pub scale: f64,
}

/// Select the precision tier for a view scale and iteration budget.
///
/// - `scale > standard_threshold(max_iterations)` and
///   `max_iterations <= standard_max_iterations` → Standard
/// - otherwise `scale > perturbation_threshold` → DoubleDouble
/// - `scale <= perturbation_threshold` → Perturbation
///
/// f64 drift grows with orbit length, so the Standard boundary moves to
/// shallower scales as the budget grows and vanishes for long budgets.
pub fn select_tier(scale: f64, max_iterations: u32, config: &EngineConfig) -> PrecisionTier {
    let standard_ok = max_iterations <= config.standard_max_iterations
        && scale > config.standard_threshold(max_iterations);
    if standard_ok {
        PrecisionTier::Standard
    } else if scale > config.perturbation_threshold {
        PrecisionTier::DoubleDouble
    } else {
        PrecisionTier::Perturbation
    }
}

/// Decimal digits needed to address a view of this scale.
///
/// `ceil(log10(1 / scale)) + digits_offset`, never negative. Diagnostic only.
pub fn effective_digits(scale: f64, config: &EngineConfig) -> u32 {
    if !(scale.is_finite() && scale > 0.0) {
        return config.digits_offset;
    }
    let depth = (1.0 / scale).log10().ceil() + config.digits_offset as f64;
    if depth <= 0.0 {
        0
    } else {
        depth as u32
    }
}

/// Full precision snapshot for a viewport.
pub fn precision_info(viewport: &Viewport, config: &EngineConfig) -> PrecisionInfo {
    let scale = viewport.scale();
    PrecisionInfo {
        current_precision: select_tier(scale, viewport.max_iterations(), config),
        effective_digits: effective_digits(scale, config),
        scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_ENGINE_CONFIG;

    #[test]
    fn shallow_views_use_standard() {
        let config = DEFAULT_ENGINE_CONFIG;
        assert_eq!(select_tier(2.0, 100, &config), PrecisionTier::Standard);
        assert_eq!(select_tier(1e-3, 1000, &config), PrecisionTier::Standard);
    }

    #[test]
    fn thresholds_are_inclusive_on_the_deeper_side() {
        let config = DEFAULT_ENGINE_CONFIG;
        assert_eq!(select_tier(1e-5, 10, &config), PrecisionTier::DoubleDouble);
        assert_eq!(
            select_tier(1e-5 * (1.0 + 1e-12), 10, &config),
            PrecisionTier::Standard
        );
        assert_eq!(select_tier(1e-9, 10, &config), PrecisionTier::Perturbation);
        assert_eq!(
            select_tier(1e-9 * (1.0 + 1e-12), 10, &config),
            PrecisionTier::DoubleDouble
        );
        assert_eq!(select_tier(1e-300, 10, &config), PrecisionTier::Perturbation);
    }

    #[test]
    fn standard_boundary_follows_iteration_budget() {
        let config = DEFAULT_ENGINE_CONFIG;
        let threshold = config.standard_threshold(1000);
        assert_eq!(select_tier(threshold, 1000, &config), PrecisionTier::DoubleDouble);
        assert_eq!(
            select_tier(threshold * (1.0 + 1e-12), 1000, &config),
            PrecisionTier::Standard
        );
        // Scales that are Standard for short orbits need double-double for
        // long ones
        assert_eq!(select_tier(1e-4, 100, &config), PrecisionTier::Standard);
        assert_eq!(select_tier(1e-4, 1000, &config), PrecisionTier::DoubleDouble);
    }

    #[test]
    fn long_budgets_never_use_standard() {
        let config = DEFAULT_ENGINE_CONFIG;
        let cap = config.standard_max_iterations;
        assert_eq!(select_tier(1.0, cap, &config), PrecisionTier::Standard);
        assert_eq!(select_tier(1.0, cap + 1, &config), PrecisionTier::DoubleDouble);
        assert_eq!(select_tier(1e-10, cap + 1, &config), PrecisionTier::Perturbation);
    }

    #[test]
    fn selection_is_monotonic_in_scale() {
        let rank = |t: PrecisionTier| match t {
            PrecisionTier::Standard => 0,
            PrecisionTier::DoubleDouble => 1,
            PrecisionTier::Perturbation => 2,
        };
        for max_iterations in [10, 1000, 5000] {
            let mut previous = 0;
            for exp in 0..40 {
                let tier = select_tier(10f64.powi(-exp), max_iterations, &DEFAULT_ENGINE_CONFIG);
                assert!(rank(tier) >= previous);
                previous = rank(tier);
            }
        }
    }

    #[test]
    fn effective_digits_track_zoom_depth() {
        let config = DEFAULT_ENGINE_CONFIG;
        assert_eq!(effective_digits(1.0, &config), 3);
        assert_eq!(effective_digits(1e-3, &config), 6);
        assert_eq!(effective_digits(1e-10, &config), 13);
        assert_eq!(effective_digits(1e6, &config), 0);
    }

    #[test]
    fn precision_info_serializes() {
        let vp = Viewport::from_f64(-0.75, 0.1, 1e-10, 1000).unwrap();
        let info = precision_info(&vp, &DEFAULT_ENGINE_CONFIG);
        assert_eq!(info.current_precision, PrecisionTier::Perturbation);
        let json = serde_json::to_string(&info).unwrap();
        assert!(json.contains("Perturbation"));
    }
}
