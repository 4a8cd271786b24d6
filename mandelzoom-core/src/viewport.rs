use serde::{Deserialize, Serialize};

use crate::{BigFloat, DDComplex, EngineError, ExtendedReal};

/// Precision used when parsing decimal coordinates. Far beyond the 106 bits
/// an `ExtendedReal` keeps, so the final rounding happens exactly once.
const PARSE_PRECISION_BITS: usize = 256;

/// View into the complex plane.
///
/// - `center`: double-double center point
/// - `scale`: half of the visible width in fractal units
/// - `max_iterations`: iteration cap for every pixel of the view
///
/// The canvas spans `2 * scale` horizontally; height follows from the canvas
/// aspect ratio with square pixels. Row 0 is the top of the view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ViewportFields")]
pub struct Viewport {
    center_x: ExtendedReal,
    center_y: ExtendedReal,
    scale: f64,
    max_iterations: u32,
}

/// Unvalidated wire form of a `Viewport`.
#[derive(Deserialize)]
struct ViewportFields {
    center_x: ExtendedReal,
    center_y: ExtendedReal,
    scale: f64,
    max_iterations: u32,
}

impl TryFrom<ViewportFields> for Viewport {
    type Error = EngineError;

    fn try_from(fields: ViewportFields) -> Result<Self, Self::Error> {
        Viewport::new(
            fields.center_x,
            fields.center_y,
            fields.scale,
            fields.max_iterations,
        )
    }
}

impl Viewport {
    /// Create a viewport from double-double center coordinates.
    pub fn new(
        center_x: ExtendedReal,
        center_y: ExtendedReal,
        scale: f64,
        max_iterations: u32,
    ) -> Result<Self, EngineError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(EngineError::InvalidScale(scale));
        }
        if max_iterations == 0 {
            return Err(EngineError::InvalidMaxIterations);
        }
        if !center_x.is_finite() || !center_y.is_finite() {
            return Err(EngineError::Parse(format!(
                "non-finite center ({}, {})",
                center_x.to_f64(),
                center_y.to_f64()
            )));
        }
        Ok(Self {
            center_x,
            center_y,
            scale,
            max_iterations,
        })
    }

    /// Create a viewport from f64 center coordinates.
    pub fn from_f64(
        center_x: f64,
        center_y: f64,
        scale: f64,
        max_iterations: u32,
    ) -> Result<Self, EngineError> {
        Self::new(
            ExtendedReal::from_f64(center_x),
            ExtendedReal::from_f64(center_y),
            scale,
            max_iterations,
        )
    }

    /// Create a viewport from decimal strings.
    ///
    /// Use this for saved positions whose coordinates carry more digits than
    /// an f64 literal can hold.
    pub fn from_strings(
        center_x: &str,
        center_y: &str,
        scale: &str,
        max_iterations: u32,
    ) -> Result<Self, EngineError> {
        let cx = BigFloat::from_string(center_x, PARSE_PRECISION_BITS)?;
        let cy = BigFloat::from_string(center_y, PARSE_PRECISION_BITS)?;
        let scale = BigFloat::from_string(scale, PARSE_PRECISION_BITS)?.to_f64();
        Self::new(
            ExtendedReal::from_bigfloat(&cx),
            ExtendedReal::from_bigfloat(&cy),
            scale,
            max_iterations,
        )
    }

    /// Center as a double-double complex number.
    pub fn center_dd(&self) -> DDComplex {
        DDComplex::new(self.center_x, self.center_y)
    }

    /// Center rounded to f64 (lossy at deep zoom).
    pub fn center_f64(&self) -> (f64, f64) {
        (self.center_x.to_f64(), self.center_y.to_f64())
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Same view with a different iteration cap.
    pub fn with_max_iterations(&self, max_iterations: u32) -> Result<Self, EngineError> {
        Self::new(self.center_x, self.center_y, self.scale, max_iterations)
    }

    /// Width of one pixel in fractal units.
    pub fn pixel_size(&self, canvas_width: u32) -> f64 {
        2.0 * self.scale / canvas_width as f64
    }

    /// Offset of a pixel center from the view center, in fractal units.
    ///
    /// Offsets are small relative to the center, so f64 holds them without
    /// loss of significance at any zoom depth.
    pub fn pixel_offset(&self, px: u32, py: u32, canvas: (u32, u32)) -> (f64, f64) {
        let (width, height) = canvas;
        let size = self.pixel_size(width);
        let dx = (px as f64 + 0.5 - width as f64 / 2.0) * size;
        let dy = (height as f64 / 2.0 - py as f64 - 0.5) * size;
        (dx, dy)
    }

    /// Pixel center as a double-double complex number.
    ///
    /// Every precision tier derives pixel coordinates from this method, so
    /// the same pixel maps to the same point whatever arithmetic iterates it.
    pub fn pixel_center_dd(&self, px: u32, py: u32, canvas: (u32, u32)) -> DDComplex {
        let (dx, dy) = self.pixel_offset(px, py, canvas);
        DDComplex::new(self.center_x.add_f64(dx), self.center_y.add_f64(dy))
    }
}
