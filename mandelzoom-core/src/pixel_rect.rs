use serde::{Deserialize, Serialize};

/// Sub-rectangle of a canvas, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Create new pixel rectangle
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering a whole canvas.
    pub fn full(canvas: (u32, u32)) -> Self {
        Self::new(0, 0, canvas.0, canvas.1)
    }

    /// Calculate area in pixels
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Whether the rectangle lies entirely inside a canvas of this size.
    pub fn fits_within(&self, canvas: (u32, u32)) -> bool {
        let right = self.x as u64 + self.width as u64;
        let bottom = self.y as u64 + self.height as u64;
        right <= canvas.0 as u64 && bottom <= canvas.1 as u64
    }
}
