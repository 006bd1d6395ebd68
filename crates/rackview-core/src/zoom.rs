//! Stage zoom for the layout canvas.

use kurbo::{Affine, Point};
use serde::{Deserialize, Serialize};

/// Scale applied by one zoom-in step.
pub const ZOOM_IN_FACTOR: f64 = 1.1;
/// Scale applied by one zoom-out step.
pub const ZOOM_OUT_FACTOR: f64 = 0.9;

/// Uniform scale of the whole stage.
///
/// Zoom only changes how the layer is shown; node positions, and therefore
/// persisted component positions, stay in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zoom {
    /// Current scale (1.0 = 100%).
    pub scale: f64,
    pub min_scale: f64,
    pub max_scale: f64,
}

impl Default for Zoom {
    fn default() -> Self {
        Self {
            scale: 1.0,
            min_scale: 0.5,
            max_scale: 2.0,
        }
    }
}

impl Zoom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom bounds. Swapped bounds are reordered.
    pub fn with_bounds(min_scale: f64, max_scale: f64) -> Self {
        Self {
            scale: 1.0_f64.clamp(min_scale.min(max_scale), max_scale.max(min_scale)),
            min_scale: min_scale.min(max_scale),
            max_scale: max_scale.max(min_scale),
        }
    }

    /// Multiply the scale by `factor`, clamped to the bounds.
    /// Returns true if the scale changed.
    pub fn zoom_by(&mut self, factor: f64) -> bool {
        let new_scale = (self.scale * factor).clamp(self.min_scale, self.max_scale);
        if (new_scale - self.scale).abs() < f64::EPSILON {
            return false;
        }
        self.scale = new_scale;
        true
    }

    pub fn zoom_in(&mut self) -> bool {
        self.zoom_by(ZOOM_IN_FACTOR)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom_by(ZOOM_OUT_FACTOR)
    }

    /// Back to 100%.
    pub fn reset(&mut self) {
        self.scale = 1.0_f64.clamp(self.min_scale, self.max_scale);
    }

    /// Scale as a whole percentage, for display.
    pub fn percent(&self) -> u32 {
        (self.scale * 100.0).round() as u32
    }

    /// Canvas-to-screen transform.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.scale)
    }

    /// Convert a screen point to canvas coordinates.
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        self.transform().inverse() * screen
    }

    /// Convert a canvas point to screen coordinates.
    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        self.transform() * canvas
    }
}
