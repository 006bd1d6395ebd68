//! Renderer trait abstraction.

use kurbo::Size;
use peniko::Color;
use rackview_core::scene::RetainedScene;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The scene to render.
    pub scene: &'a RetainedScene,
    /// Viewport size in pixels.
    pub viewport_size: Size,
    /// Uniform scale applied to the whole layer, taken from the scene zoom.
    pub scale_factor: f64,
    /// Background color.
    pub background_color: Color,
    /// Whether the background grid is drawn.
    pub show_grid: bool,
}

impl<'a> RenderContext<'a> {
    /// Create a render context at the scene's own zoom.
    pub fn new(scene: &'a RetainedScene, viewport_size: Size) -> Self {
        Self {
            scene,
            viewport_size,
            scale_factor: scene.scale(),
            background_color: Color::from_rgba8(0xf9, 0xfa, 0xfb, 255),
            show_grid: true,
        }
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_grid(mut self, show: bool) -> Self {
        self.show_grid = show;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer: Send + Sync {
    /// Build the output for one frame.
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()>;
}
