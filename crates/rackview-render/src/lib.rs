//! RackView Render Library
//!
//! Renderer abstraction and the SVG renderer used for layout snapshots.

mod renderer;
mod svg;

pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};
pub use svg::SvgRenderer;
