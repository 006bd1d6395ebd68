//! SVG output of a retained layout scene.

use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError};
use kurbo::{Point, Size};
use rackview_core::scene::{NodeContent, NodeId, NodeName, Paint, RetainedScene, SceneBackend, ShapeKind, TextAlign};
use rackview_core::style::SerializableColor;
use std::fmt::Write;

/// Renders a [`RetainedScene`] to an SVG document.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    output: String,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last frame built.
    pub fn svg(&self) -> &str {
        &self.output
    }

    pub fn into_svg(self) -> String {
        self.output
    }
}

impl Renderer for SvgRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        if ctx.scene.is_disposed() {
            return Err(RendererError::Surface("scene has been disposed".to_string()));
        }
        let size = ctx.viewport_size;
        if !(size.width > 0.0 && size.height > 0.0) {
            return Err(RendererError::Surface(format!(
                "invalid viewport {}x{}",
                size.width, size.height
            )));
        }

        let mut svg = String::new();
        write_frame(&mut svg, ctx).map_err(|e| RendererError::RenderFailed(e.to_string()))?;
        log::debug!("Built SVG frame with {} top-level nodes", ctx.scene.layer().len());
        self.output = svg;
        Ok(())
    }
}

fn write_frame(out: &mut String, ctx: &RenderContext) -> std::fmt::Result {
    let Size { width, height } = ctx.viewport_size;
    writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
    )?;
    writeln!(out, "<style>\n  text {{ font-family: Arial, sans-serif; }}\n</style>")?;
    writeln!(
        out,
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\" />",
        color(ctx.background_color.into())
    )?;
    writeln!(out, "<g transform=\"scale({})\">", ctx.scale_factor)?;
    for &id in ctx.scene.layer() {
        let skip = !ctx.show_grid && ctx.scene.node(id).is_some_and(|n| n.name == NodeName::Grid);
        if !skip {
            write_node(out, ctx.scene, id, 1)?;
        }
    }
    writeln!(out, "</g>\n</svg>")
}

fn write_node(out: &mut String, scene: &RetainedScene, id: NodeId, depth: usize) -> std::fmt::Result {
    let Some(node) = scene.node(id) else {
        return Ok(());
    };
    let indent = "  ".repeat(depth);
    let Point { x, y } = node.position;

    match &node.content {
        NodeContent::Group { .. } => {
            match &node.key {
                Some(key) => writeln!(
                    out,
                    "{indent}<g id=\"{}\" transform=\"translate({x}, {y})\">",
                    escape(key)
                )?,
                None => writeln!(out, "{indent}<g transform=\"translate({x}, {y})\">")?,
            }
            for &child in &node.children {
                write_node(out, scene, child, depth + 1)?;
            }
            writeln!(out, "{indent}</g>")?;
        }
        NodeContent::Shape {
            kind: ShapeKind::Rect { size, corner_radius },
            paint,
        } => writeln!(
            out,
            "{indent}<rect x=\"{x}\" y=\"{y}\" width=\"{}\" height=\"{}\" rx=\"{corner_radius}\" {} />",
            size.width,
            size.height,
            paint_attrs(paint)
        )?,
        NodeContent::Shape {
            kind: ShapeKind::Line { from, to },
            paint,
        } => writeln!(
            out,
            "{indent}<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" {} />",
            x + from.x,
            y + from.y,
            x + to.x,
            y + to.y,
            paint_attrs(paint)
        )?,
        NodeContent::Text {
            content,
            font_size,
            width,
            align,
            color: fill,
        } => {
            let (anchor_x, anchor) = match (align, width) {
                (TextAlign::Center, Some(w)) => (x + w / 2.0, "middle"),
                _ => (x, "start"),
            };
            // Text nodes are positioned by their top edge.
            let baseline = y + font_size * 0.9;
            writeln!(
                out,
                "{indent}<text x=\"{anchor_x}\" y=\"{baseline}\" font-size=\"{font_size}\" fill=\"{}\" text-anchor=\"{anchor}\">{}</text>",
                color(*fill),
                escape(content)
            )?;
        }
    }
    Ok(())
}

fn paint_attrs(paint: &Paint) -> String {
    let fill = paint.fill.map(color).unwrap_or_else(|| "none".to_string());
    match paint.stroke {
        Some(stroke) => format!(
            "fill=\"{fill}\" stroke=\"{}\" stroke-width=\"{}\"",
            color(stroke),
            paint.stroke_width
        ),
        None => format!("fill=\"{fill}\""),
    }
}

fn color(c: SerializableColor) -> String {
    c.to_hex()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
