//! Building and restyling the scene nodes of a single component.

use crate::component::WarehouseComponent;
use crate::config::{CanvasConfig, CanvasTheme};
use crate::scene::{
    Cursor, GroupSpec, NodeId, NodeName, Paint, PointerEventKind, SceneBackend, SceneResult, ShapeKind, ShapeSpec,
    TextAlign, TextSpec,
};
use crate::style::{BORDER_WIDTH, HIGHLIGHT_BORDER_WIDTH, SerializableColor, style_for};
use kurbo::{Point, Size};

/// Inset of the label and glyphs from the component edges.
const INSET: f64 = 5.0;
const TYPE_GLYPH_SIZE: f64 = 10.0;
const STATUS_GLYPH_SIZE: f64 = 14.0;

/// Events every component node subscribes to.
const BASE_EVENTS: [PointerEventKind; 3] = [PointerEventKind::Click, PointerEventKind::Enter, PointerEventKind::Leave];
/// Extra events for editable surfaces.
const DRAG_EVENTS: [PointerEventKind; 2] = [PointerEventKind::DragMove, PointerEventKind::DragEnd];

/// Handles to the nodes that make up one rendered component.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentNode {
    /// Index of the component in the collection it was rendered from.
    pub index: usize,
    pub component_id: String,
    pub group: NodeId,
    /// Background rectangle carrying fill and border.
    pub body: NodeId,
    pub label: NodeId,
    pub type_glyph: NodeId,
    pub status_glyph: Option<NodeId>,
    /// Border derived from the component status.
    pub border: SerializableColor,
}

impl ComponentNode {
    /// Apply the highlight border (hover or selection).
    pub fn highlight<B: SceneBackend + ?Sized>(&self, backend: &mut B, theme: &CanvasTheme) -> SceneResult<()> {
        backend.set_stroke(self.body, theme.highlight, HIGHLIGHT_BORDER_WIDTH)
    }

    /// Return to the status-derived border.
    pub fn restore<B: SceneBackend + ?Sized>(&self, backend: &mut B) -> SceneResult<()> {
        backend.set_stroke(self.body, self.border, BORDER_WIDTH)
    }

    /// Pointer entered the node.
    pub fn hover_enter<B: SceneBackend + ?Sized>(
        &self,
        backend: &mut B,
        theme: &CanvasTheme,
        editable: bool,
    ) -> SceneResult<()> {
        backend.set_cursor(if editable { Cursor::Move } else { Cursor::Pointer })?;
        self.highlight(backend, theme)?;
        backend.draw()
    }

    /// Pointer left the node. A selected node keeps its highlight.
    pub fn hover_leave<B: SceneBackend + ?Sized>(&self, backend: &mut B, selected: bool) -> SceneResult<()> {
        backend.set_cursor(Cursor::Default)?;
        if !selected {
            self.restore(backend)?;
            backend.draw()?;
        }
        Ok(())
    }
}

/// Build the node tree for `component` on the layer and subscribe it to
/// pointer events: select and hover always, dragging only when `editable`.
///
/// Dimensions are taken as given; callers hand in validated components.
pub fn build<B: SceneBackend + ?Sized>(
    backend: &mut B,
    index: usize,
    component: &WarehouseComponent,
    config: &CanvasConfig,
) -> SceneResult<ComponentNode> {
    let style = style_for(&component.component_type, &component.status);
    let editable = config.mode.is_editable();
    let theme = &config.theme;

    let group = backend.create_group(
        None,
        GroupSpec {
            name: NodeName::Component,
            key: Some(component.id.clone()),
            position: component.position(),
            draggable: editable,
        },
    )?;

    let body = backend.create_shape(
        Some(group),
        ShapeSpec {
            name: NodeName::Body,
            kind: ShapeKind::Rect {
                size: Size::new(component.width, component.height),
                corner_radius: config.corner_radius,
            },
            position: Point::ZERO,
            paint: Paint::fill(style.fill).with_stroke(style.border, BORDER_WIDTH),
            listening: true,
        },
    )?;

    let label = backend.create_text(
        Some(group),
        TextSpec {
            name: NodeName::Label,
            content: component.id.clone(),
            position: Point::new(INSET, component.height / 2.0 - 8.0),
            font_size: config.label_font_size,
            width: Some(component.width - 2.0 * INSET),
            align: TextAlign::Center,
            color: theme.label,
        },
    )?;

    let type_glyph = backend.create_text(
        Some(group),
        TextSpec {
            name: NodeName::TypeGlyph,
            content: style.glyph.to_string(),
            position: Point::new(INSET, INSET),
            font_size: TYPE_GLYPH_SIZE,
            width: None,
            align: TextAlign::Left,
            color: theme.type_glyph,
        },
    )?;

    let status_glyph = style
        .status_glyph
        .map(|glyph| {
            backend.create_text(
                Some(group),
                TextSpec {
                    name: NodeName::StatusGlyph,
                    content: glyph.to_string(),
                    position: Point::new(component.width - 20.0, INSET),
                    font_size: STATUS_GLYPH_SIZE,
                    width: None,
                    align: TextAlign::Left,
                    color: style.border,
                },
            )
        })
        .transpose()?;

    backend.on(group, &BASE_EVENTS)?;
    if editable {
        backend.on(group, &DRAG_EVENTS)?;
    }

    Ok(ComponentNode {
        index,
        component_id: component.id.clone(),
        group,
        body,
        label,
        type_glyph,
        status_glyph,
        border: style.border,
    })
}
