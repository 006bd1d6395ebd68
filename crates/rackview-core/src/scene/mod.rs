//! Scene-graph abstraction for the layout canvas.
//!
//! The canvas never talks to a drawing library directly. Everything it needs
//! (surface lifecycle, groups, shapes, text, event subscription) goes through
//! [`SceneBackend`], so the concrete backend can be swapped without touching
//! node building, selection or drag handling.

mod retained;

pub use retained::{NodeContent, RetainedScene, SceneNode};

use crate::style::SerializableColor;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scene errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("Surface has been disposed")]
    Disposed,
    #[error("Surface has not been created")]
    NoSurface,
    #[error("Unknown node: {0:?}")]
    UnknownNode(NodeId),
    #[error("Node {0:?} cannot hold children")]
    NotAGroup(NodeId),
    #[error("Invalid canvas configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Handle to a node owned by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// Reserved node categories.
///
/// Component groups and the background grid live side by side on the same
/// layer; the category is how a render pass tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeName {
    Grid,
    Component,
    Body,
    Label,
    TypeGlyph,
    StatusGlyph,
}

/// Pointer events a node can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerEventKind {
    /// Click or tap.
    Click,
    DragMove,
    DragEnd,
    Enter,
    Leave,
}

/// A pointer event delivered to a node.
///
/// Drag positions are the node's proposed position in layer space, as the
/// input layer computed it from the pointer delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Click,
    DragMove { position: Point },
    DragEnd { position: Point },
    Enter,
    Leave,
}

impl PointerEvent {
    pub fn kind(&self) -> PointerEventKind {
        match self {
            PointerEvent::Click => PointerEventKind::Click,
            PointerEvent::DragMove { .. } => PointerEventKind::DragMove,
            PointerEvent::DragEnd { .. } => PointerEventKind::DragEnd,
            PointerEvent::Enter => PointerEventKind::Enter,
            PointerEvent::Leave => PointerEventKind::Leave,
        }
    }
}

/// Mouse cursor shown over the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
    Move,
}

/// Horizontal text alignment inside a text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
}

/// Fill and stroke of a drawable node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paint {
    pub fill: Option<SerializableColor>,
    pub stroke: Option<SerializableColor>,
    pub stroke_width: f64,
}

impl Paint {
    pub fn stroke(color: SerializableColor, width: f64) -> Self {
        Self {
            fill: None,
            stroke: Some(color),
            stroke_width: width,
        }
    }

    pub fn fill(color: SerializableColor) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
            stroke_width: 0.0,
        }
    }

    pub fn with_stroke(mut self, color: SerializableColor, width: f64) -> Self {
        self.stroke = Some(color);
        self.stroke_width = width;
        self
    }
}

/// A group node: positioned container for other nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSpec {
    pub name: NodeName,
    /// Business key (component id) the group represents.
    pub key: Option<String>,
    pub position: Point,
    pub draggable: bool,
}

/// Geometry of a shape node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeKind {
    Rect { size: Size, corner_radius: f64 },
    Line { from: Point, to: Point },
}

/// A shape node.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeSpec {
    pub name: NodeName,
    pub kind: ShapeKind,
    pub position: Point,
    pub paint: Paint,
    /// Whether the shape takes part in hit testing.
    pub listening: bool,
}

/// A text node.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpec {
    pub name: NodeName,
    pub content: String,
    pub position: Point,
    pub font_size: f64,
    /// Box width for alignment; `None` sizes to content.
    pub width: Option<f64>,
    pub align: TextAlign,
    pub color: SerializableColor,
}

/// Minimal retained-mode scene interface used by the canvas.
///
/// Node positions are relative to the parent group; top-level nodes sit on
/// the single layer of the surface in paint order (later paints over earlier).
pub trait SceneBackend {
    /// Create the drawing surface at the given pixel size.
    fn create_surface(&mut self, size: Size) -> SceneResult<()>;

    /// Resize the drawing surface.
    fn resize(&mut self, size: Size) -> SceneResult<()>;

    /// Current surface size.
    fn surface_size(&self) -> SceneResult<Size>;

    /// Uniform stage scale (zoom).
    fn set_scale(&mut self, scale: f64) -> SceneResult<()>;

    /// Release the surface and every node. Further calls fail with [`SceneError::Disposed`].
    fn dispose(&mut self);

    fn is_disposed(&self) -> bool;

    /// Create a group, on the layer when `parent` is `None`.
    fn create_group(&mut self, parent: Option<NodeId>, spec: GroupSpec) -> SceneResult<NodeId>;

    fn create_shape(&mut self, parent: Option<NodeId>, spec: ShapeSpec) -> SceneResult<NodeId>;

    fn create_text(&mut self, parent: Option<NodeId>, spec: TextSpec) -> SceneResult<NodeId>;

    /// Subscribe a node to pointer events.
    fn on(&mut self, node: NodeId, events: &[PointerEventKind]) -> SceneResult<()>;

    /// Whether a node is subscribed to an event kind.
    fn listens(&self, node: NodeId, kind: PointerEventKind) -> bool;

    /// Destroy a node and its descendants.
    fn destroy(&mut self, node: NodeId) -> SceneResult<()>;

    /// Move a top-level node beneath every other node on the layer.
    fn move_to_bottom(&mut self, node: NodeId) -> SceneResult<()>;

    /// Top-level nodes with the given name, in paint order.
    fn nodes_named(&self, name: NodeName) -> Vec<NodeId>;

    fn set_position(&mut self, node: NodeId, position: Point) -> SceneResult<()>;

    fn position(&self, node: NodeId) -> SceneResult<Point>;

    fn set_stroke(&mut self, node: NodeId, color: SerializableColor, width: f64) -> SceneResult<()>;

    fn set_cursor(&mut self, cursor: Cursor) -> SceneResult<()>;

    /// Flush pending changes to the screen.
    fn draw(&mut self) -> SceneResult<()>;
}
