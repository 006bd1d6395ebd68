//! In-memory retained scene.
//!
//! Holds the node tree exactly as a drawing library would, without drawing
//! anything itself. Renderers walk it to produce output, and the canvas is
//! tested against it.

use super::{
    Cursor, GroupSpec, NodeId, NodeName, Paint, PointerEventKind, SceneBackend, SceneError, SceneResult, ShapeKind,
    ShapeSpec, TextAlign, TextSpec,
};
use crate::style::SerializableColor;
use kurbo::{Point, Rect, Size};
use std::collections::HashMap;

/// Node payload.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeContent {
    Group {
        draggable: bool,
    },
    Shape {
        kind: ShapeKind,
        paint: Paint,
    },
    Text {
        content: String,
        font_size: f64,
        width: Option<f64>,
        align: TextAlign,
        color: SerializableColor,
    },
}

/// A node of the retained tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub id: NodeId,
    pub name: NodeName,
    pub key: Option<String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Position relative to the parent (or the layer).
    pub position: Point,
    pub content: NodeContent,
    pub listeners: Vec<PointerEventKind>,
    /// Whether the node takes part in hit testing.
    pub listening: bool,
}

impl SceneNode {
    pub fn is_group(&self) -> bool {
        matches!(self.content, NodeContent::Group { .. })
    }

    pub fn paint(&self) -> Option<&Paint> {
        match &self.content {
            NodeContent::Shape { paint, .. } => Some(paint),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.content {
            NodeContent::Text { content, .. } => Some(content),
            _ => None,
        }
    }

    pub fn is_draggable(&self) -> bool {
        matches!(self.content, NodeContent::Group { draggable: true })
    }
}

/// In-memory [`SceneBackend`].
#[derive(Debug, Default)]
pub struct RetainedScene {
    nodes: HashMap<NodeId, SceneNode>,
    /// Top-level nodes in paint order.
    layer: Vec<NodeId>,
    size: Option<Size>,
    scale: f64,
    cursor: Cursor,
    disposed: bool,
    next_id: u64,
    draw_count: usize,
}

impl RetainedScene {
    pub fn new() -> Self {
        Self {
            scale: 1.0,
            ..Self::default()
        }
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Top-level nodes in paint order.
    pub fn layer(&self) -> &[NodeId] {
        &self.layer
    }

    /// Total number of live nodes, nested ones included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Child of `parent` with the given name.
    pub fn child_named(&self, parent: NodeId, name: NodeName) -> Option<&SceneNode> {
        self.nodes
            .get(&parent)?
            .children
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .find(|n| n.name == name)
    }

    /// Top-level group carrying the given key; the last one in paint order wins.
    pub fn find_by_key(&self, key: &str) -> Option<NodeId> {
        self.layer
            .iter()
            .rev()
            .copied()
            .find(|id| self.nodes.get(id).and_then(|n| n.key.as_deref()) == Some(key))
    }

    /// Position of a node in layer space.
    pub fn absolute_position(&self, id: NodeId) -> Option<Point> {
        let mut node = self.nodes.get(&id)?;
        let mut offset = node.position.to_vec2();
        while let Some(parent) = node.parent.and_then(|p| self.nodes.get(&p)) {
            offset += parent.position.to_vec2();
            node = parent;
        }
        Some(offset.to_point())
    }

    /// Layer-space bounds of the rectangles inside a group.
    pub fn group_bounds(&self, id: NodeId) -> Option<Rect> {
        let origin = self.absolute_position(id)?.to_vec2();
        self.nodes.get(&id)?.children.iter().filter_map(|c| self.nodes.get(c)).fold(None, |acc, child| {
            let NodeContent::Shape { kind: ShapeKind::Rect { size, .. }, .. } = &child.content else {
                return acc;
            };
            let rect = Rect::from_origin_size(child.position + origin, *size);
            Some(acc.map_or(rect, |r: Rect| r.union(rect)))
        })
    }

    /// Top-most listening group under a layer-space point.
    pub fn hit_test(&self, point: Point) -> Option<NodeId> {
        self.layer.iter().rev().copied().find(|&id| {
            self.nodes
                .get(&id)
                .is_some_and(|n| n.is_group() && !n.listeners.is_empty())
                && self.group_bounds(id).is_some_and(|b| b.contains(point))
        })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Number of completed draw calls.
    pub fn draw_count(&self) -> usize {
        self.draw_count
    }

    fn ensure_live(&self) -> SceneResult<()> {
        if self.disposed {
            Err(SceneError::Disposed)
        } else if self.size.is_none() {
            Err(SceneError::NoSurface)
        } else {
            Ok(())
        }
    }

    fn node_mut(&mut self, id: NodeId) -> SceneResult<&mut SceneNode> {
        self.ensure_live()?;
        self.nodes.get_mut(&id).ok_or(SceneError::UnknownNode(id))
    }

    fn insert(
        &mut self,
        parent: Option<NodeId>,
        name: NodeName,
        key: Option<String>,
        position: Point,
        content: NodeContent,
        listening: bool,
    ) -> SceneResult<NodeId> {
        self.ensure_live()?;
        if let Some(parent) = parent {
            let p = self.nodes.get(&parent).ok_or(SceneError::UnknownNode(parent))?;
            if !p.is_group() {
                return Err(SceneError::NotAGroup(parent));
            }
        }

        self.next_id += 1;
        let id = NodeId(self.next_id);
        self.nodes.insert(
            id,
            SceneNode {
                id,
                name,
                key,
                parent,
                children: Vec::new(),
                position,
                content,
                listeners: Vec::new(),
                listening,
            },
        );
        match parent.and_then(|p| self.nodes.get_mut(&p)) {
            Some(p) => p.children.push(id),
            None => self.layer.push(id),
        }
        Ok(id)
    }

    fn remove_subtree(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.remove(&id) {
            for child in node.children {
                self.remove_subtree(child);
            }
        }
    }
}

impl SceneBackend for RetainedScene {
    fn create_surface(&mut self, size: Size) -> SceneResult<()> {
        if self.disposed {
            return Err(SceneError::Disposed);
        }
        self.size = Some(size);
        Ok(())
    }

    fn resize(&mut self, size: Size) -> SceneResult<()> {
        self.ensure_live()?;
        self.size = Some(size);
        Ok(())
    }

    fn surface_size(&self) -> SceneResult<Size> {
        self.ensure_live()?;
        self.size.ok_or(SceneError::NoSurface)
    }

    fn set_scale(&mut self, scale: f64) -> SceneResult<()> {
        self.ensure_live()?;
        self.scale = scale;
        Ok(())
    }

    fn dispose(&mut self) {
        self.nodes.clear();
        self.layer.clear();
        self.size = None;
        self.disposed = true;
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn create_group(&mut self, parent: Option<NodeId>, spec: GroupSpec) -> SceneResult<NodeId> {
        self.insert(
            parent,
            spec.name,
            spec.key,
            spec.position,
            NodeContent::Group {
                draggable: spec.draggable,
            },
            true,
        )
    }

    fn create_shape(&mut self, parent: Option<NodeId>, spec: ShapeSpec) -> SceneResult<NodeId> {
        self.insert(
            parent,
            spec.name,
            None,
            spec.position,
            NodeContent::Shape {
                kind: spec.kind,
                paint: spec.paint,
            },
            spec.listening,
        )
    }

    fn create_text(&mut self, parent: Option<NodeId>, spec: TextSpec) -> SceneResult<NodeId> {
        self.insert(
            parent,
            spec.name,
            None,
            spec.position,
            NodeContent::Text {
                content: spec.content,
                font_size: spec.font_size,
                width: spec.width,
                align: spec.align,
                color: spec.color,
            },
            true,
        )
    }

    fn on(&mut self, node: NodeId, events: &[PointerEventKind]) -> SceneResult<()> {
        let node = self.node_mut(node)?;
        for &kind in events {
            if !node.listeners.contains(&kind) {
                node.listeners.push(kind);
            }
        }
        Ok(())
    }

    fn listens(&self, node: NodeId, kind: PointerEventKind) -> bool {
        !self.disposed && self.nodes.get(&node).is_some_and(|n| n.listeners.contains(&kind))
    }

    fn destroy(&mut self, node: NodeId) -> SceneResult<()> {
        self.ensure_live()?;
        let parent = self.nodes.get(&node).ok_or(SceneError::UnknownNode(node))?.parent;
        match parent.and_then(|p| self.nodes.get_mut(&p)) {
            Some(p) => p.children.retain(|&c| c != node),
            None => self.layer.retain(|&c| c != node),
        }
        self.remove_subtree(node);
        Ok(())
    }

    fn move_to_bottom(&mut self, node: NodeId) -> SceneResult<()> {
        self.ensure_live()?;
        let pos = self
            .layer
            .iter()
            .position(|&id| id == node)
            .ok_or(SceneError::UnknownNode(node))?;
        let id = self.layer.remove(pos);
        self.layer.insert(0, id);
        Ok(())
    }

    fn nodes_named(&self, name: NodeName) -> Vec<NodeId> {
        self.layer
            .iter()
            .copied()
            .filter(|id| self.nodes.get(id).is_some_and(|n| n.name == name))
            .collect()
    }

    fn set_position(&mut self, node: NodeId, position: Point) -> SceneResult<()> {
        self.node_mut(node)?.position = position;
        Ok(())
    }

    fn position(&self, node: NodeId) -> SceneResult<Point> {
        self.ensure_live()?;
        self.nodes
            .get(&node)
            .map(|n| n.position)
            .ok_or(SceneError::UnknownNode(node))
    }

    fn set_stroke(&mut self, node: NodeId, color: SerializableColor, width: f64) -> SceneResult<()> {
        match &mut self.node_mut(node)?.content {
            NodeContent::Shape { paint, .. } => {
                paint.stroke = Some(color);
                paint.stroke_width = width;
            }
            NodeContent::Text { color: c, .. } => *c = color,
            NodeContent::Group { .. } => {}
        }
        Ok(())
    }

    fn set_cursor(&mut self, cursor: Cursor) -> SceneResult<()> {
        self.ensure_live()?;
        self.cursor = cursor;
        Ok(())
    }

    fn draw(&mut self) -> SceneResult<()> {
        self.ensure_live()?;
        self.draw_count += 1;
        Ok(())
    }
}
