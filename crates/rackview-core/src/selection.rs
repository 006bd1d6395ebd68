//! Single-component selection on a canvas surface.
//!
//! Selection is transient UI state: it is never persisted and belongs to one
//! surface instance.

use crate::component::WarehouseComponent;
use crate::config::CanvasTheme;
use crate::node::ComponentNode;
use crate::scene::{SceneBackend, SceneResult};

/// Tracks at most one selected component id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    current: Option<String>,
}

/// Last node rendered for `id`; later entries paint over earlier ones.
pub(crate) fn node_for<'n>(nodes: &'n [ComponentNode], id: &str) -> Option<&'n ComponentNode> {
    nodes.iter().rev().find(|n| n.component_id == id)
}

/// Last component with `id` in the collection.
pub(crate) fn component_for<'c>(components: &'c [WarehouseComponent], id: &str) -> Option<&'c WarehouseComponent> {
    components.iter().rev().find(|c| c.id == id)
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected component id.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.current.as_deref() == Some(id)
    }

    /// Select `id`, moving the highlight from the previous selection.
    ///
    /// Returns the selected component so the caller can notify its owner.
    /// An id missing from `components` is ignored and returns `None`; the
    /// collection may have changed since the nodes were built.
    pub fn select<'c, B: SceneBackend + ?Sized>(
        &mut self,
        id: &str,
        nodes: &[ComponentNode],
        components: &'c [WarehouseComponent],
        backend: &mut B,
        theme: &CanvasTheme,
    ) -> SceneResult<Option<&'c WarehouseComponent>> {
        let Some(component) = component_for(components, id) else {
            log::debug!("Ignoring selection of unknown component {id}");
            return Ok(None);
        };

        if self.is_selected(id) {
            return Ok(Some(component));
        }

        if let Some(previous) = self.current.take() {
            for node in nodes.iter().filter(|n| n.component_id == previous) {
                node.restore(backend)?;
            }
        }

        if let Some(node) = node_for(nodes, id) {
            node.highlight(backend, theme)?;
        }
        self.current = Some(id.to_string());
        backend.draw()?;
        Ok(Some(component))
    }

    /// Drop the selection and restore the previously selected node.
    pub fn clear<B: SceneBackend + ?Sized>(&mut self, nodes: &[ComponentNode], backend: &mut B) -> SceneResult<()> {
        if let Some(previous) = self.current.take() {
            for node in nodes.iter().filter(|n| n.component_id == previous) {
                node.restore(backend)?;
            }
            backend.draw()?;
        }
        Ok(())
    }

    /// Re-apply the highlight after nodes were rebuilt.
    ///
    /// A selected id with no node left is dropped, so re-adding it later does
    /// not bring the highlight back.
    pub fn reapply<B: SceneBackend + ?Sized>(
        &mut self,
        nodes: &[ComponentNode],
        backend: &mut B,
        theme: &CanvasTheme,
    ) -> SceneResult<()> {
        let Some(id) = self.current.as_deref() else {
            return Ok(());
        };
        match node_for(nodes, id) {
            Some(node) => node.highlight(backend, theme),
            None => {
                log::debug!("Selected component {id} is gone, clearing selection");
                self.current = None;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{ComponentStatus, ComponentType};
    use crate::config::CanvasConfig;
    use crate::node::build;
    use crate::scene::RetainedScene;
    use crate::style::{BORDER_WIDTH, HIGHLIGHT_BORDER_WIDTH};
    use kurbo::{Point, Size};
    use uuid::Uuid;

    struct Fixture {
        scene: RetainedScene,
        nodes: Vec<ComponentNode>,
        components: Vec<WarehouseComponent>,
        theme: CanvasTheme,
    }

    fn fixture() -> Fixture {
        let mut scene = RetainedScene::new();
        scene.create_surface(Size::new(800.0, 600.0)).unwrap();
        let config = CanvasConfig::default();
        let mut a = WarehouseComponent::new("A", Uuid::nil(), ComponentType::Rack, Point::new(0.0, 0.0));
        a.status = ComponentStatus::Immediate;
        let b = WarehouseComponent::new("B", Uuid::nil(), ComponentType::Beam, Point::new(300.0, 0.0));
        let components = vec![a, b];
        let nodes = components
            .iter()
            .enumerate()
            .map(|(i, c)| build(&mut scene, i, c, &config).unwrap())
            .collect();
        Fixture {
            scene,
            nodes,
            components,
            theme: config.theme,
        }
    }

    fn stroke(f: &Fixture, idx: usize) -> (Option<crate::style::SerializableColor>, f64) {
        let paint = f.scene.node(f.nodes[idx].body).unwrap().paint().copied().unwrap();
        (paint.stroke, paint.stroke_width)
    }

    #[test]
    fn test_select_moves_highlight() {
        let mut f = fixture();
        let mut selection = Selection::new();

        let picked = selection
            .select("A", &f.nodes, &f.components, &mut f.scene, &f.theme)
            .unwrap();
        assert_eq!(picked.map(|c| c.id.as_str()), Some("A"));
        assert_eq!(stroke(&f, 0), (Some(f.theme.highlight), HIGHLIGHT_BORDER_WIDTH));

        selection
            .select("B", &f.nodes, &f.components, &mut f.scene, &f.theme)
            .unwrap();
        assert_eq!(selection.current(), Some("B"));
        assert_eq!(stroke(&f, 0), (Some(f.nodes[0].border), BORDER_WIDTH));
        assert_eq!(stroke(&f, 1), (Some(f.theme.highlight), HIGHLIGHT_BORDER_WIDTH));
    }

    #[test]
    fn test_select_twice_is_stable() {
        let mut f = fixture();
        let mut selection = Selection::new();
        selection
            .select("B", &f.nodes, &f.components, &mut f.scene, &f.theme)
            .unwrap();
        let draws = f.scene.draw_count();
        let again = selection
            .select("B", &f.nodes, &f.components, &mut f.scene, &f.theme)
            .unwrap();

        assert!(again.is_some());
        assert_eq!(f.scene.draw_count(), draws);
        assert_eq!(stroke(&f, 1), (Some(f.theme.highlight), HIGHLIGHT_BORDER_WIDTH));
        assert_eq!(stroke(&f, 0), (Some(f.nodes[0].border), BORDER_WIDTH));
    }

    #[test]
    fn test_stale_id_is_ignored() {
        let mut f = fixture();
        let mut selection = Selection::new();
        selection
            .select("A", &f.nodes, &f.components, &mut f.scene, &f.theme)
            .unwrap();

        let result = selection
            .select("GONE", &f.nodes, &f.components, &mut f.scene, &f.theme)
            .unwrap();
        assert!(result.is_none());
        assert_eq!(selection.current(), Some("A"));
        assert_eq!(stroke(&f, 0), (Some(f.theme.highlight), HIGHLIGHT_BORDER_WIDTH));
    }

    #[test]
    fn test_clear_restores() {
        let mut f = fixture();
        let mut selection = Selection::new();
        selection
            .select("A", &f.nodes, &f.components, &mut f.scene, &f.theme)
            .unwrap();
        selection.clear(&f.nodes, &mut f.scene).unwrap();
        assert_eq!(selection.current(), None);
        assert_eq!(stroke(&f, 0), (Some(f.nodes[0].border), BORDER_WIDTH));
    }

    #[test]
    fn test_reapply_drops_vanished_id() {
        let mut f = fixture();
        let mut selection = Selection::new();
        selection
            .select("B", &f.nodes, &f.components, &mut f.scene, &f.theme)
            .unwrap();

        selection.reapply(&f.nodes[..1], &mut f.scene, &f.theme).unwrap();
        assert_eq!(selection.current(), None);

        selection.reapply(&f.nodes, &mut f.scene, &f.theme).unwrap();
        assert_eq!(selection.current(), None);
    }
}
