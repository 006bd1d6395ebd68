//! Layout canvas: one drawing surface showing a collection of components.

use crate::component::WarehouseComponent;
use crate::config::{CanvasConfig, CanvasMode};
use crate::node::{self, ComponentNode};
use crate::position::sync_drop;
use crate::scene::{
    GroupSpec, NodeId, NodeName, Paint, PointerEvent, SceneBackend, SceneError, SceneResult, ShapeKind,
    ShapeSpec,
};
use crate::selection::{Selection, node_for};
use crate::snap::snap_to_grid;
use crate::style::SerializableColor;
use crate::window::{Container, ResizeListener, WindowEvents};
use crate::zoom::Zoom;
use kurbo::{Point, Size};
use std::cell::{Ref, RefCell};
use std::rc::Rc;

/// Called with the full record of a clicked component.
pub type SelectCallback = Box<dyn FnMut(&WarehouseComponent)>;
/// Called after a drop with the whole collection, moved component substituted.
pub type UpdateCallback = Box<dyn FnMut(Vec<WarehouseComponent>)>;

/// Optional hooks into the hosting page.
#[derive(Default)]
pub struct CanvasCallbacks {
    on_component_select: Option<SelectCallback>,
    on_component_update: Option<UpdateCallback>,
}

impl CanvasCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_component_select(mut self, f: impl FnMut(&WarehouseComponent) + 'static) -> Self {
        self.on_component_select = Some(Box::new(f));
        self
    }

    pub fn on_component_update(mut self, f: impl FnMut(Vec<WarehouseComponent>) + 'static) -> Self {
        self.on_component_update = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for CanvasCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasCallbacks")
            .field("on_component_select", &self.on_component_select.is_some())
            .field("on_component_update", &self.on_component_update.is_some())
            .finish()
    }
}

/// Backend plus the background grid. Shared with the resize handler.
struct Stage<B> {
    backend: B,
    grid: Option<NodeId>,
    grid_size: f64,
    grid_color: SerializableColor,
}

impl<B: SceneBackend> Stage<B> {
    /// Replace the grid with one covering the current surface.
    fn draw_grid(&mut self) -> SceneResult<()> {
        if let Some(old) = self.grid.take() {
            self.backend.destroy(old)?;
        }
        let size = self.backend.surface_size()?;
        let group = self.backend.create_group(
            None,
            GroupSpec {
                name: NodeName::Grid,
                key: None,
                position: Point::ZERO,
                draggable: false,
            },
        )?;

        let columns = (size.width / self.grid_size).floor() as usize;
        let rows = (size.height / self.grid_size).floor() as usize;
        let paint = Paint::stroke(self.grid_color, 1.0);
        let line = |from, to| ShapeSpec {
            name: NodeName::Grid,
            kind: ShapeKind::Line { from, to },
            position: Point::ZERO,
            paint,
            listening: false,
        };
        for i in 0..=columns {
            let x = i as f64 * self.grid_size;
            self.backend
                .create_shape(Some(group), line(Point::new(x, 0.0), Point::new(x, size.height)))?;
        }
        for i in 0..=rows {
            let y = i as f64 * self.grid_size;
            self.backend
                .create_shape(Some(group), line(Point::new(0.0, y), Point::new(size.width, y)))?;
        }

        self.backend.move_to_bottom(group)?;
        self.grid = Some(group);
        Ok(())
    }

    fn resize(&mut self, size: Size) -> SceneResult<()> {
        self.backend.resize(size)?;
        self.draw_grid()?;
        self.backend.draw()
    }
}

/// Interactive layout canvas.
///
/// Owns one drawing surface. Mounting creates the surface, draws the grid and
/// registers a window resize handler; dropping the surface unregisters the
/// handler and disposes the backend, in that order.
///
/// The component collection belongs to the host. Each [`render`](Self::render)
/// call hands in a fresh snapshot and changes come back only through
/// [`CanvasCallbacks`].
pub struct CanvasSurface<B: SceneBackend + 'static> {
    stage: Rc<RefCell<Stage<B>>>,
    config: CanvasConfig,
    components: Vec<WarehouseComponent>,
    nodes: Vec<ComponentNode>,
    selection: Selection,
    zoom: Zoom,
    callbacks: CanvasCallbacks,
    resize_listener: Option<ResizeListener>,
}

impl<B: SceneBackend + 'static> CanvasSurface<B> {
    /// Create the surface inside `container` and start following window resizes.
    ///
    /// Fails with [`SceneError::InvalidConfig`] before touching the backend if
    /// `config` does not validate.
    pub fn mount(
        backend: B,
        container: Rc<dyn Container>,
        window: &WindowEvents,
        config: CanvasConfig,
        callbacks: CanvasCallbacks,
    ) -> SceneResult<Self> {
        config
            .validate()
            .map_err(|e| SceneError::InvalidConfig(e.to_string()))?;
        let mut backend = backend;
        let size = container.pixel_size();
        backend.create_surface(size)?;

        let mut stage = Stage {
            backend,
            grid: None,
            grid_size: config.grid_size,
            grid_color: config.theme.grid_line,
        };
        stage.draw_grid()?;
        stage.backend.draw()?;

        let stage = Rc::new(RefCell::new(stage));
        let weak = Rc::downgrade(&stage);
        let resize_listener = window.on_resize(move || {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let Ok(mut stage) = shared.try_borrow_mut() else {
                log::warn!("Surface busy, skipping resize");
                return;
            };
            if let Err(e) = stage.resize(container.pixel_size()) {
                log::warn!("Resize failed: {}", e);
            }
        });

        log::info!("Mounted canvas surface {}x{} ({:?})", size.width, size.height, config.mode);
        Ok(Self {
            stage,
            zoom: Zoom::with_bounds(config.min_zoom, config.max_zoom),
            config,
            components: Vec::new(),
            nodes: Vec::new(),
            selection: Selection::new(),
            callbacks,
            resize_listener: Some(resize_listener),
        })
    }

    /// Rebuild every component node from `components`, in order.
    ///
    /// The grid is left alone. A selected id that is still present keeps its
    /// highlight; one that is gone is deselected.
    pub fn render(&mut self, components: Vec<WarehouseComponent>) -> SceneResult<()> {
        let mut stage = self.stage.borrow_mut();
        for group in stage.backend.nodes_named(NodeName::Component) {
            stage.backend.destroy(group)?;
        }
        self.nodes.clear();

        for (index, component) in components.iter().enumerate() {
            let node = node::build(&mut stage.backend, index, component, &self.config)?;
            self.nodes.push(node);
        }
        self.selection
            .reapply(&self.nodes, &mut stage.backend, &self.config.theme)?;
        stage.backend.draw()?;

        log::debug!("Rendered {} components", components.len());
        self.components = components;
        Ok(())
    }

    /// Route a pointer event to the component node `target`.
    ///
    /// Events the node did not subscribe to are dropped, as are events for
    /// nodes that no longer exist. Failures are logged, never returned.
    pub fn handle_event(&mut self, target: NodeId, event: PointerEvent) {
        if let Err(e) = self.dispatch(target, event) {
            log::warn!("Pointer event {:?} on {:?} failed: {}", event.kind(), target, e);
        }
    }

    fn dispatch(&mut self, target: NodeId, event: PointerEvent) -> SceneResult<()> {
        let Some(node) = self.nodes.iter().find(|n| n.group == target).cloned() else {
            return Ok(());
        };
        if !self.stage.borrow().backend.listens(target, event.kind()) {
            return Ok(());
        }

        match event {
            PointerEvent::Click => {
                // Selection is by id, so with duplicate ids the highlight lands
                // on the node painted last.
                self.select(&node.component_id);
                Ok(())
            }
            PointerEvent::DragMove { position } => {
                let snapped = snap_to_grid(position, self.config.grid_size).point;
                let mut stage = self.stage.borrow_mut();
                stage.backend.set_position(target, snapped)?;
                stage.backend.draw()
            }
            PointerEvent::DragEnd { position } => {
                let update = sync_drop(&self.components, node.index, position, self.config.grid_size);
                {
                    let mut stage = self.stage.borrow_mut();
                    stage.backend.set_position(target, update.position)?;
                    stage.backend.draw()?;
                }
                log::debug!(
                    "Dropped {} at ({}, {})",
                    node.component_id,
                    update.position.x,
                    update.position.y
                );
                match self.callbacks.on_component_update.as_mut() {
                    Some(on_update) => on_update(update.components),
                    None => log::debug!("No update callback, move of {} stays local", node.component_id),
                }
                Ok(())
            }
            PointerEvent::Enter => {
                let mut stage = self.stage.borrow_mut();
                node.hover_enter(&mut stage.backend, &self.config.theme, self.config.mode.is_editable())
            }
            PointerEvent::Leave => {
                let selected = self.selection.is_selected(&node.component_id);
                node.hover_leave(&mut self.stage.borrow_mut().backend, selected)
            }
        }
    }

    /// Select a component by id and notify the host.
    ///
    /// Ids missing from the current collection are ignored.
    pub fn select(&mut self, id: &str) {
        let result = {
            let mut stage = self.stage.borrow_mut();
            self.selection.select(
                id,
                &self.nodes,
                &self.components,
                &mut stage.backend,
                &self.config.theme,
            )
        };
        match result {
            Ok(Some(component)) => {
                if let Some(on_select) = self.callbacks.on_component_select.as_mut() {
                    on_select(component);
                }
            }
            Ok(None) => {}
            Err(e) => log::warn!("Selecting {} failed: {}", id, e),
        }
    }

    /// Currently selected component id.
    pub fn current_selection(&self) -> Option<&str> {
        self.selection.current()
    }

    pub fn clear_selection(&mut self) {
        let mut stage = self.stage.borrow_mut();
        if let Err(e) = self.selection.clear(&self.nodes, &mut stage.backend) {
            log::warn!("Clearing selection failed: {}", e);
        }
    }

    /// Switch between edit and inspection mode, rebuilding the nodes.
    pub fn set_mode(&mut self, mode: CanvasMode) -> SceneResult<()> {
        if self.config.mode == mode {
            return Ok(());
        }
        self.config.mode = mode;
        let components = std::mem::take(&mut self.components);
        self.render(components)
    }

    pub fn mode(&self) -> CanvasMode {
        self.config.mode
    }

    /// Resize the surface to `size` and redraw the grid.
    pub fn resize_to(&mut self, size: Size) -> SceneResult<()> {
        self.stage.borrow_mut().resize(size)
    }

    pub fn zoom_in(&mut self) -> u32 {
        self.zoom.zoom_in();
        self.apply_zoom()
    }

    pub fn zoom_out(&mut self) -> u32 {
        self.zoom.zoom_out();
        self.apply_zoom()
    }

    pub fn reset_zoom(&mut self) -> u32 {
        self.zoom.reset();
        self.apply_zoom()
    }

    pub fn zoom(&self) -> &Zoom {
        &self.zoom
    }

    /// Push the zoom scale to the backend; returns the zoom percentage.
    fn apply_zoom(&mut self) -> u32 {
        let mut stage = self.stage.borrow_mut();
        let applied = stage.backend.set_scale(self.zoom.scale);
        if let Err(e) = applied.and_then(|_| stage.backend.draw()) {
            log::warn!("Zoom failed: {}", e);
        }
        self.zoom.percent()
    }

    /// Components from the last render, in render order.
    pub fn components(&self) -> &[WarehouseComponent] {
        &self.components
    }

    /// Nodes from the last render, parallel to [`components`](Self::components).
    pub fn nodes(&self) -> &[ComponentNode] {
        &self.nodes
    }

    /// Node shown for `id`; with duplicate ids, the one painted last.
    pub fn node(&self, id: &str) -> Option<&ComponentNode> {
        node_for(&self.nodes, id)
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Borrow the backend, e.g. to hand it to a renderer.
    pub fn scene(&self) -> Ref<'_, B> {
        Ref::map(self.stage.borrow(), |stage| &stage.backend)
    }

    /// Grid group currently on the layer.
    pub fn grid(&self) -> Option<NodeId> {
        self.stage.borrow().grid
    }

    /// Unmount explicitly. Equivalent to dropping the surface.
    pub fn teardown(self) {}
}

impl<B: SceneBackend + 'static> Drop for CanvasSurface<B> {
    fn drop(&mut self) {
        // Unregister first so a late resize can never reach a disposed backend.
        drop(self.resize_listener.take());
        match self.stage.try_borrow_mut() {
            Ok(mut stage) => stage.backend.dispose(),
            Err(_) => log::warn!("Surface still borrowed during teardown"),
        }
        log::info!("Canvas surface torn down");
    }
}
