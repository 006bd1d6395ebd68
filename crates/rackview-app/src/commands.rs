//! Subcommand implementations.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, anyhow, bail};
use chrono::{DateTime, NaiveDate, Utc};
use kurbo::{Point, Size};
use rackview_core::scene::RetainedScene;
use rackview_core::snap::snap_to_grid;
use rackview_core::{
    CanvasCallbacks, CanvasConfig, CanvasSurface, ComponentType, DefectType, Inspection, LayoutDocument,
    MeasuredContainer, PointerEvent, Severity, Storage, WarehouseComponent, WindowEvents, export_csv, import_csv,
};
use rackview_render::{RenderContext, Renderer, SvgRenderer};
use uuid::Uuid;

/// Blank space kept around the components when sizing a snapshot.
const MARGIN: f64 = 40.0;
const MIN_CANVAS: Size = Size::new(400.0, 300.0);

pub fn load<S: Storage>(storage: &S, id: &str) -> anyhow::Result<LayoutDocument> {
    pollster::block_on(storage.load(id)).with_context(|| format!("loading layout {id}"))
}

pub fn save<S: Storage>(storage: &S, document: &LayoutDocument) -> anyhow::Result<()> {
    pollster::block_on(storage.save(document)).with_context(|| format!("saving layout {}", document.id()))
}

/// Import CSV text as a new stored layout.
pub fn import<S: Storage>(storage: &S, name: &str, csv: &str) -> anyhow::Result<LayoutDocument> {
    let document = import_csv(name, csv)?;
    save(storage, &document)?;
    Ok(document)
}

pub fn export<S: Storage>(storage: &S, id: &str) -> anyhow::Result<String> {
    Ok(export_csv(&load(storage, id)?.components)?)
}

/// Add a component at the grid point nearest `at`.
pub fn add<S: Storage>(
    storage: &S,
    id: &str,
    component_type: ComponentType,
    at: Point,
    config: &CanvasConfig,
) -> anyhow::Result<WarehouseComponent> {
    let mut document = load(storage, id)?;
    let position = snap_to_grid(at, config.grid_size).point;
    let component = document.add_component(component_type, position).clone();
    save(storage, &document)?;
    Ok(component)
}

pub fn remove<S: Storage>(storage: &S, id: &str, component_id: &str) -> anyhow::Result<()> {
    let mut document = load(storage, id)?;
    if document.remove_component(component_id) == 0 {
        bail!("no component {component_id} in layout {id}");
    }
    save(storage, &document)
}

/// Move a component by dropping it on a canvas surface, persisting the
/// collection the surface reports back.
pub fn move_component<S: Storage>(
    storage: &S,
    id: &str,
    component_id: &str,
    to: Point,
    config: CanvasConfig,
) -> anyhow::Result<Point> {
    let mut document = load(storage, id)?;
    let mode = config.mode;

    let reported = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&reported);
    let callbacks = CanvasCallbacks::new().on_component_update(move |all| *sink.borrow_mut() = Some(all));

    let size = canvas_size(&document.components, None);
    let window = WindowEvents::new();
    let mut surface = CanvasSurface::mount(
        RetainedScene::new(),
        Rc::new(MeasuredContainer::new(size)),
        &window,
        config,
        callbacks,
    )?;
    surface.render(document.components.clone())?;
    let target = surface
        .node(component_id)
        .map(|n| n.group)
        .ok_or_else(|| anyhow!("no component {component_id} in layout {id}"))?;
    surface.handle_event(target, PointerEvent::DragEnd { position: to });
    surface.teardown();

    let Some(components) = reported.borrow_mut().take() else {
        bail!("components cannot be moved in {mode:?} mode");
    };
    document.upsert_components(components);
    save(storage, &document)?;

    document
        .component(component_id)
        .map(|c| c.position())
        .ok_or_else(|| anyhow!("component {component_id} vanished"))
}

pub fn inspect<S: Storage>(
    storage: &S,
    id: &str,
    inspection: Inspection,
) -> anyhow::Result<WarehouseComponent> {
    let mut document = load(storage, id)?;
    let component = document.record_inspection(inspection)?.clone();
    save(storage, &document)?;
    Ok(component)
}

/// Mark a finding fixed.
pub fn resolve<S: Storage>(storage: &S, id: &str, finding: Uuid, at: DateTime<Utc>) -> anyhow::Result<Inspection> {
    let mut document = load(storage, id)?;
    let resolved = document.resolve_inspection(finding, at)?.clone();
    save(storage, &document)?;
    Ok(resolved)
}

/// Optional parts of a finding given on the command line.
#[derive(Debug, Clone, Default)]
pub struct FindingDetails {
    pub notes: Option<String>,
    pub description: Option<String>,
    pub due: Option<NaiveDate>,
}

/// Build a finding from command-line values.
pub fn finding(component_id: &str, defect: DefectType, severity: Severity, details: FindingDetails) -> Inspection {
    let mut inspection = Inspection::new(component_id, defect, severity);
    if let Some(notes) = details.notes {
        inspection = inspection.with_notes(notes);
    }
    if let Some(description) = details.description {
        inspection = inspection.with_custom_defect(description);
    }
    if let Some(due) = details.due {
        inspection = inspection.with_due_date(due);
    }
    inspection
}

/// Snapshot options.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub size: Option<Size>,
    pub select: Option<String>,
    pub grid: bool,
    pub zoom_steps: i32,
}

/// Render a stored layout to SVG.
pub fn render_svg(document: &LayoutDocument, config: CanvasConfig, options: &Snapshot) -> anyhow::Result<String> {
    let size = canvas_size(&document.components, options.size);
    let background = config.theme.background;
    let window = WindowEvents::new();
    let mut surface = CanvasSurface::mount(
        RetainedScene::new(),
        Rc::new(MeasuredContainer::new(size)),
        &window,
        config,
        CanvasCallbacks::new(),
    )?;
    surface.render(document.components.clone())?;
    if let Some(id) = options.select.as_deref() {
        surface.select(id);
        if surface.current_selection() != Some(id) {
            log::warn!("No component {} to select", id);
        }
    }
    for _ in 0..options.zoom_steps.max(0) {
        surface.zoom_in();
    }
    for _ in options.zoom_steps.min(0)..0 {
        surface.zoom_out();
    }

    let mut renderer = SvgRenderer::new();
    {
        let scene = surface.scene();
        let ctx = RenderContext::new(&scene, size)
            .with_background(background.into())
            .with_grid(options.grid);
        renderer.build_scene(&ctx)?;
    }
    Ok(renderer.into_svg())
}

/// Explicit size, or one fitting every component plus a margin.
pub fn canvas_size(components: &[WarehouseComponent], explicit: Option<Size>) -> Size {
    if let Some(size) = explicit {
        return size;
    }
    let (width, height) = components.iter().fold((0.0_f64, 0.0_f64), |(w, h), c| {
        let b = c.bounds();
        (w.max(b.x1), h.max(b.y1))
    });
    Size::new(
        (width + MARGIN).max(MIN_CANVAS.width),
        (height + MARGIN).max(MIN_CANVAS.height),
    )
}
