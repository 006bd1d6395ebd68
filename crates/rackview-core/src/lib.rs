//! RackView Core Library
//!
//! Platform-agnostic model and interaction logic for the warehouse racking
//! layout canvas: component styling, grid snapping, node building, selection,
//! drag synchronisation, plus the layout documents the canvas edits.

pub mod canvas;
pub mod component;
pub mod config;
pub mod csv_io;
pub mod inspection;
pub mod layout;
pub mod node;
pub mod position;
pub mod scene;
pub mod selection;
pub mod snap;
pub mod storage;
pub mod style;
pub mod window;
pub mod zoom;

pub use canvas::{CanvasCallbacks, CanvasSurface};
pub use component::{ComponentStatus, ComponentType, WarehouseComponent};
pub use config::{CanvasConfig, CanvasMode, CanvasTheme, ConfigError};
pub use csv_io::{CsvError, export_csv, import_csv};
pub use inspection::{DefectType, Inspection, InspectionError, Severity};
pub use layout::{LayoutDocument, StatusSummary, WarehouseLayout};
pub use node::ComponentNode;
pub use position::{DropUpdate, sync_drop};
pub use scene::{NodeId, PointerEvent, RetainedScene, SceneBackend, SceneError};
pub use selection::Selection;
pub use snap::{GRID_SIZE, SnapResult, snap_to_grid};
pub use storage::{MemoryStorage, Storage, StorageError};
pub use style::{NodeStyle, SerializableColor, style_for};
pub use window::{Container, MeasuredContainer, WindowEvents};
pub use zoom::Zoom;

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
