use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use rackview_core::{CanvasConfig, CanvasMode, FileStorage};

/// Canvas configuration from `--config`, or the defaults.
pub fn load_canvas_config(path: Option<&Path>, inspection: bool) -> anyhow::Result<CanvasConfig> {
    let mut config = match path {
        Some(path) => {
            let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            CanvasConfig::from_json(&json).with_context(|| format!("parsing {}", path.display()))?
        }
        None => CanvasConfig::default(),
    };
    if inspection {
        config.mode = CanvasMode::Inspection;
    }
    config.validate()?;
    Ok(config)
}

/// Layout store at `--store`, or under the platform data directory.
pub fn open_storage(path: Option<PathBuf>) -> anyhow::Result<FileStorage> {
    let storage = match path {
        Some(path) => FileStorage::new(path)?,
        None => FileStorage::default_location()?,
    };
    log::debug!("Using layout store at {}", storage.base_path().display());
    Ok(storage)
}
