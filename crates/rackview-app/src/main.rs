mod commands;
mod config;

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use kurbo::{Point, Size};
use rackview_core::{ComponentType, DefectType, LayoutDocument, Severity, Storage};

use uuid::Uuid;

use crate::commands::{FindingDetails, Snapshot};
use crate::config::{load_canvas_config, open_storage};

#[derive(Parser)]
#[command(name = "rackview")]
#[command(about = "Warehouse racking layouts, inspections and snapshots", long_about = None)]
struct Cli {
    /// Directory holding layout files
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Canvas configuration (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use the read-only inspection mode
    #[arg(long, global = true)]
    inspection: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import components from CSV as a new layout
    Import {
        file: PathBuf,
        /// Layout name (defaults to the file name)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Write a layout's components as CSV
    Export {
        layout: String,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// List stored layouts
    List,
    /// Show status counts and urgent findings
    Summary { layout: String },
    /// Add a component at a grid-aligned position
    Add {
        layout: String,
        /// rack, beam, upright or any other type name
        component_type: String,
        x: f64,
        y: f64,
    },
    /// Remove a component
    Remove { layout: String, component: String },
    /// Drag a component to a new position
    Move {
        layout: String,
        component: String,
        x: f64,
        y: f64,
    },
    /// Record an inspection finding
    Inspect {
        layout: String,
        component: String,
        #[arg(long, value_enum)]
        severity: SeverityArg,
        #[arg(long, value_enum, default_value = "custom")]
        defect: DefectArg,
        /// Description for custom defects
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Fix-by date (YYYY-MM-DD). Amber findings default to four weeks out
        #[arg(long)]
        due: Option<NaiveDate>,
    },
    /// Mark a finding fixed
    Resolve { layout: String, finding: Uuid },
    /// Render a layout to SVG
    Render {
        layout: String,
        #[arg(short, long)]
        out: PathBuf,
        #[arg(long)]
        width: Option<f64>,
        #[arg(long)]
        height: Option<f64>,
        /// Highlight this component
        #[arg(long)]
        select: Option<String>,
        /// Zoom steps, negative to zoom out
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        zoom: i32,
        #[arg(long)]
        no_grid: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SeverityArg {
    Green,
    Amber,
    Red,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Green => Severity::Green,
            SeverityArg::Amber => Severity::Amber,
            SeverityArg::Red => Severity::Red,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DefectArg {
    BentUpright,
    DamagedBeam,
    LooseConnections,
    Corrosion,
    MissingComponents,
    Overloading,
    Custom,
}

impl From<DefectArg> for DefectType {
    fn from(arg: DefectArg) -> Self {
        match arg {
            DefectArg::BentUpright => DefectType::BentUpright,
            DefectArg::DamagedBeam => DefectType::DamagedBeam,
            DefectArg::LooseConnections => DefectType::LooseConnections,
            DefectArg::Corrosion => DefectType::Corrosion,
            DefectArg::MissingComponents => DefectType::MissingComponents,
            DefectArg::Overloading => DefectType::Overloading,
            DefectArg::Custom => DefectType::Custom,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let storage = open_storage(cli.store)?;
    let config = load_canvas_config(cli.config.as_deref(), cli.inspection)?;

    match cli.command {
        Command::Import { file, name } => {
            let csv = fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))?;
            let name = name.unwrap_or_else(|| {
                file.file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "Imported layout".to_string())
            });
            let document = commands::import(&storage, &name, &csv)?;
            println!("{}", document.id());
            print_summary(&document)?;
        }
        Command::Export { layout, out } => {
            let csv = commands::export(&storage, &layout)?;
            match out {
                Some(path) => fs::write(&path, csv).with_context(|| format!("writing {}", path.display()))?,
                None => print!("{csv}"),
            }
        }
        Command::List => {
            for id in pollster::block_on(storage.list())? {
                let document = commands::load(&storage, &id)?;
                println!("{}\t{}\t{} components", id, document.layout.name, document.components.len());
            }
        }
        Command::Summary { layout } => print_summary(&commands::load(&storage, &layout)?)?,
        Command::Add {
            layout,
            component_type,
            x,
            y,
        } => {
            let component = commands::add(
                &storage,
                &layout,
                ComponentType::from(component_type),
                Point::new(x, y),
                &config,
            )?;
            println!("{}\t{}\t{}", component.id, component.x_position, component.y_position);
        }
        Command::Remove { layout, component } => commands::remove(&storage, &layout, &component)?,
        Command::Move {
            layout,
            component,
            x,
            y,
        } => {
            let at = commands::move_component(&storage, &layout, &component, Point::new(x, y), config)?;
            println!("{}\t{}\t{}", component, at.x, at.y);
        }
        Command::Inspect {
            layout,
            component,
            severity,
            defect,
            description,
            notes,
            due,
        } => {
            let details = FindingDetails {
                notes,
                description,
                due,
            };
            let finding = commands::finding(&component, defect.into(), severity.into(), details);
            let finding_id = finding.id;
            let updated = commands::inspect(&storage, &layout, finding)?;
            println!("{}\t{}\t{}", finding_id, updated.id, updated.status);
        }
        Command::Resolve { layout, finding } => {
            let resolved = commands::resolve(&storage, &layout, finding, Utc::now())?;
            println!("{}\t{}\tresolved", resolved.id, resolved.component_id);
        }
        Command::Render {
            layout,
            out,
            width,
            height,
            select,
            zoom,
            no_grid,
        } => {
            let document = commands::load(&storage, &layout)?;
            let size = match (width, height) {
                (Some(w), Some(h)) => Some(Size::new(w, h)),
                (None, None) => None,
                _ => anyhow::bail!("--width and --height go together"),
            };
            let options = Snapshot {
                size,
                select,
                grid: !no_grid,
                zoom_steps: zoom,
            };
            let svg = commands::render_svg(&document, config, &options)?;
            fs::write(&out, svg).with_context(|| format!("writing {}", out.display()))?;
            log::info!("Wrote {}", out.display());
        }
    }

    Ok(())
}

fn print_summary(document: &LayoutDocument) -> anyhow::Result<()> {
    let today = Utc::now().date_naive();
    println!("{}", serde_json::to_string_pretty(&document.summary_on(today))?);
    for finding in document.urgent_inspections() {
        let due = finding.due_date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string());
        let overdue = if finding.is_overdue(today) { "OVERDUE" } else { "" };
        println!(
            "{}\t{:?}\t{}\t{:?}\t{}\t{}\t{}",
            finding.id, finding.severity, finding.component_id, finding.defect_type, due, overdue, finding.notes
        );
    }
    Ok(())
}
