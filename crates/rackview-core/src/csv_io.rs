//! CSV import and export of layout components.
//!
//! One component per record, header first:
//!
//! ```text
//! component_id,type,x,y,width,height,status
//! RACK-001,rack,20,40,200,300,good
//! "AISLE 3, BAY 2",rack,20,20,200,300,monitor
//! ```
//!
//! Fields containing commas or quotes are quoted on export.

use crate::component::{ComponentStatus, ComponentType, WarehouseComponent};
use crate::layout::LayoutDocument;
use csv::{ReaderBuilder, StringRecord, Trim, Writer};
use thiserror::Error;

/// Header written on export and skipped on import.
pub const CSV_HEADER: &str = "component_id,type,x,y,width,height,status";

const MIN_COLUMNS: usize = 6;
const COLUMN_NAMES: [&str; 7] = ["component_id", "type", "x", "y", "width", "height", "status"];

/// CSV errors. Line and column numbers are 1-based.
#[derive(Debug, Error, PartialEq)]
pub enum CsvError {
    #[error("Line {line}: expected at least 6 columns, found {found}")]
    TooFewColumns { line: usize, found: usize },
    #[error("Line {line}, column {column} ({name}): invalid number {value:?}")]
    InvalidNumber {
        line: usize,
        column: usize,
        name: &'static str,
        value: String,
    },
    #[error("Line {line}: empty component id")]
    EmptyId { line: usize },
    #[error("Line {line}: {message}")]
    Malformed { line: usize, message: String },
    #[error("Failed to write CSV: {0}")]
    Write(String),
}

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Write `components` as CSV, header first, in collection order.
pub fn export_csv(components: &[WarehouseComponent]) -> CsvResult<String> {
    let write_error = |e: csv::Error| CsvError::Write(e.to_string());
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(COLUMN_NAMES).map_err(write_error)?;
    for c in components {
        writer
            .write_record([
                c.id.clone(),
                c.component_type.to_string(),
                c.x_position.to_string(),
                c.y_position.to_string(),
                c.width.to_string(),
                c.height.to_string(),
                c.status.to_string(),
            ])
            .map_err(write_error)?;
    }
    let bytes = writer.into_inner().map_err(|e| CsvError::Write(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CsvError::Write(e.to_string()))
}

/// Parse CSV text into a new layout named `name`.
///
/// The first record is the header. Columns are read by position, and a
/// missing or empty status reads as `good`.
pub fn import_csv(name: &str, text: &str) -> CsvResult<LayoutDocument> {
    let mut document = LayoutDocument::new(name);
    let layout_id = document.id();

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut record = StringRecord::new();
    loop {
        let line = reader.position().line() as usize;
        match reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                let line = e.position().map_or(line, |p| p.line() as usize);
                return Err(CsvError::Malformed {
                    line,
                    message: e.to_string(),
                });
            }
        }
        let line = record.position().map_or(line, |p| p.line() as usize);
        document.components.push(parse_record(&record, line, layout_id)?);
    }

    log::info!("Imported {} components into {}", document.components.len(), name);
    Ok(document)
}

fn parse_record(record: &StringRecord, line: usize, layout_id: uuid::Uuid) -> CsvResult<WarehouseComponent> {
    if record.len() < MIN_COLUMNS {
        return Err(CsvError::TooFewColumns {
            line,
            found: record.len(),
        });
    }
    let field = |column: usize| record.get(column).unwrap_or_default();
    if field(0).is_empty() {
        return Err(CsvError::EmptyId { line });
    }

    let number = |column: usize| -> CsvResult<f64> {
        let value = field(column);
        value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| CsvError::InvalidNumber {
                line,
                column: column + 1,
                name: COLUMN_NAMES[column],
                value: value.to_string(),
            })
    };

    let status = match field(6) {
        "" => ComponentStatus::Good,
        s => ComponentStatus::from(s),
    };
    Ok(WarehouseComponent {
        id: field(0).to_string(),
        layout_id,
        component_type: ComponentType::from(field(1)),
        x_position: number(2)?,
        y_position: number(3)?,
        width: number(4)?,
        height: number(5)?,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    #[test]
    fn test_import_basic() {
        let text = "component_id,type,x,y,width,height,status\n\
                    RACK-001, rack ,20,40,200,300,immediate\n\
                    \n\
                    BEAM-001,beam,20,0,160,20\n\
                    X-1,shelf,0,0,10,10,scrapped\n";
        let doc = import_csv("Imported", text).unwrap();

        assert_eq!(doc.layout.name, "Imported");
        assert_eq!(doc.components.len(), 3);
        let rack = &doc.components[0];
        assert_eq!(rack.component_type, ComponentType::Rack);
        assert_eq!(rack.position(), Point::new(20.0, 40.0));
        assert_eq!(rack.status, ComponentStatus::Immediate);
        assert_eq!(rack.layout_id, doc.id());
        assert_eq!(doc.components[1].status, ComponentStatus::Good);
        assert_eq!(doc.components[2].component_type, ComponentType::Other("shelf".to_string()));
        assert_eq!(doc.components[2].status, ComponentStatus::Other("scrapped".to_string()));
    }

    #[test]
    fn test_import_reports_bad_number() {
        let text = "component_id,type,x,y,width,height,status\nR,rack,20,forty,200,300,good\n";
        let err = import_csv("L", text).unwrap_err();
        assert_eq!(
            err,
            CsvError::InvalidNumber {
                line: 2,
                column: 4,
                name: "y",
                value: "forty".to_string(),
            }
        );
    }

    #[test]
    fn test_import_short_row() {
        let text = "header\nR,rack,20\n";
        assert_eq!(import_csv("L", text).unwrap_err(), CsvError::TooFewColumns { line: 2, found: 3 });
    }

    #[test]
    fn test_header_only() {
        assert!(import_csv("L", CSV_HEADER).unwrap().components.is_empty());
        assert!(import_csv("L", "").unwrap().components.is_empty());
    }

    #[test]
    fn test_export_then_import_preserves_order() {
        let mut doc = LayoutDocument::new("L");
        doc.add_component(ComponentType::Upright, Point::new(40.0, 20.0));
        doc.add_component(ComponentType::Rack, Point::new(60.0, 20.0));
        doc.components[1].status = ComponentStatus::Fix4Weeks;

        let text = export_csv(&doc.components).unwrap();
        assert!(text.starts_with(CSV_HEADER));
        assert!(text.contains("RACK-1,rack,60,20,200,300,fix_4_weeks"));

        let back = import_csv("L", &text).unwrap();
        let ids: Vec<_> = back.components.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["UPRIGHT-1", "RACK-1"]);
        assert_eq!(back.components[1].status, ComponentStatus::Fix4Weeks);
    }

    #[test]
    fn test_quoted_id_survives_export_and_import() {
        let mut doc = LayoutDocument::new("L");
        doc.add_component(ComponentType::Rack, Point::new(20.0, 20.0));
        doc.components[0].id = "AISLE 3, BAY 2".to_string();
        doc.add_component(ComponentType::Beam, Point::new(40.0, 0.0));
        doc.components[1].id = "BEAM \"north\"".to_string();

        let text = export_csv(&doc.components).unwrap();
        assert!(text.contains("\"AISLE 3, BAY 2\",rack,20,20,200,300,good"));

        let back = import_csv("L", &text).unwrap();
        assert_eq!(back.components.len(), 2);
        assert_eq!(back.components[0].id, "AISLE 3, BAY 2");
        assert_eq!(back.components[0].position(), Point::new(20.0, 20.0));
        assert_eq!(back.components[1].id, "BEAM \"north\"");
    }

    #[test]
    fn test_error_lines_count_quoted_records() {
        let text = "component_id,type,x,y,width,height,status\n\
                    \"A, 1\",rack,0,0,10,10,good\n\
                    \"B, 2\",rack,0,0,ten,10,good\n";
        assert_eq!(
            import_csv("L", text).unwrap_err(),
            CsvError::InvalidNumber {
                line: 3,
                column: 5,
                name: "width",
                value: "ten".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_id_rejected() {
        let text = "header\n ,rack,0,0,10,10\n";
        assert_eq!(import_csv("L", text).unwrap_err(), CsvError::EmptyId { line: 2 });
    }
}
