//! Warehouse layouts: the persisted document behind a canvas.

use crate::component::{ComponentStatus, ComponentType, WarehouseComponent};
use crate::inspection::{
    Inspection, InspectionError, InspectionResult, Severity, overdue_inspections, urgent_inspections,
};
use chrono::{DateTime, NaiveDate, Utc};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Layout metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseLayout {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "active_default")]
    pub is_active: bool,
}

fn active_default() -> bool {
    true
}

impl WarehouseLayout {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            is_active: true,
        }
    }
}

/// Component counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub total: usize,
    pub immediate: usize,
    pub fix_4_weeks: usize,
    /// Components in `good` or `monitor` status.
    pub monitor_only: usize,
    /// Unresolved red findings.
    pub urgent_red: usize,
    /// Unresolved amber findings.
    pub urgent_amber: usize,
    /// Unresolved findings past their due date.
    pub overdue: usize,
}

/// A layout with its components and inspection history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDocument {
    pub layout: WarehouseLayout,
    /// Components in render order.
    #[serde(default)]
    pub components: Vec<WarehouseComponent>,
    /// Findings in recorded order.
    #[serde(default)]
    pub inspections: Vec<Inspection>,
}

impl LayoutDocument {
    /// Create an empty layout.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_layout(WarehouseLayout::new(name))
    }

    pub fn with_layout(layout: WarehouseLayout) -> Self {
        Self {
            layout,
            components: Vec::new(),
            inspections: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.layout.id
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Last component with `id`.
    pub fn component(&self, id: &str) -> Option<&WarehouseComponent> {
        self.components.iter().rev().find(|c| c.id == id)
    }

    /// Replace the whole component collection, e.g. after a canvas drop.
    ///
    /// Every component is re-homed onto this layout.
    pub fn upsert_components(&mut self, components: Vec<WarehouseComponent>) {
        let layout_id = self.layout.id;
        self.components = components
            .into_iter()
            .map(|mut c| {
                c.layout_id = layout_id;
                c
            })
            .collect();
        log::debug!("Stored {} components on layout {}", self.components.len(), layout_id);
    }

    /// Add a component of `component_type` at `position` with the type's
    /// default size. The id is `<TYPE>-<n>` with the smallest free `n`.
    pub fn add_component(&mut self, component_type: ComponentType, position: Point) -> &WarehouseComponent {
        let prefix = component_type.id_prefix();
        let id = (1..)
            .map(|n| format!("{prefix}-{n}"))
            .find(|id| self.component(id).is_none())
            .unwrap_or_else(|| format!("{prefix}-{}", Uuid::new_v4()));
        let index = self.components.len();
        self.components
            .push(WarehouseComponent::new(id, self.layout.id, component_type, position));
        &self.components[index]
    }

    /// Remove every component with `id`. Returns how many were removed.
    pub fn remove_component(&mut self, id: &str) -> usize {
        let before = self.components.len();
        self.components.retain(|c| c.id != id);
        before - self.components.len()
    }

    /// Store a finding and move the inspected component to the status its
    /// severity implies.
    pub fn record_inspection(&mut self, inspection: Inspection) -> InspectionResult<&WarehouseComponent> {
        inspection.validate()?;
        let status = inspection.resulting_status();
        let Some(index) = self.components.iter().rposition(|c| c.id == inspection.component_id) else {
            return Err(InspectionError::UnknownComponent(inspection.component_id));
        };
        self.components[index].status = status;
        log::info!(
            "Recorded {:?} finding on {}",
            inspection.severity,
            inspection.component_id
        );
        self.inspections.push(inspection);
        Ok(&self.components[index])
    }

    /// Unresolved red and amber findings for the dashboard.
    pub fn urgent_inspections(&self) -> Vec<&Inspection> {
        urgent_inspections(&self.inspections)
    }

    /// Mark the finding `id` resolved at `at`. The component keeps its status.
    pub fn resolve_inspection(&mut self, id: Uuid, at: DateTime<Utc>) -> InspectionResult<&Inspection> {
        let index = self
            .inspections
            .iter()
            .position(|i| i.id == id)
            .ok_or(InspectionError::UnknownInspection(id))?;
        self.inspections[index].resolve(at)?;
        log::info!("Resolved finding {} on {}", id, self.inspections[index].component_id);
        Ok(&self.inspections[index])
    }

    /// Findings past their due date on `today`.
    pub fn overdue_inspections(&self, today: NaiveDate) -> Vec<&Inspection> {
        overdue_inspections(&self.inspections, today)
    }

    /// Dashboard counts as of today.
    pub fn summary(&self) -> StatusSummary {
        self.summary_on(Utc::now().date_naive())
    }

    /// Dashboard counts, with overdue findings judged on `today`.
    pub fn summary_on(&self, today: NaiveDate) -> StatusSummary {
        let mut summary = StatusSummary {
            total: self.components.len(),
            overdue: self.overdue_inspections(today).len(),
            ..StatusSummary::default()
        };
        for component in &self.components {
            match component.status {
                ComponentStatus::Immediate => summary.immediate += 1,
                ComponentStatus::Fix4Weeks => summary.fix_4_weeks += 1,
                ComponentStatus::Good | ComponentStatus::Monitor => summary.monitor_only += 1,
                ComponentStatus::Other(_) => {}
            }
        }
        for inspection in self.inspections.iter().filter(|i| i.is_urgent()) {
            match inspection.severity {
                Severity::Red => summary.urgent_red += 1,
                Severity::Amber => summary.urgent_amber += 1,
                Severity::Green => {}
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspection::DefectType;
    use chrono::TimeZone;

    #[test]
    fn test_add_component_defaults() {
        let mut doc = LayoutDocument::new("Aisle 3");
        let rack = doc.add_component(ComponentType::Rack, Point::new(20.0, 40.0)).clone();
        assert_eq!(rack.id, "RACK-1");
        assert_eq!((rack.width, rack.height), (200.0, 300.0));
        assert_eq!(rack.status, ComponentStatus::Good);
        assert_eq!(rack.layout_id, doc.id());

        let beam = doc.add_component(ComponentType::Beam, Point::ZERO).clone();
        assert_eq!(beam.id, "BEAM-1");
        assert_eq!((beam.width, beam.height), (160.0, 20.0));
        assert_eq!(doc.add_component(ComponentType::Rack, Point::ZERO).id, "RACK-2");

        let upright = doc.add_component(ComponentType::Upright, Point::ZERO);
        assert_eq!((upright.width, upright.height), (20.0, 300.0));
    }

    #[test]
    fn test_remove_frees_id() {
        let mut doc = LayoutDocument::new("A");
        doc.add_component(ComponentType::Beam, Point::ZERO);
        doc.add_component(ComponentType::Beam, Point::ZERO);
        assert_eq!(doc.remove_component("BEAM-1"), 1);
        assert_eq!(doc.remove_component("BEAM-1"), 0);
        assert_eq!(doc.add_component(ComponentType::Beam, Point::ZERO).id, "BEAM-1");
    }

    #[test]
    fn test_upsert_rehomes_components() {
        let mut doc = LayoutDocument::new("A");
        let stray = WarehouseComponent::new("R", Uuid::new_v4(), ComponentType::Rack, Point::new(120.0, 60.0));
        doc.upsert_components(vec![stray]);
        assert_eq!(doc.components.len(), 1);
        assert_eq!(doc.components[0].layout_id, doc.id());
        assert_eq!(doc.components[0].position(), Point::new(120.0, 60.0));
    }

    #[test]
    fn test_record_inspection_updates_status() {
        let mut doc = LayoutDocument::new("A");
        doc.add_component(ComponentType::Upright, Point::ZERO);

        let updated = doc
            .record_inspection(Inspection::new("UPRIGHT-1", DefectType::BentUpright, Severity::Red))
            .unwrap();
        assert_eq!(updated.status, ComponentStatus::Immediate);
        assert_eq!(doc.inspections.len(), 1);

        let missing = doc.record_inspection(Inspection::new("NOPE", DefectType::Corrosion, Severity::Green));
        assert_eq!(missing.unwrap_err(), InspectionError::UnknownComponent("NOPE".to_string()));
        assert_eq!(doc.inspections.len(), 1);
    }

    #[test]
    fn test_summary_counts() {
        let mut doc = LayoutDocument::new("A");
        for _ in 0..5 {
            doc.add_component(ComponentType::Rack, Point::ZERO);
        }
        doc.components[4].status = ComponentStatus::from("scrapped");
        doc.record_inspection(Inspection::new("RACK-1", DefectType::Overloading, Severity::Red))
            .unwrap();
        doc.record_inspection(Inspection::new("RACK-2", DefectType::DamagedBeam, Severity::Amber))
            .unwrap();
        doc.record_inspection(Inspection::new("RACK-3", DefectType::Corrosion, Severity::Green))
            .unwrap();

        let summary = doc.summary();
        assert_eq!(summary.total, 5);
        assert_eq!(summary.immediate, 1);
        assert_eq!(summary.fix_4_weeks, 1);
        assert_eq!(summary.monitor_only, 2);
        assert_eq!(summary.urgent_red, 1);
        assert_eq!(summary.urgent_amber, 1);
        assert_eq!(doc.urgent_inspections().len(), 2);
    }

    #[test]
    fn test_json_round_trip() {
        let mut doc = LayoutDocument::new("Main hall");
        doc.layout.description = "Ground floor".to_string();
        doc.add_component(ComponentType::Rack, Point::new(20.0, 20.0));

        let json = doc.to_json().unwrap();
        assert!(json.contains("\"xPosition\""));
        assert_eq!(LayoutDocument::from_json(&json).unwrap(), doc);
    }

    #[test]
    fn test_resolve_clears_urgent_and_overdue() {
        let inspected = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 4, 15).unwrap();
        let mut doc = LayoutDocument::new("A");
        doc.add_component(ComponentType::Beam, Point::ZERO);
        let finding = Inspection::new("BEAM-1", DefectType::DamagedBeam, Severity::Amber).with_inspected_at(inspected);
        let id = finding.id;
        doc.record_inspection(finding).unwrap();

        let before = doc.summary_on(today);
        assert_eq!((before.urgent_amber, before.overdue), (1, 1));
        assert_eq!(doc.overdue_inspections(today).len(), 1);

        let fixed_at = Utc.with_ymd_and_hms(2024, 4, 16, 10, 0, 0).unwrap();
        let resolved = doc.resolve_inspection(id, fixed_at).unwrap();
        assert!(resolved.resolved);
        assert_eq!(resolved.resolved_at, Some(fixed_at));

        let after = doc.summary_on(today);
        assert_eq!((after.urgent_amber, after.overdue), (0, 0));
        assert!(doc.urgent_inspections().is_empty());
        assert_eq!(doc.component("BEAM-1").unwrap().status, ComponentStatus::Fix4Weeks);

        assert_eq!(
            doc.resolve_inspection(id, fixed_at).unwrap_err(),
            InspectionError::AlreadyResolved(id)
        );
        let stray = Uuid::new_v4();
        assert_eq!(
            doc.resolve_inspection(stray, fixed_at).unwrap_err(),
            InspectionError::UnknownInspection(stray)
        );
    }
}
