//! Inspection findings and the component status they imply.

use crate::component::ComponentStatus;
use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Days until an amber finding must be fixed.
pub const AMBER_DUE_DAYS: u64 = 28;

/// Maximum number of entries on the urgent list.
pub const URGENT_LIMIT: usize = 10;

/// Inspection errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InspectionError {
    #[error("Unknown component: {0}")]
    UnknownComponent(String),
    #[error("Custom defect requires a description")]
    MissingDescription,
    #[error("Unknown inspection: {0}")]
    UnknownInspection(Uuid),
    #[error("Inspection {0} is already resolved")]
    AlreadyResolved(Uuid),
}

/// Result type for inspection operations.
pub type InspectionResult<T> = Result<T, InspectionError>;

/// Traffic-light severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Green,
    Amber,
    Red,
}

impl Severity {
    /// Component status a finding of this severity puts the component in.
    pub fn to_status(self) -> ComponentStatus {
        match self {
            Severity::Red => ComponentStatus::Immediate,
            Severity::Amber => ComponentStatus::Fix4Weeks,
            Severity::Green => ComponentStatus::Monitor,
        }
    }

    pub fn is_urgent(self) -> bool {
        matches!(self, Severity::Red | Severity::Amber)
    }

    /// Default fix-by date for a finding of this severity made at `inspected_at`.
    pub fn due_date(self, inspected_at: DateTime<Utc>) -> Option<NaiveDate> {
        if self != Severity::Amber {
            return None;
        }
        inspected_at.date_naive().checked_add_days(Days::new(AMBER_DUE_DAYS))
    }
}

/// Kind of damage found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefectType {
    BentUpright,
    DamagedBeam,
    LooseConnections,
    Corrosion,
    MissingComponents,
    Overloading,
    Custom,
}

/// One recorded finding against a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inspection {
    pub id: Uuid,
    pub component_id: String,
    pub defect_type: DefectType,
    /// Free text for [`DefectType::Custom`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_defect: Option<String>,
    pub severity: Severity,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "Utc::now")]
    pub inspected_at: DateTime<Utc>,
    /// Fix-by date. Amber findings default to [`AMBER_DUE_DAYS`] after the inspection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub resolved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Inspection {
    /// New unresolved finding made now.
    pub fn new(component_id: impl Into<String>, defect_type: DefectType, severity: Severity) -> Self {
        let inspected_at = Utc::now();
        Self {
            id: Uuid::new_v4(),
            component_id: component_id.into(),
            defect_type,
            custom_defect: None,
            severity,
            notes: String::new(),
            inspected_at,
            due_date: severity.due_date(inspected_at),
            resolved: false,
            resolved_at: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_custom_defect(mut self, description: impl Into<String>) -> Self {
        self.custom_defect = Some(description.into());
        self
    }

    /// Backdate the finding. Resets the due date to the severity default.
    pub fn with_inspected_at(mut self, at: DateTime<Utc>) -> Self {
        self.inspected_at = at;
        self.due_date = self.severity.due_date(at);
        self
    }

    pub fn with_due_date(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self
    }

    /// Check the record is complete enough to store.
    pub fn validate(&self) -> InspectionResult<()> {
        let described = self.custom_defect.as_deref().is_some_and(|s| !s.trim().is_empty());
        if self.defect_type == DefectType::Custom && !described {
            return Err(InspectionError::MissingDescription);
        }
        Ok(())
    }

    /// Status the inspected component takes on.
    pub fn resulting_status(&self) -> ComponentStatus {
        self.severity.to_status()
    }

    /// Unresolved red or amber finding.
    pub fn is_urgent(&self) -> bool {
        !self.resolved && self.severity.is_urgent()
    }

    /// Unresolved and past its due date on `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.resolved && self.due_date.is_some_and(|due| today > due)
    }

    /// Mark the finding fixed at `at`.
    pub fn resolve(&mut self, at: DateTime<Utc>) -> InspectionResult<()> {
        if self.resolved {
            return Err(InspectionError::AlreadyResolved(self.id));
        }
        self.resolved = true;
        self.resolved_at = Some(at);
        Ok(())
    }
}

/// Unresolved red and amber findings in recorded order, at most [`URGENT_LIMIT`].
pub fn urgent_inspections(inspections: &[Inspection]) -> Vec<&Inspection> {
    inspections.iter().filter(|i| i.is_urgent()).take(URGENT_LIMIT).collect()
}

/// Findings past their due date on `today`, in recorded order.
pub fn overdue_inspections(inspections: &[Inspection], today: NaiveDate) -> Vec<&Inspection> {
    inspections.iter().filter(|i| i.is_overdue(today)).collect()
}
