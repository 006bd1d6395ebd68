//! Warehouse components: the physical racking elements placed on a layout.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Kind of racking element.
///
/// The known kinds cover every element the inspection workflow handles.
/// Strings outside that set are kept verbatim in [`ComponentType::Other`] so
/// that imported data survives a round trip and renders with a fallback glyph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentType {
    Rack,
    Beam,
    Upright,
    /// Unrecognized type string.
    Other(String),
}

impl ComponentType {
    /// All known component types.
    pub const KNOWN: [ComponentType; 3] = [ComponentType::Rack, ComponentType::Beam, ComponentType::Upright];

    /// Wire name of this type.
    pub fn as_str(&self) -> &str {
        match self {
            ComponentType::Rack => "rack",
            ComponentType::Beam => "beam",
            ComponentType::Upright => "upright",
            ComponentType::Other(s) => s,
        }
    }

    /// Typical footprint for a freshly added component of this type.
    pub fn default_size(&self) -> Size {
        match self {
            ComponentType::Rack => Size::new(200.0, 300.0),
            ComponentType::Beam => Size::new(160.0, 20.0),
            ComponentType::Upright => Size::new(20.0, 300.0),
            ComponentType::Other(_) => Size::new(80.0, 60.0),
        }
    }

    /// Prefix used when generating component ids (`RACK-1`, `BEAM-2`, ...).
    pub fn id_prefix(&self) -> String {
        self.as_str().to_uppercase()
    }
}

impl From<String> for ComponentType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "rack" => ComponentType::Rack,
            "beam" => ComponentType::Beam,
            "upright" => ComponentType::Upright,
            _ => ComponentType::Other(s),
        }
    }
}

impl From<&str> for ComponentType {
    fn from(s: &str) -> Self {
        ComponentType::from(s.to_string())
    }
}

impl From<ComponentType> for String {
    fn from(t: ComponentType) -> Self {
        match t {
            ComponentType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display status of a component, derived from its latest inspection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentStatus {
    #[default]
    Good,
    Monitor,
    Fix4Weeks,
    Immediate,
    /// Unrecognized status string.
    Other(String),
}

impl ComponentStatus {
    /// All known statuses, least to most urgent.
    pub const KNOWN: [ComponentStatus; 4] = [
        ComponentStatus::Good,
        ComponentStatus::Monitor,
        ComponentStatus::Fix4Weeks,
        ComponentStatus::Immediate,
    ];

    /// Wire name of this status.
    pub fn as_str(&self) -> &str {
        match self {
            ComponentStatus::Good => "good",
            ComponentStatus::Monitor => "monitor",
            ComponentStatus::Fix4Weeks => "fix_4_weeks",
            ComponentStatus::Immediate => "immediate",
            ComponentStatus::Other(s) => s,
        }
    }

    /// Whether the status calls for repair work.
    pub fn is_urgent(&self) -> bool {
        matches!(self, ComponentStatus::Fix4Weeks | ComponentStatus::Immediate)
    }
}

impl From<String> for ComponentStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "good" => ComponentStatus::Good,
            "monitor" => ComponentStatus::Monitor,
            "fix_4_weeks" => ComponentStatus::Fix4Weeks,
            "immediate" => ComponentStatus::Immediate,
            _ => ComponentStatus::Other(s),
        }
    }
}

impl From<&str> for ComponentStatus {
    fn from(s: &str) -> Self {
        ComponentStatus::from(s.to_string())
    }
}

impl From<ComponentStatus> for String {
    fn from(s: ComponentStatus) -> Self {
        match s {
            ComponentStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A placed racking element.
///
/// `id` is user-assigned (e.g. `RACK-001`) and doubles as the canvas node key.
/// Positions are canvas-space coordinates of the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseComponent {
    pub id: String,
    pub layout_id: Uuid,
    pub component_type: ComponentType,
    pub x_position: f64,
    pub y_position: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub status: ComponentStatus,
}

impl WarehouseComponent {
    /// Create a component with the type's default footprint and `good` status.
    pub fn new(id: impl Into<String>, layout_id: Uuid, component_type: ComponentType, position: Point) -> Self {
        let size = component_type.default_size();
        Self {
            id: id.into(),
            layout_id,
            component_type,
            x_position: position.x,
            y_position: position.y,
            width: size.width,
            height: size.height,
            status: ComponentStatus::Good,
        }
    }

    /// Top-left corner.
    pub fn position(&self) -> Point {
        Point::new(self.x_position, self.y_position)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Bounding box in canvas space.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position(), self.size())
    }

    /// Copy of this component moved to `position`; every other field is kept.
    pub fn moved_to(&self, position: Point) -> Self {
        Self {
            x_position: position.x,
            y_position: position.y,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_names() {
        for status in ComponentStatus::KNOWN {
            assert_eq!(ComponentStatus::from(status.as_str()), status);
        }
        assert_eq!(
            ComponentStatus::from("condemned"),
            ComponentStatus::Other("condemned".to_string())
        );
    }

    #[test]
    fn test_type_falls_back_to_other() {
        assert_eq!(ComponentType::from("beam"), ComponentType::Beam);
        assert_eq!(ComponentType::from("shelf"), ComponentType::Other("shelf".to_string()));
        assert_eq!(ComponentType::from("shelf").as_str(), "shelf");
    }

    #[test]
    fn test_component_json_uses_camel_case() {
        let layout = Uuid::new_v4();
        let c = WarehouseComponent::new("RACK-001", layout, ComponentType::Rack, Point::new(40.0, 60.0));
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["componentType"], "rack");
        assert_eq!(json["xPosition"], 40.0);
        assert_eq!(json["status"], "good");

        let back: WarehouseComponent = serde_json::from_value(json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_unknown_status_deserializes() {
        let json = format!(
            r#"{{"id":"A","layoutId":"{}","componentType":"rack","xPosition":0,"yPosition":0,"width":10,"height":10,"status":"weird"}}"#,
            Uuid::nil()
        );
        let c: WarehouseComponent = serde_json::from_str(&json).unwrap();
        assert_eq!(c.status, ComponentStatus::Other("weird".to_string()));
    }

    #[test]
    fn test_default_sizes() {
        assert_eq!(ComponentType::Rack.default_size(), Size::new(200.0, 300.0));
        assert_eq!(ComponentType::Beam.default_size(), Size::new(160.0, 20.0));
        assert_eq!(ComponentType::Upright.default_size(), Size::new(20.0, 300.0));
    }

    #[test]
    fn test_moved_to_keeps_other_fields() {
        let mut c = WarehouseComponent::new("B-1", Uuid::nil(), ComponentType::Beam, Point::new(3.0, 4.0));
        c.status = ComponentStatus::Immediate;
        let moved = c.moved_to(Point::new(120.0, 60.0));
        assert_eq!(moved.position(), Point::new(120.0, 60.0));
        assert_eq!(moved.status, ComponentStatus::Immediate);
        assert_eq!(moved.size(), c.size());
        assert_eq!(moved.id, c.id);
    }
}
