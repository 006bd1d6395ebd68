//! Visual style of component nodes.
//!
//! Appearance is a pure function of a component's type and status. Unknown
//! values never fail; they resolve to a neutral gray and a generic glyph.

use crate::component::{ComponentStatus, ComponentType};
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`. Anything else yields `None`.
    pub fn from_hex(color: &str) -> Option<Self> {
        let hex = color.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let r = channel(&hex[0..1])? * 17;
                let g = channel(&hex[1..2])? * 17;
                let b = channel(&hex[2..3])? * 17;
                Some(Self::rgb(r, g, b))
            }
            6 => Some(Self::rgb(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
            8 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    /// `#rrggbb` for opaque colors, `#rrggbbaa` otherwise.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Border weight of a node at rest.
pub const BORDER_WIDTH: f64 = 2.0;
/// Border weight while hovered or selected.
pub const HIGHLIGHT_BORDER_WIDTH: f64 = 3.0;

const GREEN_FILL: SerializableColor = SerializableColor::rgb(0xe8, 0xf5, 0xe8);
const GREEN_BORDER: SerializableColor = SerializableColor::rgb(0x28, 0xa7, 0x45);
const AMBER_FILL: SerializableColor = SerializableColor::rgb(0xff, 0xf3, 0xcd);
const AMBER_BORDER: SerializableColor = SerializableColor::rgb(0xff, 0xc1, 0x07);
const RED_FILL: SerializableColor = SerializableColor::rgb(0xf8, 0xd7, 0xda);
const RED_BORDER: SerializableColor = SerializableColor::rgb(0xdc, 0x35, 0x45);

/// Fill used for unrecognized statuses.
pub const FALLBACK_FILL: SerializableColor = SerializableColor::rgb(0xf8, 0xf9, 0xfa);
/// Border used for unrecognized statuses.
pub const FALLBACK_BORDER: SerializableColor = SerializableColor::rgb(0x6c, 0x75, 0x7d);
/// Glyph used for unrecognized component types.
pub const FALLBACK_GLYPH: &str = "■";

/// Resolved appearance of a component node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeStyle {
    pub fill: SerializableColor,
    pub border: SerializableColor,
    /// Type glyph drawn in the top-left corner.
    pub glyph: &'static str,
    /// Status glyph drawn in the top-right corner, if the status has one.
    pub status_glyph: Option<&'static str>,
}

/// Fill color for a status.
pub fn fill_for(status: &ComponentStatus) -> SerializableColor {
    match status {
        ComponentStatus::Good | ComponentStatus::Monitor => GREEN_FILL,
        ComponentStatus::Fix4Weeks => AMBER_FILL,
        ComponentStatus::Immediate => RED_FILL,
        ComponentStatus::Other(_) => FALLBACK_FILL,
    }
}

/// Border color for a status.
pub fn border_for(status: &ComponentStatus) -> SerializableColor {
    match status {
        ComponentStatus::Good | ComponentStatus::Monitor => GREEN_BORDER,
        ComponentStatus::Fix4Weeks => AMBER_BORDER,
        ComponentStatus::Immediate => RED_BORDER,
        ComponentStatus::Other(_) => FALLBACK_BORDER,
    }
}

/// Glyph for a component type.
pub fn glyph_for(component_type: &ComponentType) -> &'static str {
    match component_type {
        ComponentType::Rack => "⬜",
        ComponentType::Beam => "━",
        ComponentType::Upright => "┃",
        ComponentType::Other(_) => FALLBACK_GLYPH,
    }
}

/// Status glyph, absent for unrecognized statuses.
pub fn status_glyph_for(status: &ComponentStatus) -> Option<&'static str> {
    match status {
        ComponentStatus::Good | ComponentStatus::Monitor => Some("✓"),
        ComponentStatus::Fix4Weeks => Some("⚠"),
        ComponentStatus::Immediate => Some("🚨"),
        ComponentStatus::Other(_) => None,
    }
}

/// Resolve the full appearance of a component.
pub fn style_for(component_type: &ComponentType, status: &ComponentStatus) -> NodeStyle {
    NodeStyle {
        fill: fill_for(status),
        border: border_for(status),
        glyph: glyph_for(component_type),
        status_glyph: status_glyph_for(status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_statuses_are_not_fallback() {
        for status in ComponentStatus::KNOWN {
            let style = style_for(&ComponentType::Rack, &status);
            assert_ne!(style.fill, FALLBACK_FILL, "{status}");
            assert_ne!(style.border, FALLBACK_BORDER, "{status}");
            assert!(style.status_glyph.is_some());
        }
    }

    #[test]
    fn test_unknown_status_uses_fallback() {
        let style = style_for(&ComponentType::Beam, &ComponentStatus::from("retired"));
        assert_eq!(style.fill, FALLBACK_FILL);
        assert_eq!(style.border, FALLBACK_BORDER);
        assert_eq!(style.status_glyph, None);
        assert_eq!(style.glyph, "━");
    }

    #[test]
    fn test_unknown_type_uses_generic_glyph() {
        let style = style_for(&ComponentType::from("mezzanine"), &ComponentStatus::Immediate);
        assert_eq!(style.glyph, FALLBACK_GLYPH);
        assert_eq!(style.border, SerializableColor::rgb(0xdc, 0x35, 0x45));
    }

    #[test]
    fn test_good_and_monitor_share_green() {
        assert_eq!(
            style_for(&ComponentType::Rack, &ComponentStatus::Good).border,
            style_for(&ComponentType::Rack, &ComponentStatus::Monitor).border
        );
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(SerializableColor::from_hex("#fff"), Some(SerializableColor::white()));
        assert_eq!(
            SerializableColor::from_hex("#28a745"),
            Some(SerializableColor::rgb(0x28, 0xa7, 0x45))
        );
        assert_eq!(
            SerializableColor::from_hex("#00000080"),
            Some(SerializableColor::new(0, 0, 0, 0x80))
        );
        assert_eq!(SerializableColor::from_hex("red"), None);
        assert_eq!(SerializableColor::from_hex("#12345"), None);
        assert_eq!(SerializableColor::rgb(0x28, 0xa7, 0x45).to_hex(), "#28a745");
    }

    #[test]
    fn test_peniko_conversion() {
        let c = SerializableColor::rgb(0xdc, 0x35, 0x45);
        let color: Color = c.into();
        assert_eq!(SerializableColor::from(color), c);
    }
}
