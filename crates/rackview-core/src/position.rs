//! Turning a finished drag into an updated component collection.

use crate::component::WarehouseComponent;
use crate::snap::snap_to_grid;
use kurbo::Point;

/// Outcome of a drop.
#[derive(Debug, Clone, PartialEq)]
pub struct DropUpdate {
    /// Grid-aligned position the node was placed at.
    pub position: Point,
    /// Full collection with the moved component substituted.
    pub components: Vec<WarehouseComponent>,
}

/// Snap the raw drop point and build the replacement collection.
///
/// `index` addresses the dragged entry in `components`; only that entry's
/// position changes. An out-of-range index yields the collection unchanged.
pub fn sync_drop(components: &[WarehouseComponent], index: usize, raw: Point, grid_size: f64) -> DropUpdate {
    let position = snap_to_grid(raw, grid_size).point;
    let components = components
        .iter()
        .enumerate()
        .map(|(i, c)| if i == index { c.moved_to(position) } else { c.clone() })
        .collect();
    DropUpdate { position, components }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{ComponentStatus, ComponentType};
    use crate::snap::GRID_SIZE;
    use uuid::Uuid;

    fn components() -> Vec<WarehouseComponent> {
        let layout = Uuid::new_v4();
        let mut a = WarehouseComponent::new("A", layout, ComponentType::Rack, Point::new(103.0, 57.0));
        a.status = ComponentStatus::Monitor;
        let b = WarehouseComponent::new("B", layout, ComponentType::Upright, Point::new(400.0, 20.0));
        vec![a, b]
    }

    #[test]
    fn test_drop_snaps_and_substitutes() {
        let input = components();
        let update = sync_drop(&input, 0, Point::new(114.0, 68.0), GRID_SIZE);

        assert_eq!(update.position, Point::new(120.0, 60.0));
        assert_eq!(update.components.len(), 2);
        assert_eq!(update.components[0].position(), Point::new(120.0, 60.0));
        assert_eq!(update.components[0].status, ComponentStatus::Monitor);
        assert_eq!(update.components[1], input[1]);
        // Input is left untouched.
        assert_eq!(input[0].position(), Point::new(103.0, 57.0));
    }

    #[test]
    fn test_duplicate_ids_only_move_dragged_entry() {
        let mut input = components();
        input[1].id = "A".to_string();
        let update = sync_drop(&input, 1, Point::new(401.0, 31.0), GRID_SIZE);
        assert_eq!(update.components[0], input[0]);
        assert_eq!(update.components[1].position(), Point::new(400.0, 40.0));
    }

    #[test]
    fn test_out_of_range_index() {
        let input = components();
        let update = sync_drop(&input, 9, Point::new(1.0, 1.0), GRID_SIZE);
        assert_eq!(update.components, input);
        assert_eq!(update.position, Point::ZERO);
    }
}
