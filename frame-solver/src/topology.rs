//! Node numbering and degree of freedom bookkeeping
//!
//! Structural nodes are discovered from element endpoints: two endpoints with
//! exactly equal coordinates share one node. IDs start at 1 and are handed out
//! in order of first appearance, so the first registered point always keeps
//! its ID.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{FrameError, FrameResult};
use crate::geometry::Point;

/// Degrees of freedom per structural node
pub const DOF_PER_NODE: usize = 3;

/// Nodal degree of freedom direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Translation along X
    X = 1,
    /// Translation along Z
    Z = 2,
    /// Rotation about Y
    Rotation = 3,
}

impl Direction {
    /// All directions in DOF order
    pub const ALL: [Direction; 3] = [Direction::X, Direction::Z, Direction::Rotation];

    /// Zero-based offset inside a node's DOF triple
    pub fn offset(self) -> usize {
        self as usize - 1
    }
}

impl TryFrom<usize> for Direction {
    type Error = FrameError;

    fn try_from(value: usize) -> FrameResult<Self> {
        match value {
            1 => Ok(Direction::X),
            2 => Ok(Direction::Z),
            3 => Ok(Direction::Rotation),
            other => Err(FrameError::InvalidDirection(other)),
        }
    }
}

/// Zero-based global index of a node's degree of freedom
pub fn dof_index(node: usize, direction: Direction) -> usize {
    (node - 1) * DOF_PER_NODE + direction.offset()
}

/// Global indices of an element's six local degrees of freedom
pub fn element_dofs(node_1: usize, node_2: usize) -> [usize; 6] {
    let i = dof_index(node_1, Direction::X);
    let j = dof_index(node_2, Direction::X);
    [i, i + 1, i + 2, j, j + 1, j + 2]
}

/// Exact coordinate key; `-0.0` and `0.0` map to the same key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CoordinateKey(u64, u64);

impl From<Point> for CoordinateKey {
    fn from(point: Point) -> Self {
        let fold = |v: f64| if v == 0.0 { 0.0_f64.to_bits() } else { v.to_bits() };
        CoordinateKey(fold(point.x), fold(point.z))
    }
}

/// Registry of structural nodes keyed on endpoint coordinates
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    ids: HashMap<CoordinateKey, usize>,
    positions: Vec<Point>,
}

impl NodeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the node at `point`, minting a new ID if none exists
    pub fn resolve(&mut self, point: Point) -> usize {
        let next_id = self.positions.len() + 1;
        let id = *self.ids.entry(CoordinateKey::from(point)).or_insert(next_id);
        if id == next_id {
            self.positions.push(point);
        }
        id
    }

    /// Find the node at `point` without registering it
    pub fn find(&self, point: &Point) -> Option<usize> {
        self.ids.get(&CoordinateKey::from(*point)).copied()
    }

    /// Position of a node
    pub fn position(&self, id: usize) -> Option<Point> {
        id.checked_sub(1).and_then(|i| self.positions.get(i)).copied()
    }

    /// Check if a node ID exists
    pub fn contains(&self, id: usize) -> bool {
        id >= 1 && id <= self.positions.len()
    }

    /// Number of distinct nodes
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Check if no node has been registered
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterate over `(id, position)` pairs in ID order
    pub fn iter(&self) -> impl Iterator<Item = (usize, Point)> + '_ {
        self.positions.iter().enumerate().map(|(i, p)| (i + 1, *p))
    }
}

/// Destination of one local stiffness cell in the global matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellLocation {
    /// Row in the element matrix
    pub local_row: usize,
    /// Column in the element matrix
    pub local_col: usize,
    /// Row in the global matrix
    pub global_row: usize,
    /// Column in the global matrix
    pub global_col: usize,
}

/// Schedule all 36 cells of an element matrix into global coordinates
pub fn schedule_cells(node_1: usize, node_2: usize) -> Vec<CellLocation> {
    let dofs = element_dofs(node_1, node_2);
    let mut cells = Vec::with_capacity(36);
    for (local_row, &global_row) in dofs.iter().enumerate() {
        for (local_col, &global_col) in dofs.iter().enumerate() {
            cells.push(CellLocation {
                local_row,
                local_col,
                global_row,
                global_col,
            });
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dof_index() {
        assert_eq!(dof_index(1, Direction::X), 0);
        assert_eq!(dof_index(1, Direction::Rotation), 2);
        assert_eq!(dof_index(3, Direction::Z), 7);
    }

    #[test]
    fn test_direction_conversion() {
        assert_eq!(Direction::try_from(2).unwrap(), Direction::Z);
        assert!(matches!(Direction::try_from(0), Err(FrameError::InvalidDirection(0))));
        assert!(matches!(Direction::try_from(4), Err(FrameError::InvalidDirection(4))));
    }

    #[test]
    fn test_registry_merges_equal_points() {
        let mut nodes = NodeRegistry::new();
        assert_eq!(nodes.resolve(Point::new(0.0, 0.0)), 1);
        assert_eq!(nodes.resolve(Point::new(5.0, 0.0)), 2);
        assert_eq!(nodes.resolve(Point::new(5.0, 0.0)), 2);
        assert_eq!(nodes.resolve(Point::new(-0.0, 0.0)), 1);
        assert_eq!(nodes.resolve(Point::new(5.0, -3.0)), 3);
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes.find(&Point::new(5.0, -3.0)), Some(3));
        assert_eq!(nodes.find(&Point::new(5.0, -3.0000001)), None);
        assert_eq!(nodes.position(2), Some(Point::new(5.0, 0.0)));
        assert_eq!(nodes.position(0), None);
    }

    #[test]
    fn test_cell_schedule_splits_node_blocks() {
        let cells = schedule_cells(1, 3);
        assert_eq!(cells.len(), 36);

        // Local (0, 3) couples node 1 X with node 3 X
        let cell = cells[3];
        assert_eq!((cell.local_row, cell.local_col), (0, 3));
        assert_eq!((cell.global_row, cell.global_col), (0, 6));

        let last = cells[35];
        assert_eq!((last.global_row, last.global_col), (8, 8));
    }
}
