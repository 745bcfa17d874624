//! Node loads - forces and moments applied directly to nodes

use serde::{Deserialize, Serialize};

/// A load applied directly to a structural node
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeLoad {
    /// Force in X direction
    #[serde(default)]
    pub fx: f64,
    /// Force in Z direction (positive downward)
    #[serde(default)]
    pub fz: f64,
    /// Moment about the Y axis
    #[serde(default)]
    pub ty: f64,
}

impl NodeLoad {
    /// Create a new node load with all components
    pub fn new(fx: f64, fz: f64, ty: f64) -> Self {
        Self { fx, fz, ty }
    }

    /// Create a force-only node load
    pub fn force(fx: f64, fz: f64) -> Self {
        Self::new(fx, fz, 0.0)
    }

    /// Create a moment-only node load
    pub fn moment(ty: f64) -> Self {
        Self::new(0.0, 0.0, ty)
    }

    /// Get the load as an array [FX, FZ, TY]
    pub fn as_array(&self) -> [f64; 3] {
        [self.fx, self.fz, self.ty]
    }

    /// Scale the load by a factor
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.fx * factor, self.fz * factor, self.ty * factor)
    }

    /// Entries for `set_force_vector`, skipping zero components
    pub fn entries(&self, node: usize) -> Vec<(usize, usize, f64)> {
        self.as_array()
            .iter()
            .enumerate()
            .filter(|(_, value)| **value != 0.0)
            .map(|(i, value)| (node, i + 1, *value))
            .collect()
    }
}
