//! Result types for frame analysis

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;

use crate::diagram::{self, ElementDiagram};
use crate::error::FrameResult;
use crate::geometry::Point;
use crate::model::SystemElements;

/// Forces and displacements at one node, as seen from one adjacent element
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeResult {
    /// Structural node ID
    pub id: usize,
    /// Force in X direction
    pub fx: f64,
    /// Force in Z direction
    pub fz: f64,
    /// Moment about the Y axis
    pub ty: f64,
    /// Displacement in X direction
    pub ux: f64,
    /// Displacement in Z direction
    pub uz: f64,
    /// Rotation about the Y axis
    pub phi_y: f64,
}

impl NodeResult {
    /// Create a result carrying only the node ID
    pub fn new(id: usize) -> Self {
        Self { id, ..Default::default() }
    }

    /// Build from force `[Fx, Fz, Ty]` and displacement `[ux, uz, phi]` triples
    pub fn from_arrays(id: usize, forces: [f64; 3], displacements: [f64; 3]) -> Self {
        Self {
            id,
            fx: forces[0],
            fz: forces[1],
            ty: forces[2],
            ux: displacements[0],
            uz: displacements[1],
            phi_y: displacements[2],
        }
    }
}

/// Component-wise difference, keeping the ID of the left operand
impl Sub for NodeResult {
    type Output = NodeResult;

    fn sub(self, other: NodeResult) -> NodeResult {
        NodeResult {
            id: self.id,
            fx: self.fx - other.fx,
            fz: self.fz - other.fz,
            ty: self.ty - other.ty,
            ux: self.ux - other.ux,
            uz: self.uz - other.uz,
            phi_y: self.phi_y - other.phi_y,
        }
    }
}

impl fmt::Display for NodeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID = {}, Fx = {:.6e}, Fz = {:.6e}, Ty = {:.6e}, ux = {:.6e}, uz = {:.6e}, phi_y = {:.6e}",
            self.id, self.fx, self.fz, self.ty, self.ux, self.uz, self.phi_y
        )
    }
}

/// Reaction forces at a supported node
///
/// Components belonging to unconstrained degrees of freedom are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    /// Structural node ID
    pub node: usize,
    /// Reaction force in X direction
    pub fx: f64,
    /// Reaction force in Z direction
    pub fz: f64,
    /// Reaction moment about the Y axis
    pub ty: f64,
}

/// Summary of analysis results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Maximum translation magnitude
    pub max_displacement: f64,
    /// Node with maximum translation
    pub max_disp_node: usize,
    /// Maximum absolute end moment
    pub max_moment: f64,
    /// Element with maximum end moment
    pub max_moment_element: usize,
    /// Maximum absolute normal force
    pub max_normal_force: f64,
    /// Element with maximum normal force
    pub max_normal_force_element: usize,
    /// Total number of nodes
    pub num_nodes: usize,
    /// Total number of elements
    pub num_elements: usize,
    /// Total DOFs
    pub total_dofs: usize,
    /// Free DOFs (unknown before the solve)
    pub free_dofs: usize,
}

/// Displacements of one structural node
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NodeDisplacement {
    pub node: usize,
    pub x: f64,
    pub z: f64,
    pub ux: f64,
    pub uz: f64,
    pub phi_y: f64,
}

/// End results and internal forces of one element
#[derive(Debug, Clone, Serialize)]
pub struct ElementForces {
    pub element: usize,
    pub node_1: NodeResult,
    pub node_2: NodeResult,
    pub normal_force: f64,
    pub midspan_moment: f64,
}

/// Complete results of a solved system
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub displacements: Vec<NodeDisplacement>,
    pub reactions: Vec<Reaction>,
    pub elements: Vec<ElementForces>,
    pub summary: AnalysisSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagrams: Option<Vec<ElementDiagram>>,
}

impl AnalysisReport {
    /// Collect the results of a solved system
    ///
    /// `diagram_samples` adds plot-space diagram data with that many interior
    /// samples per moment curve.
    pub fn from_system(system: &SystemElements, diagram_samples: Option<usize>) -> FrameResult<Self> {
        let displacements = (1..=system.node_count())
            .map(|node| -> FrameResult<NodeDisplacement> {
                let Point { x, z } = system.node_position(node)?;
                let [ux, uz, phi_y] = system.node_displacement(node)?;
                Ok(NodeDisplacement { node, x, z, ux, uz, phi_y })
            })
            .collect::<FrameResult<Vec<_>>>()?;

        let elements = system
            .elements()
            .iter()
            .filter_map(|element| {
                Some(ElementForces {
                    element: element.id,
                    node_1: *element.node_1()?,
                    node_2: *element.node_2()?,
                    normal_force: element.normal_force()?,
                    midspan_moment: element.midspan_moment()?,
                })
            })
            .collect();

        Ok(Self {
            displacements,
            reactions: system.reactions()?,
            elements,
            summary: system.summary()?,
            diagrams: diagram_samples.map(|samples| diagram::diagrams(system.elements(), samples)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_result_difference() {
        let a = NodeResult::from_arrays(3, [10.0, 5.0, 2.0], [0.1, 0.2, 0.3]);
        let b = NodeResult::from_arrays(4, [4.0, 5.0, -2.0], [0.1, 0.0, 0.1]);
        let d = a - b;

        assert_eq!(d.id, 3);
        assert_eq!(d.fx, 6.0);
        assert_eq!(d.fz, 0.0);
        assert_eq!(d.ty, 4.0);
        assert!((d.uz - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_node_result_display() {
        let text = NodeResult::new(2).to_string();
        assert!(text.starts_with("ID = 2"));
        assert!(text.contains("phi_y"));
    }
}
