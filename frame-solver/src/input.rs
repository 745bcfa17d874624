//! Serializable model description
//!
//! A [`FrameInput`] lists elements, supports and loads, and converts into a
//! [`SystemElements`]. Nodes are referenced either by ID or by coordinates.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisOptions;
use crate::elements::Support;
use crate::error::{FrameError, FrameResult};
use crate::geometry::Point;
use crate::loads::{DistributedLoad, NodeLoad};
use crate::model::SystemElements;

/// Reference to a structural node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeRef {
    /// Node ID as assigned while adding elements
    Id(usize),
    /// Node at exactly these coordinates
    At(Point),
}

impl NodeRef {
    fn resolve(&self, system: &SystemElements) -> FrameResult<usize> {
        match self {
            NodeRef::Id(id) => Ok(*id),
            NodeRef::At(point) => system.node_id_at(*point).ok_or_else(|| {
                FrameError::InvalidInput(format!("no node at ({}, {})", point.x, point.z))
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementInput {
    pub start: Point,
    pub end: Point,
    pub ea: f64,
    pub ei: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportInput {
    pub node: NodeRef,
    #[serde(flatten)]
    pub support: Support,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeLoadInput {
    pub node: NodeRef,
    #[serde(flatten)]
    pub load: NodeLoad,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QLoadInput {
    pub element: usize,
    #[serde(flatten)]
    pub load: DistributedLoad,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrescribedInput {
    pub node: NodeRef,
    /// 1 (x), 2 (z) or 3 (rotation)
    pub direction: usize,
    pub value: f64,
}

/// Complete frame model
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameInput {
    pub elements: Vec<ElementInput>,
    #[serde(default)]
    pub supports: Vec<SupportInput>,
    #[serde(default)]
    pub node_loads: Vec<NodeLoadInput>,
    #[serde(default)]
    pub q_loads: Vec<QLoadInput>,
    #[serde(default)]
    pub prescribed: Vec<PrescribedInput>,
    #[serde(default)]
    pub options: AnalysisOptions,
}

impl FrameInput {
    /// Parse a model from JSON
    pub fn from_json(text: &str) -> FrameResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Build the system with all elements, conditions and loads registered
    pub fn build(&self) -> FrameResult<SystemElements> {
        if self.elements.is_empty() {
            return Err(FrameError::InvalidInput("model has no elements".to_string()));
        }

        let mut system = SystemElements::with_options(self.options.clone());
        for element in &self.elements {
            system.add_element(element.start, element.end, element.ea, element.ei)?;
        }
        for entry in &self.supports {
            let node = entry.node.resolve(&system)?;
            system.add_support(node, entry.support)?;
        }
        for entry in &self.prescribed {
            let node = entry.node.resolve(&system)?;
            system.set_prescribed_displacement(node, entry.direction, entry.value)?;
        }
        for entry in &self.node_loads {
            let node = entry.node.resolve(&system)?;
            system.node_load(node, entry.load)?;
        }
        for entry in &self.q_loads {
            system.q_load(entry.element, entry.load.q, entry.load.sense)?;
        }

        debug!(
            "Built model with {} elements and {} nodes",
            system.elements().len(),
            system.node_count()
        );
        Ok(system)
    }

    /// Build and solve the system
    pub fn analyze(&self) -> FrameResult<SystemElements> {
        let mut system = self.build()?;
        if !system.assemble_system_matrix() {
            return Err(FrameError::AsymmetricAssembly);
        }
        system.process_conditions()?;
        system.solve()?;
        Ok(system)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const CANTILEVER: &str = r#"{
        "elements": [{ "start": { "x": 0.0, "z": 0.0 }, "end": { "x": 2.0, "z": 0.0 }, "ea": 1e6, "ei": 500.0 }],
        "supports": [{ "node": 1, "kind": "fixed" }],
        "node_loads": [{ "node": { "x": 2.0, "z": 0.0 }, "fz": 10.0 }],
        "options": { "log_node_results": false }
    }"#;

    #[test]
    fn test_parse_and_analyze() {
        let input = FrameInput::from_json(CANTILEVER).unwrap();
        assert!(matches!(input.supports[0].support, Support::Fixed));
        assert!(!input.options.log_node_results);

        let system = input.analyze().unwrap();
        let [_, uz, _] = system.node_displacement(2).unwrap();
        assert_relative_eq!(uz, 10.0 * 8.0 / (3.0 * 500.0), epsilon = 1e-9);
    }

    #[test]
    fn test_unknown_coordinates_rejected() {
        let mut input = FrameInput::from_json(CANTILEVER).unwrap();
        input.node_loads[0].node = NodeRef::At(Point::new(3.0, 0.0));
        assert!(matches!(input.build(), Err(FrameError::InvalidInput(_))));
    }

    #[test]
    fn test_empty_model_rejected() {
        assert!(matches!(FrameInput::default().build(), Err(FrameError::InvalidInput(_))));
        assert!(matches!(FrameInput::from_json("{"), Err(FrameError::Serialization(_))));
    }
}
