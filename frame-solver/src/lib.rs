//! Frame Solver - linear static analysis of plane frames
//!
//! Slender Euler-Bernoulli beam elements are assembled with the direct
//! stiffness method:
//! - Node discovery from coincident element endpoints
//! - Point loads, uniformly distributed loads and prescribed displacements
//! - Hinged, roller and fixed supports
//! - Static condensation of the known degrees of freedom
//! - Recovery of end forces, normal forces and bending moments
//!
//! Coordinates are `(x, z)` with `z` pointing down.
//!
//! ## Example
//! ```rust
//! use frame_solver::prelude::*;
//!
//! let mut system = SystemElements::new();
//!
//! // 10 m cantilever along x
//! system.add_element((0.0, 0.0), (10.0, 0.0), 5.0e6, 8.0e4).unwrap();
//!
//! // Clamp node 1, push node 2 down
//! system.add_support_fixed(1).unwrap();
//! system.point_load(0.0, 100.0, 2).unwrap();
//!
//! // Analyze
//! assert!(system.assemble_system_matrix());
//! system.process_conditions().unwrap();
//! system.solve().unwrap();
//!
//! // Get results
//! let [_, uz, _] = system.node_displacement(2).unwrap();
//! assert!((uz - 100.0 * 1000.0 / (3.0 * 8.0e4)).abs() < 1e-9);
//! ```

pub mod analysis;
pub mod diagram;
pub mod elements;
pub mod error;
pub mod geometry;
pub mod input;
pub mod loads;
pub mod math;
pub mod model;
pub mod results;
pub mod topology;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{AnalysisOptions, LinearSolver};
    pub use crate::elements::{Element, Orientation, Support};
    pub use crate::error::{FrameError, FrameResult};
    pub use crate::geometry::Point;
    pub use crate::input::FrameInput;
    pub use crate::loads::{DistributedLoad, LoadSense, NodeLoad};
    pub use crate::model::SystemElements;
    pub use crate::results::{AnalysisReport, AnalysisSummary, NodeResult, Reaction};
    pub use crate::topology::Direction;
}
