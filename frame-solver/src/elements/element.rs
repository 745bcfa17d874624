//! Slender Euler-Bernoulli frame element

use serde::Serialize;
use std::f64::consts::FRAC_PI_2;

use crate::error::{FrameError, FrameResult};
use crate::geometry::Point;
use crate::loads::DistributedLoad;
use crate::math::{constitutive_matrix, kinematic_matrix, stiffness_matrix, Mat3, Mat3x6, Mat6, Vec6};
use crate::results::NodeResult;

/// Relative tolerance on `dx / l` below which an element counts as vertical
const VERTICAL_TOLERANCE: f64 = 1e-9;
/// Absolute tolerance on the angle below which an element counts as horizontal
const HORIZONTAL_TOLERANCE: f64 = 1e-9;

/// Straight two-node frame element
#[derive(Debug, Clone, Serialize)]
pub struct Element {
    /// Element ID (1-based, insertion order)
    pub id: usize,
    /// Start point
    pub point_1: Point,
    /// End point
    pub point_2: Point,
    /// Axial stiffness (E * A)
    pub ea: f64,
    /// Bending stiffness (E * I)
    pub ei: f64,
    /// Length
    pub length: f64,
    /// Angle with the global x-axis (radians)
    pub alpha: f64,
    /// Structural node at `point_1`
    pub node_id_1: usize,
    /// Structural node at `point_2`
    pub node_id_2: usize,

    #[serde(skip)]
    kinematic: Mat3x6,
    #[serde(skip)]
    constitutive: Mat3,
    #[serde(skip)]
    stiffness: Mat6,
    #[serde(skip)]
    primary_forces: Vec6,

    /// Accumulated signed intensity of distributed loads
    q_load: Option<f64>,
    #[serde(skip)]
    displacements: Option<Vec6>,
    #[serde(skip)]
    forces: Option<Vec6>,
    node_1: Option<NodeResult>,
    node_2: Option<NodeResult>,
    normal_force: Option<f64>,
}

impl Element {
    /// Create an element between two points
    ///
    /// Node IDs are left at zero until the element is connected to the
    /// structure.
    pub fn new(id: usize, point_1: Point, point_2: Point, ea: f64, ei: f64) -> FrameResult<Self> {
        let length = point_1.distance_to(&point_2);
        if !(point_1.is_finite() && point_2.is_finite() && length > 0.0 && length.is_finite()) {
            return Err(FrameError::DegenerateGeometry {
                x1: point_1.x,
                z1: point_1.z,
                x2: point_2.x,
                z2: point_2.z,
            });
        }

        let alpha = element_angle(point_1, point_2, length);
        let kinematic = kinematic_matrix(alpha, alpha, length);
        let constitutive = constitutive_matrix(ea, ei, length);
        let stiffness = stiffness_matrix(&constitutive, &kinematic);

        Ok(Self {
            id,
            point_1,
            point_2,
            ea,
            ei,
            length,
            alpha,
            node_id_1: 0,
            node_id_2: 0,
            kinematic,
            constitutive,
            stiffness,
            primary_forces: Vec6::zeros(),
            q_load: None,
            displacements: None,
            forces: None,
            node_1: None,
            node_2: None,
            normal_force: None,
        })
    }

    pub(crate) fn connect(&mut self, node_id_1: usize, node_id_2: usize) {
        self.node_id_1 = node_id_1;
        self.node_id_2 = node_id_2;
    }

    /// Kinematic matrix (3x6)
    pub fn kinematic_matrix(&self) -> &Mat3x6 {
        &self.kinematic
    }

    /// Constitutive matrix (3x3)
    pub fn constitutive_matrix(&self) -> &Mat3 {
        &self.constitutive
    }

    /// Stiffness matrix in global directions (6x6)
    pub fn stiffness_matrix(&self) -> &Mat6 {
        &self.stiffness
    }

    /// Fixed end forces of all distributed loads on this element
    pub fn primary_force_vector(&self) -> &Vec6 {
        &self.primary_forces
    }

    /// Signed distributed load intensity, if any load was applied
    pub fn q_load(&self) -> Option<f64> {
        self.q_load
    }

    /// Add a distributed load and return its fixed end forces
    pub(crate) fn apply_distributed_load(&mut self, load: &DistributedLoad) -> Vec6 {
        let fer = load.primary_force_vector(self.length, self.alpha);
        self.primary_forces += fer;
        self.q_load = Some(self.q_load.unwrap_or(0.0) + load.signed_intensity());
        fer
    }

    /// Element displacements `[ux1, uz1, phi1, ux2, uz2, phi2]` after solve
    pub fn displacement_vector(&self) -> Option<&Vec6> {
        self.displacements.as_ref()
    }

    /// Element end forces `K * d` after solve, without primary forces
    pub fn force_vector(&self) -> Option<&Vec6> {
        self.forces.as_ref()
    }

    /// Result at node 1 after solve
    pub fn node_1(&self) -> Option<&NodeResult> {
        self.node_1.as_ref()
    }

    /// Result at node 2 after solve
    pub fn node_2(&self) -> Option<&NodeResult> {
        self.node_2.as_ref()
    }

    /// Normal force after solve (tension positive)
    pub fn normal_force(&self) -> Option<f64> {
        self.normal_force
    }

    /// Orientation used to resolve internal force signs
    pub fn orientation(&self) -> Orientation {
        Orientation::of(self)
    }

    /// Recover end forces and node results from element displacements
    pub(crate) fn determine_results(&mut self, displacements: Vec6) {
        let forces = self.stiffness * displacements;
        self.displacements = Some(displacements);
        self.forces = Some(forces);

        let total = forces + self.primary_forces;
        let node_1 = NodeResult::from_arrays(
            self.node_id_1,
            [total[0], total[1], total[2]],
            [displacements[0], displacements[1], displacements[2]],
        );
        let node_2 = NodeResult::from_arrays(
            self.node_id_2,
            [total[3], total[4], total[5]],
            [displacements[3], displacements[4], displacements[5]],
        );

        self.normal_force = Some(NormalForceCase::of(self).resolve(&node_1));
        self.node_1 = Some(node_1);
        self.node_2 = Some(node_2);
    }

    /// Drop the results of a previous solve
    pub(crate) fn reset_results(&mut self) {
        self.displacements = None;
        self.forces = None;
        self.node_1 = None;
        self.node_2 = None;
        self.normal_force = None;
    }

    /// Bending moment at midspan
    ///
    /// Average of the end moments plus the parabolic contribution of the
    /// distributed load, `q l^2 / 8`.
    pub fn midspan_moment(&self) -> Option<f64> {
        let (node_1, node_2) = (self.node_1?, self.node_2?);
        let q = self.q_load.unwrap_or(0.0);
        Some((-node_1.ty + node_2.ty) / 2.0 + q * self.length.powi(2) / 8.0)
    }

    /// Largest absolute end moment after solve
    pub fn max_end_moment(&self) -> Option<f64> {
        Some(self.node_1?.ty.abs().max(self.node_2?.ty.abs()))
    }
}

/// Angle of the element with the global x-axis
///
/// Uses the half-plane formula `-atan(dz / dx)`, so non-vertical angles lie in
/// `(-pi/2, pi/2)`.
fn element_angle(point_1: Point, point_2: Point, length: f64) -> f64 {
    let delta = point_2 - point_1;
    if delta.x.abs() <= VERTICAL_TOLERANCE * length {
        if delta.z > 0.0 {
            -FRAC_PI_2
        } else {
            FRAC_PI_2
        }
    } else {
        -(delta.z / delta.x).atan()
    }
}

/// Orientation of an element in the plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Orientation {
    /// Both endpoints share the same x
    Vertical,
    /// Both endpoints share the same z
    Horizontal,
    /// Any other direction
    Inclined,
}

impl Orientation {
    fn of(element: &Element) -> Self {
        let dx = element.point_2.x - element.point_1.x;
        if dx.abs() <= VERTICAL_TOLERANCE * element.length {
            Orientation::Vertical
        } else if element.alpha.abs() <= HORIZONTAL_TOLERANCE {
            Orientation::Horizontal
        } else {
            Orientation::Inclined
        }
    }
}

/// Sign rules for the normal force, tension positive
///
/// `Above` means the smaller z (z points down).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NormalForceCase {
    VerticalPoint1Above,
    VerticalPoint1Below,
    HorizontalPoint1Left,
    HorizontalPoint1Right,
    InclinedPoint1Left,
    InclinedPoint1Right,
}

impl NormalForceCase {
    fn of(element: &Element) -> Self {
        let (p1, p2) = (element.point_1, element.point_2);
        match element.orientation() {
            Orientation::Vertical if p1.z < p2.z => Self::VerticalPoint1Above,
            Orientation::Vertical => Self::VerticalPoint1Below,
            Orientation::Horizontal if p1.x < p2.x => Self::HorizontalPoint1Left,
            Orientation::Horizontal => Self::HorizontalPoint1Right,
            Orientation::Inclined if p1.x < p2.x => Self::InclinedPoint1Left,
            Orientation::Inclined => Self::InclinedPoint1Right,
        }
    }

    fn resolve(self, node_1: &NodeResult) -> f64 {
        let magnitude = (node_1.fx.powi(2) + node_1.fz.powi(2)).sqrt();
        match self {
            Self::VerticalPoint1Above => -node_1.fz,
            Self::VerticalPoint1Below => node_1.fz,
            Self::HorizontalPoint1Left => -node_1.fx,
            Self::HorizontalPoint1Right => node_1.fx,
            Self::InclinedPoint1Left if node_1.fx > 0.0 => -magnitude,
            Self::InclinedPoint1Left => magnitude,
            Self::InclinedPoint1Right if node_1.fx < 0.0 => -magnitude,
            Self::InclinedPoint1Right => magnitude,
        }
    }
}
