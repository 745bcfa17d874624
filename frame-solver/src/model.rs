//! Frame system - topology, assembly, conditions and solution

use log::{debug, info, warn};

use crate::analysis::{AnalysisOptions, LinearSolver};
use crate::elements::{Element, Support};
use crate::error::{FrameError, FrameResult};
use crate::geometry::Point;
use crate::loads::{DistributedLoad, LoadSense, NodeLoad};
use crate::math::{self, Mat, Vec as FEVec, Vec6};
use crate::results::{AnalysisSummary, Reaction};
use crate::topology::{self, CellLocation, Direction, NodeRegistry, DOF_PER_NODE};

/// Reduced system left after eliminating the known degrees of freedom
#[derive(Debug, Clone)]
pub struct Condensation {
    eliminated: Vec<usize>,
    retained: Vec<usize>,
    reduced_matrix: Mat,
    reduced_force: FEVec,
}

impl Condensation {
    /// Global indices with a known displacement, ascending
    pub fn eliminated(&self) -> &[usize] {
        &self.eliminated
    }

    /// Global indices solved for, ascending
    pub fn retained(&self) -> &[usize] {
        &self.retained
    }

    /// Stiffness matrix restricted to the retained indices
    pub fn reduced_matrix(&self) -> &Mat {
        &self.reduced_matrix
    }

    /// Force vector at the retained indices, corrected for prescribed displacements
    pub fn reduced_force(&self) -> &FEVec {
        &self.reduced_force
    }
}

/// A plane frame built from slender beam elements
///
/// Typical use: add elements, register loads and supports, then call
/// [`assemble_system_matrix`](Self::assemble_system_matrix),
/// [`process_conditions`](Self::process_conditions) and [`solve`](Self::solve).
#[derive(Debug, Clone)]
pub struct SystemElements {
    options: AnalysisOptions,
    elements: Vec<Element>,
    nodes: NodeRegistry,
    /// Global destinations of every element's stiffness cells
    schedules: Vec<Vec<CellLocation>>,
    force_vector: FEVec,
    /// Known displacements; `None` marks an unknown
    constraints: Vec<Option<f64>>,
    system_matrix: Option<Mat>,
    symmetric: bool,
    condensation: Option<Condensation>,
    solution: Option<FEVec>,
}

impl Default for SystemElements {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemElements {
    /// Create an empty system with default options
    pub fn new() -> Self {
        Self::with_options(AnalysisOptions::default())
    }

    /// Create an empty system with the given options
    pub fn with_options(options: AnalysisOptions) -> Self {
        Self {
            options,
            elements: Vec::new(),
            nodes: NodeRegistry::new(),
            schedules: Vec::new(),
            force_vector: FEVec::zeros(0),
            constraints: Vec::new(),
            system_matrix: None,
            symmetric: false,
            condensation: None,
            solution: None,
        }
    }

    // ========================
    // Topology
    // ========================

    /// Add an element between two points and return its ID
    ///
    /// Endpoints equal to a previously seen endpoint share its node.
    pub fn add_element(
        &mut self,
        point_1: impl Into<Point>,
        point_2: impl Into<Point>,
        ea: f64,
        ei: f64,
    ) -> FrameResult<usize> {
        let id = self.elements.len() + 1;
        let mut element = Element::new(id, point_1.into(), point_2.into(), ea, ei)?;

        let node_id_1 = self.nodes.resolve(element.point_1);
        let node_id_2 = self.nodes.resolve(element.point_2);
        element.connect(node_id_1, node_id_2);

        self.schedules.push(topology::schedule_cells(node_id_1, node_id_2));
        self.elements.push(element);
        self.grow_vectors();

        // The assembled matrix no longer covers every element
        self.system_matrix = None;
        self.symmetric = false;
        self.invalidate();

        debug!(
            "Element {} connects nodes {} and {} ({} nodes total)",
            id,
            node_id_1,
            node_id_2,
            self.nodes.len()
        );
        Ok(id)
    }

    fn grow_vectors(&mut self) {
        let n_dofs = self.nodes.len() * DOF_PER_NODE;
        if self.force_vector.len() < n_dofs {
            let old = self.force_vector.len();
            self.force_vector = self.force_vector.clone().resize_vertically(n_dofs, 0.0);
            self.constraints.resize(n_dofs, None);
            debug!("Degree of freedom vectors grown from {} to {}", old, n_dofs);
        }
    }

    fn invalidate(&mut self) {
        self.condensation = None;
        if self.solution.take().is_some() {
            for element in &mut self.elements {
                element.reset_results();
            }
        }
    }

    fn check_node(&self, node: usize) -> FrameResult<()> {
        if self.nodes.contains(node) {
            Ok(())
        } else {
            Err(FrameError::UnknownNode(node))
        }
    }

    fn dof(&self, node: usize, direction: usize) -> FrameResult<usize> {
        self.check_node(node)?;
        let direction = Direction::try_from(direction)?;
        Ok(topology::dof_index(node, direction))
    }

    // ========================
    // Loads and Conditions
    // ========================

    /// Add `(node, direction, value)` entries to the global force vector
    ///
    /// Directions are 1 (x), 2 (z) and 3 (rotation). Entries accumulate. No
    /// entry is applied unless all of them are valid.
    pub fn set_force_vector(&mut self, entries: &[(usize, usize, f64)]) -> FrameResult<&FEVec> {
        let indices = entries
            .iter()
            .map(|&(node, direction, _)| self.dof(node, direction))
            .collect::<FrameResult<Vec<_>>>()?;

        for (index, &(_, _, value)) in indices.into_iter().zip(entries) {
            self.force_vector[index] += value;
        }
        self.invalidate();
        Ok(&self.force_vector)
    }

    /// Mark `(node, direction)` degrees of freedom as fixed at zero
    pub fn set_displacement_vector(&mut self, entries: &[(usize, usize)]) -> FrameResult<&[Option<f64>]> {
        let indices = entries
            .iter()
            .map(|&(node, direction)| self.dof(node, direction))
            .collect::<FrameResult<Vec<_>>>()?;

        for index in indices {
            self.constraints[index] = Some(0.0);
        }
        self.invalidate();
        Ok(&self.constraints)
    }

    /// Fix a degree of freedom at a non-zero value
    ///
    /// Overrides any earlier condition on the same degree of freedom.
    pub fn set_prescribed_displacement(&mut self, node: usize, direction: usize, value: f64) -> FrameResult<()> {
        let index = self.dof(node, direction)?;
        self.constraints[index] = Some(value);
        self.invalidate();
        Ok(())
    }

    /// Add a support at a node
    pub fn add_support(&mut self, node: usize, support: Support) -> FrameResult<()> {
        let entries: Vec<(usize, usize)> = support
            .restrained_directions()
            .into_iter()
            .map(|direction| (node, direction as usize))
            .collect();
        self.set_displacement_vector(&entries)?;
        Ok(())
    }

    /// Restrain both translations of a node
    pub fn add_support_hinged(&mut self, node: usize) -> FrameResult<()> {
        self.add_support(node, Support::Hinged)
    }

    /// Restrain one translation of a node
    pub fn add_support_roll(&mut self, node: usize, direction: Direction) -> FrameResult<()> {
        self.add_support(node, Support::Roll { direction })
    }

    /// Restrain all degrees of freedom of a node
    pub fn add_support_fixed(&mut self, node: usize) -> FrameResult<()> {
        self.add_support(node, Support::Fixed)
    }

    /// Apply a uniform transverse load to an element
    ///
    /// The structure receives the fixed end forces with opposite sign.
    pub fn q_load(&mut self, element_id: usize, q: f64, sense: LoadSense) -> FrameResult<&FEVec> {
        let element = element_id
            .checked_sub(1)
            .and_then(|i| self.elements.get_mut(i))
            .ok_or(FrameError::UnknownElement(element_id))?;

        let fer = element.apply_distributed_load(&DistributedLoad::new(q, sense));
        let dofs = topology::element_dofs(element.node_id_1, element.node_id_2);
        for (local, global) in dofs.into_iter().enumerate() {
            self.force_vector[global] -= fer[local];
        }
        self.invalidate();
        Ok(&self.force_vector)
    }

    /// Apply a point load at a node
    pub fn point_load(&mut self, fx: f64, fz: f64, node: usize) -> FrameResult<&FEVec> {
        self.node_load(node, NodeLoad::force(fx, fz))
    }

    /// Apply forces and a moment at a node
    pub fn node_load(&mut self, node: usize, load: NodeLoad) -> FrameResult<&FEVec> {
        self.check_node(node)?;
        self.set_force_vector(&load.entries(node))
    }

    // ========================
    // Analysis
    // ========================

    /// Assemble the global stiffness matrix and report whether it is symmetric
    pub fn assemble_system_matrix(&mut self) -> bool {
        let n_dofs = self.nodes.len() * DOF_PER_NODE;
        let mut matrix = Mat::zeros(n_dofs, n_dofs);

        for (element, cells) in self.elements.iter().zip(&self.schedules) {
            let k = element.stiffness_matrix();
            for cell in cells {
                matrix[(cell.global_row, cell.global_col)] += k[(cell.local_row, cell.local_col)];
            }
        }

        let symmetric = math::is_symmetric(&matrix, self.options.symmetry_rtol, self.options.symmetry_atol);
        if !symmetric {
            warn!("Assembled system matrix ({} x {}) is not symmetric", n_dofs, n_dofs);
        }
        debug!("Assembled {} elements into {} degrees of freedom", self.elements.len(), n_dofs);

        self.system_matrix = Some(matrix);
        self.symmetric = symmetric;
        self.invalidate();
        symmetric
    }

    /// Split the degrees of freedom into known and unknown and build the reduced system
    pub fn process_conditions(&mut self) -> FrameResult<()> {
        let matrix = self.system_matrix.as_ref().ok_or_else(|| {
            FrameError::MissingConditions("system matrix has not been assembled".to_string())
        })?;
        if !self.symmetric {
            return Err(FrameError::AsymmetricAssembly);
        }

        let (eliminated, retained): (Vec<usize>, Vec<usize>) =
            (0..self.constraints.len()).partition(|&i| self.constraints[i].is_some());

        let mut reduced_matrix = Mat::zeros(retained.len(), retained.len());
        let mut reduced_force = FEVec::zeros(retained.len());

        for (i, &di) in retained.iter().enumerate() {
            reduced_force[i] = self.force_vector[di];
            for (j, &dj) in retained.iter().enumerate() {
                reduced_matrix[(i, j)] = matrix[(di, dj)];
            }
            // Move prescribed displacements to the right-hand side
            for &de in &eliminated {
                if let Some(value) = self.constraints[de].filter(|v| *v != 0.0) {
                    reduced_force[i] -= matrix[(di, de)] * value;
                }
            }
        }

        debug!(
            "Condensed system: {} retained, {} eliminated degrees of freedom",
            retained.len(),
            eliminated.len()
        );

        self.condensation = Some(Condensation {
            eliminated,
            retained,
            reduced_matrix,
            reduced_force,
        });
        self.solution = None;
        Ok(())
    }

    /// Solve the reduced system and recover element results
    ///
    /// Returns the full displacement vector.
    pub fn solve(&mut self) -> FrameResult<FEVec> {
        let condensation = self.condensation.as_ref().ok_or_else(|| {
            FrameError::MissingConditions("conditions have not been processed".to_string())
        })?;

        // Without any constraint the structure can move as a rigid body
        if condensation.eliminated.is_empty() {
            return Err(FrameError::SingularReducedSystem);
        }

        let reduced = if condensation.retained.is_empty() {
            FEVec::zeros(0)
        } else {
            let (a, b) = (&condensation.reduced_matrix, &condensation.reduced_force);
            let tol = self.options.pivot_tolerance;
            match self.options.solver {
                LinearSolver::Lu => math::solve_linear_system(a, b, tol),
                LinearSolver::Cholesky => math::solve_cholesky(a, b, tol),
            }
            .ok_or(FrameError::SingularReducedSystem)?
        };

        let mut displacements = FEVec::zeros(self.constraints.len());
        for (i, &di) in condensation.retained.iter().enumerate() {
            displacements[di] = reduced[i];
        }
        for &de in &condensation.eliminated {
            displacements[de] = self.constraints[de].unwrap_or(0.0);
        }

        for element in &mut self.elements {
            let dofs = topology::element_dofs(element.node_id_1, element.node_id_2);
            let local = Vec6::from_fn(|i, _| displacements[dofs[i]]);
            element.determine_results(local);
        }

        if self.options.log_node_results {
            for element in &self.elements {
                if let (Some(node_1), Some(node_2)) = (element.node_1(), element.node_2()) {
                    info!("Element {}: {}", element.id, node_1);
                    info!("Element {}: {}", element.id, node_2);
                }
            }
        }

        self.solution = Some(displacements.clone());
        Ok(displacements)
    }

    // ========================
    // Result Access Methods
    // ========================

    /// Check if the current state has been solved
    pub fn is_solved(&self) -> bool {
        self.solution.is_some()
    }

    fn solution(&self) -> FrameResult<&FEVec> {
        self.solution
            .as_ref()
            .ok_or_else(|| FrameError::MissingConditions("structure has not been solved".to_string()))
    }

    /// Get an element by ID
    pub fn element(&self, id: usize) -> FrameResult<&Element> {
        id.checked_sub(1)
            .and_then(|i| self.elements.get(i))
            .ok_or(FrameError::UnknownElement(id))
    }

    /// All elements in insertion order
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Number of structural nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Node registered at exactly this point
    pub fn node_id_at(&self, point: impl Into<Point>) -> Option<usize> {
        self.nodes.find(&point.into())
    }

    /// Position of a node
    pub fn node_position(&self, node: usize) -> FrameResult<Point> {
        self.nodes.position(node).ok_or(FrameError::UnknownNode(node))
    }

    /// Global force vector
    pub fn force_vector(&self) -> &FEVec {
        &self.force_vector
    }

    /// Displacement vector; all entries are known after a solve
    pub fn displacement_vector(&self) -> Vec<Option<f64>> {
        match &self.solution {
            Some(solution) => solution.iter().map(|v| Some(*v)).collect(),
            None => self.constraints.clone(),
        }
    }

    /// Assembled global stiffness matrix
    pub fn system_matrix(&self) -> Option<&Mat> {
        self.system_matrix.as_ref()
    }

    /// Reduced system built by [`process_conditions`](Self::process_conditions)
    pub fn condensation(&self) -> Option<&Condensation> {
        self.condensation.as_ref()
    }

    /// Displacements `[ux, uz, phi_y]` of a node after solve
    pub fn node_displacement(&self, node: usize) -> FrameResult<[f64; 3]> {
        self.check_node(node)?;
        let solution = self.solution()?;
        let base = topology::dof_index(node, Direction::X);
        Ok([solution[base], solution[base + 1], solution[base + 2]])
    }

    /// Support reactions `K d - F` at every node with a known degree of freedom
    ///
    /// Components of unconstrained directions are zero.
    pub fn reactions(&self) -> FrameResult<Vec<Reaction>> {
        let solution = self.solution()?;
        let matrix = self.system_matrix.as_ref().ok_or_else(|| {
            FrameError::MissingConditions("system matrix has not been assembled".to_string())
        })?;
        let residual = matrix * solution - &self.force_vector;

        let mut reactions = Vec::new();
        for (node, _) in self.nodes.iter() {
            let base = topology::dof_index(node, Direction::X);
            let mut components = [0.0; 3];
            let mut supported = false;
            for (i, component) in components.iter_mut().enumerate() {
                if self.constraints[base + i].is_some() {
                    *component = residual[base + i];
                    supported = true;
                }
            }
            if supported {
                reactions.push(Reaction {
                    node,
                    fx: components[0],
                    fz: components[1],
                    ty: components[2],
                });
            }
        }
        Ok(reactions)
    }

    /// Get analysis summary
    pub fn summary(&self) -> FrameResult<AnalysisSummary> {
        let solution = self.solution()?;

        let mut summary = AnalysisSummary {
            num_nodes: self.nodes.len(),
            num_elements: self.elements.len(),
            total_dofs: self.constraints.len(),
            free_dofs: self.constraints.iter().filter(|c| c.is_none()).count(),
            ..Default::default()
        };

        // Find max displacement
        for (node, _) in self.nodes.iter() {
            let base = topology::dof_index(node, Direction::X);
            let mag = (solution[base].powi(2) + solution[base + 1].powi(2)).sqrt();
            if mag > summary.max_displacement {
                summary.max_displacement = mag;
                summary.max_disp_node = node;
            }
        }

        // Find max element forces
        for element in &self.elements {
            if let Some(moment) = element.max_end_moment() {
                if moment > summary.max_moment {
                    summary.max_moment = moment;
                    summary.max_moment_element = element.id;
                }
            }
            if let Some(normal) = element.normal_force().map(f64::abs) {
                if normal > summary.max_normal_force {
                    summary.max_normal_force = normal;
                    summary.max_normal_force_element = element.id;
                }
            }
        }

        Ok(summary)
    }
}
