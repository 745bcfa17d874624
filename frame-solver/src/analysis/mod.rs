//! Analysis options

use serde::{Deserialize, Serialize};

/// Dense solver used for the reduced system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LinearSolver {
    /// LU decomposition with partial pivoting
    #[default]
    Lu,
    /// Cholesky decomposition (reduced stiffness is symmetric positive definite)
    Cholesky,
}

/// Options for structural analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Solver for the condensed system
    pub solver: LinearSolver,
    /// Relative tolerance of the assembly symmetry check
    pub symmetry_rtol: f64,
    /// Absolute tolerance of the assembly symmetry check
    pub symmetry_atol: f64,
    /// Smallest accepted pivot of the diagonally scaled system, relative to the largest one
    pub pivot_tolerance: f64,
    /// Log per-node results after solving
    pub log_node_results: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            solver: LinearSolver::Lu,
            symmetry_rtol: 1e-5,
            symmetry_atol: 1e-8,
            pivot_tolerance: 1e-12,
            log_node_results: true,
        }
    }
}

impl AnalysisOptions {
    /// Create options for the default LU solve
    pub fn linear() -> Self {
        Self::default()
    }

    /// Use the Cholesky solver
    pub fn with_cholesky(mut self) -> Self {
        self.solver = LinearSolver::Cholesky;
        self
    }

    /// Set the symmetry tolerances
    pub fn with_symmetry_tolerance(mut self, rtol: f64, atol: f64) -> Self {
        self.symmetry_rtol = rtol;
        self.symmetry_atol = atol;
        self
    }

    /// Set the relative pivot tolerance
    pub fn with_pivot_tolerance(mut self, tol: f64) -> Self {
        self.pivot_tolerance = tol;
        self
    }

    /// Disable per-node result logging
    pub fn quiet(mut self) -> Self {
        self.log_node_results = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_options_deserialize_with_defaults() {
        let options: AnalysisOptions = serde_json::from_str(r#"{"solver": "Cholesky"}"#).unwrap();
        assert_eq!(options.solver, LinearSolver::Cholesky);
        assert_eq!(options.pivot_tolerance, 1e-12);
        assert!(options.log_node_results);
    }

    #[test]
    fn test_builders() {
        let options = AnalysisOptions::linear()
            .with_cholesky()
            .with_symmetry_tolerance(1e-6, 1e-10)
            .with_pivot_tolerance(1e-14)
            .quiet();
        assert_eq!(options.solver, LinearSolver::Cholesky);
        assert_eq!((options.symmetry_rtol, options.symmetry_atol), (1e-6, 1e-10));
        assert_eq!(options.pivot_tolerance, 1e-14);
        assert!(!options.log_node_results);
    }
}
