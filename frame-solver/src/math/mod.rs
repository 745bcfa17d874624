//! Mathematical utilities for slender beam elements

use nalgebra::{DMatrix, DVector, Matrix3, SMatrix, SVector};

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;
pub type Mat3 = Matrix3<f64>;

/// 3x6 kinematic matrix (nodal displacements to deformations)
pub type Mat3x6 = SMatrix<f64, 3, 6>;
/// 6x6 matrix for element stiffness
pub type Mat6 = SMatrix<f64, 6, 6>;
/// 6-element vector for element forces/displacements
pub type Vec6 = SVector<f64, 6>;

/// Compute the kinematic matrix of a straight slender element
///
/// Maps the local displacements `[ux1, uz1, phi1, ux2, uz2, phi2]` onto the
/// elongation and the two end rotations relative to the chord.
///
/// # Arguments
/// * `ai` - Angle of the element with the global x-axis at node 1 (radians)
/// * `aj` - Angle of the element with the global x-axis at node 2 (radians)
/// * `l` - Element length
pub fn kinematic_matrix(ai: f64, aj: f64, l: f64) -> Mat3x6 {
    let (si, ci) = ai.sin_cos();
    let (sj, cj) = aj.sin_cos();

    #[rustfmt::skip]
    let data = [
        -ci,     si,     0.0,  cj,     -sj,     0.0,
        si / l,  ci / l, -1.0, -sj / l, -cj / l, 0.0,
        -si / l, -ci / l, 0.0, sj / l,  cj / l,  1.0,
    ];

    Mat3x6::from_row_slice(&data)
}

/// Compute the constitutive matrix of a prismatic Euler-Bernoulli element
///
/// # Arguments
/// * `ea` - Axial stiffness (E * A)
/// * `ei` - Bending stiffness (E * I)
/// * `l` - Element length
pub fn constitutive_matrix(ea: f64, ei: f64, l: f64) -> Mat3 {
    Mat3::new(
        ea / l, 0.0, 0.0,
        0.0, 4.0 * ei / l, -2.0 * ei / l,
        0.0, -2.0 * ei / l, 4.0 * ei / l,
    )
}

/// Compute the element stiffness matrix `B^T * C * B`
pub fn stiffness_matrix(constitutive: &Mat3, kinematic: &Mat3x6) -> Mat6 {
    kinematic.transpose() * constitutive * kinematic
}

/// Check a square matrix for symmetry
///
/// Entries are compared with `|a - b| <= atol + rtol * |b|`.
pub fn is_symmetric(m: &Mat, rtol: f64, atol: f64) -> bool {
    if m.nrows() != m.ncols() {
        return false;
    }
    let n = m.nrows();
    for i in 0..n {
        for j in (i + 1)..n {
            let a = m[(i, j)];
            let b = m[(j, i)];
            if (a - b).abs() > atol + rtol * b.abs() {
                return false;
            }
        }
    }
    true
}

/// Solve a linear system using LU decomposition
///
/// The system is Jacobi scaled first, so the pivot check measures conditioning
/// rather than the spread between axial and bending stiffness. Returns `None`
/// when a diagonal entry is not positive, when the smallest scaled pivot is
/// below `pivot_tol` times the largest one, or when the solution is not finite.
pub fn solve_linear_system(a: &Mat, b: &Vec, pivot_tol: f64) -> Option<Vec> {
    let (scaled, rhs, scale) = jacobi_scaled(a, b)?;
    let lu = scaled.lu();
    let pivots = lu.u().diagonal();
    if is_rank_deficient(&pivots, pivot_tol) {
        return None;
    }
    lu.solve(&rhs)
        .map(|y| y.component_mul(&scale))
        .filter(|x| x.iter().all(|v| v.is_finite()))
}

/// Solve a linear system using Cholesky decomposition (for symmetric positive definite)
pub fn solve_cholesky(a: &Mat, b: &Vec, pivot_tol: f64) -> Option<Vec> {
    let (scaled, rhs, scale) = jacobi_scaled(a, b)?;
    let chol = scaled.cholesky()?;
    // Pivots of the factorisation are the squared diagonal of L
    let pivots = chol.l().diagonal().map(|d| d * d);
    if is_rank_deficient(&pivots, pivot_tol) {
        return None;
    }
    let x = chol.solve(&rhs).component_mul(&scale);
    x.iter().all(|v| v.is_finite()).then_some(x)
}

/// Scale `a x = b` to `(S a S) y = S b` with `S = diag(a)^-1/2` and `x = S y`
///
/// A stiffness matrix with a zero or negative diagonal entry has a degree of
/// freedom without stiffness, so `None` is returned for it.
fn jacobi_scaled(a: &Mat, b: &Vec) -> Option<(Mat, Vec, Vec)> {
    let scale = a.diagonal().map(|d| if d > 0.0 { d.sqrt().recip() } else { f64::NAN });
    if !scale.iter().all(|s| s.is_finite()) {
        return None;
    }
    let scaled = Mat::from_fn(a.nrows(), a.ncols(), |i, j| a[(i, j)] * scale[i] * scale[j]);
    let rhs = b.component_mul(&scale);
    Some((scaled, rhs, scale))
}

fn is_rank_deficient(pivots: &Vec, pivot_tol: f64) -> bool {
    if pivots.is_empty() {
        return false;
    }
    let largest = pivots.amax();
    let smallest = pivots.amin();
    !(largest > 0.0) || smallest <= pivot_tol * largest
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_kinematic_matrix_horizontal() {
        let b = kinematic_matrix(0.0, 0.0, 2.0);

        // Elongation = ux2 - ux1
        assert_relative_eq!(b[(0, 0)], -1.0);
        assert_relative_eq!(b[(0, 3)], 1.0);
        assert_relative_eq!(b[(0, 1)], 0.0);
        // Chord rotation terms
        assert_relative_eq!(b[(1, 1)], 0.5);
        assert_relative_eq!(b[(1, 2)], -1.0);
        assert_relative_eq!(b[(2, 4)], 0.5);
        assert_relative_eq!(b[(2, 5)], 1.0);
    }

    #[test]
    fn test_stiffness_matrix_horizontal_terms() {
        let (ea, ei, l) = (5000.0, 8000.0, 4.0);
        let k = stiffness_matrix(&constitutive_matrix(ea, ei, l), &kinematic_matrix(0.0, 0.0, l));

        assert_relative_eq!(k[(0, 0)], ea / l, epsilon = 1e-9);
        assert_relative_eq!(k[(0, 3)], -ea / l, epsilon = 1e-9);
        assert_relative_eq!(k[(1, 1)], 12.0 * ei / l.powi(3), epsilon = 1e-9);
        assert_relative_eq!(k[(1, 2)], -6.0 * ei / l.powi(2), epsilon = 1e-9);
        assert_relative_eq!(k[(2, 2)], 4.0 * ei / l, epsilon = 1e-9);
        assert_relative_eq!(k[(2, 5)], 2.0 * ei / l, epsilon = 1e-9);
        assert_relative_eq!(k[(4, 2)], 6.0 * ei / l.powi(2), epsilon = 1e-9);
    }

    #[test]
    fn test_stiffness_symmetry() {
        let l = 5.0;
        let alpha = 0.3_f64;
        let k = stiffness_matrix(&constitutive_matrix(2.0e6, 3.0e4, l), &kinematic_matrix(alpha, alpha, l));

        for i in 0..6 {
            for j in 0..6 {
                assert_relative_eq!(k[(i, j)], k[(j, i)], epsilon = 1e-6, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn test_symmetry_check() {
        let mut m = Mat::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 3.0]);
        assert!(is_symmetric(&m, 1e-5, 1e-8));
        m[(0, 1)] = 2.1;
        assert!(!is_symmetric(&m, 1e-5, 1e-8));
        assert!(!is_symmetric(&Mat::zeros(2, 3), 1e-5, 1e-8));
    }

    #[test]
    fn test_solvers_agree() {
        let a = Mat::from_row_slice(2, 2, &[4.0, 1.0, 1.0, 3.0]);
        let b = Vec::from_vec(vec![1.0, 2.0]);

        let x_lu = solve_linear_system(&a, &b, 1e-12).unwrap();
        let x_chol = solve_cholesky(&a, &b, 1e-12).unwrap();
        assert_relative_eq!(x_lu[0], 1.0 / 11.0, epsilon = 1e-12);
        assert_relative_eq!(x_lu[1], 7.0 / 11.0, epsilon = 1e-12);
        for i in 0..2 {
            assert_relative_eq!(x_lu[i], x_chol[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_singular_system_rejected() {
        let a = Mat::from_row_slice(2, 2, &[1.0, -1.0, -1.0, 1.0]);
        let b = Vec::from_vec(vec![1.0, 0.0]);
        assert!(solve_linear_system(&a, &b, 1e-12).is_none());
        assert!(solve_cholesky(&a, &b, 1e-12).is_none());

        // A degree of freedom without any stiffness
        let a = Mat::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 0.0]);
        assert!(solve_linear_system(&a, &b, 1e-12).is_none());
        assert!(solve_cholesky(&a, &b, 1e-12).is_none());
    }

    #[test]
    fn test_stiffness_contrast_is_not_singular() {
        // Axial and bending terms of a slender cantilever differ by 13 orders of magnitude
        let (ea, ei, l) = (2.0e8, 1.0e-4, 10.0);
        let k = stiffness_matrix(&constitutive_matrix(ea, ei, l), &kinematic_matrix(0.0, 0.0, l));
        let free = [3, 4, 5];
        let a = Mat::from_fn(3, 3, |i, j| k[(free[i], free[j])]);
        let b = Vec::from_vec(vec![0.0, 1.0e-3, 0.0]);

        let x_lu = solve_linear_system(&a, &b, 1e-12).unwrap();
        let x_chol = solve_cholesky(&a, &b, 1e-12).unwrap();
        let expected = 1.0e-3 * l.powi(3) / (3.0 * ei);
        assert_relative_eq!(x_lu[1], expected, max_relative = 1e-8);
        assert_relative_eq!(x_chol[1], expected, max_relative = 1e-8);
        assert_relative_eq!(x_lu[0], 0.0, epsilon = 1e-12);
    }
}
