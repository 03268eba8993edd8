//! Dense density matrices and pure-state decompositions of small stabilizer tableaux.
//!
//! Everything here is exponential in the qubit count of the tableau: a tableau on `m` qubits
//! materializes `2ᵐ × 2ᵐ` matrices. Reduce to the qubits of interest first.

use nalgebra::{DMatrix, DVector, SymmetricEigen};
use num_complex::Complex64;
use tracing::{debug, trace};

use crate::error::{Result, StabilizerError};
use crate::tableau::StabilizerTableau;

pub type DensityMatrix = DMatrix<Complex64>;
pub type StateVector = DVector<Complex64>;

/// Eigenvalues with magnitude at or below this are treated as numerical residue.
pub const DEFAULT_ZERO_THRESHOLD: f64 = 1e-12;

/// Eigenvalues closer than this share an eigenspace.
pub const EIGENVALUE_CLUSTER_TOLERANCE: f64 = 1e-9;

const GRAM_SCHMIDT_TOLERANCE: f64 = 1e-8;

/// One term `p |ψ⟩⟨ψ|` of a mixture of pure states.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilisticPureState {
    /// Classical probability of this state in the mixture.
    pub probability: f64,
    /// Normalized state vector over the tableau's qubits, qubit 0 most significant.
    pub state: StateVector,
}

impl StabilizerTableau {
    /// ρ = 2⁻ⁿ Σ_S ∏_{i∈S} Gᵢ over all subsets S of rows, products in row order.
    ///
    /// The subset sum is evaluated as the ordered product ∏ᵢ (I + Gᵢ), which expands to exactly
    /// those terms. The empty tableau gives the maximally mixed state.
    #[must_use]
    pub fn as_density_matrix(&self) -> DensityMatrix {
        let dimension = 1usize << self.qubit_count();
        let mut accumulated = DensityMatrix::identity(dimension, dimension);
        for generator in self {
            let generator_matrix = generator.as_matrix();
            accumulated = &accumulated + &accumulated * &generator_matrix;
        }
        accumulated /= Complex64::new(dimension as f64, 0.0);
        accumulated
    }

    /// Canonical decomposition of [`Self::as_density_matrix`] into orthogonal pure states.
    ///
    /// See [`decompose_density_matrix`].
    #[must_use]
    pub fn state_vector_distribution(&self, zero_threshold: f64) -> Vec<ProbabilisticPureState> {
        decompose_density_matrix(&self.as_density_matrix(), zero_threshold)
    }

    /// The state vector of a pure state.
    ///
    /// # Errors
    ///
    /// Returns [`StabilizerError::NotPureState`] unless the distribution has exactly one entry.
    pub fn single_state(&self, zero_threshold: f64) -> Result<StateVector> {
        single_entry(self.state_vector_distribution(zero_threshold))
    }
}

pub(crate) fn single_entry(mut distribution: Vec<ProbabilisticPureState>) -> Result<StateVector> {
    match distribution.len() {
        1 => Ok(distribution.swap_remove(0).state),
        significant => Err(StabilizerError::NotPureState { significant }),
    }
}

/// Eigen-decomposes a Hermitian `density_matrix` into a reproducible list of pure states.
///
/// Eigenpairs with eigenvalue magnitude at or below `zero_threshold` are dropped. Remaining eigenvalues
/// are grouped into eigenspaces, ordered by decreasing probability. Inside an eigenspace the basis is
/// rebuilt from the projections of `|0⟩, |1⟩, …` in that order, so degenerate eigenspaces do not depend
/// on the rotation the solver happened to pick. Each vector then has negligible components cleared and its
/// global phase fixed by [`fix_global_phase`].
#[must_use]
pub fn decompose_density_matrix(density_matrix: &DensityMatrix, zero_threshold: f64) -> Vec<ProbabilisticPureState> {
    let dimension = density_matrix.nrows();
    let eigen = SymmetricEigen::new(density_matrix.clone());
    let mut significant: Vec<usize> = (0..eigen.eigenvalues.len())
        .filter(|&index| {
            let keep = eigen.eigenvalues[index].abs() > zero_threshold;
            if !keep {
                trace!(eigenvalue = eigen.eigenvalues[index], "discarding eigenvalue");
            }
            keep
        })
        .collect();
    significant.sort_by(|&left, &right| eigen.eigenvalues[right].abs().total_cmp(&eigen.eigenvalues[left].abs()));

    let mut eigenspaces: Vec<Vec<usize>> = Vec::new();
    for index in significant {
        match eigenspaces.last_mut() {
            Some(eigenspace)
                if eigen.eigenvalues[eigenspace[0]].abs() - eigen.eigenvalues[index].abs()
                    <= EIGENVALUE_CLUSTER_TOLERANCE =>
            {
                eigenspace.push(index);
            }
            _ => eigenspaces.push(vec![index]),
        }
    }

    let mut distribution = Vec::new();
    for eigenspace in &eigenspaces {
        let probability =
            eigenspace.iter().map(|&index| eigen.eigenvalues[index].abs()).sum::<f64>() / eigenspace.len() as f64;
        let solver_basis = eigen.eigenvectors.select_columns(eigenspace);
        for mut state in canonical_basis(&solver_basis) {
            zero_small_components(&mut state, zero_threshold);
            fix_global_phase(&mut state);
            distribution.push(ProbabilisticPureState { probability, state });
        }
    }
    debug!(
        dimension,
        eigenspaces = eigenspaces.len(),
        states = distribution.len(),
        "decomposed density matrix"
    );
    distribution
}

/// Orthonormal basis of the column span of `basis`, built by Gram–Schmidt on the projected
/// computational basis states in index order.
fn canonical_basis(basis: &DMatrix<Complex64>) -> Vec<StateVector> {
    let rank = basis.ncols();
    let mut accepted: Vec<StateVector> = Vec::with_capacity(rank);
    for basis_index in 0..basis.nrows() {
        if accepted.len() == rank {
            break;
        }
        let mut candidate: StateVector = basis * basis.row(basis_index).adjoint();
        for vector in &accepted {
            let overlap = vector.dotc(&candidate);
            candidate -= vector * overlap;
        }
        if candidate.norm() > GRAM_SCHMIDT_TOLERANCE {
            accepted.push(candidate.normalize());
        }
    }
    if accepted.len() < rank {
        trace!(rank, found = accepted.len(), "falling back to solver eigenvectors");
        return basis.column_iter().map(|column| column.into_owned()).collect();
    }
    accepted
}

/// Clears real and imaginary parts smaller than `zero_threshold` times the largest component magnitude.
pub fn zero_small_components(state: &mut StateVector, zero_threshold: f64) {
    let cutoff = state.iter().map(|component| component.norm()).fold(0.0, f64::max) * zero_threshold;
    for component in state.iter_mut() {
        if component.re.abs() < cutoff {
            component.re = 0.0;
        }
        if component.im.abs() < cutoff {
            component.im = 0.0;
        }
    }
}

/// Rotates `state` so that its first nonzero component is real and positive.
pub fn fix_global_phase(state: &mut StateVector) {
    if let Some(first) = state.iter().copied().find(|component| component.norm() > 0.0) {
        let unit_phase = first / first.norm();
        *state *= unit_phase.conj();
    }
}

/// Copy of `density_matrix` with entries below `zero_threshold` times the largest magnitude cleared.
#[must_use]
pub fn cleaned_density_matrix(density_matrix: &DensityMatrix, zero_threshold: f64) -> DensityMatrix {
    let cutoff = density_matrix.iter().map(|entry| entry.norm()).fold(0.0, f64::max) * zero_threshold;
    density_matrix.map(|entry| {
        Complex64::new(
            if entry.re.abs() < cutoff { 0.0 } else { entry.re },
            if entry.im.abs() < cutoff { 0.0 } else { entry.im },
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn real_vector(values: &[f64]) -> StateVector {
        StateVector::from_iterator(values.len(), values.iter().map(|&value| Complex64::new(value, 0.0)))
    }

    fn tableau(generators: &[&str]) -> StabilizerTableau {
        StabilizerTableau::from_strings(generators).unwrap()
    }

    #[test]
    fn density_matrix_of_zz() {
        let density = tableau(&["+ZZ"]).as_density_matrix();
        let expected = DensityMatrix::from_diagonal(&real_vector(&[0.5, 0.0, 0.0, 0.5]));
        assert!((density - expected).norm() < 1e-12);
    }

    #[test]
    fn empty_tableau_is_maximally_mixed() {
        let mixed = StabilizerTableau::with_qubit_count(2, Vec::new()).unwrap();
        let expected = DensityMatrix::from_diagonal(&real_vector(&[0.25; 4]));
        assert!((mixed.as_density_matrix() - expected).norm() < 1e-12);
        let distribution = mixed.state_vector_distribution(DEFAULT_ZERO_THRESHOLD);
        assert_eq!(distribution.len(), 4);
        for (index, entry) in distribution.iter().enumerate() {
            assert!((entry.probability - 0.25).abs() < 1e-9);
            let mut expected = real_vector(&[0.0; 4]);
            expected[index] = Complex64::new(1.0, 0.0);
            assert!((&entry.state - expected).norm() < 1e-9);
        }
    }

    #[test]
    fn zero_qubit_tableau() {
        let trivial = StabilizerTableau::default();
        assert_eq!(trivial.as_density_matrix(), DensityMatrix::identity(1, 1));
        let state = trivial.single_state(DEFAULT_ZERO_THRESHOLD).unwrap();
        assert!((state - real_vector(&[1.0])).norm() < 1e-12);
    }

    #[test]
    fn phase_fix_makes_first_component_positive() {
        let mut state = StateVector::from_vec(vec![
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, -0.5),
            Complex64::new(0.5, 0.0),
        ]);
        fix_global_phase(&mut state);
        assert!((state[1] - Complex64::new(0.5, 0.0)).norm() < 1e-15);
        assert!((state[2] - Complex64::new(0.0, 0.5)).norm() < 1e-15);
        assert_eq!(state[0], Complex64::new(0.0, 0.0));
    }

    #[test]
    fn small_components_are_cleared() {
        let mut state = StateVector::from_vec(vec![Complex64::new(1.0, 1e-17), Complex64::new(-1e-16, 0.5)]);
        zero_small_components(&mut state, DEFAULT_ZERO_THRESHOLD);
        assert_eq!(state[0], Complex64::new(1.0, 0.0));
        assert_eq!(state[1], Complex64::new(0.0, 0.5));
    }

    #[test]
    fn degenerate_eigenspace_is_canonical() {
        // (I + XX) / 4 has a two-fold eigenvalue 1/2
        let distribution = tableau(&["+XX"]).state_vector_distribution(DEFAULT_ZERO_THRESHOLD);
        let half = std::f64::consts::FRAC_1_SQRT_2;
        assert_eq!(distribution.len(), 2);
        assert!((distribution[0].probability - 0.5).abs() < 1e-9);
        assert!((&distribution[0].state - real_vector(&[half, 0.0, 0.0, half])).norm() < 1e-9);
        assert!((&distribution[1].state - real_vector(&[0.0, half, half, 0.0])).norm() < 1e-9);
    }

    #[test]
    fn mixed_state_is_not_pure() {
        assert_eq!(
            tableau(&["+ZZ"]).single_state(DEFAULT_ZERO_THRESHOLD),
            Err(StabilizerError::NotPureState { significant: 2 })
        );
    }

    #[test]
    fn cleaned_density_matrix_drops_residue() {
        let mut density = DensityMatrix::identity(2, 2);
        density[(0, 1)] = Complex64::new(1e-15, -1e-14);
        let cleaned = cleaned_density_matrix(&density, DEFAULT_ZERO_THRESHOLD);
        assert_eq!(cleaned, DensityMatrix::identity(2, 2));
        assert_eq!(cleaned_density_matrix(&density, 0.0), density);
    }
}
