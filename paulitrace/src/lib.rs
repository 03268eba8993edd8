//! Reduced quantum state information from stabilizer tableau snapshots.
//!
//! A stabilizer state on `n` qubits is described by `n` signed Pauli generators. This crate traces
//! out the qubits a caller is not interested in, directly on the generators, and turns the few that
//! remain into a dense density matrix or a canonical mixture of pure states.
//!
//! ```
//! use paulitrace::{build_tableau, density_matrix, reduce};
//!
//! let ghz = build_tableau(["+XXXX", "+ZZ__", "+_ZZ_", "+__ZZ"]).unwrap();
//! let reduced = reduce(&ghz, &[1, 3]).unwrap();
//! let rho = density_matrix(&reduced);
//! assert!((rho[(0, 0)].re - 0.5).abs() < 1e-12);
//! assert!((rho[(3, 3)].re - 0.5).abs() < 1e-12);
//! ```

pub mod error;
pub mod generator;
pub mod reconstruction;
pub mod selection;
pub mod snapshot;
pub mod tableau;

#[cfg(feature = "serde")]
mod serde;

pub use error::{Result, SnapshotError, StabilizerError};
pub use generator::StabilizerGenerator;
pub use quantum_core::{Axis, PauliMatrix, Phase};
pub use reconstruction::{
    DensityMatrix, ProbabilisticPureState, StateVector, DEFAULT_ZERO_THRESHOLD, EIGENVALUE_CLUSTER_TOLERANCE,
};
pub use selection::QubitSelection;
pub use snapshot::{SnapshotState, SNAPSHOT_MAGIC};
pub use tableau::StabilizerTableau;

/// Parses one signed Pauli string per generator into a tableau.
///
/// # Errors
///
/// Returns a format error for malformed strings or generators of different lengths.
pub fn build_tableau<Text: AsRef<str>>(generator_strings: impl IntoIterator<Item = Text>) -> Result<StabilizerTableau> {
    StabilizerTableau::from_strings(generator_strings)
}

/// See [`StabilizerTableau::reduced_to_qubits`].
///
/// # Errors
///
/// Returns a selection, validity or shape error.
pub fn reduce(tableau: &StabilizerTableau, wanted_qubits: &[usize]) -> Result<StabilizerTableau> {
    tableau.reduced_to_qubits(wanted_qubits)
}

#[must_use]
pub fn density_matrix(tableau: &StabilizerTableau) -> DensityMatrix {
    tableau.as_density_matrix()
}

#[must_use]
pub fn pure_state_distribution(tableau: &StabilizerTableau, zero_threshold: f64) -> Vec<ProbabilisticPureState> {
    tableau.state_vector_distribution(zero_threshold)
}

/// The state vector of `tableau`, using [`DEFAULT_ZERO_THRESHOLD`].
///
/// # Errors
///
/// Returns [`StabilizerError::NotPureState`] if the tableau does not describe a pure state.
pub fn single_pure_state(tableau: &StabilizerTableau) -> Result<StateVector> {
    tableau.single_state(DEFAULT_ZERO_THRESHOLD)
}
