use std::fmt::{Debug, Display};
use std::ops::{Mul, MulAssign};
use std::str::FromStr;

use nalgebra::DMatrix;
use num_complex::Complex64;
use quantum_core::{PauliMatrix, Phase};

use crate::error::StabilizerError;

/// Signed tensor product of one-qubit Pauli matrices over every tracked qubit.
///
/// Column `j` holds the Pauli acting on qubit `j`; qubit 0 is the most significant
/// factor of the Kronecker product returned by [`StabilizerGenerator::as_matrix`].
///
/// # String Format
///
/// A sign token followed by one character per qubit:
/// - `"+XX_Z"` → X₀ ⊗ X₁ ⊗ I₂ ⊗ Z₃
/// - sign tokens are `+`, `-`, `+i`, `-i`
///
/// ```
/// use paulitrace::StabilizerGenerator;
///
/// let left: StabilizerGenerator = "+XZ".parse().unwrap();
/// let right: StabilizerGenerator = "+ZX".parse().unwrap();
/// assert_eq!((&left * &right).to_string(), "+YY");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct StabilizerGenerator {
    phase: Phase,
    paulis: Vec<PauliMatrix>,
}

impl StabilizerGenerator {
    #[must_use]
    pub fn new(phase: Phase, paulis: Vec<PauliMatrix>) -> Self {
        Self { phase, paulis }
    }

    #[must_use]
    pub fn identity(qubit_count: usize) -> Self {
        Self::new(Phase::RealPositive, vec![PauliMatrix::I; qubit_count])
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn paulis(&self) -> &[PauliMatrix] {
        &self.paulis
    }

    /// # Panics
    ///
    /// Will panic if `qubit` is not smaller than [`Self::qubit_count`]
    #[must_use]
    pub fn pauli(&self, qubit: usize) -> PauliMatrix {
        self.paulis[qubit]
    }

    #[must_use]
    pub fn qubit_count(&self) -> usize {
        self.paulis.len()
    }

    #[must_use]
    pub fn weight(&self) -> usize {
        self.paulis.iter().filter(|pauli| !pauli.is_identity()).count()
    }

    /// Whether the generator can stand for a physical stabilizer, i.e. its phase is ±1.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.phase.is_real()
    }

    /// Product `self · rhs`, column by column, with the accumulated phase.
    ///
    /// # Panics
    ///
    /// Will panic if the generators act on a different number of qubits
    #[must_use]
    pub fn multiply(&self, rhs: &StabilizerGenerator) -> StabilizerGenerator {
        let mut result = self.clone();
        result.mul_assign_right(rhs);
        result
    }

    /// # Panics
    ///
    /// Will panic if the generators act on a different number of qubits
    pub fn mul_assign_right(&mut self, rhs: &StabilizerGenerator) {
        assert_eq!(
            self.qubit_count(),
            rhs.qubit_count(),
            "generators must act on the same number of qubits"
        );
        let mut phase = self.phase + rhs.phase;
        for (left, right) in self.paulis.iter_mut().zip(&rhs.paulis) {
            let (product, correction) = left.product(*right);
            *left = product;
            phase += correction;
        }
        self.phase = phase;
    }

    /// Deletes column `qubit`. Whatever Pauli the column held is dropped without a check.
    ///
    /// # Panics
    ///
    /// Will panic if `qubit` is not smaller than [`Self::qubit_count`]
    pub fn remove_qubit(&mut self, qubit: usize) {
        self.paulis.remove(qubit);
    }

    /// Reorders columns so that new column `j` holds old column `permutation[j]`.
    ///
    /// `permutation` is expected to be a bijection on `0..qubit_count`.
    ///
    /// # Panics
    ///
    /// Will panic if an entry of `permutation` is not smaller than [`Self::qubit_count`]
    pub fn permute_qubits(&mut self, permutation: &[usize]) {
        self.paulis = permutation.iter().map(|&source| self.paulis[source]).collect();
    }

    /// Dense `2ⁿ × 2ⁿ` matrix: the Kronecker product of every column, scaled by the phase.
    #[must_use]
    pub fn as_matrix(&self) -> DMatrix<Complex64> {
        let mut result = DMatrix::from_element(1, 1, self.phase.as_complex());
        for pauli in &self.paulis {
            result = result.kronecker(&pauli_matrix(*pauli));
        }
        result
    }
}

fn pauli_matrix(pauli: PauliMatrix) -> DMatrix<Complex64> {
    let entries = pauli.entries();
    DMatrix::from_fn(2, 2, |row, column| entries[row][column])
}

impl Mul<&StabilizerGenerator> for &StabilizerGenerator {
    type Output = StabilizerGenerator;

    #[inline]
    fn mul(self, rhs: &StabilizerGenerator) -> Self::Output {
        self.multiply(rhs)
    }
}

impl MulAssign<&StabilizerGenerator> for StabilizerGenerator {
    #[inline]
    fn mul_assign(&mut self, rhs: &StabilizerGenerator) {
        self.mul_assign_right(rhs);
    }
}

impl FromStr for StabilizerGenerator {
    type Err = StabilizerError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();
        let (phase, pauli_chars) = Phase::split_sign_token(trimmed).ok_or_else(|| StabilizerError::InvalidSign {
            generator: trimmed.to_owned(),
        })?;
        let paulis = pauli_chars
            .chars()
            .map(|character| {
                PauliMatrix::from_char(character).ok_or_else(|| StabilizerError::InvalidPauli {
                    generator: trimmed.to_owned(),
                    character,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(phase, paulis))
    }
}

impl Display for StabilizerGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut text = String::from(self.phase.sign_token());
        text.extend(self.paulis.iter().map(|pauli| pauli.as_char()));
        f.pad(&text)
    }
}

impl Debug for StabilizerGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as Display>::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(text: &str) -> StabilizerGenerator {
        text.parse().unwrap()
    }

    #[test]
    fn parses_sign_tokens() {
        assert_eq!(generator("+XZ").phase(), Phase::RealPositive);
        assert_eq!(generator("-XZ").phase(), Phase::RealNegative);
        assert_eq!(generator("+iXZ").phase(), Phase::ImaginaryPositive);
        assert_eq!(generator("-iXZ").phase(), Phase::ImaginaryNegative);
        assert_eq!(
            generator("-_XYZ").paulis(),
            &[PauliMatrix::I, PauliMatrix::X, PauliMatrix::Y, PauliMatrix::Z]
        );
    }

    #[test]
    fn rejects_malformed_text() {
        assert_eq!(
            "XZ".parse::<StabilizerGenerator>(),
            Err(StabilizerError::InvalidSign { generator: "XZ".into() })
        );
        assert_eq!(
            "*XZ".parse::<StabilizerGenerator>(),
            Err(StabilizerError::InvalidSign { generator: "*XZ".into() })
        );
        assert_eq!(
            "+XIZ".parse::<StabilizerGenerator>(),
            Err(StabilizerError::InvalidPauli {
                generator: "+XIZ".into(),
                character: 'I'
            })
        );
        assert!("".parse::<StabilizerGenerator>().is_err());
    }

    #[test]
    fn display_round_trip() {
        for text in ["+XX_Z", "-Y", "+i__", "-iZYX", "+"] {
            assert_eq!(generator(text).to_string(), text);
        }
    }

    #[test]
    fn multiply_accumulates_phase() {
        assert_eq!(generator("+XZ").multiply(&generator("+ZX")), generator("+YY"));
        assert_eq!(generator("+X_").multiply(&generator("+Z_")), generator("-iY_"));
        assert_eq!(generator("-XX").multiply(&generator("+XX")), generator("-__"));
        assert_eq!(generator("+iX").multiply(&generator("+iX")), generator("-_"));
    }

    #[test]
    fn multiply_leaves_operands_untouched() {
        let left = generator("+XYZ");
        let right = generator("-ZZZ");
        let product = &left * &right;
        assert_eq!(left, generator("+XYZ"));
        assert_eq!(right, generator("-ZZZ"));
        let mut in_place = left.clone();
        in_place *= &right;
        assert_eq!(in_place, product);
    }

    #[test]
    #[should_panic(expected = "same number of qubits")]
    fn multiply_requires_equal_lengths() {
        let _ = generator("+XX").multiply(&generator("+X"));
    }

    #[test]
    fn remove_and_permute_columns() {
        let mut pauli = generator("-XYZ_");
        pauli.remove_qubit(1);
        assert_eq!(pauli, generator("-XZ_"));
        pauli.permute_qubits(&[2, 0, 1]);
        assert_eq!(pauli, generator("-_XZ"));
    }

    #[test]
    fn matrix_of_single_qubit_generators() {
        let i = Complex64::new(0.0, 1.0);
        let y = generator("+Y").as_matrix();
        assert_eq!(y[(0, 1)], -i);
        assert_eq!(y[(1, 0)], i);
        let minus_z = generator("-Z").as_matrix();
        assert_eq!(minus_z[(0, 0)], Complex64::new(-1.0, 0.0));
        assert_eq!(minus_z[(1, 1)], Complex64::new(1.0, 0.0));
    }

    #[test]
    fn matrix_uses_first_qubit_as_most_significant() {
        // Z ⊗ I is diag(1, 1, -1, -1)
        let matrix = generator("+Z_").as_matrix();
        let diagonal: Vec<f64> = (0..4).map(|index| matrix[(index, index)].re).collect();
        assert_eq!(diagonal, vec![1.0, 1.0, -1.0, -1.0]);
    }

    #[test]
    fn matrix_of_product_is_product_of_matrices() {
        let left = generator("+XYZ");
        let right = generator("-YY_");
        let expected = left.as_matrix() * right.as_matrix();
        assert!((left.multiply(&right).as_matrix() - expected).norm() < 1e-12);
    }
}
