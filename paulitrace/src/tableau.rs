use std::collections::BTreeMap;
use std::fmt::{Debug, Display};
use std::str::FromStr;

use derive_more::Deref;
use quantum_core::Axis;
use tracing::debug;

use crate::error::{Result, StabilizerError};
use crate::generator::StabilizerGenerator;
use crate::selection::{is_identity_permutation, QubitSelection};

/// Ordered list of stabilizer generators acting on the same qubits.
///
/// The qubit count is stored separately from the generators: tracing out qubits can
/// eliminate every generator, which leaves the maximally mixed state on the remaining qubits.
#[derive(Clone, PartialEq, Eq, Default, Deref)]
pub struct StabilizerTableau {
    qubit_count: usize,
    #[deref]
    generators: Vec<StabilizerGenerator>,
}

impl StabilizerTableau {
    /// Tableau whose qubit count is taken from its first generator, zero when there are none.
    ///
    /// # Errors
    ///
    /// Returns [`StabilizerError::InconsistentLength`] if generators act on different numbers of qubits.
    pub fn new(generators: Vec<StabilizerGenerator>) -> Result<Self> {
        let qubit_count = generators.first().map_or(0, StabilizerGenerator::qubit_count);
        Self::with_qubit_count(qubit_count, generators)
    }

    /// # Errors
    ///
    /// Returns [`StabilizerError::InconsistentLength`] if a generator does not act on `qubit_count` qubits.
    pub fn with_qubit_count(qubit_count: usize, generators: Vec<StabilizerGenerator>) -> Result<Self> {
        if let Some((row, generator)) = generators
            .iter()
            .enumerate()
            .find(|(_, generator)| generator.qubit_count() != qubit_count)
        {
            return Err(StabilizerError::InconsistentLength {
                row,
                expected: qubit_count,
                found: generator.qubit_count(),
            });
        }
        Ok(Self {
            qubit_count,
            generators,
        })
    }

    /// Parses one signed Pauli string per generator.
    ///
    /// # Errors
    ///
    /// Returns the first format error among the strings, or [`StabilizerError::InconsistentLength`].
    pub fn from_strings<Text: AsRef<str>>(generator_strings: impl IntoIterator<Item = Text>) -> Result<Self> {
        let generators = generator_strings
            .into_iter()
            .map(|text| text.as_ref().parse())
            .collect::<Result<Vec<StabilizerGenerator>>>()?;
        Self::new(generators)
    }

    #[must_use]
    pub fn qubit_count(&self) -> usize {
        self.qubit_count
    }

    #[must_use]
    pub fn generators(&self) -> &[StabilizerGenerator] {
        &self.generators
    }

    #[must_use]
    pub fn into_generators(self) -> Vec<StabilizerGenerator> {
        self.generators
    }

    /// Eliminates column `qubit_index`, keeping only the generated elements that act trivially on it.
    ///
    /// Rows are scanned in order. The first row carrying each non-identity Pauli at the column becomes
    /// the basis row for that axis and is dropped from the tableau; once two axes are known, their product
    /// serves as the basis for the third. Every later row with a known axis is multiplied by its basis,
    /// which clears the column. Finally the column itself is deleted.
    ///
    /// # Panics
    ///
    /// Will panic if `qubit_index` is not smaller than [`Self::qubit_count`]
    pub fn trace_out_qubit(&mut self, qubit_index: usize) {
        assert!(
            qubit_index < self.qubit_count,
            "qubit {qubit_index} is out of range for a tableau on {} qubits",
            self.qubit_count
        );
        let mut basis: BTreeMap<Axis, StabilizerGenerator> = BTreeMap::new();
        let mut basis_rows = Vec::new();
        for row_index in 0..self.generators.len() {
            let Some(axis) = self.generators[row_index].pauli(qubit_index).axis() else {
                continue;
            };
            if let Some(basis_generator) = basis.get(&axis) {
                let reduced = self.generators[row_index].multiply(basis_generator);
                debug_assert!(reduced.pauli(qubit_index).is_identity());
                self.generators[row_index] = reduced;
                continue;
            }
            let synthesized = match basis.iter().next() {
                Some((&known_axis, known_generator)) if basis.len() == 1 => known_axis
                    .third(axis)
                    .map(|third_axis| (third_axis, known_generator.multiply(&self.generators[row_index]))),
                _ => None,
            };
            if let Some((third_axis, generator)) = synthesized {
                basis.insert(third_axis, generator);
            }
            basis.insert(axis, self.generators[row_index].clone());
            basis_rows.push(row_index);
        }
        for &row_index in basis_rows.iter().rev() {
            self.generators.remove(row_index);
        }
        for generator in &mut self.generators {
            generator.remove_qubit(qubit_index);
        }
        self.qubit_count -= 1;
        debug!(
            qubit = qubit_index,
            eliminated = basis_rows.len(),
            remaining = self.generators.len(),
            "traced out qubit"
        );
    }

    /// Reorders the columns of every generator, see [`StabilizerGenerator::permute_qubits`].
    ///
    /// # Panics
    ///
    /// Will panic if an entry of `permutation` is not smaller than [`Self::qubit_count`]
    pub fn permute_qubits(&mut self, permutation: &[usize]) {
        for generator in &mut self.generators {
            generator.permute_qubits(permutation);
        }
        self.qubit_count = permutation.len();
    }

    /// Stabilizer description of the qubits `wanted_qubits`, in that order, with every other qubit traced out.
    ///
    /// The receiver is left untouched; elimination runs on a private copy.
    ///
    /// ```
    /// use paulitrace::StabilizerTableau;
    ///
    /// let ghz = StabilizerTableau::from_strings(["+XXXX", "+ZZ__", "+_ZZ_", "+__ZZ"]).unwrap();
    /// let reduced = ghz.reduced_to_qubits(&[1, 3]).unwrap();
    /// assert_eq!(reduced.to_string(), "+ZZ");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a selection error for out-of-range or repeated qubits, [`StabilizerError::NonRealPhase`]
    /// if a surviving generator has phase ±i, and [`StabilizerError::ShapeMismatch`] if a surviving
    /// generator does not act on exactly the requested qubits.
    pub fn reduced_to_qubits(&self, wanted_qubits: &[usize]) -> Result<StabilizerTableau> {
        let selection = QubitSelection::new(wanted_qubits, self.qubit_count)?;
        let mut reduced = self.clone();
        for qubit in selection.unwanted().into_iter().rev() {
            reduced.trace_out_qubit(qubit);
        }
        let permutation = selection.permutation();
        if !is_identity_permutation(&permutation) {
            reduced.permute_qubits(&permutation);
        }
        for generator in &reduced.generators {
            if !generator.is_valid() {
                return Err(StabilizerError::NonRealPhase {
                    generator: generator.to_string(),
                });
            }
            if generator.qubit_count() != selection.len() {
                return Err(StabilizerError::ShapeMismatch {
                    expected: selection.len(),
                    found: generator.qubit_count(),
                });
            }
        }
        debug!(
            register_qubits = self.qubit_count,
            requested = ?wanted_qubits,
            generators = reduced.generators.len(),
            "reduced tableau"
        );
        Ok(reduced)
    }
}

impl<'life> IntoIterator for &'life StabilizerTableau {
    type Item = &'life StabilizerGenerator;
    type IntoIter = std::slice::Iter<'life, StabilizerGenerator>;

    fn into_iter(self) -> Self::IntoIter {
        self.generators.iter()
    }
}

impl FromStr for StabilizerTableau {
    type Err = StabilizerError;

    /// One generator per non-empty line.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::from_strings(text.lines().map(str::trim).filter(|line| !line.is_empty()))
    }
}

impl Display for StabilizerTableau {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (row_index, generator) in self.generators.iter().enumerate() {
            if row_index > 0 {
                writeln!(f)?;
            }
            write!(f, "{generator}")?;
        }
        Ok(())
    }
}

impl Debug for StabilizerTableau {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StabilizerTableau")
            .field("qubit_count", &self.qubit_count)
            .field("generators", &self.generators)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tableau(generators: &[&str]) -> StabilizerTableau {
        StabilizerTableau::from_strings(generators).unwrap()
    }

    #[test]
    fn rejects_inconsistent_lengths() {
        assert_eq!(
            StabilizerTableau::from_strings(["+XX", "+ZZZ"]),
            Err(StabilizerError::InconsistentLength {
                row: 1,
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn trace_out_single_qubit() {
        let mut ghz = tableau(&["+XXXX", "+ZZ__", "+_ZZ_", "+__ZZ"]);
        ghz.trace_out_qubit(2);
        assert_eq!(ghz, tableau(&["+ZZ_", "+_ZZ"]));
        assert_eq!(ghz.qubit_count(), 3);
    }

    #[test]
    fn trace_out_multiplies_by_basis_row() {
        let mut state = tableau(&["+XX_", "+ZZ_", "+_ZZ"]);
        state.trace_out_qubit(1);
        // +ZZ_ becomes the Z basis, +_ZZ is reduced by it to +Z_Z
        assert_eq!(state, tableau(&["+ZZ"]));
    }

    #[test]
    fn trace_out_uses_synthesized_third_axis() {
        // Y on qubit 1 in the last row is cleared by the product of the X and Z basis rows
        let mut state = tableau(&["+XX_", "+ZZ_", "-YY_"]);
        state.trace_out_qubit(1);
        assert_eq!(state.generators(), &["+__".parse::<StabilizerGenerator>().unwrap()]);
        assert_eq!(state.qubit_count(), 2);
    }

    #[test]
    fn bell_pair_reduces_to_empty_tableau() {
        let bell = tableau(&["+XX", "+ZZ"]);
        let reduced = bell.reduced_to_qubits(&[0]).unwrap();
        assert!(reduced.is_empty());
        assert_eq!(reduced.qubit_count(), 1);
    }

    #[test]
    fn reduction_examples() {
        let cases: [(&[&str], &[usize], &[&str]); 5] = [
            (&["+XXXX", "+ZZ__", "+_ZZ_", "+__ZZ"], &[1, 3], &["+ZZ"]),
            (&["-ZZZZ", "+XX__", "+_XX_", "+__XX"], &[1, 3], &["+XX"]),
            (&["-___X", "-ZXX_", "+XZ__", "-_ZZ_"], &[1, 2], &["-ZZ"]),
            (&["-___X", "+__Z_", "-ZX__", "+XZ__"], &[0, 1], &["-ZX", "+XZ"]),
            (&["-___X", "+__Z_", "-ZX__", "+XZ__"], &[1, 0], &["-XZ", "+ZX"]),
        ];
        for (input, wanted, expected) in cases {
            let reduced = tableau(input).reduced_to_qubits(wanted).unwrap();
            assert_eq!(reduced, tableau(expected), "{input:?} reduced to {wanted:?}");
        }
    }

    #[test]
    fn reduction_leaves_input_untouched() {
        let original = tableau(&["+XXXX", "+ZZ__", "+_ZZ_", "+__ZZ"]);
        let copy = original.clone();
        let _ = original.reduced_to_qubits(&[3]).unwrap();
        assert_eq!(original, copy);
    }

    #[test]
    fn reduction_reports_imaginary_phase() {
        // anti-commuting rows are not a stabilizer state
        let invalid = tableau(&["+XX", "+XZ"]);
        assert!(matches!(
            invalid.reduced_to_qubits(&[1]),
            Err(StabilizerError::NonRealPhase { .. })
        ));
    }

    #[test]
    fn reduction_rejects_bad_selection() {
        let state = tableau(&["+XX", "+ZZ"]);
        assert_eq!(
            state.reduced_to_qubits(&[2]),
            Err(StabilizerError::QubitOutOfRange { qubit: 2, qubit_count: 2 })
        );
        assert_eq!(
            state.reduced_to_qubits(&[1, 1]),
            Err(StabilizerError::DuplicateQubit { qubit: 1 })
        );
    }

    #[test]
    fn large_register() {
        let qubit_count = 200;
        let mut generators = vec![format!("+{}", "X".repeat(qubit_count))];
        for index in 0..qubit_count - 1 {
            generators.push(format!(
                "+{}ZZ{}",
                "_".repeat(index),
                "_".repeat(qubit_count - 2 - index)
            ));
        }
        let state = StabilizerTableau::from_strings(&generators).unwrap();
        let reduced = state.reduced_to_qubits(&[0, qubit_count - 1]).unwrap();
        assert_eq!(reduced, tableau(&["+ZZ"]));
    }

    #[test]
    fn text_round_trip() {
        let text = "+XX_\n-_ZZ\n+iY__";
        let parsed: StabilizerTableau = text.parse().unwrap();
        assert_eq!(parsed.to_string(), text);
        assert_eq!(parsed.qubit_count(), 3);
    }
}
