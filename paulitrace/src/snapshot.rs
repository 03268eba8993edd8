//! Decoding of the binary stabilizer snapshots written by the simulation engine.
//!
//! # Layout
//!
//! | bytes              | content                                         |
//! |--------------------|-------------------------------------------------|
//! | 11                 | [`SNAPSHOT_MAGIC`]                              |
//! | 8                  | total register qubits, `u64` little endian      |
//! | 8                  | number of specified qubits, `u64` little endian |
//! | 8 × specified      | specified qubit indices, `u64` little endian    |
//! | rest               | UTF-8, one signed Pauli string per line         |

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::SnapshotError;
use crate::reconstruction::{cleaned_density_matrix, single_entry, DensityMatrix, ProbabilisticPureState, StateVector};
use crate::selection::QubitSelection;
use crate::tableau::StabilizerTableau;

pub const SNAPSHOT_MAGIC: &[u8; 11] = b"selene-stim";

const WORD_SIZE: usize = std::mem::size_of::<u64>();

/// Stabilizer snapshot of a whole register together with the qubits the caller asked about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotState {
    total_qubits: usize,
    specified_qubits: Vec<usize>,
    tableau: StabilizerTableau,
}

impl SnapshotState {
    /// # Errors
    ///
    /// Returns a format error for malformed generators, and a selection error when
    /// `specified_qubits` repeats a qubit or addresses one outside the register.
    pub fn from_stabilizer_strings<Text: AsRef<str>>(
        generator_strings: impl IntoIterator<Item = Text>,
        specified_qubits: Vec<usize>,
    ) -> Result<Self, SnapshotError> {
        let tableau = StabilizerTableau::from_strings(generator_strings)?;
        Self::from_tableau(tableau, specified_qubits)
    }

    /// # Errors
    ///
    /// Returns a selection error when `specified_qubits` repeats a qubit or addresses one outside the register.
    pub fn from_tableau(tableau: StabilizerTableau, specified_qubits: Vec<usize>) -> Result<Self, SnapshotError> {
        QubitSelection::new(&specified_qubits, tableau.qubit_count())?;
        Ok(Self {
            total_qubits: tableau.qubit_count(),
            specified_qubits,
            tableau,
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let mut reader = ByteReader::new(bytes);
        if reader.take(SNAPSHOT_MAGIC.len())? != SNAPSHOT_MAGIC {
            return Err(SnapshotError::InvalidMagic);
        }
        let total_qubits = reader.read_length()?;
        let specified_count = reader.read_length()?;
        let specified_qubits = (0..specified_count)
            .map(|_| reader.read_length())
            .collect::<Result<Vec<_>, _>>()?;

        let text = std::str::from_utf8(reader.rest())?;
        let lines: Vec<&str> = text.lines().map(str::trim).filter(|line| !line.is_empty()).collect();
        if lines.len() != total_qubits {
            return Err(SnapshotError::GeneratorCountMismatch {
                total_qubits,
                found: lines.len(),
            });
        }
        let tableau = StabilizerTableau::from_strings(lines)?;
        if tableau.qubit_count() != total_qubits {
            return Err(SnapshotError::QubitCountMismatch {
                total_qubits,
                found: tableau.qubit_count(),
            });
        }
        let state = Self::from_tableau(tableau, specified_qubits)?;
        debug!(
            total_qubits,
            specified = state.specified_qubits.len(),
            "decoded stabilizer snapshot"
        );
        Ok(state)
    }

    pub fn from_reader(mut reader: impl Read) -> Result<Self, SnapshotError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }

    /// Reads a snapshot file, deleting it once read when `cleanup` is set.
    pub fn from_file(path: impl AsRef<Path>, cleanup: bool) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        if cleanup {
            std::fs::remove_file(path)?;
            debug!(path = %path.display(), "removed snapshot file");
        }
        Self::from_bytes(&bytes)
    }

    #[must_use]
    pub fn total_qubits(&self) -> usize {
        self.total_qubits
    }

    /// Qubits of interest, in the order results are laid out.
    #[must_use]
    pub fn specified_qubits(&self) -> &[usize] {
        &self.specified_qubits
    }

    /// Tableau of the full register.
    #[must_use]
    pub fn tableau(&self) -> &StabilizerTableau {
        &self.tableau
    }

    pub fn reduced_stabilizers(&self) -> Result<StabilizerTableau, SnapshotError> {
        Ok(self.tableau.reduced_to_qubits(&self.specified_qubits)?)
    }

    /// Reduced density matrix over the specified qubits, first specified qubit most significant.
    ///
    /// Entries whose real or imaginary part is below `zero_threshold` times the largest entry
    /// magnitude are reset to zero; pass `0.0` to keep the raw matrix.
    pub fn density_matrix(&self, zero_threshold: f64) -> Result<DensityMatrix, SnapshotError> {
        let density_matrix = self.reduced_stabilizers()?.as_density_matrix();
        Ok(cleaned_density_matrix(&density_matrix, zero_threshold))
    }

    pub fn state_vector_distribution(&self, zero_threshold: f64) -> Result<Vec<ProbabilisticPureState>, SnapshotError> {
        Ok(self.reduced_stabilizers()?.state_vector_distribution(zero_threshold))
    }

    /// State vector of the specified qubits, when they are not entangled with the rest of the register.
    pub fn single_state(&self, zero_threshold: f64) -> Result<StateVector, SnapshotError> {
        Ok(single_entry(self.state_vector_distribution(zero_threshold)?)?)
    }
}

struct ByteReader<'data> {
    data: &'data [u8],
    offset: usize,
}

impl<'data> ByteReader<'data> {
    fn new(data: &'data [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn take(&mut self, count: usize) -> Result<&'data [u8], SnapshotError> {
        let end = self.offset + count;
        let taken = self.data.get(self.offset..end).ok_or(SnapshotError::Truncated {
            expected: end,
            found: self.data.len(),
        })?;
        self.offset = end;
        Ok(taken)
    }

    fn read_u64(&mut self) -> Result<u64, SnapshotError> {
        let mut word = [0u8; WORD_SIZE];
        word.copy_from_slice(self.take(WORD_SIZE)?);
        Ok(u64::from_le_bytes(word))
    }

    fn read_length(&mut self) -> Result<usize, SnapshotError> {
        let value = self.read_u64()?;
        usize::try_from(value).map_err(|_| SnapshotError::TooManyQubits(value))
    }

    fn rest(&self) -> &'data [u8] {
        &self.data[self.offset..]
    }
}
