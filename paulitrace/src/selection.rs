use sorted_iter::{assume::AssumeSortedByItemExt, SortedIterator};

use crate::error::{Result, StabilizerError};

/// Validated choice of qubits to keep, in the order the caller wants them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QubitSelection {
    requested: Vec<usize>,
    ascending: Vec<usize>,
    qubit_count: usize,
}

impl QubitSelection {
    /// # Errors
    ///
    /// Returns [`StabilizerError::QubitOutOfRange`] for indices not below `qubit_count` and
    /// [`StabilizerError::DuplicateQubit`] for indices requested twice.
    pub fn new(requested: &[usize], qubit_count: usize) -> Result<Self> {
        if let Some(&qubit) = requested.iter().find(|&&qubit| qubit >= qubit_count) {
            return Err(StabilizerError::QubitOutOfRange { qubit, qubit_count });
        }
        let mut ascending = requested.to_vec();
        ascending.sort_unstable();
        if let Some(pair) = ascending.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(StabilizerError::DuplicateQubit { qubit: pair[0] });
        }
        Ok(Self {
            requested: requested.to_vec(),
            ascending,
            qubit_count,
        })
    }

    #[must_use]
    pub fn requested(&self) -> &[usize] {
        &self.requested
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.requested.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requested.is_empty()
    }

    #[must_use]
    pub fn qubit_count(&self) -> usize {
        self.qubit_count
    }

    /// Qubits of the register that are not selected, ascending.
    #[must_use]
    pub fn unwanted(&self) -> Vec<usize> {
        complement(&self.ascending, self.qubit_count)
    }

    /// Column permutation taking the selected qubits from ascending order to requested order.
    ///
    /// Entry `j` is the ascending position of `requested[j]`, the layout expected by
    /// [`crate::StabilizerGenerator::permute_qubits`].
    #[must_use]
    pub fn permutation(&self) -> Vec<usize> {
        let mut by_qubit: Vec<usize> = (0..self.requested.len()).collect();
        by_qubit.sort_unstable_by_key(|&position| self.requested[position]);
        let mut permutation = vec![0; self.requested.len()];
        for (ascending_position, &requested_position) in by_qubit.iter().enumerate() {
            permutation[requested_position] = ascending_position;
        }
        permutation
    }

    /// Whether the requested order is already ascending, so no permutation is needed.
    #[must_use]
    pub fn is_ascending(&self) -> bool {
        self.requested == self.ascending
    }
}

/// Indices in `0..index_bound` that are not in the ascending slice `values`.
#[must_use]
pub fn complement(values: &[usize], index_bound: usize) -> Vec<usize> {
    debug_assert!(values.is_sorted_by(|a, b| a < b));
    let values = values.iter().copied().assume_sorted_by_item();
    (0..index_bound).difference(values).collect()
}

#[must_use]
pub fn is_identity_permutation(permutation: &[usize]) -> bool {
    permutation.iter().enumerate().all(|(index, &source)| index == source)
}
