use thiserror::Error;

/// Errors raised while building, reducing or reconstructing a stabilizer tableau.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StabilizerError {
    /// Generator text does not start with one of `+`, `-`, `+i`, `-i`.
    #[error("unrecognized sign token in generator `{generator}`")]
    InvalidSign { generator: String },

    /// Generator text contains a character other than `X`, `Y`, `Z` or `_` after its sign.
    #[error("unrecognized Pauli character `{character}` in generator `{generator}`")]
    InvalidPauli { generator: String, character: char },

    #[error("generator {row} acts on {found} qubits, expected {expected}")]
    InconsistentLength { row: usize, expected: usize, found: usize },

    /// A generator that survived reduction carries a phase of ±i.
    #[error("generator `{generator}` has a non-real phase after reduction")]
    NonRealPhase { generator: String },

    #[error("reduced generator acts on {found} qubits, but {expected} were requested")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("qubit {qubit} is out of range for a register of {qubit_count} qubits")]
    QubitOutOfRange { qubit: usize, qubit_count: usize },

    #[error("qubit {qubit} is requested more than once")]
    DuplicateQubit { qubit: usize },

    /// The reduced density matrix does not have exactly one significant eigenvalue.
    #[error("not a pure state: {significant} significant eigenvalues")]
    NotPureState { significant: usize },
}

/// Errors raised while decoding a stabilizer snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to access snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid snapshot format: magic bytes do not match")]
    InvalidMagic,

    #[error("snapshot is truncated: needed {expected} bytes, found {found}")]
    Truncated { expected: usize, found: usize },

    #[error("qubit count {0} does not fit in memory")]
    TooManyQubits(u64),

    #[error("snapshot generators are not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("snapshot declares {total_qubits} qubits but contains {found} generators")]
    GeneratorCountMismatch { total_qubits: usize, found: usize },

    #[error("snapshot declares {total_qubits} qubits but its generators act on {found}")]
    QubitCountMismatch { total_qubits: usize, found: usize },

    #[error(transparent)]
    Stabilizer(#[from] StabilizerError),
}

pub type Result<T, E = StabilizerError> = std::result::Result<T, E>;
