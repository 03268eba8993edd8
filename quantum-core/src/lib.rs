use num_complex::Complex64;
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// All elements of a given type. Usually used for simple enums.
pub trait All<const NUM_ELEMENTS: usize>: Sized {
    fn all() -> [Self; NUM_ELEMENTS];
}

/// Character reserved for the one qubit identity in signed Pauli strings.
pub const IDENTITY_CHAR: char = '_';

/// Pauli matrices not equal to identity, also axes of the Bloch sphere.
/// See also [`PauliMatrix`].
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Eq, Ord, Hash, FromPrimitive, ToPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// Pauli X, also x axis of the Bloch sphere
    X = 0b001,
    /// Pauli Y, also y axis of the Bloch sphere
    Y = 0b011,
    /// Pauli Z, also z axis of the Bloch sphere
    Z = 0b010,
}

/// Pauli matrices on one qubit.
/// See also [`Axis`].
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Eq, Ord, Hash, FromPrimitive, ToPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PauliMatrix {
    /// One qubit identity matrix
    /// ```text
    /// |1 0|
    /// |0 1|
    /// ```
    I = 0b000,

    /// Pauli X
    /// ```text
    /// |0 1|
    /// |1 0|
    /// ```
    X = (Axis::X as isize),

    /// Pauli Y
    /// ```text
    /// |0 -i|
    /// |i  0|
    /// ```
    Y = (Axis::Y as isize),

    /// Pauli Z
    /// ```text
    /// |1  0|
    /// |0 -1|
    /// ```
    Z = (Axis::Z as isize),
}

/// Element of the cyclic group {+1, +i, -1, -i}, stored as quarter turns of the unit circle.
///
/// Addition is the group operation, so `a + b` is the phase of the product of two operators
/// carrying phases `a` and `b`.
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Eq, Ord, Hash, FromPrimitive, ToPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// +1
    #[default]
    RealPositive = 0,
    /// +i
    ImaginaryPositive = 1,
    /// -1
    RealNegative = 2,
    /// -i
    ImaginaryNegative = 3,
}

impl Phase {
    #[must_use]
    pub fn from_quarter_turns(quarter_turns: u8) -> Self {
        Phase::from_u8(quarter_turns & 0b11).unwrap_or_default()
    }

    #[must_use]
    pub fn quarter_turns(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn is_real(self) -> bool {
        self.quarter_turns() & 1 == 0
    }

    #[must_use]
    pub fn is_imaginary(self) -> bool {
        !self.is_real()
    }

    #[must_use]
    pub fn as_complex(self) -> Complex64 {
        match self {
            Phase::RealPositive => Complex64::new(1.0, 0.0),
            Phase::ImaginaryPositive => Complex64::new(0.0, 1.0),
            Phase::RealNegative => Complex64::new(-1.0, 0.0),
            Phase::ImaginaryNegative => Complex64::new(0.0, -1.0),
        }
    }

    /// Sign token used as the prefix of a signed Pauli string.
    #[must_use]
    pub fn sign_token(self) -> &'static str {
        match self {
            Phase::RealPositive => "+",
            Phase::ImaginaryPositive => "+i",
            Phase::RealNegative => "-",
            Phase::ImaginaryNegative => "-i",
        }
    }

    /// Splits a leading sign token off `text`.
    ///
    /// Returns `None` when `text` does not start with one of `+`, `-`, `+i`, `-i`.
    #[must_use]
    pub fn split_sign_token(text: &str) -> Option<(Phase, &str)> {
        // longest tokens first, "+i" also starts with "+"
        const TOKENS: [(&str, Phase); 4] = [
            ("+i", Phase::ImaginaryPositive),
            ("-i", Phase::ImaginaryNegative),
            ("+", Phase::RealPositive),
            ("-", Phase::RealNegative),
        ];
        TOKENS
            .iter()
            .find_map(|(token, phase)| text.strip_prefix(*token).map(|remainder| (*phase, remainder)))
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.sign_token())
    }
}

impl Add for Phase {
    type Output = Phase;

    #[inline]
    fn add(self, rhs: Phase) -> Self::Output {
        Phase::from_quarter_turns(self.quarter_turns() + rhs.quarter_turns())
    }
}

impl AddAssign for Phase {
    #[inline]
    fn add_assign(&mut self, rhs: Phase) {
        *self = *self + rhs;
    }
}

/// Group inverse: swaps +i and -i, leaves +1 and -1 in place.
impl Neg for Phase {
    type Output = Phase;

    #[inline]
    fn neg(self) -> Self::Output {
        Phase::from_quarter_turns(4 - self.quarter_turns())
    }
}

impl Sub for Phase {
    type Output = Phase;

    #[inline]
    fn sub(self, rhs: Phase) -> Self::Output {
        self + (-rhs)
    }
}

impl std::iter::Sum for Phase {
    fn sum<Phases: Iterator<Item = Phase>>(phases: Phases) -> Self {
        phases.fold(Phase::RealPositive, Add::add)
    }
}

impl PauliMatrix {
    /// Product `self · rhs` as a Pauli matrix and the phase correction it picks up.
    ///
    /// ```
    /// use quantum_core::{PauliMatrix, Phase};
    /// assert_eq!(PauliMatrix::X.product(PauliMatrix::Y), (PauliMatrix::Z, Phase::ImaginaryPositive));
    /// assert_eq!(PauliMatrix::Y.product(PauliMatrix::X), (PauliMatrix::Z, Phase::ImaginaryNegative));
    /// ```
    #[must_use]
    pub fn product(self, rhs: PauliMatrix) -> (PauliMatrix, Phase) {
        use PauliMatrix::{I, X, Y, Z};
        match (self, rhs) {
            (I, other) | (other, I) => (other, Phase::RealPositive),
            (X, X) | (Y, Y) | (Z, Z) => (I, Phase::RealPositive),
            (X, Y) => (Z, Phase::ImaginaryPositive),
            (Y, Z) => (X, Phase::ImaginaryPositive),
            (Z, X) => (Y, Phase::ImaginaryPositive),
            (Y, X) => (Z, Phase::ImaginaryNegative),
            (Z, Y) => (X, Phase::ImaginaryNegative),
            (X, Z) => (Y, Phase::ImaginaryNegative),
        }
    }

    #[must_use]
    pub fn is_identity(self) -> bool {
        self == PauliMatrix::I
    }

    #[must_use]
    pub fn axis(self) -> Option<Axis> {
        match self {
            PauliMatrix::I => None,
            PauliMatrix::X => Some(Axis::X),
            PauliMatrix::Y => Some(Axis::Y),
            PauliMatrix::Z => Some(Axis::Z),
        }
    }

    #[must_use]
    pub fn from_char(character: char) -> Option<Self> {
        match character {
            IDENTITY_CHAR => Some(PauliMatrix::I),
            'X' => Some(PauliMatrix::X),
            'Y' => Some(PauliMatrix::Y),
            'Z' => Some(PauliMatrix::Z),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            PauliMatrix::I => IDENTITY_CHAR,
            PauliMatrix::X => 'X',
            PauliMatrix::Y => 'Y',
            PauliMatrix::Z => 'Z',
        }
    }

    /// Row-major entries of the 2×2 matrix.
    #[must_use]
    pub fn entries(self) -> [[Complex64; 2]; 2] {
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        let i = Complex64::new(0.0, 1.0);
        match self {
            PauliMatrix::I => [[one, zero], [zero, one]],
            PauliMatrix::X => [[zero, one], [one, zero]],
            PauliMatrix::Y => [[zero, -i], [i, zero]],
            PauliMatrix::Z => [[one, zero], [zero, -one]],
        }
    }
}

impl Mul for PauliMatrix {
    type Output = (PauliMatrix, Phase);

    #[inline]
    fn mul(self, rhs: PauliMatrix) -> Self::Output {
        self.product(rhs)
    }
}

impl std::fmt::Display for PauliMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl Axis {
    /// The axis completing `self` and `other` to {X, Y, Z}, `None` when both are the same axis.
    #[must_use]
    pub fn third(self, other: Axis) -> Option<Axis> {
        PauliMatrix::from(self).product(PauliMatrix::from(other)).0.axis()
    }
}

impl From<Axis> for PauliMatrix {
    fn from(axis: Axis) -> Self {
        match axis {
            Axis::X => PauliMatrix::X,
            Axis::Y => PauliMatrix::Y,
            Axis::Z => PauliMatrix::Z,
        }
    }
}

impl All<4> for PauliMatrix {
    fn all() -> [PauliMatrix; 4] {
        [PauliMatrix::I, PauliMatrix::X, PauliMatrix::Y, PauliMatrix::Z]
    }
}

impl All<3> for Axis {
    fn all() -> [Axis; 3] {
        [Axis::X, Axis::Y, Axis::Z]
    }
}

impl All<4> for Phase {
    fn all() -> [Phase; 4] {
        [
            Phase::RealPositive,
            Phase::ImaginaryPositive,
            Phase::RealNegative,
            Phase::ImaginaryNegative,
        ]
    }
}
