//! Classification of posture values into discrete posture states.
//!
//! Each posture value is compared against zero with a tolerance band. A
//! value inside the band could belong to either branch, so both are kept:
//! `k` ambiguous values produce `2^k` candidate states.

/// Bit-encoded posture: bit `N - 1 - i` holds the sign of posture value `i`
/// (`1` = negative), so value 0 is the most significant used bit.
pub type PostureState = u16;

/// Sign of one posture value relative to the tolerance band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostureSign {
    /// `x > tol`; encoded as bit 0.
    Positive,
    /// `x < -tol`; encoded as bit 1.
    Negative,
    /// `|x| <= tol`; both bits are possible.
    Ambiguous,
}

impl PostureSign {
    /// Classify `x` against the band `[-tol, tol]`.
    ///
    /// The band is closed: `x == tol` and `x == -tol` are ambiguous, and with
    /// `tol == 0` an exact zero still is.
    pub fn classify(x: f64, tol: f64) -> Self {
        if x > tol {
            Self::Positive
        } else if x < -tol {
            Self::Negative
        } else {
            Self::Ambiguous
        }
    }

    /// Sign stored in bit `bit` of `state`. Never [`PostureSign::Ambiguous`].
    pub const fn from_bit(state: PostureState, bit: u32) -> Self {
        if (state >> bit) & 1 == 1 {
            Self::Negative
        } else {
            Self::Positive
        }
    }
}

/// Enumerate every posture state consistent with `values` under `tol`.
///
/// States are built left to right from `{0}`: each value shifts all partial
/// states left; a negative value sets the new low bit on all of them, and an
/// ambiguous value appends a copy of the current set with the low bit set.
/// The result keeps that order and has `2^k` entries for `k` ambiguous values.
pub fn compute_posture_states<const N: usize>(values: &[f64; N], tol: f64) -> Vec<PostureState> {
    const { assert!(N <= PostureState::BITS as usize, "too many posture values") };

    let signs = values.map(|x| PostureSign::classify(x, tol));
    let ambiguous = signs
        .iter()
        .filter(|&&sign| sign == PostureSign::Ambiguous)
        .count();

    let mut states: Vec<PostureState> = Vec::with_capacity(1 << ambiguous);
    states.push(0);
    for sign in signs {
        for state in &mut states {
            *state <<= 1;
        }
        match sign {
            PostureSign::Positive => {}
            PostureSign::Negative => {
                for state in &mut states {
                    *state |= 1;
                }
            }
            PostureSign::Ambiguous => {
                let count = states.len();
                states.extend_from_within(..);
                for state in &mut states[count..] {
                    *state |= 1;
                }
            }
        }
    }
    states
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
