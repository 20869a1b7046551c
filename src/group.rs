//! Traits for operating on the groups of a bilinear pairing.
//!
//! These traits are the seam between the protocol code and the concrete
//! curve library: schemes only ever talk to `Element`, `Scalar`, `Point`
//! and `PairingCurve`, never to a curve backend directly.

use crate::error::EncodingError;
use rand_core::RngCore;
use std::fmt::{Debug, Display};

/// Element represents an element of a group with the additive notation
/// which is also equipped with a multiplication transformation.
/// Two implementations are for Scalar which forms a ring so RHS is the same
/// and Point which can be multiplied by a scalar of its prime field.
/// The pairing target group also implements it, with the group law written
/// additively and `mul` acting as exponentiation.
pub trait Element: Clone + Display + Debug + Eq + PartialEq + Send + Sync {
    /// The right-hand-side argument for multiplication
    type RHS;

    /// Returns the zero element of the group
    fn new() -> Self;

    /// Returns the one element of the group
    fn one() -> Self;

    /// Adds the RHS element to the LHS element in place
    fn add(&mut self, s2: &Self);

    /// Multiplies the LHS element by the RHS element in place
    fn mul(&mut self, mul: &Self::RHS);

    /// Replaces the element by its additive inverse
    fn negate(&mut self);

    /// Samples a random element using the provided RNG
    fn rand<R: RngCore>(rng: &mut R) -> Self;

    /// Returns the zero element of the group
    fn zero() -> Self {
        Self::new()
    }

    /// Returns `self * k` without mutating `self`
    fn scaled(&self, k: &Self::RHS) -> Self {
        let mut e = self.clone();
        e.mul(k);
        e
    }

    /// Returns `self + other` without mutating either
    fn plus(&self, other: &Self) -> Self {
        let mut e = self.clone();
        e.add(other);
        e
    }

    /// Returns `self - other` without mutating either
    fn minus(&self, other: &Self) -> Self {
        let mut neg = other.clone();
        neg.negate();
        neg.add(self);
        neg
    }
}

/// Canonical byte encoding of group elements. The encoding must be stable
/// and fixed-size per element type; import validates the element (curve
/// membership and subgroup checks included).
pub trait Encodable: Sized {
    /// The serialized size in bytes of an element
    fn marshal_len() -> usize;

    /// Serializes the element to its canonical compressed form
    fn marshal(&self) -> Vec<u8>;

    /// Replaces the element by the one encoded in `data`, validating it
    fn unmarshal(&mut self, data: &[u8]) -> Result<(), EncodingError>;
}

/// Scalar can be multiplied by only a Scalar, no other elements.
pub trait Scalar: Element<RHS = Self> + Encodable {
    fn set_int(&mut self, i: u64);
    fn inverse(&self) -> Option<Self>;
    fn sub(&mut self, other: &Self);
    /// Maps arbitrary bytes to a field element by modular reduction.
    /// Used by the Fiat-Shamir transform and the sequence chains.
    fn from_digest(bytes: &[u8]) -> Self;
}

/// Basic point functionality that can be multiplied by a scalar
pub trait Point: Element + Encodable {
    /// Maps the provided data to a group element
    fn map(&mut self, data: &[u8]) -> Result<(), EncodingError>;
}

/// A curve equipped with a bilinear pairing operation.
pub trait PairingCurve: Debug {
    type Scalar: Scalar<RHS = Self::Scalar>;

    type G1: Point<RHS = Self::Scalar>;

    type G2: Point<RHS = Self::Scalar>;

    type GT: Element<RHS = Self::Scalar> + Encodable;

    /// Performs a pairing operation between the 2 group elements
    fn pair(a: &Self::G1, b: &Self::G2) -> Self::GT;

    /// Computes the sum of `pair(a_i, b_i)` in one multi-pairing.
    /// Backends should override this with a single Miller loop.
    fn multi_pair(a: &[Self::G1], b: &[Self::G2]) -> Self::GT {
        let mut out = Self::GT::zero();
        for (x, y) in a.iter().zip(b.iter()) {
            out.add(&Self::pair(x, y));
        }
        out
    }
}
