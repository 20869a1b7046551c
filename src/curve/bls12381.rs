//! Group trait implementations for BLS12-381, wrapping arkworks types.

use crate::error::EncodingError;
use crate::group::{Element, Encodable, PairingCurve as PC, Point, Scalar as Sc};
use ark_bls12_381::{g1, g2, Bls12_381, Fr, G1Affine, G1Projective, G2Affine, G2Projective};
use ark_ec::hashing::{
    curve_maps::wb::WBMap, map_to_curve_hasher::MapToCurveBasedHasher, HashToCurve,
};
use ark_ec::pairing::{Pairing, PairingOutput};
use ark_ec::{AffineRepr, CurveGroup, PrimeGroup};
use ark_ff::{field_hashers::DefaultFieldHasher, Field, PrimeField, UniformRand};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::Zero;
use rand_core::RngCore;
use sha2::Sha256;
use std::fmt;
use std::ops::Neg;

/// Domain separation tags for hashing into the groups.
const G1_DST: &[u8] = b"GROUPSIG-BLS12381G1_XMD:SHA-256_SSWU_RO_";
const G2_DST: &[u8] = b"GROUPSIG-BLS12381G2_XMD:SHA-256_SSWU_RO_";

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Scalar(Fr);

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct G1(G1Projective);

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct G2(G2Projective);

/// An element of the pairing target group, in additive notation: `add` is
/// the group law and `mul` is exponentiation by a scalar.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GT(PairingOutput<Bls12_381>);

impl Element for Scalar {
    type RHS = Scalar;

    fn new() -> Self {
        Self(Fr::zero())
    }
    fn one() -> Self {
        Self(Fr::from(1u64))
    }
    fn add(&mut self, s2: &Self) {
        self.0 += s2.0;
    }
    fn mul(&mut self, mul: &Scalar) {
        self.0 *= mul.0;
    }
    fn negate(&mut self) {
        self.0 = self.0.neg();
    }
    fn rand<R: RngCore>(rng: &mut R) -> Self {
        Self(Fr::rand(rng))
    }
}

impl Encodable for Scalar {
    fn marshal_len() -> usize {
        32
    }
    fn marshal(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::marshal_len());
        self.0
            .serialize_compressed(&mut out)
            .expect("writing to a vector should not fail");
        out
    }
    fn unmarshal(&mut self, data: &[u8]) -> Result<(), EncodingError> {
        let fr = Fr::deserialize_compressed(data)
            .map_err(|e| EncodingError::InvalidElement(e.to_string()))?;
        self.0 = fr;
        Ok(())
    }
}

impl Sc for Scalar {
    fn set_int(&mut self, i: u64) {
        self.0 = Fr::from(i);
    }

    fn inverse(&self) -> Option<Self> {
        Some(Self(Field::inverse(&self.0)?))
    }

    fn sub(&mut self, other: &Self) {
        self.0 -= other.0;
    }

    fn from_digest(bytes: &[u8]) -> Self {
        Self(Fr::from_le_bytes_mod_order(bytes))
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{{:?}}}", self.0)
    }
}

impl Element for G1 {
    type RHS = Scalar;

    fn new() -> Self {
        Self(G1Projective::zero())
    }

    fn one() -> Self {
        Self(G1Projective::generator())
    }

    fn add(&mut self, s2: &Self) {
        self.0 += s2.0;
    }

    fn mul(&mut self, mul: &Scalar) {
        self.0 *= mul.0;
    }

    fn negate(&mut self) {
        self.0 = self.0.neg();
    }

    fn rand<R: RngCore>(rng: &mut R) -> Self {
        Self(G1Projective::rand(rng))
    }
}

impl Encodable for G1 {
    fn marshal_len() -> usize {
        48
    }
    fn marshal(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::marshal_len());
        self.0
            .into_affine()
            .serialize_compressed(&mut out)
            .expect("writing to a vector should not fail");
        out
    }
    fn unmarshal(&mut self, data: &[u8]) -> Result<(), EncodingError> {
        let affine = G1Affine::deserialize_compressed(data)
            .map_err(|e| EncodingError::InvalidElement(e.to_string()))?;
        self.0 = affine.into_group();
        Ok(())
    }
}

impl Point for G1 {
    fn map(&mut self, data: &[u8]) -> Result<(), EncodingError> {
        let hasher = MapToCurveBasedHasher::<
            G1Projective,
            DefaultFieldHasher<Sha256, 128>,
            WBMap<g1::Config>,
        >::new(G1_DST)
        .map_err(|e| EncodingError::InvalidElement(format!("{:?}", e)))?;
        let hash = hasher
            .hash(data)
            .map_err(|e| EncodingError::InvalidElement(format!("{:?}", e)))?;
        self.0 = hash.into_group();
        Ok(())
    }
}

impl fmt::Display for G1 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{{:?}}}", self.0)
    }
}

impl Element for G2 {
    type RHS = Scalar;

    fn new() -> Self {
        Self(G2Projective::zero())
    }

    fn one() -> Self {
        Self(G2Projective::generator())
    }

    fn add(&mut self, s2: &Self) {
        self.0 += s2.0;
    }

    fn mul(&mut self, mul: &Scalar) {
        self.0 *= mul.0;
    }

    fn negate(&mut self) {
        self.0 = self.0.neg();
    }

    fn rand<R: RngCore>(rng: &mut R) -> Self {
        Self(G2Projective::rand(rng))
    }
}

impl Encodable for G2 {
    fn marshal_len() -> usize {
        96
    }
    fn marshal(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::marshal_len());
        self.0
            .into_affine()
            .serialize_compressed(&mut out)
            .expect("writing to a vector should not fail");
        out
    }
    fn unmarshal(&mut self, data: &[u8]) -> Result<(), EncodingError> {
        let affine = G2Affine::deserialize_compressed(data)
            .map_err(|e| EncodingError::InvalidElement(e.to_string()))?;
        self.0 = affine.into_group();
        Ok(())
    }
}

impl Point for G2 {
    fn map(&mut self, data: &[u8]) -> Result<(), EncodingError> {
        let hasher = MapToCurveBasedHasher::<
            G2Projective,
            DefaultFieldHasher<Sha256, 128>,
            WBMap<g2::Config>,
        >::new(G2_DST)
        .map_err(|e| EncodingError::InvalidElement(format!("{:?}", e)))?;
        let hash = hasher
            .hash(data)
            .map_err(|e| EncodingError::InvalidElement(format!("{:?}", e)))?;
        self.0 = hash.into_group();
        Ok(())
    }
}

impl fmt::Display for G2 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{{:?}}}", self.0)
    }
}

impl Element for GT {
    type RHS = Scalar;

    fn new() -> Self {
        Self(PairingOutput::zero())
    }
    fn one() -> Self {
        Self(PairingOutput::generator())
    }
    fn add(&mut self, s2: &Self) {
        self.0 += s2.0;
    }
    fn mul(&mut self, mul: &Scalar) {
        self.0 *= mul.0;
    }
    fn negate(&mut self) {
        self.0 = self.0.neg();
    }
    fn rand<R: RngCore>(rng: &mut R) -> Self {
        Self(PairingOutput::rand(rng))
    }
}

impl Encodable for GT {
    fn marshal_len() -> usize {
        576
    }
    fn marshal(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::marshal_len());
        self.0
            .serialize_compressed(&mut out)
            .expect("writing to a vector should not fail");
        out
    }
    fn unmarshal(&mut self, data: &[u8]) -> Result<(), EncodingError> {
        let gt = PairingOutput::deserialize_compressed(data)
            .map_err(|e| EncodingError::InvalidElement(e.to_string()))?;
        self.0 = gt;
        Ok(())
    }
}

impl fmt::Display for GT {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{{:?}}}", self.0)
    }
}

#[derive(Clone, Debug)]
pub struct PairingCurve;

impl PC for PairingCurve {
    type Scalar = Scalar;
    type G1 = G1;
    type G2 = G2;
    type GT = GT;

    fn pair(a: &Self::G1, b: &Self::G2) -> Self::GT {
        GT(Bls12_381::pairing(a.0.into_affine(), b.0.into_affine()))
    }

    fn multi_pair(a: &[Self::G1], b: &[Self::G2]) -> Self::GT {
        let lhs = a.iter().map(|p| p.0.into_affine()).collect::<Vec<_>>();
        let rhs = b.iter().map(|p| p.0.into_affine()).collect::<Vec<_>>();
        GT(Bls12_381::multi_pairing(lhs, rhs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;
    use static_assertions::assert_impl_all;

    assert_impl_all!(G1: Encodable, Clone, Send, Sync);
    assert_impl_all!(G2: Encodable, Clone, Send, Sync);
    assert_impl_all!(GT: Encodable, Clone, Send, Sync);
    assert_impl_all!(Scalar: Encodable, Clone, Send, Sync);

    #[test]
    fn marshal_sizes() {
        assert_eq!(Scalar::one().marshal().len(), Scalar::marshal_len());
        assert_eq!(G1::one().marshal().len(), G1::marshal_len());
        assert_eq!(G2::one().marshal().len(), G2::marshal_len());
        assert_eq!(GT::one().marshal().len(), GT::marshal_len());
    }

    #[test]
    fn marshal_roundtrip() {
        let p = G1::rand(&mut thread_rng());
        let mut q = G1::new();
        q.unmarshal(&p.marshal()).unwrap();
        assert_eq!(p, q);

        let s = Scalar::rand(&mut thread_rng());
        let mut t = Scalar::new();
        t.unmarshal(&s.marshal()).unwrap();
        assert_eq!(s, t);
    }

    #[test]
    fn bilinearity() {
        let mut rng = thread_rng();
        let a = Scalar::rand(&mut rng);
        let b = Scalar::rand(&mut rng);

        // e(a*g1, b*g2) == e(g1, g2)^(a*b)
        let left = PairingCurve::pair(&G1::one().scaled(&a), &G2::one().scaled(&b));
        let mut ab = a.clone();
        ab.mul(&b);
        let right = PairingCurve::pair(&G1::one(), &G2::one()).scaled(&ab);
        assert_eq!(left, right);
    }

    #[test]
    fn multi_pair_matches_products() {
        let mut rng = thread_rng();
        let g1s = (0..3).map(|_| G1::rand(&mut rng)).collect::<Vec<_>>();
        let g2s = (0..3).map(|_| G2::rand(&mut rng)).collect::<Vec<_>>();

        let mut expected = GT::zero();
        for (a, b) in g1s.iter().zip(g2s.iter()) {
            expected.add(&PairingCurve::pair(a, b));
        }
        assert_eq!(PairingCurve::multi_pair(&g1s, &g2s), expected);
    }

    #[test]
    fn hash_to_group_is_deterministic() {
        let mut p1 = G1::new();
        p1.map(b"some input").unwrap();
        let mut p2 = G1::new();
        p2.map(b"some input").unwrap();
        assert_eq!(p1, p2);

        let mut p3 = G1::new();
        p3.map(b"some other input").unwrap();
        assert_ne!(p1, p3);
    }
}
