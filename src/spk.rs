//! Fiat-Shamir transformed Σ-protocols.
//!
//! [`rep_sign`] proves knowledge of scalars `x_j` satisfying a system of
//! representation equations `Y_k = Σ x_j · B_b` over a single group; it
//! covers every uniform proof in the library (pseudonym ownership, link
//! and equality proofs, opening proofs). Schemes whose relations span
//! several groups assemble their transcripts by hand with [`Transcript`]
//! and keep only the (challenge, responses) pair, so every proof
//! serializes the same way.

use crate::curve::bls12381::Scalar;
use crate::error::{EncodingError, GroupsigError, GroupsigResult};
use crate::group::{Element, Encodable, Scalar as _};
use crate::wire::{Reader, Writer};
use rand_core::RngCore;
use sha2::{Digest, Sha256};

/// A non-interactive proof transcript: the challenge scalar plus one
/// response scalar per committed witness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpkRep {
    pub c: Scalar,
    pub s: Vec<Scalar>,
}

impl SpkRep {
    pub fn write_to(&self, w: &mut Writer) {
        w.put_element(&self.c);
        for s in &self.s {
            w.put_element(s);
        }
    }

    /// Reads a transcript with `n` response scalars.
    pub fn read_from(r: &mut Reader, n: usize) -> Result<Self, EncodingError> {
        let c = r.get_element::<Scalar>("spk challenge")?;
        let mut s = Vec::with_capacity(n);
        for _ in 0..n {
            s.push(r.get_element::<Scalar>("spk response")?);
        }
        Ok(SpkRep { c, s })
    }
}

/// Accumulates the byte material hashed into a Fiat-Shamir challenge.
/// Every chunk is length-prefixed so transcripts cannot collide across
/// different chunk boundaries.
pub struct Transcript {
    hasher: Sha256,
}

impl Transcript {
    pub fn new(domain: &'static [u8]) -> Self {
        let mut t = Transcript {
            hasher: Sha256::new(),
        };
        t.append(domain);
        t
    }

    pub fn append(&mut self, chunk: &[u8]) {
        self.hasher.update(&(chunk.len() as u64).to_le_bytes());
        self.hasher.update(chunk);
    }

    pub fn append_element<E: Encodable>(&mut self, e: &E) {
        self.append(&e.marshal());
    }

    pub fn challenge(self) -> Scalar {
        Scalar::from_digest(&self.hasher.finalize())
    }
}

/// Proves knowledge of `witnesses` such that for every statement `k`,
/// `statements[k] = Σ_{(b, j) ∈ terms[k]} witnesses[j] · bases[b]`.
///
/// The challenge binds the bases, the statements, the first-round
/// commitments and the caller's context chunks, in that order.
pub fn rep_sign<E, R>(
    domain: &'static [u8],
    bases: &[E],
    statements: &[E],
    terms: &[&[(usize, usize)]],
    witnesses: &[&Scalar],
    context: &[&[u8]],
    rng: &mut R,
) -> GroupsigResult<SpkRep>
where
    E: Element<RHS = Scalar> + Encodable,
    R: RngCore,
{
    if statements.len() != terms.len() {
        return Err(GroupsigError::InvalidArgument(
            "statement and term counts differ",
        ));
    }
    check_indices(bases.len(), witnesses.len(), terms)?;

    let rs = witnesses
        .iter()
        .map(|_| Scalar::rand(rng))
        .collect::<Vec<_>>();

    let mut commits = Vec::with_capacity(statements.len());
    for stmt_terms in terms {
        let mut cmt = E::zero();
        for &(b, j) in stmt_terms.iter() {
            cmt.add(&bases[b].scaled(&rs[j]));
        }
        commits.push(cmt);
    }

    let c = rep_challenge(domain, bases, statements, &commits, context);

    let s = rs
        .iter()
        .zip(witnesses.iter())
        .map(|(r, x)| {
            let mut s = x.scaled(&c);
            s.add(r);
            s
        })
        .collect();

    Ok(SpkRep { c, s })
}

/// Verifies a proof produced by [`rep_sign`] over the same system.
pub fn rep_verify<E>(
    domain: &'static [u8],
    pi: &SpkRep,
    bases: &[E],
    statements: &[E],
    terms: &[&[(usize, usize)]],
    context: &[&[u8]],
) -> GroupsigResult<bool>
where
    E: Element<RHS = Scalar> + Encodable,
{
    if statements.len() != terms.len() {
        return Err(GroupsigError::InvalidArgument(
            "statement and term counts differ",
        ));
    }
    check_indices(bases.len(), pi.s.len(), terms)?;

    // recompute the commitments as Σ s_j·B_b - c·Y_k
    let mut commits = Vec::with_capacity(statements.len());
    for (stmt, stmt_terms) in statements.iter().zip(terms.iter()) {
        let mut cmt = E::zero();
        for &(b, j) in stmt_terms.iter() {
            cmt.add(&bases[b].scaled(&pi.s[j]));
        }
        let mut shift = stmt.scaled(&pi.c);
        shift.negate();
        cmt.add(&shift);
        commits.push(cmt);
    }

    let c = rep_challenge(domain, bases, statements, &commits, context);
    Ok(c == pi.c)
}

fn rep_challenge<E>(
    domain: &'static [u8],
    bases: &[E],
    statements: &[E],
    commits: &[E],
    context: &[&[u8]],
) -> Scalar
where
    E: Element<RHS = Scalar> + Encodable,
{
    let mut t = Transcript::new(domain);
    for b in bases {
        t.append_element(b);
    }
    for y in statements {
        t.append_element(y);
    }
    for r in commits {
        t.append_element(r);
    }
    for chunk in context {
        t.append(chunk);
    }
    t.challenge()
}

fn check_indices(
    n_bases: usize,
    n_witnesses: usize,
    terms: &[&[(usize, usize)]],
) -> GroupsigResult<()> {
    for stmt_terms in terms {
        for &(b, j) in stmt_terms.iter() {
            if b >= n_bases || j >= n_witnesses {
                return Err(GroupsigError::InvalidArgument(
                    "spk term index out of range",
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::bls12381::G1;
    use rand::prelude::*;

    const DOMAIN: &[u8] = b"spk-test";

    #[test]
    fn discrete_log_proof() {
        let mut rng = thread_rng();
        let x = Scalar::rand(&mut rng);
        let g = G1::one();
        let y = g.scaled(&x);

        let pi = rep_sign(
            DOMAIN,
            &[g.clone()],
            &[y.clone()],
            &[&[(0, 0)]],
            &[&x],
            &[b"ctx"],
            &mut rng,
        )
        .unwrap();

        assert!(rep_verify(DOMAIN, &pi, &[g.clone()], &[y.clone()], &[&[(0, 0)]], &[b"ctx"]).unwrap());
        // context is bound into the challenge
        assert!(!rep_verify(DOMAIN, &pi, &[g], &[y], &[&[(0, 0)]], &[b"other"]).unwrap());
    }

    #[test]
    fn shared_witness_across_statements() {
        let mut rng = thread_rng();
        let x = Scalar::rand(&mut rng);
        let g = G1::one();
        let h = G1::rand(&mut rng);
        let y1 = g.scaled(&x);
        let y2 = h.scaled(&x);

        let bases = [g, h];
        let statements = [y1, y2];
        let terms: [&[(usize, usize)]; 2] = [&[(0, 0)], &[(1, 0)]];

        let pi = rep_sign(DOMAIN, &bases, &statements, &terms, &[&x], &[], &mut rng).unwrap();
        assert!(rep_verify(DOMAIN, &pi, &bases, &statements, &terms, &[]).unwrap());

        // a proof for a different witness must not verify
        let other = Scalar::rand(&mut rng);
        let forged = [bases[0].scaled(&other), statements[1].clone()];
        assert!(!rep_verify(DOMAIN, &pi, &bases, &forged, &terms, &[]).unwrap());
    }

    #[test]
    fn tampered_response_fails() {
        let mut rng = thread_rng();
        let x = Scalar::rand(&mut rng);
        let g = G1::one();
        let y = g.scaled(&x);

        let mut pi = rep_sign(DOMAIN, &[g.clone()], &[y.clone()], &[&[(0, 0)]], &[&x], &[], &mut rng)
            .unwrap();
        pi.s[0].add(&Scalar::one());
        assert!(!rep_verify(DOMAIN, &pi, &[g], &[y], &[&[(0, 0)]], &[]).unwrap());
    }
}
