//! Pointcheval-Sanders credentials, the membership certificates shared by
//! the PS-based schemes (gl19, klap20, dl21, dl21seq).
//!
//! The issuer blindly signs the member's secret exponent `m` through its
//! commitment `tau = m·g`; a signature presents the randomized triple
//! `(t·sigma1, t·sigma2, m·t·sigma1)` whose validity is a public pairing
//! equation, so batches aggregate into a single multi-pairing.

use crate::curve::bls12381::{PairingCurve, Scalar, G1, G2, GT};
use crate::group::{Element, PairingCurve as PC};
use rand_core::RngCore;

/// Issuer secret: the two PS exponents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuerSecret {
    pub x: Scalar,
    pub y: Scalar,
}

/// Issuer public material: `(X̃, Ỹ) = (x·gg, y·gg)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuerPublic {
    pub xx: G2,
    pub yy: G2,
}

/// A PS credential on a member secret `m`:
/// `(sigma1, sigma2) = (r·g, r·(x·g + y·tau))` with `tau = m·g`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub sigma1: G1,
    pub sigma2: G1,
}

/// A randomized credential presentation. `bar = m·sigma1` lets verifiers
/// check `e(bar, Ỹ) + e(sigma1, X̃) = e(sigma2, gg)` without learning `m`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shown {
    pub sigma1: G1,
    pub sigma2: G1,
    pub bar: G1,
}

pub fn issuer_keygen<R: RngCore>(gg: &G2, rng: &mut R) -> (IssuerSecret, IssuerPublic) {
    let x = Scalar::rand(rng);
    let y = Scalar::rand(rng);
    let public = IssuerPublic {
        xx: gg.scaled(&x),
        yy: gg.scaled(&y),
    };
    (IssuerSecret { x, y }, public)
}

/// Issues a credential over the member's commitment `tau = m·g`. The
/// issuer never sees `m` itself.
pub fn issue<R: RngCore>(sk: &IssuerSecret, g: &G1, tau: &G1, rng: &mut R) -> Credential {
    let r = Scalar::rand(rng);
    let sigma1 = g.scaled(&r);
    let sigma2 = g.scaled(&sk.x).plus(&tau.scaled(&sk.y)).scaled(&r);
    Credential { sigma1, sigma2 }
}

/// Member-side validity check of a freshly issued credential.
pub fn credential_valid(cred: &Credential, m: &Scalar, gg: &G2, ipk: &IssuerPublic) -> bool {
    let left = PairingCurve::pair(&cred.sigma1, &ipk.xx.plus(&ipk.yy.scaled(m)));
    let right = PairingCurve::pair(&cred.sigma2, gg);
    left == right
}

/// Randomizes a credential for presentation inside a signature.
pub fn show<R: RngCore>(cred: &Credential, m: &Scalar, rng: &mut R) -> Shown {
    let t = Scalar::rand(rng);
    let sigma1 = cred.sigma1.scaled(&t);
    let sigma2 = cred.sigma2.scaled(&t);
    let bar = sigma1.scaled(m);
    Shown {
        sigma1,
        sigma2,
        bar,
    }
}

/// The public pairing check of one presentation:
/// `e(bar, Ỹ) + e(sigma1, X̃) - e(sigma2, gg) = 0`.
pub fn shown_valid(s: &Shown, gg: &G2, ipk: &IssuerPublic) -> bool {
    let mut neg_sigma2 = s.sigma2.clone();
    neg_sigma2.negate();
    let acc = PairingCurve::multi_pair(
        &[s.bar.clone(), s.sigma1.clone(), neg_sigma2],
        &[ipk.yy.clone(), ipk.xx.clone(), gg.clone()],
    );
    acc == GT::zero()
}

/// Aggregated pairing check for a batch of presentations: the per-item
/// equations are combined with random weights, so the whole batch costs
/// one three-term multi-pairing.
pub fn batch_shown_valid<R: RngCore>(
    shows: &[Shown],
    gg: &G2,
    ipk: &IssuerPublic,
    rng: &mut R,
) -> bool {
    if shows.is_empty() {
        return true;
    }
    let mut bars = G1::zero();
    let mut sigma1s = G1::zero();
    let mut sigma2s = G1::zero();
    for s in shows {
        let rho = Scalar::rand(rng);
        bars.add(&s.bar.scaled(&rho));
        sigma1s.add(&s.sigma1.scaled(&rho));
        sigma2s.add(&s.sigma2.scaled(&rho));
    }
    sigma2s.negate();
    let acc = PairingCurve::multi_pair(
        &[bars, sigma1s, sigma2s],
        &[ipk.yy.clone(), ipk.xx.clone(), gg.clone()],
    );
    acc == GT::zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    fn setup() -> (IssuerSecret, IssuerPublic, G1, G2) {
        let (sk, pk) = issuer_keygen(&G2::one(), &mut thread_rng());
        (sk, pk, G1::one(), G2::one())
    }

    #[test]
    fn issue_and_show() {
        let mut rng = thread_rng();
        let (sk, pk, g, gg) = setup();

        let m = Scalar::rand(&mut rng);
        let cred = issue(&sk, &g, &g.scaled(&m), &mut rng);
        assert!(credential_valid(&cred, &m, &gg, &pk));

        let shown = show(&cred, &m, &mut rng);
        assert!(shown_valid(&shown, &gg, &pk));

        // a presentation with a mismatched bar must not verify
        let mut bad = shown.clone();
        bad.bar = shown.sigma1.scaled(&Scalar::rand(&mut rng));
        assert!(!shown_valid(&bad, &gg, &pk));
    }

    #[test]
    fn batch_check() {
        let mut rng = thread_rng();
        let (sk, pk, g, gg) = setup();

        let mut shows = (0..4)
            .map(|_| {
                let m = Scalar::rand(&mut rng);
                let cred = issue(&sk, &g, &g.scaled(&m), &mut rng);
                show(&cred, &m, &mut rng)
            })
            .collect::<Vec<_>>();
        assert!(batch_shown_valid(&shows, &gg, &pk, &mut rng));

        shows[2].bar = G1::rand(&mut rng);
        assert!(!batch_shown_valid(&shows, &gg, &pk, &mut rng));
    }
}
