//! DL21SEQ: DL21 with sequential linkability.
//!
//! The `seed` passed to sign is the position of the signature in a
//! per-(member, scope) sequence. Position `i` carries a commitment to the
//! `i`-th value of a hash chain seeded by the member secret and the
//! scope, so a seqlink proof can show that a set of signatures was
//! produced in consecutive order, and verifiers reject reordered,
//! skipped or substituted positions.

use crate::curve::bls12381::{Scalar, G1};
use crate::error::{EncodingError, GroupsigError, GroupsigResult};
use crate::group::{Element, Encodable, Point};
use crate::message::Message;
use crate::schemes::ps;
use crate::spk::{self, SpkRep, Transcript};
use crate::sysenv;
use crate::wire::{Reader, Writer};
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;
use sha2::{Digest, Sha256};

pub use crate::schemes::dl21::{join_mem, join_mgr, setup, Dl21GroupKey, Dl21ManagerKey, Dl21MemberKey};

const SIGN_DOMAIN: &[u8] = b"groupsig-dl21seq-sign";
const CLAIM_DOMAIN: &[u8] = b"groupsig-dl21seq-claim";
const EQUALITY_DOMAIN: &[u8] = b"groupsig-dl21seq-proveeq";
const LINK_DOMAIN: &[u8] = b"groupsig-dl21seq-link";
const SEQLINK_DOMAIN: &[u8] = b"groupsig-dl21seq-seqlink";
const CHAIN_SEED_DOMAIN: &[u8] = b"groupsig-dl21seq-chain-seed";
const CHAIN_STEP_DOMAIN: &[u8] = b"groupsig-dl21seq-chain-step";

/// Upper bound on sequence positions; walking the chain is linear in the
/// position.
const MAX_SEQ: u64 = 1 << 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dl21SeqSignature {
    pub nym: G1,
    pub sigma1: G1,
    pub sigma2: G1,
    pub bar: G1,
    /// Commitment `k_seq · g` to the chain value at this position.
    pub c: G1,
    /// Position of this signature in its scope's sequence.
    pub seq: u64,
    pub pi: SpkRep,
}

/// Claim, equality, link and seqlink proofs. `ks` holds the disclosed
/// chain run for seqlink proofs and stays empty otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dl21SeqProof {
    pub ks: Vec<Scalar>,
    pub pi: SpkRep,
}

impl Dl21SeqSignature {
    pub(crate) fn write_body(&self, w: &mut Writer) {
        w.put_element(&self.nym);
        w.put_element(&self.sigma1);
        w.put_element(&self.sigma2);
        w.put_element(&self.bar);
        w.put_element(&self.c);
        w.put_u64(self.seq);
        self.pi.write_to(w);
    }

    pub(crate) fn read_body(r: &mut Reader) -> Result<Self, EncodingError> {
        Ok(Dl21SeqSignature {
            nym: r.get_element("nym")?,
            sigma1: r.get_element("sigma1")?,
            sigma2: r.get_element("sigma2")?,
            bar: r.get_element("bar")?,
            c: r.get_element("c")?,
            seq: r.get_u64("seq")?,
            pi: SpkRep::read_from(r, 2)?,
        })
    }

    pub(crate) fn body_bytes(&self) -> Vec<u8> {
        let mut w = Writer::new();
        self.write_body(&mut w);
        w.finish()
    }

    fn shown(&self) -> ps::Shown {
        ps::Shown {
            sigma1: self.sigma1.clone(),
            sigma2: self.sigma2.clone(),
            bar: self.bar.clone(),
        }
    }
}

impl Dl21SeqProof {
    pub(crate) fn write_body(&self, w: &mut Writer) {
        w.put_u64(self.ks.len() as u64);
        for k in &self.ks {
            w.put_element(k);
        }
        self.pi.write_to(w);
    }

    pub(crate) fn read_body(r: &mut Reader) -> Result<Self, EncodingError> {
        let n = r.get_u64("chain run length")?;
        let mut ks = Vec::with_capacity(n as usize);
        for _ in 0..n {
            ks.push(r.get_element::<Scalar>("chain value")?);
        }
        let c = r.get_element::<Scalar>("proof challenge")?;
        let mut s = Vec::new();
        while r.remaining() > 0 {
            s.push(r.get_element::<Scalar>("proof response")?);
        }
        Ok(Dl21SeqProof {
            ks,
            pi: SpkRep { c, s },
        })
    }
}

fn scope_base(scope: &str) -> GroupsigResult<G1> {
    let mut h = G1::new();
    h.map(scope.as_bytes())?;
    Ok(h)
}

/// First chain value for a (member, scope) pair.
fn chain_seed(y: &Scalar, scope: &str) -> Scalar {
    let mut t = Transcript::new(CHAIN_SEED_DOMAIN);
    t.append(&y.marshal());
    t.append(scope.as_bytes());
    t.challenge()
}

/// The one-way transformation taking position `i` to position `i + 1`.
fn chain_next(k: &Scalar) -> Scalar {
    let mut t = Transcript::new(CHAIN_STEP_DOMAIN);
    t.append(&k.marshal());
    t.challenge()
}

/// Chain value at position `seq` (1-based).
fn chain_at(y: &Scalar, scope: &str, seq: u64) -> GroupsigResult<Scalar> {
    if seq == 0 || seq > MAX_SEQ {
        return Err(GroupsigError::InvalidArgument(
            "sequence position out of range",
        ));
    }
    let mut k = chain_seed(y, scope);
    for _ in 1..seq {
        k = chain_next(&k);
    }
    Ok(k)
}

/// Signs at sequence position `seed` (mandatory for this scheme); the
/// same seed also fixes the signature randomness.
pub fn sign(
    msg: &Message,
    memkey: &Dl21MemberKey,
    grpkey: &Dl21GroupKey,
    seed: Option<u64>,
) -> GroupsigResult<Dl21SeqSignature> {
    let (y, cred) = memkey.complete()?;
    let seq = seed.ok_or(GroupsigError::InvalidArgument(
        "sequential scheme requires a sequence seed",
    ))?;
    let scoped = msg.scoped()?;

    // Deterministic per (member, message, position): reproducible as the
    // seed contract requires, without reusing randomizers across scopes.
    let mut hasher = Sha256::new();
    hasher.update(b"groupsig-dl21seq-rng");
    hasher.update(&seq.to_le_bytes());
    hasher.update(&y.marshal());
    hasher.update(&msg.bytes);
    let mut rng = ChaCha20Rng::from_seed(hasher.finalize().into());

    let h_scope = scope_base(&scoped.scope)?;
    let nym = h_scope.scaled(y);
    let k = chain_at(y, &scoped.scope, seq)?;
    let c = grpkey.g.scaled(&k);
    let shown = ps::show(cred, y, &mut rng);

    let pi = spk::rep_sign(
        SIGN_DOMAIN,
        &[shown.sigma1.clone(), h_scope, grpkey.g.clone()],
        &[shown.bar.clone(), nym.clone(), c.clone()],
        &[&[(0, 0)], &[(1, 0)], &[(2, 1)]],
        &[y, &k],
        &[
            &grpkey.body_bytes(),
            &shown.sigma2.marshal(),
            &msg.bytes,
            &seq.to_le_bytes(),
        ],
        &mut rng,
    )?;

    Ok(Dl21SeqSignature {
        nym,
        sigma1: shown.sigma1,
        sigma2: shown.sigma2,
        bar: shown.bar,
        c,
        seq,
        pi,
    })
}

pub fn verify(
    sig: &Dl21SeqSignature,
    msg: &Message,
    grpkey: &Dl21GroupKey,
) -> GroupsigResult<bool> {
    let scoped = msg.scoped()?;
    let h_scope = scope_base(&scoped.scope)?;

    if !ps::shown_valid(&sig.shown(), &grpkey.gg, &grpkey.ipk()) {
        return Ok(false);
    }

    spk::rep_verify(
        SIGN_DOMAIN,
        &sig.pi,
        &[sig.sigma1.clone(), h_scope, grpkey.g.clone()],
        &[sig.bar.clone(), sig.nym.clone(), sig.c.clone()],
        &[&[(0, 0)], &[(1, 0)], &[(2, 1)]],
        &[
            &grpkey.body_bytes(),
            &sig.sigma2.marshal(),
            &msg.bytes,
            &sig.seq.to_le_bytes(),
        ],
    )
}

pub fn verify_batch(
    sigs: &[&Dl21SeqSignature],
    msgs: &[&Message],
    grpkey: &Dl21GroupKey,
) -> GroupsigResult<bool> {
    if sigs.len() != msgs.len() {
        return Err(GroupsigError::InvalidArgument(
            "signature and message counts differ",
        ));
    }
    let mut shows = Vec::with_capacity(sigs.len());
    for (&sig, &msg) in sigs.iter().zip(msgs.iter()) {
        let scoped = msg.scoped()?;
        let h_scope = scope_base(&scoped.scope)?;
        let ok = spk::rep_verify(
            SIGN_DOMAIN,
            &sig.pi,
            &[sig.sigma1.clone(), h_scope, grpkey.g.clone()],
            &[sig.bar.clone(), sig.nym.clone(), sig.c.clone()],
            &[&[(0, 0)], &[(1, 0)], &[(2, 1)]],
            &[
                &grpkey.body_bytes(),
                &sig.sigma2.marshal(),
                &msg.bytes,
                &sig.seq.to_le_bytes(),
            ],
        )?;
        if !ok {
            return Ok(false);
        }
        shows.push(sig.shown());
    }
    let mut rng = sysenv::operation_rng(None)?;
    Ok(ps::batch_shown_valid(
        &shows,
        &grpkey.gg,
        &grpkey.ipk(),
        &mut rng,
    ))
}

pub fn identify(
    grpkey: &Dl21GroupKey,
    memkey: &Dl21MemberKey,
    sig: &Dl21SeqSignature,
    msg: &Message,
) -> GroupsigResult<bool> {
    let _ = grpkey;
    let (y, _) = memkey.complete()?;
    let scoped = msg.scoped()?;
    let h_scope = scope_base(&scoped.scope)?;
    Ok(sig.nym == h_scope.scaled(y))
}

pub fn claim(
    memkey: &Dl21MemberKey,
    grpkey: &Dl21GroupKey,
    sig: &Dl21SeqSignature,
) -> GroupsigResult<Dl21SeqProof> {
    let (y, _) = memkey.complete()?;
    if sig.bar != sig.sigma1.scaled(y) {
        return Err(GroupsigError::Fail(
            "signature was not produced by this member key",
        ));
    }
    let mut rng = sysenv::operation_rng(None)?;
    let pi = spk::rep_sign(
        CLAIM_DOMAIN,
        &[sig.sigma1.clone()],
        &[sig.bar.clone()],
        &[&[(0, 0)]],
        &[y],
        &[&grpkey.body_bytes(), &sig.body_bytes()],
        &mut rng,
    )?;
    Ok(Dl21SeqProof { ks: Vec::new(), pi })
}

pub fn claim_verify(
    proof: &Dl21SeqProof,
    sig: &Dl21SeqSignature,
    grpkey: &Dl21GroupKey,
) -> GroupsigResult<bool> {
    if !proof.ks.is_empty() {
        return Ok(false);
    }
    spk::rep_verify(
        CLAIM_DOMAIN,
        &proof.pi,
        &[sig.sigma1.clone()],
        &[sig.bar.clone()],
        &[&[(0, 0)]],
        &[&grpkey.body_bytes(), &sig.body_bytes()],
    )
}

pub fn prove_equality(
    memkey: &Dl21MemberKey,
    grpkey: &Dl21GroupKey,
    sigs: &[&Dl21SeqSignature],
) -> GroupsigResult<Dl21SeqProof> {
    let (y, _) = memkey.complete()?;
    if sigs.is_empty() {
        return Err(GroupsigError::InvalidArgument("no signatures to prove"));
    }
    for sig in sigs {
        if sig.bar != sig.sigma1.scaled(y) {
            return Err(GroupsigError::Fail(
                "signature was not produced by this member key",
            ));
        }
    }

    let bases = sigs.iter().map(|s| s.sigma1.clone()).collect::<Vec<_>>();
    let statements = sigs.iter().map(|s| s.bar.clone()).collect::<Vec<_>>();
    let terms = (0..sigs.len()).map(|i| vec![(i, 0)]).collect::<Vec<_>>();
    let term_refs = terms.iter().map(|t| t.as_slice()).collect::<Vec<_>>();
    let sig_bytes = sigs.iter().map(|s| s.body_bytes()).collect::<Vec<_>>();
    let grp_bytes = grpkey.body_bytes();
    let mut context = vec![grp_bytes.as_slice()];
    context.extend(sig_bytes.iter().map(|b| b.as_slice()));

    let mut rng = sysenv::operation_rng(None)?;
    let pi = spk::rep_sign(
        EQUALITY_DOMAIN,
        &bases,
        &statements,
        &term_refs,
        &[y],
        &context,
        &mut rng,
    )?;
    Ok(Dl21SeqProof { ks: Vec::new(), pi })
}

pub fn prove_equality_verify(
    proof: &Dl21SeqProof,
    grpkey: &Dl21GroupKey,
    sigs: &[&Dl21SeqSignature],
) -> GroupsigResult<bool> {
    if sigs.is_empty() {
        return Err(GroupsigError::InvalidArgument("no signatures to check"));
    }
    if !proof.ks.is_empty() {
        return Ok(false);
    }
    let bases = sigs.iter().map(|s| s.sigma1.clone()).collect::<Vec<_>>();
    let statements = sigs.iter().map(|s| s.bar.clone()).collect::<Vec<_>>();
    let terms = (0..sigs.len()).map(|i| vec![(i, 0)]).collect::<Vec<_>>();
    let term_refs = terms.iter().map(|t| t.as_slice()).collect::<Vec<_>>();
    let sig_bytes = sigs.iter().map(|s| s.body_bytes()).collect::<Vec<_>>();
    let grp_bytes = grpkey.body_bytes();
    let mut context = vec![grp_bytes.as_slice()];
    context.extend(sig_bytes.iter().map(|b| b.as_slice()));

    spk::rep_verify(
        EQUALITY_DOMAIN,
        &proof.pi,
        &bases,
        &statements,
        &term_refs,
        &context,
    )
}

pub fn link(
    grpkey: &Dl21GroupKey,
    memkey: &Dl21MemberKey,
    msg: &Message,
    sigs: &[&Dl21SeqSignature],
    msgs: &[&Message],
) -> GroupsigResult<Dl21SeqProof> {
    let (y, _) = memkey.complete()?;
    if sigs.is_empty() || sigs.len() != msgs.len() {
        return Err(GroupsigError::InvalidArgument(
            "signature and message counts differ",
        ));
    }
    for (&sig, &sig_msg) in sigs.iter().zip(msgs.iter()) {
        if !verify(sig, sig_msg, grpkey)? || !identify(grpkey, memkey, sig, sig_msg)? {
            return Err(GroupsigError::Fail(
                "signatures are not all attributable to this member",
            ));
        }
    }

    let mut bases = Vec::with_capacity(sigs.len());
    for sig_msg in msgs {
        bases.push(scope_base(&sig_msg.scoped()?.scope)?);
    }
    let statements = sigs.iter().map(|s| s.nym.clone()).collect::<Vec<_>>();
    let terms = (0..sigs.len()).map(|i| vec![(i, 0)]).collect::<Vec<_>>();
    let term_refs = terms.iter().map(|t| t.as_slice()).collect::<Vec<_>>();
    let sig_bytes = sigs.iter().map(|s| s.body_bytes()).collect::<Vec<_>>();
    let grp_bytes = grpkey.body_bytes();
    let mut context = vec![grp_bytes.as_slice(), msg.bytes.as_slice()];
    for (bytes, sig_msg) in sig_bytes.iter().zip(msgs.iter()) {
        context.push(bytes.as_slice());
        context.push(&sig_msg.bytes);
    }

    let mut rng = sysenv::operation_rng(None)?;
    let pi = spk::rep_sign(
        LINK_DOMAIN,
        &bases,
        &statements,
        &term_refs,
        &[y],
        &context,
        &mut rng,
    )?;
    Ok(Dl21SeqProof { ks: Vec::new(), pi })
}

pub fn verify_link(
    grpkey: &Dl21GroupKey,
    proof: &Dl21SeqProof,
    msg: &Message,
    sigs: &[&Dl21SeqSignature],
    msgs: &[&Message],
) -> GroupsigResult<bool> {
    if sigs.is_empty() || sigs.len() != msgs.len() {
        return Err(GroupsigError::InvalidArgument(
            "signature and message counts differ",
        ));
    }
    if !proof.ks.is_empty() {
        return Ok(false);
    }
    for (&sig, &sig_msg) in sigs.iter().zip(msgs.iter()) {
        if !verify(sig, sig_msg, grpkey)? {
            return Ok(false);
        }
    }

    let mut bases = Vec::with_capacity(sigs.len());
    for sig_msg in msgs {
        bases.push(scope_base(&sig_msg.scoped()?.scope)?);
    }
    let statements = sigs.iter().map(|s| s.nym.clone()).collect::<Vec<_>>();
    let terms = (0..sigs.len()).map(|i| vec![(i, 0)]).collect::<Vec<_>>();
    let term_refs = terms.iter().map(|t| t.as_slice()).collect::<Vec<_>>();
    let sig_bytes = sigs.iter().map(|s| s.body_bytes()).collect::<Vec<_>>();
    let grp_bytes = grpkey.body_bytes();
    let mut context = vec![grp_bytes.as_slice(), msg.bytes.as_slice()];
    for (bytes, sig_msg) in sig_bytes.iter().zip(msgs.iter()) {
        context.push(bytes.as_slice());
        context.push(&sig_msg.bytes);
    }

    spk::rep_verify(
        LINK_DOMAIN,
        &proof.pi,
        &bases,
        &statements,
        &term_refs,
        &context,
    )
}

/// Proves that `sigs` is a consecutive run of one member's sequence
/// under a single scope, disclosing the chain values of the run.
pub fn seqlink(
    grpkey: &Dl21GroupKey,
    memkey: &Dl21MemberKey,
    msg: &Message,
    sigs: &[&Dl21SeqSignature],
    msgs: &[&Message],
) -> GroupsigResult<Dl21SeqProof> {
    let (y, _) = memkey.complete()?;
    if sigs.is_empty() || sigs.len() != msgs.len() {
        return Err(GroupsigError::InvalidArgument(
            "signature and message counts differ",
        ));
    }

    let scope = msgs[0].scoped()?.scope;
    for (&sig, &sig_msg) in sigs.iter().zip(msgs.iter()) {
        if sig_msg.scoped()?.scope != scope {
            return Err(GroupsigError::Fail("signatures span several scopes"));
        }
        if !verify(sig, sig_msg, grpkey)? || !identify(grpkey, memkey, sig, sig_msg)? {
            return Err(GroupsigError::Fail(
                "signatures are not all attributable to this member",
            ));
        }
    }
    for window in sigs.windows(2) {
        if window[1].seq != window[0].seq + 1 {
            return Err(GroupsigError::Fail(
                "signatures are not in consecutive sequence order",
            ));
        }
    }

    let mut ks = Vec::with_capacity(sigs.len());
    for sig in sigs {
        let k = chain_at(y, &scope, sig.seq)?;
        if sig.c != grpkey.g.scaled(&k) {
            return Err(GroupsigError::Fail(
                "sequence commitment does not match the chain",
            ));
        }
        ks.push(k);
    }

    let h_scope = scope_base(&scope)?;
    let nym = h_scope.scaled(y);
    let sig_bytes = sigs.iter().map(|s| s.body_bytes()).collect::<Vec<_>>();
    let k_bytes = ks.iter().map(|k| k.marshal()).collect::<Vec<_>>();
    let grp_bytes = grpkey.body_bytes();
    let mut context = vec![grp_bytes.as_slice(), msg.bytes.as_slice()];
    context.extend(sig_bytes.iter().map(|b| b.as_slice()));
    context.extend(k_bytes.iter().map(|b| b.as_slice()));

    let mut rng = sysenv::operation_rng(None)?;
    let pi = spk::rep_sign(
        SEQLINK_DOMAIN,
        &[h_scope],
        &[nym],
        &[&[(0, 0)]],
        &[y],
        &context,
        &mut rng,
    )?;
    Ok(Dl21SeqProof { ks, pi })
}

/// Verifies a seqlink proof: every signature must verify, share the
/// scope and pseudonym, commit to the disclosed chain values, and those
/// values must chain into each other in order.
pub fn verify_seqlink(
    grpkey: &Dl21GroupKey,
    proof: &Dl21SeqProof,
    msg: &Message,
    sigs: &[&Dl21SeqSignature],
    msgs: &[&Message],
) -> GroupsigResult<bool> {
    if sigs.is_empty() || sigs.len() != msgs.len() {
        return Err(GroupsigError::InvalidArgument(
            "signature and message counts differ",
        ));
    }
    if proof.ks.len() != sigs.len() {
        return Ok(false);
    }

    let scope = msgs[0].scoped()?.scope;
    let nym = sigs[0].nym.clone();
    for (&sig, &sig_msg) in sigs.iter().zip(msgs.iter()) {
        if sig_msg.scoped()?.scope != scope || sig.nym != nym {
            return Ok(false);
        }
        if !verify(sig, sig_msg, grpkey)? {
            return Ok(false);
        }
    }

    for (sig, k) in sigs.iter().zip(proof.ks.iter()) {
        if sig.c != grpkey.g.scaled(k) {
            return Ok(false);
        }
    }
    for window in sigs.windows(2) {
        if window[1].seq != window[0].seq + 1 {
            return Ok(false);
        }
    }
    for pair in proof.ks.windows(2) {
        if pair[1] != chain_next(&pair[0]) {
            return Ok(false);
        }
    }

    let h_scope = scope_base(&scope)?;
    let sig_bytes = sigs.iter().map(|s| s.body_bytes()).collect::<Vec<_>>();
    let k_bytes = proof.ks.iter().map(|k| k.marshal()).collect::<Vec<_>>();
    let grp_bytes = grpkey.body_bytes();
    let mut context = vec![grp_bytes.as_slice(), msg.bytes.as_slice()];
    context.extend(sig_bytes.iter().map(|b| b.as_slice()));
    context.extend(k_bytes.iter().map(|b| b.as_slice()));

    spk::rep_verify(
        SEQLINK_DOMAIN,
        &proof.pi,
        &[h_scope],
        &[nym],
        &[&[(0, 0)]],
        &context,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    fn group() -> (Dl21GroupKey, Dl21ManagerKey) {
        sysenv::init(Some(thread_rng().gen())).unwrap();
        let mut rng = thread_rng();
        setup(&mut rng)
    }

    fn enroll(grpkey: &Dl21GroupKey, mgrkey: &Dl21ManagerKey) -> Dl21MemberKey {
        let mut memkey = Dl21MemberKey::new();
        let m1 = join_mgr(mgrkey, 0, None, grpkey).unwrap().unwrap();
        let m2 = join_mem(&mut memkey, 1, Some(&m1), grpkey).unwrap().unwrap();
        let m3 = join_mgr(mgrkey, 2, Some(&m2), grpkey).unwrap().unwrap();
        assert!(join_mem(&mut memkey, 3, Some(&m3), grpkey)
            .unwrap()
            .is_none());
        memkey
    }

    fn scoped(scope: &str, message: &str) -> Message {
        Message::from_json_string(&format!(
            "{{ \"scope\": \"{}\", \"message\": \"{}\" }}",
            scope, message
        ))
    }

    #[test]
    fn sign_and_verify() {
        let (grpkey, mgrkey) = group();
        let memkey = enroll(&grpkey, &mgrkey);

        let msg = scoped("scp", "Hello, World!");
        let sig = sign(&msg, &memkey, &grpkey, Some(1)).unwrap();
        assert!(verify(&sig, &msg, &grpkey).unwrap());

        let other = scoped("scp", "Hello, Worlds!");
        assert!(!verify(&sig, &other, &grpkey).unwrap());
    }

    #[test]
    fn sign_requires_a_sequence_seed() {
        let (grpkey, mgrkey) = group();
        let memkey = enroll(&grpkey, &mgrkey);
        let msg = scoped("scp", "Hello, World!");
        assert!(sign(&msg, &memkey, &grpkey, None).is_err());
    }

    #[test]
    fn seqlink_consecutive_run() {
        let (grpkey, mgrkey) = group();
        let memkey = enroll(&grpkey, &mgrkey);

        let msg = scoped("scp", "Hello, World!");
        let sig1 = sign(&msg, &memkey, &grpkey, Some(1)).unwrap();
        let sig2 = sign(&msg, &memkey, &grpkey, Some(2)).unwrap();

        let nonce = Message::from_string("seqlink nonce");
        let proof = seqlink(&grpkey, &memkey, &nonce, &[&sig1, &sig2], &[&msg, &msg]).unwrap();
        assert!(verify_seqlink(&grpkey, &proof, &nonce, &[&sig1, &sig2], &[&msg, &msg]).unwrap());

        // reordering the signatures must not verify
        assert!(!verify_seqlink(&grpkey, &proof, &nonce, &[&sig2, &sig1], &[&msg, &msg]).unwrap());
    }

    #[test]
    fn seqlink_rejects_reorder_and_skip() {
        let (grpkey, mgrkey) = group();
        let memkey = enroll(&grpkey, &mgrkey);

        let msg = scoped("scp", "Hello, World!");
        let sig1 = sign(&msg, &memkey, &grpkey, Some(1)).unwrap();
        let sig2 = sign(&msg, &memkey, &grpkey, Some(2)).unwrap();
        let sig3 = sign(&msg, &memkey, &grpkey, Some(3)).unwrap();

        let nonce = Message::from_string("seqlink nonce");

        // wrong order
        assert!(matches!(
            seqlink(&grpkey, &memkey, &nonce, &[&sig2, &sig1], &[&msg, &msg]),
            Err(GroupsigError::Fail(_))
        ));

        // skipped position
        assert!(matches!(
            seqlink(&grpkey, &memkey, &nonce, &[&sig1, &sig3], &[&msg, &msg]),
            Err(GroupsigError::Fail(_))
        ));

        // a proof over [1, 2] does not cover [1, 3]
        let proof = seqlink(&grpkey, &memkey, &nonce, &[&sig1, &sig2], &[&msg, &msg]).unwrap();
        assert!(!verify_seqlink(&grpkey, &proof, &nonce, &[&sig1, &sig3], &[&msg, &msg]).unwrap());
    }

    #[test]
    fn seqlink_rejects_foreign_member() {
        let (grpkey, mgrkey) = group();
        let alice = enroll(&grpkey, &mgrkey);
        let bob = enroll(&grpkey, &mgrkey);

        let msg = scoped("scp", "Hello, World!");
        let sig1 = sign(&msg, &alice, &grpkey, Some(1)).unwrap();
        let sig2 = sign(&msg, &bob, &grpkey, Some(2)).unwrap();

        let nonce = Message::from_string("seqlink nonce");
        assert!(matches!(
            seqlink(&grpkey, &alice, &nonce, &[&sig1, &sig2], &[&msg, &msg]),
            Err(GroupsigError::Fail(_))
        ));
    }

    #[test]
    fn link_and_claim_work_like_dl21() {
        let (grpkey, mgrkey) = group();
        let memkey = enroll(&grpkey, &mgrkey);

        let msg = scoped("scp", "Hello, World!");
        let sig1 = sign(&msg, &memkey, &grpkey, Some(1)).unwrap();
        let sig2 = sign(&msg, &memkey, &grpkey, Some(2)).unwrap();

        let proof = claim(&memkey, &grpkey, &sig1).unwrap();
        assert!(claim_verify(&proof, &sig1, &grpkey).unwrap());

        let nonce = Message::from_string("link nonce");
        let link_proof = link(&grpkey, &memkey, &nonce, &[&sig1, &sig2], &[&msg, &msg]).unwrap();
        assert!(verify_link(&grpkey, &link_proof, &nonce, &[&sig1, &sig2], &[&msg, &msg]).unwrap());
    }

    #[test]
    fn signature_body_roundtrip() {
        let (grpkey, mgrkey) = group();
        let memkey = enroll(&grpkey, &mgrkey);
        let msg = scoped("scp", "Hello, World!");
        let sig = sign(&msg, &memkey, &grpkey, Some(1)).unwrap();

        let bytes = sig.body_bytes();
        let mut r = Reader::new(&bytes);
        let imported = Dl21SeqSignature::read_body(&mut r).unwrap();
        r.finish().unwrap();
        assert_eq!(sig, imported);
        assert!(verify(&imported, &msg, &grpkey).unwrap());
    }
}
