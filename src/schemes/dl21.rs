//! DL21: scope-bound group signatures with linking proofs.
//!
//! Messages are JSON objects `{"scope": ..., "message": ...}`. The
//! pseudonym embedded in a signature is deterministic in the member
//! secret and the scope, so two signatures by one member under one scope
//! are linkable by a proof, and unlinkable across scopes. The scheme
//! keeps no membership list; there is no open.

use crate::curve::bls12381::{Scalar, G1, G2};
use crate::error::{EncodingError, GroupsigError, GroupsigResult};
use crate::group::{Element, Encodable, Point};
use crate::message::Message;
use crate::schemes::ps;
use crate::spk::{self, SpkRep};
use crate::sysenv;
use crate::wire::{Reader, Writer};
use rand_core::RngCore;

const JOIN_DOMAIN: &[u8] = b"groupsig-dl21-join";
const SIGN_DOMAIN: &[u8] = b"groupsig-dl21-sign";
const CLAIM_DOMAIN: &[u8] = b"groupsig-dl21-claim";
const EQUALITY_DOMAIN: &[u8] = b"groupsig-dl21-proveeq";
const LINK_DOMAIN: &[u8] = b"groupsig-dl21-link";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dl21GroupKey {
    pub g: G1,
    pub gg: G2,
    pub xx: G2,
    pub yy: G2,
}

/// The issuer key. DL21 has no opener: identities only surface through
/// the member's own pseudonyms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dl21ManagerKey {
    pub x: Scalar,
    pub y: Scalar,
}

/// A member key; `cred` stays empty until the final join step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dl21MemberKey {
    pub y: Option<Scalar>,
    pub cred: Option<ps::Credential>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dl21Signature {
    pub nym: G1,
    pub sigma1: G1,
    pub sigma2: G1,
    pub bar: G1,
    pub pi: SpkRep,
}

/// A claim, equality or link proof: one common-witness transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dl21Proof(pub SpkRep);

impl Dl21GroupKey {
    pub(crate) fn write_body(&self, w: &mut Writer) {
        w.put_element(&self.g);
        w.put_element(&self.gg);
        w.put_element(&self.xx);
        w.put_element(&self.yy);
    }

    pub(crate) fn read_body(r: &mut Reader) -> Result<Self, EncodingError> {
        Ok(Dl21GroupKey {
            g: r.get_element("g")?,
            gg: r.get_element("gg")?,
            xx: r.get_element("xx")?,
            yy: r.get_element("yy")?,
        })
    }

    pub(crate) fn body_bytes(&self) -> Vec<u8> {
        let mut w = Writer::new();
        self.write_body(&mut w);
        w.finish()
    }

    pub(crate) fn ipk(&self) -> ps::IssuerPublic {
        ps::IssuerPublic {
            xx: self.xx.clone(),
            yy: self.yy.clone(),
        }
    }
}

impl Dl21ManagerKey {
    pub(crate) fn write_body(&self, w: &mut Writer) {
        w.put_element(&self.x);
        w.put_element(&self.y);
    }

    pub(crate) fn read_body(r: &mut Reader) -> Result<Self, EncodingError> {
        Ok(Dl21ManagerKey {
            x: r.get_element("x")?,
            y: r.get_element("y")?,
        })
    }

    fn secret(&self) -> ps::IssuerSecret {
        ps::IssuerSecret {
            x: self.x.clone(),
            y: self.y.clone(),
        }
    }
}

impl Dl21MemberKey {
    pub fn new() -> Self {
        Dl21MemberKey {
            y: None,
            cred: None,
        }
    }

    pub(crate) fn write_body(&self, w: &mut Writer) {
        w.put_opt_element(self.y.as_ref());
        w.put_opt_element(self.cred.as_ref().map(|c| &c.sigma1));
        w.put_opt_element(self.cred.as_ref().map(|c| &c.sigma2));
    }

    pub(crate) fn read_body(r: &mut Reader) -> Result<Self, EncodingError> {
        let y = r.get_opt_element("y")?;
        let sigma1 = r.get_opt_element::<G1>("sigma1")?;
        let sigma2 = r.get_opt_element::<G1>("sigma2")?;
        let cred = match (sigma1, sigma2) {
            (Some(sigma1), Some(sigma2)) => Some(ps::Credential { sigma1, sigma2 }),
            (None, None) => None,
            _ => return Err(EncodingError::MissingField("credential half")),
        };
        Ok(Dl21MemberKey { y, cred })
    }

    /// The secret and credential of a key that completed the join.
    pub(crate) fn complete(&self) -> GroupsigResult<(&Scalar, &ps::Credential)> {
        match (&self.y, &self.cred) {
            (Some(y), Some(cred)) => Ok((y, cred)),
            _ => Err(GroupsigError::InvalidArgument(
                "member key has not completed the join protocol",
            )),
        }
    }
}

impl Dl21Signature {
    pub(crate) fn write_body(&self, w: &mut Writer) {
        w.put_element(&self.nym);
        w.put_element(&self.sigma1);
        w.put_element(&self.sigma2);
        w.put_element(&self.bar);
        self.pi.write_to(w);
    }

    pub(crate) fn read_body(r: &mut Reader) -> Result<Self, EncodingError> {
        Ok(Dl21Signature {
            nym: r.get_element("nym")?,
            sigma1: r.get_element("sigma1")?,
            sigma2: r.get_element("sigma2")?,
            bar: r.get_element("bar")?,
            pi: SpkRep::read_from(r, 1)?,
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

impl Dl21Proof {
    pub(crate) fn write_body(&self, w: &mut Writer) {
        self.0.write_to(w);
    }

    /// The transcript runs to the end of the buffer: the challenge
    /// followed by one response per committed witness.
    pub(crate) fn read_body(r: &mut Reader) -> Result<Self, EncodingError> {
        let c = r.get_element::<Scalar>("proof challenge")?;
        let mut s = Vec::new();
        while r.remaining() > 0 {
            s.push(r.get_element::<Scalar>("proof response")?);
        }
        Ok(Dl21Proof(SpkRep { c, s }))
    }
}

/// Derives the scope generator `H₁(scope)`.
fn scope_base(scope: &str) -> GroupsigResult<G1> {
    let mut h = G1::new();
    h.map(scope.as_bytes())?;
    Ok(h)
}

pub fn setup<R: RngCore>(rng: &mut R) -> (Dl21GroupKey, Dl21ManagerKey) {
    let g = G1::one();
    let gg = G2::one();
    let (sk, pk) = ps::issuer_keygen(&gg, rng);
    (
        Dl21GroupKey {
            g,
            gg,
            xx: pk.xx,
            yy: pk.yy,
        },
        Dl21ManagerKey { x: sk.x, y: sk.y },
    )
}

/// Issuer side of the join protocol (steps 0 and 2).
pub fn join_mgr(
    mgrkey: &Dl21ManagerKey,
    seq: u8,
    msg_in: Option<&Message>,
    grpkey: &Dl21GroupKey,
) -> GroupsigResult<Option<Message>> {
    match seq {
        0 => {
            let mut rng = sysenv::operation_rng(None)?;
            let n = Scalar::rand(&mut rng);
            let mut w = Writer::new();
            w.put_element(&n);
            Ok(Some(Message::from_bytes(w.finish())))
        }
        2 => {
            let msg_in = msg_in.ok_or(GroupsigError::InvalidArgument(
                "join step 2 requires the member message",
            ))?;
            let mut r = Reader::new(&msg_in.bytes);
            let tau = r.get_element::<G1>("tau")?;
            let n = r.get_element::<Scalar>("nonce")?;
            let pi = SpkRep::read_from(&mut r, 1)?;
            r.finish()?;

            let ok = spk::rep_verify(
                JOIN_DOMAIN,
                &pi,
                &[grpkey.g.clone()],
                &[tau.clone()],
                &[&[(0, 0)]],
                &[&n.marshal(), &grpkey.body_bytes()],
            )?;
            if !ok {
                return Err(GroupsigError::InvalidArgument(
                    "member commitment proof does not verify",
                ));
            }

            let mut rng = sysenv::operation_rng(None)?;
            let cred = ps::issue(&mgrkey.secret(), &grpkey.g, &tau, &mut rng);
            let mut w = Writer::new();
            w.put_element(&cred.sigma1);
            w.put_element(&cred.sigma2);
            Ok(Some(Message::from_bytes(w.finish())))
        }
        _ => Err(GroupsigError::InvalidArgument("invalid issuer join step")),
    }
}

/// Member side of the join protocol (steps 1 and 3). The key is complete
/// once step 3 succeeds.
pub fn join_mem(
    memkey: &mut Dl21MemberKey,
    seq: u8,
    msg_in: Option<&Message>,
    grpkey: &Dl21GroupKey,
) -> GroupsigResult<Option<Message>> {
    let msg_in = msg_in.ok_or(GroupsigError::InvalidArgument(
        "member join steps require an issuer message",
    ))?;
    match seq {
        1 => {
            let mut r = Reader::new(&msg_in.bytes);
            let n = r.get_element::<Scalar>("nonce")?;
            r.finish()?;

            let mut rng = sysenv::operation_rng(None)?;
            let y = Scalar::rand(&mut rng);
            let tau = grpkey.g.scaled(&y);
            let pi = spk::rep_sign(
                JOIN_DOMAIN,
                &[grpkey.g.clone()],
                &[tau.clone()],
                &[&[(0, 0)]],
                &[&y],
                &[&n.marshal(), &grpkey.body_bytes()],
                &mut rng,
            )?;
            memkey.y = Some(y);

            let mut w = Writer::new();
            w.put_element(&tau);
            w.put_element(&n);
            pi.write_to(&mut w);
            Ok(Some(Message::from_bytes(w.finish())))
        }
        3 => {
            let y = memkey
                .y
                .as_ref()
                .ok_or(GroupsigError::InvalidArgument("join step 1 did not run"))?;
            let mut r = Reader::new(&msg_in.bytes);
            let cred = ps::Credential {
                sigma1: r.get_element("sigma1")?,
                sigma2: r.get_element("sigma2")?,
            };
            r.finish()?;

            if !ps::credential_valid(&cred, y, &grpkey.gg, &grpkey.ipk()) {
                return Err(GroupsigError::InvalidArgument(
                    "issued credential does not verify",
                ));
            }
            memkey.cred = Some(cred);
            Ok(None)
        }
        _ => Err(GroupsigError::InvalidArgument("invalid member join step")),
    }
}

pub fn sign(
    msg: &Message,
    memkey: &Dl21MemberKey,
    grpkey: &Dl21GroupKey,
    seed: Option<u64>,
) -> GroupsigResult<Dl21Signature> {
    let (y, cred) = memkey.complete()?;
    let scoped = msg.scoped()?;
    let mut rng = sysenv::operation_rng(seed)?;

    let h_scope = scope_base(&scoped.scope)?;
    let nym = h_scope.scaled(y);
    let shown = ps::show(cred, y, &mut rng);

    let pi = spk::rep_sign(
        SIGN_DOMAIN,
        &[shown.sigma1.clone(), h_scope],
        &[shown.bar.clone(), nym.clone()],
        &[&[(0, 0)], &[(1, 0)]],
        &[y],
        &[
            &grpkey.body_bytes(),
            &shown.sigma2.marshal(),
            &msg.bytes,
        ],
        &mut rng,
    )?;

    Ok(Dl21Signature {
        nym,
        sigma1: shown.sigma1,
        sigma2: shown.sigma2,
        bar: shown.bar,
        pi,
    })
}

pub fn verify(
    sig: &Dl21Signature,
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
        &[sig.sigma1.clone(), h_scope],
        &[sig.bar.clone(), sig.nym.clone()],
        &[&[(0, 0)], &[(1, 0)]],
        &[
            &grpkey.body_bytes(),
            &sig.sigma2.marshal(),
            &msg.bytes,
        ],
    )
}

/// Batch verification: the per-signature transcripts are checked
/// individually, the credential equations in one aggregated pairing.
pub fn verify_batch(
    sigs: &[&Dl21Signature],
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
            &[sig.sigma1.clone(), h_scope],
            &[sig.bar.clone(), sig.nym.clone()],
            &[&[(0, 0)], &[(1, 0)]],
            &[
                &grpkey.body_bytes(),
                &sig.sigma2.marshal(),
                &msg.bytes,
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

/// Local test by the alleged author: did this member produce `sig`?
pub fn identify(
    grpkey: &Dl21GroupKey,
    memkey: &Dl21MemberKey,
    sig: &Dl21Signature,
    msg: &Message,
) -> GroupsigResult<bool> {
    let _ = grpkey;
    let (y, _) = memkey.complete()?;
    let scoped = msg.scoped()?;
    let h_scope = scope_base(&scoped.scope)?;
    Ok(sig.nym == h_scope.scaled(y))
}

/// Zero-knowledge proof of authorship of a single signature.
pub fn claim(
    memkey: &Dl21MemberKey,
    grpkey: &Dl21GroupKey,
    sig: &Dl21Signature,
) -> GroupsigResult<Dl21Proof> {
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
    Ok(Dl21Proof(pi))
}

pub fn claim_verify(
    proof: &Dl21Proof,
    sig: &Dl21Signature,
    grpkey: &Dl21GroupKey,
) -> GroupsigResult<bool> {
    spk::rep_verify(
        CLAIM_DOMAIN,
        &proof.0,
        &[sig.sigma1.clone()],
        &[sig.bar.clone()],
        &[&[(0, 0)]],
        &[&grpkey.body_bytes(), &sig.body_bytes()],
    )
}

/// Proves that the holder of `memkey` produced every signature in
/// `sigs`, via the common witness underlying all of them.
pub fn prove_equality(
    memkey: &Dl21MemberKey,
    grpkey: &Dl21GroupKey,
    sigs: &[&Dl21Signature],
) -> GroupsigResult<Dl21Proof> {
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
    Ok(Dl21Proof(pi))
}

pub fn prove_equality_verify(
    proof: &Dl21Proof,
    grpkey: &Dl21GroupKey,
    sigs: &[&Dl21Signature],
) -> GroupsigResult<bool> {
    if sigs.is_empty() {
        return Err(GroupsigError::InvalidArgument("no signatures to check"));
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
        &proof.0,
        &bases,
        &statements,
        &term_refs,
        &context,
    )
}

/// Proves that one member produced all of `sigs`. Fails (logically, not
/// as an error) when any signature does not verify or does not identify
/// to `memkey`.
pub fn link(
    grpkey: &Dl21GroupKey,
    memkey: &Dl21MemberKey,
    msg: &Message,
    sigs: &[&Dl21Signature],
    msgs: &[&Message],
) -> GroupsigResult<Dl21Proof> {
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
    Ok(Dl21Proof(pi))
}

pub fn verify_link(
    grpkey: &Dl21GroupKey,
    proof: &Dl21Proof,
    msg: &Message,
    sigs: &[&Dl21Signature],
    msgs: &[&Message],
) -> GroupsigResult<bool> {
    if sigs.is_empty() || sigs.len() != msgs.len() {
        return Err(GroupsigError::InvalidArgument(
            "signature and message counts differ",
        ));
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
        &proof.0,
        &bases,
        &statements,
        &term_refs,
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
        let sig = sign(&msg, &memkey, &grpkey, None).unwrap();
        assert!(verify(&sig, &msg, &grpkey).unwrap());

        let other = scoped("scp", "Hello, Worlds!");
        assert!(!verify(&sig, &other, &grpkey).unwrap());
    }

    #[test]
    fn non_json_message_is_rejected() {
        let (grpkey, mgrkey) = group();
        let memkey = enroll(&grpkey, &mgrkey);
        let msg = Message::from_string("Hello, World!");
        assert!(sign(&msg, &memkey, &grpkey, None).is_err());
    }

    #[test]
    fn incomplete_member_key_cannot_sign() {
        let (grpkey, mgrkey) = group();
        let mut memkey = Dl21MemberKey::new();
        let m1 = join_mgr(&mgrkey, 0, None, &grpkey).unwrap().unwrap();
        join_mem(&mut memkey, 1, Some(&m1), &grpkey).unwrap();

        let msg = scoped("scp", "Hello, World!");
        assert!(sign(&msg, &memkey, &grpkey, None).is_err());
    }

    #[test]
    fn seeded_signatures_are_reproducible() {
        let (grpkey, mgrkey) = group();
        let memkey = enroll(&grpkey, &mgrkey);
        let msg = scoped("scp", "Hello, World!");

        let sig1 = sign(&msg, &memkey, &grpkey, Some(33)).unwrap();
        let sig2 = sign(&msg, &memkey, &grpkey, Some(33)).unwrap();
        assert_eq!(sig1, sig2);
    }

    #[test]
    fn batch_verification() {
        let (grpkey, mgrkey) = group();
        let memkey = enroll(&grpkey, &mgrkey);

        let msgs = (0..3)
            .map(|i| scoped("scp", &format!("message {}", i)))
            .collect::<Vec<_>>();
        let sigs = msgs
            .iter()
            .map(|m| sign(m, &memkey, &grpkey, None).unwrap())
            .collect::<Vec<_>>();

        let sig_refs = sigs.iter().collect::<Vec<_>>();
        let msg_refs = msgs.iter().collect::<Vec<_>>();
        assert!(verify_batch(&sig_refs, &msg_refs, &grpkey).unwrap());

        // one bad pair poisons the batch
        let wrong = scoped("scp", "tampered");
        let bad_refs = vec![&sigs[0], &sigs[1], &sigs[2]];
        let bad_msgs = vec![&msgs[0], &msgs[1], &wrong];
        assert!(!verify_batch(&bad_refs, &bad_msgs, &grpkey).unwrap());
    }

    #[test]
    fn identify_own_signature() {
        let (grpkey, mgrkey) = group();
        let alice = enroll(&grpkey, &mgrkey);
        let bob = enroll(&grpkey, &mgrkey);

        let msg = scoped("scp", "Hello, World!");
        let sig = sign(&msg, &alice, &grpkey, None).unwrap();

        assert!(identify(&grpkey, &alice, &sig, &msg).unwrap());
        assert!(!identify(&grpkey, &bob, &sig, &msg).unwrap());
    }

    #[test]
    fn claim_roundtrip() {
        let (grpkey, mgrkey) = group();
        let alice = enroll(&grpkey, &mgrkey);
        let bob = enroll(&grpkey, &mgrkey);

        let msg = scoped("scp", "Hello, World!");
        let sig = sign(&msg, &alice, &grpkey, None).unwrap();

        let proof = claim(&alice, &grpkey, &sig).unwrap();
        assert!(claim_verify(&proof, &sig, &grpkey).unwrap());

        // someone else cannot claim it
        assert!(matches!(
            claim(&bob, &grpkey, &sig),
            Err(GroupsigError::Fail(_))
        ));
    }

    #[test]
    fn prove_equality_roundtrip() {
        let (grpkey, mgrkey) = group();
        let memkey = enroll(&grpkey, &mgrkey);

        let msgs = (0..2)
            .map(|i| scoped(&format!("scope-{}", i), "payload"))
            .collect::<Vec<_>>();
        let sigs = msgs
            .iter()
            .map(|m| sign(m, &memkey, &grpkey, None).unwrap())
            .collect::<Vec<_>>();
        let sig_refs = sigs.iter().collect::<Vec<_>>();

        let proof = prove_equality(&memkey, &grpkey, &sig_refs).unwrap();
        assert!(prove_equality_verify(&proof, &grpkey, &sig_refs).unwrap());
    }

    #[test]
    fn link_same_member() {
        let (grpkey, mgrkey) = group();
        let memkey = enroll(&grpkey, &mgrkey);

        let msgs = (0..3)
            .map(|i| scoped("scp", &format!("message {}", i)))
            .collect::<Vec<_>>();
        let sigs = msgs
            .iter()
            .map(|m| sign(m, &memkey, &grpkey, None).unwrap())
            .collect::<Vec<_>>();
        let sig_refs = sigs.iter().collect::<Vec<_>>();
        let msg_refs = msgs.iter().collect::<Vec<_>>();

        let nonce = Message::from_string("link nonce");
        let proof = link(&grpkey, &memkey, &nonce, &sig_refs, &msg_refs).unwrap();
        assert!(verify_link(&grpkey, &proof, &nonce, &sig_refs, &msg_refs).unwrap());

        // the proof is bound to the nonce message
        let other_nonce = Message::from_string("another nonce");
        assert!(!verify_link(&grpkey, &proof, &other_nonce, &sig_refs, &msg_refs).unwrap());
    }

    #[test]
    fn link_fails_for_foreign_signature() {
        let (grpkey, mgrkey) = group();
        let alice = enroll(&grpkey, &mgrkey);
        let bob = enroll(&grpkey, &mgrkey);

        let msg_a = scoped("scp", "from alice");
        let msg_b = scoped("scp", "from bob");
        let sig_a = sign(&msg_a, &alice, &grpkey, None).unwrap();
        let sig_b = sign(&msg_b, &bob, &grpkey, None).unwrap();

        let nonce = Message::from_string("link nonce");
        let result = link(
            &grpkey,
            &alice,
            &nonce,
            &[&sig_a, &sig_b],
            &[&msg_a, &msg_b],
        );
        assert!(matches!(result, Err(GroupsigError::Fail(_))));
    }

    #[test]
    fn same_scope_nyms_link_different_scopes_do_not() {
        let (grpkey, mgrkey) = group();
        let memkey = enroll(&grpkey, &mgrkey);

        let m1 = scoped("scp", "one");
        let m2 = scoped("scp", "two");
        let m3 = scoped("other", "three");
        let s1 = sign(&m1, &memkey, &grpkey, None).unwrap();
        let s2 = sign(&m2, &memkey, &grpkey, None).unwrap();
        let s3 = sign(&m3, &memkey, &grpkey, None).unwrap();

        assert_eq!(s1.nym, s2.nym);
        assert_ne!(s1.nym, s3.nym);
    }

    #[test]
    fn signature_body_roundtrip() {
        let (grpkey, mgrkey) = group();
        let memkey = enroll(&grpkey, &mgrkey);
        let msg = scoped("scp", "Hello, World!");
        let sig = sign(&msg, &memkey, &grpkey, None).unwrap();

        let bytes = sig.body_bytes();
        let mut r = Reader::new(&bytes);
        let imported = Dl21Signature::read_body(&mut r).unwrap();
        r.finish().unwrap();
        assert_eq!(sig, imported);
        assert!(verify(&imported, &msg, &grpkey).unwrap());
    }
}
