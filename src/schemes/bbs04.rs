//! BBS04: the Boneh-Boyen-Shacham short group signature scheme.
//!
//! The manager holds both roles: the issuing exponent and the two
//! opening exponents of the linear encryption. A signature is the linear
//! encryption `(T1, T2, T3)` of the member's SDH certificate plus a
//! five-witness proof of knowledge spanning one pairing relation and
//! four group relations. Open decrypts the certificate and scans the
//! GML; reveal and trace work over certificates recorded in the CRL.

use crate::crl::{Crl, CrlEntry, Trapdoor};
use crate::curve::bls12381::{PairingCurve, Scalar, G1, G2, GT};
use crate::error::{EncodingError, GroupsigError, GroupsigResult};
use crate::gml::{Gml, GmlEntryData};
use crate::group::{Element, PairingCurve as PC, Scalar as _};
use crate::message::Message;
use crate::spk::{SpkRep, Transcript};
use crate::sysenv;
use crate::wire::{Reader, Writer};
use rand_core::RngCore;

const SIGN_DOMAIN: &[u8] = b"groupsig-bbs04-sign";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bbs04GroupKey {
    pub g1: G1,
    pub g2: G2,
    pub h: G1,
    pub u: G1,
    pub v: G1,
    pub w: G2,
}

/// Issuer and opener in one key: `gamma` issues SDH certificates, the
/// `xi` pair decrypts the linear encryption inside signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bbs04ManagerKey {
    pub gamma: Scalar,
    pub xi1: Scalar,
    pub xi2: Scalar,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bbs04MemberKey {
    pub a: Option<G1>,
    pub x: Option<Scalar>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bbs04Signature {
    pub t1: G1,
    pub t2: G1,
    pub t3: G1,
    pub pi: SpkRep,
}

impl Bbs04GroupKey {
    pub(crate) fn write_body(&self, w: &mut Writer) {
        w.put_element(&self.g1);
        w.put_element(&self.g2);
        w.put_element(&self.h);
        w.put_element(&self.u);
        w.put_element(&self.v);
        w.put_element(&self.w);
    }

    pub(crate) fn read_body(r: &mut Reader) -> Result<Self, EncodingError> {
        Ok(Bbs04GroupKey {
            g1: r.get_element("g1")?,
            g2: r.get_element("g2")?,
            h: r.get_element("h")?,
            u: r.get_element("u")?,
            v: r.get_element("v")?,
            w: r.get_element("w")?,
        })
    }

    pub(crate) fn body_bytes(&self) -> Vec<u8> {
        let mut w = Writer::new();
        self.write_body(&mut w);
        w.finish()
    }
}

impl Bbs04ManagerKey {
    pub(crate) fn write_body(&self, w: &mut Writer) {
        w.put_element(&self.gamma);
        w.put_element(&self.xi1);
        w.put_element(&self.xi2);
    }

    pub(crate) fn read_body(r: &mut Reader) -> Result<Self, EncodingError> {
        Ok(Bbs04ManagerKey {
            gamma: r.get_element("gamma")?,
            xi1: r.get_element("xi1")?,
            xi2: r.get_element("xi2")?,
        })
    }
}

impl Bbs04MemberKey {
    pub fn new() -> Self {
        Bbs04MemberKey { a: None, x: None }
    }

    pub(crate) fn write_body(&self, w: &mut Writer) {
        w.put_opt_element(self.a.as_ref());
        w.put_opt_element(self.x.as_ref());
    }

    pub(crate) fn read_body(r: &mut Reader) -> Result<Self, EncodingError> {
        Ok(Bbs04MemberKey {
            a: r.get_opt_element("a")?,
            x: r.get_opt_element("x")?,
        })
    }

    fn complete(&self) -> GroupsigResult<(&G1, &Scalar)> {
        match (&self.a, &self.x) {
            (Some(a), Some(x)) => Ok((a, x)),
            _ => Err(GroupsigError::InvalidArgument(
                "member key has not completed the join protocol",
            )),
        }
    }
}

impl Bbs04Signature {
    pub(crate) fn write_body(&self, w: &mut Writer) {
        w.put_element(&self.t1);
        w.put_element(&self.t2);
        w.put_element(&self.t3);
        self.pi.write_to(w);
    }

    pub(crate) fn read_body(r: &mut Reader) -> Result<Self, EncodingError> {
        Ok(Bbs04Signature {
            t1: r.get_element("t1")?,
            t2: r.get_element("t2")?,
            t3: r.get_element("t3")?,
            pi: SpkRep::read_from(r, 5)?,
        })
    }
}

pub fn setup<R: RngCore>(rng: &mut R) -> GroupsigResult<(Bbs04GroupKey, Bbs04ManagerKey)> {
    let g1 = G1::one();
    let g2 = G2::one();
    let gamma = Scalar::rand(rng);
    let xi1 = Scalar::rand(rng);
    let xi2 = Scalar::rand(rng);

    let h = G1::rand(rng);
    let xi1_inv = xi1
        .inverse()
        .ok_or(GroupsigError::Internal("zero opening exponent"))?;
    let xi2_inv = xi2
        .inverse()
        .ok_or(GroupsigError::Internal("zero opening exponent"))?;
    // xi1·u = xi2·v = h
    let u = h.scaled(&xi1_inv);
    let v = h.scaled(&xi2_inv);
    let w = g2.scaled(&gamma);

    Ok((
        Bbs04GroupKey {
            g1,
            g2,
            h,
            u,
            v,
            w,
        },
        Bbs04ManagerKey { gamma, xi1, xi2 },
    ))
}

/// Issuer side of the single-message join: generates the member's SDH
/// pair, records it in the GML and sends it to the member.
pub fn join_mgr(
    gml: &mut Gml,
    mgrkey: &Bbs04ManagerKey,
    seq: u8,
    msg_in: Option<&Message>,
    grpkey: &Bbs04GroupKey,
) -> GroupsigResult<Option<Message>> {
    if seq != 0 {
        return Err(GroupsigError::InvalidArgument("invalid issuer join step"));
    }
    if msg_in.is_some() {
        return Err(GroupsigError::InvalidArgument(
            "join step 0 takes no input message",
        ));
    }
    let mut rng = sysenv::operation_rng(None)?;

    let x = Scalar::rand(&mut rng);
    let exp = mgrkey
        .gamma
        .plus(&x)
        .inverse()
        .ok_or(GroupsigError::Internal("degenerate member exponent"))?;
    // A = (gamma + x)^-1 · g1
    let a = grpkey.g1.scaled(&exp);

    gml.push(GmlEntryData::Bbs04 {
        a: a.clone(),
        x: x.clone(),
    })?;

    let mut w = Writer::new();
    w.put_element(&a);
    w.put_element(&x);
    Ok(Some(Message::from_bytes(w.finish())))
}

/// Member side of the join: imports and validates the issued pair.
pub fn join_mem(
    memkey: &mut Bbs04MemberKey,
    seq: u8,
    msg_in: Option<&Message>,
    grpkey: &Bbs04GroupKey,
) -> GroupsigResult<Option<Message>> {
    if seq != 1 {
        return Err(GroupsigError::InvalidArgument("invalid member join step"));
    }
    let msg_in = msg_in.ok_or(GroupsigError::InvalidArgument(
        "join step 1 requires the issuer message",
    ))?;
    let mut r = Reader::new(&msg_in.bytes);
    let a = r.get_element::<G1>("a")?;
    let x = r.get_element::<Scalar>("x")?;
    r.finish()?;

    // e(A, w + x·g2) must equal e(g1, g2)
    let left = PairingCurve::pair(&a, &grpkey.w.plus(&grpkey.g2.scaled(&x)));
    let right = PairingCurve::pair(&grpkey.g1, &grpkey.g2);
    if left != right {
        return Err(GroupsigError::InvalidArgument(
            "issued certificate does not verify",
        ));
    }

    memkey.a = Some(a);
    memkey.x = Some(x);
    Ok(None)
}

fn challenge(
    grpkey: &Bbs04GroupKey,
    t1: &G1,
    t2: &G1,
    t3: &G1,
    r1: &G1,
    r2: &G1,
    r3: &GT,
    r4: &G1,
    r5: &G1,
    msg: &Message,
) -> Scalar {
    let mut t = Transcript::new(SIGN_DOMAIN);
    t.append(&grpkey.body_bytes());
    t.append_element(t1);
    t.append_element(t2);
    t.append_element(t3);
    t.append_element(r1);
    t.append_element(r2);
    t.append_element(r3);
    t.append_element(r4);
    t.append_element(r5);
    t.append(&msg.bytes);
    t.challenge()
}

pub fn sign(
    msg: &Message,
    memkey: &Bbs04MemberKey,
    grpkey: &Bbs04GroupKey,
    seed: Option<u64>,
) -> GroupsigResult<Bbs04Signature> {
    let (a, x) = memkey.complete()?;
    let mut rng = sysenv::operation_rng(seed)?;

    let alpha = Scalar::rand(&mut rng);
    let beta = Scalar::rand(&mut rng);
    let delta1 = x.scaled(&alpha);
    let delta2 = x.scaled(&beta);

    let t1 = grpkey.u.scaled(&alpha);
    let t2 = grpkey.v.scaled(&beta);
    let t3 = a.plus(&grpkey.h.scaled(&alpha.plus(&beta)));

    let r_alpha = Scalar::rand(&mut rng);
    let r_beta = Scalar::rand(&mut rng);
    let r_x = Scalar::rand(&mut rng);
    let r_d1 = Scalar::rand(&mut rng);
    let r_d2 = Scalar::rand(&mut rng);

    let r1 = grpkey.u.scaled(&r_alpha);
    let r2 = grpkey.v.scaled(&r_beta);

    let mut neg_ab = r_alpha.plus(&r_beta);
    neg_ab.negate();
    let mut neg_d = r_d1.plus(&r_d2);
    neg_d.negate();
    // e(T3, g2)^rx · e(h, w)^(-ra-rb) · e(h, g2)^(-rd1-rd2)
    let r3 = PairingCurve::pair(&t3, &grpkey.g2)
        .scaled(&r_x)
        .plus(&PairingCurve::pair(&grpkey.h, &grpkey.w).scaled(&neg_ab))
        .plus(&PairingCurve::pair(&grpkey.h, &grpkey.g2).scaled(&neg_d));

    let r4 = t1.scaled(&r_x).minus(&grpkey.u.scaled(&r_d1));
    let r5 = t2.scaled(&r_x).minus(&grpkey.v.scaled(&r_d2));

    let c = challenge(grpkey, &t1, &t2, &t3, &r1, &r2, &r3, &r4, &r5, msg);

    let respond = |r: &Scalar, wit: &Scalar| {
        let mut s = wit.scaled(&c);
        s.add(r);
        s
    };
    let s = vec![
        respond(&r_alpha, &alpha),
        respond(&r_beta, &beta),
        respond(&r_x, x),
        respond(&r_d1, &delta1),
        respond(&r_d2, &delta2),
    ];

    Ok(Bbs04Signature {
        t1,
        t2,
        t3,
        pi: SpkRep { c, s },
    })
}

pub fn verify(
    sig: &Bbs04Signature,
    msg: &Message,
    grpkey: &Bbs04GroupKey,
) -> GroupsigResult<bool> {
    if sig.pi.s.len() != 5 {
        return Err(GroupsigError::InvalidArgument(
            "malformed signature transcript",
        ));
    }
    let c = &sig.pi.c;
    let (s_alpha, s_beta, s_x, s_d1, s_d2) = (
        &sig.pi.s[0],
        &sig.pi.s[1],
        &sig.pi.s[2],
        &sig.pi.s[3],
        &sig.pi.s[4],
    );

    let r1 = grpkey.u.scaled(s_alpha).minus(&sig.t1.scaled(c));
    let r2 = grpkey.v.scaled(s_beta).minus(&sig.t2.scaled(c));

    let mut neg_ab = s_alpha.plus(s_beta);
    neg_ab.negate();
    let mut neg_d = s_d1.plus(s_d2);
    neg_d.negate();
    // the statement of the pairing relation:
    // e(g1, g2) - e(T3, w)
    let y3 = PairingCurve::pair(&grpkey.g1, &grpkey.g2)
        .minus(&PairingCurve::pair(&sig.t3, &grpkey.w));
    let r3 = PairingCurve::pair(&sig.t3, &grpkey.g2)
        .scaled(s_x)
        .plus(&PairingCurve::pair(&grpkey.h, &grpkey.w).scaled(&neg_ab))
        .plus(&PairingCurve::pair(&grpkey.h, &grpkey.g2).scaled(&neg_d))
        .minus(&y3.scaled(c));

    let r4 = sig.t1.scaled(s_x).minus(&grpkey.u.scaled(s_d1));
    let r5 = sig.t2.scaled(s_x).minus(&grpkey.v.scaled(s_d2));

    let expected = challenge(grpkey, &sig.t1, &sig.t2, &sig.t3, &r1, &r2, &r3, &r4, &r5, msg);
    Ok(expected == *c)
}

pub fn verify_batch(
    sigs: &[&Bbs04Signature],
    msgs: &[&Message],
    grpkey: &Bbs04GroupKey,
) -> GroupsigResult<bool> {
    if sigs.len() != msgs.len() {
        return Err(GroupsigError::InvalidArgument(
            "signature and message counts differ",
        ));
    }
    for (&sig, &msg) in sigs.iter().zip(msgs.iter()) {
        if !verify(sig, msg, grpkey)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Decrypts the certificate out of a signature with the opening
/// exponents.
fn decrypt_certificate(sig: &Bbs04Signature, mgrkey: &Bbs04ManagerKey) -> G1 {
    sig.t3
        .minus(&sig.t1.scaled(&mgrkey.xi1))
        .minus(&sig.t2.scaled(&mgrkey.xi2))
}

/// Recovers the signer's GML index by decrypting the certificate and
/// scanning the list. BBS04 produces no opening proof.
pub fn open(
    sig: &Bbs04Signature,
    grpkey: &Bbs04GroupKey,
    mgrkey: &Bbs04ManagerKey,
    gml: &Gml,
) -> GroupsigResult<u64> {
    let _ = grpkey;
    let a = decrypt_certificate(sig, mgrkey);
    for entry in gml.entries() {
        let entry_a = match &entry.data {
            GmlEntryData::Bbs04 { a, .. } => a,
            _ => return Err(GroupsigError::SchemeMismatch),
        };
        if *entry_a == a {
            return Ok(entry.index);
        }
    }
    Err(GroupsigError::Fail("no gml entry matches the signature"))
}

/// Extracts the tracing trapdoor of the member at `index` and, when a
/// CRL is supplied, records the revocation in it.
pub fn reveal(
    gml: &Gml,
    index: u64,
    crl: Option<&mut Crl>,
) -> GroupsigResult<Trapdoor> {
    let entry = gml.get(index)?;
    let a = match &entry.data {
        GmlEntryData::Bbs04 { a, .. } => a.clone(),
        _ => return Err(GroupsigError::SchemeMismatch),
    };
    let trapdoor = Trapdoor::Bbs04(a);
    if let Some(crl) = crl {
        crl.insert(CrlEntry {
            trapdoor: trapdoor.clone(),
            index,
        })?;
    }
    Ok(trapdoor)
}

/// Answers whether the signature was produced by a CRL-listed member,
/// by opening it and testing the recovered trapdoor. Needs the manager
/// key; BBS04 has no native tracing.
pub fn trace(
    sig: &Bbs04Signature,
    grpkey: &Bbs04GroupKey,
    crl: &Crl,
    mgrkey: &Bbs04ManagerKey,
) -> GroupsigResult<bool> {
    let _ = grpkey;
    let a = decrypt_certificate(sig, mgrkey);
    Ok(crl.contains(&Trapdoor::Bbs04(a)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Scheme;
    use rand::prelude::*;

    fn group() -> (Bbs04GroupKey, Bbs04ManagerKey, Gml) {
        sysenv::init(Some(thread_rng().gen())).unwrap();
        let mut rng = thread_rng();
        let (grpkey, mgrkey) = setup(&mut rng).unwrap();
        let gml = Gml::new(Scheme::Bbs04).unwrap();
        (grpkey, mgrkey, gml)
    }

    fn enroll(grpkey: &Bbs04GroupKey, mgrkey: &Bbs04ManagerKey, gml: &mut Gml) -> Bbs04MemberKey {
        let mut memkey = Bbs04MemberKey::new();
        let m1 = join_mgr(gml, mgrkey, 0, None, grpkey).unwrap().unwrap();
        assert!(join_mem(&mut memkey, 1, Some(&m1), grpkey)
            .unwrap()
            .is_none());
        memkey
    }

    #[test]
    fn sign_and_verify() {
        let (grpkey, mgrkey, mut gml) = group();
        let memkey = enroll(&grpkey, &mgrkey, &mut gml);

        let msg = Message::from_string("Hello, World!");
        let sig = sign(&msg, &memkey, &grpkey, None).unwrap();
        assert!(verify(&sig, &msg, &grpkey).unwrap());

        let other = Message::from_string("Hello, Worlds!");
        assert!(!verify(&sig, &other, &grpkey).unwrap());
    }

    #[test]
    fn seeded_signatures_are_reproducible() {
        let (grpkey, mgrkey, mut gml) = group();
        let memkey = enroll(&grpkey, &mgrkey, &mut gml);

        let msg = Message::from_string("Hello, World!");
        let sig1 = sign(&msg, &memkey, &grpkey, Some(99)).unwrap();
        let sig2 = sign(&msg, &memkey, &grpkey, Some(99)).unwrap();
        assert_eq!(sig1, sig2);
    }

    #[test]
    fn open_recovers_the_signer() {
        let (grpkey, mgrkey, mut gml) = group();
        let _first = enroll(&grpkey, &mgrkey, &mut gml);
        let second = enroll(&grpkey, &mgrkey, &mut gml);

        let msg = Message::from_string("Hello, World!");
        let sig = sign(&msg, &second, &grpkey, None).unwrap();
        assert_eq!(open(&sig, &grpkey, &mgrkey, &gml).unwrap(), 1);
    }

    #[test]
    fn open_fails_on_foreign_gml() {
        let (grpkey, mgrkey, mut gml) = group();
        let memkey = enroll(&grpkey, &mgrkey, &mut gml);

        let empty_gml = Gml::new(Scheme::Bbs04).unwrap();
        let msg = Message::from_string("Hello, World!");
        let sig = sign(&msg, &memkey, &grpkey, None).unwrap();
        assert!(matches!(
            open(&sig, &grpkey, &mgrkey, &empty_gml),
            Err(GroupsigError::Fail(_))
        ));
    }

    #[test]
    fn reveal_and_trace() {
        let (grpkey, mgrkey, mut gml) = group();
        let alice = enroll(&grpkey, &mgrkey, &mut gml);
        let bob = enroll(&grpkey, &mgrkey, &mut gml);

        let mut crl = Crl::new(Scheme::Bbs04).unwrap();
        reveal(&gml, 0, Some(&mut crl)).unwrap();
        assert_eq!(crl.len(), 1);

        let msg = Message::from_string("Hello, World!");
        let sig_alice = sign(&msg, &alice, &grpkey, None).unwrap();
        let sig_bob = sign(&msg, &bob, &grpkey, None).unwrap();

        assert!(trace(&sig_alice, &grpkey, &crl, &mgrkey).unwrap());
        assert!(!trace(&sig_bob, &grpkey, &crl, &mgrkey).unwrap());
    }

    #[test]
    fn batch_verification() {
        let (grpkey, mgrkey, mut gml) = group();
        let memkey = enroll(&grpkey, &mgrkey, &mut gml);

        let msgs = (0..3)
            .map(|i| Message::from_string(&format!("message {}", i)))
            .collect::<Vec<_>>();
        let sigs = msgs
            .iter()
            .map(|m| sign(m, &memkey, &grpkey, None).unwrap())
            .collect::<Vec<_>>();

        let sig_refs = sigs.iter().collect::<Vec<_>>();
        let msg_refs = msgs.iter().collect::<Vec<_>>();
        assert!(verify_batch(&sig_refs, &msg_refs, &grpkey).unwrap());

        let wrong = Message::from_string("tampered");
        let bad_msgs = vec![&msgs[0], &msgs[1], &wrong];
        assert!(!verify_batch(&sig_refs, &bad_msgs, &grpkey).unwrap());
    }

    #[test]
    fn signature_body_roundtrip() {
        let (grpkey, mgrkey, mut gml) = group();
        let memkey = enroll(&grpkey, &mgrkey, &mut gml);
        let msg = Message::from_string("Hello, World!");
        let sig = sign(&msg, &memkey, &grpkey, None).unwrap();

        let mut w = Writer::new();
        sig.write_body(&mut w);
        let bytes = w.finish();
        let mut r = Reader::new(&bytes);
        let imported = Bbs04Signature::read_body(&mut r).unwrap();
        r.finish().unwrap();
        assert_eq!(sig, imported);
        assert!(verify(&imported, &msg, &grpkey).unwrap());
    }
}
