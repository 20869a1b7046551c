//! KLAP20: group signatures with verifiable opening.
//!
//! Separate issuer and opener. The issuer certifies the member secret
//! with a PS credential; the GML entry stores the member's G2 credential
//! encrypted under each of the opener's two key shares. Open picks one
//! share at random, decrypts every entry and matches the signature by a
//! pairing equation; the opening comes with a proof any verifier can
//! check against the signature alone.

use crate::curve::bls12381::{PairingCurve, Scalar, G1, G2, GT};
use crate::error::{EncodingError, GroupsigError, GroupsigResult};
use crate::gml::{Gml, GmlEntryData};
use crate::group::{Element, Encodable, PairingCurve as PC};
use crate::message::Message;
use crate::schemes::ps;
use crate::spk::{self, SpkRep};
use crate::sysenv;
use crate::wire::{Reader, Writer};
use rand_core::RngCore;

const JOIN_DOMAIN: &[u8] = b"groupsig-klap20-join";
const SIGN_DOMAIN: &[u8] = b"groupsig-klap20-sign";
const OPEN_DOMAIN: &[u8] = b"groupsig-klap20-open";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Klap20GroupKey {
    pub g: G1,
    pub gg: G2,
    pub xx: G2,
    pub yy: G2,
    /// Opener public shares, set by the second setup call.
    pub opk0: Option<G2>,
    pub opk1: Option<G2>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Klap20ManagerKey {
    Issuer { x: Scalar, y: Scalar },
    Opener { z0: Scalar, z1: Scalar },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Klap20MemberKey {
    pub z: Option<Scalar>,
    pub cred: Option<ps::Credential>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Klap20Signature {
    /// Fresh base and its `z`-multiple; the pair the opener matches
    /// against GML entries.
    pub uu: G1,
    pub ww: G1,
    pub sigma1: G1,
    pub sigma2: G1,
    pub bar: G1,
    pub pi: SpkRep,
}

/// A verifiable opening: the decrypted member credential `ff`, the GML
/// entry layer it came from, the precomputed pairing tag, and the proof
/// that the decryption used the opener share matching the group key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Klap20Proof {
    pub b: u8,
    pub ff: G2,
    pub ss: G2,
    pub ffb: G2,
    pub tau: GT,
    pub pi: SpkRep,
}

impl Klap20GroupKey {
    pub(crate) fn write_body(&self, w: &mut Writer) {
        w.put_element(&self.g);
        w.put_element(&self.gg);
        w.put_element(&self.xx);
        w.put_element(&self.yy);
        w.put_opt_element(self.opk0.as_ref());
        w.put_opt_element(self.opk1.as_ref());
    }

    pub(crate) fn read_body(r: &mut Reader) -> Result<Self, EncodingError> {
        Ok(Klap20GroupKey {
            g: r.get_element("g")?,
            gg: r.get_element("gg")?,
            xx: r.get_element("xx")?,
            yy: r.get_element("yy")?,
            opk0: r.get_opt_element("opk0")?,
            opk1: r.get_opt_element("opk1")?,
        })
    }

    pub(crate) fn body_bytes(&self) -> Vec<u8> {
        let mut w = Writer::new();
        self.write_body(&mut w);
        w.finish()
    }

    fn ipk(&self) -> ps::IssuerPublic {
        ps::IssuerPublic {
            xx: self.xx.clone(),
            yy: self.yy.clone(),
        }
    }

    fn opks(&self) -> GroupsigResult<(&G2, &G2)> {
        match (&self.opk0, &self.opk1) {
            (Some(opk0), Some(opk1)) => Ok((opk0, opk1)),
            _ => Err(GroupsigError::InvalidArgument(
                "group key has no opener shares yet",
            )),
        }
    }
}

impl Klap20ManagerKey {
    pub(crate) fn write_body(&self, w: &mut Writer) {
        match self {
            Klap20ManagerKey::Issuer { x, y } => {
                w.put_element(x);
                w.put_element(y);
                w.put_opt_element::<Scalar>(None);
                w.put_opt_element::<Scalar>(None);
            }
            Klap20ManagerKey::Opener { z0, z1 } => {
                w.put_opt_element::<Scalar>(None);
                w.put_opt_element::<Scalar>(None);
                w.put_element(z0);
                w.put_element(z1);
            }
        }
    }

    pub(crate) fn read_body(r: &mut Reader) -> Result<Self, EncodingError> {
        let x = r.get_opt_element::<Scalar>("x")?;
        let y = r.get_opt_element::<Scalar>("y")?;
        let z0 = r.get_opt_element::<Scalar>("z0")?;
        let z1 = r.get_opt_element::<Scalar>("z1")?;
        match (x, y, z0, z1) {
            (Some(x), Some(y), None, None) => Ok(Klap20ManagerKey::Issuer { x, y }),
            (None, None, Some(z0), Some(z1)) => Ok(Klap20ManagerKey::Opener { z0, z1 }),
            _ => Err(EncodingError::MissingField("manager key role")),
        }
    }

    fn issuer(&self) -> GroupsigResult<ps::IssuerSecret> {
        match self {
            Klap20ManagerKey::Issuer { x, y } => Ok(ps::IssuerSecret {
                x: x.clone(),
                y: y.clone(),
            }),
            _ => Err(GroupsigError::InvalidArgument(
                "operation requires the issuer key",
            )),
        }
    }

    fn opener(&self) -> GroupsigResult<(&Scalar, &Scalar)> {
        match self {
            Klap20ManagerKey::Opener { z0, z1 } => Ok((z0, z1)),
            _ => Err(GroupsigError::InvalidArgument(
                "operation requires the opener key",
            )),
        }
    }
}

impl Klap20MemberKey {
    pub fn new() -> Self {
        Klap20MemberKey {
            z: None,
            cred: None,
        }
    }

    pub(crate) fn write_body(&self, w: &mut Writer) {
        w.put_opt_element(self.z.as_ref());
        w.put_opt_element(self.cred.as_ref().map(|c| &c.sigma1));
        w.put_opt_element(self.cred.as_ref().map(|c| &c.sigma2));
    }

    pub(crate) fn read_body(r: &mut Reader) -> Result<Self, EncodingError> {
        let z = r.get_opt_element("z")?;
        let sigma1 = r.get_opt_element::<G1>("sigma1")?;
        let sigma2 = r.get_opt_element::<G1>("sigma2")?;
        let cred = match (sigma1, sigma2) {
            (Some(sigma1), Some(sigma2)) => Some(ps::Credential { sigma1, sigma2 }),
            (None, None) => None,
            _ => return Err(EncodingError::MissingField("credential half")),
        };
        Ok(Klap20MemberKey { z, cred })
    }

    fn complete(&self) -> GroupsigResult<(&Scalar, &ps::Credential)> {
        match (&self.z, &self.cred) {
            (Some(z), Some(cred)) => Ok((z, cred)),
            _ => Err(GroupsigError::InvalidArgument(
                "member key has not completed the join protocol",
            )),
        }
    }
}

impl Klap20Signature {
    pub(crate) fn write_body(&self, w: &mut Writer) {
        w.put_element(&self.uu);
        w.put_element(&self.ww);
        w.put_element(&self.sigma1);
        w.put_element(&self.sigma2);
        w.put_element(&self.bar);
        self.pi.write_to(w);
    }

    pub(crate) fn read_body(r: &mut Reader) -> Result<Self, EncodingError> {
        Ok(Klap20Signature {
            uu: r.get_element("uu")?,
            ww: r.get_element("ww")?,
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

impl Klap20Proof {
    pub(crate) fn write_body(&self, w: &mut Writer) {
        w.put_u8(self.b);
        w.put_element(&self.ff);
        w.put_element(&self.ss);
        w.put_element(&self.ffb);
        w.put_element(&self.tau);
        self.pi.write_to(w);
    }

    pub(crate) fn read_body(r: &mut Reader) -> Result<Self, EncodingError> {
        Ok(Klap20Proof {
            b: r.get_u8("layer bit")?,
            ff: r.get_element("ff")?,
            ss: r.get_element("ss")?,
            ffb: r.get_element("ffb")?,
            tau: r.get_element("tau")?,
            pi: SpkRep::read_from(r, 1)?,
        })
    }
}

/// First setup call: creates the group key and the issuer key. The
/// opener shares are installed by [`setup_opener`].
pub fn setup_issuer<R: RngCore>(rng: &mut R) -> (Klap20GroupKey, Klap20ManagerKey) {
    let g = G1::one();
    let gg = G2::one();
    let (sk, pk) = ps::issuer_keygen(&gg, rng);
    (
        Klap20GroupKey {
            g,
            gg,
            xx: pk.xx,
            yy: pk.yy,
            opk0: None,
            opk1: None,
        },
        Klap20ManagerKey::Issuer { x: sk.x, y: sk.y },
    )
}

/// Second setup call: completes the group key with the opener public
/// shares and returns the opener key.
pub fn setup_opener<R: RngCore>(
    grpkey: &mut Klap20GroupKey,
    rng: &mut R,
) -> GroupsigResult<Klap20ManagerKey> {
    if grpkey.opk0.is_some() || grpkey.opk1.is_some() {
        return Err(GroupsigError::InvalidArgument(
            "group key already has opener shares",
        ));
    }
    let z0 = Scalar::rand(rng);
    let z1 = Scalar::rand(rng);
    grpkey.opk0 = Some(grpkey.gg.scaled(&z0));
    grpkey.opk1 = Some(grpkey.gg.scaled(&z1));
    Ok(Klap20ManagerKey::Opener { z0, z1 })
}

/// Issuer side of the join protocol (steps 0 and 2). Appends the new
/// member's entry to the GML on step 2.
pub fn join_mgr(
    gml: &mut Gml,
    mgrkey: &Klap20ManagerKey,
    seq: u8,
    msg_in: Option<&Message>,
    grpkey: &Klap20GroupKey,
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
            let sk = mgrkey.issuer()?;
            let (opk0, opk1) = grpkey.opks()?;
            let msg_in = msg_in.ok_or(GroupsigError::InvalidArgument(
                "join step 2 requires the member message",
            ))?;
            let mut r = Reader::new(&msg_in.bytes);
            let f = r.get_element::<G1>("f")?;
            let ff = r.get_element::<G2>("ff")?;
            let n = r.get_element::<Scalar>("nonce")?;
            let pi = SpkRep::read_from(&mut r, 1)?;
            r.finish()?;

            // the two commitments must hide the same exponent
            if PairingCurve::pair(&f, &grpkey.gg) != PairingCurve::pair(&grpkey.g, &ff) {
                return Err(GroupsigError::InvalidArgument(
                    "member commitments are inconsistent",
                ));
            }
            let ok = spk::rep_verify(
                JOIN_DOMAIN,
                &pi,
                &[grpkey.g.clone()],
                &[f.clone()],
                &[&[(0, 0)]],
                &[&n.marshal(), &ff.marshal(), &grpkey.body_bytes()],
            )?;
            if !ok {
                return Err(GroupsigError::InvalidArgument(
                    "member commitment proof does not verify",
                ));
            }

            let mut rng = sysenv::operation_rng(None)?;

            // encrypt the member credential under both opener shares
            let s0 = Scalar::rand(&mut rng);
            let s1 = Scalar::rand(&mut rng);
            let entry = GmlEntryData::Klap20 {
                ss0: grpkey.gg.scaled(&s0),
                ff0: ff.plus(&opk0.scaled(&s0)),
                ss1: grpkey.gg.scaled(&s1),
                ff1: ff.plus(&opk1.scaled(&s1)),
                tau: PairingCurve::pair(&grpkey.g, &ff),
            };
            gml.push(entry)?;

            let cred = ps::issue(&sk, &grpkey.g, &f, &mut rng);
            let mut w = Writer::new();
            w.put_element(&cred.sigma1);
            w.put_element(&cred.sigma2);
            Ok(Some(Message::from_bytes(w.finish())))
        }
        _ => Err(GroupsigError::InvalidArgument("invalid issuer join step")),
    }
}

/// Member side of the join protocol (steps 1 and 3).
pub fn join_mem(
    memkey: &mut Klap20MemberKey,
    seq: u8,
    msg_in: Option<&Message>,
    grpkey: &Klap20GroupKey,
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
            let z = Scalar::rand(&mut rng);
            let f = grpkey.g.scaled(&z);
            let ff = grpkey.gg.scaled(&z);
            let pi = spk::rep_sign(
                JOIN_DOMAIN,
                &[grpkey.g.clone()],
                &[f.clone()],
                &[&[(0, 0)]],
                &[&z],
                &[&n.marshal(), &ff.marshal(), &grpkey.body_bytes()],
                &mut rng,
            )?;
            memkey.z = Some(z);

            let mut w = Writer::new();
            w.put_element(&f);
            w.put_element(&ff);
            w.put_element(&n);
            pi.write_to(&mut w);
            Ok(Some(Message::from_bytes(w.finish())))
        }
        3 => {
            let z = memkey
                .z
                .as_ref()
                .ok_or(GroupsigError::InvalidArgument("join step 1 did not run"))?;
            let mut r = Reader::new(&msg_in.bytes);
            let cred = ps::Credential {
                sigma1: r.get_element("sigma1")?,
                sigma2: r.get_element("sigma2")?,
            };
            r.finish()?;

            if !ps::credential_valid(&cred, z, &grpkey.gg, &grpkey.ipk()) {
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
    memkey: &Klap20MemberKey,
    grpkey: &Klap20GroupKey,
    seed: Option<u64>,
) -> GroupsigResult<Klap20Signature> {
    let (z, cred) = memkey.complete()?;
    let mut rng = sysenv::operation_rng(seed)?;

    let a = Scalar::rand(&mut rng);
    let uu = grpkey.g.scaled(&a);
    let ww = uu.scaled(z);
    let shown = ps::show(cred, z, &mut rng);

    let pi = spk::rep_sign(
        SIGN_DOMAIN,
        &[uu.clone(), shown.sigma1.clone()],
        &[ww.clone(), shown.bar.clone()],
        &[&[(0, 0)], &[(1, 0)]],
        &[z],
        &[
            &grpkey.body_bytes(),
            &shown.sigma2.marshal(),
            &msg.bytes,
        ],
        &mut rng,
    )?;

    Ok(Klap20Signature {
        uu,
        ww,
        sigma1: shown.sigma1,
        sigma2: shown.sigma2,
        bar: shown.bar,
        pi,
    })
}

pub fn verify(
    sig: &Klap20Signature,
    msg: &Message,
    grpkey: &Klap20GroupKey,
) -> GroupsigResult<bool> {
    if !ps::shown_valid(&sig.shown(), &grpkey.gg, &grpkey.ipk()) {
        return Ok(false);
    }
    spk::rep_verify(
        SIGN_DOMAIN,
        &sig.pi,
        &[sig.uu.clone(), sig.sigma1.clone()],
        &[sig.ww.clone(), sig.bar.clone()],
        &[&[(0, 0)], &[(1, 0)]],
        &[
            &grpkey.body_bytes(),
            &sig.sigma2.marshal(),
            &msg.bytes,
        ],
    )
}

pub fn verify_batch(
    sigs: &[&Klap20Signature],
    msgs: &[&Message],
    grpkey: &Klap20GroupKey,
) -> GroupsigResult<bool> {
    if sigs.len() != msgs.len() {
        return Err(GroupsigError::InvalidArgument(
            "signature and message counts differ",
        ));
    }
    let mut shows = Vec::with_capacity(sigs.len());
    for (&sig, &msg) in sigs.iter().zip(msgs.iter()) {
        let ok = spk::rep_verify(
            SIGN_DOMAIN,
            &sig.pi,
            &[sig.uu.clone(), sig.sigma1.clone()],
            &[sig.ww.clone(), sig.bar.clone()],
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

/// Recovers the GML index of the signer and produces a verifiable
/// opening proof. Fails logically when no entry matches.
pub fn open(
    sig: &Klap20Signature,
    grpkey: &Klap20GroupKey,
    mgrkey: &Klap20ManagerKey,
    gml: &Gml,
) -> GroupsigResult<(u64, Klap20Proof)> {
    let (z0, z1) = mgrkey.opener()?;
    let (opk0, opk1) = grpkey.opks()?;

    // pick which encryption layer to decrypt
    let b = sysenv::random_in_range(1)? as u8;
    let (zb, opkb) = if b == 1 { (z1, opk1) } else { (z0, opk0) };

    let mut found: Option<(u64, G2, G2, G2, GT)> = None;
    for entry in gml.entries() {
        let (ss0, ff0, ss1, ff1, tau) = match &entry.data {
            GmlEntryData::Klap20 {
                ss0,
                ff0,
                ss1,
                ff1,
                tau,
            } => (ss0, ff0, ss1, ff1, tau),
            _ => return Err(GroupsigError::SchemeMismatch),
        };
        let (ssb, ffb) = if b == 1 { (ss1, ff1) } else { (ss0, ff0) };

        let ff = ffb.minus(&ssb.scaled(zb));
        if PairingCurve::pair(&sig.uu, &ff) == PairingCurve::pair(&sig.ww, &grpkey.gg)
            && *tau == PairingCurve::pair(&grpkey.g, &ff)
        {
            found = Some((entry.index, ff, ssb.clone(), ffb.clone(), tau.clone()));
            break;
        }
    }

    let (index, ff, ss, ffb, tau) = match found {
        Some(hit) => hit,
        None => return Err(GroupsigError::Fail("no gml entry matches the signature")),
    };

    let mut rng = sysenv::operation_rng(None)?;
    let pi = spk::rep_sign(
        OPEN_DOMAIN,
        &[grpkey.gg.clone(), ss.clone()],
        &[opkb.clone(), ffb.minus(&ff)],
        &[&[(0, 0)], &[(1, 0)]],
        &[zb],
        &[&sig.body_bytes(), &tau.marshal(), &[b]],
        &mut rng,
    )?;

    Ok((
        index,
        Klap20Proof {
            b,
            ff,
            ss,
            ffb,
            tau,
            pi,
        },
    ))
}

/// Checks an opening proof against a signature, without access to the
/// GML or the opener key.
pub fn open_verify(
    proof: &Klap20Proof,
    sig: &Klap20Signature,
    grpkey: &Klap20GroupKey,
) -> GroupsigResult<bool> {
    if proof.b > 1 {
        return Err(GroupsigError::InvalidArgument("invalid layer bit"));
    }
    let (opk0, opk1) = grpkey.opks()?;
    let opkb = if proof.b == 1 { opk1 } else { opk0 };

    // the disclosed credential must belong to this signature
    if PairingCurve::pair(&sig.uu, &proof.ff) != PairingCurve::pair(&sig.ww, &grpkey.gg) {
        return Ok(false);
    }
    if proof.tau != PairingCurve::pair(&grpkey.g, &proof.ff) {
        return Ok(false);
    }

    spk::rep_verify(
        OPEN_DOMAIN,
        &proof.pi,
        &[grpkey.gg.clone(), proof.ss.clone()],
        &[opkb.clone(), proof.ffb.minus(&proof.ff)],
        &[&[(0, 0)], &[(1, 0)]],
        &[&sig.body_bytes(), &proof.tau.marshal(), &[proof.b]],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    fn group() -> (Klap20GroupKey, Klap20ManagerKey, Klap20ManagerKey, Gml) {
        sysenv::init(Some(thread_rng().gen())).unwrap();
        let mut rng = thread_rng();
        let (mut grpkey, isskey) = setup_issuer(&mut rng);
        let opnkey = setup_opener(&mut grpkey, &mut rng).unwrap();
        let gml = Gml::new(crate::registry::Scheme::Klap20).unwrap();
        (grpkey, isskey, opnkey, gml)
    }

    fn enroll(
        grpkey: &Klap20GroupKey,
        isskey: &Klap20ManagerKey,
        gml: &mut Gml,
    ) -> Klap20MemberKey {
        let mut memkey = Klap20MemberKey::new();
        let m1 = join_mgr(gml, isskey, 0, None, grpkey).unwrap().unwrap();
        let m2 = join_mem(&mut memkey, 1, Some(&m1), grpkey).unwrap().unwrap();
        let m3 = join_mgr(gml, isskey, 2, Some(&m2), grpkey).unwrap().unwrap();
        assert!(join_mem(&mut memkey, 3, Some(&m3), grpkey)
            .unwrap()
            .is_none());
        memkey
    }

    #[test]
    fn sign_and_verify() {
        let (grpkey, isskey, _opnkey, mut gml) = group();
        let memkey = enroll(&grpkey, &isskey, &mut gml);

        let msg = Message::from_string("Hello, World!");
        let sig = sign(&msg, &memkey, &grpkey, None).unwrap();
        assert!(verify(&sig, &msg, &grpkey).unwrap());

        let other = Message::from_string("Hello, Worlds!");
        assert!(!verify(&sig, &other, &grpkey).unwrap());
    }

    #[test]
    fn setup_opener_runs_once() {
        sysenv::init(Some(1)).unwrap();
        let mut rng = thread_rng();
        let (mut grpkey, _isskey) = setup_issuer(&mut rng);
        setup_opener(&mut grpkey, &mut rng).unwrap();
        assert!(setup_opener(&mut grpkey, &mut rng).is_err());
    }

    #[test]
    fn join_records_one_gml_entry_per_member() {
        let (grpkey, isskey, _opnkey, mut gml) = group();
        enroll(&grpkey, &isskey, &mut gml);
        enroll(&grpkey, &isskey, &mut gml);
        assert_eq!(gml.len(), 2);
    }

    #[test]
    fn open_recovers_the_signer() {
        let (grpkey, isskey, opnkey, mut gml) = group();
        let _first = enroll(&grpkey, &isskey, &mut gml);
        let second = enroll(&grpkey, &isskey, &mut gml);

        let msg = Message::from_string("Hello, World!");
        let sig = sign(&msg, &second, &grpkey, None).unwrap();

        let (index, proof) = open(&sig, &grpkey, &opnkey, &gml).unwrap();
        assert_eq!(index, 1);
        assert!(open_verify(&proof, &sig, &grpkey).unwrap());
    }

    #[test]
    fn open_proof_rejects_tampered_signature() {
        let (grpkey, isskey, opnkey, mut gml) = group();
        let memkey = enroll(&grpkey, &isskey, &mut gml);

        let msg = Message::from_string("Hello, World!");
        let sig = sign(&msg, &memkey, &grpkey, None).unwrap();
        let (_, proof) = open(&sig, &grpkey, &opnkey, &gml).unwrap();

        let mut tampered = sig.clone();
        tampered.ww = G1::rand(&mut thread_rng());
        assert!(!open_verify(&proof, &tampered, &grpkey).unwrap());
    }

    #[test]
    fn open_fails_for_unlisted_member() {
        let (grpkey, isskey, opnkey, mut gml) = group();
        let memkey = enroll(&grpkey, &isskey, &mut gml);

        // a second group whose GML does not contain this member
        let (grpkey2, isskey2, _opnkey2, mut gml2) = group();
        enroll(&grpkey2, &isskey2, &mut gml2);

        let msg = Message::from_string("Hello, World!");
        let sig = sign(&msg, &memkey, &grpkey, None).unwrap();
        assert!(matches!(
            open(&sig, &grpkey, &opnkey, &gml2),
            Err(GroupsigError::Fail(_))
        ));
        assert_eq!(gml.len(), 1);
    }

    #[test]
    fn batch_verification() {
        let (grpkey, isskey, _opnkey, mut gml) = group();
        let memkey = enroll(&grpkey, &isskey, &mut gml);

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
        let (grpkey, isskey, _opnkey, mut gml) = group();
        let memkey = enroll(&grpkey, &isskey, &mut gml);
        let msg = Message::from_string("Hello, World!");
        let sig = sign(&msg, &memkey, &grpkey, None).unwrap();

        let bytes = sig.body_bytes();
        let mut r = Reader::new(&bytes);
        let imported = Klap20Signature::read_body(&mut r).unwrap();
        r.finish().unwrap();
        assert_eq!(sig, imported);
        assert!(verify(&imported, &msg, &grpkey).unwrap());
    }
}
