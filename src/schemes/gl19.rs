//! GL19: encrypt-then-sign group signatures with blinding and
//! conversion.
//!
//! Signatures embed an ElGamal encryption of the member's pseudonym
//! under the converter public key. A receiver blinds signatures under a
//! fresh blinding key, the converter decrypts its layer and raises every
//! pseudonym of the batch to one batch-constant exponent before
//! shuffling, and the receiver unblinds final pseudonyms that are equal
//! exactly when the underlying member is the same. Credentials carry an
//! expiration timestamp; verification rejects expired signatures.

use crate::curve::bls12381::{Scalar, G1, G2};
use crate::error::{EncodingError, GroupsigError, GroupsigResult};
use crate::group::{Element, Encodable, Point};
use crate::identity::Identity;
use crate::message::Message;
use crate::registry::Scheme;
use crate::schemes::ps;
use crate::spk::{self, SpkRep};
use crate::sysenv;
use crate::wire::{Reader, Writer};
use rand_core::RngCore;
use std::time::{SystemTime, UNIX_EPOCH};

const JOIN_DOMAIN: &[u8] = b"groupsig-gl19-join";
const SIGN_DOMAIN: &[u8] = b"groupsig-gl19-sign";

/// Lifetime of an issued credential, in seconds (90 days).
const CRED_LIFETIME_SECS: u64 = 90 * 24 * 3600;

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gl19GroupKey {
    pub g: G1,
    pub gg: G2,
    pub xx: G2,
    pub yy: G2,
    /// Converter public key, set by the second setup call.
    pub cpk: Option<G1>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gl19ManagerKey {
    Issuer { x: Scalar, y: Scalar },
    Converter { csk: Scalar },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gl19MemberKey {
    pub y: Option<Scalar>,
    pub cred: Option<ps::Credential>,
    pub expiration: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gl19Signature {
    pub sigma1: G1,
    pub sigma2: G1,
    pub bar: G1,
    /// ElGamal encryption of the pseudonym under the converter key.
    pub nym1: G1,
    pub nym2: G1,
    pub pi: SpkRep,
    pub expiration: u64,
}

/// A blinded signature: the doubly-encrypted pseudonym and the
/// encryption of the hashed message under the blinding key. After
/// convert, `nym3` is left as the identity element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gl19BlindSignature {
    pub nym1: G1,
    pub nym2: G1,
    pub nym3: G1,
    pub c1: G1,
    pub c2: G1,
}

/// A blinding keypair; the private half is absent on the converter side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gl19BlindingKey {
    pub pk: G1,
    pub sk: Option<Scalar>,
}

impl Gl19GroupKey {
    pub(crate) fn write_body(&self, w: &mut Writer) {
        w.put_element(&self.g);
        w.put_element(&self.gg);
        w.put_element(&self.xx);
        w.put_element(&self.yy);
        w.put_opt_element(self.cpk.as_ref());
    }

    pub(crate) fn read_body(r: &mut Reader) -> Result<Self, EncodingError> {
        Ok(Gl19GroupKey {
            g: r.get_element("g")?,
            gg: r.get_element("gg")?,
            xx: r.get_element("xx")?,
            yy: r.get_element("yy")?,
            cpk: r.get_opt_element("cpk")?,
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

    fn cpk(&self) -> GroupsigResult<&G1> {
        self.cpk.as_ref().ok_or(GroupsigError::InvalidArgument(
            "group key has no converter key yet",
        ))
    }
}

impl Gl19ManagerKey {
    pub(crate) fn write_body(&self, w: &mut Writer) {
        match self {
            Gl19ManagerKey::Issuer { x, y } => {
                w.put_element(x);
                w.put_element(y);
                w.put_opt_element::<Scalar>(None);
            }
            Gl19ManagerKey::Converter { csk } => {
                w.put_opt_element::<Scalar>(None);
                w.put_opt_element::<Scalar>(None);
                w.put_element(csk);
            }
        }
    }

    pub(crate) fn read_body(r: &mut Reader) -> Result<Self, EncodingError> {
        let x = r.get_opt_element::<Scalar>("x")?;
        let y = r.get_opt_element::<Scalar>("y")?;
        let csk = r.get_opt_element::<Scalar>("csk")?;
        match (x, y, csk) {
            (Some(x), Some(y), None) => Ok(Gl19ManagerKey::Issuer { x, y }),
            (None, None, Some(csk)) => Ok(Gl19ManagerKey::Converter { csk }),
            _ => Err(EncodingError::MissingField("manager key role")),
        }
    }

    fn issuer(&self) -> GroupsigResult<ps::IssuerSecret> {
        match self {
            Gl19ManagerKey::Issuer { x, y } => Ok(ps::IssuerSecret {
                x: x.clone(),
                y: y.clone(),
            }),
            _ => Err(GroupsigError::InvalidArgument(
                "operation requires the issuer key",
            )),
        }
    }

    fn converter(&self) -> GroupsigResult<&Scalar> {
        match self {
            Gl19ManagerKey::Converter { csk } => Ok(csk),
            _ => Err(GroupsigError::InvalidArgument(
                "operation requires the converter key",
            )),
        }
    }
}

impl Gl19MemberKey {
    pub fn new() -> Self {
        Gl19MemberKey {
            y: None,
            cred: None,
            expiration: 0,
        }
    }

    pub(crate) fn write_body(&self, w: &mut Writer) {
        w.put_opt_element(self.y.as_ref());
        w.put_opt_element(self.cred.as_ref().map(|c| &c.sigma1));
        w.put_opt_element(self.cred.as_ref().map(|c| &c.sigma2));
        w.put_u64(self.expiration);
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
        Ok(Gl19MemberKey {
            y,
            cred,
            expiration: r.get_u64("expiration")?,
        })
    }

    fn complete(&self) -> GroupsigResult<(&Scalar, &ps::Credential)> {
        match (&self.y, &self.cred) {
            (Some(y), Some(cred)) => Ok((y, cred)),
            _ => Err(GroupsigError::InvalidArgument(
                "member key has not completed the join protocol",
            )),
        }
    }
}

impl Gl19Signature {
    pub(crate) fn write_body(&self, w: &mut Writer) {
        w.put_element(&self.sigma1);
        w.put_element(&self.sigma2);
        w.put_element(&self.bar);
        w.put_element(&self.nym1);
        w.put_element(&self.nym2);
        self.pi.write_to(w);
        w.put_u64(self.expiration);
    }

    pub(crate) fn read_body(r: &mut Reader) -> Result<Self, EncodingError> {
        Ok(Gl19Signature {
            sigma1: r.get_element("sigma1")?,
            sigma2: r.get_element("sigma2")?,
            bar: r.get_element("bar")?,
            nym1: r.get_element("nym1")?,
            nym2: r.get_element("nym2")?,
            pi: SpkRep::read_from(r, 2)?,
            expiration: r.get_u64("expiration")?,
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

impl Gl19BlindSignature {
    pub(crate) fn write_body(&self, w: &mut Writer) {
        w.put_element(&self.nym1);
        w.put_element(&self.nym2);
        w.put_element(&self.nym3);
        w.put_element(&self.c1);
        w.put_element(&self.c2);
    }

    pub(crate) fn read_body(r: &mut Reader) -> Result<Self, EncodingError> {
        Ok(Gl19BlindSignature {
            nym1: r.get_element("nym1")?,
            nym2: r.get_element("nym2")?,
            nym3: r.get_element("nym3")?,
            c1: r.get_element("c1")?,
            c2: r.get_element("c2")?,
        })
    }
}

impl Gl19BlindingKey {
    pub(crate) fn write_body(&self, w: &mut Writer) {
        w.put_element(&self.pk);
        w.put_opt_element(self.sk.as_ref());
    }

    pub(crate) fn read_body(r: &mut Reader) -> Result<Self, EncodingError> {
        Ok(Gl19BlindingKey {
            pk: r.get_element("pk")?,
            sk: r.get_opt_element("sk")?,
        })
    }

    /// The public half, as handed to the converter.
    pub fn public(&self) -> Gl19BlindingKey {
        Gl19BlindingKey {
            pk: self.pk.clone(),
            sk: None,
        }
    }
}

/// First setup call: creates the group key and the issuer key. The
/// converter key is installed by [`setup_converter`].
pub fn setup_issuer<R: RngCore>(rng: &mut R) -> (Gl19GroupKey, Gl19ManagerKey) {
    let g = G1::one();
    let gg = G2::one();
    let (sk, pk) = ps::issuer_keygen(&gg, rng);
    (
        Gl19GroupKey {
            g,
            gg,
            xx: pk.xx,
            yy: pk.yy,
            cpk: None,
        },
        Gl19ManagerKey::Issuer { x: sk.x, y: sk.y },
    )
}

/// Second setup call: completes the group key with the converter public
/// key and returns the converter key.
pub fn setup_converter<R: RngCore>(
    grpkey: &mut Gl19GroupKey,
    rng: &mut R,
) -> GroupsigResult<Gl19ManagerKey> {
    if grpkey.cpk.is_some() {
        return Err(GroupsigError::InvalidArgument(
            "group key already has a converter key",
        ));
    }
    let csk = Scalar::rand(rng);
    grpkey.cpk = Some(grpkey.g.scaled(&csk));
    Ok(Gl19ManagerKey::Converter { csk })
}

/// Issuer side of the join protocol (steps 0 and 2). GL19 keeps no
/// membership list.
pub fn join_mgr(
    mgrkey: &Gl19ManagerKey,
    seq: u8,
    msg_in: Option<&Message>,
    grpkey: &Gl19GroupKey,
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
            let cred = ps::issue(&sk, &grpkey.g, &tau, &mut rng);
            let mut w = Writer::new();
            w.put_element(&cred.sigma1);
            w.put_element(&cred.sigma2);
            w.put_u64(unix_now() + CRED_LIFETIME_SECS);
            Ok(Some(Message::from_bytes(w.finish())))
        }
        _ => Err(GroupsigError::InvalidArgument("invalid issuer join step")),
    }
}

/// Member side of the join protocol (steps 1 and 3).
pub fn join_mem(
    memkey: &mut Gl19MemberKey,
    seq: u8,
    msg_in: Option<&Message>,
    grpkey: &Gl19GroupKey,
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
            let expiration = r.get_u64("expiration")?;
            r.finish()?;

            if !ps::credential_valid(&cred, y, &grpkey.gg, &grpkey.ipk()) {
                return Err(GroupsigError::InvalidArgument(
                    "issued credential does not verify",
                ));
            }
            memkey.cred = Some(cred);
            memkey.expiration = expiration;
            Ok(None)
        }
        _ => Err(GroupsigError::InvalidArgument("invalid member join step")),
    }
}

pub fn sign(
    msg: &Message,
    memkey: &Gl19MemberKey,
    grpkey: &Gl19GroupKey,
    seed: Option<u64>,
) -> GroupsigResult<Gl19Signature> {
    let (y, cred) = memkey.complete()?;
    let cpk = grpkey.cpk()?;
    let mut rng = sysenv::operation_rng(seed)?;

    let alpha = Scalar::rand(&mut rng);
    let nym = grpkey.g.scaled(y);
    let nym1 = grpkey.g.scaled(&alpha);
    let nym2 = nym.plus(&cpk.scaled(&alpha));
    let shown = ps::show(cred, y, &mut rng);
    let expiration = memkey.expiration;

    // bar = y·sigma1', nym1 = alpha·g, nym2 = y·g + alpha·cpk
    let pi = spk::rep_sign(
        SIGN_DOMAIN,
        &[shown.sigma1.clone(), grpkey.g.clone(), cpk.clone()],
        &[shown.bar.clone(), nym1.clone(), nym2.clone()],
        &[&[(0, 0)], &[(1, 1)], &[(1, 0), (2, 1)]],
        &[y, &alpha],
        &[
            &grpkey.body_bytes(),
            &shown.sigma2.marshal(),
            &msg.bytes,
            &expiration.to_le_bytes(),
        ],
        &mut rng,
    )?;

    Ok(Gl19Signature {
        sigma1: shown.sigma1,
        sigma2: shown.sigma2,
        bar: shown.bar,
        nym1,
        nym2,
        pi,
        expiration,
    })
}

pub fn verify(
    sig: &Gl19Signature,
    msg: &Message,
    grpkey: &Gl19GroupKey,
) -> GroupsigResult<bool> {
    let cpk = grpkey.cpk()?;
    if unix_now() > sig.expiration {
        return Ok(false);
    }
    if !ps::shown_valid(&sig.shown(), &grpkey.gg, &grpkey.ipk()) {
        return Ok(false);
    }
    spk::rep_verify(
        SIGN_DOMAIN,
        &sig.pi,
        &[sig.sigma1.clone(), grpkey.g.clone(), cpk.clone()],
        &[sig.bar.clone(), sig.nym1.clone(), sig.nym2.clone()],
        &[&[(0, 0)], &[(1, 1)], &[(1, 0), (2, 1)]],
        &[
            &grpkey.body_bytes(),
            &sig.sigma2.marshal(),
            &msg.bytes,
            &sig.expiration.to_le_bytes(),
        ],
    )
}

pub fn verify_batch(
    sigs: &[&Gl19Signature],
    msgs: &[&Message],
    grpkey: &Gl19GroupKey,
) -> GroupsigResult<bool> {
    if sigs.len() != msgs.len() {
        return Err(GroupsigError::InvalidArgument(
            "signature and message counts differ",
        ));
    }
    let cpk = grpkey.cpk()?;
    let now = unix_now();
    let mut shows = Vec::with_capacity(sigs.len());
    for (&sig, &msg) in sigs.iter().zip(msgs.iter()) {
        if now > sig.expiration {
            return Ok(false);
        }
        let ok = spk::rep_verify(
            SIGN_DOMAIN,
            &sig.pi,
            &[sig.sigma1.clone(), grpkey.g.clone(), cpk.clone()],
            &[sig.bar.clone(), sig.nym1.clone(), sig.nym2.clone()],
            &[&[(0, 0)], &[(1, 1)], &[(1, 0), (2, 1)]],
            &[
                &grpkey.body_bytes(),
                &sig.sigma2.marshal(),
                &msg.bytes,
                &sig.expiration.to_le_bytes(),
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

/// Generates a fresh blinding keypair.
pub fn blind_keygen<R: RngCore>(grpkey: &Gl19GroupKey, rng: &mut R) -> Gl19BlindingKey {
    let sk = Scalar::rand(rng);
    Gl19BlindingKey {
        pk: grpkey.g.scaled(&sk),
        sk: Some(sk),
    }
}

/// Blinds a signature: rerandomizes the converter-layer encryption of
/// the pseudonym, wraps it under the blinding key, and encrypts the
/// hashed message under the blinding key as well.
pub fn blind(
    bldkey: &Gl19BlindingKey,
    grpkey: &Gl19GroupKey,
    sig: &Gl19Signature,
    msg: &Message,
) -> GroupsigResult<Gl19BlindSignature> {
    let cpk = grpkey.cpk()?;
    let mut rng = sysenv::operation_rng(None)?;

    let alpha = Scalar::rand(&mut rng);
    let beta = Scalar::rand(&mut rng);
    let gamma = Scalar::rand(&mut rng);

    // rerandomize the converter layer and add the blinding layer
    let nym1 = sig.nym1.plus(&grpkey.g.scaled(&beta));
    let nym2 = grpkey.g.scaled(&alpha);
    let nym3 = sig
        .nym2
        .plus(&cpk.scaled(&beta))
        .plus(&bldkey.pk.scaled(&alpha));

    // encrypt the hashed message under the blinding key
    let mut h = G1::new();
    h.map(&msg.bytes)?;
    let c1 = grpkey.g.scaled(&gamma);
    let c2 = h.plus(&bldkey.pk.scaled(&gamma));

    Ok(Gl19BlindSignature {
        nym1,
        nym2,
        nym3,
        c1,
        c2,
    })
}

/// Converts a batch of blinded signatures: strips the converter layer,
/// raises every pseudonym to one batch-constant exponent, rerandomizes,
/// and returns the batch in uniformly shuffled order.
pub fn convert(
    bsigs: &[&Gl19BlindSignature],
    grpkey: &Gl19GroupKey,
    mgrkey: &Gl19ManagerKey,
    bldkey: &Gl19BlindingKey,
) -> GroupsigResult<Vec<Gl19BlindSignature>> {
    let csk = mgrkey.converter()?;
    if bsigs.is_empty() {
        return Err(GroupsigError::InvalidArgument("empty conversion batch"));
    }
    let mut rng = sysenv::operation_rng(None)?;

    let mut neg_csk = csk.clone();
    neg_csk.negate();
    // one exponent for the whole batch: converted pseudonyms are equal
    // exactly when the member is
    let r = Scalar::rand(&mut rng);

    let mut csigs = Vec::with_capacity(bsigs.len());
    for bsig in bsigs {
        let r1 = Scalar::rand(&mut rng);
        let r2 = Scalar::rand(&mut rng);

        // strip the converter layer, then raise to r
        let cnym1 = bsig.nym2.scaled(&r);
        let cnym2 = bsig.nym3.plus(&bsig.nym1.scaled(&neg_csk)).scaled(&r);

        csigs.push(Gl19BlindSignature {
            nym1: cnym1.plus(&grpkey.g.scaled(&r1)),
            nym2: cnym2.plus(&bldkey.pk.scaled(&r1)),
            nym3: G1::zero(),
            c1: bsig.c1.plus(&grpkey.g.scaled(&r2)),
            c2: bsig.c2.plus(&bldkey.pk.scaled(&r2)),
        });
    }

    // break positional linkage
    sysenv::shuffle(&mut csigs)?;

    Ok(csigs)
}

/// Unblinds a converted signature into the final pseudonym identity and
/// the recovered message digest (base64 of the hashed-message point).
pub fn unblind(
    bsig: &Gl19BlindSignature,
    bldkey: &Gl19BlindingKey,
) -> GroupsigResult<(Identity, Message)> {
    let sk = bldkey.sk.as_ref().ok_or(GroupsigError::InvalidArgument(
        "private key needed to unblind",
    ))?;

    let mut neg_sk = sk.clone();
    neg_sk.negate();

    let nym = bsig.nym2.plus(&bsig.nym1.scaled(&neg_sk));
    let digest = bsig.c2.plus(&bsig.c1.scaled(&neg_sk));

    let identity = Identity::from_nym(Scheme::Gl19, nym);
    let msg = Message::from_string(&crate::wire::to_base64(&digest.marshal()));
    Ok((identity, msg))
}
