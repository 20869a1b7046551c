//! The scheme-agnostic protocol surface.
//!
//! Every function validates that the scheme tags of its arguments agree,
//! then forwards to the selected scheme. Operations a scheme does not
//! provide fail with [`GroupsigError::Unsupported`]; any other local
//! precondition failure is an invalid-argument error. Dispatch-level
//! failures never touch the GML or CRL.

use crate::crl::{Crl, Trapdoor};
use crate::error::{GroupsigError, GroupsigResult};
use crate::gml::Gml;
use crate::identity::Identity;
use crate::key::{BlindingKey, GroupKey, ManagerKey, MemberKey};
use crate::message::Message;
use crate::proof::Proof;
use crate::registry::{JoinSide, Scheme};
use crate::schemes::{bbs04, dl21, dl21seq, gl19, klap20};
use crate::signature::{BlindSignature, Signature};
use crate::sysenv;

fn unsupported(scheme: Scheme, op: &'static str) -> GroupsigError {
    GroupsigError::Unsupported {
        scheme: scheme.name(),
        op,
    }
}

fn check_tag(scheme: Scheme, other: Scheme) -> GroupsigResult<()> {
    if scheme != other {
        return Err(GroupsigError::SchemeMismatch);
    }
    Ok(())
}

/// Initializes the process-wide environment for the given scheme,
/// seeding the PRNG from `seed` or from the OS entropy source.
pub fn init(scheme: Scheme, seed: Option<u64>) -> GroupsigResult<()> {
    let _ = scheme;
    sysenv::init(seed)
}

/// Releases the process-wide environment.
pub fn clear(scheme: Scheme) -> GroupsigResult<()> {
    let _ = scheme;
    sysenv::clear();
    Ok(())
}

/// Number of messages exchanged in the scheme's join protocol.
pub fn get_joinseq(scheme: Scheme) -> u8 {
    scheme.joinseq()
}

/// Which side sends the first message of the scheme's join protocol.
pub fn get_joinstart(scheme: Scheme) -> JoinSide {
    scheme.joinstart()
}

/// Runs the scheme's setup. The first call creates the group key and
/// returns the issuer key; schemes with a second manager key (gl19,
/// klap20) complete the group key and return it on a second call.
pub fn setup(
    scheme: Scheme,
    grpkey: &mut Option<GroupKey>,
    gml: Option<&mut Gml>,
) -> GroupsigResult<ManagerKey> {
    if let Some(gml) = &gml {
        check_tag(scheme, gml.scheme())?;
    }
    let mut rng = sysenv::operation_rng(None)?;
    match scheme {
        Scheme::Bbs04 => match grpkey {
            None => {
                let (gk, mk) = bbs04::setup(&mut rng)?;
                *grpkey = Some(GroupKey::Bbs04(gk));
                Ok(ManagerKey::Bbs04(mk))
            }
            Some(_) => Err(GroupsigError::InvalidArgument("group is already set up")),
        },
        Scheme::Gl19 => match grpkey {
            None => {
                let (gk, mk) = gl19::setup_issuer(&mut rng);
                *grpkey = Some(GroupKey::Gl19(gk));
                Ok(ManagerKey::Gl19(mk))
            }
            Some(GroupKey::Gl19(gk)) => Ok(ManagerKey::Gl19(gl19::setup_converter(gk, &mut rng)?)),
            Some(_) => Err(GroupsigError::SchemeMismatch),
        },
        Scheme::Klap20 => match grpkey {
            None => {
                let (gk, mk) = klap20::setup_issuer(&mut rng);
                *grpkey = Some(GroupKey::Klap20(gk));
                Ok(ManagerKey::Klap20(mk))
            }
            Some(GroupKey::Klap20(gk)) => {
                Ok(ManagerKey::Klap20(klap20::setup_opener(gk, &mut rng)?))
            }
            Some(_) => Err(GroupsigError::SchemeMismatch),
        },
        Scheme::Dl21 => match grpkey {
            None => {
                let (gk, mk) = dl21::setup(&mut rng);
                *grpkey = Some(GroupKey::Dl21(gk));
                Ok(ManagerKey::Dl21(mk))
            }
            Some(_) => Err(GroupsigError::InvalidArgument("group is already set up")),
        },
        Scheme::Dl21Seq => match grpkey {
            None => {
                let (gk, mk) = dl21seq::setup(&mut rng);
                *grpkey = Some(GroupKey::Dl21Seq(gk));
                Ok(ManagerKey::Dl21Seq(mk))
            }
            Some(_) => Err(GroupsigError::InvalidArgument("group is already set up")),
        },
    }
}

/// Runs one member-side step of the join protocol, updating `memkey` in
/// place. The final step completes the key and returns no message.
pub fn join_mem(
    memkey: &mut MemberKey,
    seq: u8,
    msg_in: Option<&Message>,
    grpkey: &GroupKey,
) -> GroupsigResult<Option<Message>> {
    check_tag(memkey.scheme(), grpkey.scheme())?;
    match (memkey, grpkey) {
        (MemberKey::Bbs04(mk), GroupKey::Bbs04(gk)) => bbs04::join_mem(mk, seq, msg_in, gk),
        (MemberKey::Gl19(mk), GroupKey::Gl19(gk)) => gl19::join_mem(mk, seq, msg_in, gk),
        (MemberKey::Klap20(mk), GroupKey::Klap20(gk)) => klap20::join_mem(mk, seq, msg_in, gk),
        (MemberKey::Dl21(mk), GroupKey::Dl21(gk)) => dl21::join_mem(mk, seq, msg_in, gk),
        (MemberKey::Dl21Seq(mk), GroupKey::Dl21Seq(gk)) => dl21seq::join_mem(mk, seq, msg_in, gk),
        _ => Err(GroupsigError::SchemeMismatch),
    }
}

/// Runs one issuer-side step of the join protocol. Schemes with a GML
/// append the new member's entry on their final step.
pub fn join_mgr(
    gml: Option<&mut Gml>,
    mgrkey: &ManagerKey,
    seq: u8,
    msg_in: Option<&Message>,
    grpkey: &GroupKey,
) -> GroupsigResult<Option<Message>> {
    check_tag(mgrkey.scheme(), grpkey.scheme())?;
    if let Some(gml) = &gml {
        check_tag(grpkey.scheme(), gml.scheme())?;
    }
    match (mgrkey, grpkey) {
        (ManagerKey::Bbs04(mk), GroupKey::Bbs04(gk)) => {
            let gml = gml.ok_or(GroupsigError::InvalidArgument("scheme requires a gml"))?;
            bbs04::join_mgr(gml, mk, seq, msg_in, gk)
        }
        (ManagerKey::Gl19(mk), GroupKey::Gl19(gk)) => gl19::join_mgr(mk, seq, msg_in, gk),
        (ManagerKey::Klap20(mk), GroupKey::Klap20(gk)) => {
            let gml = gml.ok_or(GroupsigError::InvalidArgument("scheme requires a gml"))?;
            klap20::join_mgr(gml, mk, seq, msg_in, gk)
        }
        (ManagerKey::Dl21(mk), GroupKey::Dl21(gk)) => dl21::join_mgr(mk, seq, msg_in, gk),
        (ManagerKey::Dl21Seq(mk), GroupKey::Dl21Seq(gk)) => dl21seq::join_mgr(mk, seq, msg_in, gk),
        _ => Err(GroupsigError::SchemeMismatch),
    }
}

/// Produces a group signature. With `seed` set, the per-signature
/// randomness is derived from it (sequentially linkable schemes also
/// treat it as the sequence index); otherwise it comes from the
/// environment PRNG.
pub fn sign(
    msg: &Message,
    memkey: &MemberKey,
    grpkey: &GroupKey,
    seed: Option<u64>,
) -> GroupsigResult<Signature> {
    check_tag(memkey.scheme(), grpkey.scheme())?;
    match (memkey, grpkey) {
        (MemberKey::Bbs04(mk), GroupKey::Bbs04(gk)) => {
            Ok(Signature::Bbs04(bbs04::sign(msg, mk, gk, seed)?))
        }
        (MemberKey::Gl19(mk), GroupKey::Gl19(gk)) => {
            Ok(Signature::Gl19(gl19::sign(msg, mk, gk, seed)?))
        }
        (MemberKey::Klap20(mk), GroupKey::Klap20(gk)) => {
            Ok(Signature::Klap20(klap20::sign(msg, mk, gk, seed)?))
        }
        (MemberKey::Dl21(mk), GroupKey::Dl21(gk)) => {
            Ok(Signature::Dl21(dl21::sign(msg, mk, gk, seed)?))
        }
        (MemberKey::Dl21Seq(mk), GroupKey::Dl21Seq(gk)) => {
            Ok(Signature::Dl21Seq(dl21seq::sign(msg, mk, gk, seed)?))
        }
        _ => Err(GroupsigError::SchemeMismatch),
    }
}

/// Verifies a group signature against a message.
pub fn verify(sig: &Signature, msg: &Message, grpkey: &GroupKey) -> GroupsigResult<bool> {
    check_tag(sig.scheme(), grpkey.scheme())?;
    match (sig, grpkey) {
        (Signature::Bbs04(s), GroupKey::Bbs04(gk)) => bbs04::verify(s, msg, gk),
        (Signature::Gl19(s), GroupKey::Gl19(gk)) => gl19::verify(s, msg, gk),
        (Signature::Klap20(s), GroupKey::Klap20(gk)) => klap20::verify(s, msg, gk),
        (Signature::Dl21(s), GroupKey::Dl21(gk)) => dl21::verify(s, msg, gk),
        (Signature::Dl21Seq(s), GroupKey::Dl21Seq(gk)) => dl21seq::verify(s, msg, gk),
        _ => Err(GroupsigError::SchemeMismatch),
    }
}

macro_rules! unwrap_sigs {
    ($variant:path, $sigs:expr) => {{
        let mut out = Vec::with_capacity($sigs.len());
        for sig in $sigs {
            match sig {
                $variant(s) => out.push(s),
                _ => return Err(GroupsigError::SchemeMismatch),
            }
        }
        out
    }};
}

/// Verifies a batch of signatures; a single invalid member fails the
/// whole batch.
pub fn verify_batch(
    sigs: &[Signature],
    msgs: &[Message],
    grpkey: &GroupKey,
) -> GroupsigResult<bool> {
    if sigs.len() != msgs.len() {
        return Err(GroupsigError::InvalidArgument(
            "signature and message counts differ",
        ));
    }
    let msg_refs = msgs.iter().collect::<Vec<_>>();
    match grpkey {
        GroupKey::Bbs04(gk) => {
            let sigs = unwrap_sigs!(Signature::Bbs04, sigs);
            bbs04::verify_batch(&sigs, &msg_refs, gk)
        }
        GroupKey::Gl19(gk) => {
            let sigs = unwrap_sigs!(Signature::Gl19, sigs);
            gl19::verify_batch(&sigs, &msg_refs, gk)
        }
        GroupKey::Klap20(gk) => {
            let sigs = unwrap_sigs!(Signature::Klap20, sigs);
            klap20::verify_batch(&sigs, &msg_refs, gk)
        }
        GroupKey::Dl21(gk) => {
            let sigs = unwrap_sigs!(Signature::Dl21, sigs);
            dl21::verify_batch(&sigs, &msg_refs, gk)
        }
        GroupKey::Dl21Seq(gk) => {
            let sigs = unwrap_sigs!(Signature::Dl21Seq, sigs);
            dl21seq::verify_batch(&sigs, &msg_refs, gk)
        }
    }
}

/// Recovers the GML index of a signature's author, plus an opening
/// proof for schemes that support verifiable opening. Fails logically
/// when no GML entry matches.
pub fn open(
    sig: &Signature,
    grpkey: &GroupKey,
    mgrkey: &ManagerKey,
    gml: Option<&Gml>,
) -> GroupsigResult<(u64, Option<Proof>)> {
    check_tag(sig.scheme(), grpkey.scheme())?;
    check_tag(grpkey.scheme(), mgrkey.scheme())?;
    if let Some(gml) = &gml {
        check_tag(grpkey.scheme(), gml.scheme())?;
    }
    match (sig, grpkey, mgrkey) {
        (Signature::Bbs04(s), GroupKey::Bbs04(gk), ManagerKey::Bbs04(mk)) => {
            let gml = gml.ok_or(GroupsigError::InvalidArgument("scheme requires a gml"))?;
            Ok((bbs04::open(s, gk, mk, gml)?, None))
        }
        (Signature::Klap20(s), GroupKey::Klap20(gk), ManagerKey::Klap20(mk)) => {
            let gml = gml.ok_or(GroupsigError::InvalidArgument("scheme requires a gml"))?;
            let (index, proof) = klap20::open(s, gk, mk, gml)?;
            Ok((index, Some(Proof::Klap20(proof))))
        }
        _ => Err(unsupported(grpkey.scheme(), "open")),
    }
}

/// Verifies an opening proof against a signature, without the GML or
/// the opener key.
pub fn open_verify(proof: &Proof, sig: &Signature, grpkey: &GroupKey) -> GroupsigResult<bool> {
    check_tag(proof.scheme(), sig.scheme())?;
    check_tag(sig.scheme(), grpkey.scheme())?;
    match (proof, sig, grpkey) {
        (Proof::Klap20(p), Signature::Klap20(s), GroupKey::Klap20(gk)) => {
            klap20::open_verify(p, s, gk)
        }
        _ => Err(unsupported(grpkey.scheme(), "open_verify")),
    }
}

/// Extracts the tracing trapdoor of the member at `index` in the GML
/// and, when a CRL is given, records the revocation.
pub fn reveal(gml: &Gml, index: u64, crl: Option<&mut Crl>) -> GroupsigResult<Trapdoor> {
    if let Some(crl) = &crl {
        check_tag(gml.scheme(), crl.scheme())?;
    }
    match gml.scheme() {
        Scheme::Bbs04 => bbs04::reveal(gml, index, crl),
        scheme => Err(unsupported(scheme, "reveal")),
    }
}

/// Answers whether the signature was produced by a CRL-listed member.
/// Schemes without native tracing need the opener key to emulate it.
pub fn trace(
    sig: &Signature,
    grpkey: &GroupKey,
    crl: &Crl,
    mgrkey: Option<&ManagerKey>,
    gml: Option<&Gml>,
) -> GroupsigResult<bool> {
    check_tag(sig.scheme(), grpkey.scheme())?;
    check_tag(grpkey.scheme(), crl.scheme())?;
    if let Some(mgrkey) = &mgrkey {
        check_tag(grpkey.scheme(), mgrkey.scheme())?;
    }
    if let Some(gml) = &gml {
        check_tag(grpkey.scheme(), gml.scheme())?;
    }
    match (sig, grpkey) {
        (Signature::Bbs04(s), GroupKey::Bbs04(gk)) => {
            let mgrkey = mgrkey.ok_or(GroupsigError::InvalidArgument(
                "tracing requires the manager key",
            ))?;
            match mgrkey {
                ManagerKey::Bbs04(mk) => bbs04::trace(s, gk, crl, mk),
                _ => Err(GroupsigError::SchemeMismatch),
            }
        }
        _ => Err(unsupported(grpkey.scheme(), "trace")),
    }
}

/// The alleged author proves authorship of `sig` in zero knowledge.
pub fn claim(memkey: &MemberKey, grpkey: &GroupKey, sig: &Signature) -> GroupsigResult<Proof> {
    check_tag(memkey.scheme(), grpkey.scheme())?;
    check_tag(grpkey.scheme(), sig.scheme())?;
    match (memkey, grpkey, sig) {
        (MemberKey::Dl21(mk), GroupKey::Dl21(gk), Signature::Dl21(s)) => {
            Ok(Proof::Dl21(dl21::claim(mk, gk, s)?))
        }
        (MemberKey::Dl21Seq(mk), GroupKey::Dl21Seq(gk), Signature::Dl21Seq(s)) => {
            Ok(Proof::Dl21Seq(dl21seq::claim(mk, gk, s)?))
        }
        _ => Err(unsupported(grpkey.scheme(), "claim")),
    }
}

pub fn claim_verify(proof: &Proof, sig: &Signature, grpkey: &GroupKey) -> GroupsigResult<bool> {
    check_tag(proof.scheme(), sig.scheme())?;
    check_tag(sig.scheme(), grpkey.scheme())?;
    match (proof, sig, grpkey) {
        (Proof::Dl21(p), Signature::Dl21(s), GroupKey::Dl21(gk)) => dl21::claim_verify(p, s, gk),
        (Proof::Dl21Seq(p), Signature::Dl21Seq(s), GroupKey::Dl21Seq(gk)) => {
            dl21seq::claim_verify(p, s, gk)
        }
        _ => Err(unsupported(grpkey.scheme(), "claim_verify")),
    }
}

/// Proves that all of `sigs` were produced by the holder of `memkey`.
pub fn prove_equality(
    memkey: &MemberKey,
    grpkey: &GroupKey,
    sigs: &[Signature],
) -> GroupsigResult<Proof> {
    check_tag(memkey.scheme(), grpkey.scheme())?;
    match (memkey, grpkey) {
        (MemberKey::Dl21(mk), GroupKey::Dl21(gk)) => {
            let sigs = unwrap_sigs!(Signature::Dl21, sigs);
            Ok(Proof::Dl21(dl21::prove_equality(mk, gk, &sigs)?))
        }
        (MemberKey::Dl21Seq(mk), GroupKey::Dl21Seq(gk)) => {
            let sigs = unwrap_sigs!(Signature::Dl21Seq, sigs);
            Ok(Proof::Dl21Seq(dl21seq::prove_equality(mk, gk, &sigs)?))
        }
        _ => Err(unsupported(grpkey.scheme(), "prove_equality")),
    }
}

pub fn prove_equality_verify(
    proof: &Proof,
    grpkey: &GroupKey,
    sigs: &[Signature],
) -> GroupsigResult<bool> {
    check_tag(proof.scheme(), grpkey.scheme())?;
    match (proof, grpkey) {
        (Proof::Dl21(p), GroupKey::Dl21(gk)) => {
            let sigs = unwrap_sigs!(Signature::Dl21, sigs);
            dl21::prove_equality_verify(p, gk, &sigs)
        }
        (Proof::Dl21Seq(p), GroupKey::Dl21Seq(gk)) => {
            let sigs = unwrap_sigs!(Signature::Dl21Seq, sigs);
            dl21seq::prove_equality_verify(p, gk, &sigs)
        }
        _ => Err(unsupported(grpkey.scheme(), "prove_equality_verify")),
    }
}

/// Blinds a group signature under `bldkey`. On the first call, pass
/// `None`: a fresh blinding keypair is generated and stored there;
/// later calls reuse it.
pub fn blind(
    bldkey: &mut Option<BlindingKey>,
    grpkey: &GroupKey,
    sig: &Signature,
    msg: &Message,
) -> GroupsigResult<BlindSignature> {
    check_tag(sig.scheme(), grpkey.scheme())?;
    match (grpkey, sig) {
        (GroupKey::Gl19(gk), Signature::Gl19(s)) => {
            if bldkey.is_none() {
                let mut rng = sysenv::operation_rng(None)?;
                *bldkey = Some(BlindingKey::Gl19(gl19::blind_keygen(gk, &mut rng)));
            }
            let bk = match bldkey.as_ref() {
                Some(BlindingKey::Gl19(bk)) => bk,
                _ => return Err(GroupsigError::SchemeMismatch),
            };
            Ok(BlindSignature::Gl19(gl19::blind(bk, gk, s, msg)?))
        }
        _ => Err(unsupported(grpkey.scheme(), "blind")),
    }
}

/// Converts a batch of blinded signatures with the converter key. The
/// output batch is uniformly shuffled; on error the input is untouched
/// and nothing is returned.
pub fn convert(
    bsigs: &[BlindSignature],
    grpkey: &GroupKey,
    mgrkey: &ManagerKey,
    bldkey: &BlindingKey,
) -> GroupsigResult<Vec<BlindSignature>> {
    check_tag(grpkey.scheme(), mgrkey.scheme())?;
    check_tag(grpkey.scheme(), bldkey.scheme())?;
    match (grpkey, mgrkey, bldkey) {
        (GroupKey::Gl19(gk), ManagerKey::Gl19(mk), BlindingKey::Gl19(bk)) => {
            let bsigs = bsigs
                .iter()
                .map(|b| match b {
                    BlindSignature::Gl19(s) => s,
                })
                .collect::<Vec<_>>();
            let csigs = gl19::convert(&bsigs, gk, mk, bk)?;
            Ok(csigs.into_iter().map(BlindSignature::Gl19).collect())
        }
        _ => Err(unsupported(grpkey.scheme(), "convert")),
    }
}

/// Unblinds a converted signature into the final pseudonym identity and
/// the recovered message digest. Requires the blinding private key.
pub fn unblind(bsig: &BlindSignature, bldkey: &BlindingKey) -> GroupsigResult<(Identity, Message)> {
    check_tag(bsig.scheme(), bldkey.scheme())?;
    match (bsig, bldkey) {
        (BlindSignature::Gl19(bs), BlindingKey::Gl19(bk)) => gl19::unblind(bs, bk),
    }
}

/// A member locally tests whether it authored a signature.
pub fn identify(
    grpkey: &GroupKey,
    memkey: &MemberKey,
    sig: &Signature,
    msg: &Message,
) -> GroupsigResult<(bool, Option<Proof>)> {
    check_tag(memkey.scheme(), grpkey.scheme())?;
    check_tag(grpkey.scheme(), sig.scheme())?;
    match (grpkey, memkey, sig) {
        (GroupKey::Dl21(gk), MemberKey::Dl21(mk), Signature::Dl21(s)) => {
            Ok((dl21::identify(gk, mk, s, msg)?, None))
        }
        (GroupKey::Dl21Seq(gk), MemberKey::Dl21Seq(mk), Signature::Dl21Seq(s)) => {
            Ok((dl21seq::identify(gk, mk, s, msg)?, None))
        }
        _ => Err(unsupported(grpkey.scheme(), "identify")),
    }
}

/// Proves that the same member authored all of `sigs`. Fails logically
/// when the inputs do not all attribute to `memkey`.
pub fn link(
    grpkey: &GroupKey,
    memkey: &MemberKey,
    msg: &Message,
    sigs: &[Signature],
    msgs: &[Message],
) -> GroupsigResult<Proof> {
    check_tag(memkey.scheme(), grpkey.scheme())?;
    let msg_refs = msgs.iter().collect::<Vec<_>>();
    match (grpkey, memkey) {
        (GroupKey::Dl21(gk), MemberKey::Dl21(mk)) => {
            let sigs = unwrap_sigs!(Signature::Dl21, sigs);
            Ok(Proof::Dl21(dl21::link(gk, mk, msg, &sigs, &msg_refs)?))
        }
        (GroupKey::Dl21Seq(gk), MemberKey::Dl21Seq(mk)) => {
            let sigs = unwrap_sigs!(Signature::Dl21Seq, sigs);
            Ok(Proof::Dl21Seq(dl21seq::link(gk, mk, msg, &sigs, &msg_refs)?))
        }
        _ => Err(unsupported(grpkey.scheme(), "link")),
    }
}

pub fn verify_link(
    grpkey: &GroupKey,
    proof: &Proof,
    msg: &Message,
    sigs: &[Signature],
    msgs: &[Message],
) -> GroupsigResult<bool> {
    check_tag(proof.scheme(), grpkey.scheme())?;
    let msg_refs = msgs.iter().collect::<Vec<_>>();
    match (grpkey, proof) {
        (GroupKey::Dl21(gk), Proof::Dl21(p)) => {
            let sigs = unwrap_sigs!(Signature::Dl21, sigs);
            dl21::verify_link(gk, p, msg, &sigs, &msg_refs)
        }
        (GroupKey::Dl21Seq(gk), Proof::Dl21Seq(p)) => {
            let sigs = unwrap_sigs!(Signature::Dl21Seq, sigs);
            dl21seq::verify_link(gk, p, msg, &sigs, &msg_refs)
        }
        _ => Err(unsupported(grpkey.scheme(), "verify_link")),
    }
}

/// As [`link`], additionally proving the signatures form a consecutive
/// sequence under their scope.
pub fn seqlink(
    grpkey: &GroupKey,
    memkey: &MemberKey,
    msg: &Message,
    sigs: &[Signature],
    msgs: &[Message],
) -> GroupsigResult<Proof> {
    check_tag(memkey.scheme(), grpkey.scheme())?;
    let msg_refs = msgs.iter().collect::<Vec<_>>();
    match (grpkey, memkey) {
        (GroupKey::Dl21Seq(gk), MemberKey::Dl21Seq(mk)) => {
            let sigs = unwrap_sigs!(Signature::Dl21Seq, sigs);
            Ok(Proof::Dl21Seq(dl21seq::seqlink(
                gk, mk, msg, &sigs, &msg_refs,
            )?))
        }
        _ => Err(unsupported(grpkey.scheme(), "seqlink")),
    }
}

pub fn verify_seqlink(
    grpkey: &GroupKey,
    proof: &Proof,
    msg: &Message,
    sigs: &[Signature],
    msgs: &[Message],
) -> GroupsigResult<bool> {
    check_tag(proof.scheme(), grpkey.scheme())?;
    let msg_refs = msgs.iter().collect::<Vec<_>>();
    match (grpkey, proof) {
        (GroupKey::Dl21Seq(gk), Proof::Dl21Seq(p)) => {
            let sigs = unwrap_sigs!(Signature::Dl21Seq, sigs);
            dl21seq::verify_seqlink(gk, p, msg, &sigs, &msg_refs)
        }
        _ => Err(unsupported(grpkey.scheme(), "verify_seqlink")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    fn fresh_env() {
        sysenv::init(Some(thread_rng().gen())).unwrap();
    }

    fn scoped(scope: &str, message: &str) -> Message {
        Message::from_json_string(&format!(
            "{{ \"scope\": \"{}\", \"message\": \"{}\" }}",
            scope, message
        ))
    }

    /// Drives the full join loop between one member and the issuer.
    fn enroll(
        scheme: Scheme,
        gml: Option<&mut Gml>,
        mgrkey: &ManagerKey,
        grpkey: &GroupKey,
    ) -> MemberKey {
        let mut memkey = MemberKey::init(scheme);
        match scheme.joinseq() {
            1 => {
                let m1 = join_mgr(gml, mgrkey, 0, None, grpkey).unwrap().unwrap();
                assert!(join_mem(&mut memkey, 1, Some(&m1), grpkey).unwrap().is_none());
            }
            3 => {
                let mut gml = gml;
                let m1 = join_mgr(gml.as_deref_mut(), mgrkey, 0, None, grpkey)
                    .unwrap()
                    .unwrap();
                let m2 = join_mem(&mut memkey, 1, Some(&m1), grpkey).unwrap().unwrap();
                let m3 = join_mgr(gml.as_deref_mut(), mgrkey, 2, Some(&m2), grpkey)
                    .unwrap()
                    .unwrap();
                assert!(join_mem(&mut memkey, 3, Some(&m3), grpkey).unwrap().is_none());
            }
            n => panic!("unexpected join length {}", n),
        }
        memkey
    }

    /// Round-trips an artifact through its byte export before use.
    fn recycle_sig(sig: &Signature) -> Signature {
        Signature::import(sig.scheme(), &sig.export()).unwrap()
    }

    #[test]
    fn bbs04_end_to_end_with_reimported_artifacts() {
        fresh_env();
        let scheme = Scheme::Bbs04;
        let mut grpkey = None;
        let mut gml = Gml::new(scheme).unwrap();
        let mgrkey = setup(scheme, &mut grpkey, Some(&mut gml)).unwrap();
        let grpkey = grpkey.unwrap();

        let _alice = enroll(scheme, Some(&mut gml), &mgrkey, &grpkey);
        let bob = enroll(scheme, Some(&mut gml), &mgrkey, &grpkey);

        // every artifact goes through an export/import cycle
        let grpkey = GroupKey::import(scheme, &grpkey.export()).unwrap();
        let mgrkey = ManagerKey::import(scheme, &mgrkey.export()).unwrap();
        let bob = MemberKey::import(scheme, &bob.export()).unwrap();
        let gml = Gml::import(scheme, &gml.export()).unwrap();

        let msg = Message::from_string("Hello, World!");
        let sig = recycle_sig(&sign(&msg, &bob, &grpkey, None).unwrap());
        assert!(verify(&sig, &msg, &grpkey).unwrap());
        assert!(!verify(&sig, &Message::from_string("Hello, Worlds!"), &grpkey).unwrap());

        // member 2 opens to index 1
        let (index, proof) = open(&sig, &grpkey, &mgrkey, Some(&gml)).unwrap();
        assert_eq!(index, 1);
        assert!(proof.is_none());

        // revoke bob and trace his signature
        let mut crl = Crl::new(scheme).unwrap();
        reveal(&gml, 1, Some(&mut crl)).unwrap();
        let crl = Crl::import(scheme, &crl.export()).unwrap();
        assert!(trace(&sig, &grpkey, &crl, Some(&mgrkey), Some(&gml)).unwrap());
    }

    #[test]
    fn klap20_open_with_proof_after_reimport() {
        fresh_env();
        let scheme = Scheme::Klap20;
        let mut grpkey = None;
        let isskey = setup(scheme, &mut grpkey, None).unwrap();
        let opnkey = setup(scheme, &mut grpkey, None).unwrap();
        let grpkey = grpkey.unwrap();
        let mut gml = Gml::new(scheme).unwrap();

        let _alice = enroll(scheme, Some(&mut gml), &isskey, &grpkey);
        let bob = enroll(scheme, Some(&mut gml), &isskey, &grpkey);

        let grpkey = GroupKey::import(scheme, &grpkey.export()).unwrap();
        let opnkey = ManagerKey::import(scheme, &opnkey.export()).unwrap();
        let gml = Gml::import(scheme, &gml.export()).unwrap();

        let msg = Message::from_string("Hello, World!");
        let sig = recycle_sig(&sign(&msg, &bob, &grpkey, None).unwrap());
        assert!(verify(&sig, &msg, &grpkey).unwrap());

        let (index, proof) = open(&sig, &grpkey, &opnkey, Some(&gml)).unwrap();
        assert_eq!(index, 1);
        let proof = proof.unwrap();
        let proof = Proof::import(scheme, &proof.export()).unwrap();
        assert!(open_verify(&proof, &sig, &grpkey).unwrap());
    }

    #[test]
    fn gl19_blind_convert_unblind_after_reimport() {
        fresh_env();
        let scheme = Scheme::Gl19;
        let mut grpkey = None;
        let isskey = setup(scheme, &mut grpkey, None).unwrap();
        let cnvkey = setup(scheme, &mut grpkey, None).unwrap();
        let grpkey = grpkey.unwrap();

        let memkey = enroll(scheme, None, &isskey, &grpkey);

        let grpkey = GroupKey::import(scheme, &grpkey.export()).unwrap();
        let cnvkey = ManagerKey::import(scheme, &cnvkey.export()).unwrap();
        let memkey = MemberKey::import(scheme, &memkey.export()).unwrap();

        let msg = Message::from_string("Hello, World!");
        let sig = recycle_sig(&sign(&msg, &memkey, &grpkey, None).unwrap());
        assert!(verify(&sig, &msg, &grpkey).unwrap());

        let mut bldkey = None;
        let bsig = blind(&mut bldkey, &grpkey, &sig, &msg).unwrap();
        let bldkey = bldkey.unwrap();
        let bsig = BlindSignature::import(scheme, &bsig.export()).unwrap();

        let pub_bldkey = BlindingKey::import(scheme, &bldkey.public().export()).unwrap();
        let csigs = convert(&[bsig], &grpkey, &cnvkey, &pub_bldkey).unwrap();
        assert_eq!(csigs.len(), 1);

        let bldkey = BlindingKey::import(scheme, &bldkey.export()).unwrap();
        let (identity, recovered) = unblind(&csigs[0], &bldkey).unwrap();
        assert!(identity.nym().is_some());
        assert!(!recovered.is_empty());
    }

    #[test]
    fn dl21_link_after_reimport() {
        fresh_env();
        let scheme = Scheme::Dl21;
        let mut grpkey = None;
        let mgrkey = setup(scheme, &mut grpkey, None).unwrap();
        let grpkey = grpkey.unwrap();

        let alice = enroll(scheme, None, &mgrkey, &grpkey);
        let bob = enroll(scheme, None, &mgrkey, &grpkey);

        let msgs = (0..3)
            .map(|i| scoped("scp", &format!("message {}", i)))
            .collect::<Vec<_>>();
        let sigs = msgs
            .iter()
            .map(|m| recycle_sig(&sign(m, &alice, &grpkey, None).unwrap()))
            .collect::<Vec<_>>();

        let nonce = Message::from_string("nonce");
        let proof = link(&grpkey, &alice, &nonce, &sigs, &msgs).unwrap();
        let proof = Proof::import(scheme, &proof.export()).unwrap();
        assert!(verify_link(&grpkey, &proof, &nonce, &sigs, &msgs).unwrap());

        // with one signature by another member, link fails logically
        let mut mixed = sigs.clone();
        mixed[2] = sign(&msgs[2], &bob, &grpkey, None).unwrap();
        assert!(matches!(
            link(&grpkey, &alice, &nonce, &mixed, &msgs),
            Err(GroupsigError::Fail(_))
        ));
    }

    #[test]
    fn dl21seq_seqlink_after_reimport() {
        fresh_env();
        let scheme = Scheme::Dl21Seq;
        let mut grpkey = None;
        let mgrkey = setup(scheme, &mut grpkey, None).unwrap();
        let grpkey = grpkey.unwrap();
        let memkey = enroll(scheme, None, &mgrkey, &grpkey);

        let msg = scoped("scp", "Hello, World!");
        let sig1 = recycle_sig(&sign(&msg, &memkey, &grpkey, Some(1)).unwrap());
        let sig2 = recycle_sig(&sign(&msg, &memkey, &grpkey, Some(2)).unwrap());
        let sig3 = recycle_sig(&sign(&msg, &memkey, &grpkey, Some(3)).unwrap());

        let sigs = vec![sig1.clone(), sig2.clone()];
        let msgs = vec![msg.clone(), msg.clone()];
        let nonce = Message::from_string("nonce");

        let proof = seqlink(&grpkey, &memkey, &nonce, &sigs, &msgs).unwrap();
        let proof = Proof::import(scheme, &proof.export()).unwrap();
        assert!(verify_seqlink(&grpkey, &proof, &nonce, &sigs, &msgs).unwrap());

        // reordered inputs are rejected
        let swapped = vec![sig2.clone(), sig1.clone()];
        assert!(!verify_seqlink(&grpkey, &proof, &nonce, &swapped, &msgs).unwrap());

        // substituting position 2 by position 3 is rejected
        let skipped = vec![sig1, sig3];
        assert!(!verify_seqlink(&grpkey, &proof, &nonce, &skipped, &msgs).unwrap());
    }

    #[test]
    fn mismatched_scheme_tags_are_rejected() {
        fresh_env();
        let mut bbs_grpkey = None;
        let mut bbs_gml = Gml::new(Scheme::Bbs04).unwrap();
        let bbs_mgrkey = setup(Scheme::Bbs04, &mut bbs_grpkey, Some(&mut bbs_gml)).unwrap();
        let bbs_grpkey = bbs_grpkey.unwrap();
        let bbs_memkey = enroll(Scheme::Bbs04, Some(&mut bbs_gml), &bbs_mgrkey, &bbs_grpkey);

        let mut dl_grpkey = None;
        let _dl_mgrkey = setup(Scheme::Dl21, &mut dl_grpkey, None).unwrap();
        let dl_grpkey = dl_grpkey.unwrap();

        let msg = Message::from_string("Hello, World!");
        assert!(matches!(
            sign(&msg, &bbs_memkey, &dl_grpkey, None),
            Err(GroupsigError::SchemeMismatch)
        ));
    }

    #[test]
    fn unsupported_operations_are_flagged() {
        fresh_env();
        let mut grpkey = None;
        let mgrkey = setup(Scheme::Dl21, &mut grpkey, None).unwrap();
        let grpkey = grpkey.unwrap();
        let memkey = enroll(Scheme::Dl21, None, &mgrkey, &grpkey);

        let msg = scoped("scp", "Hello, World!");
        let sig = sign(&msg, &memkey, &grpkey, None).unwrap();

        // dl21 keeps no GML and cannot open
        assert!(matches!(
            open(&sig, &grpkey, &mgrkey, None),
            Err(GroupsigError::Unsupported { .. })
        ));
        // nor does it blind
        let mut bldkey = None;
        assert!(matches!(
            blind(&mut bldkey, &grpkey, &sig, &msg),
            Err(GroupsigError::Unsupported { .. })
        ));
        // and non-sequential schemes cannot seqlink
        assert!(matches!(
            seqlink(&grpkey, &memkey, &msg, &[sig.clone()], &[msg.clone()]),
            Err(GroupsigError::Unsupported { .. })
        ));
    }

    #[test]
    fn text_serialization_roundtrip() {
        fresh_env();
        let mut grpkey = None;
        let mut gml = Gml::new(Scheme::Bbs04).unwrap();
        let mgrkey = setup(Scheme::Bbs04, &mut grpkey, Some(&mut gml)).unwrap();
        let grpkey = grpkey.unwrap();
        let memkey = enroll(Scheme::Bbs04, Some(&mut gml), &mgrkey, &grpkey);

        let msg = Message::from_string("Hello, World!");
        let sig = sign(&msg, &memkey, &grpkey, None).unwrap();

        let sig2 = Signature::from_base64(Scheme::Bbs04, &sig.to_base64()).unwrap();
        assert_eq!(sig, sig2);
        let grpkey2 = GroupKey::from_base64(Scheme::Bbs04, &grpkey.to_base64()).unwrap();
        assert_eq!(grpkey, grpkey2);
    }
}
