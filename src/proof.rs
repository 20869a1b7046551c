//! Scheme-tagged container for zero-knowledge proofs: openings, claims,
//! equality, link and seqlink transcripts.

use crate::error::GroupsigResult;
use crate::registry::Scheme;
use crate::schemes::dl21::Dl21Proof;
use crate::schemes::dl21seq::Dl21SeqProof;
use crate::schemes::klap20::Klap20Proof;
use crate::wire::{self, Reader, Writer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Proof {
    Klap20(Klap20Proof),
    Dl21(Dl21Proof),
    Dl21Seq(Dl21SeqProof),
}

impl Proof {
    pub fn scheme(&self) -> Scheme {
        match self {
            Proof::Klap20(_) => Scheme::Klap20,
            Proof::Dl21(_) => Scheme::Dl21,
            Proof::Dl21Seq(_) => Scheme::Dl21Seq,
        }
    }

    pub fn export(&self) -> Vec<u8> {
        let mut w = Writer::new();
        w.put_u8(self.scheme().code());
        match self {
            Proof::Klap20(p) => p.write_body(&mut w),
            Proof::Dl21(p) => p.write_body(&mut w),
            Proof::Dl21Seq(p) => p.write_body(&mut w),
        }
        w.finish()
    }

    pub fn import(scheme: Scheme, bytes: &[u8]) -> GroupsigResult<Proof> {
        let mut r = Reader::new(bytes);
        r.expect_code(scheme.code())?;
        let proof = match scheme {
            Scheme::Klap20 => Proof::Klap20(Klap20Proof::read_body(&mut r)?),
            Scheme::Dl21 => Proof::Dl21(Dl21Proof::read_body(&mut r)?),
            Scheme::Dl21Seq => Proof::Dl21Seq(Dl21SeqProof::read_body(&mut r)?),
            _ => {
                return Err(crate::error::GroupsigError::Unsupported {
                    scheme: scheme.name(),
                    op: "proofs",
                })
            }
        };
        r.finish()?;
        Ok(proof)
    }

    pub fn to_base64(&self) -> String {
        wire::to_base64(&self.export())
    }

    pub fn from_base64(scheme: Scheme, s: &str) -> GroupsigResult<Proof> {
        Proof::import(scheme, &wire::from_base64(s)?)
    }
}
