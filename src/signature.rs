//! Scheme-tagged containers for group signatures and blind signatures.

use crate::error::GroupsigResult;
use crate::registry::Scheme;
use crate::schemes::bbs04::Bbs04Signature;
use crate::schemes::dl21::Dl21Signature;
use crate::schemes::dl21seq::Dl21SeqSignature;
use crate::schemes::gl19::{Gl19BlindSignature, Gl19Signature};
use crate::schemes::klap20::Klap20Signature;
use crate::wire::{self, Reader, Writer};

/// A group signature. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signature {
    Bbs04(Bbs04Signature),
    Gl19(Gl19Signature),
    Klap20(Klap20Signature),
    Dl21(Dl21Signature),
    Dl21Seq(Dl21SeqSignature),
}

/// A blinded (or converted) group signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlindSignature {
    Gl19(Gl19BlindSignature),
}

impl Signature {
    pub fn scheme(&self) -> Scheme {
        match self {
            Signature::Bbs04(_) => Scheme::Bbs04,
            Signature::Gl19(_) => Scheme::Gl19,
            Signature::Klap20(_) => Scheme::Klap20,
            Signature::Dl21(_) => Scheme::Dl21,
            Signature::Dl21Seq(_) => Scheme::Dl21Seq,
        }
    }

    pub fn export(&self) -> Vec<u8> {
        let mut w = Writer::new();
        w.put_u8(self.scheme().code());
        match self {
            Signature::Bbs04(s) => s.write_body(&mut w),
            Signature::Gl19(s) => s.write_body(&mut w),
            Signature::Klap20(s) => s.write_body(&mut w),
            Signature::Dl21(s) => s.write_body(&mut w),
            Signature::Dl21Seq(s) => s.write_body(&mut w),
        }
        w.finish()
    }

    pub fn import(scheme: Scheme, bytes: &[u8]) -> GroupsigResult<Signature> {
        let mut r = Reader::new(bytes);
        r.expect_code(scheme.code())?;
        let sig = match scheme {
            Scheme::Bbs04 => Signature::Bbs04(Bbs04Signature::read_body(&mut r)?),
            Scheme::Gl19 => Signature::Gl19(Gl19Signature::read_body(&mut r)?),
            Scheme::Klap20 => Signature::Klap20(Klap20Signature::read_body(&mut r)?),
            Scheme::Dl21 => Signature::Dl21(Dl21Signature::read_body(&mut r)?),
            Scheme::Dl21Seq => Signature::Dl21Seq(Dl21SeqSignature::read_body(&mut r)?),
        };
        r.finish()?;
        Ok(sig)
    }

    pub fn to_base64(&self) -> String {
        wire::to_base64(&self.export())
    }

    pub fn from_base64(scheme: Scheme, s: &str) -> GroupsigResult<Signature> {
        Signature::import(scheme, &wire::from_base64(s)?)
    }
}

impl BlindSignature {
    pub fn scheme(&self) -> Scheme {
        match self {
            BlindSignature::Gl19(_) => Scheme::Gl19,
        }
    }

    pub fn export(&self) -> Vec<u8> {
        let mut w = Writer::new();
        w.put_u8(self.scheme().code());
        match self {
            BlindSignature::Gl19(s) => s.write_body(&mut w),
        }
        w.finish()
    }

    pub fn import(scheme: Scheme, bytes: &[u8]) -> GroupsigResult<BlindSignature> {
        let mut r = Reader::new(bytes);
        r.expect_code(scheme.code())?;
        let sig = match scheme {
            Scheme::Gl19 => BlindSignature::Gl19(Gl19BlindSignature::read_body(&mut r)?),
            _ => {
                return Err(crate::error::GroupsigError::Unsupported {
                    scheme: scheme.name(),
                    op: "blind signatures",
                })
            }
        };
        r.finish()?;
        Ok(sig)
    }

    pub fn to_base64(&self) -> String {
        wire::to_base64(&self.export())
    }

    pub fn from_base64(scheme: Scheme, s: &str) -> GroupsigResult<BlindSignature> {
        BlindSignature::import(scheme, &wire::from_base64(s)?)
    }
}
