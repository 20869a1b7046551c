//! Scheme-tagged containers for the key kinds.
//!
//! Every key serializes as scheme code, key kind byte, then its fields;
//! absent fields of partially populated keys are written as zero-length
//! records. Copies are deep; a key's scheme never changes after
//! creation.

use crate::error::GroupsigResult;
use crate::registry::Scheme;
use crate::schemes::bbs04::{Bbs04GroupKey, Bbs04ManagerKey, Bbs04MemberKey};
use crate::schemes::dl21::{Dl21GroupKey, Dl21ManagerKey, Dl21MemberKey};
use crate::schemes::gl19::{Gl19BlindingKey, Gl19GroupKey, Gl19ManagerKey, Gl19MemberKey};
use crate::schemes::klap20::{Klap20GroupKey, Klap20ManagerKey, Klap20MemberKey};
use crate::wire::{self, Reader, Writer};

/// The public group key, distributed to members and verifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupKey {
    Bbs04(Bbs04GroupKey),
    Gl19(Gl19GroupKey),
    Klap20(Klap20GroupKey),
    Dl21(Dl21GroupKey),
    Dl21Seq(Dl21GroupKey),
}

/// A manager key: issuer, opener or converter material depending on the
/// scheme and setup phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagerKey {
    Bbs04(Bbs04ManagerKey),
    Gl19(Gl19ManagerKey),
    Klap20(Klap20ManagerKey),
    Dl21(Dl21ManagerKey),
    Dl21Seq(Dl21ManagerKey),
}

/// A member key. Created empty and populated by the join protocol; it
/// is usable for signing only once the final join step succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberKey {
    Bbs04(Bbs04MemberKey),
    Gl19(Gl19MemberKey),
    Klap20(Klap20MemberKey),
    Dl21(Dl21MemberKey),
    Dl21Seq(Dl21MemberKey),
}

/// A blinding key for the blind/convert/unblind flow. May be public
/// only, in which case unblinding is impossible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlindingKey {
    Gl19(Gl19BlindingKey),
}

impl GroupKey {
    pub fn scheme(&self) -> Scheme {
        match self {
            GroupKey::Bbs04(_) => Scheme::Bbs04,
            GroupKey::Gl19(_) => Scheme::Gl19,
            GroupKey::Klap20(_) => Scheme::Klap20,
            GroupKey::Dl21(_) => Scheme::Dl21,
            GroupKey::Dl21Seq(_) => Scheme::Dl21Seq,
        }
    }

    pub fn export(&self) -> Vec<u8> {
        let mut w = Writer::new();
        w.put_u8(self.scheme().code());
        w.put_u8(wire::KEY_KIND_GROUP);
        match self {
            GroupKey::Bbs04(k) => k.write_body(&mut w),
            GroupKey::Gl19(k) => k.write_body(&mut w),
            GroupKey::Klap20(k) => k.write_body(&mut w),
            GroupKey::Dl21(k) | GroupKey::Dl21Seq(k) => k.write_body(&mut w),
        }
        w.finish()
    }

    pub fn import(scheme: Scheme, bytes: &[u8]) -> GroupsigResult<GroupKey> {
        let mut r = Reader::new(bytes);
        r.expect_code(scheme.code())?;
        r.expect_kind(wire::KEY_KIND_GROUP)?;
        let key = match scheme {
            Scheme::Bbs04 => GroupKey::Bbs04(Bbs04GroupKey::read_body(&mut r)?),
            Scheme::Gl19 => GroupKey::Gl19(Gl19GroupKey::read_body(&mut r)?),
            Scheme::Klap20 => GroupKey::Klap20(Klap20GroupKey::read_body(&mut r)?),
            Scheme::Dl21 => GroupKey::Dl21(Dl21GroupKey::read_body(&mut r)?),
            Scheme::Dl21Seq => GroupKey::Dl21Seq(Dl21GroupKey::read_body(&mut r)?),
        };
        r.finish()?;
        Ok(key)
    }

    pub fn to_base64(&self) -> String {
        wire::to_base64(&self.export())
    }

    pub fn from_base64(scheme: Scheme, s: &str) -> GroupsigResult<GroupKey> {
        GroupKey::import(scheme, &wire::from_base64(s)?)
    }
}

impl ManagerKey {
    pub fn scheme(&self) -> Scheme {
        match self {
            ManagerKey::Bbs04(_) => Scheme::Bbs04,
            ManagerKey::Gl19(_) => Scheme::Gl19,
            ManagerKey::Klap20(_) => Scheme::Klap20,
            ManagerKey::Dl21(_) => Scheme::Dl21,
            ManagerKey::Dl21Seq(_) => Scheme::Dl21Seq,
        }
    }

    pub fn export(&self) -> Vec<u8> {
        let mut w = Writer::new();
        w.put_u8(self.scheme().code());
        w.put_u8(wire::KEY_KIND_MGR);
        match self {
            ManagerKey::Bbs04(k) => k.write_body(&mut w),
            ManagerKey::Gl19(k) => k.write_body(&mut w),
            ManagerKey::Klap20(k) => k.write_body(&mut w),
            ManagerKey::Dl21(k) | ManagerKey::Dl21Seq(k) => k.write_body(&mut w),
        }
        w.finish()
    }

    pub fn import(scheme: Scheme, bytes: &[u8]) -> GroupsigResult<ManagerKey> {
        let mut r = Reader::new(bytes);
        r.expect_code(scheme.code())?;
        r.expect_kind(wire::KEY_KIND_MGR)?;
        let key = match scheme {
            Scheme::Bbs04 => ManagerKey::Bbs04(Bbs04ManagerKey::read_body(&mut r)?),
            Scheme::Gl19 => ManagerKey::Gl19(Gl19ManagerKey::read_body(&mut r)?),
            Scheme::Klap20 => ManagerKey::Klap20(Klap20ManagerKey::read_body(&mut r)?),
            Scheme::Dl21 => ManagerKey::Dl21(Dl21ManagerKey::read_body(&mut r)?),
            Scheme::Dl21Seq => ManagerKey::Dl21Seq(Dl21ManagerKey::read_body(&mut r)?),
        };
        r.finish()?;
        Ok(key)
    }

    pub fn to_base64(&self) -> String {
        wire::to_base64(&self.export())
    }

    pub fn from_base64(scheme: Scheme, s: &str) -> GroupsigResult<ManagerKey> {
        ManagerKey::import(scheme, &wire::from_base64(s)?)
    }
}

impl MemberKey {
    /// Creates the empty member key a prospective member feeds into the
    /// join protocol.
    pub fn init(scheme: Scheme) -> MemberKey {
        match scheme {
            Scheme::Bbs04 => MemberKey::Bbs04(Bbs04MemberKey::new()),
            Scheme::Gl19 => MemberKey::Gl19(Gl19MemberKey::new()),
            Scheme::Klap20 => MemberKey::Klap20(Klap20MemberKey::new()),
            Scheme::Dl21 => MemberKey::Dl21(Dl21MemberKey::new()),
            Scheme::Dl21Seq => MemberKey::Dl21Seq(Dl21MemberKey::new()),
        }
    }

    pub fn scheme(&self) -> Scheme {
        match self {
            MemberKey::Bbs04(_) => Scheme::Bbs04,
            MemberKey::Gl19(_) => Scheme::Gl19,
            MemberKey::Klap20(_) => Scheme::Klap20,
            MemberKey::Dl21(_) => Scheme::Dl21,
            MemberKey::Dl21Seq(_) => Scheme::Dl21Seq,
        }
    }

    pub fn export(&self) -> Vec<u8> {
        let mut w = Writer::new();
        w.put_u8(self.scheme().code());
        w.put_u8(wire::KEY_KIND_MEM);
        match self {
            MemberKey::Bbs04(k) => k.write_body(&mut w),
            MemberKey::Gl19(k) => k.write_body(&mut w),
            MemberKey::Klap20(k) => k.write_body(&mut w),
            MemberKey::Dl21(k) | MemberKey::Dl21Seq(k) => k.write_body(&mut w),
        }
        w.finish()
    }

    pub fn import(scheme: Scheme, bytes: &[u8]) -> GroupsigResult<MemberKey> {
        let mut r = Reader::new(bytes);
        r.expect_code(scheme.code())?;
        r.expect_kind(wire::KEY_KIND_MEM)?;
        let key = match scheme {
            Scheme::Bbs04 => MemberKey::Bbs04(Bbs04MemberKey::read_body(&mut r)?),
            Scheme::Gl19 => MemberKey::Gl19(Gl19MemberKey::read_body(&mut r)?),
            Scheme::Klap20 => MemberKey::Klap20(Klap20MemberKey::read_body(&mut r)?),
            Scheme::Dl21 => MemberKey::Dl21(Dl21MemberKey::read_body(&mut r)?),
            Scheme::Dl21Seq => MemberKey::Dl21Seq(Dl21MemberKey::read_body(&mut r)?),
        };
        r.finish()?;
        Ok(key)
    }

    pub fn to_base64(&self) -> String {
        wire::to_base64(&self.export())
    }

    pub fn from_base64(scheme: Scheme, s: &str) -> GroupsigResult<MemberKey> {
        MemberKey::import(scheme, &wire::from_base64(s)?)
    }
}

impl BlindingKey {
    pub fn scheme(&self) -> Scheme {
        match self {
            BlindingKey::Gl19(_) => Scheme::Gl19,
        }
    }

    /// The public half, safe to hand to the converter.
    pub fn public(&self) -> BlindingKey {
        match self {
            BlindingKey::Gl19(k) => BlindingKey::Gl19(k.public()),
        }
    }

    pub fn export(&self) -> Vec<u8> {
        let mut w = Writer::new();
        w.put_u8(self.scheme().code());
        w.put_u8(wire::KEY_KIND_BLD);
        match self {
            BlindingKey::Gl19(k) => k.write_body(&mut w),
        }
        w.finish()
    }

    pub fn import(scheme: Scheme, bytes: &[u8]) -> GroupsigResult<BlindingKey> {
        let mut r = Reader::new(bytes);
        r.expect_code(scheme.code())?;
        r.expect_kind(wire::KEY_KIND_BLD)?;
        let key = match scheme {
            Scheme::Gl19 => BlindingKey::Gl19(Gl19BlindingKey::read_body(&mut r)?),
            _ => {
                return Err(crate::error::GroupsigError::Unsupported {
                    scheme: scheme.name(),
                    op: "blinding keys",
                })
            }
        };
        r.finish()?;
        Ok(key)
    }

    pub fn to_base64(&self) -> String {
        wire::to_base64(&self.export())
    }

    pub fn from_base64(scheme: Scheme, s: &str) -> GroupsigResult<BlindingKey> {
        BlindingKey::import(scheme, &wire::from_base64(s)?)
    }
}
