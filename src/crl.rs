//! The Certificate Revocation List: the set of tracing trapdoors of
//! revoked members. Insertion of an already-present trapdoor is a no-op.

use crate::curve::bls12381::G1;
use crate::error::{GroupsigError, GroupsigResult};
use crate::registry::Scheme;
use crate::wire::{Reader, Writer};

/// A per-member tracing trapdoor, as revealed from a GML entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trapdoor {
    /// The member's SDH certificate `A`; trace recovers the same element
    /// from a signature with the opener secret.
    Bbs04(G1),
}

impl Trapdoor {
    pub fn scheme(&self) -> Scheme {
        match self {
            Trapdoor::Bbs04(_) => Scheme::Bbs04,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrlEntry {
    pub trapdoor: Trapdoor,
    /// GML index of the revoked member, kept for reporting.
    pub index: u64,
}

/// An in-memory CRL with explicit export/import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crl {
    scheme: Scheme,
    entries: Vec<CrlEntry>,
}

impl Crl {
    /// Creates an empty CRL. Fails for schemes that do not keep one.
    pub fn new(scheme: Scheme) -> GroupsigResult<Self> {
        if !scheme.descriptor().has_crl {
            return Err(GroupsigError::InvalidArgument(
                "scheme does not use a revocation list",
            ));
        }
        Ok(Crl {
            scheme,
            entries: Vec::new(),
        })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, trapdoor: &Trapdoor) -> bool {
        self.entries.iter().any(|e| &e.trapdoor == trapdoor)
    }

    /// Inserts a revocation entry; duplicates (same trapdoor) are
    /// silently ignored.
    pub fn insert(&mut self, entry: CrlEntry) -> GroupsigResult<()> {
        if entry.trapdoor.scheme() != self.scheme {
            return Err(GroupsigError::SchemeMismatch);
        }
        if !self.contains(&entry.trapdoor) {
            self.entries.push(entry);
        }
        Ok(())
    }

    pub fn export(&self) -> Vec<u8> {
        let mut w = Writer::new();
        w.put_u8(self.scheme.code());
        w.put_u64(self.entries.len() as u64);
        for entry in &self.entries {
            w.put_u64(entry.index);
            match &entry.trapdoor {
                Trapdoor::Bbs04(a) => w.put_element(a),
            }
        }
        w.finish()
    }

    pub fn import(scheme: Scheme, bytes: &[u8]) -> GroupsigResult<Crl> {
        let mut crl = Crl::new(scheme)?;
        let mut r = Reader::new(bytes);
        r.expect_code(scheme.code())?;
        let n = r.get_u64("crl entry count")?;
        for _ in 0..n {
            let index = r.get_u64("crl entry index")?;
            let trapdoor = match scheme {
                Scheme::Bbs04 => Trapdoor::Bbs04(r.get_element("crl trapdoor")?),
                _ => return Err(GroupsigError::SchemeMismatch),
            };
            crl.insert(CrlEntry { trapdoor, index })?;
        }
        r.finish()?;
        Ok(crl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::Element;
    use rand::prelude::*;

    #[test]
    fn duplicate_insertion_is_noop() {
        let mut rng = thread_rng();
        let mut crl = Crl::new(Scheme::Bbs04).unwrap();
        let a = G1::rand(&mut rng);

        crl.insert(CrlEntry {
            trapdoor: Trapdoor::Bbs04(a.clone()),
            index: 0,
        })
        .unwrap();
        crl.insert(CrlEntry {
            trapdoor: Trapdoor::Bbs04(a.clone()),
            index: 0,
        })
        .unwrap();

        assert_eq!(crl.len(), 1);
        assert!(crl.contains(&Trapdoor::Bbs04(a)));
    }

    #[test]
    fn export_import_roundtrip() {
        let mut rng = thread_rng();
        let mut crl = Crl::new(Scheme::Bbs04).unwrap();
        for i in 0..2 {
            crl.insert(CrlEntry {
                trapdoor: Trapdoor::Bbs04(G1::rand(&mut rng)),
                index: i,
            })
            .unwrap();
        }

        let bytes = crl.export();
        let imported = Crl::import(Scheme::Bbs04, &bytes).unwrap();
        assert_eq!(crl, imported);
    }
}
