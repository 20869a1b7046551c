//! The Group Membership List: an ordered, append-only record of enrolled
//! members. Entry `i` belongs to the member whose identity `open`
//! recovers as `i`. Only the issuer side of the join protocol appends;
//! entries are never removed or reordered.

use crate::curve::bls12381::{Scalar, G1, G2, GT};
use crate::error::{EncodingError, GroupsigError, GroupsigResult};
use crate::registry::Scheme;
use crate::wire::{Reader, Writer};

/// Scheme-specific payload of a GML entry: the issuer-side view of the
/// member's credential, sufficient for open to test a signature against
/// the entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GmlEntryData {
    /// The member's SDH certificate and secret exponent.
    Bbs04 { a: G1, x: Scalar },
    /// Two ElGamal encryptions of the member's G2 credential, one per
    /// opener key share, plus the pairing tag `tau = e(g, ff)`.
    Klap20 {
        ss0: G2,
        ff0: G2,
        ss1: G2,
        ff1: G2,
        tau: GT,
    },
}

impl GmlEntryData {
    fn scheme(&self) -> Scheme {
        match self {
            GmlEntryData::Bbs04 { .. } => Scheme::Bbs04,
            GmlEntryData::Klap20 { .. } => Scheme::Klap20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GmlEntry {
    /// Sequential enrollment index; doubles as the member's identity.
    pub index: u64,
    pub data: GmlEntryData,
}

/// An in-memory GML with explicit export/import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gml {
    scheme: Scheme,
    entries: Vec<GmlEntry>,
}

impl Gml {
    /// Creates an empty GML. Fails for schemes that do not keep one.
    pub fn new(scheme: Scheme) -> GroupsigResult<Self> {
        if !scheme.descriptor().has_gml {
            return Err(GroupsigError::InvalidArgument(
                "scheme does not use a membership list",
            ));
        }
        Ok(Gml {
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

    pub fn get(&self, index: u64) -> GroupsigResult<&GmlEntry> {
        self.entries
            .get(index as usize)
            .ok_or(GroupsigError::InvalidArgument("gml index out of range"))
    }

    pub fn entries(&self) -> impl Iterator<Item = &GmlEntry> {
        self.entries.iter()
    }

    /// Appends an entry for a newly enrolled member and returns its
    /// index, i.e. the member's identity under open.
    pub fn push(&mut self, data: GmlEntryData) -> GroupsigResult<u64> {
        if data.scheme() != self.scheme {
            return Err(GroupsigError::SchemeMismatch);
        }
        let index = self.entries.len() as u64;
        self.entries.push(GmlEntry { index, data });
        Ok(index)
    }

    /// Self-describing byte export: scheme code, entry count, entries.
    pub fn export(&self) -> Vec<u8> {
        let mut w = Writer::new();
        w.put_u8(self.scheme.code());
        w.put_u64(self.entries.len() as u64);
        for entry in &self.entries {
            w.put_u64(entry.index);
            match &entry.data {
                GmlEntryData::Bbs04 { a, x } => {
                    w.put_element(a);
                    w.put_element(x);
                }
                GmlEntryData::Klap20 {
                    ss0,
                    ff0,
                    ss1,
                    ff1,
                    tau,
                } => {
                    w.put_element(ss0);
                    w.put_element(ff0);
                    w.put_element(ss1);
                    w.put_element(ff1);
                    w.put_element(tau);
                }
            }
        }
        w.finish()
    }

    pub fn import(scheme: Scheme, bytes: &[u8]) -> GroupsigResult<Gml> {
        let mut gml = Gml::new(scheme)?;
        let mut r = Reader::new(bytes);
        r.expect_code(scheme.code())?;
        let n = r.get_u64("gml entry count")?;
        for _ in 0..n {
            let index = r.get_u64("gml entry index")?;
            if index != gml.entries.len() as u64 {
                return Err(
                    EncodingError::InvalidElement("gml entries out of order".to_string()).into(),
                );
            }
            let data = match scheme {
                Scheme::Bbs04 => GmlEntryData::Bbs04 {
                    a: r.get_element("gml a")?,
                    x: r.get_element("gml x")?,
                },
                Scheme::Klap20 => GmlEntryData::Klap20 {
                    ss0: r.get_element("gml ss0")?,
                    ff0: r.get_element("gml ff0")?,
                    ss1: r.get_element("gml ss1")?,
                    ff1: r.get_element("gml ff1")?,
                    tau: r.get_element("gml tau")?,
                },
                _ => return Err(GroupsigError::SchemeMismatch),
            };
            gml.entries.push(GmlEntry { index, data });
        }
        r.finish()?;
        Ok(gml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::Element;
    use rand::prelude::*;

    #[test]
    fn rejects_gml_less_schemes() {
        assert!(Gml::new(Scheme::Gl19).is_err());
        assert!(Gml::new(Scheme::Bbs04).is_ok());
    }

    #[test]
    fn push_assigns_sequential_indices() {
        let mut rng = thread_rng();
        let mut gml = Gml::new(Scheme::Bbs04).unwrap();
        for expected in 0..3u64 {
            let index = gml
                .push(GmlEntryData::Bbs04 {
                    a: G1::rand(&mut rng),
                    x: Scalar::rand(&mut rng),
                })
                .unwrap();
            assert_eq!(index, expected);
        }
        assert_eq!(gml.len(), 3);
        assert!(gml.get(2).is_ok());
        assert!(gml.get(3).is_err());
    }

    #[test]
    fn export_import_roundtrip() {
        let mut rng = thread_rng();
        let mut gml = Gml::new(Scheme::Bbs04).unwrap();
        for _ in 0..2 {
            gml.push(GmlEntryData::Bbs04 {
                a: G1::rand(&mut rng),
                x: Scalar::rand(&mut rng),
            })
            .unwrap();
        }

        let bytes = gml.export();
        let imported = Gml::import(Scheme::Bbs04, &bytes).unwrap();
        assert_eq!(gml, imported);

        // scheme byte is validated
        assert!(Gml::import(Scheme::Klap20, &bytes).is_err());
    }
}
