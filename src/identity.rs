//! Opaque member identities.
//!
//! Schemes whose open walks the GML identify members by their enrollment
//! index; encrypt-then-sign schemes identify them by the pseudonym
//! recovered at unblind time. Equality of identities is integer equality
//! for the former and pseudonym (group element) equality for the latter.

use crate::curve::bls12381::G1;
use crate::error::{GroupsigError, GroupsigResult};
use crate::group::{Element, Encodable};
use crate::registry::Scheme;
use crate::wire;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum IdentityValue {
    /// Index of the member's GML entry.
    Index(u64),
    /// Pseudonym element recovered by unblinding.
    Nym(G1),
}

/// A scheme-tagged member identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    scheme: Scheme,
    value: IdentityValue,
}

impl Identity {
    pub fn from_index(scheme: Scheme, index: u64) -> Self {
        Identity {
            scheme,
            value: IdentityValue::Index(index),
        }
    }

    pub fn from_nym(scheme: Scheme, nym: G1) -> Self {
        Identity {
            scheme,
            value: IdentityValue::Nym(nym),
        }
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// The GML index, for index-backed identities.
    pub fn index(&self) -> Option<u64> {
        match &self.value {
            IdentityValue::Index(i) => Some(*i),
            IdentityValue::Nym(_) => None,
        }
    }

    /// The pseudonym, for pseudonym-backed identities.
    pub fn nym(&self) -> Option<&G1> {
        match &self.value {
            IdentityValue::Nym(p) => Some(p),
            IdentityValue::Index(_) => None,
        }
    }

    /// Parses the string form produced by `Display`: a decimal index for
    /// GML-backed schemes, base64 of the pseudonym element otherwise.
    pub fn from_string(scheme: Scheme, s: &str) -> GroupsigResult<Identity> {
        if scheme.descriptor().has_gml {
            let index = s
                .trim()
                .parse::<u64>()
                .map_err(|_| GroupsigError::InvalidArgument("identity is not a decimal index"))?;
            Ok(Identity::from_index(scheme, index))
        } else {
            let bytes = wire::from_base64(s)?;
            let mut nym = G1::new();
            nym.unmarshal(&bytes)?;
            Ok(Identity::from_nym(scheme, nym))
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.value {
            IdentityValue::Index(i) => write!(f, "{}", i),
            IdentityValue::Nym(p) => f.write_str(&wire::to_base64(&p.marshal())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    #[test]
    fn index_identity_string_roundtrip() {
        let id = Identity::from_index(Scheme::Bbs04, 3);
        let parsed = Identity::from_string(Scheme::Bbs04, &id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn nym_identity_string_roundtrip() {
        let nym = G1::rand(&mut thread_rng());
        let id = Identity::from_nym(Scheme::Gl19, nym);
        let parsed = Identity::from_string(Scheme::Gl19, &id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn identities_of_different_members_differ() {
        assert_ne!(
            Identity::from_index(Scheme::Bbs04, 0),
            Identity::from_index(Scheme::Bbs04, 1)
        );
    }
}
