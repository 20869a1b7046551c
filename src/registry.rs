//! The registry of supported schemes and their static metadata.

use std::fmt;

/// Which side sends the first message of the join protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinSide {
    Issuer,
    Member,
}

/// Immutable description of a scheme: its stable code, name, capability
/// flags and manager-key roles. `issuer_key`/`inspector_key` number the
/// manager keys starting at 1; 0 means the scheme has no such key.
#[derive(Debug, Clone, Copy)]
pub struct SchemeDescriptor {
    pub code: u8,
    pub name: &'static str,
    pub has_gml: bool,
    pub has_crl: bool,
    pub has_pairings: bool,
    pub has_open_proof: bool,
    pub issuer_key: u8,
    pub inspector_key: u8,
    pub join_start: JoinSide,
    pub join_seq: u8,
}

/// A supported group signature scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Bbs04,
    Gl19,
    Klap20,
    Dl21,
    Dl21Seq,
}

const BBS04_DESC: SchemeDescriptor = SchemeDescriptor {
    code: 1,
    name: "bbs04",
    has_gml: true,
    has_crl: true,
    has_pairings: true,
    has_open_proof: false,
    issuer_key: 1,
    inspector_key: 1,
    join_start: JoinSide::Issuer,
    join_seq: 1,
};

const GL19_DESC: SchemeDescriptor = SchemeDescriptor {
    code: 3,
    name: "gl19",
    has_gml: false,
    has_crl: false,
    has_pairings: true,
    has_open_proof: false,
    issuer_key: 1,
    inspector_key: 2,
    join_start: JoinSide::Issuer,
    join_seq: 3,
};

const KLAP20_DESC: SchemeDescriptor = SchemeDescriptor {
    code: 5,
    name: "klap20",
    has_gml: true,
    has_crl: false,
    has_pairings: true,
    has_open_proof: true,
    issuer_key: 1,
    inspector_key: 2,
    join_start: JoinSide::Issuer,
    join_seq: 3,
};

const DL21_DESC: SchemeDescriptor = SchemeDescriptor {
    code: 6,
    name: "dl21",
    has_gml: false,
    has_crl: false,
    has_pairings: true,
    has_open_proof: false,
    issuer_key: 1,
    inspector_key: 0,
    join_start: JoinSide::Issuer,
    join_seq: 3,
};

const DL21SEQ_DESC: SchemeDescriptor = SchemeDescriptor {
    code: 7,
    name: "dl21seq",
    has_gml: false,
    has_crl: false,
    has_pairings: true,
    has_open_proof: false,
    issuer_key: 1,
    inspector_key: 0,
    join_start: JoinSide::Issuer,
    join_seq: 3,
};

impl Scheme {
    /// Every registered scheme, in code order.
    pub const ALL: [Scheme; 5] = [
        Scheme::Bbs04,
        Scheme::Gl19,
        Scheme::Klap20,
        Scheme::Dl21,
        Scheme::Dl21Seq,
    ];

    pub const fn descriptor(self) -> &'static SchemeDescriptor {
        match self {
            Scheme::Bbs04 => &BBS04_DESC,
            Scheme::Gl19 => &GL19_DESC,
            Scheme::Klap20 => &KLAP20_DESC,
            Scheme::Dl21 => &DL21_DESC,
            Scheme::Dl21Seq => &DL21SEQ_DESC,
        }
    }

    pub const fn code(self) -> u8 {
        self.descriptor().code
    }

    pub const fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Looks a scheme up by its stable code.
    pub fn from_code(code: u8) -> Option<Scheme> {
        Scheme::ALL.iter().copied().find(|s| s.code() == code)
    }

    /// Looks a scheme up by name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Scheme> {
        Scheme::ALL
            .iter()
            .copied()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }

    pub fn is_supported_code(code: u8) -> bool {
        Scheme::from_code(code).is_some()
    }

    /// Number of messages exchanged in the join protocol.
    pub const fn joinseq(self) -> u8 {
        self.descriptor().join_seq
    }

    /// Which side starts the join protocol.
    pub const fn joinstart(self) -> JoinSide {
        self.descriptor().join_start
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct_and_stable() {
        let codes = Scheme::ALL.iter().map(|s| s.code()).collect::<Vec<_>>();
        assert_eq!(codes, vec![1, 3, 5, 6, 7]);
        let mut dedup = codes.clone();
        dedup.dedup();
        assert_eq!(codes, dedup);
    }

    #[test]
    fn lookup_by_code_and_name() {
        assert_eq!(Scheme::from_code(5), Some(Scheme::Klap20));
        assert_eq!(Scheme::from_code(2), None);
        assert!(Scheme::is_supported_code(1));
        assert!(!Scheme::is_supported_code(0));

        assert_eq!(Scheme::from_name("GL19"), Some(Scheme::Gl19));
        assert_eq!(Scheme::from_name("dl21seq"), Some(Scheme::Dl21Seq));
        assert_eq!(Scheme::from_name("nope"), None);
    }

    #[test]
    fn join_metadata() {
        assert_eq!(Scheme::Bbs04.joinseq(), 1);
        assert_eq!(Scheme::Gl19.joinseq(), 3);
        assert_eq!(Scheme::Dl21.joinstart(), JoinSide::Issuer);
    }
}
