//! # Group signatures
//!
//! This crate provides a family of group signature schemes behind one
//! scheme-agnostic protocol surface: any enrolled member can sign on
//! behalf of the group, verifiers learn nothing about which member
//! signed, and the holders of the manager keys can open, trace, convert
//! or link signatures depending on the scheme.
//!
//! Supported schemes are listed in [`registry::Scheme`]; their
//! capabilities (membership list, revocation list, verifiable opening,
//! manager key roles, join protocol shape) are described by
//! [`registry::SchemeDescriptor`].
//!
//! ## Example
//!
//! Setting up a BBS04 group, enrolling a member and signing:
//!
//! ```rust
//! use groupsig::{gml::Gml, key::MemberKey, message::Message, registry::Scheme};
//!
//! # fn main() -> groupsig::GroupsigResult<()> {
//! groupsig::init(Scheme::Bbs04, Some(1))?;
//!
//! // setup produces the group key, the manager key and an empty GML
//! let mut grpkey = None;
//! let mut gml = Gml::new(Scheme::Bbs04)?;
//! let mgrkey = groupsig::setup(Scheme::Bbs04, &mut grpkey, Some(&mut gml))?;
//! let grpkey = grpkey.expect("setup populates the group key");
//!
//! // the caller sequences the join protocol; BBS04 exchanges a single
//! // message, from the issuer to the member
//! let mut memkey = MemberKey::init(Scheme::Bbs04);
//! let m1 = groupsig::join_mgr(Some(&mut gml), &mgrkey, 0, None, &grpkey)?
//!     .expect("issuer step 0 produces a message");
//! groupsig::join_mem(&mut memkey, 1, Some(&m1), &grpkey)?;
//!
//! // sign and verify
//! let msg = Message::from_string("Hello, World!");
//! let sig = groupsig::sign(&msg, &memkey, &grpkey, None)?;
//! assert!(groupsig::verify(&sig, &msg, &grpkey)?);
//!
//! // the manager can de-anonymize the signature
//! let (index, _proof) = groupsig::open(&sig, &grpkey, &mgrkey, Some(&gml))?;
//! assert_eq!(index, 0);
//! # Ok(())
//! # }
//! ```
//!
//! Scope-bound schemes (dl21, dl21seq) expect messages in the JSON form
//! `{"scope": ..., "message": ...}`; blind-capable schemes (gl19) add
//! the three-party blind/convert/unblind flow. See the corresponding
//! modules under [`schemes`].

/// The Certificate Revocation List and tracing trapdoors.
pub mod crl;

/// Curve implementations for the traits defined in the [`group`] module.
pub mod curve;

/// Error taxonomy of the library.
pub mod error;

/// The Group Membership List.
pub mod gml;

/// Definitions of generic traits with scalars of prime fields, points on
/// elliptic curves and pairing targets.
pub mod group;

/// Opaque member identities.
pub mod identity;

/// Scheme-tagged key containers.
pub mod key;

/// Byte messages and the scope/message JSON envelope.
pub mod message;

/// Scheme-tagged proof container.
pub mod proof;

/// The registry of supported schemes.
pub mod registry;

/// Concrete scheme implementations.
pub mod schemes;

/// Scheme-tagged signature containers.
pub mod signature;

/// Fiat-Shamir transformed sigma protocols.
pub mod spk;

/// The process-wide environment: PRNG, random-in-range, shuffling.
pub mod sysenv;

/// The length-prefixed wire format shared by all artifacts.
pub mod wire;

mod dispatch;

pub use dispatch::*;
pub use error::{GroupsigError, GroupsigResult};
