/// BLS12-381 instantiation of the group traits, backed by arkworks.
pub mod bls12381;
