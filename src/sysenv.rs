//! Process-wide environment: the PRNG shared by every operation that
//! draws randomness, plus the helpers built on top of it.
//!
//! The environment is deliberately thread-local. Operations never
//! synchronize on it; callers that parallelize must initialize one
//! environment per thread.

use crate::error::{GroupsigError, GroupsigResult};
use rand::rngs::OsRng;
use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};
use std::cell::RefCell;

thread_local! {
    static SYSENV: RefCell<Option<Sysenv>> = RefCell::new(None);
}

struct Sysenv {
    rng: ChaCha20Rng,
}

/// Installs the environment for this thread. When `seed` is provided the
/// PRNG stream is fully determined by it; otherwise the PRNG is seeded
/// from the OS entropy source. Calling `init` again replaces the
/// previous environment.
pub fn init(seed: Option<u64>) -> GroupsigResult<()> {
    let rng = match seed {
        Some(s) => ChaCha20Rng::seed_from_u64(s),
        None => {
            let mut raw = [0u8; 32];
            OsRng.fill_bytes(&mut raw);
            ChaCha20Rng::from_seed(raw)
        }
    };
    SYSENV.with(|env| {
        *env.borrow_mut() = Some(Sysenv { rng });
    });
    Ok(())
}

/// Releases the environment installed by [`init`].
pub fn clear() {
    SYSENV.with(|env| {
        *env.borrow_mut() = None;
    });
}

/// Runs `f` with the environment PRNG. Fails if [`init`] was not called
/// on this thread.
pub fn with_rng<T>(f: impl FnOnce(&mut ChaCha20Rng) -> T) -> GroupsigResult<T> {
    SYSENV.with(|env| {
        let mut env = env.borrow_mut();
        let env = env.as_mut().ok_or(GroupsigError::Uninitialized)?;
        Ok(f(&mut env.rng))
    })
}

/// Fills `buf` with uniform random bytes from the environment PRNG.
pub fn random_bytes(buf: &mut [u8]) -> GroupsigResult<()> {
    with_rng(|rng| rng.fill_bytes(buf))
}

/// Returns a uniform integer in `[0, n]` by modular reduction of a 64-bit
/// draw. The bias is negligible for the small `n` this library uses
/// (permutation indices, the bit selection in open); do not widen its use.
pub fn random_in_range(n: u64) -> GroupsigResult<u64> {
    let r = with_rng(|rng| rng.next_u64())?;
    match n.checked_add(1) {
        Some(m) => Ok(r % m),
        None => Ok(r),
    }
}

/// Permutes `items` uniformly in place with the Durstenfeld variant of
/// the Fisher-Yates shuffle, drawing indices from the environment PRNG.
pub fn shuffle<T>(items: &mut [T]) -> GroupsigResult<()> {
    if items.len() < 2 {
        return Ok(());
    }
    for i in (1..items.len()).rev() {
        let j = random_in_range(i as u64)? as usize;
        items.swap(i, j);
    }
    Ok(())
}

/// Derives a self-contained PRNG from an explicit per-operation seed.
/// Used by `sign` when the caller fixes the signature randomness; the
/// environment PRNG is left untouched.
pub fn seeded_rng(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}

/// The PRNG an operation should draw from: a stream derived from the
/// caller's seed when one is given (reproducible output), otherwise a
/// stream forked off the environment PRNG.
pub fn operation_rng(seed: Option<u64>) -> GroupsigResult<ChaCha20Rng> {
    match seed {
        Some(s) => Ok(seeded_rng(s)),
        None => {
            let mut raw = [0u8; 32];
            random_bytes(&mut raw)?;
            Ok(ChaCha20Rng::from_seed(raw))
        }
    }
}
