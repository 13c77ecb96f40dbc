//! Content hashing for change detection.
//!
//! `folio.toml` is hashed on load; the dev server compares the hash on each
//! request and only re-parses the file when it changed. Build digests use
//! blake3 instead (see `generator`).

use rustc_hash::FxHasher;
use std::hash::Hasher;

/// Compute 64-bit hash from byte data.
#[inline]
pub fn compute<T: AsRef<[u8]> + ?Sized>(data: &T) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(data.as_ref());
    hasher.finish()
}
