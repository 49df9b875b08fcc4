// Random number generation

use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

use crate::crypto::hash::HashType;

/// Errors reported by a random byte source
#[derive(Error, Debug)]
pub enum RandomError {
    #[error("Random source failure: {0}")]
    Source(String),
}

/// Secure random byte source trait
pub trait SecureRandom {
    /// Fill `dest` with random bytes.
    ///
    /// Returns how many bytes were actually written, which may be fewer than
    /// `dest.len()`. Callers decide whether a short read is acceptable.
    fn read_bytes(&mut self, dest: &mut [u8],) -> Result<usize, RandomError,>;
}

/// OS-based secure random number generator
pub struct OsSecureRandom {
    rng: OsRng,
}

impl OsSecureRandom {
    pub fn new() -> Self {
        OsSecureRandom { rng: OsRng, }
    }
}

impl Default for OsSecureRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl SecureRandom for OsSecureRandom {
    fn read_bytes(&mut self, dest: &mut [u8],) -> Result<usize, RandomError,> {
        self.rng.try_fill_bytes(dest,).map_err(|e| RandomError::Source(e.to_string(),),)?;
        Ok(dest.len(),)
    }
}

/// Adapter exposing any `rand` generator as a byte source
pub struct RngSource<R,>(pub R,);

impl<R: RngCore,> SecureRandom for RngSource<R,> {
    fn read_bytes(&mut self, dest: &mut [u8],) -> Result<usize, RandomError,> {
        self.0.try_fill_bytes(dest,).map_err(|e| RandomError::Source(e.to_string(),),)?;
        Ok(dest.len(),)
    }
}

/// Deterministic RNG for testing
pub struct DeterministicRng {
    seed: Vec<u8,>,
    counter: u64,
}

impl DeterministicRng {
    pub fn new(seed: &[u8],) -> Self {
        DeterministicRng { seed: seed.to_vec(), counter: 0, }
    }
}

impl SecureRandom for DeterministicRng {
    fn read_bytes(&mut self, dest: &mut [u8],) -> Result<usize, RandomError,> {
        // SHA256(seed || counter) blocks
        let mut hasher = HashType::Sha2_256.new();
        let mut block = vec![0u8; hasher.output_size()];

        for chunk in dest.chunks_mut(block.len(),) {
            hasher.update(&self.seed,);
            hasher.update(&self.counter.to_le_bytes(),);
            hasher.finalize_reset(&mut block,);
            self.counter += 1;

            chunk.copy_from_slice(&block[..chunk.len()],);
        }
        Ok(dest.len(),)
    }
}
