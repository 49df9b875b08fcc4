// Hash function abstractions

use std::fmt;

use blake2::digest::consts::U32;
use blake2::Blake2b;
use sha2::digest::FixedOutputReset;
use sha2::{Digest, Sha224, Sha256};
use sha3::digest::{ExtendableOutputReset, Reset, Update, XofReader};
use sha3::{Sha3_224, Sha3_256, Shake256};

/// Output length used for SHAKE256, large enough for any hashed message size
pub const SHAKE256_OUTPUT: usize = 256;

/// Trait for incremental hash functions
///
/// Instances are reused across many calls, so every implementation must
/// return to the empty-input state after `finalize_reset` or `reset`.
pub trait HashFunction {
    /// Absorb more input
    fn update(&mut self, data: &[u8]);

    /// Write the digest of everything absorbed so far into `out`, then reset.
    ///
    /// `out` must be exactly `output_size()` bytes long.
    fn finalize_reset(&mut self, out: &mut [u8]);

    /// Discard any absorbed input
    fn reset(&mut self);

    /// Get output size in bytes
    fn output_size(&self) -> usize;

    /// Hash input data in one shot
    fn hash(&mut self, data: &[u8]) -> Vec<u8> {
        self.reset();
        self.update(data);
        let mut out = vec![0u8; self.output_size()];
        self.finalize_reset(&mut out);
        out
    }
}

/// Adapter for every RustCrypto `Digest` implementation
struct DigestHash<D>(D);

impl<D> HashFunction for DigestHash<D>
where
    D: Digest + FixedOutputReset,
{
    fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.0, data);
    }

    fn finalize_reset(&mut self, out: &mut [u8]) {
        out.copy_from_slice(&Digest::finalize_reset(&mut self.0));
    }

    fn reset(&mut self) {
        Digest::reset(&mut self.0);
    }

    fn output_size(&self) -> usize {
        <D as Digest>::output_size()
    }
}

/// BLAKE3 with its default 32 byte output
struct Blake3Hash(blake3::Hasher);

impl HashFunction for Blake3Hash {
    fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    fn finalize_reset(&mut self, out: &mut [u8]) {
        out.copy_from_slice(self.0.finalize().as_bytes());
        self.0.reset();
    }

    fn reset(&mut self) {
        self.0.reset();
    }

    fn output_size(&self) -> usize {
        blake3::OUT_LEN
    }
}

/// SHAKE256 squeezed to `SHAKE256_OUTPUT` bytes
struct Shake256Hash(Shake256);

impl HashFunction for Shake256Hash {
    fn update(&mut self, data: &[u8]) {
        Update::update(&mut self.0, data);
    }

    fn finalize_reset(&mut self, out: &mut [u8]) {
        self.0.finalize_xof_reset().read(out);
    }

    fn reset(&mut self) {
        Reset::reset(&mut self.0);
    }

    fn output_size(&self) -> usize {
        SHAKE256_OUTPUT
    }
}

/// Supported hash families.
///
/// Parameter sets store one of these instead of a hasher, which keeps them
/// `Copy` and comparable; a fresh instance comes from [`HashType::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashType {
    Sha2_224,
    Sha2_256,
    Sha3_224,
    Sha3_256,
    Blake2b256,
    Blake3_256,
    Shake256_2048,
}

impl HashType {
    /// Native digest size in bytes
    pub const fn size(self) -> usize {
        match self {
            HashType::Sha2_224 | HashType::Sha3_224 => 28,
            HashType::Sha2_256
            | HashType::Sha3_256
            | HashType::Blake2b256
            | HashType::Blake3_256 => 32,
            HashType::Shake256_2048 => SHAKE256_OUTPUT,
        }
    }

    /// Create a fresh hasher of this family
    #[allow(clippy::new_ret_no_self)]
    pub fn new(self) -> Box<dyn HashFunction> {
        match self {
            HashType::Sha2_224 => Box::new(DigestHash(Sha224::new())),
            HashType::Sha2_256 => Box::new(DigestHash(Sha256::new())),
            HashType::Sha3_224 => Box::new(DigestHash(Sha3_224::new())),
            HashType::Sha3_256 => Box::new(DigestHash(Sha3_256::new())),
            HashType::Blake2b256 => Box::new(DigestHash(Blake2b::<U32>::new())),
            HashType::Blake3_256 => Box::new(Blake3Hash(blake3::Hasher::new())),
            HashType::Shake256_2048 => Box::new(Shake256Hash(Shake256::default())),
        }
    }
}

impl fmt::Display for HashType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HashType::Sha2_224 => "SHA2_224",
            HashType::Sha2_256 => "SHA2_256",
            HashType::Sha3_224 => "SHA3_224",
            HashType::Sha3_256 => "SHA3_256",
            HashType::Blake2b256 => "BLAKE2B_256",
            HashType::Blake3_256 => "BLAKE3_256",
            HashType::Shake256_2048 => "SHAKE256_2048",
        };
        f.write_str(name)
    }
}
