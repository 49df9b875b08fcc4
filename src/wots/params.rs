// WOTS+ parameter sets

use std::fmt;

use tracing::debug;

use crate::crypto::hash::HashType;
use crate::wots::error::WotsError;
use crate::wots::ladder::{compress, Traversal};

/// Winternitz base. Every message byte is one ladder digit, so ladder
/// depths (and ladder indexes) always fit in a single byte.
pub const W: usize = 256;

/// Public keys are always the output of `PK_HASH`
pub const PK_SIZE: usize = 32;

/// Hash used for the tweak and the final public key compression
pub const PK_HASH: HashType = HashType::Sha3_256;

/// Size of secret and public seeds
pub const SEED_SIZE: usize = 32;

/// Largest hashed message size. Keeps `m + 2` checksum-extended ladders
/// within `W`, so ladder indexes also fit in one byte.
pub const MAX_MSG_SIZE: usize = 254;

/// A WOTS+ public key
pub type PublicKey = [u8; PK_SIZE];

/// WOTS+ parameters
///
/// Equality is structural over `(n, m, prf_hash, msg_hash)`; the ladder
/// count is derived from `m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Params {
    /// Size of secret key elements and ladder positions
    n: usize,
    /// Size the message is hashed down to before signing
    m: usize,
    /// Hash for secret derivation, masking elements and chaining
    prf_hash: HashType,
    /// Hash for compressing the message
    msg_hash: HashType,
    /// Message ladders plus checksum ladders
    total: usize,
}

impl Params {
    /// Create a parameter set, validating sizes against the chosen hashes
    pub fn new(n: usize, m: usize, prf_hash: HashType, msg_hash: HashType) -> Result<Self, WotsError> {
        if n == 0 {
            return Err(WotsError::InvalidElementSize { n });
        }
        if m < 1 || m > MAX_MSG_SIZE {
            return Err(WotsError::InvalidMessageSize { m, max: MAX_MSG_SIZE });
        }
        if prf_hash.size() < n {
            return Err(WotsError::HashTooSmall {
                role: "PRF",
                hash: prf_hash,
                size: prf_hash.size(),
                required: n,
            });
        }
        if msg_hash.size() < m {
            return Err(WotsError::HashTooSmall {
                role: "MSG",
                hash: msg_hash,
                size: msg_hash.size(),
                required: m,
            });
        }
        Ok(Self::from_parts(n, m, prf_hash, msg_hash))
    }

    /// Unchecked constructor for the static security levels
    pub(crate) const fn from_parts(n: usize, m: usize, prf_hash: HashType, msg_hash: HashType) -> Self {
        // A single digest byte needs a single checksum byte
        let checksum_ladders = if m == 1 { 1 } else { 2 };
        Params {
            n,
            m,
            prf_hash,
            msg_hash,
            total: m + checksum_ladders,
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn m(&self) -> usize {
        self.m
    }

    pub fn prf_hash(&self) -> HashType {
        self.prf_hash
    }

    pub fn msg_hash(&self) -> HashType {
        self.msg_hash
    }

    pub fn total_ladders(&self) -> usize {
        self.total
    }

    /// Length of a signature body: public seed followed by every ladder value
    pub fn body_size(&self) -> usize {
        SEED_SIZE + self.total * self.n
    }

    /// Length of a full wire signature, including the encoding byte
    pub fn signature_size(&self) -> usize {
        1 + self.body_size()
    }

    pub fn equal(&self, other: &Params) -> bool {
        self == other
    }

    /// Recover the public key claimed by `signature` for `msg`.
    ///
    /// `signature` is the body without the encoding byte. A returned key
    /// still has to be compared against the expected one by the caller.
    pub fn decode(&self, msg: &[u8], signature: &[u8]) -> Result<PublicKey, WotsError> {
        let expected = self.body_size();
        if signature.len() != expected {
            debug!(expected, actual = signature.len(), "rejecting WOTS+ signature with invalid length");
            return Err(WotsError::InvalidSignatureLength {
                expected,
                actual: signature.len(),
            });
        }

        let (pub_seed, ladders) = signature.split_at(SEED_SIZE);
        let ends = self.compute_ladders(pub_seed, ladders, Traversal::Decode(msg));
        Ok(compress(pub_seed, &ends, self.n))
    }

    /// Append-style variant of [`Params::decode`].
    ///
    /// `out` must be empty with capacity exactly `PK_SIZE`; on success it
    /// holds the recovered public key.
    pub fn decode_into(&self, out: &mut Vec<u8>, msg: &[u8], signature: &[u8]) -> Result<(), WotsError> {
        let expected = self.body_size();
        if signature.len() != expected {
            return Err(WotsError::InvalidSignatureLength {
                expected,
                actual: signature.len(),
            });
        }
        if !out.is_empty() || out.capacity() != PK_SIZE {
            debug!(len = out.len(), capacity = out.capacity(), "rejecting malformed output buffer");
            return Err(WotsError::InvalidOutputBuffer {
                len: out.len(),
                capacity: out.capacity(),
                expected: PK_SIZE,
            });
        }

        out.extend_from_slice(&self.decode(msg, signature)?);
        Ok(())
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "N: {}, M: {}, PRF: {}, MSG: {}",
            self.n, self.m, self.prf_hash, self.msg_hash
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blake3_params(n: usize, m: usize) -> Result<Params, WotsError> {
        Params::new(n, m, HashType::Blake3_256, HashType::Blake3_256)
    }

    #[test]
    fn test_new_params_bounds() {
        assert!(matches!(blake3_params(32, 0), Err(WotsError::InvalidMessageSize { m: 0, .. })));
        assert!(matches!(
            blake3_params(32, MAX_MSG_SIZE + 1),
            Err(WotsError::InvalidMessageSize { m: 255, .. })
        ));
        assert!(matches!(blake3_params(0, 32), Err(WotsError::InvalidElementSize { n: 0 })));

        // Message size is only bounded by the hash when below MAX_MSG_SIZE
        assert!(matches!(
            blake3_params(32, MAX_MSG_SIZE),
            Err(WotsError::HashTooSmall { role: "MSG", .. })
        ));
    }

    #[test]
    fn test_new_params_hash_sizes() {
        let err = Params::new(32, 32, HashType::Sha3_224, HashType::Blake3_256).unwrap_err();
        assert!(matches!(err, WotsError::HashTooSmall { role: "PRF", size: 28, required: 32, .. }));

        let err = Params::new(32, 32, HashType::Blake3_256, HashType::Sha3_224).unwrap_err();
        assert!(matches!(err, WotsError::HashTooSmall { role: "MSG", size: 28, required: 32, .. }));

        // Exactly the hash size is fine
        assert!(Params::new(28, 28, HashType::Sha3_224, HashType::Sha2_224).is_ok());
    }

    #[test]
    fn test_checksum_ladders() {
        let params = blake3_params(32, 1).unwrap();
        assert_eq!(params.total_ladders(), 2);

        let params = blake3_params(32, 2).unwrap();
        assert_eq!(params.total_ladders(), 4);

        let params = blake3_params(32, 32).unwrap();
        assert_eq!(params.total_ladders(), 34);
    }

    #[test]
    fn test_params_string() {
        let params = blake3_params(32, 32).unwrap();
        assert_eq!(params.to_string(), "N: 32, M: 32, PRF: BLAKE3_256, MSG: BLAKE3_256");
    }

    #[test]
    fn test_params_equal() {
        let params = blake3_params(32, 32).unwrap();

        assert!(!params.equal(&blake3_params(28, 32).unwrap()), "different n");
        assert!(!params.equal(&blake3_params(32, 28).unwrap()), "different m");
        assert!(
            !params.equal(&Params::new(32, 32, HashType::Blake2b256, HashType::Blake3_256).unwrap()),
            "different PRF hash"
        );
        assert!(
            !params.equal(&Params::new(32, 32, HashType::Blake3_256, HashType::Blake2b256).unwrap()),
            "different MSG hash"
        );
        assert!(params.equal(&blake3_params(32, 32).unwrap()));
    }

    #[test]
    fn test_sizes() {
        let params = blake3_params(32, 32).unwrap();
        assert_eq!(params.body_size(), (32 + 2) * 32 + 32);
        assert_eq!(params.signature_size(), 1 + (32 + 2) * 32 + 32);
    }

    #[test]
    fn test_decode_lengths_and_buffers() {
        let params = blake3_params(32, 32).unwrap();
        let sig_len = params.body_size();
        let sig: Vec<u8> = (0..sig_len).map(|i| (i * 7) as u8).collect();
        let msg = [0xabu8; 256];

        assert!(params.decode(&msg, &sig).is_ok());

        assert!(matches!(
            params.decode(&msg, &sig[..sig_len - 2]),
            Err(WotsError::InvalidSignatureLength { actual, .. }) if actual == sig_len - 2
        ));

        let mut padded = msg.to_vec();
        padded.extend_from_slice(&sig);
        assert!(params.decode(&msg, &padded).is_err());

        let mut out = Vec::with_capacity(PK_SIZE);
        params.decode_into(&mut out, &msg, &sig).unwrap();
        assert_eq!(out.as_slice(), &params.decode(&msg, &sig).unwrap()[..]);

        // Already holding a value
        assert!(matches!(
            params.decode_into(&mut out, &msg, &sig),
            Err(WotsError::InvalidOutputBuffer { len: PK_SIZE, .. })
        ));

        let mut unallocated = Vec::new();
        assert!(params.decode_into(&mut unallocated, &msg, &sig).is_err());

        let mut sized = vec![0u8; PK_SIZE];
        assert!(params.decode_into(&mut sized, &msg, &sig).is_err());

        let mut small = Vec::with_capacity(PK_SIZE - 2);
        assert!(params.decode_into(&mut small, &msg, &sig).is_err());
        assert!(small.is_empty());
    }
}
