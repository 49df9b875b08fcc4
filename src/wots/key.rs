// WOTS+ keys

use std::fmt;
use std::sync::OnceLock;

use tracing::{debug, trace};
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::random::SecureRandom;
use crate::wots::error::WotsError;
use crate::wots::ladder::{compress, ChainArena, Traversal};
use crate::wots::params::{Params, PublicKey, SEED_SIZE};
use crate::wots::primitives::prf;
use crate::wots::security::{ParamsEncoding, PARAMS_ENCODING_LEN};

/// A WOTS+ one-time key.
///
/// Holds the secret and public seeds. The public key and, after
/// [`Key::generate`], every ladder position are cached on first use; each
/// cache is published only once fully built, so a shared `&Key` can be used
/// from several threads.
pub struct Key<'p> {
    secret_seed: [u8; SEED_SIZE],
    public_seed: [u8; SEED_SIZE],
    chains: OnceLock<ChainArena>,
    pk: OnceLock<PublicKey>,
    params: &'p Params,
}

impl<'p> Key<'p> {
    /// Create a key reading both seeds from `rng`
    pub fn new<R: SecureRandom + ?Sized>(params: &'p Params, rng: &mut R) -> Result<Self, WotsError> {
        let mut secret_seed = read_seed(rng, "secret")?;
        let public_seed = read_seed(rng, "public").map_err(|err| {
            secret_seed.zeroize();
            err
        })?;

        Ok(Self::with_seeds(params, secret_seed, public_seed))
    }

    /// Create a key from existing seeds. Both must be exactly `SEED_SIZE` bytes.
    pub fn from_seed(params: &'p Params, secret_seed: &[u8], public_seed: &[u8]) -> Result<Self, WotsError> {
        let secret = <[u8; SEED_SIZE]>::try_from(secret_seed).map_err(|_| WotsError::InvalidSeedLength {
            which: "secret",
            expected: SEED_SIZE,
            actual: secret_seed.len(),
        })?;
        let public = <[u8; SEED_SIZE]>::try_from(public_seed).map_err(|_| WotsError::InvalidSeedLength {
            which: "public",
            expected: SEED_SIZE,
            actual: public_seed.len(),
        })?;

        Ok(Self::with_seeds(params, secret, public))
    }

    fn with_seeds(params: &'p Params, secret_seed: [u8; SEED_SIZE], public_seed: [u8; SEED_SIZE]) -> Self {
        Key {
            secret_seed,
            public_seed,
            chains: OnceLock::new(),
            pk: OnceLock::new(),
            params,
        }
    }

    pub fn params(&self) -> &'p Params {
        self.params
    }

    pub fn public_seed(&self) -> &[u8; SEED_SIZE] {
        &self.public_seed
    }

    /// The public key if it was already computed, without computing it
    pub fn public_key(&self) -> Option<&PublicKey> {
        self.pk.get()
    }

    pub fn is_generated(&self) -> bool {
        self.chains.get().is_some()
    }

    /// Compute the public key without keeping any ladder positions.
    ///
    /// Memoized: later calls return the cached key.
    pub fn compute_pk(&self) -> PublicKey {
        if let Some(pk) = self.pk.get() {
            trace!("WOTS+ public key cache hit");
            return *pk;
        }

        *self.pk.get_or_init(|| {
            let sk = self.compute_sk();
            let ends = self.params.compute_ladders(&self.public_seed, &sk, Traversal::Full);
            compress(&self.public_seed, &ends, self.params.n())
        })
    }

    /// Compute and keep every ladder position so that signing becomes a
    /// table lookup. Also caches the public key. A no-op once done.
    pub fn generate(&self) {
        self.chains.get_or_init(|| {
            debug!(params = %self.params, "generating WOTS+ ladders");

            let sk = self.compute_sk();
            let mut arena = ChainArena::new(self.params);
            arena.row_mut(0).copy_from_slice(&sk);

            let ends = self.params.compute_ladders(&self.public_seed, &sk, Traversal::Record(&mut arena));
            let pk = compress(&self.public_seed, &ends, self.params.n());
            // Already set only if compute_pk ran first, with the same value
            let _ = self.pk.set(pk);
            arena
        });
    }

    /// Sign an arbitrary length message.
    ///
    /// Returns `encoding || public_seed || ladder values`. After
    /// [`Key::generate`] this only hashes the message and copies ladder
    /// positions; otherwise the ladders are walked from the secret key.
    pub fn sign(&self, msg: &[u8]) -> Vec<u8> {
        let ladders = match self.chains.get() {
            Some(arena) => self.fast_sign(arena, msg),
            None => {
                let sk = self.compute_sk();
                self.params.compute_ladders(&self.public_seed, &sk, Traversal::Sign(msg))
            }
        };

        self.build_signature(&ladders)
    }

    fn fast_sign(&self, arena: &ChainArena, msg: &[u8]) -> Vec<u8> {
        let n = self.params.n();
        let digits = self.params.msg_hash_and_checksum(msg);

        let mut ladders = vec![0u8; self.params.total_ladders() * n];
        for (i, (out, &digit)) in ladders.chunks_exact_mut(n).zip(&digits).enumerate() {
            out.copy_from_slice(arena.element(usize::from(digit), i));
        }
        ladders
    }

    /// SK_i = PRF(secret_seed, i) truncated to n bytes
    fn compute_sk(&self) -> Zeroizing<Vec<u8>> {
        let n = self.params.n();
        let mut hash = self.params.prf_hash().new();
        let mut buf = Zeroizing::new(vec![0u8; hash.output_size()]);
        let mut sks = Zeroizing::new(vec![0u8; self.params.total_ladders() * n]);

        for (i, sk) in sks.chunks_exact_mut(n).enumerate() {
            prf(hash.as_mut(), &self.secret_seed, i as u8, &mut buf);
            sk.copy_from_slice(&buf[..n]);
        }
        sks
    }

    fn build_signature(&self, ladders: &[u8]) -> Vec<u8> {
        let encoding = ParamsEncoding::from_params(self.params).map_or(PARAMS_ENCODING_LEN, |e| e as u8);

        let mut signature = Vec::with_capacity(1 + SEED_SIZE + ladders.len());
        signature.push(encoding);
        signature.extend_from_slice(&self.public_seed);
        signature.extend_from_slice(ladders);
        signature
    }
}

fn read_seed<R: SecureRandom + ?Sized>(rng: &mut R, which: &'static str) -> Result<[u8; SEED_SIZE], WotsError> {
    let mut seed = [0u8; SEED_SIZE];
    let read = match rng.read_bytes(&mut seed) {
        Ok(read) => read,
        Err(err) => {
            seed.zeroize();
            return Err(err.into());
        }
    };
    if read != SEED_SIZE {
        seed.zeroize();
        return Err(WotsError::ShortRead {
            which,
            expected: SEED_SIZE,
            actual: read,
        });
    }
    Ok(seed)
}

impl Drop for Key<'_> {
    fn drop(&mut self) {
        self.secret_seed.zeroize();
    }
}

impl fmt::Debug for Key<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("params", self.params)
            .field("public_seed", &self.public_seed)
            .field("generated", &self.is_generated())
            .field("pk", &self.pk.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash::HashType;
    use crate::crypto::random::{OsSecureRandom, RandomError};
    use crate::wots::params::{PK_SIZE, W};

    const TEST_DATA: &[u8] = b"XX NETWORK";

    // Digits of "XX NETWORK" under SHA3_256 and truncated SHA3_224, checksum included
    const TEST_VECTOR_256: [u8; 34] = [
        38, 127, 249, 206, 220, 112, 171, 226, 191, 50, 63, 220, 72, 3, 189, 209, 251, 182, 0, 86, 98,
        113, 43, 174, 7, 95, 115, 145, 216, 128, 64, 1, 16, 0,
    ];
    const TEST_VECTOR_192: [u8; 26] = [
        82, 8, 4, 8, 108, 101, 58, 230, 192, 187, 159, 234, 252, 38, 125, 184, 97, 60, 179, 51, 224,
        146, 175, 237, 11, 165,
    ];

    struct ErrReader {
        ok_reads: usize,
    }

    impl SecureRandom for ErrReader {
        fn read_bytes(&mut self, dest: &mut [u8]) -> Result<usize, RandomError> {
            if self.ok_reads == 0 {
                return Err(RandomError::Source("TEST".to_string()));
            }
            self.ok_reads -= 1;
            dest.fill(0x11);
            Ok(dest.len())
        }
    }

    fn blake3_params() -> Params {
        Params::new(32, 32, HashType::Blake3_256, HashType::Blake3_256).unwrap()
    }

    #[test]
    fn test_new_key_reports_failing_reads() {
        let params = blake3_params();

        assert!(Key::new(&params, &mut OsSecureRandom::new()).is_ok());
        assert!(matches!(Key::new(&params, &mut ErrReader { ok_reads: 0 }), Err(WotsError::Entropy(_))));
        assert!(matches!(Key::new(&params, &mut ErrReader { ok_reads: 1 }), Err(WotsError::Entropy(_))));
    }

    #[test]
    fn test_compute_pk_is_memoized() {
        let params = blake3_params();
        let mut key = Key::new(&params, &mut OsSecureRandom::new()).unwrap();

        assert!(key.public_key().is_none());
        let pk = key.compute_pk();
        assert_eq!(pk.len(), PK_SIZE);
        assert_eq!(key.public_key(), Some(&pk));

        // A different seed would give a different key; the cache must win
        key.secret_seed.copy_from_slice(&[0x42u8; SEED_SIZE]);
        assert_eq!(key.compute_pk(), pk);
    }

    #[test]
    fn test_generate_is_idempotent() {
        let params = blake3_params();
        let mut key = Key::new(&params, &mut OsSecureRandom::new()).unwrap();

        key.generate();
        assert!(key.is_generated());
        let pk = *key.public_key().expect("generate caches the public key");

        key.secret_seed.copy_from_slice(&[0x42u8; SEED_SIZE]);
        key.generate();
        assert_eq!(key.public_key(), Some(&pk));
        assert_eq!(key.compute_pk(), pk);
    }

    #[test]
    fn test_generate_after_compute_pk_agrees() {
        let params = blake3_params();
        let key = Key::from_seed(&params, &[1u8; 32], &[2u8; 32]).unwrap();

        let pk = key.compute_pk();
        key.generate();
        assert_eq!(key.public_key(), Some(&pk));
    }

    #[test]
    fn test_chains_start_at_secret_key() {
        let params = blake3_params();
        let key = Key::from_seed(&params, &[7u8; 32], &[8u8; 32]).unwrap();
        key.generate();

        let arena = key.chains.get().unwrap();
        assert_eq!(arena.row(0), &key.compute_sk()[..]);

        let ends = params.compute_ladders(&key.public_seed, &key.compute_sk(), Traversal::Full);
        assert_eq!(arena.row(W - 1), &ends[..]);
    }

    fn check_test_vector(params: &Params) {
        let key = Key::new(params, &mut OsSecureRandom::new()).unwrap();
        key.generate();
        let sig = key.sign(TEST_DATA);

        let encoding = ParamsEncoding::from_params(params).unwrap();
        assert_eq!(sig[0], encoding as u8);
        assert_eq!(&sig[1..1 + SEED_SIZE], &key.public_seed[..]);

        let compare: &[u8] = match params.m() {
            32 => &TEST_VECTOR_256,
            24 => &TEST_VECTOR_192,
            m => panic!("No test vector available for m={}", m),
        };

        let n = params.n();
        let arena = key.chains.get().unwrap();
        for (i, ladder) in sig[1 + SEED_SIZE..].chunks_exact(n).enumerate() {
            assert_eq!(ladder, arena.element(usize::from(compare[i]), i), "ladder {}", i);
        }

        assert_eq!(params.decode(TEST_DATA, &sig[1..]).unwrap(), key.compute_pk());
    }

    #[test]
    fn test_sign_matches_test_vectors() {
        for encoding in ParamsEncoding::ALL {
            check_test_vector(encoding.params());
        }
    }

    #[test]
    fn test_debug_hides_secret_seed() {
        let params = blake3_params();
        let key = Key::from_seed(&params, &[0xeeu8; 32], &[0x01u8; 32]).unwrap();
        let dbg = format!("{:?}", key);

        assert!(dbg.contains("public_seed"));
        assert!(!dbg.contains("secret_seed"));
        assert!(!dbg.contains("238"));
    }
}
