// Hash primitives shared by key generation, signing and decoding

use crate::crypto::hash::HashFunction;
use crate::wots::params::W;

/// `out = H(seed || index)`
///
/// The hasher is reset first, so a shared instance never carries state
/// between calls. `out` must be exactly the hasher's output size.
pub fn prf(hash: &mut dyn HashFunction, seed: &[u8], index: u8, out: &mut [u8]) {
    hash.reset();
    hash.update(seed);
    hash.update(&[index]);
    hash.finalize_reset(out);
}

/// One step down a ladder: `out = H(pub_seed || depth || masked_value)`
pub fn chain(
    hash: &mut dyn HashFunction,
    pub_seed: &[u8],
    depth: u8,
    masked_value: &[u8],
    out: &mut [u8],
) {
    hash.reset();
    hash.update(pub_seed);
    hash.update(&[depth]);
    hash.update(masked_value);
    hash.finalize_reset(out);
}

/// Derive the `W - 1` masking elements, one per non-terminal depth.
///
/// Element `i` is `prf(pub_seed, i + 1)` truncated to `n` bytes; the result
/// is laid out flat, element `i` at `[i * n, (i + 1) * n)`.
pub fn compute_rands(n: usize, pub_seed: &[u8], hash: &mut dyn HashFunction) -> Vec<u8> {
    let mut buf = vec![0u8; hash.output_size()];
    let mut rands = vec![0u8; (W - 1) * n];

    for (i, rand) in rands.chunks_exact_mut(n).enumerate() {
        prf(hash, pub_seed, (i + 1) as u8, &mut buf);
        rand.copy_from_slice(&buf[..n]);
    }
    rands
}

/// Winternitz checksum: `(W - 1) * len - sum(bytes)`, big endian.
///
/// One byte when the digest is a single byte, two bytes otherwise.
pub fn checksum(digest: &[u8]) -> Vec<u8> {
    let max = (W as u32 - 1) * digest.len() as u32;
    let sum = max - digest.iter().map(|&b| u32::from(b)).sum::<u32>();

    if digest.len() == 1 {
        return vec![sum as u8];
    }
    (sum as u16).to_be_bytes().to_vec()
}

/// True iff the total number of set bits in `value` is odd
pub fn parity(value: &[u8]) -> bool {
    value.iter().fold(0u32, |acc, b| acc ^ b.count_ones()) & 1 == 1
}
