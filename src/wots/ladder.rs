// Ladder traversal shared by key generation, signing and decoding

use zeroize::Zeroize;

use crate::wots::params::{Params, PublicKey, PK_HASH, PK_SIZE, W};
use crate::wots::primitives::{chain, checksum, compute_rands, parity};

/// Every position of every ladder, `W` rows of `total * n` bytes.
///
/// Row 0 holds the secret key elements and row `W - 1` the ladder ends.
pub(crate) struct ChainArena {
    n: usize,
    total: usize,
    data: Vec<u8>,
}

impl ChainArena {
    pub(crate) fn new(params: &Params) -> Self {
        let n = params.n();
        let total = params.total_ladders();
        ChainArena {
            n,
            total,
            data: vec![0u8; W * total * n],
        }
    }

    fn offset(&self, depth: usize, ladder: usize) -> usize {
        (depth * self.total + ladder) * self.n
    }

    pub(crate) fn element(&self, depth: usize, ladder: usize) -> &[u8] {
        let start = self.offset(depth, ladder);
        &self.data[start..start + self.n]
    }

    pub(crate) fn element_mut(&mut self, depth: usize, ladder: usize) -> &mut [u8] {
        let start = self.offset(depth, ladder);
        &mut self.data[start..start + self.n]
    }

    #[cfg(test)]
    pub(crate) fn row(&self, depth: usize) -> &[u8] {
        let start = self.offset(depth, 0);
        &self.data[start..start + self.total * self.n]
    }

    pub(crate) fn row_mut(&mut self, depth: usize) -> &mut [u8] {
        let start = self.offset(depth, 0);
        let len = self.total * self.n;
        &mut self.data[start..start + len]
    }
}

impl Drop for ChainArena {
    fn drop(&mut self) {
        self.data.zeroize();
    }
}

/// How far to walk each ladder, and what to keep along the way
pub(crate) enum Traversal<'a> {
    /// Every ladder from 0 to `W - 1`
    Full,
    /// Like `Full`, storing every position into the arena (row 0 is the caller's)
    Record(&'a mut ChainArena),
    /// From 0 up to the digit of the message
    Sign(&'a [u8]),
    /// From the digit of the message up to `W - 1`
    Decode(&'a [u8]),
}

impl Params {
    /// Hash the message down to `m` bytes and append its checksum.
    ///
    /// The result has one digit per ladder.
    pub(crate) fn msg_hash_and_checksum(&self, msg: &[u8]) -> Vec<u8> {
        let mut hash = self.msg_hash().new();
        let mut digits = vec![0u8; hash.output_size()];
        hash.update(msg);
        hash.finalize_reset(&mut digits);
        digits.truncate(self.m());

        let check = checksum(&digits);
        digits.extend_from_slice(&check);
        digits
    }

    /// Walk every ladder starting at `points` and return where each one stops.
    ///
    /// `points` holds one `n` byte value per ladder: the secret key elements,
    /// or the ladder values of a signature when decoding.
    pub(crate) fn compute_ladders(&self, pub_seed: &[u8], points: &[u8], mode: Traversal<'_>) -> Vec<u8> {
        let n = self.n();
        let (digits, signing, mut arena) = match mode {
            Traversal::Full => (None, false, None),
            Traversal::Record(arena) => (None, false, Some(arena)),
            Traversal::Sign(msg) => (Some(self.msg_hash_and_checksum(msg)), true, None),
            Traversal::Decode(msg) => (Some(self.msg_hash_and_checksum(msg)), false, None),
        };

        let mut hash = self.prf_hash().new();
        let mut buf = vec![0u8; hash.output_size()];
        let rands = compute_rands(n, pub_seed, hash.as_mut());

        let mut value = vec![0u8; n];
        let mut outputs = vec![0u8; self.total_ladders() * n];

        for (i, (start, output)) in points.chunks_exact(n).zip(outputs.chunks_exact_mut(n)).enumerate() {
            value.copy_from_slice(start);

            let digit = digits.as_ref().map_or(0, |d| usize::from(d[i]));
            let (begin, end) = if signing { (0, digit) } else { (digit, W - 1) };

            for j in begin..end {
                let mask = &rands[j * n..(j + 1) * n];
                value.iter_mut().zip(mask).for_each(|(v, r)| *v ^= r);

                chain(hash.as_mut(), pub_seed, (j + 1) as u8, &value, &mut buf);
                value.copy_from_slice(&buf[..n]);

                if let Some(arena) = arena.as_deref_mut() {
                    arena.element_mut(j + 1, i).copy_from_slice(&value);
                }
            }

            output.copy_from_slice(&value);
        }

        value.zeroize();
        buf.zeroize();
        outputs
    }
}

/// Compress the ladder ends into a public key.
///
/// Ends with odd parity feed a tweak hash `T`, then
/// `PK = H(pub_seed || T || ends)`.
pub(crate) fn compress(pub_seed: &[u8], ends: &[u8], n: usize) -> PublicKey {
    let mut hash = PK_HASH.new();
    let mut tweak = [0u8; PK_SIZE];

    for value in ends.chunks_exact(n).filter(|value| parity(value)) {
        hash.update(value);
    }
    hash.finalize_reset(&mut tweak);

    let mut pk = [0u8; PK_SIZE];
    hash.update(pub_seed);
    hash.update(&tweak);
    hash.update(ends);
    hash.finalize_reset(&mut pk);
    pk
}
