// Named WOTS+ security levels and signature dispatch

use std::fmt;

use subtle::ConstantTimeEq;
use tracing::debug;

use crate::crypto::hash::HashType;
use crate::wots::error::WotsError;
use crate::wots::params::{Params, PublicKey};

// Level0: classical 139.30, post quantum 80.
// Signature: 1 + 32 + 26 * 20 = 553 bytes.
static LEVEL0_PARAMS: Params = Params::from_parts(20, 24, HashType::Blake2b256, HashType::Sha3_224);

// Level1: classical 171.30, post quantum 96
static LEVEL1_PARAMS: Params = Params::from_parts(24, 24, HashType::Blake2b256, HashType::Sha3_224);

// Level2: classical 203.30, post quantum 112.
// The message hash only gives 96 bits post quantum, but signed messages are
// always structured, so chosen message attacks don't apply.
static LEVEL2_PARAMS: Params = Params::from_parts(28, 24, HashType::Blake2b256, HashType::Sha3_224);

// Level3: classical 235.30, post quantum 128
static LEVEL3_PARAMS: Params = Params::from_parts(32, 24, HashType::Blake2b256, HashType::Sha3_224);

// Consensus: classical 234.91, post quantum 128.
// Transactions signed with these are discarded; never use them for wallets.
static CONSENSUS_PARAMS: Params = Params::from_parts(32, 32, HashType::Blake2b256, HashType::Sha3_256);

/// One byte wire tag of a named parameter set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ParamsEncoding {
    Level0 = 0,
    Level1 = 1,
    Level2 = 2,
    Level3 = 3,
    Consensus = 4,
}

/// Number of named levels. Also the tag written for unnamed parameter sets,
/// which therefore never decode.
pub const PARAMS_ENCODING_LEN: u8 = 5;

pub const DEFAULT_PARAMS: ParamsEncoding = ParamsEncoding::Level0;

impl ParamsEncoding {
    pub const ALL: [ParamsEncoding; PARAMS_ENCODING_LEN as usize] = [
        ParamsEncoding::Level0,
        ParamsEncoding::Level1,
        ParamsEncoding::Level2,
        ParamsEncoding::Level3,
        ParamsEncoding::Consensus,
    ];

    pub fn params(self) -> &'static Params {
        match self {
            ParamsEncoding::Level0 => &LEVEL0_PARAMS,
            ParamsEncoding::Level1 => &LEVEL1_PARAMS,
            ParamsEncoding::Level2 => &LEVEL2_PARAMS,
            ParamsEncoding::Level3 => &LEVEL3_PARAMS,
            ParamsEncoding::Consensus => &CONSENSUS_PARAMS,
        }
    }

    /// Reverse lookup; `None` for parameter sets outside the catalogue
    pub fn from_params(params: &Params) -> Option<Self> {
        Self::ALL.into_iter().find(|encoding| encoding.params().equal(params))
    }
}

impl TryFrom<u8> for ParamsEncoding {
    type Error = WotsError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(WotsError::UnknownEncoding(value))
    }
}

impl fmt::Display for ParamsEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamsEncoding::Level0 => "Level0",
            ParamsEncoding::Level1 => "Level1",
            ParamsEncoding::Level2 => "Level2",
            ParamsEncoding::Level3 => "Level3",
            ParamsEncoding::Consensus => "Consensus",
        };
        f.write_str(name)
    }
}

/// Decode a full wire signature with whichever named level its first byte
/// selects, Consensus included.
pub fn decode_signature(msg: &[u8], signature: &[u8]) -> Result<PublicKey, WotsError> {
    let (&tag, body) = signature.split_first().ok_or(WotsError::EmptyInput)?;
    let encoding = ParamsEncoding::try_from(tag).map_err(|err| {
        debug!(tag, "rejecting signature with unknown parameter encoding");
        err
    })?;

    encoding.params().decode(msg, body)
}

/// Decode a transaction signature.
///
/// Same as [`decode_signature`], but empty inputs and the Consensus level
/// are refused.
pub fn decode_transaction_signature(msg: &[u8], signature: &[u8]) -> Result<PublicKey, WotsError> {
    if msg.is_empty() || signature.is_empty() {
        debug!(msg_len = msg.len(), sig_len = signature.len(), "rejecting empty transaction input");
        return Err(WotsError::EmptyInput);
    }
    if signature[0] == ParamsEncoding::Consensus as u8 {
        debug!("rejecting transaction signed with consensus parameters");
        return Err(WotsError::ConsensusNotAllowed);
    }

    decode_signature(msg, signature)
}

/// Check a transaction signature against the expected public key.
///
/// `Ok(false)` means the signature is well formed but was not produced by
/// that key. The comparison runs in constant time.
pub fn verify_transaction_signature(expected_pk: &[u8], msg: &[u8], signature: &[u8]) -> Result<bool, WotsError> {
    let pk = decode_transaction_signature(msg, signature)?;
    Ok(pk[..].ct_eq(expected_pk).into())
}
