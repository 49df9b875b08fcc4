// Winternitz One-Time Signature Plus (WOTS+) with W = 256

pub mod error;
mod key;
mod ladder;
pub mod params;
pub mod primitives;
pub mod security;

pub use self::error::WotsError;
pub use self::key::Key;
pub use self::params::{Params, PublicKey, MAX_MSG_SIZE, PK_HASH, PK_SIZE, SEED_SIZE, W};
pub use self::security::{
    decode_signature, decode_transaction_signature, verify_transaction_signature, ParamsEncoding,
    DEFAULT_PARAMS, PARAMS_ENCODING_LEN,
};
