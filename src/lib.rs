pub mod crypto;
pub mod wots;

pub use crate::crypto::{HashType, OsSecureRandom, SecureRandom};
pub use crate::wots::{Key, Params, ParamsEncoding, PublicKey, WotsError};
