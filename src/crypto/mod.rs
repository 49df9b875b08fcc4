pub mod hash;
pub mod random;

pub use self::hash::{HashFunction, HashType};
pub use self::random::{DeterministicRng, OsSecureRandom, RandomError, RngSource, SecureRandom};
