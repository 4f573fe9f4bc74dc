//! crypto
//! Password based key derivation, AES-256 CFB and the modification
//! detection code.

pub mod types;
pub mod kdf;
pub mod cfb;
pub mod digest;

pub use types::*;
pub use kdf::*;
pub use cfb::*;
pub use digest::*;
