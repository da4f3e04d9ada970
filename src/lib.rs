//! # Seal-KEM: Hybrid Classical + Post-Quantum Key Encapsulation
//!
//! `seal-kem` establishes one 32-byte session key between two parties by running a
//! classical KEM (RSA-OAEP) and a post-quantum KEM (Kyber) side by side and merging
//! their shared secrets with HKDF-SHA256. The key stays secret as long as either
//! assumption holds.
//!
//! ## Core Concepts
//!
//! - **`KeyEncapsulationMechanism`**: the trait both component schemes implement.
//! - **`KeyCombiner`**: merges the two 32-byte secrets, classical first, into a `HybridKey`.
//! - **`HybridProtocol`**: drives both roles. Keygen and encapsulation failures abort
//!   the session; decapsulation failures are absorbed by implicit rejection.
//! - **Key confirmation**: `HybridKey::confirmation_tag` lets the parties detect a
//!   mismatched key without comparing secrets.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use seal_kem::{CryptoConfig, RsaKyberProtocol};
//!
//! fn main() -> seal_kem::Result<()> {
//!     let protocol = RsaKyberProtocol::new(CryptoConfig::default())?;
//!
//!     // 响应方
//!     let (public, secrets) = protocol.init_responder()?;
//!     // 发起方
//!     let (ciphertexts, initiator_key) = protocol.initiator_encapsulate(&public)?;
//!     // 响应方
//!     let responder_key = protocol.responder_decapsulate(secrets, &ciphertexts)?;
//!
//!     assert_eq!(initiator_key, responder_key);
//!     Ok(())
//! }
//! ```

pub mod asymmetric;
pub mod combiner;
pub mod common;
pub mod protocol;

pub use crate::combiner::{HYBRID_KEY_LEN, HybridKey, KeyCombiner};
pub use crate::common::{CryptoConfig, Error, ErrorKind, Result};
pub use crate::protocol::{
    CiphertextBundle, ConfirmationTag, HybridProtocol, InitiatorSession, PublicBundle,
    ResponderSecrets, ResponderSession, Role, SessionState,
};

#[cfg(all(feature = "traditional", feature = "post-quantum"))]
pub use crate::asymmetric::systems::hybrid::RsaKyberProtocol;

/// The version of the `seal-kem` crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
