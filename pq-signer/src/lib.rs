//! Operator tooling for hybrid post-quantum signatures
//!
//! Backs the `pq-signer` binary: key generation and keystores, detached
//! signing and verification, and inspection of tagged signatures and hybrid
//! transactions.
//!
//! ```text
//! ┌──────────────┐
//! │  pq-signer   │  ← CLI, config, output
//! └──────┬───────┘
//!        │
//!   ┌────┴─────┐
//!   ▼          ▼
//! hybrid-tx  pq-crypto
//! ```

pub mod commands;
pub mod config;
pub mod encoding;
pub mod error;
pub mod keystore;
pub mod output;

// Re-export commonly used types
pub use config::SignerConfig;
pub use encoding::Encoding;
pub use error::{Result, SignerError};
pub use keystore::Keystore;
pub use output::OutputFormat;
