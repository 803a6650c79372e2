//! Algorithm type registry
//!
//! Every post-quantum signature carried on the wire starts with a one-byte
//! tag naming the algorithm that produced it. The table below is the single
//! source of truth for tags and sizes:
//!
//! | Algorithm | Tag | Public Key | Signature | NIST Level |
//! |-----------|-----|------------|-----------|------------|
//! | Dilithium2 | `0x01` | 1,312 bytes | 2,420 bytes | 2 |
//! | Dilithium3 | `0x02` | 1,952 bytes | 3,309 bytes | 3 |
//! | Dilithium5 | `0x03` | 2,592 bytes | 4,627 bytes | 5 |
//! | Falcon-512 | `0x04` | 896 bytes | ≤ 690 bytes | 1 |
//! | Falcon-1024 | `0x05` | 1,792 bytes | ≤ 1,330 bytes | 5 |
//!
//! Tags are never reused or renumbered. New algorithms get new tags.

use crate::error::{PqcError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Post-quantum signature algorithm identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AlgorithmId {
    Dilithium2,
    Dilithium3,
    Dilithium5,
    Falcon512,
    Falcon1024,
}

/// Signature family sharing one engine implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlgorithmFamily {
    Dilithium,
    Falcon,
}

impl AlgorithmFamily {
    /// Whether secret keys of this family can leave the process as raw bytes
    pub fn supports_secret_export(self) -> bool {
        matches!(self, AlgorithmFamily::Dilithium)
    }
}

/// Expected signature length policy
///
/// Dilithium signatures have a fixed length; Falcon signatures are
/// compressed and only bounded from above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignatureSize {
    Exact(usize),
    UpTo(usize),
}

impl SignatureSize {
    /// Whether a signature of `len` bytes satisfies this policy
    pub fn admits(&self, len: usize) -> bool {
        match *self {
            SignatureSize::Exact(n) => len == n,
            SignatureSize::UpTo(n) => len <= n,
        }
    }

    /// Largest admitted length
    pub fn max(&self) -> usize {
        match *self {
            SignatureSize::Exact(n) | SignatureSize::UpTo(n) => n,
        }
    }
}

impl fmt::Display for SignatureSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureSize::Exact(n) => write!(f, "{} bytes", n),
            SignatureSize::UpTo(n) => write!(f, "<= {} bytes", n),
        }
    }
}

impl AlgorithmId {
    /// All algorithms in tag order
    pub const ALL: [AlgorithmId; 5] = [
        AlgorithmId::Dilithium2,
        AlgorithmId::Dilithium3,
        AlgorithmId::Dilithium5,
        AlgorithmId::Falcon512,
        AlgorithmId::Falcon1024,
    ];

    /// Wire tag (first byte of an encoded signature)
    pub const fn tag(self) -> u8 {
        match self {
            AlgorithmId::Dilithium2 => 0x01,
            AlgorithmId::Dilithium3 => 0x02,
            AlgorithmId::Dilithium5 => 0x03,
            AlgorithmId::Falcon512 => 0x04,
            AlgorithmId::Falcon1024 => 0x05,
        }
    }

    /// Resolve a wire tag
    ///
    /// # Errors
    /// - Returns `UnknownAlgorithm` if no algorithm carries `tag`
    pub fn from_tag(tag: u8) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.tag() == tag)
            .ok_or(PqcError::UnknownAlgorithm(tag))
    }

    pub const fn public_key_size(self) -> usize {
        match self {
            AlgorithmId::Dilithium2 => 1312,
            AlgorithmId::Dilithium3 => 1952,
            AlgorithmId::Dilithium5 => 2592,
            AlgorithmId::Falcon512 => 896,
            AlgorithmId::Falcon1024 => 1792,
        }
    }

    pub const fn signature_size(self) -> SignatureSize {
        match self {
            AlgorithmId::Dilithium2 => SignatureSize::Exact(2420),
            AlgorithmId::Dilithium3 => SignatureSize::Exact(3309),
            AlgorithmId::Dilithium5 => SignatureSize::Exact(4627),
            AlgorithmId::Falcon512 => SignatureSize::UpTo(690),
            AlgorithmId::Falcon1024 => SignatureSize::UpTo(1330),
        }
    }

    pub fn max_signature_size(self) -> usize {
        self.signature_size().max()
    }

    pub const fn nist_level(self) -> u8 {
        match self {
            AlgorithmId::Dilithium2 => 2,
            AlgorithmId::Dilithium3 => 3,
            AlgorithmId::Dilithium5 => 5,
            AlgorithmId::Falcon512 => 1,
            AlgorithmId::Falcon1024 => 5,
        }
    }

    pub const fn family(self) -> AlgorithmFamily {
        match self {
            AlgorithmId::Dilithium2 | AlgorithmId::Dilithium3 | AlgorithmId::Dilithium5 => {
                AlgorithmFamily::Dilithium
            }
            AlgorithmId::Falcon512 | AlgorithmId::Falcon1024 => AlgorithmFamily::Falcon,
        }
    }

    /// Canonical upper-case name, as used in configuration and JSON
    pub const fn name(self) -> &'static str {
        match self {
            AlgorithmId::Dilithium2 => "DILITHIUM2",
            AlgorithmId::Dilithium3 => "DILITHIUM3",
            AlgorithmId::Dilithium5 => "DILITHIUM5",
            AlgorithmId::Falcon512 => "FALCON512",
            AlgorithmId::Falcon1024 => "FALCON1024",
        }
    }

    /// Return algorithm information
    pub fn info(self) -> AlgorithmInfo {
        AlgorithmInfo {
            name: self.name(),
            tag: self.tag(),
            nist_level: self.nist_level(),
            public_key_size: self.public_key_size(),
            signature_size: self.signature_size(),
        }
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AlgorithmId {
    type Err = PqcError;

    /// Case-insensitive, ignores `-` and `_` (`falcon-512`, `Dilithium_3`)
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_uppercase();

        Self::ALL
            .into_iter()
            .find(|id| id.name() == normalized)
            .ok_or_else(|| PqcError::UnknownAlgorithmName(s.to_string()))
    }
}

impl TryFrom<String> for AlgorithmId {
    type Error = PqcError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<AlgorithmId> for String {
    fn from(id: AlgorithmId) -> Self {
        id.name().to_string()
    }
}

/// Algorithm information structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlgorithmInfo {
    /// Algorithm name
    pub name: &'static str,
    /// Wire tag
    pub tag: u8,
    /// NIST security level
    pub nist_level: u8,
    /// Public key size (bytes)
    pub public_key_size: usize,
    /// Signature size policy
    pub signature_size: SignatureSize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tags_are_unique_and_stable() {
        let tags: HashSet<u8> = AlgorithmId::ALL.iter().map(|id| id.tag()).collect();
        assert_eq!(tags.len(), AlgorithmId::ALL.len());

        assert_eq!(AlgorithmId::Dilithium2.tag(), 0x01);
        assert_eq!(AlgorithmId::Dilithium3.tag(), 0x02);
        assert_eq!(AlgorithmId::Dilithium5.tag(), 0x03);
        assert_eq!(AlgorithmId::Falcon512.tag(), 0x04);
        assert_eq!(AlgorithmId::Falcon1024.tag(), 0x05);
    }

    #[test]
    fn test_from_tag() {
        for id in AlgorithmId::ALL {
            assert_eq!(AlgorithmId::from_tag(id.tag()).unwrap(), id);
        }

        for tag in [0x00, 0x06, 0x7f, 0xff] {
            match AlgorithmId::from_tag(tag) {
                Err(PqcError::UnknownAlgorithm(t)) => assert_eq!(t, tag),
                other => panic!("Expected UnknownAlgorithm, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_size_table() {
        assert_eq!(AlgorithmId::Dilithium2.public_key_size(), 1312);
        assert_eq!(AlgorithmId::Dilithium3.public_key_size(), 1952);
        assert_eq!(AlgorithmId::Dilithium5.public_key_size(), 2592);
        assert_eq!(AlgorithmId::Falcon512.public_key_size(), 896);
        assert_eq!(AlgorithmId::Falcon1024.public_key_size(), 1792);

        assert_eq!(AlgorithmId::Dilithium2.signature_size(), SignatureSize::Exact(2420));
        assert_eq!(AlgorithmId::Dilithium3.signature_size(), SignatureSize::Exact(3309));
        assert_eq!(AlgorithmId::Dilithium5.signature_size(), SignatureSize::Exact(4627));
        assert_eq!(AlgorithmId::Falcon512.signature_size(), SignatureSize::UpTo(690));
        assert_eq!(AlgorithmId::Falcon1024.signature_size(), SignatureSize::UpTo(1330));
    }

    #[test]
    fn test_signature_size_policy() {
        let exact = SignatureSize::Exact(2420);
        assert!(exact.admits(2420));
        assert!(!exact.admits(2419));
        assert!(!exact.admits(2421));

        let bounded = SignatureSize::UpTo(690);
        assert!(bounded.admits(690));
        assert!(bounded.admits(655));
        assert!(!bounded.admits(691));
        assert_eq!(bounded.max(), 690);
    }

    #[test]
    fn test_families() {
        assert_eq!(AlgorithmId::Dilithium3.family(), AlgorithmFamily::Dilithium);
        assert_eq!(AlgorithmId::Falcon1024.family(), AlgorithmFamily::Falcon);

        assert!(AlgorithmFamily::Dilithium.supports_secret_export());
        assert!(!AlgorithmFamily::Falcon.supports_secret_export());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("DILITHIUM3".parse::<AlgorithmId>().unwrap(), AlgorithmId::Dilithium3);
        assert_eq!("dilithium_5".parse::<AlgorithmId>().unwrap(), AlgorithmId::Dilithium5);
        assert_eq!("Falcon-512".parse::<AlgorithmId>().unwrap(), AlgorithmId::Falcon512);
        assert_eq!("falcon1024".parse::<AlgorithmId>().unwrap(), AlgorithmId::Falcon1024);
        assert!(matches!(
            "sphincs".parse::<AlgorithmId>(),
            Err(PqcError::UnknownAlgorithmName(_))
        ));

        for id in AlgorithmId::ALL {
            assert_eq!(id.to_string().parse::<AlgorithmId>().unwrap(), id);
        }
    }

    #[test]
    fn test_serde_by_name() {
        let json = serde_json::to_string(&AlgorithmId::Falcon512).unwrap();
        assert_eq!(json, "\"FALCON512\"");

        let parsed: AlgorithmId = serde_json::from_str("\"dilithium-5\"").unwrap();
        assert_eq!(parsed, AlgorithmId::Dilithium5);

        assert!(serde_json::from_str::<AlgorithmId>("\"RSA\"").is_err());
    }

    #[test]
    fn test_algorithm_info() {
        let info = AlgorithmId::Dilithium3.info();

        assert_eq!(info.name, "DILITHIUM3");
        assert_eq!(info.tag, 0x02);
        assert_eq!(info.nist_level, 3);
        assert_eq!(info.public_key_size, 1952);
        assert_eq!(info.signature_size, SignatureSize::Exact(3309));
    }
}
