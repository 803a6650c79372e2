//! Byte argument encodings
//!
//! Every byte-valued argument (keys, signatures, transactions) is text in the
//! selected encoding, or `@path` to read that text from a file.

use crate::error::{Result, SignerError};
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    #[default]
    Hex,
    Base64,
}

impl Encoding {
    pub fn encode(self, bytes: &[u8]) -> String {
        match self {
            Encoding::Hex => hex::encode(bytes),
            Encoding::Base64 => general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Decode text; hex accepts an optional `0x` prefix
    pub fn decode(self, text: &str) -> Result<Vec<u8>> {
        let text = text.trim();
        match self {
            Encoding::Hex => {
                let digits = text
                    .strip_prefix("0x")
                    .or_else(|| text.strip_prefix("0X"))
                    .unwrap_or(text);
                hex::decode(digits)
                    .map_err(|e| SignerError::Encoding(format!("Invalid hex input: {}", e)))
            }
            Encoding::Base64 => general_purpose::STANDARD
                .decode(text)
                .map_err(|e| SignerError::Encoding(format!("Invalid base64 input: {}", e))),
        }
    }

    /// Decode an argument, reading it from a file when given as `@path`
    pub fn decode_arg(self, arg: &str) -> Result<Vec<u8>> {
        match arg.strip_prefix('@') {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|e| {
                    SignerError::Encoding(format!("Failed to read {}: {}", path, e))
                })?;
                self.decode(&text)
            }
            None => self.decode(arg),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Encoding::Hex => "hex",
            Encoding::Base64 => "base64",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_hex_prefix_and_whitespace() {
        assert_eq!(Encoding::Hex.decode("0x0102ff").unwrap(), vec![0x01, 0x02, 0xff]);
        assert_eq!(Encoding::Hex.decode(" 0102ff\n").unwrap(), vec![0x01, 0x02, 0xff]);
        assert_eq!(Encoding::Hex.encode(&[0x01, 0x02, 0xff]), "0102ff");
    }

    #[test]
    fn test_base64() {
        let encoded = Encoding::Base64.encode(b"hybrid");
        assert_eq!(encoded, "aHlicmlk");
        assert_eq!(Encoding::Base64.decode(&encoded).unwrap(), b"hybrid");
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(Encoding::Hex.decode("0xzz"), Err(SignerError::Encoding(_))));
        assert!(matches!(Encoding::Hex.decode("abc"), Err(SignerError::Encoding(_))));
        assert!(matches!(Encoding::Base64.decode("!!!"), Err(SignerError::Encoding(_))));
    }

    #[test]
    fn test_decode_arg_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0xdeadbeef").unwrap();

        let arg = format!("@{}", file.path().display());
        assert_eq!(Encoding::Hex.decode_arg(&arg).unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);

        assert!(matches!(
            Encoding::Hex.decode_arg("@/nonexistent/pq-signer/input"),
            Err(SignerError::Encoding(_))
        ));
    }
}
