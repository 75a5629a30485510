#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! BLAKE3 content fingerprints for sheetcheck
//!
//! A fingerprint identifies document content independently of its file name
//! or metadata: two byte-identical documents always share one fingerprint.

use blake3::Hasher;
use serde::{Deserialize, Serialize};
use sheetcheck_errors::{DocumentError, Error, VersionError};
use std::fmt;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Size of chunks for streaming hash computation
const CHUNK_SIZE: usize = 64 * 1024; // 64KB

/// Length of the hex form of a fingerprint
pub const FINGERPRINT_HEX_LEN: usize = 64;

/// A BLAKE3 digest of a document's full byte content
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint {
    bytes: [u8; 32],
}

impl Fingerprint {
    /// Create a fingerprint from raw bytes
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Get the raw bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Convert to hex string
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// First eight hex characters, for log lines
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.bytes[..4])
    }

    /// Parse from hex string
    ///
    /// # Errors
    /// Returns an error if the input string is not valid hexadecimal or is not exactly 64 characters (32 bytes).
    pub fn from_hex(s: &str) -> Result<Self, Error> {
        let bytes = hex::decode(s).map_err(|e| VersionError::InvalidFingerprint {
            message: format!("invalid hex: {e}"),
        })?;

        if bytes.len() != 32 {
            return Err(VersionError::InvalidFingerprint {
                message: format!("fingerprint must be 32 bytes, got {}", bytes.len()),
            }
            .into());
        }

        let mut array = [0u8; 32];
        array.copy_from_slice(&bytes);
        Ok(Self::from_bytes(array))
    }

    /// Compute the fingerprint of a byte slice
    #[must_use]
    pub fn from_data(data: &[u8]) -> Self {
        let hash = blake3::hash(data);
        Self::from_bytes(*hash.as_bytes())
    }

    /// Compute the fingerprint of a file, streaming its content
    ///
    /// # Errors
    /// Returns a document error if the file cannot be opened and a version
    /// error if reading fails part-way through.
    pub async fn hash_file(path: &Path) -> Result<Self, Error> {
        let mut file = File::open(path)
            .await
            .map_err(|e| DocumentError::from_io_with_path(&e, path))?;

        let mut hasher = Hasher::new();
        let mut buffer = vec![0; CHUNK_SIZE];

        loop {
            let n = file
                .read(&mut buffer)
                .await
                .map_err(|e| VersionError::FingerprintFailed {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }

        Ok(Self::from_bytes(*hasher.finalize().as_bytes()))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::str::FromStr for Fingerprint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Fingerprint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Verify a file matches an expected fingerprint
///
/// # Errors
/// Returns an error if the file cannot be read or hashed.
pub async fn verify_file(path: &Path, expected: &Fingerprint) -> Result<bool, Error> {
    let actual = Fingerprint::hash_file(path).await?;
    Ok(actual == *expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_fingerprint_basics() {
        let fingerprint = Fingerprint::from_data(b"hello world");

        // Known BLAKE3 hash of "hello world"
        let expected = "d74981efa70a0c880b8d8c1985d075dbcbf679b99a5f9914e5aaf96b831a9e24";
        assert_eq!(fingerprint.to_hex(), expected);
        assert_eq!(fingerprint.to_hex().len(), FINGERPRINT_HEX_LEN);
        assert_eq!(fingerprint.short(), "d74981ef");
    }

    #[test]
    fn test_fingerprint_serialization() {
        let fingerprint = Fingerprint::from_data(b"test");
        let json = serde_json::to_string(&fingerprint).unwrap();
        let deserialized: Fingerprint = serde_json::from_str(&json).unwrap();
        assert_eq!(fingerprint, deserialized);
    }

    #[tokio::test]
    async fn test_hash_file_matches_in_memory_digest() {
        use std::io::Write;
        let mut temp = NamedTempFile::new().unwrap();
        let data = vec![7u8; CHUNK_SIZE * 2 + 17];
        temp.write_all(&data).unwrap();

        let fingerprint = Fingerprint::hash_file(temp.path()).await.unwrap();
        assert_eq!(fingerprint, Fingerprint::from_data(&data));
    }

    #[tokio::test]
    async fn test_hash_missing_file_is_document_error() {
        let err = Fingerprint::hash_file(Path::new("/definitely/not/here.xlsx"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Document(DocumentError::NotFound { .. })
        ));
    }
}
