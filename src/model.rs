use crate::error::TallyError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MAX_DIGEST_LEN: usize = 32;

/// Binary commit digest. Holds either a SHA-1 (20 byte) or SHA-256 (32 byte) id.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommitId {
    bytes: [u8; MAX_DIGEST_LEN],
    len: u8,
}

impl CommitId {
    pub fn from_bytes(digest: &[u8]) -> Result<Self, TallyError> {
        if digest.is_empty() || digest.len() > MAX_DIGEST_LEN {
            return Err(TallyError::InvalidCommitId(format!(
                "digest length {} out of range",
                digest.len()
            )));
        }
        let mut bytes = [0u8; MAX_DIGEST_LEN];
        bytes[..digest.len()].copy_from_slice(digest);
        Ok(Self {
            bytes,
            len: digest.len() as u8,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    pub fn short(&self) -> String {
        self.to_string().chars().take(8).collect()
    }
}

impl FromStr for CommitId {
    type Err = TallyError;

    fn from_str(hex: &str) -> Result<Self, Self::Err> {
        if hex.len() % 2 != 0 || hex.len() > MAX_DIGEST_LEN * 2 || !hex.is_ascii() {
            return Err(TallyError::InvalidCommitId(hex.to_string()));
        }

        let mut digest = Vec::with_capacity(hex.len() / 2);
        for pair in hex.as_bytes().chunks(2) {
            // ascii was checked above so the pair is valid utf-8
            let pair = std::str::from_utf8(pair)
                .map_err(|_| TallyError::InvalidCommitId(hex.to_string()))?;
            let byte = u8::from_str_radix(pair, 16)
                .map_err(|_| TallyError::InvalidCommitId(hex.to_string()))?;
            digest.push(byte);
        }
        Self::from_bytes(&digest).map_err(|_| TallyError::InvalidCommitId(hex.to_string()))
    }
}

impl TryFrom<String> for CommitId {
    type Error = TallyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CommitId> for String {
    fn from(id: CommitId) -> Self {
        id.to_string()
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.as_bytes() {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommitId({})", self.short())
    }
}

/// Line delta a commit made to one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStats {
    pub path: String,
    pub added_lines: u32,
    pub deleted_lines: u32,
}

/// One commit record. Accepts the `commit_id` field name used by `gmap export`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    #[serde(alias = "commit_id")]
    pub id: CommitId,
    pub author_name: String,
    pub author_email: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub files: Vec<FileStats>,
}
