//! Content identifiers.
//!
//! CIDv1 over the raw codec with a SHA2-256 multihash, written in base32
//! (`bafkrei…`). The identifier is a pure function of the bytes.

use cid::Cid;
use multihash_codetable::{Code, MultihashDigest};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Multicodec for raw binary content.
pub const RAW_CODEC: u64 = 0x55;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentId(Cid);

impl ContentId {
    pub fn for_bytes(bytes: &[u8]) -> Self {
        Self(Cid::new_v1(RAW_CODEC, Code::Sha2_256.digest(bytes)))
    }

    /// Whether `bytes` hash to this identifier.
    pub fn matches(&self, bytes: &[u8]) -> bool {
        *self == Self::for_bytes(bytes)
    }

    pub fn as_cid(&self) -> &Cid {
        &self.0
    }

    /// SHA2-256 digest as lowercase hex.
    pub fn digest_hex(&self) -> String {
        hex::encode(self.0.hash().digest())
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContentId {
    type Err = cid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cid::from_str(s.trim()).map(Self)
    }
}

impl Serialize for ContentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ContentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
