//! ObjectId - the document store's native 12-byte key.
//!
//! Layout (big-endian):
//!
//! | bytes | meaning                                   |
//! |-------|-------------------------------------------|
//! | 0..4  | seconds since the Unix epoch              |
//! | 4..9  | random value, fixed for the process       |
//! | 9..12 | counter, randomly seeded, +1 per id       |
//!
//! On the wire an id travels as 24 lowercase hex digits. Parsing is strict:
//! anything that is not exactly 24 hex digits is rejected.
//!
//! ## Example
//!
//! ```
//! use product_service::ObjectId;
//!
//! let id = ObjectId::new();
//! let parsed = ObjectId::parse_str(&id.to_hex()).unwrap();
//! assert_eq!(id, parsed);
//! assert!(ObjectId::parse_str("not-an-id").is_err());
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const COUNTER_MASK: u32 = 0x00ff_ffff;

/// Number of hex digits in the text form of an id.
pub const HEX_LEN: usize = 24;

/// A 12-byte, globally unique, roughly creation-ordered document key.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId([u8; 12]);

/// Why a string could not be decoded into an [`ObjectId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectIdError {
    /// The input was not exactly 24 characters long.
    InvalidLength { length: usize },
    /// The input contained a character outside `[0-9a-fA-F]`.
    InvalidHexCharacter { c: char, index: usize },
}

impl fmt::Display for ObjectIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectIdError::InvalidLength { length } => write!(
                f,
                "invalid object id length {} (expected {} hex digits)",
                length, HEX_LEN
            ),
            ObjectIdError::InvalidHexCharacter { c, index } => {
                write!(f, "invalid hex character {:?} at position {}", c, index)
            }
        }
    }
}

impl std::error::Error for ObjectIdError {}

fn process_unique() -> &'static [u8; 5] {
    static UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
    UNIQUE.get_or_init(|| rand::thread_rng().gen())
}

fn next_counter() -> u32 {
    static COUNTER: OnceLock<AtomicU32> = OnceLock::new();
    let counter =
        COUNTER.get_or_init(|| AtomicU32::new(rand::thread_rng().gen_range(0..=COUNTER_MASK)));
    counter.fetch_add(1, Ordering::Relaxed) & COUNTER_MASK
}

impl ObjectId {
    /// Generate a fresh id for the current time.
    pub fn new() -> Self {
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or(0);
        Self::from_parts(seconds, *process_unique(), next_counter())
    }

    fn from_parts(seconds: u32, unique: [u8; 5], counter: u32) -> Self {
        let mut bytes = [0u8; 12];
        bytes[0..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(&unique);
        bytes[9..12].copy_from_slice(&counter.to_be_bytes()[1..4]);
        Self(bytes)
    }

    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    pub const fn bytes(&self) -> [u8; 12] {
        self.0
    }

    /// Creation time in seconds since the Unix epoch.
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// Decode the 24-hex-digit text form.
    pub fn parse_str(s: &str) -> Result<Self, ObjectIdError> {
        if s.len() != HEX_LEN {
            return Err(ObjectIdError::InvalidLength {
                length: s.chars().count(),
            });
        }

        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes).map_err(|e| match e {
            hex::FromHexError::InvalidHexCharacter { c, index } => {
                ObjectIdError::InvalidHexCharacter { c, index }
            }
            hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => {
                ObjectIdError::InvalidLength {
                    length: s.chars().count(),
                }
            }
        })?;
        Ok(Self(bytes))
    }

    /// Encode as 24 lowercase hex digits.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for ObjectId {
    type Err = ObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ObjectIdVisitor;

        impl Visitor<'_> for ObjectIdVisitor {
            type Value = ObjectId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a 24 digit hex object id")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<ObjectId, E> {
                ObjectId::parse_str(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(ObjectIdVisitor)
    }
}
