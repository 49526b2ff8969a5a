use core::fmt;
use core::str::FromStr;

use rand_core::CryptoRngCore;
use uuid::Uuid;

use crate::error::QueueError;

pub const IDENTIFIER_SIZE: usize = 16;

/// Opaque 128-bit identifier.
///
/// The byte layout is the RFC 4122 UUID layout, so a record written for a
/// `Uuid` reads back as the same `Uuid` on any platform.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash, Default)]
pub struct Identifier([u8; IDENTIFIER_SIZE]);

impl Identifier {
    pub const fn new(bytes: [u8; IDENTIFIER_SIZE]) -> Self {
        Self(bytes)
    }

    pub const fn nil() -> Self {
        Self([0u8; IDENTIFIER_SIZE])
    }

    /// Random version-4 identifier.
    pub fn new_from_rand<R: CryptoRngCore>(mut rng: R) -> Self {
        let mut bytes = [0u8; IDENTIFIER_SIZE];
        rng.fill_bytes(&mut bytes);
        Self::from(uuid::Builder::from_random_bytes(bytes).into_uuid())
    }

    pub fn new_from_hex_string(hex_string: &str) -> Result<Self, QueueError> {
        let mut bytes = [0u8; IDENTIFIER_SIZE];
        hex::decode_to_slice(hex_string.trim(), &mut bytes).map_err(|err| {
            QueueError::InvalidIdentifier { input: hex_string.to_owned(), reason: err.to_string() }
        })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; IDENTIFIER_SIZE] {
        &self.0
    }

    pub const fn to_bytes(self) -> [u8; IDENTIFIER_SIZE] {
        self.0
    }

    pub fn is_nil(&self) -> bool {
        self.0.iter().all(|byte| *byte == 0)
    }

    pub fn to_hex_string(&self) -> String {
        hex::encode(self.0)
    }

    pub fn as_uuid(&self) -> Uuid {
        Uuid::from_bytes(self.0)
    }
}

impl From<[u8; IDENTIFIER_SIZE]> for Identifier {
    fn from(bytes: [u8; IDENTIFIER_SIZE]) -> Self {
        Self(bytes)
    }
}

impl From<Identifier> for [u8; IDENTIFIER_SIZE] {
    fn from(id: Identifier) -> Self {
        id.0
    }
}

impl From<Uuid> for Identifier {
    fn from(uuid: Uuid) -> Self {
        Self(uuid.into_bytes())
    }
}

impl From<Identifier> for Uuid {
    fn from(id: Identifier) -> Self {
        Uuid::from_bytes(id.0)
    }
}

impl TryFrom<&[u8]> for Identifier {
    type Error = QueueError;

    fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
        <[u8; IDENTIFIER_SIZE]>::try_from(data).map(Self).map_err(|_| {
            QueueError::InvalidIdentifier {
                input: hex::encode(data),
                reason: format!("expected {IDENTIFIER_SIZE} bytes, got {}", data.len()),
            }
        })
    }
}

impl AsRef<[u8]> for Identifier {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_uuid().hyphenated(), f)
    }
}

impl FromStr for Identifier {
    type Err = QueueError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(input.trim()).map(Self::from).map_err(|err| {
            QueueError::InvalidIdentifier { input: input.to_owned(), reason: err.to_string() }
        })
    }
}
