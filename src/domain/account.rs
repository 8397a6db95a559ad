//! Ledger entity identifiers and their Rosetta account addresses.

use std::fmt;
use std::str::FromStr;

use super::error::ValidationError;
use super::rosetta::AccountIdentifier;

const SHARD_BITS: u32 = 10;
const REALM_BITS: u32 = 16;
const NUM_BITS: u32 = 38;

const MAX_SHARD: u64 = (1 << SHARD_BITS) - 1;
const MAX_REALM: u64 = (1 << REALM_BITS) - 1;
const MAX_NUM: u64 = (1 << NUM_BITS) - 1;

/// Shard/realm/num triplet identifying a ledger entity.
///
/// Storage keeps the triplet packed into a single non-negative `i64`
/// (10 bits shard, 16 bits realm, 38 bits num).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    shard: u64,
    realm: u64,
    num: u64,
}

impl EntityId {
    pub fn new(shard: u64, realm: u64, num: u64) -> Result<Self, ValidationError> {
        if shard > MAX_SHARD || realm > MAX_REALM || num > MAX_NUM {
            return Err(ValidationError::InvalidEntityId(format!(
                "{}.{}.{} is out of range",
                shard, realm, num
            )));
        }
        Ok(Self { shard, realm, num })
    }

    /// Unpack an encoded storage id
    pub fn decode(encoded: i64) -> Result<Self, ValidationError> {
        if encoded < 0 {
            return Err(ValidationError::InvalidEntityId(format!(
                "encoded id {} is negative",
                encoded
            )));
        }
        let encoded = encoded as u64;
        Ok(Self {
            shard: encoded >> (REALM_BITS + NUM_BITS),
            realm: (encoded >> NUM_BITS) & MAX_REALM,
            num: encoded & MAX_NUM,
        })
    }

    /// Pack into the storage representation
    pub fn encode(&self) -> i64 {
        ((self.shard << (REALM_BITS + NUM_BITS)) | (self.realm << NUM_BITS) | self.num) as i64
    }

    pub fn shard(&self) -> u64 {
        self.shard
    }

    pub fn realm(&self) -> u64 {
        self.realm
    }

    pub fn num(&self) -> u64 {
        self.num
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

impl FromStr for EntityId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidEntityId(format!("'{}' is not shard.realm.num", s));

        let parts: Vec<&str> = s.split('.').collect();
        let [shard, realm, num] = parts.as_slice() else {
            return Err(invalid());
        };
        let parse = |part: &str| {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse::<u64>().map_err(|_| invalid())
        };

        Self::new(parse(*shard)?, parse(*realm)?, parse(*num)?)
    }
}

/// Account of the ledger, addressed on the wire by its dotted entity id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId {
    entity_id: EntityId,
}

impl AccountId {
    pub fn new(entity_id: EntityId) -> Self {
        Self { entity_id }
    }

    /// Build from an encoded storage id
    pub fn from_encoded(encoded: i64) -> Result<Self, ValidationError> {
        EntityId::decode(encoded).map(Self::new)
    }

    /// Parse an untrusted Rosetta account identifier
    pub fn from_rosetta(identifier: &AccountIdentifier) -> Result<Self, ValidationError> {
        identifier.address.parse()
    }

    pub fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    pub fn to_rosetta(&self) -> AccountIdentifier {
        AccountIdentifier::new(self.to_string())
    }
}

impl From<EntityId> for AccountId {
    fn from(entity_id: EntityId) -> Self {
        Self::new(entity_id)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.entity_id.fmt(f)
    }
}

impl FromStr for AccountId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<EntityId>()
            .map(Self::new)
            .map_err(|_| ValidationError::InvalidAccount(format!("'{}' is not a valid address", s)))
    }
}
