use crate::error::CoreError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

const SUFFIX_RADIX: u64 = 36;
const SUFFIX_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Client-side contact identifier of the form `<epoch-millis>-<base36>`.
///
/// Unique enough for a single user importing a batch of contacts; it is not
/// a cryptographic or globally unique identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContactId(String);

impl ContactId {
    pub fn generate() -> Self {
        let millis = Utc::now().timestamp_millis().max(0);
        // Low 64 bits of a v4 uuid carry 62 random bits.
        let random = Uuid::new_v4().as_u128() as u64;
        Self(format!("{millis}-{}", to_base36(random)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn generate_contact_id() -> ContactId {
    ContactId::generate()
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(SUFFIX_DIGITS[(value % SUFFIX_RADIX) as usize]);
        value /= SUFFIX_RADIX;
    }
    digits.reverse();
    digits.into_iter().map(char::from).collect()
}

fn is_valid_id(value: &str) -> bool {
    let Some((millis, suffix)) = value.split_once('-') else {
        return false;
    };
    !millis.is_empty()
        && millis.chars().all(|ch| ch.is_ascii_digit())
        && !suffix.is_empty()
        && suffix
            .chars()
            .all(|ch| ch.is_ascii_digit() || ch.is_ascii_lowercase())
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ContactId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if !is_valid_id(trimmed) {
            return Err(CoreError::InvalidContactId(s.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl TryFrom<String> for ContactId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ContactId> for String {
    fn from(value: ContactId) -> Self {
        value.0
    }
}
