//! Identifier types for funds, users and ledger records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Namespace for deterministic transaction ids.
const TRANSACTION_NAMESPACE: Uuid = Uuid::from_u128(0x6f1d_0c1e_8a4b_4e7c_9d2a_5b3f_1e0a_7c44);

/// Fund ID type - used for representing catalog fund identifiers.
///
/// Wraps a `String` value with validation to ensure non-empty. Matching is
/// exact: `"1"` and `"01"` are different funds.
///
/// # Examples
///
/// ```
/// use fondo_core::types::FundId;
///
/// let fund_id = FundId::new("1").unwrap();
/// assert_eq!(fund_id.as_str(), "1");
/// assert!(FundId::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FundId(String);

impl FundId {
    /// Creates a new `FundId` from a string.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyFundId` if the string is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.trim().is_empty() {
            return Err(ValidationError::EmptyFundId);
        }
        Ok(Self(s))
    }

    /// Builds a `FundId` from a literal known to be non-empty.
    pub(crate) fn from_static(value: &'static str) -> Self {
        debug_assert!(!value.trim().is_empty());
        Self(value.to_string())
    }

    /// Returns the fund ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FundId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FundId> for String {
    fn from(id: FundId) -> Self {
        id.0
    }
}

impl fmt::Display for FundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FundId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for FundId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// User ID type - identifies the owner of a subscription account.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Creates a new `UserId` from a string.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyUserId` if the string is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.trim().is_empty() {
            return Err(ValidationError::EmptyUserId);
        }
        Ok(Self(s))
    }

    /// Returns the user ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Transaction ID type - unique identifier of a ledger record.
///
/// Either random (UUID v4) or derived deterministically from the account
/// state change that produced the record (UUID v5), so that a retried
/// append of the same change always carries the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Generates a new random `TransactionId` using UUID v4.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Derives the id of the record produced when `user_id`'s account
    /// reached `version`.
    ///
    /// # Examples
    ///
    /// ```
    /// use fondo_core::types::{TransactionId, UserId};
    ///
    /// let user = UserId::new("default_user").unwrap();
    /// assert_eq!(
    ///     TransactionId::for_account_version(&user, 3),
    ///     TransactionId::for_account_version(&user, 3),
    /// );
    /// assert_ne!(
    ///     TransactionId::for_account_version(&user, 3),
    ///     TransactionId::for_account_version(&user, 4),
    /// );
    /// ```
    #[must_use]
    pub fn for_account_version(user_id: &UserId, version: u64) -> Self {
        let name = format!("{}:{version}", user_id.as_str());
        Self(Uuid::new_v5(&TRANSACTION_NAMESPACE, name.as_bytes()))
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TransactionId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| ValidationError::InvalidTransactionId(s.to_string()))
    }
}
