//! Catalog fund definitions.
//!
//! - [`Fund`] - An investment fund users can subscribe to
//! - [`FundCategory`] - Voluntary pension (FPV) or collective investment (FIC)

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Amount, FundId, ValidationError};

/// Fund category.
///
/// # Examples
///
/// ```
/// use fondo_core::data::FundCategory;
///
/// assert_eq!(FundCategory::Fpv.to_string(), "FPV");
/// assert!(FundCategory::Fic.is_fic());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FundCategory {
    /// Voluntary pension fund
    Fpv,
    /// Collective investment fund
    Fic,
}

impl FundCategory {
    /// Returns true if this is a voluntary pension fund.
    #[must_use]
    pub const fn is_fpv(&self) -> bool {
        matches!(self, Self::Fpv)
    }

    /// Returns true if this is a collective investment fund.
    #[must_use]
    pub const fn is_fic(&self) -> bool {
        matches!(self, Self::Fic)
    }
}

impl fmt::Display for FundCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fpv => write!(f, "FPV"),
            Self::Fic => write!(f, "FIC"),
        }
    }
}

/// An investment fund in the catalog.
///
/// Funds are created once when the catalog is seeded and never mutated.
/// On the wire the minimum is exposed as `min_amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fund {
    /// Catalog identifier.
    pub id: FundId,
    /// Display name.
    pub name: String,
    /// Minimum amount debited on subscription.
    #[serde(rename = "min_amount")]
    pub minimum_amount: Amount,
    /// Fund category.
    pub category: FundCategory,
}

impl Fund {
    /// Creates a new fund.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyFundName` for a blank name and
    /// `ValidationError::ZeroAmount` for a zero minimum.
    pub fn new(
        id: FundId,
        name: impl Into<String>,
        minimum_amount: Amount,
        category: FundCategory,
    ) -> Result<Self, ValidationError> {
        let fund = Self {
            id,
            name: name.into(),
            minimum_amount,
            category,
        };
        fund.validate()?;
        Ok(fund)
    }

    /// Checks the name and minimum of a fund built by deserialization.
    ///
    /// # Errors
    ///
    /// Same as [`Fund::new`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyFundName);
        }
        if self.minimum_amount.is_zero() {
            return Err(ValidationError::ZeroAmount);
        }
        Ok(())
    }
}

/// Returns the built-in seed catalog, in insertion order.
#[must_use]
pub fn default_catalog() -> Vec<Fund> {
    [
        ("1", "FPV_EL CLIENTE_RECAUDADORA", 75_000, FundCategory::Fpv),
        ("2", "FPV_EL CLIENTE_ECOPETROL", 125_000, FundCategory::Fpv),
        ("3", "DEUDAPRIVADA", 50_000, FundCategory::Fic),
        ("4", "FDO-ACCIONES", 250_000, FundCategory::Fic),
        ("5", "FPV_EL CLIENTE_DINAMICA", 100_000, FundCategory::Fpv),
    ]
    .into_iter()
    .map(|(id, name, minimum, category)| Fund {
        id: FundId::from_static(id),
        name: name.to_string(),
        minimum_amount: Amount::new(minimum),
        category,
    })
    .collect()
}
