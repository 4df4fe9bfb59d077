//! Product Tiers
//!
//! The three things the storefront sells and how each one is billed.

use std::fmt;

use crate::error::{PaymentError, Result};

/// Purchasable product tiers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProductTier {
    /// ClawGuru Pro, monthly subscription
    Pro,
    /// Team Pro, monthly subscription
    Team,
    /// 24h access, single charge
    Daypass,
}

impl ProductTier {
    pub const ALL: [Self; 3] = [Self::Pro, Self::Team, Self::Daypass];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pro => "pro",
            Self::Team => "team",
            Self::Daypass => "daypass",
        }
    }

    /// Parse the wire value. Exact match only: `"Pro"` or `" pro"` are rejected.
    pub fn parse(value: Option<&str>) -> Result<Self> {
        match value {
            Some("pro") => Ok(Self::Pro),
            Some("team") => Ok(Self::Team),
            Some("daypass") => Ok(Self::Daypass),
            other => Err(PaymentError::InvalidProduct(other.map(str::to_owned))),
        }
    }

    /// How this tier must be billed
    pub const fn billing_mode(self) -> BillingMode {
        match self {
            Self::Pro | Self::Team => BillingMode::Subscription,
            Self::Daypass => BillingMode::OneTime,
        }
    }
}

impl fmt::Display for ProductTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a price recurs or is charged once
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BillingMode {
    Subscription,
    OneTime,
}

impl BillingMode {
    pub const fn from_recurring(recurring: bool) -> Self {
        if recurring {
            Self::Subscription
        } else {
            Self::OneTime
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Subscription => "subscription",
            Self::OneTime => "one_time",
        }
    }
}

impl fmt::Display for BillingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
