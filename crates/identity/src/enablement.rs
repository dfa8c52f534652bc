//! Time-windowed enablement of a user account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gatehouse_core::{DomainError, DomainResult, ValueObject};

/// Whether a user may act, optionally limited to a `[start, end]` window.
///
/// # Invariants
/// - Either both dates are set or neither is.
/// - When set, `start_date <= end_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "EnablementFields")]
pub struct Enablement {
    enabled: bool,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
}

impl Enablement {
    pub fn new(
        enabled: bool,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> DomainResult<Self> {
        match (start_date, end_date) {
            (Some(start), Some(end)) if start > end => {
                return Err(DomainError::validation(
                    "enablement start date must not be after its end date",
                ));
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(DomainError::validation(
                    "enablement needs both a start and an end date, or neither",
                ));
            }
            _ => {}
        }

        Ok(Self {
            enabled,
            start_date,
            end_date,
        })
    }

    /// Enabled, with no time limit.
    pub fn indefinite() -> Self {
        Self {
            enabled: true,
            start_date: None,
            end_date: None,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            start_date: None,
            end_date: None,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        self.end_date
    }

    pub fn is_enabled(&self) -> bool {
        self.is_enabled_at(Utc::now())
    }

    pub fn is_enabled_at(&self, now: DateTime<Utc>) -> bool {
        self.enabled && !self.time_expired_at(now)
    }

    /// `now` lies outside the window. Without a window nothing expires.
    pub fn time_expired_at(&self, now: DateTime<Utc>) -> bool {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => now < start || now > end,
            _ => false,
        }
    }
}

#[derive(Deserialize)]
struct EnablementFields {
    enabled: bool,
    #[serde(default)]
    start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    end_date: Option<DateTime<Utc>>,
}

impl TryFrom<EnablementFields> for Enablement {
    type Error = DomainError;

    fn try_from(f: EnablementFields) -> DomainResult<Self> {
        Self::new(f.enabled, f.start_date, f.end_date)
    }
}

impl ValueObject for Enablement {}
