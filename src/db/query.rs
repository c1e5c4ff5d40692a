use std::num::NonZeroU64;

use crate::error::MeasurementError;
use crate::granularity::Granularity;

/// A validated roll-up request: which table, and how many of its newest rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasurementQuery {
    pub granularity: Granularity,
    pub limit: NonZeroU64,
}

impl MeasurementQuery {
    pub fn new(granularity: Granularity, limit: NonZeroU64) -> Self {
        Self { granularity, limit }
    }

    /// Row cap as bound into SQL. SQLite's `LIMIT` is a signed 64-bit integer.
    pub fn sql_limit(&self) -> i64 {
        i64::try_from(self.limit.get()).unwrap_or(i64::MAX)
    }

    /// Builds a query from raw query string values.
    ///
    /// `type` is checked before `limit`; the first failure is returned.
    pub fn from_params<T, L>(types: &[T], limits: &[L]) -> Result<Self, MeasurementError>
    where
        T: AsRef<str>,
        L: AsRef<str>,
    {
        let granularity = match types {
            [] => return Err(MeasurementError::MissingParameter("type")),
            [code] => code.as_ref().parse::<Granularity>()?,
            _ => return Err(MeasurementError::TooManyParameters("type")),
        };

        let limit = match limits {
            [value] => parse_limit(value.as_ref())?,
            [] => return Err(invalid_limit("a positive integer is required".to_string())),
            _ => return Err(invalid_limit("exactly one value is allowed".to_string())),
        };

        Ok(Self::new(granularity, limit))
    }
}

fn parse_limit(value: &str) -> Result<NonZeroU64, MeasurementError> {
    let limit = value
        .parse::<NonZeroU64>()
        .map_err(|_| invalid_limit(format!("'{value}' is not a positive integer")))?;
    if i64::try_from(limit.get()).is_err() {
        return Err(invalid_limit(format!("'{value}' exceeds {}", i64::MAX)));
    }
    Ok(limit)
}

fn invalid_limit(reason: String) -> MeasurementError {
    MeasurementError::InvalidParameter {
        name: "limit",
        reason,
    }
}
