use std::fmt;
use std::str::FromStr;

use crate::error::MeasurementError;

/// Bucket size of a roll-up. Every variant is backed by its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Minute,
    Hour,
    Day,
}

impl Granularity {
    pub const ALL: [Granularity; 3] = [Self::Minute, Self::Hour, Self::Day];

    /// Name of the table holding this roll-up. Doubles as the `type` label of a measurement.
    pub const fn table_name(self) -> &'static str {
        match self {
            Self::Minute => "envDataMinute",
            Self::Hour => "envDataHours",
            Self::Day => "envDataDays",
        }
    }

    /// Query string code selecting this granularity.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Minute => "m",
            Self::Hour => "h",
            Self::Day => "d",
        }
    }
}

impl FromStr for Granularity {
    type Err = MeasurementError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "m" => Ok(Self::Minute),
            "h" => Ok(Self::Hour),
            "d" => Ok(Self::Day),
            other => Err(MeasurementError::InvalidParameter {
                name: "type",
                reason: format!("unrecognized value '{other}', expected one of m, h, d"),
            }),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}
