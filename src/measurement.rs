use chrono::NaiveDateTime;
use poem_openapi::Object;
use serde::Serialize;

use crate::db::RollupRow;
use crate::error::MeasurementError;
use crate::granularity::Granularity;

/// Identifier of the single station this deployment serves.
pub const STATION_ID: &str = "165461071a9b4f40bb8325924aa45cbb";

/// Layout of the `timestamp` column. Stored values carry no offset and are read as UTC.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Average, minimum and maximum of one quantity over a bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Object)]
#[oai(rename_all = "snake_case")]
pub struct StatSummary {
    pub max: f64,
    pub min: f64,
    pub average: f64,
    /// Number of samples in the bucket. Not stored by the roll-up tables.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[oai(skip_serializing_if_is_none)]
    pub weight: Option<u32>,
}

impl StatSummary {
    fn new(average: f64, min: f64, max: f64) -> Self {
        Self {
            max,
            min,
            average,
            weight: None,
        }
    }
}

/// Not reported yet, always zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Object)]
#[oai(rename_all = "snake_case")]
pub struct Wind {
    pub degree: i32,
    pub speed: f64,
}

/// Not reported yet, always zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Object)]
#[oai(rename_all = "snake_case")]
pub struct Precipitation {
    pub rain_1h: f64,
    pub rain_6h: f64,
    pub rain_24h: f64,
}

/// Weather summary of the station for one minute, hour or day.
///
/// `date` is the Unix epoch of the start of the bucket; the values describe
/// that bucket, not the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Object)]
#[oai(rename_all = "snake_case")]
pub struct Measurement {
    #[serde(rename = "type")]
    #[oai(rename = "type")]
    pub rollup: String,
    pub date: i64,
    pub station_id: String,
    pub temp: StatSummary,
    pub humidity: StatSummary,
    pub wind: Wind,
    pub pressure: StatSummary,
    pub precipitation: Precipitation,
}

impl Measurement {
    pub fn from_row(granularity: Granularity, row: RollupRow) -> Result<Self, MeasurementError> {
        let date = parse_bucket_start(&row.timestamp)?;
        Ok(Self {
            rollup: granularity.table_name().to_string(),
            date,
            station_id: STATION_ID.to_string(),
            temp: StatSummary::new(row.temp_avg, row.temp_min, row.temp_max),
            humidity: StatSummary::new(row.humidity_avg, row.humidity_min, row.humidity_max),
            wind: Wind::default(),
            pressure: StatSummary::new(row.pressure_avg, row.pressure_min, row.pressure_max),
            precipitation: Precipitation::default(),
        })
    }
}

fn parse_bucket_start(timestamp: &str) -> Result<i64, MeasurementError> {
    NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
        .map(|t| t.and_utc().timestamp())
        .map_err(|source| MeasurementError::DataCorruption {
            timestamp: timestamp.to_string(),
            source,
        })
}
