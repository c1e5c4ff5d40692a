pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod granularity;
pub mod measurement;
pub mod service;
pub mod telemetry;
