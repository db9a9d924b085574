//! Data Transfer Objects for the Jobs API 2.1
//!
//! Wire shapes exchanged with a Databricks workspace. Fields the monitor
//! never reads are left out; serde ignores them on the way in.

pub mod error;
pub mod job;
pub mod run;
