//! Runwatch Core
//!
//! Core types for watching Databricks job runs.
//!
//! This crate contains:
//! - Domain types: jobs, runs and their lifecycle states
//! - DTOs: the Jobs API 2.1 wire shapes exchanged with the workspace

pub mod domain;
pub mod dto;
