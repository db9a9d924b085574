//! Core domain types
//!
//! These types describe what the monitor reasons about. They are produced
//! from API responses and never mutated afterwards: every poll yields new
//! values reflecting the current remote state.

pub mod job;
pub mod run;
