//! HistoGrid - Distributed histogram computation tool
//!
//! HistoGrid classifies a synthetically generated dataset into value-range bins
//! across a fixed group of cooperating participants and renders the aggregated
//! counts as a textual bar chart.
//!
//! # Architecture
//!
//! - **Collective communication**: broadcast, scatter, and reduce over a fixed
//!   group of participants, each collective acting as a full barrier
//! - **Role split**: one coordinator (input, generation, rendering) and N-1
//!   workers that only classify their partitions
//! - **Pure core**: bin-boundary derivation and classification are pure
//!   functions, run identically and independently by every participant
//! - **Two runners**: a thread-per-participant group for real runs and a serial
//!   simulation of all roles for deterministic tests

pub mod comm;
pub mod config;
pub mod data;
pub mod group;
pub mod histogram;
pub mod output;
pub mod participant;

// Re-export commonly used types
pub use config::Params;
pub use histogram::Histogram;

/// Result type used throughout HistoGrid
pub type Result<T> = anyhow::Result<T>;
