//! Dataset generation
//!
//! Only the coordinator generates data; everyone else receives an owned
//! partition of it through the scatter.

pub mod generator;

pub use generator::generate;
