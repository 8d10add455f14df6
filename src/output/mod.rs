//! Result rendering
//!
//! Consumes the coordinator's aggregated histogram; nothing here feeds back
//! into the protocol. Text is the default human-readable chart, JSON the
//! machine-readable alternative.

pub mod json;
pub mod text;
