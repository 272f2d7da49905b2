//! Tender award criteria engine: rule checks over criteria and conversions,
//! construction of the persisted criteria tree, and bidder response matching.

pub mod config;
pub mod criteria;
pub mod error;
pub mod telemetry;
