//! Core types shared across RecordLog facilities
//!
//! This crate provides foundational types used by the logging facade
//! and its diagnostic facility:
//!
//! - **Correlation types**: RunId, RequestInfo
//! - **Schema constants**: Canonical `extra` field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{RequestInfo, RunId};
