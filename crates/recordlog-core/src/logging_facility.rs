//! Diagnostic logging facility
//!
//! The facade's own lifecycle is reported through `tracing`, separate from
//! the log files it manages:
//! - Single initialization point via `init(profile)`
//! - Structured macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use recordlog_core::logging_facility::{init, Profile};
//!
//! // Initialize once at application startup
//! init(Profile::Production);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
