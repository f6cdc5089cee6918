//! Shared test utilities for ptzkit.
//!
//! # Modules
//!
//! - [`mod@must`] - Unwrap helpers with good error messages and `#[track_caller]`
//! - [`mock`] - Scripted gimbal transport for link tests
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! ptzkit-test-helpers = { workspace = true }
//! ```

#![deny(unsafe_op_in_unsafe_fn)]

pub mod mock;
pub mod must;

pub use mock::{MockConnector, MockGimbal, MockReply, MockTransport, attitude_reply};
pub use must::*;

pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;
