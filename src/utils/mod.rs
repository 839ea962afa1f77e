//! Utility modules
//!
//! Provides logging initialization and the COM apartment guard.

pub mod com;
pub mod logging;

pub use com::ComApartment;
pub use logging::{init_logging, init_stderr_logging};
