//! Link state tracking
//!
//! This module defines how a link fetch outcome is classified and counted.

mod link_state;

pub use link_state::{StatusBreakdown, StatusClass};
