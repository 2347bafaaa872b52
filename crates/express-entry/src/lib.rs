//! Express Entry points and eligibility engine.
//!
//! The [`express_entry`] module turns raw immigration profiles into Comprehensive Ranking
//! System scores and federal program eligibility results; [`pnp`] matches the same normalized
//! profile against provincial nominee streams. Everything under those two modules is a pure,
//! synchronous computation over caller-supplied input.

pub mod config;
pub mod error;
pub mod express_entry;
pub mod pnp;
pub mod telemetry;
