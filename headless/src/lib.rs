//! Headless vault runner.
//!
//! Drives a `Vault` at a fixed rate without a window, for soak runs and
//! end-to-end tests.

pub mod config;
pub mod frame_loop;
pub mod sweep;
