//! Synchronization primitives.
//!
//! This module provides the one host-dependent piece of the crate: a
//! [`Monitor`] lock with attached [`Condition`] wait/notify mechanisms.
//! The channel layer is expressed purely in terms of this contract and
//! never reaches into host thread APIs directly.

mod monitor;

pub use monitor::{Condition, Monitor, MonitorGuard};
