//! # solobox-core
//!
//! OS isolation primitives for the solobox launcher: the
//! [`isolation::IsolationProvider`] capability trait, its Linux
//! implementation, and a recording fake for tests.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod isolation;
