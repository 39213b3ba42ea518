//! # solobox-runtime
//!
//! Child process execution and the launcher lifecycle state machine.
//!
//! [`executor`] spawns the target command inside the isolated view and
//! captures its output; [`lifecycle`] sequences authentication, layer
//! materialization, isolation, execution, and the unconditional root
//! restoration, and reconciles the final exit code.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod executor;
pub mod lifecycle;
