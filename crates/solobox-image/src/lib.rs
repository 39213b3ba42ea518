//! # solobox-image
//!
//! Image acquisition and root filesystem preparation for the solobox
//! launcher.
//!
//! Handles:
//! - **Registry**: bearer-token auth, manifest fetch, and blob download
//!   over HTTPS (single attempt, no retries).
//! - **Manifest**: the schema-2 image manifest data model with its
//!   ordered layer list.
//! - **Digest**: SHA-256 verification of downloaded layer bytes.
//! - **Prepare**: workspace allocation and ordered layer extraction.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod digest;
pub mod manifest;
pub mod prepare;
pub mod registry;
