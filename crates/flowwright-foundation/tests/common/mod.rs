//! Shared helpers for `flowwright-foundation` integration tests.
//!
//! Not a test binary of its own; each test file declares `mod common;`.

#![allow(dead_code)]

pub mod mock_provider;
