//! Consolidated integration tests for warranty-probe.
//!
//! One test binary keeps link time down; each module drives
//! `check_warranty` or the library against local fixtures.

mod cli;
mod probe;
