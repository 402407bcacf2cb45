//! # Suites
//!
//! Each suite produces one interop matrix.

pub mod interop;
pub mod issue;
