//! Authentication primitives.
//!
//! - [`jwt`] -- JWT access-token validation (and generation, used by tests
//!   and tooling; accounts are issued elsewhere).

pub mod jwt;
