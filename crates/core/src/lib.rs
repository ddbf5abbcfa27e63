//! Domain logic for the newsdesk platform.
//!
//! Everything in this crate is pure: no database, no HTTP. The repository
//! and API layers call into it for validation, text shaping and the
//! version/pagination arithmetic.

pub mod article;
pub mod cache;
pub mod category;
pub mod email_template;
pub mod error;
pub mod pagination;
pub mod preferences;
pub mod preview;
pub mod prompt_versioning;
pub mod roles;
pub mod search;
pub mod types;
