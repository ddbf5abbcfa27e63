//! HTTP handlers, one module per resource.

pub mod ai_prompts;
pub mod articles;
pub mod categories;
pub mod email_templates;
pub mod preferences;
