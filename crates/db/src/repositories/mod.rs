//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod ai_prompt_repo;
pub mod article_repo;
pub mod category_repo;
pub mod email_template_repo;
pub mod user_preferences_repo;

pub use ai_prompt_repo::AiPromptRepo;
pub use article_repo::ArticleRepo;
pub use category_repo::CategoryRepo;
pub use email_template_repo::EmailTemplateRepo;
pub use user_preferences_repo::UserPreferencesRepo;
