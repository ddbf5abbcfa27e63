//! Role names carried in access-token claims.

/// Full access to the admin dashboard.
pub const ROLE_ADMIN: &str = "admin";

/// A signed-in reader.
pub const ROLE_USER: &str = "user";
