/// API route handlers
///
/// Each module maps to one route group in the router (see `app::build_router`).

pub mod auth;
pub mod casting_roles;
pub mod clients;
pub mod fact_sheets;
pub mod favorites;
pub mod health;
pub mod project_notes;
pub mod projects;
pub mod role_notes;
pub mod role_options;
pub mod users;
