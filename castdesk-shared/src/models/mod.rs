/// Database models
///
/// Each model module contains the row struct (`sqlx::FromRow`), its
/// create/update input types, and the CRUD operations against PostgreSQL.

pub mod casting_role;
pub mod client;
pub mod fact_sheet;
pub mod favorite;
pub mod project;
pub mod project_note;
pub mod role_note;
pub mod role_option;
pub mod user;
