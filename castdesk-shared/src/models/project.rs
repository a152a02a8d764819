/// Project model and database operations
///
/// A project belongs to a client and carries a unique `username`: the login
/// identity of the `project`-role account that may view the project's roles
/// and fact sheet. Removal is a soft delete.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};

/// Project record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: i32,
    pub name: String,

    /// Login identity of the project account that owns this project
    pub username: String,

    pub client_id: i32,
    pub deadline: Option<NaiveDate>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Input for creating a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub username: String,
    pub client_id: i32,
    pub deadline: Option<NaiveDate>,
}

/// Input for updating a project; only non-None fields are applied
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub client_id: Option<i32>,
    pub deadline: Option<Option<NaiveDate>>,
    pub status: Option<String>,
}

/// Filters for listing projects
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    /// Case-insensitive match against name and username
    pub search: Option<String>,

    pub client_id: Option<i32>,
    pub status: Option<String>,
}

const PROJECT_COLUMNS: &str =
    "id, name, username, client_id, deadline, status, created_at, updated_at, deleted_at";

impl Project {
    /// Creates a project
    ///
    /// Takes any executor so callers can insert the project and its fact
    /// sheet in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the username is taken, the client does not exist,
    /// or the database connection fails.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        data: CreateProject,
    ) -> Result<Self, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(&format!(
            r#"
            INSERT INTO projects (name, username, client_id, deadline)
            VALUES ($1, $2, $3, $4)
            RETURNING {PROJECT_COLUMNS}
            "#,
        ))
        .bind(data.name)
        .bind(data.username)
        .bind(data.client_id)
        .bind(data.deadline)
        .fetch_one(executor)
        .await?;

        Ok(project)
    }

    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1 AND deleted_at IS NULL",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Finds the live project owned by a project-account username
    pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE username = $1 AND deleted_at IS NULL",
        ))
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    pub async fn update(pool: &PgPool, id: i32, data: UpdateProject) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE projects SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.client_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", client_id = ${}", bind_count));
        }
        if data.deadline.is_some() {
            bind_count += 1;
            query.push_str(&format!(", deadline = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }

        query.push_str(&format!(
            " WHERE id = $1 AND deleted_at IS NULL RETURNING {PROJECT_COLUMNS}"
        ));

        let mut q = sqlx::query_as::<_, Project>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(client_id) = data.client_id {
            q = q.bind(client_id);
        }
        if let Some(deadline) = data.deadline {
            q = q.bind(deadline);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }

        let project = q.fetch_optional(pool).await?;

        Ok(project)
    }

    /// Soft-deletes a project
    pub async fn soft_delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists live projects with filtering and pagination
    pub async fn list(
        pool: &PgPool,
        filter: &ProjectFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Self>, i64), sqlx::Error> {
        let mut conditions = String::from("deleted_at IS NULL");
        let mut bind_count = 0;

        if filter.search.is_some() {
            bind_count += 1;
            conditions.push_str(&format!(
                " AND (name ILIKE ${n} OR username ILIKE ${n})",
                n = bind_count
            ));
        }
        if filter.client_id.is_some() {
            bind_count += 1;
            conditions.push_str(&format!(" AND client_id = ${}", bind_count));
        }
        if filter.status.is_some() {
            bind_count += 1;
            conditions.push_str(&format!(" AND status = ${}", bind_count));
        }

        let pattern = filter.search.as_ref().map(|s| format!("%{}%", s));

        let count_query = format!("SELECT COUNT(*) FROM projects WHERE {}", conditions);
        let mut count_q = sqlx::query_as::<_, (i64,)>(&count_query);
        if let Some(ref pattern) = pattern {
            count_q = count_q.bind(pattern);
        }
        if let Some(client_id) = filter.client_id {
            count_q = count_q.bind(client_id);
        }
        if let Some(ref status) = filter.status {
            count_q = count_q.bind(status);
        }
        let (total,) = count_q.fetch_one(pool).await?;

        let list_query = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE {} ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            conditions,
            bind_count + 1,
            bind_count + 2
        );
        let mut list_q = sqlx::query_as::<_, Project>(&list_query);
        if let Some(ref pattern) = pattern {
            list_q = list_q.bind(pattern);
        }
        if let Some(client_id) = filter.client_id {
            list_q = list_q.bind(client_id);
        }
        if let Some(ref status) = filter.status {
            list_q = list_q.bind(status);
        }
        let projects = list_q.bind(limit).bind(offset).fetch_all(pool).await?;

        Ok((projects, total))
    }
}
