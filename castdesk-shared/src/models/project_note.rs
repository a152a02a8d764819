/// Project note model and database operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Note attached to a project
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectNote {
    pub id: i32,
    pub project_id: i32,
    pub title: String,
    pub description: Option<String>,

    /// Author of the note
    pub added_by_user_id: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a project note
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectNote {
    pub project_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub added_by_user_id: i32,
}

/// Input for updating a project note; only non-None fields are applied
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProjectNote {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
}

const NOTE_COLUMNS: &str =
    "id, project_id, title, description, added_by_user_id, created_at, updated_at";

impl ProjectNote {
    pub async fn create(pool: &PgPool, data: CreateProjectNote) -> Result<Self, sqlx::Error> {
        let note = sqlx::query_as::<_, ProjectNote>(&format!(
            r#"
            INSERT INTO project_notes (project_id, title, description, added_by_user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {NOTE_COLUMNS}
            "#,
        ))
        .bind(data.project_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.added_by_user_id)
        .fetch_one(pool)
        .await?;

        Ok(note)
    }

    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let note = sqlx::query_as::<_, ProjectNote>(&format!(
            "SELECT {NOTE_COLUMNS} FROM project_notes WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(note)
    }

    pub async fn update(pool: &PgPool, id: i32, data: UpdateProjectNote) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE project_notes SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {NOTE_COLUMNS}"));

        let mut q = sqlx::query_as::<_, ProjectNote>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }

        let note = q.fetch_optional(pool).await?;

        Ok(note)
    }

    pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project_notes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists notes, optionally restricted to one project, newest first
    pub async fn list(
        pool: &PgPool,
        project_id: Option<i32>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Self>, i64), sqlx::Error> {
        let mut conditions = String::from("TRUE");
        let mut bind_count = 0;

        if project_id.is_some() {
            bind_count += 1;
            conditions.push_str(&format!(" AND project_id = ${}", bind_count));
        }

        let count_query = format!("SELECT COUNT(*) FROM project_notes WHERE {}", conditions);
        let mut count_q = sqlx::query_as::<_, (i64,)>(&count_query);
        if let Some(project_id) = project_id {
            count_q = count_q.bind(project_id);
        }
        let (total,) = count_q.fetch_one(pool).await?;

        let list_query = format!(
            "SELECT {NOTE_COLUMNS} FROM project_notes WHERE {} ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            conditions,
            bind_count + 1,
            bind_count + 2
        );
        let mut list_q = sqlx::query_as::<_, ProjectNote>(&list_query);
        if let Some(project_id) = project_id {
            list_q = list_q.bind(project_id);
        }
        let notes = list_q.bind(limit).bind(offset).fetch_all(pool).await?;

        Ok((notes, total))
    }
}
