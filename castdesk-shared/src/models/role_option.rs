/// Role option lookup values (categories, etc.) used by casting roles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Role option record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RoleOption {
    pub id: i32,
    pub name: String,

    /// Option family, e.g. "category"
    pub option_type: String,

    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Input for creating a role option
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoleOption {
    pub name: String,
    pub option_type: Option<String>,
}

/// Input for updating a role option; only non-None fields are applied
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRoleOption {
    pub name: Option<String>,
    pub option_type: Option<String>,
    pub status: Option<String>,
}

const OPTION_COLUMNS: &str =
    "id, name, option_type, status, created_at, updated_at, deleted_at";

impl RoleOption {
    pub async fn create(pool: &PgPool, data: CreateRoleOption) -> Result<Self, sqlx::Error> {
        let option = sqlx::query_as::<_, RoleOption>(&format!(
            r#"
            INSERT INTO role_options (name, option_type)
            VALUES ($1, COALESCE($2, 'category'))
            RETURNING {OPTION_COLUMNS}
            "#,
        ))
        .bind(data.name)
        .bind(data.option_type)
        .fetch_one(pool)
        .await?;

        Ok(option)
    }

    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let option = sqlx::query_as::<_, RoleOption>(&format!(
            "SELECT {OPTION_COLUMNS} FROM role_options WHERE id = $1 AND deleted_at IS NULL",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(option)
    }

    pub async fn update(pool: &PgPool, id: i32, data: UpdateRoleOption) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE role_options SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.option_type.is_some() {
            bind_count += 1;
            query.push_str(&format!(", option_type = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }

        query.push_str(&format!(
            " WHERE id = $1 AND deleted_at IS NULL RETURNING {OPTION_COLUMNS}"
        ));

        let mut q = sqlx::query_as::<_, RoleOption>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(option_type) = data.option_type {
            q = q.bind(option_type);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }

        let option = q.fetch_optional(pool).await?;

        Ok(option)
    }

    /// Lists live role options, optionally restricted to one option family
    pub async fn list(
        pool: &PgPool,
        option_type: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Self>, i64), sqlx::Error> {
        let mut conditions = String::from("deleted_at IS NULL");
        let mut bind_count = 0;

        if option_type.is_some() {
            bind_count += 1;
            conditions.push_str(&format!(" AND option_type = ${}", bind_count));
        }

        let count_query = format!("SELECT COUNT(*) FROM role_options WHERE {}", conditions);
        let mut count_q = sqlx::query_as::<_, (i64,)>(&count_query);
        if let Some(option_type) = option_type {
            count_q = count_q.bind(option_type);
        }
        let (total,) = count_q.fetch_one(pool).await?;

        let list_query = format!(
            "SELECT {OPTION_COLUMNS} FROM role_options WHERE {} ORDER BY name LIMIT ${} OFFSET ${}",
            conditions,
            bind_count + 1,
            bind_count + 2
        );
        let mut list_q = sqlx::query_as::<_, RoleOption>(&list_query);
        if let Some(option_type) = option_type {
            list_q = list_q.bind(option_type);
        }
        let options = list_q.bind(limit).bind(offset).fetch_all(pool).await?;

        Ok((options, total))
    }
}
