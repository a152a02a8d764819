/// Casting role model and database operations
///
/// A casting role describes a part to be cast within a project: demographic
/// requirements, physical ranges, and free-form tags. Height bounds are stored
/// in centimetres as DOUBLE PRECISION.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Casting role record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CastingRole {
    pub id: i32,
    pub project_id: i32,
    pub name: String,
    pub gender: Option<String>,
    pub ethnicity: Option<String>,
    pub language: Option<String>,
    pub native_language: Option<String>,
    pub age_from: Option<i32>,
    pub age_to: Option<i32>,
    pub height_from: Option<f64>,
    pub height_to: Option<f64>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
    pub hair_color: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a casting role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCastingRole {
    pub project_id: i32,
    pub name: String,
    pub gender: Option<String>,
    pub ethnicity: Option<String>,
    pub language: Option<String>,
    pub native_language: Option<String>,
    pub age_from: Option<i32>,
    pub age_to: Option<i32>,
    pub height_from: Option<f64>,
    pub height_to: Option<f64>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
    pub hair_color: Option<String>,
}

/// Input for updating a casting role; only non-None fields are applied
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCastingRole {
    pub name: Option<String>,
    pub gender: Option<Option<String>>,
    pub ethnicity: Option<Option<String>>,
    pub language: Option<Option<String>>,
    pub native_language: Option<Option<String>>,
    pub age_from: Option<Option<i32>>,
    pub age_to: Option<Option<i32>>,
    pub height_from: Option<Option<f64>>,
    pub height_to: Option<Option<f64>>,
    pub tags: Option<Option<Vec<String>>>,
    pub category: Option<Option<String>>,
    pub hair_color: Option<Option<String>>,
    pub status: Option<String>,
}

/// Filters for listing casting roles
#[derive(Debug, Clone, Default)]
pub struct CastingRoleFilter {
    /// Case-insensitive match against name and category
    pub search: Option<String>,

    pub project_id: Option<i32>,
    pub status: Option<String>,
    pub gender: Option<String>,
    pub category: Option<String>,

    /// Keep roles whose age range overlaps [age_from, age_to]
    pub age_from: Option<i32>,
    pub age_to: Option<i32>,

    /// Keep roles whose height range overlaps [height_from, height_to]
    pub height_from: Option<f64>,
    pub height_to: Option<f64>,
}

const ROLE_COLUMNS: &str = "id, project_id, name, gender, ethnicity, language, native_language, \
                            age_from, age_to, height_from, height_to, tags, category, hair_color, \
                            status, created_at, updated_at";

impl CastingRole {
    pub async fn create(pool: &PgPool, data: CreateCastingRole) -> Result<Self, sqlx::Error> {
        let role = sqlx::query_as::<_, CastingRole>(&format!(
            r#"
            INSERT INTO roles (project_id, name, gender, ethnicity, language, native_language,
                               age_from, age_to, height_from, height_to, tags, category, hair_color)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {ROLE_COLUMNS}
            "#,
        ))
        .bind(data.project_id)
        .bind(data.name)
        .bind(data.gender)
        .bind(data.ethnicity)
        .bind(data.language)
        .bind(data.native_language)
        .bind(data.age_from)
        .bind(data.age_to)
        .bind(data.height_from)
        .bind(data.height_to)
        .bind(data.tags)
        .bind(data.category)
        .bind(data.hair_color)
        .fetch_one(pool)
        .await?;

        Ok(role)
    }

    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let role = sqlx::query_as::<_, CastingRole>(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(role)
    }

    pub async fn update(pool: &PgPool, id: i32, data: UpdateCastingRole) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE roles SET updated_at = NOW()");
        let mut bind_count = 1;

        let fields: [(&str, bool); 13] = [
            ("name", data.name.is_some()),
            ("gender", data.gender.is_some()),
            ("ethnicity", data.ethnicity.is_some()),
            ("language", data.language.is_some()),
            ("native_language", data.native_language.is_some()),
            ("age_from", data.age_from.is_some()),
            ("age_to", data.age_to.is_some()),
            ("height_from", data.height_from.is_some()),
            ("height_to", data.height_to.is_some()),
            ("tags", data.tags.is_some()),
            ("category", data.category.is_some()),
            ("hair_color", data.hair_color.is_some()),
            ("status", data.status.is_some()),
        ];
        for (column, present) in fields {
            if present {
                bind_count += 1;
                query.push_str(&format!(", {} = ${}", column, bind_count));
            }
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {ROLE_COLUMNS}"));

        let mut q = sqlx::query_as::<_, CastingRole>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(gender) = data.gender {
            q = q.bind(gender);
        }
        if let Some(ethnicity) = data.ethnicity {
            q = q.bind(ethnicity);
        }
        if let Some(language) = data.language {
            q = q.bind(language);
        }
        if let Some(native_language) = data.native_language {
            q = q.bind(native_language);
        }
        if let Some(age_from) = data.age_from {
            q = q.bind(age_from);
        }
        if let Some(age_to) = data.age_to {
            q = q.bind(age_to);
        }
        if let Some(height_from) = data.height_from {
            q = q.bind(height_from);
        }
        if let Some(height_to) = data.height_to {
            q = q.bind(height_to);
        }
        if let Some(tags) = data.tags {
            q = q.bind(tags);
        }
        if let Some(category) = data.category {
            q = q.bind(category);
        }
        if let Some(hair_color) = data.hair_color {
            q = q.bind(hair_color);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }

        let role = q.fetch_optional(pool).await?;

        Ok(role)
    }

    pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists casting roles with filtering and pagination
    ///
    /// Range filters keep roles whose stored range overlaps the requested one.
    pub async fn list(
        pool: &PgPool,
        filter: &CastingRoleFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Self>, i64), sqlx::Error> {
        let mut conditions = String::from("TRUE");
        let mut bind_count = 0;

        if filter.search.is_some() {
            bind_count += 1;
            conditions.push_str(&format!(
                " AND (name ILIKE ${n} OR category ILIKE ${n})",
                n = bind_count
            ));
        }
        if filter.project_id.is_some() {
            bind_count += 1;
            conditions.push_str(&format!(" AND project_id = ${}", bind_count));
        }
        if filter.status.is_some() {
            bind_count += 1;
            conditions.push_str(&format!(" AND status = ${}", bind_count));
        }
        if filter.gender.is_some() {
            bind_count += 1;
            conditions.push_str(&format!(" AND gender = ${}", bind_count));
        }
        if filter.category.is_some() {
            bind_count += 1;
            conditions.push_str(&format!(" AND category = ${}", bind_count));
        }
        if filter.age_from.is_some() {
            bind_count += 1;
            conditions.push_str(&format!(" AND (age_to IS NULL OR age_to >= ${})", bind_count));
        }
        if filter.age_to.is_some() {
            bind_count += 1;
            conditions.push_str(&format!(" AND (age_from IS NULL OR age_from <= ${})", bind_count));
        }
        if filter.height_from.is_some() {
            bind_count += 1;
            conditions.push_str(&format!(
                " AND (height_to IS NULL OR height_to >= ${})",
                bind_count
            ));
        }
        if filter.height_to.is_some() {
            bind_count += 1;
            conditions.push_str(&format!(
                " AND (height_from IS NULL OR height_from <= ${})",
                bind_count
            ));
        }

        let pattern = filter.search.as_ref().map(|s| format!("%{}%", s));

        macro_rules! bind_filters {
            ($q:ident) => {{
                let mut q = $q;
                if let Some(ref pattern) = pattern {
                    q = q.bind(pattern);
                }
                if let Some(project_id) = filter.project_id {
                    q = q.bind(project_id);
                }
                if let Some(ref status) = filter.status {
                    q = q.bind(status);
                }
                if let Some(ref gender) = filter.gender {
                    q = q.bind(gender);
                }
                if let Some(ref category) = filter.category {
                    q = q.bind(category);
                }
                if let Some(age_from) = filter.age_from {
                    q = q.bind(age_from);
                }
                if let Some(age_to) = filter.age_to {
                    q = q.bind(age_to);
                }
                if let Some(height_from) = filter.height_from {
                    q = q.bind(height_from);
                }
                if let Some(height_to) = filter.height_to {
                    q = q.bind(height_to);
                }
                q
            }};
        }

        let count_query = format!("SELECT COUNT(*) FROM roles WHERE {}", conditions);
        let count_q = sqlx::query_as::<_, (i64,)>(&count_query);
        let (total,) = bind_filters!(count_q).fetch_one(pool).await?;

        let list_query = format!(
            "SELECT {ROLE_COLUMNS} FROM roles WHERE {} ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            conditions,
            bind_count + 1,
            bind_count + 2
        );
        let list_q = sqlx::query_as::<_, CastingRole>(&list_query);
        let roles = bind_filters!(list_q)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Ok((roles, total))
    }
}
