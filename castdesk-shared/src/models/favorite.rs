/// Favorites: per-user bookmarks of projects or casting roles
///
/// A favorite is polymorphic over its target via [`FavoriteKind`]; the
/// database enforces one favorite per (user, kind, target).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Target kind of a favorite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "favorite_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FavoriteKind {
    Project,
    Role,
}

impl FavoriteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FavoriteKind::Project => "project",
            FavoriteKind::Role => "role",
        }
    }
}

/// Favorite record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Favorite {
    pub id: i32,

    /// Owner; favorites are only visible to their owner
    pub user_id: i32,

    pub kind: FavoriteKind,

    /// Id of the favorited project or role
    pub favoritable_id: i32,

    pub favorited_at: DateTime<Utc>,
}

/// Input for creating a favorite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFavorite {
    pub user_id: i32,
    pub kind: FavoriteKind,
    pub favoritable_id: i32,
}

const FAVORITE_COLUMNS: &str = "id, user_id, kind, favoritable_id, favorited_at";

impl Favorite {
    /// Creates a favorite
    ///
    /// # Errors
    ///
    /// Returns a unique-constraint error if the user already favorited this
    /// target.
    pub async fn create(pool: &PgPool, data: CreateFavorite) -> Result<Self, sqlx::Error> {
        let favorite = sqlx::query_as::<_, Favorite>(&format!(
            r#"
            INSERT INTO project_favorites (user_id, kind, favoritable_id)
            VALUES ($1, $2, $3)
            RETURNING {FAVORITE_COLUMNS}
            "#,
        ))
        .bind(data.user_id)
        .bind(data.kind)
        .bind(data.favoritable_id)
        .fetch_one(pool)
        .await?;

        Ok(favorite)
    }

    /// Finds a favorite owned by `user_id`
    pub async fn find_by_id(pool: &PgPool, id: i32, user_id: i32) -> Result<Option<Self>, sqlx::Error> {
        let favorite = sqlx::query_as::<_, Favorite>(&format!(
            "SELECT {FAVORITE_COLUMNS} FROM project_favorites WHERE id = $1 AND user_id = $2",
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(favorite)
    }

    /// Deletes a favorite by id, scoped to its owner
    pub async fn delete(pool: &PgPool, id: i32, user_id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project_favorites WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a favorite by its target, scoped to its owner
    pub async fn delete_by_target(
        pool: &PgPool,
        user_id: i32,
        kind: FavoriteKind,
        favoritable_id: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM project_favorites WHERE user_id = $1 AND kind = $2 AND favoritable_id = $3",
        )
        .bind(user_id)
        .bind(kind)
        .bind(favoritable_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists a user's favorites, optionally restricted to one kind
    pub async fn list(
        pool: &PgPool,
        user_id: i32,
        kind: Option<FavoriteKind>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Self>, i64), sqlx::Error> {
        let mut conditions = String::from("user_id = $1");
        let mut bind_count = 1;

        if kind.is_some() {
            bind_count += 1;
            conditions.push_str(&format!(" AND kind = ${}", bind_count));
        }

        let count_query = format!("SELECT COUNT(*) FROM project_favorites WHERE {}", conditions);
        let mut count_q = sqlx::query_as::<_, (i64,)>(&count_query).bind(user_id);
        if let Some(kind) = kind {
            count_q = count_q.bind(kind);
        }
        let (total,) = count_q.fetch_one(pool).await?;

        let list_query = format!(
            "SELECT {FAVORITE_COLUMNS} FROM project_favorites WHERE {} ORDER BY favorited_at DESC LIMIT ${} OFFSET ${}",
            conditions,
            bind_count + 1,
            bind_count + 2
        );
        let mut list_q = sqlx::query_as::<_, Favorite>(&list_query).bind(user_id);
        if let Some(kind) = kind {
            list_q = list_q.bind(kind);
        }
        let favorites = list_q.bind(limit).bind(offset).fetch_all(pool).await?;

        Ok((favorites, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serde_lowercase() {
        assert_eq!(serde_json::to_string(&FavoriteKind::Role).unwrap(), "\"role\"");
        let kind: FavoriteKind = serde_json::from_str("\"project\"").unwrap();
        assert_eq!(kind, FavoriteKind::Project);
    }
}
