/// Client model and database operations
///
/// Clients are the agencies' customers; projects reference a client. Email is
/// unique across live clients and removal is a soft delete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Client record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Client {
    pub id: i32,
    pub name: String,
    pub phone: Option<String>,

    /// Unique contact email
    pub email: String,

    pub address: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Input for creating a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateClient {
    pub name: String,
    pub phone: Option<String>,
    pub email: String,
    pub address: Option<String>,
}

/// Input for updating a client; only non-None fields are applied
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateClient {
    pub name: Option<String>,
    pub phone: Option<Option<String>>,
    pub email: Option<String>,
    pub address: Option<Option<String>>,
    pub status: Option<String>,
}

const CLIENT_COLUMNS: &str =
    "id, name, phone, email, address, status, created_at, updated_at, deleted_at";

impl Client {
    pub async fn create(pool: &PgPool, data: CreateClient) -> Result<Self, sqlx::Error> {
        let client = sqlx::query_as::<_, Client>(&format!(
            r#"
            INSERT INTO clients (name, phone, email, address)
            VALUES ($1, $2, $3, $4)
            RETURNING {CLIENT_COLUMNS}
            "#,
        ))
        .bind(data.name)
        .bind(data.phone)
        .bind(data.email)
        .bind(data.address)
        .fetch_one(pool)
        .await?;

        Ok(client)
    }

    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let client = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE id = $1 AND deleted_at IS NULL",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(client)
    }

    pub async fn update(pool: &PgPool, id: i32, data: UpdateClient) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE clients SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.phone.is_some() {
            bind_count += 1;
            query.push_str(&format!(", phone = ${}", bind_count));
        }
        if data.email.is_some() {
            bind_count += 1;
            query.push_str(&format!(", email = ${}", bind_count));
        }
        if data.address.is_some() {
            bind_count += 1;
            query.push_str(&format!(", address = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }

        query.push_str(&format!(
            " WHERE id = $1 AND deleted_at IS NULL RETURNING {CLIENT_COLUMNS}"
        ));

        let mut q = sqlx::query_as::<_, Client>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(phone) = data.phone {
            q = q.bind(phone);
        }
        if let Some(email) = data.email {
            q = q.bind(email);
        }
        if let Some(address) = data.address {
            q = q.bind(address);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }

        let client = q.fetch_optional(pool).await?;

        Ok(client)
    }

    /// Lists live clients with an optional case-insensitive search over name
    /// and email
    pub async fn list(
        pool: &PgPool,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Self>, i64), sqlx::Error> {
        let mut conditions = String::from("deleted_at IS NULL");
        let mut bind_count = 0;

        if search.is_some() {
            bind_count += 1;
            conditions.push_str(&format!(
                " AND (name ILIKE ${n} OR email ILIKE ${n})",
                n = bind_count
            ));
        }

        let pattern = search.map(|s| format!("%{}%", s));

        let count_query = format!("SELECT COUNT(*) FROM clients WHERE {}", conditions);
        let mut count_q = sqlx::query_as::<_, (i64,)>(&count_query);
        if let Some(ref pattern) = pattern {
            count_q = count_q.bind(pattern);
        }
        let (total,) = count_q.fetch_one(pool).await?;

        let list_query = format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE {} ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            conditions,
            bind_count + 1,
            bind_count + 2
        );
        let mut list_q = sqlx::query_as::<_, Client>(&list_query);
        if let Some(ref pattern) = pattern {
            list_q = list_q.bind(pattern);
        }
        let clients = list_q.bind(limit).bind(offset).fetch_all(pool).await?;

        Ok((clients, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_client_default_is_noop() {
        let update = UpdateClient::default();
        assert!(update.name.is_none());
        assert!(update.email.is_none());
        assert!(update.status.is_none());
    }
}
