/// Integration tests for database migrations
///
/// These tests require a running PostgreSQL database and bail out early when
/// `DATABASE_URL` is not set.
/// Run with: cargo test --test db_migrations_tests -- --test-threads=1

use castdesk_shared::db::migrations::{ensure_database_exists, run_migrations};
use castdesk_shared::db::pool::{close_pool, create_pool, DatabaseConfig};
use std::env;

fn test_database_url() -> Option<String> {
    env::var("DATABASE_URL").ok()
}

#[tokio::test]
async fn test_ensure_database_exists() {
    let Some(url) = test_database_url() else {
        return;
    };

    // Succeeds whether the database exists or not
    ensure_database_exists(&url)
        .await
        .expect("Failed to ensure database exists");
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let Some(url) = test_database_url() else {
        return;
    };

    ensure_database_exists(&url)
        .await
        .expect("Failed to create database");

    let config = DatabaseConfig {
        url,
        ..Default::default()
    };
    let pool = create_pool(config).await.expect("Failed to create pool");

    run_migrations(&pool).await.expect("First migration run failed");
    run_migrations(&pool).await.expect("Second migration run failed");

    close_pool(pool).await;
}

#[tokio::test]
async fn test_migration_creates_all_tables() {
    let Some(url) = test_database_url() else {
        return;
    };

    ensure_database_exists(&url)
        .await
        .expect("Failed to create database");

    let config = DatabaseConfig {
        url,
        ..Default::default()
    };
    let pool = create_pool(config).await.expect("Failed to create pool");

    run_migrations(&pool).await.expect("Migrations failed");

    let expected_tables = vec![
        "users",
        "clients",
        "projects",
        "roles",
        "role_options",
        "project_notes",
        "role_notes",
        "project_favorites",
        "fact_sheets",
    ];

    for table_name in expected_tables {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT FROM information_schema.tables
                WHERE table_schema = 'public'
                AND table_name = $1
            )",
        )
        .bind(table_name)
        .fetch_one(&pool)
        .await
        .unwrap_or_else(|e| panic!("Failed to check for table {}: {}", table_name, e));

        assert!(exists, "Table '{}' should exist after migrations", table_name);
    }

    close_pool(pool).await;
}

#[tokio::test]
async fn test_migration_creates_enums() {
    let Some(url) = test_database_url() else {
        return;
    };

    ensure_database_exists(&url)
        .await
        .expect("Failed to create database");

    let config = DatabaseConfig {
        url,
        ..Default::default()
    };
    let pool = create_pool(config).await.expect("Failed to create pool");

    run_migrations(&pool).await.expect("Migrations failed");

    let expected_enums = vec!["user_role", "user_status", "favorite_kind", "fact_sheet_status"];

    for enum_name in expected_enums {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT FROM pg_type
                WHERE typname = $1
            )",
        )
        .bind(enum_name)
        .fetch_one(&pool)
        .await
        .unwrap_or_else(|e| panic!("Failed to check for enum {}: {}", enum_name, e));

        assert!(exists, "Enum '{}' should exist after migrations", enum_name);
    }

    close_pool(pool).await;
}
