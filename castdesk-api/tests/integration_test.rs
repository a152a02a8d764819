/// Integration tests for the casting API
///
/// These verify the system end-to-end against a real Postgres database:
/// registration and login, role-gated routes, client and project CRUD and
/// the fact sheet approval workflow.
///
/// Every test bails out early when `DATABASE_URL` is not set, so the suite
/// is a no-op without a database.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use castdesk_shared::models::fact_sheet::FactSheet;
use castdesk_shared::models::project::{CreateProject, Project};
use castdesk_shared::models::user::UserRole;
use common::TestContext;
use serde_json::json;
use tower::Service as _;
use uuid::Uuid;

fn json_request(method: &str, uri: &str, auth: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(value) = auth {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(value) = auth {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Test registration followed by login with the same credentials
#[tokio::test]
async fn test_register_and_login() {
    if std::env::var("DATABASE_URL").is_err() {
        return;
    }
    let ctx = TestContext::new().await.unwrap();

    let username = format!("newcomer-{}", Uuid::new_v4());
    let request = json_request(
        "POST",
        "/v1/auth/register",
        None,
        json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": common::TEST_PASSWORD,
        }),
    );

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let registered = json_body(response).await;
    assert_eq!(registered["username"], username);
    assert!(registered["access_token"].is_string());
    assert!(registered["refresh_token"].is_string());

    // Login with the email as identifier
    let request = json_request(
        "POST",
        "/v1/auth/login",
        None,
        json!({
            "identifier": format!("{}@example.com", username),
            "password": common::TEST_PASSWORD,
        }),
    );

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let logged_in = json_body(response).await;
    assert_eq!(logged_in["role"], "model");
    assert!(logged_in["access_token"].is_string());

    ctx.cleanup().await.unwrap();
}

/// Test that a wrong password gets the same 401 as an unknown identifier
#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    if std::env::var("DATABASE_URL").is_err() {
        return;
    }
    let ctx = TestContext::new().await.unwrap();

    let request = json_request(
        "POST",
        "/v1/auth/login",
        None,
        json!({
            "identifier": ctx.admin.username,
            "password": "definitely-not-the-password",
        }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = json_request(
        "POST",
        "/v1/auth/login",
        None,
        json!({
            "identifier": "nobody-here",
            "password": common::TEST_PASSWORD,
        }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    ctx.cleanup().await.unwrap();
}

/// Test that registration never grants a privileged role, whatever the body
/// claims
#[tokio::test]
async fn test_register_ignores_requested_role() {
    if std::env::var("DATABASE_URL").is_err() {
        return;
    }
    let ctx = TestContext::new().await.unwrap();

    let username = format!("climber-{}", Uuid::new_v4());
    let request = json_request(
        "POST",
        "/v1/auth/register",
        None,
        json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": common::TEST_PASSWORD,
            "role": "admin",
        }),
    );

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let registered = json_body(response).await;
    let token = registered["access_token"].as_str().unwrap().to_string();

    // The token authenticates but carries no admin rights
    let response = ctx
        .app
        .clone()
        .call(get_request("/v1/users", Some(&format!("Bearer {}", token))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // And the stored account really is a model
    let request = json_request(
        "POST",
        "/v1/auth/login",
        None,
        json!({
            "identifier": username,
            "password": common::TEST_PASSWORD,
        }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(json_body(response).await["role"], "model");

    ctx.cleanup().await.unwrap();
}

/// Test the refresh flow end to end: the exchanged pair must authenticate
#[tokio::test]
async fn test_refresh_rotates_usable_token_pair() {
    if std::env::var("DATABASE_URL").is_err() {
        return;
    }
    let ctx = TestContext::new().await.unwrap();

    let request = json_request(
        "POST",
        "/v1/auth/login",
        None,
        json!({
            "identifier": ctx.admin.username,
            "password": common::TEST_PASSWORD,
        }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let refresh_token = json_body(response).await["refresh_token"]
        .as_str()
        .unwrap()
        .to_string();

    let request = json_request(
        "POST",
        "/v1/auth/refresh",
        None,
        json!({ "refresh_token": refresh_token }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let pair = json_body(response).await;
    assert!(pair["refresh_token"].is_string());
    let new_access = pair["access_token"].as_str().unwrap().to_string();

    let response = ctx
        .app
        .clone()
        .call(get_request(
            "/v1/users",
            Some(&format!("Bearer {}", new_access)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    ctx.cleanup().await.unwrap();
}

/// Test that a model-role account cannot reach admin routes
#[tokio::test]
async fn test_model_role_is_forbidden_on_admin_routes() {
    if std::env::var("DATABASE_URL").is_err() {
        return;
    }
    let ctx = TestContext::new().await.unwrap();

    let model = common::seed_user(
        &ctx.db,
        UserRole::Model,
        &format!("talent-{}", Uuid::new_v4()),
    )
    .await
    .unwrap();
    let token = ctx.token_for(&model).unwrap();

    let response = ctx
        .app
        .clone()
        .call(get_request("/v1/users", Some(&format!("Bearer {}", token))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    ctx.cleanup().await.unwrap();
}

/// Test client create, list and update as admin
#[tokio::test]
async fn test_client_crud() {
    if std::env::var("DATABASE_URL").is_err() {
        return;
    }
    let ctx = TestContext::new().await.unwrap();

    let email = format!("client-{}@example.com", Uuid::new_v4());
    let request = json_request(
        "POST",
        "/v1/clients",
        Some(&ctx.auth_header()),
        json!({
            "name": "Acme Productions",
            "email": email,
        }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let client = json_body(response).await;
    let client_id = client["id"].as_i64().unwrap();
    assert_eq!(client["status"], "active");

    // Duplicate email conflicts
    let request = json_request(
        "POST",
        "/v1/clients",
        Some(&ctx.auth_header()),
        json!({
            "name": "Acme Again",
            "email": email,
        }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let request = json_request(
        "PUT",
        &format!("/v1/clients/{}", client_id),
        Some(&ctx.auth_header()),
        json!({ "name": "Acme Studios" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["name"], "Acme Studios");

    let response = ctx
        .app
        .clone()
        .call(get_request(
            "/v1/clients?search=Acme%20Studios",
            Some(&ctx.auth_header()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let page = json_body(response).await;
    assert!(page["meta"]["total"].as_i64().unwrap() >= 1);
    assert!(page["results"].is_array());

    ctx.cleanup().await.unwrap();
}

/// Test that creating a project also creates its pending fact sheet
#[tokio::test]
async fn test_project_create_includes_fact_sheet() {
    if std::env::var("DATABASE_URL").is_err() {
        return;
    }
    let ctx = TestContext::new().await.unwrap();
    let client = common::seed_client(&ctx).await.unwrap();

    let request = json_request(
        "POST",
        "/v1/projects",
        Some(&ctx.auth_header()),
        json!({
            "name": "Summer Campaign",
            "username": format!("proj-{}", Uuid::new_v4()),
            "client_id": client.id,
        }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = json_body(response).await;
    let project_id = created["id"].as_i64().unwrap();
    assert_eq!(created["fact_sheet"]["status"], "pending");
    assert_eq!(created["fact_sheet"]["project_id"], project_id);

    // Unknown client is a 404
    let request = json_request(
        "POST",
        "/v1/projects",
        Some(&ctx.auth_header()),
        json!({
            "name": "Ghost Campaign",
            "username": format!("proj-{}", Uuid::new_v4()),
            "client_id": 0,
        }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

/// Test that the project insert rolls back when the sheet insert fails
#[tokio::test]
async fn test_project_and_fact_sheet_insert_atomically() {
    if std::env::var("DATABASE_URL").is_err() {
        return;
    }
    let ctx = TestContext::new().await.unwrap();
    let client = common::seed_client(&ctx).await.unwrap();

    let username = format!("proj-{}", Uuid::new_v4());

    let mut tx = ctx.db.begin().await.unwrap();
    let project = Project::create(
        &mut *tx,
        CreateProject {
            name: "Half Created".to_string(),
            username: username.clone(),
            client_id: client.id,
            deadline: None,
        },
    )
    .await
    .unwrap();

    // Nonexistent client violates the sheet's foreign key
    let result = FactSheet::create_for_project(&mut *tx, project.id, 0).await;
    assert!(result.is_err());
    tx.rollback().await.unwrap();

    // The project insert did not survive the failed sheet insert
    let orphan = Project::find_by_username(&ctx.db, &username).await.unwrap();
    assert!(orphan.is_none());

    ctx.cleanup().await.unwrap();
}

/// Test the fact sheet approval workflow end to end
#[tokio::test]
async fn test_fact_sheet_workflow() {
    if std::env::var("DATABASE_URL").is_err() {
        return;
    }
    let ctx = TestContext::new().await.unwrap();
    let client = common::seed_client(&ctx).await.unwrap();

    // Project account whose username matches the project's
    let project_username = format!("proj-{}", Uuid::new_v4());
    let project_user = common::seed_user(&ctx.db, UserRole::Project, &project_username)
        .await
        .unwrap();
    let project_token = ctx.token_for(&project_user).unwrap();

    let request = json_request(
        "POST",
        "/v1/projects",
        Some(&ctx.auth_header()),
        json!({
            "name": "Winter Campaign",
            "username": project_username,
            "client_id": client.id,
        }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let project_id = json_body(response).await["id"].as_i64().unwrap();

    let sheet_uri = format!("/v1/fact-sheets/{}", project_id);
    let project_auth = format!("Bearer {}", project_token);

    // Project account edits content while pending
    let request = json_request(
        "PUT",
        &sheet_uri,
        Some(&project_auth),
        json!({ "director": "J. Doe", "location": "Berlin" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let sheet = json_body(response).await;
    assert_eq!(sheet["director"], "J. Doe");
    assert_eq!(sheet["status"], "pending");

    // Project account may not touch status
    let request = json_request(
        "PUT",
        &sheet_uri,
        Some(&project_auth),
        json!({ "status": "approved" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Admin may not edit content through this endpoint
    let request = json_request(
        "PUT",
        &sheet_uri,
        Some(&ctx.auth_header()),
        json!({ "director": "Someone Else" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Admin approves
    let request = json_request(
        "PUT",
        &sheet_uri,
        Some(&ctx.auth_header()),
        json!({ "status": "approved" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let sheet = json_body(response).await;
    assert_eq!(sheet["status"], "approved");
    assert_eq!(sheet["approved_by_id"], ctx.admin.id);
    assert!(sheet["approved_at"].is_string());

    // Approved sheets are frozen for project accounts
    let request = json_request(
        "PUT",
        &sheet_uri,
        Some(&project_auth),
        json!({ "location": "Hamburg" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // A project account cannot read another project's sheet
    let other_username = format!("proj-{}", Uuid::new_v4());
    let other_user = common::seed_user(&ctx.db, UserRole::Project, &other_username)
        .await
        .unwrap();
    let other_token = ctx.token_for(&other_user).unwrap();

    let response = ctx
        .app
        .clone()
        .call(get_request(&sheet_uri, Some(&format!("Bearer {}", other_token))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    ctx.cleanup().await.unwrap();
}

/// Test project-scoped role listing for project accounts
#[tokio::test]
async fn test_project_account_sees_only_own_roles() {
    if std::env::var("DATABASE_URL").is_err() {
        return;
    }
    let ctx = TestContext::new().await.unwrap();
    let client = common::seed_client(&ctx).await.unwrap();

    let project_username = format!("proj-{}", Uuid::new_v4());
    let project_user = common::seed_user(&ctx.db, UserRole::Project, &project_username)
        .await
        .unwrap();
    let project_token = ctx.token_for(&project_user).unwrap();

    // Two projects, one role each
    let mut project_ids = Vec::new();
    for username in [project_username.clone(), format!("proj-{}", Uuid::new_v4())] {
        let request = json_request(
            "POST",
            "/v1/projects",
            Some(&ctx.auth_header()),
            json!({
                "name": format!("Campaign {}", username),
                "username": username,
                "client_id": client.id,
            }),
        );
        let response = ctx.app.clone().call(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        project_ids.push(json_body(response).await["id"].as_i64().unwrap());
    }

    for project_id in &project_ids {
        let request = json_request(
            "POST",
            "/v1/roles",
            Some(&ctx.auth_header()),
            json!({
                "project_id": project_id,
                "name": format!("Lead {}", project_id),
            }),
        );
        let response = ctx.app.clone().call(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    // The project account only sees its own project's role, even when it
    // asks for the other project explicitly
    let response = ctx
        .app
        .clone()
        .call(get_request(
            &format!("/v1/roles?project_id={}", project_ids[1]),
            Some(&format!("Bearer {}", project_token)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let page = json_body(response).await;
    assert_eq!(page["meta"]["total"], 1);
    assert_eq!(page["results"][0]["project_id"], project_ids[0]);

    ctx.cleanup().await.unwrap();
}

/// Test favorites are scoped to their owner
#[tokio::test]
async fn test_favorites_are_owner_scoped() {
    if std::env::var("DATABASE_URL").is_err() {
        return;
    }
    let ctx = TestContext::new().await.unwrap();
    let client = common::seed_client(&ctx).await.unwrap();

    let request = json_request(
        "POST",
        "/v1/projects",
        Some(&ctx.auth_header()),
        json!({
            "name": "Favorited Campaign",
            "username": format!("proj-{}", Uuid::new_v4()),
            "client_id": client.id,
        }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    let project_id = json_body(response).await["id"].as_i64().unwrap();

    let request = json_request(
        "POST",
        "/v1/project-favorites",
        Some(&ctx.auth_header()),
        json!({ "kind": "project", "favoritable_id": project_id }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let favorite_id = json_body(response).await["id"].as_i64().unwrap();

    // Favoriting the same target twice conflicts
    let request = json_request(
        "POST",
        "/v1/project-favorites",
        Some(&ctx.auth_header()),
        json!({ "kind": "project", "favoritable_id": project_id }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Another admin does not see it
    let other_admin = common::seed_user(
        &ctx.db,
        UserRole::Admin,
        &format!("admin-{}", Uuid::new_v4()),
    )
    .await
    .unwrap();
    let other_token = ctx.token_for(&other_admin).unwrap();

    let response = ctx
        .app
        .clone()
        .call(get_request(
            &format!("/v1/project-favorites/{}", favorite_id),
            Some(&format!("Bearer {}", other_token)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Delete by target
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/v1/project-favorites/project/{}", project_id))
        .header(header::AUTHORIZATION, ctx.auth_header())
        .body(Body::empty())
        .unwrap();
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    ctx.cleanup().await.unwrap();
}
