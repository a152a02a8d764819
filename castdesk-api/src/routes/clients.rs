/// Client endpoints
///
/// # Endpoints
///
/// - `POST /v1/clients` - Create a client (admin)
/// - `GET /v1/clients` - List clients (admin)
/// - `PUT /v1/clients/:id` - Update a client (admin)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    pagination::{Paginated, PaginationQuery},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use castdesk_shared::models::client::{Client, CreateClient, UpdateClient};
use serde::Deserialize;
use validator::Validate;

/// Create client request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateClientRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub address: Option<String>,
}

/// Query parameters for the client list
#[derive(Debug, Default, Deserialize)]
pub struct ListClientsQuery {
    pub search: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// Creates a client
pub async fn create_client(
    State(state): State<AppState>,
    Json(req): Json<CreateClientRequest>,
) -> ApiResult<(StatusCode, Json<Client>)> {
    req.validate().map_err(ApiError::from_validation)?;

    let client = Client::create(
        &state.db,
        CreateClient {
            name: req.name,
            phone: req.phone,
            email: req.email,
            address: req.address,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(client)))
}

/// Lists clients with optional search
pub async fn list_clients(
    State(state): State<AppState>,
    Query(query): Query<ListClientsQuery>,
) -> ApiResult<Json<Paginated<Client>>> {
    let pagination = PaginationQuery {
        page: query.page,
        size: query.size,
    };

    let (clients, total) = Client::list(
        &state.db,
        query.search.as_deref(),
        pagination.limit(),
        pagination.offset(),
    )
    .await?;

    Ok(Json(Paginated::new(clients, &pagination, total)))
}

/// Updates a client
pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateClient>,
) -> ApiResult<Json<Client>> {
    let client = Client::update(&state.db, id, req)
        .await?
        .ok_or_else(|| ApiError::NotFound("Client not found".to_string()))?;

    Ok(Json(client))
}
