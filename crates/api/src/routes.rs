//! Route handlers
//!
//! Handlers stay thin: extract the caller, call the adapter, translate the
//! result. The ownership-suppressed and missing cases arrive as the same
//! `None` and leave as the same 404.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};

use common::entity_identity::BusinessEntityId;
use registry::{BusinessEntity, EntityChanges, EntityDraft, MailboxSubscription};

use crate::error::{Error, Result};
use crate::server::AppState;

/// Header carrying the caller identity, injected by the upstream gateway
const USER_ID_HEADER: &str = "x-user-id";

/// Extract the caller's user id from request headers
fn require_user(headers: &HeaderMap) -> Result<String> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| Error::InvalidRequest {
            message: format!("missing {USER_ID_HEADER} header"),
        })
}

/// POST /v1/entities
pub async fn create_entity(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(draft): Json<EntityDraft>,
) -> Result<(StatusCode, Json<BusinessEntity>)> {
    let user_id = require_user(&headers)?;
    let entity = state.adapter.create(draft, &user_id).await?;
    Ok((StatusCode::CREATED, Json(entity)))
}

/// GET /v1/entities
pub async fn list_entities(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<BusinessEntity>>> {
    let user_id = require_user(&headers)?;
    let entities = state.adapter.list_for_user(&user_id).await?;
    Ok(Json(entities))
}

/// GET /v1/entities/{id}
///
/// Accepts legacy numeric and canonical string identifiers alike.
pub async fn read_entity(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<BusinessEntity>> {
    let user_id = require_user(&headers)?;

    state
        .adapter
        .read_raw(&id, &user_id)
        .await?
        .map(Json)
        .ok_or(Error::NotFound {
            resource: "entity".to_string(),
        })
}

/// PATCH /v1/entities/{id}
pub async fn update_entity(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(changes): Json<EntityChanges>,
) -> Result<Json<BusinessEntity>> {
    let user_id = require_user(&headers)?;

    let Ok(entity_ref) = common::entity_identity::EntityRef::parse(&id) else {
        // Unparseable references cannot name any stored row
        return Err(Error::NotFound {
            resource: "entity".to_string(),
        });
    };

    state
        .adapter
        .update(&entity_ref, &user_id, changes)
        .await?
        .map(Json)
        .ok_or(Error::NotFound {
            resource: "entity".to_string(),
        })
}

/// Request body for subscription creation
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSubscriptionRequest {
    pub id: String,
}

/// POST /v1/mailbox-subscriptions
pub async fn create_subscription(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateSubscriptionRequest>,
) -> Result<(StatusCode, Json<MailboxSubscription>)> {
    let user_id = require_user(&headers)?;
    let subscription = state
        .adapter
        .create_subscription(&request.id, &user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(subscription)))
}

/// Request body for linking a subscription to an entity
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkMailboxRequest {
    pub business_entity_id: String,
}

/// PUT /v1/mailbox-subscriptions/{id}/entity
///
/// No ownership check: the upstream service layer authorizes linking.
pub async fn link_mailbox(
    State(state): State<AppState>,
    Path(subscription_id): Path<String>,
    Json(request): Json<LinkMailboxRequest>,
) -> Result<StatusCode> {
    let entity_id = BusinessEntityId::parse(&request.business_entity_id).map_err(|_| {
        Error::InvalidRequest {
            message: format!(
                "business_entity_id {:?} is not a canonical entity id",
                request.business_entity_id
            ),
        }
    })?;

    state
        .adapter
        .link_mailbox(&entity_id, &subscription_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /healthz
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    state
        .adapter
        .db()
        .health_check()
        .await
        .map_err(registry::RegistryError::from)
        .map_err(Error::from)?;

    Ok(Json(HealthResponse {
        status: "ok",
        version: crate::VERSION,
    }))
}
