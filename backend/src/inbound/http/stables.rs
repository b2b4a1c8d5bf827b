//! Stable endpoints.
//!
//! ```text
//! GET    /stables
//! GET    /stables/{id}
//! POST   /stables        (admin)
//! PUT    /stables/{id}   (admin)
//! DELETE /stables/{id}   (admin)
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, Stable, StableDraft, StableId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{AdminOnly, Authenticated};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, parse_optional_id, require};

const ID: FieldName = FieldName::new("id");

#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct StableRequest {
    #[schema(example = "Stajnia Wschodnia")]
    pub full_name: String,
    pub location: Option<String>,
    #[schema(example = 12)]
    pub capacity: Option<i64>,
    pub description: Option<String>,
    pub stall_size: Option<String>,
    pub managed_by: Option<String>,
}

impl StableRequest {
    fn into_draft(self) -> Result<StableDraft, Error> {
        Ok(StableDraft {
            capacity: require(self.capacity, FieldName::new("capacity"))?,
            managed_by: parse_optional_id(self.managed_by.as_deref(), FieldName::new("managedBy"))?,
            full_name: self.full_name,
            location: self.location,
            description: self.description,
            stall_size: self.stall_size,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StableResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub full_name: String,
    pub location: Option<String>,
    pub capacity: u32,
    pub description: Option<String>,
    pub stall_size: Option<String>,
    pub managed_by: Option<String>,
    /// Ids of the stalls belonging to the stable.
    pub stall_array: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Stable> for StableResponse {
    fn from(stable: Stable) -> Self {
        let profile = &stable.profile;
        Self {
            id: stable.id.to_string(),
            full_name: profile.full_name().to_owned(),
            location: profile.location().map(str::to_owned),
            capacity: profile.capacity(),
            description: profile.description().map(str::to_owned),
            stall_size: profile.stall_size().map(str::to_owned),
            managed_by: profile.managed_by().map(|id| id.to_string()),
            stall_array: stable.stall_ids.iter().map(ToString::to_string).collect(),
            created_at: stable.created_at,
            updated_at: stable.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StablesEnvelope {
    pub stables: Vec<StableResponse>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StableEnvelope {
    pub stable: StableResponse,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StableChanged {
    pub message: String,
    pub stable: StableResponse,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StableDeleted {
    pub message: String,
    pub deleted_stable: StableResponse,
}

#[utoipa::path(
    get,
    path = "/stables",
    responses((status = 200, description = "Stables", body = StablesEnvelope)),
    tags = ["stables"],
    operation_id = "listStables"
)]
#[get("")]
pub async fn list_stables(
    state: web::Data<HttpState>,
    _user: Authenticated,
) -> ApiResult<web::Json<StablesEnvelope>> {
    let stables = state.stables.list().await?;
    Ok(web::Json(StablesEnvelope {
        stables: stables.into_iter().map(StableResponse::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/stables/{id}",
    params(("id" = String, Path, description = "Stable id")),
    responses(
        (status = 200, description = "Stable", body = StableEnvelope),
        (status = 404, description = "Stable not found", body = ErrorSchema)
    ),
    tags = ["stables"],
    operation_id = "getStable"
)]
#[get("/{id}")]
pub async fn get_stable(
    state: web::Data<HttpState>,
    _user: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<StableEnvelope>> {
    let id: StableId = parse_id(&path, ID)?;
    Ok(web::Json(StableEnvelope {
        stable: state.stables.get(id).await?.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/stables",
    request_body = StableRequest,
    responses(
        (status = 201, description = "Stable created", body = StableChanged),
        (status = 400, description = "Invalid stable", body = ErrorSchema),
        (status = 409, description = "Name already taken", body = ErrorSchema)
    ),
    tags = ["stables"],
    operation_id = "createStable"
)]
#[post("")]
pub async fn create_stable(
    state: web::Data<HttpState>,
    _admin: AdminOnly,
    payload: web::Json<StableRequest>,
) -> ApiResult<HttpResponse> {
    let stable = state.stables.create(payload.into_inner().into_draft()?).await?;
    Ok(HttpResponse::Created().json(StableChanged {
        message: "Stable created successfully!".to_owned(),
        stable: stable.into(),
    }))
}

/// Replace a stable's fields; capacity may not drop below its stall count.
#[utoipa::path(
    put,
    path = "/stables/{id}",
    params(("id" = String, Path, description = "Stable id")),
    request_body = StableRequest,
    responses(
        (status = 200, description = "Stable updated", body = StableChanged),
        (status = 404, description = "Stable not found", body = ErrorSchema),
        (status = 409, description = "Capacity below stall count or name taken", body = ErrorSchema)
    ),
    tags = ["stables"],
    operation_id = "updateStable"
)]
#[put("/{id}")]
pub async fn update_stable(
    state: web::Data<HttpState>,
    _admin: AdminOnly,
    path: web::Path<String>,
    payload: web::Json<StableRequest>,
) -> ApiResult<web::Json<StableChanged>> {
    let id: StableId = parse_id(&path, ID)?;
    let stable = state
        .stables
        .update(id, payload.into_inner().into_draft()?)
        .await?;
    Ok(web::Json(StableChanged {
        message: "Stable updated successfully!".to_owned(),
        stable: stable.into(),
    }))
}

/// Delete a stable; its stalls are detached, not deleted.
#[utoipa::path(
    delete,
    path = "/stables/{id}",
    params(("id" = String, Path, description = "Stable id")),
    responses(
        (status = 200, description = "Stable deleted", body = StableDeleted),
        (status = 404, description = "Stable not found", body = ErrorSchema)
    ),
    tags = ["stables"],
    operation_id = "deleteStable"
)]
#[delete("/{id}")]
pub async fn delete_stable(
    state: web::Data<HttpState>,
    _admin: AdminOnly,
    path: web::Path<String>,
) -> ApiResult<web::Json<StableDeleted>> {
    let id: StableId = parse_id(&path, ID)?;
    let stable = state.stables.delete(id).await?;
    Ok(web::Json(StableDeleted {
        message: "Stable deleted successfully!".to_owned(),
        deleted_stable: stable.into(),
    }))
}
