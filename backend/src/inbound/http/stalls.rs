//! Stall endpoints, including the assignment workflow.
//!
//! ```text
//! GET    /stalls?stableId=&status=
//! GET    /stalls/{id}
//! POST   /stalls                  (admin)
//! PUT    /stalls/{id}             (admin)
//! DELETE /stalls/{id}             (admin)
//! POST   /stalls/{id}/assign      (admin) {"horseId": "..."}
//! POST   /stalls/{id}/release     (admin)
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, HorseId, Stall, StallDraft, StallFilter, StallId, StallStatus};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{AdminOnly, Authenticated};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_id, parse_optional_choice, parse_optional_id, require,
};

const ID: FieldName = FieldName::new("id");
const STABLE_ID: FieldName = FieldName::new("stableId");
const STATUS: FieldName = FieldName::new("status");

#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct StallRequest {
    #[schema(example = "A1")]
    pub number: String,
    pub name: Option<String>,
    #[schema(example = "large")]
    pub size: String,
    pub stable_id: Option<String>,
    /// `available` or `maintenance`; occupancy is set through assignment.
    pub status: Option<String>,
}

impl StallRequest {
    fn into_draft(self) -> Result<StallDraft, Error> {
        Ok(StallDraft {
            stable_id: parse_optional_id(self.stable_id.as_deref(), STABLE_ID)?,
            status: parse_optional_choice(self.status.as_deref(), STATUS)?,
            number: self.number,
            name: self.name,
            size: self.size,
        })
    }
}

#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub horse_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StallResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub number: String,
    pub name: Option<String>,
    pub size: String,
    pub stable_id: Option<String>,
    #[schema(example = "available")]
    pub status: String,
    pub horse_id: Option<String>,
    /// Mirrors `status == occupied`.
    pub occupied: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Stall> for StallResponse {
    fn from(stall: Stall) -> Self {
        Self {
            id: stall.id.to_string(),
            occupied: stall.is_occupied(),
            number: stall.spec.number().to_owned(),
            name: stall.spec.name().map(str::to_owned),
            size: stall.spec.size().to_owned(),
            stable_id: stall.spec.stable_id().map(|id| id.to_string()),
            status: stall.status.as_str().to_owned(),
            horse_id: stall.horse_id.map(|id| id.to_string()),
            created_at: stall.created_at,
            updated_at: stall.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StallsEnvelope {
    pub stalls: Vec<StallResponse>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StallEnvelope {
    pub stall: StallResponse,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StallChanged {
    pub message: String,
    pub stall: StallResponse,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StallDeleted {
    pub message: String,
    pub deleted_stall: StallResponse,
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StallQuery {
    pub stable_id: Option<String>,
    pub status: Option<String>,
}

impl StallQuery {
    fn into_filter(self) -> Result<StallFilter, Error> {
        Ok(StallFilter {
            stable_id: parse_optional_id(self.stable_id.as_deref(), STABLE_ID)?,
            status: parse_optional_choice::<StallStatus>(self.status.as_deref(), STATUS)?,
        })
    }
}

fn changed(message: &str, stall: Stall) -> StallChanged {
    StallChanged {
        message: message.to_owned(),
        stall: stall.into(),
    }
}

#[utoipa::path(
    get,
    path = "/stalls",
    params(StallQuery),
    responses(
        (status = 200, description = "Stalls", body = StallsEnvelope),
        (status = 400, description = "Invalid filter", body = ErrorSchema)
    ),
    tags = ["stalls"],
    operation_id = "listStalls"
)]
#[get("")]
pub async fn list_stalls(
    state: web::Data<HttpState>,
    _user: Authenticated,
    query: web::Query<StallQuery>,
) -> ApiResult<web::Json<StallsEnvelope>> {
    let stalls = state.stalls.list(query.into_inner().into_filter()?).await?;
    Ok(web::Json(StallsEnvelope {
        stalls: stalls.into_iter().map(StallResponse::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/stalls/{id}",
    params(("id" = String, Path, description = "Stall id")),
    responses(
        (status = 200, description = "Stall", body = StallEnvelope),
        (status = 404, description = "Stall not found", body = ErrorSchema)
    ),
    tags = ["stalls"],
    operation_id = "getStall"
)]
#[get("/{id}")]
pub async fn get_stall(
    state: web::Data<HttpState>,
    _user: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<StallEnvelope>> {
    let id: StallId = parse_id(&path, ID)?;
    Ok(web::Json(StallEnvelope {
        stall: state.stalls.get(id).await?.into(),
    }))
}

/// Create a stall, optionally inside a stable with free capacity.
#[utoipa::path(
    post,
    path = "/stalls",
    request_body = StallRequest,
    responses(
        (status = 201, description = "Stall created", body = StallChanged),
        (status = 400, description = "Invalid stall", body = ErrorSchema),
        (status = 403, description = "Admin only", body = ErrorSchema),
        (status = 404, description = "Stable not found", body = ErrorSchema),
        (status = 409, description = "Stable full or number taken", body = ErrorSchema)
    ),
    tags = ["stalls"],
    operation_id = "createStall"
)]
#[post("")]
pub async fn create_stall(
    state: web::Data<HttpState>,
    _admin: AdminOnly,
    payload: web::Json<StallRequest>,
) -> ApiResult<HttpResponse> {
    let stall = state.stalls.create(payload.into_inner().into_draft()?).await?;
    Ok(HttpResponse::Created().json(changed("Stall successfully created!", stall)))
}

#[utoipa::path(
    put,
    path = "/stalls/{id}",
    params(("id" = String, Path, description = "Stall id")),
    request_body = StallRequest,
    responses(
        (status = 200, description = "Stall updated", body = StallChanged),
        (status = 400, description = "Invalid stall or status", body = ErrorSchema),
        (status = 404, description = "Stall not found", body = ErrorSchema),
        (status = 409, description = "Occupied stall cannot enter maintenance", body = ErrorSchema)
    ),
    tags = ["stalls"],
    operation_id = "updateStall"
)]
#[put("/{id}")]
pub async fn update_stall(
    state: web::Data<HttpState>,
    _admin: AdminOnly,
    path: web::Path<String>,
    payload: web::Json<StallRequest>,
) -> ApiResult<web::Json<StallChanged>> {
    let id: StallId = parse_id(&path, ID)?;
    let stall = state
        .stalls
        .update(id, payload.into_inner().into_draft()?)
        .await?;
    Ok(web::Json(changed("Stall successfully updated!", stall)))
}

#[utoipa::path(
    delete,
    path = "/stalls/{id}",
    params(("id" = String, Path, description = "Stall id")),
    responses(
        (status = 200, description = "Stall deleted", body = StallDeleted),
        (status = 404, description = "Stall not found", body = ErrorSchema),
        (status = 409, description = "Stall is occupied", body = ErrorSchema)
    ),
    tags = ["stalls"],
    operation_id = "deleteStall"
)]
#[delete("/{id}")]
pub async fn delete_stall(
    state: web::Data<HttpState>,
    _admin: AdminOnly,
    path: web::Path<String>,
) -> ApiResult<web::Json<StallDeleted>> {
    let id: StallId = parse_id(&path, ID)?;
    let stall = state.stalls.delete(id).await?;
    Ok(web::Json(StallDeleted {
        message: "Stall successfully deleted!".to_owned(),
        deleted_stall: stall.into(),
    }))
}

/// Put a horse into a stall, releasing any stall it held before.
#[utoipa::path(
    post,
    path = "/stalls/{id}/assign",
    params(("id" = String, Path, description = "Stall id")),
    request_body = AssignRequest,
    responses(
        (status = 200, description = "Horse assigned", body = StallChanged),
        (status = 404, description = "Stall or horse not found", body = ErrorSchema),
        (status = 409, description = "Stall occupied or under maintenance", body = ErrorSchema)
    ),
    tags = ["stalls"],
    operation_id = "assignStall"
)]
#[post("/{id}/assign")]
pub async fn assign_stall(
    state: web::Data<HttpState>,
    _admin: AdminOnly,
    path: web::Path<String>,
    payload: web::Json<AssignRequest>,
) -> ApiResult<web::Json<StallChanged>> {
    let id: StallId = parse_id(&path, ID)?;
    let horse_field = FieldName::new("horseId");
    let raw = require(payload.into_inner().horse_id, horse_field)?;
    let horse_id: HorseId = parse_id(&raw, horse_field)?;
    let stall = state.stalls.assign(id, horse_id).await?;
    Ok(web::Json(changed("Horse assigned to stall", stall)))
}

#[utoipa::path(
    post,
    path = "/stalls/{id}/release",
    params(("id" = String, Path, description = "Stall id")),
    responses(
        (status = 200, description = "Stall released", body = StallChanged),
        (status = 404, description = "Stall not found", body = ErrorSchema)
    ),
    tags = ["stalls"],
    operation_id = "releaseStall"
)]
#[post("/{id}/release")]
pub async fn release_stall(
    state: web::Data<HttpState>,
    _admin: AdminOnly,
    path: web::Path<String>,
) -> ApiResult<web::Json<StallChanged>> {
    let id: StallId = parse_id(&path, ID)?;
    let stall = state.stalls.release(id).await?;
    Ok(web::Json(changed("Stall released", stall)))
}

#[cfg(test)]
#[path = "stalls_tests.rs"]
mod tests;
