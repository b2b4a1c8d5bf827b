//! Horse endpoints.
//!
//! ```text
//! GET    /horses?ownerEmail=
//! GET    /horses/{id}
//! POST   /horses
//! PUT    /horses/{id}
//! DELETE /horses/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Email, Error, Horse, HorseDraft, HorseFilter, HorseId, StallPlacement};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, parse_optional_date};

const ID: FieldName = FieldName::new("id");

/// Editable horse fields for create and full replacement.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct HorseRequest {
    #[schema(example = "Bella")]
    pub name: String,
    pub age: Option<i64>,
    pub breed: Option<String>,
    pub owner: Option<String>,
    #[schema(example = "owner@example.com")]
    pub owner_email: String,
    /// `YYYY-MM-DD`.
    pub birth_date: Option<String>,
    pub notes: Option<String>,
}

impl HorseRequest {
    fn into_draft(self) -> Result<HorseDraft, Error> {
        let birth_date =
            parse_optional_date(self.birth_date.as_deref(), FieldName::new("birthDate"))?;
        Ok(HorseDraft {
            name: self.name,
            age: self.age,
            breed: self.breed,
            owner: self.owner,
            owner_email: self.owner_email,
            birth_date,
            notes: self.notes,
        })
    }
}

/// Stall currently holding a horse.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StallSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub number: String,
    pub name: Option<String>,
    pub size: String,
    pub stable_id: Option<String>,
}

impl From<StallPlacement> for StallSummary {
    fn from(placement: StallPlacement) -> Self {
        Self {
            id: placement.stall_id.to_string(),
            number: placement.number,
            name: placement.name,
            size: placement.size,
            stable_id: placement.stable_id.map(|id| id.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HorseResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub age: Option<u8>,
    pub breed: Option<String>,
    pub owner: Option<String>,
    pub owner_email: String,
    pub birth_date: Option<String>,
    pub notes: Option<String>,
    pub stall_id: Option<String>,
    pub stall: Option<StallSummary>,
    /// `waiting for stall` or `stall granted`.
    #[schema(example = "stall granted")]
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Horse> for HorseResponse {
    fn from(horse: Horse) -> Self {
        let status = horse.status().as_str().to_owned();
        let stall_id = horse.stall_id().map(|id| id.to_string());
        let profile = &horse.profile;
        Self {
            id: horse.id.to_string(),
            name: profile.name().to_owned(),
            age: profile.age(),
            breed: profile.breed().map(str::to_owned),
            owner: profile.owner().map(str::to_owned),
            owner_email: profile.owner_email().to_string(),
            birth_date: profile
                .birth_date()
                .map(|date| date.format("%Y-%m-%d").to_string()),
            notes: profile.notes().map(str::to_owned),
            stall_id,
            stall: horse.placement.map(StallSummary::from),
            status,
            created_at: horse.created_at,
            updated_at: horse.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HorsesEnvelope {
    pub horses: Vec<HorseResponse>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HorseEnvelope {
    pub horse: HorseResponse,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HorseChanged {
    pub message: String,
    pub horse: HorseResponse,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HorseDeleted {
    pub message: String,
    pub deleted_horse: HorseResponse,
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct HorseQuery {
    pub owner_email: Option<String>,
}

impl HorseQuery {
    fn into_filter(self) -> Result<HorseFilter, Error> {
        let owner_email = self
            .owner_email
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| Email::new(&raw).map_err(|err| Error::invalid_field("ownerEmail", err.to_string())))
            .transpose()?;
        Ok(HorseFilter { owner_email })
    }
}

/// List horses together with their current stall.
#[utoipa::path(
    get,
    path = "/horses",
    params(HorseQuery),
    responses(
        (status = 200, description = "Horses", body = HorsesEnvelope),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 401, description = "Missing token", body = ErrorSchema)
    ),
    tags = ["horses"],
    operation_id = "listHorses"
)]
#[get("")]
pub async fn list_horses(
    state: web::Data<HttpState>,
    _user: Authenticated,
    query: web::Query<HorseQuery>,
) -> ApiResult<web::Json<HorsesEnvelope>> {
    let filter = query.into_inner().into_filter()?;
    let horses = state.horses.list(filter).await?;
    Ok(web::Json(HorsesEnvelope {
        horses: horses.into_iter().map(HorseResponse::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/horses/{id}",
    params(("id" = String, Path, description = "Horse id")),
    responses(
        (status = 200, description = "Horse", body = HorseEnvelope),
        (status = 404, description = "Horse not found", body = ErrorSchema)
    ),
    tags = ["horses"],
    operation_id = "getHorse"
)]
#[get("/{id}")]
pub async fn get_horse(
    state: web::Data<HttpState>,
    _user: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<HorseEnvelope>> {
    let id: HorseId = parse_id(&path, ID)?;
    let horse = state.horses.get(id).await?;
    Ok(web::Json(HorseEnvelope {
        horse: horse.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/horses",
    request_body = HorseRequest,
    responses(
        (status = 201, description = "Horse created", body = HorseChanged),
        (status = 400, description = "Invalid horse", body = ErrorSchema)
    ),
    tags = ["horses"],
    operation_id = "createHorse"
)]
#[post("")]
pub async fn create_horse(
    state: web::Data<HttpState>,
    _user: Authenticated,
    payload: web::Json<HorseRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft()?;
    let horse = state.horses.create(draft).await?;
    Ok(HttpResponse::Created().json(HorseChanged {
        message: "Horse was successfully created!".to_owned(),
        horse: horse.into(),
    }))
}

/// Replace a horse's editable fields.
#[utoipa::path(
    put,
    path = "/horses/{id}",
    params(("id" = String, Path, description = "Horse id")),
    request_body = HorseRequest,
    responses(
        (status = 200, description = "Horse updated", body = HorseChanged),
        (status = 400, description = "Invalid horse", body = ErrorSchema),
        (status = 404, description = "Horse not found", body = ErrorSchema)
    ),
    tags = ["horses"],
    operation_id = "updateHorse"
)]
#[put("/{id}")]
pub async fn update_horse(
    state: web::Data<HttpState>,
    _user: Authenticated,
    path: web::Path<String>,
    payload: web::Json<HorseRequest>,
) -> ApiResult<web::Json<HorseChanged>> {
    let id: HorseId = parse_id(&path, ID)?;
    let draft = payload.into_inner().into_draft()?;
    let horse = state.horses.update(id, draft).await?;
    Ok(web::Json(HorseChanged {
        message: "Horse was successfully updated!".to_owned(),
        horse: horse.into(),
    }))
}

/// Delete a horse, releasing its stall first.
#[utoipa::path(
    delete,
    path = "/horses/{id}",
    params(("id" = String, Path, description = "Horse id")),
    responses(
        (status = 200, description = "Horse deleted", body = HorseDeleted),
        (status = 404, description = "Horse not found", body = ErrorSchema)
    ),
    tags = ["horses"],
    operation_id = "deleteHorse"
)]
#[delete("/{id}")]
pub async fn delete_horse(
    state: web::Data<HttpState>,
    _user: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<HorseDeleted>> {
    let id: HorseId = parse_id(&path, ID)?;
    let horse = state.horses.delete(id).await?;
    Ok(web::Json(HorseDeleted {
        message: "Horse was successfully deleted!".to_owned(),
        deleted_horse: horse.into(),
    }))
}

#[cfg(test)]
#[path = "horses_tests.rs"]
mod tests;
