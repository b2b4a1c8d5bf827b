//! Staff endpoints. Reads need a token, writes need an administrator.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Staff, StaffDraft, StaffId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{AdminOnly, Authenticated};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

const ID: FieldName = FieldName::new("id");

#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct StaffRequest {
    pub name: String,
    #[schema(example = "+48 600-100-200")]
    pub phone: String,
    pub email: String,
    #[schema(example = "groom")]
    pub role: String,
    pub specialities: Vec<String>,
    pub schedule: Vec<String>,
}

impl From<StaffRequest> for StaffDraft {
    fn from(value: StaffRequest) -> Self {
        Self {
            name: value.name,
            phone: value.phone,
            email: value.email,
            role: value.role,
            specialities: value.specialities,
            schedule: value.schedule,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub role: String,
    pub specialities: Vec<String>,
    pub schedule: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Staff> for StaffResponse {
    fn from(staff: Staff) -> Self {
        let profile = &staff.profile;
        Self {
            id: staff.id.to_string(),
            name: profile.name().to_owned(),
            phone: profile.phone().as_ref().to_owned(),
            email: profile.email().to_string(),
            role: profile.role().to_owned(),
            specialities: profile.specialities().to_vec(),
            schedule: profile.schedule().to_vec(),
            created_at: staff.created_at,
            updated_at: staff.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffListEnvelope {
    pub staff_members: Vec<StaffResponse>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffEnvelope {
    pub staff_member: StaffResponse,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffChanged {
    pub message: String,
    pub staff_member: StaffResponse,
}

fn changed(message: &str, staff: Staff) -> StaffChanged {
    StaffChanged {
        message: message.to_owned(),
        staff_member: staff.into(),
    }
}

#[utoipa::path(
    get,
    path = "/staff",
    responses((status = 200, description = "Staff members", body = StaffListEnvelope)),
    tags = ["staff"],
    operation_id = "listStaff"
)]
#[get("")]
pub async fn list_staff(
    state: web::Data<HttpState>,
    _user: Authenticated,
) -> ApiResult<web::Json<StaffListEnvelope>> {
    let staff = state.staff.list().await?;
    Ok(web::Json(StaffListEnvelope {
        staff_members: staff.into_iter().map(StaffResponse::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/staff/{id}",
    params(("id" = String, Path, description = "Staff member id")),
    responses(
        (status = 200, description = "Staff member", body = StaffEnvelope),
        (status = 404, description = "Staff member not found", body = ErrorSchema)
    ),
    tags = ["staff"],
    operation_id = "getStaff"
)]
#[get("/{id}")]
pub async fn get_staff(
    state: web::Data<HttpState>,
    _user: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<StaffEnvelope>> {
    let id: StaffId = parse_id(&path, ID)?;
    Ok(web::Json(StaffEnvelope {
        staff_member: state.staff.get(id).await?.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/staff",
    request_body = StaffRequest,
    responses(
        (status = 201, description = "Staff member created", body = StaffChanged),
        (status = 400, description = "Invalid staff member", body = ErrorSchema),
        (status = 409, description = "E-mail already used", body = ErrorSchema)
    ),
    tags = ["staff"],
    operation_id = "createStaff"
)]
#[post("")]
pub async fn create_staff(
    state: web::Data<HttpState>,
    _admin: AdminOnly,
    payload: web::Json<StaffRequest>,
) -> ApiResult<HttpResponse> {
    let staff = state.staff.create(payload.into_inner().into()).await?;
    Ok(HttpResponse::Created().json(changed("Staff member was successfully created!", staff)))
}

#[utoipa::path(
    put,
    path = "/staff/{id}",
    params(("id" = String, Path, description = "Staff member id")),
    request_body = StaffRequest,
    responses(
        (status = 200, description = "Staff member updated", body = StaffChanged),
        (status = 404, description = "Staff member not found", body = ErrorSchema),
        (status = 409, description = "E-mail already used", body = ErrorSchema)
    ),
    tags = ["staff"],
    operation_id = "updateStaff"
)]
#[put("/{id}")]
pub async fn update_staff(
    state: web::Data<HttpState>,
    _admin: AdminOnly,
    path: web::Path<String>,
    payload: web::Json<StaffRequest>,
) -> ApiResult<web::Json<StaffChanged>> {
    let id: StaffId = parse_id(&path, ID)?;
    let staff = state.staff.update(id, payload.into_inner().into()).await?;
    Ok(web::Json(changed("Staff member was successfully updated!", staff)))
}

#[utoipa::path(
    delete,
    path = "/staff/{id}",
    params(("id" = String, Path, description = "Staff member id")),
    responses(
        (status = 200, description = "Staff member deleted", body = StaffChanged),
        (status = 404, description = "Staff member not found", body = ErrorSchema)
    ),
    tags = ["staff"],
    operation_id = "deleteStaff"
)]
#[delete("/{id}")]
pub async fn delete_staff(
    state: web::Data<HttpState>,
    _admin: AdminOnly,
    path: web::Path<String>,
) -> ApiResult<web::Json<StaffChanged>> {
    let id: StaffId = parse_id(&path, ID)?;
    let staff = state.staff.delete(id).await?;
    Ok(web::Json(changed("Staff member was successfully deleted!", staff)))
}
