//! Horse activity log endpoints.
//!
//! ```text
//! GET    /horseActivities?horseId=
//! GET    /horseActivities/{id}
//! POST   /horseActivities
//! PUT    /horseActivities/{id}
//! DELETE /horseActivities/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ActivityDraft, Error, HorseActivity, HorseActivityId, HorseId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_date, parse_id, parse_optional_id, parse_optional_rfc3339_timestamp, require,
};

const ID: FieldName = FieldName::new("id");
const HORSE_ID: FieldName = FieldName::new("horseId");
const DATE: FieldName = FieldName::new("date");

#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityRequest {
    pub horse_id: Option<String>,
    /// RFC 3339 timestamp, or a bare date for all-day entries.
    pub date: Option<String>,
    pub duration_minutes: Option<i64>,
    pub all_day: bool,
    /// Free-form kind such as `feeding`, `training` or `vet`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub notes: Option<String>,
}

/// Timestamps pass through; bare dates become midnight UTC.
fn activity_date(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, Error> {
    match parse_optional_rfc3339_timestamp(raw, DATE) {
        Ok(stamp) => Ok(stamp),
        Err(err) => match raw {
            Some(value) if value.trim().len() <= 10 => parse_date(value, DATE)
                .map(|date| Some(date.and_time(NaiveTime::MIN).and_utc())),
            _ => Err(err),
        },
    }
}

impl ActivityRequest {
    fn into_parts(self) -> Result<(HorseId, ActivityDraft), Error> {
        let raw_horse = require(self.horse_id, HORSE_ID)?;
        let horse_id = parse_id(&raw_horse, HORSE_ID)?;
        let draft = ActivityDraft {
            date: activity_date(self.date.as_deref())?,
            duration_minutes: self.duration_minutes,
            all_day: self.all_day,
            kind: self.kind,
            notes: self.notes,
        };
        Ok((horse_id, draft))
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub horse_id: String,
    pub date: Option<DateTime<Utc>>,
    pub duration_minutes: Option<u32>,
    pub all_day: bool,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<HorseActivity> for ActivityResponse {
    fn from(activity: HorseActivity) -> Self {
        let entry = &activity.entry;
        Self {
            id: activity.id.to_string(),
            horse_id: entry.horse_id().to_string(),
            date: entry.date(),
            duration_minutes: entry.duration_minutes(),
            all_day: entry.all_day(),
            kind: entry.kind().map(str::to_owned),
            notes: entry.notes().map(str::to_owned),
            created_at: activity.created_at,
            updated_at: activity.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivitiesEnvelope {
    pub horse_activities: Vec<ActivityResponse>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEnvelope {
    pub horse_activity: ActivityResponse,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityCreated {
    pub message: String,
    pub horse_activity: ActivityResponse,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityUpdated {
    pub message: String,
    pub updated_horse_activity: ActivityResponse,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDeleted {
    pub message: String,
    pub deleted_horse_activity: ActivityResponse,
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ActivityQuery {
    pub horse_id: Option<String>,
}

#[utoipa::path(
    get,
    path = "/horseActivities",
    params(ActivityQuery),
    responses(
        (status = 200, description = "Activities, newest first", body = ActivitiesEnvelope),
        (status = 400, description = "Invalid horse id", body = ErrorSchema)
    ),
    tags = ["horseActivities"],
    operation_id = "listHorseActivities"
)]
#[get("")]
pub async fn list_activities(
    state: web::Data<HttpState>,
    _user: Authenticated,
    query: web::Query<ActivityQuery>,
) -> ApiResult<web::Json<ActivitiesEnvelope>> {
    let horse_id = parse_optional_id(query.horse_id.as_deref(), HORSE_ID)?;
    let activities = state.activities.list(horse_id).await?;
    Ok(web::Json(ActivitiesEnvelope {
        horse_activities: activities.into_iter().map(ActivityResponse::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/horseActivities/{id}",
    params(("id" = String, Path, description = "Activity id")),
    responses(
        (status = 200, description = "Activity", body = ActivityEnvelope),
        (status = 404, description = "Activity not found", body = ErrorSchema)
    ),
    tags = ["horseActivities"],
    operation_id = "getHorseActivity"
)]
#[get("/{id}")]
pub async fn get_activity(
    state: web::Data<HttpState>,
    _user: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<ActivityEnvelope>> {
    let id: HorseActivityId = parse_id(&path, ID)?;
    Ok(web::Json(ActivityEnvelope {
        horse_activity: state.activities.get(id).await?.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/horseActivities",
    request_body = ActivityRequest,
    responses(
        (status = 201, description = "Activity logged", body = ActivityCreated),
        (status = 400, description = "Invalid activity", body = ErrorSchema),
        (status = 404, description = "Horse not found", body = ErrorSchema)
    ),
    tags = ["horseActivities"],
    operation_id = "createHorseActivity"
)]
#[post("")]
pub async fn create_activity(
    state: web::Data<HttpState>,
    _user: Authenticated,
    payload: web::Json<ActivityRequest>,
) -> ApiResult<HttpResponse> {
    let (horse_id, draft) = payload.into_inner().into_parts()?;
    let activity = state.activities.create(horse_id, draft).await?;
    Ok(HttpResponse::Created().json(ActivityCreated {
        message: "Horse activity created successfully!".to_owned(),
        horse_activity: activity.into(),
    }))
}

#[utoipa::path(
    put,
    path = "/horseActivities/{id}",
    params(("id" = String, Path, description = "Activity id")),
    request_body = ActivityRequest,
    responses(
        (status = 200, description = "Activity updated", body = ActivityUpdated),
        (status = 404, description = "Activity or horse not found", body = ErrorSchema)
    ),
    tags = ["horseActivities"],
    operation_id = "updateHorseActivity"
)]
#[put("/{id}")]
pub async fn update_activity(
    state: web::Data<HttpState>,
    _user: Authenticated,
    path: web::Path<String>,
    payload: web::Json<ActivityRequest>,
) -> ApiResult<web::Json<ActivityUpdated>> {
    let id: HorseActivityId = parse_id(&path, ID)?;
    let (horse_id, draft) = payload.into_inner().into_parts()?;
    let activity = state.activities.update(id, horse_id, draft).await?;
    Ok(web::Json(ActivityUpdated {
        message: "Horse activity updated successfully!".to_owned(),
        updated_horse_activity: activity.into(),
    }))
}

#[utoipa::path(
    delete,
    path = "/horseActivities/{id}",
    params(("id" = String, Path, description = "Activity id")),
    responses(
        (status = 200, description = "Activity deleted", body = ActivityDeleted),
        (status = 404, description = "Activity not found", body = ErrorSchema)
    ),
    tags = ["horseActivities"],
    operation_id = "deleteHorseActivity"
)]
#[delete("/{id}")]
pub async fn delete_activity(
    state: web::Data<HttpState>,
    _user: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<ActivityDeleted>> {
    let id: HorseActivityId = parse_id(&path, ID)?;
    let activity = state.activities.delete(id).await?;
    Ok(web::Json(ActivityDeleted {
        message: "Horse activity deleted successfully!".to_owned(),
        deleted_horse_activity: activity.into(),
    }))
}
