//! Expense and income endpoints.
//!
//! ```text
//! GET    /expenses?type=&settled=&relatedModel=&from=&to=
//! GET    /expenses/summary?...same filters
//! GET    /expenses/{id}
//! POST   /expenses         (admin)
//! PUT    /expenses/{id}    (admin)
//! DELETE /expenses/{id}    (admin)
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Amount, Error, Expense, ExpenseDraft, ExpenseFilter, ExpenseId, ExpenseKind, ExpenseSummary,
    RelatedEntity, RelatedModel,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{AdminOnly, Authenticated};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_choice, parse_date, parse_id, parse_optional_choice, parse_optional_date,
    require,
};

const ID: FieldName = FieldName::new("id");
const KIND: FieldName = FieldName::new("type");
const RELATED_TO: FieldName = FieldName::new("relatedTo");
const RELATED_MODEL: FieldName = FieldName::new("relatedModel");

#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ExpenseRequest {
    #[schema(example = "2025-06-09")]
    pub date: Option<String>,
    /// `expense` or `income`.
    #[serde(rename = "type")]
    #[schema(example = "expense")]
    pub kind: Option<String>,
    #[schema(example = "feed")]
    pub category: String,
    pub related_to: Option<String>,
    /// `Horse` or `Staff`.
    pub related_model: Option<String>,
    #[schema(example = 149.99)]
    pub amount: Option<f64>,
    pub settled: bool,
    pub description: Option<String>,
}

fn related_entity(
    related_to: Option<String>,
    related_model: Option<String>,
) -> Result<Option<RelatedEntity>, Error> {
    let blank = |value: &Option<String>| value.as_deref().is_none_or(|raw| raw.trim().is_empty());
    match (blank(&related_to), blank(&related_model)) {
        (true, true) => Ok(None),
        (false, false) => {
            let model: RelatedModel =
                parse_choice(related_model.as_deref().unwrap_or_default(), RELATED_MODEL)?;
            let id: uuid::Uuid = parse_id(related_to.as_deref().unwrap_or_default(), RELATED_TO)?;
            Ok(Some(RelatedEntity::from_parts(model, id)))
        }
        _ => Err(Error::invalid_field(
            "relatedTo",
            "relatedTo and relatedModel must be given together",
        )),
    }
}

impl ExpenseRequest {
    fn into_draft(self) -> Result<ExpenseDraft, Error> {
        let date_field = FieldName::new("date");
        let date = parse_date(&require(self.date, date_field)?, date_field)?;
        let kind = parse_choice(&require(self.kind, KIND)?, KIND)?;
        Ok(ExpenseDraft {
            date,
            kind,
            related: related_entity(self.related_to, self.related_model)?,
            amount: require(self.amount, FieldName::new("amount"))?,
            category: self.category,
            settled: self.settled,
            description: self.description,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub related_to: Option<String>,
    pub related_model: Option<String>,
    pub amount: f64,
    pub settled: bool,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Expense> for ExpenseResponse {
    fn from(expense: Expense) -> Self {
        let entry = &expense.entry;
        let related = entry.related();
        Self {
            id: expense.id.to_string(),
            date: entry.date().format("%Y-%m-%d").to_string(),
            kind: entry.kind().as_str().to_owned(),
            category: entry.category().to_owned(),
            related_to: related.map(|entity| entity.id().to_string()),
            related_model: related.map(|entity| entity.model().as_str().to_owned()),
            amount: entry.amount().as_decimal(),
            settled: entry.settled(),
            description: entry.description().map(str::to_owned),
            created_at: expense.created_at,
            updated_at: expense.updated_at,
        }
    }
}

/// Totals over the filtered entries.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SummaryResponse {
    pub income: f64,
    pub expense: f64,
    /// `income - expense`.
    pub balance: f64,
    /// Expense entries not yet settled.
    pub unsettled: f64,
}

impl From<ExpenseSummary> for SummaryResponse {
    fn from(summary: ExpenseSummary) -> Self {
        Self {
            income: summary.income.as_decimal(),
            expense: summary.expense.as_decimal(),
            balance: Amount::from_cents(summary.balance_cents()).as_decimal(),
            unsettled: summary.unsettled.as_decimal(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ExpensesEnvelope {
    pub expenses: Vec<ExpenseResponse>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ExpenseEnvelope {
    pub expense: ExpenseResponse,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ExpenseCreated {
    pub message: String,
    pub expense: ExpenseResponse,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseUpdated {
    pub message: String,
    pub updated_expense: ExpenseResponse,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDeleted {
    pub message: String,
    pub deleted_expense: ExpenseResponse,
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ExpenseQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub settled: Option<bool>,
    pub related_model: Option<String>,
    /// Inclusive lower date bound.
    pub from: Option<String>,
    /// Inclusive upper date bound.
    pub to: Option<String>,
}

impl ExpenseQuery {
    fn into_filter(self) -> Result<ExpenseFilter, Error> {
        Ok(ExpenseFilter {
            kind: parse_optional_choice::<ExpenseKind>(self.kind.as_deref(), KIND)?,
            settled: self.settled,
            related_model: parse_optional_choice::<RelatedModel>(
                self.related_model.as_deref(),
                RELATED_MODEL,
            )?,
            from: parse_optional_date(self.from.as_deref(), FieldName::new("from"))?,
            to: parse_optional_date(self.to.as_deref(), FieldName::new("to"))?,
        })
    }
}

#[utoipa::path(
    get,
    path = "/expenses",
    params(ExpenseQuery),
    responses(
        (status = 200, description = "Expenses, newest first", body = ExpensesEnvelope),
        (status = 400, description = "Invalid filter", body = ErrorSchema)
    ),
    tags = ["expenses"],
    operation_id = "listExpenses"
)]
#[get("")]
pub async fn list_expenses(
    state: web::Data<HttpState>,
    _user: Authenticated,
    query: web::Query<ExpenseQuery>,
) -> ApiResult<web::Json<ExpensesEnvelope>> {
    let expenses = state.expenses.list(query.into_inner().into_filter()?).await?;
    Ok(web::Json(ExpensesEnvelope {
        expenses: expenses.into_iter().map(ExpenseResponse::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/expenses/summary",
    params(ExpenseQuery),
    responses(
        (status = 200, description = "Totals", body = SummaryResponse),
        (status = 400, description = "Invalid filter", body = ErrorSchema)
    ),
    tags = ["expenses"],
    operation_id = "summariseExpenses"
)]
#[get("/summary")]
pub async fn expense_summary(
    state: web::Data<HttpState>,
    _user: Authenticated,
    query: web::Query<ExpenseQuery>,
) -> ApiResult<web::Json<SummaryResponse>> {
    let summary = state
        .expenses
        .summary(query.into_inner().into_filter()?)
        .await?;
    Ok(web::Json(summary.into()))
}

#[utoipa::path(
    get,
    path = "/expenses/{id}",
    params(("id" = String, Path, description = "Expense id")),
    responses(
        (status = 200, description = "Expense", body = ExpenseEnvelope),
        (status = 404, description = "Expense not found", body = ErrorSchema)
    ),
    tags = ["expenses"],
    operation_id = "getExpense"
)]
#[get("/{id}")]
pub async fn get_expense(
    state: web::Data<HttpState>,
    _user: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<ExpenseEnvelope>> {
    let id: ExpenseId = parse_id(&path, ID)?;
    Ok(web::Json(ExpenseEnvelope {
        expense: state.expenses.get(id).await?.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/expenses",
    request_body = ExpenseRequest,
    responses(
        (status = 201, description = "Expense created", body = ExpenseCreated),
        (status = 400, description = "Invalid expense", body = ErrorSchema)
    ),
    tags = ["expenses"],
    operation_id = "createExpense"
)]
#[post("")]
pub async fn create_expense(
    state: web::Data<HttpState>,
    _admin: AdminOnly,
    payload: web::Json<ExpenseRequest>,
) -> ApiResult<HttpResponse> {
    let expense = state
        .expenses
        .create(payload.into_inner().into_draft()?)
        .await?;
    Ok(HttpResponse::Created().json(ExpenseCreated {
        message: "Expense successfully created!".to_owned(),
        expense: expense.into(),
    }))
}

#[utoipa::path(
    put,
    path = "/expenses/{id}",
    params(("id" = String, Path, description = "Expense id")),
    request_body = ExpenseRequest,
    responses(
        (status = 200, description = "Expense updated", body = ExpenseUpdated),
        (status = 404, description = "Expense not found", body = ErrorSchema)
    ),
    tags = ["expenses"],
    operation_id = "updateExpense"
)]
#[put("/{id}")]
pub async fn update_expense(
    state: web::Data<HttpState>,
    _admin: AdminOnly,
    path: web::Path<String>,
    payload: web::Json<ExpenseRequest>,
) -> ApiResult<web::Json<ExpenseUpdated>> {
    let id: ExpenseId = parse_id(&path, ID)?;
    let expense = state
        .expenses
        .update(id, payload.into_inner().into_draft()?)
        .await?;
    Ok(web::Json(ExpenseUpdated {
        message: "Expense successfully updated!".to_owned(),
        updated_expense: expense.into(),
    }))
}

#[utoipa::path(
    delete,
    path = "/expenses/{id}",
    params(("id" = String, Path, description = "Expense id")),
    responses(
        (status = 200, description = "Expense deleted", body = ExpenseDeleted),
        (status = 404, description = "Expense not found", body = ErrorSchema)
    ),
    tags = ["expenses"],
    operation_id = "deleteExpense"
)]
#[delete("/{id}")]
pub async fn delete_expense(
    state: web::Data<HttpState>,
    _admin: AdminOnly,
    path: web::Path<String>,
) -> ApiResult<web::Json<ExpenseDeleted>> {
    let id: ExpenseId = parse_id(&path, ID)?;
    let expense = state.expenses.delete(id).await?;
    Ok(web::Json(ExpenseDeleted {
        message: "Expense successfully deleted!".to_owned(),
        deleted_expense: expense.into(),
    }))
}

#[cfg(test)]
#[path = "expenses_tests.rs"]
mod tests;
