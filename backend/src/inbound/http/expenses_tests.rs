//! Tests for expense endpoints.

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::{NaiveDate, Utc};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::{ExpenseEntry, HorseId};
use crate::inbound::http::test_utils::{ADMIN_TOKEN, MockPorts, USER_TOKEN, bearer};
use crate::inbound::http::validation::{json_config, query_config};

const HORSE: &str = "00000000-0000-0000-0000-000000000009";

fn expense() -> Expense {
    let now = Utc::now();
    Expense {
        id: ExpenseId::from_uuid(uuid::Uuid::nil()),
        entry: ExpenseEntry::new(ExpenseDraft {
            date: NaiveDate::from_ymd_opt(2025, 6, 9).expect("date"),
            kind: ExpenseKind::Expense,
            category: "vet".into(),
            related: Some(RelatedEntity::Horse(HORSE.parse::<HorseId>().expect("horse id"))),
            amount: 120.5,
            settled: false,
            description: None,
        })
        .expect("valid entry"),
        created_at: now,
        updated_at: now,
    }
}

#[fixture]
fn ports() -> MockPorts {
    MockPorts::accepting_tokens()
}

async fn send(ports: MockPorts, token: &str, request: actix_test::TestRequest) -> (StatusCode, Value) {
    let app = actix_test::init_service(
        App::new()
            .app_data(ports.into_state())
            .app_data(json_config())
            .app_data(query_config())
            .service(
                web::scope("/expenses")
                    .service(list_expenses)
                    .service(expense_summary)
                    .service(create_expense)
                    .service(get_expense)
                    .service(update_expense)
                    .service(delete_expense),
            ),
    )
    .await;
    let res =
        actix_test::call_service(&app, request.insert_header(bearer(token)).to_request()).await;
    let status = res.status();
    let body = actix_test::read_body(res).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

#[rstest]
#[actix_web::test]
async fn list_parses_every_filter(mut ports: MockPorts) {
    ports
        .expenses
        .expect_list()
        .withf(|filter| {
            filter.kind == Some(ExpenseKind::Expense)
                && filter.settled == Some(false)
                && filter.related_model == Some(RelatedModel::Horse)
                && filter.from == NaiveDate::from_ymd_opt(2025, 6, 1)
                && filter.to == NaiveDate::from_ymd_opt(2025, 6, 30)
        })
        .returning(|_| Ok(vec![expense()]));
    let (status, body) = send(
        ports,
        USER_TOKEN,
        actix_test::TestRequest::get().uri(
            "/expenses?type=expense&settled=false&relatedModel=Horse&from=2025-06-01&to=2025-06-30",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let first = &body["expenses"][0];
    assert_eq!(first["type"], "expense");
    assert_eq!(first["amount"], 120.5);
    assert_eq!(first["relatedModel"], "Horse");
    assert_eq!(first["relatedTo"], HORSE);
    assert_eq!(first["date"], "2025-06-09");
}

#[rstest]
#[actix_web::test]
async fn summary_reports_balance(mut ports: MockPorts) {
    ports.expenses.expect_summary().returning(|_| {
        Ok(ExpenseSummary {
            income: Amount::from_cents(50_000),
            expense: Amount::from_cents(12_050),
            unsettled: Amount::from_cents(12_050),
        })
    });
    let (status, body) = send(
        ports,
        USER_TOKEN,
        actix_test::TestRequest::get().uri("/expenses/summary"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "income": 500.0, "expense": 120.5, "balance": 379.5, "unsettled": 120.5 })
    );
}

#[rstest]
#[case(json!({ "date": "2025-06-09", "type": "expense", "category": "vet", "amount": 1.0, "relatedTo": HORSE }), "relatedTo")]
#[case(json!({ "date": "2025-06-09", "type": "gift", "category": "vet", "amount": 1.0 }), "type")]
#[case(json!({ "type": "expense", "category": "vet", "amount": 1.0 }), "date")]
#[case(json!({ "date": "2025-06-09", "type": "expense", "category": "vet" }), "amount")]
#[actix_web::test]
async fn create_rejects_incomplete_payloads(
    mut ports: MockPorts,
    #[case] payload: Value,
    #[case] field: &str,
) {
    ports.expenses.expect_create().never();
    let (status, body) = send(
        ports,
        ADMIN_TOKEN,
        actix_test::TestRequest::post().uri("/expenses").set_json(payload),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn update_uses_updated_expense_envelope(mut ports: MockPorts) {
    ports
        .expenses
        .expect_update()
        .withf(|_, draft| draft.related.map(RelatedEntity::model) == Some(RelatedModel::Horse))
        .returning(|_, _| Ok(expense()));
    let (status, body) = send(
        ports,
        ADMIN_TOKEN,
        actix_test::TestRequest::put()
            .uri(&format!("/expenses/{}", uuid::Uuid::nil()))
            .set_json(json!({
                "date": "Mon Jun 09 2025",
                "type": "expense",
                "category": "vet",
                "amount": 120.5,
                "relatedTo": HORSE,
                "relatedModel": "Horse"
            })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Expense successfully updated!");
    assert_eq!(body["updatedExpense"]["category"], "vet");
}

#[rstest]
#[actix_web::test]
async fn bad_settled_flag_is_bad_request(ports: MockPorts) {
    let (status, body) = send(
        ports,
        USER_TOKEN,
        actix_test::TestRequest::get().uri("/expenses?settled=maybe"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "invalid_query");
}
