//! Tests for the stall service.

use std::sync::Arc;

use chrono::Utc;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::MockStallRepository;
use crate::domain::{ErrorCode, StallStatus};

#[fixture]
fn draft() -> StallDraft {
    StallDraft {
        number: "1".into(),
        name: Some("1-Sunset Meadows".into()),
        size: "large".into(),
        stable_id: None,
        status: None,
    }
}

fn stall(spec: &StallSpec, status: StallStatus, horse_id: Option<HorseId>) -> Stall {
    let now = Utc::now();
    Stall {
        id: StallId::random(),
        spec: spec.clone(),
        status,
        horse_id,
        created_at: now,
        updated_at: now,
    }
}

#[rstest]
#[tokio::test]
async fn create_defaults_to_available(draft: StallDraft) {
    let mut repo = MockStallRepository::new();
    repo.expect_create()
        .withf(|_, status| *status == StallStatus::Available)
        .returning(|spec, status| Ok(stall(spec, status, None)));

    let created = StallServiceImpl::new(Arc::new(repo))
        .create(draft)
        .await
        .expect("create succeeds");
    assert_eq!(created.status, StallStatus::Available);
}

#[rstest]
#[tokio::test]
async fn create_refuses_occupied_status(mut draft: StallDraft) {
    draft.status = Some(StallStatus::Occupied);
    let mut repo = MockStallRepository::new();
    repo.expect_create().never();

    let err = StallServiceImpl::new(Arc::new(repo))
        .create(draft)
        .await
        .expect_err("occupied is not settable");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[case(StallRuleError::OccupiedBy { horse_id: HorseId::random() }, "stall_occupied")]
#[case(StallRuleError::UnderMaintenance, "stall_unavailable")]
#[tokio::test]
async fn assignment_rule_failures_are_conflicts(
    #[case] rule: StallRuleError,
    #[case] code: &str,
) {
    let mut repo = MockStallRepository::new();
    repo.expect_assign()
        .return_once(move |_, _| Err(StallRepositoryError::rule(rule)));

    let err = StallServiceImpl::new(Arc::new(repo))
        .assign(StallId::random(), HorseId::random())
        .await
        .expect_err("rule violation");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(
        err.details().and_then(|details| details.get("code")),
        Some(&json!(code))
    );
}

#[rstest]
#[case(StallRepositoryError::missing_stall())]
#[case(StallRepositoryError::missing_horse())]
#[tokio::test]
async fn assignment_of_missing_records_is_not_found(#[case] error: StallRepositoryError) {
    let mut repo = MockStallRepository::new();
    repo.expect_assign().return_once(move |_, _| Err(error));

    let err = StallServiceImpl::new(Arc::new(repo))
        .assign(StallId::random(), HorseId::random())
        .await
        .expect_err("missing record");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn full_stable_is_a_conflict(draft: StallDraft) {
    let mut repo = MockStallRepository::new();
    repo.expect_create()
        .return_once(|_, _| Err(StallRepositoryError::rule(StallRuleError::StableFull { capacity: 2 })));

    let err = StallServiceImpl::new(Arc::new(repo))
        .create(draft)
        .await
        .expect_err("stable full");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn get_missing_stall_is_not_found() {
    let mut repo = MockStallRepository::new();
    repo.expect_find().returning(|_| Ok(None));

    let err = StallServiceImpl::new(Arc::new(repo))
        .get(StallId::random())
        .await
        .expect_err("missing stall");
    assert_eq!(err.code(), ErrorCode::NotFound);
}
