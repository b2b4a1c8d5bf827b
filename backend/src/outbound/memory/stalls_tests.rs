//! Tests for memory-backed stall assignment.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::{HorseDraft, StableDraft};

#[fixture]
fn store() -> MemoryStore {
    MemoryStore::new(Arc::new(DefaultClock))
}

async fn horse(store: &MemoryStore, name: &str) -> Horse {
    let profile = HorseProfile::new(HorseDraft {
        name: name.into(),
        owner_email: "owner@example.com".into(),
        ..HorseDraft::default()
    })
    .expect("valid horse");
    HorseRepository::create(store, &profile)
        .await
        .expect("horse created")
}

async fn stable(store: &MemoryStore, capacity: i64) -> Stable {
    let profile = StableProfile::new(StableDraft {
        full_name: format!("Stable {capacity}"),
        location: None,
        capacity,
        description: None,
        stall_size: None,
        managed_by: None,
    })
    .expect("valid stable");
    StableRepository::create(store, &profile)
        .await
        .expect("stable created")
}

async fn stall(store: &MemoryStore, number: &str, stable_id: Option<StableId>) -> Stall {
    let spec = StallSpec::new(number, None, "large", stable_id).expect("valid spec");
    StallRepository::create(store, &spec, StallStatus::Available)
        .await
        .expect("stall created")
}

#[rstest]
#[tokio::test]
async fn assigning_moves_horse_between_stalls(store: MemoryStore) {
    let horse = horse(&store, "Bucephalus").await;
    let first = stall(&store, "1", None).await;
    let second = stall(&store, "2", None).await;

    store.assign(first.id, horse.id).await.expect("first assignment");
    let moved = store.assign(second.id, horse.id).await.expect("move");

    assert_eq!(moved.status, StallStatus::Occupied);
    let first = StallRepository::find(&store, first.id)
        .await
        .expect("lookup")
        .expect("stall exists");
    assert_eq!(first.status, StallStatus::Available);
    assert_eq!(first.horse_id, None);

    let placed = HorseRepository::find(&store, horse.id)
        .await
        .expect("lookup")
        .expect("horse exists");
    assert_eq!(placed.stall_id(), Some(second.id));
}

#[rstest]
#[tokio::test]
async fn second_horse_cannot_take_occupied_stall(store: MemoryStore) {
    let first = horse(&store, "Atlas").await;
    let second = horse(&store, "Comet").await;
    let target = stall(&store, "7", None).await;

    store.assign(target.id, first.id).await.expect("assignment");
    let err = store
        .assign(target.id, second.id)
        .await
        .expect_err("occupied");
    assert_eq!(
        err,
        StallRepositoryError::rule(StallRuleError::OccupiedBy { horse_id: first.id })
    );

    let again = store.assign(target.id, first.id).await.expect("idempotent");
    assert_eq!(again.horse_id, Some(first.id));
}

#[rstest]
#[tokio::test]
async fn deleting_horse_releases_its_stall(store: MemoryStore) {
    let horse = horse(&store, "Pegasus").await;
    let target = stall(&store, "3", None).await;
    store.assign(target.id, horse.id).await.expect("assignment");

    let removed = HorseRepository::delete(&store, horse.id)
        .await
        .expect("delete")
        .expect("horse existed");
    assert_eq!(removed.stall_id(), Some(target.id));

    let freed = StallRepository::find(&store, target.id)
        .await
        .expect("lookup")
        .expect("stall exists");
    assert_eq!(freed.status, StallStatus::Available);
    assert!(freed.horse_id.is_none());
}

#[rstest]
#[tokio::test]
async fn full_stable_refuses_new_stalls(store: MemoryStore) {
    let stable = stable(&store, 1).await;
    stall(&store, "1", Some(stable.id)).await;

    let spec = StallSpec::new("2", None, "small", Some(stable.id)).expect("valid spec");
    let err = StallRepository::create(&store, &spec, StallStatus::Available)
        .await
        .expect_err("stable full");
    assert_eq!(
        err,
        StallRepositoryError::rule(StallRuleError::StableFull { capacity: 1 })
    );
}

#[rstest]
#[tokio::test]
async fn duplicate_number_within_stable_conflicts(store: MemoryStore) {
    let stable = stable(&store, 5).await;
    stall(&store, "1", Some(stable.id)).await;

    let spec = StallSpec::new("1", None, "small", Some(stable.id)).expect("valid spec");
    let err = StallRepository::create(&store, &spec, StallStatus::Available)
        .await
        .expect_err("duplicate");
    assert!(matches!(err, StallRepositoryError::Conflict { .. }));
}

#[rstest]
#[tokio::test]
async fn maintenance_blocked_while_occupied(store: MemoryStore) {
    let horse = horse(&store, "Shadowfax").await;
    let target = stall(&store, "9", None).await;
    store.assign(target.id, horse.id).await.expect("assignment");

    let err = StallRepository::update(
        &store,
        target.id,
        &target.spec,
        Some(StallStatus::Maintenance),
    )
    .await
    .expect_err("still occupied");
    assert_eq!(
        err,
        StallRepositoryError::rule(StallRuleError::StillOccupied { horse_id: horse.id })
    );

    let err = StallRepository::delete(&store, target.id)
        .await
        .expect_err("cannot delete");
    assert!(matches!(err, StallRepositoryError::Rule { .. }));
}

#[rstest]
#[tokio::test]
async fn deleting_stable_detaches_stalls(store: MemoryStore) {
    let stable = stable(&store, 3).await;
    let inside = stall(&store, "1", Some(stable.id)).await;
    let listed = StableRepository::find(&store, stable.id)
        .await
        .expect("lookup")
        .expect("stable exists");
    assert_eq!(listed.stall_ids, vec![inside.id]);

    StableRepository::delete(&store, stable.id)
        .await
        .expect("delete")
        .expect("stable existed");
    let detached = StallRepository::find(&store, inside.id)
        .await
        .expect("lookup")
        .expect("stall exists");
    assert_eq!(detached.spec.stable_id(), None);
}

#[rstest]
#[tokio::test]
async fn detached_stalls_may_share_a_number(store: MemoryStore) {
    let east = stable(&store, 2).await;
    let west = stable(&store, 3).await;
    let first = stall(&store, "1", Some(east.id)).await;
    stall(&store, "1", Some(west.id)).await;

    for id in [east.id, west.id] {
        StableRepository::delete(&store, id)
            .await
            .expect("delete")
            .expect("stable existed");
    }
    let detached = StallRepository::list(&store, &StallFilter::default())
        .await
        .expect("list")
        .into_iter()
        .filter(|stall| stall.spec.number() == "1")
        .count();
    assert_eq!(detached, 2);

    let unchanged = StallSpec::new("1", None, "large", None).expect("valid spec");
    let edited = StallRepository::update(&store, first.id, &unchanged, None)
        .await
        .expect("detached stall stays editable");
    assert_eq!(edited.spec.stable_id(), None);
}

#[rstest]
#[tokio::test]
async fn numbers_stay_unique_inside_a_stable(store: MemoryStore) {
    let east = stable(&store, 3).await;
    stall(&store, "1", Some(east.id)).await;
    let spec = StallSpec::new("1", None, "small", Some(east.id)).expect("valid spec");
    let err = StallRepository::create(&store, &spec, StallStatus::Available)
        .await
        .expect_err("duplicate number");
    assert!(matches!(err, StallRepositoryError::Conflict { .. }));
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_assignments_leave_one_winner(store: MemoryStore) {
    let target = stall(&store, "7", None).await;
    let first = horse(&store, "Comet").await;
    let second = horse(&store, "Spirit").await;

    let (left, right) = tokio::join!(
        store.assign(target.id, first.id),
        store.assign(target.id, second.id),
    );
    let (winner, loser) = match (left, right) {
        (Ok(stall), Err(err)) | (Err(err), Ok(stall)) => (stall, err),
        other => panic!("expected one success and one failure, got {other:?}"),
    };
    let holder = winner.horse_id.expect("winner holds the stall");
    assert!(holder == first.id || holder == second.id);
    assert_eq!(
        loser,
        StallRepositoryError::rule(StallRuleError::OccupiedBy { horse_id: holder })
    );

    let stored = StallRepository::find(&store, target.id)
        .await
        .expect("lookup")
        .expect("stall exists");
    assert_eq!(stored.horse_id, Some(holder));
    assert_eq!(stored.status, StallStatus::Occupied);
}

#[rstest]
#[tokio::test]
async fn capacity_cannot_drop_below_stall_count(store: MemoryStore) {
    let stable = stable(&store, 2).await;
    stall(&store, "1", Some(stable.id)).await;
    stall(&store, "2", Some(stable.id)).await;

    let smaller = StableProfile::new(StableDraft {
        full_name: stable.profile.full_name().to_owned(),
        location: None,
        capacity: 1,
        description: None,
        stall_size: None,
        managed_by: None,
    })
    .expect("valid profile");
    let err = StableRepository::update(&store, stable.id, &smaller)
        .await
        .expect_err("too small");
    assert!(matches!(err, StableRepositoryError::Rule { .. }));
}
