//! Field filters and history lookups.

use super::helpers::{Tracker, history_payload, task_payload, tracker, user_payload};
use eyre::{WrapErr, ensure, eyre};
use rstest::rstest;
use tasktrack::tracker::{
    domain::{FieldFilter, FieldValue, HistoryElement, RecordId, TaskField},
    services::TrackerError,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn find_by_id_array_returns_only_existing_entries(tracker: Tracker) -> eyre::Result<()> {
    for author in [1, 2] {
        tracker
            .history
            .add_one(history_payload(RecordId::new(author)))
            .await
            .wrap_err("insert entry")?;
    }

    let found = tracker
        .history
        .find_by_id_array(&[RecordId::new(1), RecordId::new(2), RecordId::new(999)])
        .await
        .wrap_err("batch lookup")?;

    let ids: Vec<RecordId> = found.iter().map(HistoryElement::id).collect();
    ensure!(
        ids == [RecordId::new(1), RecordId::new(2)],
        "expected entries 1 and 2, found {ids:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn get_by_user_id_selects_author_entries(tracker: Tracker) -> eyre::Result<()> {
    for author in [4, 5, 4, 4] {
        tracker
            .history
            .add_one(history_payload(RecordId::new(author)))
            .await
            .wrap_err("insert entry")?;
    }

    let by_four = tracker
        .history
        .get_by_user_id(RecordId::new(4))
        .await
        .wrap_err("lookup by author")?;

    ensure!(by_four.len() == 3, "expected 3 entries, found {}", by_four.len());
    ensure!(
        by_four
            .iter()
            .all(|element| element.by_user == RecordId::new(4)),
        "entries by other authors returned: {by_four:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_field_names_yield_no_result(tracker: Tracker) -> eyre::Result<()> {
    tracker
        .users
        .add_one(user_payload("grace"))
        .await
        .wrap_err("insert user")?;

    let result = tracker
        .users
        .get_list_by_field("no_such_field", "x")
        .await
        .wrap_err("unknown field lookup")?;

    ensure!(result.is_none(), "unknown field produced results: {result:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn known_fields_filter_by_equality(tracker: Tracker) -> eyre::Result<()> {
    tracker
        .tasks
        .add_one(task_payload("Linker"))
        .await
        .wrap_err("insert task")?;
    tracker
        .tasks
        .add_one(task_payload("Loader").with_codes(1, 2, 1))
        .await
        .wrap_err("insert task")?;

    let in_progress = tracker
        .tasks
        .get_list_by_field("status", 2_i16)
        .await
        .wrap_err("filter by status")?
        .ok_or_else(|| eyre!("status should be filterable"))?;
    let assigned = tracker
        .tasks
        .list_by_filter(&FieldFilter::new(
            TaskField::Executor,
            FieldValue::Int(2),
        )?)
        .await
        .wrap_err("filter by executor")?;

    ensure!(
        in_progress.len() == 1
            && in_progress.first().map(|task| task.name.as_str()) == Some("Loader"),
        "expected only Loader in progress, found {in_progress:?}"
    );
    ensure!(
        assigned.len() == 2,
        "expected 2 tasks for executor 2, found {}",
        assigned.len()
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn filter_values_of_the_wrong_kind_are_rejected(tracker: Tracker) -> eyre::Result<()> {
    let result = tracker.tasks.get_list_by_field("executor", "bob").await;

    ensure!(
        matches!(result, Err(TrackerError::Validation(_))),
        "expected a validation error, got {result:?}"
    );
    Ok(())
}
