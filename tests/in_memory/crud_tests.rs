//! Create, read and partial-update round trips across every entity.

use super::helpers::{
    Tracker, history_payload, project_payload, task_payload, tracker, user_payload,
};
use eyre::{WrapErr, ensure, eyre};
use rstest::rstest;
use tasktrack::tracker::{
    domain::{HistoryPatch, ProjectPatch, RecordId, TaskPatch, UserPatch},
    services::TrackerError,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_users_read_back_with_payload_fields(tracker: Tracker) -> eyre::Result<()> {
    let payload = user_payload("grace");
    let id = tracker
        .users
        .add_one(payload.clone())
        .await
        .wrap_err("insert user")?;

    let user = tracker
        .users
        .get_by_id(id)
        .await
        .wrap_err("fetch user")?
        .ok_or_else(|| eyre!("user {id} missing"))?;

    ensure!(user.id() == id, "expected id {id}, found {}", user.id());
    ensure!(
        (&user.login, &user.password, &user.email, &user.phone)
            == (&payload.login, &payload.password, &payload.email, &payload.phone),
        "account fields differ from the payload: {user:?}"
    );
    ensure!(
        (&user.first_name, &user.second_name, &user.middle_name)
            == (&payload.first_name, &payload.second_name, &payload.middle_name),
        "name fields differ from the payload: {user:?}"
    );
    ensure!(
        user.is_admin == payload.is_admin && user.fav_tasks == payload.fav_tasks,
        "flags differ from the payload: {user:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_tasks_read_back_with_payload_fields(tracker: Tracker) -> eyre::Result<()> {
    let payload = task_payload("Linker");
    let id = tracker
        .tasks
        .add_one(payload.clone())
        .await
        .wrap_err("insert task")?;

    let task = tracker
        .tasks
        .get_by_id(id)
        .await
        .wrap_err("fetch task")?
        .ok_or_else(|| eyre!("task {id} missing"))?;

    ensure!(
        task.name == payload.name && task.description == payload.description,
        "text fields differ from the payload: {task:?}"
    );
    ensure!(
        (task.date_start, task.date_end) == (payload.date_start, payload.date_end),
        "dates differ from the payload: {task:?}"
    );
    ensure!(
        (task.progress, task.status, task.priority)
            == (payload.progress, payload.status, payload.priority),
        "codes differ from the payload: {task:?}"
    );
    ensure!(
        (task.created_by, task.admin, task.executor)
            == (payload.created_by, payload.admin, payload.executor),
        "user references differ from the payload: {task:?}"
    );
    ensure!(task.files().is_none(), "new tasks start without files");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn partial_updates_keep_absent_fields(tracker: Tracker) -> eyre::Result<()> {
    let id = tracker
        .tasks
        .add_one(task_payload("Linker"))
        .await
        .wrap_err("insert task")?;

    let updated = tracker
        .tasks
        .update_one(
            id,
            TaskPatch {
                status: Some(3),
                executor: Some(RecordId::new(5)),
                ..TaskPatch::default()
            },
        )
        .await
        .wrap_err("update task")?;

    let task = tracker
        .tasks
        .get_by_id(id)
        .await
        .wrap_err("fetch task")?
        .ok_or_else(|| eyre!("task {id} missing"))?;
    ensure!(updated, "update reported a missing task");
    ensure!(
        task.status == 3 && task.executor == RecordId::new(5),
        "patched fields not applied: {task:?}"
    );
    ensure!(
        task.name == "Linker"
            && task.date_start == Some(1_700_000_000)
            && task.date_end == Some(1_700_086_400),
        "absent fields changed: {task:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn null_patch_fields_never_clear_values(tracker: Tracker) -> eyre::Result<()> {
    let id = tracker
        .users
        .add_one(user_payload("grace"))
        .await
        .wrap_err("insert user")?;
    let patch: UserPatch =
        serde_json::from_str(r#"{"email":null,"fav_tasks":null,"phone":"+1 555 0100"}"#)
            .wrap_err("decode patch")?;

    tracker
        .users
        .update_one(id, patch)
        .await
        .wrap_err("update user")?;

    let user = tracker
        .users
        .get_by_id(id)
        .await
        .wrap_err("fetch user")?
        .ok_or_else(|| eyre!("user {id} missing"))?;
    ensure!(
        user.email == "grace@navy.example",
        "null email cleared the stored value: {user:?}"
    );
    ensure!(
        user.fav_tasks == Some(vec![RecordId::new(3)]),
        "null fav_tasks cleared the stored value: {user:?}"
    );
    ensure!(user.phone == "+1 555 0100", "phone not updated: {user:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn updating_missing_records_reports_false(tracker: Tracker) -> eyre::Result<()> {
    tracker
        .projects
        .add_one(project_payload("Compiler"))
        .await
        .wrap_err("insert project")?;
    let before = tracker.projects.find_all().await.wrap_err("list")?;

    let updated = tracker
        .projects
        .update_one(
            RecordId::new(99),
            ProjectPatch {
                name: Some("Renamed".to_owned()),
                ..ProjectPatch::default()
            },
        )
        .await
        .wrap_err("update project")?;

    ensure!(!updated, "update of a missing project reported success");
    let after = tracker.projects.find_all().await.wrap_err("list")?;
    ensure!(after == before, "projects changed: {after:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn history_text_can_be_amended(tracker: Tracker) -> eyre::Result<()> {
    let id = tracker
        .history
        .add_one(history_payload(RecordId::new(1)))
        .await
        .wrap_err("insert entry")?;

    tracker
        .history
        .update_one(id, HistoryPatch::text("moved back to draft"))
        .await
        .wrap_err("update entry")?;

    let element = tracker
        .history
        .get_by_id(id)
        .await
        .wrap_err("fetch entry")?
        .ok_or_else(|| eyre!("entry {id} missing"))?;
    ensure!(
        element.text.as_deref() == Some("moved back to draft"),
        "text not amended: {element:?}"
    );
    ensure!(element.timestamp == 1_700_000_500, "timestamp changed: {element:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_payloads_are_rejected(tracker: Tracker) -> eyre::Result<()> {
    let result = tracker
        .tasks
        .add_one(task_payload("Linker").with_dates(Some(20), Some(10)))
        .await;

    ensure!(
        matches!(result, Err(TrackerError::Validation(_))),
        "expected a validation error, got {result:?}"
    );
    let stored = tracker.tasks.find_all().await.wrap_err("list")?;
    ensure!(stored.is_empty(), "invalid task was stored: {stored:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn entity_id_sequences_are_independent(tracker: Tracker) -> eyre::Result<()> {
    let user_id = tracker
        .users
        .add_one(user_payload("grace"))
        .await
        .wrap_err("insert user")?;
    let project_id = tracker
        .projects
        .add_one(project_payload("Compiler"))
        .await
        .wrap_err("insert project")?;

    ensure!(
        user_id == RecordId::new(1) && project_id == RecordId::new(1),
        "expected both sequences to start at 1, got {user_id} and {project_id}"
    );
    Ok(())
}
