//! Repository operations against a live `PostgreSQL` database.

use crate::postgres::helpers::{BoxError, PostgresCluster, postgres_cluster, postgres_context};
use camino::Utf8Path;
use diesel::connection::SimpleConnection;
use eyre::{WrapErr, ensure, eyre};
use rstest::rstest;
use tasktrack::tracker::{
    domain::{
        NewHistoryElement, NewProject, NewTask, NewUser, RecordId, TaskPatch, UserPatch,
        ValidationError,
    },
    ports::{StoreError, UploadedFile},
    services::TrackerError,
};

fn user_payload(login: &str) -> NewUser {
    NewUser {
        login: login.to_owned(),
        password: "hunter2".to_owned(),
        first_name: "Edsger".to_owned(),
        second_name: "Dijkstra".to_owned(),
        middle_name: "Wybe".to_owned(),
        email: format!("{login}@example.nl"),
        phone: "+31 20 000 0000".to_owned(),
        is_admin: true,
        fav_tasks: Some(vec![RecordId::new(4), RecordId::new(8)]),
    }
}

fn task_payload(name: &str) -> NewTask {
    NewTask::new(name, "Shortest paths", RecordId::new(1), RecordId::new(2))
        .with_dates(Some(1_700_000_000), None)
        .with_codes(10, 2, 3)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn users_round_trip_every_field(
    postgres_cluster: Result<PostgresCluster, BoxError>,
) -> eyre::Result<()> {
    let context = postgres_context(postgres_cluster).map_err(|err| eyre!(err))?;
    let users = &context.repositories.users;
    let payload = user_payload("edsger");

    let id = users.add_one(payload.clone()).await.wrap_err("insert user")?;
    let user = users
        .get_by_id(id)
        .await
        .wrap_err("fetch user")?
        .ok_or_else(|| eyre!("user {id} missing"))?;

    ensure!(user.id() == id, "expected id {id}, found {}", user.id());
    ensure!(
        (&user.login, &user.middle_name, &user.email)
            == (&payload.login, &payload.middle_name, &payload.email),
        "text columns differ from the payload: {user:?}"
    );
    ensure!(
        user.is_admin == payload.is_admin && user.fav_tasks == payload.fav_tasks,
        "flag or list columns differ from the payload: {user:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn partial_update_merges_within_one_transaction(
    postgres_cluster: Result<PostgresCluster, BoxError>,
) -> eyre::Result<()> {
    let context = postgres_context(postgres_cluster).map_err(|err| eyre!(err))?;
    let tasks = &context.repositories.tasks;
    let id = tasks
        .add_one(task_payload("Dijkstra"))
        .await
        .wrap_err("insert task")?;

    let updated = tasks
        .update_one(
            id,
            TaskPatch {
                date_end: Some(1_700_086_400),
                status: Some(4),
                ..TaskPatch::default()
            },
        )
        .await
        .wrap_err("update task")?;
    let missing = tasks
        .update_one(
            RecordId::new(i32::MAX),
            TaskPatch {
                status: Some(4),
                ..TaskPatch::default()
            },
        )
        .await
        .wrap_err("update missing task")?;

    let task = tasks
        .get_by_id(id)
        .await
        .wrap_err("fetch task")?
        .ok_or_else(|| eyre!("task {id} missing"))?;
    ensure!(updated && !missing, "unexpected update results {updated} and {missing}");
    ensure!(
        task.status == 4 && task.date_end == Some(1_700_086_400),
        "patched columns not applied: {task:?}"
    );
    ensure!(
        task.progress == 10 && task.date_start == Some(1_700_000_000),
        "absent columns changed: {task:?}"
    );
    ensure!(task.files().is_none(), "files column should stay null");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn field_filters_translate_to_queries(
    postgres_cluster: Result<PostgresCluster, BoxError>,
) -> eyre::Result<()> {
    let context = postgres_context(postgres_cluster).map_err(|err| eyre!(err))?;
    let users = &context.repositories.users;
    let login = format!("filter-{}", uuid::Uuid::new_v4().simple());
    let id = users
        .add_one(user_payload(&login))
        .await
        .wrap_err("insert user")?;
    users
        .update_one(
            id,
            UserPatch {
                is_admin: Some(false),
                ..UserPatch::default()
            },
        )
        .await
        .wrap_err("update user")?;

    let by_login = users
        .get_list_by_field("login", login.as_str())
        .await
        .wrap_err("filter by login")?
        .ok_or_else(|| eyre!("login should be filterable"))?;
    let unknown = users
        .get_list_by_field("password", "hunter2")
        .await
        .wrap_err("filter by password")?;

    ensure!(
        by_login.len() == 1 && by_login.first().map(|user| user.is_admin) == Some(false),
        "expected the updated user only, found {by_login:?}"
    );
    ensure!(unknown.is_none(), "password should not be filterable");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn history_lookups_by_ids_and_author(
    postgres_cluster: Result<PostgresCluster, BoxError>,
) -> eyre::Result<()> {
    let context = postgres_context(postgres_cluster).map_err(|err| eyre!(err))?;
    let history = &context.repositories.history;
    let author = RecordId::new(7_001);
    let mut ids = Vec::new();
    for offset in 0..3 {
        let draft = NewHistoryElement::new(1_700_000_000 + offset, author)
            .with_text("checkpoint")
            .with_new_status(2);
        ids.push(history.add_one(draft).await.wrap_err("insert entry")?);
    }
    let mut wanted = ids.clone();
    wanted.push(RecordId::new(i32::MAX));

    let found = history
        .find_by_id_array(&wanted)
        .await
        .wrap_err("batch lookup")?;
    let by_author = history
        .get_by_user_id(author)
        .await
        .wrap_err("lookup by author")?;

    ensure!(found.len() == 3, "expected 3 entries by id, found {found:?}");
    ensure!(
        by_author.len() == 3 && by_author.iter().all(|element| ids.contains(&element.id())),
        "expected the 3 inserted entries by author, found {by_author:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn attachments_land_on_disk_and_in_the_file_table(
    postgres_cluster: Result<PostgresCluster, BoxError>,
) -> eyre::Result<()> {
    let context = postgres_context(postgres_cluster).map_err(|err| eyre!(err))?;
    let repositories = &context.repositories;
    let task_id = repositories
        .tasks
        .add_one(task_payload("Attachments"))
        .await
        .wrap_err("insert task")?;

    for name in ["graph.dot", "proof.tex"] {
        let linked = repositories
            .tasks
            .add_files(
                task_id,
                vec![UploadedFile::from_bytes(name, name.as_bytes().to_vec())],
            )
            .await
            .wrap_err("ingest attachment")?;
        ensure!(linked, "task {task_id} was not found");
    }

    let task = repositories
        .tasks
        .get_by_id(task_id)
        .await
        .wrap_err("fetch task")?
        .ok_or_else(|| eyre!("task {task_id} missing"))?;
    let file_ids = task.files().ok_or_else(|| eyre!("file list not set"))?;
    ensure!(file_ids.len() == 2, "expected 2 linked files, found {file_ids:?}");
    for file_id in file_ids {
        let record = repositories
            .files
            .get_by_id(*file_id)
            .await
            .wrap_err("fetch file")?
            .ok_or_else(|| eyre!("file {file_id} missing"))?;
        let path = Utf8Path::new(&record.path);
        ensure!(
            path.starts_with(&context.media_root),
            "{path} is outside the media root"
        );
        ensure!(
            std::fs::read(path)? == record.name.as_bytes(),
            "file contents differ at {path}"
        );
        ensure!(
            record.size == u64::try_from(record.name.len())?,
            "unexpected size in {record:?}"
        );
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn corrupt_id_lists_surface_as_invalid_data(
    postgres_cluster: Result<PostgresCluster, BoxError>,
) -> eyre::Result<()> {
    let context = postgres_context(postgres_cluster).map_err(|err| eyre!(err))?;
    let projects = &context.repositories.projects;
    let id = projects
        .add_one(NewProject {
            name: "Corrupt".to_owned(),
            description: String::new(),
            tasks: None,
        })
        .await
        .wrap_err("insert project")?;
    let mut connection = context.pool.get()?;
    connection.batch_execute(&format!(
        r#"UPDATE projects SET tasks = '["not-an-id"]' WHERE id = {}"#,
        id.value()
    ))?;

    let result = projects.get_by_id(id).await;

    ensure!(
        matches!(
            result,
            Err(TrackerError::Store(StoreError::InvalidPersistedData(_)))
        ),
        "expected invalid persisted data, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn long_text_values_are_stored_unbounded(
    postgres_cluster: Result<PostgresCluster, BoxError>,
) -> eyre::Result<()> {
    let context = postgres_context(postgres_cluster).map_err(|err| eyre!(err))?;
    let repositories = &context.repositories;
    let long_name = "x".repeat(300);
    let long_login = "l".repeat(300);

    let task_id = repositories
        .tasks
        .add_one(task_payload(&long_name))
        .await
        .wrap_err("insert task with a long name")?;
    let user_id = repositories
        .users
        .add_one(user_payload(&long_login))
        .await
        .wrap_err("insert user with a long login")?;

    let task = repositories
        .tasks
        .get_by_id(task_id)
        .await
        .wrap_err("fetch task")?
        .ok_or_else(|| eyre!("task {task_id} missing"))?;
    let user = repositories
        .users
        .get_by_id(user_id)
        .await
        .wrap_err("fetch user")?
        .ok_or_else(|| eyre!("user {user_id} missing"))?;
    ensure!(task.name == long_name, "task name was altered");
    ensure!(
        user.login == long_login && user.email == format!("{long_login}@example.nl"),
        "user text columns were altered"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn merged_date_ranges_are_checked_inside_the_transaction(
    postgres_cluster: Result<PostgresCluster, BoxError>,
) -> eyre::Result<()> {
    let context = postgres_context(postgres_cluster).map_err(|err| eyre!(err))?;
    let tasks = &context.repositories.tasks;
    let id = tasks
        .add_one(task_payload("Ranges"))
        .await
        .wrap_err("insert task")?;

    let result = tasks
        .update_one(
            id,
            TaskPatch {
                date_end: Some(1_600_000_000),
                status: Some(4),
                ..TaskPatch::default()
            },
        )
        .await;

    ensure!(
        matches!(
            result,
            Err(TrackerError::Validation(
                ValidationError::InvertedDateRange { .. }
            ))
        ),
        "expected an inverted range error, got {result:?}"
    );
    let task = tasks
        .get_by_id(id)
        .await
        .wrap_err("fetch task")?
        .ok_or_else(|| eyre!("task {id} missing"))?;
    ensure!(
        task.date_end.is_none() && task.status == 2,
        "rejected patch was partly persisted: {task:?}"
    );
    Ok(())
}
