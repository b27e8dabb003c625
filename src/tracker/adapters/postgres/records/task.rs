//! Task rows.

use diesel::pg::PgConnection;
use diesel::prelude::*;
use serde_json::Value;

use super::{ids_from_json, ids_to_json, unsupported};
use crate::tracker::{
    adapters::postgres::{record_store::PgEntity, schema::tasks},
    domain::{Entity, FieldFilter, FieldValue, NewTask, RecordId, Task, TaskField},
    ports::StoreResult,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct TaskRow {
    id: i32,
    name: String,
    description: String,
    date_start: Option<i64>,
    date_end: Option<i64>,
    progress: i16,
    status: i16,
    priority: i16,
    created_by: i32,
    admin: i32,
    executor: i32,
    last_modified_time: Option<i64>,
    history: Option<Value>,
    related_tasks: Option<Value>,
    files: Option<Value>,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = tasks, treat_none_as_null = true)]
struct TaskValues {
    name: String,
    description: String,
    date_start: Option<i64>,
    date_end: Option<i64>,
    progress: i16,
    status: i16,
    priority: i16,
    created_by: i32,
    admin: i32,
    executor: i32,
    last_modified_time: Option<i64>,
    history: Option<Value>,
    related_tasks: Option<Value>,
    files: Option<Value>,
}

impl TaskRow {
    fn into_task(self) -> StoreResult<Task> {
        let draft = NewTask {
            name: self.name,
            description: self.description,
            date_start: self.date_start,
            date_end: self.date_end,
            progress: self.progress,
            status: self.status,
            priority: self.priority,
            created_by: RecordId::new(self.created_by),
            admin: RecordId::new(self.admin),
            executor: RecordId::new(self.executor),
            last_modified_time: self.last_modified_time,
        };
        Ok(Task::from_draft(RecordId::new(self.id), draft).with_links(
            ids_from_json(self.history)?,
            ids_from_json(self.related_tasks)?,
            ids_from_json(self.files)?,
        ))
    }
}

impl TaskValues {
    fn from_draft(draft: NewTask) -> Self {
        Self {
            name: draft.name,
            description: draft.description,
            date_start: draft.date_start,
            date_end: draft.date_end,
            progress: draft.progress,
            status: draft.status,
            priority: draft.priority,
            created_by: draft.created_by.value(),
            admin: draft.admin.value(),
            executor: draft.executor.value(),
            last_modified_time: draft.last_modified_time,
            history: None,
            related_tasks: None,
            files: None,
        }
    }

    fn from_task(task: &Task) -> StoreResult<Self> {
        Ok(Self {
            name: task.name.clone(),
            description: task.description.clone(),
            date_start: task.date_start,
            date_end: task.date_end,
            progress: task.progress,
            status: task.status,
            priority: task.priority,
            created_by: task.created_by.value(),
            admin: task.admin.value(),
            executor: task.executor.value(),
            last_modified_time: task.last_modified_time,
            history: ids_to_json(task.history.as_deref())?,
            related_tasks: ids_to_json(task.related_tasks.as_deref())?,
            files: ids_to_json(task.files())?,
        })
    }
}

fn decode_all(rows: Vec<TaskRow>) -> StoreResult<Vec<Task>> {
    rows.into_iter().map(TaskRow::into_task).collect()
}

impl PgEntity for Task {
    fn insert(connection: &mut PgConnection, draft: NewTask) -> StoreResult<RecordId> {
        let values = TaskValues::from_draft(draft);
        let id = diesel::insert_into(tasks::table)
            .values(&values)
            .returning(tasks::id)
            .get_result::<i32>(connection)?;
        Ok(RecordId::new(id))
    }

    fn load(connection: &mut PgConnection, id: RecordId) -> StoreResult<Option<Self>> {
        tasks::table
            .find(id.value())
            .select(TaskRow::as_select())
            .first::<TaskRow>(connection)
            .optional()?
            .map(TaskRow::into_task)
            .transpose()
    }

    fn lock(connection: &mut PgConnection, id: RecordId) -> StoreResult<Option<Self>> {
        tasks::table
            .find(id.value())
            .select(TaskRow::as_select())
            .for_update()
            .first::<TaskRow>(connection)
            .optional()?
            .map(TaskRow::into_task)
            .transpose()
    }

    fn load_all(connection: &mut PgConnection) -> StoreResult<Vec<Self>> {
        let rows = tasks::table
            .select(TaskRow::as_select())
            .order(tasks::id.asc())
            .load::<TaskRow>(connection)?;
        decode_all(rows)
    }

    fn load_many(connection: &mut PgConnection, ids: &[i32]) -> StoreResult<Vec<Self>> {
        let rows = tasks::table
            .filter(tasks::id.eq_any(ids))
            .select(TaskRow::as_select())
            .order(tasks::id.asc())
            .load::<TaskRow>(connection)?;
        decode_all(rows)
    }

    fn load_matching(
        connection: &mut PgConnection,
        filter: &FieldFilter<Self>,
    ) -> StoreResult<Vec<Self>> {
        let field = filter.field();
        let FieldValue::Int(value) = *filter.value() else {
            return Err(unsupported(Self::KIND, field));
        };
        let unfiltered = tasks::table
            .select(TaskRow::as_select())
            .order(tasks::id.asc())
            .into_boxed();
        // Codes are SMALLINT, so a wider value cannot match any row.
        let code = i16::try_from(value).ok();
        let query = match (field, code) {
            (TaskField::CreatedBy, _) => unfiltered.filter(tasks::created_by.eq(value)),
            (TaskField::Admin, _) => unfiltered.filter(tasks::admin.eq(value)),
            (TaskField::Executor, _) => unfiltered.filter(tasks::executor.eq(value)),
            (TaskField::Status, Some(status)) => unfiltered.filter(tasks::status.eq(status)),
            (TaskField::Priority, Some(priority)) => {
                unfiltered.filter(tasks::priority.eq(priority))
            }
            (TaskField::Progress, Some(progress)) => {
                unfiltered.filter(tasks::progress.eq(progress))
            }
            (TaskField::Status | TaskField::Priority | TaskField::Progress, None) => {
                return Ok(Vec::new());
            }
        };
        decode_all(query.load::<TaskRow>(connection)?)
    }

    fn save(connection: &mut PgConnection, record: &Self) -> StoreResult<()> {
        let values = TaskValues::from_task(record)?;
        diesel::update(tasks::table.find(record.id().value()))
            .set(&values)
            .execute(connection)?;
        Ok(())
    }
}
