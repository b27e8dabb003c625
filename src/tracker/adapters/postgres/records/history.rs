//! History element rows.

use diesel::pg::PgConnection;
use diesel::prelude::*;
use serde_json::Value;

use super::{ids_from_json, ids_to_json, unsupported};
use crate::tracker::{
    adapters::postgres::{record_store::PgEntity, schema::history_elements},
    domain::{
        Entity, FieldFilter, FieldValue, HistoryElement, HistoryField, NewHistoryElement, RecordId,
    },
    ports::StoreResult,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = history_elements)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct HistoryRow {
    id: i32,
    timestamp: i64,
    text: Option<String>,
    by_user: i32,
    new_date_start: Option<i64>,
    new_date_end: Option<i64>,
    new_progress: Option<i16>,
    new_status: Option<i16>,
    new_priority: Option<i16>,
    new_executor: Option<i32>,
    new_related_tasks: Option<Value>,
    files: Option<Value>,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = history_elements, treat_none_as_null = true)]
struct HistoryValues {
    timestamp: i64,
    text: Option<String>,
    by_user: i32,
    new_date_start: Option<i64>,
    new_date_end: Option<i64>,
    new_progress: Option<i16>,
    new_status: Option<i16>,
    new_priority: Option<i16>,
    new_executor: Option<i32>,
    new_related_tasks: Option<Value>,
    files: Option<Value>,
}

impl HistoryRow {
    fn into_element(self) -> StoreResult<HistoryElement> {
        let draft = NewHistoryElement {
            timestamp: self.timestamp,
            text: self.text,
            by_user: RecordId::new(self.by_user),
            new_date_start: self.new_date_start,
            new_date_end: self.new_date_end,
            new_progress: self.new_progress,
            new_status: self.new_status,
            new_priority: self.new_priority,
            new_executor: self.new_executor.map(RecordId::new),
            new_related_tasks: ids_from_json(self.new_related_tasks)?,
        };
        Ok(HistoryElement::from_draft(RecordId::new(self.id), draft)
            .with_files(ids_from_json(self.files)?))
    }
}

impl HistoryValues {
    fn from_draft(draft: NewHistoryElement) -> StoreResult<Self> {
        Ok(Self {
            new_related_tasks: ids_to_json(draft.new_related_tasks.as_deref())?,
            timestamp: draft.timestamp,
            text: draft.text,
            by_user: draft.by_user.value(),
            new_date_start: draft.new_date_start,
            new_date_end: draft.new_date_end,
            new_progress: draft.new_progress,
            new_status: draft.new_status,
            new_priority: draft.new_priority,
            new_executor: draft.new_executor.map(RecordId::value),
            files: None,
        })
    }

    fn from_element(element: &HistoryElement) -> StoreResult<Self> {
        Ok(Self {
            timestamp: element.timestamp,
            text: element.text.clone(),
            by_user: element.by_user.value(),
            new_date_start: element.new_date_start,
            new_date_end: element.new_date_end,
            new_progress: element.new_progress,
            new_status: element.new_status,
            new_priority: element.new_priority,
            new_executor: element.new_executor.map(RecordId::value),
            new_related_tasks: ids_to_json(element.new_related_tasks.as_deref())?,
            files: ids_to_json(element.files())?,
        })
    }
}

fn decode_all(rows: Vec<HistoryRow>) -> StoreResult<Vec<HistoryElement>> {
    rows.into_iter().map(HistoryRow::into_element).collect()
}

impl PgEntity for HistoryElement {
    fn insert(connection: &mut PgConnection, draft: NewHistoryElement) -> StoreResult<RecordId> {
        let values = HistoryValues::from_draft(draft)?;
        let id = diesel::insert_into(history_elements::table)
            .values(&values)
            .returning(history_elements::id)
            .get_result::<i32>(connection)?;
        Ok(RecordId::new(id))
    }

    fn load(connection: &mut PgConnection, id: RecordId) -> StoreResult<Option<Self>> {
        history_elements::table
            .find(id.value())
            .select(HistoryRow::as_select())
            .first::<HistoryRow>(connection)
            .optional()?
            .map(HistoryRow::into_element)
            .transpose()
    }

    fn lock(connection: &mut PgConnection, id: RecordId) -> StoreResult<Option<Self>> {
        history_elements::table
            .find(id.value())
            .select(HistoryRow::as_select())
            .for_update()
            .first::<HistoryRow>(connection)
            .optional()?
            .map(HistoryRow::into_element)
            .transpose()
    }

    fn load_all(connection: &mut PgConnection) -> StoreResult<Vec<Self>> {
        let rows = history_elements::table
            .select(HistoryRow::as_select())
            .order(history_elements::id.asc())
            .load::<HistoryRow>(connection)?;
        decode_all(rows)
    }

    fn load_many(connection: &mut PgConnection, ids: &[i32]) -> StoreResult<Vec<Self>> {
        let rows = history_elements::table
            .filter(history_elements::id.eq_any(ids))
            .select(HistoryRow::as_select())
            .order(history_elements::id.asc())
            .load::<HistoryRow>(connection)?;
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
        let unfiltered = history_elements::table
            .select(HistoryRow::as_select())
            .order(history_elements::id.asc())
            .into_boxed();
        let query = match field {
            HistoryField::ByUser => unfiltered.filter(history_elements::by_user.eq(value)),
            HistoryField::NewExecutor => {
                unfiltered.filter(history_elements::new_executor.eq(value))
            }
            HistoryField::NewStatus => {
                let Ok(status) = i16::try_from(value) else {
                    return Ok(Vec::new());
                };
                unfiltered.filter(history_elements::new_status.eq(status))
            }
        };
        decode_all(query.load::<HistoryRow>(connection)?)
    }

    fn save(connection: &mut PgConnection, record: &Self) -> StoreResult<()> {
        let values = HistoryValues::from_element(record)?;
        diesel::update(history_elements::table.find(record.id().value()))
            .set(&values)
            .execute(connection)?;
        Ok(())
    }
}
