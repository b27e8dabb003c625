//! File metadata rows.
//!
//! File records are never updated, so only the insert model exists.

use diesel::pg::PgConnection;
use diesel::prelude::*;

use super::unsupported;
use crate::tracker::{
    adapters::postgres::{record_store::PgEntity, schema::files},
    domain::{Entity, FieldFilter, FieldValue, FileField, FileRecord, NewFile, RecordId},
    ports::{StoreError, StoreResult},
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = files)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct FileRow {
    id: i32,
    name: String,
    path: String,
    size: i64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = files)]
struct NewFileRow {
    name: String,
    path: String,
    size: i64,
}

impl FileRow {
    fn into_file(self) -> StoreResult<FileRecord> {
        let size = u64::try_from(self.size).map_err(StoreError::invalid_persisted_data)?;
        let draft = NewFile {
            name: self.name,
            path: self.path,
            size,
        };
        Ok(FileRecord::from_draft(RecordId::new(self.id), draft))
    }
}

fn decode_all(rows: Vec<FileRow>) -> StoreResult<Vec<FileRecord>> {
    rows.into_iter().map(FileRow::into_file).collect()
}

impl PgEntity for FileRecord {
    fn insert(connection: &mut PgConnection, draft: NewFile) -> StoreResult<RecordId> {
        let row = NewFileRow {
            size: i64::try_from(draft.size).map_err(StoreError::persistence)?,
            name: draft.name,
            path: draft.path,
        };
        let id = diesel::insert_into(files::table)
            .values(&row)
            .returning(files::id)
            .get_result::<i32>(connection)?;
        Ok(RecordId::new(id))
    }

    fn load(connection: &mut PgConnection, id: RecordId) -> StoreResult<Option<Self>> {
        files::table
            .find(id.value())
            .select(FileRow::as_select())
            .first::<FileRow>(connection)
            .optional()?
            .map(FileRow::into_file)
            .transpose()
    }

    fn lock(connection: &mut PgConnection, id: RecordId) -> StoreResult<Option<Self>> {
        files::table
            .find(id.value())
            .select(FileRow::as_select())
            .for_update()
            .first::<FileRow>(connection)
            .optional()?
            .map(FileRow::into_file)
            .transpose()
    }

    fn load_all(connection: &mut PgConnection) -> StoreResult<Vec<Self>> {
        let rows = files::table
            .select(FileRow::as_select())
            .order(files::id.asc())
            .load::<FileRow>(connection)?;
        decode_all(rows)
    }

    fn load_many(connection: &mut PgConnection, ids: &[i32]) -> StoreResult<Vec<Self>> {
        let rows = files::table
            .filter(files::id.eq_any(ids))
            .select(FileRow::as_select())
            .order(files::id.asc())
            .load::<FileRow>(connection)?;
        decode_all(rows)
    }

    fn load_matching(
        connection: &mut PgConnection,
        filter: &FieldFilter<Self>,
    ) -> StoreResult<Vec<Self>> {
        let (FileField::Name, FieldValue::Text(name)) = (filter.field(), filter.value()) else {
            return Err(unsupported(Self::KIND, filter.field()));
        };
        let rows = files::table
            .filter(files::name.eq(name))
            .select(FileRow::as_select())
            .order(files::id.asc())
            .load::<FileRow>(connection)?;
        decode_all(rows)
    }

    fn save(_connection: &mut PgConnection, _record: &Self) -> StoreResult<()> {
        Ok(())
    }
}
