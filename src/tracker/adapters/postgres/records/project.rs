//! Project rows.

use diesel::pg::PgConnection;
use diesel::prelude::*;
use serde_json::Value;

use super::{ids_from_json, ids_to_json, unsupported};
use crate::tracker::{
    adapters::postgres::{record_store::PgEntity, schema::projects},
    domain::{Entity, FieldFilter, FieldValue, NewProject, Project, ProjectField, RecordId},
    ports::StoreResult,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct ProjectRow {
    id: i32,
    name: String,
    description: String,
    tasks: Option<Value>,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = projects, treat_none_as_null = true)]
struct ProjectValues {
    name: String,
    description: String,
    tasks: Option<Value>,
}

impl ProjectRow {
    fn into_project(self) -> StoreResult<Project> {
        let draft = NewProject {
            name: self.name,
            description: self.description,
            tasks: ids_from_json(self.tasks)?,
        };
        Ok(Project::from_draft(RecordId::new(self.id), draft))
    }
}

fn decode_all(rows: Vec<ProjectRow>) -> StoreResult<Vec<Project>> {
    rows.into_iter().map(ProjectRow::into_project).collect()
}

impl PgEntity for Project {
    fn insert(connection: &mut PgConnection, draft: NewProject) -> StoreResult<RecordId> {
        let values = ProjectValues {
            tasks: ids_to_json(draft.tasks.as_deref())?,
            name: draft.name,
            description: draft.description,
        };
        let id = diesel::insert_into(projects::table)
            .values(&values)
            .returning(projects::id)
            .get_result::<i32>(connection)?;
        Ok(RecordId::new(id))
    }

    fn load(connection: &mut PgConnection, id: RecordId) -> StoreResult<Option<Self>> {
        projects::table
            .find(id.value())
            .select(ProjectRow::as_select())
            .first::<ProjectRow>(connection)
            .optional()?
            .map(ProjectRow::into_project)
            .transpose()
    }

    fn lock(connection: &mut PgConnection, id: RecordId) -> StoreResult<Option<Self>> {
        projects::table
            .find(id.value())
            .select(ProjectRow::as_select())
            .for_update()
            .first::<ProjectRow>(connection)
            .optional()?
            .map(ProjectRow::into_project)
            .transpose()
    }

    fn load_all(connection: &mut PgConnection) -> StoreResult<Vec<Self>> {
        let rows = projects::table
            .select(ProjectRow::as_select())
            .order(projects::id.asc())
            .load::<ProjectRow>(connection)?;
        decode_all(rows)
    }

    fn load_many(connection: &mut PgConnection, ids: &[i32]) -> StoreResult<Vec<Self>> {
        let rows = projects::table
            .filter(projects::id.eq_any(ids))
            .select(ProjectRow::as_select())
            .order(projects::id.asc())
            .load::<ProjectRow>(connection)?;
        decode_all(rows)
    }

    fn load_matching(
        connection: &mut PgConnection,
        filter: &FieldFilter<Self>,
    ) -> StoreResult<Vec<Self>> {
        let (ProjectField::Name, FieldValue::Text(name)) = (filter.field(), filter.value()) else {
            return Err(unsupported(Self::KIND, filter.field()));
        };
        let rows = projects::table
            .filter(projects::name.eq(name))
            .select(ProjectRow::as_select())
            .order(projects::id.asc())
            .load::<ProjectRow>(connection)?;
        decode_all(rows)
    }

    fn save(connection: &mut PgConnection, record: &Self) -> StoreResult<()> {
        let values = ProjectValues {
            name: record.name.clone(),
            description: record.description.clone(),
            tasks: ids_to_json(record.tasks.as_deref())?,
        };
        diesel::update(projects::table.find(record.id().value()))
            .set(&values)
            .execute(connection)?;
        Ok(())
    }
}
