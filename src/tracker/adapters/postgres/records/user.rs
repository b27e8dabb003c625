//! User rows.

use diesel::pg::PgConnection;
use diesel::prelude::*;
use serde_json::Value;

use super::{ids_from_json, ids_to_json, unsupported};
use crate::tracker::{
    adapters::postgres::{record_store::PgEntity, schema::users},
    domain::{Entity, FieldFilter, FieldValue, NewUser, RecordId, User, UserField},
    ports::StoreResult,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct UserRow {
    id: i32,
    login: String,
    password: String,
    first_name: String,
    second_name: String,
    middle_name: String,
    email: String,
    phone: String,
    is_admin: bool,
    fav_tasks: Option<Value>,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = users, treat_none_as_null = true)]
struct UserValues {
    login: String,
    password: String,
    first_name: String,
    second_name: String,
    middle_name: String,
    email: String,
    phone: String,
    is_admin: bool,
    fav_tasks: Option<Value>,
}

impl UserRow {
    fn into_user(self) -> StoreResult<User> {
        let draft = NewUser {
            login: self.login,
            password: self.password,
            first_name: self.first_name,
            second_name: self.second_name,
            middle_name: self.middle_name,
            email: self.email,
            phone: self.phone,
            is_admin: self.is_admin,
            fav_tasks: ids_from_json(self.fav_tasks)?,
        };
        Ok(User::from_draft(RecordId::new(self.id), draft))
    }
}

impl UserValues {
    fn from_draft(draft: NewUser) -> StoreResult<Self> {
        Ok(Self {
            fav_tasks: ids_to_json(draft.fav_tasks.as_deref())?,
            login: draft.login,
            password: draft.password,
            first_name: draft.first_name,
            second_name: draft.second_name,
            middle_name: draft.middle_name,
            email: draft.email,
            phone: draft.phone,
            is_admin: draft.is_admin,
        })
    }

    fn from_user(user: &User) -> StoreResult<Self> {
        Ok(Self {
            login: user.login.clone(),
            password: user.password.clone(),
            first_name: user.first_name.clone(),
            second_name: user.second_name.clone(),
            middle_name: user.middle_name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            is_admin: user.is_admin,
            fav_tasks: ids_to_json(user.fav_tasks.as_deref())?,
        })
    }
}

fn decode_all(rows: Vec<UserRow>) -> StoreResult<Vec<User>> {
    rows.into_iter().map(UserRow::into_user).collect()
}

impl PgEntity for User {
    fn insert(connection: &mut PgConnection, draft: NewUser) -> StoreResult<RecordId> {
        let values = UserValues::from_draft(draft)?;
        let id = diesel::insert_into(users::table)
            .values(&values)
            .returning(users::id)
            .get_result::<i32>(connection)?;
        Ok(RecordId::new(id))
    }

    fn load(connection: &mut PgConnection, id: RecordId) -> StoreResult<Option<Self>> {
        users::table
            .find(id.value())
            .select(UserRow::as_select())
            .first::<UserRow>(connection)
            .optional()?
            .map(UserRow::into_user)
            .transpose()
    }

    fn lock(connection: &mut PgConnection, id: RecordId) -> StoreResult<Option<Self>> {
        users::table
            .find(id.value())
            .select(UserRow::as_select())
            .for_update()
            .first::<UserRow>(connection)
            .optional()?
            .map(UserRow::into_user)
            .transpose()
    }

    fn load_all(connection: &mut PgConnection) -> StoreResult<Vec<Self>> {
        let rows = users::table
            .select(UserRow::as_select())
            .order(users::id.asc())
            .load::<UserRow>(connection)?;
        decode_all(rows)
    }

    fn load_many(connection: &mut PgConnection, ids: &[i32]) -> StoreResult<Vec<Self>> {
        let rows = users::table
            .filter(users::id.eq_any(ids))
            .select(UserRow::as_select())
            .order(users::id.asc())
            .load::<UserRow>(connection)?;
        decode_all(rows)
    }

    fn load_matching(
        connection: &mut PgConnection,
        filter: &FieldFilter<Self>,
    ) -> StoreResult<Vec<Self>> {
        let unfiltered = users::table
            .select(UserRow::as_select())
            .order(users::id.asc())
            .into_boxed();
        let query = match (filter.field(), filter.value()) {
            (UserField::Login, FieldValue::Text(login)) => {
                unfiltered.filter(users::login.eq(login.clone()))
            }
            (UserField::Email, FieldValue::Text(email)) => {
                unfiltered.filter(users::email.eq(email.clone()))
            }
            (UserField::IsAdmin, FieldValue::Bool(flag)) => {
                unfiltered.filter(users::is_admin.eq(*flag))
            }
            (field, _) => return Err(unsupported(Self::KIND, field)),
        };
        decode_all(query.load::<UserRow>(connection)?)
    }

    fn save(connection: &mut PgConnection, record: &Self) -> StoreResult<()> {
        let values = UserValues::from_user(record)?;
        diesel::update(users::table.find(record.id().value()))
            .set(&values)
            .execute(connection)?;
        Ok(())
    }
}
