//! User schemas.

use super::entity::{require_optional_text, require_references, require_text};
use super::{
    Entity, EntityKind, FieldKind, FieldValue, FilterField, RecordId, Validate, ValidationError,
};
use serde::{Deserialize, Serialize};

/// Create schema for a user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewUser {
    /// Unique login name.
    pub login: String,
    /// Stored credential.
    pub password: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub second_name: String,
    /// Patronymic or middle name.
    pub middle_name: String,
    /// Contact e-mail.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Administrator flag.
    #[serde(default)]
    pub is_admin: bool,
    /// Favourite task ids.
    #[serde(default)]
    pub fav_tasks: Option<Vec<RecordId>>,
}

impl Validate for NewUser {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("login", &self.login)?;
        require_text("password", &self.password)?;
        require_references("fav_tasks", self.fav_tasks.as_deref())
    }
}

/// Partial-update schema for a user. The login is fixed at creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserPatch {
    /// New credential.
    pub password: Option<String>,
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub second_name: Option<String>,
    /// New middle name.
    pub middle_name: Option<String>,
    /// New e-mail.
    pub email: Option<String>,
    /// New phone.
    pub phone: Option<String>,
    /// New administrator flag.
    pub is_admin: Option<bool>,
    /// Replacement favourite-task list.
    pub fav_tasks: Option<Vec<RecordId>>,
}

impl Validate for UserPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        require_optional_text("password", self.password.as_deref())?;
        require_references("fav_tasks", self.fav_tasks.as_deref())
    }
}

/// Read schema for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    id: RecordId,
    /// Unique login name.
    pub login: String,
    /// Stored credential.
    pub password: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub second_name: String,
    /// Patronymic or middle name.
    pub middle_name: String,
    /// Contact e-mail.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Administrator flag.
    pub is_admin: bool,
    /// Favourite task ids.
    pub fav_tasks: Option<Vec<RecordId>>,
}

impl User {
    /// Returns the store-assigned identifier.
    #[must_use]
    pub const fn id(&self) -> RecordId {
        self.id
    }
}

/// Filterable user fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
    /// `login`
    Login,
    /// `email`
    Email,
    /// `is_admin`
    IsAdmin,
}

impl FilterField for UserField {
    const ALL: &'static [Self] = &[Self::Login, Self::Email, Self::IsAdmin];

    fn name(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Email => "email",
            Self::IsAdmin => "is_admin",
        }
    }

    fn kind(self) -> FieldKind {
        match self {
            Self::Login | Self::Email => FieldKind::Text,
            Self::IsAdmin => FieldKind::Bool,
        }
    }
}

impl Entity for User {
    type Draft = NewUser;
    type Patch = UserPatch;
    type Field = UserField;

    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_draft(id: RecordId, draft: NewUser) -> Self {
        let NewUser {
            login,
            password,
            first_name,
            second_name,
            middle_name,
            email,
            phone,
            is_admin,
            fav_tasks,
        } = draft;
        Self {
            id,
            login,
            password,
            first_name,
            second_name,
            middle_name,
            email,
            phone,
            is_admin,
            fav_tasks,
        }
    }

    fn apply_patch(&mut self, patch: UserPatch) {
        let UserPatch {
            password,
            first_name,
            second_name,
            middle_name,
            email,
            phone,
            is_admin,
            fav_tasks,
        } = patch;
        if let Some(value) = password {
            self.password = value;
        }
        if let Some(value) = first_name {
            self.first_name = value;
        }
        if let Some(value) = second_name {
            self.second_name = value;
        }
        if let Some(value) = middle_name {
            self.middle_name = value;
        }
        if let Some(value) = email {
            self.email = value;
        }
        if let Some(value) = phone {
            self.phone = value;
        }
        if let Some(value) = is_admin {
            self.is_admin = value;
        }
        if fav_tasks.is_some() {
            self.fav_tasks = fav_tasks;
        }
    }

    fn field_value(&self, field: UserField) -> Option<FieldValue> {
        Some(match field {
            UserField::Login => FieldValue::from(self.login.as_str()),
            UserField::Email => FieldValue::from(self.email.as_str()),
            UserField::IsAdmin => FieldValue::Bool(self.is_admin),
        })
    }
}
