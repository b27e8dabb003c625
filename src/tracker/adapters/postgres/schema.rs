//! Diesel schema for tracker persistence.

diesel::table! {
    /// Tracker users.
    users (id) {
        /// Store-assigned identifier.
        id -> Int4,
        /// Login name.
        login -> Text,
        /// Stored credential.
        password -> Text,
        /// Given name.
        first_name -> Text,
        /// Family name.
        second_name -> Text,
        /// Middle name.
        middle_name -> Text,
        /// Contact e-mail.
        email -> Text,
        /// Contact phone.
        phone -> Text,
        /// Administrator flag.
        is_admin -> Bool,
        /// Favourite task ids as a JSON array.
        fav_tasks -> Nullable<Jsonb>,
    }
}

diesel::table! {
    /// Projects.
    projects (id) {
        /// Store-assigned identifier.
        id -> Int4,
        /// Project name.
        name -> Text,
        /// Project description.
        description -> Text,
        /// Member task ids as a JSON array.
        tasks -> Nullable<Jsonb>,
    }
}

diesel::table! {
    /// Tasks.
    tasks (id) {
        /// Store-assigned identifier.
        id -> Int4,
        /// Task name.
        name -> Text,
        /// Task description.
        description -> Text,
        /// Planned start, epoch seconds.
        date_start -> Nullable<Int8>,
        /// Planned end, epoch seconds.
        date_end -> Nullable<Int8>,
        /// Progress code.
        progress -> Int2,
        /// Status code.
        status -> Int2,
        /// Priority code.
        priority -> Int2,
        /// Creating user id.
        created_by -> Int4,
        /// Administering user id.
        admin -> Int4,
        /// Executing user id.
        executor -> Int4,
        /// Last modification, epoch seconds.
        last_modified_time -> Nullable<Int8>,
        /// History element ids as a JSON array.
        history -> Nullable<Jsonb>,
        /// Related task ids as a JSON array.
        related_tasks -> Nullable<Jsonb>,
        /// Attached file ids as a JSON array.
        files -> Nullable<Jsonb>,
    }
}

diesel::table! {
    /// Task change-history entries.
    history_elements (id) {
        /// Store-assigned identifier.
        id -> Int4,
        /// Time of the change, epoch seconds.
        timestamp -> Int8,
        /// Free-form comment.
        text -> Nullable<Text>,
        /// Authoring user id.
        by_user -> Int4,
        /// Recorded start date.
        new_date_start -> Nullable<Int8>,
        /// Recorded end date.
        new_date_end -> Nullable<Int8>,
        /// Recorded progress code.
        new_progress -> Nullable<Int2>,
        /// Recorded status code.
        new_status -> Nullable<Int2>,
        /// Recorded priority code.
        new_priority -> Nullable<Int2>,
        /// Recorded executor id.
        new_executor -> Nullable<Int4>,
        /// Recorded related task ids as a JSON array.
        new_related_tasks -> Nullable<Jsonb>,
        /// Attached file ids as a JSON array.
        files -> Nullable<Jsonb>,
    }
}

diesel::table! {
    /// Uploaded file metadata.
    files (id) {
        /// Store-assigned identifier.
        id -> Int4,
        /// Original file name.
        name -> Text,
        /// Storage path.
        path -> Text,
        /// Size in bytes.
        size -> Int8,
    }
}
