//! Diesel schema for task persistence.

diesel::table! {
    /// Task records scoped to a single project.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning project identifier.
        project_id -> Uuid,
        /// Task title.
        title -> Text,
        /// Free-form description, possibly empty.
        description -> Text,
        /// Inclusive start of the scheduled window.
        start_time -> Timestamptz,
        /// Exclusive end of the scheduled window.
        end_time -> Timestamptz,
        /// Completion flag.
        completed -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
