//! Diesel schema for project persistence.

diesel::table! {
    /// Project records with their ordered task references.
    projects (id) {
        /// Project identifier.
        id -> Uuid,
        /// Project name.
        name -> Text,
        /// Project description.
        description -> Text,
        /// Task references in attachment order.
        task_ids -> Array<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
