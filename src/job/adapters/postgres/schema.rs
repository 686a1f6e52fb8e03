//! Diesel schema for job persistence.

diesel::table! {
    /// Job records with lifecycle status and assignment.
    jobs (id) {
        /// Internal job identifier.
        id -> Uuid,
        /// Job name.
        #[max_length = 200]
        name -> Varchar,
        /// Free-form description.
        description -> Nullable<Text>,
        /// Owning customer identifier.
        customer_id -> Uuid,
        /// Kind of field work.
        #[max_length = 30]
        service_type -> Varchar,
        /// Scheduling priority.
        #[max_length = 10]
        priority -> Varchar,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Assigned technician identifier.
        technician_id -> Nullable<Uuid>,
        /// Target service date.
        scheduled_date -> Date,
        /// Estimated on-site duration in minutes.
        estimated_minutes -> Int4,
        /// Required skill payload.
        required_skills -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
