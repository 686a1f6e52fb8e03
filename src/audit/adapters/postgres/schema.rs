//! Diesel schema for action log persistence.

diesel::table! {
    /// Append-only audit records.
    action_logs (id) {
        /// Internal entry identifier.
        id -> Uuid,
        /// Acting user identifier.
        actor_id -> Uuid,
        /// Dotted action verb.
        #[max_length = 100]
        action -> Varchar,
        /// Resource kind the action touched.
        #[max_length = 30]
        resource_kind -> Varchar,
        /// Resource identifier, if any.
        #[max_length = 100]
        resource_id -> Nullable<Varchar>,
        /// Free-form details payload.
        details -> Jsonb,
        /// Remote address, if known.
        #[max_length = 64]
        origin_ip -> Nullable<Varchar>,
        /// User-agent header, if present.
        #[max_length = 255]
        user_agent -> Nullable<Varchar>,
        /// Record timestamp.
        recorded_at -> Timestamptz,
    }
}
