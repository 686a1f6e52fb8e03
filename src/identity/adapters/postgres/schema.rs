//! Diesel schema for user account persistence.

diesel::table! {
    /// User accounts with role, status, and credential digest.
    users (id) {
        /// Internal account identifier.
        id -> Uuid,
        /// Human-readable display name.
        #[max_length = 120]
        display_name -> Varchar,
        /// Normalized email address.
        #[max_length = 254]
        email -> Varchar,
        /// Assigned role.
        #[max_length = 20]
        role -> Varchar,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Skill tag payload.
        skills -> Jsonb,
        /// Bcrypt password digest.
        #[max_length = 100]
        password_hash -> Varchar,
        /// Most recent login timestamp.
        last_login -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
