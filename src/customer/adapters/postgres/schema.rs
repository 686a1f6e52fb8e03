//! Diesel schema for customer persistence.

diesel::table! {
    /// Customer records with structured address and optional coordinates.
    customers (id) {
        /// Internal customer identifier.
        id -> Uuid,
        /// Customer name.
        #[max_length = 200]
        name -> Varchar,
        /// Street line.
        #[max_length = 255]
        street -> Varchar,
        /// City.
        #[max_length = 100]
        city -> Varchar,
        /// State or region.
        #[max_length = 100]
        state -> Varchar,
        /// Postal code.
        #[max_length = 12]
        postal_code -> Varchar,
        /// Geocoded latitude.
        latitude -> Nullable<Float8>,
        /// Geocoded longitude.
        longitude -> Nullable<Float8>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
