//! Diesel schema for route plan persistence.

diesel::table! {
    /// Persisted route plans, unique per technician and service date.
    route_plans (id) {
        /// Internal plan identifier.
        id -> Uuid,
        /// Technician the plan belongs to.
        technician_id -> Uuid,
        /// Planned service date.
        service_date -> Date,
        /// Ordered stop payload.
        stops -> Jsonb,
        /// How the ordering was produced.
        #[max_length = 20]
        ordering -> Varchar,
        /// Total driving distance in metres.
        distance_meters -> Int8,
        /// Total driving time in seconds.
        travel_seconds -> Int8,
        /// Total on-site service time in minutes.
        service_minutes -> Int4,
        /// Estimated fuel cost in cents.
        fuel_cost_cents -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
