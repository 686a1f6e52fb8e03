//! Repository integration tests against embedded `PostgreSQL`.
//!
//! Each test boots its own throwaway server via `postgresql_embedded`,
//! applies the migrations, and exercises the Diesel adapters for real.
//! The suite is `#[ignore]`d by default because the first run downloads
//! `PostgreSQL` binaries; opt in with `cargo test -- --ignored`.

#[path = "postgres/action_log_tests.rs"]
mod action_log_tests;
#[path = "postgres/customer_repository_tests.rs"]
mod customer_repository_tests;
#[path = "postgres/harness.rs"]
mod harness;
#[path = "postgres/job_repository_tests.rs"]
mod job_repository_tests;
#[path = "postgres/route_plan_tests.rs"]
mod route_plan_tests;
#[path = "postgres/user_repository_tests.rs"]
mod user_repository_tests;
