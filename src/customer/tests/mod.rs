//! Unit tests for the customer context.

mod service_tests;
