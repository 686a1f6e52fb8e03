//! Travel estimator implementations.

mod haversine;
mod table_client;

pub use haversine::HaversineEstimator;
pub use table_client::{TableServiceClient, TableServiceConfig};
