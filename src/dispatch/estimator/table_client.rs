//! HTTP travel-time table service client.
//!
//! Speaks the OSRM-style `table` endpoint: one GET with all coordinates,
//! one JSON response holding full duration and distance matrices. Cells
//! the service cannot route come back as `null` and stay unknown in the
//! resulting [`TravelMatrix`]; the optimizer handles those by degrading to
//! identity ordering.
//!
//! Transport failures and 5xx responses are retried with exponential
//! backoff before the estimator gives up.

use crate::dispatch::domain::{TravelLeg, TravelMatrix};
use crate::dispatch::ports::{EstimatorError, TravelEstimator};
use crate::geo::GeoPoint;
use serde::Deserialize;
use std::time::Duration;

/// Configuration for the table service client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableServiceConfig {
    /// Service base URL, e.g. `http://localhost:5000`.
    pub base_url: String,
    /// Routing profile, e.g. `car`.
    pub profile: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Retries after the initial attempt.
    pub max_retries: u32,
    /// Base backoff delay; doubles per retry.
    pub backoff_base_ms: u64,
}

impl Default for TableServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_owned(),
            profile: "car".to_owned(),
            timeout_secs: 10,
            max_retries: 3,
            backoff_base_ms: 250,
        }
    }
}

/// HTTP client for an OSRM-style table endpoint.
#[derive(Debug, Clone)]
pub struct TableServiceClient {
    config: TableServiceConfig,
    client: reqwest::blocking::Client,
}

impl TableServiceClient {
    /// Creates a client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EstimatorError::Transport`] when the underlying HTTP
    /// client fails to build.
    pub fn new(config: TableServiceConfig) -> Result<Self, EstimatorError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| EstimatorError::Transport(err.to_string()))?;
        Ok(Self { config, client })
    }

    fn table_url(&self, points: &[GeoPoint]) -> String {
        let coordinates = points
            .iter()
            .map(|point| format!("{:.6},{:.6}", point.longitude(), point.latitude()))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/table/v1/{}/{}?annotations=duration,distance",
            self.config.base_url, self.config.profile, coordinates
        )
    }

    fn fetch_with_retry(&self, url: &str) -> Result<TableResponse, EstimatorError> {
        let mut last_failure = String::new();

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = self
                    .config
                    .backoff_base_ms
                    .saturating_mul(1_u64 << (attempt - 1).min(16));
                tracing::debug!(attempt, delay_ms = delay, "retrying table service");
                std::thread::sleep(Duration::from_millis(delay));
            }

            match self.client.get(url).send() {
                Err(err) => {
                    last_failure = err.to_string();
                }
                Ok(response) => {
                    let status = response.status();
                    if status.is_server_error() {
                        last_failure = format!("server error {status}");
                    } else if !status.is_success() {
                        // Client errors are not retryable; the request
                        // itself is wrong.
                        return Err(EstimatorError::Transport(format!(
                            "table service rejected request: {status}"
                        )));
                    } else {
                        return response
                            .json::<TableResponse>()
                            .map_err(|err| EstimatorError::MalformedResponse(err.to_string()));
                    }
                }
            }
        }

        Err(EstimatorError::Transport(format!(
            "table service unavailable after {} attempts: {last_failure}",
            self.config.max_retries + 1
        )))
    }
}

impl TravelEstimator for TableServiceClient {
    fn travel_matrix(&self, points: &[GeoPoint]) -> Result<TravelMatrix, EstimatorError> {
        if points.is_empty() {
            return Ok(TravelMatrix::new(0));
        }

        let url = self.table_url(points);
        let response = self.fetch_with_retry(&url)?;
        build_matrix(points.len(), response)
    }
}

#[derive(Debug, Deserialize)]
struct TableResponse {
    durations: Option<Vec<Vec<Option<f64>>>>,
    distances: Option<Vec<Vec<Option<f64>>>>,
}

fn build_matrix(size: usize, response: TableResponse) -> Result<TravelMatrix, EstimatorError> {
    let durations = response.durations.ok_or_else(|| {
        EstimatorError::MalformedResponse("response missing durations".to_owned())
    })?;
    let distances = response.distances.ok_or_else(|| {
        EstimatorError::MalformedResponse("response missing distances".to_owned())
    })?;

    if durations.len() != size || distances.len() != size {
        return Err(EstimatorError::MalformedResponse(format!(
            "expected {size} rows, got {} durations and {} distances",
            durations.len(),
            distances.len()
        )));
    }

    let mut matrix = TravelMatrix::new(size);
    for (from, (duration_row, distance_row)) in
        durations.into_iter().zip(distances.into_iter()).enumerate()
    {
        if duration_row.len() != size || distance_row.len() != size {
            return Err(EstimatorError::MalformedResponse(format!(
                "row {from} has the wrong width"
            )));
        }

        for (to, (seconds, meters)) in duration_row
            .into_iter()
            .zip(distance_row.into_iter())
            .enumerate()
        {
            let (Some(seconds), Some(meters)) = (seconds, meters) else {
                // Unroutable pair: leave the cell unknown.
                continue;
            };
            let leg = TravelLeg {
                meters: meters.round().max(0.0) as u32,
                seconds: seconds.round().max(0.0) as u32,
            };
            matrix
                .set_leg(from, to, leg)
                .map_err(|err| EstimatorError::MalformedResponse(err.to_string()))?;
        }
    }

    Ok(matrix)
}
