//! Records-service gateway — the one remote write that persists a reading.
//!
//! The service speaks GraphQL over POST. This client wraps the `addInfo`
//! mutation in the standard `{query, variables}` envelope, surfaces the
//! server's first error message verbatim for inline display, and maps
//! connection and timeout failures to their own variants so the form can
//! tell "unreachable" from "rejected".

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config;
use crate::models::VitalsReading;

/// The `addInfo` mutation. Variable names match `VitalsReading`'s wire
/// casing, so the reading serialises directly as the variables object.
const ADD_INFO_MUTATION: &str = "\
mutation addInfo($patientId: String!, $date: String!, $pulseRate: Int!, \
$bloodPressure: Int!, $weight: Int!, $temperature: Int!, $respiratoryRate: Int!) { \
addInfo(patientId: $patientId, date: $date, pulseRate: $pulseRate, \
bloodPressure: $bloodPressure, weight: $weight, temperature: $temperature, \
respiratoryRate: $respiratoryRate) { \
patientId date pulseRate bloodPressure weight temperature respiratoryRate } }";

// ═══════════════════════════════════════════════════════════
// Error type
// ═══════════════════════════════════════════════════════════

/// Errors from the records gateway. Display text is what the form shows.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Could not reach the records service at {0}")]
    Unreachable(String),
    #[error("The records service did not answer within {0}s")]
    Timeout(u64),
    /// Server-side rejection; the message comes from the service verbatim.
    #[error("{0}")]
    Rejected(String),
    #[error("The records service returned an invalid response: {0}")]
    InvalidResponse(String),
}

// ═══════════════════════════════════════════════════════════
// Wire envelopes
// ═══════════════════════════════════════════════════════════

/// Request body for GraphQL-over-POST.
#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'static str,
    variables: &'a VitalsReading,
}

/// Response body: either `data` or `errors` is populated.
#[derive(Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<AddInfoData>,
    #[serde(default)]
    errors: Vec<GraphQlErrorEntry>,
}

#[derive(Deserialize)]
struct AddInfoData {
    #[serde(rename = "addInfo")]
    add_info: Option<VitalsReading>,
}

#[derive(Deserialize)]
struct GraphQlErrorEntry {
    message: String,
}

// ═══════════════════════════════════════════════════════════
// Client
// ═══════════════════════════════════════════════════════════

/// HTTP client for the records service.
pub struct RecordsGateway {
    endpoint: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl RecordsGateway {
    /// Create a gateway client for the given endpoint.
    pub fn new(endpoint: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
            timeout,
        }
    }

    /// Gateway client configured from the environment.
    pub fn from_config() -> Self {
        Self::new(&config::gateway_url(), config::GATEWAY_TIMEOUT)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Persist one reading. On success the service echoes the stored
    /// record back; that echo is returned.
    pub async fn add_reading(&self, reading: &VitalsReading) -> Result<VitalsReading, GatewayError> {
        let body = GraphQlRequest {
            query: ADD_INFO_MUTATION,
            variables: reading,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    GatewayError::Unreachable(self.endpoint.clone())
                } else if e.is_timeout() {
                    GatewayError::Timeout(self.timeout.as_secs())
                } else {
                    GatewayError::InvalidResponse(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::InvalidResponse(format!(
                "HTTP {}",
                status.as_u16()
            )));
        }

        let parsed: GraphQlResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        if let Some(err) = parsed.errors.first() {
            return Err(GatewayError::Rejected(err.message.clone()));
        }

        parsed
            .data
            .and_then(|d| d.add_info)
            .ok_or_else(|| GatewayError::InvalidResponse("missing addInfo payload".into()))
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
