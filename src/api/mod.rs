//! Transport seam between the aggregation engine and the Booker25 backend.

mod endpoints;
mod http;

pub use endpoints::Endpoints;
pub use http::HttpApi;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::records::{AvailabilityRecord, ResourceRecord, ServiceAvailabilityRecord};
use crate::reservation::{
    PriceCalculationData, PriceCalculationRequest, ReservationSaveRequest, ReservationSaveResponse,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

/// Body of the availability and service availability calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    pub resource_ids: Vec<String>,
}

/// Every backend call the client makes, already decoded into records.
#[async_trait]
pub trait Api: Send + Sync {
    async fn get_resources(&self, fields: &[String]) -> Result<Vec<ResourceRecord>, ApiError>;

    /// All descendants of `parent_id`.
    async fn get_child_resources(
        &self,
        parent_id: &str,
        fields: &[String],
    ) -> Result<Vec<ResourceRecord>, ApiError>;

    async fn get_availability(
        &self,
        request: &AvailabilityRequest,
    ) -> Result<Vec<AvailabilityRecord>, ApiError>;

    async fn get_service_availability(
        &self,
        request: &AvailabilityRequest,
    ) -> Result<Vec<ServiceAvailabilityRecord>, ApiError>;

    async fn save_reservation(
        &self,
        request: &ReservationSaveRequest,
    ) -> Result<ReservationSaveResponse, ApiError>;

    async fn calculate_price(
        &self,
        request: &PriceCalculationRequest,
    ) -> Result<PriceCalculationData, ApiError>;
}
