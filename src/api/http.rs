use std::time::Instant;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::{Api, ApiError, AvailabilityRequest, Endpoints};
use crate::config::ClientConfig;
use crate::observability::{status_label, REQUESTS_TOTAL, REQUEST_DURATION_SECONDS};
use crate::records::{AvailabilityRecord, ResourceRecord, ServiceAvailabilityRecord};
use crate::reservation::{
    PriceCalculationData, PriceCalculationRequest, ReservationSaveRequest, ReservationSaveResponse,
};

const MAX_ERROR_BODY_CHARS: usize = 200;

/// `Api` over HTTPS. The API key travels as a bearer token.
pub struct HttpApi {
    http: reqwest::Client,
    endpoints: Endpoints,
    api_key: String,
}

impl HttpApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            endpoints: Endpoints::new(config.base_url()),
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &'static str, url: url::Url) -> Result<T, ApiError> {
        self.send(endpoint, self.http.get(url)).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: url::Url,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(endpoint, self.http.post(url).json(body)).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let started = Instant::now();
        let outcome = request.bearer_auth(&self.api_key).send().await;

        let status = outcome.as_ref().ok().map(|r| r.status().as_u16());
        metrics::counter!(REQUESTS_TOTAL, "endpoint" => endpoint, "status" => status_label(status))
            .increment(1);
        metrics::histogram!(REQUEST_DURATION_SECONDS, "endpoint" => endpoint)
            .record(started.elapsed().as_secs_f64());

        let response = outcome?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            warn!(endpoint, status = status.as_u16(), "request failed");
            return Err(ApiError::Status {
                endpoint,
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body)
                    .chars()
                    .take(MAX_ERROR_BODY_CHARS)
                    .collect(),
            });
        }
        debug!(endpoint, bytes = body.len(), "response received");
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl Api for HttpApi {
    async fn get_resources(&self, fields: &[String]) -> Result<Vec<ResourceRecord>, ApiError> {
        self.get("resources", self.endpoints.resources(fields)?).await
    }

    async fn get_child_resources(
        &self,
        parent_id: &str,
        fields: &[String],
    ) -> Result<Vec<ResourceRecord>, ApiError> {
        self.get("child_resources", self.endpoints.child_resources(parent_id, fields)?)
            .await
    }

    async fn get_availability(
        &self,
        request: &AvailabilityRequest,
    ) -> Result<Vec<AvailabilityRecord>, ApiError> {
        self.post("availability", self.endpoints.availability()?, request).await
    }

    async fn get_service_availability(
        &self,
        request: &AvailabilityRequest,
    ) -> Result<Vec<ServiceAvailabilityRecord>, ApiError> {
        self.post("service_availability", self.endpoints.service_availability()?, request)
            .await
    }

    async fn save_reservation(
        &self,
        request: &ReservationSaveRequest,
    ) -> Result<ReservationSaveResponse, ApiError> {
        self.post("reservations", self.endpoints.reservations()?, request).await
    }

    async fn calculate_price(
        &self,
        request: &PriceCalculationRequest,
    ) -> Result<PriceCalculationData, ApiError> {
        self.post("price_calculation", self.endpoints.price_calculation()?, request)
            .await
    }
}
