use tracing::debug;

use crate::api::{Api, HttpApi};
use crate::config::ClientConfig;
use crate::engine::ResourceResult;
use crate::error::Result;
use crate::price::apply_price_calculation;
use crate::request::ResourceRequest;
use crate::reservation::Reservation;

/// Entry point for applications: resources, reservations and pricing.
pub struct Client {
    api: Box<dyn Api>,
}

impl Client {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        debug!(environment = %config.environment, base_url = config.base_url(), "creating client");
        Ok(Self::with_api(HttpApi::new(config)?))
    }

    /// Client over any transport, e.g. an in-memory one in tests.
    pub fn with_api(api: impl Api + 'static) -> Self {
        Self { api: Box::new(api) }
    }

    pub fn build_resource_request(&self) -> ResourceRequest {
        ResourceRequest::new()
    }

    pub async fn get_resources(&self, request: &ResourceRequest) -> Result<ResourceResult> {
        request.get_results(self.api.as_ref()).await
    }

    /// Save `reservation` and return what the backend stored.
    pub async fn save_reservation(&self, reservation: &Reservation) -> Result<Reservation> {
        let response = self.api.save_reservation(&reservation.save_request()).await?;
        let saved = Reservation::from_save_response(reservation, response);
        debug!(id = ?saved.id, services = saved.service_reservations.len(), "saved reservation");
        Ok(saved)
    }

    /// Ask the backend to price `reservation` and fold the result into it.
    pub async fn calculate_price(&self, reservation: &mut Reservation) -> Result<()> {
        let data = self
            .api
            .calculate_price(&reservation.price_calculation_request())
            .await?;
        apply_price_calculation(reservation, &data);
        Ok(())
    }
}
